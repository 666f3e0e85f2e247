//! Structural signature matching
//!
//! Two method signatures are structurally equivalent when their names,
//! return types, accessor flags, generic-parameter counts, and parameter
//! lists agree. Parameters agree per position when both name the same
//! concrete type, or both refer to a generic parameter at the same
//! position in their respective generic-parameter lists — parameter
//! *names* never participate, so differently-spelled type parameters
//! match as long as position and role align.

use veneer_sdk::sig::{MethodSig, TypeRef};

/// Decide structural equivalence of two method signatures.
///
/// Pure and total: no side effects, never fails for well-formed
/// signatures.
pub fn matches(a: &MethodSig, b: &MethodSig) -> bool {
    if a.name != b.name {
        return false;
    }

    if a.return_type != b.return_type {
        return false;
    }

    if a.is_accessor != b.is_accessor {
        return false;
    }

    if a.type_param_count != b.type_param_count {
        return false;
    }

    if a.params.len() != b.params.len() {
        return false;
    }

    a.params
        .iter()
        .zip(b.params.iter())
        .all(|(pa, pb)| param_matches(pa, pb))
}

fn param_matches(a: &TypeRef, b: &TypeRef) -> bool {
    match (a, b) {
        (TypeRef::Named(na), TypeRef::Named(nb)) => na == nb,
        // Positional equivalence: the same slot in each method's
        // generic-parameter list, regardless of how it was spelled.
        (TypeRef::Param(pa), TypeRef::Param(pb)) => pa == pb,
        (TypeRef::Unit, TypeRef::Unit) => true,
        _ => false,
    }
}
