//! Per-method dispatch planning
//!
//! For each interface method the synthesizer must implement, exactly one
//! plan is chosen: forward to the single structurally matching base
//! method, fall back to the base's dynamic invocation entry point, or
//! mark the method unimplementable. The decision is made independently
//! per method — one method forwarding says nothing about its siblings.

use veneer_sdk::sig::MethodSig;

use crate::descriptor::BaseDescriptor;
use crate::error::{SynthesisError, SynthesisResult};
use crate::signature;

/// Dispatch strategy chosen for one interface method
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MethodPlan {
    /// Call the base method at this index directly
    Forward(usize),
    /// Route through the base's dynamic invocation entry point
    DynamicInvoke,
    /// No match and no fallback; calling the method fails
    Unimplemented,
}

/// Choose the plan for one interface method against a base type.
///
/// A single structural match wins. More than one match is an ambiguity
/// failure — the engine fails fast rather than silently picking a
/// candidate. With no match, the base's dynamic invocation capability
/// decides between the fallback and `Unimplemented`.
pub fn plan_method(method: &MethodSig, base: &BaseDescriptor) -> SynthesisResult<MethodPlan> {
    let mut candidates = base
        .methods()
        .iter()
        .enumerate()
        .filter(|(_, m)| signature::matches(method, m.sig()));

    match (candidates.next(), candidates.next()) {
        (Some((index, _)), None) => Ok(MethodPlan::Forward(index)),
        (Some(_), Some(_)) => {
            let total = base
                .methods()
                .iter()
                .filter(|m| signature::matches(method, m.sig()))
                .count();
            Err(SynthesisError::AmbiguousMatch {
                method: method.to_string(),
                base: base.name().to_string(),
                candidates: total,
            })
        }
        (None, _) => {
            if base.is_invoker() {
                Ok(MethodPlan::DynamicInvoke)
            } else {
                Ok(MethodPlan::Unimplemented)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use veneer_sdk::sig::TypeRef;
    use veneer_sdk::value::Value;

    fn base_with(sigs: &[MethodSig], invoker: bool) -> Arc<BaseDescriptor> {
        let mut builder = crate::descriptor::BaseDescriptor::builder("Base");
        for sig in sigs {
            builder = builder.method(sig.clone(), |_, _, _| Ok(Value::Null));
        }
        if invoker {
            builder = builder.dynamic_invoker();
        }
        builder.build()
    }

    fn ping() -> MethodSig {
        MethodSig::new("ping").returns(TypeRef::named("bool"))
    }

    #[test]
    fn test_single_match_forwards() {
        let base = base_with(&[ping()], false);
        assert_eq!(plan_method(&ping(), &base).unwrap(), MethodPlan::Forward(0));
    }

    #[test]
    fn test_no_match_with_invoker() {
        let base = base_with(&[], true);
        assert_eq!(
            plan_method(&ping(), &base).unwrap(),
            MethodPlan::DynamicInvoke
        );
    }

    #[test]
    fn test_no_match_without_invoker() {
        let base = base_with(&[], false);
        assert_eq!(
            plan_method(&ping(), &base).unwrap(),
            MethodPlan::Unimplemented
        );
    }

    #[test]
    fn test_match_beats_invoker_fallback() {
        // A structural match wins even when the base could also take the
        // dynamic route.
        let base = base_with(&[ping()], true);
        assert_eq!(plan_method(&ping(), &base).unwrap(), MethodPlan::Forward(0));
    }

    #[test]
    fn test_duplicate_match_is_ambiguous() {
        let base = base_with(&[ping(), ping()], false);
        let err = plan_method(&ping(), &base).unwrap_err();
        assert_eq!(
            err,
            SynthesisError::AmbiguousMatch {
                method: "ping() -> bool".to_string(),
                base: "Base".to_string(),
                candidates: 2,
            }
        );
    }
}
