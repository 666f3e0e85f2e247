//! Type-definition sink
//!
//! The sink is the destination synthesized type definitions are written
//! into, once per synthesis: an append-only, thread-tolerant factory
//! that materializes a [`TypeBlueprint`] into an instantiable
//! [`SynthesizedType`] and assigns it a process-unique type id.
//!
//! The binder takes its sink as an explicit handle; there is no ambient
//! module-level definition state.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::synth::{SynthesizedType, TypeBlueprint};

/// Destination for synthesized type definitions
pub trait TypeSink: Send + Sync {
    /// Materialize one blueprint into an instantiable type.
    ///
    /// Called at most once per (interface, base) pair by the binder;
    /// implementations must tolerate concurrent calls for unrelated
    /// pairs.
    fn define(&self, blueprint: TypeBlueprint) -> Arc<SynthesizedType>;
}

/// The default sink: materializes blueprints in memory and stamps
/// monotonically increasing type ids from an atomic counter.
pub struct InProcessTypeSink {
    next_id: AtomicU64,
}

impl InProcessTypeSink {
    /// Create a sink with ids starting at 1
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
        }
    }

    /// Number of types defined so far
    pub fn defined_count(&self) -> u64 {
        self.next_id.load(Ordering::Relaxed) - 1
    }
}

impl Default for InProcessTypeSink {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeSink for InProcessTypeSink {
    fn define(&self, blueprint: TypeBlueprint) -> Arc<SynthesizedType> {
        let type_id = self.next_id.fetch_add(1, Ordering::Relaxed);
        SynthesizedType::from_blueprint(blueprint, type_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::descriptor::{BaseDescriptor, InterfaceDescriptor};
    use crate::synth::build_blueprint;

    #[test]
    fn test_ids_are_monotonic() {
        let sink = InProcessTypeSink::new();
        let base = BaseDescriptor::builder("Base").build();

        let a = sink.define(
            build_blueprint(&InterfaceDescriptor::builder("IA").build(), &base).unwrap(),
        );
        let b = sink.define(
            build_blueprint(&InterfaceDescriptor::builder("IB").build(), &base).unwrap(),
        );

        assert_eq!(a.type_id(), 1);
        assert_eq!(b.type_id(), 2);
        assert_eq!(sink.defined_count(), 2);
    }
}
