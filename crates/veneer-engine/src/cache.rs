//! Synthesis cache and binder facade
//!
//! `ProxyBinder` is the engine's sole synthesis entry point. It memoizes
//! synthesized types in a two-level concurrent map — interface first,
//! then base — so a given (interface, base) pair is synthesized at most
//! once for the process lifetime, even under concurrent first access.
//! Entries are never evicted. Failed synthesis never populates the map:
//! retrying reproduces the same error.

use std::sync::Arc;

use dashmap::DashMap;

use crate::descriptor::{BaseDescriptor, InterfaceDescriptor, TypeToken};
use crate::error::SynthesisResult;
use crate::sink::{InProcessTypeSink, TypeSink};
use crate::synth::{self, SynthesizedType};

type BaseMap = DashMap<TypeToken, Arc<SynthesizedType>>;

/// Synthesizes and caches proxy types
pub struct ProxyBinder {
    sink: Arc<dyn TypeSink>,
    implementations: DashMap<TypeToken, Arc<BaseMap>>,
}

impl ProxyBinder {
    /// Create a binder over the default in-process type sink
    pub fn new() -> Self {
        Self::with_sink(Arc::new(InProcessTypeSink::new()))
    }

    /// Create a binder writing type definitions into `sink`
    pub fn with_sink(sink: Arc<dyn TypeSink>) -> Self {
        Self {
            sink,
            implementations: DashMap::new(),
        }
    }

    /// Get the synthesized type for (interface, base), synthesizing it
    /// on first request.
    ///
    /// All callers observe the same reference-equal type. Creation is
    /// serialized per key — concurrent first requests for the same pair
    /// run the synthesizer once, while unrelated pairs proceed without
    /// blocking each other. Configuration and ambiguity errors surface
    /// synchronously and leave the cache unpopulated.
    pub fn get_or_create(
        &self,
        interface: &Arc<InterfaceDescriptor>,
        base: &Arc<BaseDescriptor>,
    ) -> SynthesisResult<Arc<SynthesizedType>> {
        // Guard before touching the map so invalid targets never create
        // even an empty per-interface entry.
        synth::validate_target(interface)?;

        if let Some(bases) = self.implementations.get(&interface.token()) {
            if let Some(existing) = bases.get(&base.token()) {
                return Ok(existing.clone());
            }
        }

        let bases = self
            .implementations
            .entry(interface.token())
            .or_default()
            .clone();

        // The entry holds the per-key lock while the synthesizer runs, so
        // concurrent first requests for this pair produce exactly one
        // definition; an Err leaves no entry behind.
        let synthesized = bases
            .entry(base.token())
            .or_try_insert_with(|| {
                let blueprint = synth::build_blueprint(interface, base)?;
                Ok(self.sink.define(blueprint))
            })?
            .clone();

        Ok(synthesized)
    }

    /// All types synthesized for `interface` so far, across every base
    pub fn synthesized_for(&self, interface: &InterfaceDescriptor) -> Vec<Arc<SynthesizedType>> {
        self.implementations
            .get(&interface.token())
            .map(|bases| bases.iter().map(|entry| entry.value().clone()).collect())
            .unwrap_or_default()
    }

    /// Total number of synthesized types held by the cache
    pub fn len(&self) -> usize {
        self.implementations
            .iter()
            .map(|entry| entry.value().len())
            .sum()
    }

    /// Check if the cache is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for ProxyBinder {
    fn default() -> Self {
        Self::new()
    }
}
