//! Uniform request lifecycle for server-derived state
//!
//! Every slice that holds data fetched from a server exposes it as an
//! [`AsyncResource`]: `{ data, loading, error, status }`.
//!
//! ```text
//! idle ──start──▶ loading ──succeed──▶ succeeded ─┐
//!                    │                             │
//!                    └────fail────▶ failed ────────┴──start──▶ loading
//! ```
//!
//! Each `start` hands out a generation number. Results carry it back and are
//! applied only if no newer request (or reset) happened in between, so a
//! slow response can never overwrite fresher state.

use serde::{Deserialize, Serialize};

/// Lifecycle status of an [`AsyncResource`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    #[default]
    Idle,
    Loading,
    Succeeded,
    Failed,
}

/// Token identifying the request a result belongs to.
pub type Generation = u64;

/// Server-derived data plus its request lifecycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AsyncResource<T> {
    pub data: T,
    pub loading: bool,
    pub error: Option<String>,
    pub status: Status,
    #[serde(skip)]
    generation: Generation,
}

impl<T: Default> Default for AsyncResource<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T> AsyncResource<T> {
    /// Create an idle resource holding `data`.
    pub fn new(data: T) -> Self {
        Self {
            data,
            loading: false,
            error: None,
            status: Status::Idle,
            generation: 0,
        }
    }

    /// Mark a new fetch as started and invalidate older in-flight ones.
    ///
    /// Previous data is retained until the result replaces it.
    pub fn start(&mut self) -> Generation {
        self.generation += 1;
        self.begin();
        self.generation
    }

    /// Mark a mutation as started without invalidating in-flight requests.
    ///
    /// Concurrent mutations share the current generation; only a new fetch
    /// or a reset makes their results stale.
    pub fn start_mutation(&mut self) -> Generation {
        self.begin();
        self.generation
    }

    fn begin(&mut self) {
        self.loading = true;
        self.error = None;
        self.status = Status::Loading;
    }

    /// Whether a result for `generation` may still be applied.
    pub fn is_current(&self, generation: Generation) -> bool {
        self.generation == generation
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// Replace the data with a successful result.
    ///
    /// Returns `false` (and changes nothing) for stale results.
    pub fn succeed(&mut self, generation: Generation, data: T) -> bool {
        self.apply(generation, |slot| *slot = data)
    }

    /// Apply a successful result by editing the data in place.
    ///
    /// Used by mutations that touch one entry of a collection.
    pub fn apply(&mut self, generation: Generation, edit: impl FnOnce(&mut T)) -> bool {
        if !self.is_current(generation) {
            return false;
        }
        edit(&mut self.data);
        self.loading = false;
        self.error = None;
        self.status = Status::Succeeded;
        true
    }

    /// Record a failure. The data is left as last-known-good.
    ///
    /// Returns `false` (and changes nothing) for stale results.
    pub fn fail(&mut self, generation: Generation, reason: impl Into<String>) -> bool {
        if !self.is_current(generation) {
            return false;
        }
        self.loading = false;
        self.error = Some(reason.into());
        self.status = Status::Failed;
        true
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }
}

impl<T: Default> AsyncResource<T> {
    /// Return to the initial empty state.
    ///
    /// The generation keeps counting up, so every request started before
    /// the reset resolves as stale.
    pub fn reset(&mut self) {
        let generation = self.generation + 1;
        *self = Self::default();
        self.generation = generation;
    }
}
