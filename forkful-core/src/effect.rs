//! What a reducer returns: whether state moved, and which effects to run.
//!
//! Effects describe work (fetch the cart, forget the token); they never do
//! it. The runtime hands them to an effect handler once the reducer is done.
//!
//! ```ignore
//! fn reduce(state: &mut CartState, action: CartAction) -> DispatchResult<Effect> {
//!     match action {
//!         CartAction::Fetch => {
//!             let generation = state.items.start();
//!             DispatchResult::changed_with(Effect::FetchCart { generation })
//!         }
//!         CartAction::DidLoad { generation, items } => {
//!             DispatchResult::from_changed(state.items.succeed(generation, items))
//!         }
//!     }
//! }
//! ```

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchResult<E> {
    pub changed: bool,
    /// Run in order after the reducer returns.
    pub effects: Vec<E>,
}

impl<E> Default for DispatchResult<E> {
    fn default() -> Self {
        Self::unchanged()
    }
}

impl<E> DispatchResult<E> {
    pub fn from_changed(changed: bool) -> Self {
        Self {
            changed,
            effects: Vec::new(),
        }
    }

    pub fn unchanged() -> Self {
        Self::from_changed(false)
    }

    pub fn changed() -> Self {
        Self::from_changed(true)
    }

    /// No state change, one effect.
    pub fn effect(effect: E) -> Self {
        Self::unchanged().with(effect)
    }

    pub fn changed_with(effect: E) -> Self {
        Self::changed().with(effect)
    }

    pub fn with(mut self, effect: E) -> Self {
        self.effects.push(effect);
        self
    }

    pub fn mark_changed(self) -> Self {
        Self {
            changed: true,
            ..self
        }
    }

    /// Fold in the result of a follow-up action dispatched in the same turn.
    pub fn merge(&mut self, other: DispatchResult<E>) {
        self.changed |= other.changed;
        self.effects.extend(other.effects);
    }

    pub fn has_effects(&self) -> bool {
        !self.effects.is_empty()
    }
}
