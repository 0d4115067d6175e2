//! Middleware pipeline
//!
//! Middleware observe every dispatched action before and after it reaches
//! the reducer. They never mutate state. They can:
//! - stop an action before the reducer sees it ([`Flow::Stop`])
//! - enqueue follow-up actions into the [`DispatchQueue`]
//!
//! Follow-ups are processed by the store after the current action has gone
//! through the whole chain and the reducer, in FIFO order.
//!
//! Tuples compose middleware in a fixed order: `before` runs front to back
//! and stops at the first [`Flow::Stop`], `after` runs back to front.

use std::collections::VecDeque;

use crate::Action;

/// Whether the current action continues down the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Flow {
    /// Forward the action to the next middleware and then to the reducer.
    #[default]
    Continue,
    /// Drop the action. Remaining middleware and the reducer are skipped.
    Stop,
}

impl Flow {
    pub fn is_stop(self) -> bool {
        matches!(self, Flow::Stop)
    }
}

/// Actions enqueued by middleware during a dispatch.
#[derive(Debug)]
pub struct DispatchQueue<A> {
    pending: VecDeque<A>,
}

impl<A> Default for DispatchQueue<A> {
    fn default() -> Self {
        Self {
            pending: VecDeque::new(),
        }
    }
}

impl<A> DispatchQueue<A> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enqueue an action to run after the current one completes.
    pub fn dispatch(&mut self, action: A) {
        self.pending.push_back(action);
    }

    pub(crate) fn pop(&mut self) -> Option<A> {
        self.pending.pop_front()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Drain enqueued actions (oldest first).
    pub fn drain(&mut self) -> impl Iterator<Item = A> + '_ {
        self.pending.drain(..)
    }
}

/// Middleware trait for intercepting actions
///
/// Implement this trait to add auth gating, derived fetches, logging, or
/// other cross-cutting concerns to your store.
pub trait Middleware<S, A: Action> {
    /// Called before the action is dispatched to the reducer
    fn before(&mut self, _action: &A, _state: &S, _queue: &mut DispatchQueue<A>) -> Flow {
        Flow::Continue
    }

    /// Called after the action is processed by the reducer
    ///
    /// Not called for actions stopped in `before`.
    fn after(&mut self, _action: &A, _state: &S, _state_changed: bool, _queue: &mut DispatchQueue<A>) {
    }
}

/// A no-op middleware that does nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopMiddleware;

impl<S, A: Action> Middleware<S, A> for NoopMiddleware {}

macro_rules! tuple_middleware {
    ($($name:ident : $idx:tt),+ ; $($rev:tt),+) => {
        impl<S, A: Action, $($name: Middleware<S, A>),+> Middleware<S, A> for ($($name,)+) {
            fn before(&mut self, action: &A, state: &S, queue: &mut DispatchQueue<A>) -> Flow {
                $(
                    if self.$idx.before(action, state, queue).is_stop() {
                        return Flow::Stop;
                    }
                )+
                Flow::Continue
            }

            fn after(&mut self, action: &A, state: &S, state_changed: bool, queue: &mut DispatchQueue<A>) {
                $(
                    self.$rev.after(action, state, state_changed, queue);
                )+
            }
        }
    };
}

tuple_middleware!(M1: 0, M2: 1; 1, 0);
tuple_middleware!(M1: 0, M2: 1, M3: 2; 2, 1, 0);
tuple_middleware!(M1: 0, M2: 1, M3: 2, M4: 3; 3, 2, 1, 0);
