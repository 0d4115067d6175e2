//! Runtime for effect-based stores.
//!
//! Wires the store to an action channel and a [`TaskManager`]. Async work
//! started by effect handlers reports back by sending actions into the same
//! channel, so every state change goes through one dispatch path.
//!
//! ```ignore
//! let mut runtime = EffectRuntime::new(AppState::default(), reducer, middleware);
//! runtime.enqueue(Action::from(UserAction::RestoreSession));
//!
//! let cancel = CancellationToken::new();
//! runtime
//!     .run(cancel.clone(), |effect, ctx| orchestrator.handle(effect, ctx))
//!     .await;
//! ```

use tokio::sync::{mpsc, watch};
use tokio_util::sync::CancellationToken;

use crate::middleware::Middleware;
use crate::store::{Reducer, StoreWithMiddleware};
use crate::tasks::TaskManager;
use crate::Action;

/// Context passed to effect handlers.
pub struct EffectContext<'a, S, A: Action> {
    state: &'a S,
    action_tx: &'a mpsc::UnboundedSender<A>,
    tasks: &'a mut TaskManager<A>,
}

impl<'a, S, A: Action> EffectContext<'a, S, A> {
    /// State as the reducer left it, after the action that produced the effect.
    pub fn state(&self) -> &S {
        self.state
    }

    /// Send an action directly.
    pub fn emit(&self, action: A) {
        let _ = self.action_tx.send(action);
    }

    /// Access the action sender.
    pub fn action_tx(&self) -> &mpsc::UnboundedSender<A> {
        self.action_tx
    }

    /// Access the task manager.
    pub fn tasks(&mut self) -> &mut TaskManager<A> {
        self.tasks
    }
}

/// Headless runtime for effect-based stores.
pub struct EffectRuntime<S, A: Action, E, M: Middleware<S, A>> {
    store: StoreWithMiddleware<S, A, E, M>,
    action_tx: mpsc::UnboundedSender<A>,
    action_rx: mpsc::UnboundedReceiver<A>,
    tasks: TaskManager<A>,
    revision: watch::Sender<u64>,
}

impl<S, A: Action, E, M: Middleware<S, A>> EffectRuntime<S, A, E, M> {
    /// Create a runtime from state, reducer and middleware chain.
    pub fn new(state: S, reducer: Reducer<S, A, E>, middleware: M) -> Self {
        Self::from_store(StoreWithMiddleware::new(state, reducer, middleware))
    }

    /// Create a runtime from an existing store.
    pub fn from_store(store: StoreWithMiddleware<S, A, E, M>) -> Self {
        let (action_tx, action_rx) = mpsc::unbounded_channel();
        let tasks = TaskManager::new(action_tx.clone());
        let (revision, _) = watch::channel(0);

        Self {
            store,
            action_tx,
            action_rx,
            tasks,
            revision,
        }
    }

    /// Send an action into the runtime queue.
    pub fn enqueue(&self, action: A) {
        let _ = self.action_tx.send(action);
    }

    /// Clone the action sender.
    pub fn action_tx(&self) -> mpsc::UnboundedSender<A> {
        self.action_tx.clone()
    }

    /// Access the current state.
    pub fn state(&self) -> &S {
        self.store.state()
    }

    pub fn store(&self) -> &StoreWithMiddleware<S, A, E, M> {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut StoreWithMiddleware<S, A, E, M> {
        &mut self.store
    }

    /// Access the task manager.
    pub fn tasks(&mut self) -> &mut TaskManager<A> {
        &mut self.tasks
    }

    /// Subscribe to state changes.
    ///
    /// The receiver yields a revision number that increases every time a
    /// dispatch changes state. Read the state itself through [`Self::state`].
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }

    /// Current state revision.
    pub fn revision(&self) -> u64 {
        *self.revision.borrow()
    }

    /// Dispatch an action now and hand its effects to `handle_effect`.
    ///
    /// Returns whether the state changed.
    pub fn dispatch<F>(&mut self, action: A, handle_effect: &mut F) -> bool
    where
        F: FnMut(E, &mut EffectContext<'_, S, A>),
    {
        let result = self.store.dispatch(action);

        if result.changed {
            self.revision.send_modify(|revision| *revision += 1);
        }

        if result.has_effects() {
            let mut ctx = EffectContext {
                state: self.store.state(),
                action_tx: &self.action_tx,
                tasks: &mut self.tasks,
            };
            for effect in result.effects {
                handle_effect(effect, &mut ctx);
            }
        }
        result.changed
    }

    /// Wait for the next queued action and dispatch it.
    ///
    /// Returns `None` once the channel is closed.
    pub async fn next<F>(&mut self, handle_effect: &mut F) -> Option<bool>
    where
        F: FnMut(E, &mut EffectContext<'_, S, A>),
    {
        let action = self.action_rx.recv().await?;
        Some(self.dispatch(action, handle_effect))
    }

    /// Dispatch every action that is already queued, without waiting.
    ///
    /// Returns the number of actions processed.
    pub fn drain<F>(&mut self, handle_effect: &mut F) -> usize
    where
        F: FnMut(E, &mut EffectContext<'_, S, A>),
    {
        let mut processed = 0;
        while let Ok(action) = self.action_rx.try_recv() {
            self.dispatch(action, handle_effect);
            processed += 1;
        }
        processed
    }

    /// Run the action loop until `cancel` fires.
    ///
    /// In-flight tasks are cancelled on exit.
    pub async fn run<F>(&mut self, cancel: CancellationToken, mut handle_effect: F)
    where
        F: FnMut(E, &mut EffectContext<'_, S, A>),
    {
        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                Some(action) = self.action_rx.recv() => {
                    self.dispatch(action, &mut handle_effect);
                }
                else => break,
            }
        }

        self.tasks.cancel_all();
        tracing::debug!("Runtime stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effect::DispatchResult;
    use crate::middleware::NoopMiddleware;
    use std::time::Duration;

    #[derive(Default)]
    struct Counter {
        value: i32,
    }

    #[derive(Clone, Debug)]
    enum TestAction {
        Load,
        DidLoad(i32),
        Ignore,
    }

    impl Action for TestAction {
        fn name(&self) -> &'static str {
            match self {
                TestAction::Load => "Load",
                TestAction::DidLoad(_) => "DidLoad",
                TestAction::Ignore => "Ignore",
            }
        }
    }

    enum TestEffect {
        Load,
    }

    fn reducer(state: &mut Counter, action: TestAction) -> DispatchResult<TestEffect> {
        match action {
            TestAction::Load => DispatchResult::effect(TestEffect::Load),
            TestAction::DidLoad(value) => {
                state.value = value;
                DispatchResult::changed()
            }
            TestAction::Ignore => DispatchResult::unchanged(),
        }
    }

    fn handle(effect: TestEffect, ctx: &mut EffectContext<'_, Counter, TestAction>) {
        match effect {
            TestEffect::Load => {
                let base = ctx.state().value;
                ctx.tasks().spawn("load", async move { TestAction::DidLoad(base + 5) });
            }
        }
    }

    #[tokio::test]
    async fn test_effect_result_flows_back_through_channel() {
        let mut runtime = EffectRuntime::new(Counter::default(), reducer, NoopMiddleware);
        let mut handler = handle;

        assert!(!runtime.dispatch(TestAction::Load, &mut handler));

        let changed = tokio::time::timeout(Duration::from_millis(100), runtime.next(&mut handler))
            .await
            .expect("timeout");

        assert_eq!(changed, Some(true));
        assert_eq!(runtime.state().value, 5);
    }

    #[tokio::test]
    async fn test_subscribers_see_only_changes() {
        let mut runtime = EffectRuntime::new(Counter::default(), reducer, NoopMiddleware);
        let mut rx = runtime.subscribe();
        let mut handler = handle;

        runtime.dispatch(TestAction::Ignore, &mut handler);
        assert!(!rx.has_changed().unwrap());

        runtime.dispatch(TestAction::DidLoad(3), &mut handler);
        assert!(rx.has_changed().unwrap());
        assert_eq!(*rx.borrow_and_update(), 1);
        assert_eq!(runtime.revision(), 1);
    }

    #[tokio::test]
    async fn test_drain_processes_queued_actions() {
        let mut runtime = EffectRuntime::new(Counter::default(), reducer, NoopMiddleware);
        runtime.enqueue(TestAction::DidLoad(1));
        runtime.enqueue(TestAction::DidLoad(2));

        let processed = runtime.drain(&mut handle);

        assert_eq!(processed, 2);
        assert_eq!(runtime.state().value, 2);
    }

    #[tokio::test]
    async fn test_run_stops_on_cancel() {
        let mut runtime = EffectRuntime::new(Counter::default(), reducer, NoopMiddleware);
        runtime.enqueue(TestAction::DidLoad(9));

        let cancel = CancellationToken::new();
        let stopper = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            stopper.cancel();
        });

        tokio::time::timeout(Duration::from_millis(500), runtime.run(cancel, handle))
            .await
            .expect("runtime did not stop");

        assert_eq!(runtime.state().value, 9);
    }
}
