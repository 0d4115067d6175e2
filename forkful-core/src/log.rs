//! Event log: which actions reached the reducers, in order.
//!
//! [`ActionLoggerMiddleware`] traces every action it sees and, when built
//! with [`ActionLoggerMiddleware::with_log`], keeps the most recent ones in
//! a bounded [`ActionLog`]. It sits last in the pipeline, so an action an
//! earlier middleware stopped is never recorded.
//!
//! Filters are glob patterns over action names (`cart/*`, `*/didFail*`).
//!
//! ```ignore
//! let logger = ActionLoggerMiddleware::with_log(ActionLogConfig::with_capacity(50));
//! let mut store = StoreWithMiddleware::new(state, reducer, (auth_gate, logger));
//! store.dispatch(UserAction::Logout.into());
//! assert_eq!(store.middleware().1.log().unwrap().names(), vec!["user/logout"]);
//! ```

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use crate::action::ActionSummary;
use crate::middleware::{DispatchQueue, Flow, Middleware};

/// Include/exclude filter over action names.
///
/// An empty include list admits everything. Exclusions win over inclusions.
#[derive(Debug, Clone, Default)]
pub struct ActionLoggerConfig {
    pub include_patterns: Vec<String>,
    pub exclude_patterns: Vec<String>,
}

impl ActionLoggerConfig {
    /// Build from comma-separated pattern lists.
    ///
    /// ```
    /// use forkful_core::log::ActionLoggerConfig;
    ///
    /// let config = ActionLoggerConfig::new(Some("cart/*, user/logout"), Some("cart/didLoad"));
    /// assert!(config.should_log("cart/add"));
    /// assert!(config.should_log("user/logout"));
    /// assert!(!config.should_log("cart/didLoad"));
    /// assert!(!config.should_log("search/queryChange"));
    /// ```
    pub fn new(include: Option<&str>, exclude: Option<&str>) -> Self {
        let parse = |list: Option<&str>| -> Vec<String> {
            list.into_iter()
                .flat_map(|list| list.split(','))
                .map(str::trim)
                .filter(|pattern| !pattern.is_empty())
                .map(str::to_owned)
                .collect()
        };
        Self::with_patterns(parse(include), parse(exclude))
    }

    pub fn with_patterns(include: Vec<String>, exclude: Vec<String>) -> Self {
        Self {
            include_patterns: include,
            exclude_patterns: exclude,
        }
    }

    pub fn should_log(&self, name: &str) -> bool {
        let matches_any = |patterns: &[String]| patterns.iter().any(|p| glob_match(p, name));
        let included = self.include_patterns.is_empty() || matches_any(&self.include_patterns);
        included && !matches_any(&self.exclude_patterns)
    }
}

/// One recorded action.
#[derive(Debug, Clone)]
pub struct ActionLogEntry {
    pub name: &'static str,
    pub summary: String,
    pub sequence: u64,
    pub recorded_at: Instant,
    /// Filled in once the reducer has run.
    pub state_changed: Option<bool>,
}

impl ActionLogEntry {
    pub fn new(name: &'static str, summary: String, sequence: u64) -> Self {
        Self {
            name,
            summary,
            sequence,
            recorded_at: Instant::now(),
            state_changed: None,
        }
    }

    pub fn age(&self) -> Duration {
        self.recorded_at.elapsed()
    }
}

#[derive(Debug, Clone)]
pub struct ActionLogConfig {
    /// Oldest entries are dropped past this many.
    pub capacity: usize,
    pub filter: ActionLoggerConfig,
}

impl Default for ActionLogConfig {
    fn default() -> Self {
        Self::with_capacity(100)
    }
}

impl ActionLogConfig {
    pub fn with_capacity(capacity: usize) -> Self {
        Self::new(capacity, ActionLoggerConfig::default())
    }

    pub fn new(capacity: usize, filter: ActionLoggerConfig) -> Self {
        Self { capacity, filter }
    }
}

/// Bounded, ordered record of dispatched actions.
#[derive(Debug, Clone, Default)]
pub struct ActionLog {
    entries: VecDeque<ActionLogEntry>,
    config: ActionLogConfig,
    recorded: u64,
}

impl ActionLog {
    pub fn new(config: ActionLogConfig) -> Self {
        Self {
            entries: VecDeque::new(),
            config,
            recorded: 0,
        }
    }

    /// Record `action` unless the filter rejects it.
    pub fn log<A: ActionSummary>(&mut self, action: &A) -> Option<&ActionLogEntry> {
        let name = action.name();
        if self.config.capacity == 0 || !self.config.filter.should_log(name) {
            return None;
        }

        while self.entries.len() >= self.config.capacity {
            self.entries.pop_front();
        }
        self.entries
            .push_back(ActionLogEntry::new(name, action.summary(), self.recorded));
        self.recorded += 1;
        self.entries.back()
    }

    pub fn update_last_state_changed(&mut self, changed: bool) {
        if let Some(last) = self.entries.back_mut() {
            last.state_changed = Some(changed);
        }
    }

    /// Entries, oldest first.
    pub fn entries(&self) -> impl Iterator<Item = &ActionLogEntry> {
        self.entries.iter()
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.entries.iter().map(|entry| entry.name).collect()
    }

    /// The newest `count` entries, newest first.
    pub fn recent(&self, count: usize) -> impl Iterator<Item = &ActionLogEntry> {
        self.entries.iter().rev().take(count)
    }

    pub fn count(&self, name: &str) -> usize {
        self.entries.iter().filter(|entry| entry.name == name).count()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn config(&self) -> &ActionLogConfig {
        &self.config
    }
}

/// Middleware that traces actions and optionally keeps an [`ActionLog`].
#[derive(Debug, Clone)]
pub struct ActionLoggerMiddleware {
    filter: ActionLoggerConfig,
    log: Option<ActionLog>,
    pending_entry: bool,
    active: bool,
}

impl ActionLoggerMiddleware {
    /// Tracing output only.
    pub fn new(filter: ActionLoggerConfig) -> Self {
        Self {
            filter,
            log: None,
            pending_entry: false,
            active: true,
        }
    }

    /// Tracing output plus an in-memory log.
    pub fn with_log(config: ActionLogConfig) -> Self {
        Self {
            filter: config.filter.clone(),
            log: Some(ActionLog::new(config)),
            ..Self::new(ActionLoggerConfig::default())
        }
    }

    pub fn active(self, active: bool) -> Self {
        Self { active, ..self }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn log(&self) -> Option<&ActionLog> {
        self.log.as_ref()
    }

    pub fn log_mut(&mut self) -> Option<&mut ActionLog> {
        self.log.as_mut()
    }

    pub fn config(&self) -> &ActionLoggerConfig {
        &self.filter
    }
}

impl<S, A: ActionSummary> Middleware<S, A> for ActionLoggerMiddleware {
    fn before(&mut self, action: &A, _state: &S, _queue: &mut DispatchQueue<A>) -> Flow {
        self.pending_entry = false;
        if !self.active {
            return Flow::Continue;
        }

        if self.filter.should_log(action.name()) {
            tracing::debug!(action = action.name(), "dispatch");
        }
        if let Some(log) = self.log.as_mut() {
            self.pending_entry = log.log(action).is_some();
        }
        Flow::Continue
    }

    fn after(&mut self, _action: &A, _state: &S, state_changed: bool, _queue: &mut DispatchQueue<A>) {
        if !std::mem::take(&mut self.pending_entry) {
            return;
        }
        if let Some(log) = self.log.as_mut() {
            log.update_last_state_changed(state_changed);
        }
    }
}

/// Glob match where `*` spans any run of characters and `?` exactly one.
pub fn glob_match(pattern: &str, text: &str) -> bool {
    fn matches(pattern: &[char], text: &[char]) -> bool {
        match pattern.split_first() {
            None => text.is_empty(),
            Some(('*', rest)) => (0..=text.len()).any(|skip| matches(rest, &text[skip..])),
            Some((&expected, rest)) => match text.split_first() {
                Some((&actual, tail)) if expected == '?' || expected == actual => {
                    matches(rest, tail)
                }
                _ => false,
            },
        }
    }

    let pattern: Vec<char> = pattern.chars().collect();
    let text: Vec<char> = text.chars().collect();
    matches(&pattern, &text)
}
