//! Process-wide status message log
//!
//! Append-only. A message equal to the tail entry bumps that entry's repeat
//! count instead of being appended again.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use serde::Deserialize;

/// Status priority; higher is more severe
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Priority(pub u8);

impl Priority {
    pub const STATUS: Priority = Priority(0);
    pub const WARNING: Priority = Priority(1);
    pub const FAIL: Priority = Priority(2);
    pub const ERROR: Priority = Priority(3);

    /// Presentation level: above the warning band is an error
    pub fn level(&self) -> StatusLevel {
        if *self > Priority::FAIL {
            StatusLevel::Error
        } else if *self >= Priority::WARNING {
            StatusLevel::Warning
        } else {
            StatusLevel::Info
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Warning,
    Error,
}

/// How two messages are compared when deciding whether to collapse them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoalescePolicy {
    /// Same priority and identical argument lists
    #[default]
    Args,
    /// Same priority and identical composed text
    Message,
}

/// One log entry. Shared with every view that shows it; only the repeat
/// count changes after the entry is appended.
#[derive(Debug)]
pub struct StatusEntry {
    pub priority: Priority,
    pub args: Vec<String>,
    repeats: AtomicU32,
}

impl StatusEntry {
    fn new(priority: Priority, args: Vec<String>) -> Self {
        Self {
            priority,
            args,
            repeats: AtomicU32::new(1),
        }
    }

    pub fn repeats(&self) -> u32 {
        self.repeats.load(Ordering::Acquire)
    }

    pub fn message(&self) -> String {
        compose_status(&self.args, self.repeats(), true)
    }

    fn matches(&self, priority: Priority, args: &[String], policy: CoalescePolicy) -> bool {
        if self.priority != priority {
            return false;
        }
        match policy {
            CoalescePolicy::Args => self.args == args,
            CoalescePolicy::Message => self.args.join("; ") == args.join("; "),
        }
    }
}

/// Compose the displayed text of a status entry
pub fn compose_status(args: &[String], repeats: u32, show_count: bool) -> String {
    let message = args.join("; ");
    if show_count && repeats > 1 {
        format!("{} (×{})", message, repeats)
    } else {
        message
    }
}

#[derive(Debug, Default)]
pub struct StatusLog {
    entries: RwLock<Vec<Arc<StatusEntry>>>,
    policy: RwLock<CoalescePolicy>,
}

impl StatusLog {
    pub fn new(policy: CoalescePolicy) -> Self {
        Self {
            entries: RwLock::new(Vec::new()),
            policy: RwLock::new(policy),
        }
    }

    pub fn policy(&self) -> CoalescePolicy {
        *self.policy.read()
    }

    pub fn set_policy(&self, policy: CoalescePolicy) {
        *self.policy.write() = policy;
    }

    /// Append a message, collapsing it into the tail entry when equal.
    ///
    /// Returns the index of the entry that now holds the message.
    pub fn append<I, S>(&self, priority: Priority, args: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let args: Vec<String> = args.into_iter().map(Into::into).collect();
        let message = args.join("; ");
        match priority.level() {
            StatusLevel::Error => tracing::error!(priority = priority.0, "{}", message),
            StatusLevel::Warning => tracing::warn!(priority = priority.0, "{}", message),
            StatusLevel::Info => tracing::info!(priority = priority.0, "{}", message),
        }

        let policy = self.policy();
        let mut entries = self.entries.write();
        if let Some(last) = entries.last() {
            if last.matches(priority, &args, policy) {
                last.repeats.fetch_add(1, Ordering::AcqRel);
                return entries.len() - 1;
            }
        }
        entries.push(Arc::new(StatusEntry::new(priority, args)));
        entries.len() - 1
    }

    pub fn status(&self, message: impl Into<String>) -> usize {
        self.append(Priority::STATUS, [message.into()])
    }

    pub fn warning(&self, message: impl Into<String>) -> usize {
        self.append(Priority::WARNING, [message.into()])
    }

    pub fn error(&self, message: impl Into<String>) -> usize {
        self.append(Priority::ERROR, [message.into()])
    }

    /// Entries in insertion order
    pub fn entries(&self) -> Vec<Arc<StatusEntry>> {
        self.entries.read().clone()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    pub fn last(&self) -> Option<Arc<StatusEntry>> {
        self.entries.read().last().cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_repeat_collapses_into_tail() {
        let log = StatusLog::default();
        log.warning("disk full");
        log.warning("disk full");
        assert_eq!(log.len(), 1);
        let entry = log.last().unwrap();
        assert_eq!(entry.repeats(), 2);
        assert_eq!(entry.message(), "disk full (×2)");
    }

    #[test]
    fn test_held_entry_sees_later_repeats() {
        let log = StatusLog::default();
        log.warning("disk full");
        let held = log.last().unwrap();
        log.warning("disk full");
        assert_eq!(held.repeats(), 2);
        assert_eq!(held.message(), "disk full (×2)");
    }

    #[test]
    fn test_different_priority_is_not_collapsed() {
        let log = StatusLog::default();
        log.status("saved");
        log.warning("saved");
        assert_eq!(log.len(), 2);
    }

    #[test]
    fn test_only_tail_is_collapsed() {
        let log = StatusLog::default();
        log.status("a");
        log.status("b");
        log.status("a");
        assert_eq!(log.len(), 3);
    }

    #[test]
    fn test_message_policy_compares_text() {
        let log = StatusLog::new(CoalescePolicy::Message);
        log.append(Priority::STATUS, ["a", "b"]);
        log.append(Priority::STATUS, ["a; b"]);
        assert_eq!(log.len(), 1);

        let log = StatusLog::new(CoalescePolicy::Args);
        log.append(Priority::STATUS, ["a", "b"]);
        log.append(Priority::STATUS, ["a; b"]);
        assert_eq!(log.len(), 2);
    }

    #[test]
    fn test_levels() {
        assert_eq!(Priority::STATUS.level(), StatusLevel::Info);
        assert_eq!(Priority::WARNING.level(), StatusLevel::Warning);
        assert_eq!(Priority::FAIL.level(), StatusLevel::Warning);
        assert_eq!(Priority::ERROR.level(), StatusLevel::Error);
    }

    #[test]
    fn test_compose_without_count() {
        let args = vec!["x".to_string()];
        assert_eq!(compose_status(&args, 5, false), "x");
        assert_eq!(compose_status(&args, 1, true), "x");
    }

    proptest! {
        #[test]
        fn prop_repeats_sum_to_appends(messages in prop::collection::vec(0u8..3, 0..40)) {
            let log = StatusLog::default();
            for m in &messages {
                log.status(format!("m{}", m));
            }
            let entries = log.entries();
            let total: u32 = entries.iter().map(|e| e.repeats()).sum();
            prop_assert_eq!(total as usize, messages.len());
            for pair in entries.windows(2) {
                prop_assert_ne!(&pair[0].args, &pair[1].args);
            }
        }
    }
}
