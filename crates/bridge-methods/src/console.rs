//! In-memory editor console
//!
//! Bounded, thread-safe log buffer standing in for the editor console window.
//! Entries carry a monotonically increasing sequence number.

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;
use std::str::FromStr;

/// Console message type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogKind {
    /// Error
    Error,
    /// Warning
    Warning,
    /// Plain log
    Log,
    /// Failed assertion
    Assert,
    /// Exception
    Exception,
}

impl LogKind {
    /// Every kind, in display order
    pub const ALL: [LogKind; 5] = [Self::Error, Self::Warning, Self::Log, Self::Assert, Self::Exception];

    /// Lower-case name
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Log => "log",
            Self::Assert => "assert",
            Self::Exception => "exception",
        }
    }
}

impl fmt::Display for LogKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|k| k.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| s.trim().to_string())
    }
}

/// One console entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Insertion order, starting at 1
    pub sequence: u64,
    /// Message type
    #[serde(rename = "type")]
    pub kind: LogKind,
    /// Message text
    pub message: String,
    /// Captured stack trace
    #[serde(default, rename = "stackTrace", skip_serializing_if = "Option::is_none")]
    pub stacktrace: Option<String>,
}

/// Filter for [`ConsoleLog::query`]
#[derive(Debug, Clone, Default)]
pub struct ConsoleQuery {
    /// Accepted kinds; `None` accepts all
    pub kinds: Option<Vec<LogKind>>,
    /// Keep only the newest `count` matches
    pub count: Option<usize>,
    /// Case-insensitive substring the message must contain
    pub filter: Option<String>,
    /// Whether returned entries keep their stack traces
    pub include_stacktrace: bool,
}

#[derive(Debug, Default)]
struct ConsoleInner {
    entries: VecDeque<LogEntry>,
    next_sequence: u64,
}

/// Bounded console buffer
#[derive(Debug)]
pub struct ConsoleLog {
    inner: Mutex<ConsoleInner>,
    capacity: usize,
}

impl ConsoleLog {
    /// Console retaining at most `capacity` entries (minimum 1)
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: Mutex::new(ConsoleInner::default()),
            capacity: capacity.max(1),
        }
    }

    /// Retention limit
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Append an entry, evicting the oldest when full; returns its sequence
    pub fn push(&self, kind: LogKind, message: impl Into<String>, stacktrace: Option<String>) -> u64 {
        let mut guard = self.inner.lock();
        guard.next_sequence += 1;
        let sequence = guard.next_sequence;
        guard.entries.push_back(LogEntry {
            sequence,
            kind,
            message: message.into(),
            stacktrace,
        });
        while guard.entries.len() > self.capacity {
            guard.entries.pop_front();
        }
        sequence
    }

    /// Matching entries, oldest first
    #[must_use]
    pub fn query(&self, query: &ConsoleQuery) -> Vec<LogEntry> {
        let needle = query.filter.as_deref().map(str::to_lowercase);
        let guard = self.inner.lock();
        let mut matched: Vec<LogEntry> = guard
            .entries
            .iter()
            .filter(|e| query.kinds.as_ref().map_or(true, |k| k.contains(&e.kind)))
            .filter(|e| {
                needle
                    .as_deref()
                    .map_or(true, |n| e.message.to_lowercase().contains(n))
            })
            .cloned()
            .collect();
        drop(guard);

        if let Some(count) = query.count {
            let skip = matched.len().saturating_sub(count);
            matched.drain(..skip);
        }
        if !query.include_stacktrace {
            for entry in &mut matched {
                entry.stacktrace = None;
            }
        }
        matched
    }

    /// Remove every entry; returns how many were removed
    pub fn clear(&self) -> usize {
        let mut guard = self.inner.lock();
        let removed = guard.entries.len();
        guard.entries.clear();
        removed
    }

    /// Number of retained entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.lock().entries.len()
    }

    /// Whether the console is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for ConsoleLog {
    fn default() -> Self {
        Self::new(1000)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled() -> ConsoleLog {
        let log = ConsoleLog::new(10);
        log.push(LogKind::Log, "starting", None);
        log.push(LogKind::Error, "NullReference in Player", Some("at Player.Update".into()));
        log.push(LogKind::Warning, "slow frame", None);
        log.push(LogKind::Error, "Missing texture", Some("at Loader.Load".into()));
        log
    }

    #[test]
    fn capacity_evicts_oldest() {
        let log = ConsoleLog::new(2);
        log.push(LogKind::Log, "a", None);
        log.push(LogKind::Log, "b", None);
        log.push(LogKind::Log, "c", None);
        let messages: Vec<String> = log.query(&ConsoleQuery::default()).into_iter().map(|e| e.message).collect();
        assert_eq!(messages, vec!["b", "c"]);
    }

    #[test]
    fn count_keeps_newest() {
        let log = filled();
        let q = ConsoleQuery {
            count: Some(2),
            ..ConsoleQuery::default()
        };
        let seqs: Vec<u64> = log.query(&q).iter().map(|e| e.sequence).collect();
        assert_eq!(seqs, vec![3, 4]);
    }

    #[test]
    fn filters_combine() {
        let log = filled();
        let q = ConsoleQuery {
            kinds: Some(vec![LogKind::Error]),
            filter: Some("null".into()),
            include_stacktrace: true,
            ..ConsoleQuery::default()
        };
        let found = log.query(&q);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].stacktrace.as_deref(), Some("at Player.Update"));
    }

    #[test]
    fn stacktraces_stripped_by_default() {
        let log = filled();
        assert!(log.query(&ConsoleQuery::default()).iter().all(|e| e.stacktrace.is_none()));
    }

    #[test]
    fn clear_reports_removed() {
        let log = filled();
        assert_eq!(log.clear(), 4);
        assert!(log.is_empty());
    }

    #[test]
    fn kind_parsing() {
        assert_eq!("Warning".parse::<LogKind>(), Ok(LogKind::Warning));
        assert_eq!(" error ".parse::<LogKind>(), Ok(LogKind::Error));
        assert_eq!("fatal".parse::<LogKind>(), Err("fatal".to_string()));
    }
}
