//! Decision logging
//!
//! Records what the routine decided each tick for display and post-run
//! analysis.

use serde::Serialize;

/// A single entry in the decision log
#[derive(Debug, Clone, Serialize)]
pub struct DecisionLogEntry {
    /// Tick index the event belongs to
    pub tick: usize,
    /// The type of event
    pub event_type: DecisionLogEventType,
    /// Human-readable description of the event
    pub message: String,
}

/// Types of decision log events for filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DecisionLogEventType {
    /// A rule claimed the tick
    Decision,
    /// An action went out to the executor
    Action,
    /// No rule claimed the tick
    Idle,
    /// Run-level event (start, end, scenario notes)
    RunEvent,
}

/// The decision log storing all events of a run
#[derive(Debug, Default, Serialize)]
pub struct DecisionLog {
    /// All log entries in chronological order
    pub entries: Vec<DecisionLogEntry>,
}

impl DecisionLog {
    /// Clear the log for a new run
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Add a new entry to the log
    pub fn log(&mut self, tick: usize, event_type: DecisionLogEventType, message: String) {
        self.entries.push(DecisionLogEntry {
            tick,
            event_type,
            message,
        });
    }

    /// Get entries filtered by event type
    pub fn filter_by_type(&self, event_type: DecisionLogEventType) -> Vec<&DecisionLogEntry> {
        self.entries
            .iter()
            .filter(|e| e.event_type == event_type)
            .collect()
    }

    /// Get the last N entries
    pub fn recent(&self, count: usize) -> Vec<&DecisionLogEntry> {
        self.entries.iter().rev().take(count).rev().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_by_type() {
        let mut log = DecisionLog::default();
        log.log(0, DecisionLogEventType::Decision, "barkskin".into());
        log.log(0, DecisionLogEventType::Action, "cast Barkskin".into());
        log.log(1, DecisionLogEventType::Idle, "idle".into());

        assert_eq!(log.filter_by_type(DecisionLogEventType::Action).len(), 1);
        assert_eq!(log.filter_by_type(DecisionLogEventType::Decision).len(), 1);
    }

    #[test]
    fn test_recent_keeps_order() {
        let mut log = DecisionLog::default();
        for i in 0..5 {
            log.log(i, DecisionLogEventType::Idle, format!("tick {i}"));
        }
        let recent: Vec<_> = log.recent(2).iter().map(|e| e.tick).collect();
        assert_eq!(recent, vec![3, 4]);
    }
}
