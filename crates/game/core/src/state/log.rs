//! Bounded combat log and turn history.
//!
//! Both are ring buffers: readers see the most recent window, the engine
//! never grows them past their caps. Entries carry a monotonic sequence
//! number rather than a wall-clock timestamp so replays stay deterministic.

use std::collections::VecDeque;

use super::common::UnitId;
use crate::config::GameConfig;

/// One line of the combat log.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LogEntry {
    pub text: String,
    pub turn: u32,
    pub round: u32,
    /// Monotonic event sequence number, unique across the encounter.
    pub seq: u64,
}

/// Ring buffer of combat messages, capped at
/// [`GameConfig::COMBAT_LOG_CAPACITY`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatLog {
    entries: VecDeque<LogEntry>,
    next_seq: u64,
}

impl CombatLog {
    /// Appends a message, dropping the oldest entry past capacity.
    pub fn push(&mut self, text: impl Into<String>, turn: u32, round: u32) {
        if self.entries.len() == GameConfig::COMBAT_LOG_CAPACITY {
            self.entries.pop_front();
        }
        self.entries.push_back(LogEntry {
            text: text.into(),
            turn,
            round,
            seq: self.next_seq,
        });
        self.next_seq += 1;
    }

    /// Iterates entries oldest-first.
    pub fn iter(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter()
    }

    /// The most recent entry.
    pub fn latest(&self) -> Option<&LogEntry> {
        self.entries.back()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Snapshot of one unit's turn, recorded when the turn starts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TurnRecord {
    pub unit: UnitId,
    pub turn: u32,
    pub round: u32,
    pub action_points: i32,
}

/// Rolling window of recent turns, capped at
/// [`GameConfig::TURN_HISTORY_CAPACITY`]. This is the only replay surface
/// the core defines; persistence formats live with the host.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TurnHistory {
    records: VecDeque<TurnRecord>,
}

impl TurnHistory {
    pub fn push(&mut self, record: TurnRecord) {
        if self.records.len() == GameConfig::TURN_HISTORY_CAPACITY {
            self.records.pop_front();
        }
        self.records.push_back(record);
    }

    pub fn iter(&self) -> impl Iterator<Item = &TurnRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
