//! Live macro recording.
//!
//! The recorder turns a stream of key-down/key-up events into macro actions.
//! Every key-down appends a provisional `Press` entry and remembers its
//! index; a key-up within the tap threshold rewrites that entry in place to
//! a `Tap`, otherwise a `Release` is appended at the tail.

mod keys;

pub use keys::PhysicalKey;

use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, info};

use crate::config::Config;
use crate::constants::DEFAULT_TAP_THRESHOLD_MS;
use crate::models::MacroAction;

/// Whether the recorder is accepting events.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RecorderState {
    /// Events are ignored
    #[default]
    Idle,
    /// Events are turned into actions
    Recording,
}

/// A key that is down, and where its provisional entry sits in the sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PendingPress {
    pressed_at: Duration,
    index: usize,
}

/// Records one macro. Create a new recorder per recording session.
#[derive(Debug, Clone)]
pub struct MacroRecorder {
    state: RecorderState,
    tap_threshold: Duration,
    sequence: Vec<MacroAction>,
    pending: HashMap<PhysicalKey, PendingPress>,
}

impl Default for MacroRecorder {
    fn default() -> Self {
        Self::with_threshold(Duration::from_millis(DEFAULT_TAP_THRESHOLD_MS))
    }
}

impl MacroRecorder {
    /// Recorder with the default 200 ms tap threshold.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorder with a custom tap threshold.
    #[must_use]
    pub fn with_threshold(tap_threshold: Duration) -> Self {
        Self {
            state: RecorderState::Idle,
            tap_threshold,
            sequence: Vec::new(),
            pending: HashMap::new(),
        }
    }

    /// Recorder using the tap threshold from the app settings.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self::with_threshold(config.recorder.tap_threshold())
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> RecorderState {
        self.state
    }

    /// True while recording.
    #[must_use]
    pub fn is_recording(&self) -> bool {
        self.state == RecorderState::Recording
    }

    /// Longest press that still collapses into a tap.
    #[must_use]
    pub const fn tap_threshold(&self) -> Duration {
        self.tap_threshold
    }

    /// Actions recorded so far.
    #[must_use]
    pub fn sequence(&self) -> &[MacroAction] {
        &self.sequence
    }

    /// Number of keys currently held down.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Starts a fresh recording, discarding anything recorded before.
    pub fn start(&mut self) {
        self.sequence.clear();
        self.pending.clear();
        self.state = RecorderState::Recording;
        info!(threshold = ?self.tap_threshold, "macro recording started");
    }

    /// Handles a key-down. Returns true if an entry was appended.
    ///
    /// Repeats for a key that is already down and keys with no KMK token are
    /// ignored.
    pub fn key_down(&mut self, key: &PhysicalKey, at: Duration) -> bool {
        if !self.is_recording() || self.pending.contains_key(key) {
            return false;
        }
        let Some(code) = key.kmk_code() else {
            debug!(key = %key.name, "ignoring unmapped key");
            return false;
        };

        self.sequence.push(MacroAction::Press(code.to_string()));
        self.pending.insert(
            key.clone(),
            PendingPress {
                pressed_at: at,
                index: self.sequence.len() - 1,
            },
        );
        true
    }

    /// Handles a key-up. Returns true if the sequence changed.
    pub fn key_up(&mut self, key: &PhysicalKey, at: Duration) -> bool {
        if !self.is_recording() {
            return false;
        }
        let Some(code) = key.kmk_code() else {
            return false;
        };

        match self.pending.remove(key) {
            Some(press) if at.saturating_sub(press.pressed_at) <= self.tap_threshold => {
                debug!(code, index = press.index, "collapsed press into tap");
                self.sequence[press.index] = MacroAction::Tap(code.to_string());
            }
            _ => self.sequence.push(MacroAction::Release(code.to_string())),
        }
        true
    }

    /// Appends a text action. Ignored unless recording.
    pub fn insert_text(&mut self, text: impl Into<String>) -> bool {
        self.push_if_recording(MacroAction::Text(text.into()))
    }

    /// Appends a delay action. Ignored unless recording.
    pub fn insert_delay(&mut self, ms: u64) -> bool {
        self.push_if_recording(MacroAction::Delay(ms))
    }

    /// Stops recording and returns the finished sequence.
    ///
    /// Keys still held keep their `Press` entry with no `Release`.
    pub fn stop(&mut self) -> &[MacroAction] {
        if self.is_recording() {
            info!(
                actions = self.sequence.len(),
                held = self.pending.len(),
                "macro recording stopped"
            );
        }
        self.state = RecorderState::Idle;
        self.pending.clear();
        &self.sequence
    }

    /// Consumes the recorder, returning its sequence.
    #[must_use]
    pub fn into_sequence(self) -> Vec<MacroAction> {
        self.sequence
    }

    fn push_if_recording(&mut self, action: MacroAction) -> bool {
        if self.is_recording() {
            self.sequence.push(action);
            true
        } else {
            false
        }
    }
}
