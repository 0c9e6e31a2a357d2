use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::protocol::{HistoryEntry, WireRole};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Speaker {
    User,
    Assistant,
}

impl Speaker {
    pub fn wire_role(self) -> WireRole {
        match self {
            Speaker::User => WireRole::User,
            Speaker::Assistant => WireRole::Model,
        }
    }
}

impl From<WireRole> for Speaker {
    fn from(value: WireRole) -> Self {
        match value {
            WireRole::User => Speaker::User,
            WireRole::Model => Speaker::Assistant,
        }
    }
}

/// One exchanged message. Fields are private so a turn cannot change after
/// it lands in a conversation log.
#[derive(Debug, Clone)]
pub struct Turn {
    speaker: Speaker,
    text: String,
    created_at: DateTime<Utc>,
}

impl Turn {
    pub fn new(speaker: Speaker, text: impl Into<String>) -> Self {
        Self {
            speaker,
            text: text.into(),
            created_at: Utc::now(),
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Speaker::User, text)
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self::new(Speaker::Assistant, text)
    }

    pub fn speaker(&self) -> Speaker {
        self.speaker
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn to_history_entry(&self) -> HistoryEntry {
        HistoryEntry {
            role: self.speaker.wire_role(),
            text: self.text.clone(),
        }
    }
}

// Capture time is display-only.
impl PartialEq for Turn {
    fn eq(&self, other: &Self) -> bool {
        self.speaker == other.speaker && self.text == other.text
    }
}

impl Eq for Turn {}
