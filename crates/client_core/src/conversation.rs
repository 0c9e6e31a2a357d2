//! Multi-turn chat state: an append-only transcript plus the single
//! outstanding request that may extend it.
//!
//! The history sent with a message is always the transcript as it stood
//! before that message's own user turn was appended. The new message
//! travels in `message`, never inside `history`.

use shared::{
    domain::Turn,
    error::FailureReason,
    protocol::{ChatRequest, ChatResponse, HistoryEntry},
};
use tracing::{debug, info, warn};

use crate::transport::{self, Transport};

pub const SUGGESTED_PROMPTS: [&str; 4] = [
    "How do I get from Westlands to CBD?",
    "What's the fare from Rongai to town?",
    "Ni matatu gani ya kwenda JKIA?",
    "Is Thika Road busy right now?",
];

pub const ONLINE_STATUS: &str = "Online - Ask me anything about Nairobi transport";
pub const TYPING_STATUS: &str = "Typing...";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChatPhase {
    #[default]
    Idle,
    Sending,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Conversation {
    turns: Vec<Turn>,
    input: String,
    phase: ChatPhase,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    /// Copies one of [`SUGGESTED_PROMPTS`] into the draft.
    pub fn use_suggestion(&mut self, index: usize) -> bool {
        match SUGGESTED_PROMPTS.get(index) {
            Some(prompt) => {
                self.input = (*prompt).to_string();
                true
            }
            None => false,
        }
    }

    pub fn phase(&self) -> ChatPhase {
        self.phase
    }

    pub fn is_sending(&self) -> bool {
        self.phase == ChatPhase::Sending
    }

    pub fn status_line(&self) -> &'static str {
        match self.phase {
            ChatPhase::Idle => ONLINE_STATUS,
            ChatPhase::Sending => TYPING_STATUS,
        }
    }

    pub fn history_payload(&self) -> Vec<HistoryEntry> {
        self.turns.iter().map(Turn::to_history_entry).collect()
    }

    /// Appends the user turn and returns the request to dispatch. Blank text
    /// or an outstanding request makes this a no-op.
    pub fn submit(&mut self, text: &str) -> Option<ChatRequest> {
        let text = text.trim();
        if text.is_empty() || self.is_sending() {
            return None;
        }

        let history = self.history_payload();
        self.turns.push(Turn::user(text));
        self.phase = ChatPhase::Sending;
        self.input.clear();
        debug!(history = history.len(), "chat message queued");

        Some(ChatRequest {
            message: text.to_string(),
            history,
        })
    }

    pub fn submit_input(&mut self) -> Option<ChatRequest> {
        let draft = std::mem::take(&mut self.input);
        let request = self.submit(&draft);
        if request.is_none() {
            self.input = draft;
        }
        request
    }

    /// Closes the outstanding exchange. Failures become an assistant turn so
    /// they read inline with the rest of the transcript.
    pub fn complete(&mut self, result: Result<ChatResponse, FailureReason>) {
        if !self.is_sending() {
            warn!("chat completion arrived with no request outstanding; ignoring");
            return;
        }
        let reply = match result {
            Ok(response) => response.response,
            Err(failure) => {
                warn!(kind = ?failure.kind(), "chat exchange failed");
                failure_turn_text(&failure)
            }
        };
        self.turns.push(Turn::assistant(reply));
        self.phase = ChatPhase::Idle;
        info!(turns = self.turns.len(), "chat exchange settled");
    }

    pub async fn send_with(&mut self, transport: &dyn Transport, text: &str) -> bool {
        let Some(request) = self.submit(text) else {
            return false;
        };
        let result = transport::send_chat(transport, &request).await;
        self.complete(result);
        true
    }

    /// Drops the whole transcript and the draft. Refused while sending.
    pub fn clear(&mut self) -> bool {
        if self.is_sending() {
            return false;
        }
        self.turns.clear();
        self.input.clear();
        true
    }
}

pub fn failure_turn_text(failure: &FailureReason) -> String {
    format!(
        "⚠️ Sorry, something went wrong: {}. Please try again.",
        failure.message()
    )
}

#[cfg(test)]
#[path = "tests/conversation_tests.rs"]
mod tests;
