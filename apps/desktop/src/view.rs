//! Plain-text rendering of workflow state for the terminal.

use client_core::{conversation::SUGGESTED_PROMPTS, Conversation, HazardSubmission, Outcome, RouteQuery};
use shared::domain::{Speaker, Turn};

pub fn render_route(query: &RouteQuery) -> String {
    let header = format!("{} → {}", query.origin(), query.destination());
    match query.outcome() {
        Outcome::Empty => header,
        Outcome::Ready(advice) => format!("🚌 Route Results\n{header}\n\n{advice}"),
        Outcome::Failed(message) => format!("⚠️ {message}"),
    }
}

pub fn render_hazard(hazard: &HazardSubmission) -> String {
    let mut lines = Vec::new();
    if let Some(asset) = hazard.asset() {
        lines.push(format!(
            "{} ({}, {} bytes)",
            asset.file_name(),
            asset.content_type(),
            asset.bytes().len()
        ));
    }
    if let Some(preview) = hazard.preview() {
        lines.push(format!("preview {}x{}", preview.width, preview.height));
    }
    match hazard.outcome() {
        Outcome::Empty => {}
        Outcome::Ready(analysis) => lines.push(format!("\n{analysis}")),
        Outcome::Failed(message) => lines.push(format!("⚠️ {message}")),
    }
    lines.join("\n")
}

pub fn render_turn(turn: &Turn) -> String {
    let who = match turn.speaker() {
        Speaker::User => "You",
        Speaker::Assistant => "SafaRi AI",
    };
    format!("[{}] {who}: {}", turn.created_at().format("%H:%M"), turn.text())
}

pub fn render_chat_banner(chat: &Conversation) -> String {
    let mut lines = vec![format!("SafaRi AI Chat ({})", chat.status_line())];
    lines.push("Try one of these with /suggest N:".to_string());
    for (index, prompt) in SUGGESTED_PROMPTS.iter().enumerate() {
        lines.push(format!("  {}. {prompt}", index + 1));
    }
    lines.push("/clear wipes the conversation, /quit leaves.".to_string());
    lines.join("\n")
}
