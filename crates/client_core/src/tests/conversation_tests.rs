use super::*;
use crate::test_support::ScriptedTransport;
use serde_json::json;
use shared::{domain::Speaker, protocol::WireRole};

fn reply(text: &str) -> Result<serde_json::Value, FailureReason> {
    Ok(json!({ "response": text }))
}

#[tokio::test]
async fn hi_then_bye_sends_prior_exchange_as_history() {
    let transport = ScriptedTransport::new().reply(reply("Hello")).reply(reply("Kwaheri"));
    let mut chat = Conversation::new();

    assert!(chat.send_with(&transport, "Hi").await);
    assert_eq!(chat.turns(), &[Turn::user("Hi"), Turn::assistant("Hello")]);

    assert!(chat.send_with(&transport, "Bye").await);
    assert_eq!(chat.turns().len(), 4);

    let bodies = transport.json_bodies();
    assert_eq!(bodies[0], json!({ "message": "Hi", "history": [] }));
    assert_eq!(
        bodies[1],
        json!({
            "message": "Bye",
            "history": [
                { "role": "user", "text": "Hi" },
                { "role": "model", "text": "Hello" }
            ]
        })
    );
}

#[tokio::test]
async fn successful_exchanges_alternate_speakers_starting_with_user() {
    let mut transport = ScriptedTransport::new();
    for n in 0..5 {
        transport = transport.reply(reply(&format!("answer {n}")));
    }
    let mut chat = Conversation::new();

    for n in 0..5 {
        assert!(chat.send_with(&transport, &format!("question {n}")).await);
    }

    assert_eq!(chat.turns().len(), 10);
    for (index, turn) in chat.turns().iter().enumerate() {
        let expected = if index % 2 == 0 {
            Speaker::User
        } else {
            Speaker::Assistant
        };
        assert_eq!(turn.speaker(), expected, "turn {index}");
    }

    for (k, body) in transport.json_bodies().iter().enumerate() {
        let history = body["history"].as_array().expect("history array");
        assert_eq!(history.len(), 2 * k, "history of submission {}", k + 1);
        assert_eq!(body["message"], json!(format!("question {k}")));
        assert!(history
            .iter()
            .all(|entry| entry["text"] != json!(format!("question {k}"))));
    }
}

#[test]
fn submit_while_sending_is_a_no_op() {
    let mut chat = Conversation::new();
    let first = chat.submit("Habari").expect("first submit accepted");
    assert!(first.history.is_empty());
    assert!(chat.is_sending());
    assert_eq!(chat.status_line(), TYPING_STATUS);

    let before = chat.clone();
    chat.set_input("second thought");
    assert!(chat.submit("second thought").is_none());
    assert!(chat.submit_input().is_none());
    assert_eq!(chat.turns(), before.turns());
    assert_eq!(chat.input(), "second thought");
}

#[test]
fn blank_text_is_rejected_and_text_is_trimmed() {
    let mut chat = Conversation::new();
    assert!(chat.submit("   \n\t").is_none());
    assert!(chat.turns().is_empty());
    assert_eq!(chat.phase(), ChatPhase::Idle);

    let request = chat.submit("  Ni matatu gani?  ").expect("accepted");
    assert_eq!(request.message, "Ni matatu gani?");
    assert_eq!(chat.turns()[0].text(), "Ni matatu gani?");
}

#[tokio::test]
async fn failure_is_rendered_inline_as_assistant_turn() {
    let transport = ScriptedTransport::new().reply(Err(FailureReason::server(500, "quota exhausted")));
    let mut chat = Conversation::new();

    assert!(chat.send_with(&transport, "Is Thika Road busy?").await);

    let last = chat.turns().last().expect("assistant turn");
    assert_eq!(last.speaker(), Speaker::Assistant);
    assert_eq!(
        last.text(),
        "⚠️ Sorry, something went wrong: quota exhausted. Please try again."
    );
    assert_eq!(chat.phase(), ChatPhase::Idle);
}

#[tokio::test]
async fn failed_turn_is_part_of_the_next_history() {
    let transport = ScriptedTransport::new()
        .reply(Err(FailureReason::network("Failed to send message")))
        .reply(reply("Sawa"));
    let mut chat = Conversation::new();

    chat.send_with(&transport, "one").await;
    chat.send_with(&transport, "two").await;

    let history = &transport.json_bodies()[1]["history"];
    assert_eq!(history[1]["role"], json!("model"));
    assert_eq!(
        history[1]["text"],
        json!("⚠️ Sorry, something went wrong: Failed to send message. Please try again.")
    );
}

#[test]
fn clear_is_refused_while_sending() {
    let mut chat = Conversation::new();
    chat.submit("Westlands to CBD").expect("accepted");
    assert!(!chat.clear());
    assert_eq!(chat.turns().len(), 1);

    chat.complete(Ok(ChatResponse {
        response: "Take route 23".to_string(),
    }));
    chat.set_input("draft");
    assert!(chat.clear());
    assert!(chat.turns().is_empty());
    assert_eq!(chat.input(), "");
    assert_eq!(chat, Conversation::new());
}

#[test]
fn completion_without_outstanding_request_is_ignored() {
    let mut chat = Conversation::new();
    chat.complete(Ok(ChatResponse {
        response: "stray".to_string(),
    }));
    assert!(chat.turns().is_empty());
}

#[test]
fn submit_input_consumes_the_draft() {
    let mut chat = Conversation::new();
    assert!(chat.use_suggestion(2));
    assert_eq!(chat.input(), SUGGESTED_PROMPTS[2]);
    assert!(!chat.use_suggestion(SUGGESTED_PROMPTS.len()));

    let request = chat.submit_input().expect("accepted");
    assert_eq!(request.message, "Ni matatu gani ya kwenda JKIA?");
    assert_eq!(chat.input(), "");
}

#[test]
fn history_payload_maps_speakers_to_wire_roles() {
    let mut chat = Conversation::new();
    chat.submit("مرحبا").expect("accepted");
    chat.complete(Ok(ChatResponse {
        response: "Hello".to_string(),
    }));

    let history = chat.history_payload();
    assert_eq!(history[0].role, WireRole::User);
    assert_eq!(history[0].text, "مرحبا");
    assert_eq!(history[1].role, WireRole::Model);
}
