//! Test data helpers for creating test objects
//!
//! Builds teloxide inbound types (messages, callback queries) through their
//! JSON wire format, which is far less brittle than constructing the nested
//! structs by hand.

use serde_json::json;
use teloxide::types::{CallbackQuery, Message};

/// Private-chat text message from a user
pub fn text_message(user_id: i64, username: Option<&str>, text: &str) -> Message {
    serde_json::from_value(json!({
        "message_id": 1,
        "date": 1640995200,
        "chat": private_chat(user_id),
        "from": user(user_id, username),
        "text": text
    }))
    .expect("valid message json")
}

/// Private-chat photo message with two resolutions
pub fn photo_message(user_id: i64, username: Option<&str>) -> Message {
    serde_json::from_value(json!({
        "message_id": 2,
        "date": 1640995200,
        "chat": private_chat(user_id),
        "from": user(user_id, username),
        "photo": [
            {"file_id": "photo-small", "file_unique_id": "ps", "width": 90, "height": 90, "file_size": 1000},
            {"file_id": "photo-large", "file_unique_id": "pl", "width": 800, "height": 800, "file_size": 9000}
        ]
    }))
    .expect("valid photo message json")
}

/// Private-chat document message
pub fn document_message(user_id: i64, username: Option<&str>) -> Message {
    serde_json::from_value(json!({
        "message_id": 3,
        "date": 1640995200,
        "chat": private_chat(user_id),
        "from": user(user_id, username),
        "document": {
            "file_id": "doc-file",
            "file_unique_id": "df",
            "file_name": "passport.pdf",
            "mime_type": "application/pdf",
            "file_size": 20000
        }
    }))
    .expect("valid document message json")
}

/// Callback query pressed on a message in a private chat
pub fn callback_query(user_id: i64, username: Option<&str>, data: &str) -> CallbackQuery {
    callback_query_in_chat(user_id, username, data, user_id, "private")
}

/// Callback query pressed on a message in an arbitrary chat
///
/// Used for review decisions, whose buttons live on a captioned message in
/// the moderator chat.
pub fn callback_query_in_chat(
    user_id: i64,
    username: Option<&str>,
    data: &str,
    chat_id: i64,
    chat_type: &str,
) -> CallbackQuery {
    let chat = if chat_type == "private" {
        private_chat(chat_id)
    } else {
        json!({"id": chat_id, "type": chat_type, "title": "Review chat"})
    };
    serde_json::from_value(json!({
        "id": "callback-1",
        "from": user(user_id, username),
        "chat_instance": "instance-1",
        "data": data,
        "message": {
            "message_id": 50,
            "date": 1640995200,
            "chat": chat,
            "from": {"id": 12345, "is_bot": true, "first_name": "TestBot", "username": "test_bot"},
            "caption": "📥 New verification request",
            "photo": [
                {"file_id": "photo-large", "file_unique_id": "pl", "width": 800, "height": 800, "file_size": 9000}
            ]
        }
    }))
    .expect("valid callback query json")
}

fn private_chat(id: i64) -> serde_json::Value {
    json!({"id": id, "type": "private", "first_name": "Test"})
}

fn user(id: i64, username: Option<&str>) -> serde_json::Value {
    json!({"id": id, "is_bot": false, "first_name": "Test", "username": username})
}
