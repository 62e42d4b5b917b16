//! Chat transcript domain entities
//!
//! Mirrors the JSON produced by the chat-download utility. Every required
//! field is enforced by serde so a structurally invalid transcript fails fast.

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Unique identifier for a chat user
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for UserId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for UserId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Emote marker attached to a message fragment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Emoticon {
    pub emoticon_id: String,
}

/// A piece of a chat message, optionally tagged as an emote
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fragment {
    pub text: String,
    #[serde(default)]
    pub emoticon: Option<Emoticon>,
}

impl Fragment {
    pub fn is_emote(&self) -> bool {
        self.emoticon.is_some()
    }
}

/// A badge a user wears in chat, as `(set id, version)`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Badge {
    #[serde(rename = "_id")]
    pub id: String,
    pub version: String,
}

/// The message body of a comment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub body: String,
    #[serde(default)]
    pub bits_spent: Option<u32>,
    pub fragments: Vec<Fragment>,
    #[serde(default)]
    pub user_badges: Option<Vec<Badge>>,
}

impl ChatMessage {
    pub fn badges(&self) -> &[Badge] {
        self.user_badges.as_deref().unwrap_or_default()
    }
}

/// The author of a comment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Commenter {
    #[serde(rename = "_id")]
    pub id: UserId,
    pub display_name: String,
    pub logo: String,
}

/// A single chat comment. Processed exactly once, in arrival order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    #[serde(rename = "_id")]
    pub id: String,
    pub commenter: Commenter,
    pub message: ChatMessage,
}

impl Comment {
    pub fn user_id(&self) -> &UserId {
        &self.commenter.id
    }

    /// Message text as the fragments joined by single spaces, or the body
    /// when the transcript carries no fragments.
    pub fn text(&self) -> String {
        if self.message.fragments.is_empty() {
            return self.message.body.clone();
        }
        self.message
            .fragments
            .iter()
            .map(|fragment| fragment.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// A full, ordered chat transcript
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatLog {
    pub comments: Vec<Comment>,
}

impl ChatLog {
    /// Parse a transcript, failing on the first structural problem
    pub fn from_json(raw: &str) -> Result<Self, AppError> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn len(&self) -> usize {
        self.comments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.comments.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID: &str = r#"{
        "comments": [
            {
                "_id": "c1",
                "commenter": {"_id": "u1", "display_name": "Alice", "logo": "https://a/logo.png"},
                "message": {
                    "body": "hello Kappa",
                    "bits_spent": 100,
                    "fragments": [
                        {"text": "hello ", "emoticon": null},
                        {"text": "Kappa", "emoticon": {"emoticon_id": "25"}}
                    ],
                    "user_badges": [{"_id": "vip", "version": "1"}]
                }
            },
            {
                "_id": "c2",
                "commenter": {"_id": "u2", "display_name": "Bob", "logo": ""},
                "message": {"body": "hi", "fragments": [{"text": "hi"}]}
            }
        ]
    }"#;

    #[test]
    fn parses_full_transcript() {
        let log = ChatLog::from_json(VALID).unwrap();
        assert_eq!(log.len(), 2);

        let first = &log.comments[0];
        assert_eq!(first.user_id(), &UserId::from("u1"));
        assert_eq!(first.message.bits_spent, Some(100));
        assert!(first.message.fragments[1].is_emote());
        assert_eq!(first.message.badges()[0].id, "vip");

        let second = &log.comments[1];
        assert_eq!(second.message.bits_spent, None);
        assert!(second.message.badges().is_empty());
    }

    #[test]
    fn missing_required_field_fails_fast() {
        let raw = r#"{"comments": [{"_id": "c1", "message": {"body": "x", "fragments": []}}]}"#;
        let err = ChatLog::from_json(raw).unwrap_err();
        assert!(matches!(err, AppError::Parse(ref msg) if msg.contains("commenter")));
    }

    #[test]
    fn text_joins_fragments_with_spaces() {
        let log = ChatLog::from_json(VALID).unwrap();
        assert_eq!(log.comments[0].text(), "hello  Kappa");
    }

    #[test]
    fn text_falls_back_to_body_without_fragments() {
        let mut comment = ChatLog::from_json(VALID).unwrap().comments.remove(1);
        comment.message.fragments.clear();
        assert_eq!(comment.text(), "hi");
    }
}
