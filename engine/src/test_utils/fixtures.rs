//! Test fixtures
//!
//! Factory functions for creating test data with sensible defaults.
//! Each fixture function creates a valid entity that can be customized.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::domain::entities::{
    Badge, ChatLog, ChatMessage, Comment, Commenter, Fragment, LeaderboardExportItem,
    MetadataValue, UserId, UserPerformance,
};

static NEXT_COMMENT_ID: AtomicU64 = AtomicU64::new(1);

fn next_comment_id() -> String {
    format!("comment-{}", NEXT_COMMENT_ID.fetch_add(1, Ordering::Relaxed))
}

/// Create a plain comment whose single fragment is `body`
pub fn test_comment(user: &str, body: &str) -> Comment {
    Comment {
        id: next_comment_id(),
        commenter: Commenter {
            id: UserId::from(user),
            display_name: user.to_string(),
            logo: format!("https://img/{}.png", user),
        },
        message: ChatMessage {
            body: body.to_string(),
            bits_spent: None,
            fragments: vec![Fragment {
                text: body.to_string(),
                emoticon: None,
            }],
            user_badges: None,
        },
    }
}

/// Create a comment that spent bits
pub fn test_comment_with_bits(user: &str, body: &str, bits: u32) -> Comment {
    let mut comment = test_comment(user, body);
    comment.message.bits_spent = Some(bits);
    comment
}

/// Create a comment from explicit fragments; the body is their concatenation
pub fn test_comment_with_fragments(user: &str, fragments: Vec<Fragment>) -> Comment {
    let mut comment = test_comment(user, "");
    comment.message.body = fragments.iter().map(|f| f.text.as_str()).collect();
    comment.message.fragments = fragments;
    comment
}

/// Create a comment from a user wearing `(set id, version)` badges
pub fn test_comment_with_badges(user: &str, badges: &[(&str, &str)]) -> Comment {
    let mut comment = test_comment(user, "hello");
    comment.message.user_badges = Some(
        badges
            .iter()
            .map(|(id, version)| Badge {
                id: id.to_string(),
                version: version.to_string(),
            })
            .collect(),
    );
    comment
}

pub fn test_chat_log(comments: Vec<Comment>) -> ChatLog {
    ChatLog { comments }
}

/// Create a performance with the given metric scores and default metadata
pub fn test_performance(user: &str, metrics: &[(&str, f64)]) -> UserPerformance {
    UserPerformance {
        id: UserId::from(user),
        username: user.to_string(),
        avatar: format!("https://img/{}.png", user),
        metrics: metrics
            .iter()
            .map(|(name, score)| (name.to_string(), *score))
            .collect(),
        metadata: BTreeMap::from([
            ("special_role".to_string(), MetadataValue::Flag(false)),
            ("badges".to_string(), MetadataValue::Badges(Vec::new())),
        ]),
    }
}

/// Create a saved leaderboard row
pub fn test_export_item(user: &str, rank: u32, elo: f64) -> LeaderboardExportItem {
    LeaderboardExportItem {
        id: UserId::from(user),
        rank,
        elo,
        username: user.to_string(),
        delta: 0,
        avatar: format!("https://img/{}.png", user),
        badges: Some(Vec::new()),
    }
}
