use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{
    deserialize_id, deserialize_nullable_string, deserialize_optional_id, deserialize_timestamp,
};

/// Sidebar bucket for a conversation, by age
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum TimeLabel {
    Today,
    Yesterday,
    ThisWeek,
    ThisMonth,
    Older,
}

impl TimeLabel {
    /// Bucket a timestamp by whole days elapsed before `now`.
    ///
    /// Timestamps in the future count as today.
    pub fn for_timestamp(timestamp: DateTime<Utc>, now: DateTime<Utc>) -> Self {
        let days = (now - timestamp).num_days();
        match days {
            d if d <= 0 => TimeLabel::Today,
            1 => TimeLabel::Yesterday,
            2..=7 => TimeLabel::ThisWeek,
            8..=30 => TimeLabel::ThisMonth,
            _ => TimeLabel::Older,
        }
    }

    /// Display label
    pub fn label(&self) -> &'static str {
        match self {
            TimeLabel::Today => "Today",
            TimeLabel::Yesterday => "Yesterday",
            TimeLabel::ThisWeek => "This week",
            TimeLabel::ThisMonth => "This month",
            TimeLabel::Older => "Older",
        }
    }
}

impl std::fmt::Display for TimeLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Represents a conversation from the backend API
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Conversation {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(default, deserialize_with = "deserialize_nullable_string")]
    pub title: String,
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub updated_at: DateTime<Utc>,
    #[serde(default, deserialize_with = "deserialize_optional_id")]
    pub user_id: Option<String>,
}

impl Conversation {
    /// Age bucket relative to `now`
    pub fn time_label(&self, now: DateTime<Utc>) -> TimeLabel {
        TimeLabel::for_timestamp(self.created_at, now)
    }

    /// Case-insensitive substring match on the title
    pub fn matches(&self, query: &str) -> bool {
        query.is_empty() || self.title.to_lowercase().contains(&query.to_lowercase())
    }
}

/// Response body of the list endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct ConversationList {
    #[serde(default)]
    pub conversations: Vec<Conversation>,
}

/// Response body of the create endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct CreatedConversation {
    #[serde(deserialize_with = "deserialize_id")]
    pub conversation_id: String,
    #[serde(default)]
    pub message: Option<String>,
}

/// Order conversations most recently updated first.
pub fn sort_by_recent(conversations: &mut [Conversation]) {
    conversations.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
}

/// Conversations whose title contains `query`, ignoring case.
pub fn filter_by_title<'a>(
    conversations: &'a [Conversation],
    query: &str,
) -> Vec<&'a Conversation> {
    conversations.iter().filter(|c| c.matches(query)).collect()
}

/// Group conversations by time label.
///
/// Groups appear in order of their first member and members keep their
/// relative order, so a list sorted by recency stays sorted inside each group.
pub fn group_by_time_label<'a, I>(
    conversations: I,
    now: DateTime<Utc>,
) -> Vec<(TimeLabel, Vec<&'a Conversation>)>
where
    I: IntoIterator<Item = &'a Conversation>,
{
    let mut groups: Vec<(TimeLabel, Vec<&'a Conversation>)> = Vec::new();
    for conversation in conversations {
        let label = conversation.time_label(now);
        match groups.iter_mut().find(|(l, _)| *l == label) {
            Some((_, members)) => members.push(conversation),
            None => groups.push((label, vec![conversation])),
        }
    }
    groups
}
