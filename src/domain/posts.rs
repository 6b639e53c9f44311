mod data;

use std::cmp::Reverse;
use std::collections::BTreeSet;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use time::{
    Date, OffsetDateTime, PrimitiveDateTime, UtcOffset,
    format_description::{BorrowedFormatItem, well_known::Rfc3339},
    macros::format_description,
};

use super::error::DomainError;

pub use data::default_posts;

pub const ISO_DATE_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day]");
const DATE_TIME_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]");
const DATE_MINUTE_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]");
pub const HUMAN_DATE_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[month repr:long] [day padding:none], [year]");

pub type PostId = u64;

/// A single blog entry as it is persisted under the `posts` key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: PostId,
    pub title: String,
    pub date: String,
    #[serde(default, with = "empty_string_as_none")]
    pub video: Option<String>,
    pub excerpt: String,
    pub content: String,
}

impl Post {
    /// When the post was published, if `date` parses as an ISO date or date-time.
    pub fn published_at(&self) -> Option<PrimitiveDateTime> {
        parse_post_date(&self.date)
    }

    /// Paragraphs of the body, one per line.
    pub fn paragraphs(&self) -> impl Iterator<Item = &str> {
        self.content.split('\n')
    }
}

/// Identifiers of posts shown in the archive view.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PinSet(BTreeSet<PostId>);

impl PinSet {
    pub fn contains(&self, id: PostId) -> bool {
        self.0.contains(&id)
    }

    /// Returns `false` when the id was already pinned.
    pub fn insert(&mut self, id: PostId) -> bool {
        self.0.insert(id)
    }

    /// Returns `false` when the id was not pinned.
    pub fn remove(&mut self, id: PostId) -> bool {
        self.0.remove(&id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<PostId> for PinSet {
    fn from_iter<I: IntoIterator<Item = PostId>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Next free identifier: one past the largest id, or `1` for an empty store.
pub fn next_post_id(posts: &[Post]) -> Result<PostId, DomainError> {
    match posts.iter().map(|post| post.id).max() {
        None => Ok(1),
        Some(max) => max
            .checked_add(1)
            .ok_or_else(|| DomainError::invariant("post id space exhausted")),
    }
}

/// Newest first. The sort is stable, so posts sharing a date keep their
/// stored order; posts whose date does not parse sink to the end.
pub fn sort_newest_first(posts: &mut [Post]) {
    posts.sort_by_key(|post| Reverse(post.published_at()));
}

/// Accepts `YYYY-MM-DD`, `YYYY-MM-DDTHH:MM[:SS]`, and RFC 3339 timestamps
/// (normalized to UTC). A bare date counts as midnight.
pub fn parse_post_date(raw: &str) -> Option<PrimitiveDateTime> {
    let raw = raw.trim();
    if let Ok(at) = OffsetDateTime::parse(raw, &Rfc3339) {
        let utc = at.to_offset(UtcOffset::UTC);
        return Some(PrimitiveDateTime::new(utc.date(), utc.time()));
    }

    [DATE_TIME_FORMAT, DATE_MINUTE_FORMAT]
        .into_iter()
        .find_map(|format| PrimitiveDateTime::parse(raw, format).ok())
        .or_else(|| Date::parse(raw, ISO_DATE_FORMAT).ok().map(Date::midnight))
}

pub fn format_human_date(raw: &str) -> String {
    parse_post_date(raw)
        .and_then(|at| at.date().format(HUMAN_DATE_FORMAT).ok())
        .unwrap_or_else(|| raw.to_string())
}

/// The stored shape keeps an empty string for "no video".
mod empty_string_as_none {
    use super::*;

    pub fn serialize<S>(value: &Option<String>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(value.as_deref().unwrap_or_default())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.filter(|value| !value.trim().is_empty()))
    }
}
