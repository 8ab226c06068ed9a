//! Domain types using the Newtype pattern
//!
//! Items come off the wire as a loose JSON object (`WireItem`) and are
//! narrowed into the two variants this server understands. Everything the
//! caller sees is a projection built from those variants.

use serde::{Deserialize, Serialize};
use std::ops::Deref;
use strum::{AsRefStr, Display, EnumString};

use crate::text;

/// Hacker News item ID - assigned by the remote store, never by us
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(u64);

impl ItemId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn get(&self) -> u64 {
        self.0
    }
}

impl Deref for ItemId {
    type Target = u64;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl std::fmt::Display for ItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for ItemId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// Story feeds exposed by the upstream API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, AsRefStr, Serialize)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum Feed {
    Latest,
    Top,
    Best,
}

impl Feed {
    /// Resource name of the feed's ID list, relative to the API base URL
    pub fn resource(&self) -> &'static str {
        match self {
            Feed::Latest => "newstories.json",
            Feed::Top => "topstories.json",
            Feed::Best => "beststories.json",
        }
    }
}

/// Item as served by `/item/{id}.json`
///
/// Every field except `id` is optional upstream; deleted items carry little
/// more than an ID and a `deleted` flag.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WireItem {
    pub id: u64,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub by: Option<String>,
    pub time: Option<i64>,
    pub title: Option<String>,
    pub score: Option<u64>,
    pub url: Option<String>,
    pub text: Option<String>,
    #[serde(default)]
    pub kids: Vec<u64>,
    #[serde(default)]
    pub deleted: bool,
    #[serde(default)]
    pub dead: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Story {
    pub id: ItemId,
    pub title: String,
    pub author: String,
    pub created_at: i64,
    pub score: u64,
    pub url: Option<String>,
    pub body_text: Option<String>,
    pub child_ids: Vec<ItemId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub id: ItemId,
    pub author: String,
    pub created_at: i64,
    pub body_text: String,
    pub child_ids: Vec<ItemId>,
}

/// An item the server knows how to present
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Item {
    Story(Story),
    Comment(Comment),
}

impl Item {
    pub fn id(&self) -> ItemId {
        match self {
            Item::Story(story) => story.id,
            Item::Comment(comment) => comment.id,
        }
    }

    /// Narrow a wire item into a known variant.
    ///
    /// Jobs, polls, poll options, and deleted or dead items are dropped.
    pub fn from_wire(wire: WireItem) -> Option<Self> {
        if wire.id == 0 || wire.deleted || wire.dead {
            return None;
        }

        let id = ItemId::new(wire.id);
        let author = wire.by.unwrap_or_default();
        let created_at = wire.time.unwrap_or_default();
        let child_ids = wire.kids.into_iter().map(ItemId::new).collect();

        match wire.kind.as_deref() {
            Some("story") => Some(Item::Story(Story {
                id,
                title: wire.title.unwrap_or_default(),
                author,
                created_at,
                score: wire.score.unwrap_or_default(),
                url: wire.url.filter(|url| !url.is_empty()),
                body_text: wire.text.filter(|text| !text.is_empty()),
                child_ids,
            })),
            Some("comment") => Some(Item::Comment(Comment {
                id,
                author,
                created_at,
                body_text: wire.text.unwrap_or_default(),
                child_ids,
            })),
            _ => None,
        }
    }

    pub fn into_story(self) -> Option<Story> {
        match self {
            Item::Story(story) => Some(story),
            Item::Comment(_) => None,
        }
    }

    pub fn into_comment(self) -> Option<Comment> {
        match self {
            Item::Comment(comment) => Some(comment),
            Item::Story(_) => None,
        }
    }
}

/// Minimal per-story projection used by listings
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListingEntry {
    pub id: ItemId,
    pub title: String,
    pub author: String,
    pub created_at: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub score: u64,
    pub child_count: usize,
}

impl From<&Story> for ListingEntry {
    fn from(story: &Story) -> Self {
        Self {
            id: story.id,
            title: story.title.clone(),
            author: story.author.clone(),
            created_at: story.created_at,
            url: story.url.clone(),
            score: story.score,
            child_count: story.child_ids.len(),
        }
    }
}

/// Full story projection returned by `history`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoryDetail {
    #[serde(flatten)]
    pub entry: ListingEntry,
    /// Body text with markup removed; empty for link-only stories
    pub text: String,
}

impl From<&Story> for StoryDetail {
    fn from(story: &Story) -> Self {
        Self {
            entry: ListingEntry::from(story),
            text: story
                .body_text
                .as_deref()
                .map(text::clean_html)
                .unwrap_or_default(),
        }
    }
}

/// A direct reply to a story; deeper replies are only counted
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommentView {
    pub id: ItemId,
    pub author: String,
    pub created_at: i64,
    pub text: String,
    pub reply_count: usize,
}

impl From<&Comment> for CommentView {
    fn from(comment: &Comment) -> Self {
        Self {
            id: comment.id,
            author: comment.author.clone(),
            created_at: comment.created_at,
            text: text::clean_html(&comment.body_text),
            reply_count: comment.child_ids.len(),
        }
    }
}
