//! Command parsing and execution
//!
//! A request is a command name plus one optional positional parameter of the
//! form `--<number>`. Parsing is pure and happens before any network call, so
//! caller mistakes fail fast. Execution then runs one of three pipelines:
//!
//! ```text
//! latest|top|best  feed IDs -> dedupe -> take(count) -> fan-out -> stories -> session.replace
//! history          item(id) -> detail
//! comments         session.resolve(n) or literal id -> item -> fan-out(kids)
//! ```

use serde::Serialize;
use std::collections::HashSet;
use std::str::FromStr;
use std::sync::Arc;
use strum::{AsRefStr, Display, EnumString};
use tracing::{debug, info, instrument};

use crate::error::{Error, Result};
use crate::fetcher::fetch_many;
use crate::session::SessionState;
use crate::store::ItemStore;
use crate::types::{CommentView, Feed, Item, ItemId, ListingEntry, Story, StoryDetail};

/// Listing size when no usable count is given
pub const DEFAULT_LISTING_COUNT: usize = 10;

/// Upper bound on listing size, and so on listing fan-out width
pub const MAX_LISTING_COUNT: usize = 50;

/// Prefix every numeric parameter carries, e.g. `--10`
pub const PARAM_MARKER: &str = "--";

const HISTORY_USAGE: &str = "history --12345678";
const COMMENTS_USAGE: &str = "comments --3 or comments --12345678";

/// Recognized command names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, AsRefStr)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum CommandName {
    Latest,
    Top,
    Best,
    History,
    Comments,
}

/// A validated command, ready to execute
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Story listing of a feed, `count` already within `1..=MAX_LISTING_COUNT`
    Listing { feed: Feed, count: usize },
    /// Full detail of one story by absolute ID
    History { id: ItemId },
    /// Direct comments of a story; `target` is a listing position or a story ID
    Comments { target: u64 },
}

impl Command {
    /// Validate a raw command name and parameter.
    ///
    /// Listing commands ignore unusable counts and fall back to
    /// [`DEFAULT_LISTING_COUNT`]. `history` reports a missing parameter
    /// separately from a malformed one; `comments` reports both as missing.
    pub fn parse(command: &str, param: Option<&str>) -> Result<Self> {
        let name =
            CommandName::from_str(command.trim()).map_err(|_| Error::UnknownCommand {
                command: command.trim().to_lowercase(),
            })?;
        let param = param.map(str::trim).filter(|p| !p.is_empty());

        match name {
            CommandName::Latest => Ok(Self::listing(Feed::Latest, param)),
            CommandName::Top => Ok(Self::listing(Feed::Top, param)),
            CommandName::Best => Ok(Self::listing(Feed::Best, param)),
            CommandName::History => {
                let raw = param.ok_or(Error::MissingParameter {
                    command: "history",
                    usage: HISTORY_USAGE,
                })?;
                let id = parse_marked_number(raw).ok_or_else(|| Error::InvalidParameter {
                    command: "history",
                    value: raw.to_string(),
                    usage: HISTORY_USAGE,
                })?;
                Ok(Command::History { id: ItemId::new(id) })
            }
            CommandName::Comments => {
                let target = param.and_then(parse_marked_number).ok_or(
                    Error::MissingParameter {
                        command: "comments",
                        usage: COMMENTS_USAGE,
                    },
                )?;
                Ok(Command::Comments { target })
            }
        }
    }

    fn listing(feed: Feed, param: Option<&str>) -> Self {
        let count = param
            .and_then(parse_marked_number)
            .and_then(|n| usize::try_from(n).ok())
            .filter(|n| (1..=MAX_LISTING_COUNT).contains(n))
            .unwrap_or(DEFAULT_LISTING_COUNT);
        Command::Listing { feed, count }
    }
}

/// Strip the `--` marker and parse a positive integer
fn parse_marked_number(param: &str) -> Option<u64> {
    param
        .strip_prefix(PARAM_MARKER)?
        .trim()
        .parse::<u64>()
        .ok()
        .filter(|n| *n > 0)
}

/// How a `comments` parameter was interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoryRef {
    /// 1-based position in the current session listing
    ListingPosition { position: u64, id: ItemId },
    /// The number itself is the story ID
    Literal(ItemId),
}

impl StoryRef {
    pub fn id(&self) -> ItemId {
        match self {
            StoryRef::ListingPosition { id, .. } => *id,
            StoryRef::Literal(id) => *id,
        }
    }
}

/// Structured result of a command, handed to the renderer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CommandOutput {
    Listing {
        feed: Feed,
        stories: Vec<ListingEntry>,
    },
    Story {
        story: StoryDetail,
    },
    Comments {
        story: ListingEntry,
        comments: Vec<CommentView>,
    },
    /// The story exists but has no comments; not an error
    NoComments {
        story: ListingEntry,
    },
}

/// Executes commands against an item store and the session listing
pub struct Dispatcher<S: ?Sized> {
    store: Arc<S>,
    session: Arc<SessionState>,
}

impl<S> Dispatcher<S>
where
    S: ItemStore + ?Sized,
{
    pub fn new(store: Arc<S>, session: Arc<SessionState>) -> Self {
        Self { store, session }
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    /// Parse and execute one request
    pub async fn dispatch(&self, command: &str, param: Option<&str>) -> Result<CommandOutput> {
        let command = Command::parse(command, param)?;
        self.execute(command).await
    }

    pub async fn execute(&self, command: Command) -> Result<CommandOutput> {
        match command {
            Command::Listing { feed, count } => self.listing(feed, count).await,
            Command::History { id } => self.history(id).await,
            Command::Comments { target } => self.comments(target).await,
        }
    }

    /// Resolve a `comments` parameter.
    ///
    /// Listing position wins whenever `target` is within the current listing;
    /// only otherwise is it taken as a literal story ID. Small story IDs are
    /// therefore unreachable by number while a listing of that size exists.
    pub fn resolve_story(&self, target: u64) -> StoryRef {
        match self.session.resolve(target) {
            Some(id) => StoryRef::ListingPosition {
                position: target,
                id,
            },
            None => StoryRef::Literal(ItemId::new(target)),
        }
    }

    #[instrument(skip(self))]
    async fn listing(&self, feed: Feed, count: usize) -> Result<CommandOutput> {
        let ids = self.store.fetch_feed_ids(feed).await;

        // Feeds can repeat an ID; keep the first occurrence
        let mut seen = HashSet::new();
        let wanted: Vec<ItemId> = ids
            .into_iter()
            .filter(|id| seen.insert(*id))
            .take(count)
            .collect();

        let stories: Vec<ListingEntry> = fetch_many(self.store.as_ref(), &wanted)
            .await
            .into_iter()
            .filter_map(Item::into_story)
            .map(|story| ListingEntry::from(&story))
            .collect();

        info!(requested = count, returned = stories.len(), "Listing built");
        self.session.replace(stories.clone());

        Ok(CommandOutput::Listing { feed, stories })
    }

    #[instrument(skip(self))]
    async fn history(&self, id: ItemId) -> Result<CommandOutput> {
        let story = self.fetch_story(id).await?;
        Ok(CommandOutput::Story {
            story: StoryDetail::from(&story),
        })
    }

    #[instrument(skip(self))]
    async fn comments(&self, target: u64) -> Result<CommandOutput> {
        let story_ref = self.resolve_story(target);
        debug!(?story_ref, "Resolved comments target");

        let story = self.fetch_story(story_ref.id()).await?;
        let entry = ListingEntry::from(&story);

        if story.child_ids.is_empty() {
            return Ok(CommandOutput::NoComments { story: entry });
        }

        let comments: Vec<CommentView> = fetch_many(self.store.as_ref(), &story.child_ids)
            .await
            .into_iter()
            .filter_map(Item::into_comment)
            .map(|comment| CommentView::from(&comment))
            .collect();

        info!(
            story_id = %story.id,
            children = story.child_ids.len(),
            returned = comments.len(),
            "Comments fetched"
        );
        Ok(CommandOutput::Comments {
            story: entry,
            comments,
        })
    }

    async fn fetch_story(&self, id: ItemId) -> Result<Story> {
        self.store
            .fetch_item(id)
            .await
            .and_then(Item::into_story)
            .ok_or(Error::NotFound { id })
    }
}
