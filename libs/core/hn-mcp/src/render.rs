//! Plain-text rendering of command output for the tool response

use std::fmt::Write;

use crate::dispatcher::CommandOutput;
use crate::text::format_timestamp;
use crate::types::{CommentView, ListingEntry, StoryDetail};

const RULE: &str = "------------------------------";

pub fn render(output: &CommandOutput) -> String {
    match output {
        CommandOutput::Listing { stories, .. } => render_listing(stories),
        CommandOutput::Story { story } => render_story(story),
        CommandOutput::Comments { story, comments } => render_comments(&story.title, comments),
        CommandOutput::NoComments { story } => format!(
            "No comments found for story \"{}\" (ID: {})",
            story.title, story.id
        ),
    }
}

fn render_listing(stories: &[ListingEntry]) -> String {
    if stories.is_empty() {
        return "No stories found.".to_string();
    }

    stories
        .iter()
        .enumerate()
        .map(|(index, story)| {
            format!(
                "{}. {}\n   ID: {}\n   By: {}\n   Posted: {}\n   Points: {}\n   Comments: {}\n   URL: {}\n   {RULE}",
                index + 1,
                story.title,
                story.id,
                story.author,
                format_timestamp(story.created_at),
                story.score,
                story.child_count,
                story.url.as_deref().unwrap_or("N/A"),
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn render_story(story: &StoryDetail) -> String {
    let entry = &story.entry;
    let mut out = format!(
        "Title: {}\nID: {}\nBy: {}\nPosted: {}\nPoints: {}\nComments: {}\nURL: {}",
        entry.title,
        entry.id,
        entry.author,
        format_timestamp(entry.created_at),
        entry.score,
        entry.child_count,
        entry.url.as_deref().unwrap_or("N/A"),
    );

    if !story.text.is_empty() {
        let _ = write!(out, "\n\nContent:\n{}", story.text);
    }
    out
}

fn render_comments(title: &str, comments: &[CommentView]) -> String {
    if comments.is_empty() {
        return "No comments found.".to_string();
    }

    let body = comments
        .iter()
        .enumerate()
        .map(|(index, comment)| {
            format!(
                "{}. Comment by {} at {}:\n   \"{}\"\n   {}\n   {RULE}",
                index + 1,
                comment.author,
                format_timestamp(comment.created_at),
                comment.text,
                replies_label(comment.reply_count),
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n");

    format!(
        "Comments for \"{}\" (Total: {}):\n\n{}",
        title,
        comments.len(),
        body
    )
}

fn replies_label(count: usize) -> String {
    match count {
        0 => "(no replies)".to_string(),
        1 => "(1 reply)".to_string(),
        n => format!("({n} replies)"),
    }
}
