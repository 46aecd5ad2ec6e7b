//! The embedded two-level comment tree.
//!
//! A story owns an ordered list of comments; each comment owns an ordered
//! list of replies. Replies cannot nest further, so every lookup is a
//! two-tier scan: top-level ids first, then every comment's reply list.
//! Whichever matches first decides whether an edit or delete targets a
//! comment or a reply.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// A one-level-deep reply, owned by its parent comment.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reply {
    pub id: Uuid,
    pub user_id: Uuid,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

/// A top-level comment embedded in a story.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: Uuid,
    pub user_id: Uuid,
    pub text: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub replies: Vec<Reply>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TreeError {
    #[error("Comment text is required.")]
    EmptyText,
    #[error("Parent comment not found.")]
    ParentNotFound,
    #[error("Comment not found.")]
    TargetNotFound,
    #[error("Comment not found or user is not the owner.")]
    NotOwner,
}

/// Where a target id lives in the tree.
#[derive(Debug, Clone, Copy)]
pub enum CommentTarget<'a> {
    TopLevel(&'a Comment),
    Nested { parent: &'a Comment, reply: &'a Reply },
}

#[derive(Debug, Clone, Copy)]
enum Location {
    Top(usize),
    Nested(usize, usize),
}

/// Two-tier scan: top-level comments first, then every reply list.
fn locate(comments: &[Comment], target_id: Uuid) -> Option<Location> {
    if let Some(i) = comments.iter().position(|c| c.id == target_id) {
        return Some(Location::Top(i));
    }
    for (i, comment) in comments.iter().enumerate() {
        if let Some(j) = comment.replies.iter().position(|r| r.id == target_id) {
            return Some(Location::Nested(i, j));
        }
    }
    None
}

/// Find a comment or reply by id, tagged with where it sits in the tree.
pub fn find_target(comments: &[Comment], target_id: Uuid) -> Option<CommentTarget<'_>> {
    match locate(comments, target_id)? {
        Location::Top(i) => Some(CommentTarget::TopLevel(&comments[i])),
        Location::Nested(i, j) => Some(CommentTarget::Nested {
            parent: &comments[i],
            reply: &comments[i].replies[j],
        }),
    }
}

fn normalize_text(text: &str) -> Result<String, TreeError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(TreeError::EmptyText);
    }
    Ok(trimmed.to_string())
}

/// Append a new top-level comment; returns the new comment's id.
pub fn push_comment(
    comments: &mut Vec<Comment>,
    author_id: Uuid,
    text: &str,
) -> Result<Uuid, TreeError> {
    let text = normalize_text(text)?;
    let id = Uuid::new_v4();
    comments.push(Comment {
        id,
        user_id: author_id,
        text,
        created_at: Utc::now(),
        replies: Vec::new(),
    });
    Ok(id)
}

/// Append a reply under the identified parent comment; returns the reply id.
pub fn push_reply(
    comments: &mut [Comment],
    parent_id: Uuid,
    author_id: Uuid,
    text: &str,
) -> Result<Uuid, TreeError> {
    let text = normalize_text(text)?;
    let parent = comments
        .iter_mut()
        .find(|c| c.id == parent_id)
        .ok_or(TreeError::ParentNotFound)?;
    let id = Uuid::new_v4();
    parent.replies.push(Reply {
        id,
        user_id: author_id,
        text,
        created_at: Utc::now(),
    });
    Ok(id)
}

/// Replace the text of the comment or reply matching `target_id`.
///
/// Only the stored author may edit. The tree is left untouched on any error.
pub fn edit_text(
    comments: &mut [Comment],
    target_id: Uuid,
    actor_id: Uuid,
    new_text: &str,
) -> Result<(), TreeError> {
    let new_text = normalize_text(new_text)?;
    match locate(comments, target_id).ok_or(TreeError::TargetNotFound)? {
        Location::Top(i) => {
            if comments[i].user_id != actor_id {
                return Err(TreeError::NotOwner);
            }
            comments[i].text = new_text;
        }
        Location::Nested(i, j) => {
            if comments[i].replies[j].user_id != actor_id {
                return Err(TreeError::NotOwner);
            }
            comments[i].replies[j].text = new_text;
        }
    }
    Ok(())
}

/// Remove the comment (with all its replies) or the reply matching `target_id`.
///
/// Same two-tier lookup and ownership gate as [`edit_text`].
pub fn remove(
    comments: &mut Vec<Comment>,
    target_id: Uuid,
    actor_id: Uuid,
) -> Result<(), TreeError> {
    match locate(comments, target_id).ok_or(TreeError::TargetNotFound)? {
        Location::Top(i) => {
            if comments[i].user_id != actor_id {
                return Err(TreeError::NotOwner);
            }
            comments.remove(i);
        }
        Location::Nested(i, j) => {
            if comments[i].replies[j].user_id != actor_id {
                return Err(TreeError::NotOwner);
            }
            comments[i].replies.remove(j);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree_with_reply() -> (Vec<Comment>, Uuid, Uuid, Uuid, Uuid) {
        let author_a = Uuid::new_v4();
        let author_b = Uuid::new_v4();
        let mut comments = Vec::new();
        let comment_id = push_comment(&mut comments, author_a, "nice").unwrap();
        let reply_id = push_reply(&mut comments, comment_id, author_b, "thanks").unwrap();
        (comments, author_a, author_b, comment_id, reply_id)
    }

    #[test]
    fn post_comment_then_reply() {
        let (comments, author_a, author_b, _, _) = tree_with_reply();
        assert_eq!(comments.len(), 1);
        assert_eq!(comments[0].user_id, author_a);
        assert_eq!(comments[0].text, "nice");
        assert_eq!(comments[0].replies.len(), 1);
        assert_eq!(comments[0].replies[0].user_id, author_b);
        assert_eq!(comments[0].replies[0].text, "thanks");
    }

    #[test]
    fn text_is_trimmed_and_must_be_non_empty() {
        let mut comments = Vec::new();
        let author = Uuid::new_v4();
        assert_eq!(
            push_comment(&mut comments, author, "   "),
            Err(TreeError::EmptyText)
        );
        assert!(comments.is_empty());
        push_comment(&mut comments, author, "  hello  ").unwrap();
        assert_eq!(comments[0].text, "hello");
    }

    #[test]
    fn reply_to_missing_parent_leaves_tree_unchanged() {
        let (mut comments, _, author_b, _, _) = tree_with_reply();
        let before = comments.clone();
        assert_eq!(
            push_reply(&mut comments, Uuid::new_v4(), author_b, "hi"),
            Err(TreeError::ParentNotFound)
        );
        assert_eq!(comments.len(), before.len());
        assert_eq!(comments[0].replies.len(), before[0].replies.len());
    }

    #[test]
    fn find_target_tags_top_level_and_nested() {
        let (comments, _, _, comment_id, reply_id) = tree_with_reply();
        assert!(matches!(
            find_target(&comments, comment_id),
            Some(CommentTarget::TopLevel(c)) if c.id == comment_id
        ));
        assert!(matches!(
            find_target(&comments, reply_id),
            Some(CommentTarget::Nested { parent, reply })
                if parent.id == comment_id && reply.id == reply_id
        ));
        assert!(find_target(&comments, Uuid::new_v4()).is_none());
    }

    #[test]
    fn author_can_edit_own_reply() {
        let (mut comments, _, author_b, _, reply_id) = tree_with_reply();
        edit_text(&mut comments, reply_id, author_b, "thanks!").unwrap();
        assert_eq!(comments[0].replies[0].text, "thanks!");
    }

    #[test]
    fn non_owner_edit_is_rejected_and_tree_unchanged() {
        let (mut comments, author_a, _, _, reply_id) = tree_with_reply();
        assert_eq!(
            edit_text(&mut comments, reply_id, author_a, "x"),
            Err(TreeError::NotOwner)
        );
        assert_eq!(comments[0].replies[0].text, "thanks");
    }

    #[test]
    fn edit_unknown_id_is_not_found() {
        let (mut comments, author_a, _, _, _) = tree_with_reply();
        assert_eq!(
            edit_text(&mut comments, Uuid::new_v4(), author_a, "x"),
            Err(TreeError::TargetNotFound)
        );
    }

    #[test]
    fn deleting_comment_removes_its_replies() {
        let (mut comments, author_a, _, comment_id, reply_id) = tree_with_reply();
        remove(&mut comments, comment_id, author_a).unwrap();
        assert!(comments.is_empty());
        assert!(find_target(&comments, reply_id).is_none());
    }

    #[test]
    fn deleting_reply_keeps_parent_comment() {
        let (mut comments, _, author_b, comment_id, reply_id) = tree_with_reply();
        remove(&mut comments, reply_id, author_b).unwrap();
        assert_eq!(comments.len(), 1);
        assert_eq!(comments[0].id, comment_id);
        assert!(comments[0].replies.is_empty());
    }

    #[test]
    fn non_owner_delete_is_rejected() {
        let (mut comments, _, author_b, comment_id, _) = tree_with_reply();
        assert_eq!(
            remove(&mut comments, comment_id, author_b),
            Err(TreeError::NotOwner)
        );
        assert_eq!(comments.len(), 1);
    }

    #[test]
    fn serde_shape_is_camel_case() {
        let (comments, _, _, _, _) = tree_with_reply();
        let value = serde_json::to_value(&comments).unwrap();
        let first = &value[0];
        assert!(first.get("userId").is_some());
        assert!(first.get("createdAt").is_some());
        assert!(first["replies"][0].get("userId").is_some());
    }
}
