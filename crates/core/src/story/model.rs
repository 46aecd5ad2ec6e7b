//! The story row and its field validation.

use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::FromRow;
use thiserror::Error;
use uuid::Uuid;

use super::comments::Comment;
use super::ratings::Rating;

/// A story as stored: scalar columns plus the embedded rating set and
/// comment tree (JSONB), plus the cached rating projection.
#[derive(Debug, Clone, FromRow)]
pub struct StoryRow {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub content: String,
    pub category: String,
    pub cover_image: String,
    pub tags: Vec<String>,
    pub is_published: bool,
    pub is_featured: bool,
    pub is_series: bool,
    pub series_name: Option<String>,
    pub ratings: Json<Vec<Rating>>,
    pub average_rating: f64,
    pub rating_count: i32,
    pub comments: Json<Vec<Comment>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoryFieldError {
    #[error("Missing required fields: title, description, content, category, or cover image URL.")]
    MissingRequired,
    #[error("Series Name is required if the story is part of a series.")]
    MissingSeriesName,
}

/// Check the always-required fields plus the conditional series name.
pub fn validate_story_fields(
    title: &str,
    description: &str,
    content: &str,
    category: &str,
    cover_image: &str,
    is_series: bool,
    series_name: Option<&str>,
) -> Result<(), StoryFieldError> {
    let required = [title, description, content, category, cover_image];
    if required.iter().any(|f| f.trim().is_empty()) {
        return Err(StoryFieldError::MissingRequired);
    }
    if is_series && series_name.map_or(true, |n| n.trim().is_empty()) {
        return Err(StoryFieldError::MissingSeriesName);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_complete_standalone_story() {
        assert!(validate_story_fields("t", "d", "c", "cat", "/img.png", false, None).is_ok());
    }

    #[test]
    fn rejects_blank_required_field() {
        assert_eq!(
            validate_story_fields("t", "  ", "c", "cat", "/img.png", false, None),
            Err(StoryFieldError::MissingRequired)
        );
    }

    #[test]
    fn series_requires_a_name() {
        assert_eq!(
            validate_story_fields("t", "d", "c", "cat", "/img.png", true, None),
            Err(StoryFieldError::MissingSeriesName)
        );
        assert_eq!(
            validate_story_fields("t", "d", "c", "cat", "/img.png", true, Some("  ")),
            Err(StoryFieldError::MissingSeriesName)
        );
        assert!(
            validate_story_fields("t", "d", "c", "cat", "/img.png", true, Some("Five Kingdoms"))
                .is_ok()
        );
    }
}
