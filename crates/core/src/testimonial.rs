//! Reader testimonials: one per user, admin-moderated.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use thiserror::Error;
use uuid::Uuid;

pub const MAX_OPINION_LEN: usize = 500;
pub const DEFAULT_AUTHOR_TITLE: &str = "Verified Reader";
pub const DEFAULT_RATING: i16 = 5;

#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TestimonialRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub author_name: String,
    pub author_title: String,
    pub opinion: String,
    pub rating: i16,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum OpinionError {
    #[error("Opinion text is required.")]
    Empty,
    #[error("Opinion cannot exceed {MAX_OPINION_LEN} characters.")]
    TooLong,
}

/// Trim and bound-check the opinion text.
pub fn validate_opinion(opinion: &str) -> Result<String, OpinionError> {
    let trimmed = opinion.trim();
    if trimmed.is_empty() {
        return Err(OpinionError::Empty);
    }
    if trimmed.chars().count() > MAX_OPINION_LEN {
        return Err(OpinionError::TooLong);
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_and_accepts_normal_opinion() {
        assert_eq!(validate_opinion("  loved it  ").unwrap(), "loved it");
    }

    #[test]
    fn rejects_blank_opinion() {
        assert_eq!(validate_opinion("   "), Err(OpinionError::Empty));
    }

    #[test]
    fn rejects_opinion_over_limit() {
        let long = "x".repeat(MAX_OPINION_LEN + 1);
        assert_eq!(validate_opinion(&long), Err(OpinionError::TooLong));
        let exact = "x".repeat(MAX_OPINION_LEN);
        assert!(validate_opinion(&exact).is_ok());
    }
}
