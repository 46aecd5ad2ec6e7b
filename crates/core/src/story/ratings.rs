//! Per-user star ratings and the cached average/count projection.
//!
//! The rating set is an upsert keyed on user id: rating twice replaces the
//! earlier score, it never accumulates. The summary is always recomputed
//! from the full set rather than adjusted incrementally, so the cached
//! projection cannot drift from the ratings it is derived from.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

pub const MIN_SCORE: u8 = 1;
pub const MAX_SCORE: u8 = 5;

/// A single user's rating of a story.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rating {
    pub user_id: Uuid,
    pub rating: u8,
}

/// The cached projection stored alongside the rating set.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingSummary {
    pub average_rating: f64,
    pub rating_count: u32,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RatingError {
    #[error("Rating must be between {MIN_SCORE} and {MAX_SCORE}.")]
    OutOfRange,
}

pub fn validate_score(score: u8) -> Result<(), RatingError> {
    if (MIN_SCORE..=MAX_SCORE).contains(&score) {
        Ok(())
    } else {
        Err(RatingError::OutOfRange)
    }
}

/// Average rounded to one decimal, count taken from the set itself.
/// An empty set summarizes to zero.
pub fn summarize(ratings: &[Rating]) -> RatingSummary {
    let count = ratings.len() as u32;
    let average = if count == 0 {
        0.0
    } else {
        let sum: u32 = ratings.iter().map(|r| u32::from(r.rating)).sum();
        round_one_decimal(f64::from(sum) / f64::from(count))
    };
    RatingSummary {
        average_rating: average,
        rating_count: count,
    }
}

/// Upsert `score` for `user_id` and return the refreshed summary.
pub fn apply(
    ratings: &mut Vec<Rating>,
    user_id: Uuid,
    score: u8,
) -> Result<RatingSummary, RatingError> {
    validate_score(score)?;
    match ratings.iter_mut().find(|r| r.user_id == user_id) {
        Some(existing) => existing.rating = score,
        None => ratings.push(Rating {
            user_id,
            rating: score,
        }),
    }
    Ok(summarize(ratings))
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_rating_creates_entry() {
        let mut ratings = Vec::new();
        let summary = apply(&mut ratings, Uuid::new_v4(), 4).unwrap();
        assert_eq!(summary.rating_count, 1);
        assert_eq!(summary.average_rating, 4.0);
    }

    #[test]
    fn re_rating_replaces_instead_of_accumulating() {
        let mut ratings = Vec::new();
        let user = Uuid::new_v4();
        apply(&mut ratings, user, 4).unwrap();
        let summary = apply(&mut ratings, user, 2).unwrap();
        assert_eq!(summary.rating_count, 1);
        assert_eq!(summary.average_rating, 2.0);
        assert_eq!(ratings.len(), 1);
    }

    #[test]
    fn distinct_users_average_together() {
        let mut ratings = Vec::new();
        apply(&mut ratings, Uuid::new_v4(), 5).unwrap();
        let summary = apply(&mut ratings, Uuid::new_v4(), 3).unwrap();
        assert_eq!(summary.rating_count, 2);
        assert_eq!(summary.average_rating, 4.0);
    }

    #[test]
    fn average_rounds_to_one_decimal() {
        let mut ratings = Vec::new();
        apply(&mut ratings, Uuid::new_v4(), 5).unwrap();
        apply(&mut ratings, Uuid::new_v4(), 4).unwrap();
        let summary = apply(&mut ratings, Uuid::new_v4(), 4).unwrap();
        // 13 / 3 = 4.333... -> 4.3
        assert_eq!(summary.average_rating, 4.3);
        assert_eq!(summary.rating_count, 3);
    }

    #[test]
    fn count_never_exceeds_distinct_users() {
        let mut ratings = Vec::new();
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        for score in 1..=5 {
            apply(&mut ratings, a, score).unwrap();
            apply(&mut ratings, b, 6 - score).unwrap();
        }
        let summary = summarize(&ratings);
        assert_eq!(summary.rating_count, 2);
        // Latest per user: a=5, b=1.
        assert_eq!(summary.average_rating, 3.0);
    }

    #[test]
    fn out_of_range_scores_are_rejected() {
        let mut ratings = Vec::new();
        assert_eq!(apply(&mut ratings, Uuid::new_v4(), 0), Err(RatingError::OutOfRange));
        assert_eq!(apply(&mut ratings, Uuid::new_v4(), 6), Err(RatingError::OutOfRange));
        assert!(ratings.is_empty());
    }

    #[test]
    fn empty_set_summarizes_to_zero() {
        let summary = summarize(&[]);
        assert_eq!(summary.average_rating, 0.0);
        assert_eq!(summary.rating_count, 0);
    }
}
