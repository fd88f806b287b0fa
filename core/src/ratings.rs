use crate::index::BookId;
use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rating {
    pub user_id: u32,
    pub book_id: BookId,
    pub rating: u8,
}

/// Counts per star score; bucket 0 holds 1-star ratings, bucket 4 holds 5-star ratings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RatingHistogram([u64; 5]);

impl RatingHistogram {
    pub fn record(&mut self, score: u8) -> Result<()> {
        match score {
            1..=5 => self.0[usize::from(score - 1)] += 1,
            _ => bail!("rating {score} outside 1..=5"),
        }
        Ok(())
    }

    /// Number of ratings with the given score, zero for scores outside 1..=5.
    pub fn count(&self, score: u8) -> u64 {
        match score {
            1..=5 => self.0[usize::from(score - 1)],
            _ => 0,
        }
    }

    pub fn buckets(&self) -> [u64; 5] { self.0 }

    pub fn total(&self) -> u64 { self.0.iter().sum() }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct RatingSummary {
    pub per_book: HashMap<BookId, RatingHistogram>,
    pub overall: RatingHistogram,
}

impl RatingSummary {
    /// Single pass over `ratings`. A score outside 1..=5 rejects the whole collection.
    pub fn from_ratings<'a, I>(ratings: I) -> Result<Self>
    where
        I: IntoIterator<Item = &'a Rating>,
    {
        let mut summary = Self::default();
        for r in ratings {
            summary.per_book.entry(r.book_id).or_default().record(r.rating)?;
            summary.overall.record(r.rating)?;
        }
        Ok(summary)
    }

    pub fn for_book(&self, id: BookId) -> Option<&RatingHistogram> { self.per_book.get(&id) }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn r(user_id: u32, book_id: BookId, rating: u8) -> Rating { Rating { user_id, book_id, rating } }

    #[test]
    fn aggregates_per_book_and_overall() {
        let ratings = vec![r(1, 10, 5), r(2, 10, 4), r(3, 10, 5), r(1, 11, 1)];
        let summary = RatingSummary::from_ratings(&ratings).unwrap();
        assert_eq!(summary.for_book(10).unwrap().buckets(), [0, 0, 0, 1, 2]);
        assert_eq!(summary.for_book(11).unwrap().count(1), 1);
        assert!(summary.for_book(12).is_none());
        assert_eq!(summary.overall.buckets(), [1, 0, 0, 1, 2]);
        assert_eq!(summary.overall.total(), 4);
    }

    #[test]
    fn rejects_out_of_range_scores() {
        assert!(RatingSummary::from_ratings(&[r(1, 1, 0)]).is_err());
        assert!(RatingSummary::from_ratings(&[r(1, 1, 6)]).is_err());
        assert_eq!(RatingHistogram::default().count(9), 0);
    }

    #[test]
    fn histogram_serializes_as_array() {
        let mut h = RatingHistogram::default();
        h.record(3).unwrap();
        assert_eq!(serde_json::to_string(&h).unwrap(), "[0,0,1,0,0]");
    }
}
