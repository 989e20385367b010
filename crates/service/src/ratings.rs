//! Rating aggregation over `review` rows: mean to one decimal plus a 1-5
//! distribution. Zero rows is a valid input, not an error.

use std::collections::BTreeMap;

use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QuerySelect};
use serde::Serialize;
use tracing::warn;
use uuid::Uuid;

use crate::errors::ServiceError;
use models::review;

/// Whose ratings to aggregate.
#[derive(Debug, Clone, Copy)]
pub enum RatingTarget {
    Shop(Uuid),
    Driver(Uuid),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingSummary {
    pub average_rating: f64,
    pub total_reviews: u64,
    pub rating_distribution: BTreeMap<u8, u64>,
}

impl RatingSummary {
    /// Fold raw rating values into a summary. Rows outside 1..=5 are a
    /// data-integrity violation: they are skipped (logged at warn) and count
    /// toward neither the distribution nor the average.
    pub fn from_rows(rows: &[i32]) -> Self {
        let mut rating_distribution: BTreeMap<u8, u64> = (1..=5u8).map(|r| (r, 0)).collect();
        let mut sum: i64 = 0;
        let mut counted: u64 = 0;

        for &rating in rows {
            match u8::try_from(rating).ok().filter(|r| (1..=5).contains(r)) {
                Some(r) => {
                    *rating_distribution.entry(r).or_insert(0) += 1;
                    sum += i64::from(rating);
                    counted += 1;
                }
                None => warn!(rating, "skipping out-of-range rating row"),
            }
        }

        let average_rating = if counted == 0 {
            0.0
        } else {
            ((sum as f64 / counted as f64) * 10.0).round() / 10.0
        };

        Self { average_rating, total_reviews: counted, rating_distribution }
    }
}

/// Fetch the rating column for the target and aggregate it.
pub async fn summary_for(
    db: &DatabaseConnection,
    target: RatingTarget,
) -> Result<RatingSummary, ServiceError> {
    let select = match target {
        RatingTarget::Shop(id) => review::Entity::find().filter(review::Column::ShopId.eq(id)),
        RatingTarget::Driver(id) => review::Entity::find().filter(review::Column::DriverId.eq(id)),
    };
    let rows: Vec<i32> = select
        .select_only()
        .column(review::Column::Rating)
        .into_tuple()
        .all(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;
    Ok(RatingSummary::from_rows(&rows))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dist(pairs: [(u8, u64); 5]) -> BTreeMap<u8, u64> {
        pairs.into_iter().collect()
    }

    #[test]
    fn empty_input_yields_zeroes() {
        let s = RatingSummary::from_rows(&[]);
        assert_eq!(s.average_rating, 0.0);
        assert_eq!(s.total_reviews, 0);
        assert_eq!(s.rating_distribution, dist([(1, 0), (2, 0), (3, 0), (4, 0), (5, 0)]));
    }

    #[test]
    fn documented_example() {
        let s = RatingSummary::from_rows(&[5, 5, 4, 3]);
        assert_eq!(s.average_rating, 4.3);
        assert_eq!(s.total_reviews, 4);
        assert_eq!(s.rating_distribution, dist([(1, 0), (2, 0), (3, 1), (4, 1), (5, 2)]));
    }

    #[test]
    fn distribution_sums_to_row_count() {
        let rows = [1, 2, 2, 3, 5, 5, 5, 4];
        let s = RatingSummary::from_rows(&rows);
        let total: u64 = s.rating_distribution.values().sum();
        assert_eq!(total, rows.len() as u64);
        assert_eq!(s.total_reviews, rows.len() as u64);
    }

    #[test]
    fn out_of_range_rows_are_skipped() {
        let s = RatingSummary::from_rows(&[5, 0, 6, -3, 5]);
        assert_eq!(s.total_reviews, 2);
        assert_eq!(s.average_rating, 5.0);
        let total: u64 = s.rating_distribution.values().sum();
        assert_eq!(total, 2);
    }

    #[test]
    fn average_rounds_to_one_decimal() {
        // 1 + 2 + 2 = 5, mean 1.666... -> 1.7
        let s = RatingSummary::from_rows(&[1, 2, 2]);
        assert_eq!(s.average_rating, 1.7);
    }

    #[test]
    fn serializes_with_camel_case_keys() {
        let v = serde_json::to_value(RatingSummary::from_rows(&[4])).unwrap();
        assert_eq!(v["averageRating"], 4.0);
        assert_eq!(v["totalReviews"], 1);
        assert_eq!(v["ratingDistribution"]["4"], 1);
        assert_eq!(v["ratingDistribution"]["1"], 0);
    }
}
