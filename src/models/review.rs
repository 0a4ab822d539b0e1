use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Review model: an anonymous rating and comment on a property, with an
/// optional owner response.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Review {
    pub id: i64,
    pub property_id: i64,
    pub reviewer_name: String,
    pub reviewer_email: Option<String>,
    /// Star rating constrained to 1..=5
    pub rating: i64,
    pub comment: Option<String>,
    pub owner_response: Option<String>,
    pub owner_response_created_at: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Review {
    pub fn has_response(&self) -> bool {
        self.owner_response.is_some()
    }
}

/// Review joined with the address of the reviewed property, for the
/// owner's received-reviews overview.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct OwnerReview {
    pub id: i64,
    pub property_id: i64,
    pub reviewer_name: String,
    pub reviewer_email: Option<String>,
    pub rating: i64,
    pub comment: Option<String>,
    pub owner_response: Option<String>,
    pub owner_response_created_at: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    pub street: String,
    pub street_number: String,
}

/// Aggregated rating for a property
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct RatingSummary {
    pub average: f64,
    pub count: i64,
}
