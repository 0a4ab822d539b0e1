use crate::error::RepositoryError;
use crate::models::{OwnerReview, RatingSummary, Review};
use chrono::NaiveDateTime;
use sqlx::SqlitePool;

/// Fields required to leave a review on a property
#[derive(Debug, Clone)]
pub struct NewReview {
    pub property_id: i64,
    pub reviewer_name: String,
    pub reviewer_email: Option<String>,
    pub rating: i64,
    pub comment: Option<String>,
}

/// Repository for review data access
pub struct ReviewRepository {
    pool: SqlitePool,
}

impl ReviewRepository {
    /// Create a new ReviewRepository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a new review; an out-of-range rating violates the schema
    /// CHECK and surfaces as a constraint error
    pub async fn create(&self, new_review: NewReview) -> Result<Review, RepositoryError> {
        let review = sqlx::query_as::<_, Review>(
            r#"
            INSERT INTO reviews (property_id, reviewer_name, reviewer_email, rating, comment)
            VALUES (?, ?, ?, ?, ?)
            RETURNING id, property_id, reviewer_name, reviewer_email, rating, comment,
                      owner_response, owner_response_created_at, created_at, updated_at
            "#,
        )
        .bind(new_review.property_id)
        .bind(&new_review.reviewer_name)
        .bind(&new_review.reviewer_email)
        .bind(new_review.rating)
        .bind(&new_review.comment)
        .fetch_one(&self.pool)
        .await?;

        Ok(review)
    }

    /// Find a review by id
    pub async fn find_by_id(&self, id: i64) -> Result<Option<Review>, RepositoryError> {
        let review = sqlx::query_as::<_, Review>(
            r#"
            SELECT id, property_id, reviewer_name, reviewer_email, rating, comment,
                   owner_response, owner_response_created_at, created_at, updated_at
            FROM reviews
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(review)
    }

    /// All reviews on a property, newest first
    pub async fn list_for_property(&self, property_id: i64) -> Result<Vec<Review>, RepositoryError> {
        let reviews = sqlx::query_as::<_, Review>(
            r#"
            SELECT id, property_id, reviewer_name, reviewer_email, rating, comment,
                   owner_response, owner_response_created_at, created_at, updated_at
            FROM reviews
            WHERE property_id = ?
            ORDER BY created_at DESC
            "#,
        )
        .bind(property_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(reviews)
    }

    /// Average rating and review count for a property; None when unreviewed
    pub async fn average_for_property(
        &self,
        property_id: i64,
    ) -> Result<Option<RatingSummary>, RepositoryError> {
        let summary = sqlx::query_as::<_, RatingSummary>(
            r#"
            SELECT ROUND(AVG(rating), 2) AS average, COUNT(*) AS count
            FROM reviews
            WHERE property_id = ?
            HAVING COUNT(*) > 0
            "#,
        )
        .bind(property_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(summary)
    }

    /// Store the owner's response to a review
    pub async fn set_owner_response(
        &self,
        id: i64,
        response: &str,
        responded_at: NaiveDateTime,
    ) -> Result<(), RepositoryError> {
        sqlx::query(
            "UPDATE reviews SET owner_response = ?, owner_response_created_at = ? WHERE id = ?",
        )
        .bind(response)
        .bind(responded_at)
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// All reviews received across an owner's properties, newest first,
    /// with the property address attached
    pub async fn list_for_owner(&self, owner_id: i64) -> Result<Vec<OwnerReview>, RepositoryError> {
        let reviews = sqlx::query_as::<_, OwnerReview>(
            r#"
            SELECT r.id, r.property_id, r.reviewer_name, r.reviewer_email, r.rating, r.comment,
                   r.owner_response, r.owner_response_created_at, r.created_at, r.updated_at,
                   p.street, p.street_number
            FROM reviews r
            JOIN properties p ON r.property_id = p.id
            WHERE p.owner_id = ?
            ORDER BY r.created_at DESC
            "#,
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(reviews)
    }
}
