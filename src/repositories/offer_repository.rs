use crate::error::RepositoryError;
use crate::models::{Offer, ReceivedOffer, SentOffer};
use chrono::NaiveDateTime;
use sqlx::SqlitePool;

/// Fields required to send an offer on a property
#[derive(Debug, Clone)]
pub struct NewOffer {
    pub property_id: i64,
    pub bidder_id: i64,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub message: String,
}

/// Repository for offer data access
pub struct OfferRepository {
    pool: SqlitePool,
}

impl OfferRepository {
    /// Create a new OfferRepository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a new offer and return it
    pub async fn create(&self, new_offer: NewOffer) -> Result<Offer, RepositoryError> {
        let offer = sqlx::query_as::<_, Offer>(
            r#"
            INSERT INTO offers (property_id, bidder_id, name, email, phone, message)
            VALUES (?, ?, ?, ?, ?, ?)
            RETURNING id, property_id, bidder_id, name, email, phone, message, is_read,
                      reply, reply_created_at, reply_read, created_at
            "#,
        )
        .bind(new_offer.property_id)
        .bind(new_offer.bidder_id)
        .bind(&new_offer.name)
        .bind(&new_offer.email)
        .bind(&new_offer.phone)
        .bind(&new_offer.message)
        .fetch_one(&self.pool)
        .await?;

        Ok(offer)
    }

    /// Find an offer by id
    pub async fn find_by_id(&self, id: i64) -> Result<Option<Offer>, RepositoryError> {
        let offer = sqlx::query_as::<_, Offer>(
            r#"
            SELECT id, property_id, bidder_id, name, email, phone, message, is_read,
                   reply, reply_created_at, reply_read, created_at
            FROM offers
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(offer)
    }

    /// All offers received on an owner's properties, newest first, with the
    /// property address and the sender's public profile attached
    pub async fn received_by_owner(
        &self,
        owner_id: i64,
    ) -> Result<Vec<ReceivedOffer>, RepositoryError> {
        let offers = sqlx::query_as::<_, ReceivedOffer>(
            r#"
            SELECT o.id, o.property_id, o.bidder_id, o.name, o.email, o.phone, o.message,
                   o.is_read, o.reply, o.reply_created_at, o.reply_read, o.created_at,
                   p.street, p.street_number,
                   b.username AS sender_username, b.profile_photo AS sender_profile
            FROM offers o
            JOIN properties p ON o.property_id = p.id
            LEFT JOIN users b ON o.bidder_id = b.id
            WHERE p.owner_id = ?
            ORDER BY o.created_at DESC
            "#,
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(offers)
    }

    /// All offers a bidder has sent, newest first, with the property address
    /// and its owner's public profile attached
    pub async fn sent_by_bidder(&self, bidder_id: i64) -> Result<Vec<SentOffer>, RepositoryError> {
        let offers = sqlx::query_as::<_, SentOffer>(
            r#"
            SELECT o.id, o.property_id, o.bidder_id, o.name, o.email, o.phone, o.message,
                   o.is_read, o.reply, o.reply_created_at, o.reply_read, o.created_at,
                   p.street, p.street_number, p.owner_id,
                   w.username AS owner_username, w.profile_photo AS owner_profile
            FROM offers o
            JOIN properties p ON o.property_id = p.id
            LEFT JOIN users w ON p.owner_id = w.id
            WHERE o.bidder_id = ?
            ORDER BY o.created_at DESC
            "#,
        )
        .bind(bidder_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(offers)
    }

    /// Mark an offer as read by the owner
    pub async fn mark_read(&self, id: i64) -> Result<(), RepositoryError> {
        sqlx::query("UPDATE offers SET is_read = 1 WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Store the owner's reply; the bidder's read flag resets so the reply
    /// shows up as news
    pub async fn set_reply(
        &self,
        id: i64,
        reply: &str,
        replied_at: NaiveDateTime,
    ) -> Result<(), RepositoryError> {
        sqlx::query(
            "UPDATE offers SET reply = ?, reply_created_at = ?, reply_read = 0 WHERE id = ?",
        )
        .bind(reply)
        .bind(replied_at)
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Mark the owner's reply as read by the bidder
    pub async fn mark_reply_read(&self, id: i64) -> Result<(), RepositoryError> {
        sqlx::query("UPDATE offers SET reply_read = 1 WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Delete an offer
    pub async fn delete(&self, id: i64) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM offers WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Count unread offers across an owner's properties
    pub async fn count_unread(&self, owner_id: i64) -> Result<i64, RepositoryError> {
        let count: (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*)
            FROM offers o
            JOIN properties p ON o.property_id = p.id
            WHERE p.owner_id = ? AND o.is_read = 0
            "#,
        )
        .bind(owner_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count.0)
    }
}
