use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Offer model: a message from a bidder to a property owner, with an
/// optional owner reply and read/unread flags on both directions.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Offer {
    pub id: i64,
    pub property_id: i64,
    pub bidder_id: i64,
    /// Snapshot of the bidder's name at send time
    pub name: String,
    /// Snapshot of the bidder's email at send time
    pub email: String,
    pub phone: Option<String>,
    pub message: String,
    pub is_read: bool,
    pub reply: Option<String>,
    pub reply_created_at: Option<NaiveDateTime>,
    pub reply_read: bool,
    pub created_at: NaiveDateTime,
}

impl Offer {
    pub fn has_reply(&self) -> bool {
        self.reply.is_some()
    }
}

/// Offer as seen by the receiving owner: joined with the property address
/// and the sender's public profile.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ReceivedOffer {
    pub id: i64,
    pub property_id: i64,
    pub bidder_id: i64,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub message: String,
    pub is_read: bool,
    pub reply: Option<String>,
    pub reply_created_at: Option<NaiveDateTime>,
    pub reply_read: bool,
    pub created_at: NaiveDateTime,
    pub street: String,
    pub street_number: String,
    pub sender_username: Option<String>,
    pub sender_profile: Option<String>,
}

/// Offer as seen by the bidder who sent it: joined with the property
/// address and the owner's public profile.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SentOffer {
    pub id: i64,
    pub property_id: i64,
    pub bidder_id: i64,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub message: String,
    pub is_read: bool,
    pub reply: Option<String>,
    pub reply_created_at: Option<NaiveDateTime>,
    pub reply_read: bool,
    pub created_at: NaiveDateTime,
    pub street: String,
    pub street_number: String,
    pub owner_id: i64,
    pub owner_username: Option<String>,
    pub owner_profile: Option<String>,
}

impl SentOffer {
    pub fn has_unread_reply(&self) -> bool {
        self.reply.is_some() && !self.reply_read
    }
}
