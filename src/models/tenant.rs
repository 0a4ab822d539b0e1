use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Tenant model: an occupant paying rent on a property, tracked for
/// monthly payment reminders.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Tenant {
    pub id: i64,
    pub property_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub monthly_amount: f64,
    /// Day of month the payment is due, constrained to 1..=28
    pub due_day: i64,
    pub household_size: Option<i64>,
    pub age: Option<i64>,
    /// When the last payment reminder went out; None means never
    pub last_reminder_at: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
}

impl Tenant {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Tenant due for a reminder, joined with property and owner details
/// needed to render the email.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DueTenant {
    pub id: i64,
    pub property_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub monthly_amount: f64,
    pub due_day: i64,
    pub last_reminder_at: Option<NaiveDateTime>,
    pub street: String,
    pub street_number: String,
    pub owner_id: i64,
    pub owner_username: String,
}

impl DueTenant {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}
