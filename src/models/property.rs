use crate::models::Tenant;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// How a property is advertised
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListingKind {
    Rent,
    Sale,
    RentOrSale,
    Occupied,
}

impl ListingKind {
    /// Convert from database string
    pub fn from_str(s: &str) -> Result<Self, String> {
        match s.to_lowercase().as_str() {
            "rent" => Ok(ListingKind::Rent),
            "sale" => Ok(ListingKind::Sale),
            "rent_or_sale" => Ok(ListingKind::RentOrSale),
            "occupied" => Ok(ListingKind::Occupied),
            _ => Err(format!("Invalid listing kind: {}", s)),
        }
    }

    /// Convert to database string
    pub fn as_str(&self) -> &'static str {
        match self {
            ListingKind::Rent => "rent",
            ListingKind::Sale => "sale",
            ListingKind::RentOrSale => "rent_or_sale",
            ListingKind::Occupied => "occupied",
        }
    }

    /// Whether this kind satisfies a requested filter. A combined
    /// rent-or-sale listing matches both the rent and the sale filter.
    pub fn matches_filter(&self, filter: ListingKind) -> bool {
        *self == filter || (*self == ListingKind::RentOrSale && filter != ListingKind::Occupied)
    }
}

impl From<String> for ListingKind {
    fn from(s: String) -> Self {
        Self::from_str(&s).unwrap_or(ListingKind::Rent)
    }
}

impl From<ListingKind> for String {
    fn from(kind: ListingKind) -> Self {
        kind.as_str().to_string()
    }
}

/// Property model representing a listed home
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Property {
    pub id: i64,
    pub owner_id: i64,
    pub street: String,
    pub street_number: String,
    pub listing_kind: String, // Stored as TEXT, use ListingKind enum for type safety
    pub photo: Option<String>,
    pub rent_price: Option<f64>,
    pub sale_price: Option<f64>,
    pub created_at: NaiveDateTime,
}

impl Property {
    /// Get listing kind as an enum
    pub fn kind_enum(&self) -> ListingKind {
        ListingKind::from_str(&self.listing_kind).unwrap_or(ListingKind::Rent)
    }

    /// Check if the property currently has occupants and is off the market
    pub fn is_occupied(&self) -> bool {
        self.kind_enum() == ListingKind::Occupied
    }
}

/// Property joined with its owner's username, as shown in the listing feed.
/// Tenants are attached after the fact, they come from a separate query.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PropertyListing {
    pub id: i64,
    pub owner_id: i64,
    pub owner_username: String,
    pub street: String,
    pub street_number: String,
    pub listing_kind: String,
    pub photo: Option<String>,
    pub rent_price: Option<f64>,
    pub sale_price: Option<f64>,
    pub created_at: NaiveDateTime,
    #[sqlx(skip)]
    #[serde(default)]
    pub tenants: Vec<Tenant>,
}

impl PropertyListing {
    /// Get listing kind as an enum
    pub fn kind_enum(&self) -> ListingKind {
        ListingKind::from_str(&self.listing_kind).unwrap_or(ListingKind::Rent)
    }
}
