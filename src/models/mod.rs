//! Domain models for the Casaflow backend.
//!
//! This module contains all database-backed models representing
//! the core entities of the property-rental manager.

pub mod offer;
pub mod property;
pub mod review;
pub mod session;
pub mod tenant;
pub mod user;

// Re-export all models for convenient access
pub use offer::{Offer, ReceivedOffer, SentOffer};
pub use property::{ListingKind, Property, PropertyListing};
pub use review::{OwnerReview, RatingSummary, Review};
pub use session::Session;
pub use tenant::{DueTenant, Tenant};
pub use user::{User, UserRole};
