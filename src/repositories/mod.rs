pub mod offer_repository;
pub mod property_repository;
pub mod review_repository;
pub mod session_repository;
pub mod tenant_repository;
pub mod user_repository;

// Re-export all repositories for convenient access
pub use offer_repository::{NewOffer, OfferRepository};
pub use property_repository::{NewProperty, PropertyRepository, PropertyUpdate};
pub use review_repository::{NewReview, ReviewRepository};
pub use session_repository::SessionRepository;
pub use tenant_repository::{NewTenant, TenantRepository, TenantUpdate};
pub use user_repository::{NewUser, UserRepository, UserUpdate};
