use casaflow_backend::auth;
use casaflow_backend::config::AppConfig;
use casaflow_backend::models::*;
use casaflow_backend::notifier::MemoryMailer;
use casaflow_backend::repositories::*;
use casaflow_backend::AppState;
use sqlx::SqlitePool;
use std::sync::Arc;

/// Test database configuration
pub struct TestDatabase {
    pub pool: SqlitePool,
    pub user_repo: Arc<UserRepository>,
    pub session_repo: Arc<SessionRepository>,
    pub property_repo: Arc<PropertyRepository>,
    pub tenant_repo: Arc<TenantRepository>,
    pub offer_repo: Arc<OfferRepository>,
    pub review_repo: Arc<ReviewRepository>,
}

impl TestDatabase {
    /// Create TestDatabase from an existing pool (useful with sqlx::test)
    pub async fn from_pool(pool: SqlitePool) -> Self {
        Self {
            pool: pool.clone(),
            user_repo: Arc::new(UserRepository::new(pool.clone())),
            session_repo: Arc::new(SessionRepository::new(pool.clone())),
            property_repo: Arc::new(PropertyRepository::new(pool.clone())),
            tenant_repo: Arc::new(TenantRepository::new(pool.clone())),
            offer_repo: Arc::new(OfferRepository::new(pool.clone())),
            review_repo: Arc::new(ReviewRepository::new(pool)),
        }
    }
}

/// Test data fixtures
pub struct TestFixtures {
    pub owner: User,
    pub bidder: User,
    pub property: Property,
    pub tenant: Tenant,
}

impl TestFixtures {
    /// Create test fixtures with sample data
    pub async fn create(db: &TestDatabase) -> Self {
        let owner = create_test_user(db, "olivia_owner", UserRole::Owner).await;
        let bidder = create_test_user(db, "ben_bidder", UserRole::Bidder).await;

        let property = create_test_property(db, owner.id, "Main Street").await;

        let tenant = db
            .tenant_repo
            .create(NewTenant {
                property_id: property.id,
                first_name: "Tina".to_string(),
                last_name: "Tenant".to_string(),
                email: "tina@example.com".to_string(),
                monthly_amount: 850.0,
                due_day: 5,
                household_size: Some(2),
                age: Some(34),
            })
            .await
            .expect("Failed to create tenant");

        Self {
            owner,
            bidder,
            property,
            tenant,
        }
    }
}

/// Helper function to create a test user
pub async fn create_test_user(db: &TestDatabase, username: &str, role: UserRole) -> User {
    let password_hash = auth::hash_password("password123").expect("Failed to hash password");

    db.user_repo
        .create(NewUser {
            username: username.to_string(),
            email: format!("{}@example.com", username),
            password_hash,
            first_name: "Test".to_string(),
            last_name: "User".to_string(),
            profile_photo: None,
            role: role.as_str().to_string(),
        })
        .await
        .expect("Failed to create test user")
}

/// Helper function to create a test property
pub async fn create_test_property(db: &TestDatabase, owner_id: i64, street: &str) -> Property {
    db.property_repo
        .create(NewProperty {
            owner_id,
            street: street.to_string(),
            street_number: "12".to_string(),
            listing_kind: ListingKind::Rent.as_str().to_string(),
            photo: None,
            rent_price: Some(900.0),
            sale_price: None,
        })
        .await
        .expect("Failed to create test property")
}

/// Helper function to create a test tenant with a specific due day
pub async fn create_test_tenant(db: &TestDatabase, property_id: i64, due_day: i64) -> Tenant {
    db.tenant_repo
        .create(NewTenant {
            property_id,
            first_name: "Sam".to_string(),
            last_name: "Renter".to_string(),
            email: format!("renter{}@example.com", due_day),
            monthly_amount: 700.0,
            due_day,
            household_size: None,
            age: None,
        })
        .await
        .expect("Failed to create test tenant")
}

/// Build an AppState over the pool with a recording mailer, so handler
/// tests can assert on what would have been emailed.
pub fn test_app_state(pool: SqlitePool) -> (AppState, Arc<MemoryMailer>) {
    let mailer = Arc::new(MemoryMailer::new());
    let state = AppState::new(pool, mailer.clone(), AppConfig::default());
    (state, mailer)
}

/// Log a user in through the session repository, returning the cookie
/// value a browser would send back.
pub async fn login_session(db: &TestDatabase, user: &User) -> String {
    let token = auth::new_session_token();
    db.session_repo
        .create(user.id, &token, auth::session_expiry())
        .await
        .expect("Failed to create session");

    format!("{}={}", auth::SESSION_COOKIE, token)
}

/// Assert that two users are equal (ignoring timestamps)
pub fn assert_users_equal(user1: &User, user2: &User) {
    assert_eq!(user1.id, user2.id);
    assert_eq!(user1.username, user2.username);
    assert_eq!(user1.email, user2.email);
    assert_eq!(user1.role, user2.role);
}

/// Assert that two properties are equal (ignoring timestamps)
pub fn assert_properties_equal(p1: &Property, p2: &Property) {
    assert_eq!(p1.id, p2.id);
    assert_eq!(p1.owner_id, p2.owner_id);
    assert_eq!(p1.street, p2.street);
    assert_eq!(p1.street_number, p2.street_number);
    assert_eq!(p1.listing_kind, p2.listing_kind);
}
