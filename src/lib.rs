//! Casaflow Backend Library
//!
//! This module exposes the backend components for use by tests and other consumers.

pub mod auth;
pub mod config;
pub mod database;
pub mod error;
pub mod http;
pub mod models;
pub mod notifier;
pub mod repositories;
pub mod services;
pub mod uploads;

// Re-export commonly used types
pub use config::AppConfig;
pub use error::{AppError, AppResult};

use database::Database;
use notifier::Mailer;
use repositories::*;
use services::ReminderService;
use std::sync::Arc;

/// Application state containing all repositories and services
#[derive(Clone)]
pub struct AppState {
    pub database: Database,
    pub user_repo: Arc<UserRepository>,
    pub session_repo: Arc<SessionRepository>,
    pub property_repo: Arc<PropertyRepository>,
    pub tenant_repo: Arc<TenantRepository>,
    pub offer_repo: Arc<OfferRepository>,
    pub review_repo: Arc<ReviewRepository>,
    pub mailer: Arc<dyn Mailer>,
    pub reminders: Arc<ReminderService>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    /// Create a new AppState with initialized repositories
    pub fn new(pool: sqlx::SqlitePool, mailer: Arc<dyn Mailer>, config: AppConfig) -> Self {
        let database = Database::new(pool.clone());
        let tenant_repo = Arc::new(TenantRepository::new(pool.clone()));
        let reminders = Arc::new(ReminderService::new(tenant_repo.clone(), mailer.clone()));

        Self {
            database,
            user_repo: Arc::new(UserRepository::new(pool.clone())),
            session_repo: Arc::new(SessionRepository::new(pool.clone())),
            property_repo: Arc::new(PropertyRepository::new(pool.clone())),
            tenant_repo,
            offer_repo: Arc::new(OfferRepository::new(pool.clone())),
            review_repo: Arc::new(ReviewRepository::new(pool)),
            mailer,
            reminders,
            config: Arc::new(config),
        }
    }
}
