use crate::error::RepositoryError;
use crate::models::{DueTenant, Tenant};
use chrono::NaiveDateTime;
use sqlx::SqlitePool;

/// Fields required to add a tenant to a property
#[derive(Debug, Clone)]
pub struct NewTenant {
    pub property_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub monthly_amount: f64,
    pub due_day: i64,
    pub household_size: Option<i64>,
    pub age: Option<i64>,
}

/// Full replacement of a tenant's mutable fields
#[derive(Debug, Clone)]
pub struct TenantUpdate {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub monthly_amount: f64,
    pub due_day: i64,
    pub household_size: Option<i64>,
    pub age: Option<i64>,
}

/// Repository for tenant data access
pub struct TenantRepository {
    pool: SqlitePool,
}

impl TenantRepository {
    /// Create a new TenantRepository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// All tenants of a property, newest first
    pub async fn list_by_property(&self, property_id: i64) -> Result<Vec<Tenant>, RepositoryError> {
        let tenants = sqlx::query_as::<_, Tenant>(
            r#"
            SELECT id, property_id, first_name, last_name, email, monthly_amount, due_day,
                   household_size, age, last_reminder_at, created_at
            FROM tenants
            WHERE property_id = ?
            ORDER BY created_at DESC
            "#,
        )
        .bind(property_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(tenants)
    }

    /// Find a tenant by id
    pub async fn find_by_id(&self, id: i64) -> Result<Option<Tenant>, RepositoryError> {
        let tenant = sqlx::query_as::<_, Tenant>(
            r#"
            SELECT id, property_id, first_name, last_name, email, monthly_amount, due_day,
                   household_size, age, last_reminder_at, created_at
            FROM tenants
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(tenant)
    }

    /// Insert a new tenant; an out-of-range due day violates the schema
    /// CHECK and surfaces as a constraint error
    pub async fn create(&self, new_tenant: NewTenant) -> Result<Tenant, RepositoryError> {
        let tenant = sqlx::query_as::<_, Tenant>(
            r#"
            INSERT INTO tenants (property_id, first_name, last_name, email, monthly_amount, due_day, household_size, age)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING id, property_id, first_name, last_name, email, monthly_amount, due_day,
                      household_size, age, last_reminder_at, created_at
            "#,
        )
        .bind(new_tenant.property_id)
        .bind(&new_tenant.first_name)
        .bind(&new_tenant.last_name)
        .bind(&new_tenant.email)
        .bind(new_tenant.monthly_amount)
        .bind(new_tenant.due_day)
        .bind(new_tenant.household_size)
        .bind(new_tenant.age)
        .fetch_one(&self.pool)
        .await?;

        Ok(tenant)
    }

    /// Replace the mutable fields of a tenant
    pub async fn update(&self, id: i64, update: TenantUpdate) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            UPDATE tenants
            SET first_name = ?, last_name = ?, email = ?, monthly_amount = ?, due_day = ?,
                household_size = ?, age = ?
            WHERE id = ?
            "#,
        )
        .bind(&update.first_name)
        .bind(&update.last_name)
        .bind(&update.email)
        .bind(update.monthly_amount)
        .bind(update.due_day)
        .bind(update.household_size)
        .bind(update.age)
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Delete a tenant
    pub async fn delete(&self, id: i64) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM tenants WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Tenants whose payment is due on the given day of month, joined with
    /// the property address and owner needed to render reminder emails
    pub async fn find_due_on_day(&self, day: u32) -> Result<Vec<DueTenant>, RepositoryError> {
        let due = sqlx::query_as::<_, DueTenant>(
            r#"
            SELECT t.id, t.property_id, t.first_name, t.last_name, t.email, t.monthly_amount,
                   t.due_day, t.last_reminder_at, p.street, p.street_number,
                   p.owner_id, u.username AS owner_username
            FROM tenants t
            JOIN properties p ON t.property_id = p.id
            JOIN users u ON p.owner_id = u.id
            WHERE t.due_day = ?
            ORDER BY t.id ASC
            "#,
        )
        .bind(day as i64)
        .fetch_all(&self.pool)
        .await?;

        Ok(due)
    }

    /// Stamp the last-reminder timestamp after a successful send
    pub async fn stamp_reminder_sent(
        &self,
        id: i64,
        sent_at: NaiveDateTime,
    ) -> Result<(), RepositoryError> {
        sqlx::query("UPDATE tenants SET last_reminder_at = ? WHERE id = ?")
            .bind(sent_at)
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
