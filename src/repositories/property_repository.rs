use crate::error::RepositoryError;
use crate::models::{Property, PropertyListing};
use sqlx::SqlitePool;

/// Fields required to list a new property
#[derive(Debug, Clone)]
pub struct NewProperty {
    pub owner_id: i64,
    pub street: String,
    pub street_number: String,
    pub listing_kind: String,
    pub photo: Option<String>,
    pub rent_price: Option<f64>,
    pub sale_price: Option<f64>,
}

/// Full replacement of a property's mutable fields (form semantics:
/// every field is resubmitted on update)
#[derive(Debug, Clone)]
pub struct PropertyUpdate {
    pub street: String,
    pub street_number: String,
    pub listing_kind: String,
    pub photo: Option<String>,
    pub rent_price: Option<f64>,
    pub sale_price: Option<f64>,
}

const LISTING_COLUMNS: &str = r#"
    p.id, p.owner_id, u.username AS owner_username, p.street, p.street_number,
    p.listing_kind, p.photo, p.rent_price, p.sale_price, p.created_at
"#;

/// Repository for property data access
pub struct PropertyRepository {
    pool: SqlitePool,
}

impl PropertyRepository {
    /// Create a new PropertyRepository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// All properties with their owner's username, newest first
    pub async fn list_all(&self) -> Result<Vec<PropertyListing>, RepositoryError> {
        let listings = sqlx::query_as::<_, PropertyListing>(&format!(
            r#"
            SELECT {LISTING_COLUMNS}
            FROM properties p
            JOIN users u ON p.owner_id = u.id
            ORDER BY p.created_at DESC
            "#
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(listings)
    }

    /// Properties listed by a specific owner, newest first
    pub async fn list_by_owner(&self, owner_id: i64) -> Result<Vec<PropertyListing>, RepositoryError> {
        let listings = sqlx::query_as::<_, PropertyListing>(&format!(
            r#"
            SELECT {LISTING_COLUMNS}
            FROM properties p
            JOIN users u ON p.owner_id = u.id
            WHERE p.owner_id = ?
            ORDER BY p.created_at DESC
            "#
        ))
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(listings)
    }

    /// Find a property by id
    pub async fn find_by_id(&self, id: i64) -> Result<Option<Property>, RepositoryError> {
        let property = sqlx::query_as::<_, Property>(
            r#"
            SELECT id, owner_id, street, street_number, listing_kind, photo, rent_price, sale_price, created_at
            FROM properties
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(property)
    }

    /// Find a property by id joined with its owner's username
    pub async fn find_listing_by_id(
        &self,
        id: i64,
    ) -> Result<Option<PropertyListing>, RepositoryError> {
        let listing = sqlx::query_as::<_, PropertyListing>(&format!(
            r#"
            SELECT {LISTING_COLUMNS}
            FROM properties p
            JOIN users u ON p.owner_id = u.id
            WHERE p.id = ?
            "#
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(listing)
    }

    /// Insert a new property and return it
    pub async fn create(&self, new_property: NewProperty) -> Result<Property, RepositoryError> {
        let property = sqlx::query_as::<_, Property>(
            r#"
            INSERT INTO properties (owner_id, street, street_number, listing_kind, photo, rent_price, sale_price)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            RETURNING id, owner_id, street, street_number, listing_kind, photo, rent_price, sale_price, created_at
            "#,
        )
        .bind(new_property.owner_id)
        .bind(&new_property.street)
        .bind(&new_property.street_number)
        .bind(&new_property.listing_kind)
        .bind(&new_property.photo)
        .bind(new_property.rent_price)
        .bind(new_property.sale_price)
        .fetch_one(&self.pool)
        .await?;

        Ok(property)
    }

    /// Replace the mutable fields of a property
    pub async fn update(&self, id: i64, update: PropertyUpdate) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            UPDATE properties
            SET street = ?, street_number = ?, listing_kind = ?, photo = ?, rent_price = ?, sale_price = ?
            WHERE id = ?
            "#,
        )
        .bind(&update.street)
        .bind(&update.street_number)
        .bind(&update.listing_kind)
        .bind(&update.photo)
        .bind(update.rent_price)
        .bind(update.sale_price)
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Delete a property; tenants, offers and reviews cascade
    pub async fn delete(&self, id: i64) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM properties WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
