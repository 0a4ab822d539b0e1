//! Tenant management, owner-of-property only. Adding a tenant sends the
//! welcome email with their payment details.

use crate::error::{AppError, AppResult};
use crate::http::extract::AuthUser;
use crate::http::owned_property;
use crate::models::Tenant;
use crate::notifier::templates;
use crate::repositories::{NewTenant, TenantUpdate};
use crate::AppState;
use axum::extract::{Path, State};
use axum::response::Redirect;
use axum::Form;
use serde::Deserialize;
use tracing::{info, warn};

#[derive(Debug, Deserialize)]
pub struct TenantForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub monthly_amount: Option<String>,
    pub due_day: Option<String>,
    pub household_size: Option<String>,
    pub age: Option<String>,
}

struct TenantFields {
    first_name: String,
    last_name: String,
    email: String,
    monthly_amount: f64,
    due_day: i64,
    household_size: Option<i64>,
    age: Option<i64>,
}

fn validate(form: &TenantForm) -> AppResult<TenantFields> {
    let first_name = required(&form.first_name, "first_name")?;
    let last_name = required(&form.last_name, "last_name")?;
    let email = required(&form.email, "email")?;

    let monthly_amount = form
        .monthly_amount
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| AppError::Validation("monthly_amount is required".to_string()))?
        .parse::<f64>()
        .map_err(|_| AppError::Validation("monthly_amount is not a valid number".to_string()))?;

    let due_day = form
        .due_day
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| AppError::Validation("due_day is required".to_string()))?
        .parse::<i64>()
        .map_err(|_| AppError::Validation("due_day is not a valid number".to_string()))?;

    if !(1..=28).contains(&due_day) {
        return Err(AppError::Validation(
            "due_day must be between 1 and 28".to_string(),
        ));
    }

    Ok(TenantFields {
        first_name,
        last_name,
        email,
        monthly_amount,
        due_day,
        household_size: optional_int(&form.household_size, "household_size")?,
        age: optional_int(&form.age, "age")?,
    })
}

fn required(value: &str, name: &str) -> AppResult<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AppError::Validation(format!("{} is required", name)));
    }
    Ok(value.to_string())
}

fn optional_int(value: &Option<String>, name: &str) -> AppResult<Option<i64>> {
    match value.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(None),
        Some(v) => v
            .parse::<i64>()
            .map(Some)
            .map_err(|_| AppError::Validation(format!("{} is not a valid number", name))),
    }
}

/// `POST /properties/{id}/tenants` — add a tenant and send the welcome email
pub async fn create(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(property_id): Path<i64>,
    Form(form): Form<TenantForm>,
) -> AppResult<Redirect> {
    let property = owned_property(&state, property_id, &user).await?;
    let fields = validate(&form)?;

    let tenant = state
        .tenant_repo
        .create(NewTenant {
            property_id,
            first_name: fields.first_name,
            last_name: fields.last_name,
            email: fields.email,
            monthly_amount: fields.monthly_amount,
            due_day: fields.due_day,
            household_size: fields.household_size,
            age: fields.age,
        })
        .await?;

    // Welcome email is best-effort; the tenant record is already in
    let message = templates::welcome_email(
        &tenant.full_name(),
        &tenant.email,
        tenant.monthly_amount,
        tenant.due_day,
        &property.street,
        &property.street_number,
        &user.display_name(),
    );
    if let Err(e) = state.mailer.send(&message).await {
        warn!(tenant_id = tenant.id, "welcome email not sent: {}", e);
    }

    info!(tenant_id = tenant.id, property_id, "tenant added");
    Ok(Redirect::to(&format!("/properties/{}", property_id)))
}

/// `POST /tenants/{id}/update` — owner of the tenant's property only
pub async fn update(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<i64>,
    Form(form): Form<TenantForm>,
) -> AppResult<Redirect> {
    let tenant = find_tenant(&state, id).await?;
    owned_property(&state, tenant.property_id, &user).await?;

    let fields = validate(&form)?;

    state
        .tenant_repo
        .update(
            id,
            TenantUpdate {
                first_name: fields.first_name,
                last_name: fields.last_name,
                email: fields.email,
                monthly_amount: fields.monthly_amount,
                due_day: fields.due_day,
                household_size: fields.household_size,
                age: fields.age,
            },
        )
        .await?;

    info!(tenant_id = id, "tenant updated");
    Ok(Redirect::to(&format!("/properties/{}", tenant.property_id)))
}

/// `POST /tenants/{id}/delete` — owner of the tenant's property only
pub async fn delete(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<i64>,
) -> AppResult<Redirect> {
    let tenant = find_tenant(&state, id).await?;
    owned_property(&state, tenant.property_id, &user).await?;

    state.tenant_repo.delete(id).await?;

    info!(tenant_id = id, "tenant removed");
    Ok(Redirect::to(&format!("/properties/{}", tenant.property_id)))
}

async fn find_tenant(state: &AppState, id: i64) -> AppResult<Tenant> {
    state
        .tenant_repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("tenant {}", id)))
}
