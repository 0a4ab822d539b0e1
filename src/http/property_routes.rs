//! Listing feed and property CRUD.

use crate::error::{AppError, AppResult};
use crate::http::extract::{AuthUser, OptionalUser};
use crate::http::{owned_property, read_multipart, FormData};
use crate::models::{ListingKind, PropertyListing};
use crate::repositories::{NewProperty, PropertyUpdate};
use crate::uploads;
use crate::AppState;
use axum::extract::{Multipart, Path, Query, State};
use axum::response::Redirect;
use axum::Json;
use chrono::Local;
use serde::{Deserialize, Serialize};
use tracing::info;

#[derive(Debug, Deserialize)]
pub struct ListingFilter {
    pub kind: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PropertyDetail {
    #[serde(flatten)]
    pub listing: PropertyListing,
    /// Access keys and tenant management are shown to the owner only
    pub show_keys: bool,
}

/// `GET /` — the listing feed. Also runs the daily payment-reminder check;
/// its outcome never fails the page.
pub async fn index(
    State(state): State<AppState>,
    OptionalUser(user): OptionalUser,
    Query(filter): Query<ListingFilter>,
) -> AppResult<Json<Vec<PropertyListing>>> {
    state
        .reminders
        .run_due_checks(Local::now().date_naive())
        .await;

    let is_bidder = user.as_ref().is_some_and(|u| u.is_bidder());

    // Bidders and anonymous visitors browse everything; owners see their own
    let mut listings = match &user {
        Some(u) if !is_bidder => state.property_repo.list_by_owner(u.id).await?,
        _ => state.property_repo.list_all().await?,
    };

    match filter.kind.as_deref().filter(|k| !k.is_empty() && *k != "all") {
        Some(kind) => {
            let wanted = ListingKind::from_str(kind).map_err(AppError::Validation)?;
            listings.retain(|l| l.kind_enum().matches_filter(wanted));
        }
        None => {
            // Occupied homes stay hidden from non-bidders browsing without
            // a filter
            if user.is_some() && !is_bidder {
                listings.retain(|l| l.kind_enum() != ListingKind::Occupied);
            }
        }
    }

    for listing in &mut listings {
        listing.tenants = state.tenant_repo.list_by_property(listing.id).await?;
    }

    Ok(Json(listings))
}

/// `GET /properties/{id}` — property detail with tenants
pub async fn detail(
    State(state): State<AppState>,
    OptionalUser(user): OptionalUser,
    Path(id): Path<i64>,
) -> AppResult<Json<PropertyDetail>> {
    let mut listing = state
        .property_repo
        .find_listing_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("property {}", id)))?;

    listing.tenants = state.tenant_repo.list_by_property(id).await?;

    let show_keys = user.is_some_and(|u| u.id == listing.owner_id);

    Ok(Json(PropertyDetail { listing, show_keys }))
}

/// `POST /properties` — list a new property (multipart, optional photo)
pub async fn create(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    multipart: Multipart,
) -> AppResult<Redirect> {
    let form = read_multipart(multipart, "photo").await?;

    let street = form.require("street")?;
    let (listing_kind, rent_price, sale_price) = listing_fields(&form)?;
    let photo = store_photo(&state, &form).await?;

    let property = state
        .property_repo
        .create(NewProperty {
            owner_id: user.id,
            street,
            street_number: form.get("street_number").unwrap_or_default().to_string(),
            listing_kind: listing_kind.as_str().to_string(),
            photo,
            rent_price,
            sale_price,
        })
        .await?;

    info!(property_id = property.id, owner_id = user.id, "property listed");
    Ok(Redirect::to("/"))
}

/// `POST /properties/{id}/update` — owner only
pub async fn update(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<i64>,
    multipart: Multipart,
) -> AppResult<Redirect> {
    let property = owned_property(&state, id, &user).await?;

    let form = read_multipart(multipart, "photo").await?;

    let street = form.require("street")?;
    let (listing_kind, rent_price, sale_price) = listing_fields(&form)?;

    // A fresh upload replaces the photo, otherwise the old one stays
    let photo = match store_photo(&state, &form).await? {
        Some(stored) => Some(stored),
        None => property.photo,
    };

    state
        .property_repo
        .update(
            id,
            PropertyUpdate {
                street,
                street_number: form.get("street_number").unwrap_or_default().to_string(),
                listing_kind: listing_kind.as_str().to_string(),
                photo,
                rent_price,
                sale_price,
            },
        )
        .await?;

    info!(property_id = id, "property updated");
    Ok(Redirect::to("/"))
}

/// `POST /properties/{id}/delete` — owner only
pub async fn delete(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<i64>,
) -> AppResult<Redirect> {
    owned_property(&state, id, &user).await?;

    state.property_repo.delete(id).await?;

    info!(property_id = id, "property deleted");
    Ok(Redirect::to("/"))
}

fn listing_fields(form: &FormData) -> AppResult<(ListingKind, Option<f64>, Option<f64>)> {
    let listing_kind = match form.get("listing_kind") {
        None => ListingKind::Rent,
        Some(kind) => ListingKind::from_str(kind).map_err(AppError::Validation)?,
    };

    Ok((listing_kind, form.get_f64("rent_price")?, form.get_f64("sale_price")?))
}

async fn store_photo(state: &AppState, form: &FormData) -> AppResult<Option<String>> {
    match &form.file {
        Some((filename, bytes)) => {
            Ok(Some(uploads::save_upload(&state.config.upload.dir, filename, bytes).await?))
        }
        None => Ok(None),
    }
}
