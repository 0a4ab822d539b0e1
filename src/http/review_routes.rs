//! Property reviews. Anyone may leave one (no account needed); the owner
//! may respond, but reviews are never deleted.

use crate::error::{AppError, AppResult};
use crate::http::extract::AuthUser;
use crate::http::owned_property;
use crate::models::{OwnerReview, RatingSummary, Review};
use crate::repositories::NewReview;
use crate::AppState;
use axum::extract::{Path, State};
use axum::response::Redirect;
use axum::{Form, Json};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;

#[derive(Debug, Deserialize)]
pub struct ReviewForm {
    pub reviewer_name: String,
    pub reviewer_email: Option<String>,
    pub rating: Option<String>,
    pub comment: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ResponseForm {
    pub response: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PropertyReviews {
    pub reviews: Vec<Review>,
    pub summary: Option<RatingSummary>,
}

#[derive(Debug, Serialize)]
pub struct ReceivedReviews {
    pub reviews: Vec<OwnerReview>,
    pub total_reviews: i64,
    pub pending_responses: i64,
    pub overall_average: Option<f64>,
}

/// `GET /properties/{id}/reviews` — reviews plus the rating summary
pub async fn list(
    State(state): State<AppState>,
    Path(property_id): Path<i64>,
) -> AppResult<Json<PropertyReviews>> {
    state
        .property_repo
        .find_by_id(property_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("property {}", property_id)))?;

    let reviews = state.review_repo.list_for_property(property_id).await?;
    let summary = state.review_repo.average_for_property(property_id).await?;

    Ok(Json(PropertyReviews { reviews, summary }))
}

/// `POST /properties/{id}/reviews` — leave a review; no login required
pub async fn create(
    State(state): State<AppState>,
    Path(property_id): Path<i64>,
    Form(form): Form<ReviewForm>,
) -> AppResult<Redirect> {
    state
        .property_repo
        .find_by_id(property_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("property {}", property_id)))?;

    let reviewer_name = form.reviewer_name.trim();
    if reviewer_name.is_empty() {
        return Err(AppError::Validation("reviewer_name is required".to_string()));
    }

    let rating = form
        .rating
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| AppError::Validation("rating is required".to_string()))?
        .parse::<i64>()
        .map_err(|_| AppError::Validation("rating is not a valid number".to_string()))?;

    if !(1..=5).contains(&rating) {
        return Err(AppError::Validation(
            "rating must be between 1 and 5".to_string(),
        ));
    }

    let review = state
        .review_repo
        .create(NewReview {
            property_id,
            reviewer_name: reviewer_name.to_string(),
            reviewer_email: form
                .reviewer_email
                .map(|e| e.trim().to_string())
                .filter(|e| !e.is_empty()),
            rating,
            comment: form
                .comment
                .map(|c| c.trim().to_string())
                .filter(|c| !c.is_empty()),
        })
        .await?;

    info!(review_id = review.id, property_id, rating, "review posted");
    Ok(Redirect::to(&format!("/properties/{}/reviews", property_id)))
}

/// `POST /reviews/{id}/respond` — owner of the reviewed property only
pub async fn respond(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<i64>,
    Form(form): Form<ResponseForm>,
) -> AppResult<Redirect> {
    let review = state
        .review_repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("review {}", id)))?;

    owned_property(&state, review.property_id, &user).await?;

    let response = form
        .response
        .as_deref()
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .ok_or_else(|| AppError::Validation("response cannot be empty".to_string()))?
        .to_string();

    state
        .review_repo
        .set_owner_response(id, &response, Utc::now().naive_utc())
        .await?;

    info!(review_id = id, "review answered");
    Ok(Redirect::to(&format!(
        "/properties/{}/reviews",
        review.property_id
    )))
}

/// `POST /reviews/{id}/delete` — refused for everyone; reviews stay on
/// the record once posted
pub async fn delete(AuthUser(_user): AuthUser, Path(_id): Path<i64>) -> AppResult<Redirect> {
    Err(AppError::Forbidden(
        "reviews cannot be deleted".to_string(),
    ))
}

/// `GET /reviews/received` — owners only: every review across their
/// properties, with response backlog and the overall average
pub async fn received(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> AppResult<Json<ReceivedReviews>> {
    if !user.is_owner() {
        return Err(AppError::Forbidden(
            "only owners receive reviews".to_string(),
        ));
    }

    let reviews = state.review_repo.list_for_owner(user.id).await?;

    let total_reviews = reviews.len() as i64;
    let pending_responses = reviews.iter().filter(|r| r.owner_response.is_none()).count() as i64;
    let overall_average = if reviews.is_empty() {
        None
    } else {
        let sum: i64 = reviews.iter().map(|r| r.rating).sum();
        Some((sum as f64 / total_reviews as f64 * 100.0).round() / 100.0)
    };

    Ok(Json(ReceivedReviews {
        reviews,
        total_reviews,
        pending_responses,
        overall_average,
    }))
}
