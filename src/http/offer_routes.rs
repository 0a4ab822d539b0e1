//! Offer flows: bidders send offers on properties, owners read and answer
//! them. Owner replies are mailed to the bidder best-effort.

use crate::error::{AppError, AppResult};
use crate::http::extract::AuthUser;
use crate::http::owned_property;
use crate::models::{Offer, ReceivedOffer, SentOffer};
use crate::notifier::templates;
use crate::repositories::NewOffer;
use crate::AppState;
use axum::extract::{Path, State};
use axum::response::Redirect;
use axum::{Form, Json};
use chrono::Utc;
use serde::Deserialize;
use tracing::{info, warn};

#[derive(Debug, Deserialize)]
pub struct OfferForm {
    pub message: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ReplyForm {
    pub reply: Option<String>,
}

/// `POST /properties/{id}/offers` — bidders only; contact details come
/// from the account, not the form
pub async fn create(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(property_id): Path<i64>,
    Form(form): Form<OfferForm>,
) -> AppResult<Redirect> {
    if !user.is_bidder() {
        return Err(AppError::Forbidden(format!(
            "only bidders can send offers; your account is of type {}",
            user.role
        )));
    }

    state
        .property_repo
        .find_by_id(property_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("property {}", property_id)))?;

    let message = form
        .message
        .as_deref()
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .ok_or_else(|| AppError::Validation("message is required".to_string()))?
        .to_string();

    let offer = state
        .offer_repo
        .create(NewOffer {
            property_id,
            bidder_id: user.id,
            name: user.username.clone(),
            email: user.email.clone(),
            phone: form.phone.filter(|p| !p.trim().is_empty()),
            message,
        })
        .await?;

    info!(offer_id = offer.id, property_id, bidder_id = user.id, "offer sent");
    Ok(Redirect::to("/"))
}

/// `GET /offers/received` — offers on the caller's properties; viewing
/// marks them read
pub async fn received(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> AppResult<Json<Vec<ReceivedOffer>>> {
    let offers = state.offer_repo.received_by_owner(user.id).await?;

    for offer in &offers {
        if !offer.is_read {
            state.offer_repo.mark_read(offer.id).await?;
        }
    }

    Ok(Json(offers))
}

/// `GET /offers/sent` — bidders only; viewing marks owner replies read
pub async fn sent(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> AppResult<Json<Vec<SentOffer>>> {
    if !user.is_bidder() {
        return Err(AppError::Forbidden(
            "only bidders can list sent offers".to_string(),
        ));
    }

    let offers = state.offer_repo.sent_by_bidder(user.id).await?;

    for offer in &offers {
        if offer.has_unread_reply() {
            state.offer_repo.mark_reply_read(offer.id).await?;
        }
    }

    Ok(Json(offers))
}

/// `POST /offers/{id}/respond` — owner of the offered property only;
/// stores the reply and emails the bidder
pub async fn respond(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<i64>,
    Form(form): Form<ReplyForm>,
) -> AppResult<Redirect> {
    let offer = find_offer(&state, id).await?;
    let property = owned_property(&state, offer.property_id, &user).await?;

    let reply = form
        .reply
        .as_deref()
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .ok_or_else(|| AppError::Validation("reply cannot be empty".to_string()))?
        .to_string();

    state
        .offer_repo
        .set_reply(id, &reply, Utc::now().naive_utc())
        .await?;

    // Notify the bidder; a relay failure does not undo the stored reply
    let message =
        templates::offer_reply_email(&offer.email, &user.display_name(), &property.street, &reply);
    if let Err(e) = state.mailer.send(&message).await {
        warn!(offer_id = id, "offer reply email not sent: {}", e);
    }

    info!(offer_id = id, "offer answered");
    Ok(Redirect::to("/offers/received"))
}

/// `POST /offers/{id}/delete` — owner of the offered property only
pub async fn delete(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<i64>,
) -> AppResult<Redirect> {
    let offer = find_offer(&state, id).await?;
    owned_property(&state, offer.property_id, &user).await?;

    state.offer_repo.delete(id).await?;

    info!(offer_id = id, "offer deleted");
    Ok(Redirect::to("/offers/received"))
}

async fn find_offer(state: &AppState, id: i64) -> AppResult<Offer> {
    state
        .offer_repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("offer {}", id)))
}
