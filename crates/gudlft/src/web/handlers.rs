use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::Form;
use chrono::NaiveDateTime;
use serde::Deserialize;
use tracing::{info, warn};

use super::views::{self, Flash};
use super::AppState;
use crate::booking::{self, PurchaseRequest, BOOKING_COMPLETE};
use crate::dataset::Dataset;
use crate::error::BookingError;

/// Message shown when a login email matches no club.
pub(crate) const UNKNOWN_EMAIL: &str = "Sorry, that email was not found (Unknown email).";

#[derive(Debug, Deserialize)]
pub(crate) struct LoginForm {
    email: String,
}

pub(crate) async fn index_handler() -> Html<String> {
    Html(views::index_page(&[]))
}

pub(crate) async fn show_summary_handler(
    State(state): State<AppState>,
    Form(form): Form<LoginForm>,
) -> Html<String> {
    let dataset = state.dataset.read().await;
    match dataset.club_by_email(&form.email) {
        Some(club) => {
            info!(club = %club.name, "Club logged in");
            Html(views::welcome_page(
                club,
                dataset.competitions(),
                state.now(),
                &[],
            ))
        }
        None => {
            warn!(email = %form.email, "Login with unknown email");
            Html(views::index_page(&[Flash::error(UNKNOWN_EMAIL)]))
        }
    }
}

pub(crate) async fn book_handler(
    State(state): State<AppState>,
    Path((competition, club)): Path<(String, String)>,
) -> Response {
    let dataset = state.dataset.read().await;
    let now = state.now();
    match booking::book(&dataset, &competition, &club, now, &state.rules) {
        Ok(page) => Html(views::booking_page(&page)).into_response(),
        Err(BookingError::NotFound) => not_found(&dataset, &club, now),
        Err(reason) => refused(&dataset, &club, now, &reason),
    }
}

pub(crate) async fn purchase_places_handler(
    State(state): State<AppState>,
    Form(request): Form<PurchaseRequest>,
) -> Response {
    let mut dataset = state.dataset.write().await;
    let now = state.now();
    match booking::purchase_places(&mut dataset, &request, now, &state.rules) {
        Ok(receipt) => match dataset.club_by_name(&receipt.club) {
            Some(club) => Html(views::welcome_page(
                club,
                dataset.competitions(),
                now,
                &[Flash::success(BOOKING_COMPLETE)],
            ))
            .into_response(),
            None => not_found(&dataset, &request.club, now),
        },
        Err(BookingError::NotFound) => not_found(&dataset, &request.club, now),
        Err(reason) => refused(&dataset, &request.club, now, &reason),
    }
}

pub(crate) async fn points_display_handler(State(state): State<AppState>) -> Html<String> {
    let dataset = state.dataset.read().await;
    Html(views::points_page(dataset.clubs()))
}

pub(crate) async fn logout_handler() -> Response {
    (StatusCode::FOUND, [(header::LOCATION, "/")]).into_response()
}

pub(crate) async fn fallback_handler() -> Response {
    (StatusCode::NOT_FOUND, Html(views::not_found_page())).into_response()
}

/// 404 carrying the generic "something went wrong" flash.
///
/// Shows the club's dashboard when the club itself is known, the login page
/// otherwise.
fn not_found(dataset: &Dataset, club: &str, now: NaiveDateTime) -> Response {
    let flash = [Flash::error(BookingError::NotFound.to_string())];
    let page = match dataset.club_by_name(club) {
        Some(club) => views::welcome_page(club, dataset.competitions(), now, &flash),
        None => views::index_page(&flash),
    };
    (StatusCode::NOT_FOUND, Html(page)).into_response()
}

/// Dashboard with the refusal reason.
fn refused(dataset: &Dataset, club: &str, now: NaiveDateTime, reason: &BookingError) -> Response {
    let flash = [Flash::error(reason.to_string())];
    match dataset.club_by_name(club) {
        Some(club) => {
            Html(views::welcome_page(club, dataset.competitions(), now, &flash)).into_response()
        }
        None => Html(views::index_page(&flash)).into_response(),
    }
}
