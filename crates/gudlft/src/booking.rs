//! Booking rules.
//!
//! [`book`] guards the booking page and [`purchase_places`] validates and
//! applies a purchase. Both take the current time as an argument so callers
//! decide what "now" is.
//!
//! A purchase is checked in a fixed order and the first failing check is the
//! one reported:
//!
//! 1. the club and the competition exist
//! 2. the quantity is a whole number
//! 3. the quantity is positive
//! 4. the competition has not taken place yet
//! 5. the club stays within the per-competition maximum
//! 6. the club has enough points
//! 7. the competition has enough places
//!
//! A rejected purchase leaves the dataset untouched.

use chrono::NaiveDateTime;
use serde::Deserialize;
use tracing::{info, warn};

use crate::config::BookingRules;
use crate::dataset::Dataset;
use crate::error::BookingError;
use crate::model::{Club, Competition};

/// Flash message shown after a successful purchase.
pub const BOOKING_COMPLETE: &str = "Great-booking complete!";

/// A purchase as submitted from the booking form.
///
/// `places` is kept as raw text; parsing it is part of validation.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PurchaseRequest {
    /// Name of the purchasing club.
    pub club: String,
    /// Name of the competition.
    pub competition: String,
    /// Requested number of places, as typed.
    pub places: String,
}

impl PurchaseRequest {
    /// Create a purchase request.
    #[must_use]
    pub fn new(
        club: impl Into<String>,
        competition: impl Into<String>,
        places: impl Into<String>,
    ) -> Self {
        Self {
            club: club.into(),
            competition: competition.into(),
            places: places.into(),
        }
    }
}

/// What the booking page needs to render its form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingPage {
    /// The club making the booking.
    pub club: Club,
    /// The competition being booked.
    pub competition: Competition,
    /// Largest quantity the club could currently purchase.
    pub max_places: u32,
}

/// Outcome of an accepted purchase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receipt {
    /// Name of the purchasing club.
    pub club: String,
    /// Name of the competition.
    pub competition: String,
    /// Places purchased by this request.
    pub places: u32,
    /// Points charged.
    pub cost: u32,
    /// Club points after the purchase.
    pub points_left: u32,
    /// Competition places after the purchase.
    pub places_left: u32,
}

/// Resolve the booking page for `club_name` and `competition_name`.
///
/// # Errors
///
/// [`BookingError::NotFound`] if either name is unknown,
/// [`BookingError::CompetitionPassed`] if the competition is in the past.
pub fn book(
    dataset: &Dataset,
    competition_name: &str,
    club_name: &str,
    now: NaiveDateTime,
    rules: &BookingRules,
) -> Result<BookingPage, BookingError> {
    let (Some(club), Some(competition)) = (
        dataset.club_by_name(club_name),
        dataset.competition_by_name(competition_name),
    ) else {
        warn!(
            club = club_name,
            competition = competition_name,
            "Booking page for unknown club or competition"
        );
        return Err(BookingError::NotFound);
    };

    if competition.is_past(now) {
        warn!(
            club = %club.name,
            competition = %competition.name,
            date = %competition.date_label(),
            "Booking page for past competition"
        );
        return Err(BookingError::CompetitionPassed);
    }

    let booked = dataset.booked_places(&club.name, &competition.name);
    let max_places = rules
        .max_places_per_competition
        .saturating_sub(booked)
        .min(club.points.checked_div(rules.points_per_place).unwrap_or(u32::MAX))
        .min(competition.number_of_places);

    Ok(BookingPage {
        club: club.clone(),
        competition: competition.clone(),
        max_places,
    })
}

/// Validate a purchase and, if every check passes, deduct the club's points
/// and the competition's places.
///
/// # Errors
///
/// Returns the first [`BookingError`] in check order; see the module docs.
pub fn purchase_places(
    dataset: &mut Dataset,
    request: &PurchaseRequest,
    now: NaiveDateTime,
    rules: &BookingRules,
) -> Result<Receipt, BookingError> {
    let result = check_purchase(dataset, request, now, rules);
    match &result {
        Ok((club, competition, places, cost)) => {
            dataset.commit_booking(*club, *competition, *places, *cost);
        }
        Err(reason) => {
            warn!(
                club = %request.club,
                competition = %request.competition,
                places = %request.places,
                %reason,
                "Purchase rejected"
            );
        }
    }
    let (club, competition, places, cost) = result?;

    let club = dataset.club_at(club);
    let competition = dataset.competition_at(competition);
    info!(
        club = %club.name,
        competition = %competition.name,
        places,
        cost,
        "Purchase complete"
    );

    Ok(Receipt {
        club: club.name.clone(),
        competition: competition.name.clone(),
        places,
        cost,
        points_left: club.points,
        places_left: competition.number_of_places,
    })
}

/// Run the checks without mutating anything.
///
/// Returns the club index, competition index, places and cost.
fn check_purchase(
    dataset: &Dataset,
    request: &PurchaseRequest,
    now: NaiveDateTime,
    rules: &BookingRules,
) -> Result<(usize, usize, u32, u32), BookingError> {
    let (Some(club_idx), Some(competition_idx)) = (
        dataset.club_index(&request.club),
        dataset.competition_index(&request.competition),
    ) else {
        return Err(BookingError::NotFound);
    };
    let club = dataset.club_at(club_idx);
    let competition = dataset.competition_at(competition_idx);

    let requested: i64 = request
        .places
        .trim()
        .parse()
        .map_err(|_| BookingError::InvalidNumber)?;

    if requested <= 0 {
        return Err(BookingError::NonPositive);
    }

    if competition.is_past(now) {
        return Err(BookingError::CompetitionOver);
    }

    let over_limit = BookingError::OverLimit {
        max: rules.max_places_per_competition,
    };
    let places = u32::try_from(requested).map_err(|_| over_limit.clone())?;
    let booked = dataset.booked_places(&club.name, &competition.name);
    if booked.saturating_add(places) > rules.max_places_per_competition {
        return Err(over_limit);
    }

    let cost = places
        .checked_mul(rules.points_per_place)
        .ok_or(BookingError::NotEnoughPoints)?;
    if !club.can_afford(cost) {
        return Err(BookingError::NotEnoughPoints);
    }

    if places > competition.number_of_places {
        return Err(BookingError::NotEnoughPlaces);
    }

    Ok((club_idx, competition_idx, places, cost))
}
