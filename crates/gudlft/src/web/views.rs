//! HTML pages.
//!
//! Pages are assembled with `format!`; every piece of club or competition
//! data goes through [`escape`] first.

use std::fmt::Write as _;

use chrono::NaiveDateTime;

use crate::booking::BookingPage;
use crate::model::{Club, Competition};

/// Severity of a flash message, used as its CSS class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlashLevel {
    /// The action succeeded.
    Success,
    /// The action was refused.
    Error,
}

impl FlashLevel {
    fn css_class(self) -> &'static str {
        match self {
            Self::Success => "flash-success",
            Self::Error => "flash-error",
        }
    }
}

/// A one-shot message shown at the top of the page rendered for a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flash {
    /// Severity.
    pub level: FlashLevel,
    /// Text shown to the club.
    pub message: String,
}

impl Flash {
    /// A success message.
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: FlashLevel::Success,
            message: message.into(),
        }
    }

    /// An error message.
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: FlashLevel::Error,
            message: message.into(),
        }
    }
}

/// Escape text for use in HTML element content and double-quoted attributes.
#[must_use]
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Percent-encode one URL path segment.
#[must_use]
pub fn encode_segment(segment: &str) -> String {
    let mut out = String::with_capacity(segment.len());
    for byte in segment.bytes() {
        if byte.is_ascii_alphanumeric() || matches!(byte, b'-' | b'_' | b'.' | b'~') {
            out.push(char::from(byte));
        } else {
            let _ = write!(out, "%{byte:02X}");
        }
    }
    out
}

fn layout(title: &str, flashes: &[Flash], body: &str) -> String {
    let mut messages = String::new();
    if !flashes.is_empty() {
        messages.push_str("<ul class=\"flashes\">");
        for flash in flashes {
            let _ = write!(
                messages,
                "<li class=\"{}\">{}</li>",
                flash.level.css_class(),
                escape(&flash.message)
            );
        }
        messages.push_str("</ul>");
    }
    format!(
        "<!doctype html><html lang=\"en\"><head><meta charset=\"utf-8\">\
<title>{} | GUDLFT</title></head><body>{messages}{body}</body></html>",
        escape(title)
    )
}

/// The login page.
#[must_use]
pub fn index_page(flashes: &[Flash]) -> String {
    layout(
        "GUDLFT Registration",
        flashes,
        "<h1>Welcome to the GUDLFT Registration Portal!</h1>\
<p>Please enter your secretary email to continue:</p>\
<form action=\"/showSummary\" method=\"post\">\
<label for=\"email\">Email:</label>\
<input type=\"email\" name=\"email\" id=\"email\">\
<button type=\"submit\">Enter</button>\
</form>\
<p><a href=\"/pointsDisplay\">View club points</a></p>",
    )
}

/// The club dashboard: balance and the list of competitions.
#[must_use]
pub fn welcome_page(
    club: &Club,
    competitions: &[Competition],
    now: NaiveDateTime,
    flashes: &[Flash],
) -> String {
    let mut list = String::new();
    for competition in competitions {
        let action = if competition.is_past(now) {
            "<span class=\"closed\">Competition over</span>".to_string()
        } else if !competition.has_places() {
            "<span class=\"closed\">Sold out</span>".to_string()
        } else {
            format!(
                "<a href=\"/book/{}/{}\">Book Places</a>",
                encode_segment(&competition.name),
                encode_segment(&club.name)
            )
        };
        let _ = write!(
            list,
            "<li>{}<br>Date: {}<br>Number of Places: {}<br>{action}</li>",
            escape(&competition.name),
            competition.date_label(),
            competition.number_of_places
        );
    }
    if list.is_empty() {
        list.push_str("<li>No competitions scheduled.</li>");
    }

    let body = format!(
        "<h2>Welcome, {}</h2><a href=\"/logout\">Logout</a>\
<p>Points available: {}</p>\
<h3>Competitions:</h3><ul>{list}</ul>",
        escape(&club.email),
        club.points
    );
    layout("Summary", flashes, &body)
}

/// The booking form for one club and one competition.
#[must_use]
pub fn booking_page(page: &BookingPage) -> String {
    let competition = escape(&page.competition.name);
    let club = escape(&page.club.name);
    let body = format!(
        "<h2>Booking for {competition}</h2>\
<p>Places available: {}</p>\
<p>Points available: {}</p>\
<form action=\"/purchasePlaces\" method=\"post\">\
<input type=\"hidden\" name=\"club\" value=\"{club}\">\
<input type=\"hidden\" name=\"competition\" value=\"{competition}\">\
<label for=\"places\">How many places?</label>\
<input type=\"number\" name=\"places\" id=\"places\" min=\"1\" max=\"{}\">\
<button type=\"submit\">Book</button>\
</form>",
        page.competition.number_of_places, page.club.points, page.max_places
    );
    layout(&format!("Booking for {}", page.competition.name), &[], &body)
}

/// The public points board.
#[must_use]
pub fn points_page(clubs: &[Club]) -> String {
    let mut rows = String::new();
    for club in clubs {
        let _ = write!(
            rows,
            "<tr><td>{}</td><td>{}</td></tr>",
            escape(&club.name),
            club.points
        );
    }
    let body = format!(
        "<h1>Club Points</h1>\
<table><thead><tr><th>Club</th><th>Points</th></tr></thead><tbody>{rows}</tbody></table>\
<p><a href=\"/\">Back to login</a></p>"
    );
    layout("Club Points", &[], &body)
}

/// Page for unknown routes.
#[must_use]
pub fn not_found_page() -> String {
    layout(
        "Not Found",
        &[],
        "<h1>Page not found</h1><p><a href=\"/\">Back to login</a></p>",
    )
}
