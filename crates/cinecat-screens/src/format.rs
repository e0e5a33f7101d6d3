//! Display formatting for movie fields.

use chrono::NaiveDate;
use cinecat_api::tmdb::{IMAGE_BASE_URL, MOVIE_PAGE_BASE_URL};

/// Placeholder for a missing or unparseable release date.
pub const UNAVAILABLE_LABEL: &str = "Indisponível";

/// Formats a TMDB release date (`YYYY-MM-DD`) as `DD/MM/YYYY`.
///
/// Empty or malformed input yields [`UNAVAILABLE_LABEL`].
#[must_use]
pub fn format_release_date(release_date: &str) -> String {
    let trimmed = release_date.trim();
    if trimmed.is_empty() {
        return String::from(UNAVAILABLE_LABEL);
    }

    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").map_or_else(
        |err| {
            tracing::debug!(release_date = trimmed, %err, "unparseable release date");
            String::from(UNAVAILABLE_LABEL)
        },
        |date| date.format("%d/%m/%Y").to_string(),
    )
}

/// Formats a vote average as `X.Y/10`.
#[must_use]
pub fn format_vote_average(vote_average: f64) -> String {
    format!("{}/10", to_one_decimal(vote_average))
}

/// Rounds to one decimal place from the exact binary value, halves away
/// from zero, so `7.25` renders as `7.3` and `0.15` (stored slightly below
/// the half) renders as `0.1`.
fn to_one_decimal(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }

    let exact = format!("{:.60}", value.abs());
    let Some((whole, fraction)) = exact.split_once('.') else {
        return format!("{value:.1}");
    };
    let mut digits = fraction.chars().filter_map(|c| c.to_digit(10));
    let tenths = digits.next().unwrap_or(0);
    let hundredths = digits.next().unwrap_or(0);

    let scaled = whole
        .parse::<u64>()
        .ok()
        .and_then(|whole| whole.checked_mul(10))
        .and_then(|n| n.checked_add(u64::from(tenths)))
        .and_then(|n| n.checked_add(u64::from(hundredths >= 5)));
    let Some(scaled) = scaled else {
        return format!("{value:.1}");
    };

    let sign = if value < 0.0 { "-" } else { "" };
    #[allow(clippy::arithmetic_side_effects)]
    let (int_part, tenth) = (scaled / 10, scaled % 10);
    format!("{sign}{int_part}.{tenth}")
}

/// Builds the full poster URL for a TMDB image path.
///
/// Returns `None` when the path is absent or empty.
#[must_use]
pub fn image_url(path: Option<&str>) -> Option<String> {
    path.filter(|path| !path.is_empty())
        .map(|path| format!("{IMAGE_BASE_URL}{path}"))
}

/// Builds the public TMDB page URL for a movie.
#[must_use]
pub fn movie_page_url(movie_id: u64) -> String {
    format!("{MOVIE_PAGE_BASE_URL}/{movie_id}")
}
