// crates/lobotomy-core/src/runtime/timestamp.rs
// ============================================================================
// Module: Timestamp Parsing
// Description: Lenient parsing of configured timestamp values.
// Purpose: Turn text and epoch numbers into timezone-aware instants.
// Dependencies: time
// ============================================================================

//! ## Overview
//! Configuration files write timestamps loosely. Accepted forms:
//!
//! - RFC 3339 with `Z` or a `+hh:mm` offset.
//! - ISO 8601 offsets written compactly (`+hhmm`) or as hours only (`+hh`).
//! - Naive date-times with seconds, fractional seconds, or minutes only.
//! - The ISO 8601 basic form `YYYYMMDDThhmmss`, optionally ending in `Z`.
//! - A bare `YYYY-MM-DD` date, read as midnight.
//! - Epoch seconds.
//!
//! The date and time may be separated by `T` or a space. Naive forms are
//! interpreted as UTC.

// ============================================================================
// SECTION: Imports
// ============================================================================

use time::Date;
use time::OffsetDateTime;
use time::PrimitiveDateTime;
use time::format_description::BorrowedFormatItem;
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;

// ============================================================================
// SECTION: Formats
// ============================================================================

/// Bare calendar date.
const DATE_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

/// Naive date-time without fractional seconds.
const NAIVE_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]");

/// Naive date-time with fractional seconds.
const NAIVE_SUBSECOND_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond]");

/// Naive date-time with minute precision.
const NAIVE_MINUTE_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]");

/// Offset written as `+hhmm`.
const HHMM_OFFSET: &[BorrowedFormatItem<'static>] =
    format_description!("[offset_hour sign:mandatory][offset_minute]");

/// Offset written as `+hh`.
const HH_OFFSET: &[BorrowedFormatItem<'static>] =
    format_description!("[offset_hour sign:mandatory]");

/// Date-time with a `+hhmm` offset.
const COMPACT_OFFSET_FORMAT: &[BorrowedFormatItem<'static>] =
    &[BorrowedFormatItem::Compound(NAIVE_FORMAT), BorrowedFormatItem::Compound(HHMM_OFFSET)];

/// Date-time with fractional seconds and a `+hhmm` offset.
const COMPACT_OFFSET_SUBSECOND_FORMAT: &[BorrowedFormatItem<'static>] = &[
    BorrowedFormatItem::Compound(NAIVE_SUBSECOND_FORMAT),
    BorrowedFormatItem::Compound(HHMM_OFFSET),
];

/// Date-time with a `+hh` offset.
const HOUR_OFFSET_FORMAT: &[BorrowedFormatItem<'static>] =
    &[BorrowedFormatItem::Compound(NAIVE_FORMAT), BorrowedFormatItem::Compound(HH_OFFSET)];

/// Date-time with fractional seconds and a `+hh` offset.
const HOUR_OFFSET_SUBSECOND_FORMAT: &[BorrowedFormatItem<'static>] = &[
    BorrowedFormatItem::Compound(NAIVE_SUBSECOND_FORMAT),
    BorrowedFormatItem::Compound(HH_OFFSET),
];

/// ISO 8601 basic form in UTC.
const BASIC_UTC_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year][month][day]T[hour][minute][second]Z");

/// ISO 8601 basic form without an offset.
const BASIC_NAIVE_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year][month][day]T[hour][minute][second]");

// ============================================================================
// SECTION: Parsing
// ============================================================================

/// Parses a timestamp string in any accepted textual form.
#[must_use]
pub fn parse_timestamp(text: &str) -> Option<OffsetDateTime> {
    let text = text.trim();
    if let Ok(instant) = OffsetDateTime::parse(text, &Rfc3339) {
        return Some(instant);
    }
    let normalized = text.replacen(' ', "T", 1);
    if let Ok(instant) = OffsetDateTime::parse(&normalized, &Rfc3339) {
        return Some(instant);
    }
    for format in [
        COMPACT_OFFSET_SUBSECOND_FORMAT,
        COMPACT_OFFSET_FORMAT,
        HOUR_OFFSET_SUBSECOND_FORMAT,
        HOUR_OFFSET_FORMAT,
    ] {
        if let Ok(instant) = OffsetDateTime::parse(&normalized, &format) {
            return Some(instant);
        }
    }
    for format in [
        NAIVE_SUBSECOND_FORMAT,
        NAIVE_FORMAT,
        NAIVE_MINUTE_FORMAT,
        BASIC_UTC_FORMAT,
        BASIC_NAIVE_FORMAT,
    ] {
        if let Ok(naive) = PrimitiveDateTime::parse(&normalized, &format) {
            return Some(naive.assume_utc());
        }
    }
    if let Ok(date) = Date::parse(text, &DATE_FORMAT) {
        return Some(date.midnight().assume_utc());
    }
    text.parse::<f64>().ok().and_then(timestamp_from_epoch)
}

/// Converts epoch seconds into a UTC instant.
#[must_use]
#[allow(clippy::cast_possible_truncation, reason = "Nanosecond epochs fit in i128.")]
pub fn timestamp_from_epoch(seconds: f64) -> Option<OffsetDateTime> {
    if !seconds.is_finite() {
        return None;
    }
    let nanos = (seconds * 1_000_000_000.0).round() as i128;
    OffsetDateTime::from_unix_timestamp_nanos(nanos).ok()
}

/// Renders an instant as RFC 3339 text.
#[must_use]
pub fn format_timestamp(instant: OffsetDateTime) -> Option<String> {
    instant.format(&Rfc3339).ok()
}

// ============================================================================
// SECTION: Tests
// ============================================================================
