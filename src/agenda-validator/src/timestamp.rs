//! Timestamp parsing and the signature freshness window.

use std::time::Duration;

use time::{
    format_description::well_known::{Iso8601, Rfc3339},
    OffsetDateTime,
};

use crate::{config::SIGNATURE_VALID_DURATION, errors::TimestampError};

/// Parse an ISO-8601 timestamp with an explicit offset (`Z` or `+hh:mm`).
pub fn parse_timestamp(value: &str) -> Result<OffsetDateTime, TimestampError> {
    OffsetDateTime::parse(value, &Rfc3339)
        .or_else(|_| OffsetDateTime::parse(value, &Iso8601::DEFAULT))
        .map_err(|_| TimestampError::Invalid(value.to_string()))
}

fn format_rfc3339(t: OffsetDateTime) -> String {
    t.format(&Rfc3339).unwrap_or_else(|_| t.to_string())
}

/// Check `timestamp` against the current time using the default one-hour window.
pub fn validate_signature_timestamp(timestamp: &str) -> Result<OffsetDateTime, TimestampError> {
    validate_signature_timestamp_at(
        timestamp,
        OffsetDateTime::now_utc(),
        SIGNATURE_VALID_DURATION,
    )
}

/// Fails if `timestamp` is unparseable or further than `window` from `now` in either direction.
/// A timestamp exactly `window` away is still accepted.
pub fn validate_signature_timestamp_at(
    timestamp: &str,
    now: OffsetDateTime,
    window: Duration,
) -> Result<OffsetDateTime, TimestampError> {
    let signed = parse_timestamp(timestamp)?;
    let window_td = time::Duration::try_from(window).unwrap_or(time::Duration::MAX);

    if (now - signed).abs() > window_td {
        return Err(TimestampError::Expired {
            signed: timestamp.to_string(),
            now: format_rfc3339(now),
            window_hours: window.as_secs() / 3600,
        });
    }
    Ok(signed)
}

/// `updatedAt` must be strictly later than `createdAt`.
pub fn validate_update_order(created_at: &str, updated_at: &str) -> Result<(), TimestampError> {
    let created = parse_timestamp(created_at)?;
    let updated = parse_timestamp(updated_at)?;
    if updated <= created {
        return Err(TimestampError::NotMonotonic {
            created: created_at.to_string(),
            updated: updated_at.to_string(),
        });
    }
    Ok(())
}
