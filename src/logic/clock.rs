use chrono::{Duration, Utc};

use crate::model::Timestamps;

/// Stamp a row about to be persisted for the first time.
pub fn stamp_created(timestamps: &mut Timestamps) {
    let now = Utc::now();
    timestamps.created_at = Some(now);
    timestamps.updated_at = Some(now);
}

/// Stamp a row about to be re-persisted. The new `updated_at` is strictly
/// later than both previous stamps, even when the clock has not advanced.
pub fn stamp_updated(timestamps: &mut Timestamps) {
    let now = Utc::now();
    let floor = timestamps.updated_at.max(timestamps.created_at);
    timestamps.updated_at = Some(match floor {
        Some(previous) if now <= previous => previous + Duration::microseconds(1),
        _ => now,
    });
}
