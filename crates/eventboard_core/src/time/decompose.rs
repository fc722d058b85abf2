//! Cascading duration decomposition and temporal classification.
//!
//! # Responsibility
//! - Turn two instants into a years→minutes breakdown, largest unit first.
//! - Classify an instant as past/present/future relative to "now".
//!
//! # Invariants
//! - Pure arithmetic only; no clock reads, no I/O, no failure modes.
//! - Every breakdown field below `years` is non-negative after the
//!   display correction.
//!
//! The correction rule is an approximation inherited from the original
//! behavior: a negative sub-year remainder gets the modulus of the next
//! larger unit added (12/4/7/24/60) without re-borrowing from the unit
//! above. The breakdown is a display convenience, not an exact calendar
//! partition of the duration.

use chrono::{Datelike, Duration, Months, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Cascading breakdown of the span between two instants.
///
/// `years` is signed and unbounded; the remaining fields sit in their
/// display range (months `0..12`, weeks `0..=4`, days `0..7`, hours
/// `0..24`, minutes `0..60`). Weeks can reach 4 when the sub-month
/// remainder spans a full 29-31 day stretch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Breakdown {
    pub years: i64,
    pub months: i64,
    pub weeks: i64,
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
}

/// Tri-state temporal label relative to a reference instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Classification {
    Past,
    Present,
    Future,
}

/// Decomposes `target - now` into a cascading breakdown.
///
/// Whole years are taken first; each following unit measures the span
/// left over from the previous checkpoint. Checkpoints always advance
/// by the uncorrected remainder, so the correction never leaks back
/// into larger units.
pub fn decompose(now: NaiveDateTime, target: NaiveDateTime) -> Breakdown {
    let years = whole_months_between(now, target) / 12;
    let checkpoint = shift_months(now, years * 12);
    let mut months = whole_months_between(checkpoint, target);
    let checkpoint = shift_months(checkpoint, months);

    let mut weeks = (target - checkpoint).num_weeks();
    let checkpoint = checkpoint + Duration::weeks(weeks);
    let mut days = (target - checkpoint).num_days();
    let checkpoint = checkpoint + Duration::days(days);
    let mut hours = (target - checkpoint).num_hours();
    let checkpoint = checkpoint + Duration::hours(hours);
    let mut minutes = (target - checkpoint).num_minutes();

    if months < 0 {
        months += 12;
    }
    if weeks < 0 {
        weeks += 4;
    }
    if days < 0 {
        days += 7;
    }
    if hours < 0 {
        hours += 24;
    }
    if minutes < 0 {
        minutes += 60;
    }

    Breakdown {
        years,
        months,
        weeks,
        days,
        hours,
        minutes,
    }
}

/// Classifies `target` relative to `now` at whole-day granularity.
///
/// An instant less than 24 hours away in either direction counts as
/// `Present`; beyond that the sign of the day span decides.
pub fn classify(now: NaiveDateTime, target: NaiveDateTime) -> Classification {
    match (target - now).num_days() {
        days if days < 0 => Classification::Past,
        0 => Classification::Present,
        _ => Classification::Future,
    }
}

/// Signed count of whole calendar months from `from` to `to`.
///
/// Month-end days clamp the same way `checked_add_months` clamps them,
/// so `Jan 31 + 1 month = Feb 28/29` counts as one full month.
fn whole_months_between(from: NaiveDateTime, to: NaiveDateTime) -> i64 {
    let mut months = (i64::from(to.year()) - i64::from(from.year())) * 12
        + (i64::from(to.month()) - i64::from(from.month()));
    while months > 0 && shift_months(from, months) > to {
        months -= 1;
    }
    while months < 0 && shift_months(from, months) < to {
        months += 1;
    }
    months
}

/// Moves an instant by a signed number of calendar months.
///
/// Saturates at the representable range boundary instead of wrapping;
/// inputs that far out do not occur in event data.
fn shift_months(at: NaiveDateTime, months: i64) -> NaiveDateTime {
    if months >= 0 {
        at.checked_add_months(Months::new(months as u32)).unwrap_or(at)
    } else {
        at.checked_sub_months(Months::new(months.unsigned_abs() as u32))
            .unwrap_or(at)
    }
}
