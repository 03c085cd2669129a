//! Visit scheduling rules.
//!
//! Checks run in a fixed order and stop at the first violation, so the
//! reported error is always the earliest rule that fails:
//! required bounds → not in the past → end after start → quarter-hour start
//! → minimum duration → maximum duration → no overlap for the doctor.

use chrono::{Duration, NaiveDateTime, Timelike};

use super::store::VisitStore;
use crate::error::ClinicError;
use crate::models::{NewVisit, Visit};

pub const MIN_VISIT_DURATION_IN_MINUTES: i64 = 15;
pub const MAX_VISIT_DURATION_IN_HOURS: i64 = 1;
pub const SLOT_GRANULARITY_MINUTES: u32 = 15;

pub const MSG_MISSING_BOUNDS: &str = "Visit has some null fields, please fill everything correctly.";
pub const MSG_PAST_DATE: &str = "Unable to create a visit for past dates.";
pub const MSG_END_BEFORE_START: &str = "End time should be after start time.";
pub const MSG_NOT_QUARTER: &str = "Visit creation is possible only for a full quarter of an hour.";
pub const MSG_OVERLAP: &str = "Visit could not be created, there will be another visit at this time.";

/// Bounds of a candidate visit that passed every rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisitSlot {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

/// Scheduling rules, parameterized by a visit lookup for the overlap check.
pub struct VisitValidator<'s, S: VisitStore + ?Sized> {
    store: &'s S,
}

impl<'s, S: VisitStore + ?Sized> VisitValidator<'s, S> {
    pub fn new(store: &'s S) -> Self {
        Self { store }
    }

    /// Validate a candidate visit for `doctor_id` as of `now`.
    pub fn validate_visit_creation(
        &self,
        candidate: &NewVisit,
        doctor_id: i64,
        now: NaiveDateTime,
    ) -> Result<VisitSlot, ClinicError> {
        let slot = has_both_bounds(candidate)?;
        is_not_past(slot.start, now)?;
        ends_after_start(&slot)?;
        starts_on_quarter_hour(&slot)?;
        lasts_at_least_minimum(&slot)?;
        lasts_at_most_maximum(&slot)?;
        self.does_not_overlap(&slot, doctor_id)?;
        Ok(slot)
    }

    /// A stored visit can only be booked while its start is still ahead.
    pub fn validate_visit_assignment(&self, visit: &Visit, now: NaiveDateTime) -> Result<(), ClinicError> {
        is_not_past(visit.appointment_start, now)
    }

    fn does_not_overlap(&self, slot: &VisitSlot, doctor_id: i64) -> Result<(), ClinicError> {
        let overlapping = self.store.find_all_overlapping(slot.start, slot.end, doctor_id)?;
        if !overlapping.is_empty() {
            tracing::debug!(
                doctor_id,
                conflicts = overlapping.len(),
                "Visit slot overlaps existing visits"
            );
            return Err(ClinicError::VisitExists(MSG_OVERLAP.into()));
        }
        Ok(())
    }
}

fn has_both_bounds(candidate: &NewVisit) -> Result<VisitSlot, ClinicError> {
    match (candidate.appointment_start, candidate.appointment_end) {
        (Some(start), Some(end)) => Ok(VisitSlot { start, end }),
        _ => Err(ClinicError::missing_field(MSG_MISSING_BOUNDS)),
    }
}

fn is_not_past(start: NaiveDateTime, now: NaiveDateTime) -> Result<(), ClinicError> {
    if start < now {
        return Err(ClinicError::invalid_date_time(MSG_PAST_DATE));
    }
    Ok(())
}

fn ends_after_start(slot: &VisitSlot) -> Result<(), ClinicError> {
    if slot.end <= slot.start {
        return Err(ClinicError::invalid_date_time(MSG_END_BEFORE_START));
    }
    Ok(())
}

fn starts_on_quarter_hour(slot: &VisitSlot) -> Result<(), ClinicError> {
    if slot.start.minute() % SLOT_GRANULARITY_MINUTES != 0 {
        return Err(ClinicError::invalid_date_time(MSG_NOT_QUARTER));
    }
    Ok(())
}

fn lasts_at_least_minimum(slot: &VisitSlot) -> Result<(), ClinicError> {
    let message =
        || format!("Visit should have minimal duration of {MIN_VISIT_DURATION_IN_MINUTES} min.");
    let earliest_end = slot
        .start
        .checked_add_signed(Duration::minutes(MIN_VISIT_DURATION_IN_MINUTES))
        .ok_or_else(|| ClinicError::invalid_date_time(message()))?;
    if slot.end < earliest_end {
        return Err(ClinicError::invalid_date_time(message()));
    }
    Ok(())
}

fn lasts_at_most_maximum(slot: &VisitSlot) -> Result<(), ClinicError> {
    let message =
        || format!("Visit should have maximal duration of {MAX_VISIT_DURATION_IN_HOURS} hours.");
    let latest_end = slot
        .start
        .checked_add_signed(Duration::hours(MAX_VISIT_DURATION_IN_HOURS))
        .ok_or_else(|| ClinicError::invalid_date_time(message()))?;
    if slot.end > latest_end {
        return Err(ClinicError::invalid_date_time(message()));
    }
    Ok(())
}
