//! Reservation domain entity

use chrono::{DateTime, Duration, Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::shared::money::Money;

/// Reservation status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReservationStatus {
    /// Slot is currently held by this reservation
    Active,
    /// Ended explicitly or lapsed past its paid window
    Completed,
    /// Force-released by administrative account deletion
    Cancelled,
}

impl ReservationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    /// Lenient variant for values read back from storage.
    pub(crate) fn from_stored(s: &str) -> Self {
        match s {
            "active" => Self::Active,
            "completed" => Self::Completed,
            _ => Self::Cancelled,
        }
    }
}

impl std::fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A time-boxed, prepaid claim on a slot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reservation {
    /// Unique reservation ID
    pub id: i64,
    pub user_id: i64,
    pub slot_id: i64,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    /// Booked duration, 1 to 4 hours
    pub duration_hours: i64,
    /// price_per_hour x duration_hours, charged upfront
    pub total_amount: Money,
    pub status: ReservationStatus,
    pub created_at: DateTime<Utc>,
}

impl Reservation {
    pub fn new(
        id: i64,
        user_id: i64,
        slot_id: i64,
        start_time: DateTime<Utc>,
        duration_hours: i64,
        total_amount: Money,
    ) -> Self {
        Self {
            id,
            user_id,
            slot_id,
            start_time,
            end_time: start_time + Duration::hours(duration_hours),
            duration_hours,
            total_amount,
            status: ReservationStatus::Active,
            created_at: start_time,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == ReservationStatus::Active
    }

    /// Active but past its paid window.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.is_active() && self.end_time <= now
    }

    /// Explicit end: close the window at `ended_at`.
    pub fn complete(&mut self, ended_at: DateTime<Utc>) {
        self.status = ReservationStatus::Completed;
        self.end_time = ended_at;
    }

    /// Expiry sweep: the stored end_time already is the window end.
    pub fn complete_lapsed(&mut self) {
        self.status = ReservationStatus::Completed;
    }

    pub fn cancel(&mut self) {
        self.status = ReservationStatus::Cancelled;
    }

    /// Whether the reservation started on the given local calendar day.
    pub fn starts_on(&self, date: NaiveDate) -> bool {
        self.start_time.with_timezone(&Local).date_naive() == date
    }
}

/// Reservation joined with its slot's location fields.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReservationDetails {
    pub reservation: Reservation,
    pub slot_number: String,
    pub floor: i32,
    pub zone: String,
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_reservation() -> Reservation {
        Reservation::new(1, 10, 7, Utc::now(), 2, Money::from_major(100))
    }

    #[test]
    fn new_reservation_is_active_with_closed_window() {
        let r = sample_reservation();
        assert!(r.is_active());
        assert_eq!(r.end_time - r.start_time, Duration::hours(2));
        assert_eq!(r.total_amount, Money::from_major(100));
    }

    #[test]
    fn not_expired_within_window() {
        let r = sample_reservation();
        assert!(!r.is_expired(r.start_time + Duration::minutes(30)));
    }

    #[test]
    fn expired_at_window_end() {
        let r = sample_reservation();
        assert!(r.is_expired(r.end_time));
        assert!(r.is_expired(r.end_time + Duration::hours(1)));
    }

    #[test]
    fn complete_closes_window_at_end_instant() {
        let mut r = sample_reservation();
        let ended_at = r.start_time + Duration::minutes(45);
        r.complete(ended_at);
        assert_eq!(r.status, ReservationStatus::Completed);
        assert_eq!(r.end_time, ended_at);
    }

    #[test]
    fn lapsed_completion_keeps_end_time() {
        let mut r = sample_reservation();
        let original_end = r.end_time;
        r.complete_lapsed();
        assert_eq!(r.status, ReservationStatus::Completed);
        assert_eq!(r.end_time, original_end);
    }

    #[test]
    fn completed_reservation_never_expires_again() {
        let mut r = sample_reservation();
        r.complete_lapsed();
        assert!(!r.is_expired(r.end_time + Duration::hours(5)));
    }

    #[test]
    fn starts_on_local_today() {
        let r = sample_reservation();
        assert!(r.starts_on(Local::now().date_naive()));
    }

    #[test]
    fn status_roundtrip() {
        for status in [
            ReservationStatus::Active,
            ReservationStatus::Completed,
            ReservationStatus::Cancelled,
        ] {
            assert_eq!(ReservationStatus::from_stored(status.as_str()), status);
        }
        assert_eq!(
            ReservationStatus::from_stored("garbage"),
            ReservationStatus::Cancelled
        );
    }
}
