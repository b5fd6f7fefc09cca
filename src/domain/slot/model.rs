//! Parking slot domain entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::shared::errors::DomainError;
use crate::shared::money::Money;

/// Slot type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SlotType {
    Regular,
    Electric,
    Handicap,
    Premium,
    Vip,
}

impl SlotType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Regular => "regular",
            Self::Electric => "electric",
            Self::Handicap => "handicap",
            Self::Premium => "premium",
            Self::Vip => "vip",
        }
    }

    /// Parse caller input; unknown values are rejected at construction.
    pub fn parse(s: &str) -> Result<Self, DomainError> {
        match s {
            "regular" => Ok(Self::Regular),
            "electric" => Ok(Self::Electric),
            "handicap" => Ok(Self::Handicap),
            "premium" => Ok(Self::Premium),
            "vip" => Ok(Self::Vip),
            other => Err(DomainError::Validation(format!(
                "unknown slot type: {}",
                other
            ))),
        }
    }

    /// Lenient variant for values read back from storage.
    pub(crate) fn from_stored(s: &str) -> Self {
        Self::parse(s).unwrap_or(Self::Regular)
    }
}

impl Default for SlotType {
    fn default() -> Self {
        Self::Regular
    }
}

impl std::fmt::Display for SlotType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Parking slot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Slot {
    /// Unique slot ID
    pub id: i64,
    /// Human-facing slot number, unique across the lot (e.g. "A-101")
    pub number: String,
    pub floor: i32,
    pub zone: String,
    pub slot_type: SlotType,
    /// Hourly price, always positive
    pub price_per_hour: Money,
    /// False iff exactly one active reservation holds this slot
    pub is_available: bool,
    pub created_at: DateTime<Utc>,
}

/// Provisioning input for a new slot.
#[derive(Debug, Clone)]
pub struct NewSlot {
    pub number: String,
    pub floor: i32,
    pub zone: String,
    pub slot_type: SlotType,
    pub price_per_hour: Money,
}

impl NewSlot {
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.number.trim().is_empty() {
            return Err(DomainError::Validation("slot number is required".into()));
        }
        if !self.price_per_hour.is_positive() {
            return Err(DomainError::Validation(
                "price_per_hour must be positive".into(),
            ));
        }
        Ok(())
    }
}

/// Optional filters for slot search.
#[derive(Debug, Clone, Default)]
pub struct SlotFilter {
    pub floor: Option<i32>,
    pub zone: Option<String>,
    pub slot_type: Option<SlotType>,
    pub max_price: Option<Money>,
}

impl SlotFilter {
    pub fn matches(&self, slot: &Slot) -> bool {
        if let Some(floor) = self.floor {
            if slot.floor != floor {
                return false;
            }
        }
        if let Some(zone) = &self.zone {
            if &slot.zone != zone {
                return false;
            }
        }
        if let Some(slot_type) = self.slot_type {
            if slot.slot_type != slot_type {
                return false;
            }
        }
        if let Some(max_price) = self.max_price {
            if slot.price_per_hour > max_price {
                return false;
            }
        }
        true
    }
}

/// Per-floor availability counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FloorAvailability {
    pub floor: i32,
    pub total: u64,
    pub available: u64,
}

/// Per-zone availability counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ZoneAvailability {
    pub zone: String,
    pub total: u64,
    pub available: u64,
}

/// Lot-wide availability snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AvailabilitySummary {
    pub total: u64,
    pub available: u64,
    pub occupied: u64,
    /// occupied / total * 100, rounded to 2 decimals; 0 for an empty lot
    pub occupancy_rate: f64,
    pub by_floor: Vec<FloorAvailability>,
    pub by_zone: Vec<ZoneAvailability>,
}

impl AvailabilitySummary {
    pub fn from_slots(slots: &[Slot]) -> Self {
        let total = slots.len() as u64;
        let available = slots.iter().filter(|s| s.is_available).count() as u64;
        let occupied = total - available;

        let occupancy_rate = if total == 0 {
            0.0
        } else {
            (occupied as f64 / total as f64 * 100.0 * 100.0).round() / 100.0
        };

        let mut by_floor: Vec<FloorAvailability> = Vec::new();
        let mut by_zone: Vec<ZoneAvailability> = Vec::new();
        for slot in slots {
            match by_floor.iter_mut().find(|f| f.floor == slot.floor) {
                Some(entry) => {
                    entry.total += 1;
                    entry.available += u64::from(slot.is_available);
                }
                None => by_floor.push(FloorAvailability {
                    floor: slot.floor,
                    total: 1,
                    available: u64::from(slot.is_available),
                }),
            }
            match by_zone.iter_mut().find(|z| z.zone == slot.zone) {
                Some(entry) => {
                    entry.total += 1;
                    entry.available += u64::from(slot.is_available);
                }
                None => by_zone.push(ZoneAvailability {
                    zone: slot.zone.clone(),
                    total: 1,
                    available: u64::from(slot.is_available),
                }),
            }
        }
        by_floor.sort_by_key(|f| f.floor);
        by_zone.sort_by(|a, b| a.zone.cmp(&b.zone));

        Self {
            total,
            available,
            occupied,
            occupancy_rate,
            by_floor,
            by_zone,
        }
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_slot(number: &str, floor: i32, zone: &str, available: bool) -> Slot {
        Slot {
            id: 1,
            number: number.to_string(),
            floor,
            zone: zone.to_string(),
            slot_type: SlotType::Regular,
            price_per_hour: Money::from_major(5),
            is_available: available,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn slot_type_roundtrip() {
        for ty in [
            SlotType::Regular,
            SlotType::Electric,
            SlotType::Handicap,
            SlotType::Premium,
            SlotType::Vip,
        ] {
            assert_eq!(SlotType::parse(ty.as_str()).unwrap(), ty);
        }
    }

    #[test]
    fn unknown_slot_type_is_rejected() {
        let err = SlotType::parse("motorcycle").unwrap_err();
        assert_eq!(err.kind(), "validation");
    }

    #[test]
    fn new_slot_requires_positive_price() {
        let slot = NewSlot {
            number: "A-101".into(),
            floor: 1,
            zone: "Zone A".into(),
            slot_type: SlotType::Regular,
            price_per_hour: Money::ZERO,
        };
        assert!(slot.validate().is_err());
    }

    #[test]
    fn filter_matches_all_criteria() {
        let slot = sample_slot("A-101", 1, "Zone A", true);
        let filter = SlotFilter {
            floor: Some(1),
            zone: Some("Zone A".into()),
            slot_type: Some(SlotType::Regular),
            max_price: Some(Money::from_major(5)),
        };
        assert!(filter.matches(&slot));

        let too_cheap = SlotFilter {
            max_price: Some(Money::from_cents(499)),
            ..Default::default()
        };
        assert!(!too_cheap.matches(&slot));

        let wrong_floor = SlotFilter {
            floor: Some(2),
            ..Default::default()
        };
        assert!(!wrong_floor.matches(&slot));
    }

    #[test]
    fn summary_rounds_rate_to_two_decimals() {
        let slots = vec![
            sample_slot("A-101", 1, "Zone A", true),
            sample_slot("A-102", 1, "Zone A", true),
            sample_slot("B-201", 2, "Zone B", false),
        ];
        let summary = AvailabilitySummary::from_slots(&slots);
        assert_eq!(summary.total, 3);
        assert_eq!(summary.available, 2);
        assert_eq!(summary.occupied, 1);
        assert_eq!(summary.occupancy_rate, 33.33);
        assert_eq!(summary.by_floor.len(), 2);
        assert_eq!(summary.by_floor[0].floor, 1);
        assert_eq!(summary.by_floor[0].available, 2);
        assert_eq!(summary.by_zone[1].zone, "Zone B");
        assert_eq!(summary.by_zone[1].available, 0);
    }

    #[test]
    fn empty_lot_has_zero_rate() {
        let summary = AvailabilitySummary::from_slots(&[]);
        assert_eq!(summary.occupancy_rate, 0.0);
        assert!(summary.by_floor.is_empty());
    }
}
