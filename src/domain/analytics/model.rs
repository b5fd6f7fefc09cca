//! Utilization stats and analytics report types

use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::slot::SlotType;
use crate::shared::money::Money;

/// Per-slot, per-hour usage bucket, keyed by (slot_id, date, hour) in local
/// time. Incremented each time a reservation starts in that hour.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UtilizationStat {
    pub slot_id: i64,
    pub date: NaiveDate,
    /// Hour of day, 0-23
    pub hour: u32,
    pub occupancy_count: i64,
    pub revenue: Money,
}

/// One ranked hour of the peak-demand prediction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeakHour {
    pub hour: u32,
    pub average_occupancy: f64,
}

/// Reservation usage rolled up per zone.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ZoneUsage {
    pub zone: String,
    pub reservation_count: u64,
    pub revenue: Money,
}

/// Reservation usage rolled up per slot type.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TypeUsage {
    pub slot_type: SlotType,
    pub reservation_count: u64,
    pub revenue: Money,
}

/// Demand prediction output.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeakDemandReport {
    /// Top hours by mean occupancy; `None` when no utilization history
    /// exists (insufficient data).
    pub peak_hours: Option<Vec<PeakHour>>,
    pub by_zone: Vec<ZoneUsage>,
    pub by_type: Vec<TypeUsage>,
}

impl PeakDemandReport {
    pub fn has_history(&self) -> bool {
        self.peak_hours.is_some()
    }
}

/// Revenue for one local calendar day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyRevenue {
    pub date: NaiveDate,
    pub revenue: Money,
}

/// Revenue rollup over completed payments.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RevenueReport {
    pub total_revenue: Money,
    /// Last 7 local calendar days, oldest first, zero-filled.
    pub last_seven_days: Vec<DailyRevenue>,
    pub by_type: Vec<TypeUsage>,
}
