//! Analytics aggregator
//!
//! Read-only rollups over the ledger, reservations and utilization stats.
//! Aggregation happens in Rust over fetched rows; nothing here mutates
//! state beyond the expiry sweep that keeps reads current.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;

use chrono::{Duration, Local, Utc};

use crate::domain::{
    DailyRevenue, DomainResult, Money, PaymentStatus, PeakDemandReport, PeakHour,
    RepositoryProvider, RevenueReport, Slot, TypeUsage, UtilizationStat, ZoneUsage,
};

pub struct AnalyticsService {
    repos: Arc<dyn RepositoryProvider>,
}

impl AnalyticsService {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self { repos }
    }

    /// Rank hours by mean historical occupancy and roll usage up per zone
    /// and slot type. Peak hours are `None` while no utilization history
    /// exists.
    pub async fn predict_peak_demand(&self) -> DomainResult<PeakDemandReport> {
        self.repos.unit_of_work().release_expired(Utc::now()).await?;

        let stats = self.repos.stats().all().await?;
        let reservations = self.repos.reservations().find_all().await?;
        let payments = self.repos.ledger().list_payments().await?;
        let slots = self.repos.slots().list_all().await?;

        let peak_hours = if stats.is_empty() {
            None
        } else {
            Some(rank_peak_hours(&stats))
        };

        let slot_index: HashMap<i64, &Slot> = slots.iter().map(|s| (s.id, s)).collect();
        let reservation_slot: HashMap<i64, i64> =
            reservations.iter().map(|r| (r.id, r.slot_id)).collect();

        let mut by_zone: Vec<ZoneUsage> = Vec::new();
        let mut by_type: Vec<TypeUsage> = Vec::new();
        for reservation in &reservations {
            let Some(slot) = slot_index.get(&reservation.slot_id) else {
                continue;
            };
            match by_zone.iter_mut().find(|z| z.zone == slot.zone) {
                Some(entry) => entry.reservation_count += 1,
                None => by_zone.push(ZoneUsage {
                    zone: slot.zone.clone(),
                    reservation_count: 1,
                    revenue: Money::ZERO,
                }),
            }
            match by_type.iter_mut().find(|t| t.slot_type == slot.slot_type) {
                Some(entry) => entry.reservation_count += 1,
                None => by_type.push(TypeUsage {
                    slot_type: slot.slot_type,
                    reservation_count: 1,
                    revenue: Money::ZERO,
                }),
            }
        }

        for payment in payments
            .iter()
            .filter(|p| p.status == PaymentStatus::Completed)
        {
            let Some(slot_id) = reservation_slot.get(&payment.reservation_id) else {
                continue;
            };
            let Some(slot) = slot_index.get(slot_id) else {
                continue;
            };
            if let Some(entry) = by_zone.iter_mut().find(|z| z.zone == slot.zone) {
                entry.revenue += payment.amount;
            }
            if let Some(entry) = by_type.iter_mut().find(|t| t.slot_type == slot.slot_type) {
                entry.revenue += payment.amount;
            }
        }

        by_zone.sort_by(|a, b| {
            b.reservation_count
                .cmp(&a.reservation_count)
                .then_with(|| a.zone.cmp(&b.zone))
        });
        by_type.sort_by(|a, b| {
            b.reservation_count
                .cmp(&a.reservation_count)
                .then_with(|| a.slot_type.as_str().cmp(b.slot_type.as_str()))
        });

        Ok(PeakDemandReport {
            peak_hours,
            by_zone,
            by_type,
        })
    }

    /// Total completed-payment revenue, the last 7 local calendar days and
    /// a per-slot-type breakdown.
    pub async fn revenue_report(&self) -> DomainResult<RevenueReport> {
        self.repos.unit_of_work().release_expired(Utc::now()).await?;

        let payments = self.repos.ledger().list_payments().await?;
        let reservations = self.repos.reservations().find_all().await?;
        let slots = self.repos.slots().list_all().await?;

        let completed: Vec<_> = payments
            .iter()
            .filter(|p| p.status == PaymentStatus::Completed)
            .collect();
        let total_revenue: Money = completed.iter().map(|p| p.amount).sum();

        let today = Local::now().date_naive();
        let mut last_seven_days: Vec<DailyRevenue> = (0..7)
            .map(|offset| DailyRevenue {
                date: today - Duration::days(6 - offset),
                revenue: Money::ZERO,
            })
            .collect();
        for payment in &completed {
            let date = payment.created_at.with_timezone(&Local).date_naive();
            if let Some(day) = last_seven_days.iter_mut().find(|d| d.date == date) {
                day.revenue += payment.amount;
            }
        }

        let slot_index: HashMap<i64, &Slot> = slots.iter().map(|s| (s.id, s)).collect();
        let reservation_slot: HashMap<i64, i64> =
            reservations.iter().map(|r| (r.id, r.slot_id)).collect();
        let mut by_type: Vec<TypeUsage> = Vec::new();
        for payment in &completed {
            let Some(slot_id) = reservation_slot.get(&payment.reservation_id) else {
                continue;
            };
            let Some(slot) = slot_index.get(slot_id) else {
                continue;
            };
            match by_type.iter_mut().find(|t| t.slot_type == slot.slot_type) {
                Some(entry) => {
                    entry.reservation_count += 1;
                    entry.revenue += payment.amount;
                }
                None => by_type.push(TypeUsage {
                    slot_type: slot.slot_type,
                    reservation_count: 1,
                    revenue: payment.amount,
                }),
            }
        }
        by_type.sort_by(|a, b| {
            b.reservation_count
                .cmp(&a.reservation_count)
                .then_with(|| a.slot_type.as_str().cmp(b.slot_type.as_str()))
        });

        Ok(RevenueReport {
            total_revenue,
            last_seven_days,
            by_type,
        })
    }
}

/// Mean occupancy per hour of day, descending; ties break on the lower
/// hour; top 3 reported.
fn rank_peak_hours(stats: &[UtilizationStat]) -> Vec<PeakHour> {
    let mut totals = [(0i64, 0u64); 24];
    for stat in stats {
        let hour = stat.hour as usize;
        if hour < 24 {
            totals[hour].0 += stat.occupancy_count;
            totals[hour].1 += 1;
        }
    }
    let mut hours: Vec<PeakHour> = totals
        .iter()
        .enumerate()
        .filter(|(_, (_, samples))| *samples > 0)
        .map(|(hour, (sum, samples))| PeakHour {
            hour: hour as u32,
            average_occupancy: *sum as f64 / *samples as f64,
        })
        .collect();
    hours.sort_by(|a, b| {
        b.average_occupancy
            .partial_cmp(&a.average_occupancy)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.hour.cmp(&b.hour))
    });
    hours.truncate(3);
    hours
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        Account, AccountRepository, NewAccount, NewSlot, ReservationDraft, Slot, SlotRepository,
        SlotType, UnitOfWork,
    };
    use crate::infrastructure::storage::InMemoryStore;
    use chrono::NaiveDate;
    use uuid::Uuid;

    fn bucket(slot_id: i64, day: u32, hour: u32, occupancy: i64) -> UtilizationStat {
        UtilizationStat {
            slot_id,
            date: NaiveDate::from_ymd_opt(2026, 8, day).unwrap(),
            hour,
            occupancy_count: occupancy,
            revenue: Money::from_major(occupancy * 10),
        }
    }

    #[test]
    fn peak_hours_rank_by_mean_occupancy() {
        let stats = vec![
            bucket(1, 1, 9, 4),
            bucket(1, 2, 9, 2), // hour 9 mean = 3.0
            bucket(1, 1, 17, 2),
            bucket(2, 2, 17, 3), // hour 17 mean = 2.5
            bucket(1, 1, 8, 1),  // hour 8 mean = 1.0
            bucket(2, 1, 7, 1),  // hour 7 mean = 1.0, loses tie on hour
        ];
        let ranked = rank_peak_hours(&stats);
        assert_eq!(ranked.len(), 3);
        assert_eq!(ranked[0].hour, 9);
        assert_eq!(ranked[0].average_occupancy, 3.0);
        assert_eq!(ranked[1].hour, 17);
        assert_eq!(ranked[2].hour, 7);
    }

    async fn seed_slot(store: &InMemoryStore, number: &str, zone: &str, ty: SlotType) -> Slot {
        SlotRepository::insert(
            store,
            NewSlot {
                number: number.into(),
                floor: 1,
                zone: zone.into(),
                slot_type: ty,
                price_per_hour: Money::from_major(50),
            },
        )
        .await
        .unwrap()
    }

    async fn seed_account(store: &InMemoryStore, login: &str) -> Account {
        AccountRepository::insert(
            store,
            NewAccount {
                login_id: login.into(),
                display_name: login.into(),
                email: format!("{}@example.com", login),
                phone: None,
                vehicle_number: None,
                credential_hash: "$2b$12$hash".into(),
                wallet_balance: Money::from_major(1000),
            },
        )
        .await
        .unwrap()
    }

    async fn commit(store: &InMemoryStore, user: &Account, slot: &Slot, hours: i64) {
        let start = Utc::now();
        store
            .commit_reservation(ReservationDraft {
                user_id: user.id,
                slot_id: slot.id,
                duration_hours: hours,
                start_time: start,
                end_time: start + Duration::hours(hours),
                total_amount: slot.price_per_hour * hours,
                transaction_ref: Uuid::new_v4().to_string(),
            })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn no_history_means_insufficient_data() {
        let store = Arc::new(InMemoryStore::new());
        let analytics = AnalyticsService::new(store);
        let report = analytics.predict_peak_demand().await.unwrap();
        assert!(report.peak_hours.is_none());
        assert!(!report.has_history());
        assert!(report.by_zone.is_empty());
    }

    #[tokio::test]
    async fn rolls_usage_up_by_zone_and_type() {
        let store = Arc::new(InMemoryStore::new());
        let zone_a = seed_slot(&store, "A-101", "Zone A", SlotType::Regular).await;
        let zone_a2 = seed_slot(&store, "A-102", "Zone A", SlotType::Vip).await;
        let zone_b = seed_slot(&store, "B-201", "Zone B", SlotType::Regular).await;
        let john = seed_account(&store, "john").await;
        let jane = seed_account(&store, "jane").await;
        let jill = seed_account(&store, "jill").await;

        commit(&store, &john, &zone_a, 2).await; // $100
        commit(&store, &jane, &zone_a2, 1).await; // $50
        commit(&store, &jill, &zone_b, 1).await; // $50

        let analytics = AnalyticsService::new(store);
        let report = analytics.predict_peak_demand().await.unwrap();

        assert!(report.has_history());
        let peak = report.peak_hours.unwrap();
        assert!(!peak.is_empty());

        assert_eq!(report.by_zone[0].zone, "Zone A");
        assert_eq!(report.by_zone[0].reservation_count, 2);
        assert_eq!(report.by_zone[0].revenue, Money::from_major(150));
        assert_eq!(report.by_zone[1].zone, "Zone B");
        assert_eq!(report.by_zone[1].revenue, Money::from_major(50));

        assert_eq!(report.by_type[0].slot_type, SlotType::Regular);
        assert_eq!(report.by_type[0].reservation_count, 2);
        assert_eq!(report.by_type[1].slot_type, SlotType::Vip);
    }

    #[tokio::test]
    async fn revenue_report_sums_completed_payments() {
        let store = Arc::new(InMemoryStore::new());
        let slot = seed_slot(&store, "A-101", "Zone A", SlotType::Regular).await;
        let vip = seed_slot(&store, "B-201", "Zone B", SlotType::Vip).await;
        let john = seed_account(&store, "john").await;
        let jane = seed_account(&store, "jane").await;

        commit(&store, &john, &slot, 2).await; // $100
        commit(&store, &jane, &vip, 1).await; // $50

        let analytics = AnalyticsService::new(store);
        let report = analytics.revenue_report().await.unwrap();

        assert_eq!(report.total_revenue, Money::from_major(150));
        assert_eq!(report.last_seven_days.len(), 7);
        let today = report.last_seven_days.last().unwrap();
        assert_eq!(today.date, Local::now().date_naive());
        assert_eq!(today.revenue, Money::from_major(150));
        assert!(report
            .last_seven_days
            .iter()
            .take(6)
            .all(|d| d.revenue == Money::ZERO));

        assert_eq!(report.by_type.len(), 2);
        assert_eq!(report.by_type[0].slot_type, SlotType::Regular);
        assert_eq!(report.by_type[0].revenue, Money::from_major(100));
    }

    #[tokio::test]
    async fn empty_store_reports_zero_revenue() {
        let store = Arc::new(InMemoryStore::new());
        let analytics = AnalyticsService::new(store);
        let report = analytics.revenue_report().await.unwrap();
        assert_eq!(report.total_revenue, Money::ZERO);
        assert_eq!(report.last_seven_days.len(), 7);
        assert!(report.by_type.is_empty());
    }
}
