mod model;
mod repository;

pub use model::{
    DailyRevenue, PeakDemandReport, PeakHour, RevenueReport, TypeUsage, UtilizationStat, ZoneUsage,
};
pub use repository::UtilizationRepository;
