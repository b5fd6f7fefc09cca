//! Utilization stats repository interface
//!
//! Buckets are written by the unit of work as part of the reservation
//! commit; reads feed the analytics aggregator.

use async_trait::async_trait;

use super::model::UtilizationStat;
use crate::domain::DomainResult;

#[async_trait]
pub trait UtilizationRepository: Send + Sync {
    async fn all(&self) -> DomainResult<Vec<UtilizationStat>>;
}
