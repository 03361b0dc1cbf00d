use async_trait::async_trait;
use chrono::NaiveDate;

use super::{Presence, PresenceUpsert};
use crate::domain::DomainResult;

#[async_trait]
pub trait PresenceRepository: Send + Sync {
    /// Create the record for (membre_id, date) or overwrite its present
    /// flag, comment, recorder and timestamp.
    async fn upsert(&self, presence: PresenceUpsert) -> DomainResult<Presence>;

    async fn list_on_date(&self, date: NaiveDate) -> DomainResult<Vec<Presence>>;

    /// Records with `start <= date <= end`, ordered by date.
    async fn list_between(&self, start: NaiveDate, end: NaiveDate) -> DomainResult<Vec<Presence>>;

    async fn list_for_members_between(
        &self,
        membre_ids: &[i32],
        start: NaiveDate,
        end: NaiveDate,
    ) -> DomainResult<Vec<Presence>>;

    /// A member's records, most recent date first.
    async fn list_for_member(&self, membre_id: i32, limit: Option<u64>)
        -> DomainResult<Vec<Presence>>;

    async fn list_all(&self) -> DomainResult<Vec<Presence>>;
}
