use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::errors::Result;
use crate::goals::goal_projection::GoalWithProjection;
use crate::goals::goals_model::{
    Goal, GoalContribution, GoalUpdate, NewContribution, NewLedgerEntry,
};
use crate::goals::goals_service::ContributionReceipt;

/// Data-access seam to the backing store. The store owns durability and
/// consistency; this crate only defines the call shapes it needs.
#[async_trait]
pub trait GoalRepositoryTrait: Send + Sync {
    fn load_goals(&self, user_id: &str) -> Result<Vec<Goal>>;

    fn get_goal(&self, goal_id: &str) -> Result<Goal>;

    async fn update_goal(&self, goal_id: &str, update: GoalUpdate) -> Result<Goal>;

    /// Server-side atomic increment of `current_amount`, returning the updated
    /// goal. Must not be implemented as read-then-write: concurrent
    /// contributions to the same goal would lose updates.
    async fn increment_current_amount(&self, goal_id: &str, amount: Decimal) -> Result<Goal>;

    /// Append-only write of a contribution event.
    async fn record_contribution(&self, contribution: NewContribution)
        -> Result<GoalContribution>;

    /// Append an entry to the external ledger shared with the rest of the
    /// application, returning its id.
    async fn record_ledger_entry(&self, entry: NewLedgerEntry) -> Result<String>;
}

#[async_trait]
pub trait GoalServiceTrait: Send + Sync {
    fn list_goals(&self, user_id: &str, now: DateTime<Utc>) -> Result<Vec<GoalWithProjection>>;

    fn get_goal(&self, goal_id: &str, now: DateTime<Utc>) -> Result<GoalWithProjection>;

    async fn update_goal(
        &self,
        goal_id: &str,
        update: GoalUpdate,
        now: DateTime<Utc>,
    ) -> Result<GoalWithProjection>;

    async fn add_contribution(
        &self,
        user_id: &str,
        goal_id: &str,
        amount: Decimal,
        description: Option<String>,
        budget_box_id: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<ContributionReceipt>;
}
