use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::{debug, error};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tokio::time::timeout;

use crate::errors::{Error, RepositoryError, Result, ValidationError};
use crate::goals::goal_projection::{self, GoalWithProjection};
use crate::goals::goals_model::{
    ContributionSource, GoalContribution, GoalUpdate, LedgerEntryKind, NewContribution,
    NewLedgerEntry,
};
use crate::goals::goals_traits::{GoalRepositoryTrait, GoalServiceTrait};

/// Bound on each individual store write so a stalled backend surfaces as an
/// error instead of hanging the caller.
const STORE_WRITE_TIMEOUT: Duration = Duration::from_secs(10);

/// Result of applying a contribution: the ledger entry it was booked against,
/// the appended contribution record, and the refreshed goal projection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContributionReceipt {
    pub ledger_entry_id: String,
    pub contribution: GoalContribution,
    pub goal: GoalWithProjection,
}

pub struct GoalService<T: GoalRepositoryTrait> {
    goal_repo: Arc<T>,
}

impl<T: GoalRepositoryTrait> GoalService<T> {
    pub fn new(goal_repo: Arc<T>) -> Self {
        GoalService { goal_repo }
    }

    async fn bounded<F, R>(&self, operation: &'static str, fut: F) -> Result<R>
    where
        F: Future<Output = Result<R>>,
    {
        match timeout(STORE_WRITE_TIMEOUT, fut).await {
            Ok(result) => result,
            Err(_) => Err(Error::Repository(RepositoryError::Timeout(
                operation.to_string(),
            ))),
        }
    }
}

#[async_trait]
impl<T: GoalRepositoryTrait> GoalServiceTrait for GoalService<T> {
    fn list_goals(&self, user_id: &str, now: DateTime<Utc>) -> Result<Vec<GoalWithProjection>> {
        let goals = self.goal_repo.load_goals(user_id)?;
        debug!("Projecting {} goals for user '{}'", goals.len(), user_id);

        Ok(goals
            .into_iter()
            .map(|goal| {
                let projection = goal_projection::project(&goal, now);
                GoalWithProjection { goal, projection }
            })
            .collect())
    }

    fn get_goal(&self, goal_id: &str, now: DateTime<Utc>) -> Result<GoalWithProjection> {
        let goal = self.goal_repo.get_goal(goal_id)?;
        let projection = goal_projection::project(&goal, now);
        Ok(GoalWithProjection { goal, projection })
    }

    async fn update_goal(
        &self,
        goal_id: &str,
        update: GoalUpdate,
        now: DateTime<Utc>,
    ) -> Result<GoalWithProjection> {
        if let Some(target_amount) = update.target_amount {
            if target_amount <= Decimal::ZERO {
                return Err(ValidationError::InvalidInput(format!(
                    "Target amount must be positive, got {}",
                    target_amount
                ))
                .into());
            }
        }
        if let Some(rate) = update.annual_interest_rate {
            if rate < Decimal::ZERO {
                return Err(ValidationError::InvalidInput(format!(
                    "Annual interest rate must not be negative, got {}",
                    rate
                ))
                .into());
            }
        }

        let goal = self
            .bounded("update_goal", self.goal_repo.update_goal(goal_id, update))
            .await?;
        let projection = goal_projection::project(&goal, now);
        Ok(GoalWithProjection { goal, projection })
    }

    /// Apply a contribution of `amount` to a goal.
    ///
    /// Write order is fixed: ledger entry, then contribution record, then the
    /// atomic increment of `current_amount`. The increment goes last so a
    /// failure partway through never overstates the goal balance; a
    /// contribution or increment failure after the ledger write leaves
    /// orphaned rows, which are logged here for reconciliation.
    async fn add_contribution(
        &self,
        user_id: &str,
        goal_id: &str,
        amount: Decimal,
        description: Option<String>,
        budget_box_id: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<ContributionReceipt> {
        if amount <= Decimal::ZERO {
            return Err(ValidationError::InvalidInput(format!(
                "Contribution amount must be positive, got {}",
                amount
            ))
            .into());
        }

        // Fail on an unknown goal before anything is written.
        let goal = self.goal_repo.get_goal(goal_id)?;

        let ledger_entry_id = self
            .bounded(
                "record_ledger_entry",
                self.goal_repo.record_ledger_entry(NewLedgerEntry {
                    user_id: user_id.to_string(),
                    amount,
                    kind: LedgerEntryKind::Investment,
                    description: description
                        .clone()
                        .unwrap_or_else(|| format!("Investment: {}", goal.name)),
                    goal_id: Some(goal_id.to_string()),
                    budget_box_id,
                    date: now,
                }),
            )
            .await?;

        let contribution = match self
            .bounded(
                "record_contribution",
                self.goal_repo.record_contribution(NewContribution {
                    goal_id: goal_id.to_string(),
                    amount,
                    date: now,
                    description,
                    source: ContributionSource::Transaction,
                    ledger_entry_id: Some(ledger_entry_id.clone()),
                }),
            )
            .await
        {
            Ok(contribution) => contribution,
            Err(err) => {
                error!(
                    "Contribution write for goal '{}' failed after ledger entry '{}' \
                     was recorded; the entry needs reconciliation: {}",
                    goal_id, ledger_entry_id, err
                );
                return Err(err);
            }
        };

        let updated_goal = match self
            .bounded(
                "increment_current_amount",
                self.goal_repo.increment_current_amount(goal_id, amount),
            )
            .await
        {
            Ok(goal) => goal,
            Err(err) => {
                error!(
                    "Amount increment for goal '{}' failed after ledger entry '{}' and \
                     contribution '{}' were recorded; both need reconciliation: {}",
                    goal_id, ledger_entry_id, contribution.id, err
                );
                return Err(err);
            }
        };

        let projection = goal_projection::project(&updated_goal, now);
        Ok(ContributionReceipt {
            ledger_entry_id,
            contribution,
            goal: GoalWithProjection {
                goal: updated_goal,
                projection,
            },
        })
    }
}
