pub mod goal_projection;
pub mod goals_model;
pub mod goals_service;
pub mod goals_traits;

pub use goal_projection::{project, GoalProjection, GoalWithProjection};
pub use goals_model::{
    ContributionSource, Goal, GoalContribution, GoalPriority, GoalStatus, GoalUpdate,
    LedgerEntryKind, NewContribution, NewLedgerEntry,
};
pub use goals_service::{ContributionReceipt, GoalService};
pub use goals_traits::{GoalRepositoryTrait, GoalServiceTrait};
