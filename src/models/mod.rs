mod activity;
mod decision;

pub use activity::{ActivitySummary, SummaryError, MAX_TOP_WINDOWS};
pub use decision::{Action, Classification, Decision, DecisionSource, DeliveredAction, Intent};
