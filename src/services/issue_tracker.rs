use async_trait::async_trait;

use crate::domain::state::{StateUpdate, WorkflowState};
use crate::domain::ticket::{Issue, TicketRef};
use crate::error::AppResult;

/// Remote tracker operations used by the sweep workflow. One network call per
/// method; implementations never retry.
#[async_trait]
pub trait IssueTrackerService: Send + Sync {
    /// All workflow states named `name`, across every team.
    async fn workflow_states_named(&self, name: &str) -> AppResult<Vec<WorkflowState>>;
    async fn find_issue(&self, ticket: &TicketRef) -> AppResult<Option<Issue>>;
    async fn update_issue_state(&self, issue_id: &str, state_id: &str) -> AppResult<StateUpdate>;
    async fn create_comment(&self, issue_id: &str, body: &str) -> AppResult<bool>;
}
