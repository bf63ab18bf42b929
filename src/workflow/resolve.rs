use tracing::{info, warn};

use crate::domain::state::WorkflowState;
use crate::domain::ticket::{Issue, TicketRef};
use crate::error::{AppError, AppResult};
use crate::services::IssueTrackerService;

/// The tracker only filters states by name, so the team match happens here.
pub async fn resolve_state(
    tracker: &dyn IssueTrackerService,
    team_key: &str,
    state_name: &str,
) -> AppResult<WorkflowState> {
    let state = tracker
        .workflow_states_named(state_name)
        .await?
        .into_iter()
        .find(|state| state.belongs_to(team_key))
        .ok_or_else(|| {
            AppError::NotFound(format!(
                "workflow state '{state_name}' for team {team_key}"
            ))
        })?;

    info!(state_id = %state.id, team = team_key, "found {} state", state.name);
    Ok(state)
}

/// Any lookup failure is a per-ticket failure, never a run abort.
pub async fn resolve_ticket(tracker: &dyn IssueTrackerService, ticket: &TicketRef) -> Option<Issue> {
    match tracker.find_issue(ticket).await {
        Ok(Some(issue)) => {
            info!(
                ticket = %ticket,
                state = %issue.state_name,
                "{} (current state: {})",
                issue.title,
                issue.state_name
            );
            Some(issue)
        }
        Ok(None) => {
            warn!(ticket = %ticket, "ticket not found");
            None
        }
        Err(error) => {
            warn!(ticket = %ticket, %error, "failed to look up ticket");
            None
        }
    }
}
