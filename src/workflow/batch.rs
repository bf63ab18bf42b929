use std::time::Duration;

use tracing::info;

use crate::domain::batch::{BatchResult, Phase};
use crate::domain::ticket::TicketRef;
use crate::error::AppResult;
use crate::services::IssueTrackerService;
use crate::workflow::resolve::{resolve_state, resolve_ticket};
use crate::workflow::transition::transition;

pub const DEFAULT_PACE: Duration = Duration::from_millis(500);

#[derive(Debug, Clone)]
pub struct BatchTarget {
    pub team_key: String,
    pub state_name: String,
}

/// Drives phases of tickets through lookup and transition, one call at a time.
pub struct BatchRunner<'a> {
    tracker: &'a dyn IssueTrackerService,
    pace: Duration,
}

impl<'a> BatchRunner<'a> {
    pub fn new(tracker: &'a dyn IssueTrackerService, pace: Duration) -> Self {
        Self { tracker, pace }
    }

    /// Fails before touching any ticket if the target state cannot be resolved.
    pub async fn run(&self, target: &BatchTarget, phases: &[Phase]) -> AppResult<BatchResult> {
        let state = resolve_state(self.tracker, &target.team_key, &target.state_name).await?;

        let mut result = BatchResult::default();
        for (index, phase) in phases.iter().enumerate() {
            info!(
                phase = index + 1,
                tickets = phase.tickets.len(),
                "{}",
                phase.name
            );
            self.run_phase(phase, &state.id, &mut result).await;
        }

        info!(
            processed = result.processed(),
            succeeded = result.succeeded,
            failed = result.failed,
            "sweep complete"
        );
        Ok(result)
    }

    async fn run_phase(&self, phase: &Phase, state_id: &str, result: &mut BatchResult) {
        for ticket in &phase.tickets {
            if self.process_ticket(ticket, state_id, &phase.comment).await {
                result.record_success();
            } else {
                result.record_failure(ticket);
            }
            tokio::time::sleep(self.pace).await;
        }
    }

    async fn process_ticket(&self, ticket: &TicketRef, state_id: &str, comment: &str) -> bool {
        info!(ticket = %ticket, "processing");
        match resolve_ticket(self.tracker, ticket).await {
            Some(issue) => transition(self.tracker, &issue, state_id, comment).await,
            None => false,
        }
    }
}
