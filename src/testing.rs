//! Scripted issue tracker for workflow tests.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::state::{StateUpdate, WorkflowState};
use crate::domain::ticket::{Issue, TicketRef};
use crate::error::{AppError, AppResult};
use crate::services::IssueTrackerService;

/// A call observed by [`ScriptedTracker`], in issue order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    StatesNamed(String),
    FindIssue(String),
    UpdateState { issue_id: String, state_id: String },
    Comment { issue_id: String, body: String },
}

#[derive(Default)]
pub struct ScriptedTracker {
    states: Vec<WorkflowState>,
    states_error: bool,
    issues: HashMap<String, Issue>,
    missing_issues: HashSet<String>,
    unreachable_issues: HashSet<String>,
    rejected_updates: HashSet<String>,
    erroring_updates: HashSet<String>,
    failing_comments: HashSet<String>,
    calls: Mutex<Vec<Call>>,
}

impl ScriptedTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_state(mut self, id: &str, name: &str, team_key: &str) -> Self {
        self.states.push(WorkflowState {
            id: id.to_string(),
            name: name.to_string(),
            team_key: team_key.to_string(),
        });
        self
    }

    pub fn with_states_error(mut self) -> Self {
        self.states_error = true;
        self
    }

    /// Registers an issue whose internal id is `uuid-<identifier>`.
    pub fn with_issue(mut self, identifier: &str) -> Self {
        self.issues.insert(
            identifier.to_string(),
            Issue {
                id: Self::issue_id(identifier),
                identifier: identifier.to_string(),
                title: format!("Ticket {identifier}"),
                state_name: "Backlog".to_string(),
            },
        );
        self
    }

    /// The lookup answers `issue: null` without reporting errors.
    pub fn with_missing_issue(mut self, identifier: &str) -> Self {
        self.missing_issues.insert(identifier.to_string());
        self
    }

    /// The lookup fails before the tracker answers.
    pub fn with_unreachable_issue(mut self, identifier: &str) -> Self {
        self.unreachable_issues.insert(identifier.to_string());
        self
    }

    /// The state mutation for this issue answers `success: false`.
    pub fn rejecting_update(mut self, identifier: &str) -> Self {
        self.rejected_updates.insert(Self::issue_id(identifier));
        self
    }

    /// The state mutation for this issue answers with an API error.
    pub fn erroring_update(mut self, identifier: &str) -> Self {
        self.erroring_updates.insert(Self::issue_id(identifier));
        self
    }

    pub fn failing_comment(mut self, identifier: &str) -> Self {
        self.failing_comments.insert(Self::issue_id(identifier));
        self
    }

    pub fn issue_id(identifier: &str) -> String {
        format!("uuid-{identifier}")
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn comment_calls(&self) -> usize {
        self.calls()
            .iter()
            .filter(|call| matches!(call, Call::Comment { .. }))
            .count()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl IssueTrackerService for ScriptedTracker {
    async fn workflow_states_named(&self, name: &str) -> AppResult<Vec<WorkflowState>> {
        self.record(Call::StatesNamed(name.to_string()));
        if self.states_error {
            return Err(AppError::Api(vec!["authentication required".to_string()]));
        }
        Ok(self
            .states
            .iter()
            .filter(|state| state.name == name)
            .cloned()
            .collect())
    }

    async fn find_issue(&self, ticket: &TicketRef) -> AppResult<Option<Issue>> {
        self.record(Call::FindIssue(ticket.as_str().to_string()));
        if self.missing_issues.contains(ticket.as_str()) {
            return Ok(None);
        }
        if self.unreachable_issues.contains(ticket.as_str()) {
            return Err(AppError::Transport("connection refused".to_string()));
        }
        match self.issues.get(ticket.as_str()) {
            Some(issue) => Ok(Some(issue.clone())),
            None => Err(AppError::Api(vec!["Entity not found".to_string()])),
        }
    }

    async fn update_issue_state(&self, issue_id: &str, state_id: &str) -> AppResult<StateUpdate> {
        self.record(Call::UpdateState {
            issue_id: issue_id.to_string(),
            state_id: state_id.to_string(),
        });
        if self.erroring_updates.contains(issue_id) {
            return Err(AppError::Api(vec!["update rejected".to_string()]));
        }
        if self.rejected_updates.contains(issue_id) {
            return Ok(StateUpdate::default());
        }
        Ok(StateUpdate {
            success: true,
            identifier: issue_id.strip_prefix("uuid-").map(str::to_string),
            state_name: Some("Canceled".to_string()),
        })
    }

    async fn create_comment(&self, issue_id: &str, body: &str) -> AppResult<bool> {
        self.record(Call::Comment {
            issue_id: issue_id.to_string(),
            body: body.to_string(),
        });
        if self.failing_comments.contains(issue_id) {
            return Err(AppError::Transport("connection reset".to_string()));
        }
        Ok(true)
    }
}
