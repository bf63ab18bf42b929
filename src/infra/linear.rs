use async_trait::async_trait;
use reqwest::{
    Client,
    header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, HeaderValue},
};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::{Value, json};
use tracing::{debug, instrument};

use crate::domain::state::{StateUpdate, WorkflowState};
use crate::domain::ticket::{Issue, TicketRef};
use crate::error::{AppError, AppResult};
use crate::services::IssueTrackerService;

pub const DEFAULT_API_URL: &str = "https://api.linear.app/graphql";

const WORKFLOW_STATES_QUERY: &str = r"
    query WorkflowStatesByName($name: String!) {
        workflowStates(filter: { name: { eq: $name } }) {
            nodes {
                id
                name
                team {
                    key
                }
            }
        }
    }
";

const ISSUE_QUERY: &str = r"
    query IssueByIdentifier($identifier: String!) {
        issue(id: $identifier) {
            id
            identifier
            title
            state {
                name
            }
        }
    }
";

const ISSUE_STATE_MUTATION: &str = r"
    mutation UpdateIssueState($issueId: String!, $stateId: String!) {
        issueUpdate(id: $issueId, input: { stateId: $stateId }) {
            success
            issue {
                identifier
                state {
                    name
                }
            }
        }
    }
";

const COMMENT_MUTATION: &str = r"
    mutation CreateComment($issueId: String!, $body: String!) {
        commentCreate(input: { issueId: $issueId, body: $body }) {
            success
        }
    }
";

pub struct LinearClient {
    http: Client,
    api_url: String,
    auth: HeaderValue,
}

impl LinearClient {
    pub fn new(api_url: impl Into<String>, api_key: &str) -> AppResult<Self> {
        let api_key = api_key.trim();
        if api_key.is_empty() {
            return Err(AppError::Configuration(
                "issue tracker API key not configured".to_string(),
            ));
        }
        let mut auth = HeaderValue::from_str(&Self::auth_header(api_key)).map_err(|err| {
            AppError::Configuration(format!("API key is not a valid header value: {err}"))
        })?;
        auth.set_sensitive(true);

        Ok(Self {
            http: Client::new(),
            api_url: api_url.into(),
            auth,
        })
    }

    /// Personal API keys go out verbatim; OAuth tokens need the bearer scheme.
    fn auth_header(api_key: &str) -> String {
        if api_key.starts_with("lin_api_") || api_key.starts_with("Bearer ") {
            api_key.to_string()
        } else {
            format!("Bearer {api_key}")
        }
    }

    async fn execute<R: DeserializeOwned>(&self, query: &'static str, variables: Value) -> AppResult<R> {
        let request = GraphQlRequest { query, variables };

        let response = self
            .http
            .post(&self.api_url)
            .header(AUTHORIZATION, self.auth.clone())
            .header(ACCEPT, "application/json")
            .header(CONTENT_TYPE, "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|err| AppError::Transport(format!("failed to call issue tracker: {err}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unable to read response>".to_string());
            if let Some(messages) = serde_json::from_str::<GraphQlResponse>(&body)
                .ok()
                .and_then(|payload| error_messages(payload.errors))
            {
                return Err(AppError::Api(messages));
            }
            return Err(AppError::HttpStatus { status, body });
        }

        let payload: GraphQlResponse = response.json().await.map_err(|err| {
            AppError::Transport(format!("failed to parse issue tracker response: {err}"))
        })?;

        // Errors win over any partial data that came with them.
        let GraphQlResponse { data, errors } = payload;
        if let Some(messages) = error_messages(errors) {
            return Err(AppError::Api(messages));
        }

        let data = data.ok_or_else(|| {
            AppError::Transport("issue tracker response carried no data".to_string())
        })?;
        serde_json::from_value(data).map_err(|err| {
            AppError::Transport(format!("unexpected issue tracker response shape: {err}"))
        })
    }
}

#[async_trait]
impl IssueTrackerService for LinearClient {
    #[instrument(skip(self))]
    async fn workflow_states_named(&self, name: &str) -> AppResult<Vec<WorkflowState>> {
        let data: WorkflowStatesData = self
            .execute(WORKFLOW_STATES_QUERY, json!({ "name": name }))
            .await?;

        let states: Vec<WorkflowState> = data
            .workflow_states
            .nodes
            .into_iter()
            .filter_map(|node| {
                let team = node.team?;
                Some(WorkflowState {
                    id: node.id,
                    name: node.name,
                    team_key: team.key,
                })
            })
            .collect();
        debug!(count = states.len(), "workflow states matched by name");
        Ok(states)
    }

    #[instrument(skip(self), fields(ticket = %ticket))]
    async fn find_issue(&self, ticket: &TicketRef) -> AppResult<Option<Issue>> {
        let data: IssueData = self
            .execute(ISSUE_QUERY, json!({ "identifier": ticket.as_str() }))
            .await?;

        Ok(data.issue.map(|node| Issue {
            id: node.id,
            identifier: node.identifier,
            title: node.title,
            state_name: node.state.map(|state| state.name).unwrap_or_default(),
        }))
    }

    #[instrument(skip(self))]
    async fn update_issue_state(&self, issue_id: &str, state_id: &str) -> AppResult<StateUpdate> {
        let data: IssueUpdateData = self
            .execute(
                ISSUE_STATE_MUTATION,
                json!({ "issueId": issue_id, "stateId": state_id }),
            )
            .await?;

        let payload = data.issue_update;
        let (identifier, state_name) = match payload.issue {
            Some(issue) => (Some(issue.identifier), issue.state.map(|state| state.name)),
            None => (None, None),
        };
        Ok(StateUpdate {
            success: payload.success,
            identifier,
            state_name,
        })
    }

    #[instrument(skip(self, body))]
    async fn create_comment(&self, issue_id: &str, body: &str) -> AppResult<bool> {
        let data: CommentCreateData = self
            .execute(COMMENT_MUTATION, json!({ "issueId": issue_id, "body": body }))
            .await?;
        Ok(data.comment_create.success)
    }
}

#[derive(Serialize)]
struct GraphQlRequest {
    query: &'static str,
    variables: Value,
}

#[derive(Deserialize)]
struct GraphQlResponse {
    data: Option<Value>,
    errors: Option<Vec<GraphQlError>>,
}

fn error_messages(errors: Option<Vec<GraphQlError>>) -> Option<Vec<String>> {
    errors
        .filter(|errors| !errors.is_empty())
        .map(|errors| errors.into_iter().map(|error| error.message).collect())
}

#[derive(Deserialize)]
struct GraphQlError {
    message: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WorkflowStatesData {
    workflow_states: Connection<WorkflowStateNode>,
}

#[derive(Deserialize)]
struct Connection<T> {
    nodes: Vec<T>,
}

#[derive(Deserialize)]
struct WorkflowStateNode {
    id: String,
    name: String,
    team: Option<TeamNode>,
}

#[derive(Deserialize)]
struct TeamNode {
    key: String,
}

#[derive(Deserialize)]
struct IssueData {
    issue: Option<IssueNode>,
}

#[derive(Deserialize)]
struct IssueNode {
    id: String,
    identifier: String,
    title: String,
    state: Option<StateNameNode>,
}

#[derive(Deserialize)]
struct StateNameNode {
    name: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct IssueUpdateData {
    issue_update: IssueUpdatePayload,
}

#[derive(Deserialize)]
struct IssueUpdatePayload {
    success: bool,
    issue: Option<UpdatedIssueNode>,
}

#[derive(Deserialize)]
struct UpdatedIssueNode {
    identifier: String,
    state: Option<StateNameNode>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CommentCreateData {
    comment_create: SuccessPayload,
}

#[derive(Deserialize)]
struct SuccessPayload {
    success: bool,
}
