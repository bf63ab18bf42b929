#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowState {
    pub id: String,
    pub name: String,
    pub team_key: String,
}

impl WorkflowState {
    pub fn belongs_to(&self, team_key: &str) -> bool {
        self.team_key == team_key
    }
}

/// Outcome of an issue state mutation as echoed back by the tracker.
#[derive(Debug, Clone, Default)]
pub struct StateUpdate {
    pub success: bool,
    pub identifier: Option<String>,
    pub state_name: Option<String>,
}
