use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::domain::batch::Phase;
use crate::error::{AppError, AppResult};

/// Ordered phases for one sweep, with optional target overrides.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RunPlan {
    pub team: Option<String>,
    pub state: Option<String>,
    #[serde(default)]
    pub phases: Vec<Phase>,
}

impl RunPlan {
    pub fn load(path: &Path) -> AppResult<Self> {
        let contents = fs::read_to_string(path).map_err(|err| {
            AppError::Configuration(format!("cannot read plan {}: {err}", path.display()))
        })?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> AppResult<Self> {
        toml::from_str(contents)
            .map_err(|err| AppError::Configuration(format!("invalid plan: {err}")))
    }

    pub fn ticket_count(&self) -> usize {
        self.phases.iter().map(|phase| phase.tickets.len()).sum()
    }
}
