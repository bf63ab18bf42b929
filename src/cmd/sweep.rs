use std::time::Duration;

use tracing::info;

use crate::context::AppContext;
use crate::domain::batch::BatchResult;
use crate::error::{AppError, AppResult};
use crate::plan::RunPlan;
use crate::workflow::batch::{BatchRunner, BatchTarget};

#[derive(Debug, Clone, Default)]
pub struct SweepCommandArgs {
    pub team: Option<String>,
    pub state: Option<String>,
    pub pace_ms: Option<u64>,
}

pub async fn run(ctx: &AppContext, plan: &RunPlan, args: SweepCommandArgs) -> AppResult<BatchResult> {
    let target = BatchTarget {
        team_key: args
            .team
            .or_else(|| plan.team.clone())
            .or_else(|| ctx.config.team_key.clone())
            .ok_or_else(|| AppError::Configuration("no team key configured".to_string()))?,
        state_name: args
            .state
            .or_else(|| plan.state.clone())
            .or_else(|| ctx.config.state_name.clone())
            .ok_or_else(|| AppError::Configuration("no target state configured".to_string()))?,
    };
    let pace = args
        .pace_ms
        .map(Duration::from_millis)
        .unwrap_or(ctx.config.pace);

    info!(
        team = %target.team_key,
        state = %target.state_name,
        phases = plan.phases.len(),
        tickets = plan.ticket_count(),
        "starting sweep"
    );

    BatchRunner::new(ctx.issue_tracker.as_ref(), pace)
        .run(&target, &plan.phases)
        .await
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::config::AppConfig;
    use crate::testing::{Call, ScriptedTracker};

    fn context(tracker: Arc<ScriptedTracker>, team_key: Option<&str>) -> AppContext {
        let config = AppConfig {
            api_url: "http://localhost/graphql".to_string(),
            api_key: Some("lin_api_test".to_string()),
            team_key: team_key.map(str::to_string),
            state_name: Some("Canceled".to_string()),
            pace: Duration::ZERO,
        };
        AppContext::new(config, tracker)
    }

    fn plan(team: Option<&str>) -> RunPlan {
        let mut plan = RunPlan::from_toml(
            r#"
[[phases]]
name = "cleanup"
comment = "archived"
tickets = ["T-1", "T-2"]
"#,
        )
        .unwrap();
        plan.team = team.map(str::to_string);
        plan
    }

    #[tokio::test]
    async fn reports_one_success_and_one_failure() {
        let tracker = Arc::new(
            ScriptedTracker::new()
                .with_state("s-1m", "Canceled", "1M")
                .with_issue("T-1"),
        );
        let ctx = context(tracker.clone(), Some("1M"));

        let result = run(&ctx, &plan(None), SweepCommandArgs::default())
            .await
            .unwrap();

        assert_eq!(result.succeeded, 1);
        assert_eq!(result.failed, 1);
        assert_eq!(result.failed_tickets[0].as_str(), "T-2");
    }

    #[tokio::test]
    async fn cli_team_beats_plan_and_config() {
        let tracker = Arc::new(
            ScriptedTracker::new()
                .with_state("s-ops", "Canceled", "OPS")
                .with_state("s-1m", "Canceled", "1M")
                .with_issue("T-1")
                .with_issue("T-2"),
        );
        let ctx = context(tracker.clone(), Some("OPS"));
        let args = SweepCommandArgs {
            team: Some("1M".to_string()),
            ..SweepCommandArgs::default()
        };

        run(&ctx, &plan(Some("OPS")), args).await.unwrap();

        assert!(tracker.calls().contains(&Call::UpdateState {
            issue_id: ScriptedTracker::issue_id("T-1"),
            state_id: "s-1m".to_string(),
        }));
    }

    #[tokio::test]
    async fn missing_team_is_a_configuration_error() {
        let tracker = Arc::new(ScriptedTracker::new());
        let ctx = context(tracker.clone(), None);

        let err = run(&ctx, &plan(None), SweepCommandArgs::default())
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Configuration(_)));
        assert!(tracker.calls().is_empty());
    }
}
