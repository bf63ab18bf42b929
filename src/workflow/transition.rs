use tracing::{info, warn};

use crate::domain::ticket::Issue;
use crate::services::IssueTrackerService;

/// Moves `issue` into `state_id`, then leaves an audit comment.
///
/// The verdict is the state mutation alone. The comment is only attempted once
/// the mutation succeeded, and a failed comment is logged without affecting
/// the result.
pub async fn transition(
    tracker: &dyn IssueTrackerService,
    issue: &Issue,
    state_id: &str,
    comment: &str,
) -> bool {
    let update = match tracker.update_issue_state(&issue.id, state_id).await {
        Ok(update) => update,
        Err(error) => {
            warn!(ticket = %issue.identifier, %error, "error updating state");
            return false;
        }
    };

    if !update.success {
        warn!(ticket = %issue.identifier, "issue tracker declined the state update");
        return false;
    }

    info!(
        "updated {} to {}",
        update.identifier.as_deref().unwrap_or(&issue.identifier),
        update.state_name.as_deref().unwrap_or("<unknown>")
    );

    match tracker.create_comment(&issue.id, comment).await {
        Ok(true) => info!(ticket = %issue.identifier, "added comment"),
        Ok(false) => warn!(ticket = %issue.identifier, "comment was not created"),
        Err(error) => warn!(ticket = %issue.identifier, %error, "failed to add comment"),
    }

    true
}
