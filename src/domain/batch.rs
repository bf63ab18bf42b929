use serde::Deserialize;

use crate::domain::ticket::TicketRef;

/// Ordered group of tickets sharing one audit comment.
#[derive(Debug, Clone, Deserialize)]
pub struct Phase {
    pub name: String,
    pub comment: String,
    #[serde(default)]
    pub tickets: Vec<TicketRef>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchResult {
    pub succeeded: usize,
    pub failed: usize,
    pub failed_tickets: Vec<TicketRef>,
}

impl BatchResult {
    pub fn record_success(&mut self) {
        self.succeeded += 1;
    }

    pub fn record_failure(&mut self, ticket: &TicketRef) {
        self.failed += 1;
        self.failed_tickets.push(ticket.clone());
    }

    pub fn processed(&self) -> usize {
        self.succeeded + self.failed
    }

    pub fn render_summary(&self) -> String {
        let mut out = format!(
            "Successfully processed: {} tickets\nFailed: {} tickets",
            self.succeeded, self.failed
        );
        if !self.failed_tickets.is_empty() {
            out.push_str("\n\nFailed tickets:");
            for ticket in &self.failed_tickets {
                out.push_str(&format!("\n  - {ticket}"));
            }
        }
        out
    }
}
