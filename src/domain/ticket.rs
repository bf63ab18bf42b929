use std::fmt;

use serde::Deserialize;

use crate::error::AppError;

/// Human-facing ticket identifier such as `1M-610`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub struct TicketRef(String);

impl TicketRef {
    pub fn new(value: impl Into<String>) -> Result<Self, AppError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(AppError::Configuration(
                "ticket reference must not be empty".to_string(),
            ));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for TicketRef {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl fmt::Display for TicketRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue {
    pub id: String,
    pub identifier: String,
    pub title: String,
    pub state_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_ticket_reference() {
        let ticket = TicketRef::new("  1M-610 ").unwrap();
        assert_eq!(ticket.as_str(), "1M-610");
    }

    #[test]
    fn rejects_blank_ticket_reference() {
        assert!(matches!(
            TicketRef::new("   "),
            Err(AppError::Configuration(_))
        ));
    }
}
