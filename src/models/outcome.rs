use std::collections::HashMap;

use serde::Serialize;

/// Result of one recipient's delivery attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecipientOutcome {
    pub success: bool,
    pub error: Option<String>,
}

impl RecipientOutcome {
    pub fn delivered() -> Self {
        Self {
            success: true,
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
        }
    }
}

impl<E: std::fmt::Display> From<Result<(), E>> for RecipientOutcome {
    fn from(result: Result<(), E>) -> Self {
        match result {
            Ok(()) => Self::delivered(),
            Err(e) => Self::failed(e.to_string()),
        }
    }
}

/// Per-recipient outcomes of one bulk send, keyed by address.
///
/// Counts are over attempts, so a recipient listed twice counts twice even
/// though only its latest outcome is kept in the map.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct BulkResult {
    outcomes: HashMap<String, RecipientOutcome>,
    #[serde(skip)]
    attempted: usize,
    #[serde(skip)]
    delivered: usize,
}

impl BulkResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one attempt for `recipient`, replacing an earlier outcome
    pub fn record(&mut self, recipient: impl Into<String>, outcome: RecipientOutcome) {
        self.attempted += 1;
        if outcome.success {
            self.delivered += 1;
        }
        self.outcomes.insert(recipient.into(), outcome);
    }

    pub fn get(&self, recipient: &str) -> Option<&RecipientOutcome> {
        self.outcomes.get(recipient)
    }

    /// Number of distinct recipients with an outcome
    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    pub fn total(&self) -> usize {
        self.attempted
    }

    pub fn successful(&self) -> usize {
        self.delivered
    }

    pub fn failed(&self) -> usize {
        self.attempted - self.delivered
    }

    pub fn summary(&self) -> BulkSummary {
        BulkSummary {
            total: self.total(),
            successful: self.successful(),
            failed: self.failed(),
        }
    }
}

/// Aggregate counts over a [`BulkResult`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BulkSummary {
    pub total: usize,
    pub successful: usize,
    pub failed: usize,
}
