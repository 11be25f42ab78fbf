//! Changelog types

use serde::{Deserialize, Serialize};

/// Header recognized at the start of a commit message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedHeader {
    /// Lowercased header type (feat, fix, ...)
    pub commit_type: String,
    /// Lowercased, trimmed scope
    pub scope: Option<String>,
    /// Message with the header prefix removed
    pub body: String,
}

/// One rendered changelog bullet.
///
/// Built from a commit on the way into the changelog and recovered from a
/// persisted section on the way back out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangelogEntry {
    /// Formatted subject ("Feature", "Bug Fix", "Other Notes", ...)
    pub subject: String,
    /// Formatted scope ("UI", "Parser", ...)
    pub scope: Option<String>,
    /// Message text, header and ticket tags removed
    pub message: String,
    /// Normalized ticket references ("Fixes #12, #13")
    pub tickets: Option<String>,
}

impl ChangelogEntry {
    /// Create an entry without scope or tickets
    pub fn new(subject: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            scope: None,
            message: message.into(),
            tickets: None,
        }
    }

    /// Set the scope
    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = Some(scope.into());
        self
    }

    /// Set the tickets
    pub fn with_tickets(mut self, tickets: impl Into<String>) -> Self {
        self.tickets = Some(tickets.into());
        self
    }
}

/// Location of one version's section inside a changelog file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionMarker {
    /// Version named by the header
    pub version: String,
    /// Index of the header's first line
    pub header_line: usize,
    /// Index of the first body line
    pub body_start: usize,
    /// Index one past the last body line
    pub body_end: usize,
}
