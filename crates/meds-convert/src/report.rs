//! Aggregated conversion report.

use std::fmt;

use serde::Serialize;

use crate::issue::{ConversionIssue, IssueKind};

/// Every issue found during one conversion attempt.
///
/// A non-empty report means no output table was produced.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ConversionReport {
    pub issues: Vec<ConversionIssue>,
}

impl ConversionReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an issue unless one of the same kind already covers the same columns.
    pub fn push(&mut self, issue: ConversionIssue) {
        let duplicate = self
            .issues
            .iter()
            .any(|existing| existing.kind() == issue.kind() && existing.columns() == issue.columns());
        if !duplicate {
            self.issues.push(issue);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn len(&self) -> usize {
        self.issues.len()
    }

    pub fn count(&self, kind: IssueKind) -> usize {
        self.issues.iter().filter(|issue| issue.kind() == kind).count()
    }

    /// Returns true if any issue mentions `column`.
    pub fn mentions(&self, column: &str) -> bool {
        self.issues
            .iter()
            .any(|issue| issue.columns().contains(&column))
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ConversionIssue> {
        self.issues.iter()
    }
}

impl fmt::Display for ConversionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, issue) in self.issues.iter().enumerate() {
            if index > 0 {
                writeln!(f)?;
            }
            write!(f, "{issue}")?;
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a ConversionReport {
    type Item = &'a ConversionIssue;
    type IntoIter = std::slice::Iter<'a, ConversionIssue>;

    fn into_iter(self) -> Self::IntoIter {
        self.issues.iter()
    }
}
