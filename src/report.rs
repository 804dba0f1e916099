//! Diagnostic reporting.
//!
//! The arithmetic core returns diagnostics; the reporter is where a driver
//! puts them. It attaches a location, logs each one, applies the configured
//! [`DiagnosticPolicy`], and hands the collection back as a `Result` so that
//! a run with diagnostics can never be mistaken for a clean one.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use tracing::debug;

use crate::config::{DiagnosticPolicy, EvalConfig};
use crate::core::{Diagnostic, DiagnosticCategory, SourceLocation};

/// A diagnostic and where it was raised.
///
/// Renders as `[location] kind[code]: message`, where `code` is
/// [`Diagnostic::code`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub diagnostic: Diagnostic,
    pub location: SourceLocation,
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}[{}]: {}",
            self.location,
            if self.diagnostic.is_undefined_behavior() { "undefined behavior" } else { "error" },
            self.diagnostic.code(),
            self.diagnostic
        )
    }
}

/// Serializable form of a [`Report`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportRecord {
    pub code: u32,
    pub category: String,
    pub undefined_behavior: bool,
    pub message: String,
    pub location: String,
}

impl From<&Report> for ReportRecord {
    fn from(report: &Report) -> Self {
        Self {
            code: report.diagnostic.code(),
            category: report.diagnostic.category().to_string(),
            undefined_behavior: report.diagnostic.is_undefined_behavior(),
            message: report.diagnostic.to_string(),
            location: report.location.to_string(),
        }
    }
}

/// What the driver should do after a diagnostic was recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportAction {
    Continue,
    Stop,
}

/// Collects diagnostics for one evaluation run.
#[derive(Debug, Clone)]
pub struct DiagnosticReporter {
    policy: DiagnosticPolicy,
    max_diagnostics: usize,
    reports: Vec<Report>,
}

impl DiagnosticReporter {
    pub fn new(config: &EvalConfig) -> Self {
        Self {
            policy: config.on_diagnostic,
            max_diagnostics: config.max_diagnostics,
            reports: Vec::new(),
        }
    }

    /// Record a diagnostic and decide whether evaluation may go on.
    pub fn record(&mut self, diagnostic: Diagnostic, location: SourceLocation) -> ReportAction {
        debug!(
            code = diagnostic.code(),
            category = %diagnostic.category(),
            %location,
            "{}",
            diagnostic
        );
        self.reports.push(Report { diagnostic, location });

        let limit_reached = self.max_diagnostics > 0 && self.reports.len() >= self.max_diagnostics;
        if self.policy == DiagnosticPolicy::Abort || limit_reached {
            ReportAction::Stop
        } else {
            ReportAction::Continue
        }
    }

    pub fn has_diagnostics(&self) -> bool {
        !self.reports.is_empty()
    }

    pub fn reports(&self) -> &[Report] {
        &self.reports
    }

    /// Number of reports per category.
    pub fn summary(&self) -> BTreeMap<DiagnosticCategory, usize> {
        let mut counts = BTreeMap::new();
        for report in &self.reports {
            *counts.entry(report.diagnostic.category()).or_insert(0) += 1;
        }
        counts
    }

    pub fn records(&self) -> Vec<ReportRecord> {
        self.reports.iter().map(ReportRecord::from).collect()
    }

    pub fn into_reports(self) -> Vec<Report> {
        self.reports
    }

    /// `Ok(value)` if nothing was reported, otherwise every report.
    pub fn into_result<T>(self, value: T) -> Result<T, Vec<Report>> {
        if self.reports.is_empty() {
            Ok(value)
        } else {
            Err(self.reports)
        }
    }
}
