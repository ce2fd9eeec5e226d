//! Status values for publisher actions and touchpoint actions
//!
//! Mirrors the severity model the provisioning pipeline is built around:
//! actions report outcomes as status values that are merged, not as errors
//! that unwind. An error-severity status aborts its own action (or operand)
//! while the surrounding pipeline keeps running and collects the rest.

use std::fmt;

/// Severity of a status, ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Ok,
    Info,
    Warning,
    Error,
    Cancel,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Ok => write!(f, "OK"),
            Severity::Info => write!(f, "INFO"),
            Severity::Warning => write!(f, "WARNING"),
            Severity::Error => write!(f, "ERROR"),
            Severity::Cancel => write!(f, "CANCEL"),
        }
    }
}

/// Outcome of a single action, possibly aggregating child outcomes.
#[derive(Debug, Clone)]
pub struct Status {
    severity: Severity,
    message: String,
    children: Vec<Status>,
}

impl Status {
    pub fn ok() -> Self {
        Status {
            severity: Severity::Ok,
            message: String::new(),
            children: Vec::new(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Status {
            severity: Severity::Info,
            message: message.into(),
            children: Vec::new(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Status {
            severity: Severity::Warning,
            message: message.into(),
            children: Vec::new(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Status {
            severity: Severity::Error,
            message: message.into(),
            children: Vec::new(),
        }
    }

    pub fn cancel(message: impl Into<String>) -> Self {
        Status {
            severity: Severity::Cancel,
            message: message.into(),
            children: Vec::new(),
        }
    }

    /// A missing required parameter, named after the parameter and the
    /// action that required it.
    pub fn parameter_not_set(parameter: &str, action_id: &str) -> Self {
        Status::error(format!(
            "The parameter '{parameter}' was not set in action '{action_id}'"
        ))
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn children(&self) -> &[Status] {
        &self.children
    }

    pub fn is_ok(&self) -> bool {
        self.severity <= Severity::Info
    }

    pub fn is_error(&self) -> bool {
        self.severity >= Severity::Error
    }

    pub fn is_cancel(&self) -> bool {
        self.severity == Severity::Cancel
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.message.is_empty() {
            write!(f, "{}", self.severity)
        } else {
            write!(f, "{}: {}", self.severity, self.message)
        }
    }
}

/// An aggregate of statuses whose severity is the maximum of its parts.
#[derive(Debug, Clone)]
pub struct MultiStatus {
    message: String,
    children: Vec<Status>,
}

impl MultiStatus {
    pub fn new(message: impl Into<String>) -> Self {
        MultiStatus {
            message: message.into(),
            children: Vec::new(),
        }
    }

    /// Add a child status. OK statuses are kept too so the action count is
    /// visible in the final report.
    pub fn add(&mut self, status: Status) {
        self.children.push(status);
    }

    pub fn merge(&mut self, other: MultiStatus) {
        self.children.extend(other.children);
    }

    pub fn severity(&self) -> Severity {
        self.children
            .iter()
            .map(Status::severity)
            .max()
            .unwrap_or(Severity::Ok)
    }

    pub fn is_ok(&self) -> bool {
        self.severity() <= Severity::Info
    }

    pub fn is_error(&self) -> bool {
        self.severity() >= Severity::Error
    }

    pub fn children(&self) -> &[Status] {
        &self.children
    }

    /// Flatten into a single status carrying the aggregate severity.
    pub fn into_status(self) -> Status {
        let severity = self.severity();
        Status {
            severity,
            message: self.message,
            children: self.children,
        }
    }
}

impl fmt::Display for MultiStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}: {}", self.severity(), self.message)?;
        for child in &self.children {
            if child.severity() > Severity::Ok {
                writeln!(f, "  {child}")?;
            }
        }
        Ok(())
    }
}
