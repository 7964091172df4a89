//! User-friendly diagnostic messages.
//!
//! Every error shown to the user carries its root cause, the conflicting
//! inputs, and at least one suggested fix.

use std::fmt::{self, Write as _};

/// Common suggestion messages for consistent error handling.
pub mod suggestions {
    /// Suggestion when an option name is not declared.
    pub const LIST_OPTIONS: &str = "Run `edgerecipe inspect` to list the declared options";

    /// Suggestion when a profile cannot be read.
    pub const CHECK_PROFILE: &str =
        "Profiles hold a [settings] table (os, compiler, arch, build_type) and an [options] table of flag = true/false";

    /// Suggestion when a staging source root is missing.
    pub const MISSING_STAGE_ROOT: &str =
        "Pass the dependency's library directory with `--dep <name>=<dir>`";
}

/// Severity level for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

impl Severity {
    fn ansi_code(self) -> &'static str {
        match self {
            Severity::Error => "31",
            Severity::Warning => "33",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// A diagnostic message with optional suggestions.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    /// Primary message
    pub message: String,
    /// Severity level
    pub severity: Severity,
    /// Additional context lines
    pub context: Vec<String>,
    /// Suggested fixes
    pub suggestions: Vec<String>,
}

impl Diagnostic {
    fn with_severity(message: impl Into<String>, severity: Severity) -> Self {
        Diagnostic {
            message: message.into(),
            severity,
            context: Vec::new(),
            suggestions: Vec::new(),
        }
    }

    /// Create a new error diagnostic.
    pub fn error(message: impl Into<String>) -> Self {
        Self::with_severity(message, Severity::Error)
    }

    /// Create a new warning diagnostic.
    pub fn warning(message: impl Into<String>) -> Self {
        Self::with_severity(message, Severity::Warning)
    }

    /// Add context to the diagnostic.
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context.push(context.into());
        self
    }

    /// Add a suggestion for fixing the issue.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    /// Render for the terminal, optionally with ANSI colors.
    pub fn format(&self, color: bool) -> String {
        let paint = |code: &str, text: &str| {
            if color {
                format!("\x1b[1;{}m{}\x1b[0m", code, text)
            } else {
                text.to_string()
            }
        };

        let mut out = String::new();
        let _ = writeln!(
            out,
            "{}: {}",
            paint(self.severity.ansi_code(), &self.severity.to_string()),
            self.message
        );

        for line in &self.context {
            let _ = writeln!(out, "  = {}", line);
        }

        if !self.suggestions.is_empty() {
            let _ = writeln!(out, "\n{}: consider:", paint("32", "help"));
            for (n, suggestion) in self.suggestions.iter().enumerate() {
                let _ = writeln!(out, "  {}. {}", n + 1, suggestion);
            }
        }

        out
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format(false))
    }
}

/// Print a diagnostic to stderr.
pub fn emit(diagnostic: &Diagnostic, color: bool) {
    eprint!("{}", diagnostic.format(color));
}
