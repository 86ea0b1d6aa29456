// diag.rs — Advisory diagnostics
//
// Diagnostics report conditions that do not stop an operation, such as
// declared metadata being overwritten by a resolved constant. Hard failures
// are `IrError`s instead; a batch operation that keeps going past one turns
// it into an error-level diagnostic.
//
// Failure modes: none.
// Side effects: none.

use std::fmt;

// ── Diagnostic code ──────────────────────────────────────────────────────

/// A stable diagnostic code (e.g., `W0100`).
///
/// Once assigned, a code must never be reassigned to a different meaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DiagCode(pub &'static str);

impl fmt::Display for DiagCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

pub mod codes {
    use super::DiagCode;

    /// Declared shape replaced by the shape of a resolved constant.
    pub const W0100: DiagCode = DiagCode("W0100");
    /// Declared type replaced by the type of a resolved constant.
    pub const W0101: DiagCode = DiagCode("W0101");
    /// A `Constant` node that cannot be turned into a tensor.
    pub const E0100: DiagCode = DiagCode("E0100");
}

// ── Severity level ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagLevel {
    Error,
    Warning,
}

// ── Diagnostic ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub code: Option<DiagCode>,
    pub level: DiagLevel,
    /// Name of the value or node the diagnostic is about.
    pub subject: String,
    pub message: String,
    pub hint: Option<String>,
}

impl Diagnostic {
    /// Create a new diagnostic with no code or hint.
    pub fn new(level: DiagLevel, subject: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: None,
            level,
            subject: subject.into(),
            message: message.into(),
            hint: None,
        }
    }

    pub fn warning(subject: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(DiagLevel::Warning, subject, message)
    }

    pub fn error(subject: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(DiagLevel::Error, subject, message)
    }

    pub fn is_error(&self) -> bool {
        self.level == DiagLevel::Error
    }

    /// Attach a stable diagnostic code.
    pub fn with_code(mut self, code: DiagCode) -> Self {
        self.code = Some(code);
        self
    }

    /// Attach a remediation hint.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let level = match self.level {
            DiagLevel::Error => "error",
            DiagLevel::Warning => "warning",
        };
        if let Some(code) = &self.code {
            write!(f, "{}[{}]: {}: {}", level, code, self.subject, self.message)?;
        } else {
            write!(f, "{}: {}: {}", level, self.subject, self.message)?;
        }
        if let Some(hint) = &self.hint {
            write!(f, "\n  hint: {}", hint)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_without_code() {
        let d = Diagnostic::error("x", "something failed");
        assert!(d.is_error());
        assert_eq!(format!("{d}"), "error: x: something failed");
        assert!(!Diagnostic::warning("x", "fine").is_error());
    }

    #[test]
    fn display_with_code_and_hint() {
        let d = Diagnostic::warning("y", "declared shape [2] replaced by [3]")
            .with_code(codes::W0100)
            .with_hint("fix the declared shape of 'y'");
        assert_eq!(
            format!("{d}"),
            "warning[W0100]: y: declared shape [2] replaced by [3]\n  hint: fix the declared shape of 'y'"
        );
        assert_eq!(d.code, Some(DiagCode("W0100")));
    }
}
