use std::fmt;
use tracing::warn;

/// Non-fatal conditions raised while preparing a system.
#[derive(Debug, Clone, PartialEq)]
pub enum Diagnostic {
    /// Hydrogen removal was requested but no atom matched by element or by mass.
    HydrogenNotFound,
    /// Charge neutralization was skipped because charges were removed.
    NeutralizationSkipped,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::HydrogenNotFound => {
                write!(f, "Hydrogen atoms could not be found by element or mass")
            }
            Diagnostic::NeutralizationSkipped => {
                write!(f, "Charge neutralization skipped: charges were removed")
            }
        }
    }
}

pub type DiagnosticCallback<'a> = Box<dyn Fn(&Diagnostic) + Send + Sync + 'a>;

/// Delivers diagnostics to an optional caller-supplied callback and to `tracing`.
#[derive(Default)]
pub struct DiagnosticReporter<'a> {
    callback: Option<DiagnosticCallback<'a>>,
}

impl<'a> DiagnosticReporter<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_callback(callback: DiagnosticCallback<'a>) -> Self {
        Self {
            callback: Some(callback),
        }
    }

    pub fn report(&self, diagnostic: Diagnostic) {
        warn!("{}", diagnostic);
        if let Some(cb) = &self.callback {
            cb(&diagnostic);
        }
    }
}
