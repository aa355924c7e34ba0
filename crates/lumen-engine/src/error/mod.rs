//! Error types and the per-context error shadow.

mod shadow;

use std::fmt;

pub use shadow::ErrorShadow;

/// Step of context construction that failed.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum CreationStage {
    Display,
    Config,
    Context,
    Surface,
    MakeCurrent,
}

impl fmt::Display for CreationStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let stage = match self {
            CreationStage::Display => "display",
            CreationStage::Config => "surface config",
            CreationStage::Context => "drawing context",
            CreationStage::Surface => "pbuffer surface",
            CreationStage::MakeCurrent => "make current",
        };
        f.write_str(stage)
    }
}

/// Structural failures of the core.
///
/// Driver-level misuse is never reported here; it is queued and observed
/// through `get_error`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The driver has no display, or initializing it failed.
    DisplayUnavailable,
    /// A step of context construction failed; the context was discarded.
    ContextCreationFailed { stage: CreationStage },
    /// The context is not usable (not `Ok`, disposed, or could not be made current).
    InvalidContext,
    /// A required driver extension is missing; the context was disposed.
    UnsupportedCapability { extension: String },
    /// The display cannot be released while contexts are live.
    DisplayBusy { live: usize },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::DisplayUnavailable => write!(f, "graphics display unavailable"),
            Error::ContextCreationFailed { stage } => {
                write!(f, "context creation failed at {stage}")
            }
            Error::InvalidContext => write!(f, "invalid or lost rendering context"),
            Error::UnsupportedCapability { extension } => {
                write!(f, "required extension {extension} is not supported")
            }
            Error::DisplayBusy { live } => {
                write!(f, "display still has {live} live context(s)")
            }
        }
    }
}

impl std::error::Error for Error {}

pub type Result<T> = std::result::Result<T, Error>;
