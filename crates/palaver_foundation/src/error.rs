//! Error types for Palaver.
//!
//! Uses `thiserror` for ergonomic error definition with rich context.
//! Expression evaluation never produces these; they surface only while
//! loading a script or from host functions.

use std::fmt;

use thiserror::Error;

/// The main error type for Palaver operations.
#[derive(Debug, Error)]
#[error("{kind}")]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional context about where the error occurred.
    pub context: Option<ErrorContext>,
}

impl Error {
    /// Creates a new error with the given kind.
    #[must_use]
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            context: None,
        }
    }

    /// Adds context to this error.
    #[must_use]
    pub fn with_context(mut self, context: ErrorContext) -> Self {
        self.context = Some(context);
        self
    }

    /// Creates a parse error.
    #[must_use]
    pub fn parse(message: impl Into<String>, line: u32, column: u32, context: String) -> Self {
        Self::new(ErrorKind::ParseError {
            message: message.into(),
            line,
            column,
            context,
        })
    }

    /// Creates an unknown intent error.
    #[must_use]
    pub fn unknown_intent(name: impl Into<String>, available: Vec<String>) -> Self {
        Self::new(ErrorKind::UnknownIntent {
            name: name.into(),
            available,
        })
    }

    /// Creates a host function failure.
    #[must_use]
    pub fn host(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::HostFunction {
            name: name.into(),
            message: message.into(),
        })
    }

    /// Bundles several diagnostics into one script error.
    #[must_use]
    pub fn script(errors: Vec<Error>) -> Self {
        Self::new(ErrorKind::Script(errors))
    }

    /// Returns the 1-based source line this error points at, if any.
    #[must_use]
    pub fn line(&self) -> Option<u32> {
        match &self.kind {
            ErrorKind::LexError { line, .. }
            | ErrorKind::ParseError { line, .. }
            | ErrorKind::DuplicateIntent { line, .. } => Some(*line),
            ErrorKind::Script(errors) => errors.first().and_then(Error::line),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::new(ErrorKind::Io(err))
    }
}

/// Categorized error kinds for pattern matching.
#[derive(Debug, Error)]
pub enum ErrorKind {
    /// Unrecognized character in script text.
    #[error("illegal character {character:?} at {line}:{column}")]
    LexError {
        /// The offending character.
        character: char,
        /// Line number (1-indexed).
        line: u32,
        /// Column number (1-indexed).
        column: u32,
    },

    /// Unexpected token or end of input.
    #[error("parse error at {line}:{column}: {message}")]
    ParseError {
        /// Description of the parse error.
        message: String,
        /// Line number (1-indexed).
        line: u32,
        /// Column number (1-indexed).
        column: u32,
        /// The source line where the error occurred.
        context: String,
    },

    /// Two intents share a name.
    #[error("duplicate intent {name:?} at line {line}")]
    DuplicateIntent {
        /// The repeated intent name.
        name: String,
        /// Line of the second definition.
        line: u32,
    },

    /// A script failed to load; holds every diagnostic collected.
    #[error("{}", format_script_errors(.0))]
    Script(Vec<Error>),

    /// An intent was requested that the script does not define.
    #[error("Unknown intent: {name}. Available intents: {}", .available.join(", "))]
    UnknownIntent {
        /// The requested name.
        name: String,
        /// Every intent the script defines, in declaration order.
        available: Vec<String>,
    },

    /// A `call` statement named a function nobody registered.
    #[error("unregistered function: {0}")]
    UnregisteredFunction(String),

    /// A host function reported failure.
    #[error("host function {name} failed: {message}")]
    HostFunction {
        /// The function name.
        name: String,
        /// What went wrong.
        message: String,
    },

    /// Reading a script failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

fn format_script_errors(errors: &[Error]) -> String {
    match errors {
        [] => "script failed to load".to_string(),
        [only] => only.to_string(),
        [first, rest @ ..] => format!("{first} (and {} more)", rest.len()),
    }
}

/// Context about where an error occurred.
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// Script file or intent name.
    pub source: Option<String>,
    /// Line number in source.
    pub line: Option<usize>,
}

impl ErrorContext {
    /// Creates a new empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the source location.
    #[must_use]
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Sets the line.
    #[must_use]
    pub fn with_line(mut self, line: usize) -> Self {
        self.line = Some(line);
        self
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(source) = &self.source {
            write!(f, "at {source}")?;
            if let Some(line) = self.line {
                write!(f, ":{line}")?;
            }
        }
        Ok(())
    }
}

/// Result type alias using the Palaver error.
pub type Result<T> = std::result::Result<T, Error>;
