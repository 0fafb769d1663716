use thiserror::Error;

/// Failures that end the program; wrong answers and quitting are not errors.
#[derive(Debug, Error)]
pub enum DrillError {
    /// stdin is not a terminal, so keystrokes cannot be read one at a time
    #[error("this drill needs an interactive terminal; run it directly in your terminal")]
    NonInteractive,

    #[error("terminal i/o failed: {0}")]
    Io(#[from] std::io::Error),

    /// The key reader stopped while a prompt was waiting for input.
    #[error("keyboard event stream closed")]
    EventStreamClosed,
}
