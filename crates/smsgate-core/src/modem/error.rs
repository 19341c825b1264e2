//! Modem driver errors

use thiserror::Error;

/// Errors that can occur while driving the modem
#[derive(Error, Debug)]
pub enum ModemError {
    /// The serial port could not be opened or configured.
    #[error("Serial port error: {0}")]
    Serial(String),

    /// Hard failure on the transport channel. Timeouts are not errors:
    /// the engine reports them by returning whatever was read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A session operation was attempted before initialization completed.
    #[error("Modem session is not ready")]
    NotReady,

    /// A setup step's response lacked the success token.
    #[error("Initialization failed at '{step}': {response:?}")]
    InitFailed {
        /// Description of the failing setup step
        step: &'static str,
        /// Raw response observed for that step
        response: String,
    },

    /// A command's response lacked the success token.
    #[error("{command} failed: {response:?}")]
    CommandFailed {
        /// The wire command line that was sent
        command: String,
        /// Raw response observed
        response: String,
    },

    /// A delete-by-index request was not acknowledged.
    #[error("Failed to delete message {index}: {response:?}")]
    DeleteFailed {
        /// Storage index of the message that was not deleted
        index: u32,
        /// Raw response observed
        response: String,
    },
}
