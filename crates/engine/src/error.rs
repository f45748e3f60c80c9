/// Errors raised while executing a workflow against its target endpoint.
///
/// The taxonomy mirrors how failures surface to the user: configuration
/// errors fail before any network I/O, transport and HTTP errors carry the
/// upstream's words, and cancellation is its own terminal outcome.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// The template's invocation descriptor is unusable (empty endpoint,
    /// unknown transform name). Raised before any network attempt.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The request could not be assembled or encoded.
    #[error("Request error: {0}")]
    Request(String),

    /// The network call itself failed (connect, DNS, timeout).
    #[error("Transport error: {0}")]
    Transport(String),

    /// The target answered with a non-success status.
    #[error("Workflow endpoint returned {status}: {message}")]
    Http { status: u16, message: String },

    /// The response body could not be read or parsed.
    #[error("Response decode error: {0}")]
    Decode(String),

    /// The run was cancelled at the network suspension point.
    #[error("Execution cancelled")]
    Cancelled,
}
