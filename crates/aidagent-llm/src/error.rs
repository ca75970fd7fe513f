use thiserror::Error;

/// Failures of the external alert data provider.
///
/// An empty batch is not an error; a quiet scope legitimately has zero
/// alerts. Timeouts are reported as `Unavailable`.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("alert provider unavailable: {0}")]
    Unavailable(String),

    #[error("alert provider returned malformed data: {0}")]
    MalformedResponse(String),
}

/// Failures of the external conversational responder.
#[derive(Debug, Error)]
pub enum ResponderError {
    #[error("responder unavailable: {0}")]
    Unavailable(String),

    #[error("responder returned an empty reply")]
    EmptyReply,
}
