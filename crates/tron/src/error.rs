use thiserror::Error;

/// Errors produced by the Tron payment core.
///
/// The orchestrator splits these into two classes: decode and signing
/// failures mean external input violated a codec invariant and there is no
/// well-defined recovery; transport, protocol and rpc failures are expected
/// to clear on a later attempt against the node.
#[derive(Debug, Error)]
pub enum Error {
    /// Malformed base58/hex from external input. Fatal.
    #[error("decode {what}: {message}")]
    Decode { what: &'static str, message: String },

    /// Connection failure, timeout, or request construction failure. Retryable.
    #[error("{op}: transport: {message}")]
    Transport { op: &'static str, message: String },

    /// Non-200 status or a structurally bad response (missing txID, empty
    /// result, result flag false). Retryable; carries the body for diagnosis.
    #[error("{op}: status={status} body={body}")]
    Protocol {
        op: &'static str,
        status: u16,
        body: String,
    },

    /// JSON-RPC `error` object in an otherwise well-formed response. Retryable.
    #[error("{op}: rpc error: {message}")]
    Rpc { op: &'static str, message: String },

    /// Bad key material or an undecodable signing digest. Fatal.
    #[error("signing: {message}")]
    Signing { message: String },
}

impl Error {
    pub fn decode(what: &'static str, message: impl ToString) -> Self {
        Error::Decode {
            what,
            message: message.to_string(),
        }
    }

    pub fn is_fatal(&self) -> bool {
        matches!(self, Error::Decode { .. } | Error::Signing { .. })
    }
}

pub type Result<T> = std::result::Result<T, Error>;
