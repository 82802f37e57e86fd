use thiserror::Error;

/// Errors raised by the codec, the session driver and the transports.
///
/// The variants fall into the classes the protocol layer distinguishes:
/// framing (`Overrun`, `Length`), protocol validation (`Protocol`,
/// `CipStatus`, `NoSuchConnection`), unsupported operations (`Unsupported`)
/// and everything coming from the outside world (`Io`, `Config`, `Json`).
#[derive(Debug, Error)]
pub enum EipError {
    #[error("buffer overrun: needed {needed} bytes but only {remaining} remain")]
    Overrun { needed: usize, remaining: usize },

    #[error("length mismatch: {0}")]
    Length(String),

    #[error("protocol error: {0}")]
    Protocol(String),

    #[error("CIP service 0x{service:02X} failed with general status 0x{status:02X}")]
    CipStatus {
        service: u8,
        status: u8,
        additional_status: Vec<u8>,
    },

    #[error("no open connection at index {0}")]
    NoSuchConnection(usize),

    #[error("{0} is not supported")]
    Unsupported(&'static str),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl EipError {
    pub(crate) fn protocol(msg: impl Into<String>) -> Self {
        EipError::Protocol(msg.into())
    }

    pub(crate) fn length(msg: impl Into<String>) -> Self {
        EipError::Length(msg.into())
    }

    /// A read or write ran past the frame, or a declared length disagreed
    /// with the bytes actually present.
    pub fn is_framing(&self) -> bool {
        matches!(self, EipError::Overrun { .. } | EipError::Length(_))
    }

    /// The peer answered, but the answer failed validation.
    pub fn is_protocol(&self) -> bool {
        matches!(
            self,
            EipError::Protocol(_) | EipError::CipStatus { .. } | EipError::NoSuchConnection(_)
        )
    }

    pub fn is_unsupported(&self) -> bool {
        matches!(self, EipError::Unsupported(_))
    }
}

pub type Result<T> = std::result::Result<T, EipError>;
