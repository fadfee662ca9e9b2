use thiserror::Error;

/// Top-level error type for the `tpswitch-api` crate.
///
/// Every failure the session and extractor can hit is one of these variants.
/// The plain (non-`try_`) client methods absorb them into empty/`false`
/// results after logging; the `try_` methods hand them to the caller.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// Login rejected (bad credentials, or the success marker was missing).
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    /// A request was short-circuited because the lazy login failed.
    #[error("Not authenticated -- login did not succeed")]
    NotAuthenticated,

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, timeout, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The switch answered with a non-success status code.
    #[error("HTTP {status} from {path}")]
    Status { status: u16, path: String },

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS setup or HTTP client construction error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Data ────────────────────────────────────────────────────────
    /// A page did not contain a script array the report depends on.
    #[error("Array `{name}` not found in page")]
    MissingArray { name: &'static str },

    /// The switch returned an empty body.
    #[error("Empty response from {path}")]
    EmptyResponse { path: String },

    // ── Caller ──────────────────────────────────────────────────────
    /// An argument cannot be encoded into the switch's request format.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

/// Coarse classification of an [`Error`].
///
/// Lets callers react differently to "log in again", "network is down"
/// and "the page had nothing usable" without matching every variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Authentication,
    Transport,
    NoData,
    InvalidArgument,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Authentication { .. } | Self::NotAuthenticated => ErrorKind::Authentication,
            Self::Transport(_) | Self::Status { .. } | Self::InvalidUrl(_) | Self::Tls(_) => {
                ErrorKind::Transport
            }
            Self::MissingArray { .. } | Self::EmptyResponse { .. } => ErrorKind::NoData,
            Self::InvalidArgument(_) => ErrorKind::InvalidArgument,
        }
    }

    /// Returns `true` if this error suggests the session cookie is no
    /// longer valid and a fresh login might resolve it.
    pub fn is_auth_expired(&self) -> bool {
        match self {
            Self::Authentication { .. } | Self::NotAuthenticated => true,
            Self::Status { status, .. } => matches!(status, 401 | 403),
            _ => false,
        }
    }
}
