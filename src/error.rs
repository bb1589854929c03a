/// All errors that can occur while fetching vlrggapi data.
#[derive(thiserror::Error, Debug)]
pub enum VlrError {
    /// The HTTP client could not be built from the configuration.
    #[error("failed to build http client: {0}")]
    ClientBuild(#[source] reqwest::Error),

    /// HTTP request failed (network, DNS, TLS, timeout, etc.).
    #[error("http request failed for {url}: {source}")]
    Http {
        url: String,
        source: reqwest::Error,
    },

    /// Server returned a non-success HTTP status code.
    #[error("unexpected status {status} for {url}")]
    UnexpectedStatus {
        url: String,
        status: reqwest::StatusCode,
    },

    /// Failed to read the response body as text.
    #[error("failed to read response body from {url}: {source}")]
    ResponseBody {
        url: String,
        source: reqwest::Error,
    },

    /// The response body was not valid JSON.
    #[error("failed to decode response from {url}: {source}")]
    Decode {
        url: String,
        source: serde_json::Error,
    },

    /// The JSON body did not have the expected `data.segments` envelope.
    #[error("missing {context} in response from {url}")]
    MissingEnvelope { url: String, context: &'static str },

    /// A tournament-scoped fetch was requested with nothing selected.
    #[error("no tournament selected")]
    NoTournamentSelected,
}

/// Coarse classification of a [`VlrError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The source was unreachable or answered with a non-2xx status.
    Network,
    /// The source answered, but not with the expected shape.
    Format,
    /// Nothing to fetch yet. A gating condition rather than a failure.
    DataAbsent,
}

impl VlrError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            VlrError::Http { .. } | VlrError::UnexpectedStatus { .. } => ErrorKind::Network,
            VlrError::ResponseBody { .. } | VlrError::ClientBuild(_) => ErrorKind::Network,
            VlrError::Decode { .. } | VlrError::MissingEnvelope { .. } => ErrorKind::Format,
            VlrError::NoTournamentSelected => ErrorKind::DataAbsent,
        }
    }

    /// Whether a failed fetch should be attempted again. Only the selection
    /// gate is final.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, VlrError::NoTournamentSelected)
    }
}

pub type Result<T> = std::result::Result<T, VlrError>;
