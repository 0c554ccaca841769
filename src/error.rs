use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Catalog error: {0}")]
    Catalog(String),

    #[error("LLM error: {0}")]
    Llm(String),

    #[error("Upstream returned {status}: {body}")]
    UpstreamStatus { status: u16, body: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Address parse error: {0}")]
    AddrParse(#[from] std::net::AddrParseError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn catalog(msg: impl Into<String>) -> Self {
        Self::Catalog(msg.into())
    }

    pub fn llm(msg: impl Into<String>) -> Self {
        Self::Llm(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Stable label for operator logs. Never shown to callers.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Config(_) => "config",
            Self::Catalog(_) => "catalog",
            Self::Llm(_) => "empty_response",
            Self::UpstreamStatus { .. } => "upstream_status",
            Self::Serialization(_) => "decode",
            Self::Yaml(_) => "yaml",
            Self::Io(_) => "io",
            Self::Network(e) if e.is_decode() => "decode",
            Self::Network(e) if e.is_timeout() => "timeout",
            Self::Network(_) => "network",
            Self::AddrParse(_) => "addr_parse",
            Self::Internal(_) => "internal",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_labels() {
        assert_eq!(Error::llm("no candidates").kind(), "empty_response");
        assert_eq!(
            Error::UpstreamStatus {
                status: 403,
                body: "denied".to_string()
            }
            .kind(),
            "upstream_status"
        );
        assert_eq!(Error::config("missing model").kind(), "config");
    }

    #[test]
    fn test_upstream_status_display() {
        let err = Error::UpstreamStatus {
            status: 500,
            body: "boom".to_string(),
        };
        assert_eq!(err.to_string(), "Upstream returned 500: boom");
    }
}
