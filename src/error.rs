use std::path::PathBuf;

pub type BridgeResult<T> = Result<T, BridgeError>;

#[derive(thiserror::Error, Debug)]
pub enum BridgeError {
    #[error("I/O error: {context}")]
    Io {
        #[source]
        source: std::io::Error,
        context: String,
    },
    #[error("failed to decode '{channel}' payload")]
    Decode {
        channel: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to encode '{channel}' payload")]
    Encode {
        channel: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("unknown message channel: {0}")]
    ChannelUnknown(String),
    #[error("no preview URL available for {}", path.display())]
    UrlResolution { path: PathBuf },
    #[error("no document is open")]
    NotOpened,
    #[error("bridge event loop is gone")]
    ChannelClosed,
    #[error("file watch failed: {0}")]
    Watch(String),
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

impl From<std::io::Error> for BridgeError {
    fn from(source: std::io::Error) -> Self {
        Self::Io {
            source,
            context: "I/O operation failed".to_string(),
        }
    }
}

impl BridgeError {
    pub fn io_with_context(source: std::io::Error, context: impl Into<String>) -> Self {
        Self::Io {
            source,
            context: context.into(),
        }
    }

    pub fn decode(channel: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Decode {
            channel: channel.into(),
            source,
        }
    }

    pub fn encode(channel: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Encode {
            channel: channel.into(),
            source,
        }
    }

    pub fn channel_unknown(channel: impl Into<String>) -> Self {
        Self::ChannelUnknown(channel.into())
    }

    pub fn url_resolution(path: impl Into<PathBuf>) -> Self {
        Self::UrlResolution { path: path.into() }
    }

    pub fn watch(message: impl Into<String>) -> Self {
        Self::Watch(message.into())
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }
}
