use crate::platform::ChannelKind;

pub type AppResult<T> = Result<T, AppError>;

#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("I/O error: {context}")]
    Io {
        #[source]
        source: std::io::Error,
        context: String,
    },
    #[error("failed to register {channel} back channel: {message}")]
    Registration {
        channel: ChannelKind,
        message: String,
    },
    #[error("host history write failed: {0}")]
    HostHistory(String),
    #[error("scenario step {step} failed: {message}")]
    Scenario { step: usize, message: String },
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

impl AppError {
    pub fn io_with_context(source: std::io::Error, context: impl Into<String>) -> Self {
        Self::Io {
            source,
            context: context.into(),
        }
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    pub fn registration(channel: ChannelKind, message: impl Into<String>) -> Self {
        Self::Registration {
            channel,
            message: message.into(),
        }
    }

    pub fn host_history(message: impl Into<String>) -> Self {
        Self::HostHistory(message.into())
    }

    pub fn scenario(step: usize, message: impl Into<String>) -> Self {
        Self::Scenario {
            step,
            message: message.into(),
        }
    }
}
