use thiserror::Error;

#[derive(Error, Debug)]
pub enum TarotError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Card index {index} is outside the deck (0..=77)")]
    InvalidIndex { index: usize },

    #[error("Unknown card name: {name:?}")]
    UnknownCardName { name: String },

    #[error("Unknown spread type: {key:?}")]
    UnknownSpread { key: String },

    #[error("Invalid reading request: {message}")]
    InvalidRequest { message: String },

    #[error("Reading {id} not found")]
    ReadingNotFound { id: u64 },

    #[error("Interpretation service returned HTTP {status}: {body}")]
    HttpError { status: u16, body: String },

    #[error("Interpretation service rejected the API key")]
    InvalidApiKey,

    #[error("Interpretation service rate limited the request")]
    RateLimited,

    #[error("Missing configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value for {field}: {value:?} ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration validation failed for {field}: {message}")]
    ConfigValidationError { field: String, message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Storage,
    Data,
    Deck,
    Configuration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Medium,
    High,
    Critical,
}

impl TarotError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::ApiError(_) | Self::HttpError { .. } | Self::InvalidApiKey | Self::RateLimited => {
                ErrorCategory::Network
            }
            Self::IoError(_) | Self::ReadingNotFound { .. } => ErrorCategory::Storage,
            Self::SerializationError(_) | Self::InvalidRequest { .. } => ErrorCategory::Data,
            Self::InvalidIndex { .. } | Self::UnknownCardName { .. } | Self::UnknownSpread { .. } => {
                ErrorCategory::Deck
            }
            Self::MissingConfigError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::ConfigValidationError { .. } => ErrorCategory::Configuration,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::ApiError(_) | Self::HttpError { .. } | Self::RateLimited => ErrorSeverity::Medium,
            Self::IoError(_) | Self::SerializationError(_) => ErrorSeverity::Critical,
            _ => ErrorSeverity::High,
        }
    }

    /// Whether retrying the same call later could succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::ApiError(e) => e.is_timeout() || e.is_connect(),
            Self::RateLimited => true,
            Self::HttpError { status, .. } => (500..=599).contains(status),
            _ => false,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Network => match self {
                Self::InvalidApiKey => "Set OPENAI_API_KEY or [openai].api_key to a valid key",
                _ => "Check network connectivity and the [openai].base_url setting, then retry",
            },
            ErrorCategory::Storage => match self {
                Self::ReadingNotFound { .. } => "List readings with `sol-tarot history --wallet <address>`",
                _ => "Check that the data directory exists and is writable",
            },
            ErrorCategory::Data => "Check that the reading has three cards at positions 1, 2 and 3",
            ErrorCategory::Deck => "Use an index between 0 and 77 or a name such as `the-fool` or `3-of-cups`",
            ErrorCategory::Configuration => "Review the TOML configuration and command line flags",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::ApiError(_) => "Could not reach the interpretation service".to_string(),
            Self::IoError(e) => format!("Could not access the reading store: {}", e),
            Self::ReadingNotFound { id } => format!("No reading with id {}", id),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, TarotError>;
