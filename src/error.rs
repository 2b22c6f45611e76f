//! Error handling for cricket-diner

use thiserror::Error;

/// Main error type for cricket-diner
#[derive(Error, Debug)]
pub enum DinerError {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Model '{model}' failed: {message}")]
    ModelInvocation {
        model: String,
        message: String,
        status_code: Option<u16>,
    },

    #[error("All model attempts failed{}", .last.as_ref().map(|e| format!(": {}", e)).unwrap_or_default())]
    AllModelsFailed { last: Option<Box<DinerError>> },

    #[error("Network error: {message}")]
    Network {
        message: String,
        status_code: Option<u16>,
        url: Option<String>,
    },

    #[error("Parse error: {message}")]
    Parse {
        message: String,
        content: Option<String>,
    },

    #[error("IO error: {message}")]
    Io {
        message: String,
        path: Option<String>,
    },

    #[error("CLI error: {message}")]
    Cli { message: String },
}

impl DinerError {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a single-model failure
    pub fn model_invocation(
        model: impl Into<String>,
        message: impl Into<String>,
        status_code: Option<u16>,
    ) -> Self {
        Self::ModelInvocation {
            model: model.into(),
            message: message.into(),
            status_code,
        }
    }

    /// Wrap the last attempt's error once every model has failed
    pub fn all_models_failed(last: Option<DinerError>) -> Self {
        Self::AllModelsFailed {
            last: last.map(Box::new),
        }
    }

    /// Create a network error
    pub fn network(
        message: impl Into<String>,
        status_code: Option<u16>,
        url: Option<String>,
    ) -> Self {
        Self::Network {
            message: message.into(),
            status_code,
            url,
        }
    }

    /// Create a parse error
    pub fn parse(message: impl Into<String>, content: Option<String>) -> Self {
        Self::Parse {
            message: message.into(),
            content,
        }
    }

    /// Create an IO error
    pub fn io(message: impl Into<String>, path: Option<String>) -> Self {
        Self::Io {
            message: message.into(),
            path,
        }
    }

    /// Create a CLI error
    pub fn cli(message: impl Into<String>) -> Self {
        Self::Cli {
            message: message.into(),
        }
    }

    /// The error from the final model attempt, if this is an exhausted fallback chain
    pub fn last_attempt(&self) -> Option<&DinerError> {
        match self {
            Self::AllModelsFailed { last } => last.as_deref(),
            _ => None,
        }
    }

    /// Get user-friendly error message with suggestions
    pub fn user_message(&self) -> String {
        match self {
            Self::Config { message } => {
                format!("❌ Configuration problem: {}\n💡 Check your .env file or environment", message)
            }
            Self::ModelInvocation { model, message, .. } => {
                format!("❌ Model {} failed: {}\n💡 Check your API key and quota", model, message)
            }
            Self::AllModelsFailed { last } => {
                let detail = last
                    .as_ref()
                    .map_or(String::new(), |e| format!(" (last error: {})", e));
                format!("❌ Every Gemini model failed{}\n💡 Try again in a moment or set GEMINI_MODEL", detail)
            }
            Self::Network { message, status_code, .. } => {
                let status = status_code.map_or(String::new(), |c| format!(" ({})", c));
                format!("❌ Network error{}: {}\n💡 Check your internet connection", status, message)
            }
            Self::Parse { message, .. } => {
                format!("❌ Parse error: {}\n💡 Model output varies, trying again often helps", message)
            }
            Self::Io { message, path } => {
                let path_info = path.as_ref().map_or(String::new(), |p| format!(" ({})", p));
                format!("❌ File error{}: {}\n💡 Check file permissions and paths", path_info, message)
            }
            Self::Cli { message } => {
                format!("❌ Command error: {}\n💡 Use --help for usage information", message)
            }
        }
    }
}

impl From<reqwest::Error> for DinerError {
    fn from(err: reqwest::Error) -> Self {
        let status_code = err.status().map(|s| s.as_u16());
        let url = err.url().map(|u| {
            let mut u = u.clone();
            u.set_query(None);
            u.to_string()
        });
        let err = err.without_url();

        if err.is_timeout() {
            Self::network("Request timed out", status_code, url)
        } else if err.is_connect() {
            Self::network("Connection failed", status_code, url)
        } else {
            Self::network(err.to_string(), status_code, url)
        }
    }
}

impl From<serde_json::Error> for DinerError {
    fn from(err: serde_json::Error) -> Self {
        Self::parse(err.to_string(), None)
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, DinerError>;

#[macro_export]
macro_rules! config_error {
    ($msg:expr) => {
        $crate::error::DinerError::config($msg)
    };
    ($fmt:expr, $($arg:tt)*) => {
        $crate::error::DinerError::config(format!($fmt, $($arg)*))
    };
}
