use std::fmt;

/// Errors raised while fetching or profiling GitHub users
#[derive(Debug)]
pub enum GhProfileError {
    /// Username that GitHub would never accept
    InvalidUsername(String),
    /// Repository whose languages endpoint answered 404
    RepositoryNotFound(String),
    /// GitHub API answered with a non-success status
    GitHub(String),
    /// Configuration errors
    Config(String),
    /// File I/O errors
    Io(std::io::Error),
    /// JSON parsing errors
    Json(serde_json::Error),
    /// YAML parsing errors
    Yaml(serde_yaml::Error),
    /// HTTP request errors
    Http(reqwest::Error),
    /// Generic errors with message
    Generic(String),
}

impl GhProfileError {
    /// Status the HTTP API answers with for this error
    pub fn http_status(&self) -> u16 {
        match self {
            GhProfileError::InvalidUsername(_) => 400,
            GhProfileError::RepositoryNotFound(_) => 404,
            GhProfileError::GitHub(_) | GhProfileError::Http(_) | GhProfileError::Json(_) => 502,
            _ => 500,
        }
    }
}

impl fmt::Display for GhProfileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GhProfileError::InvalidUsername(name) => write!(f, "Invalid GitHub username: {:?}", name),
            GhProfileError::RepositoryNotFound(repo) => write!(f, "Repository not found: {}", repo),
            GhProfileError::GitHub(msg) => write!(f, "GitHub API error: {}", msg),
            GhProfileError::Config(msg) => write!(f, "Configuration error: {}", msg),
            GhProfileError::Io(err) => write!(f, "I/O error: {}", err),
            GhProfileError::Json(err) => write!(f, "JSON error: {}", err),
            GhProfileError::Yaml(err) => write!(f, "YAML error: {}", err),
            GhProfileError::Http(err) => write!(f, "HTTP error: {}", err),
            GhProfileError::Generic(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for GhProfileError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GhProfileError::Io(err) => Some(err),
            GhProfileError::Json(err) => Some(err),
            GhProfileError::Yaml(err) => Some(err),
            GhProfileError::Http(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for GhProfileError {
    fn from(err: std::io::Error) -> Self {
        GhProfileError::Io(err)
    }
}

impl From<serde_json::Error> for GhProfileError {
    fn from(err: serde_json::Error) -> Self {
        GhProfileError::Json(err)
    }
}

impl From<serde_yaml::Error> for GhProfileError {
    fn from(err: serde_yaml::Error) -> Self {
        GhProfileError::Yaml(err)
    }
}

impl From<reqwest::Error> for GhProfileError {
    fn from(err: reqwest::Error) -> Self {
        GhProfileError::Http(err)
    }
}

impl From<url::ParseError> for GhProfileError {
    fn from(err: url::ParseError) -> Self {
        GhProfileError::Config(err.to_string())
    }
}

impl From<std::net::AddrParseError> for GhProfileError {
    fn from(err: std::net::AddrParseError) -> Self {
        GhProfileError::Config(err.to_string())
    }
}

impl From<std::num::ParseIntError> for GhProfileError {
    fn from(err: std::num::ParseIntError) -> Self {
        GhProfileError::Generic(err.to_string())
    }
}

impl From<reqwest::header::InvalidHeaderValue> for GhProfileError {
    fn from(err: reqwest::header::InvalidHeaderValue) -> Self {
        GhProfileError::Config(err.to_string())
    }
}

impl From<String> for GhProfileError {
    fn from(err: String) -> Self {
        GhProfileError::Generic(err)
    }
}

impl From<anyhow::Error> for GhProfileError {
    fn from(err: anyhow::Error) -> Self {
        GhProfileError::Generic(err.to_string())
    }
}

/// Result type alias for GhProfile operations
pub type Result<T> = std::result::Result<T, GhProfileError>;
