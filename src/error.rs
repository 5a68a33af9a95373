use std::fmt;

/// Everything that can go wrong outside the evolutionary loop itself.
/// Configuration and parse errors are fatal at startup; a `State` error means
/// an accessor was used before the run it reports on happened; a
/// `Persistence` error only invalidates the save, not the computed result.
#[derive(Debug, Clone)]
pub enum Error {
    Configuration(String),
    InstanceParse { path: String, message: String },
    State(&'static str),
    Persistence(String),
}

impl Error {
    pub fn configuration(message: impl Into<String>) -> Self {
        Error::Configuration(message.into())
    }

    pub fn instance_parse(path: impl Into<String>, message: impl Into<String>) -> Self {
        Error::InstanceParse {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn persistence(message: impl Into<String>) -> Self {
        Error::Persistence(message.into())
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Configuration(message) => write!(f, "invalid configuration: {}", message),
            Error::InstanceParse { path, message } => {
                write!(f, "cannot read instance {}: {}", path, message)
            }
            Error::State(message) => write!(f, "{}", message),
            Error::Persistence(message) => write!(f, "cannot save run data: {}", message),
        }
    }
}

impl std::error::Error for Error {}
