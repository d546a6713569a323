use std::{error::Error, fmt};

use model::session::InvalidSessionHash;

pub mod client;
pub mod database;
pub mod memory;
pub mod session;

#[derive(Debug)]
pub enum RequestError {
    /// No marker with the requested id exists.
    NotFound,
    /// The marker exists but belongs to another session.
    SessionMismatch,
    InvalidSessionHash(InvalidSessionHash),
    InvalidInput(String),
    SessionHash(session::SessionHashError),
    Other(Box<dyn Error + Send + Sync>),
}

impl RequestError {
    pub fn other<T: Error + Send + Sync + 'static>(why: T) -> Self {
        Self::Other(Box::new(why))
    }

    pub fn invalid_input<S: Into<String>>(message: S) -> Self {
        Self::InvalidInput(message.into())
    }

    /// Whether the request addressed a marker the caller can not see. Wrong
    /// ids and foreign ids both end up here.
    pub fn is_inaccessible(&self) -> bool {
        matches!(self, Self::NotFound | Self::SessionMismatch)
    }
}

impl fmt::Display for RequestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => f.write_str("marker does not exist"),
            Self::SessionMismatch => f.write_str("marker belongs to another session"),
            Self::InvalidSessionHash(why) => write!(f, "{}", why),
            Self::InvalidInput(message) => write!(f, "invalid input: {}", message),
            Self::SessionHash(why) => write!(f, "{}", why),
            Self::Other(why) => write!(f, "{}", why),
        }
    }
}

impl Error for RequestError {}

impl From<database::DatabaseError> for RequestError {
    fn from(value: database::DatabaseError) -> Self {
        match value {
            database::DatabaseError::NotFound => Self::NotFound,
            database::DatabaseError::Other(why) => Self::Other(why),
        }
    }
}

impl From<InvalidSessionHash> for RequestError {
    fn from(why: InvalidSessionHash) -> Self {
        Self::InvalidSessionHash(why)
    }
}

impl From<session::SessionHashError> for RequestError {
    fn from(why: session::SessionHashError) -> Self {
        Self::SessionHash(why)
    }
}

pub type RequestResult<O> = Result<O, RequestError>;
