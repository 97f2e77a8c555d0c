use std::fmt;

/// Infrastructure failure while persisting or reading submissions.
#[derive(Debug)]
pub enum StoreError {
    /// A record already exists under the allocated identifier.
    AlreadyExists(String),
    DatabaseError(String),
    ConnectionError(String),
    SerializationError(String),
    /// Generic error that wraps any error implementing std::error::Error
    Generic(Box<dyn std::error::Error + Send + Sync>),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::AlreadyExists(msg) => write!(f, "Already Exists: {}", msg),
            StoreError::DatabaseError(msg) => write!(f, "Database Error: {}", msg),
            StoreError::ConnectionError(msg) => write!(f, "Connection Error: {}", msg),
            StoreError::SerializationError(msg) => write!(f, "Serialization Error: {}", msg),
            StoreError::Generic(err) => write!(f, "Store Error: {}", err),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StoreError::Generic(err) => Some(err.as_ref()),
            _ => None,
        }
    }
}

// Convenient constructors
impl StoreError {
    pub fn already_exists<T: Into<String>>(msg: T) -> Self {
        StoreError::AlreadyExists(msg.into())
    }

    pub fn database<T: Into<String>>(msg: T) -> Self {
        StoreError::DatabaseError(msg.into())
    }

    pub fn connection<T: Into<String>>(msg: T) -> Self {
        StoreError::ConnectionError(msg.into())
    }
}

// MongoDB-specific conversions
impl From<mongodb::error::Error> for StoreError {
    fn from(err: mongodb::error::Error) -> Self {
        use mongodb::error::ErrorKind;

        match err.kind.as_ref() {
            ErrorKind::Write(_) => {
                // Duplicate key (E11000) means the _id was already taken
                let err_msg = err.to_string();
                if err_msg.contains("E11000") {
                    StoreError::AlreadyExists(format!("Duplicate key: {}", err))
                } else {
                    StoreError::DatabaseError(format!("Write error: {}", err))
                }
            }
            ErrorKind::Authentication { .. } => {
                StoreError::ConnectionError(format!("Authentication failed: {}", err))
            }
            ErrorKind::Io(_) | ErrorKind::ServerSelection { .. } => {
                StoreError::ConnectionError(format!("Connection error: {}", err))
            }
            ErrorKind::BsonSerialization(_) | ErrorKind::BsonDeserialization(_) => {
                StoreError::SerializationError(format!("BSON error: {}", err))
            }
            _ => StoreError::Generic(Box::new(err)),
        }
    }
}

pub type StoreResult<T> = Result<T, StoreError>;
