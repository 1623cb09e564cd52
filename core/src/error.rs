use thiserror::Error;

/// Failure while fetching the verse list for an identity.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("Network request failed: {0}")]
    Network(String),
    #[error("No verses found for this identity")]
    NotFound,
    #[error("Verse API call failed: {status}")]
    Http { status: u16 },
    #[error("Could not decode verse response: {0}")]
    Decode(String),
}

impl FetchError {
    /// Classifies a non-2xx response status.
    pub const fn from_status(status: u16) -> Self {
        match status {
            404 => Self::NotFound,
            status => Self::Http { status },
        }
    }

    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound)
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    #[error("Could not read {key}: {reason}")]
    Read { key: &'static str, reason: String },
    #[error("Could not write {key}: {reason}")]
    Write { key: &'static str, reason: String },
    #[error("Could not encode {key}: {reason}")]
    Encode { key: &'static str, reason: String },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IdentityError {
    #[error("Temple must not be empty")]
    EmptyTemple,
    #[error("Generation must be a positive number, got {0:?}")]
    InvalidGeneration(String),
    #[error("Name must not be empty")]
    EmptyName,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SubmitError {
    #[error("A submission is already in flight")]
    InFlight,
    #[error(transparent)]
    Identity(#[from] IdentityError),
}
