use derive_more::Display;
use relserde_core::{
    catalog::CatalogError,
    config::ConfigError,
    engine::SerializeError,
    error::{ErrorClass, ErrorOrigin as CoreErrorOrigin, InternalError},
};
use serde::{Deserialize, Serialize};
use thiserror::Error as ThisError;

///
/// Error
/// Public error type with a stable kind + origin taxonomy.
///

#[derive(Debug, Deserialize, Serialize, ThisError)]
#[error("{message}")]
pub struct Error {
    pub kind: ErrorKind,
    pub origin: ErrorOrigin,
    pub message: String,
}

impl Error {
    pub fn new(kind: ErrorKind, origin: ErrorOrigin, message: impl Into<String>) -> Self {
        Self {
            kind,
            origin,
            message: message.into(),
        }
    }
}

impl From<InternalError> for Error {
    fn from(err: InternalError) -> Self {
        let kind = match err.class {
            ErrorClass::Configuration => ErrorKind::Configuration,
            ErrorClass::Load => ErrorKind::Load,
            ErrorClass::Unsupported => ErrorKind::Unsupported,
            ErrorClass::InvariantViolation => ErrorKind::Internal,
        };

        Self::new(kind, err.origin.into(), err.message)
    }
}

impl From<CatalogError> for Error {
    fn from(err: CatalogError) -> Self {
        InternalError::from(err).into()
    }
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        InternalError::from(err).into()
    }
}

impl From<SerializeError> for Error {
    fn from(err: SerializeError) -> Self {
        InternalError::from(err).into()
    }
}

///
/// ErrorKind
/// Public error taxonomy for callers.
///

#[derive(Clone, Copy, Debug, Deserialize, Display, Eq, PartialEq, Serialize)]
pub enum ErrorKind {
    /// Entity models or serializer settings are invalid.
    Configuration,

    /// A lazy value failed to load.
    Load,

    /// The graph cannot be written with the current settings.
    Unsupported,

    /// The caller cannot remediate this.
    Internal,
}

///
/// ErrorOrigin
/// Public origin taxonomy for callers.
///

#[derive(Clone, Copy, Debug, Deserialize, Display, Eq, PartialEq, Serialize)]
pub enum ErrorOrigin {
    Catalog,
    Config,
    Proxy,
    Serialize,
}

impl From<CoreErrorOrigin> for ErrorOrigin {
    fn from(origin: CoreErrorOrigin) -> Self {
        match origin {
            CoreErrorOrigin::Catalog => Self::Catalog,
            CoreErrorOrigin::Config => Self::Config,
            CoreErrorOrigin::Proxy => Self::Proxy,
            CoreErrorOrigin::Serialize => Self::Serialize,
        }
    }
}
