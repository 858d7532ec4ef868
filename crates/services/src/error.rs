//! Shared error types for the services crate.

use thiserror::Error;

use storage::repository::StorageError;
use storage::sqlite::SqliteInitError;

/// Errors emitted by the sign-in flow.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AuthError {
    #[error("sign-in is not configured")]
    Disabled,
    #[error("provider rejected the consent request: {0}")]
    ConsentDenied(String),
    #[error("redirect carried no authorization code")]
    MissingCode,
    #[error("redirect state does not match the request")]
    StateMismatch,
    #[error("token exchange failed with status {0}")]
    TokenStatus(reqwest::StatusCode),
    #[error("profile fetch failed with status {0}")]
    UserinfoStatus(reqwest::StatusCode),
    #[error("redirect listener failed: {0}")]
    Listener(#[from] std::io::Error),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// Errors emitted by the folder listing client.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DriveError {
    #[error("file listing failed with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// Errors emitted by `ProgressService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProgressError {
    #[error(transparent)]
    Listing(#[from] DriveError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `SessionService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionServiceError {
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
    #[error("unknown backend {0:?}, expected \"local\" or \"firestore\"")]
    UnknownBackend(String),
    #[error("the firestore backend needs TUHFAH_FIRESTORE_PROJECT")]
    MissingFirestoreProject,
}
