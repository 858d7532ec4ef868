use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;
use tracker_core::model::{FileId, FileProgress, FileRow, Section, UserSession};

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("conflict")]
    Conflict,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Identifies whose progress in which section a call touches.
///
/// The access token rides along because the remote backend authenticates
/// every request with the signed-in user's token; the local backend ignores
/// it.
#[derive(Debug, Clone)]
pub struct ProgressScope {
    pub user_email: String,
    pub section_id: String,
    pub access_token: String,
}

impl ProgressScope {
    #[must_use]
    pub fn new(session: &UserSession, section: &Section) -> Self {
        Self {
            user_email: session.email.clone(),
            section_id: section.id().to_string(),
            access_token: session.access_token.clone(),
        }
    }
}

/// Repository contract for the persisted session record.
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Fetch the stored session, if any.
    ///
    /// A malformed stored record reads as `None`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the store cannot be read.
    async fn load_session(&self) -> Result<Option<UserSession>, StorageError>;

    /// Persist or replace the session record.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the record cannot be stored.
    async fn save_session(&self, session: &UserSession) -> Result<(), StorageError>;

    /// Remove the stored session record.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the store cannot be written.
    async fn clear_session(&self) -> Result<(), StorageError>;
}

/// Repository contract for per-file study progress.
#[async_trait]
pub trait ProgressRepository: Send + Sync {
    /// Fetch all stored progress for the scoped (user, section) pair.
    ///
    /// Missing or malformed state reads as empty.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the store cannot be reached.
    async fn load_progress(
        &self,
        scope: &ProgressScope,
    ) -> Result<HashMap<FileId, FileProgress>, StorageError>;

    /// Persist one file's full row within the scoped (user, section) pair.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the row cannot be stored.
    async fn upsert_row(&self, scope: &ProgressScope, row: &FileRow) -> Result<(), StorageError>;
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    session: Arc<Mutex<Option<UserSession>>>,
    progress: Arc<Mutex<HashMap<(String, String), HashMap<FileId, FileProgress>>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self {
            session: Arc::new(Mutex::new(None)),
            progress: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}

#[async_trait]
impl SessionRepository for InMemoryRepository {
    async fn load_session(&self) -> Result<Option<UserSession>, StorageError> {
        let guard = self
            .session
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.clone())
    }

    async fn save_session(&self, session: &UserSession) -> Result<(), StorageError> {
        let mut guard = self
            .session
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        *guard = Some(session.clone());
        Ok(())
    }

    async fn clear_session(&self) -> Result<(), StorageError> {
        let mut guard = self
            .session
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        *guard = None;
        Ok(())
    }
}

#[async_trait]
impl ProgressRepository for InMemoryRepository {
    async fn load_progress(
        &self,
        scope: &ProgressScope,
    ) -> Result<HashMap<FileId, FileProgress>, StorageError> {
        let guard = self
            .progress
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard
            .get(&(scope.user_email.clone(), scope.section_id.clone()))
            .cloned()
            .unwrap_or_default())
    }

    async fn upsert_row(&self, scope: &ProgressScope, row: &FileRow) -> Result<(), StorageError> {
        let mut guard = self
            .progress
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard
            .entry((scope.user_email.clone(), scope.section_id.clone()))
            .or_default()
            .insert(row.id.clone(), row.progress());
        Ok(())
    }
}

/// Aggregates session and progress repositories behind trait objects for easy
/// backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub sessions: Arc<dyn SessionRepository>,
    pub progress: Arc<dyn ProgressRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let repo = InMemoryRepository::new();
        let sessions: Arc<dyn SessionRepository> = Arc::new(repo.clone());
        let progress: Arc<dyn ProgressRepository> = Arc::new(repo);
        Self { sessions, progress }
    }
}
