use std::sync::Arc;

use storage::repository::{ProgressRepository, ProgressScope};
use tracker_core::model::{FileRow, merge_rows};

use crate::drive::FileListing;
use crate::error::ProgressError;

/// Builds the rows a section view shows and writes changes back one file at
/// a time.
#[derive(Clone)]
pub struct ProgressService {
    listing: Arc<dyn FileListing>,
    progress: Arc<dyn ProgressRepository>,
}

impl ProgressService {
    #[must_use]
    pub fn new(listing: Arc<dyn FileListing>, progress: Arc<dyn ProgressRepository>) -> Self {
        Self { listing, progress }
    }

    /// Loads stored progress, fetches the folder listing, and merges the two.
    /// Rows come back in listing order with progress defaulting to unwatched
    /// and empty notes.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError` if the store or the listing cannot be reached.
    pub async fn load_rows(
        &self,
        scope: &ProgressScope,
        folder_id: &str,
    ) -> Result<Vec<FileRow>, ProgressError> {
        let saved = self.progress.load_progress(scope).await?;
        let records = self
            .listing
            .list_folder(&scope.access_token, folder_id)
            .await?;
        Ok(merge_rows(records, &saved))
    }

    /// Persists one row's progress immediately. Called once per toggle or
    /// notes save, never batched.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError` if the row cannot be stored.
    pub async fn save_row(&self, scope: &ProgressScope, row: &FileRow) -> Result<(), ProgressError> {
        Ok(self.progress.upsert_row(scope, row).await?)
    }
}
