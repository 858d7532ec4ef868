use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

use crate::repository::{
    ProgressRepository, ProgressScope, SessionRepository, Storage, StorageError,
};
use crate::sqlite::{SqliteInitError, SqliteRepository};
use tracker_core::model::{FileId, FileProgress, FileRow};

const FIRESTORE_BASE: &str = "https://firestore.googleapis.com/v1";
const PAGE_SIZE: u32 = 300;

/// Progress store backed by the Firestore REST API.
///
/// Documents live under `users/{email}/subjects/{section}/files/{file_id}`
/// and hold exactly the watched flag and the notes text. Every request is
/// authenticated with the signed-in user's bearer token from the scope.
#[derive(Clone)]
pub struct FirestoreStore {
    client: reqwest::Client,
    project_id: String,
}

impl FirestoreStore {
    #[must_use]
    pub fn new(project_id: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            project_id: project_id.into(),
        }
    }

    fn collection_url(&self, scope: &ProgressScope) -> String {
        format!(
            "{FIRESTORE_BASE}/projects/{}/databases/(default)/documents/users/{}/subjects/{}/files",
            self.project_id, scope.user_email, scope.section_id
        )
    }

    fn document_url(&self, scope: &ProgressScope, file_id: &FileId) -> String {
        format!("{}/{}", self.collection_url(scope), file_id)
    }
}

#[async_trait]
impl ProgressRepository for FirestoreStore {
    async fn load_progress(
        &self,
        scope: &ProgressScope,
    ) -> Result<HashMap<FileId, FileProgress>, StorageError> {
        let url = self.collection_url(scope);
        let mut progress = HashMap::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut query = vec![("pageSize", PAGE_SIZE.to_string())];
            if let Some(token) = &page_token {
                query.push(("pageToken", token.clone()));
            }

            let response = self
                .client
                .get(&url)
                .query(&query)
                .bearer_auth(&scope.access_token)
                .send()
                .await
                .map_err(|err| StorageError::Connection(err.to_string()))?;

            if !response.status().is_success() {
                return Err(StorageError::Connection(format!(
                    "firestore list failed with status {}",
                    response.status()
                )));
            }

            let page: ListDocumentsResponse = response
                .json()
                .await
                .map_err(|err| StorageError::Serialization(err.to_string()))?;

            for document in page.documents {
                let Some(id) = document.file_id() else {
                    continue;
                };
                progress.insert(id, document.fields.unwrap_or_default().into_progress());
            }

            page_token = page.next_page_token;
            if page_token.is_none() {
                break;
            }
        }

        Ok(progress)
    }

    async fn upsert_row(&self, scope: &ProgressScope, row: &FileRow) -> Result<(), StorageError> {
        let body = WriteDocument {
            fields: ProgressFields::from_progress(&row.progress()),
        };

        let response = self
            .client
            .patch(self.document_url(scope, &row.id))
            .bearer_auth(&scope.access_token)
            .json(&body)
            .send()
            .await
            .map_err(|err| StorageError::Connection(err.to_string()))?;

        if !response.status().is_success() {
            return Err(StorageError::Connection(format!(
                "firestore write failed with status {}",
                response.status()
            )));
        }

        Ok(())
    }
}

impl Storage {
    /// Build a `Storage` that keeps progress in Firestore while the session
    /// record stays in local `SQLite`.
    ///
    /// # Errors
    ///
    /// Returns `SqliteInitError` if the local session store cannot be opened.
    pub async fn firestore(
        database_url: &str,
        project_id: impl Into<String>,
    ) -> Result<Self, SqliteInitError> {
        let local = SqliteRepository::connect(database_url).await?;
        local.migrate().await?;
        let sessions: Arc<dyn SessionRepository> = Arc::new(local);
        let progress: Arc<dyn ProgressRepository> = Arc::new(FirestoreStore::new(project_id));
        Ok(Self { sessions, progress })
    }
}

//
// ─── WIRE TYPES ────────────────────────────────────────────────────────────────
//

#[derive(Debug, Deserialize)]
struct ListDocumentsResponse {
    #[serde(default)]
    documents: Vec<FirestoreDocument>,
    #[serde(default, rename = "nextPageToken")]
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FirestoreDocument {
    name: String,
    #[serde(default)]
    fields: Option<ProgressFields>,
}

impl FirestoreDocument {
    /// The document id is the last path segment of the resource name.
    fn file_id(&self) -> Option<FileId> {
        let id = self.name.rsplit('/').next()?;
        if id.is_empty() {
            return None;
        }
        Some(FileId::new(id))
    }
}

#[derive(Debug, Serialize)]
struct WriteDocument {
    fields: ProgressFields,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct ProgressFields {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    watched: Option<BooleanValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    notes: Option<StringValue>,
}

impl ProgressFields {
    fn from_progress(progress: &FileProgress) -> Self {
        Self {
            watched: Some(BooleanValue {
                boolean_value: progress.watched,
            }),
            notes: Some(StringValue {
                string_value: progress.notes.clone(),
            }),
        }
    }

    fn into_progress(self) -> FileProgress {
        FileProgress {
            watched: self.watched.map(|field| field.boolean_value).unwrap_or_default(),
            notes: self.notes.map(|field| field.string_value).unwrap_or_default(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct BooleanValue {
    #[serde(rename = "booleanValue")]
    boolean_value: bool,
}

#[derive(Debug, Serialize, Deserialize)]
struct StringValue {
    #[serde(rename = "stringValue")]
    string_value: String,
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
