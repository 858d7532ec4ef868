use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::error::DriveError;
use tracker_core::model::{FileId, FileRecord};

const FILES_ENDPOINT: &str = "https://www.googleapis.com/drive/v3/files";
const LIST_FIELDS: &str = "files(id,name,webViewLink,mimeType)";

/// Port for listing the files of one Drive folder.
///
/// The production implementation talks to the Drive API; tests substitute a
/// canned listing.
#[async_trait]
pub trait FileListing: Send + Sync {
    /// Lists the direct children of `folder_id`, in the order the backend
    /// returns them.
    ///
    /// # Errors
    ///
    /// Returns `DriveError` if the request fails or the backend answers with
    /// a non-success status.
    async fn list_folder(
        &self,
        access_token: &str,
        folder_id: &str,
    ) -> Result<Vec<FileRecord>, DriveError>;
}

#[derive(Clone, Default)]
pub struct DriveClient {
    client: Client,
}

impl DriveClient {
    #[must_use]
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }
}

fn folder_query(folder_id: &str) -> String {
    format!("'{folder_id}' in parents")
}

#[async_trait]
impl FileListing for DriveClient {
    async fn list_folder(
        &self,
        access_token: &str,
        folder_id: &str,
    ) -> Result<Vec<FileRecord>, DriveError> {
        let query = folder_query(folder_id);
        let response = self
            .client
            .get(FILES_ENDPOINT)
            .query(&[("q", query.as_str()), ("fields", LIST_FIELDS)])
            .bearer_auth(access_token)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(DriveError::HttpStatus(response.status()));
        }

        let body: FileListResponse = response.json().await?;
        Ok(body.files.into_iter().map(DriveFile::into_record).collect())
    }
}

#[derive(Debug, Deserialize)]
struct FileListResponse {
    #[serde(default)]
    files: Vec<DriveFile>,
}

#[derive(Debug, Deserialize)]
struct DriveFile {
    id: String,
    name: String,
    #[serde(default, rename = "webViewLink")]
    web_view_link: String,
}

impl DriveFile {
    fn into_record(self) -> FileRecord {
        FileRecord {
            id: FileId::new(self.id),
            name: self.name,
            view_url: self.web_view_link,
        }
    }
}
