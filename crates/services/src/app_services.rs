use std::env;
use std::str::FromStr;
use std::sync::Arc;

use storage::repository::Storage;

use crate::drive::{DriveClient, FileListing};
use crate::error::AppServicesError;
use crate::google_auth::{GoogleAuthConfig, GoogleAuthService};
use crate::progress_service::ProgressService;
use crate::session_service::SessionService;

/// Which progress store the app runs against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Backend {
    #[default]
    Local,
    Firestore,
}

impl FromStr for Backend {
    type Err = AppServicesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "firestore" => Ok(Self::Firestore),
            other => Err(AppServicesError::UnknownBackend(other.to_string())),
        }
    }
}

/// Assembles app-facing services over the configured backend.
#[derive(Clone)]
pub struct AppServices {
    session_service: Arc<SessionService>,
    progress_service: Arc<ProgressService>,
}

impl AppServices {
    /// Build services from environment configuration.
    ///
    /// `TUHFAH_BACKEND` selects the progress store (`local` by default);
    /// the Firestore backend additionally needs `TUHFAH_FIRESTORE_PROJECT`
    /// and widens the consent request with the datastore scope.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if the backend name is unknown, required
    /// configuration is missing, or the local store cannot be opened.
    pub async fn from_env(db_url: &str) -> Result<Self, AppServicesError> {
        let backend = match env::var("TUHFAH_BACKEND") {
            Ok(value) => value.parse()?,
            Err(_) => Backend::default(),
        };

        let storage = match backend {
            Backend::Local => Storage::local(db_url).await?,
            Backend::Firestore => {
                let project = env::var("TUHFAH_FIRESTORE_PROJECT")
                    .map_err(|_| AppServicesError::MissingFirestoreProject)?;
                Storage::firestore(db_url, project).await?
            }
        };

        let auth_config = GoogleAuthConfig::from_env().map(|config| match backend {
            Backend::Local => config,
            Backend::Firestore => config.with_datastore_scope(),
        });
        let auth = GoogleAuthService::new(auth_config);
        let listing: Arc<dyn FileListing> = Arc::new(DriveClient::new());

        Ok(Self::assemble(storage, auth, listing))
    }

    /// Build services over explicit parts. This is the seam view tests use
    /// to substitute an in-memory store and a canned listing.
    #[must_use]
    pub fn assemble(
        storage: Storage,
        auth: GoogleAuthService,
        listing: Arc<dyn FileListing>,
    ) -> Self {
        let session_service = Arc::new(SessionService::new(auth, Arc::clone(&storage.sessions)));
        let progress_service = Arc::new(ProgressService::new(
            listing,
            Arc::clone(&storage.progress),
        ));
        Self {
            session_service,
            progress_service,
        }
    }

    #[must_use]
    pub fn session_service(&self) -> Arc<SessionService> {
        Arc::clone(&self.session_service)
    }

    #[must_use]
    pub fn progress_service(&self) -> Arc<ProgressService> {
        Arc::clone(&self.progress_service)
    }
}
