use std::sync::Arc;

use storage::repository::SessionRepository;
use tracker_core::model::{UserSession, YearOfStudy};

use crate::error::SessionServiceError;
use crate::google_auth::GoogleAuthService;

/// Owns the session lifecycle: restore on launch, interactive sign-in,
/// attaching the year of study, and sign-out.
#[derive(Clone)]
pub struct SessionService {
    auth: GoogleAuthService,
    sessions: Arc<dyn SessionRepository>,
}

impl SessionService {
    #[must_use]
    pub fn new(auth: GoogleAuthService, sessions: Arc<dyn SessionRepository>) -> Self {
        Self { auth, sessions }
    }

    #[must_use]
    pub fn sign_in_available(&self) -> bool {
        self.auth.enabled()
    }

    /// Restores the stored session from the previous launch, if any.
    /// A malformed stored record reads as signed out.
    ///
    /// # Errors
    ///
    /// Returns `SessionServiceError` if the session store cannot be read.
    pub async fn restore(&self) -> Result<Option<UserSession>, SessionServiceError> {
        Ok(self.sessions.load_session().await?)
    }

    /// Runs the interactive sign-in and persists the resulting session.
    ///
    /// # Errors
    ///
    /// Returns `SessionServiceError` if consent, the token exchange, the
    /// profile fetch, or persistence fails. No session is stored on failure.
    pub async fn sign_in<F>(&self, open_consent: F) -> Result<UserSession, SessionServiceError>
    where
        F: FnOnce(&str),
    {
        let session = self.auth.sign_in(open_consent).await?;
        self.sessions.save_session(&session).await?;
        Ok(session)
    }

    /// Attaches the year of study to the session and re-persists it.
    ///
    /// # Errors
    ///
    /// Returns `SessionServiceError` if the updated session cannot be stored.
    pub async fn set_year(
        &self,
        session: &UserSession,
        year: YearOfStudy,
    ) -> Result<UserSession, SessionServiceError> {
        let mut updated = session.clone();
        updated.year = Some(year);
        self.sessions.save_session(&updated).await?;
        Ok(updated)
    }

    /// Clears the stored session. The next launch starts signed out.
    ///
    /// # Errors
    ///
    /// Returns `SessionServiceError` if the session store cannot be written.
    pub async fn sign_out(&self) -> Result<(), SessionServiceError> {
        Ok(self.sessions.clear_session().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storage::repository::Storage;

    fn service(storage: &Storage) -> SessionService {
        SessionService::new(GoogleAuthService::new(None), Arc::clone(&storage.sessions))
    }

    fn session() -> UserSession {
        UserSession {
            name: "Aisha Khan".into(),
            email: "aisha@example.com".into(),
            picture: "https://lh3.example/photo.jpg".into(),
            access_token: "tok".into(),
            year: None,
        }
    }

    #[tokio::test]
    async fn restore_reads_back_the_saved_session() {
        let storage = Storage::in_memory();
        let service = service(&storage);

        storage.sessions.save_session(&session()).await.unwrap();
        let restored = service.restore().await.unwrap().unwrap();
        assert_eq!(restored.email, "aisha@example.com");
    }

    #[tokio::test]
    async fn set_year_persists_the_updated_session() {
        let storage = Storage::in_memory();
        let service = service(&storage);
        storage.sessions.save_session(&session()).await.unwrap();

        let updated = service
            .set_year(&session(), YearOfStudy::new(5).unwrap())
            .await
            .unwrap();
        assert_eq!(updated.year.unwrap().value(), 5);

        let stored = storage.sessions.load_session().await.unwrap().unwrap();
        assert_eq!(stored.year.unwrap().value(), 5);
    }

    #[tokio::test]
    async fn sign_out_leaves_no_session_behind() {
        let storage = Storage::in_memory();
        let service = service(&storage);
        storage.sessions.save_session(&session()).await.unwrap();

        service.sign_out().await.unwrap();
        assert!(service.restore().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn failed_sign_in_stores_nothing() {
        let storage = Storage::in_memory();
        let service = service(&storage);

        let result = service.sign_in(|_| {}).await;
        assert!(result.is_err());
        assert!(storage.sessions.load_session().await.unwrap().is_none());
    }
}
