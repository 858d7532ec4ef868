use std::sync::Arc;

use services::{ProgressService, SessionService};

use crate::platform::LinkOpenerRef;

/// What the composition root hands the UI: the two app services and the
/// platform hook for opening Drive links in the system browser.
pub trait UiApp: Send + Sync {
    fn session_service(&self) -> Arc<SessionService>;
    fn progress_service(&self) -> Arc<ProgressService>;
    fn link_opener(&self) -> LinkOpenerRef;
}

#[derive(Clone)]
pub struct AppContext {
    session_service: Arc<SessionService>,
    progress_service: Arc<ProgressService>,
    link_opener: LinkOpenerRef,
}

impl AppContext {
    #[must_use]
    pub fn new(app: &Arc<dyn UiApp>) -> Self {
        Self {
            session_service: app.session_service(),
            progress_service: app.progress_service(),
            link_opener: app.link_opener(),
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

    #[must_use]
    pub fn link_opener(&self) -> LinkOpenerRef {
        Arc::clone(&self.link_opener)
    }
}

// This context is provided by the application composition root (e.g. `crates/app`).

/// Build an `AppContext` from a UI-facing app implementation.
#[must_use]
pub fn build_app_context(app: &Arc<dyn UiApp>) -> AppContext {
    AppContext::new(app)
}
