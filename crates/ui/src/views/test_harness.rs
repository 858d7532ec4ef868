use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use dioxus::core::NoOpMutations;
use dioxus::prelude::*;
use dioxus_router::{Routable, Router};
use reqwest::StatusCode;
use services::{
    DriveError, FileListing, GoogleAuthService, ProgressService, SessionService,
};
use storage::repository::Storage;
use tracker_core::{FileId, FileRecord, UserSession};

use crate::app::SessionHandle;
use crate::context::{UiApp, build_app_context};
use crate::platform::{LinkOpenerRef, UiLinkOpener};
use crate::views::{LoginView, SubjectView, YearPrompt};

pub fn test_session() -> UserSession {
    UserSession {
        name: "Imtiyaz Patel".to_string(),
        email: "imtiyaz@example.com".to_string(),
        picture: String::new(),
        access_token: "harness-token".to_string(),
        year: None,
    }
}

pub fn record(id: &str, name: &str) -> FileRecord {
    FileRecord {
        id: FileId::new(id),
        name: name.to_string(),
        view_url: format!("https://drive.google.com/file/d/{id}/view"),
    }
}

/// Canned folder listings keyed by folder id. Folders without an entry fail
/// the way a missing share or revoked token does.
#[derive(Default)]
pub struct StubListing {
    folders: Mutex<HashMap<String, Vec<FileRecord>>>,
}

impl StubListing {
    pub fn set_folder(&self, folder_id: &str, files: Vec<FileRecord>) {
        self.folders
            .lock()
            .expect("listing lock")
            .insert(folder_id.to_string(), files);
    }
}

#[async_trait]
impl FileListing for StubListing {
    async fn list_folder(
        &self,
        _access_token: &str,
        folder_id: &str,
    ) -> Result<Vec<FileRecord>, DriveError> {
        self.folders
            .lock()
            .expect("listing lock")
            .get(folder_id)
            .cloned()
            .ok_or(DriveError::HttpStatus(StatusCode::NOT_FOUND))
    }
}

#[derive(Default)]
pub struct RecordingLinkOpener {
    opened: Mutex<Vec<String>>,
}

impl RecordingLinkOpener {
    pub fn opened(&self) -> Vec<String> {
        self.opened.lock().expect("opened lock").clone()
    }
}

impl UiLinkOpener for RecordingLinkOpener {
    fn open_url(&self, url: &str) {
        self.opened
            .lock()
            .expect("opened lock")
            .push(url.to_string());
    }
}

struct TestApp {
    session_service: Arc<SessionService>,
    progress_service: Arc<ProgressService>,
    link_opener: LinkOpenerRef,
}

impl UiApp for TestApp {
    fn session_service(&self) -> Arc<SessionService> {
        Arc::clone(&self.session_service)
    }

    fn progress_service(&self) -> Arc<ProgressService> {
        Arc::clone(&self.progress_service)
    }

    fn link_opener(&self) -> LinkOpenerRef {
        Arc::clone(&self.link_opener)
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum ViewKind {
    Login,
    Subject(&'static str),
    YearPrompt,
}

#[derive(Props, Clone)]
struct ViewHarnessProps {
    app: Arc<TestApp>,
    view: ViewKind,
}

impl PartialEq for ViewHarnessProps {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

impl Eq for ViewHarnessProps {}

#[component]
fn ViewRouterHarness(props: ViewHarnessProps) -> Element {
    let app: Arc<dyn UiApp> = props.app.clone();
    use_context_provider(|| build_app_context(&app));
    use_context_provider(|| props.view);
    rsx! { Router::<TestRoute> {} }
}

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum TestRoute {
    #[route("/")]
    Root {},
}

#[component]
fn Root() -> Element {
    let view = use_context::<ViewKind>();
    let session = use_signal(|| match view {
        ViewKind::Login => None,
        ViewKind::Subject(_) | ViewKind::YearPrompt => Some(test_session()),
    });
    let year_prompt_dismissed = use_signal(|| false);
    use_context_provider(|| SessionHandle {
        session,
        year_prompt_dismissed,
    });
    match view {
        ViewKind::Login => rsx! { LoginView {} },
        ViewKind::Subject(section_id) => rsx! {
            SubjectView { section_id: section_id.to_string() }
        },
        ViewKind::YearPrompt => rsx! { YearPrompt {} },
    }
}

pub struct ViewHarness {
    pub dom: VirtualDom,
    pub storage: Storage,
    pub listing: Arc<StubListing>,
    pub links: Arc<RecordingLinkOpener>,
}

impl ViewHarness {
    pub fn rebuild(&mut self) {
        self.dom.rebuild_in_place();
        drive_dom(&mut self.dom);
    }

    pub async fn drive_async(&mut self) {
        let _ = tokio::time::timeout(
            std::time::Duration::from_millis(50),
            self.dom.wait_for_work(),
        )
        .await;
        self.dom.render_immediate(&mut NoOpMutations);
        self.dom.process_events();
    }

    pub fn render(&self) -> String {
        dioxus_ssr::render(&self.dom)
    }
}

pub fn drive_dom(dom: &mut VirtualDom) {
    dom.process_events();
    dom.render_immediate(&mut NoOpMutations);
    dom.process_events();
}

pub fn setup_view_harness(view: ViewKind) -> ViewHarness {
    let storage = Storage::in_memory();
    let listing = Arc::new(StubListing::default());
    let links = Arc::new(RecordingLinkOpener::default());

    let session_service = Arc::new(SessionService::new(
        GoogleAuthService::new(None),
        Arc::clone(&storage.sessions),
    ));
    let listing_port: Arc<dyn FileListing> = Arc::clone(&listing);
    let progress_service = Arc::new(ProgressService::new(
        listing_port,
        Arc::clone(&storage.progress),
    ));

    let link_opener: LinkOpenerRef = Arc::clone(&links);
    let app = Arc::new(TestApp {
        session_service,
        progress_service,
        link_opener,
    });

    let dom = VirtualDom::new_with_props(ViewRouterHarness, ViewHarnessProps { app, view });

    ViewHarness {
        dom,
        storage,
        listing,
        links,
    }
}
