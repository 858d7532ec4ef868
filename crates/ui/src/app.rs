use dioxus::prelude::*;
use dioxus_router::Router;
use tracker_core::UserSession;

use crate::context::AppContext;
use crate::routes::Route;
use crate::views::{LoginView, YearPrompt};

/// Session state shared with every view below the gate.
///
/// `session` holds the signed-in user, if any. `year_prompt_dismissed`
/// keeps the year-of-study prompt away for the rest of the launch once the
/// user skips it; a fresh sign-in arms it again.
#[derive(Clone, Copy)]
pub struct SessionHandle {
    pub session: Signal<Option<UserSession>>,
    pub year_prompt_dismissed: Signal<bool>,
}

#[component]
pub fn App() -> Element {
    rsx! {
        document::Stylesheet { href: asset!("/assets/style.css") }

        // Stable OS/window title. The signed-in shell renders its own headings.
        document::Title { "Tuhfah Tracker" }

        div { class: "app-root",
            ErrorBoundary {
                handle_error: |errors: ErrorContext| rsx! {
                    div { class: "fatal",
                        h1 { "Something went wrong" }
                        pre { "{errors:?}" }
                    }
                },
                SessionGate {}
            }
        }
    }
}

/// Chooses between the login screen and the routed shell, restoring the
/// stored session once at startup.
#[component]
fn SessionGate() -> Element {
    let ctx = use_context::<AppContext>();
    let session = use_signal(|| None::<UserSession>);
    let year_prompt_dismissed = use_signal(|| false);
    use_context_provider(|| SessionHandle {
        session,
        year_prompt_dismissed,
    });

    let mut restoring = use_signal(|| true);
    let restore_service = ctx.session_service();
    use_future(move || {
        let sessions = restore_service.clone();
        async move {
            match sessions.restore().await {
                Ok(stored) => {
                    if stored.is_some() {
                        let mut session = session;
                        session.set(stored);
                    }
                }
                Err(err) => {
                    tracing::warn!(error = %err, "could not restore the stored session");
                }
            }
            restoring.set(false);
        }
    });

    if restoring() {
        // Blank frame instead of flashing the login screen while the stored
        // session loads.
        return rsx! {
            div { class: "boot" }
        };
    }

    let signed_in_year = session.read().as_ref().and_then(|user| user.year);
    if session.read().is_none() {
        return rsx! {
            LoginView {}
        };
    }

    rsx! {
        Router::<Route> {}
        if signed_in_year.is_none() && !year_prompt_dismissed() {
            YearPrompt {}
        }
    }
}
