use dioxus::prelude::*;
use dioxus_router::{Link, Outlet, Routable, use_navigator};
use tracker_core::Section;

use crate::app::SessionHandle;
use crate::context::AppContext;
use crate::views::SubjectView;

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
pub enum Route {
    #[layout(MainLayout)]
        #[redirect("/", || Route::Subject { section_id: Section::first().id().to_string() })]
        #[route("/:section_id", SubjectView)] Subject { section_id: String },
        #[route("/:..segments", RouteFallback)] NotFound { segments: Vec<String> },
}

#[component]
fn RouteFallback(segments: Vec<String>) -> Element {
    let navigator = use_navigator();
    use_effect(move || {
        tracing::debug!(path = segments.join("/"), "unmatched route");
        let _ = navigator.replace(Route::Subject {
            section_id: Section::first().id().to_string(),
        });
    });
    rsx! {}
}

#[component]
fn MainLayout() -> Element {
    let ctx = use_context::<AppContext>();
    let handle = use_context::<SessionHandle>();
    let mut drawer_open = use_signal(|| true);

    let user = handle.session.read().clone();
    let Some(user) = user else {
        // The gate swaps to the login screen as soon as the session clears.
        return rsx! {};
    };

    let sign_out_service = ctx.session_service();

    rsx! {
        div { class: "app",
            header { class: "app-bar",
                button {
                    class: "btn drawer-toggle",
                    r#type: "button",
                    aria_label: "Toggle navigation",
                    onclick: move |_| {
                        let open = drawer_open();
                        drawer_open.set(!open);
                    },
                    "Menu"
                }
                h1 { class: "app-bar-title", "Tuhfah Tracker" }
                div { class: "user-chip",
                    if !user.picture.is_empty() {
                        img { class: "user-avatar", src: "{user.picture}", alt: "" }
                    }
                    span { class: "user-name", "{user.name}" }
                    button {
                        class: "btn sign-out",
                        r#type: "button",
                        onclick: move |_| {
                            let sessions = sign_out_service.clone();
                            spawn(async move {
                                if let Err(err) = sessions.sign_out().await {
                                    tracing::warn!(error = %err, "could not clear the stored session");
                                }
                                // Signed out locally either way.
                                let mut session = handle.session;
                                session.set(None);
                            });
                        },
                        "Sign out"
                    }
                }
            }
            div { class: "app-body",
                Drawer { open: drawer_open() }
                main { class: "content",
                    Outlet::<Route> {}
                }
            }
        }
    }
}

#[component]
fn Drawer(open: bool) -> Element {
    rsx! {
        nav { class: if open { "drawer" } else { "drawer drawer--collapsed" },
            ul {
                for section in Section::all() {
                    li { key: "{section.id()}",
                        Link {
                            to: Route::Subject { section_id: section.id().to_string() },
                            class: "drawer-link",
                            active_class: "drawer-link--active",
                            span { class: "drawer-label", "{section.label()}" }
                        }
                    }
                }
            }
        }
    }
}
