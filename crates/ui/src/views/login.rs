use dioxus::prelude::*;

use crate::app::SessionHandle;
use crate::context::AppContext;

/// The signed-out screen: one button that runs the Google consent flow.
///
/// A declined consent or a transport failure leaves the screen as it was;
/// the only trace is a log line.
#[component]
pub fn LoginView() -> Element {
    let ctx = use_context::<AppContext>();
    let handle = use_context::<SessionHandle>();
    let sessions = ctx.session_service();
    let opener = ctx.link_opener();
    let mut signing_in = use_signal(|| false);

    let sign_in_available = sessions.sign_in_available();

    rsx! {
        div { class: "login",
            div { class: "login-card",
                h1 { class: "login-title", "Tuhfah Tracker" }
                p { class: "login-hint",
                    "Track which lectures you have watched, subject by subject."
                }
                button {
                    class: "btn btn-primary login-button",
                    r#type: "button",
                    disabled: signing_in() || !sign_in_available,
                    onclick: move |_| {
                        if signing_in() {
                            return;
                        }
                        signing_in.set(true);
                        let sessions = sessions.clone();
                        let opener = opener.clone();
                        spawn(async move {
                            match sessions.sign_in(|url| opener.open_url(url)).await {
                                Ok(user) => {
                                    let mut dismissed = handle.year_prompt_dismissed;
                                    dismissed.set(false);
                                    let mut session = handle.session;
                                    session.set(Some(user));
                                }
                                Err(err) => {
                                    tracing::warn!(error = %err, "sign-in did not complete");
                                }
                            }
                            signing_in.set(false);
                        });
                    },
                    if signing_in() {
                        "Waiting for Google..."
                    } else {
                        "Sign in with Google"
                    }
                }
                if !sign_in_available {
                    p { class: "login-unconfigured",
                        "Set TUHFAH_GOOGLE_CLIENT_ID to enable sign-in."
                    }
                }
            }
        }
    }
}
