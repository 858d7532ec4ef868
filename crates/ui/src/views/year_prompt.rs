use dioxus::prelude::*;
use tracker_core::{YearError, YearOfStudy};

use crate::app::SessionHandle;
use crate::context::AppContext;

/// Modal shown after sign-in while the session has no recorded year of
/// study. Saving validates inline and persists the year; skipping keeps
/// the prompt away for the rest of the launch.
#[component]
pub fn YearPrompt() -> Element {
    let ctx = use_context::<AppContext>();
    let handle = use_context::<SessionHandle>();
    let sessions = ctx.session_service();

    let mut input = use_signal(String::new);
    let mut error = use_signal(|| None::<YearError>);
    let mut saving = use_signal(|| false);

    rsx! {
        div {
            class: "modal-overlay",
            onclick: move |_| {
                let mut dismissed = handle.year_prompt_dismissed;
                dismissed.set(true);
            },
            div {
                class: "modal year-prompt",
                onclick: move |evt| evt.stop_propagation(),
                h3 { class: "modal-title", "Year of study" }
                p { class: "modal-body",
                    "Which year are you studying? This is kept with your profile."
                }
                input {
                    class: if error().is_some() { "year-input year-input--error" } else { "year-input" },
                    r#type: "text",
                    inputmode: "numeric",
                    placeholder: "1-8",
                    value: "{input}",
                    oninput: move |evt| {
                        input.set(evt.value());
                        error.set(None);
                    },
                }
                if let Some(err) = error() {
                    p { class: "field-error", "{err}" }
                }
                div { class: "modal-actions",
                    button {
                        class: "btn modal-cancel",
                        r#type: "button",
                        onclick: move |_| {
                            let mut dismissed = handle.year_prompt_dismissed;
                            dismissed.set(true);
                        },
                        "Skip for now"
                    }
                    button {
                        class: "btn btn-primary",
                        r#type: "button",
                        disabled: saving(),
                        onclick: move |_| {
                            if saving() {
                                return;
                            }
                            let parsed = input.read().parse::<YearOfStudy>();
                            match parsed {
                                Ok(year) => {
                                    let Some(user) = handle.session.peek().clone() else {
                                        return;
                                    };
                                    saving.set(true);
                                    let sessions = sessions.clone();
                                    spawn(async move {
                                        match sessions.set_year(&user, year).await {
                                            Ok(updated) => {
                                                let mut session = handle.session;
                                                session.set(Some(updated));
                                            }
                                            Err(err) => {
                                                tracing::warn!(
                                                    error = %err,
                                                    "could not store the year of study"
                                                );
                                                let mut dismissed = handle.year_prompt_dismissed;
                                                dismissed.set(true);
                                            }
                                        }
                                        saving.set(false);
                                    });
                                }
                                Err(invalid) => error.set(Some(invalid)),
                            }
                        },
                        "Save"
                    }
                }
            }
        }
    }
}
