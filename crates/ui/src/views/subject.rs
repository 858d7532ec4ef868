use dioxus::prelude::*;
use services::ProgressScope;
use tracker_core::{FileRow, Section};

use crate::app::SessionHandle;
use crate::context::AppContext;
use crate::views::{ViewError, ViewState, view_state_from_resource};

#[derive(Clone, Debug, PartialEq)]
struct SectionData {
    rows: Vec<FileRow>,
}

/// The draft behind the notes modal. Edits live here until Save copies
/// them into the row; Cancel just drops the draft.
#[derive(Clone, Debug, PartialEq)]
struct NotesDraft {
    index: usize,
    file_name: String,
    text: String,
}

fn resolve_section(section_id: &str) -> &'static Section {
    // Unknown ids land on the first subject rather than a dead end.
    Section::find(section_id).unwrap_or_else(Section::first)
}

#[component]
pub fn SubjectView(section_id: ReadOnlySignal<String>) -> Element {
    let ctx = use_context::<AppContext>();
    let handle = use_context::<SessionHandle>();
    let progress = ctx.progress_service();

    // Restarts whenever the drawer navigates to another section, dropping
    // any fetch still in flight for the previous one.
    let resource = use_resource(move || {
        let progress = progress.clone();
        async move {
            let section = resolve_section(&section_id.read());
            let Some(user) = handle.session.peek().clone() else {
                return Err(ViewError::SignedOut);
            };
            let scope = ProgressScope::new(&user, section);
            let rows = match progress.load_rows(&scope, section.folder_id()).await {
                Ok(rows) => rows,
                Err(err) => {
                    tracing::warn!(
                        error = %err,
                        section = section.id(),
                        "failed to load section files"
                    );
                    Vec::new()
                }
            };
            Ok::<_, ViewError>(SectionData { rows })
        }
    });

    // Editable copy of the fetched rows. Toggles and note saves mutate this
    // and write the changed row through to the store.
    let mut rows = use_signal(Vec::<FileRow>::new);
    use_effect(move || {
        if let Some(Ok(data)) = resource.value().read().as_ref() {
            rows.set(data.rows.clone());
        }
    });

    let mut notes_draft = use_signal(|| None::<NotesDraft>);

    let section = resolve_section(&section_id.read());
    let state = view_state_from_resource(&resource);

    let toggle_service = ctx.progress_service();
    let on_toggle = move |index: usize| {
        let Some(user) = handle.session.peek().clone() else {
            return;
        };
        let updated = {
            let mut all = rows.write();
            match all.get_mut(index) {
                Some(row) => {
                    row.watched = !row.watched;
                    Some(row.clone())
                }
                None => None,
            }
        };
        let Some(row) = updated else { return };
        let scope = ProgressScope::new(&user, section);
        let service = toggle_service.clone();
        spawn(async move {
            if let Err(err) = service.save_row(&scope, &row).await {
                tracing::warn!(error = %err, file = %row.id, "failed to persist watched toggle");
            }
        });
    };

    let on_edit_notes = move |index: usize| {
        let all = rows.read();
        if let Some(row) = all.get(index) {
            notes_draft.set(Some(NotesDraft {
                index,
                file_name: row.name.clone(),
                text: row.notes.clone(),
            }));
        }
    };

    let opener = ctx.link_opener();
    let on_open_file = move |index: usize| {
        let all = rows.read();
        if let Some(row) = all.get(index) {
            opener.open_url(&row.view_url);
        }
    };

    let notes_service = ctx.progress_service();

    rsx! {
        div { class: "page section-page",
            h2 { class: "section-title", "{section.label()}" }

            match state {
                ViewState::Idle => rsx! {
                    p { "Idle" }
                },
                ViewState::Loading => rsx! {
                    p { class: "section-loading", "Loading..." }
                },
                // Ready renders the editable copy in `rows`, which starts
                // from the fetch result and then absorbs local edits.
                ViewState::Ready(_) => rsx! {
                    SectionTable {
                        rows: rows(),
                        on_toggle,
                        on_edit_notes,
                        on_open_file,
                    }
                },
                ViewState::Error(err) => rsx! {
                    p { class: "section-error", "{err.message()}" }
                },
            }

            if let Some(draft) = notes_draft() {
                NotesModal {
                    file_name: draft.file_name.clone(),
                    text: draft.text.clone(),
                    on_text_change: move |value: String| {
                        notes_draft.with_mut(|current| {
                            if let Some(current) = current {
                                current.text = value;
                            }
                        });
                    },
                    on_save: move |()| {
                        let Some(draft) = notes_draft.peek().clone() else {
                            return;
                        };
                        let Some(user) = handle.session.peek().clone() else {
                            return;
                        };
                        let updated = {
                            let mut all = rows.write();
                            match all.get_mut(draft.index) {
                                Some(row) => {
                                    row.notes = draft.text.clone();
                                    Some(row.clone())
                                }
                                None => None,
                            }
                        };
                        notes_draft.set(None);
                        let Some(row) = updated else { return };
                        let scope = ProgressScope::new(&user, section);
                        let service = notes_service.clone();
                        spawn(async move {
                            if let Err(err) = service.save_row(&scope, &row).await {
                                tracing::warn!(error = %err, file = %row.id, "failed to persist notes");
                            }
                        });
                    },
                    on_cancel: move |()| notes_draft.set(None),
                }
            }
        }
    }
}

#[component]
fn SectionTable(
    rows: Vec<FileRow>,
    on_toggle: Callback<usize>,
    on_edit_notes: Callback<usize>,
    on_open_file: Callback<usize>,
) -> Element {
    rsx! {
        if rows.is_empty() {
            p { class: "section-empty", "No files yet." }
        } else {
            table { class: "file-table",
                thead {
                    tr {
                        th { class: "file-table-check", "Watched" }
                        th { "Lecture" }
                        th { "Notes" }
                    }
                }
                tbody {
                    for (index, row) in rows.iter().enumerate() {
                        FileRowLine {
                            key: "{row.id}",
                            index,
                            name: row.name.clone(),
                            watched: row.watched,
                            notes: row.notes.clone(),
                            has_link: !row.view_url.is_empty(),
                            on_toggle,
                            on_edit_notes,
                            on_open_file,
                        }
                    }
                }
            }
        }
    }
}

#[component]
fn FileRowLine(
    index: usize,
    name: String,
    watched: bool,
    notes: String,
    has_link: bool,
    on_toggle: Callback<usize>,
    on_edit_notes: Callback<usize>,
    on_open_file: Callback<usize>,
) -> Element {
    rsx! {
        tr { class: if watched { "file-row file-row--watched" } else { "file-row" },
            td { class: "file-table-check",
                input {
                    r#type: "checkbox",
                    checked: watched,
                    aria_label: "Watched",
                    onchange: move |_| on_toggle.call(index),
                }
            }
            td {
                if has_link {
                    button {
                        class: "file-link",
                        r#type: "button",
                        onclick: move |_| on_open_file.call(index),
                        "{name}"
                    }
                } else {
                    span { class: "file-name-plain", "{name}" }
                }
            }
            td {
                button {
                    class: "btn file-notes-edit",
                    r#type: "button",
                    onclick: move |_| on_edit_notes.call(index),
                    if notes.is_empty() {
                        span { class: "file-notes-empty", "Add notes" }
                    } else {
                        span { class: "file-notes-preview", "{notes}" }
                    }
                }
            }
        }
    }
}

#[component]
fn NotesModal(
    file_name: String,
    text: String,
    on_text_change: Callback<String>,
    on_save: Callback<()>,
    on_cancel: Callback<()>,
) -> Element {
    rsx! {
        div {
            class: "modal-overlay",
            onclick: move |_| on_cancel.call(()),
            div {
                class: "modal",
                onclick: move |evt| evt.stop_propagation(),
                h3 { class: "modal-title", "Notes for {file_name}" }
                textarea {
                    class: "modal-notes-input",
                    rows: "6",
                    value: "{text}",
                    oninput: move |evt| on_text_change.call(evt.value()),
                }
                div { class: "modal-actions",
                    button {
                        class: "btn modal-cancel",
                        r#type: "button",
                        onclick: move |_| on_cancel.call(()),
                        "Cancel"
                    }
                    button {
                        class: "btn btn-primary",
                        r#type: "button",
                        onclick: move |_| on_save.call(()),
                        "Save"
                    }
                }
            }
        }
    }
}
