use services::ProgressScope;
use storage::repository::ProgressRepository;
use tracker_core::{FileId, FileRow, Section};

use super::test_harness::{ViewKind, record, setup_view_harness, test_session};

#[tokio::test(flavor = "current_thread")]
async fn login_view_smoke_renders_sign_in_button() {
    let mut harness = setup_view_harness(ViewKind::Login);
    harness.rebuild();
    let html = harness.render();
    assert!(
        html.contains("Sign in with Google"),
        "missing sign-in button in {html}"
    );
    // The harness auth is unconfigured, so the hint shows too.
    assert!(
        html.contains("TUHFAH_GOOGLE_CLIENT_ID"),
        "missing config hint in {html}"
    );
    assert!(
        harness.links.opened().is_empty(),
        "nothing should open the browser before a click"
    );
}

#[tokio::test(flavor = "current_thread")]
async fn subject_view_smoke_renders_listed_files() {
    let section = Section::find("subject-a").expect("known section");
    let mut harness = setup_view_harness(ViewKind::Subject("subject-a"));
    harness.listing.set_folder(
        section.folder_id(),
        vec![
            record("f1", "Lesson 1 - Introduction"),
            record("f2", "Lesson 2 - The Story Begins"),
        ],
    );

    harness.rebuild();
    harness.drive_async().await;
    harness.drive_async().await;
    let html = harness.render();
    let title = section.label();
    assert!(html.contains(title), "missing {title} in {html}");
    assert!(
        html.contains("Lesson 1 - Introduction"),
        "missing first file in {html}"
    );
    assert!(
        html.contains("Lesson 2 - The Story Begins"),
        "missing second file in {html}"
    );
    assert!(html.contains("Add notes"), "missing notes action in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn subject_view_smoke_merges_saved_progress() {
    let section = Section::find("subject-a").expect("known section");
    let mut harness = setup_view_harness(ViewKind::Subject("subject-a"));
    harness.listing.set_folder(
        section.folder_id(),
        vec![record("f1", "Lesson 1"), record("f2", "Lesson 2")],
    );

    let scope = ProgressScope::new(&test_session(), section);
    let saved = FileRow {
        id: FileId::new("f2"),
        name: "Lesson 2".to_string(),
        view_url: String::new(),
        watched: true,
        notes: "revise the last ten minutes".to_string(),
    };
    harness
        .storage
        .progress
        .upsert_row(&scope, &saved)
        .await
        .expect("seed progress");

    harness.rebuild();
    harness.drive_async().await;
    harness.drive_async().await;
    let html = harness.render();
    assert!(
        html.contains("file-row--watched"),
        "missing watched row in {html}"
    );
    assert!(
        html.contains("revise the last ten minutes"),
        "missing notes text in {html}"
    );
}

#[tokio::test(flavor = "current_thread")]
async fn subject_view_smoke_shows_empty_section_when_listing_fails() {
    // No canned listing for the folder, so the fetch errors. The view logs
    // it and renders an empty section, not an error banner.
    let mut harness = setup_view_harness(ViewKind::Subject("subject-a"));
    harness.rebuild();
    harness.drive_async().await;
    harness.drive_async().await;
    let html = harness.render();
    assert!(
        html.contains("No files yet."),
        "missing empty hint in {html}"
    );
}

#[tokio::test(flavor = "current_thread")]
async fn year_prompt_smoke_renders_inputs() {
    let mut harness = setup_view_harness(ViewKind::YearPrompt);
    harness.rebuild();
    let html = harness.render();
    assert!(html.contains("Year of study"), "missing title in {html}");
    assert!(html.contains("Save"), "missing save action in {html}");
    assert!(
        html.contains("Skip for now"),
        "missing skip action in {html}"
    );
}
