use sqlx::sqlite::SqlitePoolOptions;
use storage::repository::{ProgressRepository, ProgressScope, SessionRepository};
use storage::sqlite::SqliteRepository;
use tracker_core::model::{FileId, FileRow, Section, UserSession, YearOfStudy};

fn session(email: &str) -> UserSession {
    UserSession {
        name: "Test User".into(),
        email: email.into(),
        picture: "https://lh3.example/p.jpg".into(),
        access_token: "tok".into(),
        year: None,
    }
}

fn row(id: &str, watched: bool, notes: &str) -> FileRow {
    FileRow {
        id: FileId::new(id),
        name: format!("Lesson {id}"),
        view_url: format!("https://drive.example/{id}/view"),
        watched,
        notes: notes.into(),
    }
}

async fn connect(url: &str) -> SqliteRepository {
    let repo = SqliteRepository::connect(url).await.expect("connect");
    repo.migrate().await.expect("migrate");
    repo
}

#[tokio::test]
async fn session_round_trip_and_clear() {
    let repo = connect("sqlite:file:memdb_session?mode=memory&cache=shared").await;

    assert!(repo.load_session().await.unwrap().is_none());

    let mut user = session("a@example.com");
    user.year = Some(YearOfStudy::new(3).unwrap());
    repo.save_session(&user).await.unwrap();
    assert_eq!(repo.load_session().await.unwrap(), Some(user.clone()));

    // Re-saving after a field change replaces the record.
    user.year = Some(YearOfStudy::new(4).unwrap());
    repo.save_session(&user).await.unwrap();
    let restored = repo.load_session().await.unwrap().unwrap();
    assert_eq!(restored.year.unwrap().value(), 4);

    repo.clear_session().await.unwrap();
    assert!(repo.load_session().await.unwrap().is_none());
}

#[tokio::test]
async fn toggling_persists_each_state_in_order() {
    let repo = connect("sqlite:file:memdb_toggle?mode=memory&cache=shared").await;
    let scope = ProgressScope::new(&session("a@example.com"), Section::first());

    repo.upsert_row(&scope, &row("f1", true, "")).await.unwrap();
    let after_first = repo.load_progress(&scope).await.unwrap();
    assert!(after_first.get(&FileId::new("f1")).unwrap().watched);

    repo.upsert_row(&scope, &row("f1", false, "")).await.unwrap();
    let after_second = repo.load_progress(&scope).await.unwrap();
    assert!(!after_second.get(&FileId::new("f1")).unwrap().watched);
}

#[tokio::test]
async fn progress_keys_do_not_leak_across_sections_or_users() {
    let repo = connect("sqlite:file:memdb_scope?mode=memory&cache=shared").await;
    let qisas = Section::find("subject-a").unwrap();
    let nahw = Section::find("subject-b").unwrap();

    let scope_a = ProgressScope::new(&session("a@example.com"), qisas);
    let scope_b = ProgressScope::new(&session("a@example.com"), nahw);
    let scope_other = ProgressScope::new(&session("b@example.com"), qisas);

    repo.upsert_row(&scope_a, &row("f1", true, "only for a/qisas"))
        .await
        .unwrap();

    assert_eq!(repo.load_progress(&scope_a).await.unwrap().len(), 1);
    assert!(repo.load_progress(&scope_b).await.unwrap().is_empty());
    assert!(repo.load_progress(&scope_other).await.unwrap().is_empty());
}

#[tokio::test]
async fn rows_missing_from_new_listings_are_retained() {
    let repo = connect("sqlite:file:memdb_retain?mode=memory&cache=shared").await;
    let scope = ProgressScope::new(&session("a@example.com"), Section::first());

    repo.upsert_row(&scope, &row("old", true, "kept")).await.unwrap();
    repo.upsert_row(&scope, &row("new", false, "")).await.unwrap();

    let progress = repo.load_progress(&scope).await.unwrap();
    assert_eq!(progress.len(), 2);
    assert_eq!(progress.get(&FileId::new("old")).unwrap().notes, "kept");
}

#[tokio::test]
async fn empty_notes_overwrite_previous_notes() {
    let repo = connect("sqlite:file:memdb_notes?mode=memory&cache=shared").await;
    let scope = ProgressScope::new(&session("a@example.com"), Section::first());

    repo.upsert_row(&scope, &row("f1", false, "draft thoughts"))
        .await
        .unwrap();
    repo.upsert_row(&scope, &row("f1", false, "")).await.unwrap();

    let progress = repo.load_progress(&scope).await.unwrap();
    assert_eq!(progress.get(&FileId::new("f1")).unwrap().notes, "");
}

#[tokio::test]
async fn malformed_entries_read_as_empty_and_do_not_poison_writes() {
    let url = "sqlite:file:memdb_malformed?mode=memory&cache=shared";
    let repo = connect(url).await;
    let scope = ProgressScope::new(&session("a@example.com"), Section::first());

    // Corrupt both entries behind the repository's back.
    let raw = SqlitePoolOptions::new().connect(url).await.expect("raw pool");
    for key in ["tuhfah-user", "tuhfah-tracker:a@example.com:subject-a"] {
        sqlx::query(
            "INSERT INTO local_entries (key, value, updated_at) VALUES (?1, '{not json', ?2)",
        )
        .bind(key)
        .bind(chrono::Utc::now())
        .execute(&raw)
        .await
        .expect("inject garbage");
    }

    assert!(repo.load_session().await.unwrap().is_none());
    assert!(repo.load_progress(&scope).await.unwrap().is_empty());

    // A fresh write replaces the garbage and reads back cleanly.
    repo.upsert_row(&scope, &row("f1", true, "recovered")).await.unwrap();
    let progress = repo.load_progress(&scope).await.unwrap();
    assert_eq!(progress.len(), 1);
    assert!(progress.get(&FileId::new("f1")).unwrap().watched);

    repo.save_session(&session("a@example.com")).await.unwrap();
    assert!(repo.load_session().await.unwrap().is_some());
}
