mod common;

use std::sync::Arc;

use jiff::Timestamp;

use triagem_app::error::PresenterError;
use triagem_app::messages;
use triagem_app::notice::Tone;
use triagem_app::queue::QueuePresenter;
use triagem_app::selection::Selection;
use triagem_app::state::AppState;

use common::{ProbeRepository, record, seeded};

#[test]
fn selecting_twice_clears_selection() {
    let mut queue = QueuePresenter::new();
    queue.apply_snapshot(vec![record(Some("a"), "Ana"), record(Some("b"), "Bruno")]);

    for index in 0..2 {
        assert_eq!(queue.select(index).unwrap(), Selection::Selected(index));
        assert_eq!(queue.select(index).unwrap(), Selection::NoneSelected);
    }
}

#[test]
fn selecting_another_row_moves_selection() {
    let mut queue = QueuePresenter::new();
    queue.apply_snapshot(vec![record(Some("a"), "Ana"), record(Some("b"), "Bruno")]);

    queue.select(0).unwrap();
    assert_eq!(queue.select(1).unwrap(), Selection::Selected(1));
    assert_eq!(queue.selected().unwrap().name, "Bruno");
    assert!(queue.can_delete());
}

#[test]
fn selecting_past_the_end_is_rejected() {
    let mut queue = QueuePresenter::new();
    queue.apply_snapshot(vec![record(Some("a"), "Ana")]);

    let err = queue.select(3).unwrap_err();
    assert!(matches!(err, PresenterError::IndexOutOfRange { index: 3, len: 1 }));
    assert_eq!(queue.selection(), Selection::NoneSelected);
}

#[test]
fn snapshot_replaces_list_and_drops_stale_selection() {
    let mut queue = QueuePresenter::new();
    queue.apply_snapshot(vec![record(Some("a"), "Ana"), record(Some("b"), "Bruno")]);
    queue.select(1).unwrap();

    queue.apply_snapshot(vec![record(Some("c"), "Carla"), record(Some("d"), "Davi")]);
    assert_eq!(queue.selection(), Selection::Selected(1));
    assert_eq!(queue.records()[0].name, "Carla");

    queue.apply_snapshot(vec![record(Some("c"), "Carla")]);
    assert_eq!(queue.selection(), Selection::NoneSelected);
    assert!(!queue.can_delete());
}

#[tokio::test]
async fn delete_without_selection_warns_and_skips_repository() {
    let repo = ProbeRepository::new(seeded(&["Ana"]));
    let mut state = AppState::new(Arc::new(repo.clone()));
    state.refresh(std::time::Duration::from_secs(1)).await.unwrap();

    let err = state.queue.request_delete().unwrap_err();
    assert!(matches!(err, PresenterError::NoSelection));
    assert_eq!(repo.calls(), 0);

    let notice = state.queue.notice(Timestamp::now()).unwrap();
    assert_eq!(notice.tone, Tone::Warning);
    assert_eq!(notice.title.as_deref(), Some(messages::NO_SELECTION_TITLE));
    assert_eq!(notice.text, messages::NO_SELECTION);
}

#[tokio::test]
async fn confirmed_delete_removes_patient_and_clears_selection() {
    let repo = ProbeRepository::new(seeded(&["Ana", "Bruno"]));
    let mut state = AppState::new(Arc::new(repo.clone()));
    let mut feed = state.watch();
    state.queue.apply_snapshot(feed.next().await.unwrap());

    state.queue.select(0).unwrap();
    let confirmation = state.queue.request_delete().unwrap();
    assert_eq!(confirmation.prompt(), messages::CONFIRM_DELETE);

    state.confirm(confirmation).await.unwrap();
    assert_eq!(state.queue.selection(), Selection::NoneSelected);
    assert_eq!(repo.calls(), 1);

    state.queue.apply_snapshot(feed.next().await.unwrap());
    let names: Vec<_> = state.queue.records().iter().map(|r| r.name.clone()).collect();
    assert_eq!(names, vec!["Bruno"]);
    feed.close();
}

#[tokio::test]
async fn cancelled_delete_changes_nothing() {
    let repo = ProbeRepository::new(seeded(&["Ana"]));
    let mut state = AppState::new(Arc::new(repo.clone()));
    state.refresh(std::time::Duration::from_secs(1)).await.unwrap();

    state.queue.select(0).unwrap();
    let confirmation = state.queue.request_delete().unwrap();
    drop(confirmation);

    assert_eq!(repo.calls(), 0);
    assert_eq!(repo.inner.len(), 1);
    assert_eq!(state.queue.selection(), Selection::Selected(0));
}

#[tokio::test]
async fn deleting_record_without_id_is_reported() {
    let repo = ProbeRepository::default();
    let mut queue = QueuePresenter::new();
    queue.apply_snapshot(vec![record(None, "Sem Id")]);

    queue.select(0).unwrap();
    let confirmation = queue.request_delete().unwrap();
    let err = queue.confirm(confirmation, &repo).await.unwrap_err();

    assert!(matches!(err, PresenterError::MissingIdentifier { index: 0 }));
    assert_eq!(repo.calls(), 0);
    assert_eq!(queue.selection(), Selection::Selected(0));
    let notice = queue.notice(Timestamp::now()).unwrap();
    assert_eq!(notice.text, messages::MISSING_IDENTIFIER);
    assert_eq!(notice.tone, Tone::Error);
}

#[tokio::test]
async fn failed_delete_keeps_selection_and_reports() {
    let repo = ProbeRepository::new(seeded(&["Ana"]));
    let mut state = AppState::new(Arc::new(repo.clone()));
    state.refresh(std::time::Duration::from_secs(1)).await.unwrap();
    repo.fail(true);

    state.queue.select(0).unwrap();
    let confirmation = state.queue.request_delete().unwrap();
    let err = state.confirm(confirmation).await.unwrap_err();

    assert!(matches!(err, PresenterError::Persistence(_)));
    assert_eq!(err.user_message(), messages::PERSISTENCE_FAILED);
    assert_eq!(state.queue.selection(), Selection::Selected(0));
    assert_eq!(repo.inner.len(), 1);
}

#[tokio::test]
async fn clear_all_uses_one_batch_request() {
    let repo = ProbeRepository::new(seeded(&["Ana", "Bruno", "Carla"]));
    let mut state = AppState::new(Arc::new(repo.clone()));
    state.refresh(std::time::Duration::from_secs(1)).await.unwrap();
    state.queue.select(2).unwrap();

    let confirmation = state.queue.request_clear_all();
    assert_eq!(confirmation.prompt(), messages::CONFIRM_CLEAR_ALL);
    assert_eq!(confirmation.confirm_label(), messages::CLEAR_ALL_LABEL);
    state.confirm(confirmation).await.unwrap();

    assert_eq!(repo.calls(), 1);
    assert!(repo.inner.is_empty());
    assert_eq!(state.queue.selection(), Selection::NoneSelected);
}

#[tokio::test]
async fn clear_all_skips_rows_without_id() {
    let repo = ProbeRepository::default();
    let mut queue = QueuePresenter::new();
    queue.apply_snapshot(vec![record(None, "Sem Id")]);
    queue.select(0).unwrap();

    let confirmation = queue.request_clear_all();
    queue.confirm(confirmation, &repo).await.unwrap();

    assert_eq!(repo.calls(), 0);
    assert_eq!(queue.selection(), Selection::NoneSelected);
}

#[tokio::test]
async fn failed_clear_all_reports_and_keeps_state() {
    let repo = ProbeRepository::new(seeded(&["Ana", "Bruno"]));
    let mut state = AppState::new(Arc::new(repo.clone()));
    state.refresh(std::time::Duration::from_secs(1)).await.unwrap();
    state.queue.select(1).unwrap();
    repo.fail(true);

    let confirmation = state.queue.request_clear_all();
    let err = state.confirm(confirmation).await.unwrap_err();

    assert!(matches!(err, PresenterError::Persistence(_)));
    assert_eq!(state.queue.selection(), Selection::Selected(1));
    assert_eq!(state.queue.records().len(), 2);
    assert_eq!(
        state.queue.notice(Timestamp::now()).unwrap().text,
        messages::PERSISTENCE_FAILED
    );
}

#[test]
fn rows_carry_severity_and_selection() {
    let mut queue = QueuePresenter::new();
    let mut ana = record(Some("a"), "Ana");
    ana.severity = 5;
    let mut bruno = record(Some("b"), "Bruno");
    bruno.severity = 8;
    queue.apply_snapshot(vec![ana, bruno]);
    queue.select(0).unwrap();

    let rows = queue.rows();
    assert_eq!(rows[0].heading, "Ana (30 anos)");
    assert_eq!(rows[0].description, "Descrição: flu");
    assert_eq!(rows[0].severity, "Gravidade: Emergência");
    assert_eq!(rows[0].severity_color, "#FF0000");
    assert!(rows[0].selected);

    assert_eq!(rows[1].severity, "Gravidade: Desconhecido");
    assert_eq!(rows[1].severity_color, "#000");
    assert!(!rows[1].selected);
}
