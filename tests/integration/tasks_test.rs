//! Task Table Integration Tests
//!
//! Join engine against the in-memory backend, reload generations and the
//! row metrics cache.

use std::sync::Arc;
use std::time::Duration;

use hashtopolis_console::models::{Task, TaskRow, TaskType};
use hashtopolis_console::services::tasks::{TaskJoinEngine, TaskStatus, TASK_EXPANSIONS};
use hashtopolis_console::services::LoadOutcome;
use hashtopolis_console::Resource;

use crate::common::{cluster, task, tasks_source, wrapper};

fn keys(rows: &[TaskRow]) -> Vec<String> {
    rows.iter().map(TaskRow::row_key).collect()
}

// ============================================================================
// Join Engine
// ============================================================================

#[tokio::test]
async fn test_load_all_merges_and_orders_rows() {
    let engine = TaskJoinEngine::new(cluster(), 1000);
    let rows = engine.load_all(false).await;

    // Sub-tasks 12 and 13 belong to super-task 3 and are not rows themselves.
    assert_eq!(keys(&rows), vec!["task-11", "wrapper-3", "task-10"]);
    assert_eq!(rows[1].task_type(), TaskType::Super);
    assert_eq!(rows[1].hashlist().map(|h| h.name.as_str()), Some("leak-md5"));
}

#[tokio::test]
async fn test_load_all_sends_archive_filter_and_expansions() {
    let fetcher = cluster();
    let engine = TaskJoinEngine::new(fetcher.clone(), 250);
    engine.load_all(true).await;

    let queries = fetcher.queries();
    let (_, task_query) = queries
        .iter()
        .find(|(r, _)| *r == Resource::Tasks)
        .expect("tasks were fetched");
    assert_eq!(task_query.filter_expression(), "isArchived=true");
    assert_eq!(task_query.expand, TASK_EXPANSIONS.map(String::from).to_vec());
    assert_eq!(task_query.max_results, Some(250));

    let (_, hashlist_query) = queries
        .iter()
        .find(|(r, _)| *r == Resource::Hashlists)
        .expect("hashlists were fetched");
    assert!(hashlist_query.filter.is_empty());
}

#[tokio::test]
async fn test_archived_view_has_no_active_rows() {
    let engine = TaskJoinEngine::new(cluster(), 1000);
    assert!(engine.load_all(true).await.is_empty());
}

#[tokio::test]
async fn test_failed_task_fetch_yields_no_rows() {
    let fetcher = cluster();
    fetcher.fail(Resource::Tasks);
    let engine = TaskJoinEngine::new(fetcher.clone(), 1000);

    assert!(engine.try_load_all(false).await.is_err());
    assert!(engine.load_all(false).await.is_empty());
    assert_eq!(fetcher.call_count(Resource::Tasks), 2);
}

#[tokio::test]
async fn test_equal_priorities_keep_input_order() {
    let fetcher = cluster();
    let wrappers: Vec<_> = (1..=4).map(|i| wrapper(i, 0, 0, 1)).collect();
    let tasks: Vec<Task> = vec![
        task(1, 1, 5, 10),
        task(2, 2, 3, 10),
        task(3, 3, 3, 10),
        task(4, 4, 8, 10),
    ];
    fetcher.set_records(Resource::TaskWrappers, &wrappers);
    fetcher.set_records(Resource::Tasks, &tasks);

    let rows = TaskJoinEngine::new(fetcher, 1000).load_all(false).await;
    let priorities: Vec<i64> = rows.iter().map(TaskRow::priority).collect();
    assert_eq!(priorities, vec![8, 5, 3, 3]);
    assert_eq!(keys(&rows)[2..], ["task-2", "task-3"]);
}

#[tokio::test]
async fn test_string_priorities_sort_numerically() {
    let fetcher = cluster();
    fetcher.set_records(
        Resource::Tasks,
        &[
            serde_json::json!({"_id": 1, "taskWrapperId": 1, "priority": "9", "isArchived": false}),
            serde_json::json!({"_id": 2, "taskWrapperId": 2, "priority": "10", "isArchived": false}),
        ],
    );
    let rows = TaskJoinEngine::new(fetcher, 1000).load_all(false).await;
    let ids: Vec<i64> = rows.iter().filter(|r| r.is_normal()).map(TaskRow::display_id).collect();
    assert_eq!(ids, vec![2, 1]);
}

// ============================================================================
// Tasks Data Source
// ============================================================================

#[tokio::test]
async fn test_stale_load_is_discarded() {
    let fetcher = cluster();
    let source = tasks_source(fetcher.clone());
    fetcher.delay_next(Resource::TaskWrappers, Duration::from_millis(150));

    let (slow, fast) = tokio::join!(source.load_all(false), source.load_all(false));

    assert_eq!(slow, LoadOutcome::Superseded);
    assert_eq!(fast, LoadOutcome::Loaded(3));
    assert_eq!(source.generation(), 2);
    let table = source.table().await;
    assert_eq!(table.data().len(), 3);
    assert!(!table.is_loading());
}

#[tokio::test]
async fn test_reload_after_outage_recovers() {
    let fetcher = cluster();
    let source = tasks_source(fetcher.clone());

    fetcher.fail(Resource::TaskWrappers);
    assert_eq!(source.load_all(false).await, LoadOutcome::Failed);
    assert!(source.table().await.data().is_empty());

    fetcher.recover(Resource::TaskWrappers);
    assert_eq!(source.reload(false).await, LoadOutcome::Loaded(3));
}

#[tokio::test]
async fn test_row_metrics_for_reference_task() {
    let source = tasks_source(cluster());
    source.load_all(false).await;
    let row = source
        .table()
        .await
        .data()
        .iter()
        .find(|r| r.row_key() == "task-10")
        .cloned()
        .expect("task 10 loaded");

    let metrics = source.row_metrics(&row).await;
    assert_eq!(metrics.dispatched.map(|d| (d * 1000.0).round()), Some(200.0));
    assert_eq!(metrics.searched.map(|s| (s * 1000.0).round()), Some(600.0));
    assert_eq!(metrics.cracked, Some(2));
    assert_eq!(metrics.speed, Some(500));
    assert_eq!(metrics.status, Some(TaskStatus::InProgress));
}

#[tokio::test]
async fn test_metrics_refetch_only_when_dependencies_change() {
    let fetcher = cluster();
    let source = tasks_source(fetcher.clone());
    source.load_all(false).await;
    let row = source.table().await.data()[2].clone();
    assert_eq!(row.row_key(), "task-10");

    source.row_metrics(&row).await;
    source.row_metrics(&row).await;
    assert_eq!(fetcher.call_count(Resource::Chunks), 1);

    let TaskRow::Normal(mut renamed) = row.clone() else {
        panic!("expected a normal row");
    };
    renamed.task_name = "renamed".to_string();
    source.row_metrics(&TaskRow::Normal(renamed.clone())).await;
    assert_eq!(fetcher.call_count(Resource::Chunks), 1);

    renamed.keyspace_progress = 600;
    source.row_metrics(&TaskRow::Normal(renamed)).await;
    assert_eq!(fetcher.call_count(Resource::Chunks), 2);
}

#[tokio::test]
async fn test_failed_chunk_fetch_is_retried() {
    let fetcher = cluster();
    let source = tasks_source(fetcher.clone());
    source.load_all(false).await;
    let row = source.table().await.data()[2].clone();

    fetcher.fail(Resource::Chunks);
    let metrics = source.row_metrics(&row).await;
    assert_eq!(metrics.cracked, Some(0));
    assert_eq!(metrics.status, Some(TaskStatus::Idle));

    fetcher.recover(Resource::Chunks);
    let metrics = source.row_metrics(&row).await;
    assert_eq!(metrics.cracked, Some(2));
    assert_eq!(fetcher.call_count(Resource::Chunks), 2);
}

#[tokio::test]
async fn test_visible_metrics_cover_current_page() {
    let source = tasks_source(cluster());
    source.load_all(false).await;
    {
        let mut table = source.table_mut().await;
        table.set_pagination_config(2, 0, 0);
    }
    let page = source.visible_metrics().await;
    assert_eq!(page.len(), 2);
    assert_eq!(page[0].0.row_key(), "task-11");
    assert_eq!(page[0].1.speed, Some(300));
    assert_eq!(page[1].1.status, None);
}

#[tokio::test]
async fn test_filter_term_searches_task_names() {
    let source = tasks_source(cluster());
    source.load_all(false).await;
    let mut table = source.table_mut().await;
    table.set_filter_term("TASK-1");
    assert_eq!(table.filtered_rows().len(), 2);
    table.set_filter_term("leak");
    assert_eq!(keys(table.filtered_rows()), vec!["wrapper-3"]);
}
