//! Chunk Aggregator Integration Tests

use hashtopolis_console::models::ChunkData;
use hashtopolis_console::services::tasks::SpeedScope;
use hashtopolis_console::{ConsoleConfig, Resource};

use crate::common::{aggregator, cluster};

fn wide_window() -> ConsoleConfig {
    ConsoleConfig {
        chunk_time_window_secs: 86_400,
        ..Default::default()
    }
}

#[tokio::test]
async fn test_reference_task_chunk_data() {
    let agg = aggregator(cluster(), &wide_window());
    let data = agg.get_chunk_data(10, 1000).await;

    assert!((data.dispatched - 0.2).abs() < 1e-9);
    assert!((data.searched - 0.6).abs() < 1e-9);
    assert_eq!(data.cracked, 2);
    assert_eq!(data.speed, 500);
}

#[tokio::test]
async fn test_chunk_data_is_idempotent() {
    let agg = aggregator(cluster(), &wide_window());
    let first = agg.get_chunk_data(10, 1000).await;
    let second = agg.get_chunk_data(10, 1000).await;
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_default_window_excludes_stale_chunk() {
    // Chunk 2 was dispatched 800s ago, outside the default 600s window.
    let agg = aggregator(cluster(), &ConsoleConfig::default());
    let data = agg.get_chunk_data(10, 1000).await;
    assert_eq!(data.speed, 0);
    assert_eq!(data.cracked, 2);
}

#[tokio::test]
async fn test_task_without_chunks_is_all_zero() {
    let agg = aggregator(cluster(), &wide_window());
    assert_eq!(agg.get_chunk_data(12, 100).await, ChunkData::default());
}

#[tokio::test]
async fn test_zero_keyspace_uses_zero_fractions() {
    let agg = aggregator(cluster(), &wide_window());
    let data = agg.get_chunk_data(10, 0).await;
    assert_eq!(data.dispatched, 0.0);
    assert_eq!(data.searched, 0.0);
    assert_eq!(data.cracked, 2);
}

#[tokio::test]
async fn test_chunk_fetch_uses_cap_and_task_filter() {
    let fetcher = cluster();
    let config = ConsoleConfig {
        max_results_cap: 123,
        ..Default::default()
    };
    aggregator(fetcher.clone(), &config).get_chunk_data(10, 1000).await;

    let queries = fetcher.queries();
    assert_eq!(queries.len(), 1);
    assert_eq!(queries[0].0, Resource::Chunks);
    assert_eq!(queries[0].1.max_results, Some(123));
    assert_eq!(queries[0].1.filter_expression(), "taskId=10");
}

#[tokio::test]
async fn test_fetch_failure_degrades_to_zero() {
    let fetcher = cluster();
    fetcher.fail(Resource::Chunks);
    let agg = aggregator(fetcher, &wide_window());

    assert!(agg.try_get_chunk_data(10, 1000).await.is_err());
    assert_eq!(agg.get_chunk_data(10, 1000).await, ChunkData::default());
    assert_eq!(agg.get_speed(10, 600, SpeedScope::Task).await, 0);
}

#[tokio::test]
async fn test_speed_by_task_and_by_agent() {
    let agg = aggregator(cluster(), &wide_window());

    assert_eq!(agg.get_speed(10, 86_400, SpeedScope::Task).await, 500);
    assert_eq!(agg.get_speed(10, 600, SpeedScope::Task).await, 0);
    // Agent 2 works on chunk 2 (task 10) and chunk 3 (task 11).
    assert_eq!(agg.get_speed(2, 86_400, SpeedScope::Agent).await, 800);
    assert_eq!(agg.get_speed(2, 60, SpeedScope::Agent).await, 300);
    // Agent 1 only holds a finished chunk.
    assert_eq!(agg.get_speed(1, 86_400, SpeedScope::Agent).await, 0);
}
