//! Chunk Table and Agent View Integration Tests

use hashtopolis_console::models::{AgentStat, AgentStatType};
use hashtopolis_console::services::agents::{
    load_assignable_tasks, AgentStatSummary, AgentWorkload,
};
use hashtopolis_console::services::{ChunksDataSource, LoadOutcome};
use hashtopolis_console::{ConsoleConfig, Resource};

use crate::common::{aggregator, cluster, task, NOW};

#[tokio::test]
async fn test_chunks_get_their_agent() {
    let source = ChunksDataSource::new(cluster(), &ConsoleConfig::default());
    assert_eq!(source.load_all(None).await, LoadOutcome::Loaded(3));

    let table = source.table().await;
    let labels: Vec<String> = table.data().iter().map(|r| r.agent_label()).collect();
    assert_eq!(labels, vec!["rig-01", "rig-02", "rig-02"]);
}

#[tokio::test]
async fn test_chunks_for_one_agent() {
    let fetcher = cluster();
    let source = ChunksDataSource::new(fetcher.clone(), &ConsoleConfig::default());
    let rows = source.try_load(Some(2)).await.unwrap();
    assert_eq!(rows.len(), 2);
    assert!(rows.iter().all(|r| r.chunk.agent_id == Some(2)));

    let (_, query) = fetcher
        .queries()
        .into_iter()
        .find(|(r, _)| *r == Resource::Chunks)
        .unwrap();
    assert_eq!(query.filter_expression(), "agentId=2");
    assert_eq!(query.expand_expression(), "task");
}

#[tokio::test]
async fn test_unknown_agent_leaves_reference_empty() {
    let fetcher = cluster();
    fetcher.set_records::<hashtopolis_console::models::Agent>(Resource::Agents, &[]);
    let source = ChunksDataSource::new(fetcher, &ConsoleConfig::default());
    let rows = source.try_load(None).await.unwrap();
    assert!(rows.iter().all(|r| r.agent.is_none()));
    assert_eq!(rows[0].agent_label(), "1");
}

#[tokio::test]
async fn test_agent_fetch_failure_empties_chunk_table() {
    let fetcher = cluster();
    let source = ChunksDataSource::new(fetcher.clone(), &ConsoleConfig::default());
    source.load_all(None).await;

    fetcher.fail(Resource::Agents);
    assert_eq!(source.reload(None).await, LoadOutcome::Failed);
    assert!(source.table().await.data().is_empty());
}

#[tokio::test]
async fn test_agent_workload() {
    let fetcher = cluster();
    let config = ConsoleConfig {
        chunk_time_window_secs: 86_400,
        ..Default::default()
    };
    let agg = aggregator(fetcher.clone(), &config);
    let workload = AgentWorkload::load(fetcher.as_ref(), &agg, 2).await.unwrap();

    assert_eq!(workload.chunks.len(), 2);
    assert_eq!(workload.current_speed, 800);
    // Neither chunk of agent 2 is solved yet.
    assert_eq!(workload.time_spent_secs, 0);
    assert!(workload
        .chunks
        .iter()
        .all(|c| c.task.as_ref().map(|t| t.id) == Some(c.task_id)));

    let agent1 = AgentWorkload::load(fetcher.as_ref(), &agg, 1).await.unwrap();
    assert_eq!(agent1.time_spent_secs, 50);
    assert_eq!(agent1.current_speed, 0);
}

#[tokio::test]
async fn test_assignable_tasks_exclude_finished() {
    let fetcher = cluster();
    let mut done = task(20, 1, 0, 100);
    done.keyspace_progress = 100;
    let mut running = task(21, 1, 0, 100);
    running.keyspace_progress = 40;
    let fresh = task(22, 1, 0, 0);
    fetcher.set_records(Resource::Tasks, &[done, running, fresh]);

    let tasks = load_assignable_tasks(fetcher.as_ref(), 1000).await.unwrap();
    let ids: Vec<i64> = tasks.iter().map(|t| t.id).collect();
    assert_eq!(ids, vec![21, 22]);
}

#[test]
fn test_gpu_temperature_summary() {
    let stats = vec![
        AgentStat {
            agent_id: 1,
            stat_type: AgentStatType::GpuTemperature.code(),
            time: NOW,
            value: vec![61, 65],
            ..Default::default()
        },
        AgentStat {
            agent_id: 1,
            stat_type: AgentStatType::GpuUtilization.code(),
            time: NOW,
            value: vec![99],
            ..Default::default()
        },
    ];
    let summary = AgentStatSummary::from_stats(&stats, AgentStatType::GpuTemperature).unwrap();
    assert_eq!(summary.samples, 2);
    assert_eq!(summary.average, 63.0);
    assert_eq!(summary.max, 65);
}
