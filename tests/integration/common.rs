//! Shared fixtures for the integration tests.

use std::sync::Arc;

use hashtopolis_console::models::{Agent, Chunk, Hashlist, Task, TaskWrapper};
use hashtopolis_console::services::tasks::{ChunkAggregator, FixedClock};
use hashtopolis_console::services::{InMemoryFetcher, TasksDataSource};
use hashtopolis_console::{ConsoleConfig, Resource};

pub const NOW: i64 = 1_700_000_000;

pub fn wrapper(id: i64, task_type: i64, priority: i64, hashlist_id: i64) -> TaskWrapper {
    TaskWrapper {
        id,
        task_wrapper_id: id,
        task_wrapper_name: format!("wrapper-{}", id),
        task_type,
        priority,
        hashlist_id,
        ..Default::default()
    }
}

pub fn task(id: i64, wrapper_id: i64, priority: i64, keyspace: i64) -> Task {
    Task {
        id,
        task_id: id,
        task_name: format!("task-{}", id),
        task_wrapper_id: wrapper_id,
        priority,
        keyspace,
        ..Default::default()
    }
}

pub fn hashlist(id: i64, name: &str) -> Hashlist {
    Hashlist {
        id,
        hashlist_id: id,
        name: name.to_string(),
        hash_count: 100,
        ..Default::default()
    }
}

pub fn agent(id: i64, name: &str) -> Agent {
    Agent {
        id,
        agent_id: id,
        agent_name: name.to_string(),
        ..Default::default()
    }
}

#[allow(clippy::too_many_arguments)]
pub fn chunk(
    id: i64,
    task_id: i64,
    agent_id: i64,
    length: i64,
    progress: i64,
    checkpoint: i64,
    skip: i64,
    solve_time: i64,
    dispatch_time: i64,
    speed: i64,
    cracked: i64,
) -> Chunk {
    Chunk {
        id,
        chunk_id: id,
        task_id,
        agent_id: Some(agent_id),
        length,
        progress,
        checkpoint,
        skip,
        solve_time,
        dispatch_time,
        speed,
        cracked,
        state: 2,
        ..Default::default()
    }
}

/// Two normal tasks, one super-task with two sub-tasks, and chunks for
/// task 10 laid out like the reference scenario (times relative to `NOW`).
pub fn cluster() -> Arc<InMemoryFetcher> {
    let wrappers = vec![
        wrapper(1, 0, 0, 1),
        wrapper(2, 0, 0, 1),
        wrapper(3, 1, 7, 2),
    ];
    let tasks = vec![
        task(10, 1, 5, 1000),
        task(11, 2, 9, 500),
        task(12, 3, 0, 100),
        task(13, 3, 0, 100),
    ];
    let hashlists = vec![hashlist(1, "corp-ntlm"), hashlist(2, "leak-md5")];
    let agents = vec![agent(1, "rig-01"), agent(2, "rig-02")];
    let chunks = vec![
        chunk(1, 10, 1, 200, 10_000, 500, 300, NOW - 900, NOW - 950, 1000, 2),
        chunk(2, 10, 2, 800, 5_000, 900, 500, 0, NOW - 800, 500, 0),
        chunk(3, 11, 2, 100, 2_000, 20, 0, 0, NOW - 10, 300, 1),
    ];

    Arc::new(
        InMemoryFetcher::new()
            .with_records(Resource::TaskWrappers, &wrappers)
            .with_records(Resource::Tasks, &tasks)
            .with_records(Resource::Hashlists, &hashlists)
            .with_records(Resource::Agents, &agents)
            .with_records(Resource::Chunks, &chunks),
    )
}

pub fn aggregator(fetcher: Arc<InMemoryFetcher>, config: &ConsoleConfig) -> ChunkAggregator {
    ChunkAggregator::with_clock(
        fetcher,
        config.aggregator_config(),
        Arc::new(FixedClock::new(NOW)),
    )
}

pub fn tasks_source(fetcher: Arc<InMemoryFetcher>) -> TasksDataSource {
    let config = ConsoleConfig {
        chunk_time_window_secs: 86_400,
        ..Default::default()
    };
    let aggregator = aggregator(fetcher.clone(), &config);
    TasksDataSource::with_aggregator(fetcher, aggregator, &config)
}
