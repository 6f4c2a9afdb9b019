//! Task Join Engine
//!
//! Merges task wrappers, tasks and hashlists into the row set behind the
//! task table:
//!
//! - wrappers with task type 1 become super-task rows, each carrying the
//!   first hashlist whose id matches the wrapper's `hashlistId`
//! - tasks are resolved against their wrapper; only tasks whose wrapper is a
//!   normal (type 0) wrapper become rows, sub-tasks of super-tasks are dropped
//! - the result is sorted by priority, highest first, keeping input order
//!   among equal priorities

use std::sync::Arc;

use hashtopolis_console_core::{fetch_typed, EntityFetcher, ListQuery, Resource};
use serde::Serialize;

use crate::models::{Hashlist, SuperTaskRow, Task, TaskRow, TaskType, TaskWrapper};
use crate::utils::error::AppResult;

/// Related records the backend embeds into each task.
pub const TASK_EXPANSIONS: [&str; 4] = [
    "crackerBinary",
    "crackerBinaryType",
    "hashlist",
    "assignedAgents",
];

/// Rows of one load plus the wrapper count reported by the backend.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TaskLoad {
    pub rows: Vec<TaskRow>,
    pub total: u64,
}

/// Merge the three collections into priority-ordered rows.
///
/// A task whose wrapper is missing from `wrappers` is skipped and logged.
pub fn merge_task_rows(
    wrappers: &[TaskWrapper],
    tasks: Vec<Task>,
    hashlists: &[Hashlist],
) -> Vec<TaskRow> {
    let super_rows = wrappers
        .iter()
        .filter(|w| w.kind() == Some(TaskType::Super))
        .map(|wrapper| {
            TaskRow::Super(SuperTaskRow {
                hashlist: hashlists
                    .iter()
                    .find(|h| h.hashlist_id == wrapper.hashlist_id)
                    .cloned(),
                wrapper: wrapper.clone(),
            })
        });

    let mut skipped = 0usize;
    let mut rows: Vec<TaskRow> = tasks
        .into_iter()
        .filter_map(|mut task| {
            let Some(wrapper) = wrappers
                .iter()
                .find(|w| w.task_wrapper_id == task.task_wrapper_id)
            else {
                skipped += 1;
                tracing::warn!(
                    "[TaskJoin] Task {} references missing wrapper {}, skipping",
                    task.id,
                    task.task_wrapper_id
                );
                return None;
            };
            if wrapper.kind() != Some(TaskType::Normal) {
                return None;
            }
            task.task_wrapper_id = wrapper.task_wrapper_id;
            Some(TaskRow::Normal(task))
        })
        .collect();

    rows.extend(super_rows);
    rows.sort_by(|a, b| b.priority().cmp(&a.priority()));

    tracing::debug!(
        "[TaskJoin] Merged {} rows ({} tasks skipped)",
        rows.len(),
        skipped
    );
    rows
}

/// Fetches and joins the task table's collections.
pub struct TaskJoinEngine {
    fetcher: Arc<dyn EntityFetcher>,
    list_max_results: u32,
}

impl TaskJoinEngine {
    pub fn new(fetcher: Arc<dyn EntityFetcher>, list_max_results: u32) -> Self {
        Self {
            fetcher,
            list_max_results,
        }
    }

    /// Fetch wrappers, tasks and hashlists concurrently and merge them.
    /// Fails as soon as any of the three fetches fails.
    pub async fn try_load_all(&self, is_archived: bool) -> AppResult<TaskLoad> {
        let wrapper_query = ListQuery::new()
            .max_results(self.list_max_results)
            .filter_eq("isArchived", is_archived);
        let task_query = TASK_EXPANSIONS.iter().fold(
            ListQuery::new()
                .max_results(self.list_max_results)
                .filter_eq("isArchived", is_archived),
            |query, name| query.expand(*name),
        );
        let hashlist_query = ListQuery::new().max_results(self.list_max_results);

        let fetcher = self.fetcher.as_ref();
        let (wrappers, tasks, hashlists) = tokio::try_join!(
            fetch_typed::<TaskWrapper>(fetcher, Resource::TaskWrappers, &wrapper_query),
            fetch_typed::<Task>(fetcher, Resource::Tasks, &task_query),
            fetch_typed::<Hashlist>(fetcher, Resource::Hashlists, &hashlist_query),
        )?;

        Ok(TaskLoad {
            rows: merge_task_rows(&wrappers.values, tasks.values, &hashlists.values),
            total: wrappers.total,
        })
    }

    /// Like `try_load_all`, but a failed fetch yields no rows.
    pub async fn load_all(&self, is_archived: bool) -> Vec<TaskRow> {
        match self.try_load_all(is_archived).await {
            Ok(load) => load.rows,
            Err(e) => {
                tracing::warn!("[TaskJoin] Load failed, showing no tasks: {}", e);
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wrapper(id: i64, task_type: i64, priority: i64, hashlist_id: i64) -> TaskWrapper {
        TaskWrapper {
            id,
            task_wrapper_id: id,
            task_wrapper_name: format!("wrapper {}", id),
            task_type,
            priority,
            hashlist_id,
            ..Default::default()
        }
    }

    fn task(id: i64, wrapper_id: i64, priority: i64) -> Task {
        Task {
            id,
            task_id: id,
            task_name: format!("task {}", id),
            task_wrapper_id: wrapper_id,
            priority,
            ..Default::default()
        }
    }

    fn hashlist(id: i64, name: &str) -> Hashlist {
        Hashlist {
            id,
            hashlist_id: id,
            name: name.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_sub_tasks_of_super_tasks_are_dropped() {
        let wrappers = vec![wrapper(1, 0, 0, 1), wrapper(2, 1, 0, 1)];
        let tasks = vec![task(10, 1, 5), task(11, 2, 5), task(12, 2, 5)];
        let rows = merge_task_rows(&wrappers, tasks, &[]);

        let keys: Vec<String> = rows.iter().map(TaskRow::row_key).collect();
        assert_eq!(keys, vec!["task-10", "wrapper-2"]);
    }

    #[test]
    fn test_super_task_gets_first_matching_hashlist() {
        let wrappers = vec![wrapper(2, 1, 0, 7)];
        let hashlists = vec![hashlist(3, "other"), hashlist(7, "first"), hashlist(7, "second")];
        let rows = merge_task_rows(&wrappers, Vec::new(), &hashlists);
        assert_eq!(rows[0].hashlist().map(|h| h.name.as_str()), Some("first"));
    }

    #[test]
    fn test_super_task_without_hashlist_is_kept() {
        let rows = merge_task_rows(&[wrapper(2, 1, 0, 99)], Vec::new(), &[]);
        assert_eq!(rows.len(), 1);
        assert!(rows[0].hashlist().is_none());
    }

    #[test]
    fn test_task_with_missing_wrapper_is_skipped() {
        let wrappers = vec![wrapper(1, 0, 0, 1)];
        let rows = merge_task_rows(&wrappers, vec![task(10, 1, 1), task(11, 404, 9)], &[]);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].display_id(), 10);
    }

    #[test]
    fn test_priority_sort_is_descending_and_stable() {
        let wrappers: Vec<TaskWrapper> = (1..=4).map(|i| wrapper(i, 0, 0, 1)).collect();
        let tasks = vec![task(1, 1, 5), task(2, 2, 3), task(3, 3, 3), task(4, 4, 8)];
        let rows = merge_task_rows(&wrappers, tasks, &[]);

        let order: Vec<(i64, i64)> = rows.iter().map(|r| (r.priority(), r.display_id())).collect();
        assert_eq!(order, vec![(8, 4), (5, 1), (3, 2), (3, 3)]);
    }

    #[test]
    fn test_super_rows_follow_tasks_on_equal_priority() {
        let wrappers = vec![wrapper(1, 1, 4, 1), wrapper(2, 0, 0, 1)];
        let rows = merge_task_rows(&wrappers, vec![task(10, 2, 4)], &[]);
        assert!(rows[0].is_normal());
        assert!(!rows[1].is_normal());
    }
}
