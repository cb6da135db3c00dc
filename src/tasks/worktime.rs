//! Work-time aggregation over task sets.
//!
//! Elapsed time is summed in milliseconds and converted to fractional
//! hours; no rounding is applied. Callers supply the evaluation instant
//! (`now`) so that open tasks contribute time up to the wall clock while
//! tests can pin it.

use chrono::{DateTime, Utc};

use crate::shared::models::Task;

const MS_PER_HOUR: f64 = 3_600_000.0;

/// Total hours across a developer's tasks. An open task (no completion
/// time) counts up to `now`.
pub fn developer_work_time(tasks: &[Task], now: DateTime<Utc>) -> f64 {
    let mut total_ms = 0.0;
    for task in tasks {
        let end = task.completed_at.unwrap_or(now);
        total_ms += (end - task.created_at).num_milliseconds() as f64;
    }
    total_ms / MS_PER_HOUR
}

/// Total hours across tasks, honoring an optional date window.
///
/// A task is silently dropped when it starts before `start` or when its
/// effective end falls past `end`; exclusion is never an error.
pub fn windowed_work_time(
    tasks: &[Task],
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> f64 {
    let mut total_ms = 0.0;
    for task in tasks {
        if let Some(start) = start {
            if task.created_at < start {
                continue;
            }
        }

        let task_end = effective_end(task, now);
        if let Some(end) = end {
            if task_end > end {
                continue;
            }
        }

        total_ms += (task_end - task.created_at).num_milliseconds() as f64;
    }
    total_ms / MS_PER_HOUR
}

/// Completion time, falling back to the last modification time, falling
/// back to the evaluation instant, in that preference order.
fn effective_end(task: &Task, now: DateTime<Utc>) -> DateTime<Utc> {
    task.completed_at.or(task.updated_at).unwrap_or(now)
}
