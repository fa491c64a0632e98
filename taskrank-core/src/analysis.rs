//! Batch analysis: score, explain and rank a task list, and report cycles.

use serde::Serialize;
use tracing::{info, warn};

use crate::graph::{detect_circular_dependencies, Cycle};
use crate::scoring::{ScoreComponents, Scorer};
use crate::strategy::Strategy;
use crate::task::Task;

/// How many tasks a suggestion returns by default.
pub const DEFAULT_SUGGEST_LIMIT: usize = 3;

/// A task enriched with its score breakdown.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredTask {
    #[serde(flatten)]
    pub task: Task,
    pub priority_score: f64,
    pub score_components: ScoreComponents,
    pub explanation: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score_error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Analysis {
    pub strategy: Strategy,
    pub tasks: Vec<ScoredTask>,
    pub circular_dependencies: Vec<Cycle>,
}

/// Score and explain every task, highest score first.
///
/// Sorting is stable: tasks with equal scores keep their submitted order.
pub fn rank_tasks(scorer: &Scorer, tasks: &[Task]) -> Vec<ScoredTask> {
    let mut ranked: Vec<ScoredTask> = tasks
        .iter()
        .map(|task| {
            let result = scorer.score_task(task, tasks);
            if let Some(err) = &result.error {
                warn!(task = %task.id, error = %err, "task could not be scored");
            }
            ScoredTask {
                explanation: scorer.generate_explanation(&result),
                task: task.clone(),
                priority_score: result.score,
                score_components: result.components,
                score_error: result.error,
            }
        })
        .collect();

    ranked.sort_by(|a, b| b.priority_score.total_cmp(&a.priority_score));
    ranked
}

/// Full analysis of a task list.
pub fn analyze(scorer: &Scorer, tasks: &[Task]) -> Analysis {
    let circular_dependencies = detect_circular_dependencies(tasks);
    let ranked = rank_tasks(scorer, tasks);

    info!(
        strategy = %scorer.strategy(),
        tasks = ranked.len(),
        cycles = circular_dependencies.len(),
        "analyzed tasks"
    );

    Analysis {
        strategy: scorer.strategy(),
        tasks: ranked,
        circular_dependencies,
    }
}

/// The `limit` highest-priority tasks.
pub fn suggest(scorer: &Scorer, tasks: &[Task], limit: usize) -> Vec<ScoredTask> {
    let mut ranked = rank_tasks(scorer, tasks);
    ranked.truncate(limit);
    ranked
}
