//! taskrank-core: priority scoring and dependency analysis for task lists.

pub mod analysis;
pub mod graph;
pub mod intake;
pub mod scoring;
pub mod strategy;
pub mod task;
pub mod time;

pub use analysis::{analyze, rank_tasks, suggest, Analysis, ScoredTask, DEFAULT_SUGGEST_LIMIT};
pub use graph::{detect_circular_dependencies, Cycle};
pub use intake::{normalize_tasks, IntakeError};
pub use scoring::{ScoreComponents, ScoreResult, Scorer};
pub use strategy::{Strategy, UnknownStrategy, Weights};
pub use task::{FieldValue, Task, TaskId};
