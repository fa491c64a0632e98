//! Priority scoring: per-factor scores, strategy-weighted blend, explanations.
//!
//! Every factor function validates its own input and substitutes a documented
//! fallback instead of failing, so a batch of N tasks always yields N results.
//!
//! Factor scale is 0-10 (urgency can touch 10 exactly when overdue).

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::strategy::{Strategy, Weights};
use crate::task::{FieldValue, Task, TaskId};
use crate::time::days_until;

/// Fallback for missing or malformed urgency, importance and effort inputs.
pub const NEUTRAL_SCORE: f64 = 5.0;

pub const MIN_IMPORTANCE: f64 = 1.0;
pub const MAX_IMPORTANCE: f64 = 10.0;

const TAG_URGENT: &str = "⚠️ Due very soon or overdue";
const TAG_DUE_THIS_WEEK: &str = "📅 Due within a week";
const TAG_HIGH_IMPORTANCE: &str = "⭐ High importance";
const TAG_MEDIUM_IMPORTANCE: &str = "🔹 Medium-high importance";
const TAG_QUICK_WIN: &str = "⚡ Quick win (low effort)";
const TAG_MANY_DEPENDENTS: &str = "🔗 Multiple tasks depend on this";
const TAG_BLOCKS_OTHERS: &str = "🔗 Blocks other tasks";
const TAG_STRATEGY_QUICK_WIN: &str = "🎯 Prioritized as quick win";
const TAG_STRATEGY_IMPACT: &str = "🎯 Prioritized for high impact";
const TAG_STRATEGY_DEADLINE: &str = "🎯 Prioritized by deadline";
const BALANCED_EXPLANATION: &str = "📊 Balanced priority across all factors";
const TAG_SEPARATOR: &str = " • ";

pub fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

/// Urgency for a due date `days_until` days away (negative when overdue).
pub fn urgency_for_days(days_until: i64) -> f64 {
    match days_until {
        d if d < 0 => (10.0 + d.unsigned_abs() as f64 * 0.1).min(10.0),
        0 => 9.5,
        1 => 9.0,
        d if d <= 3 => 8.0,
        d if d <= 7 => 6.0,
        d if d <= 14 => 4.0,
        d if d <= 30 => 2.0,
        d => (2.0 - (d - 30) as f64 / 30.0).max(0.0),
    }
}

pub fn urgency_for_date(due: NaiveDate, today: NaiveDate) -> f64 {
    urgency_for_days(days_until(due, today))
}

/// Urgency of a submitted due date.
///
/// Accepts `YYYY-MM-DD` text. Missing, unparsable or non-text values score
/// [`NEUTRAL_SCORE`].
pub fn urgency_score(due_date: Option<&FieldValue>, today: NaiveDate) -> f64 {
    match due_date.and_then(FieldValue::as_date) {
        Some(due) => urgency_for_date(due, today),
        None => NEUTRAL_SCORE,
    }
}

/// Importance clamped to `[1, 10]`.
///
/// Accepts anything [`FieldValue::as_number`] reads. Missing or non-numeric
/// values score [`NEUTRAL_SCORE`].
pub fn importance_score(importance: Option<&FieldValue>) -> f64 {
    match importance.and_then(FieldValue::as_number) {
        Some(n) => n.clamp(MIN_IMPORTANCE, MAX_IMPORTANCE),
        None => NEUTRAL_SCORE,
    }
}

/// Effort score for a number of hours; less work scores higher.
/// Negative hours count as zero.
pub fn effort_for_hours(hours: f64) -> f64 {
    match hours.max(0.0) {
        h if h <= 0.5 => 10.0,
        h if h <= 1.0 => 9.0,
        h if h <= 2.0 => 8.0,
        h if h <= 4.0 => 6.0,
        h if h <= 8.0 => 4.0,
        h if h <= 16.0 => 2.0,
        h => (2.0 - (h - 16.0) / 8.0).max(0.0),
    }
}

/// Effort of a submitted estimate. Missing or non-numeric values score
/// [`NEUTRAL_SCORE`].
pub fn effort_score(estimated_hours: Option<&FieldValue>) -> f64 {
    match estimated_hours.and_then(FieldValue::as_number) {
        Some(hours) => effort_for_hours(hours),
        None => NEUTRAL_SCORE,
    }
}

/// Number of other tasks that list `id` as a direct dependency.
pub fn dependent_count(id: &TaskId, all_tasks: &[Task]) -> usize {
    all_tasks
        .iter()
        .filter(|t| t.id != *id && t.depends_on(id))
        .count()
}

pub fn dependency_for_count(count: usize) -> f64 {
    match count {
        0 => 0.0,
        1 => 4.0,
        2 => 7.0,
        n => (7.0 + (n - 2) as f64 * 1.5).min(10.0),
    }
}

/// Fan-in score: how many tasks are directly blocked on `id`.
/// Not transitive.
pub fn dependency_score(id: &TaskId, all_tasks: &[Task]) -> f64 {
    dependency_for_count(dependent_count(id, all_tasks))
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreComponents {
    pub urgency: f64,
    pub importance: f64,
    pub effort: f64,
    pub dependencies: f64,
}

impl ScoreComponents {
    pub fn weighted(&self, w: &Weights) -> f64 {
        w.urgency * self.urgency
            + w.importance * self.importance
            + w.effort * self.effort
            + w.dependencies * self.dependencies
    }

    fn rounded(self) -> Self {
        Self {
            urgency: round2(self.urgency),
            importance: round2(self.importance),
            effort: round2(self.effort),
            dependencies: round2(self.dependencies),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    pub score: f64,
    pub components: ScoreComponents,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ScoreResult {
    /// Zero score carrying a diagnostic; used when a task cannot be scored.
    pub fn failed(reason: impl Into<String>) -> Self {
        Self {
            score: 0.0,
            components: ScoreComponents::default(),
            error: Some(reason.into()),
        }
    }

    pub fn is_failed(&self) -> bool {
        self.error.is_some()
    }
}

/// Scores tasks under one strategy, relative to a fixed "today".
#[derive(Debug, Clone)]
pub struct Scorer {
    strategy: Strategy,
    weights: Weights,
    today: NaiveDate,
}

impl Scorer {
    /// Scorer for `strategy` using the local calendar date as "today".
    pub fn new(strategy: Strategy) -> Self {
        Self {
            strategy,
            weights: strategy.weights(),
            today: Local::now().date_naive(),
        }
    }

    /// Lenient constructor: unknown names score with `smart_balance`.
    pub fn from_name(name: Option<&str>) -> Self {
        Self::new(Strategy::resolve(name))
    }

    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    pub fn weights(&self) -> Weights {
        self.weights
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    pub fn urgency_score(&self, due_date: Option<&FieldValue>) -> f64 {
        urgency_score(due_date, self.today)
    }

    pub fn components(&self, task: &Task, all_tasks: &[Task]) -> ScoreComponents {
        ScoreComponents {
            urgency: self.urgency_score(task.due_date.as_ref()),
            importance: importance_score(task.importance.as_ref()),
            effort: effort_score(task.estimated_hours.as_ref()),
            dependencies: dependency_score(&task.id, all_tasks),
        }
    }

    /// Final priority score of `task` within `all_tasks`.
    ///
    /// The blend uses unrounded components; score and components are reported
    /// rounded to 2 decimals. Never fails: a non-finite blend yields
    /// [`ScoreResult::failed`].
    pub fn score_task(&self, task: &Task, all_tasks: &[Task]) -> ScoreResult {
        let components = self.components(task, all_tasks);
        let blended = components.weighted(&self.weights);

        if !blended.is_finite() {
            warn!(task = %task.id, ?components, "score is not a finite number");
            return ScoreResult::failed(format!(
                "score for task {} is not a finite number",
                task.id
            ));
        }

        let result = ScoreResult {
            score: round2(blended),
            components: components.rounded(),
            error: None,
        };
        debug!(task = %task.id, score = result.score, strategy = %self.strategy, "scored task");
        result
    }

    /// Short human-readable reasons behind a score, joined into one line.
    /// Never empty.
    pub fn generate_explanation(&self, result: &ScoreResult) -> String {
        let c = &result.components;
        let mut reasons: Vec<&str> = Vec::new();

        if c.urgency >= 8.0 {
            reasons.push(TAG_URGENT);
        } else if c.urgency >= 6.0 {
            reasons.push(TAG_DUE_THIS_WEEK);
        }

        if c.importance >= 8.0 {
            reasons.push(TAG_HIGH_IMPORTANCE);
        } else if c.importance >= 6.0 {
            reasons.push(TAG_MEDIUM_IMPORTANCE);
        }

        if c.effort >= 8.0 {
            reasons.push(TAG_QUICK_WIN);
        }

        if c.dependencies >= 7.0 {
            reasons.push(TAG_MANY_DEPENDENTS);
        } else if c.dependencies >= 4.0 {
            reasons.push(TAG_BLOCKS_OTHERS);
        }

        match self.strategy {
            Strategy::FastestWins if c.effort >= 7.0 => reasons.push(TAG_STRATEGY_QUICK_WIN),
            Strategy::HighImpact if c.importance >= 7.0 => reasons.push(TAG_STRATEGY_IMPACT),
            Strategy::DeadlineDriven if c.urgency >= 7.0 => reasons.push(TAG_STRATEGY_DEADLINE),
            _ => {}
        }

        if reasons.is_empty() {
            BALANCED_EXPLANATION.to_string()
        } else {
            reasons.join(TAG_SEPARATOR)
        }
    }
}

impl Default for Scorer {
    fn default() -> Self {
        Self::new(Strategy::default())
    }
}
