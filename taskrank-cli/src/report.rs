//! Plain-text rendering for terminal output.

use std::fmt::Write;
use taskrank_core::{Cycle, ScoredTask, Strategy};

pub fn render_ranking(ranked: &[ScoredTask]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:>3}  {:>6}  {:>5} {:>5} {:>5} {:>5}  {}",
        "#", "score", "urg", "imp", "eff", "dep", "task"
    );

    for (i, t) in ranked.iter().enumerate() {
        let c = &t.score_components;
        let _ = writeln!(
            out,
            "{:>3}  {:>6.2}  {:>5.2} {:>5.2} {:>5.2} {:>5.2}  [{}] {}",
            i + 1,
            t.priority_score,
            c.urgency,
            c.importance,
            c.effort,
            c.dependencies,
            t.task.id,
            t.task.title
        );
        let _ = writeln!(out, "{:>8}{}", "", t.explanation);
        if let Some(err) = &t.score_error {
            let _ = writeln!(out, "{:>8}error: {}", "", err);
        }
    }

    out
}

pub fn render_cycles(cycles: &[Cycle]) -> String {
    if cycles.is_empty() {
        return "No circular dependencies.\n".to_string();
    }

    let mut out = format!("Circular dependencies ({}):\n", cycles.len());
    for cycle in cycles {
        let members: Vec<String> = cycle.iter().map(ToString::to_string).collect();
        let _ = writeln!(out, "- {{{}}}", members.join(", "));
    }
    out
}

pub fn render_strategies(default: Strategy) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<16} {:>8} {:>10} {:>7} {:>13}",
        "strategy", "urgency", "importance", "effort", "dependencies"
    );
    for strategy in Strategy::ALL {
        let w = strategy.weights();
        let marker = if strategy == default { " (default)" } else { "" };
        let _ = writeln!(
            out,
            "{:<16} {:>8.2} {:>10.2} {:>7.2} {:>13.2}{}",
            strategy.name(),
            w.urgency,
            w.importance,
            w.effort,
            w.dependencies,
            marker
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use taskrank_core::{ScoreComponents, Task, TaskId};

    #[test]
    fn ranking_lists_rank_score_and_explanation() {
        let ranked = vec![ScoredTask {
            task: Task::new(4, "Fix login"),
            priority_score: 7.13,
            score_components: ScoreComponents {
                urgency: 9.5,
                importance: 10.0,
                effort: 8.0,
                dependencies: 0.0,
            },
            explanation: "⭐ High importance".to_string(),
            score_error: None,
        }];
        let text = render_ranking(&ranked);
        assert!(text.contains("  1    7.13"));
        assert!(text.contains("[4] Fix login"));
        assert!(text.contains("⭐ High importance"));
    }

    #[test]
    fn cycles_render_as_sets() {
        let cycle: Cycle = [TaskId::Int(1), TaskId::Int(2)].into_iter().collect();
        assert_eq!(
            render_cycles(&[cycle]),
            "Circular dependencies (1):\n- {1, 2}\n"
        );
        assert_eq!(render_cycles(&[]), "No circular dependencies.\n");
    }

    #[test]
    fn strategy_table_marks_default() {
        let text = render_strategies(Strategy::HighImpact);
        assert!(text.contains("high_impact"));
        assert!(text.contains("0.60"));
        assert_eq!(text.matches("(default)").count(), 1);
    }
}
