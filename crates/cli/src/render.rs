//! Plain-text rendering of records and reports.

use fittrack_core::{Exercise, Goal, Routine};
use fittrack_progress::{ExerciseReport, GoalReport, Overall, RoutineReport};

/// A grid table with a header row.
///
/// Columns whose cells are all numeric are right-aligned.
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(headers: &[&str]) -> Self {
        Self {
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    pub fn row(&mut self, cells: Vec<String>) {
        self.rows.push(cells);
    }

    pub fn render(&self) -> String {
        let columns = self.headers.len();
        let mut widths: Vec<usize> = self.headers.iter().map(|h| h.chars().count()).collect();
        let mut numeric = vec![!self.rows.is_empty(); columns];
        for row in &self.rows {
            for (i, cell) in row.iter().enumerate().take(columns) {
                widths[i] = widths[i].max(cell.chars().count());
                numeric[i] &= cell.parse::<f64>().is_ok();
            }
        }

        let rule = |fill: char| {
            let mut line = String::from("+");
            for width in &widths {
                line.push_str(&fill.to_string().repeat(width + 2));
                line.push('+');
            }
            line
        };
        let line = |cells: &[String], align: &[bool]| {
            let mut out = String::from("|");
            for (i, width) in widths.iter().enumerate() {
                let cell = cells.get(i).map(String::as_str).unwrap_or("");
                if align[i] {
                    out.push_str(&format!(" {:>width$} |", cell, width = width));
                } else {
                    out.push_str(&format!(" {:<width$} |", cell, width = width));
                }
            }
            out
        };

        let mut out = Vec::with_capacity(self.rows.len() * 2 + 3);
        out.push(rule('-'));
        out.push(line(&self.headers, &vec![false; columns]));
        out.push(rule('='));
        for row in &self.rows {
            out.push(line(row, &numeric));
            out.push(rule('-'));
        }
        out.join("\n")
    }
}

/// Format a percentage with two decimals.
pub fn percent(value: f64) -> String {
    format!("{:.2}%", value)
}

pub fn exercises_table(exercises: &[Exercise]) -> String {
    let mut table = Table::new(&["Exercise", "Muscle Group", "Reps", "Sets"]);
    for e in exercises {
        table.row(vec![
            e.name.clone(),
            e.muscle_group.to_string(),
            e.target_reps.to_string(),
            e.target_sets.to_string(),
        ]);
    }
    table.render()
}

pub fn routine_table(routine: &Routine) -> String {
    let mut table = Table::new(&["Exercise", "Muscle Group", "Reps", "Sets"]);
    for entry in &routine.entries {
        table.row(vec![
            entry.exercise.clone(),
            entry.muscle_group.to_string(),
            entry.target_reps.to_string(),
            entry.target_sets.to_string(),
        ]);
    }
    table.render()
}

/// Numbered list, one item per line, starting at 1.
pub fn numbered<I, S>(items: I) -> String
where
    I: IntoIterator<Item = S>,
    S: std::fmt::Display,
{
    items
        .into_iter()
        .enumerate()
        .map(|(i, item)| format!("{}. {}", i + 1, item))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn goal_line(goal: &Goal) -> String {
    format!("{} - {}: {}", goal.exercise, goal.goal_type, goal.goal_value)
}

pub fn goal_report(report: &GoalReport) -> String {
    format!(
        "\n--- Goal for {}:\n\
         - Goal type: {}\n\
         - Goal value: {}\n\
         \n\
         - Progress:\n  \
         - Completed reps: {}\n  \
         - Remaining reps: {}\n  \
         - Completion percentage: {}",
        report.exercise,
        report.goal_type,
        report.goal_value,
        report.completed_reps,
        report.remaining_reps,
        percent(report.percentage),
    )
}

fn exercise_report(report: &ExerciseReport) -> String {
    format!(
        "\n- {}:\n  \
         - Completed: {} reps\n  \
         - Remaining: {} sets, {} reps\n  \
         - Percentage completion: {}",
        report.exercise,
        report.completed_reps,
        report.remaining_sets,
        report.remaining_reps,
        percent(report.completion_percentage),
    )
}

pub fn routine_report(report: &RoutineReport) -> String {
    let mut out: Vec<String> = report.exercises.iter().map(exercise_report).collect();
    for name in &report.skipped {
        out.push(format!(
            "Warning: Missing target data for exercise {}. Skipping in overall progress calculation.",
            name
        ));
    }
    match report.overall {
        Overall::Completed(value) => {
            out.push(format!("\nOverall Workout Progress:\n- Completed: {}", percent(value)));
        }
        Overall::NoData => {
            out.push("\nNo exercises completed. Overall progress unavailable.".to_string());
        }
    }
    out.join("\n")
}
