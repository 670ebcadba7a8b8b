//! Interactive menu shell.
//!
//! Each menu token maps to one [`Action`]; [`Action::Quit`] is the only
//! terminal state besides closed input. Errors from an action are printed
//! and the menu is shown again.

use std::io::{BufRead, Write};
use std::sync::Arc;
use anyhow::Result;
use fittrack_core::{CompletedSnapshot, ExerciseFilter, MuscleGroup, NewExercise};
use fittrack_progress::{GoalOutcome, ProgressTracker};
use fittrack_storage::StorageError;
use fittrack_training::{GoalChange, TrainingError, TrainingManager};
use tracing::{debug, info};

use crate::prompt::{PromptError, Prompter};
use crate::render;

/// Shell behaviour switches.
#[derive(Debug, Clone)]
pub struct ShellConfig {
    /// Replace existing goals when setting a new value
    pub overwrite_goals: bool,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self { overwrite_goals: true }
    }
}

/// A menu action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    AddExercise,
    ViewExercises,
    DeleteExercise,
    CreateRoutine,
    ViewRoutine,
    DeleteRoutine,
    RoutineProgress,
    SetGoals,
    GoalProgress,
    DeleteGoal,
    Quit,
}

/// Menu token, label and action, in display order.
const MENU: &[(&str, &str, Action)] = &[
    ("1", "Add exercise", Action::AddExercise),
    ("2", "View exercises", Action::ViewExercises),
    ("3", "Delete exercise", Action::DeleteExercise),
    ("4", "Create Workout Routine", Action::CreateRoutine),
    ("5", "View Workout Routines", Action::ViewRoutine),
    ("6", "Delete Workout Routine", Action::DeleteRoutine),
    ("7", "View Exercise Progress", Action::RoutineProgress),
    ("8", "Set Fitness Goals", Action::SetGoals),
    ("9", "View Progress towards Fitness Goals", Action::GoalProgress),
    ("10", "Delete Fitness Goals", Action::DeleteGoal),
    ("0", "Quit", Action::Quit),
];

impl Action {
    /// Look up the action for a menu token.
    pub fn from_token(token: &str) -> Option<Action> {
        MENU.iter()
            .find(|(t, _, _)| *t == token)
            .map(|(_, _, action)| *action)
    }
}

/// The interactive shell.
pub struct Shell<R, W> {
    training: Arc<dyn TrainingManager>,
    tracker: Arc<dyn ProgressTracker>,
    io: Prompter<R, W>,
    config: ShellConfig,
}

impl<R: BufRead, W: Write> Shell<R, W> {
    pub fn new(
        training: Arc<dyn TrainingManager>,
        tracker: Arc<dyn ProgressTracker>,
        io: Prompter<R, W>,
        config: ShellConfig,
    ) -> Self {
        Self { training, tracker, io, config }
    }

    /// Consume the shell, returning its output writer.
    pub fn into_output(self) -> W {
        self.io.into_output()
    }

    /// Run the menu loop until quit or end of input.
    pub async fn run(&mut self) -> Result<()> {
        loop {
            self.print_menu()?;
            let token = match self.io.line(": ") {
                Ok(token) => token,
                Err(PromptError::Closed) => {
                    info!("Input closed, ending session");
                    return Ok(());
                }
                Err(e) => return Err(e.into()),
            };

            let Some(action) = Action::from_token(token.trim()) else {
                writeln!(self.io.out(), "\nInvalid input. Please select from the available list.")?;
                continue;
            };
            if action == Action::Quit {
                writeln!(self.io.out(), "\nGood luck with your fitness journey. Until next time!")?;
                return Ok(());
            }

            debug!("Dispatching {:?}", action);
            if let Err(e) = self.dispatch(action).await {
                match e.downcast_ref::<PromptError>() {
                    Some(PromptError::Closed) => {
                        info!("Input closed, ending session");
                        return Ok(());
                    }
                    Some(PromptError::Io(_)) => return Err(e),
                    None => writeln!(self.io.out(), "Error: {}", e)?,
                }
            }
        }
    }

    fn print_menu(&mut self) -> Result<()> {
        let out = self.io.out();
        writeln!(out, "\nSelect one of the following options:")?;
        for (token, label, _) in MENU {
            writeln!(out, "    {} - {}", token, label)?;
        }
        Ok(())
    }

    async fn dispatch(&mut self, action: Action) -> Result<()> {
        match action {
            Action::AddExercise => self.add_exercise().await,
            Action::ViewExercises => self.view_exercises().await,
            Action::DeleteExercise => self.delete_exercise().await,
            Action::CreateRoutine => self.create_routine().await,
            Action::ViewRoutine => self.view_routine().await,
            Action::DeleteRoutine => self.delete_routine().await,
            Action::RoutineProgress => self.routine_progress().await,
            Action::SetGoals => self.set_goals().await,
            Action::GoalProgress => self.goal_progress().await,
            Action::DeleteGoal => self.delete_goal().await,
            Action::Quit => Ok(()),
        }
    }

    // === Exercises ===

    async fn add_exercise(&mut self) -> Result<()> {
        writeln!(self.io.out(), "\nYou have selected the option to add a new exercise.")?;
        let name = self.io.non_blank(
            "Please enter the name of the exercise: ",
            "Invalid name. Please enter a valid exercise name.",
        )?;

        let muscle_group = loop {
            writeln!(self.io.out(), "Available muscle groups: {}", MuscleGroup::options())?;
            let answer = self.io.line("Which muscle group does this exercise target primarily: ")?;
            if answer.trim().is_empty() {
                writeln!(self.io.out(), "Invalid group. Please enter a valid muscle group.")?;
                continue;
            }
            match answer.parse::<MuscleGroup>() {
                Ok(group) => break group,
                Err(e) => writeln!(self.io.out(), "Invalid muscle group: {}", e)?,
            }
        };

        let target_reps = self.io.count("Please enter the amount of reps: ")?;
        let target_sets = self.io.count("Please enter the amount of sets: ")?;

        self.training
            .add_exercise(NewExercise { name, muscle_group, target_reps, target_sets })
            .await?;
        writeln!(self.io.out(), "Exercise added successfully!")?;
        Ok(())
    }

    async fn view_exercises(&mut self) -> Result<()> {
        loop {
            writeln!(
                self.io.out(),
                "\nSelect view options:\n    1 - View all exercises\n    2 - View exercises by muscle group\n    0 - Back to menu"
            )?;
            match self.io.line(": ")?.trim() {
                "1" => {
                    let all = self.training.exercises(&ExerciseFilter::default()).await?;
                    if all.is_empty() {
                        writeln!(
                            self.io.out(),
                            "\nNo exercises found. Please create exercises first."
                        )?;
                    } else {
                        let table = render::exercises_table(&all);
                        writeln!(self.io.out(), "\nAll Exercises:\n{}", table)?;
                    }
                }
                "2" => self.view_by_muscle_group().await?,
                "0" => return Ok(()),
                _ => {
                    let out = self.io.out();
                    writeln!(out, "\nInvalid input. Please select from the available list.")?
                }
            }
        }
    }

    async fn view_by_muscle_group(&mut self) -> Result<()> {
        let groups = self.training.muscle_groups_in_use().await?;
        if groups.is_empty() {
            writeln!(self.io.out(), "\nNo exercises found. Please create exercises first.")?;
            return Ok(());
        }
        writeln!(self.io.out(), "Available muscle groups:\n{}", render::numbered(&groups))?;
        let Some(index) = self.io.choose(
            "Enter the number of the muscle group you want to view (or 0 to go back): ",
            groups.len(),
        )?
        else {
            return Ok(());
        };

        let group = groups[index];
        let exercises = self.training.exercises(&ExerciseFilter::muscle_group(group)).await?;
        if exercises.is_empty() {
            writeln!(self.io.out(), "No exercises found for muscle group '{}'.", group)?;
        } else {
            writeln!(
                self.io.out(),
                "\nExercises for muscle group '{}':\n{}",
                group,
                render::exercises_table(&exercises)
            )?;
        }
        Ok(())
    }

    async fn delete_exercise(&mut self) -> Result<()> {
        writeln!(self.io.out(), "\nYou have selected the option to delete an exercise.")?;
        let name = self.io.line("Please enter the name of the exercise to be deleted: ")?;
        let name = name.trim();
        if !self.io.confirm(&format!("Are you sure you want to delete '{}'? (y/n): ", name))? {
            writeln!(self.io.out(), "Deletion cancelled.")?;
            return Ok(());
        }
        self.training.delete_exercise(name).await?;
        writeln!(self.io.out(), "Exercise '{}' has been deleted successfully.", name)?;
        Ok(())
    }

    // === Routines ===

    async fn create_routine(&mut self) -> Result<()> {
        let routine = loop {
            let name = self
                .io
                .line("Enter a name for the routine (leave blank to generate automatically): ")?;
            match self.training.create_routine(&name).await {
                Ok(routine) => {
                    if name.trim().is_empty() {
                        writeln!(
                            self.io.out(),
                            "No name provided, automatically generated name: {}",
                            routine.name
                        )?;
                    }
                    break routine;
                }
                Err(TrainingError::Validation(e)) => {
                    writeln!(self.io.out(), "Invalid routine name: {}", e)?
                }
                Err(TrainingError::Storage(StorageError::Duplicate { key, .. })) => writeln!(
                    self.io.out(),
                    "Routine '{}' already exists. Please choose another name.",
                    key
                )?,
                Err(e) => return Err(e.into()),
            }
        };

        let exercises = self.training.exercises(&ExerciseFilter::default()).await?;
        writeln!(self.io.out(), "Available exercises:")?;
        for e in &exercises {
            writeln!(
                self.io.out(),
                "\t- {} ({}) - Reps: {}, Sets: {}",
                e.name, e.muscle_group, e.target_reps, e.target_sets
            )?;
        }

        loop {
            let answer = self.io.line("Enter an exercise to add (or 'done' to finish): ")?;
            let answer = answer.trim();
            if answer.eq_ignore_ascii_case("done") {
                break;
            }
            match self.training.add_to_routine(&routine.name, answer).await {
                Ok(entry) => {
                    writeln!(self.io.out(), "Exercise '{}' added to the routine.", entry.exercise)?
                }
                Err(TrainingError::ExerciseNotFound(name)) => {
                    writeln!(self.io.out(), "Exercise '{}' not found in the catalog.", name)?
                }
                Err(e) => return Err(e.into()),
            }
        }
        Ok(())
    }

    /// List routines and let the user pick one. `None` when there are none
    /// or the user backs out.
    async fn pick_routine(&mut self, verb: &str) -> Result<Option<String>> {
        let routines = self.training.routines().await?;
        if routines.is_empty() {
            writeln!(self.io.out(), "\nNo workout routines found.")?;
            return Ok(None);
        }
        let names: Vec<String> = routines.into_iter().map(|r| r.name).collect();
        writeln!(self.io.out(), "\nWorkout routines:\n{}", render::numbered(&names))?;
        let choice = self.io.choose(
            &format!("Enter the number of the routine you want to {} (or 0 to exit): ", verb),
            names.len(),
        )?;
        Ok(choice.map(|i| names[i].clone()))
    }

    async fn view_routine(&mut self) -> Result<()> {
        let Some(name) = self.pick_routine("view").await? else {
            return Ok(());
        };
        let routine = self.training.routine(&name).await?;
        if routine.is_empty() {
            writeln!(self.io.out(), "Routine {} is empty.", name)?;
        } else {
            writeln!(
                self.io.out(),
                "\nContents of {} routine:\n{}",
                name,
                render::routine_table(&routine)
            )?;
        }
        Ok(())
    }

    async fn delete_routine(&mut self) -> Result<()> {
        let Some(name) = self.pick_routine("delete").await? else {
            return Ok(());
        };
        if !self
            .io
            .confirm(&format!("Are you sure you want to delete the routine '{}'? (y/n): ", name))?
        {
            writeln!(self.io.out(), "Deletion cancelled.")?;
            return Ok(());
        }
        self.training.delete_routine(&name).await?;
        writeln!(self.io.out(), "Routine '{}' deleted successfully.", name)?;
        Ok(())
    }

    async fn routine_progress(&mut self) -> Result<()> {
        let Some(name) = self.pick_routine("view progress for").await? else {
            return Ok(());
        };
        let routine = self.training.routine(&name).await?;

        let mut completed = CompletedSnapshot::new();
        for exercise in routine.exercise_names() {
            let reps = self
                .io
                .count(&format!("Enter the number of reps completed for {}: ", exercise))?;
            completed.record(exercise, reps);
        }

        let report = self.tracker.routine_progress(&name, &completed).await?;
        writeln!(self.io.out(), "{}", render::routine_report(&report))?;
        Ok(())
    }

    // === Goals ===

    /// List catalog exercise names and let the user pick one.
    async fn pick_exercise(&mut self, prompt: &str) -> Result<Option<String>> {
        let names: Vec<String> = self
            .training
            .exercises(&ExerciseFilter::default())
            .await?
            .into_iter()
            .map(|e| e.name)
            .collect();
        if names.is_empty() {
            writeln!(self.io.out(), "\nNo exercises found. Please create exercises first.")?;
            return Ok(None);
        }
        writeln!(self.io.out(), "\nAvailable exercises:\n{}", render::numbered(&names))?;
        let choice = self.io.choose(prompt, names.len())?;
        Ok(choice.map(|i| names[i].clone()))
    }

    async fn set_goals(&mut self) -> Result<()> {
        loop {
            let Some(exercise) = self
                .pick_exercise(
                    "Enter the number of the exercise you want to set/update a goal for (or 0 to finish): ",
                )
                .await?
            else {
                return Ok(());
            };

            let existing = self.tracker.goal(&exercise).await?;
            if let Some(goal) = &existing {
                writeln!(
                    self.io.out(),
                    "Existing goal for {}: {} : {}",
                    exercise, goal.goal_type, goal.goal_value
                )?;
            }

            if existing.is_some() && !self.config.overwrite_goals {
                writeln!(self.io.out(), "An existing goal for {} is already set.", exercise)?;
            } else {
                let value = self.io.count(&format!(
                    "Enter your new total rep goal for {} (or 0 to skip setting a goal): ",
                    exercise
                ))?;
                match self
                    .training
                    .set_goal(&exercise, value, self.config.overwrite_goals)
                    .await?
                {
                    GoalChange::Created(goal) => writeln!(
                        self.io.out(),
                        "Goal set successfully for {}: {} reps!",
                        exercise, goal.goal_value
                    )?,
                    GoalChange::Updated { goal, .. } => writeln!(
                        self.io.out(),
                        "Goal updated successfully for {}: {} reps!",
                        exercise, goal.goal_value
                    )?,
                    GoalChange::Skipped => {
                        writeln!(self.io.out(), "No goal set for {}.", exercise)?
                    }
                }
            }

            if !self
                .io
                .confirm("Do you want to set/update goals for other exercises? (y/n): ")?
            {
                return Ok(());
            }
        }
    }

    async fn goal_progress(&mut self) -> Result<()> {
        let Some(exercise) = self
            .pick_exercise(
                "Enter the number of the exercise you want to view progress for (or 0 to exit): ",
            )
            .await?
        else {
            return Ok(());
        };

        // Only ask for reps when there is a goal to measure them against
        if self.tracker.goal(&exercise).await?.is_none() {
            writeln!(self.io.out(), "\n--- No goal set for {}.", exercise)?;
            return Ok(());
        }
        let completed = self
            .io
            .count(&format!("Enter the number of reps completed for {}: ", exercise))?;
        match self.tracker.goal_progress(&exercise, completed).await? {
            GoalOutcome::Progress(report) => {
                writeln!(self.io.out(), "{}", render::goal_report(&report))?
            }
            GoalOutcome::NoGoal { exercise } => {
                writeln!(self.io.out(), "\n--- No goal set for {}.", exercise)?
            }
        }
        Ok(())
    }

    async fn delete_goal(&mut self) -> Result<()> {
        let goals = self.training.goals().await?;
        if goals.is_empty() {
            writeln!(self.io.out(), "No fitness goals found.")?;
            return Ok(());
        }
        let lines: Vec<String> = goals.iter().map(render::goal_line).collect();
        writeln!(self.io.out(), "\nYour current fitness goals:\n{}", render::numbered(&lines))?;

        let Some(index) = self.io.choose(
            "Enter the number of the goal you want to delete (or 0 to quit): ",
            goals.len(),
        )?
        else {
            return Ok(());
        };
        let goal = &goals[index];
        if !self.io.confirm(&format!(
            "Are you sure you want to delete the goal for {} (y/n): ",
            render::goal_line(goal)
        ))? {
            writeln!(self.io.out(), "Deletion cancelled.")?;
            return Ok(());
        }
        self.training.delete_goal(&goal.exercise).await?;
        writeln!(self.io.out(), "Goal deleted successfully!")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use fittrack_progress::BasicProgressTracker;
    use fittrack_storage::{JsonStorage, Storage};
    use fittrack_training::BasicTrainingManager;

    type TestShell = Shell<Cursor<Vec<u8>>, Vec<u8>>;

    async fn shell_with(
        dir: &tempfile::TempDir,
        script: &str,
        config: ShellConfig,
    ) -> (TestShell, Arc<dyn Storage>) {
        let storage: Arc<dyn Storage> = Arc::new(JsonStorage::new(dir.path()).await.unwrap());
        let shell = Shell::new(
            Arc::new(BasicTrainingManager::new(storage.clone())),
            Arc::new(BasicProgressTracker::new(storage.clone())),
            Prompter::new(Cursor::new(script.as_bytes().to_vec()), Vec::new()),
            config,
        );
        (shell, storage)
    }

    async fn run_script(dir: &tempfile::TempDir, script: &str) -> String {
        let (mut shell, _) = shell_with(dir, script, ShellConfig::default()).await;
        shell.run().await.unwrap();
        String::from_utf8(shell.into_output()).unwrap()
    }

    #[test]
    fn test_dispatch_table() {
        assert_eq!(Action::from_token("1"), Some(Action::AddExercise));
        assert_eq!(Action::from_token("10"), Some(Action::DeleteGoal));
        assert_eq!(Action::from_token("0"), Some(Action::Quit));
        assert_eq!(Action::from_token("11"), None);
        assert_eq!(Action::from_token(""), None);
    }

    #[tokio::test]
    async fn test_quit_and_invalid_token() {
        let dir = tempfile::tempdir().unwrap();
        let out = run_script(&dir, "x\n0\n").await;
        assert!(out.contains("Invalid input. Please select from the available list."));
        assert!(out.contains("Until next time!"));
    }

    #[tokio::test]
    async fn test_closed_input_ends_session() {
        let dir = tempfile::tempdir().unwrap();
        // Input ends in the middle of adding an exercise
        let out = run_script(&dir, "1\nSquat\n").await;
        assert!(!out.contains("Error:"));
    }

    #[tokio::test]
    async fn test_add_exercise_with_retries() {
        let dir = tempfile::tempdir().unwrap();
        let script = "1\n\nSquat\nglutes\nlegs\nten\n10\n3\n2\n1\n0\n0\n";
        let (mut shell, storage) = shell_with(&dir, script, ShellConfig::default()).await;
        shell.run().await.unwrap();
        let out = String::from_utf8(shell.into_output()).unwrap();

        assert!(out.contains("Invalid name."));
        assert!(out.contains("unknown muscle group 'glutes'"));
        assert!(out.contains("Please enter a valid integer."));
        assert!(out.contains("Exercise added successfully!"));
        assert!(out.contains("| Squat    | legs         |   10 |    3 |"));

        let squat = storage.load_exercise("Squat").await.unwrap().unwrap();
        assert_eq!(squat.muscle_group, MuscleGroup::Legs);
    }

    #[tokio::test]
    async fn test_duplicate_exercise_reports_error_and_continues() {
        let dir = tempfile::tempdir().unwrap();
        let script = "1\nSquat\nlegs\n10\n3\n1\nSquat\nback\n5\n5\n0\n";
        let out = run_script(&dir, script).await;
        assert!(out.contains("Error: exercise 'Squat' already exists"));
        assert!(out.contains("Until next time!"));
    }

    #[tokio::test]
    async fn test_routine_progress_session() {
        let dir = tempfile::tempdir().unwrap();
        let script = concat!(
            "1\nSquat\nlegs\n10\n3\n",
            "4\nleg day\nLegs\nsquat\nplank\ndone\n",
            "7\n1\n4\n",
            "0\n",
        );
        let out = run_script(&dir, script).await;

        assert!(out.contains("Invalid routine name"));
        assert!(out.contains("Exercise 'Squat' added to the routine."));
        assert!(out.contains("Exercise 'plank' not found in the catalog."));
        assert!(out.contains("- Remaining: 2 sets, 6 reps"));
        assert!(out.contains("- Percentage completion: 40.00%"));
        assert!(out.contains("- Completed: 13.33%"));
    }

    #[tokio::test]
    async fn test_generated_routine_name() {
        let dir = tempfile::tempdir().unwrap();
        let out = run_script(&dir, "4\n\ndone\n5\n1\n0\n").await;
        assert!(out.contains("automatically generated name: Routine_1"));
        assert!(out.contains("Routine Routine_1 is empty."));
    }

    #[tokio::test]
    async fn test_progress_without_routines() {
        let dir = tempfile::tempdir().unwrap();
        let out = run_script(&dir, "7\n0\n").await;
        assert!(out.contains("No workout routines found."));
    }

    #[tokio::test]
    async fn test_goal_set_update_and_progress() {
        let dir = tempfile::tempdir().unwrap();
        let script = concat!(
            "1\nPull Up\nback\n10\n3\n",
            "9\n1\n",
            "8\n1\n50\ny\n1\n100\nn\n",
            "9\n1\n150\n",
            "0\n",
        );
        let (mut shell, storage) = shell_with(&dir, script, ShellConfig::default()).await;
        shell.run().await.unwrap();
        let out = String::from_utf8(shell.into_output()).unwrap();

        assert!(out.contains("--- No goal set for Pull Up."));
        assert!(out.contains("Goal set successfully for Pull Up: 50 reps!"));
        assert!(out.contains("Existing goal for Pull Up: reps : 50"));
        assert!(out.contains("Goal updated successfully for Pull Up: 100 reps!"));
        assert!(out.contains("- Remaining reps: -50"));
        assert!(out.contains("- Completion percentage: 150.00%"));

        let goals = storage.list_goals().await.unwrap();
        assert_eq!(goals.len(), 1);
        assert_eq!(goals[0].goal_value, 100);
    }

    #[tokio::test]
    async fn test_goal_progress_rounds_half_to_even() {
        let dir = tempfile::tempdir().unwrap();
        let script = "1\nDip\ntriceps\n10\n3\n8\n1\n32\nn\n9\n1\n1\n0\n";
        let out = run_script(&dir, script).await;
        assert!(out.contains("- Remaining reps: 31"));
        assert!(out.contains("- Completion percentage: 3.12%"));
    }

    #[tokio::test]
    async fn test_goal_not_overwritten_when_disabled() {
        let dir = tempfile::tempdir().unwrap();
        let script = "1\nPull Up\nback\n10\n3\n8\n1\n50\ny\n1\nn\n0\n";
        let config = ShellConfig { overwrite_goals: false };
        let (mut shell, storage) = shell_with(&dir, script, config).await;
        shell.run().await.unwrap();
        let out = String::from_utf8(shell.into_output()).unwrap();

        assert!(out.contains("An existing goal for Pull Up is already set."));
        assert_eq!(storage.list_goals().await.unwrap()[0].goal_value, 50);
    }

    #[tokio::test]
    async fn test_delete_goal_and_exercise() {
        let dir = tempfile::tempdir().unwrap();
        let script = concat!(
            "1\nPull Up\nback\n10\n3\n",
            "8\n1\n50\nn\n",
            "10\n1\ny\n",
            "3\nPull Up\nn\n",
            "3\nPull Up\ny\n",
            "3\nGhost\ny\n",
            "0\n",
        );
        let (mut shell, storage) = shell_with(&dir, script, ShellConfig::default()).await;
        shell.run().await.unwrap();
        let out = String::from_utf8(shell.into_output()).unwrap();

        assert!(out.contains("1. Pull Up - reps: 50"));
        assert!(out.contains("Goal deleted successfully!"));
        assert!(out.contains("Deletion cancelled."));
        assert!(out.contains("Exercise 'Pull Up' has been deleted successfully."));
        assert!(out.contains("Error: exercise 'Ghost' not found in the catalog"));
        assert!(storage.list_goals().await.unwrap().is_empty());
        assert!(storage.load_exercise("Pull Up").await.unwrap().is_none());
    }
}
