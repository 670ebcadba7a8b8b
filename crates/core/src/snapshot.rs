//! What the user reports having done so far.

/// Completed reps per exercise, gathered at query time and never stored.
///
/// Keeps the order in which exercises were first recorded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompletedSnapshot {
    entries: Vec<(String, u32)>,
}

impl CompletedSnapshot {
    /// Create an empty snapshot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record completed reps for an exercise, replacing any earlier count.
    pub fn record(&mut self, exercise: impl Into<String>, reps: u32) {
        let exercise = exercise.into();
        match self.entries.iter_mut().find(|(name, _)| *name == exercise) {
            Some(entry) => entry.1 = reps,
            None => self.entries.push((exercise, reps)),
        }
    }

    /// Completed reps for an exercise, if recorded.
    pub fn get(&self, exercise: &str) -> Option<u32> {
        self.entries
            .iter()
            .find(|(name, _)| name == exercise)
            .map(|(_, reps)| *reps)
    }

    /// Iterate in recording order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.entries.iter().map(|(name, reps)| (name.as_str(), *reps))
    }

    /// Number of exercises recorded.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, u32)> for CompletedSnapshot {
    fn from_iter<I: IntoIterator<Item = (S, u32)>>(iter: I) -> Self {
        let mut snapshot = Self::new();
        for (exercise, reps) in iter {
            snapshot.record(exercise, reps);
        }
        snapshot
    }
}
