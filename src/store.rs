use crate::error::{Error, Result};

/// A single task record. `due_date` is always stored in canonical
/// `day/month/year` form (see `date::canonicalize`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    pub title: String,
    pub description: String,
    pub due_date: String,
    pub completed: bool,
}

impl Task {
    pub fn new(title: String, description: String, due_date: String) -> Self {
        Self {
            title,
            description,
            due_date,
            completed: false,
        }
    }
}

/// Outcome of marking a task as completed, distinguishing a no-op on an
/// already-completed task from a state change. The out-of-range case is the
/// third arm, reported as `Error::PositionOutOfRange`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkOutcome {
    Marked,
    AlreadyCompleted,
}

/// Ordered, in-memory collection of task records. Positions handed in and
/// out are 1-based; position in the sequence is the only address a record
/// has, so removal shifts every later record down by one.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct TaskStore {
    tasks: Vec<Task>,
}

impl TaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Map a 1-based external position to an internal index, rejecting
    /// anything outside `[1, len]`.
    fn index(&self, position: usize) -> Result<usize> {
        if (1..=self.tasks.len()).contains(&position) {
            Ok(position - 1)
        } else {
            Err(Error::PositionOutOfRange {
                position,
                len: self.tasks.len(),
            })
        }
    }

    pub fn append(&mut self, task: Task) {
        self.tasks.push(task);
    }

    pub fn get(&self, position: usize) -> Result<&Task> {
        Ok(&self.tasks[self.index(position)?])
    }

    pub fn replace(&mut self, position: usize, task: Task) -> Result<()> {
        let index = self.index(position)?;
        self.tasks[index] = task;
        Ok(())
    }

    /// Remove the task at `position`, shifting later tasks down. Not
    /// reversible.
    pub fn remove(&mut self, position: usize) -> Result<Task> {
        let index = self.index(position)?;
        Ok(self.tasks.remove(index))
    }

    pub fn mark_completed(&mut self, position: usize) -> Result<MarkOutcome> {
        let index = self.index(position)?;
        if self.tasks[index].completed {
            Ok(MarkOutcome::AlreadyCompleted)
        } else {
            self.tasks[index].completed = true;
            Ok(MarkOutcome::Marked)
        }
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Ordered read of all tasks, for display alongside their 1-based
    /// positions.
    pub fn iter(&self) -> impl Iterator<Item = &Task> {
        self.tasks.iter()
    }
}
