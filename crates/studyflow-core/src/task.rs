//! Task records and the task store.
//!
//! Storage order is insertion order; `display_order` is a rendering
//! concern and never reorders the underlying vector.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ValidationError;

/// Task difficulty tier, highest first.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    High,
    Medium,
    Low,
    Minimal,
}

impl Difficulty {
    /// Sort rank: 0 is the hardest tier.
    pub fn rank(&self) -> u8 {
        match self {
            Difficulty::High => 0,
            Difficulty::Medium => 1,
            Difficulty::Low => 2,
            Difficulty::Minimal => 3,
        }
    }

    /// Parse from the lowercase name used in config and CLI arguments.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "high" => Some(Difficulty::High),
            "medium" => Some(Difficulty::Medium),
            "low" => Some(Difficulty::Low),
            "minimal" => Some(Difficulty::Minimal),
            _ => None,
        }
    }
}

impl Default for Difficulty {
    fn default() -> Self {
        Difficulty::Medium
    }
}

/// A single task (study chunk).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Task {
    /// Unique identifier (uuid v4)
    pub id: String,
    pub text: String,
    pub difficulty: Difficulty,
    pub done: bool,
    pub created_at: DateTime<Utc>,
}

/// Ordered collection of tasks, mutated only through its own operations.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct TaskStore {
    tasks: Vec<Task>,
}

impl TaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tasks in insertion order.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Add a task. Rejects empty or whitespace-only text.
    pub fn add(
        &mut self,
        text: impl Into<String>,
        difficulty: Difficulty,
    ) -> Result<Task, ValidationError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(ValidationError::EmptyTaskText);
        }
        let task = Task {
            id: Uuid::new_v4().to_string(),
            text,
            difficulty,
            done: false,
            created_at: Utc::now(),
        };
        self.tasks.push(task.clone());
        Ok(task)
    }

    /// Flip the done flag. Returns the new value.
    pub fn toggle_done(&mut self, id: &str) -> Result<bool, ValidationError> {
        let task = self.get_mut(id)?;
        task.done = !task.done;
        Ok(task.done)
    }

    /// Remove a task. The only path that physically deletes one.
    pub fn remove(&mut self, id: &str) -> Result<Task, ValidationError> {
        let idx = self
            .tasks
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| ValidationError::UnknownTask(id.to_string()))?;
        Ok(self.tasks.remove(idx))
    }

    /// Look up the task to focus on next.
    pub fn select_for_study(&self, id: &str) -> Result<&Task, ValidationError> {
        self.tasks
            .iter()
            .find(|t| t.id == id)
            .ok_or_else(|| ValidationError::UnknownTask(id.to_string()))
    }

    /// Count of tasks marked done.
    pub fn done_count(&self) -> usize {
        self.tasks.iter().filter(|t| t.done).count()
    }

    /// Indices into `tasks()` sorted for display:
    /// open tasks before done ones, harder tiers first within each group.
    pub fn display_order(&self) -> Vec<usize> {
        let mut order: Vec<usize> = (0..self.tasks.len()).collect();
        order.sort_by_key(|&i| (self.tasks[i].done, self.tasks[i].difficulty.rank()));
        order
    }

    fn get_mut(&mut self, id: &str) -> Result<&mut Task, ValidationError> {
        self.tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| ValidationError::UnknownTask(id.to_string()))
    }
}
