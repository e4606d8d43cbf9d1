//! Task model and the owning list.
//!
//! Tasks are kept in append order; storage never re-sorts them. The list
//! owns the completion bookkeeping: `completed_at` is stamped exactly
//! when a task flips to done and cleared when it flips back, and lifetime
//! stats count the first direction only.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ValidationError;
use crate::prefs::UserStats;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Work,
    Personal,
    Health,
    Learning,
    Other,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Work,
        Category::Personal,
        Category::Health,
        Category::Learning,
        Category::Other,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Work => "work",
            Category::Personal => "personal",
            Category::Health => "health",
            Category::Learning => "learning",
            Category::Other => "other",
        }
    }
}

impl Default for Category {
    fn default() -> Self {
        Category::Other
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Category {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == s.to_ascii_lowercase())
            .ok_or_else(|| ValidationError::InvalidValue {
                field: "category".to_string(),
                message: format!("unknown category '{s}'"),
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    pub fn as_str(self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }
}

impl Default for Priority {
    fn default() -> Self {
        Priority::Medium
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Priority {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            _ => Err(ValidationError::InvalidValue {
                field: "priority".to_string(),
                message: format!("unknown priority '{s}'"),
            }),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: Category,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub is_completed: bool,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub pomodoro_count: u32,
}

impl Task {
    /// Title validation is the shell's job; the core stores what it gets.
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        category: Category,
        priority: Priority,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title: title.into(),
            description: description.into(),
            category,
            priority,
            is_completed: false,
            created_at: Utc::now(),
            completed_at: None,
            pomodoro_count: 0,
        }
    }
}

/// Fields an update may change; `None` leaves the field alone.
#[derive(Debug, Clone, Default)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<Category>,
    pub priority: Option<Priority>,
}

/// Ordered task collection, persisted as one record.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskList {
    #[serde(default)]
    tasks: Vec<Task>,
}

impl TaskList {
    pub fn iter(&self) -> impl Iterator<Item = &Task> {
        self.tasks.iter()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Resolve an id or unambiguous id prefix.
    pub fn find_by_prefix(&self, prefix: &str) -> Option<&Task> {
        if prefix.is_empty() {
            return None;
        }
        let mut matches = self.tasks.iter().filter(|t| t.id.starts_with(prefix));
        let first = matches.next()?;
        if matches.next().is_some() {
            return None; // Ambiguous.
        }
        Some(first)
    }

    pub fn filtered(
        &self,
        category: Option<Category>,
        completed: Option<bool>,
    ) -> impl Iterator<Item = &Task> {
        self.tasks.iter().filter(move |t| {
            category.map_or(true, |c| t.category == c)
                && completed.map_or(true, |done| t.is_completed == done)
        })
    }

    /// Append a task, preserving insertion order.
    pub fn add(&mut self, task: Task) -> &Task {
        self.tasks.push(task);
        // Just pushed, the list is non-empty.
        &self.tasks[self.tasks.len() - 1]
    }

    pub fn update(&mut self, id: &str, patch: TaskPatch) -> Option<&Task> {
        let task = self.tasks.iter_mut().find(|t| t.id == id)?;
        if let Some(title) = patch.title {
            task.title = title;
        }
        if let Some(description) = patch.description {
            task.description = description;
        }
        if let Some(category) = patch.category {
            task.category = category;
        }
        if let Some(priority) = patch.priority {
            task.priority = priority;
        }
        Some(task)
    }

    pub fn remove(&mut self, id: &str) -> Option<Task> {
        let index = self.tasks.iter().position(|t| t.id == id)?;
        Some(self.tasks.remove(index))
    }

    /// Flip completion. Completing stamps `completed_at` and counts
    /// towards stats; reopening clears the stamp and reverses nothing.
    /// Returns the new completion state.
    pub fn toggle(&mut self, id: &str, stats: &mut UserStats) -> Option<bool> {
        let task = self.tasks.iter_mut().find(|t| t.id == id)?;
        if task.is_completed {
            task.is_completed = false;
            task.completed_at = None;
        } else {
            task.is_completed = true;
            task.completed_at = Some(Utc::now());
            stats.record_task_completed();
        }
        Some(task.is_completed)
    }

    /// Credit a completed pomodoro to a task. Returns the new count.
    pub fn record_pomodoro(&mut self, id: &str) -> Option<u32> {
        let task = self.tasks.iter_mut().find(|t| t.id == id)?;
        task.pomodoro_count += 1;
        Some(task.pomodoro_count)
    }
}
