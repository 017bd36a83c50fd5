//! To-do list manager.
//!
//! Tasks are addressed by their 1-based position in the list. The whole list
//! is rewritten to `tasks.json` after every mutation.

use std::fmt;
use std::str::FromStr;

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::storage::Storage;

const CREATED_AT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const DUE_DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Priority {
    High,
    #[default]
    Medium,
    Low,
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Priority::High => "High",
            Priority::Medium => "Medium",
            Priority::Low => "Low",
        };
        f.write_str(label)
    }
}

impl FromStr for Priority {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "high" => Ok(Priority::High),
            "medium" => Ok(Priority::Medium),
            "low" => Ok(Priority::Low),
            _ => Err(Error::InvalidArgument(format!(
                "invalid priority '{}': must be high, medium, or low",
                s
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    #[default]
    Pending,
    Done,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Pending => f.write_str("Pending"),
            Status::Done => f.write_str("Done"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub due_date: String,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub status: Status,
    pub created_at: String,
}

/// Form input for creating a task.
#[derive(Debug, Clone, Default)]
pub struct NewTask {
    pub title: String,
    pub description: String,
    pub due_date: String,
    pub priority: Priority,
    pub category: String,
}

impl NewTask {
    pub fn into_task(self) -> Result<Task> {
        let title = require_title(&self.title)?;
        let due_date = normalize_due_date(&self.due_date)?;
        Ok(Task {
            title,
            description: self.description.trim().to_string(),
            due_date,
            priority: self.priority,
            category: self.category.trim().to_string(),
            status: Status::Pending,
            created_at: Local::now().format(CREATED_AT_FORMAT).to_string(),
        })
    }
}

/// Fields to replace on an existing task; `None` keeps the current value.
#[derive(Debug, Clone, Default)]
pub struct TaskUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub due_date: Option<String>,
    pub priority: Option<Priority>,
    pub category: Option<String>,
}

impl TaskUpdate {
    fn apply(&self, task: &mut Task) -> Result<()> {
        // Validate everything before touching the task.
        let title = self.title.as_deref().map(require_title).transpose()?;
        let due_date = self
            .due_date
            .as_deref()
            .map(normalize_due_date)
            .transpose()?;

        if let Some(title) = title {
            task.title = title;
        }
        if let Some(description) = &self.description {
            task.description = description.trim().to_string();
        }
        if let Some(due_date) = due_date {
            task.due_date = due_date;
        }
        if let Some(priority) = self.priority {
            task.priority = priority;
        }
        if let Some(category) = &self.category {
            task.category = category.trim().to_string();
        }
        Ok(())
    }
}

fn require_title(raw: &str) -> Result<String> {
    let title = raw.trim();
    if title.is_empty() {
        return Err(Error::TitleRequired);
    }
    Ok(title.to_string())
}

/// Empty stays empty; anything else must be a `YYYY-MM-DD` date.
fn normalize_due_date(raw: &str) -> Result<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(String::new());
    }
    NaiveDate::parse_from_str(raw, DUE_DATE_FORMAT)
        .map(|date| date.format(DUE_DATE_FORMAT).to_string())
        .map_err(|_| {
            Error::InvalidArgument(format!("invalid due date '{raw}': expected YYYY-MM-DD"))
        })
}

/// A task together with its 1-based position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NumberedTask {
    pub position: usize,
    #[serde(flatten)]
    pub task: Task,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskList {
    tasks: Vec<Task>,
}

impl TaskList {
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Append a task; returns its position.
    pub fn add(&mut self, task: Task) -> usize {
        self.tasks.push(task);
        self.tasks.len()
    }

    pub fn update(&mut self, position: usize, update: &TaskUpdate) -> Result<Task> {
        let idx = self.index(position)?;
        let task = &mut self.tasks[idx];
        update.apply(task)?;
        Ok(task.clone())
    }

    pub fn set_status(&mut self, position: usize, status: Status) -> Result<Task> {
        let idx = self.index(position)?;
        self.tasks[idx].status = status;
        Ok(self.tasks[idx].clone())
    }

    pub fn delete(&mut self, position: usize) -> Result<Task> {
        let idx = self.index(position)?;
        Ok(self.tasks.remove(idx))
    }

    /// Tasks whose title or category contains `term` (case-insensitive).
    /// Positions refer to the unfiltered list.
    pub fn filter(&self, term: &str) -> Vec<NumberedTask> {
        let term = term.to_lowercase();
        self.tasks
            .iter()
            .enumerate()
            .filter(|(_, task)| {
                task.title.to_lowercase().contains(&term)
                    || task.category.to_lowercase().contains(&term)
            })
            .map(|(idx, task)| NumberedTask {
                position: idx + 1,
                task: task.clone(),
            })
            .collect()
    }

    fn index(&self, position: usize) -> Result<usize> {
        if position == 0 || position > self.tasks.len() {
            return Err(Error::TaskNotFound {
                position,
                len: self.tasks.len(),
            });
        }
        Ok(position - 1)
    }
}

/// Task list persisted in `tasks.json`.
#[derive(Debug, Clone)]
pub struct TaskStore {
    storage: Storage,
}

impl TaskStore {
    pub fn new(storage: Storage) -> Self {
        Self { storage }
    }

    pub fn load(&self) -> Result<TaskList> {
        self.storage.read_json_or_default(&self.storage.tasks_file())
    }

    pub fn add(&self, new_task: NewTask) -> Result<NumberedTask> {
        let task = new_task.into_task()?;
        self.mutate(|list| {
            let position = list.add(task.clone());
            tracing::debug!(position, title = %task.title, "task added");
            Ok(NumberedTask { position, task })
        })
    }

    pub fn update(&self, position: usize, update: &TaskUpdate) -> Result<NumberedTask> {
        self.mutate(|list| {
            let task = list.update(position, update)?;
            Ok(NumberedTask { position, task })
        })
    }

    pub fn set_status(&self, position: usize, status: Status) -> Result<NumberedTask> {
        self.mutate(|list| {
            let task = list.set_status(position, status)?;
            Ok(NumberedTask { position, task })
        })
    }

    pub fn delete(&self, position: usize) -> Result<NumberedTask> {
        self.mutate(|list| {
            let task = list.delete(position)?;
            tracing::debug!(position, remaining = list.len(), "task deleted");
            Ok(NumberedTask { position, task })
        })
    }

    fn mutate<R, F>(&self, f: F) -> Result<R>
    where
        F: FnOnce(&mut TaskList) -> Result<R>,
    {
        self.storage.update_json(&self.storage.tasks_file(), f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(title: &str, category: &str) -> Task {
        NewTask {
            title: title.to_string(),
            category: category.to_string(),
            ..NewTask::default()
        }
        .into_task()
        .expect("task")
    }

    fn sample_list() -> TaskList {
        let mut list = TaskList::default();
        list.add(task("Buy milk", "Errands"));
        list.add(task("Write report", "Work"));
        list.add(task("Call plumber", "Home"));
        list
    }

    #[test]
    fn new_task_requires_title() {
        let err = NewTask {
            title: "   ".to_string(),
            ..NewTask::default()
        }
        .into_task()
        .expect_err("blank title");
        assert!(matches!(err, Error::TitleRequired));
    }

    #[test]
    fn new_task_defaults() {
        let task = task("  Buy milk  ", "");
        assert_eq!(task.title, "Buy milk");
        assert_eq!(task.priority, Priority::Medium);
        assert_eq!(task.status, Status::Pending);
        assert_eq!(task.created_at.len(), "2024-01-01 00:00:00".len());
    }

    #[test]
    fn due_date_is_validated() {
        let err = NewTask {
            title: "x".to_string(),
            due_date: "next week".to_string(),
            ..NewTask::default()
        }
        .into_task()
        .expect_err("bad date");
        assert!(matches!(err, Error::InvalidArgument(_)));

        let ok = NewTask {
            title: "x".to_string(),
            due_date: "2025-02-28".to_string(),
            ..NewTask::default()
        }
        .into_task()
        .expect("good date");
        assert_eq!(ok.due_date, "2025-02-28");
    }

    #[test]
    fn update_touches_only_selected_task() {
        let mut list = sample_list();
        let before = list.clone();

        let updated = list
            .update(
                2,
                &TaskUpdate {
                    title: Some("Write final report".to_string()),
                    priority: Some(Priority::High),
                    ..TaskUpdate::default()
                },
            )
            .expect("update");

        assert_eq!(updated.title, "Write final report");
        assert_eq!(updated.priority, Priority::High);
        assert_eq!(updated.category, "Work");
        assert_eq!(list.tasks()[0], before.tasks()[0]);
        assert_eq!(list.tasks()[2], before.tasks()[2]);
    }

    #[test]
    fn invalid_update_changes_nothing() {
        let mut list = sample_list();
        let before = list.clone();

        let err = list
            .update(
                1,
                &TaskUpdate {
                    title: Some(String::new()),
                    category: Some("Other".to_string()),
                    ..TaskUpdate::default()
                },
            )
            .expect_err("empty title");
        assert!(matches!(err, Error::TitleRequired));
        assert_eq!(list, before);
    }

    #[test]
    fn delete_by_position() {
        let mut list = sample_list();
        let removed = list.delete(2).expect("delete");
        assert_eq!(removed.title, "Write report");
        let titles: Vec<_> = list.tasks().iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["Buy milk", "Call plumber"]);
    }

    #[test]
    fn deleting_only_task_leaves_empty_list() {
        let mut list = TaskList::default();
        list.add(task("Only", ""));
        list.delete(1).expect("delete");
        assert!(list.is_empty());
    }

    #[test]
    fn out_of_range_positions_are_rejected() {
        let mut list = sample_list();
        let before = list.clone();
        assert!(matches!(
            list.delete(0),
            Err(Error::TaskNotFound { position: 0, len: 3 })
        ));
        assert!(matches!(
            list.delete(4),
            Err(Error::TaskNotFound { position: 4, len: 3 })
        ));
        assert!(list.set_status(9, Status::Done).is_err());
        assert_eq!(list, before);
    }

    #[test]
    fn filter_matches_title_or_category() {
        let list = sample_list();
        let hits = list.filter("WORK");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].position, 2);

        let hits = list.filter("pl");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].task.title, "Call plumber");

        assert_eq!(list.filter("").len(), 3);
    }

    #[test]
    fn set_status_marks_done() {
        let mut list = sample_list();
        let task = list.set_status(3, Status::Done).expect("done");
        assert_eq!(task.status, Status::Done);
        assert_eq!(list.tasks()[0].status, Status::Pending);
    }

    #[test]
    fn store_persists_pretty_json_array() {
        let dir = tempfile::tempdir().expect("tempdir");
        let storage = Storage::new(dir.path());
        let store = TaskStore::new(storage.clone());

        let added = store
            .add(NewTask {
                title: "Buy milk".to_string(),
                priority: Priority::Low,
                ..NewTask::default()
            })
            .expect("add");
        assert_eq!(added.position, 1);

        let raw = std::fs::read_to_string(storage.tasks_file()).expect("read");
        assert!(raw.starts_with("[\n"));
        let value: serde_json::Value = serde_json::from_str(&raw).expect("json");
        assert_eq!(value[0]["title"], "Buy milk");
        assert_eq!(value[0]["priority"], "Low");
        assert_eq!(value[0]["status"], "Pending");

        store.delete(1).expect("delete");
        assert!(store.load().expect("load").is_empty());
    }
}
