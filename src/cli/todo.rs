//! toolbelt todo command implementation

use crate::error::Result;
use crate::output::{emit_success, HumanOutput, OutputOptions};
use crate::storage::Storage;
use crate::todo::{NewTask, NumberedTask, Priority, Status, TaskStore, TaskUpdate};

/// Options for `toolbelt todo add`
pub struct AddOptions {
    pub title: String,
    pub description: String,
    pub due: String,
    pub priority: String,
    pub category: String,
    pub storage: Storage,
    pub output: OutputOptions,
}

/// Options for `toolbelt todo list`
pub struct ListOptions {
    pub filter: Option<String>,
    pub storage: Storage,
    pub output: OutputOptions,
}

/// Options for `toolbelt todo update`
pub struct UpdateOptions {
    pub position: usize,
    pub title: Option<String>,
    pub description: Option<String>,
    pub due: Option<String>,
    pub priority: Option<String>,
    pub category: Option<String>,
    pub storage: Storage,
    pub output: OutputOptions,
}

/// Options for commands addressing one task: `rm`, `done`, `reopen`
pub struct PositionOptions {
    pub position: usize,
    pub storage: Storage,
    pub output: OutputOptions,
}

#[derive(serde::Serialize)]
struct TaskReport {
    task: NumberedTask,
    #[serde(skip_serializing_if = "Option::is_none")]
    remaining: Option<usize>,
}

#[derive(serde::Serialize)]
struct TaskListReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    filter: Option<String>,
    total: usize,
    pending: usize,
    tasks: Vec<NumberedTask>,
}

pub fn run_add(options: AddOptions) -> Result<()> {
    let new_task = NewTask {
        title: options.title,
        description: options.description,
        due_date: options.due,
        priority: options.priority.parse()?,
        category: options.category,
    };
    let task = TaskStore::new(options.storage).add(new_task)?;

    let mut human = HumanOutput::new(format!("Task added: {}", task.task.title));
    human.push_summary("position", task.position.to_string());
    human.push_next_step("toolbelt todo list");

    emit_success(
        options.output,
        "todo add",
        &TaskReport {
            task,
            remaining: None,
        },
        Some(&human),
    )
}

pub fn run_list(options: ListOptions) -> Result<()> {
    let list = TaskStore::new(options.storage).load()?;
    let total = list.len();
    let tasks = list.filter(options.filter.as_deref().unwrap_or_default());
    let pending = tasks
        .iter()
        .filter(|numbered| numbered.task.status == Status::Pending)
        .count();

    let header = match &options.filter {
        Some(term) => format!("Tasks matching '{}' ({} of {total})", term, tasks.len()),
        None => format!("Tasks ({total})"),
    };
    let mut human = HumanOutput::new(header);
    for numbered in &tasks {
        human.push_detail(task_line(numbered));
    }
    if total == 0 {
        human.push_next_step("toolbelt todo add <title>");
    }

    let report = TaskListReport {
        filter: options.filter,
        total,
        pending,
        tasks,
    };
    emit_success(options.output, "todo list", &report, Some(&human))
}

pub fn run_update(options: UpdateOptions) -> Result<()> {
    let update = TaskUpdate {
        title: options.title,
        description: options.description,
        due_date: options.due,
        priority: options
            .priority
            .as_deref()
            .map(str::parse::<Priority>)
            .transpose()?,
        category: options.category,
    };
    let task = TaskStore::new(options.storage).update(options.position, &update)?;

    let mut human = HumanOutput::new("Task updated successfully!");
    human.push_summary("task", task_line(&task));

    emit_success(
        options.output,
        "todo update",
        &TaskReport {
            task,
            remaining: None,
        },
        Some(&human),
    )
}

pub fn run_rm(options: PositionOptions) -> Result<()> {
    let store = TaskStore::new(options.storage);
    let task = store.delete(options.position)?;
    let remaining = store.load()?.len();

    let mut human = HumanOutput::new("Task deleted successfully!");
    human.push_summary("task", task_line(&task));
    human.push_summary("remaining", remaining.to_string());

    emit_success(
        options.output,
        "todo rm",
        &TaskReport {
            task,
            remaining: Some(remaining),
        },
        Some(&human),
    )
}

pub fn run_done(options: PositionOptions) -> Result<()> {
    set_status(options, Status::Done, "todo done")
}

pub fn run_reopen(options: PositionOptions) -> Result<()> {
    set_status(options, Status::Pending, "todo reopen")
}

fn set_status(options: PositionOptions, status: Status, command: &str) -> Result<()> {
    let task = TaskStore::new(options.storage).set_status(options.position, status)?;

    let mut human = HumanOutput::new(format!("Task marked {status}"));
    human.push_summary("task", task_line(&task));

    emit_success(
        options.output,
        command,
        &TaskReport {
            task,
            remaining: None,
        },
        Some(&human),
    )
}

fn task_line(numbered: &NumberedTask) -> String {
    let task = &numbered.task;
    let due = if task.due_date.is_empty() {
        "-"
    } else {
        task.due_date.as_str()
    };
    let category = if task.category.is_empty() {
        "-"
    } else {
        task.category.as_str()
    };
    format!(
        "{}. {} | {} | {} | {} | {}",
        numbered.position, task.title, due, task.priority, category, task.status
    )
}
