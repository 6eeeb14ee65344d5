//! Task management command.
//!
//! Covers the whole to-do surface: tasks, subtasks, projects, and tags.
//! Tag assignment replaces the task's entire tag set in one transaction;
//! unknown tag names are created on the fly.

use crate::{
    db::todo::{Subtask, Tag, Task, TaskFilter, Todo},
    libs::{config::Config, messages::Message, view::View},
    msg_error, msg_info, msg_success,
};
use anyhow::Result;
use clap::{Args, Subcommand};
use dialoguer::{theme::ColorfulTheme, Confirm};

const DEFAULT_TAG_COLOR: &str = "#95a5a6";
const DEFAULT_PROJECT_COLOR: &str = "#3498db";

#[derive(Debug, Args)]
pub struct TaskArgs {
    #[command(subcommand)]
    command: TaskCommand,
}

#[derive(Debug, Subcommand)]
enum TaskCommand {
    /// Add a new task
    Add {
        title: String,
        /// Longer description
        #[arg(short, long)]
        description: Option<String>,
        /// Due date, YYYY-MM-DD
        #[arg(long)]
        due: Option<String>,
        /// Priority, 0 (none) to 3 (high)
        #[arg(short, long, default_value_t = 0)]
        priority: i64,
        /// Project id to file the task under
        #[arg(long)]
        project: Option<i64>,
        /// Mark as important
        #[arg(short, long)]
        important: bool,
    },
    /// List tasks
    List {
        /// Only open tasks
        #[arg(long)]
        open: bool,
        /// Narrow to one project
        #[arg(long)]
        project: Option<i64>,
    },
    /// Mark a task as completed
    Done { id: i64 },
    /// Delete a task and its subtasks
    Delete { id: i64 },
    /// Add a subtask to a task
    Subtask { task_id: i64, title: String },
    /// Mark a subtask as completed
    SubtaskDone { id: i64 },
    /// Show a task's subtasks
    Subtasks { task_id: i64 },
    /// Replace a task's tags with the given set
    Tag {
        task_id: i64,
        /// Tag names; missing tags are created
        tags: Vec<String>,
    },
    /// Create a project
    Project { name: String },
}

pub fn cmd(args: TaskArgs) -> Result<()> {
    let user_id = Config::read()?.require_user()?;
    let mut todo = Todo::new()?;

    match args.command {
        TaskCommand::Add {
            title,
            description,
            due,
            priority,
            project,
            important,
        } => {
            let mut task = Task::new(user_id, &title);
            task.description = description;
            task.due_date = due;
            task.priority = priority.clamp(0, 3);
            task.project_id = project;
            task.is_important = important;
            todo.insert_task(&task)?;
            msg_success!(Message::TaskCreated(title));
        }
        TaskCommand::List { open, project } => {
            let filter = TaskFilter {
                project_id: project,
                is_completed: if open { Some(false) } else { None },
            };
            let tasks = todo.get_tasks(user_id, &filter)?;
            if tasks.is_empty() {
                msg_info!(Message::TasksEmpty);
            } else {
                View::tasks(&tasks)?;
            }
        }
        TaskCommand::Done { id } => match todo.get_task_by_id(id)? {
            Some(mut task) => {
                task.is_completed = true;
                todo.update_task(id, &task)?;
                msg_success!(Message::TaskCompleted(task.title));
            }
            None => msg_error!(Message::TaskNotFound(id)),
        },
        TaskCommand::Delete { id } => {
            let task = match todo.get_task_by_id(id)? {
                Some(task) => task,
                None => {
                    msg_error!(Message::TaskNotFound(id));
                    return Ok(());
                }
            };
            let confirmed = Confirm::with_theme(&ColorfulTheme::default())
                .with_prompt(Message::ConfirmDeleteTask(task.title).to_string())
                .default(false)
                .interact()?;
            if confirmed {
                todo.delete_task(id)?;
                msg_success!(Message::TaskDeleted);
            } else {
                msg_info!(Message::OperationCancelled);
            }
        }
        TaskCommand::Subtask { task_id, title } => {
            if todo.get_task_by_id(task_id)?.is_none() {
                msg_error!(Message::TaskNotFound(task_id));
                return Ok(());
            }
            todo.insert_subtask(&Subtask::new(task_id, &title))?;
            msg_success!(Message::SubtaskCreated(title));
        }
        TaskCommand::SubtaskDone { id } => match todo.get_subtask_by_id(id)? {
            Some(mut subtask) => {
                subtask.is_completed = true;
                todo.update_subtask(id, &subtask)?;
                // The parent may now be auto-completed by the trigger.
                msg_success!(Message::TaskUpdated);
            }
            None => msg_error!(Message::SubtaskNotFound(id)),
        },
        TaskCommand::Subtasks { task_id } => {
            let subtasks = todo.get_subtasks(task_id)?;
            if subtasks.is_empty() {
                msg_info!(Message::TasksEmpty);
            } else {
                View::subtasks(&subtasks)?;
            }
        }
        TaskCommand::Tag { task_id, tags } => {
            if todo.get_task_by_id(task_id)?.is_none() {
                msg_error!(Message::TaskNotFound(task_id));
                return Ok(());
            }
            let mut tag_ids = Vec::with_capacity(tags.len());
            for name in &tags {
                let id = match todo.get_tag_by_name(user_id, name)? {
                    Some(tag) => tag.id.unwrap_or_default(),
                    None => {
                        let id = todo.insert_tag(&Tag::new(user_id, name, DEFAULT_TAG_COLOR))?;
                        msg_success!(Message::TagCreated(name.clone()));
                        id
                    }
                };
                tag_ids.push(id);
            }
            todo.update_task_tags(task_id, &tag_ids)?;
            msg_success!(Message::TaskTagsReplaced(tag_ids.len()));
        }
        TaskCommand::Project { name } => {
            todo.insert_project(user_id, &name, DEFAULT_PROJECT_COLOR)?;
            msg_success!(Message::ProjectCreated(name));
        }
    }
    Ok(())
}
