use chromodoro_core::notify::task_reminder_id;
use chromodoro_core::store::{self, keys};
use chromodoro_core::{Category, Event, Notifier, Priority, Task, TaskList, TaskPatch, UserStats};
use chrono::Utc;
use clap::Subcommand;

use crate::common::Ctx;

#[derive(Subcommand)]
pub enum TaskAction {
    /// Add a task
    Add {
        title: String,
        #[arg(long, default_value = "")]
        description: String,
        /// work | personal | health | learning | other
        #[arg(long, default_value = "other")]
        category: String,
        /// low | medium | high
        #[arg(long, default_value = "medium")]
        priority: String,
    },
    /// List tasks in creation order
    List {
        #[arg(long)]
        category: Option<String>,
        /// Show only completed tasks
        #[arg(long)]
        completed: bool,
        /// Print the full records as JSON
        #[arg(long)]
        json: bool,
    },
    /// Toggle a task's completion by id or prefix
    Done { id: String },
    /// Delete a task by id or prefix
    Remove { id: String },
    /// Update fields of a task
    Update {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        priority: Option<String>,
    },
    /// Schedule a reminder for a task
    Remind {
        id: String,
        /// Delay in seconds
        #[arg(long = "in", value_name = "SECS")]
        in_secs: u64,
    },
}

fn resolve_id(tasks: &TaskList, prefix: &str) -> Result<String, Box<dyn std::error::Error>> {
    tasks
        .find_by_prefix(prefix)
        .map(|t| t.id.clone())
        .ok_or_else(|| format!("no unique task matching '{prefix}'").into())
}

fn print_line(task: &Task) {
    let mark = if task.is_completed { "x" } else { " " };
    println!(
        "{} [{}] {:6} {:8} {}{}",
        &task.id[..8],
        mark,
        task.priority,
        task.category,
        task.title,
        if task.pomodoro_count > 0 {
            format!("  ({} pomodoros)", task.pomodoro_count)
        } else {
            String::new()
        }
    );
}

pub fn run(action: TaskAction) -> Result<(), Box<dyn std::error::Error>> {
    let ctx = Ctx::open()?;
    let store = ctx.store.as_ref();
    let mut tasks: TaskList = store::load_record(store, keys::TASKS);
    let mut stats: UserStats = store::load_record(store, keys::USER_STATS);

    match action {
        TaskAction::Add {
            title,
            description,
            category,
            priority,
        } => {
            // The core stores whatever it gets; the boundary rejects
            // empty titles.
            if title.trim().is_empty() {
                return Err("task title must not be empty".into());
            }
            let category: Category = category.parse()?;
            let priority: Priority = priority.parse()?;
            let task = tasks.add(Task::new(title, description, category, priority));
            println!("added {}", &task.id[..8]);
            let id = task.id.clone();
            ctx.bus.publish(&Event::TaskAdded {
                task_id: id,
                at: Utc::now(),
            });
        }
        TaskAction::List {
            category,
            completed,
            json,
        } => {
            let category = category.map(|c| c.parse::<Category>()).transpose()?;
            let filter_completed = completed.then_some(true);
            let selected: Vec<&Task> = tasks.filtered(category, filter_completed).collect();
            if json {
                println!("{}", serde_json::to_string_pretty(&selected)?);
            } else if selected.is_empty() {
                println!("no tasks");
            } else {
                for task in selected {
                    print_line(task);
                }
            }
            return Ok(());
        }
        TaskAction::Done { id } => {
            let id = resolve_id(&tasks, &id)?;
            match tasks.toggle(&id, &mut stats) {
                Some(true) => {
                    ctx.notifier.cancel(&task_reminder_id(&id));
                    ctx.bus.publish(&Event::TaskCompleted {
                        task_id: id,
                        at: Utc::now(),
                    });
                    println!("done");
                }
                Some(false) => {
                    ctx.bus.publish(&Event::TaskReopened {
                        task_id: id,
                        at: Utc::now(),
                    });
                    println!("reopened");
                }
                None => return Err("task not found".into()),
            }
        }
        TaskAction::Remove { id } => {
            let id = resolve_id(&tasks, &id)?;
            match tasks.remove(&id) {
                Some(task) => {
                    ctx.notifier.cancel(&task_reminder_id(&id));
                    ctx.bus.publish(&Event::TaskDeleted {
                        task_id: id,
                        at: Utc::now(),
                    });
                    println!("removed '{}'", task.title);
                }
                None => return Err("task not found".into()),
            }
        }
        TaskAction::Update {
            id,
            title,
            description,
            category,
            priority,
        } => {
            if let Some(t) = &title {
                if t.trim().is_empty() {
                    return Err("task title must not be empty".into());
                }
            }
            let id = resolve_id(&tasks, &id)?;
            let patch = TaskPatch {
                title,
                description,
                category: category.map(|c| c.parse()).transpose()?,
                priority: priority.map(|p| p.parse()).transpose()?,
            };
            match tasks.update(&id, patch) {
                Some(task) => {
                    print_line(task);
                    ctx.bus.publish(&Event::TaskUpdated {
                        task_id: id,
                        at: Utc::now(),
                    });
                }
                None => return Err("task not found".into()),
            }
        }
        TaskAction::Remind { id, in_secs } => {
            let id = resolve_id(&tasks, &id)?;
            let task = tasks.get(&id).ok_or("task not found")?;
            ctx.notifier.schedule(
                &task_reminder_id(&id),
                in_secs,
                "Task reminder",
                &task.title,
            );
            println!("reminder set for {} in {}s", &id[..8], in_secs);
            return Ok(());
        }
    }

    store::save_record(store, keys::TASKS, &tasks);
    store::save_record(store, keys::USER_STATS, &stats);
    Ok(())
}
