//! Subcommand dispatch.

use crate::cli::{ClientArgs, GoalCommand, NoteCommand, ServeArgs, TaskCommand};
use crate::error::{CliError, CliResult};
use lifedesk_client::{
    note_draft, parse_tags, ApiClient, CategoryFilter, Panel, Session, SessionStore,
};
use lifedesk_core::{
    Goal, GoalDraft, Note, NotePatch, RecordId, Task, TaskDraft, TaskPatch, User,
};
use lifedesk_server::ServerConfig;
use std::path::PathBuf;
use std::time::Duration;

const SESSION_DIR_NAME: &str = "lifedesk";
const SESSION_FILE_NAME: &str = "session.json";

pub fn serve(args: ServeArgs) -> CliResult<()> {
    let level = args
        .log_level
        .as_deref()
        .unwrap_or_else(|| lifedesk_core::default_log_level());
    let log_dir = args.log_dir.map(absolutize).transpose()?;
    let log_dir = log_dir.as_deref().and_then(|dir| dir.to_str());
    lifedesk_core::init_logging(level, log_dir).map_err(CliError::Logging)?;

    let config = ServerConfig {
        bind: args.bind,
        db_path: args.db,
        token_secret: args.token_secret,
        token_ttl: Duration::from_secs(args.token_ttl_secs),
    };
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    runtime.block_on(lifedesk_server::run(config))?;
    Ok(())
}

fn absolutize(path: PathBuf) -> CliResult<PathBuf> {
    if path.is_absolute() {
        return Ok(path);
    }
    Ok(std::env::current_dir()?.join(path))
}

fn session_path(args: &ClientArgs) -> CliResult<PathBuf> {
    if let Some(path) = &args.session_file {
        return Ok(path.clone());
    }
    dirs::config_dir()
        .map(|dir| dir.join(SESSION_DIR_NAME).join(SESSION_FILE_NAME))
        .ok_or(CliError::NoSessionPath)
}

fn session(args: &ClientArgs) -> CliResult<Session> {
    Ok(Session::new(
        ApiClient::new(&args.server),
        SessionStore::new(session_path(args)?),
    ))
}

/// Session with a verified token, ready for record calls.
fn restored(args: &ClientArgs) -> CliResult<Session> {
    let mut session = session(args)?;
    session.restore()?;
    Ok(session)
}

fn parse_id(raw: &str) -> CliResult<RecordId> {
    raw.parse()
        .map_err(|_| CliError::InvalidId(raw.to_string()))
}

fn print_user(user: &User) {
    println!("{} <{}> id={}", user.name, user.email, user.id);
}

pub fn register(args: &ClientArgs, name: &str, email: &str, password: &str) -> CliResult<()> {
    let mut session = session(args)?;
    print_user(session.register(name, email, password)?);
    Ok(())
}

pub fn login(args: &ClientArgs, email: &str, password: &str) -> CliResult<()> {
    let mut session = session(args)?;
    print_user(session.login(email, password)?);
    Ok(())
}

pub fn logout(args: &ClientArgs) -> CliResult<()> {
    session(args)?.logout()?;
    println!("logged out");
    Ok(())
}

pub fn whoami(args: &ClientArgs) -> CliResult<()> {
    let mut session = session(args)?;
    print_user(session.restore()?);
    Ok(())
}

fn print_task(task: &Task) {
    let mark = if task.is_completed { "x" } else { " " };
    let due = task
        .due_date
        .map(|due| format!(" due={}", due.format("%Y-%m-%d")))
        .unwrap_or_default();
    println!("[{mark}] {} {} ({}){due}", task.id, task.title, task.category);
}

pub fn tasks(args: &ClientArgs, command: TaskCommand) -> CliResult<()> {
    let session = restored(args)?;
    let mut panel: Panel<Task, _> = Panel::new(session.client());

    match command {
        TaskCommand::List { category } => {
            let filter = category.parse::<CategoryFilter>()?;
            panel.load()?;
            for task in panel.filtered(filter) {
                print_task(task);
            }
        }
        TaskCommand::Add {
            title,
            description,
            category,
            due,
        } => {
            let draft = TaskDraft {
                title: Some(title),
                description,
                category,
                due_date: due,
            };
            print_task(panel.add(draft)?);
        }
        TaskCommand::Toggle { id } => {
            panel.load()?;
            print_task(panel.toggle(parse_id(&id)?)?);
        }
        TaskCommand::Edit {
            id,
            title,
            description,
            category,
            due,
        } => {
            let patch = TaskPatch {
                title,
                description: description.map(Some),
                category,
                is_completed: None,
                due_date: due.map(Some),
            };
            panel.load()?;
            print_task(panel.update(parse_id(&id)?, patch)?);
        }
        TaskCommand::Rm { id } => {
            panel.delete(parse_id(&id)?)?;
            println!("Task removed");
        }
    }
    Ok(())
}

fn print_note(note: &Note) {
    let tags = if note.tags.is_empty() {
        String::new()
    } else {
        format!(" [{}]", note.tags.join(", "))
    };
    println!("{} {}{tags}\n    {}", note.id, note.title, note.content);
}

pub fn notes(args: &ClientArgs, command: NoteCommand) -> CliResult<()> {
    let session = restored(args)?;
    let mut panel: Panel<Note, _> = Panel::new(session.client());

    match command {
        NoteCommand::List => {
            panel.load()?;
            panel.items().iter().for_each(print_note);
        }
        NoteCommand::Add {
            title,
            content,
            tags,
        } => {
            print_note(panel.add(note_draft(&title, &content, &tags))?);
        }
        NoteCommand::Edit {
            id,
            title,
            content,
            tags,
        } => {
            let patch = NotePatch {
                title,
                content,
                tags: tags.as_deref().map(parse_tags),
            };
            panel.load()?;
            print_note(panel.update(parse_id(&id)?, patch)?);
        }
        NoteCommand::Rm { id } => {
            panel.delete(parse_id(&id)?)?;
            println!("Note removed");
        }
    }
    Ok(())
}

fn print_goal(goal: &Goal) {
    let mark = if goal.is_completed { "x" } else { " " };
    println!(
        "[{mark}] {} {} ({})",
        goal.id,
        goal.title,
        goal.date.format("%Y-%m-%d")
    );
}

pub fn goals(args: &ClientArgs, command: GoalCommand) -> CliResult<()> {
    let session = restored(args)?;
    let mut panel: Panel<Goal, _> = Panel::new(session.client());

    match command {
        GoalCommand::List => {
            panel.load()?;
            panel.items().iter().for_each(print_goal);
            let progress = panel.progress();
            println!(
                "{}/{} done ({}%)",
                progress.completed,
                progress.total,
                progress.rounded_percent()
            );
        }
        GoalCommand::Add { title } => {
            print_goal(panel.add(GoalDraft { title: Some(title) })?);
        }
        GoalCommand::Toggle { id } => {
            panel.load()?;
            print_goal(panel.toggle(parse_id(&id)?)?);
        }
        GoalCommand::Rm { id } => {
            panel.delete(parse_id(&id)?)?;
            println!("Goal removed");
        }
    }
    Ok(())
}
