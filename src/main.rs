use std::process::ExitCode;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use taskmate::api::{TaskMateClient, TaskMateHttpClient};
use taskmate::cli::{self, Command};
use taskmate::config::ClientConfig;
use taskmate::error::AppError;
use taskmate::models::{Session, Task};
use taskmate::points;
use taskmate::services::{AuthService, TaskBoard};
use taskmate::session::{SessionStore, SqliteSessionStore};

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "taskmate=info".to_string()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = match cli::parse_command(&args) {
        Ok(Command::Help) => {
            println!("{}", cli::USAGE);
            return ExitCode::SUCCESS;
        }
        Ok(command) => command,
        Err(e) => {
            eprintln!("{}", e.user_message());
            return ExitCode::FAILURE;
        }
    };

    match run(&command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{} failed: {}", command.name(), e);
            eprintln!("{}", e.user_message());
            ExitCode::FAILURE
        }
    }
}

async fn run(command: &Command) -> Result<(), AppError> {
    let config = ClientConfig::new_from_env()?;
    info!("Using backend {}", config.base_url);

    let store: Arc<dyn SessionStore> =
        Arc::new(SqliteSessionStore::connect(&config.session_db_url).await?);
    let anonymous: Arc<dyn TaskMateClient> = Arc::new(TaskMateHttpClient::new(config.clone())?);
    let auth = AuthService::new(anonymous, store);

    match command {
        Command::Help => println!("{}", cli::USAGE),
        Command::Login { email, password } => {
            let session = auth.login(email, password).await?;
            println!("Welcome, {} ({})", session.user.user_name, session.user.role.label());
        }
        Command::SignUp { user_name, email, password, role } => {
            let user = auth.sign_up(user_name, email, password, role).await?;
            println!("Account created for {}. You can log in now.", user.email);
        }
        Command::Logout => {
            auth.logout().await?;
            println!("Logged out");
        }
        Command::WhoAmI => {
            let session = require_session(&auth).await?;
            let user = &session.user;
            println!("{} <{}> #{} {}", user.user_name, user.email, user.id, user.role.label());
        }
        Command::Tasks { completed } => {
            let board = open_board(&auth, &config).await?;
            print_tasks(&board, *completed, Utc::now());
        }
        Command::Students => {
            let board = open_board(&auth, &config).await?;
            for student in board.students() {
                println!("#{:<5} {} <{}>", student.id, student.user_name, student.email);
            }
        }
        Command::Create(form) => {
            let mut board = open_board(&auth, &config).await?;
            let task = board.create_task(form).await?;
            println!("Task created successfully! (#{})", task.id);
            note_if_stale(&board);
        }
        Command::Complete(id) => {
            let mut board = open_board(&auth, &config).await?;
            let task = board.complete_task(*id).await?;
            println!("Task complete! {} (+{} points)", task.title, task.points);
            note_if_stale(&board);
        }
        Command::Delete(id) => {
            let mut board = open_board(&auth, &config).await?;
            board.delete_task(*id).await?;
            println!("Task deleted");
            note_if_stale(&board);
        }
    }

    Ok(())
}

fn note_if_stale(board: &TaskBoard) {
    if board.is_stale() {
        eprintln!("Saved, but the task list could not be refreshed.");
    }
}

async fn require_session(auth: &AuthService) -> Result<Session, AppError> {
    auth.restore().await?.ok_or(AppError::NotAuthenticated)
}

async fn open_board(auth: &AuthService, config: &ClientConfig) -> Result<TaskBoard, AppError> {
    let session = require_session(auth).await?;
    let client =
        TaskMateHttpClient::new(config.clone())?.with_token(session.token.clone());
    let mut board = TaskBoard::new(Arc::new(client), session);
    board.load().await?;
    Ok(board)
}

fn print_tasks(board: &TaskBoard, completed: bool, now: DateTime<Utc>) {
    let view = board.partition();
    let summary = board.summary(now);
    let (label, tasks, total): (&str, &[Task], i64) = if completed {
        ("Completed", view.completed.as_slice(), summary.completed_points)
    } else {
        ("Active", view.active.as_slice(), summary.active_points)
    };

    println!(
        "{} | {} active, {} completed | Total points: {}",
        board.user().role.label(),
        summary.active,
        summary.completed,
        total
    );
    if tasks.is_empty() {
        println!("No {} tasks", label.to_lowercase());
        return;
    }

    for task in tasks {
        let deadline = task
            .deadline
            .map(|d| d.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "no deadline".to_string());
        let marker = if points::is_overdue(task, now) { " OVERDUE" } else { "" };
        println!(
            "#{:<5} {} [{} pts, {}]{}",
            task.id, task.title, task.points, deadline, marker
        );
        if !task.description.is_empty() {
            println!("       {}", task.description);
        }
    }
}
