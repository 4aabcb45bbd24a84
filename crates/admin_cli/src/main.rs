use std::{error::Error, io::Write, path::PathBuf};

use clap::{Args, Parser, Subcommand};
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyModifiers},
    execute,
    style::Print,
    terminal,
    terminal::ClearType,
};
use csv::Writer;
use engine::{Engine, EngineError, Expense, ExpenseFilter, GoalItem};
use migration::MigratorTrait;
use sea_orm::{Database, DatabaseConnection};
use serde::Serialize;

#[derive(Parser, Debug)]
#[command(name = "cashify_admin")]
#[command(about = "Admin utilities for Cashify (users, backfills, exports)")]
struct Cli {
    /// Database connection string (also read from `DATABASE_URL`).
    #[arg(
        long,
        env = "DATABASE_URL",
        default_value = "sqlite:./cashify.db?mode=rwc"
    )]
    database_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    User(User),
    /// Recompute `occurred_at` from the entered date of every entry.
    BackfillTimestamps(UserArgs),
    /// Write every entry of a user as CSV.
    Export(ExportArgs),
    /// Print goal progress for a user.
    Goals(UserArgs),
}

#[derive(Args, Debug)]
struct User {
    #[command(subcommand)]
    command: UserCommand,
}

#[derive(Subcommand, Debug)]
enum UserCommand {
    Create(UserCreateArgs),
}

#[derive(Args, Debug)]
struct UserCreateArgs {
    #[arg(long)]
    username: String,
    #[arg(long)]
    email: String,
}

#[derive(Args, Debug)]
struct UserArgs {
    #[arg(long)]
    email: String,
}

#[derive(Args, Debug)]
struct ExportArgs {
    #[arg(long)]
    email: String,
    /// Output file, stdout when missing.
    #[arg(long)]
    out: Option<PathBuf>,
}

struct RawModeGuard;

impl RawModeGuard {
    fn enter() -> Result<Self, Box<dyn Error + Send + Sync>> {
        terminal::enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}

fn prompt_password(prompt: &str) -> Result<String, Box<dyn Error + Send + Sync>> {
    let _raw = RawModeGuard::enter()?;

    let mut out = std::io::stderr();
    execute!(
        out,
        cursor::MoveToColumn(0),
        terminal::Clear(ClearType::CurrentLine),
        Print(prompt)
    )?;
    out.flush()?;

    let mut buf = String::new();
    loop {
        let Event::Key(KeyEvent {
            code, modifiers, ..
        }) = event::read()?
        else {
            continue;
        };

        match code {
            KeyCode::Enter => {
                execute!(out, Print("\r\n"))?;
                out.flush()?;
                break;
            }
            KeyCode::Backspace => {
                if buf.pop().is_some() {
                    execute!(out, cursor::MoveLeft(1), Print(" "), cursor::MoveLeft(1))?;
                    out.flush()?;
                }
            }
            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                execute!(out, Print("\r\n"))?;
                out.flush()?;
                return Err("interrupted".into());
            }
            KeyCode::Char(ch) if !modifiers.contains(KeyModifiers::CONTROL) => {
                buf.push(ch);
                execute!(out, Print("*"))?;
                out.flush()?;
            }
            _ => {}
        }
    }

    Ok(buf)
}

fn prompt_password_twice() -> Result<String, Box<dyn Error + Send + Sync>> {
    let mut out = std::io::stderr();
    for _ in 0..3 {
        let p1 = prompt_password("Password: ")?;
        if p1.is_empty() {
            execute!(
                out,
                cursor::MoveToColumn(0),
                terminal::Clear(ClearType::CurrentLine),
                Print("Password must not be empty.\r\n")
            )?;
            continue;
        }

        let p2 = prompt_password("Confirm password: ")?;
        if p1 == p2 {
            return Ok(p1);
        }

        execute!(
            out,
            cursor::MoveToColumn(0),
            terminal::Clear(ClearType::CurrentLine),
            Print("Passwords do not match. Try again.\r\n")
        )?;
    }

    Err("too many attempts".into())
}

#[derive(Serialize)]
struct ExportRow<'a> {
    date: &'a str,
    occurred_at: String,
    kind: &'static str,
    category: &'a str,
    amount: String,
    start_time: &'a str,
    end_time: &'a str,
    description: Option<&'a str>,
    id: &'a str,
}

fn export_csv(expenses: &[Expense]) -> Result<Vec<u8>, Box<dyn Error + Send + Sync>> {
    let mut writer = Writer::from_writer(vec![]);
    for expense in expenses {
        writer.serialize(ExportRow {
            date: &expense.date,
            occurred_at: expense.occurred_at.to_rfc3339(),
            kind: expense.kind.as_str(),
            category: &expense.category,
            amount: expense.amount.to_string(),
            start_time: &expense.start_time,
            end_time: &expense.end_time,
            description: expense.description.as_deref(),
            id: &expense.id,
        })?;
    }
    Ok(writer.into_inner()?)
}

fn goal_line(item: &GoalItem) -> String {
    format!(
        "{} {:<16} spent {:>12}  min {:>12}  max {:>12}  {:>3}%  {}",
        item.goal.month,
        item.goal.category,
        item.total_spent,
        item.goal.min_goal,
        item.goal.max_goal,
        item.progress_percent(),
        item.status().label()
    )
}

async fn connect_db(
    database_url: &str,
) -> Result<DatabaseConnection, Box<dyn Error + Send + Sync>> {
    let db = Database::connect(database_url).await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}

async fn user_id(engine: &Engine, email: &str) -> Result<String, Box<dyn Error + Send + Sync>> {
    match engine.user_by_email(email).await {
        Ok(user) => Ok(user.id),
        Err(EngineError::KeyNotFound(_)) => {
            eprintln!("user not found: {email}");
            std::process::exit(1);
        }
        Err(err) => Err(err.into()),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    let cli = Cli::parse();

    let db = connect_db(&cli.database_url).await?;
    let engine = Engine::builder().database(db).build().await?;

    match cli.command {
        Command::User(User {
            command: UserCommand::Create(args),
        }) => {
            let password = prompt_password_twice()?;

            match engine.sign_up(&args.username, &args.email, &password).await {
                Ok(user) => println!("created user: {} ({})", user.username, user.id),
                Err(EngineError::ExistingKey(key)) => {
                    eprintln!("user already exists: {key}");
                    std::process::exit(1);
                }
                Err(err) => return Err(err.into()),
            }
        }
        Command::BackfillTimestamps(args) => {
            let user_id = user_id(&engine, &args.email).await?;
            let updated = engine.backfill_timestamps(&user_id).await?;
            println!("updated {updated} entries");
        }
        Command::Export(args) => {
            let user_id = user_id(&engine, &args.email).await?;
            let expenses = engine
                .list_expenses(&user_id, &ExpenseFilter::default())
                .await?;
            let data = export_csv(&expenses)?;
            match args.out {
                Some(path) => {
                    std::fs::write(&path, data)?;
                    println!("exported {} entries to {}", expenses.len(), path.display());
                }
                None => std::io::stdout().write_all(&data)?,
            }
        }
        Command::Goals(args) => {
            let user_id = user_id(&engine, &args.email).await?;
            let items = engine.goal_items(&user_id).await?;
            if items.is_empty() {
                println!("no goals");
            }
            for item in &items {
                println!("{}", goal_line(item));
            }
        }
    }

    Ok(())
}
