use std::{error::Error, io::Write};

use clap::{Args, Parser, Subcommand};
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyModifiers},
    execute,
    style::Print,
    terminal,
    terminal::ClearType,
};
use engine::{Engine, users};
use migration::MigratorTrait;
use sea_orm::{Database, DatabaseConnection, EntityTrait, Set};

#[derive(Parser, Debug)]
#[command(name = "grova_admin")]
#[command(about = "Admin utilities for Grova (bootstrap users, wallets and cash agents)")]
struct Cli {
    /// Database connection string (also read from `DATABASE_URL`).
    #[arg(
        long,
        env = "DATABASE_URL",
        default_value = "sqlite:./grova.db?mode=rwc"
    )]
    database_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    User(User),
    Wallets(Wallets),
    Agents(Agents),
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
    display_name: Option<String>,
}

#[derive(Args, Debug)]
struct Wallets {
    #[command(subcommand)]
    command: WalletsCommand,
}

#[derive(Subcommand, Debug)]
enum WalletsCommand {
    /// Create the default wallets of a user (no-op if they exist).
    Init(WalletsArgs),
    Show(WalletsArgs),
}

#[derive(Args, Debug)]
struct WalletsArgs {
    #[arg(long)]
    user: String,
}

#[derive(Args, Debug)]
struct Agents {
    #[command(subcommand)]
    command: AgentsCommand,
}

#[derive(Subcommand, Debug)]
enum AgentsCommand {
    Add(AgentAddArgs),
    List(AgentListArgs),
    /// Hide an agent from the directory.
    Pause(AgentIdArgs),
    Resume(AgentIdArgs),
}

#[derive(Args, Debug)]
struct AgentAddArgs {
    #[arg(long)]
    name: String,
    #[arg(long)]
    phone: String,
    #[arg(long)]
    location: String,
    /// Fiat currency code, e.g. KES.
    #[arg(long)]
    currency: String,
}

#[derive(Args, Debug)]
struct AgentListArgs {
    #[arg(long)]
    location: Option<String>,
}

#[derive(Args, Debug)]
struct AgentIdArgs {
    #[arg(long)]
    id: uuid::Uuid,
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

async fn connect_db(
    database_url: &str,
) -> Result<DatabaseConnection, Box<dyn Error + Send + Sync>> {
    let db = Database::connect(database_url).await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}

async fn ensure_user(
    db: &DatabaseConnection,
    username: &str,
) -> Result<(), Box<dyn Error + Send + Sync>> {
    if users::Entity::find_by_id(username.to_string())
        .one(db)
        .await?
        .is_none()
    {
        eprintln!("user not found: {username}");
        std::process::exit(1);
    }
    Ok(())
}

fn print_wallets(wallets: &[engine::Wallet]) {
    for wallet in wallets {
        println!(
            "{}  {:<8} {:>20} {:<7} {}",
            wallet.id,
            wallet.kind.as_str(),
            wallet.money().amount_string(),
            wallet.currency.code(),
            if wallet.active { "active" } else { "inactive" }
        );
    }
}

fn print_agents(agents: &[engine::CashAgent]) {
    for agent in agents {
        println!(
            "{}  {:<24} {:<16} {:<16} {}",
            agent.id,
            agent.name,
            agent.phone,
            agent.location,
            agent.currency.code()
        );
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    let cli = Cli::parse();

    let db = connect_db(&cli.database_url).await?;

    match cli.command {
        Command::User(User {
            command: UserCommand::Create(args),
        }) => {
            let username = args.username.trim().to_string();
            if username.is_empty() || username.contains(':') {
                eprintln!("invalid username: {:?}", args.username);
                std::process::exit(2);
            }

            if users::Entity::find_by_id(username.clone())
                .one(&db)
                .await?
                .is_some()
            {
                eprintln!("user already exists: {username}");
                std::process::exit(1);
            }

            let password = prompt_password_twice()?;

            let user = users::ActiveModel {
                username: Set(username.clone()),
                password: Set(password),
                display_name: Set(args.display_name),
            };
            users::Entity::insert(user).exec(&db).await?;

            println!("created user: {username}");
        }
        Command::Wallets(Wallets { command }) => {
            let engine = Engine::builder().database(db.clone()).build().await?;
            match command {
                WalletsCommand::Init(args) => {
                    ensure_user(&db, &args.user).await?;
                    let wallets = engine.initialize_wallets(&args.user).await?;
                    print_wallets(&wallets);
                }
                WalletsCommand::Show(args) => {
                    ensure_user(&db, &args.user).await?;
                    let wallets = engine.wallets(&args.user).await?;
                    if wallets.is_empty() {
                        println!("no wallets for {}", args.user);
                    }
                    print_wallets(&wallets);
                }
            }
        }
        Command::Agents(Agents { command }) => {
            let engine = Engine::builder().database(db.clone()).build().await?;
            match command {
                AgentsCommand::Add(args) => {
                    let currency = engine::Currency::try_from(args.currency.as_str())?;
                    let agent = engine
                        .register_cash_agent(&args.name, &args.phone, &args.location, currency)
                        .await?;
                    print_agents(&[agent]);
                }
                AgentsCommand::List(args) => {
                    let agents = engine.cash_agents(args.location.as_deref()).await?;
                    if agents.is_empty() {
                        println!("no cash agents");
                    }
                    print_agents(&agents);
                }
                AgentsCommand::Pause(args) => {
                    engine.set_cash_agent_active(args.id, false).await?;
                    println!("paused agent: {}", args.id);
                }
                AgentsCommand::Resume(args) => {
                    engine.set_cash_agent_active(args.id, true).await?;
                    println!("resumed agent: {}", args.id);
                }
            }
        }
    }

    Ok(())
}
