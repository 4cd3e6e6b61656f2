use clap::{Parser, Subcommand};
use tracing::info;

use gestion_app::{App, Credentials, GestionConfig, NewUser, Route, SessionEvent, UserPatch};

#[derive(Parser)]
#[command(name = "gestion")]
#[command(about = "Gestión de Usuarios client")]
struct Cli {
    /// Backend base URL; defaults to GESTION_API_URL or the bundled one
    #[arg(long)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Log in and persist the session
    Login { username: String, password: String },
    /// Drop the persisted session
    Logout,
    /// Show the session and current route
    Status,
    /// Resolve a path through the navigation guard
    Route { path: String },
    /// Operations on the user collection
    Users {
        #[command(subcommand)]
        command: UsersCommand,
    },
}

#[derive(Subcommand)]
enum UsersCommand {
    /// List all users with classification and score color
    List,
    /// Show one user from the fetched collection
    Show { id: i64 },
    /// Create a user
    Create {
        name: String,
        surname: String,
        #[arg(long, default_value = "normal")]
        role: String,
        #[arg(long, default_value_t = 50)]
        score: u8,
    },
    /// Update fields of a user
    Update {
        id: i64,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        surname: Option<String>,
        #[arg(long)]
        role: Option<String>,
        #[arg(long)]
        score: Option<u8>,
    },
    /// Delete a user
    Delete { id: i64 },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "gestion_app=info,usuarios_http=info".into());
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let cli = Cli::parse();
    let mut config = GestionConfig::from_env();
    if let Some(url) = cli.api_url {
        config.client.base_url = url;
    }

    let app = App::new(config)?;
    let route = app.start();
    info!("[App] starting at {}", route);

    match cli.command {
        Command::Login { username, password } => login(&app, username, password).await,
        Command::Logout => logout(&app),
        Command::Status => status(&app),
        Command::Route { path } => {
            let route = app.router.navigate(&path)?;
            println!("{}", route);
            Ok(())
        }
        Command::Users { command } => users(&app, command).await,
    }
}

async fn login(app: &App, username: String, password: String) -> anyhow::Result<()> {
    let mut events = app.session.subscribe();
    if !app.session.login(Credentials::new(username, password)).await {
        let message = app
            .session
            .state()
            .error
            .unwrap_or_else(|| "login failed".to_string());
        anyhow::bail!(message);
    }

    // The store only reports the outcome; navigation happens out here.
    if let Ok(SessionEvent::LoggedIn) = events.try_recv() {
        let route = app.router.navigate("/users")?;
        info!("[App] now at {}", route);
    }
    if let Some(user) = app.session.current_user() {
        println!("Logged in as {}", user.display_name());
    }
    Ok(())
}

fn logout(app: &App) -> anyhow::Result<()> {
    let mut events = app.session.subscribe();
    app.session.logout();
    if let Ok(SessionEvent::LoggedOut) = events.try_recv() {
        app.router.navigate("/login")?;
    }
    println!("Logged out");
    Ok(())
}

fn status(app: &App) -> anyhow::Result<()> {
    let status = serde_json::json!({
        "authenticated": app.session.is_authenticated(),
        "user": app.session.current_user(),
        "route": app.router.current().path(),
    });
    println!("{}", serde_json::to_string_pretty(&status)?);
    Ok(())
}

async fn users(app: &App, command: UsersCommand) -> anyhow::Result<()> {
    // Same check the UI runs: protected routes need a session.
    if app.router.navigate("/users")? != Route::Users {
        anyhow::bail!("not logged in; run `gestion login` first");
    }
    app.users.fetch_all().await;
    if let Some(error) = app.users.state().error {
        anyhow::bail!(error);
    }

    match command {
        UsersCommand::List => {
            for entry in app.users.classifications() {
                println!(
                    "{:>4}  {} {}  [{}]  {} ({})",
                    entry.user.id,
                    entry.user.name,
                    entry.user.surname,
                    entry.classification,
                    entry.user.score,
                    entry.color.as_str(),
                );
            }
            Ok(())
        }
        UsersCommand::Show { id } => match app.users.get_user_by_id(id) {
            Some(user) => {
                app.users.select_user(user.clone());
                println!("{}", serde_json::to_string_pretty(&user)?);
                Ok(())
            }
            None => anyhow::bail!("no user with id {}", id),
        },
        UsersCommand::Create {
            name,
            surname,
            role,
            score,
        } => {
            match app
                .users
                .create(NewUser {
                    name,
                    surname,
                    role,
                    score,
                })
                .await
            {
                Ok(created) => {
                    println!("Created user {}", created.id);
                    Ok(())
                }
                Err(err) => {
                    let message = app.users.state().error.unwrap_or_else(|| err.to_string());
                    anyhow::bail!(message);
                }
            }
        }
        UsersCommand::Update {
            id,
            name,
            surname,
            role,
            score,
        } => {
            let mut patch = UserPatch::new();
            if let Some(name) = name {
                patch = patch.with_name(name);
            }
            if let Some(surname) = surname {
                patch = patch.with_surname(surname);
            }
            if let Some(role) = role {
                patch = patch.with_role(role);
            }
            if let Some(score) = score {
                patch = patch.with_score(score);
            }
            if patch.is_empty() {
                anyhow::bail!("nothing to update");
            }
            if app.users.update(id, patch).await {
                println!("Updated user {}", id);
                Ok(())
            } else {
                let message = app
                    .users
                    .state()
                    .error
                    .unwrap_or_else(|| "update failed".to_string());
                anyhow::bail!(message);
            }
        }
        UsersCommand::Delete { id } => {
            if app.users.delete(id).await {
                println!("Deleted user {}", id);
                Ok(())
            } else {
                let message = app
                    .users
                    .state()
                    .error
                    .unwrap_or_else(|| "delete failed".to_string());
                anyhow::bail!(message);
            }
        }
    }
}
