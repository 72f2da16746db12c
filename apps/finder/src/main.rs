use std::{
    io::{self, Write},
    process::ExitCode,
    sync::Arc,
};

use anyhow::Result;
use clap::{Parser, Subcommand};
use client_core::{
    load_settings, ChangedFields, Field, GatewayError, GithubClient, GithubHandle, StateUpdate,
    UserLookup, NOT_FOUND_ROUTE,
};
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    sync::broadcast::{
        self,
        error::{RecvError, TryRecvError},
    },
    task::JoinHandle,
};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

mod repl;
mod view;

use repl::ReplCommand;
use view::View;

#[derive(Parser, Debug)]
#[command(name = "finder", about = "Search GitHub users and browse their repositories")]
struct Args {
    /// API base url; overrides GITHUB_URL and github_finder.toml.
    #[arg(long, global = true)]
    api_url: Option<String>,
    /// Access token; overrides GITHUB_TOKEN and github_finder.toml.
    #[arg(long, global = true)]
    token: Option<String>,
    /// Print JSON instead of text.
    #[arg(long, global = true)]
    json: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Search users by login, name or qualifiers.
    Search { query: String },
    /// List users in signup order.
    Users,
    /// Show a single profile.
    User { login: String },
    /// Show a user's latest repositories.
    Repos { login: String },
    /// Show a profile followed by its latest repositories.
    Profile { login: String },
    /// Interactive session against one store.
    Repl,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Rendered,
    NotFound,
}

impl Outcome {
    fn exit_status(self) -> u8 {
        match self {
            Self::Rendered => 0,
            Self::NotFound => 2,
        }
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    let mut settings = load_settings();
    if let Some(api_url) = args.api_url {
        settings = settings.with_api_url(api_url);
    }
    if let Some(token) = args.token {
        settings = settings.with_token(token);
    }
    info!(?settings, "starting finder");

    let client = GithubClient::from_settings(&settings)?;
    let logger = spawn_state_logger(client.subscribe());
    let view = View { json: args.json };

    let command = match args.command {
        Command::Search { query } => ReplCommand::Search(query),
        Command::Users => ReplCommand::Users,
        Command::User { login } => ReplCommand::User(login),
        Command::Repos { login } => ReplCommand::Repos(login),
        Command::Profile { login } => ReplCommand::Profile(login),
        Command::Repl => {
            run_repl(&client, view).await?;
            logger.abort();
            return Ok(ExitCode::SUCCESS);
        }
    };

    let outcome = run_command(&client, view, command, &mut io::stdout()).await;
    logger.abort();
    match outcome {
        Ok(outcome) => Ok(ExitCode::from(outcome.exit_status())),
        Err(err) => {
            hint_reauth(&err);
            Err(err)
        }
    }
}

async fn run_command<W: Write>(
    client: &Arc<GithubClient>,
    view: View,
    command: ReplCommand,
    out: &mut W,
) -> Result<Outcome> {
    match command {
        ReplCommand::Search(query) => {
            let users = client.search_users(&query).await?;
            writeln!(out, "{}", view.users(&users))?;
        }
        ReplCommand::Users => {
            let users = client.list_users().await?;
            writeln!(out, "{}", view.users(&users))?;
        }
        ReplCommand::User(login) => match client.get_user(&login).await? {
            UserLookup::Found(user) => writeln!(out, "{}", view.user(&user))?,
            lookup @ UserLookup::NotFound => return not_found(view, &login, &lookup, out),
        },
        ReplCommand::Repos(login) => {
            let repos = client.get_user_repos(&login).await?;
            writeln!(out, "{}", view.repos(&repos))?;
        }
        ReplCommand::Profile(login) => {
            let user = match client.get_user(&login).await? {
                UserLookup::Found(user) => user,
                lookup @ UserLookup::NotFound => return not_found(view, &login, &lookup, out),
            };
            let repos = client.get_user_repos(&login).await?;
            writeln!(out, "{}", view.user(&user))?;
            writeln!(out, "{}", view.repos(&repos))?;
        }
        ReplCommand::Clear => {
            client.clear_users().await;
            writeln!(out, "{}", view.users(&client.users().await))?;
        }
        ReplCommand::State => writeln!(out, "{}", view.state(&client.snapshot().await))?,
        ReplCommand::Help => writeln!(out, "{}", repl::HELP)?,
        ReplCommand::Quit => {}
    }
    Ok(Outcome::Rendered)
}

fn not_found<W: Write>(
    view: View,
    login: &str,
    lookup: &UserLookup,
    out: &mut W,
) -> Result<Outcome> {
    if let Some(route) = lookup.redirect_route() {
        writeln!(out, "{}", view.not_found(login, route))?;
    }
    Ok(Outcome::NotFound)
}

fn needs_reauth(err: &anyhow::Error) -> bool {
    err.downcast_ref::<GatewayError>()
        .is_some_and(GatewayError::requires_reauth)
}

/// Points at the token settings when GitHub rejected the credentials.
fn hint_reauth(err: &anyhow::Error) {
    if needs_reauth(err) {
        warn!("github rejected the credentials, check GITHUB_TOKEN or --token");
    }
}

/// Reads commands from stdin until `quit` or EOF. Each command renders only the
/// slots its dispatches changed.
async fn run_repl(client: &Arc<GithubClient>, view: View) -> Result<()> {
    let mut updates = client.subscribe();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    println!("{}", repl::HELP);

    loop {
        print!("finder> ");
        io::stdout().flush()?;
        let Some(line) = lines.next_line().await? else {
            break;
        };

        let command = match repl::parse(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(usage) => {
                println!("{usage}");
                continue;
            }
        };

        match command {
            ReplCommand::Quit => break,
            ReplCommand::Help | ReplCommand::State => {
                run_command(client, view, command, &mut io::stdout()).await?;
            }
            other => match dispatch_repl_command(client, other).await {
                Ok(Some(missing_login)) => {
                    drain_changes(&mut updates);
                    println!("{}", view.not_found(&missing_login, NOT_FOUND_ROUTE));
                }
                Ok(None) => render_changes(client, view, &mut updates).await,
                Err(err) => {
                    warn!(error = %err, "command failed");
                    hint_reauth(&err);
                    render_changes(client, view, &mut updates).await;
                }
            },
        }
    }
    Ok(())
}

/// Runs a data command. Returns the login when the profile turned out not to exist.
async fn dispatch_repl_command(
    client: &Arc<GithubClient>,
    command: ReplCommand,
) -> Result<Option<String>> {
    match command {
        ReplCommand::Search(query) => {
            client.search_users(&query).await?;
        }
        ReplCommand::Users => {
            client.list_users().await?;
        }
        ReplCommand::User(login) => {
            if client.get_user(&login).await? == UserLookup::NotFound {
                return Ok(Some(login));
            }
        }
        ReplCommand::Repos(login) => {
            client.get_user_repos(&login).await?;
        }
        ReplCommand::Profile(login) => {
            if client.get_user(&login).await? == UserLookup::NotFound {
                return Ok(Some(login));
            }
            client.get_user_repos(&login).await?;
        }
        ReplCommand::Clear => client.clear_users().await,
        ReplCommand::State | ReplCommand::Help | ReplCommand::Quit => {}
    }
    Ok(None)
}

/// Folds every pending notification into one change set.
fn drain_changes(updates: &mut broadcast::Receiver<StateUpdate>) -> ChangedFields {
    let mut changed = ChangedFields::default();
    loop {
        match updates.try_recv() {
            Ok(update) => changed.merge(update.changed),
            Err(TryRecvError::Lagged(skipped)) => {
                warn!(skipped, "render lagged behind the store, redrawing everything");
                changed = ChangedFields::all();
            }
            Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => return changed,
        }
    }
}

async fn render_changes(
    client: &Arc<GithubClient>,
    view: View,
    updates: &mut broadcast::Receiver<StateUpdate>,
) {
    let changed = drain_changes(updates);
    if !changed.touches_any(&[Field::Users, Field::User, Field::Repos, Field::Error]) {
        println!("(nothing changed)");
        return;
    }
    let state = client.snapshot().await;
    for section in view.changes(&state, changed) {
        println!("{section}");
    }
}

fn spawn_state_logger(mut updates: broadcast::Receiver<StateUpdate>) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            match updates.recv().await {
                Ok(update) if update.changed.is_empty() => {
                    debug!(action = update.action.name(), "dispatch left state unchanged");
                }
                Ok(update) => debug!(
                    action = update.action.name(),
                    terminal = update.action.is_terminal(),
                    changed = ?update.changed,
                    loading = update.state.loading,
                    "state updated"
                ),
                Err(RecvError::Lagged(skipped)) => warn!(skipped, "state logger lagged"),
                Err(RecvError::Closed) => break,
            }
        }
    })
}
