//! clinic-console - operator CLI for the console's navigation gateway.
//!
//! Drives the same session store, route table, and gateway the console uses,
//! so an operator can check what a given session is allowed to open:
//!
//! ```text
//! clinic-console login --token t1 --role 管理员
//! clinic-console navigate /employees /reports
//! clinic-console menu
//! clinic-console logout
//! ```
//!
//! A denied navigation is a normal outcome and exits 0. Only IO, config, and
//! redirect-loop failures exit non-zero.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use clinic_config::ConsoleConfig;
use clinic_core::{
    FileSessionStore, Gateway, HopCause, Navigation, Navigator, RouteTable, SessionProvider,
    SessionWriter,
};
use clinic_types::{Notice, RouteDescriptor, Session, SessionToken};

#[derive(Parser)]
#[command(name = "clinic-console")]
#[command(about = "Check clinic console navigation against the stored session")]
struct Cli {
    /// Config file (default: ~/.clinic-console/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Session file, overriding the configured location
    #[arg(long, global = true)]
    session: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Navigate to each path in turn and report where the session lands
    Navigate {
        #[arg(required = true)]
        paths: Vec<String>,
    },
    /// Store a session token and role claim
    Login {
        #[arg(long)]
        token: String,
        /// Role claim as issued by the backend (e.g. 管理员, 医生)
        #[arg(long)]
        role: Option<String>,
    },
    /// Forget the stored session
    Logout,
    /// Show the stored session
    Whoami,
    /// List the route table
    Routes,
    /// List the pages the stored session can open
    Menu,
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("warn"))
        .unwrap_or_else(|_| EnvFilter::new("error"));

    // stdout carries command output; keep logs on stderr.
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(env_filter)
        .init();
}

fn load_config(explicit: Option<&Path>) -> Result<ConsoleConfig> {
    let loaded = match explicit {
        Some(path) => {
            let config = ConsoleConfig::load_from(path)?;
            if config.is_none() {
                return Err(anyhow!("config file {} does not exist", path.display()));
            }
            config
        }
        None => ConsoleConfig::load()?,
    };
    Ok(loaded.unwrap_or_default())
}

fn open_store(config: &ConsoleConfig, explicit: Option<PathBuf>) -> Result<FileSessionStore> {
    let path = explicit
        .or_else(|| config.session_file())
        .context("could not determine a session file location; pass --session")?;
    Ok(FileSessionStore::new(path, config.admin_labels()))
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let config = load_config(cli.config.as_deref())?;
    let store = open_store(&config, cli.session)?;
    let table = RouteTable::from_config(&config).context("invalid route table in config")?;
    tracing::debug!(
        session = %store.path().display(),
        routes = table.len(),
        "Console ready"
    );

    let stdout = io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Commands::Navigate { paths } => navigate(&mut out, table, &store, &paths),
        Commands::Login { token, role } => {
            let token = SessionToken::new(token).context("--token must not be empty")?;
            store.sign_in(token, role.as_deref())?;
            writeln!(out, "signed in ({})", describe(&store.snapshot()))?;
            Ok(())
        }
        Commands::Logout => {
            store.sign_out()?;
            writeln!(out, "signed out")?;
            Ok(())
        }
        Commands::Whoami => whoami(&mut out, &store),
        Commands::Routes => routes(&mut out, &table),
        Commands::Menu => menu(&mut out, &table, &store.snapshot()),
    }
}

fn navigate(
    out: &mut impl Write,
    table: RouteTable,
    store: &FileSessionStore,
    paths: &[String],
) -> Result<()> {
    let mut navigator = Navigator::new(table, Gateway::new(store));
    for raw in paths {
        let navigation = navigator
            .navigate(raw)
            .with_context(|| format!("navigating to {raw}"))?;
        print_navigation(out, &navigation)?;
        for notice in navigator.notices_mut().take() {
            print_notice(out, &notice)?;
        }
    }
    Ok(())
}

fn print_navigation(out: &mut impl Write, navigation: &Navigation) -> io::Result<()> {
    let verdict = match navigation.denial() {
        None => "allowed".to_string(),
        Some(reason) => format!("denied: {reason}"),
    };
    writeln!(
        out,
        "{} -> {} ({verdict})",
        navigation.requested, navigation.resolved
    )?;
    for hop in &navigation.hops {
        let cause = match hop.cause {
            HopCause::RouteRedirect => "redirect".to_string(),
            HopCause::Denied(reason) => reason.to_string(),
        };
        writeln!(out, "  via {} -> {} [{cause}]", hop.from, hop.to)?;
    }
    Ok(())
}

fn print_notice(out: &mut impl Write, notice: &Notice) -> io::Result<()> {
    writeln!(out, "  {notice}")
}

fn describe(session: &Session) -> String {
    match session {
        Session::Anonymous => "not signed in".to_string(),
        Session::Authenticated { role: Some(role), .. } => format!("role: {role}"),
        Session::Authenticated { role: None, .. } => "no role claim".to_string(),
    }
}

fn whoami(out: &mut impl Write, store: &FileSessionStore) -> Result<()> {
    let session = store.snapshot();
    writeln!(out, "session file: {}", store.path().display())?;
    writeln!(out, "status: {}", describe(&session))?;
    if session.is_authenticated() {
        if let Some(label) = store.role_label() {
            writeln!(out, "role claim: {label}")?;
        }
        if let Some(updated) = store.updated_at() {
            writeln!(out, "updated: {}", updated.to_rfc3339())?;
        }
    }
    Ok(())
}

fn routes(out: &mut impl Write, table: &RouteTable) -> Result<()> {
    for route in table {
        writeln!(out, "{}", route_line(route))?;
    }
    writeln!(out, "{}", route_line(table.fallback()))?;
    Ok(())
}

fn route_line(route: &RouteDescriptor) -> String {
    let mut line = format!(
        "{:<20} {:<14}",
        route.path().as_str(),
        route.access().as_str()
    );
    if let Some(target) = route.redirect() {
        line.push_str(&format!(" -> {target}"));
    }
    if let Some(title) = route.title() {
        line.push_str(&format!(" {title}"));
    }
    line.trim_end().to_string()
}

fn menu(out: &mut impl Write, table: &RouteTable, session: &Session) -> Result<()> {
    let entries = table.menu(session);
    if entries.is_empty() {
        writeln!(out, "(no pages available; {})", describe(session))?;
        return Ok(());
    }
    for route in entries {
        let title = route.title().unwrap_or_default();
        writeln!(out, "{:<20} {title}", route.path().as_str())?;
    }
    Ok(())
}
