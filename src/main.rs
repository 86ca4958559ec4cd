//! `formsolve`: run the form assistant against a saved HTML page.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result, bail};
use assist::{
    AutofillOutcome, ContentSession, Page, Pumped, RESCAN_INTERVAL, SurfaceAnchor, SurfaceState,
    Toggle,
};
use bus::{Bus, CoreCommand};
use clap::{Parser, Subcommand};
use html::{Document, parse_document};
use net::HttpSolver;
use runtime_solve::start_solve_runtime;
use settings::{SettingsStore, accept_auth_message};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "formsolve")]
#[command(about = "Find the questions a form asks and answer them")]
#[command(version)]
struct Cli {
    /// Settings file (defaults to the platform config directory)
    #[arg(long, global = true, env = "FORMSOLVE_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one pass over a page and list the questions found
    Scan { file: PathBuf },

    /// Ask for the answer to one question and optionally fill it in
    Solve {
        file: PathBuf,

        /// Question index as listed by `scan`
        #[arg(long, default_value_t = 0)]
        index: usize,

        /// Write the answer back into the page
        #[arg(long)]
        autofill: bool,

        /// Give up waiting for the answer after this many seconds
        #[arg(long, default_value_t = 60)]
        wait_secs: u64,
    },

    /// Show or change settings
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },

    /// Manage the signed-in session
    Auth {
        #[command(subcommand)]
        action: AuthAction,
    },
}

#[derive(Subcommand)]
enum SettingsAction {
    Show,
    Enable,
    Disable,
}

#[derive(Subcommand)]
enum AuthAction {
    /// Store a session token directly
    Login {
        #[arg(long)]
        token: String,
        #[arg(long)]
        email: Option<String>,
        /// Mark the subscription as active
        #[arg(long)]
        subscription: bool,
    },
    /// Accept a sign-in message posted by the web app
    Accept {
        #[arg(long)]
        origin: String,
        #[arg(long)]
        message: String,
    },
    Logout,
}

fn init_logging() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .init();
}

fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    let store = match &cli.config {
        Some(path) => SettingsStore::new(path),
        None => SettingsStore::open_default().context("locating the settings file")?,
    };

    match cli.command {
        Commands::Scan { file } => scan(&store, &file),
        Commands::Solve {
            file,
            index,
            autofill,
            wait_secs,
        } => solve(&store, &file, index, autofill, Duration::from_secs(wait_secs)),
        Commands::Settings { action } => settings(&store, action),
        Commands::Auth { action } => auth(&store, action),
    }
}

fn load_page(path: &Path, enabled: bool) -> Result<Page> {
    let source =
        std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    Ok(Page::new(1, parse_document(&source), enabled))
}

fn describe_anchor(doc: &Document, anchor: SurfaceAnchor) -> String {
    let (how, id) = match anchor {
        SurfaceAnchor::After(id) => ("after", id),
        SurfaceAnchor::AppendTo(id) => ("inside", id),
    };
    let tag = doc.tag_name(id).unwrap_or("?");
    match doc.attr(id, "id") {
        Some(element_id) => format!("{how} <{tag} id=\"{element_id}\">"),
        None => format!("{how} <{tag}>"),
    }
}

fn scan(store: &SettingsStore, file: &Path) -> Result<()> {
    let settings = store.load()?;
    if !settings.extension_enabled {
        println!("FormSolve is disabled; run `formsolve settings enable` first.");
        return Ok(());
    }
    let mut page = load_page(file, true)?;
    page.rescan();
    let doc = page.document();
    let surfaces = page.controller().surfaces();
    if surfaces.is_empty() {
        println!("No questions found.");
    }
    for (index, surface) in surfaces.iter().enumerate() {
        let kind = if surface.candidate().is_choice() {
            "choice"
        } else {
            "text"
        };
        println!("[{index}] ({kind}) {}", surface.question());
        if let Some(context) = surface.context() {
            println!("    {context}");
        }
        println!("    anchored {}", describe_anchor(doc, surface.anchor()));
    }
    Ok(())
}

fn solve(
    store: &SettingsStore,
    file: &Path,
    index: usize,
    autofill: bool,
    wait: Duration,
) -> Result<()> {
    let settings = store.load()?;
    if !settings.extension_enabled {
        bail!("FormSolve is disabled; run `formsolve settings enable` first");
    }
    let page = load_page(file, true)?;

    let (bus, cmd_rx) = Bus::new();
    let cmd_tx = bus.cmd_tx.clone();
    let solver = HttpSolver::new(
        settings.endpoint.clone(),
        Duration::from_secs(settings.request_timeout_secs),
    );
    let runtime = start_solve_runtime(
        cmd_rx,
        bus.evt_tx.clone(),
        Arc::new(solver),
        Arc::new(store.clone()),
    )
    .context("starting the solve runtime")?;

    let mut session = ContentSession::with_bus(page, bus, RESCAN_INTERVAL)?;
    let surface = session
        .page()
        .controller()
        .surfaces()
        .get(index)
        .map(|s| s.id())
        .with_context(|| format!("no question with index {index}"))?;

    if let Some(s) = session.page().controller().surface(surface) {
        println!("{}", s.title());
    }
    match session.toggle(surface) {
        Toggle::Opened(request_id) => log::debug!("request {request_id} sent"),
        other => log::warn!("surface did not open cleanly: {other:?}"),
    }

    let deadline = Instant::now() + wait;
    while session
        .page()
        .controller()
        .surface(surface)
        .is_some_and(|s| *s.state() == SurfaceState::Loading)
    {
        if Instant::now() >= deadline {
            println!("Gave up waiting after {}s.", wait.as_secs());
            break;
        }
        if session.pump(Duration::from_millis(200))? == Pumped::Disconnected {
            break;
        }
    }

    if let Some(rendered) = session
        .page()
        .controller()
        .surface(surface)
        .and_then(|s| s.render())
    {
        println!("{rendered}");
    }

    if autofill {
        match session.accept_autofill(surface) {
            Some(AutofillOutcome::ValueSet(id)) => {
                let value = session.page().document().value(id).unwrap_or_default();
                println!("Filled value: {value}");
            }
            Some(AutofillOutcome::Selected(id)) => {
                let value = session.page().document().value(id).unwrap_or_default();
                println!("Selected option with value: {value}");
            }
            Some(AutofillOutcome::NoMatch) => println!("No option matched the answer."),
            None => println!("No answer to fill in."),
        }
        for event in session.page_mut().document_mut().take_events() {
            println!("event: {} on {:?}", event.kind.name(), event.target);
        }
    }

    drop(session);
    let _ = cmd_tx.send(CoreCommand::Shutdown);
    if runtime.join().is_err() {
        log::warn!("solve runtime panicked");
    }
    Ok(())
}

fn settings(store: &SettingsStore, action: SettingsAction) -> Result<()> {
    match action {
        SettingsAction::Show => {
            let settings = store.load()?;
            println!("file: {}", store.path().display());
            println!("enabled: {}", settings.extension_enabled);
            println!("endpoint: {}", settings.endpoint);
            println!("request timeout: {} s", settings.request_timeout_secs);
            let session = &settings.session;
            if session.is_signed_in() {
                println!(
                    "signed in as {} (subscription {})",
                    session.user_email.as_deref().unwrap_or("unknown user"),
                    if session.subscription_active {
                        "active"
                    } else {
                        "inactive"
                    }
                );
            } else {
                println!("not signed in");
            }
        }
        SettingsAction::Enable | SettingsAction::Disable => {
            let enabled = matches!(action, SettingsAction::Enable);
            let update = store.set_extension_enabled(enabled)?;
            log::debug!("broadcast {:?}", update.event());
            println!(
                "FormSolve {}{}",
                if enabled { "enabled" } else { "disabled" },
                if update.changed { "" } else { " (unchanged)" }
            );
        }
    }
    Ok(())
}

fn auth(store: &SettingsStore, action: AuthAction) -> Result<()> {
    match action {
        AuthAction::Login {
            token,
            email,
            subscription,
        } => {
            store.sign_in(&token, email.as_deref(), subscription)?;
            println!("Signed in.");
        }
        AuthAction::Accept { origin, message } => {
            if accept_auth_message(store, &origin, &message)? {
                println!("Signed in.");
            } else {
                println!("Message ignored.");
            }
        }
        AuthAction::Logout => {
            store.sign_out()?;
            println!("Signed out.");
        }
    }
    Ok(())
}
