//! Entry Scanner - terminal front end
//!
//! Reads QR payloads from stdin (one per line) in place of a camera.

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use colored::*;
use entry_scanner::{
    login_machine::LoginState,
    scan_machine::{DetectionOutcome, ScanState},
    ticket_classifier::TicketColor,
    AppConfig, AppState, Route,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "entry-scanner")]
#[command(about = "Event check-in scanner")]
struct Args {
    /// Emit results as JSON lines
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Log this device in with a scanner code
    Login { code: String },
    /// Verify QR payloads read from stdin, one per line
    Scan,
    /// Show the logged-in session
    Status,
    /// Clear the session
    Logout,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "entry_scanner=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();

    let config = AppConfig::from_env();
    tracing::info!(
        api_base_url = %config.api_base_url,
        prefs_path = %config.prefs_path.display(),
        scan_cooldown_ms = config.scan_cooldown.as_millis() as u64,
        "Configuration loaded"
    );

    let app = AppState::build(config)
        .await
        .context("Failed to initialize scanner")?;

    match args.command {
        Command::Login { code } => login(&app, &code, args.json).await,
        Command::Scan => scan(&app, args.json).await,
        Command::Status => status(&app, args.json).await,
        Command::Logout => {
            app.scanner.logout().await?;
            println!("Logged out");
            Ok(())
        }
    }
}

async fn login(app: &AppState, code: &str, json: bool) -> anyhow::Result<()> {
    let state = app.login.submit(code).await;

    if json {
        println!("{}", serde_json::to_string(&state)?);
    }

    match state {
        LoginState::Success {
            staff_name,
            assigned_to,
        } => {
            if app.login.take_navigation() && !json {
                match assigned_to {
                    Some(place) => println!("Logged in as {} ({})", staff_name.bold(), place),
                    None => println!("Logged in as {}", staff_name.bold()),
                }
            }
            Ok(())
        }
        LoginState::Error(message) => bail!(message),
        LoginState::Idle | LoginState::Loading => bail!("Login did not complete"),
    }
}

async fn scan(app: &AppState, json: bool) -> anyhow::Result<()> {
    if app.start_route().await == Route::Login {
        bail!("Not logged in. Run `entry-scanner login <CODE>` first.");
    }

    let staff = app.scanner.staff_name().await;
    eprintln!("Scanning as {} (one QR payload per line, Ctrl-D to stop)", staff);

    app.scanner.arm();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(line) = lines.next_line().await? {
        let payload = line.trim();
        if payload.is_empty() {
            continue;
        }

        match app.scanner.on_detection(payload).await {
            DetectionOutcome::Verified => {
                let state = app.scanner.state();
                if json {
                    print_json(&state, app.scanner.scan_count());
                } else {
                    print_result(&state, app.scanner.scan_count());
                }
                app.scanner.reset();
            }
            DetectionOutcome::Duplicate => {
                tracing::debug!("Duplicate detection skipped");
            }
            DetectionOutcome::Busy => {
                tracing::debug!("Scanner busy, detection skipped");
            }
        }
    }

    Ok(())
}

async fn status(app: &AppState, json: bool) -> anyhow::Result<()> {
    let session = app.store.session().await;
    if json {
        let line = match &session {
            Some(s) => serde_json::json!({
                "logged_in": true,
                "scanner_code": s.scanner_code,
                "staff_name": s.staff_name,
                "assigned_to": s.assigned_to,
            }),
            None => serde_json::json!({ "logged_in": false }),
        };
        println!("{}", line);
        return Ok(());
    }

    match session {
        Some(s) => {
            println!("Scanner code: {}", s.scanner_code);
            println!("Staff:        {}", s.staff_name);
            if let Some(place) = s.assigned_to {
                println!("Assigned to:  {}", place);
            }
        }
        None => println!("Not logged in"),
    }
    Ok(())
}

fn print_json(state: &ScanState, scan_count: u64) {
    let line = serde_json::json!({
        "result": state,
        "category": state.category(),
        "scan_count": scan_count,
    });
    println!("{}", line);
}

fn print_result(state: &ScanState, scan_count: u64) {
    let color = state.background_color().unwrap_or(TicketColor::Grey);
    println!("{}", banner(state.headline(), color));

    if let Some(details) = state.details() {
        let category = state.category();
        let label = match &category.sub_text {
            Some(sub) => format!("{} · {}", category.display_text, sub),
            None => category.display_text.clone(),
        };
        println!("{}", banner(&label, category.background_color));
        println!("{}  {}", details.full_name.bold(), details.registration_id.dimmed());
    }

    if let Some(note) = state.note() {
        println!("{}", note);
    }

    println!("{}", format!("✓ {}", scan_count).green());
    println!();
}

fn banner(text: &str, color: TicketColor) -> ColoredString {
    let (r, g, b) = color.rgb();
    format!(" {} ", text).white().bold().on_truecolor(r, g, b)
}
