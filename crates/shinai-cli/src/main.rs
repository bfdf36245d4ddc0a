//! CLI front-end: collect a birth profile and concern, request a reading,
//! and print it.

mod display;
mod prompt;
mod session;

use std::io::{self, IsTerminal, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::Context;
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use shinai_client::{
    ApiEnvironment, BuildProfile, DevTarget, FortuneClient, GongsuOptions, resolve_base_url,
};
use shinai_core::{Branch, CalendarType, FortuneForm};
use tracing_subscriber::EnvFilter;

use display::PrayerBanner;
use session::{Reading, ReadingRoute, ReadingScreen, ScreenState};

const BANNER_INTERVAL: Duration = Duration::from_millis(500);

#[derive(Parser)]
#[command(
    name = "shinai",
    about = "神 AI: birth time-branch fortune readings",
    version,
    propagate_version = true
)]
struct Cli {
    #[command(flatten)]
    backend: BackendArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct BackendArgs {
    /// Backend base URL; overrides every other resolution rule
    #[arg(long, global = true, env = "SHINAI_API_BASE_URL")]
    base_url: Option<String>,

    /// Dev server address (`host:port`) used to find a LAN backend
    #[arg(long, global = true, env = "SHINAI_DEV_HOST_URI")]
    dev_host_uri: Option<String>,

    /// Running inside the Android emulator; reach the host via 10.0.2.2
    #[arg(long, global = true)]
    android_emulator: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Request a structured reading from name, birth date/branch and concern
    Fortune {
        #[arg(long)]
        name: String,

        /// Birth date as YYYY-MM-DD
        #[arg(long)]
        birth_date: NaiveDate,

        /// Birth time-branch: 자시, 자, ja, ... (default: 모름)
        #[arg(long, default_value = "모름")]
        branch: Branch,

        /// solar or lunar
        #[arg(long, default_value = "solar")]
        calendar: CalendarType,

        /// Birth month is a lunar leap month
        #[arg(long)]
        leap_month: bool,

        #[arg(long)]
        concern: String,

        /// Print the reading as JSON
        #[arg(long)]
        json: bool,
    },

    /// Ask the free-text gongsu endpoint a question
    Gongsu {
        question: String,

        /// Bearer token for the endpoint
        #[arg(long, env = "SHINAI_API_TOKEN", hide_env_values = true)]
        token: Option<String>,

        #[arg(long)]
        json: bool,
    },

    /// Fill in the form interactively, then request a structured reading
    Ask {
        #[arg(long)]
        json: bool,
    },

    /// Display a reading saved earlier with `--json`, without contacting the backend
    Show {
        /// File holding the saved reading
        path: PathBuf,

        /// Concern to show above a saved fortune
        #[arg(long, default_value = "")]
        concern: String,

        #[arg(long)]
        json: bool,
    },

    /// List the birth time-branches and their clock times
    Branches,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();
    tracing::debug!("shinai v{}", env!("CARGO_PKG_VERSION"));

    let cli = Cli::parse();

    match cli.command {
        Commands::Fortune {
            name,
            birth_date,
            branch,
            calendar,
            leap_month,
            concern,
            json,
        } => {
            let form = FortuneForm {
                name,
                birth_date,
                branch,
                calendar,
                leap_month,
                concern,
            };
            submit_form(&cli.backend, form, json).await
        }
        Commands::Gongsu {
            question,
            token,
            json,
        } => {
            let route = ReadingRoute {
                user_input: question.trim().to_string(),
                gongsu: GongsuOptions { token },
                ..Default::default()
            };
            show_reading(client(&cli.backend), route, json).await
        }
        Commands::Ask { json } => {
            let form = prompt::read_form()?;
            submit_form(&cli.backend, form, json).await
        }
        Commands::Show {
            path,
            concern,
            json,
        } => {
            let text = std::fs::read_to_string(&path)
                .with_context(|| format!("reading {}", path.display()))?;
            let reading = display::parse_saved_reading(&text)
                .with_context(|| format!("{} is not a saved reading", path.display()))?;
            let user_input = concern.trim().to_string();
            match reading {
                Reading::Fortune(fortune) => {
                    let route = ReadingRoute {
                        user_input,
                        preloaded: Some(fortune),
                        ..Default::default()
                    };
                    show_reading(client(&cli.backend), route, json).await
                }
                Reading::Message(_) => {
                    print_reading(&user_input, &reading, json)?;
                    Ok(ExitCode::SUCCESS)
                }
            }
        }
        Commands::Branches => {
            display::write_branch_table(&mut io::stdout().lock())?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn client(args: &BackendArgs) -> FortuneClient {
    let env = ApiEnvironment {
        profile: BuildProfile::current(),
        target: if args.android_emulator {
            DevTarget::AndroidEmulator
        } else {
            DevTarget::Host
        },
        host_uri: args.dev_host_uri.clone(),
        override_url: args.base_url.clone(),
    };
    let base_url = resolve_base_url(&env);
    tracing::info!(base_url = %base_url, "backend resolved");
    FortuneClient::new(base_url)
}

/// Validate the form; on success open a reading screen for it. Validation
/// failures exit with status 2 before any request is made.
async fn submit_form(args: &BackendArgs, form: FortuneForm, json: bool) -> anyhow::Result<ExitCode> {
    let payload = match form.submit() {
        Ok(payload) => payload,
        Err(e) => {
            eprintln!("입력 오류: {e}");
            return Ok(ExitCode::from(2));
        }
    };
    let route = ReadingRoute {
        user_input: form.concern.trim().to_string(),
        payload: Some(payload),
        ..Default::default()
    };
    show_reading(client(args), route, json).await
}

/// Mount a reading screen, animate the banner while it loads, and print the
/// result. Ctrl-C unmounts the screen and exits with status 130; a crashed
/// request task is an error (status 1).
async fn show_reading(
    client: FortuneClient,
    route: ReadingRoute,
    json: bool,
) -> anyhow::Result<ExitCode> {
    let user_input = route.user_input.clone();
    let mut screen = ReadingScreen::mount(client, route);

    let animate = screen.is_loading() && io::stderr().is_terminal();
    let mut banner = PrayerBanner::default();

    let settled = screen
        .settle_unless(tokio::signal::ctrl_c(), BANNER_INTERVAL, || {
            if animate {
                banner.draw(&mut io::stderr())?;
            }
            Ok(())
        })
        .await?;
    if animate {
        banner.clear(&mut io::stderr())?;
    }

    match settled {
        Some(ScreenState::Ready(reading)) => {
            print_reading(&user_input, &reading, json)?;
            Ok(ExitCode::SUCCESS)
        }
        Some(ScreenState::Crashed) => {
            anyhow::bail!("reading task crashed before producing a result")
        }
        Some(ScreenState::Loading) | None => Ok(ExitCode::from(130)),
    }
}

fn print_reading(user_input: &str, reading: &Reading, json: bool) -> anyhow::Result<()> {
    let mut out = io::stdout().lock();
    if json {
        serde_json::to_writer_pretty(&mut out, &display::reading_json(reading))?;
        writeln!(out)?;
    } else {
        display::write_reading(&mut out, user_input, reading)?;
    }
    Ok(())
}
