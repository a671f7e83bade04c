// Command-line interface

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::api::ApiClient;
use crate::config::Settings;
use crate::verify::{self, SuiteReport, VerifyOptions};

#[derive(Parser)]
#[command(name = "focusflow", version, about = "FocusFlow backend client and contract checker")]
pub struct Cli {
    /// Backend base URL (overrides config and FOCUSFLOW_API_URL).
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Log in and store the session token.
    Login {
        #[arg(long, env = "FOCUSFLOW_EMAIL")]
        email: String,
        #[arg(long, env = "FOCUSFLOW_PASSWORD")]
        password: String,
    },
    /// Register a new account.
    Register {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        name: Option<String>,
    },
    /// Show the logged-in user.
    Whoami,
    /// Drop the stored session.
    Logout,
    /// Run contract-verification suites against a live backend.
    Verify {
        #[arg(value_enum)]
        suite: Suite,
        /// Wav sample for the voice suite.
        #[arg(long)]
        sample: Option<PathBuf>,
        /// Feedback message id for the voice suite.
        #[arg(long)]
        feedback_id: Option<String>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Suite {
    Auth,
    Tasks,
    Habits,
    Calendar,
    Stats,
    Voice,
    All,
}

/// Dispatch a parsed command. Returns the process exit code.
pub async fn run(cli: Cli, settings: Settings, api: ApiClient) -> Result<i32> {
    match cli.command {
        Command::Login { email, password } => {
            let auth = api.login(&email, &password).await?;
            println!("Logged in as {} ({})", auth.user.email, auth.user.id);
            Ok(0)
        }
        Command::Register {
            email,
            password,
            name,
        } => {
            let request = crate::api::auth::RegisterRequest {
                email,
                password,
                name,
            };
            let auth = api.register(&request).await?;
            println!("Registered {} ({})", auth.user.email, auth.user.id);
            Ok(0)
        }
        Command::Whoami => {
            match api.current_user() {
                Some(user) => println!("{} ({})", user.email, user.id),
                None => println!("Not logged in"),
            }
            Ok(0)
        }
        Command::Logout => {
            api.logout()?;
            println!("Logged out");
            Ok(0)
        }
        Command::Verify {
            suite,
            sample,
            feedback_id,
        } => {
            let mut opts = VerifyOptions::from_settings(&settings)?;
            opts.sample = sample;
            opts.feedback_id = feedback_id;

            if !api.check_connection().await {
                tracing::warn!("Health probe failed; the backend may be down");
            }

            let reports = run_suites(suite, &api, &opts, &settings).await;
            let failed: usize = reports.iter().map(|r| r.failed()).sum();
            Ok(if failed == 0 { 0 } else { 1 })
        }
    }
}

async fn run_suites(
    suite: Suite,
    api: &ApiClient,
    opts: &VerifyOptions,
    settings: &Settings,
) -> Vec<SuiteReport> {
    let mut reports = Vec::new();
    let all = suite == Suite::All;

    if all || suite == Suite::Auth {
        reports.push(verify::run_auth(api, opts).await);
    }
    if all || suite == Suite::Tasks {
        reports.push(verify::run_tasks(api, opts).await);
    }
    if all || suite == Suite::Habits {
        reports.push(verify::run_habits(api, opts).await);
    }
    if all || suite == Suite::Calendar {
        reports.push(verify::run_calendar(api, opts).await);
    }
    if all || suite == Suite::Stats {
        reports.push(verify::run_stats(api, opts).await);
    }
    if all || suite == Suite::Voice {
        reports.push(verify::run_voice(api, opts, &settings.poll).await);
    }

    reports
}
