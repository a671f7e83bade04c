// Contract verification harness
//
// Replaces the pile of one-off scripts that used to drive the backend. One
// runner executes named steps in order; when a step every later step depends
// on fails, the dependents are marked skipped instead of failing with
// unrelated errors of their own.

mod auth;
mod calendar;
mod habits;
mod stats;
mod tasks;
mod voice;

use std::future::Future;

use crate::api::{ApiClient, ApiError, ApiResult};
use crate::config::Settings;

pub use auth::run as run_auth;
pub use calendar::run as run_calendar;
pub use habits::run as run_habits;
pub use stats::run as run_stats;
pub use tasks::run as run_tasks;
pub use voice::run as run_voice;

const GREEN: &str = "\x1b[32m";
const RED: &str = "\x1b[31m";
const YELLOW: &str = "\x1b[33m";
const CYAN: &str = "\x1b[1;36m";
const RESET: &str = "\x1b[0m";

#[derive(Debug, Clone, PartialEq)]
pub enum StepStatus {
    Passed,
    Failed(String),
    Skipped,
}

#[derive(Debug, Clone)]
pub struct StepReport {
    pub name: String,
    pub status: StepStatus,
}

#[derive(Debug)]
pub struct SuiteReport {
    pub suite: String,
    pub steps: Vec<StepReport>,
}

impl SuiteReport {
    pub fn passed(&self) -> usize {
        self.count(|s| matches!(s, StepStatus::Passed))
    }

    pub fn failed(&self) -> usize {
        self.count(|s| matches!(s, StepStatus::Failed(_)))
    }

    pub fn skipped(&self) -> usize {
        self.count(|s| matches!(s, StepStatus::Skipped))
    }

    pub fn succeeded(&self) -> bool {
        self.failed() == 0
    }

    fn count(&self, pred: impl Fn(&StepStatus) -> bool) -> usize {
        self.steps.iter().filter(|s| pred(&s.status)).count()
    }

    pub fn print_summary(&self) {
        let color = if self.succeeded() { GREEN } else { RED };
        println!(
            "\n{color}{}: {} passed, {} failed, {} skipped{RESET}",
            self.suite,
            self.passed(),
            self.failed(),
            self.skipped()
        );
    }
}

/// Executes a suite's steps in order, short-circuiting dependents of a failed
/// prerequisite.
pub struct Runner {
    suite: String,
    steps: Vec<StepReport>,
    blocked: bool,
}

impl Runner {
    pub fn new(suite: &str) -> Self {
        println!("\n{CYAN}=== {suite} ==={RESET}");
        Self {
            suite: suite.to_string(),
            steps: Vec::new(),
            blocked: false,
        }
    }

    /// Run a step. A `critical` failure blocks every later step. Returns the
    /// step's value so later steps can build on it; `None` when it failed or
    /// was skipped.
    pub async fn step<T, Fut>(&mut self, name: &str, critical: bool, fut: Fut) -> Option<T>
    where
        Fut: Future<Output = ApiResult<T>>,
    {
        if self.blocked {
            self.record_skip(name);
            return None;
        }

        match fut.await {
            Ok(value) => {
                self.record(name, StepStatus::Passed);
                Some(value)
            }
            Err(e) => {
                self.record(name, StepStatus::Failed(e.to_string()));
                if critical {
                    self.blocked = true;
                }
                None
            }
        }
    }

    /// Run a step that must fail, e.g. a 401 on bad credentials. `check`
    /// inspects the error; a success or the wrong error fails the step.
    pub async fn expect_failure<T, Fut>(
        &mut self,
        name: &str,
        fut: Fut,
        check: impl FnOnce(&ApiError) -> bool,
    ) where
        Fut: Future<Output = ApiResult<T>>,
    {
        if self.blocked {
            self.record_skip(name);
            return;
        }

        match fut.await {
            Ok(_) => self.record(
                name,
                StepStatus::Failed("expected an error, request succeeded".to_string()),
            ),
            Err(e) if check(&e) => self.record(name, StepStatus::Passed),
            Err(e) => self.record(name, StepStatus::Failed(format!("wrong error: {e}"))),
        }
    }

    /// Record a local assertion about values earlier steps produced.
    pub fn check(&mut self, name: &str, condition: bool, detail: &str) {
        if self.blocked {
            self.record_skip(name);
        } else if condition {
            self.record(name, StepStatus::Passed);
        } else {
            self.record(name, StepStatus::Failed(detail.to_string()));
        }
    }

    /// Mark a step skipped because its input never materialized.
    pub fn skip(&mut self, name: &str) {
        self.record_skip(name);
    }

    pub fn finish(self) -> SuiteReport {
        let report = SuiteReport {
            suite: self.suite,
            steps: self.steps,
        };
        report.print_summary();
        report
    }

    fn record(&mut self, name: &str, status: StepStatus) {
        match &status {
            StepStatus::Passed => println!("{GREEN}✓{RESET} {name}"),
            StepStatus::Failed(reason) => println!("{RED}✗{RESET} {name}: {reason}"),
            StepStatus::Skipped => println!("{YELLOW}-{RESET} {name} (skipped)"),
        }
        self.steps.push(StepReport {
            name: name.to_string(),
            status,
        });
    }

    fn record_skip(&mut self, name: &str) {
        self.record(name, StepStatus::Skipped);
    }
}

/// Options shared by the suites.
pub struct VerifyOptions {
    pub email: String,
    pub password: String,
    /// Voice sample file for the voice suite.
    pub sample: Option<std::path::PathBuf>,
    /// Feedback message id for the voice suite.
    pub feedback_id: Option<String>,
}

impl VerifyOptions {
    /// Build from settings; credentials are required.
    pub fn from_settings(settings: &Settings) -> anyhow::Result<Self> {
        let email = settings
            .verify
            .email
            .clone()
            .ok_or_else(|| anyhow::anyhow!("no verification email configured (set FOCUSFLOW_EMAIL or verify.email)"))?;
        let password = settings
            .verify
            .password
            .clone()
            .ok_or_else(|| anyhow::anyhow!("no verification password configured (set FOCUSFLOW_PASSWORD or verify.password)"))?;
        Ok(Self {
            email,
            password,
            sample: None,
            feedback_id: None,
        })
    }
}

/// Login step shared by every suite.
async fn login(run: &mut Runner, api: &ApiClient, opts: &VerifyOptions) -> bool {
    run.step("login", true, async {
        let auth = api.login(&opts.email, &opts.password).await?;
        if auth.token.is_empty() {
            return Err(ApiError::UnexpectedShape("empty token".to_string()));
        }
        Ok(())
    })
    .await
    .is_some()
}

/// Unique-per-run resource name, so parallel runs don't collide.
fn unique_name(prefix: &str) -> String {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.subsec_nanos())
        .unwrap_or(0);
    let secs = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    format!("{prefix}-{secs}-{nanos}")
}
