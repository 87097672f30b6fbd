//! Load-test driver.
//!
//! Spawns a number of virtual users against a running server. Each user
//! repeatedly picks a weighted task, runs its requests, then waits a random
//! think time, until the test duration runs out.
//!
//! | Task            | Weight | Requests |
//! |-----------------|--------|----------|
//! | `view_index`    | 3      | `GET /` |
//! | `points_board`  | 2      | `GET /pointsDisplay` |
//! | `login`         | 2      | `POST /showSummary` |
//! | `booking_flow`  | 1      | `GET /book/..`, then `POST /purchasePlaces` for one place |
//! | `logout`        | 1      | `GET /logout` |
//!
//! A request fails on a transport error or a 5xx response. Refused bookings
//! are ordinary 200 pages and count as successes.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{bail, Context};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio::task::JoinSet;
use tracing::{debug, info};

use crate::web::views::encode_segment;

/// Parameters of a load-test run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadTestConfig {
    /// Base URL of the server, without a trailing slash.
    pub host: String,
    /// Number of concurrent virtual users.
    pub users: usize,
    /// How long each user keeps issuing tasks.
    pub duration: Duration,
    /// Shortest pause between two tasks of one user.
    pub min_wait: Duration,
    /// Longest pause between two tasks of one user.
    pub max_wait: Duration,
    /// Email used by the login task.
    pub club_email: String,
    /// Club name used by the booking flow.
    pub club: String,
    /// Competition name used by the booking flow.
    pub competition: String,
}

impl Default for LoadTestConfig {
    fn default() -> Self {
        Self {
            host: "http://127.0.0.1:5000".to_string(),
            users: 10,
            duration: Duration::from_secs(60),
            min_wait: Duration::from_secs(1),
            max_wait: Duration::from_secs(5),
            club_email: "admin@irontemple.com".to_string(),
            club: "Iron Temple".to_string(),
            competition: "Fall Classic".to_string(),
        }
    }
}

/// One kind of user action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Task {
    /// Load the login page.
    ViewIndex,
    /// Load the public points board.
    ViewPointsBoard,
    /// Log in with the configured email.
    Login,
    /// Open the booking page, then buy one place.
    BookingFlow,
    /// Log out.
    Logout,
}

impl Task {
    /// Every task, in weight-table order.
    pub const ALL: [Task; 5] = [
        Task::ViewIndex,
        Task::ViewPointsBoard,
        Task::Login,
        Task::BookingFlow,
        Task::Logout,
    ];

    /// Relative frequency of this task.
    #[must_use]
    pub fn weight(self) -> u32 {
        match self {
            Self::ViewIndex => 3,
            Self::ViewPointsBoard | Self::Login => 2,
            Self::BookingFlow | Self::Logout => 1,
        }
    }

    /// Sum of all task weights.
    #[must_use]
    pub fn total_weight() -> u32 {
        Self::ALL.iter().map(|task| task.weight()).sum()
    }

    /// Map a roll in `0..total_weight()` to a task.
    ///
    /// Rolls past the end map to the last task.
    #[must_use]
    pub fn from_roll(mut roll: u32) -> Self {
        for task in Self::ALL {
            if roll < task.weight() {
                return task;
            }
            roll -= task.weight();
        }
        Self::Logout
    }

    /// Name used in the report.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::ViewIndex => "view_index",
            Self::ViewPointsBoard => "points_board",
            Self::Login => "login",
            Self::BookingFlow => "booking_flow",
            Self::Logout => "logout",
        }
    }
}

/// Counters for one task.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskStats {
    /// Requests issued.
    pub requests: u64,
    /// Requests that failed.
    pub failures: u64,
    /// Sum of request latencies.
    pub total_latency: Duration,
}

impl TaskStats {
    fn record(&mut self, latency: Duration, ok: bool) {
        self.requests += 1;
        if !ok {
            self.failures += 1;
        }
        self.total_latency += latency;
    }

    fn merge(&mut self, other: &TaskStats) {
        self.requests += other.requests;
        self.failures += other.failures;
        self.total_latency += other.total_latency;
    }

    /// Mean latency, or zero when nothing was recorded.
    #[must_use]
    pub fn mean_latency(&self) -> Duration {
        if self.requests == 0 {
            return Duration::ZERO;
        }
        let nanos = self.total_latency.as_nanos() / u128::from(self.requests);
        Duration::from_nanos(u64::try_from(nanos).unwrap_or(u64::MAX))
    }
}

/// Aggregated results of a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Report {
    stats: BTreeMap<Task, TaskStats>,
}

impl Report {
    /// Counters for `task`.
    #[must_use]
    pub fn task(&self, task: Task) -> TaskStats {
        self.stats.get(&task).copied().unwrap_or_default()
    }

    /// Counters summed over every task.
    #[must_use]
    pub fn total(&self) -> TaskStats {
        let mut total = TaskStats::default();
        for stats in self.stats.values() {
            total.merge(stats);
        }
        total
    }

    fn merge(&mut self, other: &Report) {
        for (task, stats) in &other.stats {
            self.stats.entry(*task).or_default().merge(stats);
        }
    }

    fn record(&mut self, task: Task, latency: Duration, ok: bool) {
        self.stats.entry(task).or_default().record(latency, ok);
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{:<14} {:>10} {:>10} {:>12}",
            "task", "requests", "failures", "mean (ms)"
        )?;
        for task in Task::ALL {
            let stats = self.task(task);
            writeln!(
                f,
                "{:<14} {:>10} {:>10} {:>12.1}",
                task.name(),
                stats.requests,
                stats.failures,
                stats.mean_latency().as_secs_f64() * 1000.0
            )?;
        }
        let total = self.total();
        write!(
            f,
            "{:<14} {:>10} {:>10} {:>12.1}",
            "total",
            total.requests,
            total.failures,
            total.mean_latency().as_secs_f64() * 1000.0
        )
    }
}

/// Run a load test and return the aggregated report.
///
/// # Errors
///
/// Returns an error if the configuration is unusable, the HTTP client cannot
/// be built, or a virtual user task panics.
pub async fn run(config: LoadTestConfig) -> anyhow::Result<Report> {
    if config.users == 0 {
        bail!("at least one virtual user is required");
    }
    if config.min_wait > config.max_wait {
        bail!("min_wait must not exceed max_wait");
    }

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(30))
        .build()
        .context("failed to build HTTP client")?;
    let config = Arc::new(config);
    let deadline = Instant::now() + config.duration;

    info!(
        users = config.users,
        host = %config.host,
        duration_secs = config.duration.as_secs(),
        "Starting load test"
    );

    let mut users = JoinSet::new();
    for id in 0..config.users {
        users.spawn(virtual_user(id, client.clone(), Arc::clone(&config), deadline));
    }

    let mut report = Report::default();
    while let Some(result) = users.join_next().await {
        let user_report = result.context("virtual user panicked")?;
        report.merge(&user_report);
    }

    info!(requests = report.total().requests, "Load test finished");
    Ok(report)
}

async fn virtual_user(
    id: usize,
    client: reqwest::Client,
    config: Arc<LoadTestConfig>,
    deadline: Instant,
) -> Report {
    let mut rng = StdRng::from_os_rng();
    let mut report = Report::default();

    while Instant::now() < deadline {
        let task = Task::from_roll(rng.random_range(0..Task::total_weight()));
        debug!(user = id, task = task.name(), "Running task");
        run_task(&client, &config, task, &mut report).await;

        let wait = think_time(&mut rng, config.min_wait, config.max_wait);
        let remaining = deadline.saturating_duration_since(Instant::now());
        tokio::time::sleep(wait.min(remaining)).await;
    }

    report
}

fn think_time(rng: &mut impl Rng, min: Duration, max: Duration) -> Duration {
    let min_ms = u64::try_from(min.as_millis()).unwrap_or(u64::MAX);
    let max_ms = u64::try_from(max.as_millis()).unwrap_or(u64::MAX);
    Duration::from_millis(rng.random_range(min_ms..=max_ms))
}

async fn run_task(
    client: &reqwest::Client,
    config: &LoadTestConfig,
    task: Task,
    report: &mut Report,
) {
    let host = &config.host;
    match task {
        Task::ViewIndex => {
            let (latency, ok) = timed(client.get(format!("{host}/"))).await;
            report.record(task, latency, ok);
        }
        Task::ViewPointsBoard => {
            let (latency, ok) = timed(client.get(format!("{host}/pointsDisplay"))).await;
            report.record(task, latency, ok);
        }
        Task::Login => {
            let request = client
                .post(format!("{host}/showSummary"))
                .form(&[("email", config.club_email.as_str())]);
            let (latency, ok) = timed(request).await;
            report.record(task, latency, ok);
        }
        Task::BookingFlow => {
            let url = format!(
                "{host}/book/{}/{}",
                encode_segment(&config.competition),
                encode_segment(&config.club)
            );
            let (latency, ok) = timed(client.get(url)).await;
            report.record(task, latency, ok);

            let request = client.post(format!("{host}/purchasePlaces")).form(&[
                ("club", config.club.as_str()),
                ("competition", config.competition.as_str()),
                ("places", "1"),
            ]);
            let (latency, ok) = timed(request).await;
            report.record(task, latency, ok);
        }
        Task::Logout => {
            let (latency, ok) = timed(client.get(format!("{host}/logout"))).await;
            report.record(task, latency, ok);
        }
    }
}

async fn timed(request: reqwest::RequestBuilder) -> (Duration, bool) {
    let started = Instant::now();
    let ok = match request.send().await {
        Ok(response) => !response.status().is_server_error(),
        Err(e) => {
            debug!("Request failed: {e}");
            false
        }
    };
    (started.elapsed(), ok)
}
