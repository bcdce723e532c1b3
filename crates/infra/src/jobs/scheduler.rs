//! Periodic job scheduler.

use std::any::Any;
use std::collections::BTreeMap;
use std::io;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Mutex, PoisonError, mpsc};
use std::thread;
use std::time::{Duration, Instant};

use chrono::Local;
use serde::Serialize;
use tracing::{error, info, warn};

use super::backend::CrmBackend;
use super::crm_jobs::{GenerateReport, Heartbeat, OrderReminders, RestockLowStock};
use super::sink::JobLogSink;
use super::types::{JobError, JobRun, ScheduledJob, TIMESTAMP_FORMAT};

/// Intervals of the built-in jobs.
#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    pub heartbeat_interval: Duration,
    pub restock_interval: Duration,
    pub reminders_interval: Duration,
    pub report_interval: Duration,
    /// Whether the heartbeat probes the backend.
    pub heartbeat_probe: bool,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            heartbeat_interval: Duration::from_secs(5 * 60),
            restock_interval: Duration::from_secs(24 * 60 * 60),
            reminders_interval: Duration::from_secs(24 * 60 * 60),
            report_interval: Duration::from_secs(7 * 24 * 60 * 60),
            heartbeat_probe: true,
        }
    }
}

/// Per-job run statistics.
#[derive(Debug, Clone, Default, Serialize)]
pub struct JobStats {
    pub runs: u64,
    pub succeeded: u64,
    pub failed: u64,
    pub last_run: Option<JobRun>,
}

type SharedStats = Arc<Mutex<BTreeMap<&'static str, JobStats>>>;

struct Entry {
    job: Arc<dyn ScheduledJob>,
    interval: Duration,
}

/// Runs registered jobs, each on its own thread and interval.
///
/// The backend and the log sink are owned by the scheduler and shared by all
/// job threads.
pub struct JobScheduler {
    backend: Arc<dyn CrmBackend>,
    sink: Arc<dyn JobLogSink>,
    entries: Vec<Entry>,
    stats: SharedStats,
}

impl JobScheduler {
    pub fn new(backend: Arc<dyn CrmBackend>, sink: Arc<dyn JobLogSink>) -> Self {
        Self {
            backend,
            sink,
            entries: Vec::new(),
            stats: Arc::new(Mutex::new(BTreeMap::new())),
        }
    }

    /// Scheduler with the heartbeat, restock, reminders and report jobs.
    pub fn with_crm_jobs(
        backend: Arc<dyn CrmBackend>,
        sink: Arc<dyn JobLogSink>,
        config: &SchedulerConfig,
    ) -> Self {
        Self::new(backend, sink)
            .register(Heartbeat::new(config.heartbeat_probe), config.heartbeat_interval)
            .register(RestockLowStock, config.restock_interval)
            .register(OrderReminders::default(), config.reminders_interval)
            .register(GenerateReport, config.report_interval)
    }

    /// Add a job. A job registered twice keeps only the last interval.
    pub fn register<J>(mut self, job: J, interval: Duration) -> Self
    where
        J: ScheduledJob + 'static,
    {
        self.entries.retain(|e| e.job.name() != job.name());
        self.entries.push(Entry {
            job: Arc::new(job),
            interval,
        });
        self
    }

    pub fn job_names(&self) -> Vec<&'static str> {
        self.entries.iter().map(|e| e.job.name()).collect()
    }

    /// Run one job now, on the calling thread. `None` for an unknown name.
    pub fn run_once(&self, name: &str) -> Option<JobRun> {
        let entry = self.entries.iter().find(|e| e.job.name() == name)?;
        Some(execute(
            entry.job.as_ref(),
            self.backend.as_ref(),
            self.sink.as_ref(),
            &self.stats,
        ))
    }

    pub fn stats(&self) -> BTreeMap<&'static str, JobStats> {
        snapshot(&self.stats)
    }

    /// Start one thread per job. The first run of each job happens one
    /// interval after start.
    pub fn spawn(self) -> io::Result<JobSchedulerHandle> {
        let mut workers = Vec::with_capacity(self.entries.len());

        for entry in self.entries {
            let (shutdown_tx, shutdown_rx) = mpsc::channel::<()>();
            let backend = self.backend.clone();
            let sink = self.sink.clone();
            let stats = self.stats.clone();
            let name = entry.job.name();

            let spawned = thread::Builder::new()
                .name(format!("job-{name}"))
                .spawn(move || job_loop(entry, backend, sink, stats, shutdown_rx));

            match spawned {
                Ok(join) => workers.push(Worker {
                    name,
                    shutdown: shutdown_tx,
                    join,
                }),
                Err(e) => {
                    // Do not leave already started threads behind.
                    JobSchedulerHandle {
                        workers,
                        stats: self.stats.clone(),
                    }
                    .shutdown();
                    return Err(e);
                }
            }
        }

        info!(jobs = workers.len(), "job scheduler started");
        Ok(JobSchedulerHandle {
            workers,
            stats: self.stats,
        })
    }
}

#[derive(Debug)]
struct Worker {
    name: &'static str,
    shutdown: mpsc::Sender<()>,
    join: thread::JoinHandle<()>,
}

/// Handle to a running scheduler.
#[derive(Debug)]
pub struct JobSchedulerHandle {
    workers: Vec<Worker>,
    stats: SharedStats,
}

impl JobSchedulerHandle {
    /// Stop all job threads, waiting for in-flight runs to finish.
    ///
    /// Returns the names of the jobs whose thread had died from a panic.
    pub fn shutdown(self) -> Vec<&'static str> {
        for w in &self.workers {
            let _ = w.shutdown.send(());
        }
        let mut died = Vec::new();
        for w in self.workers {
            if w.join.join().is_err() {
                error!(job = w.name, "job thread had panicked");
                died.push(w.name);
            }
        }
        info!("job scheduler stopped");
        died
    }

    pub fn stats(&self) -> BTreeMap<&'static str, JobStats> {
        snapshot(&self.stats)
    }
}

fn snapshot(stats: &SharedStats) -> BTreeMap<&'static str, JobStats> {
    stats.lock().unwrap_or_else(PoisonError::into_inner).clone()
}

fn job_loop(
    entry: Entry,
    backend: Arc<dyn CrmBackend>,
    sink: Arc<dyn JobLogSink>,
    stats: SharedStats,
    shutdown_rx: mpsc::Receiver<()>,
) {
    let name = entry.job.name();
    info!(job = name, interval_secs = entry.interval.as_secs(), "job thread started");

    // `None` once the next tick lies past the clock's range: the job never
    // comes due and the thread only waits for shutdown.
    let mut next_tick = Instant::now().checked_add(entry.interval);
    loop {
        let signal = match next_tick {
            Some(at) => shutdown_rx.recv_timeout(at.saturating_duration_since(Instant::now())),
            None => shutdown_rx
                .recv()
                .map_err(|_| mpsc::RecvTimeoutError::Disconnected),
        };
        match signal {
            Err(mpsc::RecvTimeoutError::Timeout) => {}
            // Shutdown requested, or the handle is gone.
            Ok(()) | Err(mpsc::RecvTimeoutError::Disconnected) => break,
        }

        execute(entry.job.as_ref(), backend.as_ref(), sink.as_ref(), &stats);

        next_tick = next_tick.and_then(|tick| next_after(tick, entry.interval, Instant::now()));
    }

    info!(job = name, "job thread stopped");
}

/// First tick after `now` on the grid `tick + k * interval`, keeping a stable
/// cadence when a run overran. `None` past the clock's range.
fn next_after(mut tick: Instant, interval: Duration, now: Instant) -> Option<Instant> {
    let step = interval.max(Duration::from_millis(1));
    while tick <= now {
        tick = tick.checked_add(step)?;
    }
    Some(tick)
}

/// One isolated run: errors and panics end up in the returned run and the
/// job log, never in the caller.
fn execute(
    job: &dyn ScheduledJob,
    backend: &dyn CrmBackend,
    sink: &dyn JobLogSink,
    stats: &SharedStats,
) -> JobRun {
    let name = job.name();
    let mut run = JobRun::scheduled(name);
    run.mark_running();
    info!(job = name, "job run started");

    let outcome = panic::catch_unwind(AssertUnwindSafe(|| job.run(backend)))
        .unwrap_or_else(|payload| Err(JobError::Panicked(panic_message(payload.as_ref()))));

    let record = match &outcome {
        Ok(record) => record.clone(),
        Err(e) => job.failure_record(e),
    };
    let stamp = Local::now().format(TIMESTAMP_FORMAT).to_string();
    let text = record.render(&stamp);
    let written = panic::catch_unwind(AssertUnwindSafe(|| sink.append(job.log_file(), &text)))
        .unwrap_or_else(|payload| Err(io::Error::other(panic_message(payload.as_ref()))))
        .map_err(|e| JobError::LogWrite(e.to_string()));

    match outcome.and(written) {
        Ok(()) => {
            run.mark_succeeded();
            info!(job = name, duration_ms = run.duration_ms, "job run succeeded");
        }
        Err(e) => {
            run.mark_failed(e.to_string());
            if matches!(e, JobError::Panicked(_)) {
                error!(job = name, error = %e, "job run panicked");
            } else {
                warn!(job = name, error = %e, "job run failed");
            }
        }
    }

    let mut all = stats.lock().unwrap_or_else(PoisonError::into_inner);
    let s = all.entry(name).or_default();
    s.runs += 1;
    if run.succeeded() {
        s.succeeded += 1;
    } else {
        s.failed += 1;
    }
    s.last_run = Some(run.clone());

    run
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
