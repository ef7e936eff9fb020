//! Job runner
//!
//! Drives the generate-and-save cycle from a recurring schedule and from manual
//! triggers. At most one cycle is in flight at a time: a call that arrives while
//! another is running returns [`RunOutcome::Skipped`] without queuing.

use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

pub mod schedule;
pub mod seed;

pub use schedule::ScheduleSpec;
pub use seed::SeedReport;

use crate::errors::{ScheduleError, ScheduleResult};
use crate::generation::ArticleGenerator;
use crate::models::{Article, NewArticle};
use crate::repositories::ArticleStore;
use crate::utils::time::format_for_display;

/// Result of one generate-and-save attempt
#[derive(Debug, Clone)]
pub enum RunOutcome {
    Created(Article),
    /// Another cycle was already in flight
    Skipped,
    Failed(String),
}

impl RunOutcome {
    pub fn article(&self) -> Option<&Article> {
        match self {
            Self::Created(article) => Some(article),
            _ => None,
        }
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, Self::Skipped)
    }
}

struct ActiveSchedule {
    spec: ScheduleSpec,
    token: CancellationToken,
    handle: JoinHandle<()>,
}

/// Clears the in-progress flag when dropped, including on early return or panic
struct InFlightGuard<'a> {
    flag: &'a AtomicBool,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

#[derive(Clone)]
pub struct JobRunner {
    store: Arc<dyn ArticleStore>,
    generator: Arc<dyn ArticleGenerator>,
    in_progress: Arc<AtomicBool>,
    schedule: Arc<Mutex<Option<ActiveSchedule>>>,
}

impl JobRunner {
    pub fn new(store: Arc<dyn ArticleStore>, generator: Arc<dyn ArticleGenerator>) -> Self {
        Self {
            store,
            generator,
            in_progress: Arc::new(AtomicBool::new(false)),
            schedule: Arc::new(Mutex::new(None)),
        }
    }

    pub fn store(&self) -> &Arc<dyn ArticleStore> {
        &self.store
    }

    /// True while a generate-and-save cycle is in flight
    pub fn is_running(&self) -> bool {
        self.in_progress.load(Ordering::Acquire)
    }

    /// Run one generate-and-save cycle unless one is already in flight
    pub async fn run_once(&self) -> RunOutcome {
        if self
            .in_progress
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            info!("Article generation already in progress, skipping");
            return RunOutcome::Skipped;
        }
        let _guard = InFlightGuard {
            flag: &self.in_progress,
        };

        info!("Starting article generation");
        let generated = self.generator.generate().await;
        debug!("Generated '{}' ({})", generated.title, generated.topic);

        match self.store.create(NewArticle::from(generated)).await {
            Ok(article) => {
                info!("Article generated successfully: {}", article.title);
                RunOutcome::Created(article)
            }
            Err(e) => {
                error!("Failed to save generated article: {}", e);
                RunOutcome::Failed(e.to_string())
            }
        }
    }

    /// On-demand cycle, same guarantees as [`JobRunner::run_once`]
    pub async fn trigger_manual(&self) -> RunOutcome {
        info!("Manual article generation triggered");
        self.run_once().await
    }

    /// Start firing [`JobRunner::run_once`] on `spec`. Only one schedule may be
    /// active; stop the current one first to replace it.
    pub fn start_schedule(&self, spec: ScheduleSpec) -> ScheduleResult<()> {
        let mut active = self.lock_schedule();
        if active.as_ref().is_some_and(|s| !s.handle.is_finished()) {
            return Err(ScheduleError::AlreadyScheduled);
        }

        info!("Scheduling article generation: {}", spec.describe());
        match spec.next_after(Utc::now()) {
            Some(next) => info!("Next run at {}", format_for_display(next, spec.timezone())),
            None => warn!("Schedule {} has no upcoming runs", spec.describe()),
        }

        let token = CancellationToken::new();
        let handle = tokio::spawn(self.clone().schedule_loop(spec.clone(), token.clone()));

        *active = Some(ActiveSchedule {
            spec,
            token,
            handle,
        });
        Ok(())
    }

    /// Cancel future scheduled runs. A run already in flight finishes.
    /// Returns whether a schedule was active.
    pub fn stop(&self) -> bool {
        match self.lock_schedule().take() {
            Some(active) => {
                active.token.cancel();
                info!("Article generation schedule stopped");
                true
            }
            None => false,
        }
    }

    /// Stop the schedule and wait for the schedule task, including any run it
    /// has in flight, to finish
    pub async fn stop_and_wait(&self) {
        let active = self.lock_schedule().take();
        if let Some(active) = active {
            active.token.cancel();
            if let Err(e) = active.handle.await {
                error!("Schedule task ended abnormally: {}", e);
            }
            info!("Article generation schedule stopped");
        }
    }

    /// Next fire time of the active schedule
    pub fn next_run(&self) -> Option<DateTime<Utc>> {
        self.lock_schedule()
            .as_ref()
            .and_then(|active| active.spec.next_after(Utc::now()))
    }

    fn lock_schedule(&self) -> std::sync::MutexGuard<'_, Option<ActiveSchedule>> {
        // The guarded value is replaced wholesale, so a poisoned lock still holds
        // a consistent Option
        self.schedule
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    async fn schedule_loop(self, spec: ScheduleSpec, token: CancellationToken) {
        loop {
            let Some(next) = spec.next_after(Utc::now()) else {
                warn!("Schedule {} has no further runs; stopping", spec.describe());
                break;
            };
            let wait = (next - Utc::now()).to_std().unwrap_or_default();

            tokio::select! {
                _ = token.cancelled() => break,
                _ = tokio::time::sleep(wait) => {}
            }

            info!("Scheduled article generation triggered at {}", Utc::now().to_rfc3339());
            match self.run_once().await {
                RunOutcome::Created(_) | RunOutcome::Skipped => {}
                RunOutcome::Failed(reason) => {
                    warn!("Scheduled run failed, waiting for next tick: {}", reason)
                }
            }

            if token.is_cancelled() {
                break;
            }
        }
        debug!("Schedule loop exited");
    }
}
