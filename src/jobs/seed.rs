//! Bulk pre-population of an empty store

use serde::Serialize;
use std::time::Duration;
use tracing::{info, warn};

use super::{JobRunner, RunOutcome};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedReport {
    pub created: usize,
    pub skipped: usize,
    pub failed: usize,
    /// The store already held articles, so nothing was generated
    pub already_populated: bool,
}

impl JobRunner {
    /// Generate `count` articles when the store is empty, pausing `delay`
    /// between upstream calls. Cycles go through [`JobRunner::run_once`], so a
    /// scheduled run in flight makes a seed cycle report as skipped.
    pub async fn seed_if_empty(&self, count: usize, delay: Duration) -> SeedReport {
        let existing = self.store().count().await;
        if existing > 0 {
            info!("Store already holds {} articles, skipping seed", existing);
            return SeedReport {
                already_populated: true,
                ..SeedReport::default()
            };
        }

        info!("Seeding {} articles", count);
        let mut report = SeedReport::default();

        for i in 0..count {
            if i > 0 && !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }

            match self.run_once().await {
                RunOutcome::Created(article) => {
                    report.created += 1;
                    info!("Seeded article {}/{}: {}", i + 1, count, article.title);
                }
                RunOutcome::Skipped => report.skipped += 1,
                RunOutcome::Failed(reason) => {
                    report.failed += 1;
                    warn!("Seed article {}/{} failed: {}", i + 1, count, reason);
                }
            }
        }

        info!(
            "Seeding complete: {} created, {} skipped, {} failed",
            report.created, report.skipped, report.failed
        );
        report
    }
}
