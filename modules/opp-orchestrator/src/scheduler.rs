use std::sync::Arc;
use std::time::Duration;

use opp_adapters::{build_client, SourceRegistry};
use opp_common::config::Config;
use tracing::{error, info, warn};

use crate::scrape::ScrapeOrchestrator;

const HEALTH_CHECK_INTERVAL: Duration = Duration::from_secs(24 * 3600);
const REMINDER_SWEEP_INTERVAL: Duration = Duration::from_secs(6 * 3600);

/// Drives the three background jobs the ingestion core owns: a per-source
/// list-scrape every `scraper_interval_hours`, a daily reachability check
/// of every registered adapter, and a periodic deadline-reminder sweep.
/// The sweep only logs that a batch is due — actual delivery belongs to
/// the notification collaborator outside this core.
pub struct Scheduler {
    orchestrator: Arc<ScrapeOrchestrator>,
    registry: Arc<SourceRegistry>,
    config: Config,
    max_pages: u32,
}

impl Scheduler {
    pub fn new(
        orchestrator: Arc<ScrapeOrchestrator>,
        registry: Arc<SourceRegistry>,
        config: Config,
        max_pages: u32,
    ) -> Self {
        Self {
            orchestrator,
            registry,
            config,
            max_pages,
        }
    }

    /// Spawns the three loops as independent background tasks and returns
    /// immediately; they run for the lifetime of the process.
    pub fn spawn(self: Arc<Self>) {
        self.clone().spawn_scrape_loop();
        self.clone().spawn_health_check_loop();
        self.spawn_reminder_sweep_loop();
    }

    fn spawn_scrape_loop(self: Arc<Self>) {
        let interval = Duration::from_secs(self.config.scraper_interval_hours.max(1) as u64 * 3600);
        info!(hours = self.config.scraper_interval_hours, "scheduled scrape loop starting");

        tokio::spawn(async move {
            loop {
                info!("scheduled scrape: starting run across enabled sources");
                let outcomes = self.orchestrator.scrape_enabled(&self.config, self.max_pages).await;
                for outcome in &outcomes {
                    info!(
                        run_id = %outcome.run_id,
                        status = ?outcome.status,
                        inserted = outcome.inserted,
                        updated = outcome.updated,
                        "scheduled scrape run finished"
                    );
                }

                info!(hours = self.config.scraper_interval_hours, "scheduled scrape: sleeping until next run");
                tokio::time::sleep(interval).await;
            }
        });
    }

    fn spawn_health_check_loop(self: Arc<Self>) {
        tokio::spawn(async move {
            loop {
                self.run_health_check().await;
                tokio::time::sleep(HEALTH_CHECK_INTERVAL).await;
            }
        });
    }

    async fn run_health_check(&self) {
        let client = match build_client() {
            Ok(c) => c,
            Err(e) => {
                error!(error = %e, "health check: failed to build http client");
                return;
            }
        };

        let sources: Vec<(String, String)> = self
            .registry
            .names()
            .filter_map(|name| {
                self.registry
                    .get(name)
                    .map(|s| (name.to_string(), s.adapter.base_url().to_string()))
            })
            .collect();

        for (name, base_url) in sources {
            match client.head(&base_url).send().await {
                Ok(resp) if resp.status().is_success() || resp.status().is_redirection() => {
                    info!(source = %name, status = %resp.status(), "adapter health check ok");
                }
                Ok(resp) => {
                    warn!(source = %name, status = %resp.status(), "adapter health check returned non-success");
                }
                Err(e) => warn!(source = %name, error = %e, "adapter health check failed"),
            }
        }
    }

    fn spawn_reminder_sweep_loop(self: Arc<Self>) {
        tokio::spawn(async move {
            loop {
                info!("deadline reminder sweep due — dispatch belongs to the notification collaborator");
                tokio::time::sleep(REMINDER_SWEEP_INTERVAL).await;
            }
        });
    }
}
