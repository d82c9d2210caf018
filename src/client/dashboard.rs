use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use super::animation::{AnimationState, Animator, ChartSeries};
use super::api_client::SummaryClient;
use super::history_table::build_history_rows;
use super::metrics::MetricCards;
use super::surfaces::{ChartSurface, MetricSurface, TableSurface};
use crate::errors::ClientResult;
use crate::payload::SummaryPayload;

/// Everything the dashboard draws onto
#[derive(Clone)]
pub struct DashboardSurfaces {
    pub metrics: Arc<dyn MetricSurface>,
    pub bar_chart: Arc<dyn ChartSurface>,
    pub line_chart: Arc<dyn ChartSurface>,
    pub table: Arc<dyn TableSurface>,
}

/// Drives one upload cycle: metrics, then the animation, then the history table
pub struct Dashboard {
    client: SummaryClient,
    metrics: Arc<dyn MetricSurface>,
    table: Arc<dyn TableSurface>,
    animator: Animator,
}

impl Dashboard {
    pub fn new(client: SummaryClient, surfaces: DashboardSurfaces, tick: Duration) -> Self {
        Self {
            client,
            metrics: surfaces.metrics,
            table: surfaces.table,
            animator: Animator::new(surfaces.bar_chart, surfaces.line_chart, tick),
        }
    }

    pub fn animator(&self) -> &Animator {
        &self.animator
    }

    /// Upload `path` and present the response.
    ///
    /// On error nothing is drawn and the dashboard stays where it was.
    pub async fn run_upload(&self, path: &Path) -> ClientResult<SummaryPayload> {
        let payload = self.client.upload_file(path).await.map_err(|e| {
            warn!("Upload of {} failed: {}", path.display(), e);
            e
        })?;
        info!(
            "Received summary: {} rows, {} types, {} history entries",
            payload.total_count,
            payload.type_distribution.len(),
            payload.history.len()
        );
        self.present(&payload).await;
        Ok(payload)
    }

    /// Set the metric cards, then restart the animation with the history
    /// table queued for its completion.
    pub async fn present(&self, payload: &SummaryPayload) {
        self.metrics.show_metrics(&MetricCards::from_payload(payload));

        let rows = build_history_rows(&payload.history);
        let table = self.table.clone();
        self.animator
            .start(
                ChartSeries::from_distribution(&payload.type_distribution),
                move || table.replace_rows(&rows),
            )
            .await;
    }

    /// Resolve once no run is in progress
    pub async fn wait_until_complete(&self) -> AnimationState {
        let mut states = self.animator.subscribe();
        let settled = states
            .wait_for(|state| !state.is_running())
            .await
            .map(|state| *state);
        settled.unwrap_or_else(|_| self.animator.state())
    }
}
