//! Frame-driven chart animation.
//!
//! One run walks `Idle → Running(frame 1..=20) → Complete`. Each tick draws
//! both charts at `target * frame / 20`. The run is a spawned task owned by
//! the [`Animator`]; starting a new run aborts and joins the previous one
//! before anything else happens, so at most one run ever draws.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use indexmap::IndexMap;
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::debug;

use super::surfaces::{bar_palette, ChartSurface, LINE_COLOR};

pub const FRAME_COUNT: u32 = 20;
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(35);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationState {
    Idle,
    /// `frame` is the next frame to draw
    Running { frame: u32 },
    Complete,
}

impl AnimationState {
    pub fn is_running(&self) -> bool {
        matches!(self, AnimationState::Running { .. })
    }
}

/// Linear scale of `target` at `frame` out of [`FRAME_COUNT`]
pub fn interpolate(target: f64, frame: u32) -> f64 {
    target * f64::from(frame.min(FRAME_COUNT)) / f64::from(FRAME_COUNT)
}

/// Category order and target values, fixed for a whole run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChartSeries {
    categories: Vec<String>,
    targets: Vec<f64>,
}

impl ChartSeries {
    pub fn from_distribution(distribution: &IndexMap<String, u64>) -> Self {
        let (categories, targets) = distribution
            .iter()
            .map(|(label, count)| (label.clone(), *count as f64))
            .unzip();
        Self {
            categories,
            targets,
        }
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn targets(&self) -> &[f64] {
        &self.targets
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    pub fn values_at(&self, frame: u32) -> Vec<f64> {
        self.targets.iter().map(|t| interpolate(*t, frame)).collect()
    }
}

/// Counts live runs; dropped with the task whether it finishes or is aborted
struct RunGuard(Arc<AtomicUsize>);

impl RunGuard {
    fn new(counter: &Arc<AtomicUsize>) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter.clone())
    }
}

impl Drop for RunGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

pub struct Animator {
    bar_chart: Arc<dyn ChartSurface>,
    line_chart: Arc<dyn ChartSurface>,
    tick: Duration,
    state: Arc<watch::Sender<AnimationState>>,
    current: Mutex<Option<JoinHandle<()>>>,
    active_runs: Arc<AtomicUsize>,
}

impl Animator {
    pub fn new(
        bar_chart: Arc<dyn ChartSurface>,
        line_chart: Arc<dyn ChartSurface>,
        tick: Duration,
    ) -> Self {
        let (state, _) = watch::channel(AnimationState::Idle);
        Self {
            bar_chart,
            line_chart,
            tick,
            state: Arc::new(state),
            current: Mutex::new(None),
            active_runs: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn state(&self) -> AnimationState {
        *self.state.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<AnimationState> {
        self.state.subscribe()
    }

    /// Number of runs whose task has not yet finished or been dropped
    pub fn active_runs(&self) -> usize {
        self.active_runs.load(Ordering::SeqCst)
    }

    /// Stop any previous run, then animate `series` from zero to its targets.
    ///
    /// `on_complete` runs once, after frame 20 is drawn and before the state
    /// turns `Complete`. It never runs for a cancelled run.
    pub async fn start<F>(&self, series: ChartSeries, on_complete: F)
    where
        F: FnOnce() + Send + 'static,
    {
        let mut current = self.current.lock().await;
        if let Some(previous) = current.take() {
            stop(previous).await;
        }

        self.state.send_replace(AnimationState::Running { frame: 1 });
        self.bar_chart.begin(series.categories(), series.targets());
        self.line_chart.begin(series.categories(), series.targets());

        let guard = RunGuard::new(&self.active_runs);
        let bar_chart = self.bar_chart.clone();
        let line_chart = self.line_chart.clone();
        let state = self.state.clone();
        let tick = self.tick;

        *current = Some(tokio::spawn(async move {
            let _guard = guard;
            let bar_colors = bar_palette(series.categories().len());
            let line_colors = [LINE_COLOR];

            let mut ticker = interval_at(Instant::now() + tick, tick);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            for frame in 1..=FRAME_COUNT {
                ticker.tick().await;
                let values = series.values_at(frame);
                bar_chart.draw(series.categories(), &values, &bar_colors);
                line_chart.draw(series.categories(), &values, &line_colors);

                if frame < FRAME_COUNT {
                    state.send_replace(AnimationState::Running { frame: frame + 1 });
                }
            }

            on_complete();
            state.send_replace(AnimationState::Complete);
            debug!("Animation complete after {} frames", FRAME_COUNT);
        }));
    }

    /// Stop the current run, if any, and return to `Idle`
    pub async fn cancel(&self) {
        let mut current = self.current.lock().await;
        if let Some(previous) = current.take() {
            stop(previous).await;
            if self.state().is_running() {
                self.state.send_replace(AnimationState::Idle);
            }
        }
    }
}

impl Drop for Animator {
    fn drop(&mut self) {
        if let Some(handle) = self.current.get_mut().take() {
            handle.abort();
        }
    }
}

async fn stop(handle: JoinHandle<()>) {
    handle.abort();
    match handle.await {
        Err(e) if e.is_cancelled() => debug!("Previous animation cancelled"),
        Err(e) => debug!("Previous animation ended abnormally: {}", e),
        Ok(()) => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series() -> ChartSeries {
        let mut distribution = IndexMap::new();
        distribution.insert("A".to_string(), 10);
        distribution.insert("B".to_string(), 20);
        ChartSeries::from_distribution(&distribution)
    }

    #[test]
    fn test_interpolation_is_linear() {
        let series = series();
        for frame in 1..=FRAME_COUNT {
            let f = f64::from(frame);
            assert_eq!(series.values_at(frame), vec![10.0 * f / 20.0, 20.0 * f / 20.0]);
        }
        assert_eq!(series.values_at(FRAME_COUNT), vec![10.0, 20.0]);
    }

    #[test]
    fn test_interpolation_saturates_at_last_frame() {
        assert_eq!(interpolate(7.0, 0), 0.0);
        assert_eq!(interpolate(7.0, 25), 7.0);
    }

    #[test]
    fn test_series_keeps_distribution_order() {
        let mut distribution = IndexMap::new();
        distribution.insert("Valve".to_string(), 3);
        distribution.insert("Pump".to_string(), 1);
        let series = ChartSeries::from_distribution(&distribution);

        assert_eq!(series.categories(), &["Valve".to_string(), "Pump".to_string()]);
        assert_eq!(series.targets(), &[3.0, 1.0]);
        assert!(ChartSeries::default().is_empty());
    }
}
