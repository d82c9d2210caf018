//! Dashboard side of the upload cycle: the HTTP client, metric cards, the
//! chart animation and the history table.

pub mod animation;
pub mod api_client;
pub mod console;
pub mod dashboard;
pub mod history_table;
pub mod metrics;
pub mod surfaces;

pub use animation::{AnimationState, Animator, ChartSeries, DEFAULT_TICK_INTERVAL, FRAME_COUNT};
pub use api_client::SummaryClient;
pub use dashboard::{Dashboard, DashboardSurfaces};
pub use history_table::{build_history_rows, HistoryRow, TABLE_HEADERS};
pub use metrics::{HealthIndex, MetricCards};
pub use surfaces::{bar_palette, ChartSurface, MetricSurface, TableSurface, BAR_PALETTE, LINE_COLOR};
