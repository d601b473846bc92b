// Observability: metrics recording and rendering

pub mod metrics;

pub use self::metrics::{init as init_metrics, render as render_metrics};
