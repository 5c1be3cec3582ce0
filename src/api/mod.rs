mod chart_model;
mod engine;
mod engine_config;

pub use chart_model::ChartModel;
pub use engine::{ChartEngine, SelectionListener};
pub use engine_config::{AxisConfig, ChartEngineConfig, EdgeInsets};
