pub mod matrix;
pub mod series;
pub mod ticks;
pub mod transformer;
pub mod types;
pub mod viewport;

pub use matrix::AffineMatrix;
pub use series::{AxisSide, DataSeries, Entry, MemorySeries, Rounding, StackRange};
pub use ticks::{AxisTickConfig, TickSet, compute_ticks};
pub use transformer::Transformer;
pub use types::{Orientation, RectF};
pub use viewport::ViewportState;
