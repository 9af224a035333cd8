// Auto-fit text layout: shaping and ink measurement, the shrink search over
// font sizes, and centered line placement on the fixed canvas.
// Measurement and fitting are CPU-bound; callers run them inside
// tokio::task::spawn_blocking.

pub mod fit;
pub mod placement;
pub mod shaping;

pub use fit::{fit, split_lines, FitResult, LayoutConfig};
pub use placement::line_centers;
pub use shaping::{EstimatedMetrics, TextMeasure};
