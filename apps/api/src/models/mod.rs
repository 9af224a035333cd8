pub mod language;
pub mod render;

pub use language::Language;
pub use render::{RenderRequest, Rgb};
