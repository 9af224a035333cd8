// Font bindings, the process-wide registry, and per-request resolution.
// Registration happens once at startup; language fonts with an upstream URL
// may be fetched lazily on first use.

pub mod catalog;
pub mod registry;
pub mod service;

pub use registry::{FontRegistry, LoadedFont};
pub use service::FontService;
