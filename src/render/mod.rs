//! Chart renderer seam. Renderers only present a prepared [`Report`].

mod text;

pub use text::TextRenderer;

use fintrack_core::Report;

/// Renders run one at a time in generation order. A renderer may read the
/// session's latest report but must not add entries to the store.
pub trait ChartRenderer: Send + Sync {
    fn render(&self, report: &Report);
}
