//! Document segmentation: per-page parsing, approximate-marker boundary
//! resolution, and token-budgeted chunking.

pub mod boundary;
pub mod chunker;
pub mod pages;
pub mod render;

pub use boundary::resolve_segments;
pub use chunker::chunk;
pub use pages::{extract_skeleton, full_text_with_page_tags, normalize_newlines, parse_raw_pages};
pub use render::render_segmented_md;
