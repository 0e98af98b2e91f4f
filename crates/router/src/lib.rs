//! Multi-label routing of paper sections to downstream analysis stages:
//! heading extraction, collaborator-proposal merging, keyword rules, and the
//! positional backstop that guarantees full stage coverage.

pub mod bundle;
pub mod fuzzy;
pub mod headings;
pub mod keywords;
pub mod mode;
pub mod report;
pub mod router;

pub use bundle::bundle_stages;
pub use fuzzy::match_title;
pub use headings::extract_headings;
pub use mode::detect_mode;
pub use report::{render_routing_report, render_stage_bundles};
pub use router::{HeadingRouter, RouteTier, RoutingTable};
