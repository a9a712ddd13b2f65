//! bosh-stats Core Library
//!
//! Walks a BOSH director's event history to count successful deploys per
//! deployment in a calendar month, and to find when a release first moved
//! to a given version.

pub mod calendar;
pub mod classify;
pub mod config;
pub mod director;
pub mod error;
pub mod format;
pub mod reducer;
pub mod release;
pub mod source;
pub mod types;
pub mod uaa;

// Re-export commonly used items at crate root
pub use calendar::CalendarWindow;
pub use classify::{is_countable_user, is_deployment};
pub use config::{DirectorSettings, PartialSettings, default_config_path};
pub use director::{DEFAULT_PAGE_SIZE, DirectorClient};
pub use error::{BoshStatsError, Result};
pub use format::{
    format_counts_json, format_counts_table, format_transition, format_transition_json,
    friendly_month, total_deploys,
};
pub use reducer::{
    count_deploys, count_successful_deploys, find_release_transition_time,
    find_transition_timestamp, fold_page,
};
pub use release::{ReleaseTransition, ReleaseVersion, is_release_transition};
pub use source::EventSource;
pub use types::{ContextSide, Event, EventsFilter, RunningCount};
pub use uaa::UaaTokenSession;
