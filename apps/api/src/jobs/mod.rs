// Job board: read-only posting sources, dashboard filters and counters.

pub mod filters;
pub mod handlers;
pub mod source;
pub mod stats;
