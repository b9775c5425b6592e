pub mod controller;
pub mod highlight;

pub use controller::{error_banner, SearchController, SearchOutcome, SearchState};
pub use highlight::{highlight, Segment};
