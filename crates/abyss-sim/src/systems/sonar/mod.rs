//! Active sonar: a rotating sweep line that reveals contacts from the last ping.
//!
//! - `sweep`: per-tick sweep advance, expiry and reveal
//! - `detection`: the ping scan (entity pass + terrain pass) and classification

pub mod detection;
pub mod sweep;

pub use detection::{classify, relative_bearing, scan};
pub use sweep::tick;
