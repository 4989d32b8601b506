mod stats;
mod tree;

pub use stats::AlertStats;
pub use tree::{aggregate, AlertLogTree};
