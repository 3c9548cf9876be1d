//! Stats module - group-by-key aggregation

mod calculator;

pub use calculator::{StatsCalculator, SummaryTable};
