// Scenario tests for the consultation escrow lifecycle
pub mod utils;
mod reserve;
