//! CLI subcommand implementations.

pub mod closest;
pub mod combine;
pub mod resolve;
pub mod same_team;
pub mod variations;
