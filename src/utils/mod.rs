pub mod discovery;
pub mod failure_log;
pub mod placement;
pub mod processing;
