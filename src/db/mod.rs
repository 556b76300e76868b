pub mod initialize;
pub mod log;
pub mod queries;
pub mod stats;
pub mod store;
