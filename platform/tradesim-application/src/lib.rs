pub mod config;
pub mod monitoring;
pub mod reporting;
pub mod shared;
pub mod validation;
