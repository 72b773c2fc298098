pub mod data_quality;
pub mod runtime;
pub mod simulator;
