pub mod batch;
pub mod resolve;
pub mod transition;
