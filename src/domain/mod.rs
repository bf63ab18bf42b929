pub mod batch;
pub mod state;
pub mod ticket;
