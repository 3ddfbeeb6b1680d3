pub mod batch;
pub mod quality;

pub use batch::{process_in_batches, BatchError};
pub use quality::validate_readings;
