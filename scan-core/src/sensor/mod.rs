pub mod quality;
pub mod reading;
