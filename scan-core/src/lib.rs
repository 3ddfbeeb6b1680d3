pub mod pointcloud;
pub mod sensor;
