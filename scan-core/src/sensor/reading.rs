use serde::{Deserialize, Serialize};

/// A LiDAR frame summary as seen by the validation layer.
///
/// Validity bounds: a frame with zero points or an implausible point count
/// (>= 2 million, beyond what a 40-beam sensor produces) is corrupted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LidarReading {
    pub timestamp: u64,
    pub sensor_id: String,
    pub point_count: usize,
    pub max_range: f64,
}

impl LidarReading {
    fn is_valid(&self) -> bool {
        self.point_count > 0 && self.point_count < 2_000_000 && self.max_range > 0.0
    }

    fn quality_score(&self) -> f64 {
        // Dense frames with long range score highest; 100k points is the
        // saturation point, 50m the short-range penalty cutoff.
        let density = (self.point_count as f64 / 100_000.0).min(1.0);
        let range_factor = if self.max_range > 50.0 { 1.0 } else { 0.7 };
        density * range_factor
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CameraReading {
    pub timestamp: u64,
    pub sensor_id: String,
    pub width: u32,
    pub height: u32,
    pub brightness: f64,
}

impl CameraReading {
    fn is_valid(&self) -> bool {
        self.width > 0 && self.height > 0 && self.brightness > 0.0
    }

    fn quality_score(&self) -> f64 {
        let resolution = (self.width as f64 * self.height as f64 / (1920.0 * 1080.0)).min(1.0);
        // Near-black and blown-out images are usable but degraded.
        let exposure = if self.brightness > 20.0 && self.brightness < 235.0 {
            1.0
        } else {
            0.5
        };
        (resolution + exposure) / 2.0
    }
}

/// A single sensor observation, polymorphic over the sensor kind.
///
/// Validity and quality are independent axes: a reading can pass
/// `is_valid` while still reporting a low `quality_score`, so callers
/// deciding whether to use a reading must check both.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SensorReading {
    Lidar(LidarReading),
    Camera(CameraReading),
}

impl SensorReading {
    pub fn sensor_id(&self) -> &str {
        match self {
            SensorReading::Lidar(r) => &r.sensor_id,
            SensorReading::Camera(r) => &r.sensor_id,
        }
    }

    pub fn timestamp(&self) -> u64 {
        match self {
            SensorReading::Lidar(r) => r.timestamp,
            SensorReading::Camera(r) => r.timestamp,
        }
    }

    pub fn is_valid(&self) -> bool {
        match self {
            SensorReading::Lidar(r) => r.is_valid(),
            SensorReading::Camera(r) => r.is_valid(),
        }
    }

    /// Normalized fitness score, always within [0.0, 1.0].
    pub fn quality_score(&self) -> f64 {
        let score = match self {
            SensorReading::Lidar(r) => r.quality_score(),
            SensorReading::Camera(r) => r.quality_score(),
        };
        score.clamp(0.0, 1.0)
    }
}
