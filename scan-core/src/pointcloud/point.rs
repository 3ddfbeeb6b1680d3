use serde::{Deserialize, Serialize};

/// One decoded LiDAR return.
///
/// Coordinates are meters in the sensor frame; intensity is the raw
/// sensor reflectance value (commonly 0-255 but sensor-defined).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub intensity: f32,
}

impl Point {
    pub fn new(x: f32, y: f32, z: f32, intensity: f32) -> Self {
        Self { x, y, z, intensity }
    }

    /// Euclidean distance from the sensor origin.
    pub fn range(&self) -> f32 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }
}

#[derive(Debug, Clone, Default)]
pub struct FrameMetadata {
    pub point_count: usize,
    pub max_range: f64,
}

// Scene and frame identifiers come from the dataset folder layout, not
// from the binary payload, so the caller supplies both.
#[derive(Debug, Clone)]
pub struct PointCloudFrame {
    pub scene_id: String,
    pub frame_id: String,
    pub points: Vec<Point>,
    pub metadata: FrameMetadata,
}

impl PointCloudFrame {
    pub fn new(scene_id: impl Into<String>, frame_id: impl Into<String>, points: Vec<Point>) -> Self {
        let mut max_range = 0.0f64;
        for point in &points {
            max_range = max_range.max(point.range() as f64);
        }

        let metadata = FrameMetadata {
            point_count: points.len(),
            max_range,
        };

        Self {
            scene_id: scene_id.into(),
            frame_id: frame_id.into(),
            points,
            metadata,
        }
    }
}
