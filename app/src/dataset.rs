use std::fs;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("dataset folder not found: {0}")]
    NotFound(PathBuf),
    #[error("scene {0} has no lidar_roof folder")]
    NoLidarFolder(String),
    #[error("failed to list dataset folder")]
    Io(#[from] std::io::Error),
    #[error("invalid frame pattern")]
    Pattern(#[from] glob::PatternError),
}

/// Navigates the ONCE-style dataset folder layout:
/// `{root}/data/{scene}/lidar_roof/{frame}.bin`, camera images under
/// `{root}/data/{scene}/{camera}/{frame}.jpg`, one annotation JSON per
/// scene. Scene folders are six-digit names, frame names are epoch-
/// millisecond timestamps, so lexicographic order is chronological.
pub struct DatasetRoot {
    root: PathBuf,
}

impl DatasetRoot {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn data_dir(&self) -> PathBuf {
        self.root.join("data")
    }

    fn scene_dir(&self, scene_id: &str) -> PathBuf {
        self.data_dir().join(scene_id)
    }

    pub fn is_available(&self) -> bool {
        match fs::read_dir(self.data_dir()) {
            Ok(mut entries) => entries.next().is_some(),
            Err(_) => false,
        }
    }

    /// Scene folder names under `data/`, sorted.
    pub fn scene_ids(&self) -> Result<Vec<String>, DatasetError> {
        let data_dir = self.data_dir();
        if !data_dir.is_dir() {
            return Err(DatasetError::NotFound(data_dir));
        }

        let mut scene_ids = Vec::new();
        for entry in fs::read_dir(&data_dir)? {
            let entry = entry?;
            if entry.path().is_dir() {
                scene_ids.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        scene_ids.sort();

        log::info!("found {} scenes in dataset", scene_ids.len());
        Ok(scene_ids)
    }

    /// Frame timestamps for one scene, sorted chronologically.
    pub fn lidar_frame_ids(&self, scene_id: &str) -> Result<Vec<String>, DatasetError> {
        let lidar_dir = self.scene_dir(scene_id).join("lidar_roof");
        if !lidar_dir.is_dir() {
            return Err(DatasetError::NoLidarFolder(scene_id.to_string()));
        }

        let pattern = lidar_dir.join("*.bin");
        let mut frame_ids: Vec<String> = glob::glob(&pattern.to_string_lossy())?
            .filter_map(Result::ok)
            .filter_map(|path| {
                path.file_stem()
                    .map(|stem| stem.to_string_lossy().into_owned())
            })
            .collect();
        frame_ids.sort();

        log::info!("scene {} has {} LiDAR frames", scene_id, frame_ids.len());
        Ok(frame_ids)
    }

    pub fn lidar_frame_path(&self, scene_id: &str, frame_id: &str) -> PathBuf {
        self.scene_dir(scene_id)
            .join("lidar_roof")
            .join(format!("{}.bin", frame_id))
    }

    pub fn camera_image_path(&self, scene_id: &str, camera_id: &str, frame_id: &str) -> PathBuf {
        self.scene_dir(scene_id)
            .join(camera_id)
            .join(format!("{}.jpg", frame_id))
    }

    pub fn annotation_path(&self, scene_id: &str) -> PathBuf {
        self.scene_dir(scene_id).join(format!("{}.json", scene_id))
    }
}
