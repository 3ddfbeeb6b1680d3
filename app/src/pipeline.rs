//! Strategy seams for the downstream perception stages.
//!
//! The default implementations here are acknowledged placeholders: they
//! keep the orchestration wired end to end so a real fusion algorithm or
//! detection model can be dropped in behind the same trait without
//! touching the caller.

use scan_core::sensor::reading::SensorReading;

#[derive(Debug, Clone)]
pub struct FusedFrame {
    pub algorithm: String,
    pub confidence: f64,
    pub sources: Vec<SensorReading>,
}

#[derive(Debug, Clone)]
pub struct DetectedObject {
    pub class_name: String,
    pub confidence: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum GuidanceAction {
    ProceedNormally,
    ControlledStop,
}

#[derive(Debug, Clone)]
pub struct Guidance {
    pub action: GuidanceAction,
    pub confidence: f64,
}

pub trait SensorFusion {
    fn fuse(&self, readings: Vec<SensorReading>) -> FusedFrame;
}

pub trait ObjectDetection {
    fn detect(&self, frame: &FusedFrame) -> Vec<DetectedObject>;
}

pub trait NavigationSupport {
    fn guidance(&self, frame: &FusedFrame, objects: &[DetectedObject]) -> Guidance;
}

/// Placeholder fusion: labels the frame and passes the readings through
/// with a fixed confidence.
pub struct EarlyFusion;

impl SensorFusion for EarlyFusion {
    fn fuse(&self, readings: Vec<SensorReading>) -> FusedFrame {
        FusedFrame {
            algorithm: "EARLY_FUSION".to_string(),
            confidence: 0.9,
            sources: readings,
        }
    }
}

/// Placeholder detector: always reports nothing. A real system would run
/// a PointPillars-style model here.
pub struct NoopDetection;

impl ObjectDetection for NoopDetection {
    fn detect(&self, _frame: &FusedFrame) -> Vec<DetectedObject> {
        Vec::new()
    }
}

/// Proceed when the path is clear, otherwise command a controlled stop.
pub struct RuleBasedNavigation;

impl NavigationSupport for RuleBasedNavigation {
    fn guidance(&self, _frame: &FusedFrame, objects: &[DetectedObject]) -> Guidance {
        if objects.is_empty() {
            Guidance {
                action: GuidanceAction::ProceedNormally,
                confidence: 0.95,
            }
        } else {
            Guidance {
                action: GuidanceAction::ControlledStop,
                confidence: 1.0,
            }
        }
    }
}

/// Runs the stages in order over one frame's readings.
pub struct Pipeline {
    fusion: Box<dyn SensorFusion>,
    detection: Box<dyn ObjectDetection>,
    navigation: Box<dyn NavigationSupport>,
}

impl Pipeline {
    pub fn new(
        fusion: Box<dyn SensorFusion>,
        detection: Box<dyn ObjectDetection>,
        navigation: Box<dyn NavigationSupport>,
    ) -> Self {
        Self {
            fusion,
            detection,
            navigation,
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(
            Box::new(EarlyFusion),
            Box::new(NoopDetection),
            Box::new(RuleBasedNavigation),
        )
    }

    pub fn run(&self, readings: Vec<SensorReading>) -> (FusedFrame, Vec<DetectedObject>, Guidance) {
        let fused = self.fusion.fuse(readings);
        log::debug!("sensor fusion completed using: {}", fused.algorithm);

        let objects = self.detection.detect(&fused);
        log::debug!("objects detected: {}", objects.len());

        let guidance = self.navigation.guidance(&fused, &objects);
        (fused, objects, guidance)
    }
}
