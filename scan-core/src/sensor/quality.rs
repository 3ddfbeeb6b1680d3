use serde::{Deserialize, Serialize};

/// Overall data quality classification for a batch of sensor readings,
/// derived from the fraction of readings that pass validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataQuality {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl DataQuality {
    /// Classification thresholds over `valid_count / total_count`.
    /// The boundaries are inclusive: a ratio of exactly 0.5 is Fair.
    pub fn from_valid_ratio(ratio: f64) -> Self {
        if ratio >= 0.9 {
            DataQuality::Excellent
        } else if ratio >= 0.7 {
            DataQuality::Good
        } else if ratio >= 0.5 {
            DataQuality::Fair
        } else {
            DataQuality::Poor
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataQualityReport {
    pub overall_quality: DataQuality,
    pub valid_count: usize,
    pub corrupted_count: usize,
    pub missing_count: usize,
    pub issues: Vec<String>,
}

impl std::fmt::Display for DataQualityReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "DataQualityReport {{ quality: {:?}, valid: {}, corrupted: {}, missing: {} }}",
            self.overall_quality, self.valid_count, self.corrupted_count, self.missing_count
        )
    }
}
