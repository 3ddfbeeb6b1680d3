use scan_core::sensor::quality::{DataQuality, DataQualityReport};
use scan_core::sensor::reading::SensorReading;

/// Valid readings scoring below this are flagged as quality issues while
/// still counting as valid.
pub const LOW_QUALITY_THRESHOLD: f64 = 0.7;

/// Scores a collection of sensor readings in a single pass.
///
/// Every entry is classified as exactly one of missing (`None`),
/// corrupted (fails its own validity check), or valid. The overall
/// classification depends only on the valid fraction; an empty input is
/// the distinguished "no data" case and is always Poor.
pub fn validate_readings(readings: &[Option<SensorReading>]) -> DataQualityReport {
    if readings.is_empty() {
        return DataQualityReport {
            overall_quality: DataQuality::Poor,
            valid_count: 0,
            corrupted_count: 0,
            missing_count: 0,
            issues: vec!["no sensor readings provided".to_string()],
        };
    }

    let mut valid_count = 0;
    let mut corrupted_count = 0;
    let mut missing_count = 0;
    let mut issues = Vec::new();

    for entry in readings {
        let reading = match entry {
            Some(reading) => reading,
            None => {
                missing_count += 1;
                issues.push("missing sensor reading detected".to_string());
                continue;
            }
        };

        if !reading.is_valid() {
            corrupted_count += 1;
            issues.push(format!("invalid sensor reading: {}", reading.sensor_id()));
            continue;
        }

        let score = reading.quality_score();
        if score < LOW_QUALITY_THRESHOLD {
            issues.push(format!(
                "low quality sensor: {} (score: {:.2})",
                reading.sensor_id(),
                score
            ));
        }

        valid_count += 1;
    }

    let valid_ratio = valid_count as f64 / readings.len() as f64;
    DataQualityReport {
        overall_quality: DataQuality::from_valid_ratio(valid_ratio),
        valid_count,
        corrupted_count,
        missing_count,
        issues,
    }
}
