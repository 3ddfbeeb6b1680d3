use std::io::{Cursor, Write};
use std::ops::ControlFlow;
use std::path::Path;

use chrono::Local;
use clap::Parser;
use env_logger::Builder;
use log::LevelFilter;
use rayon::iter::{IntoParallelRefIterator as _, ParallelIterator as _};

use scan_core::pointcloud::point::{Point, PointCloudFrame};
use scan_core::sensor::reading::{LidarReading, SensorReading};
use scan_parser::{decode_all, decode_streaming, DecodeError, FileSource, DEFAULT_CHUNK_RECORDS};
use scan_processor::{process_in_batches, validate_readings};

mod dataset;
mod pipeline;

use dataset::DatasetRoot;
use pipeline::Pipeline;

#[derive(Parser, Debug)]
#[command(
    name = "Scan Ingest",
    about = "Decodes and validates LiDAR point cloud frames from an ONCE-style dataset",
    author = "SecureVision Labs",
    version = "0.0.1"
)]
struct Cli {
    /// Dataset root folder (the one containing data/)
    #[arg(short, long, required = true, value_name = "DIR")]
    dataset: String,

    /// Scene to process; defaults to the first scene found
    #[arg(short, long)]
    scene: Option<String>,

    /// Number of frames to summarize
    #[arg(long, default_value_t = 5)]
    max_frames: usize,

    /// Decode with the constant-memory streaming reader
    #[arg(long, default_value_t = false)]
    streaming: bool,

    /// Records per chunk read in streaming mode
    #[arg(long, default_value_t = DEFAULT_CHUNK_RECORDS)]
    chunk_records: usize,

    /// Readings validated per batch
    #[arg(long, default_value_t = 100)]
    batch_size: usize,

    /// Print the quality report as JSON
    #[arg(long, default_value_t = false)]
    json: bool,
}

struct FrameSummary {
    frame_id: String,
    point_count: usize,
    max_range: f64,
}

fn summarize_file(
    scene_id: &str,
    frame_id: &str,
    path: &Path,
    streaming: bool,
    chunk_records: usize,
) -> Result<FrameSummary, DecodeError> {
    let source = FileSource::open(path)?;

    if streaming {
        let mut point_count = 0usize;
        let mut max_range = 0.0f64;
        decode_streaming(source, chunk_records, |point| {
            point_count += 1;
            max_range = max_range.max(point.range() as f64);
            ControlFlow::Continue(())
        })?;
        Ok(FrameSummary {
            frame_id: frame_id.to_string(),
            point_count,
            max_range,
        })
    } else {
        let points = decode_all(source)?;
        let frame = PointCloudFrame::new(scene_id, frame_id, points);
        Ok(FrameSummary {
            frame_id: frame_id.to_string(),
            point_count: frame.metadata.point_count,
            max_range: frame.metadata.max_range,
        })
    }
}

fn reading_from_summary(summary: &FrameSummary) -> SensorReading {
    SensorReading::Lidar(LidarReading {
        timestamp: summary.frame_id.parse().unwrap_or(0),
        sensor_id: "lidar_roof".to_string(),
        point_count: summary.point_count,
        max_range: summary.max_range,
    })
}

fn report_and_guide(
    summaries: &[FrameSummary],
    batch_size: usize,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    // Readings are built batch by batch so a long scene never has to
    // materialize intermediate collections all at once.
    let readings: Vec<Option<SensorReading>> = process_in_batches(summaries, batch_size, |batch| {
        Ok(batch.iter().map(|s| Some(reading_from_summary(s))).collect())
    })?;

    let report = validate_readings(&readings);

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        for summary in summaries {
            println!(
                "frame {}: {} points, max range {:.1}m",
                summary.frame_id, summary.point_count, summary.max_range
            );
        }
        println!("{}", report);
        for issue in &report.issues {
            println!("  issue: {}", issue);
        }
    }

    let pipeline = Pipeline::with_defaults();
    let valid: Vec<SensorReading> = readings.into_iter().flatten().collect();
    let (fused, objects, guidance) = pipeline.run(valid);
    log::info!(
        "pipeline: {} fused {} readings, {} objects, guidance {:?} ({:.2})",
        fused.algorithm,
        fused.sources.len(),
        objects.len(),
        guidance.action,
        guidance.confidence
    );

    Ok(())
}

fn run(args: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let dataset = DatasetRoot::new(&args.dataset);

    if !dataset.is_available() {
        log::warn!(
            "dataset not found at {}, running synthetic demo instead",
            args.dataset
        );
        return run_synthetic_demo(&args);
    }

    let scene_id = match args.scene.clone() {
        Some(scene) => scene,
        None => dataset
            .scene_ids()?
            .into_iter()
            .next()
            .ok_or("no scenes found in dataset")?,
    };

    let frame_ids = dataset.lidar_frame_ids(&scene_id)?;
    if frame_ids.is_empty() {
        log::warn!(
            "scene {} has annotations only, running synthetic demo instead",
            scene_id
        );
        return run_synthetic_demo(&args);
    }

    let selected: Vec<String> = frame_ids.iter().take(args.max_frames).cloned().collect();
    log::info!(
        "processing scene {}: {} of {} frames",
        scene_id,
        selected.len(),
        frame_ids.len()
    );
    log::debug!(
        "annotation file: {}",
        dataset.annotation_path(&scene_id).display()
    );
    if let Some(first) = selected.first() {
        log::debug!(
            "cam01 image for first frame: {}",
            dataset.camera_image_path(&scene_id, "cam01", first).display()
        );
    }

    let start = std::time::Instant::now();
    let summaries: Vec<FrameSummary> = selected
        .par_iter()
        .map(|frame_id| {
            let path = dataset.lidar_frame_path(&scene_id, frame_id);
            summarize_file(&scene_id, frame_id, &path, args.streaming, args.chunk_records)
        })
        .collect::<Result<Vec<_>, _>>()?;
    log::info!("decoded {} frames in {:?}", summaries.len(), start.elapsed());

    report_and_guide(&summaries, args.batch_size, args.json)
}

/// Deterministic dependency-free generator for the demo path; not meant
/// to be statistically meaningful.
struct Lcg(u64);

impl Lcg {
    fn next_f64(&mut self) -> f64 {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        (self.0 >> 33) as f64 / (1u64 << 31) as f64
    }

    fn next_usize(&mut self, bound: usize) -> usize {
        (self.next_f64() * bound as f64) as usize
    }
}

fn synthetic_frame_bytes(point_count: usize, rng: &mut Lcg) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(point_count * scan_parser::POINT_RECORD_SIZE);
    for _ in 0..point_count {
        // 40-beam sweep shape: full azimuth, 5-120m range.
        let angle = rng.next_f64() * 2.0 * std::f64::consts::PI;
        let elevation = (rng.next_f64() - 0.5) * 0.5;
        let distance = 5.0 + rng.next_f64() * 115.0;
        let point = Point::new(
            (distance * angle.cos()) as f32,
            (distance * angle.sin()) as f32,
            (distance * elevation) as f32,
            (rng.next_f64() * 255.0) as f32,
        );
        for field in [point.x, point.y, point.z, point.intensity] {
            bytes.extend_from_slice(&field.to_le_bytes());
        }
    }
    bytes
}

/// Runs the full decode-validate-guide path on generated frames when no
/// dataset is present.
fn run_synthetic_demo(args: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let frame_ids = [
        "1616004157400",
        "1616004157600",
        "1616004157800",
        "1616004158000",
        "1616004158200",
    ];

    let mut rng = Lcg(42);
    let mut summaries = Vec::new();
    for frame_id in frame_ids {
        let point_count = 45_000 + rng.next_usize(20_000);
        let bytes = synthetic_frame_bytes(point_count, &mut rng);

        let summary = if args.streaming {
            let mut count = 0usize;
            let mut max_range = 0.0f64;
            decode_streaming(Cursor::new(bytes), args.chunk_records, |point| {
                count += 1;
                max_range = max_range.max(point.range() as f64);
                ControlFlow::Continue(())
            })?;
            FrameSummary {
                frame_id: frame_id.to_string(),
                point_count: count,
                max_range,
            }
        } else {
            let frame = PointCloudFrame::new("synthetic", frame_id, decode_all(Cursor::new(bytes))?);
            FrameSummary {
                frame_id: frame_id.to_string(),
                point_count: frame.metadata.point_count,
                max_range: frame.metadata.max_range,
            }
        };
        summaries.push(summary);
    }

    report_and_guide(&summaries, args.batch_size, args.json)
}

fn main() {
    Builder::new()
        .format(|buf, record| {
            writeln!(
                buf,
                "{} [{}] - {}",
                Local::now().format("%Y-%m-%d %H:%M:%S"),
                record.level(),
                record.args()
            )
        })
        .filter(None, LevelFilter::Info)
        .init();

    let args = Cli::parse();

    log::info!("dataset root: {}", args.dataset);
    log::info!(
        "decode mode: {}",
        if args.streaming { "streaming" } else { "eager" }
    );

    if let Err(e) = run(args) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}
