use std::io::Read;

use scan_core::pointcloud::point::Point;

use crate::error::DecodeError;

/// Bytes per point record: x, y, z, intensity as little-endian f32.
pub const POINT_RECORD_SIZE: usize = 16;

pub(crate) fn decode_record(record: &[u8]) -> Point {
    debug_assert_eq!(record.len(), POINT_RECORD_SIZE);
    let field = |i: usize| {
        let start = i * 4;
        f32::from_le_bytes(record[start..start + 4].try_into().unwrap())
    };
    Point::new(field(0), field(1), field(2), field(3))
}

/// Decodes every complete record in the slice, in order. Trailing bytes
/// that do not fill a whole record are dropped, so the point count is
/// always `bytes.len() / 16`.
pub fn decode_points(bytes: &[u8]) -> Vec<Point> {
    bytes
        .chunks_exact(POINT_RECORD_SIZE)
        .map(decode_record)
        .collect()
}

/// Reads the whole source into memory and decodes it.
///
/// Fine for a single frame; for bulk processing of many frames prefer
/// [`crate::stream::decode_streaming`], which keeps memory bounded by
/// its chunk size.
pub fn decode_all<R: Read>(mut source: R) -> Result<Vec<Point>, DecodeError> {
    let mut bytes = Vec::new();
    source.read_to_end(&mut bytes)?;
    let points = decode_points(&bytes);
    log::debug!("decoded {} points from {} bytes", points.len(), bytes.len());
    Ok(points)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::io::Cursor;

    pub(crate) fn encode(points: &[[f32; 4]]) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(points.len() * POINT_RECORD_SIZE);
        for record in points {
            for field in record {
                bytes.extend_from_slice(&field.to_le_bytes());
            }
        }
        bytes
    }

    /// Deterministic point generator, roughly shaped like a 40-beam scan
    /// (5-120m range, full azimuth sweep).
    pub(crate) fn synthetic_points(count: usize) -> Vec<[f32; 4]> {
        let mut state = 42u64;
        let mut next = move || {
            state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            (state >> 33) as f64 / (1u64 << 31) as f64
        };

        (0..count)
            .map(|_| {
                let angle = next() * 2.0 * std::f64::consts::PI;
                let elevation = (next() - 0.5) * 0.5;
                let distance = 5.0 + next() * 115.0;
                [
                    (distance * angle.cos()) as f32,
                    (distance * angle.sin()) as f32,
                    (distance * elevation) as f32,
                    (next() * 255.0) as f32,
                ]
            })
            .collect()
    }

    #[test]
    fn test_decode_all_returns_points_in_file_order() {
        let bytes = encode(&[
            [1.0, 2.0, 3.0, 100.0],
            [4.0, 5.0, 6.0, 200.0],
            [-7.5, 0.0, 2.25, 0.0],
        ]);

        let points = decode_all(Cursor::new(bytes)).unwrap();
        assert_eq!(points.len(), 3);
        assert_eq!(points[0], Point::new(1.0, 2.0, 3.0, 100.0));
        assert_eq!(points[1], Point::new(4.0, 5.0, 6.0, 200.0));
        assert_eq!(points[2], Point::new(-7.5, 0.0, 2.25, 0.0));
    }

    #[test]
    fn test_decode_all_drops_trailing_partial_record() {
        for extra in 1..POINT_RECORD_SIZE {
            let mut bytes = encode(&[[1.0, 2.0, 3.0, 4.0], [5.0, 6.0, 7.0, 8.0]]);
            bytes.extend(std::iter::repeat(0xAB).take(extra));

            let points = decode_all(Cursor::new(bytes)).unwrap();
            assert_eq!(points.len(), 2, "trailing {} bytes must be dropped", extra);
        }
    }

    #[test]
    fn test_decode_all_empty_source() {
        let points = decode_all(Cursor::new(Vec::new())).unwrap();
        assert!(points.is_empty());
    }

    #[test]
    fn test_decode_points_little_endian_layout() {
        // 1.0f32 = 0x3F800000, little-endian on the wire.
        let bytes = [
            0x00, 0x00, 0x80, 0x3F, // x = 1.0
            0x00, 0x00, 0x00, 0x40, // y = 2.0
            0x00, 0x00, 0x40, 0x40, // z = 3.0
            0x00, 0x00, 0x80, 0x40, // intensity = 4.0
        ];
        let points = decode_points(&bytes);
        assert_eq!(points, vec![Point::new(1.0, 2.0, 3.0, 4.0)]);
    }

    pub(crate) struct FailingSource;

    impl Read for FailingSource {
        fn read(&mut self, _buf: &mut [u8]) -> std::io::Result<usize> {
            Err(std::io::Error::new(
                std::io::ErrorKind::Other,
                "simulated device error",
            ))
        }
    }

    #[test]
    fn test_decode_all_read_error_surfaces() {
        let result = decode_all(FailingSource);
        assert!(matches!(result, Err(DecodeError::Read(_))));
    }

    #[test]
    fn test_synthetic_frame_preserves_count_and_max_range() {
        let records = synthetic_points(45_000);
        let bytes = encode(&records);
        assert_eq!(bytes.len(), 720_000);

        let expected_max = records
            .iter()
            .map(|&[x, y, z, _]| ((x * x + y * y + z * z) as f64).sqrt())
            .fold(0.0f64, f64::max);

        let points = decode_all(Cursor::new(bytes)).unwrap();
        assert_eq!(points.len(), 45_000);

        let decoded_max = points
            .iter()
            .map(|p| p.range() as f64)
            .fold(0.0f64, f64::max);
        assert!((decoded_max - expected_max).abs() < 1e-3);
    }
}
