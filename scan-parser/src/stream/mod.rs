use std::io::Read;
use std::ops::ControlFlow;

use scan_core::pointcloud::point::Point;

use crate::decoder::{decode_record, POINT_RECORD_SIZE};
use crate::error::DecodeError;

/// Records decoded per chunk read. 4096 records is 65536 bytes, a balance
/// between I/O call count and resident memory.
pub const DEFAULT_CHUNK_RECORDS: usize = 4096;

/// Chunked pull reader over a point cloud byte source.
///
/// Memory is bounded by the chunk size regardless of source length: the
/// buffer is filled one read at a time and complete records are decoded
/// out of it before the next read. Bytes left over from a short read are
/// carried to the front of the buffer, so records split across reads
/// decode normally. A zero-byte read ends the stream; an incomplete
/// record at the tail is dropped, matching [`crate::decode_all`].
pub struct PointStream<R: Read> {
    source: R,
    buf: Vec<u8>,
    filled: usize,
    pos: usize,
    eof: bool,
}

impl<R: Read> PointStream<R> {
    pub fn new(source: R) -> Self {
        Self::with_chunk_records(source, DEFAULT_CHUNK_RECORDS)
    }

    pub fn with_chunk_records(source: R, chunk_records: usize) -> Self {
        let chunk_records = chunk_records.max(1);
        Self {
            source,
            buf: vec![0; chunk_records * POINT_RECORD_SIZE],
            filled: 0,
            pos: 0,
            eof: false,
        }
    }

    /// Next point in file order, `Ok(None)` at end of stream.
    pub fn next_point(&mut self) -> Result<Option<Point>, DecodeError> {
        while self.filled - self.pos < POINT_RECORD_SIZE {
            if self.eof {
                return Ok(None);
            }
            self.refill()?;
        }

        let record = &self.buf[self.pos..self.pos + POINT_RECORD_SIZE];
        let point = decode_record(record);
        self.pos += POINT_RECORD_SIZE;
        Ok(Some(point))
    }

    fn refill(&mut self) -> Result<(), DecodeError> {
        self.buf.copy_within(self.pos..self.filled, 0);
        self.filled -= self.pos;
        self.pos = 0;

        let read = self.source.read(&mut self.buf[self.filled..])?;
        if read == 0 {
            self.eof = true;
        } else {
            self.filled += read;
        }
        Ok(())
    }
}

/// Drives a [`PointStream`] through a per-point callback.
///
/// The callback runs synchronously on the calling thread, strictly
/// sequentially, once per decoded point in file order; returning
/// `ControlFlow::Break(())` stops the traversal early. A read failure
/// aborts the traversal and is returned to the caller, so a successful
/// callback invocation never implies the whole source was processed.
/// Returns the number of points delivered.
pub fn decode_streaming<R, F>(
    source: R,
    chunk_records: usize,
    mut on_point: F,
) -> Result<u64, DecodeError>
where
    R: Read,
    F: FnMut(Point) -> ControlFlow<()>,
{
    let mut stream = PointStream::with_chunk_records(source, chunk_records);
    let mut delivered = 0u64;

    while let Some(point) = stream.next_point()? {
        delivered += 1;
        if on_point(point).is_break() {
            break;
        }
    }

    Ok(delivered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    use crate::decoder::tests::{encode, synthetic_points, FailingSource};
    use crate::decoder::{decode_all, decode_points};

    fn collect_streaming(bytes: &[u8], chunk_records: usize) -> Vec<Point> {
        let mut points = Vec::new();
        decode_streaming(Cursor::new(bytes), chunk_records, |p| {
            points.push(p);
            ControlFlow::Continue(())
        })
        .unwrap();
        points
    }

    #[test]
    fn test_streaming_matches_eager_for_any_chunk_size() {
        let bytes = encode(&synthetic_points(1000));
        let eager = decode_all(Cursor::new(bytes.clone())).unwrap();

        for chunk_records in [1, 3, 7, 1000, 4096] {
            let streamed = collect_streaming(&bytes, chunk_records);
            assert_eq!(streamed, eager, "chunk size {} changed the result", chunk_records);
        }
    }

    #[test]
    fn test_streaming_drops_trailing_partial_record() {
        let mut bytes = encode(&synthetic_points(10));
        bytes.extend_from_slice(&[0xFF; 9]);

        let streamed = collect_streaming(&bytes, 4);
        assert_eq!(streamed.len(), 10);
        assert_eq!(streamed, decode_points(&bytes));
    }

    #[test]
    fn test_streaming_empty_source_never_invokes_callback() {
        let mut calls = 0;
        let delivered = decode_streaming(Cursor::new(Vec::new()), 4096, |_| {
            calls += 1;
            ControlFlow::Continue(())
        })
        .unwrap();

        assert_eq!(delivered, 0);
        assert_eq!(calls, 0);
    }

    #[test]
    fn test_streaming_record_split_across_reads() {
        // Source yields 10 bytes per read, so every record straddles a
        // read boundary and must be reassembled from the carry-over.
        struct DribbleSource {
            bytes: Vec<u8>,
            pos: usize,
        }

        impl Read for DribbleSource {
            fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
                let n = 10.min(self.bytes.len() - self.pos).min(buf.len());
                buf[..n].copy_from_slice(&self.bytes[self.pos..self.pos + n]);
                self.pos += n;
                Ok(n)
            }
        }

        let records = synthetic_points(33);
        let bytes = encode(&records);
        let expected = decode_points(&bytes);

        let mut points = Vec::new();
        let delivered = decode_streaming(DribbleSource { bytes, pos: 0 }, 8, |p| {
            points.push(p);
            ControlFlow::Continue(())
        })
        .unwrap();

        assert_eq!(delivered, 33);
        assert_eq!(points, expected);
    }

    #[test]
    fn test_streaming_early_exit() {
        let bytes = encode(&synthetic_points(100));

        let mut seen = 0;
        let delivered = decode_streaming(Cursor::new(bytes), 16, |_| {
            seen += 1;
            if seen == 5 {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        })
        .unwrap();

        assert_eq!(seen, 5);
        assert_eq!(delivered, 5);
    }

    #[test]
    fn test_streaming_read_error_aborts() {
        let mut calls = 0;
        let result = decode_streaming(FailingSource, 4096, |_| {
            calls += 1;
            ControlFlow::Continue(())
        });

        assert!(matches!(result, Err(DecodeError::Read(_))));
        assert_eq!(calls, 0);
    }

    #[test]
    fn test_point_stream_over_file() {
        use std::io::Write as _;

        let records = synthetic_points(4097);
        let bytes = encode(&records);

        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&bytes).unwrap();

        let source = crate::source::FileSource::open(file.path()).unwrap();
        let mut stream = PointStream::new(source);

        let mut count = 0usize;
        while let Some(point) = stream.next_point().unwrap() {
            let expected = records[count];
            assert_eq!(point, Point::new(expected[0], expected[1], expected[2], expected[3]));
            count += 1;
        }
        assert_eq!(count, 4097);
    }
}
