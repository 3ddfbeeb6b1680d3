use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

/// A point cloud file opened for decoding.
///
/// Opening a missing file fails here, before any decoding starts, which
/// keeps "file not found" distinguishable from "file present but empty".
/// The handle is released when the source is dropped, on every exit path.
pub struct FileSource {
    inner: BufReader<File>,
}

impl FileSource {
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let file = File::open(path)?;
        Ok(Self {
            inner: BufReader::new(file),
        })
    }
}

impl Read for FileSource {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.inner.read(buf)
    }
}
