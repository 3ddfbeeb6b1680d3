pub mod decoder;
pub mod error;
pub mod source;
pub mod stream;

pub use decoder::{decode_all, decode_points, POINT_RECORD_SIZE};
pub use error::DecodeError;
pub use source::FileSource;
pub use stream::{decode_streaming, PointStream, DEFAULT_CHUNK_RECORDS};
