//! Writing of self-describing binary log streams.
//!
//! Every record begins with the sync bytes `0xA3 0x95` and a one-byte
//! message id. The column layout of each id is declared in the stream
//! itself: before an id's first record, the [`Writer`] emits an FMT
//! record (id [`FMT_MESSAGE_ID`]) naming the columns and their type
//! codes, so a consumer can decode the log with no out-of-band schema.
//!
//! ```
//! use sdlog::{BufferStream, MessageFormat, Value, Writer};
//!
//! # fn main() -> sdlog::Result<()> {
//! let mut gps = MessageFormat::new(1, "GPS")?;
//! gps.add_columns("Lat,Lng,Alt", "LLf", "DU")?;
//!
//! let mut writer = Writer::new(BufferStream::new());
//! writer.write(
//! 	&gps,
//! 	&[
//! 		Value::Int(473_977_420),
//! 		Value::Int(85_455_950),
//! 		Value::F32(403.5),
//! 	],
//! )?;
//! let stream = writer.finish()?;
//!
//! // the stream starts with the FMT record announcing GPS
//! assert_eq!(&stream.data()[..3], &[0xa3, 0x95, 128]);
//! # Ok(())
//! # }
//! ```

mod encoder;
mod error;
mod message_format;
mod stream;
mod type_code;
mod value;
mod writer;

pub use encoder::{encode_record, SYNC_BYTES};
pub use error::{error_message, Error, Result};
pub use message_format::{ColumnFormat, MessageFormat, MAX_COLUMNS, MAX_NAME_LENGTH};
pub use stream::{BufferStream, FileStream, InputStream, IoStream, NullStream, OutputStream};
pub use type_code::type_size;
pub use value::Value;
pub use writer::Writer;

#[cfg(test)]
mod tests;

/// Upper bound, in bytes, of one framed record.
pub const MAX_MESSAGE_LENGTH: usize = 256;

/// Number of distinct message ids a stream can carry.
pub const MAX_MESSAGE_FORMATS: usize = 256;

/// Message id of the built-in FMT meta-format.
pub const FMT_MESSAGE_ID: u8 = 128;

/// Sync bytes plus message id, preceding every record's payload.
pub const RECORD_HEADER_SIZE: usize = 3;
