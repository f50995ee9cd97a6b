//! Error and result types.

/// A reason an operation on a format, record, or stream failed.
///
/// Every variant has a stable numeric code, see [`Error::code`].
#[derive(Debug, thiserror::Error)]
pub enum Error {
	/// An unspecified failure
	#[error("operation failed")]
	Failure,
	/// An allocation could not be satisfied
	#[error("out of memory")]
	NoMemory,
	/// A malformed argument, or a value that does not match its column type
	#[error("invalid argument")]
	Invalid,
	/// A fixed capacity (column count, record length) would be exceeded
	#[error("limit exceeded")]
	Limit,
	/// The underlying stream failed while reading
	#[error("read error: {0}")]
	Read(#[source] std::io::Error),
	/// The underlying stream failed while writing
	#[error("write error: {0}")]
	Write(#[source] std::io::Error),
	/// The underlying stream failed in some other way
	#[error("input/output error: {0}")]
	Io(#[source] std::io::Error),
	/// The type code is reserved but has no encoding
	#[error("not implemented")]
	Unimplemented,
	/// The stream is exhausted (input) or closed (output)
	#[error("end of stream")]
	Eof,
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
	/// The stable numeric code of this error. Code 0 is reserved for
	/// success and never produced here.
	pub fn code(&self) -> u8 {
		match self {
			Error::Failure => 1,
			Error::NoMemory => 2,
			Error::Invalid => 3,
			Error::Limit => 4,
			Error::Read(_) => 5,
			Error::Write(_) => 6,
			Error::Io(_) => 7,
			Error::Unimplemented => 8,
			Error::Eof => 9,
		}
	}
}

const MESSAGES: [&str; 10] = [
	"no error",
	"operation failed",
	"out of memory",
	"invalid argument",
	"limit exceeded",
	"read error",
	"write error",
	"input/output error",
	"not implemented",
	"end of stream",
];

/// The message for a numeric error code, 0 meaning success.
///
/// An out-of-range code gets the generic failure message.
pub fn error_message(code: u8) -> &'static str {
	MESSAGES.get(code as usize).copied().unwrap_or(MESSAGES[1])
}
