//! Encoding of single framed records.

use crate::type_code::encode_value;
use crate::{Error, MessageFormat, Result, Value, RECORD_HEADER_SIZE};

/// The two bytes that begin every record (0x95A3, little-endian).
pub const SYNC_BYTES: [u8; 2] = [0xa3, 0x95];

/// Encode one record of `format` into `buf` from `values`.
///
/// The record is the two sync bytes, the message id, then every column
/// in order. `values` must hold exactly one entry per column, each
/// compatible with its column's type code. `buf` must fit the whole
/// record ([`RECORD_HEADER_SIZE`] + [`MessageFormat::size`] bytes; a
/// [`MAX_MESSAGE_LENGTH`](crate::MAX_MESSAGE_LENGTH) scratch always
/// does). Nothing is allocated.
///
/// Returns the number of bytes written.
pub fn encode_record(format: &MessageFormat, buf: &mut [u8], values: &[Value]) -> Result<usize> {
	if values.len() != format.column_count() {
		return Err(Error::Invalid);
	}
	let total = RECORD_HEADER_SIZE + format.size() as usize;
	if buf.len() < total {
		return Err(Error::Invalid);
	}

	buf[0] = SYNC_BYTES[0];
	buf[1] = SYNC_BYTES[1];
	buf[2] = format.id();

	let mut at = RECORD_HEADER_SIZE;
	for (column, value) in format.columns().zip(values) {
		let size = column.size();
		encode_value(column.type_code(), value, &mut buf[at..at + size])?;
		at += size;
	}

	Ok(at)
}
