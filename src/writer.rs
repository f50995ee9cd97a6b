//! Session-scoped emission of self-describing record streams.

use std::num::NonZeroU64;

use crate::encoder::encode_record;
use crate::stream::OutputStream;
use crate::{
	MessageFormat, Result, Value, MAX_MESSAGE_FORMATS, MAX_MESSAGE_LENGTH, RECORD_HEADER_SIZE,
};

/// Writes records to an output stream, announcing every message format
/// with an FMT record before the format's first record so that the
/// stream carries its own schema.
///
/// The stream gets a `begin_session`/`end_session` bracket around
/// everything written. The session opens lazily at the first write and
/// closes at [`Writer::end`], [`Writer::finish`], or drop; a write
/// after `end` opens a fresh session that announces its formats anew.
///
/// Formats are announced at most once per session, keyed by message id
/// and the format's identity [`token`](MessageFormat::token). Replacing
/// the columns of an id mid-stream therefore takes a newly built
/// [`MessageFormat`]; the writer never diffs column sets.
pub struct Writer<S: OutputStream> {
	stream: Option<S>,
	scratch: [u8; MAX_MESSAGE_LENGTH],
	announced: [Option<NonZeroU64>; MAX_MESSAGE_FORMATS],
	fmt_meta: MessageFormat,
	has_session: bool,
}

impl<S: OutputStream> Writer<S> {
	pub fn new(stream: S) -> Writer<S> {
		Writer {
			stream: Some(stream),
			scratch: [0; MAX_MESSAGE_LENGTH],
			announced: [None; MAX_MESSAGE_FORMATS],
			fmt_meta: MessageFormat::fmt(),
			has_session: false,
		}
	}

	/// Write one record.
	///
	/// Opens the session if this is the first write, and emits an FMT
	/// record first if `format` has not been announced in this session.
	/// `values` must hold one entry per column, in column order.
	///
	/// On failure the session stays open and the stream may be left
	/// mid-record; the caller decides whether to [`end`](Writer::end)
	/// or abandon the writer.
	pub fn write(&mut self, format: &MessageFormat, values: &[Value]) -> Result<()> {
		self.open_session()?;
		self.announce(format)?;
		let written = encode_record(format, &mut self.scratch, values)?;
		write_all(self.stream.as_mut().expect("writer finished"), &self.scratch[..written])
	}

	/// Write a pre-encoded record verbatim.
	///
	/// Session and announcement handling is the same as for
	/// [`write`](Writer::write); only the encoding step is skipped.
	/// `record` is a complete framed record, normally
	/// [`RECORD_HEADER_SIZE`] + [`MessageFormat::size`] bytes.
	pub fn write_encoded(&mut self, format: &MessageFormat, record: &[u8]) -> Result<()> {
		self.open_session()?;
		self.announce(format)?;
		write_all(self.stream.as_mut().expect("writer finished"), record)
	}

	/// Flush buffered bytes down the stream.
	pub fn flush(&mut self) -> Result<()> {
		self.stream.as_mut().expect("writer finished").flush()
	}

	/// Close the session, if one is open: flush, then end the stream
	/// session. Idempotent; a later write opens a new session.
	pub fn end(&mut self) -> Result<()> {
		if self.has_session {
			let stream = self.stream.as_mut().expect("writer finished");
			stream.flush()?;
			stream.end_session()?;
			self.has_session = false;
		}
		Ok(())
	}

	/// Close any open session and give the stream back.
	pub fn finish(mut self) -> Result<S> {
		self.end()?;
		Ok(self.stream.take().expect("writer finished"))
	}

	fn open_session(&mut self) -> Result<()> {
		if !self.has_session {
			self.announced = [None; MAX_MESSAGE_FORMATS];
			self.stream.as_mut().expect("writer finished").begin_session()?;
			self.has_session = true;
		}
		Ok(())
	}

	fn announce(&mut self, format: &MessageFormat) -> Result<()> {
		let id = format.id() as usize;
		if self.announced[id] != Some(format.token()) {
			self.write_format(format)?;
			self.announced[id] = Some(format.token());
		}
		Ok(())
	}

	/// Emit the FMT record announcing `format`. The declared length is
	/// the full framed size of one future record of that format.
	fn write_format(&mut self, format: &MessageFormat) -> Result<()> {
		let format_string = format.format_string();
		let column_names = format.column_names(",");
		// a format is never constructible past 255 framed bytes, so the
		// one-byte field holds the exact length
		let length = (format.size() as usize + RECORD_HEADER_SIZE) as u8;
		let values = [
			Value::Uint(format.id() as u64),
			Value::Uint(length as u64),
			Value::Str(format.name()),
			Value::Str(&format_string),
			Value::Str(&column_names),
		];
		let written = encode_record(&self.fmt_meta, &mut self.scratch, &values)?;
		write_all(self.stream.as_mut().expect("writer finished"), &self.scratch[..written])
	}
}

impl<S: OutputStream> Drop for Writer<S> {
	fn drop(&mut self) {
		// best effort; finish() reports errors properly
		let _ = self.end();
	}
}

// the stream may underwrite; retry until the record is fully out
fn write_all<S: OutputStream>(stream: &mut S, mut buf: &[u8]) -> Result<()> {
	while !buf.is_empty() {
		let n = stream.write(buf)?;
		buf = &buf[n..];
	}
	Ok(())
}
