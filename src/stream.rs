//! Byte sinks and sources for log streams.

use std::io::{Read, Write};
use std::path::Path;

use crate::{Error, Result};

const INITIAL_BUFFER_CAPACITY: usize = 16;

/// A byte sink receiving one session of log records at a time.
///
/// Partial writes are legal; [`Writer`](crate::Writer) retries until a
/// record is fully written.
pub trait OutputStream {
	/// Called once before the first byte of a session.
	fn begin_session(&mut self) -> Result<()> {
		Ok(())
	}

	/// Write some prefix of `buf`, returning how many bytes were taken.
	fn write(&mut self, buf: &[u8]) -> Result<usize>;

	/// Push buffered bytes toward the destination.
	fn flush(&mut self) -> Result<()> {
		Ok(())
	}

	/// Called once after the last byte of a session.
	fn end_session(&mut self) -> Result<()> {
		Ok(())
	}
}

/// A byte source.
pub trait InputStream {
	/// Read into `buf`, returning the count delivered.
	///
	/// `Ok(0)` is legal for a source with nothing ready right now;
	/// exhaustion is reported as [`Error::Eof`]. A short read that
	/// still delivered bytes is a success even at the end of the
	/// source, and the following read reports `Eof`.
	fn read(&mut self, buf: &mut [u8]) -> Result<usize>;
}

/// A stream over a file on disk.
pub struct FileStream {
	file: std::fs::File,
}

impl FileStream {
	/// Create a file (truncating any existing one) to write a log into.
	pub fn create<P: AsRef<Path>>(path: P) -> Result<FileStream> {
		let file = std::fs::File::create(path).map_err(Error::Io)?;
		Ok(FileStream { file })
	}

	/// Open an existing log file for reading.
	pub fn open<P: AsRef<Path>>(path: P) -> Result<FileStream> {
		let file = std::fs::File::open(path).map_err(Error::Io)?;
		Ok(FileStream { file })
	}

	/// Wrap an already opened file.
	pub fn new(file: std::fs::File) -> FileStream {
		FileStream { file }
	}

	pub fn into_inner(self) -> std::fs::File {
		self.file
	}
}

impl OutputStream for FileStream {
	fn write(&mut self, buf: &[u8]) -> Result<usize> {
		self.file.write(buf).map_err(Error::Write)
	}

	fn flush(&mut self) -> Result<()> {
		self.file.flush().map_err(Error::Io)
	}

	fn end_session(&mut self) -> Result<()> {
		self.file.sync_all().map_err(Error::Io)
	}
}

impl InputStream for FileStream {
	fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
		let n = self.file.read(buf).map_err(Error::Read)?;
		if n == 0 && !buf.is_empty() {
			return Err(Error::Eof);
		}
		Ok(n)
	}
}

/// An in-memory stream that grows as records are written.
///
/// Storage starts at 16 bytes and doubles as needed. Everything written
/// is visible through [`BufferStream::data`]; reading consumes from the
/// front without disturbing the stored bytes.
#[derive(Default)]
pub struct BufferStream {
	data: Vec<u8>,
	read_pos: usize,
}

impl BufferStream {
	pub fn new() -> BufferStream {
		BufferStream::default()
	}

	/// Wrap existing bytes, e.g. a log already in memory, for reading.
	pub fn from_vec(data: Vec<u8>) -> BufferStream {
		BufferStream { data, read_pos: 0 }
	}

	/// Everything written so far.
	pub fn data(&self) -> &[u8] {
		&self.data
	}

	pub fn len(&self) -> usize {
		self.data.len()
	}

	pub fn is_empty(&self) -> bool {
		self.data.is_empty()
	}

	pub fn into_vec(self) -> Vec<u8> {
		self.data
	}

	fn reserve(&mut self, extra: usize) -> Result<()> {
		let needed = self.data.len() + extra;
		if needed <= self.data.capacity() {
			return Ok(());
		}
		let mut cap = self.data.capacity().max(INITIAL_BUFFER_CAPACITY);
		while cap < needed {
			cap *= 2;
		}
		self.data
			.try_reserve_exact(cap - self.data.len())
			.map_err(|_| Error::NoMemory)
	}
}

impl OutputStream for BufferStream {
	fn write(&mut self, buf: &[u8]) -> Result<usize> {
		self.reserve(buf.len())?;
		self.data.extend_from_slice(buf);
		Ok(buf.len())
	}
}

impl InputStream for BufferStream {
	fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
		let rest = &self.data[self.read_pos..];
		if rest.is_empty() && !buf.is_empty() {
			return Err(Error::Eof);
		}
		let n = rest.len().min(buf.len());
		buf[..n].copy_from_slice(&rest[..n]);
		self.read_pos += n;
		Ok(n)
	}
}

/// Discards everything written; reads as an empty source.
pub struct NullStream;

impl OutputStream for NullStream {
	fn write(&mut self, buf: &[u8]) -> Result<usize> {
		Ok(buf.len())
	}
}

impl InputStream for NullStream {
	fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
		if buf.is_empty() {
			return Ok(0);
		}
		Err(Error::Eof)
	}
}

/// Adapts any [`std::io::Write`] into an [`OutputStream`], for sinks
/// like a [`BufWriter`](std::io::BufWriter) or a socket.
pub struct IoStream<W: std::io::Write> {
	inner: W,
}

impl<W: std::io::Write> IoStream<W> {
	pub fn new(inner: W) -> IoStream<W> {
		IoStream { inner }
	}

	pub fn into_inner(self) -> W {
		self.inner
	}
}

impl<W: std::io::Write> OutputStream for IoStream<W> {
	fn write(&mut self, buf: &[u8]) -> Result<usize> {
		self.inner.write(buf).map_err(Error::Write)
	}

	fn flush(&mut self) -> Result<()> {
		self.inner.flush().map_err(Error::Io)
	}

	fn end_session(&mut self) -> Result<()> {
		self.inner.flush().map_err(Error::Io)
	}
}
