//! Message formats: ordered, typed, named columns under a one-byte id.

use std::num::NonZeroU64;
use std::sync::atomic::{AtomicU64, Ordering};

use compact_str::CompactString;

use crate::type_code::type_size;
use crate::{Error, Result, FMT_MESSAGE_ID, RECORD_HEADER_SIZE};

/// Maximum number of columns a message format may carry.
pub const MAX_COLUMNS: usize = 255;

/// Maximum length of a message format's name.
pub const MAX_NAME_LENGTH: usize = 4;

const INITIAL_COLUMN_CAPACITY: usize = 4;

static NEXT_TOKEN: AtomicU64 = AtomicU64::new(1);

fn next_token() -> NonZeroU64 {
	NonZeroU64::new(NEXT_TOKEN.fetch_add(1, Ordering::Relaxed)).expect("token counter wrapped")
}

/// One named, typed, unit-tagged column of a message format.
#[derive(Debug, Clone)]
pub struct ColumnFormat {
	name: CompactString,
	type_code: u8,
	unit: u8,
}

impl ColumnFormat {
	fn new(name: &str, type_code: u8, unit: u8) -> Result<ColumnFormat> {
		if type_size(type_code) == 0 {
			return Err(Error::Invalid);
		}
		Ok(ColumnFormat {
			name: name.into(),
			type_code,
			unit,
		})
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	/// The single-character type code of this column.
	pub fn type_code(&self) -> u8 {
		self.type_code
	}

	/// The single-character unit tag, `b'-'` for "no unit".
	pub fn unit(&self) -> u8 {
		self.unit
	}

	/// The wire size of this column in bytes.
	pub fn size(&self) -> usize {
		type_size(self.type_code)
	}
}

/// An ordered list of typed columns, identified by a numeric id and a
/// short name of at most [`MAX_NAME_LENGTH`] characters.
///
/// A format is built once, then handed to [`Writer::write`] by
/// reference; the writer announces it in the stream before its first
/// record. Rebuilding a format for the same id produces a new identity
/// (see [`MessageFormat::token`]), so the writer announces the
/// replacement again.
///
/// [`Writer::write`]: crate::Writer::write
#[derive(Debug)]
pub struct MessageFormat {
	id: u8,
	name: CompactString,
	columns: Vec<ColumnFormat>,
	token: NonZeroU64,
}

impl MessageFormat {
	/// Start a format with no columns.
	///
	/// Fails with [`Error::Invalid`] if `name` is longer than
	/// [`MAX_NAME_LENGTH`] or `id` is the reserved
	/// [`FMT_MESSAGE_ID`] (use [`MessageFormat::fmt`] for that one).
	pub fn new(id: u8, name: &str) -> Result<MessageFormat> {
		if name.len() > MAX_NAME_LENGTH || id == FMT_MESSAGE_ID {
			return Err(Error::Invalid);
		}
		Ok(MessageFormat {
			id,
			name: name.into(),
			columns: Vec::with_capacity(INITIAL_COLUMN_CAPACITY),
			token: next_token(),
		})
	}

	/// The built-in meta-format that announces every other format.
	///
	/// A record of this format declares the layout of one message id:
	/// the id, the total framed record length, the format's name, its
	/// type codes, and its comma-separated column names.
	pub fn fmt() -> MessageFormat {
		let mut meta = MessageFormat {
			id: FMT_MESSAGE_ID,
			name: "FMT".into(),
			columns: Vec::with_capacity(5),
			token: next_token(),
		};
		meta.add_columns("Type,Length,Name,Format,Columns", "BBnNZ", "")
			.expect("meta-format columns");
		meta
	}

	/// Append one column.
	///
	/// Fails with [`Error::Invalid`] on an unknown type code and
	/// [`Error::Limit`] when the column count would be exceeded or the
	/// total framed record length would no longer fit the one-byte
	/// Length field of an FMT record.
	pub fn add_column(&mut self, name: &str, type_code: u8, unit: u8) -> Result<()> {
		let column = ColumnFormat::new(name, type_code, unit)?;
		// the framed length is announced in a single byte
		if self.size() as usize + column.size() + RECORD_HEADER_SIZE > u8::MAX as usize {
			return Err(Error::Limit);
		}
		self.reserve_one()?;
		self.columns.push(column);
		Ok(())
	}

	/// Append several columns at once.
	///
	/// `types` supplies one type code per column and determines the
	/// count. `names` is comma-separated and consumed in order; columns
	/// past the last name get an empty name. `units` lines up with
	/// `types`; missing tail positions get `b'-'`.
	///
	/// Not transactional: columns appended before a failing one remain.
	pub fn add_columns(&mut self, names: &str, types: &str, units: &str) -> Result<()> {
		let mut names = names.split(',');
		let mut units = units.bytes();
		for code in types.bytes() {
			let name = names.next().unwrap_or("");
			let unit = units.next().unwrap_or(b'-');
			self.add_column(name, code, unit)?;
		}
		Ok(())
	}

	// capacity starts at 4 columns, doubles while below 32, then grows
	// in steps of 16, never past MAX_COLUMNS
	fn reserve_one(&mut self) -> Result<()> {
		let len = self.columns.len();
		if len >= MAX_COLUMNS {
			return Err(Error::Limit);
		}
		if len == self.columns.capacity() {
			let cap = self.columns.capacity().max(INITIAL_COLUMN_CAPACITY);
			let grown = if cap < 32 { cap * 2 } else { cap + 16 };
			let grown = grown.min(MAX_COLUMNS);
			self.columns
				.try_reserve_exact(grown - len)
				.map_err(|_| Error::NoMemory)?;
		}
		Ok(())
	}

	pub fn id(&self) -> u8 {
		self.id
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn column_count(&self) -> usize {
		self.columns.len()
	}

	pub fn column(&self, index: usize) -> Option<&ColumnFormat> {
		self.columns.get(index)
	}

	pub fn columns(&self) -> impl Iterator<Item = &ColumnFormat> {
		self.columns.iter()
	}

	/// The identity stamp of this format object.
	///
	/// Distinct per construction: a rebuilt format for the same id gets
	/// a new token, which is what tells the writer to announce the
	/// replacement.
	pub fn token(&self) -> NonZeroU64 {
		self.token
	}

	/// The column type codes in order, as one string.
	pub fn format_string(&self) -> CompactString {
		self.columns.iter().map(|c| c.type_code as char).collect()
	}

	/// All column names joined by `sep`.
	pub fn column_names(&self, sep: &str) -> String {
		let mut out = String::new();
		for (i, column) in self.columns.iter().enumerate() {
			if i > 0 {
				out.push_str(sep);
			}
			out.push_str(column.name());
		}
		out
	}

	/// Total encoded payload of one record, excluding the
	/// [`RECORD_HEADER_SIZE`]-byte header.
	pub fn size(&self) -> u16 {
		self.columns.iter().map(|c| c.size() as u16).sum()
	}
}
