//! Wire sizes and encodings of the one-byte column type codes.
//!
//! A column's type is a single ASCII character:
//!
//! * `b`/`B` -> 8-bit signed/unsigned integer
//! * `M` -> flight mode, stored as an unsigned 8-bit integer
//! * `h`/`H` -> 16-bit signed/unsigned integer
//! * `c`/`C` -> 16-bit signed/unsigned fixed point, scale 0.01
//! * `i`/`I` -> 32-bit signed/unsigned integer
//! * `e`/`E` -> 32-bit signed/unsigned fixed point, scale 0.01
//! * `L` -> 32-bit signed geodetic coordinate, scale 1e-7
//! * `q`/`Q` -> 64-bit signed/unsigned integer
//! * `f`/`d` -> IEEE-754 binary32/binary64
//! * `n`/`N`/`Z` -> zero-padded string of 4/16/64 bytes
//! * `a` -> array of 32 16-bit integers (reserved, cannot be encoded)
//!
//! All multi-byte scalars are stored little-endian.

use byteorder::{ByteOrder, LittleEndian};

use crate::{Error, Result, Value};

/// The wire size in bytes of a type code, 0 for unknown codes.
pub fn type_size(code: u8) -> usize {
	match code {
		b'b' | b'B' | b'M' => 1,
		b'h' | b'H' | b'c' | b'C' => 2,
		b'i' | b'I' | b'e' | b'E' | b'L' | b'f' | b'n' => 4,
		b'q' | b'Q' | b'd' => 8,
		b'N' => 16,
		b'Z' | b'a' => 64,
		_ => 0,
	}
}

/// Encode one value into `dest`, which must be exactly
/// [`type_size`]`(code)` bytes.
pub(crate) fn encode_value(code: u8, value: &Value, dest: &mut [u8]) -> Result<()> {
	match code {
		b'b' | b'B' | b'M' => dest[0] = value.as_u64()? as u8,
		b'h' | b'H' | b'c' | b'C' => LittleEndian::write_u16(dest, value.as_u64()? as u16),
		b'i' | b'I' | b'e' | b'E' | b'L' => LittleEndian::write_u32(dest, value.as_u64()? as u32),
		b'q' | b'Q' => LittleEndian::write_u64(dest, value.as_u64()?),
		b'f' => LittleEndian::write_f32(dest, value.as_f32()?),
		b'd' => LittleEndian::write_f64(dest, value.as_f64()?),
		b'n' | b'N' | b'Z' => {
			let s = value.as_str()?;
			let n = s.len().min(dest.len());
			dest.fill(0);
			dest[..n].copy_from_slice(&s.as_bytes()[..n]);
		}
		b'a' => return Err(Error::Unimplemented),
		_ => return Err(Error::Invalid),
	}
	Ok(())
}
