use byteorder::{ByteOrder, LittleEndian};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::{
	encode_record, BufferStream, MessageFormat, Value, Writer, FMT_MESSAGE_ID, MAX_MESSAGE_LENGTH,
	RECORD_HEADER_SIZE,
};

fn record_payload(format: &MessageFormat, values: &[Value]) -> Vec<u8> {
	let mut buf = [0u8; MAX_MESSAGE_LENGTH];
	let n = encode_record(format, &mut buf, values).unwrap();
	assert_eq!(n, RECORD_HEADER_SIZE + format.size() as usize);
	assert_eq!(buf[..2], [0xa3, 0x95]);
	assert_eq!(buf[2], format.id());
	buf[RECORD_HEADER_SIZE..n].to_vec()
}

// what a C cast down to the column's width would keep
fn truncated(code: u8, v: i64) -> i64 {
	match code {
		b'b' => v as i8 as i64,
		b'B' | b'M' => v as u8 as i64,
		b'h' | b'c' => v as i16 as i64,
		b'H' | b'C' => v as u16 as i64,
		b'i' | b'e' | b'L' => v as i32 as i64,
		b'I' | b'E' => v as u32 as i64,
		b'q' | b'Q' => v,
		_ => unreachable!(),
	}
}

fn decoded(code: u8, payload: &[u8]) -> i64 {
	match code {
		b'b' => payload[0] as i8 as i64,
		b'B' | b'M' => payload[0] as i64,
		b'h' | b'c' => LittleEndian::read_i16(payload) as i64,
		b'H' | b'C' => LittleEndian::read_u16(payload) as i64,
		b'i' | b'e' | b'L' => LittleEndian::read_i32(payload) as i64,
		b'I' | b'E' => LittleEndian::read_u32(payload) as i64,
		b'q' | b'Q' => LittleEndian::read_i64(payload),
		_ => unreachable!(),
	}
}

#[test]
fn integer_round_trip() {
	let mut rng = SmallRng::seed_from_u64(2001);

	for &code in b"bBMhHcCiIeELqQ" {
		let mut f = MessageFormat::new(1, "ONE").unwrap();
		f.add_column("v", code, b'-').unwrap();

		for _ in 0..200 {
			let v: i64 = rng.gen();
			let payload = record_payload(&f, &[Value::Int(v)]);
			assert_eq!(
				decoded(code, &payload),
				truncated(code, v),
				"code '{}' value {}",
				code as char,
				v
			);
		}
	}
}

#[test]
fn float_round_trip_is_bit_exact() {
	let mut rng = SmallRng::seed_from_u64(2002);

	let mut f = MessageFormat::new(1, "F").unwrap();
	f.add_column("v", b'f', b'-').unwrap();
	let mut singles = vec![
		0.0f32,
		-0.0,
		0.125,
		f32::MIN,
		f32::MAX,
		f32::MIN_POSITIVE,
		1.0e-42, // subnormal
	];
	singles.extend((0..200).map(|_| f32::from_bits(rng.gen())));
	for v in singles {
		if !v.is_finite() {
			continue;
		}
		let payload = record_payload(&f, &[Value::F32(v)]);
		assert_eq!(LittleEndian::read_u32(&payload), v.to_bits());
	}

	let mut f = MessageFormat::new(1, "D").unwrap();
	f.add_column("v", b'd', b'-').unwrap();
	let mut doubles = vec![
		0.0f64,
		-0.0,
		0.25,
		f64::MIN,
		f64::MAX,
		f64::MIN_POSITIVE,
		5.0e-324, // subnormal
	];
	doubles.extend((0..200).map(|_| f64::from_bits(rng.gen())));
	for v in doubles {
		if !v.is_finite() {
			continue;
		}
		let payload = record_payload(&f, &[Value::F64(v)]);
		assert_eq!(LittleEndian::read_u64(&payload), v.to_bits());
	}
}

#[test]
fn string_fields_trim_back_to_the_input() {
	for (code, width) in [(b'n', 4usize), (b'N', 16), (b'Z', 64)] {
		let mut f = MessageFormat::new(1, "S").unwrap();
		f.add_column("v", code, b'-').unwrap();

		for input in [
			"",
			"a",
			"tail",
			"a little more",
			"something well past sixty-four characters, so every width truncates it",
		] {
			let payload = record_payload(&f, &[Value::Str(input)]);
			assert_eq!(payload.len(), width);

			let end = payload
				.iter()
				.rposition(|&b| b != 0)
				.map_or(0, |p| p + 1);
			let expected = &input.as_bytes()[..input.len().min(width)];
			assert_eq!(&payload[..end], expected, "code '{}'", code as char);
		}
	}
}

#[test]
fn random_formats_keep_their_derived_views_consistent() {
	let mut rng = SmallRng::seed_from_u64(2003);
	const CODES: &[u8] = b"bBMhHcCiIeELqQfdnNZ";

	for _ in 0..100 {
		let mut f = MessageFormat::new(2, "RND").unwrap();
		let count = rng.gen_range(0..20);
		let mut names = Vec::new();
		for i in 0..count {
			let code = CODES[rng.gen_range(0..CODES.len())];
			let name = format!("c{}", i);
			if f.add_column(&name, code, b'-').is_err() {
				// the record-length cap; everything added so far stays
				break;
			}
			names.push(name);
		}

		let format_string = f.format_string();
		assert_eq!(format_string.len(), f.column_count());
		for (i, c) in format_string.bytes().enumerate() {
			assert_eq!(c, f.column(i).unwrap().type_code());
		}
		assert_eq!(f.column_names(","), names.join(","));
		let total: usize = f.columns().map(|c| c.size()).sum();
		assert_eq!(f.size() as usize, total);
	}
}

#[test]
fn stream_is_self_describing() {
	// write records of three formats, one of them a redefinition of an
	// id, then walk the stream using only the FMT records it carries
	let mut baro = MessageFormat::new(10, "BARO").unwrap();
	baro.add_columns("TimeUS,Alt,Press", "Qff", "smP").unwrap();

	let mut mode = MessageFormat::new(20, "MODE").unwrap();
	mode.add_columns("Mode,Rsn", "MB", "").unwrap();

	let mut w = Writer::new(BufferStream::new());
	w.write(&baro, &[Value::Uint(1000), Value::F32(12.5), Value::F32(1013.2)])
		.unwrap();
	w.write(&mode, &[Value::Uint(3), Value::Uint(1)]).unwrap();
	w.write(&baro, &[Value::Uint(2000), Value::F32(12.6), Value::F32(1013.1)])
		.unwrap();

	// rebind id 20 to new columns mid-stream
	let mut mode = MessageFormat::new(20, "MODE").unwrap();
	mode.add_columns("TimeUS,Mode,Rsn", "QMB", "s").unwrap();
	w.write(&mode, &[Value::Uint(3000), Value::Uint(4), Value::Uint(1)])
		.unwrap();

	let data = w.finish().unwrap().into_vec();

	let fmt_record_len =
		RECORD_HEADER_SIZE + MessageFormat::fmt().size() as usize;
	let mut lengths = [None::<usize>; 256];
	lengths[FMT_MESSAGE_ID as usize] = Some(fmt_record_len);

	let mut at = 0;
	while at < data.len() {
		assert_eq!(&data[at..at + 2], &[0xa3, 0x95], "sync at {}", at);
		let id = data[at + 2] as usize;
		let len = lengths[id].expect("id announced before first use");
		if id == FMT_MESSAGE_ID as usize {
			let announced = data[at + 3] as usize;
			let announced_len = data[at + 4] as usize;
			lengths[announced] = Some(announced_len);
			// the announcement sits immediately before the announced
			// format's next record
			assert_eq!(data[at + len + 2] as usize, announced);
		}
		at += len;
	}
	assert_eq!(at, data.len());
}
