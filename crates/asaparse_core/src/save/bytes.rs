use crate::save::string::decode_string_at;
use crate::save::{Guid, Result, SaveError};

/// Bounded little-endian cursor over an immutable byte slice.
pub struct Cursor<'a> {
	bytes: &'a [u8],
	pos: usize,
}

impl<'a> Cursor<'a> {
	/// Create a cursor at position 0.
	pub fn new(bytes: &'a [u8]) -> Self {
		Self { bytes, pos: 0 }
	}

	/// Return current byte offset.
	pub fn pos(&self) -> usize {
		self.pos
	}

	/// Return the full underlying buffer.
	pub fn bytes(&self) -> &'a [u8] {
		self.bytes
	}

	/// Return remaining unread bytes.
	pub fn remaining(&self) -> usize {
		self.bytes.len().saturating_sub(self.pos)
	}

	/// Move to an absolute position. Seeking to exactly the end is allowed.
	pub fn seek(&mut self, pos: usize) -> Result<()> {
		if pos > self.bytes.len() {
			return Err(SaveError::SeekOutOfBounds { pos, len: self.bytes.len() });
		}
		self.pos = pos;
		Ok(())
	}

	/// Read exactly `n` bytes and advance cursor.
	pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8]> {
		if n > self.remaining() {
			return Err(self.eof(n));
		}

		let start = self.pos;
		self.pos += n;
		Ok(&self.bytes[start..self.pos])
	}

	/// Advance past `n` bytes.
	pub fn skip(&mut self, n: usize) -> Result<()> {
		let _ = self.read_bytes(n)?;
		Ok(())
	}

	/// Return the next byte without advancing.
	pub fn peek_u8(&self) -> Result<u8> {
		self.bytes.get(self.pos).copied().ok_or_else(|| self.eof(1))
	}

	/// Read one byte.
	pub fn read_u8(&mut self) -> Result<u8> {
		Ok(self.read_array::<1>()?[0])
	}

	/// Read one signed byte.
	pub fn read_i8(&mut self) -> Result<i8> {
		Ok(i8::from_le_bytes(self.read_array()?))
	}

	/// Read one byte as a boolean; any non-zero value is `true`.
	pub fn read_bool(&mut self) -> Result<bool> {
		Ok(self.read_u8()? != 0)
	}

	/// Read a little-endian `u16`.
	pub fn read_u16(&mut self) -> Result<u16> {
		Ok(u16::from_le_bytes(self.read_array()?))
	}

	/// Read a little-endian `i16`.
	pub fn read_i16(&mut self) -> Result<i16> {
		Ok(i16::from_le_bytes(self.read_array()?))
	}

	/// Read a little-endian `u32`.
	pub fn read_u32(&mut self) -> Result<u32> {
		Ok(u32::from_le_bytes(self.read_array()?))
	}

	/// Read a little-endian `i32`.
	pub fn read_i32(&mut self) -> Result<i32> {
		Ok(i32::from_le_bytes(self.read_array()?))
	}

	/// Read a little-endian `u64`.
	pub fn read_u64(&mut self) -> Result<u64> {
		Ok(u64::from_le_bytes(self.read_array()?))
	}

	/// Read a little-endian `i64`.
	pub fn read_i64(&mut self) -> Result<i64> {
		Ok(i64::from_le_bytes(self.read_array()?))
	}

	/// Read a little-endian `f32`.
	pub fn read_f32(&mut self) -> Result<f32> {
		Ok(f32::from_le_bytes(self.read_array()?))
	}

	/// Read a little-endian `f64`.
	pub fn read_f64(&mut self) -> Result<f64> {
		Ok(f64::from_le_bytes(self.read_array()?))
	}

	/// Read a raw 16-byte GUID.
	pub fn read_guid(&mut self) -> Result<Guid> {
		Ok(Guid(self.read_array()?))
	}

	/// Read a 7-bit little-endian varint; the top bit of each byte marks continuation.
	pub fn read_compressed_int(&mut self) -> Result<u64> {
		let start = self.pos;
		let mut value = 0_u64;
		let mut shift = 0_u32;

		loop {
			let byte = self.read_u8()?;
			if shift >= 64 {
				return Err(SaveError::CompressedIntOverflow { at: start });
			}
			value |= u64::from(byte & 0x7F) << shift;
			if byte & 0x80 == 0 {
				return Ok(value);
			}
			shift += 7;
		}
	}

	/// Read a length-prefixed save string and advance past it.
	///
	/// Unlike [`decode_string_at`], a span that runs past the buffer is reported as an error so the
	/// stream decoder can tell a truncated buffer from an empty string.
	pub fn read_fstring(&mut self) -> Result<String> {
		if self.remaining() < 4 {
			return Err(self.eof(4));
		}

		let (text, consumed) = decode_string_at(self.bytes, self.pos);
		if consumed == 0 {
			let mut raw = [0_u8; 4];
			raw.copy_from_slice(&self.bytes[self.pos..self.pos + 4]);
			return Err(SaveError::MalformedString {
				at: self.pos,
				len: i32::from_le_bytes(raw),
			});
		}

		self.pos += consumed;
		Ok(text)
	}

	fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
		let raw = self.read_bytes(N)?;
		let mut out = [0_u8; N];
		out.copy_from_slice(raw);
		Ok(out)
	}

	fn eof(&self, need: usize) -> SaveError {
		SaveError::OutOfBounds {
			at: self.pos,
			need,
			rem: self.remaining(),
		}
	}
}
