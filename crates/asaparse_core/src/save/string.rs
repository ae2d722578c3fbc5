/// Decode a length-prefixed save string at `offset`.
///
/// Returns the decoded text and the number of bytes consumed, including the 4-byte prefix and the
/// null terminator. A positive length is UTF-8 (invalid sequences replaced), a negative length is
/// UTF-16LE with `|len|` code units. Any span that runs past the buffer yields `("", 0)`.
pub fn decode_string_at(bytes: &[u8], offset: usize) -> (String, usize) {
	let Some(prefix) = offset.checked_add(4).and_then(|end| bytes.get(offset..end)) else {
		return (String::new(), 0);
	};
	let len = i32::from_le_bytes([prefix[0], prefix[1], prefix[2], prefix[3]]);
	let start = offset + 4;

	if len == 0 {
		return (String::new(), 4);
	}

	if len < 0 {
		let span = len.unsigned_abs() as usize * 2;
		let Some(raw) = start.checked_add(span).and_then(|end| bytes.get(start..end)) else {
			return (String::new(), 0);
		};
		let units = raw[..span - 2].chunks_exact(2).map(|pair| u16::from_le_bytes([pair[0], pair[1]]));
		let text = char::decode_utf16(units).map(|unit| unit.unwrap_or(char::REPLACEMENT_CHARACTER)).collect();
		return (text, 4 + span);
	}

	let span = len as usize;
	let Some(raw) = start.checked_add(span).and_then(|end| bytes.get(start..end)) else {
		return (String::new(), 0);
	};
	(String::from_utf8_lossy(&raw[..span - 1]).into_owned(), 4 + span)
}
