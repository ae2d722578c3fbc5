use std::ops::Range;

use tracing::trace;

use crate::save::TypedValue;
use crate::save::string::decode_string_at;

/// Limits for pattern scanning over raw buffers.
#[derive(Debug, Clone)]
pub struct ScanOptions {
	/// Maximum matches collected by repeated-value lookups.
	pub limit: usize,
	/// Bytes searched after a raw name occurrence by loose probes.
	pub probe_window: usize,
	/// Bytes searched backward from a class-name pattern.
	pub class_lookback: usize,
	/// Fixed byte spacing assumed between item structs in an inventory array.
	///
	/// This is an approximation: item structs vary in length, so elements past the first may
	/// misalign. It is kept configurable instead of derived.
	pub item_stride: usize,
}

impl Default for ScanOptions {
	fn default() -> Self {
		Self {
			limit: 1000,
			probe_window: 100,
			class_lookback: 200,
			item_stride: 200,
		}
	}
}

/// Value shape requested from a validated scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpectedType {
	/// `IntProperty` (signed) or `UInt32Property` (unsigned).
	Int,
	/// `UInt16Property`.
	UInt16,
	/// `FloatProperty` or `DoubleProperty`.
	Float,
	/// Non-empty `StrProperty`.
	Str,
	/// `BoolProperty`.
	Bool,
}

impl ExpectedType {
	/// Parse a short label (`int`, `uint16`, `float`, `str`, `bool`) or an on-disk tag.
	pub fn from_label(label: &str) -> Option<Self> {
		Some(match label {
			"int" | "IntProperty" | "UInt32Property" => Self::Int,
			"uint16" | "UInt16Property" => Self::UInt16,
			"float" | "double" | "FloatProperty" | "DoubleProperty" => Self::Float,
			"str" | "string" | "StrProperty" => Self::Str,
			"bool" | "BoolProperty" => Self::Bool,
			_ => return None,
		})
	}

	/// Return true when an on-disk tag satisfies this expectation.
	pub fn accepts(self, tag: &str) -> bool {
		match self {
			Self::Int => matches!(tag, "IntProperty" | "UInt32Property"),
			Self::UInt16 => tag == "UInt16Property",
			Self::Float => matches!(tag, "FloatProperty" | "DoubleProperty"),
			Self::Str => tag == "StrProperty",
			Self::Bool => tag == "BoolProperty",
		}
	}
}

/// One validated scan hit.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanMatch {
	/// Offset of the raw property name.
	pub offset: usize,
	/// Type tag found after the name.
	pub type_tag: Box<str>,
	/// Decoded value.
	pub value: TypedValue<'static>,
}

/// One loose probe hit.
#[derive(Debug, Clone, PartialEq)]
pub struct Probed<T> {
	/// Offset where the value was read.
	pub offset: usize,
	/// Probed value.
	pub value: T,
}

/// Iterator over validated occurrences of one property name, in byte-offset order.
pub struct Matches<'b> {
	bytes: &'b [u8],
	name: &'b str,
	expected: ExpectedType,
	from: usize,
}

impl Iterator for Matches<'_> {
	type Item = ScanMatch;

	fn next(&mut self) -> Option<ScanMatch> {
		if self.name.is_empty() {
			return None;
		}
		while let Some(pos) = find_bytes(self.bytes, self.name.as_bytes(), self.from) {
			self.from = pos + 1;
			if let Some(hit) = accept_at(self.bytes, pos, self.name, self.expected) {
				return Some(hit);
			}
		}
		self.from = self.bytes.len();
		None
	}
}

/// Iterate validated occurrences of `name` carrying a value of `expected` type.
///
/// An occurrence is accepted only when the `i32` before it equals `name.len() + 1` and the type tag
/// after its terminator satisfies `expected`.
pub fn scan_matches<'b>(bytes: &'b [u8], name: &'b str, expected: ExpectedType) -> Matches<'b> {
	Matches {
		bytes,
		name,
		expected,
		from: 0,
	}
}

/// First validated match of `name`.
pub fn find_value(bytes: &[u8], name: &str, expected: ExpectedType) -> Option<ScanMatch> {
	scan_matches(bytes, name, expected).next()
}

/// Every validated match of `name`, capped at `opt.limit`.
pub fn find_all(bytes: &[u8], name: &str, expected: ExpectedType, opt: &ScanOptions) -> Vec<ScanMatch> {
	let hits: Vec<ScanMatch> = scan_matches(bytes, name, expected).take(opt.limit).collect();
	trace!(name, matches = hits.len(), limit = opt.limit, "repeated-value scan");
	hits
}

/// First non-empty `StrProperty` value of `name`.
pub fn find_str(bytes: &[u8], name: &str) -> Option<String> {
	find_value(bytes, name, ExpectedType::Str).and_then(|hit| into_string(hit.value))
}

/// First `IntProperty`/`UInt32Property` value of `name`.
pub fn find_int(bytes: &[u8], name: &str) -> Option<i64> {
	find_value(bytes, name, ExpectedType::Int).and_then(|hit| hit.value.as_i64())
}

/// First `UInt16Property` value of `name`.
pub fn find_u16(bytes: &[u8], name: &str) -> Option<u16> {
	find_value(bytes, name, ExpectedType::UInt16).and_then(|hit| match hit.value {
		TypedValue::UInt16(v) => Some(v),
		_ => None,
	})
}

/// First `FloatProperty`/`DoubleProperty` value of `name`, widened to `f64`.
pub fn find_f64(bytes: &[u8], name: &str) -> Option<f64> {
	find_value(bytes, name, ExpectedType::Float).and_then(|hit| hit.value.as_f64())
}

/// First `BoolProperty` value of `name`.
pub fn find_bool(bytes: &[u8], name: &str) -> Option<bool> {
	find_value(bytes, name, ExpectedType::Bool).and_then(|hit| hit.value.as_bool())
}

/// Every non-empty string value of `name`, in offset order.
pub fn find_all_str(bytes: &[u8], name: &str, opt: &ScanOptions) -> Vec<String> {
	find_all(bytes, name, ExpectedType::Str, opt).into_iter().filter_map(|hit| into_string(hit.value)).collect()
}

/// Every int value of `name`, in offset order.
pub fn find_all_int(bytes: &[u8], name: &str, opt: &ScanOptions) -> Vec<i64> {
	find_all(bytes, name, ExpectedType::Int, opt).into_iter().filter_map(|hit| hit.value.as_i64()).collect()
}

/// Elements of the first validated `ArrayProperty` named `name`.
///
/// The world-save layout (4 bytes, element type, 9 bytes, count) is tried first, then the sequential
/// layout (`u64` size, `i32` index, element type, count). Only `StrProperty`, `IntProperty`/`UInt32Property`
/// and `FloatProperty` elements are read; any other element type yields an empty list. Reading stops
/// at the first element that does not fit the buffer.
pub fn find_array_values(bytes: &[u8], name: &str, opt: &ScanOptions) -> Option<Vec<TypedValue<'static>>> {
	if name.is_empty() {
		return None;
	}

	let mut from = 0;
	while let Some(pos) = find_bytes(bytes, name.as_bytes(), from) {
		from = pos + 1;
		if !has_length_backref(bytes, pos, name) {
			continue;
		}
		let tag_at = pos + name.len() + 1;
		let (tag, tag_len) = decode_string_at(bytes, tag_at);
		if tag_len == 0 || tag != "ArrayProperty" {
			continue;
		}

		let tag_end = tag_at + tag_len;
		let Some((elem, count_at)) = array_element_header(bytes, tag_end) else {
			continue;
		};
		let Some(count) = read_u32(bytes, count_at) else {
			return Some(Vec::new());
		};
		let count = (count as usize).min(opt.limit);

		let mut items = Vec::new();
		let mut at = count_at + 4;
		match elem.as_str() {
			"StrProperty" => {
				for _ in 0..count {
					let (text, used) = decode_string_at(bytes, at);
					if used == 0 {
						break;
					}
					items.push(TypedValue::Str(text.into()));
					at += used;
				}
			}
			"FloatProperty" => {
				for _ in 0..count {
					let Some(raw) = read_u32(bytes, at) else {
						break;
					};
					items.push(TypedValue::Float32(f32::from_bits(raw)));
					at += 4;
				}
			}
			"IntProperty" | "UInt32Property" => {
				for _ in 0..count {
					let Some(raw) = read_u32(bytes, at) else {
						break;
					};
					items.push(if elem == "IntProperty" {
						TypedValue::Int32(raw as i32)
					} else {
						TypedValue::UInt32(raw)
					});
					at += 4;
				}
			}
			_ => {}
		}
		trace!(name, elem = %elem, count, read = items.len(), "array scan");
		return Some(items);
	}
	None
}

/// Element type and count offset of an array whose tag ends at `tag_end`.
fn array_element_header(bytes: &[u8], tag_end: usize) -> Option<(String, usize)> {
	[(4, 9), (12, 0)].into_iter().find_map(|(before, after)| {
		let elem_at = tag_end + before;
		let (elem, elem_len) = decode_string_at(bytes, elem_at);
		(elem_len > 0 && elem.ends_with("Property")).then(|| (elem, elem_at + elem_len + after))
	})
}

/// First plausible length-prefixed string after a raw `name` occurrence.
///
/// Probes start at the first occurrence carrying a length back-reference, or else the first occurrence
/// not embedded in a longer identifier. A `*Property` tag directly after the name is skipped together with its size slot.
pub fn probe_str(bytes: &[u8], name: &str, window: usize) -> Option<Probed<String>> {
	let mut range = probe_range(bytes, name, window, true)?;
	range.find_map(|at| plausible_string_at(bytes, at).map(|value| Probed { offset: at, value }))
}

/// First `i32` satisfying `accept` after a raw `name` occurrence.
pub fn probe_i32(bytes: &[u8], name: &str, window: usize, accept: impl Fn(i32) -> bool) -> Option<Probed<i32>> {
	let range = probe_range(bytes, name, window, true)?;
	let end = range.end;
	range.filter(|at| at + 4 <= end).find_map(|at| {
		let value = read_u32(bytes, at)? as i32;
		accept(value).then_some(Probed { offset: at, value })
	})
}

/// First `f32` satisfying `accept` after a raw `name` occurrence.
pub fn probe_f32(bytes: &[u8], name: &str, window: usize, accept: impl Fn(f32) -> bool) -> Option<Probed<f32>> {
	let range = probe_range(bytes, name, window, true)?;
	let end = range.end;
	range.filter(|at| at + 4 <= end).find_map(|at| {
		let value = f32::from_bits(read_u32(bytes, at)?);
		accept(value).then_some(Probed { offset: at, value })
	})
}

/// First `0` or `1` byte after a raw `name` occurrence.
pub fn probe_flag(bytes: &[u8], name: &str, window: usize) -> Option<Probed<bool>> {
	let mut range = probe_range(bytes, name, window, false)?;
	range.find_map(|at| match bytes[at] {
		0 => Some(Probed { offset: at, value: false }),
		1 => Some(Probed { offset: at, value: true }),
		_ => None,
	})
}

/// Nearest plausible string containing `pattern`, searched backward from its first raw occurrence.
pub fn find_class_name(bytes: &[u8], pattern: &str, lookback: usize, accept: impl Fn(&str) -> bool) -> Option<Probed<String>> {
	let pos = find_bytes(bytes, pattern.as_bytes(), 0)?;
	let floor = pos.saturating_sub(lookback);
	(floor..=pos.saturating_sub(4)).rev().find_map(|at| {
		let value = plausible_string_at(bytes, at)?;
		(value.contains(pattern) && accept(&value)).then_some(Probed { offset: at, value })
	})
}

/// Offset of the first occurrence of `needle` at or after `from`.
pub fn find_bytes(haystack: &[u8], needle: &[u8], from: usize) -> Option<usize> {
	if needle.is_empty() || from >= haystack.len() {
		return None;
	}
	haystack[from..].windows(needle.len()).position(|window| window == needle).map(|idx| from + idx)
}

/// Return true when `needle` occurs anywhere in `haystack`.
pub fn contains_bytes(haystack: &[u8], needle: &[u8]) -> bool {
	find_bytes(haystack, needle, 0).is_some()
}

fn accept_at(bytes: &[u8], pos: usize, name: &str, expected: ExpectedType) -> Option<ScanMatch> {
	if !has_length_backref(bytes, pos, name) {
		return None;
	}

	let tag_at = pos + name.len() + 1;
	let (tag, tag_len) = decode_string_at(bytes, tag_at);
	if tag_len == 0 || !expected.accepts(&tag) {
		return None;
	}

	let at = locate_value(bytes, tag_at + tag_len, &tag)?;
	let value = match tag.as_str() {
		"IntProperty" => TypedValue::Int32(read_u32(bytes, at)? as i32),
		"UInt32Property" => TypedValue::UInt32(read_u32(bytes, at)?),
		"UInt16Property" => TypedValue::UInt16(u16::from_le_bytes(read_array(bytes, at)?)),
		"FloatProperty" => TypedValue::Float32(f32::from_bits(read_u32(bytes, at)?)),
		"DoubleProperty" => TypedValue::Float64(f64::from_le_bytes(read_array(bytes, at)?)),
		"BoolProperty" => TypedValue::Bool(*bytes.get(at)? != 0),
		_ => {
			let (text, used) = decode_string_at(bytes, at);
			if used == 0 || text.is_empty() {
				return None;
			}
			TypedValue::Str(text.into())
		}
	};

	Some(ScanMatch {
		offset: pos,
		type_tag: tag.into(),
		value,
	})
}

/// Header written between a type tag and its value.
#[derive(Debug, Clone, Copy)]
enum SizeSlot {
	/// `i32` size + `i32` index, as in world-save actor blobs.
	Compact,
	/// `u64` size + `i32` index, as walked by the sequential decoder.
	Tagged,
}

impl SizeSlot {
	/// Value span when the declared size in this slot matches the value found after it.
	fn value_span(self, bytes: &[u8], tag_end: usize, tag: &str) -> Option<Range<usize>> {
		let (declared, header) = match self {
			Self::Compact => (u64::from(read_u32(bytes, tag_end)?), 8),
			Self::Tagged => (u64::from_le_bytes(read_array(bytes, tag_end)?), 12),
		};

		// Bool keeps its value where other scalars keep the padding byte, and declares size 0.
		if tag == "BoolProperty" {
			let at = tag_end + header;
			bytes.get(at)?;
			return (declared == 0).then_some(at..at + 2);
		}

		let at = tag_end + header + 1;
		let width = match tag {
			"IntProperty" | "UInt32Property" | "FloatProperty" => 4,
			"UInt16Property" => 2,
			"DoubleProperty" => 8,
			_ => match decode_string_at(bytes, at) {
				(_, 0) => return None,
				(_, used) => used,
			},
		};
		if at + width > bytes.len() || declared != width as u64 {
			return None;
		}
		Some(at..at + width)
	}
}

/// Offset of the value after a type tag ending at `tag_end`.
///
/// Both header layouts are tried against the declared size. When both fit, the compact layout wins
/// unless only the sequential layout ends on a property boundary.
fn locate_value(bytes: &[u8], tag_end: usize, tag: &str) -> Option<usize> {
	let compact = SizeSlot::Compact.value_span(bytes, tag_end, tag);
	let tagged = SizeSlot::Tagged.value_span(bytes, tag_end, tag);
	match (compact, tagged) {
		(Some(compact), Some(tagged)) if !at_boundary(bytes, compact.end) && at_boundary(bytes, tagged.end) => Some(tagged.start),
		(Some(compact), _) => Some(compact.start),
		(None, Some(tagged)) => Some(tagged.start),
		(None, None) => {
			trace!(tag_end, tag, "declared size fits no header layout");
			None
		}
	}
}

fn at_boundary(bytes: &[u8], at: usize) -> bool {
	at == bytes.len() || plausible_string_at(bytes, at).is_some()
}

fn has_length_backref(bytes: &[u8], pos: usize, name: &str) -> bool {
	pos >= 4 && read_u32(bytes, pos - 4).is_some_and(|len| len as usize == name.len() + 1)
}

fn probe_range(bytes: &[u8], name: &str, window: usize, padded: bool) -> Option<Range<usize>> {
	let mut standalone = None;
	let mut from = 0;
	let pos = loop {
		let Some(pos) = find_bytes(bytes, name.as_bytes(), from) else {
			break standalone?;
		};
		if has_length_backref(bytes, pos, name) {
			break pos;
		}
		if standalone.is_none() && !pos.checked_sub(1).is_some_and(|prev| is_ident_byte(bytes[prev])) {
			standalone = Some(pos);
		}
		from = pos + 1;
	};
	let mut start = pos + name.len();
	if bytes.get(start) == Some(&0) {
		start += 1;
	}
	let (tag, used) = decode_string_at(bytes, start);
	if used > 0 && tag.ends_with("Property") {
		start += used + 8 + usize::from(padded);
	}
	let start = start.min(bytes.len());
	Some(start..start.saturating_add(window).min(bytes.len()))
}

fn is_ident_byte(byte: u8) -> bool {
	byte.is_ascii_alphanumeric() || byte == b'_'
}

fn plausible_string_at(bytes: &[u8], at: usize) -> Option<String> {
	let len = read_u32(bytes, at)? as i32;
	if !(2..=256).contains(&len) {
		return None;
	}
	let raw = bytes.get(at + 4..at + 4 + len as usize)?;
	let (&terminator, text) = raw.split_last()?;
	if terminator != 0 {
		return None;
	}
	let text = std::str::from_utf8(text).ok()?;
	if text.chars().any(char::is_control) || text.ends_with("Property") {
		return None;
	}
	Some(text.to_owned())
}

fn into_string(value: TypedValue<'_>) -> Option<String> {
	match value {
		TypedValue::Str(text) => Some(text.into_string()),
		_ => None,
	}
}

fn read_u32(bytes: &[u8], at: usize) -> Option<u32> {
	read_array(bytes, at).map(u32::from_le_bytes)
}

fn read_array<const N: usize>(bytes: &[u8], at: usize) -> Option<[u8; N]> {
	let raw = bytes.get(at..at.checked_add(N)?)?;
	let mut out = [0_u8; N];
	out.copy_from_slice(raw);
	Some(out)
}

#[cfg(test)]
mod tests;
