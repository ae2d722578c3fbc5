//! Shared test helpers for workspace crates.
//!
//! The encoders here synthesize save-format byte streams so tests never depend on checked-in binary
//! fixtures.

use std::path::{Path, PathBuf};

/// Resolve the workspace root path.
pub fn workspace_root() -> PathBuf {
	let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
	manifest_dir
		.join("..")
		.join("..")
		.canonicalize()
		.unwrap_or_else(|_| manifest_dir.join("..").join(".."))
}

/// Resolve the workspace target directory.
pub fn target_dir() -> PathBuf {
	std::env::var_os("CARGO_TARGET_DIR")
		.map(PathBuf::from)
		.unwrap_or_else(|| workspace_root().join("target"))
}

/// Create (if needed) and return a scratch directory under the target dir.
pub fn scratch_dir(name: &str) -> PathBuf {
	let dir = target_dir().join("asaparse-test-scratch").join(name);
	std::fs::create_dir_all(&dir).expect("scratch dir is creatable");
	dir
}

/// Parse a command's stdout as JSON, panicking with stderr on failure.
pub fn stdout_json(output: &std::process::Output) -> serde_json::Value {
	assert!(
		output.status.success(),
		"command failed: {}",
		String::from_utf8_lossy(&output.stderr)
	);
	serde_json::from_slice(&output.stdout).expect("stdout is valid json")
}

/// Encode a positive-length (UTF-8) save string with its null terminator.
///
/// The empty string encodes as a bare zero length.
pub fn ue_string(text: &str) -> Vec<u8> {
	if text.is_empty() {
		return 0_i32.to_le_bytes().to_vec();
	}
	let len = i32::try_from(text.len() + 1).expect("string fits i32 length");
	let mut out = len.to_le_bytes().to_vec();
	out.extend_from_slice(text.as_bytes());
	out.push(0);
	out
}

/// Encode a negative-length (UTF-16LE) save string with its null terminator.
pub fn ue_string_utf16(text: &str) -> Vec<u8> {
	let units: Vec<u16> = text.encode_utf16().chain(std::iter::once(0)).collect();
	let len = i32::try_from(units.len()).expect("string fits i32 length");
	let mut out = (-len).to_le_bytes().to_vec();
	for unit in units {
		out.extend_from_slice(&unit.to_le_bytes());
	}
	out
}

/// Property header layout written after the type tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
	/// `u64` declared size + `i32` array index, as walked by the sequential decoder.
	Tagged,
	/// `i32` declared size + `i32` array index, as seen in world-save actor blobs.
	Compact,
}

/// Builder for synthetic property streams.
///
/// ```
/// use asaparse_testkit::PropertyWriter;
///
/// let bytes = PropertyWriter::new().int("Level", 3).none().finish();
/// assert!(!bytes.is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct PropertyWriter {
	buf: Vec<u8>,
	layout: Layout,
}

impl Default for PropertyWriter {
	fn default() -> Self {
		Self::new()
	}
}

impl PropertyWriter {
	/// Writer using [`Layout::Tagged`] headers.
	pub fn new() -> Self {
		Self::with_layout(Layout::Tagged)
	}

	/// Writer using [`Layout::Compact`] headers.
	pub fn compact() -> Self {
		Self::with_layout(Layout::Compact)
	}

	/// Writer using an explicit header layout.
	pub fn with_layout(layout: Layout) -> Self {
		Self { buf: Vec::new(), layout }
	}

	/// Current encoded length.
	pub fn len(&self) -> usize {
		self.buf.len()
	}

	/// Return true when nothing has been written.
	pub fn is_empty(&self) -> bool {
		self.buf.is_empty()
	}

	/// `IntProperty`.
	pub fn int(self, name: &str, value: i32) -> Self {
		self.scalar(name, "IntProperty", &value.to_le_bytes())
	}

	/// `UInt16Property`.
	pub fn uint16(self, name: &str, value: u16) -> Self {
		self.scalar(name, "UInt16Property", &value.to_le_bytes())
	}

	/// `UInt32Property`.
	pub fn uint32(self, name: &str, value: u32) -> Self {
		self.scalar(name, "UInt32Property", &value.to_le_bytes())
	}

	/// `Int64Property`.
	pub fn int64(self, name: &str, value: i64) -> Self {
		self.scalar(name, "Int64Property", &value.to_le_bytes())
	}

	/// `FloatProperty`.
	pub fn float(self, name: &str, value: f32) -> Self {
		self.scalar(name, "FloatProperty", &value.to_le_bytes())
	}

	/// `DoubleProperty`.
	pub fn double(self, name: &str, value: f64) -> Self {
		self.scalar(name, "DoubleProperty", &value.to_le_bytes())
	}

	/// `ObjectProperty` numeric handle.
	pub fn object(self, name: &str, value: i32) -> Self {
		self.scalar(name, "ObjectProperty", &value.to_le_bytes())
	}

	/// `StrProperty`.
	pub fn str(self, name: &str, value: &str) -> Self {
		self.scalar(name, "StrProperty", &ue_string(value))
	}

	/// `NameProperty`.
	pub fn name(self, name: &str, value: &str) -> Self {
		self.scalar(name, "NameProperty", &ue_string(value))
	}

	/// `BoolProperty`: value byte followed by one trailing byte, declared size 0.
	pub fn boolean(mut self, name: &str, value: bool) -> Self {
		self.header(name, "BoolProperty", 0);
		self.buf.push(u8::from(value));
		self.buf.push(0);
		self
	}

	/// `StructProperty` with a zero GUID; declared size covers type name, GUID and payload.
	pub fn structure(mut self, name: &str, type_name: &str, payload: &[u8]) -> Self {
		let mut value = ue_string(type_name);
		value.extend_from_slice(&[0_u8; 16]);
		value.extend_from_slice(payload);
		self.header(name, "StructProperty", value.len());
		self.buf.extend_from_slice(&value);
		self
	}

	/// `ArrayProperty` of `StrProperty` elements.
	pub fn array_str(self, name: &str, items: &[&str]) -> Self {
		let body: Vec<u8> = items.iter().flat_map(|item| ue_string(item)).collect();
		self.array(name, "StrProperty", items.len(), &body)
	}

	/// `ArrayProperty` of `IntProperty` elements.
	pub fn array_int(self, name: &str, items: &[i32]) -> Self {
		let body: Vec<u8> = items.iter().flat_map(|item| item.to_le_bytes()).collect();
		self.array(name, "IntProperty", items.len(), &body)
	}

	/// `ArrayProperty` with pre-encoded element bytes.
	pub fn array(mut self, name: &str, inner: &str, count: usize, body: &[u8]) -> Self {
		let mut value = ue_string(inner);
		value.extend_from_slice(&i32::try_from(count).expect("count fits i32").to_le_bytes());
		value.extend_from_slice(body);
		self.header(name, "ArrayProperty", value.len());
		self.buf.extend_from_slice(&value);
		self
	}

	/// Property with an arbitrary tag and raw value bytes; declared size is the value length.
	pub fn raw(mut self, name: &str, tag: &str, value: &[u8]) -> Self {
		self.header(name, tag, value.len());
		self.buf.extend_from_slice(value);
		self
	}

	/// Property header with an explicit declared size and no value bytes.
	pub fn header_only(mut self, name: &str, tag: &str, declared: usize) -> Self {
		self.header(name, tag, declared);
		self
	}

	/// Append arbitrary bytes.
	pub fn bytes(mut self, bytes: &[u8]) -> Self {
		self.buf.extend_from_slice(bytes);
		self
	}

	/// Append zero bytes until the encoded length reaches `len`.
	pub fn pad_to(mut self, len: usize) -> Self {
		if self.buf.len() < len {
			self.buf.resize(len, 0);
		}
		self
	}

	/// `None` sentinel.
	pub fn none(mut self) -> Self {
		self.buf.extend_from_slice(&ue_string("None"));
		self
	}

	/// Consume the writer and return the encoded bytes.
	pub fn finish(self) -> Vec<u8> {
		self.buf
	}

	fn scalar(mut self, name: &str, tag: &str, value: &[u8]) -> Self {
		self.header(name, tag, value.len());
		self.buf.push(0);
		self.buf.extend_from_slice(value);
		self
	}

	fn header(&mut self, name: &str, tag: &str, declared: usize) {
		self.buf.extend_from_slice(&ue_string(name));
		self.buf.extend_from_slice(&ue_string(tag));
		match self.layout {
			Layout::Tagged => {
				self.buf.extend_from_slice(&(declared as u64).to_le_bytes());
				self.buf.extend_from_slice(&0_i32.to_le_bytes());
			}
			Layout::Compact => {
				self.buf.extend_from_slice(&(declared as i32).to_le_bytes());
				self.buf.extend_from_slice(&0_i32.to_le_bytes());
			}
		}
	}
}

/// Encode a world-save `ArrayProperty` of strings in the layout read by array scans:
/// name, tag, 4 bytes, element type, 4 + 4 + 1 bytes, `u32` count, elements.
pub fn world_array_str(name: &str, items: &[&str]) -> Vec<u8> {
	world_array(name, "StrProperty", items.len(), items.iter().flat_map(|item| ue_string(item)).collect())
}

/// Encode a world-save `ArrayProperty` of ints; see [`world_array_str`].
pub fn world_array_int(name: &str, items: &[u32]) -> Vec<u8> {
	world_array(name, "IntProperty", items.len(), items.iter().flat_map(|item| item.to_le_bytes()).collect())
}

fn world_array(name: &str, inner: &str, count: usize, body: Vec<u8>) -> Vec<u8> {
	let mut out = ue_string(name);
	out.extend_from_slice(&ue_string("ArrayProperty"));
	out.extend_from_slice(&[0_u8; 4]);
	out.extend_from_slice(&ue_string(inner));
	out.extend_from_slice(&[0_u8; 9]);
	out.extend_from_slice(&u32::try_from(count).expect("count fits u32").to_le_bytes());
	out.extend(body);
	out
}
