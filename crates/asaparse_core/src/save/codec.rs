use tracing::{debug, trace};

use crate::save::bytes::Cursor;
use crate::save::stream::decode_stream_at_depth;
use crate::save::{Result, SaveError, StructValue, TypedValue};

/// Runtime limits and behavior switches for property decoding.
#[derive(Debug, Clone)]
pub struct DecodeOptions {
	/// Maximum nested property-stream depth inside struct payloads.
	pub max_depth: u32,
	/// Maximum allowed array element count.
	pub max_array_elems: usize,
	/// Struct type names whose payload is itself a property stream.
	pub property_structs: Vec<Box<str>>,
}

impl Default for DecodeOptions {
	fn default() -> Self {
		Self {
			max_depth: 8,
			max_array_elems: 65_536,
			property_structs: [
				"PrimalPlayerDataStruct",
				"PrimalPlayerCharacterConfigStruct",
				"PrimalPersistentCharacterStatsStruct",
				"TribeData",
			]
			.into_iter()
			.map(Box::from)
			.collect(),
		}
	}
}

impl DecodeOptions {
	/// Preset that keeps every struct payload opaque.
	pub fn shallow() -> Self {
		Self {
			property_structs: Vec::new(),
			..Self::default()
		}
	}

	fn decodes_struct(&self, type_name: &str) -> bool {
		self.property_structs.iter().any(|name| &**name == type_name)
	}
}

/// Value decoder selected by a property type tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyType {
	/// `Int8Property`.
	Int8,
	/// `ByteProperty`.
	Byte,
	/// `Int16Property`.
	Int16,
	/// `UInt16Property`.
	UInt16,
	/// `IntProperty`.
	Int32,
	/// `UInt32Property`.
	UInt32,
	/// `Int64Property`.
	Int64,
	/// `UInt64Property`.
	UInt64,
	/// `FloatProperty`.
	Float,
	/// `DoubleProperty`.
	Double,
	/// `BoolProperty`.
	Bool,
	/// `StrProperty`.
	Str,
	/// `NameProperty`.
	Name,
	/// `ObjectProperty`.
	Object,
	/// `StructProperty`.
	Struct,
	/// `ArrayProperty`.
	Array,
	/// Any other tag; the value is skipped by declared size.
	Unknown,
}

impl PropertyType {
	/// Map an on-disk type tag to its decoder. Matching is case-sensitive.
	pub fn from_tag(tag: &str) -> Self {
		match tag {
			"Int8Property" => Self::Int8,
			"ByteProperty" => Self::Byte,
			"Int16Property" => Self::Int16,
			"UInt16Property" => Self::UInt16,
			"IntProperty" => Self::Int32,
			"UInt32Property" => Self::UInt32,
			"Int64Property" => Self::Int64,
			"UInt64Property" => Self::UInt64,
			"FloatProperty" => Self::Float,
			"DoubleProperty" => Self::Double,
			"BoolProperty" => Self::Bool,
			"StrProperty" => Self::Str,
			"NameProperty" => Self::Name,
			"ObjectProperty" => Self::Object,
			"StructProperty" => Self::Struct,
			"ArrayProperty" => Self::Array,
			_ => Self::Unknown,
		}
	}

	/// Canonical on-disk tag, `None` for [`PropertyType::Unknown`].
	pub fn tag(self) -> Option<&'static str> {
		Some(match self {
			Self::Int8 => "Int8Property",
			Self::Byte => "ByteProperty",
			Self::Int16 => "Int16Property",
			Self::UInt16 => "UInt16Property",
			Self::Int32 => "IntProperty",
			Self::UInt32 => "UInt32Property",
			Self::Int64 => "Int64Property",
			Self::UInt64 => "UInt64Property",
			Self::Float => "FloatProperty",
			Self::Double => "DoubleProperty",
			Self::Bool => "BoolProperty",
			Self::Str => "StrProperty",
			Self::Name => "NameProperty",
			Self::Object => "ObjectProperty",
			Self::Struct => "StructProperty",
			Self::Array => "ArrayProperty",
			Self::Unknown => return None,
		})
	}

	/// Return true for types whose consumed size is checked against the declared size.
	pub fn is_container(self) -> bool {
		matches!(self, Self::Struct | Self::Array)
	}
}

/// Decode one value positioned just past the size and array-index header.
///
/// Scalars consume one padding byte before the payload. Containers consume exactly their own header
/// and elements, leaving the declared-size cross-check to the caller.
pub fn decode_value<'a>(cursor: &mut Cursor<'a>, ty: PropertyType, declared: u64, opt: &DecodeOptions, depth: u32) -> Result<TypedValue<'a>> {
	let start = cursor.pos();
	Ok(match ty {
		PropertyType::Bool => {
			let value = cursor.read_bool()?;
			cursor.skip(1)?;
			TypedValue::Bool(value)
		}
		PropertyType::Byte if declared != 1 => TypedValue::Opaque(read_declared(cursor, declared)?),
		PropertyType::Unknown => TypedValue::Opaque(read_declared(cursor, declared)?),
		PropertyType::Struct => decode_struct(cursor, declared, opt, depth)?,
		PropertyType::Array => decode_array(cursor, start, declared, opt)?,
		scalar => {
			cursor.skip(1)?;
			decode_scalar(cursor, scalar)?
		}
	})
}

fn decode_scalar<'a>(cursor: &mut Cursor<'a>, ty: PropertyType) -> Result<TypedValue<'a>> {
	Ok(match ty {
		PropertyType::Int8 => TypedValue::Int8(cursor.read_i8()?),
		PropertyType::Byte => TypedValue::Byte(cursor.read_u8()?),
		PropertyType::Int16 => TypedValue::Int16(cursor.read_i16()?),
		PropertyType::UInt16 => TypedValue::UInt16(cursor.read_u16()?),
		PropertyType::Int32 => TypedValue::Int32(cursor.read_i32()?),
		PropertyType::UInt32 => TypedValue::UInt32(cursor.read_u32()?),
		PropertyType::Int64 => TypedValue::Int64(cursor.read_i64()?),
		PropertyType::UInt64 => TypedValue::UInt64(cursor.read_u64()?),
		PropertyType::Float => TypedValue::Float32(cursor.read_f32()?),
		PropertyType::Double => TypedValue::Float64(cursor.read_f64()?),
		PropertyType::Bool => TypedValue::Bool(cursor.read_bool()?),
		PropertyType::Str | PropertyType::Name => TypedValue::Str(cursor.read_fstring()?.into()),
		PropertyType::Object => TypedValue::ObjectRef(cursor.read_i32()?),
		PropertyType::Struct | PropertyType::Array | PropertyType::Unknown => TypedValue::Opaque(&[]),
	})
}

fn decode_struct<'a>(cursor: &mut Cursor<'a>, declared: u64, opt: &DecodeOptions, depth: u32) -> Result<TypedValue<'a>> {
	let start = cursor.pos();
	let type_name = cursor.read_fstring()?;
	let guid = cursor.read_guid()?;
	let header = (cursor.pos() - start) as u64;
	let payload = read_declared(cursor, declared.saturating_sub(header))?;

	// Past the depth ceiling the payload stays opaque; its span is already consumed.
	let fields = if !opt.decodes_struct(&type_name) {
		None
	} else if depth >= opt.max_depth {
		debug!(type_name = %type_name, max_depth = opt.max_depth, "struct left opaque at depth ceiling");
		None
	} else {
		let nested = decode_stream_at_depth(payload, opt, depth + 1);
		trace!(type_name = %type_name, fields = nested.bag.len(), end = ?nested.end, "decoded nested struct");
		Some(nested.bag)
	};

	Ok(TypedValue::Struct(StructValue {
		type_name: type_name.into(),
		guid,
		payload,
		fields,
	}))
}

fn decode_array<'a>(cursor: &mut Cursor<'a>, start: usize, declared: u64, opt: &DecodeOptions) -> Result<TypedValue<'a>> {
	let inner = PropertyType::from_tag(&cursor.read_fstring()?);
	let count_at = cursor.pos();
	let raw_count = cursor.read_i32()?;
	let count = usize::try_from(raw_count).ok().filter(|count| *count <= opt.max_array_elems).ok_or(SaveError::ArrayCount {
		at: count_at,
		count: raw_count,
		max: opt.max_array_elems,
	})?;

	let mut items = Vec::with_capacity(count.min(1024));
	match inner {
		PropertyType::Struct | PropertyType::Array | PropertyType::Unknown => {
			let end = usize::try_from(declared).map_or(usize::MAX, |declared| start.saturating_add(declared));
			let span = end.min(cursor.bytes().len()).saturating_sub(cursor.pos());
			if count > 0 && span % count == 0 {
				for _ in 0..count {
					items.push(TypedValue::Opaque(cursor.read_bytes(span / count)?));
				}
			} else if span > 0 {
				trace!(count, span, "array elements kept as one opaque slice");
				items.push(TypedValue::Opaque(cursor.read_bytes(span)?));
			}
		}
		scalar => {
			for _ in 0..count {
				items.push(decode_scalar(cursor, scalar)?);
			}
		}
	}

	Ok(TypedValue::Array(items))
}

fn read_declared<'a>(cursor: &mut Cursor<'a>, declared: u64) -> Result<&'a [u8]> {
	let need = usize::try_from(declared).map_err(|_| SaveError::OutOfBounds {
		at: cursor.pos(),
		need: usize::MAX,
		rem: cursor.remaining(),
	})?;
	cursor.read_bytes(need)
}
