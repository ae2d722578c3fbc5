use std::collections::HashMap;
use std::fmt;

/// Raw 16-byte struct GUID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Guid(pub [u8; 16]);

impl Guid {
	/// Return true when every byte is zero.
	pub fn is_zero(&self) -> bool {
		self.0.iter().all(|byte| *byte == 0)
	}
}

impl fmt::Display for Guid {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let b = &self.0;
		let d1 = u32::from_le_bytes([b[0], b[1], b[2], b[3]]);
		let d2 = u16::from_le_bytes([b[4], b[5]]);
		let d3 = u16::from_le_bytes([b[6], b[7]]);
		write!(f, "{d1:08x}-{d2:04x}-{d3:04x}-{:02x}{:02x}-", b[8], b[9])?;
		for byte in &b[10..] {
			write!(f, "{byte:02x}")?;
		}
		Ok(())
	}
}

/// Decoded property value.
///
/// Borrowed variants point into the source buffer; everything else is owned.
#[derive(Debug, Clone, PartialEq)]
pub enum TypedValue<'a> {
	/// `Int8Property`.
	Int8(i8),
	/// Single-byte `ByteProperty`.
	Byte(u8),
	/// `Int16Property`.
	Int16(i16),
	/// `UInt16Property`.
	UInt16(u16),
	/// `IntProperty`.
	Int32(i32),
	/// `UInt32Property`.
	UInt32(u32),
	/// `Int64Property`.
	Int64(i64),
	/// `UInt64Property`.
	UInt64(u64),
	/// `FloatProperty`.
	Float32(f32),
	/// `DoubleProperty`.
	Float64(f64),
	/// `BoolProperty`.
	Bool(bool),
	/// `StrProperty` or `NameProperty`.
	Str(Box<str>),
	/// `ObjectProperty` numeric handle.
	ObjectRef(i32),
	/// `StructProperty` header and payload.
	Struct(StructValue<'a>),
	/// `ArrayProperty` elements in stream order.
	Array(Vec<TypedValue<'a>>),
	/// Undecoded bytes of an unrecognized type or inner element.
	Opaque(&'a [u8]),
}

impl<'a> TypedValue<'a> {
	/// Integer view of any integer-like value.
	pub fn as_i64(&self) -> Option<i64> {
		match *self {
			Self::Int8(v) => Some(i64::from(v)),
			Self::Byte(v) => Some(i64::from(v)),
			Self::Int16(v) => Some(i64::from(v)),
			Self::UInt16(v) => Some(i64::from(v)),
			Self::Int32(v) | Self::ObjectRef(v) => Some(i64::from(v)),
			Self::UInt32(v) => Some(i64::from(v)),
			Self::Int64(v) => Some(v),
			Self::UInt64(v) => i64::try_from(v).ok(),
			_ => None,
		}
	}

	/// Float view of any numeric value.
	pub fn as_f64(&self) -> Option<f64> {
		match *self {
			Self::Float32(v) => Some(f64::from(v)),
			Self::Float64(v) => Some(v),
			Self::UInt64(v) => Some(v as f64),
			Self::ObjectRef(_) => None,
			_ => self.as_i64().map(|v| v as f64),
		}
	}

	/// Boolean view; a single-byte value counts when it is 0 or 1.
	pub fn as_bool(&self) -> Option<bool> {
		match *self {
			Self::Bool(v) => Some(v),
			Self::Byte(v @ (0 | 1)) => Some(v == 1),
			_ => None,
		}
	}

	/// String view of `Str` values.
	pub fn as_str(&self) -> Option<&str> {
		match self {
			Self::Str(v) => Some(v),
			_ => None,
		}
	}

	/// Element view of `Array` values.
	pub fn as_array(&self) -> Option<&[TypedValue<'a>]> {
		match self {
			Self::Array(items) => Some(items),
			_ => None,
		}
	}

	/// Struct view of `Struct` values.
	pub fn as_struct(&self) -> Option<&StructValue<'a>> {
		match self {
			Self::Struct(item) => Some(item),
			_ => None,
		}
	}

	/// Short variant label used by inspection output.
	pub fn kind(&self) -> &'static str {
		match self {
			Self::Int8(_) => "int8",
			Self::Byte(_) => "byte",
			Self::Int16(_) => "int16",
			Self::UInt16(_) => "uint16",
			Self::Int32(_) => "int32",
			Self::UInt32(_) => "uint32",
			Self::Int64(_) => "int64",
			Self::UInt64(_) => "uint64",
			Self::Float32(_) => "float32",
			Self::Float64(_) => "float64",
			Self::Bool(_) => "bool",
			Self::Str(_) => "str",
			Self::ObjectRef(_) => "object",
			Self::Struct(_) => "struct",
			Self::Array(_) => "array",
			Self::Opaque(_) => "opaque",
		}
	}
}

impl fmt::Display for TypedValue<'_> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Int8(v) => write!(f, "{v}"),
			Self::Byte(v) => write!(f, "{v}"),
			Self::Int16(v) => write!(f, "{v}"),
			Self::UInt16(v) => write!(f, "{v}"),
			Self::Int32(v) => write!(f, "{v}"),
			Self::UInt32(v) => write!(f, "{v}"),
			Self::Int64(v) => write!(f, "{v}"),
			Self::UInt64(v) => write!(f, "{v}"),
			Self::Float32(v) => write!(f, "{v}"),
			Self::Float64(v) => write!(f, "{v}"),
			Self::Bool(v) => write!(f, "{v}"),
			Self::Str(v) => write!(f, "{v:?}"),
			Self::ObjectRef(v) => write!(f, "object#{v}"),
			Self::Struct(item) => match &item.fields {
				Some(fields) => write!(f, "{}{{{} fields}}", item.type_name, fields.len()),
				None => write!(f, "{}[{} bytes]", item.type_name, item.payload.len()),
			},
			Self::Array(items) => write!(f, "[{} items]", items.len()),
			Self::Opaque(bytes) => write!(f, "<{} bytes>", bytes.len()),
		}
	}
}

/// Decoded `StructProperty` value.
#[derive(Debug, Clone, PartialEq)]
pub struct StructValue<'a> {
	/// Struct type name written before the GUID.
	pub type_name: Box<str>,
	/// Struct GUID.
	pub guid: Guid,
	/// Struct body bytes, borrowed from the source buffer.
	pub payload: &'a [u8],
	/// Nested property bag when the struct type is decoded as a property stream.
	pub fields: Option<PropertyBag<'a>>,
}

/// One property decoded by the sequential stream decoder.
#[derive(Debug, Clone, PartialEq)]
pub struct RawProperty<'a> {
	/// Property name.
	pub name: Box<str>,
	/// On-disk type tag, for example `IntProperty`.
	pub type_tag: Box<str>,
	/// Value byte count claimed by the header.
	pub declared_size: u64,
	/// Static array index.
	pub array_index: i32,
	/// Byte offset of the property name in the decoded buffer.
	pub offset: usize,
	/// Decoded value.
	pub value: TypedValue<'a>,
}

/// Ordered property collection for one serialized object.
///
/// Iteration preserves stream order. Name lookups return the last property written under that name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropertyBag<'a> {
	props: Vec<RawProperty<'a>>,
	by_name: HashMap<Box<str>, usize>,
}

impl<'a> PropertyBag<'a> {
	/// Create an empty bag.
	pub fn new() -> Self {
		Self::default()
	}

	/// Append a property, replacing the name lookup target.
	pub fn push(&mut self, prop: RawProperty<'a>) {
		self.by_name.insert(prop.name.clone(), self.props.len());
		self.props.push(prop);
	}

	/// Number of properties in stream order, duplicates included.
	pub fn len(&self) -> usize {
		self.props.len()
	}

	/// Return true when no property was decoded.
	pub fn is_empty(&self) -> bool {
		self.props.is_empty()
	}

	/// Iterate properties in stream order.
	pub fn iter(&self) -> std::slice::Iter<'_, RawProperty<'a>> {
		self.props.iter()
	}

	/// Last property written under `name`.
	pub fn get(&self, name: &str) -> Option<&RawProperty<'a>> {
		self.by_name.get(name).map(|idx| &self.props[*idx])
	}

	/// Every property written under `name`, in stream order.
	pub fn all<'s>(&'s self, name: &'s str) -> impl Iterator<Item = &'s RawProperty<'a>> + 's {
		self.props.iter().filter(move |prop| &*prop.name == name)
	}

	/// Value of the last property written under `name`.
	pub fn value(&self, name: &str) -> Option<&TypedValue<'a>> {
		self.get(name).map(|prop| &prop.value)
	}

	/// Value under `name`, searching nested struct bags depth-first when absent at this level.
	pub fn find(&self, name: &str) -> Option<&TypedValue<'a>> {
		self.value(name).or_else(|| {
			self.props
				.iter()
				.filter_map(|prop| prop.value.as_struct()?.fields.as_ref())
				.find_map(|fields| fields.find(name))
		})
	}

	/// String value under `name`.
	pub fn str(&self, name: &str) -> Option<&str> {
		self.value(name).and_then(TypedValue::as_str)
	}

	/// Integer value under `name`.
	pub fn i64(&self, name: &str) -> Option<i64> {
		self.value(name).and_then(TypedValue::as_i64)
	}

	/// Numeric value under `name`.
	pub fn f64(&self, name: &str) -> Option<f64> {
		self.value(name).and_then(TypedValue::as_f64)
	}

	/// Boolean value under `name`.
	pub fn bool(&self, name: &str) -> Option<bool> {
		self.value(name).and_then(TypedValue::as_bool)
	}

	/// Array elements under `name`.
	pub fn array(&self, name: &str) -> Option<&[TypedValue<'a>]> {
		self.value(name).and_then(TypedValue::as_array)
	}
}

impl<'s, 'a> IntoIterator for &'s PropertyBag<'a> {
	type Item = &'s RawProperty<'a>;
	type IntoIter = std::slice::Iter<'s, RawProperty<'a>>;

	fn into_iter(self) -> Self::IntoIter {
		self.props.iter()
	}
}
