use tracing::{debug, trace};

use crate::save::bytes::Cursor;
use crate::save::codec::{PropertyType, decode_value};
use crate::save::{DecodeOptions, PropertyBag, RawProperty, SaveError};

/// Reason a property stream stopped producing properties.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEnd {
	/// `None` or empty property name.
	Sentinel,
	/// Buffer consumed exactly at a property boundary, or fewer than 4 bytes left for a name.
	Exhausted,
	/// A property header or value ran past the end of the buffer.
	Truncated {
		/// Offset of the property that could not be completed.
		at: usize,
	},
	/// A property name or type tag carried an impossible length prefix.
	MalformedName {
		/// Offset of the malformed string.
		at: usize,
	},
	/// A container value disagreed with its declared size and could not be resynchronized.
	Desynced {
		/// Property being decoded.
		property: Box<str>,
		/// Declared value size.
		declared: u64,
		/// Bytes actually consumed.
		consumed: u64,
	},
}

/// Full outcome of a sequential decode pass.
#[derive(Debug, Clone)]
pub struct StreamDecode<'a> {
	/// Properties decoded before the stream ended.
	pub bag: PropertyBag<'a>,
	/// Termination reason.
	pub end: StreamEnd,
	/// Number of container values whose size mismatch was recovered by seeking.
	pub resyncs: usize,
}

impl StreamDecode<'_> {
	/// Return true when the stream ended on its sentinel.
	pub fn is_complete(&self) -> bool {
		self.end == StreamEnd::Sentinel
	}
}

/// Lazy iterator over the properties of one serialized object.
///
/// Once the iterator yields `None`, [`PropertyStream::end`] reports why.
pub struct PropertyStream<'a, 'o> {
	cursor: Cursor<'a>,
	opt: &'o DecodeOptions,
	depth: u32,
	resyncs: usize,
	end: Option<StreamEnd>,
}

enum Step<'a> {
	Property(RawProperty<'a>),
	Skipped,
	End(StreamEnd),
}

impl<'a, 'o> PropertyStream<'a, 'o> {
	/// Start reading properties at offset 0.
	pub fn new(bytes: &'a [u8], opt: &'o DecodeOptions) -> Self {
		Self::at_depth(bytes, opt, 0)
	}

	fn at_depth(bytes: &'a [u8], opt: &'o DecodeOptions, depth: u32) -> Self {
		Self {
			cursor: Cursor::new(bytes),
			opt,
			depth,
			resyncs: 0,
			end: None,
		}
	}

	/// Termination reason, `None` while properties remain.
	pub fn end(&self) -> Option<&StreamEnd> {
		self.end.as_ref()
	}

	/// Current byte offset.
	pub fn pos(&self) -> usize {
		self.cursor.pos()
	}

	fn step(&mut self) -> Step<'a> {
		if self.cursor.remaining() == 0 {
			return Step::End(StreamEnd::Exhausted);
		}

		let at = self.cursor.pos();
		let name = match self.cursor.read_fstring() {
			Ok(name) => name,
			Err(SaveError::MalformedString { at, .. }) => return Step::End(StreamEnd::MalformedName { at }),
			Err(_) => return Step::End(StreamEnd::Exhausted),
		};
		if name.is_empty() || name == "None" {
			return Step::End(StreamEnd::Sentinel);
		}

		let tag = match self.cursor.read_fstring() {
			Ok(tag) => tag,
			Err(SaveError::MalformedString { at, .. }) => return Step::End(StreamEnd::MalformedName { at }),
			Err(_) => return Step::End(StreamEnd::Truncated { at }),
		};
		let (declared_size, array_index) = match (self.cursor.read_u64(), self.cursor.read_i32()) {
			(Ok(size), Ok(index)) => (size, index),
			_ => return Step::End(StreamEnd::Truncated { at }),
		};

		let ty = PropertyType::from_tag(&tag);
		let value_start = self.cursor.pos();
		let decoded = decode_value(&mut self.cursor, ty, declared_size, self.opt, self.depth);
		let consumed = (self.cursor.pos() - value_start) as u64;

		match decoded {
			Ok(value) => {
				if ty.is_container() && consumed != declared_size && !self.resync(&name, value_start, declared_size, consumed) {
					return Step::End(StreamEnd::Desynced {
						property: name.into(),
						declared: declared_size,
						consumed,
					});
				}
				trace!(name = %name, tag = %tag, at, "decoded property");
				Step::Property(RawProperty {
					name: name.into(),
					type_tag: tag.into(),
					declared_size,
					array_index,
					offset: at,
					value,
				})
			}
			Err(SaveError::OutOfBounds { .. }) => Step::End(StreamEnd::Truncated { at }),
			Err(err) => {
				debug!(name = %name, tag = %tag, at, error = %err, "property value failed to decode");
				if self.resync(&name, value_start, declared_size, consumed) {
					Step::Skipped
				} else {
					Step::End(StreamEnd::Desynced {
						property: name.into(),
						declared: declared_size,
						consumed,
					})
				}
			}
		}
	}

	fn resync(&mut self, name: &str, value_start: usize, declared: u64, consumed: u64) -> bool {
		let Some(target) = usize::try_from(declared).ok().and_then(|declared| value_start.checked_add(declared)) else {
			return false;
		};
		if self.cursor.seek(target).is_err() {
			return false;
		}
		self.resyncs += 1;
		debug!(name, declared, consumed, target, "resynchronized after size mismatch");
		true
	}
}

impl<'a> Iterator for PropertyStream<'a, '_> {
	type Item = RawProperty<'a>;

	fn next(&mut self) -> Option<Self::Item> {
		while self.end.is_none() {
			match self.step() {
				Step::Property(prop) => return Some(prop),
				Step::Skipped => {}
				Step::End(end) => self.end = Some(end),
			}
		}
		None
	}
}

/// Decode a property stream and report how it ended.
///
/// Never fails: every decode error ends the stream and the properties read so far are returned.
pub fn decode_property_stream<'a>(bytes: &'a [u8], opt: &DecodeOptions) -> StreamDecode<'a> {
	decode_stream_at_depth(bytes, opt, 0)
}

/// Decode a property stream into a bag, discarding the termination reason.
pub fn decode_property_bag<'a>(bytes: &'a [u8], opt: &DecodeOptions) -> PropertyBag<'a> {
	decode_property_stream(bytes, opt).bag
}

pub(crate) fn decode_stream_at_depth<'a>(bytes: &'a [u8], opt: &DecodeOptions, depth: u32) -> StreamDecode<'a> {
	let mut stream = PropertyStream::at_depth(bytes, opt, depth);
	let mut bag = PropertyBag::new();
	for prop in stream.by_ref() {
		bag.push(prop);
	}

	let end = stream.end.take().unwrap_or(StreamEnd::Exhausted);
	debug!(depth, properties = bag.len(), end = ?end, resyncs = stream.resyncs, "property stream finished");
	StreamDecode {
		bag,
		end,
		resyncs: stream.resyncs,
	}
}
