use thiserror::Error;

/// Crate-local result type.
pub type Result<T> = std::result::Result<T, SaveError>;

/// Errors produced while reading and decoding save data.
///
/// Decode-level variants (`OutOfBounds`, `MalformedString`, `ArrayCount`) are raised by the low-level
/// readers and absorbed by the stream decoder and scanner; they surface to callers only through the
/// raw [`Cursor`](crate::save::Cursor) and [`decode_value`](crate::save::decode_value) API. A container
/// size mismatch is reported as [`StreamEnd::Desynced`](crate::save::StreamEnd::Desynced).
#[derive(Debug, Error)]
pub enum SaveError {
	/// Filesystem or stream IO failure.
	#[error("io: {0}")]
	Io(#[from] std::io::Error),
	/// Not enough bytes remained for a requested read.
	#[error("out of bounds at offset {at}, need {need} bytes, remaining {rem}")]
	OutOfBounds {
		/// Byte offset where the read was attempted.
		at: usize,
		/// Requested bytes.
		need: usize,
		/// Bytes still available.
		rem: usize,
	},
	/// Seek target lies past the end of the buffer.
	#[error("seek to {pos} past end of buffer (len={len})")]
	SeekOutOfBounds {
		/// Requested absolute position.
		pos: usize,
		/// Buffer length.
		len: usize,
	},
	/// Length-prefixed string declared a span outside the buffer.
	#[error("malformed string length {len} at offset {at}")]
	MalformedString {
		/// Offset of the length prefix.
		at: usize,
		/// Raw signed length value.
		len: i32,
	},
	/// Array element count is negative or above the configured ceiling.
	#[error("array count {count} at offset {at} exceeds max {max}")]
	ArrayCount {
		/// Offset of the count field.
		at: usize,
		/// Raw signed element count.
		count: i32,
		/// Maximum permitted element count.
		max: usize,
	},
	/// Varint ran past 64 bits without a terminating byte.
	#[error("compressed int at offset {at} overflows 64 bits")]
	CompressedIntOverflow {
		/// Offset of the first varint byte.
		at: usize,
	},
	/// File name does not carry the identity its save kind requires.
	#[error("cannot derive identity from file name stem {stem:?}")]
	InvalidIdentity {
		/// Offending file stem.
		stem: String,
	},
	/// Scanner type label is not one of the known value shapes.
	#[error("unknown value type label: {label}")]
	UnknownTypeLabel {
		/// Label as given.
		label: String,
	},
	/// XP threshold table failed validation.
	#[error("invalid xp table: {reason}")]
	InvalidXpTable {
		/// Validation failure description.
		reason: &'static str,
	},
	/// Worker pool construction failed.
	#[error("thread pool: {0}")]
	ThreadPool(#[from] rayon::ThreadPoolBuildError),
}
