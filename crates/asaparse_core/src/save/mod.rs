mod actor;
mod batch;
mod bytes;
mod codec;
mod error;
mod file;
mod levels;
mod project;
mod record;
mod scan;
mod stream;
mod string;
mod value;

/// World actor classification and aggregate world views.
pub use actor::{ActorKind, ActorRow, WorldActor, WorldScan, classify_actor, project_actor, scan_world_actors};
/// Parallel projection over many loaded units.
pub use batch::{BatchOptions, BatchRunner};
/// Bounds-checked little-endian reader.
pub use bytes::Cursor;
/// Typed value dispatch by property tag.
pub use codec::{DecodeOptions, PropertyType, decode_value};
/// Error and result types.
pub use error::{Result, SaveError};
/// Save unit input.
pub use file::{SaveFile, SaveKind};
/// Experience-to-level table.
pub use levels::XpTable;
/// Domain record projections.
pub use project::{
	ProjectOptions, project_dino, project_inventory, project_player, project_player_from_bag, project_structure, project_tribe, species_from_class,
	structure_type_from_class,
};
/// Domain records.
pub use record::{
	DinoRecord, ItemRecord, LevelSource, PlayerRecord, PlayerStats, Provenance, StructureCategory, StructureRecord, TribeMember, TribeRecord,
};
/// Validated pattern scans and loose probes over raw buffers.
pub use scan::{
	ExpectedType, Matches, Probed, ScanMatch, ScanOptions, contains_bytes, find_all, find_all_int, find_all_str, find_array_values, find_bool, find_bytes,
	find_class_name, find_f64, find_int, find_str, find_u16, find_value, probe_f32, probe_flag, probe_i32, probe_str, scan_matches,
};
/// Sequential property stream decoding.
pub use stream::{PropertyStream, StreamDecode, StreamEnd, decode_property_bag, decode_property_stream};
/// Length-prefixed string codec.
pub use string::decode_string_at;
/// Decoded value tree.
pub use value::{Guid, PropertyBag, RawProperty, StructValue, TypedValue};
