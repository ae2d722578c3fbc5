use crate::save::project::ProjectOptions;
use crate::save::scan::{contains_bytes, find_bool, find_class_name, find_f64, find_int, find_str, find_u16, probe_f32, probe_flag, probe_i32, probe_str};
use crate::save::{DinoRecord, Provenance, StructureCategory, StructureRecord};

/// Creature controller class suffixes, most specific last.
pub(crate) const DINO_CLASS_PATTERNS: &[&str] = &["_Character_BP_C", "_Character_C", "Dino_Character_BP_C", "_Dino_Character_C"];

/// Structure class markers; the generic `_C` suffix is tried last.
pub(crate) const STRUCTURE_CLASS_PATTERNS: &[&str] = &[
	"Structure_",
	"StorageBox_",
	"Bed_",
	"Door_",
	"Wall_",
	"Foundation_",
	"Ceiling_",
	"Ramp_",
	"Pillar_",
	"Fence_",
	"Gate_",
	"_C",
];

/// Window for structure health and team probes.
const STRUCTURE_PROBE_WINDOW: usize = 50;

/// Project a tamed creature from a world actor blob.
///
/// Returns `None` when neither species, name nor owner could be recovered.
pub fn project_dino(bytes: &[u8], actor_id: &str, opt: &ProjectOptions) -> Option<DinoRecord> {
	let scan = &opt.scan;
	let class_name = DINO_CLASS_PATTERNS
		.iter()
		.find(|pattern| contains_bytes(bytes, pattern.as_bytes()))
		.and_then(|pattern| find_class_name(bytes, pattern, scan.class_lookback, |_| true))
		.map(|hit| hit.value);
	let species = class_name.as_deref().map(species_from_class);

	let name = ["TamedName", "CustomTag", "DinoNameTag"]
		.iter()
		.find_map(|field| loose_str(bytes, field, scan.probe_window));
	let owner_name = ["TamerString", "OwnerName"]
		.iter()
		.find_map(|field| loose_str(bytes, field, scan.probe_window));
	let tribe_name = loose_str(bytes, "TribeName", scan.probe_window);

	let plausible_level = |v: i32| v > 0 && v < 1000;
	let base_level = loose_int(bytes, "BaseCharacterLevel", scan.probe_window, plausible_level);
	let character_level = loose_int(bytes, "CharacterLevel", scan.probe_window, plausible_level);
	let extra_level = loose_int(bytes, "ExtraCharacterLevel", scan.probe_window, |v| (0..1000).contains(&v));
	let level = match (character_level, base_level, extra_level) {
		(Some(level), _, _) => Some(level),
		(None, Some(base), Some(extra)) => Some(base + extra),
		(None, Some(base), None) => Some(base),
		(None, None, Some(extra)) => Some(extra + 1),
		(None, None, None) => None,
	};

	let record = DinoRecord {
		actor_id: actor_id.to_owned(),
		species,
		class_name,
		name,
		level,
		base_level,
		owner_name,
		tribe_id: loose_int(bytes, "TargetingTeam", scan.probe_window, |v| v > 0).map(i64::from),
		tribe_name,
		is_female: loose_flag(bytes, "bIsFemale", scan.probe_window),
		is_baby: loose_flag(bytes, "bIsBaby", scan.probe_window),
		provenance: Provenance::Heuristic,
	};

	(record.species.is_some() || record.name.is_some() || record.owner_name.is_some()).then_some(record)
}

/// Project a placed structure from a world actor blob.
///
/// Returns `None` when neither type, tribe nor owner could be recovered.
pub fn project_structure(bytes: &[u8], actor_id: &str, opt: &ProjectOptions) -> Option<StructureRecord> {
	let scan = &opt.scan;
	let class_name = STRUCTURE_CLASS_PATTERNS
		.iter()
		.filter(|pattern| contains_bytes(bytes, pattern.as_bytes()))
		.find_map(|pattern| find_class_name(bytes, pattern, scan.class_lookback, |name| name.len() > 3 && name.ends_with("_C")))
		.map(|hit| hit.value);
	let structure_type = class_name.as_deref().map(structure_type_from_class);
	let category = structure_type.as_deref().map_or(StructureCategory::Other, StructureCategory::classify);

	let health = find_f64(bytes, "Health").or_else(|| {
		probe_f32(bytes, "Health", STRUCTURE_PROBE_WINDOW, |v| v > 0.0 && v < 1_000_000.0).map(|hit| f64::from(hit.value))
	});

	let record = StructureRecord {
		actor_id: actor_id.to_owned(),
		class_name,
		structure_type,
		category,
		structure_name: loose_str(bytes, "CustomName", scan.probe_window),
		health,
		max_health: find_f64(bytes, "MaxHealth"),
		owner_name: loose_str(bytes, "OwnerName", scan.probe_window),
		tribe_id: loose_int(bytes, "TargetingTeam", STRUCTURE_PROBE_WINDOW, |v| v > 0).map(i64::from),
		tribe_name: loose_str(bytes, "TribeName", scan.probe_window),
		is_locked: loose_flag(bytes, "bIsLocked", scan.probe_window),
		provenance: Provenance::Heuristic,
	};

	(record.structure_type.is_some() || record.tribe_name.is_some() || record.owner_name.is_some()).then_some(record)
}

/// Readable species from a creature class name, e.g. `Raptor_Character_BP_C` -> `Raptor`.
pub fn species_from_class(class_name: &str) -> String {
	let stripped = class_name.replace("_Character_BP_C", "").replace("_Character_C", "");
	let mut parts: Vec<&str> = stripped.split('_').filter(|part| !part.is_empty()).collect();
	if parts.first().is_some_and(|first| matches!(*first, "Dino" | "Character" | "BP")) {
		parts.remove(0);
	}
	if parts.is_empty() {
		class_name.to_owned()
	} else {
		parts.join(" ")
	}
}

/// Readable structure type from a class name, e.g. `StorageBox_Large_C` -> `StorageBox Large`.
pub fn structure_type_from_class(class_name: &str) -> String {
	let stripped = class_name.strip_suffix("_C").unwrap_or(class_name);
	let parts: Vec<&str> = stripped
		.split('_')
		.filter(|part| !part.is_empty() && !matches!(*part, "Structure" | "PrimalItem" | "BP"))
		.collect();
	if parts.is_empty() {
		class_name.to_owned()
	} else {
		parts.join(" ")
	}
}

fn loose_str(bytes: &[u8], name: &str, window: usize) -> Option<String> {
	find_str(bytes, name).or_else(|| probe_str(bytes, name, window).map(|hit| hit.value))
}

fn loose_int(bytes: &[u8], name: &str, window: usize, accept: impl Fn(i32) -> bool + Copy) -> Option<u32> {
	find_int(bytes, name)
		.or_else(|| find_u16(bytes, name).map(i64::from))
		.and_then(|v| i32::try_from(v).ok())
		.filter(|v| accept(*v))
		.or_else(|| probe_i32(bytes, name, window, accept).map(|hit| hit.value))
		.and_then(|v| u32::try_from(v).ok())
}

fn loose_flag(bytes: &[u8], name: &str, window: usize) -> Option<bool> {
	find_bool(bytes, name).or_else(|| probe_flag(bytes, name, window).map(|hit| hit.value))
}
