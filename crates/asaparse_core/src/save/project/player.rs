use tracing::debug;

use crate::save::project::{FieldReader, ProjectOptions};
use crate::save::{LevelSource, PlayerRecord, PlayerStats, PropertyBag, decode_property_stream};

const LEVEL_FIELDS: &[&str] = &[
	"ExtraCharacterLevel",
	"CharacterStatusComponent_ExtraCharacterLevel",
	"MyCharacterStatusComponent_ExtraCharacterLevel",
	"CharacterStatusComponent_Extra_CharacterLevel",
];

const STATUS_VALUES: &str = "CurrentStatusValues";

/// Positional slots mapped from the current-status array.
const STATUS_SLOTS: usize = 8;

const EXPERIENCE_FIELDS: &[&str] = &["CharacterStatusComponent_ExperiencePoints", "ExperiencePoints", "Experience", "XP"];

/// Project a profile buffer: sequential decode first, pattern scan for anything it missed.
pub fn project_player(bytes: &[u8], eos_id: &str, opt: &ProjectOptions) -> PlayerRecord {
	let decoded = decode_property_stream(bytes, &opt.decode);
	let mut reader = FieldReader::new(bytes, &decoded, &opt.scan);
	let record = read_player(&mut reader, eos_id, opt);
	debug!(eos_id, provenance = %record.provenance, level = record.level, "projected player");
	record
}

/// Project an already decoded bag without scanning; the result is always strict.
pub fn project_player_from_bag(bag: &PropertyBag<'_>, eos_id: &str, opt: &ProjectOptions) -> PlayerRecord {
	let mut reader = FieldReader::bag_only(bag, &opt.scan);
	read_player(&mut reader, eos_id, opt)
}

fn read_player(reader: &mut FieldReader<'_, '_>, eos_id: &str, opt: &ProjectOptions) -> PlayerRecord {
	let player_name = reader.str(&["PlayerName"]);
	let character_name = reader.str(&["PlayerCharacterName"]);
	let tribe_id = reader.int(&["TribeID", "TribeId"]);
	let stored = reader.int(LEVEL_FIELDS).and_then(|extra| u32::try_from(extra).ok()).map(|extra| extra.saturating_add(1));
	let experience = reader.float(EXPERIENCE_FIELDS).unwrap_or(0.0);
	let stats = read_stats(reader);

	let (level, level_source) = match (stored, opt.xp_table.as_deref()) {
		(Some(level), _) if level > 1 => (level, LevelSource::Stored),
		(_, Some(table)) if experience > 0.0 => (table.level_for(experience), LevelSource::Experience),
		(Some(level), _) => (level, LevelSource::Stored),
		(None, _) => (1, LevelSource::Default),
	};

	PlayerRecord {
		eos_id: eos_id.to_owned(),
		player_name,
		character_name,
		tribe_id,
		level,
		level_source,
		experience,
		stats,
		provenance: reader.provenance(),
	}
}

fn read_stats(reader: &mut FieldReader<'_, '_>) -> PlayerStats {
	let mut stat = |name: &str| {
		let prefixed = format!("CharacterStatusComponent_{name}");
		reader.float(&[prefixed.as_str(), name]).filter(|value| (0.0..1_000_000.0).contains(value))
	};

	let mut stats = PlayerStats {
		health: stat("Health"),
		stamina: stat("Stamina"),
		torpor: stat("Torpor"),
		oxygen: stat("Oxygen"),
		food: stat("Food"),
		water: stat("Water"),
		weight: stat("Weight"),
		melee_damage: stat("MeleeDamage"),
		movement_speed: stat("MovementSpeed"),
		crafting_speed: stat("CraftingSpeed"),
		fortitude: stat("Fortitude"),
		max_health: stat("MaxHealth"),
		max_stamina: stat("MaxStamina"),
		max_torpor: stat("MaxTorpor"),
		max_oxygen: stat("MaxOxygen"),
		max_food: stat("MaxFood"),
		max_water: stat("MaxWater"),
		max_weight: stat("MaxWeight"),
	};
	fill_from_status_values(&mut stats, &reader.float_list(STATUS_VALUES));
	stats
}

/// Fill stats the named properties left unset from the positional current-status array.
///
/// Positions follow `health, stamina, torpor, oxygen, food, water, weight, melee damage`; only
/// positive values are taken, and arrays shorter than that are ignored.
fn fill_from_status_values(stats: &mut PlayerStats, values: &[f64]) {
	if values.len() < STATUS_SLOTS {
		if !values.is_empty() {
			debug!(values = values.len(), "status value array too short");
		}
		return;
	}
	let slots = [
		&mut stats.health,
		&mut stats.stamina,
		&mut stats.torpor,
		&mut stats.oxygen,
		&mut stats.food,
		&mut stats.water,
		&mut stats.weight,
		&mut stats.melee_damage,
	];
	for (slot, value) in slots.into_iter().zip(values) {
		if slot.is_none() && *value > 0.0 {
			*slot = Some(*value);
		}
	}
}
