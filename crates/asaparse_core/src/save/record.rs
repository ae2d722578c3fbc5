use std::fmt;

/// Confidence tag carried by every projected record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Provenance {
	/// Every field came from a sentinel-terminated sequential decode.
	#[default]
	Strict,
	/// At least one field came from pattern scanning.
	Heuristic,
}

impl Provenance {
	/// Lowercase label.
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Strict => "strict",
			Self::Heuristic => "heuristic",
		}
	}
}

impl fmt::Display for Provenance {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Where a player level came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LevelSource {
	/// Stored extra-level counter plus one.
	Stored,
	/// Derived from experience through an XP table.
	Experience,
	/// Nothing usable found; level 1.
	#[default]
	Default,
}

impl LevelSource {
	/// Lowercase label.
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Stored => "stored",
			Self::Experience => "experience",
			Self::Default => "default",
		}
	}
}

/// Character attribute values found in a profile.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlayerStats {
	/// Health.
	pub health: Option<f64>,
	/// Stamina.
	pub stamina: Option<f64>,
	/// Torpor.
	pub torpor: Option<f64>,
	/// Oxygen.
	pub oxygen: Option<f64>,
	/// Food.
	pub food: Option<f64>,
	/// Water.
	pub water: Option<f64>,
	/// Carry weight.
	pub weight: Option<f64>,
	/// Melee damage multiplier.
	pub melee_damage: Option<f64>,
	/// Movement speed multiplier.
	pub movement_speed: Option<f64>,
	/// Crafting speed multiplier.
	pub crafting_speed: Option<f64>,
	/// Fortitude.
	pub fortitude: Option<f64>,
	/// Maximum health.
	pub max_health: Option<f64>,
	/// Maximum stamina.
	pub max_stamina: Option<f64>,
	/// Maximum torpor.
	pub max_torpor: Option<f64>,
	/// Maximum oxygen.
	pub max_oxygen: Option<f64>,
	/// Maximum food.
	pub max_food: Option<f64>,
	/// Maximum water.
	pub max_water: Option<f64>,
	/// Maximum carry weight.
	pub max_weight: Option<f64>,
}

impl PlayerStats {
	/// Return true when no stat was found.
	pub fn is_empty(&self) -> bool {
		self == &Self::default()
	}
}

/// Player profile projection.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerRecord {
	/// Caller-supplied EOS id (profile file stem).
	pub eos_id: String,
	/// Platform account name.
	pub player_name: Option<String>,
	/// In-game character name.
	pub character_name: Option<String>,
	/// Owning tribe id.
	pub tribe_id: Option<i64>,
	/// Human-facing level, at least 1.
	pub level: u32,
	/// Origin of `level`.
	pub level_source: LevelSource,
	/// Experience points, 0 when absent.
	pub experience: f64,
	/// Attribute values.
	pub stats: PlayerStats,
	/// Field confidence.
	pub provenance: Provenance,
}

/// Tribe member paired from parallel name and id lists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TribeMember {
	/// Member player name.
	pub name: String,
	/// Member player data id.
	pub player_id: i64,
}

/// Tribe file projection.
#[derive(Debug, Clone, PartialEq)]
pub struct TribeRecord {
	/// Caller-supplied tribe id (tribe file stem).
	pub tribe_id: u32,
	/// Tribe display name.
	pub tribe_name: Option<String>,
	/// Owner player data id.
	pub owner_id: Option<i64>,
	/// Members with both a name and an id.
	pub members: Vec<TribeMember>,
	/// Number of member names found.
	pub member_count: usize,
	/// Tribe log lines in stored order.
	pub tribe_log: Vec<String>,
	/// Tamed creature count.
	pub tamed_dino_count: Option<i64>,
	/// Field confidence.
	pub provenance: Provenance,
}

/// Inventory item projection.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemRecord {
	/// Display name; the custom name when no base name is known.
	pub name: String,
	/// Item class or archetype path.
	pub class_name: Option<String>,
	/// Stack size, 1 when absent.
	pub quantity: u32,
	/// Durability.
	pub durability: Option<f64>,
	/// Quality index or rating.
	pub quality: Option<u32>,
	/// Player-assigned name.
	pub custom_name: Option<String>,
	/// Blueprint flag.
	pub is_blueprint: bool,
	/// Engram flag.
	pub is_engram: bool,
	/// Field confidence.
	pub provenance: Provenance,
}

impl ItemRecord {
	/// Item with a name and default fields.
	pub fn named(name: impl Into<String>, provenance: Provenance) -> Self {
		Self {
			name: name.into(),
			class_name: None,
			quantity: 1,
			durability: None,
			quality: None,
			custom_name: None,
			is_blueprint: false,
			is_engram: false,
			provenance,
		}
	}
}

/// Tamed creature projection from a world actor blob.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DinoRecord {
	/// Caller-supplied actor row key.
	pub actor_id: String,
	/// Species derived from the class name.
	pub species: Option<String>,
	/// Raw class name.
	pub class_name: Option<String>,
	/// Player-assigned name.
	pub name: Option<String>,
	/// Total level.
	pub level: Option<u32>,
	/// Level at taming.
	pub base_level: Option<u32>,
	/// Tamer or owner name.
	pub owner_name: Option<String>,
	/// Owning team id.
	pub tribe_id: Option<i64>,
	/// Owning tribe name.
	pub tribe_name: Option<String>,
	/// Female flag.
	pub is_female: Option<bool>,
	/// Baby flag.
	pub is_baby: Option<bool>,
	/// Always heuristic.
	pub provenance: Provenance,
}

/// Coarse structure grouping by class keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum StructureCategory {
	/// Boxes, vaults, fridges.
	Storage,
	/// Beds and sleeping bags.
	SpawnPoint,
	/// Foundations, walls, doors and similar pieces.
	Building,
	/// Fences, gates, turrets.
	Defense,
	/// Crafting stations.
	Crafting,
	/// Power and communication.
	Utility,
	/// No keyword matched.
	#[default]
	Other,
}

const CATEGORY_KEYWORDS: &[(&str, StructureCategory)] = &[
	("storagebox", StructureCategory::Storage),
	("vault", StructureCategory::Storage),
	("refrigerator", StructureCategory::Storage),
	("preserving", StructureCategory::Storage),
	("bed", StructureCategory::SpawnPoint),
	("sleepingbag", StructureCategory::SpawnPoint),
	("foundation", StructureCategory::Building),
	("wall", StructureCategory::Building),
	("ceiling", StructureCategory::Building),
	("door", StructureCategory::Building),
	("doorframe", StructureCategory::Building),
	("window", StructureCategory::Building),
	("ramp", StructureCategory::Building),
	("pillar", StructureCategory::Building),
	("stair", StructureCategory::Building),
	("fence", StructureCategory::Defense),
	("gate", StructureCategory::Defense),
	("turret", StructureCategory::Defense),
	("plantspecies", StructureCategory::Defense),
	("forge", StructureCategory::Crafting),
	("smithy", StructureCategory::Crafting),
	("fabricator", StructureCategory::Crafting),
	("chembench", StructureCategory::Crafting),
	("mortar", StructureCategory::Crafting),
	("cookingpot", StructureCategory::Crafting),
	("grill", StructureCategory::Crafting),
	("generator", StructureCategory::Utility),
	("airconditioner", StructureCategory::Utility),
	("transmitter", StructureCategory::Utility),
	("tekgenerator", StructureCategory::Utility),
];

impl StructureCategory {
	/// First keyword category contained in `structure_type`, case-insensitive.
	pub fn classify(structure_type: &str) -> Self {
		let lower = structure_type.to_ascii_lowercase();
		CATEGORY_KEYWORDS
			.iter()
			.find(|(keyword, _)| lower.contains(keyword))
			.map_or(Self::Other, |(_, category)| *category)
	}

	/// Human-facing label.
	pub fn label(self) -> &'static str {
		match self {
			Self::Storage => "Storage",
			Self::SpawnPoint => "Spawn Point",
			Self::Building => "Building",
			Self::Defense => "Defense",
			Self::Crafting => "Crafting",
			Self::Utility => "Utility",
			Self::Other => "Other",
		}
	}
}

impl fmt::Display for StructureCategory {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.label())
	}
}

/// Placed structure projection from a world actor blob.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StructureRecord {
	/// Caller-supplied actor row key.
	pub actor_id: String,
	/// Raw class name.
	pub class_name: Option<String>,
	/// Readable type derived from the class name.
	pub structure_type: Option<String>,
	/// Keyword category of `structure_type`.
	pub category: StructureCategory,
	/// Player-assigned name.
	pub structure_name: Option<String>,
	/// Current health.
	pub health: Option<f64>,
	/// Maximum health.
	pub max_health: Option<f64>,
	/// Owner name.
	pub owner_name: Option<String>,
	/// Owning team id.
	pub tribe_id: Option<i64>,
	/// Owning tribe name.
	pub tribe_name: Option<String>,
	/// Lock flag.
	pub is_locked: Option<bool>,
	/// Always heuristic.
	pub provenance: Provenance,
}
