use std::collections::HashMap;

use tracing::debug;

use crate::save::project::{STRUCTURE_CLASS_PATTERNS, project_dino, project_structure};
use crate::save::scan::contains_bytes;
use crate::save::{DinoRecord, ProjectOptions, StructureCategory, StructureRecord};

/// Coarse actor classification from byte markers alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActorKind {
	/// Creature controller with taming or ownership markers.
	Creature,
	/// Placed structure.
	Structure,
	/// Neither; not projected.
	Other,
}

/// Classify a world actor blob without decoding it.
///
/// A creature blob names a `Character` or `Dino` class and carries a `Tamed`, `Owner` or `Tribe`
/// marker. A structure blob carries a structure class marker and never mentions `Character` or
/// `Player`.
pub fn classify_actor(bytes: &[u8]) -> ActorKind {
	let has = |marker: &str| contains_bytes(bytes, marker.as_bytes());

	if (has("Character") || has("Dino")) && (has("Tamed") || has("Owner") || has("Tribe")) {
		return ActorKind::Creature;
	}
	if !has("Character") && !has("Player") && STRUCTURE_CLASS_PATTERNS.iter().any(|pattern| has(pattern)) {
		return ActorKind::Structure;
	}
	ActorKind::Other
}

/// Projected world actor.
#[derive(Debug, Clone, PartialEq)]
pub enum WorldActor {
	/// Tamed creature.
	Dino(DinoRecord),
	/// Placed structure.
	Structure(StructureRecord),
}

/// Classify one blob and project it with the matching heuristic projector.
///
/// Returns `None` for unclassified blobs and for blobs whose projection carries nothing meaningful.
pub fn project_actor(key: &str, bytes: &[u8], opt: &ProjectOptions) -> Option<WorldActor> {
	match classify_actor(bytes) {
		ActorKind::Creature => project_dino(bytes, key, opt).map(WorldActor::Dino),
		ActorKind::Structure => project_structure(bytes, key, opt).map(WorldActor::Structure),
		ActorKind::Other => None,
	}
}

/// One row of the world save's embedded key-value store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActorRow {
	/// Row key, used as the actor id.
	pub key: String,
	/// Opaque actor blob.
	pub value: Vec<u8>,
}

impl ActorRow {
	/// Build a row from a key and blob.
	pub fn new(key: impl Into<String>, value: impl Into<Vec<u8>>) -> Self {
		Self {
			key: key.into(),
			value: value.into(),
		}
	}
}

/// Creatures and structures recovered from many actor rows, in row order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorldScan {
	/// Projected creatures.
	pub dinos: Vec<DinoRecord>,
	/// Projected structures.
	pub structures: Vec<StructureRecord>,
	/// Rows that were empty, unclassified, or carried nothing meaningful.
	pub skipped: usize,
}

impl WorldScan {
	/// Collect projected actors; `None` entries count as skipped.
	pub fn from_actors(actors: impl IntoIterator<Item = Option<WorldActor>>) -> Self {
		let mut scan = Self::default();
		for actor in actors {
			match actor {
				Some(WorldActor::Dino(dino)) => scan.dinos.push(dino),
				Some(WorldActor::Structure(structure)) => scan.structures.push(structure),
				None => scan.skipped += 1,
			}
		}
		debug!(
			dinos = scan.dinos.len(),
			structures = scan.structures.len(),
			skipped = scan.skipped,
			"classified world actors"
		);
		scan
	}

	/// Creatures owned by `tribe_id`.
	pub fn dinos_for_tribe(&self, tribe_id: i64) -> Vec<&DinoRecord> {
		self.dinos.iter().filter(|dino| dino.tribe_id == Some(tribe_id)).collect()
	}

	/// Structures owned by `tribe_id`.
	pub fn structures_for_tribe(&self, tribe_id: i64) -> Vec<&StructureRecord> {
		self.structures.iter().filter(|structure| structure.tribe_id == Some(tribe_id)).collect()
	}

	/// Creature count per species, highest count first, ties by name.
	pub fn species_summary(&self) -> Vec<(String, usize)> {
		let mut counts: HashMap<&str, usize> = HashMap::new();
		for dino in &self.dinos {
			*counts.entry(dino.species.as_deref().unwrap_or("Unknown")).or_insert(0) += 1;
		}
		sorted_counts(counts.into_iter().map(|(species, count)| (species.to_owned(), count)))
	}

	/// Structure count per category, highest count first, ties by category order.
	pub fn category_summary(&self) -> Vec<(StructureCategory, usize)> {
		let mut counts: HashMap<StructureCategory, usize> = HashMap::new();
		for structure in &self.structures {
			*counts.entry(structure.category).or_insert(0) += 1;
		}
		sorted_counts(counts)
	}

	/// The `limit` most common structure types, highest count first, ties by name.
	///
	/// Structures without a known type are counted as `Unknown`. The total is `structures.len()`.
	pub fn type_summary(&self, limit: usize) -> Vec<(String, usize)> {
		let mut counts: HashMap<&str, usize> = HashMap::new();
		for structure in &self.structures {
			*counts.entry(structure.structure_type.as_deref().unwrap_or("Unknown")).or_insert(0) += 1;
		}
		let mut out = sorted_counts(counts.into_iter().map(|(kind, count)| (kind.to_owned(), count)));
		out.truncate(limit);
		out
	}

	/// Creatures whose name or species contains `term`, ignoring case.
	pub fn search_dinos(&self, term: &str) -> Vec<&DinoRecord> {
		let term = term.to_lowercase();
		self.dinos
			.iter()
			.filter(|dino| [&dino.name, &dino.species].into_iter().any(|field| contains_folded(field.as_deref(), &term)))
			.collect()
	}

	/// Structures whose type, owner or tribe name contains `term`, ignoring case.
	pub fn search_structures(&self, term: &str) -> Vec<&StructureRecord> {
		let term = term.to_lowercase();
		self.structures
			.iter()
			.filter(|structure| {
				[&structure.structure_type, &structure.owner_name, &structure.tribe_name]
					.into_iter()
					.any(|field| contains_folded(field.as_deref(), &term))
			})
			.collect()
	}
}

/// Classify and project every row sequentially.
pub fn scan_world_actors(rows: &[ActorRow], opt: &ProjectOptions) -> WorldScan {
	WorldScan::from_actors(rows.iter().map(|row| project_actor(&row.key, &row.value, opt)))
}

fn contains_folded(field: Option<&str>, term: &str) -> bool {
	field.is_some_and(|text| text.to_lowercase().contains(term))
}

fn sorted_counts<K: Ord>(counts: impl IntoIterator<Item = (K, usize)>) -> Vec<(K, usize)> {
	let mut out: Vec<(K, usize)> = counts.into_iter().collect();
	out.sort_by(|(a_key, a_count), (b_key, b_count)| b_count.cmp(a_count).then_with(|| a_key.cmp(b_key)));
	out
}
