use std::path::PathBuf;

use asaparse::save::{ActorKind, DinoRecord, SaveFile, StructureRecord, WorldActor, classify_actor, project_actor};

use crate::cmd::util::{Tuning, emit_json, or_dash};

#[derive(clap::Args)]
pub struct Args {
	/// Actor blob exported from the world save's key-value store.
	pub file: PathBuf,
	/// Actor id to report; defaults to the file stem.
	#[arg(long)]
	pub key: Option<String>,
	#[arg(long)]
	pub json: bool,
}

/// Classify one world actor blob and project it.
pub fn run(args: Args, tuning: &Tuning) -> asaparse::save::Result<()> {
	let Args { file: path, key, json } = args;

	let file = SaveFile::open(&path)?;
	let key = key.unwrap_or_else(|| file.identity());
	let kind = classify_actor(file.bytes());
	let actor = project_actor(&key, file.bytes(), &tuning.project_options());

	if json {
		let payload = ActorJson {
			path: path.display().to_string(),
			key,
			kind: kind_label(kind),
			dino: match &actor {
				Some(WorldActor::Dino(record)) => Some(DinoJson::from(record)),
				_ => None,
			},
			structure: match &actor {
				Some(WorldActor::Structure(record)) => Some(StructureJson::from(record)),
				_ => None,
			},
		};
		emit_json(&payload);
		return Ok(());
	}

	println!("path: {}", path.display());
	println!("key: {key}");
	println!("kind: {}", kind_label(kind));
	match actor {
		Some(WorldActor::Dino(record)) => {
			println!("species: {}", or_dash(record.species.as_deref()));
			println!("class: {}", or_dash(record.class_name.as_deref()));
			println!("name: {}", or_dash(record.name.as_deref()));
			println!("level: {}", or_dash(record.level));
			println!("base_level: {}", or_dash(record.base_level));
			println!("owner: {}", or_dash(record.owner_name.as_deref()));
			println!("tribe_id: {}", or_dash(record.tribe_id));
			println!("tribe_name: {}", or_dash(record.tribe_name.as_deref()));
			println!("female: {}", or_dash(record.is_female));
			println!("baby: {}", or_dash(record.is_baby));
		}
		Some(WorldActor::Structure(record)) => {
			println!("type: {}", or_dash(record.structure_type.as_deref()));
			println!("category: {}", record.category);
			println!("class: {}", or_dash(record.class_name.as_deref()));
			println!("name: {}", or_dash(record.structure_name.as_deref()));
			println!("health: {} / {}", or_dash(record.health), or_dash(record.max_health));
			println!("owner: {}", or_dash(record.owner_name.as_deref()));
			println!("tribe_id: {}", or_dash(record.tribe_id));
			println!("tribe_name: {}", or_dash(record.tribe_name.as_deref()));
			println!("locked: {}", or_dash(record.is_locked));
		}
		None => println!("projection: none"),
	}

	Ok(())
}

fn kind_label(kind: ActorKind) -> &'static str {
	match kind {
		ActorKind::Creature => "creature",
		ActorKind::Structure => "structure",
		ActorKind::Other => "other",
	}
}

#[derive(serde::Serialize)]
struct DinoJson {
	species: Option<String>,
	class_name: Option<String>,
	name: Option<String>,
	level: Option<u32>,
	base_level: Option<u32>,
	owner_name: Option<String>,
	tribe_id: Option<i64>,
	tribe_name: Option<String>,
	is_female: Option<bool>,
	is_baby: Option<bool>,
}

impl From<&DinoRecord> for DinoJson {
	fn from(record: &DinoRecord) -> Self {
		Self {
			species: record.species.clone(),
			class_name: record.class_name.clone(),
			name: record.name.clone(),
			level: record.level,
			base_level: record.base_level,
			owner_name: record.owner_name.clone(),
			tribe_id: record.tribe_id,
			tribe_name: record.tribe_name.clone(),
			is_female: record.is_female,
			is_baby: record.is_baby,
		}
	}
}

#[derive(serde::Serialize)]
struct StructureJson {
	structure_type: Option<String>,
	category: &'static str,
	class_name: Option<String>,
	structure_name: Option<String>,
	health: Option<f64>,
	max_health: Option<f64>,
	owner_name: Option<String>,
	tribe_id: Option<i64>,
	tribe_name: Option<String>,
	is_locked: Option<bool>,
}

impl From<&StructureRecord> for StructureJson {
	fn from(record: &StructureRecord) -> Self {
		Self {
			structure_type: record.structure_type.clone(),
			category: record.category.label(),
			class_name: record.class_name.clone(),
			structure_name: record.structure_name.clone(),
			health: record.health,
			max_health: record.max_health,
			owner_name: record.owner_name.clone(),
			tribe_id: record.tribe_id,
			tribe_name: record.tribe_name.clone(),
			is_locked: record.is_locked,
		}
	}
}

#[derive(serde::Serialize)]
struct ActorJson {
	path: String,
	key: String,
	kind: &'static str,
	dino: Option<DinoJson>,
	structure: Option<StructureJson>,
}
