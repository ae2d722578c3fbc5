use std::path::PathBuf;

use asaparse::save::{BatchRunner, PlayerRecord, SaveFile};

use crate::cmd::util::{Tuning, emit_json, or_dash};

#[derive(clap::Args)]
pub struct Args {
	/// Profile files; the file stem is used as the EOS id.
	#[arg(required = true)]
	pub files: Vec<PathBuf>,
	#[arg(long)]
	pub json: bool,
}

/// Project one or more player profiles.
pub fn run(args: Args, tuning: &Tuning) -> asaparse::save::Result<()> {
	let Args { files, json } = args;

	let units = files
		.iter()
		.map(|path| SaveFile::open(path).map(|file| (file.identity(), file.bytes().to_vec())))
		.collect::<asaparse::save::Result<Vec<_>>>()?;
	let runner = BatchRunner::new(&tuning.batch_options(), tuning.project_options())?;
	let records = runner.players(&units);

	if json {
		let payload: Vec<PlayerJson> = files.iter().zip(&records).map(|(path, record)| PlayerJson::new(path, record)).collect();
		emit_json(&payload);
		return Ok(());
	}

	for (path, record) in files.iter().zip(&records) {
		println!("path: {}", path.display());
		println!("eos_id: {}", record.eos_id);
		println!("player_name: {}", or_dash(record.player_name.as_deref()));
		println!("character_name: {}", or_dash(record.character_name.as_deref()));
		println!("tribe_id: {}", or_dash(record.tribe_id));
		println!("level: {} ({})", record.level, record.level_source.as_str());
		println!("experience: {}", record.experience);
		for (name, value) in stat_rows(record) {
			if let Some(value) = value {
				println!("stat.{name}: {value}");
			}
		}
		println!("provenance: {}", record.provenance);
		println!();
	}

	Ok(())
}

fn stat_rows(record: &PlayerRecord) -> [(&'static str, Option<f64>); 18] {
	let stats = &record.stats;
	[
		("health", stats.health),
		("stamina", stats.stamina),
		("torpor", stats.torpor),
		("oxygen", stats.oxygen),
		("food", stats.food),
		("water", stats.water),
		("weight", stats.weight),
		("melee_damage", stats.melee_damage),
		("movement_speed", stats.movement_speed),
		("crafting_speed", stats.crafting_speed),
		("fortitude", stats.fortitude),
		("max_health", stats.max_health),
		("max_stamina", stats.max_stamina),
		("max_torpor", stats.max_torpor),
		("max_oxygen", stats.max_oxygen),
		("max_food", stats.max_food),
		("max_water", stats.max_water),
		("max_weight", stats.max_weight),
	]
}

#[derive(serde::Serialize)]
struct PlayerJson {
	path: String,
	eos_id: String,
	player_name: Option<String>,
	character_name: Option<String>,
	tribe_id: Option<i64>,
	level: u32,
	level_source: &'static str,
	experience: f64,
	stats: std::collections::BTreeMap<&'static str, f64>,
	provenance: &'static str,
}

impl PlayerJson {
	fn new(path: &std::path::Path, record: &PlayerRecord) -> Self {
		Self {
			path: path.display().to_string(),
			eos_id: record.eos_id.clone(),
			player_name: record.player_name.clone(),
			character_name: record.character_name.clone(),
			tribe_id: record.tribe_id,
			level: record.level,
			level_source: record.level_source.as_str(),
			experience: record.experience,
			stats: stat_rows(record).into_iter().filter_map(|(name, value)| Some((name, value?))).collect(),
			provenance: record.provenance.as_str(),
		}
	}
}
