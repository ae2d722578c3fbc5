use std::path::PathBuf;

use asaparse::save::{BatchRunner, SaveError, SaveFile, SaveKind, TribeRecord};

use crate::cmd::util::{Tuning, emit_json, or_dash};

#[derive(clap::Args)]
pub struct Args {
	/// Tribe files; the file stem is used as the tribe id.
	#[arg(required = true)]
	pub files: Vec<PathBuf>,
	/// Tribe id for a file whose name does not carry one.
	#[arg(long)]
	pub id: Option<u32>,
	#[arg(long)]
	pub json: bool,
}

/// Project one or more tribe files.
pub fn run(args: Args, tuning: &Tuning) -> asaparse::save::Result<()> {
	let Args { files, id, json } = args;

	let mut units = Vec::with_capacity(files.len());
	for path in &files {
		let file = SaveFile::open(path)?;
		let tribe_id = match (&file.kind, id) {
			(SaveKind::Tribe { tribe_id }, _) => *tribe_id,
			(_, Some(id)) => id,
			_ => return Err(SaveError::InvalidIdentity { stem: file.identity() }),
		};
		units.push((tribe_id, file.bytes().to_vec()));
	}
	let runner = BatchRunner::new(&tuning.batch_options(), tuning.project_options())?;
	let records = runner.tribes(&units);

	if json {
		let payload: Vec<TribeJson> = files.iter().zip(&records).map(|(path, record)| TribeJson::new(path, record)).collect();
		emit_json(&payload);
		return Ok(());
	}

	for (path, record) in files.iter().zip(&records) {
		println!("path: {}", path.display());
		println!("tribe_id: {}", record.tribe_id);
		println!("tribe_name: {}", or_dash(record.tribe_name.as_deref()));
		println!("owner_id: {}", or_dash(record.owner_id));
		println!("tamed_dino_count: {}", or_dash(record.tamed_dino_count));
		println!("members: {} ({} paired)", record.member_count, record.members.len());
		println!("name\tplayer_id");
		for member in &record.members {
			println!("{}\t{}", member.name, member.player_id);
		}
		println!("log: {}", record.tribe_log.len());
		for line in &record.tribe_log {
			println!("  {line}");
		}
		println!("provenance: {}", record.provenance);
		println!();
	}

	Ok(())
}

#[derive(serde::Serialize)]
struct MemberJson {
	name: String,
	player_id: i64,
}

#[derive(serde::Serialize)]
struct TribeJson {
	path: String,
	tribe_id: u32,
	tribe_name: Option<String>,
	owner_id: Option<i64>,
	member_count: usize,
	members: Vec<MemberJson>,
	tribe_log: Vec<String>,
	tamed_dino_count: Option<i64>,
	provenance: &'static str,
}

impl TribeJson {
	fn new(path: &std::path::Path, record: &TribeRecord) -> Self {
		Self {
			path: path.display().to_string(),
			tribe_id: record.tribe_id,
			tribe_name: record.tribe_name.clone(),
			owner_id: record.owner_id,
			member_count: record.member_count,
			members: record
				.members
				.iter()
				.map(|member| MemberJson {
					name: member.name.clone(),
					player_id: member.player_id,
				})
				.collect(),
			tribe_log: record.tribe_log.clone(),
			tamed_dino_count: record.tamed_dino_count,
			provenance: record.provenance.as_str(),
		}
	}
}
