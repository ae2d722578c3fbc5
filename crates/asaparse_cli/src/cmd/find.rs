use std::path::PathBuf;

use asaparse::save::{ExpectedType, SaveError, SaveFile, ScanMatch, find_all, find_value};

use crate::cmd::util::{Tuning, emit_json, value_json};

#[derive(clap::Args)]
pub struct Args {
	pub file: PathBuf,
	#[arg(long)]
	pub name: String,
	/// Expected value type: int, uint16, float, str, bool, or an on-disk tag.
	#[arg(long = "type", default_value = "int")]
	pub type_label: String,
	/// Report every match instead of the first.
	#[arg(long)]
	pub all: bool,
	#[arg(long)]
	pub json: bool,
}

/// Scan a raw buffer for validated occurrences of one property name.
pub fn run(args: Args, tuning: &Tuning) -> asaparse::save::Result<()> {
	let Args {
		file: path,
		name,
		type_label,
		all,
		json,
	} = args;

	let expected = ExpectedType::from_label(&type_label).ok_or_else(|| SaveError::UnknownTypeLabel { label: type_label.clone() })?;
	let file = SaveFile::open(&path)?;
	let opt = tuning.project_options();
	let matches: Vec<ScanMatch> = if all {
		find_all(file.bytes(), &name, expected, &opt.scan)
	} else {
		find_value(file.bytes(), &name, expected).into_iter().collect()
	};

	if json {
		let payload = FindJson {
			path: path.display().to_string(),
			name,
			expected: type_label,
			matches: matches
				.iter()
				.map(|hit| MatchJson {
					offset: hit.offset,
					type_tag: hit.type_tag.to_string(),
					value: value_json(&hit.value),
				})
				.collect(),
		};
		emit_json(&payload);
		return Ok(());
	}

	println!("path: {}", path.display());
	println!("name: {name}");
	println!("matches: {}", matches.len());
	println!("offset\ttype\tvalue");
	for hit in &matches {
		println!("{}\t{}\t{}", hit.offset, hit.type_tag, hit.value);
	}

	Ok(())
}

#[derive(serde::Serialize)]
struct MatchJson {
	offset: usize,
	#[serde(rename = "type")]
	type_tag: String,
	value: serde_json::Value,
}

#[derive(serde::Serialize)]
struct FindJson {
	path: String,
	name: String,
	expected: String,
	matches: Vec<MatchJson>,
}
