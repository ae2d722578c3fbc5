use std::path::PathBuf;

use asaparse::save::{SaveFile, project_inventory};

use crate::cmd::util::{Tuning, emit_json, or_dash};

#[derive(clap::Args)]
pub struct Args {
	pub file: PathBuf,
	#[arg(long)]
	pub json: bool,
}

/// Recover inventory items from a profile buffer.
pub fn run(args: Args, tuning: &Tuning) -> asaparse::save::Result<()> {
	let Args { file: path, json } = args;

	let file = SaveFile::open(&path)?;
	let items = project_inventory(file.bytes(), &tuning.project_options());

	if json {
		let payload = InventoryJson {
			path: path.display().to_string(),
			items: items
				.iter()
				.map(|item| ItemJson {
					name: item.name.clone(),
					class_name: item.class_name.clone(),
					quantity: item.quantity,
					durability: item.durability,
					quality: item.quality,
					custom_name: item.custom_name.clone(),
					is_blueprint: item.is_blueprint,
					is_engram: item.is_engram,
					provenance: item.provenance.as_str(),
				})
				.collect(),
		};
		emit_json(&payload);
		return Ok(());
	}

	println!("path: {}", path.display());
	println!("items: {}", items.len());
	println!("name\tquantity\tquality\tdurability\tclass");
	for item in &items {
		println!(
			"{}\t{}\t{}\t{}\t{}",
			item.name,
			item.quantity,
			or_dash(item.quality),
			or_dash(item.durability),
			item.class_name.as_deref().unwrap_or("-")
		);
	}

	Ok(())
}

#[derive(serde::Serialize)]
struct ItemJson {
	name: String,
	class_name: Option<String>,
	quantity: u32,
	durability: Option<f64>,
	quality: Option<u32>,
	custom_name: Option<String>,
	is_blueprint: bool,
	is_engram: bool,
	provenance: &'static str,
}

#[derive(serde::Serialize)]
struct InventoryJson {
	path: String,
	items: Vec<ItemJson>,
}
