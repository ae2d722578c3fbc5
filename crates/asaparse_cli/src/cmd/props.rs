use std::path::PathBuf;

use asaparse::save::{SaveFile, decode_property_stream};

use crate::cmd::util::{Tuning, emit_json, end_label, value_json};

#[derive(clap::Args)]
pub struct Args {
	pub file: PathBuf,
	/// Byte offset where the property stream starts.
	#[arg(long, default_value_t = 0)]
	pub offset: usize,
	#[arg(long)]
	pub json: bool,
}

/// Decode a property stream and print every property with the termination reason.
pub fn run(args: Args, tuning: &Tuning) -> asaparse::save::Result<()> {
	let Args { file: path, offset, json } = args;

	let file = SaveFile::open(&path)?;
	let opt = tuning.project_options();
	let bytes = file.bytes().get(offset..).unwrap_or_default();
	let decoded = decode_property_stream(bytes, &opt.decode);

	if json {
		let payload = PropsJson {
			path: path.display().to_string(),
			offset,
			end: end_label(&decoded.end),
			complete: decoded.is_complete(),
			resyncs: decoded.resyncs,
			properties: decoded
				.bag
				.iter()
				.map(|prop| PropJson {
					name: prop.name.to_string(),
					type_tag: prop.type_tag.to_string(),
					kind: prop.value.kind(),
					offset: offset + prop.offset,
					size: prop.declared_size,
					index: prop.array_index,
					value: value_json(&prop.value),
				})
				.collect(),
		};
		emit_json(&payload);
		return Ok(());
	}

	println!("path: {}", path.display());
	println!("properties: {}", decoded.bag.len());
	println!("offset\tname\ttype\tkind\tsize\tvalue");
	for prop in &decoded.bag {
		println!(
			"{}\t{}\t{}\t{}\t{}\t{}",
			offset + prop.offset,
			prop.name,
			prop.type_tag,
			prop.value.kind(),
			prop.declared_size,
			prop.value
		);
	}
	println!("end: {}", end_label(&decoded.end));
	println!("resyncs: {}", decoded.resyncs);

	Ok(())
}

#[derive(serde::Serialize)]
struct PropJson {
	name: String,
	#[serde(rename = "type")]
	type_tag: String,
	kind: &'static str,
	offset: usize,
	size: u64,
	index: i32,
	value: serde_json::Value,
}

#[derive(serde::Serialize)]
struct PropsJson {
	path: String,
	offset: usize,
	end: String,
	complete: bool,
	resyncs: usize,
	properties: Vec<PropJson>,
}
