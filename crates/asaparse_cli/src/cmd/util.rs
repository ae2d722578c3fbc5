use asaparse::save::{BatchOptions, DecodeOptions, ProjectOptions, StreamEnd, TypedValue};
use serde_json::{Map, Value, json};

/// XP table selection for level derivation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum XpTableChoice {
	/// Built-in 180-level table.
	Default,
	/// Never derive levels from experience.
	#[value(name = "none")]
	Off,
}

/// Decode, scan and pool tuning shared by every subcommand.
#[derive(clap::Args)]
pub struct Tuning {
	/// Cap on repeated scanner matches.
	#[arg(long, global = true)]
	pub limit: Option<usize>,
	/// Byte stride between inventory item structs.
	#[arg(long, global = true)]
	pub stride: Option<usize>,
	/// Worker threads for multi-file commands.
	#[arg(long, global = true)]
	pub threads: Option<usize>,
	/// Keep struct payloads opaque instead of decoding nested bags.
	#[arg(long, global = true)]
	pub no_nested: bool,
	#[arg(long = "xp-table", global = true, value_enum, default_value_t = XpTableChoice::Default)]
	pub xp_table: XpTableChoice,
}

impl Tuning {
	/// Projection options built from the flags.
	pub fn project_options(&self) -> ProjectOptions {
		let mut opt = match self.xp_table {
			XpTableChoice::Default => ProjectOptions::with_default_xp_table(),
			XpTableChoice::Off => ProjectOptions::default(),
		};
		if self.no_nested {
			opt.decode = DecodeOptions::shallow();
		}
		if let Some(limit) = self.limit {
			opt.scan.limit = limit;
		}
		if let Some(stride) = self.stride {
			opt.scan.item_stride = stride;
		}
		opt
	}

	/// Pool options built from the flags.
	pub fn batch_options(&self) -> BatchOptions {
		BatchOptions { threads: self.threads }
	}
}

/// Print a payload as pretty JSON on stdout.
pub(crate) fn emit_json<T: serde::Serialize>(payload: &T) {
	match serde_json::to_string_pretty(payload) {
		Ok(text) => println!("{text}"),
		Err(err) => eprintln!("error: json encode failed: {err}"),
	}
}

/// Render a decoded value as JSON.
pub(crate) fn value_json(value: &TypedValue<'_>) -> Value {
	match value {
		TypedValue::Int8(v) => json!(v),
		TypedValue::Byte(v) => json!(v),
		TypedValue::Int16(v) => json!(v),
		TypedValue::UInt16(v) => json!(v),
		TypedValue::Int32(v) => json!(v),
		TypedValue::UInt32(v) => json!(v),
		TypedValue::Int64(v) => json!(v),
		TypedValue::UInt64(v) => json!(v),
		TypedValue::Float32(v) => Value::from(f64::from(*v)),
		TypedValue::Float64(v) => Value::from(*v),
		TypedValue::Bool(v) => json!(v),
		TypedValue::Str(v) => json!(v),
		TypedValue::ObjectRef(v) => json!({ "object": v }),
		TypedValue::Struct(item) => {
			let mut out = Map::new();
			out.insert("type".to_owned(), json!(item.type_name));
			if !item.guid.is_zero() {
				out.insert("guid".to_owned(), json!(item.guid.to_string()));
			}
			match &item.fields {
				Some(fields) => {
					let fields: Map<String, Value> = fields.iter().map(|prop| (prop.name.to_string(), value_json(&prop.value))).collect();
					out.insert("fields".to_owned(), Value::Object(fields));
				}
				None => {
					out.insert("payload_len".to_owned(), json!(item.payload.len()));
				}
			}
			Value::Object(out)
		}
		TypedValue::Array(items) => Value::Array(items.iter().map(value_json).collect()),
		TypedValue::Opaque(bytes) => json!({ "opaque_len": bytes.len() }),
	}
}

/// Short label for a stream termination reason.
pub(crate) fn end_label(end: &StreamEnd) -> String {
	match end {
		StreamEnd::Sentinel => "sentinel".to_owned(),
		StreamEnd::Exhausted => "exhausted".to_owned(),
		StreamEnd::Truncated { at } => format!("truncated@{at}"),
		StreamEnd::MalformedName { at } => format!("malformed_name@{at}"),
		StreamEnd::Desynced {
			property,
			declared,
			consumed,
		} => format!("desynced({property}: declared {declared}, consumed {consumed})"),
	}
}

/// Render an optional value, `-` when absent.
pub(crate) fn or_dash<T: std::fmt::Display>(value: Option<T>) -> String {
	value.map_or_else(|| "-".to_owned(), |value| value.to_string())
}
