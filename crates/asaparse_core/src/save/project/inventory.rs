use tracing::{debug, trace};

use crate::save::project::ProjectOptions;
use crate::save::scan::{find_all_int, find_all_str, find_bytes};
use crate::save::string::decode_string_at;
use crate::save::{DecodeOptions, ItemRecord, Provenance, decode_property_bag};

const ITEM_ARRAYS: &[&str] = &["InventoryItems", "MyInventoryComponent", "ArkInventoryData"];

/// Bytes after an array name within which its `ArrayProperty` tag must start.
const ARRAY_TAG_REACH: usize = 100;

/// Project inventory items from a profile buffer.
///
/// Item struct arrays are walked first; each element is decoded as its own property stream at a
/// fixed stride (see [`ScanOptions::item_stride`](crate::save::ScanOptions::item_stride)). When no
/// array yields items, `CustomItemName` (or `ItemName`) strings are zipped with `ItemQuantity` values
/// and only the overlapping prefix is kept. Every item is heuristic.
pub fn project_inventory(bytes: &[u8], opt: &ProjectOptions) -> Vec<ItemRecord> {
	for array_name in ITEM_ARRAYS {
		let items = struct_array_items(bytes, array_name, opt);
		if !items.is_empty() {
			debug!(array = array_name, items = items.len(), stride = opt.scan.item_stride, "inventory from struct array");
			return items;
		}
	}

	let items = zipped_items(bytes, opt);
	debug!(items = items.len(), "inventory from name/quantity scan");
	items
}

fn struct_array_items(bytes: &[u8], array_name: &str, opt: &ProjectOptions) -> Vec<ItemRecord> {
	let Some(name_at) = find_bytes(bytes, array_name.as_bytes(), 0) else {
		return Vec::new();
	};
	let Some(tag_at) = find_bytes(bytes, b"ArrayProperty", name_at).filter(|at| at - name_at <= ARRAY_TAG_REACH) else {
		return Vec::new();
	};

	// Tag terminator, then u64 size and i32 array index.
	let inner_at = tag_at + "ArrayProperty".len() + 1 + 12;
	if inner_at > bytes.len() {
		return Vec::new();
	}
	let (inner, inner_len) = decode_string_at(bytes, inner_at);
	if inner != "StructProperty" {
		return Vec::new();
	}
	let count_at = inner_at + inner_len;
	let Some(count) = bytes.get(count_at..count_at + 4).map(|raw| i32::from_le_bytes([raw[0], raw[1], raw[2], raw[3]])) else {
		return Vec::new();
	};
	let Some(count) = usize::try_from(count).ok().filter(|count| (1..=opt.scan.limit).contains(count)) else {
		return Vec::new();
	};

	let stride = opt.scan.item_stride.max(1);
	let item_opt = DecodeOptions::shallow();
	let mut items = Vec::new();
	let mut at = count_at + 4;
	for idx in 0..count {
		if at >= bytes.len() {
			break;
		}
		match parse_item(&bytes[at..], &item_opt) {
			Some(item) => items.push(item),
			None => trace!(array = array_name, idx, at, "no item at stride position"),
		}
		at += stride;
	}
	items
}

fn parse_item(bytes: &[u8], opt: &DecodeOptions) -> Option<ItemRecord> {
	let bag = decode_property_bag(bytes, opt);
	let mut item = ItemRecord::named(String::new(), Provenance::Heuristic);

	for prop in &bag {
		let value = &prop.value;
		match &*prop.name {
			"ItemName" | "ItemArchetype" | "ItemClass" => {
				if let Some(text) = value.as_str() {
					if item.name.is_empty() {
						item.name = text.to_owned();
					}
					item.class_name = Some(text.to_owned());
				}
			}
			"CustomItemName" => {
				if let Some(text) = value.as_str() {
					if item.name.is_empty() {
						item.name = text.to_owned();
					}
					item.custom_name = Some(text.to_owned());
				}
			}
			"ItemQuantity" => {
				if let Some(quantity) = value.as_i64().and_then(|v| u32::try_from(v).ok()) {
					item.quantity = quantity;
				}
			}
			"ItemRating" | "ItemQualityIndex" => item.quality = value.as_i64().and_then(|v| u32::try_from(v).ok()).or(item.quality),
			"ItemDurability" | "Durability" => item.durability = value.as_f64().or(item.durability),
			"bIsBlueprint" => item.is_blueprint = value.as_bool().unwrap_or(item.is_blueprint),
			"bIsEngram" => item.is_engram = value.as_bool().unwrap_or(item.is_engram),
			_ => {}
		}
	}

	(!item.name.is_empty()).then_some(item)
}

fn zipped_items(bytes: &[u8], opt: &ProjectOptions) -> Vec<ItemRecord> {
	let mut names = find_all_str(bytes, "CustomItemName", &opt.scan);
	if names.is_empty() {
		names = find_all_str(bytes, "ItemName", &opt.scan);
	}
	let quantities = find_all_int(bytes, "ItemQuantity", &opt.scan);
	if names.len() != quantities.len() {
		debug!(names = names.len(), quantities = quantities.len(), "item lists differ in length");
	}

	names
		.iter()
		.zip(quantities)
		.filter_map(|(name, quantity)| {
			let name = name.trim();
			if name.is_empty() {
				return None;
			}
			let mut item = ItemRecord::named(name, Provenance::Heuristic);
			item.quantity = u32::try_from(quantity).unwrap_or(0);
			Some(item)
		})
		.collect()
}
