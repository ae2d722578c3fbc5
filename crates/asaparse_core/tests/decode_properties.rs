#![allow(missing_docs)]

use asaparse::save::{
	DecodeOptions, ExpectedType, ProjectOptions, Provenance, ScanOptions, StreamEnd, decode_property_bag, decode_property_stream, decode_string_at,
	find_all, find_value, project_inventory, project_player_from_bag,
};
use asaparse_testkit::{PropertyWriter, ue_string, ue_string_utf16};

#[test]
fn ascii_strings_round_trip_for_every_length() {
	assert_eq!(decode_string_at(&ue_string(""), 0), (String::new(), 4));

	let alphabet: Vec<char> = (b' '..=b'~').map(char::from).collect();
	for len in 1..=200 {
		let text: String = alphabet.iter().cycle().skip(len).take(len).collect();
		let (decoded, consumed) = decode_string_at(&ue_string(&text), 0);
		assert_eq!(decoded, text, "len {len}");
		assert_eq!(consumed, 4 + len + 1, "len {len}");
	}
}

#[test]
fn utf16_strings_round_trip() {
	for text in ["Ærøskøbing", "日本語のテキスト", "🦖 Rex", "ßtraße"] {
		let encoded = ue_string_utf16(text);
		let (decoded, consumed) = decode_string_at(&encoded, 0);
		assert_eq!(decoded, text);
		assert_eq!(consumed, encoded.len());
	}
}

#[test]
fn sentinel_yields_exactly_the_written_properties() {
	for count in 0..12 {
		let mut writer = PropertyWriter::new();
		for idx in 0..count {
			writer = writer.int(&format!("Field{idx}"), idx);
		}
		let mut bytes = writer.none().finish();
		bytes.extend(PropertyWriter::new().int("AfterSentinel", 1).finish());

		let decoded = decode_property_stream(&bytes, &DecodeOptions::default());
		assert_eq!(decoded.bag.len(), count as usize);
		assert_eq!(decoded.end, StreamEnd::Sentinel);
		assert!(decoded.bag.get("AfterSentinel").is_none());
	}
}

#[test]
fn repeated_scan_is_bounded_by_limit() {
	let mut writer = PropertyWriter::compact();
	for idx in 0..2000 {
		writer = writer.int("ItemQuantity", idx);
	}
	let bytes = writer.finish();

	let hits = find_all(&bytes, "ItemQuantity", ExpectedType::Int, &ScanOptions::default());
	assert_eq!(hits.len(), 1000);
	assert!(hits.windows(2).all(|pair| pair[0].offset < pair[1].offset));

	let tight = ScanOptions {
		limit: 5,
		..ScanOptions::default()
	};
	assert_eq!(find_all(&bytes, "ItemQuantity", ExpectedType::Int, &tight).len(), 5);
}

#[test]
fn bare_name_without_length_prefix_is_rejected() {
	let mut bytes = b"garbage ItemQuantity".to_vec();
	bytes.extend_from_slice(&ue_string("IntProperty"));
	bytes.extend_from_slice(&4_i32.to_le_bytes());
	bytes.extend_from_slice(&[0; 5]);
	bytes.extend_from_slice(&5_i32.to_le_bytes());

	assert!(find_value(&bytes, "ItemQuantity", ExpectedType::Int).is_none());
	assert!(find_all(&bytes, "ItemQuantity", ExpectedType::Int, &ScanOptions::default()).is_empty());
}

#[test]
fn level_is_extra_level_plus_one() {
	let bytes = PropertyWriter::new().uint16("ExtraCharacterLevel", 130).none().finish();
	let bag = decode_property_bag(&bytes, &DecodeOptions::default());
	assert_eq!(project_player_from_bag(&bag, "eos", &ProjectOptions::default()).level, 131);
}

#[test]
fn truncated_property_keeps_earlier_properties_deterministically() {
	let prefix = PropertyWriter::new().str("PlayerName", "Alice").int("TribeID", 7);
	let at = prefix.len();
	let bytes = prefix.header_only("ExperiencePoints", "IntProperty", 4).bytes(&[0, 0x10]).finish();

	let first = decode_property_stream(&bytes, &DecodeOptions::default());
	assert_eq!(first.bag.len(), 2);
	assert_eq!(first.bag.str("PlayerName"), Some("Alice"));
	assert_eq!(first.bag.i64("TribeID"), Some(7));
	assert_eq!(first.end, StreamEnd::Truncated { at });

	let second = decode_property_stream(&bytes, &DecodeOptions::default());
	assert_eq!(second.bag, first.bag);
	assert_eq!(second.end, first.end);
}

#[test]
fn mismatched_item_lists_zip_to_overlap() {
	let mut writer = PropertyWriter::compact();
	for name in ["A", "B", "C", "D", "E"] {
		writer = writer.str("ItemName", name);
	}
	for quantity in [3, 2, 1] {
		writer = writer.int("ItemQuantity", quantity);
	}

	let items = project_inventory(&writer.finish(), &ProjectOptions::default());
	assert_eq!(items.len(), 3);
	assert!(items.iter().all(|item| item.provenance == Provenance::Heuristic));
	assert_eq!(items.iter().map(|item| item.quantity).collect::<Vec<_>>(), [3, 2, 1]);
}
