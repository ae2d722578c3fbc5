use asaparse_testkit::{PropertyWriter, ue_string, world_array_int, world_array_str};

use crate::save::{
	ExpectedType, ScanOptions, TypedValue, find_all, find_all_int, find_all_str, find_array_values, find_bool, find_bytes, find_class_name, find_f64,
	find_int, find_str, find_u16, find_value, probe_f32, probe_flag, probe_i32, probe_str,
};

#[test]
fn finds_each_scalar_shape() {
	let bytes = PropertyWriter::compact()
		.bytes(&[0xFF; 7])
		.str("PlayerName", "Alice")
		.int("TribeID", 1_234_567)
		.uint16("ExtraCharacterLevel", 130)
		.float("CharacterStatusComponent_ExperiencePoints", 1500.5)
		.double("Durability", 0.25)
		.boolean("bIsLocked", true)
		.uint32("TargetingTeam", u32::MAX)
		.finish();

	assert_eq!(find_str(&bytes, "PlayerName").as_deref(), Some("Alice"));
	assert_eq!(find_int(&bytes, "TribeID"), Some(1_234_567));
	assert_eq!(find_u16(&bytes, "ExtraCharacterLevel"), Some(130));
	assert_eq!(find_f64(&bytes, "CharacterStatusComponent_ExperiencePoints"), Some(1500.5));
	assert_eq!(find_f64(&bytes, "Durability"), Some(0.25));
	assert_eq!(find_bool(&bytes, "bIsLocked"), Some(true));
	assert_eq!(find_int(&bytes, "TargetingTeam"), Some(i64::from(u32::MAX)));
}

#[test]
fn match_reports_name_offset_and_tag() {
	let prefix = PropertyWriter::compact().int("Other", 1).finish();
	let bytes = PropertyWriter::compact().int("Other", 1).uint32("Count", 9).finish();

	let hit = find_value(&bytes, "Count", ExpectedType::Int).expect("count found");
	assert_eq!(hit.offset, prefix.len() + 4);
	assert_eq!(&*hit.type_tag, "UInt32Property");
	assert_eq!(hit.value, TypedValue::UInt32(9));
}

#[test]
fn unprefixed_name_is_rejected() {
	let mut bytes = b"xxItemQuantity\0".to_vec();
	bytes.extend_from_slice(&ue_string("IntProperty"));
	bytes.extend_from_slice(&4_i32.to_le_bytes());
	bytes.extend_from_slice(&[0; 5]);
	bytes.extend_from_slice(&5_i32.to_le_bytes());
	assert!(find_value(&bytes, "ItemQuantity", ExpectedType::Int).is_none());

	let mut wrong_len = 12_i32.to_le_bytes().to_vec();
	wrong_len.extend_from_slice(&bytes[2..]);
	assert!(find_value(&wrong_len, "ItemQuantity", ExpectedType::Int).is_none());

	let mut right_len = 13_i32.to_le_bytes().to_vec();
	right_len.extend_from_slice(&bytes[2..]);
	assert_eq!(find_int(&right_len, "ItemQuantity"), Some(5));
}

#[test]
fn mismatched_type_is_skipped_for_next_occurrence() {
	let bytes = PropertyWriter::compact().str("ItemQuantity", "many").int("ItemQuantity", 4).finish();
	assert_eq!(find_int(&bytes, "ItemQuantity"), Some(4));
	assert_eq!(find_str(&bytes, "ItemQuantity").as_deref(), Some("many"));
	assert!(find_value(&bytes, "ItemQuantity", ExpectedType::Bool).is_none());
}

#[test]
fn empty_strings_are_not_matches() {
	let bytes = PropertyWriter::compact().str("CustomItemName", "").str("CustomItemName", "Sword").finish();
	assert_eq!(find_all_str(&bytes, "CustomItemName", &ScanOptions::default()), ["Sword"]);
}

#[test]
fn repeated_scan_is_bounded_and_ordered() {
	let mut writer = PropertyWriter::compact();
	for i in 0..2000 {
		writer = writer.int("ItemQuantity", i);
	}
	let bytes = writer.finish();

	let hits = find_all(&bytes, "ItemQuantity", ExpectedType::Int, &ScanOptions::default());
	assert_eq!(hits.len(), 1000);
	assert!(hits.windows(2).all(|pair| pair[0].offset < pair[1].offset));
	assert_eq!(hits[999].value, TypedValue::Int32(999));

	let small = ScanOptions {
		limit: 5,
		..ScanOptions::default()
	};
	assert_eq!(find_all_int(&bytes, "ItemQuantity", &small), [0, 1, 2, 3, 4]);
}

#[test]
fn truncated_value_is_not_a_match() {
	let bytes = PropertyWriter::compact().int("ItemQuantity", 77).finish();
	assert!(find_int(&bytes[..bytes.len() - 1], "ItemQuantity").is_none());
	assert!(find_int(&bytes, "").is_none());
}

#[test]
fn array_scan_reads_world_layout() {
	let mut bytes = vec![0xAA; 5];
	bytes.extend(world_array_str("MembersPlayerName", &["Ann", "Bo", "Cy"]));
	bytes.extend(world_array_int("MembersPlayerDataID", &[11, 22]));

	let names = find_array_values(&bytes, "MembersPlayerName", &ScanOptions::default()).expect("names array");
	let names: Vec<&str> = names.iter().filter_map(TypedValue::as_str).collect();
	assert_eq!(names, ["Ann", "Bo", "Cy"]);

	let ids = find_array_values(&bytes, "MembersPlayerDataID", &ScanOptions::default()).expect("ids array");
	assert_eq!(ids, [TypedValue::Int32(11), TypedValue::Int32(22)]);

	assert!(find_array_values(&bytes, "TribeLog", &ScanOptions::default()).is_none());
}

#[test]
fn array_scan_caps_count_and_stops_at_buffer_end() {
	let bytes = world_array_int("Ids", &[1, 2, 3, 4]);
	let capped = ScanOptions {
		limit: 2,
		..ScanOptions::default()
	};
	assert_eq!(find_array_values(&bytes, "Ids", &capped).map(|items| items.len()), Some(2));
	assert_eq!(find_array_values(&bytes[..bytes.len() - 2], "Ids", &ScanOptions::default()).map(|items| items.len()), Some(3));
}

#[test]
fn probes_skip_tag_and_padding() {
	let bytes = PropertyWriter::compact()
		.str("OwnerName", "Bob")
		.int("CharacterLevel", 3)
		.boolean("bIsFemale", true)
		.float("Health", 812.5)
		.finish();

	assert_eq!(probe_str(&bytes, "OwnerName", 100).map(|hit| hit.value).as_deref(), Some("Bob"));
	assert_eq!(probe_i32(&bytes, "CharacterLevel", 100, |v| v > 0 && v < 1000).map(|hit| hit.value), Some(3));
	assert_eq!(probe_flag(&bytes, "bIsFemale", 100).map(|hit| hit.value), Some(true));
	assert_eq!(probe_f32(&bytes, "Health", 50, |v| v > 0.0 && v < 1_000_000.0).map(|hit| hit.value), Some(812.5));
}

#[test]
fn probe_without_tag_searches_after_name() {
	let mut bytes = b"TamedName\0".to_vec();
	bytes.extend_from_slice(&[0xFF, 0xEE]);
	bytes.extend_from_slice(&ue_string("Fluffy"));

	let hit = probe_str(&bytes, "TamedName", 100).expect("string probed");
	assert_eq!(hit.value, "Fluffy");
	assert_eq!(hit.offset, 12);
	assert!(probe_str(&bytes, "TamedName", 2).is_none());
	assert!(probe_str(&bytes, "Missing", 100).is_none());
}

#[test]
fn implausible_strings_are_not_probed() {
	let mut bytes = b"OwnerName\0".to_vec();
	bytes.extend_from_slice(&ue_string("a\u{1}b"));
	assert!(probe_str(&bytes, "OwnerName", 100).is_none());
}

#[test]
fn class_name_search_walks_backward() {
	for class in ["Raptor_Character_BP_C", "Rex_Character_BP_C"] {
		let mut bytes = vec![0x11; 30];
		bytes.extend_from_slice(&ue_string(class));
		bytes.extend_from_slice(&[0x22; 10]);

		let hit = find_class_name(&bytes, "_Character_BP_C", 200, |_| true).expect("class found");
		assert_eq!(hit.value, class);
		assert_eq!(hit.offset, 30);
	}

	let mut bytes = vec![0x11; 30];
	bytes.extend_from_slice(&ue_string("Raptor_Character_BP_C"));
	assert!(find_class_name(&bytes, "_Character_BP_C", 5, |_| true).is_none());
	assert!(find_class_name(&bytes, "_Character_BP_C", 200, |name| name.starts_with("Rex")).is_none());
}

#[test]
fn find_bytes_handles_edges() {
	assert_eq!(find_bytes(b"abcabc", b"bc", 0), Some(1));
	assert_eq!(find_bytes(b"abcabc", b"bc", 2), Some(4));
	assert_eq!(find_bytes(b"abc", b"", 0), None);
	assert_eq!(find_bytes(b"abc", b"abcd", 0), None);
	assert_eq!(find_bytes(b"abc", b"c", 9), None);
}

#[test]
fn labels_map_to_expected_types() {
	assert_eq!(ExpectedType::from_label("int"), Some(ExpectedType::Int));
	assert_eq!(ExpectedType::from_label("DoubleProperty"), Some(ExpectedType::Float));
	assert_eq!(ExpectedType::from_label("NameProperty"), None);
	assert!(ExpectedType::Int.accepts("UInt32Property"));
	assert!(!ExpectedType::Str.accepts("NameProperty"));
}

#[test]
fn sequential_layout_values_are_found() {
	let bytes = PropertyWriter::new()
		.str("PlayerName", "Alice")
		.int("TribeID", 1234)
		.uint16("ExtraCharacterLevel", 44)
		.boolean("bIsFemale", true)
		.double("Durability", 0.5)
		.none()
		.finish();

	assert_eq!(find_str(&bytes, "PlayerName").as_deref(), Some("Alice"));
	assert_eq!(find_int(&bytes, "TribeID"), Some(1234));
	assert_eq!(find_u16(&bytes, "ExtraCharacterLevel"), Some(44));
	assert_eq!(find_bool(&bytes, "bIsFemale"), Some(true));
	assert_eq!(find_f64(&bytes, "Durability"), Some(0.5));
}

#[test]
fn declared_size_must_fit_a_header_layout() {
	let wrong = PropertyWriter::compact().header_only("ItemQuantity", "IntProperty", 3).bytes(&[0, 7, 0, 0, 0]).finish();
	assert!(find_int(&wrong, "ItemQuantity").is_none());

	let right = PropertyWriter::compact().header_only("ItemQuantity", "IntProperty", 4).bytes(&[0, 7, 0, 0, 0]).finish();
	assert_eq!(find_int(&right, "ItemQuantity"), Some(7));
}

#[test]
fn array_scan_reads_sequential_layout_floats() {
	let body: Vec<u8> = [1.0_f32, 2.5].iter().flat_map(|value| value.to_le_bytes()).collect();
	let bytes = PropertyWriter::new().int("Before", 1).array("CurrentStatusValues", "FloatProperty", 2, &body).none().finish();

	let values = find_array_values(&bytes, "CurrentStatusValues", &ScanOptions::default()).expect("float array");
	assert_eq!(values, [TypedValue::Float32(1.0), TypedValue::Float32(2.5)]);
}
