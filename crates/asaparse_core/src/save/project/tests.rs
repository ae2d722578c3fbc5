use asaparse_testkit::{PropertyWriter, ue_string, world_array_int, world_array_str};

use crate::save::{
	DecodeOptions, LevelSource, ProjectOptions, Provenance, StreamEnd, StructureCategory, decode_property_bag, decode_property_stream, project_dino,
	project_inventory, project_player, project_player_from_bag, project_structure, project_tribe, species_from_class, structure_type_from_class,
};

#[test]
fn extra_level_is_offset_by_one() {
	let bytes = PropertyWriter::new().uint16("ExtraCharacterLevel", 130).none().finish();
	let bag = decode_property_bag(&bytes, &DecodeOptions::default());

	let record = project_player_from_bag(&bag, "eos-1", &ProjectOptions::default());
	assert_eq!(record.level, 131);
	assert_eq!(record.level_source, LevelSource::Stored);
	assert_eq!(record.provenance, Provenance::Strict);
	assert_eq!(record.eos_id, "eos-1");
}

#[test]
fn sequential_profile_is_strict() {
	let bytes = PropertyWriter::new()
		.str("PlayerName", "alice_pc")
		.str("PlayerCharacterName", "Alice")
		.int("TribeID", 1_400_000_001)
		.uint16("CharacterStatusComponent_ExtraCharacterLevel", 44)
		.float("CharacterStatusComponent_ExperiencePoints", 5_000.0)
		.float("Health", 350.0)
		.float("CharacterStatusComponent_Weight", 420.0)
		.none()
		.finish();

	let record = project_player(&bytes, "eos-2", &ProjectOptions::default());
	assert_eq!(record.player_name.as_deref(), Some("alice_pc"));
	assert_eq!(record.character_name.as_deref(), Some("Alice"));
	assert_eq!(record.tribe_id, Some(1_400_000_001));
	assert_eq!(record.level, 45);
	assert_eq!(record.experience, 5_000.0);
	assert_eq!(record.stats.health, Some(350.0));
	assert_eq!(record.stats.weight, Some(420.0));
	assert_eq!(record.stats.stamina, None);
	assert_eq!(record.provenance, Provenance::Strict);
}

#[test]
fn scanned_profile_is_heuristic() {
	let bytes = PropertyWriter::compact()
		.str("PlayerName", "Alice")
		.uint16("ExtraCharacterLevel", 130)
		.double("ExperiencePoints", 12.5)
		.finish();

	let record = project_player(&bytes, "eos-3", &ProjectOptions::default());
	assert_eq!(record.player_name.as_deref(), Some("Alice"));
	assert_eq!(record.level, 131);
	assert_eq!(record.experience, 12.5);
	assert_eq!(record.provenance, Provenance::Heuristic);
}

fn floats(values: &[f32]) -> Vec<u8> {
	values.iter().flat_map(|value| value.to_le_bytes()).collect()
}

/// Sequential profile whose `Broken` array declares far more bytes than the buffer holds.
fn desynced_profile(tail: PropertyWriter) -> Vec<u8> {
	let head = PropertyWriter::new()
		.str("PlayerName", "Alice")
		.header_only("Broken", "ArrayProperty", 100_000)
		.bytes(&ue_string("IntProperty"))
		.bytes(&0_i32.to_le_bytes())
		.finish();
	let mut bytes = head;
	bytes.extend(tail.finish());
	bytes
}

#[test]
fn desynced_sequential_profile_scans_remaining_fields() {
	let bytes = desynced_profile(PropertyWriter::new().int("TribeID", 1234).uint16("ExtraCharacterLevel", 44).none());

	let decoded = decode_property_stream(&bytes, &DecodeOptions::default());
	assert!(matches!(decoded.end, StreamEnd::Desynced { ref property, .. } if &**property == "Broken"));

	let record = project_player(&bytes, "eos", &ProjectOptions::default());
	assert_eq!(record.player_name.as_deref(), Some("Alice"));
	assert_eq!(record.tribe_id, Some(1234));
	assert_eq!(record.level, 45);
	assert_eq!(record.level_source, LevelSource::Stored);
	assert_eq!(record.provenance, Provenance::Heuristic);
}

#[test]
fn max_stats_are_read_with_prefixed_names_first() {
	let bytes = PropertyWriter::new()
		.float("Health", 320.0)
		.float("CharacterStatusComponent_MaxHealth", 400.0)
		.float("MaxHealth", 1.0)
		.float("MaxWeight", 550.0)
		.none()
		.finish();

	let record = project_player(&bytes, "eos", &ProjectOptions::default());
	assert_eq!(record.stats.health, Some(320.0));
	assert_eq!(record.stats.max_health, Some(400.0));
	assert_eq!(record.stats.max_weight, Some(550.0));
	assert_eq!(record.stats.max_stamina, None);
	assert_eq!(record.provenance, Provenance::Strict);
}

#[test]
fn status_value_array_fills_missing_stats() {
	let values = floats(&[300.0, 150.0, 0.0, 100.0, 80.0, 90.0, 250.0, 1.5]);
	let bytes = PropertyWriter::new()
		.float("Stamina", 175.0)
		.array("CurrentStatusValues", "FloatProperty", 8, &values)
		.none()
		.finish();

	let stats = project_player(&bytes, "eos", &ProjectOptions::default()).stats;
	assert_eq!(stats.health, Some(300.0));
	assert_eq!(stats.stamina, Some(175.0));
	assert_eq!(stats.torpor, None);
	assert_eq!(stats.oxygen, Some(100.0));
	assert_eq!(stats.food, Some(80.0));
	assert_eq!(stats.water, Some(90.0));
	assert_eq!(stats.weight, Some(250.0));
	assert_eq!(stats.melee_damage, Some(1.5));
	assert_eq!(stats.movement_speed, None);
}

#[test]
fn short_status_value_array_is_ignored() {
	let bytes = PropertyWriter::new()
		.array("CurrentStatusValues", "FloatProperty", 3, &floats(&[300.0, 150.0, 10.0]))
		.none()
		.finish();
	assert!(project_player(&bytes, "eos", &ProjectOptions::default()).stats.is_empty());
}

#[test]
fn status_value_array_is_scanned_after_desync() {
	let values = floats(&[300.0, 150.0, 20.0, 100.0, 80.0, 90.0, 250.0, 1.5]);
	let bytes = desynced_profile(PropertyWriter::new().array("CurrentStatusValues", "FloatProperty", 8, &values).none());

	let record = project_player(&bytes, "eos", &ProjectOptions::default());
	assert_eq!(record.stats.health, Some(300.0));
	assert_eq!(record.stats.torpor, Some(20.0));
	assert_eq!(record.stats.melee_damage, Some(1.5));
	assert_eq!(record.provenance, Provenance::Heuristic);
}

#[test]
fn experience_chain_prefers_earlier_names() {
	let bytes = PropertyWriter::new().float("XP", 1.0).float("ExperiencePoints", 2.0).none().finish();
	let record = project_player(&bytes, "eos", &ProjectOptions::default());
	assert_eq!(record.experience, 2.0);
}

#[test]
fn missing_level_uses_xp_table_when_configured() {
	let bytes = PropertyWriter::new().float("ExperiencePoints", 1_000.0).none().finish();

	let with_table = project_player(&bytes, "eos", &ProjectOptions::with_default_xp_table());
	assert_eq!(with_table.level, 19);
	assert_eq!(with_table.level_source, LevelSource::Experience);

	let without = project_player(&bytes, "eos", &ProjectOptions::default());
	assert_eq!(without.level, 1);
	assert_eq!(without.level_source, LevelSource::Default);

	let stored_one = PropertyWriter::new().uint16("ExtraCharacterLevel", 0).float("ExperiencePoints", 1_000.0).none().finish();
	let record = project_player(&stored_one, "eos", &ProjectOptions::with_default_xp_table());
	assert_eq!(record.level, 19);
	assert_eq!(record.level_source, LevelSource::Experience);

	let stored_high = PropertyWriter::new().uint16("ExtraCharacterLevel", 79).float("ExperiencePoints", 1_000.0).none().finish();
	let record = project_player(&stored_high, "eos", &ProjectOptions::with_default_xp_table());
	assert_eq!(record.level, 80);
	assert_eq!(record.level_source, LevelSource::Stored);
}

#[test]
fn truncated_profile_is_heuristic_even_without_scanned_fields() {
	let bytes = PropertyWriter::new().str("PlayerName", "Alice").finish();
	let record = project_player(&bytes, "eos", &ProjectOptions::default());
	assert_eq!(record.player_name.as_deref(), Some("Alice"));
	assert_eq!(record.provenance, Provenance::Heuristic);
}

#[test]
fn tribe_fields_come_from_nested_struct_bag() {
	let inner = PropertyWriter::new()
		.str("TribeName", "Herd")
		.int("OwnerPlayerDataId", 501)
		.array_str("MembersPlayerName", &["Ann", "Bo"])
		.array_int("MembersPlayerDataID", &[501, 502])
		.array_str("TribeLog", &["Day 1: founded"])
		.int("TamedDinoCount", 12)
		.none()
		.finish();
	let bytes = PropertyWriter::new().structure("TribeData", "TribeData", &inner).none().finish();

	let record = project_tribe(&bytes, 1234, &ProjectOptions::default());
	assert_eq!(record.tribe_id, 1234);
	assert_eq!(record.tribe_name.as_deref(), Some("Herd"));
	assert_eq!(record.owner_id, Some(501));
	assert_eq!(record.member_count, 2);
	assert_eq!(record.members.len(), 2);
	assert_eq!(record.members[1].name, "Bo");
	assert_eq!(record.members[1].player_id, 502);
	assert_eq!(record.tribe_log, ["Day 1: founded"]);
	assert_eq!(record.tamed_dino_count, Some(12));
	assert_eq!(record.provenance, Provenance::Strict);
}

#[test]
fn scanned_member_lists_zip_on_overlap() {
	let bytes = PropertyWriter::compact()
		.str("MembersPlayerName", "Ann")
		.str("MembersPlayerName", "Bo")
		.str("MembersPlayerName", "Cy")
		.int("MembersPlayerDataID", 11)
		.int("MembersPlayerDataID", 22)
		.finish();

	let record = project_tribe(&bytes, 7, &ProjectOptions::default());
	assert_eq!(record.member_count, 3);
	let names: Vec<&str> = record.members.iter().map(|member| member.name.as_str()).collect();
	assert_eq!(names, ["Ann", "Bo"]);
	assert_eq!(record.provenance, Provenance::Heuristic);
}

#[test]
fn world_layout_member_arrays_are_scanned() {
	let mut bytes = PropertyWriter::compact().str("TribeName", "Raiders").finish();
	bytes.extend(world_array_str("MembersPlayerName", &["Ann", "Bo", "Cy"]));
	bytes.extend(world_array_int("MembersPlayerDataID", &[1, 2, 3]));

	let record = project_tribe(&bytes, 9, &ProjectOptions::default());
	assert_eq!(record.tribe_name.as_deref(), Some("Raiders"));
	assert_eq!(record.members.len(), 3);
	assert_eq!(record.members[2].player_id, 3);
}

fn inventory_array(items: &[Vec<u8>], stride: usize) -> Vec<u8> {
	let mut body = ue_string("StructProperty");
	body.extend_from_slice(&(items.len() as i32).to_le_bytes());
	for item in items {
		let mut padded = item.clone();
		padded.resize(stride, 0);
		body.extend(padded);
	}
	PropertyWriter::new().int("Version", 3).header_only("InventoryItems", "ArrayProperty", body.len()).bytes(&body).finish()
}

#[test]
fn inventory_struct_array_walks_items_at_stride() {
	let sword = PropertyWriter::new()
		.str("ItemArchetype", "PrimalItem_WeaponSword_C")
		.str("CustomItemName", "Excalibur")
		.int("ItemQuantity", 1)
		.float("ItemDurability", 87.5)
		.boolean("bIsBlueprint", true)
		.none()
		.finish();
	let stone = PropertyWriter::new()
		.str("ItemName", "Stone")
		.int("ItemQuantity", 50)
		.int("ItemQualityIndex", 3)
		.str("ItemClass", "PrimalItemResource_Stone_C")
		.none()
		.finish();
	let bytes = inventory_array(&[sword, stone], 512);

	let mut opt = ProjectOptions::default();
	opt.scan.item_stride = 512;
	let items = project_inventory(&bytes, &opt);
	assert_eq!(items.len(), 2);

	assert_eq!(items[0].name, "PrimalItem_WeaponSword_C");
	assert_eq!(items[0].class_name.as_deref(), Some("PrimalItem_WeaponSword_C"));
	assert_eq!(items[0].custom_name.as_deref(), Some("Excalibur"));
	assert_eq!(items[0].quantity, 1);
	assert_eq!(items[0].durability, Some(87.5));
	assert!(items[0].is_blueprint);
	assert!(!items[0].is_engram);

	assert_eq!(items[1].name, "Stone");
	assert_eq!(items[1].class_name.as_deref(), Some("PrimalItemResource_Stone_C"));
	assert_eq!(items[1].quantity, 50);
	assert_eq!(items[1].quality, Some(3));
	assert!(items.iter().all(|item| item.provenance == Provenance::Heuristic));
}

#[test]
fn inventory_short_stride_reads_every_item() {
	let first = PropertyWriter::new().str("ItemName", "Wood").none().finish();
	let second = PropertyWriter::new().str("ItemName", "Thatch").none().finish();
	let bytes = inventory_array(&[first, second], 64);

	let mut opt = ProjectOptions::default();
	opt.scan.item_stride = 64;
	let names: Vec<String> = project_inventory(&bytes, &opt).into_iter().map(|item| item.name).collect();
	assert_eq!(names, ["Wood", "Thatch"]);
}

#[test]
fn mismatched_item_lists_project_overlap_only() {
	let mut writer = PropertyWriter::compact();
	for name in ["Sword", "Pick", "Stone", "Wood", "Fiber"] {
		writer = writer.str("CustomItemName", name);
	}
	for quantity in [1, 1, 100] {
		writer = writer.int("ItemQuantity", quantity);
	}
	let bytes = writer.finish();

	let items = project_inventory(&bytes, &ProjectOptions::default());
	assert_eq!(items.len(), 3);
	assert_eq!(items[2].name, "Stone");
	assert_eq!(items[2].quantity, 100);
	assert!(items.iter().all(|item| item.provenance == Provenance::Heuristic));
}

#[test]
fn blank_item_names_are_dropped_after_zip() {
	let bytes = PropertyWriter::compact()
		.str("ItemName", "   ")
		.str("ItemName", " Pick ")
		.int("ItemQuantity", 1)
		.int("ItemQuantity", 2)
		.finish();

	let items = project_inventory(&bytes, &ProjectOptions::default());
	assert_eq!(items.len(), 1);
	assert_eq!(items[0].name, "Pick");
	assert_eq!(items[0].quantity, 2);
}

fn dino_blob() -> Vec<u8> {
	let mut bytes = vec![0x7F; 16];
	bytes.extend_from_slice(&ue_string("Raptor_Character_BP_C"));
	bytes.extend(
		PropertyWriter::compact()
			.str("TamedName", "Sharp Claw")
			.int("BaseCharacterLevel", 100)
			.int("CharacterLevel", 150)
			.str("TamerString", "Alice")
			.int("TargetingTeam", 123_456)
			.str("TribeName", "Herd")
			.boolean("bIsFemale", true)
			.finish(),
	);
	bytes
}

#[test]
fn dino_fields_are_recovered_from_actor_blob() {
	let record = project_dino(&dino_blob(), "actor-1", &ProjectOptions::default()).expect("dino recovered");
	assert_eq!(record.actor_id, "actor-1");
	assert_eq!(record.class_name.as_deref(), Some("Raptor_Character_BP_C"));
	assert_eq!(record.species.as_deref(), Some("Raptor"));
	assert_eq!(record.name.as_deref(), Some("Sharp Claw"));
	assert_eq!(record.level, Some(150));
	assert_eq!(record.base_level, Some(100));
	assert_eq!(record.owner_name.as_deref(), Some("Alice"));
	assert_eq!(record.tribe_id, Some(123_456));
	assert_eq!(record.tribe_name.as_deref(), Some("Herd"));
	assert_eq!(record.is_female, Some(true));
	assert_eq!(record.is_baby, None);
	assert_eq!(record.provenance, Provenance::Heuristic);
}

#[test]
fn dino_level_falls_back_to_base_plus_extra() {
	let mut bytes = ue_string("Rex_Character_BP_C");
	bytes.extend(PropertyWriter::compact().int("BaseCharacterLevel", 30).uint16("ExtraCharacterLevel", 29).finish());
	let record = project_dino(&bytes, "actor-2", &ProjectOptions::default()).expect("dino recovered");
	assert_eq!(record.level, Some(59));

	let mut bytes = ue_string("Rex_Character_BP_C");
	bytes.extend(PropertyWriter::compact().uint16("ExtraCharacterLevel", 29).finish());
	let record = project_dino(&bytes, "actor-3", &ProjectOptions::default()).expect("dino recovered");
	assert_eq!(record.level, Some(30));
}

#[test]
fn dino_without_identity_is_dropped() {
	let bytes = PropertyWriter::compact().int("TargetingTeam", 5).finish();
	assert!(project_dino(&bytes, "actor", &ProjectOptions::default()).is_none());
}

#[test]
fn structure_fields_are_recovered_from_actor_blob() {
	let mut bytes = ue_string("StorageBox_Large_C");
	bytes.extend(
		PropertyWriter::compact()
			.str("OwnerName", "Bob")
			.str("TribeName", "Herd")
			.boolean("bIsLocked", true)
			.float("MaxHealth", 1000.0)
			.float("Health", 500.0)
			.int("TargetingTeam", 77)
			.finish(),
	);

	let record = project_structure(&bytes, "actor-9", &ProjectOptions::default()).expect("structure recovered");
	assert_eq!(record.class_name.as_deref(), Some("StorageBox_Large_C"));
	assert_eq!(record.structure_type.as_deref(), Some("StorageBox Large"));
	assert_eq!(record.category, StructureCategory::Storage);
	assert_eq!(record.owner_name.as_deref(), Some("Bob"));
	assert_eq!(record.tribe_name.as_deref(), Some("Herd"));
	assert_eq!(record.is_locked, Some(true));
	assert_eq!(record.health, Some(500.0));
	assert_eq!(record.max_health, Some(1000.0));
	assert_eq!(record.tribe_id, Some(77));
	assert_eq!(record.structure_name, None);
	assert_eq!(record.provenance, Provenance::Heuristic);
}

#[test]
fn class_names_become_readable_labels() {
	assert_eq!(species_from_class("Raptor_Character_BP_C"), "Raptor");
	assert_eq!(species_from_class("Dino_Argent_Character_C"), "Argent");
	assert_eq!(species_from_class("BP_Mega_Rex_Character_BP_C"), "Mega Rex");
	assert_eq!(species_from_class("Dino_Character_BP_C"), "Dino_Character_BP_C");

	assert_eq!(structure_type_from_class("StorageBox_Large_C"), "StorageBox Large");
	assert_eq!(structure_type_from_class("Structure_Wall_Cement_BP_C"), "Wall Cement");
	assert_eq!(structure_type_from_class("_C"), "_C");
}
