use tracing::debug;

use crate::save::project::{FieldReader, ProjectOptions};
use crate::save::{TribeMember, TribeRecord, decode_property_stream};

/// Project a tribe buffer.
///
/// Members are paired positionally from the name and id lists; when the lists differ in length only
/// the overlapping prefix becomes members, while `member_count` still counts every name.
pub fn project_tribe(bytes: &[u8], tribe_id: u32, opt: &ProjectOptions) -> TribeRecord {
	let decoded = decode_property_stream(bytes, &opt.decode);
	let mut reader = FieldReader::new(bytes, &decoded, &opt.scan);

	let tribe_name = reader.str(&["TribeName"]);
	let owner_id = reader.int(&["OwnerPlayerDataId", "OwnerPlayerDataID"]);
	let names = reader.str_list("MembersPlayerName");
	let ids = reader.int_list("MembersPlayerDataID");
	let tribe_log = reader.str_list("TribeLog");
	let tamed_dino_count = reader.int(&["TamedDinoCount"]);

	if names.len() != ids.len() {
		debug!(tribe_id, names = names.len(), ids = ids.len(), "member lists differ in length");
	}
	let member_count = names.len();
	let members = names.into_iter().zip(ids).map(|(name, player_id)| TribeMember { name, player_id }).collect();

	TribeRecord {
		tribe_id,
		tribe_name,
		owner_id,
		members,
		member_count,
		tribe_log,
		tamed_dino_count,
		provenance: reader.provenance(),
	}
}
