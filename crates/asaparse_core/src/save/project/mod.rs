use std::sync::Arc;

use crate::save::scan::{ExpectedType, find_all, find_all_int, find_all_str, find_array_values, find_f64, find_int, find_str, find_u16};
use crate::save::{DecodeOptions, PropertyBag, Provenance, ScanOptions, StreamDecode, TypedValue, XpTable};

mod inventory;
mod player;
mod tribe;
mod world;

pub use inventory::project_inventory;
pub use player::{project_player, project_player_from_bag};
pub use tribe::project_tribe;
pub(crate) use world::STRUCTURE_CLASS_PATTERNS;
pub use world::{project_dino, project_structure, species_from_class, structure_type_from_class};

/// Options shared by every projector.
#[derive(Debug, Clone, Default)]
pub struct ProjectOptions {
	/// Sequential decode limits.
	pub decode: DecodeOptions,
	/// Pattern scan limits.
	pub scan: ScanOptions,
	/// Experience table used when no level is stored.
	pub xp_table: Option<Arc<XpTable>>,
}

impl ProjectOptions {
	/// Default options with the built-in XP table installed.
	pub fn with_default_xp_table() -> Self {
		Self {
			xp_table: Some(Arc::new(XpTable::asa_default())),
			..Self::default()
		}
	}
}

/// Field lookup over a decoded bag with scanner fallback over the raw bytes.
///
/// For a chain of names, every name is tried against the bag before any name is scanned. A value
/// supplied by the scanner marks the reader heuristic.
pub(crate) struct FieldReader<'r, 'a> {
	bag: &'r PropertyBag<'a>,
	bytes: &'r [u8],
	scan: &'r ScanOptions,
	provenance: Provenance,
}

impl<'r, 'a> FieldReader<'r, 'a> {
	pub(crate) fn new(bytes: &'r [u8], decoded: &'r StreamDecode<'a>, scan: &'r ScanOptions) -> Self {
		Self {
			bag: &decoded.bag,
			bytes,
			scan,
			provenance: if decoded.is_complete() {
				Provenance::Strict
			} else {
				Provenance::Heuristic
			},
		}
	}

	/// Reader with no raw bytes to scan; strict unless told otherwise.
	pub(crate) fn bag_only(bag: &'r PropertyBag<'a>, scan: &'r ScanOptions) -> Self {
		Self {
			bag,
			bytes: &[],
			scan,
			provenance: Provenance::Strict,
		}
	}

	pub(crate) fn provenance(&self) -> Provenance {
		self.provenance
	}

	pub(crate) fn str(&mut self, names: &[&str]) -> Option<String> {
		self.lookup(names, |value| value.as_str().filter(|text| !text.is_empty()).map(str::to_owned), find_str)
	}

	pub(crate) fn int(&mut self, names: &[&str]) -> Option<i64> {
		self.lookup(names, TypedValue::as_i64, |bytes, name| {
			find_int(bytes, name).or_else(|| find_u16(bytes, name).map(i64::from))
		})
	}

	pub(crate) fn float(&mut self, names: &[&str]) -> Option<f64> {
		self.lookup(names, TypedValue::as_f64, find_f64)
	}

	/// String list from a bag array, repeated bag properties, a scanned array, or repeated scanned values.
	pub(crate) fn str_list(&mut self, name: &str) -> Vec<String> {
		self.list(name, |value| value.as_str().map(str::to_owned), find_all_str)
	}

	/// Float list; see [`FieldReader::str_list`].
	pub(crate) fn float_list(&mut self, name: &str) -> Vec<f64> {
		self.list(name, TypedValue::as_f64, |bytes, name, scan| {
			find_all(bytes, name, ExpectedType::Float, scan).into_iter().filter_map(|hit| hit.value.as_f64()).collect()
		})
	}

	/// Integer list; see [`FieldReader::str_list`].
	pub(crate) fn int_list(&mut self, name: &str) -> Vec<i64> {
		self.list(name, |value| value.as_i64(), find_all_int)
	}

	fn lookup<T>(&mut self, names: &[&str], from_bag: impl Fn(&TypedValue<'a>) -> Option<T>, from_scan: impl Fn(&[u8], &str) -> Option<T>) -> Option<T> {
		if let Some(found) = names.iter().find_map(|name| self.bag.find(name).and_then(&from_bag)) {
			return Some(found);
		}
		let found = names.iter().find_map(|name| from_scan(self.bytes, name))?;
		self.provenance = Provenance::Heuristic;
		Some(found)
	}

	fn list<T>(
		&mut self,
		name: &str,
		element: impl Fn(&TypedValue<'a>) -> Option<T>,
		repeated: impl Fn(&[u8], &str, &ScanOptions) -> Vec<T>,
	) -> Vec<T> {
		if let Some(items) = self.bag.find(name).and_then(TypedValue::as_array) {
			return items.iter().filter_map(|item| element(item)).collect();
		}
		let repeated_props: Vec<T> = self.bag.all(name).filter_map(|prop| element(&prop.value)).collect();
		if !repeated_props.is_empty() {
			return repeated_props;
		}

		let scanned = match find_array_values(self.bytes, name, self.scan) {
			Some(items) => items.iter().filter_map(|item| element(item)).collect(),
			None => repeated(self.bytes, name, self.scan),
		};
		if !scanned.is_empty() {
			self.provenance = Provenance::Heuristic;
		}
		scanned
	}
}

#[cfg(test)]
mod tests;
