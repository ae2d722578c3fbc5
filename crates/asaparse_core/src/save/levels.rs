use crate::save::{Result, SaveError};

/// Minimum experience per player level for an unmodified server; index 0 is level 1.
const ASA_XP_THRESHOLDS: [u32; 180] = [
	0, 10, 25, 45, 70, 100, 135, 175, 220, 270,
	325, 385, 450, 520, 595, 675, 760, 850, 945, 1_045,
	1_150, 1_260, 1_375, 1_495, 1_620, 1_750, 1_885, 2_025, 2_170, 2_320,
	2_475, 2_635, 2_800, 2_970, 3_145, 3_325, 3_510, 3_700, 3_895, 4_095,
	4_300, 4_510, 4_725, 4_945, 5_170, 5_400, 5_635, 5_875, 6_120, 6_370,
	6_625, 6_885, 7_150, 7_420, 7_695, 7_975, 8_260, 8_550, 8_845, 9_145,
	9_450, 9_760, 10_075, 10_395, 10_720, 11_050, 11_385, 11_725, 12_070, 12_420,
	12_775, 13_135, 13_500, 13_870, 14_245, 14_625, 15_010, 15_400, 15_795, 16_195,
	16_600, 17_010, 17_425, 17_845, 18_270, 18_700, 19_135, 19_575, 20_020, 20_470,
	20_925, 21_385, 21_850, 22_320, 22_795, 23_275, 23_760, 24_250, 24_745, 25_245,
	25_750, 26_260, 26_775, 27_295, 27_820, 28_350, 28_885, 29_425, 29_970, 30_520,
	31_075, 31_635, 32_200, 32_770, 33_345, 33_925, 34_510, 35_100, 35_695, 36_295,
	36_900, 37_510, 38_125, 38_745, 39_370, 40_000, 40_635, 41_275, 41_920, 42_570,
	43_225, 43_885, 44_550, 45_220, 45_895, 46_575, 47_260, 47_950, 48_645, 49_345,
	50_050, 50_760, 51_475, 52_195, 52_920, 53_650, 54_385, 55_125, 55_870, 56_620,
	57_375, 58_135, 58_900, 59_670, 60_445, 61_225, 62_010, 62_800, 63_595, 64_395,
	65_200, 66_010, 66_825, 67_645, 68_470, 69_300, 70_135, 70_975, 71_820, 72_670,
	73_525, 74_385, 75_250, 76_120, 76_995, 77_875, 78_760, 79_650, 80_545, 81_445,
];

/// Immutable experience-to-level threshold table.
///
/// `thresholds[i]` is the minimum experience for level `i + 1`.
#[derive(Debug, Clone, PartialEq)]
pub struct XpTable {
	thresholds: Vec<f64>,
}

impl XpTable {
	/// Build a table from per-level minimum experience values.
	pub fn new(thresholds: Vec<f64>) -> Result<Self> {
		if thresholds.is_empty() {
			return Err(SaveError::InvalidXpTable { reason: "table is empty" });
		}
		if thresholds.iter().any(|value| !value.is_finite()) {
			return Err(SaveError::InvalidXpTable {
				reason: "thresholds must be finite",
			});
		}
		if thresholds.windows(2).any(|pair| pair[1] < pair[0]) {
			return Err(SaveError::InvalidXpTable {
				reason: "thresholds must be non-decreasing",
			});
		}
		Ok(Self { thresholds })
	}

	/// Default 180-level table.
	pub fn asa_default() -> Self {
		Self {
			thresholds: ASA_XP_THRESHOLDS.iter().map(|value| f64::from(*value)).collect(),
		}
	}

	/// Highest level in the table.
	pub fn max_level(&self) -> u32 {
		self.thresholds.len() as u32
	}

	/// Minimum experience for a one-indexed level.
	pub fn threshold(&self, level: u32) -> Option<f64> {
		let idx = usize::try_from(level).ok()?.checked_sub(1)?;
		self.thresholds.get(idx).copied()
	}

	/// Level reached with `xp` experience, clamped to `1..=max_level`.
	pub fn level_for(&self, xp: f64) -> u32 {
		let reached = self.thresholds.partition_point(|threshold| *threshold <= xp);
		(reached as u32).clamp(1, self.max_level())
	}
}

#[cfg(test)]
mod tests {
	use crate::save::{SaveError, XpTable};

	#[test]
	fn default_table_covers_180_levels() {
		let table = XpTable::asa_default();
		assert_eq!(table.max_level(), 180);
		assert_eq!(table.threshold(1), Some(0.0));
		assert_eq!(table.threshold(2), Some(10.0));
		assert_eq!(table.threshold(180), Some(81_445.0));
		assert_eq!(table.threshold(0), None);
		assert_eq!(table.threshold(181), None);
	}

	#[test]
	fn level_lookup_is_bisect_right() {
		let table = XpTable::asa_default();
		assert_eq!(table.level_for(0.0), 1);
		assert_eq!(table.level_for(9.9), 1);
		assert_eq!(table.level_for(10.0), 2);
		assert_eq!(table.level_for(24.0), 2);
		assert_eq!(table.level_for(1_000_000.0), 180);
		assert_eq!(table.level_for(-5.0), 1);
	}

	#[test]
	fn every_threshold_maps_to_its_level() {
		let table = XpTable::asa_default();
		for level in 1..=table.max_level() {
			let xp = table.threshold(level).expect("threshold exists");
			assert_eq!(table.level_for(xp), level);
		}
	}

	#[test]
	fn custom_tables_are_validated() {
		assert!(matches!(XpTable::new(Vec::new()), Err(SaveError::InvalidXpTable { .. })));
		assert!(matches!(XpTable::new(vec![0.0, 5.0, 3.0]), Err(SaveError::InvalidXpTable { .. })));
		assert!(matches!(XpTable::new(vec![0.0, f64::NAN]), Err(SaveError::InvalidXpTable { .. })));

		let table = XpTable::new(vec![0.0, 100.0, 100.0, 300.0]).expect("valid table");
		assert_eq!(table.level_for(100.0), 3);
		assert_eq!(table.level_for(299.0), 3);
	}
}
