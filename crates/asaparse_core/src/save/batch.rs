use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use tracing::debug;

use crate::save::actor::{WorldScan, project_actor};
use crate::save::{ActorRow, ItemRecord, PlayerRecord, ProjectOptions, Result, TribeRecord, project_inventory, project_player, project_tribe};

/// Worker pool sizing.
#[derive(Debug, Clone, Default)]
pub struct BatchOptions {
	/// Worker thread count; `None` lets rayon pick one per core.
	pub threads: Option<usize>,
}

/// Projects many loaded save units on a bounded worker pool.
///
/// Every projection is a pure function of its input bytes, so units run independently. Outputs are
/// returned in input order regardless of scheduling.
pub struct BatchRunner {
	pool: ThreadPool,
	opt: ProjectOptions,
}

impl BatchRunner {
	/// Build a runner with its own pool.
	pub fn new(batch: &BatchOptions, opt: ProjectOptions) -> Result<Self> {
		let mut builder = ThreadPoolBuilder::new().thread_name(|idx| format!("asaparse-{idx}"));
		if let Some(threads) = batch.threads {
			builder = builder.num_threads(threads);
		}
		let pool = builder.build()?;
		debug!(threads = pool.current_num_threads(), "batch pool ready");
		Ok(Self { pool, opt })
	}

	/// Projection options shared by every unit.
	pub fn options(&self) -> &ProjectOptions {
		&self.opt
	}

	/// Number of worker threads.
	pub fn threads(&self) -> usize {
		self.pool.current_num_threads()
	}

	/// Project `(eos_id, bytes)` profile units.
	pub fn players<B: AsRef<[u8]> + Sync>(&self, units: &[(String, B)]) -> Vec<PlayerRecord> {
		debug!(units = units.len(), "batch players");
		self.map(units, |(eos_id, bytes)| project_player(bytes.as_ref(), eos_id, &self.opt))
	}

	/// Project `(tribe_id, bytes)` tribe units.
	pub fn tribes<B: AsRef<[u8]> + Sync>(&self, units: &[(u32, B)]) -> Vec<TribeRecord> {
		debug!(units = units.len(), "batch tribes");
		self.map(units, |(tribe_id, bytes)| project_tribe(bytes.as_ref(), *tribe_id, &self.opt))
	}

	/// Project the inventory of each buffer.
	pub fn inventories<B: AsRef<[u8]> + Sync>(&self, units: &[B]) -> Vec<Vec<ItemRecord>> {
		debug!(units = units.len(), "batch inventories");
		self.map(units, |bytes| project_inventory(bytes.as_ref(), &self.opt))
	}

	/// Classify and project world actor rows.
	pub fn world_actors(&self, rows: &[ActorRow]) -> WorldScan {
		debug!(rows = rows.len(), "batch world actors");
		WorldScan::from_actors(self.map(rows, |row| project_actor(&row.key, &row.value, &self.opt)))
	}

	fn map<T: Sync, R: Send>(&self, units: &[T], project: impl Fn(&T) -> R + Sync + Send) -> Vec<R> {
		self.pool.install(|| units.par_iter().map(project).collect())
	}
}

#[cfg(test)]
mod tests {
	use asaparse_testkit::{PropertyWriter, ue_string};

	use crate::save::{ActorRow, BatchOptions, BatchRunner, ProjectOptions, project_player, scan_world_actors};

	fn runner(threads: usize) -> BatchRunner {
		BatchRunner::new(&BatchOptions { threads: Some(threads) }, ProjectOptions::default()).expect("pool builds")
	}

	#[test]
	fn pool_size_is_bounded() {
		assert_eq!(runner(2).threads(), 2);
	}

	#[test]
	fn players_keep_input_order_and_match_sequential() {
		let units: Vec<(String, Vec<u8>)> = (0..64_u16)
			.map(|idx| {
				let bytes = PropertyWriter::new().uint16("ExtraCharacterLevel", idx).none().finish();
				(format!("eos-{idx}"), bytes)
			})
			.collect();

		let records = runner(4).players(&units);
		assert_eq!(records.len(), units.len());
		for (record, (eos_id, bytes)) in records.iter().zip(&units) {
			assert_eq!(&record.eos_id, eos_id);
			assert_eq!(record, &project_player(bytes, eos_id, &ProjectOptions::default()));
		}
		assert_eq!(records[63].level, 64);
	}

	#[test]
	fn tribes_and_inventories_keep_order() {
		let tribes: Vec<(u32, Vec<u8>)> = (1..=8).map(|id| (id, PropertyWriter::new().str("TribeName", &format!("T{id}")).none().finish())).collect();
		let records = runner(3).tribes(&tribes);
		let names: Vec<Option<&str>> = records.iter().map(|tribe| tribe.tribe_name.as_deref()).collect();
		assert_eq!(names[0], Some("T1"));
		assert_eq!(names[7], Some("T8"));

		let inventories = vec![
			PropertyWriter::compact().str("ItemName", "Wood").int("ItemQuantity", 3).finish(),
			Vec::new(),
		];
		let items = runner(2).inventories(&inventories);
		assert_eq!(items[0].len(), 1);
		assert!(items[1].is_empty());
	}

	#[test]
	fn world_actors_match_sequential_scan() {
		let rows: Vec<ActorRow> = (0..20)
			.map(|idx| {
				let mut blob = ue_string("Raptor_Character_BP_C");
				blob.extend(PropertyWriter::compact().str("TamedName", &format!("R{idx}")).finish());
				if idx % 3 == 0 {
					blob.clear();
				}
				ActorRow::new(format!("row-{idx}"), blob)
			})
			.collect();

		let parallel = runner(4).world_actors(&rows);
		assert_eq!(parallel, scan_world_actors(&rows, &ProjectOptions::default()));
		assert_eq!(parallel.skipped, 7);
		assert_eq!(parallel.dinos[0].actor_id, "row-1");
	}
}
