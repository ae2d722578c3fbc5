use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::save::{Result, SaveError};

/// Save unit kind, derived from the file extension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveKind {
	/// `.arkprofile`: one player, identified by EOS id.
	Profile {
		/// File stem.
		eos_id: String,
	},
	/// `.arktribe`: one tribe, identified by numeric id.
	Tribe {
		/// File stem parsed as a tribe id.
		tribe_id: u32,
	},
	/// Any other file; identity unknown.
	Other,
}

impl SaveKind {
	/// Derive kind and identity from a file name.
	pub fn from_path(path: &Path) -> Result<Self> {
		let stem = path.file_stem().and_then(|stem| stem.to_str()).unwrap_or_default();
		match path.extension().and_then(|ext| ext.to_str()) {
			Some("arkprofile") => Ok(Self::Profile { eos_id: stem.to_owned() }),
			Some("arktribe") => stem
				.parse()
				.map(|tribe_id| Self::Tribe { tribe_id })
				.map_err(|_| SaveError::InvalidIdentity { stem: stem.to_owned() }),
			_ => Ok(Self::Other),
		}
	}
}

/// One save unit loaded into memory.
#[derive(Debug, Clone)]
pub struct SaveFile {
	/// Source path.
	pub path: PathBuf,
	/// Kind and identity from the file name.
	pub kind: SaveKind,
	bytes: Vec<u8>,
}

impl SaveFile {
	/// Read a save unit from disk.
	pub fn open(path: impl AsRef<Path>) -> Result<Self> {
		let path = path.as_ref();
		let kind = SaveKind::from_path(path)?;
		let bytes = fs::read(path)?;
		debug!(path = %path.display(), len = bytes.len(), "read save unit");
		Ok(Self {
			path: path.to_path_buf(),
			kind,
			bytes,
		})
	}

	/// Raw bytes of the unit.
	pub fn bytes(&self) -> &[u8] {
		&self.bytes
	}

	/// Identity string: EOS id, tribe id, or the file stem.
	pub fn identity(&self) -> String {
		match &self.kind {
			SaveKind::Profile { eos_id } => eos_id.clone(),
			SaveKind::Tribe { tribe_id } => tribe_id.to_string(),
			SaveKind::Other => self.path.file_stem().map(|stem| stem.to_string_lossy().into_owned()).unwrap_or_default(),
		}
	}
}
