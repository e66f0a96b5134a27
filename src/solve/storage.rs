//! Saving and loading of the generated tables.
//!
//! Tables are written with bincode to a temporary file which is then
//! renamed, so an interrupted save never leaves a truncated table behind.

use std::{
	fs::File,
	io::{BufReader, BufWriter, Write},
	path::Path,
};

use log::{info, warn};
use serde::{de::DeserializeOwned, Serialize};

use super::TableError;

/// A generated table which can be written to and read from a file.
pub trait TableFile: Serialize + DeserializeOwned {
	/// Name used in log messages and errors
	const NAME: &'static str;

	/// Check the dimensions of a loaded table
	fn is_well_formed(&self) -> bool;

	fn save(&self, path: &Path) -> Result<(), TableError> {
		if let Some(dir) = path.parent() {
			std::fs::create_dir_all(dir)?;
		}

		let tmp = path.with_extension("tmp");
		let written = write_table(&tmp, self)
			.and_then(|_| std::fs::rename(&tmp, path).map_err(TableError::from));
		if let Err(e) = written {
			let _ = std::fs::remove_file(&tmp);
			return Err(e);
		}

		info!("Saved {} to {}", Self::NAME, path.display());
		Ok(())
	}

	fn load(path: &Path) -> Result<Self, TableError> {
		let reader = BufReader::new(File::open(path)?);
		let table: Self = bincode::deserialize_from(reader)?;

		if !table.is_well_formed() {
			return Err(TableError::Shape { table: Self::NAME });
		}

		info!("Loaded {} from {}", Self::NAME, path.display());
		Ok(table)
	}

	/// Load the table from `path`. If it is missing, corrupt or does not
	/// `fit` where it is needed, generate it and try to save it for the next time.
	fn load_or_generate<P, F>(path: &Path, fits: P, generate: F) -> Result<Self, TableError>
	where
		P: FnOnce(&Self) -> bool,
		F: FnOnce() -> Result<Self, TableError>,
	{
		let loaded = Self::load(path).and_then(|table| match fits(&table) {
			true => Ok(table),
			false => Err(TableError::Shape { table: Self::NAME }),
		});

		match loaded {
			Ok(table) => Ok(table),
			Err(e) => {
				warn!("Must generate {} ({}), this may take a while...", Self::NAME, e);
				let table = generate()?;
				if let Err(e) = table.save(path) {
					warn!("Could not save {}: {}", Self::NAME, e);
				}
				Ok(table)
			}
		}
	}
}

fn write_table<T: Serialize>(path: &Path, table: &T) -> Result<(), TableError> {
	let mut writer = BufWriter::new(File::create(path)?);
	bincode::serialize_into(&mut writer, table)?;
	writer.flush()?;
	Ok(())
}
