use std::path::PathBuf;

use lazy_static::lazy_static;
use twophase::prelude::*;

/// Where the generated tables are cached between test runs
#[allow(dead_code)]
pub fn table_dir() -> PathBuf {
	PathBuf::from(env!("CARGO_TARGET_TMPDIR")).join("tables")
}

lazy_static! {
	pub static ref DATA: KociembaData =
		KociembaData::load_or_generate(&table_dir()).expect("the tables can be generated");
}
