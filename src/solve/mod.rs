pub mod kociemba;
pub mod movetable;
pub mod pruning;
pub mod storage;
pub mod symclass;

use crate::cube::CubeError;

/// No symmetry maps a class representative onto the raw coordinate it
/// should stand for. Means the tables are inconsistent.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("No symmetry of class {class} matches the raw coordinate {raw}")]
pub struct SymmetryResolutionFailure {
	pub class: usize,
	pub raw: usize,
}

/// Everything that can go wrong while generating, loading or saving tables.
#[derive(thiserror::Error, Debug)]
pub enum TableError {
	#[error("Could not access table file: {0}")]
	Io(#[from] std::io::Error),
	#[error("Could not (de)serialize table: {0}")]
	Encoding(#[from] bincode::Error),
	#[error("The table {table} has the wrong shape")]
	Shape { table: &'static str },
	#[error("{cells} cells of the table {table} were never reached")]
	Unreached { table: &'static str, cells: usize },
	#[error(transparent)]
	SymmetryResolution(#[from] SymmetryResolutionFailure),
}

/// The reasons a cube could not be solved.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SolveError {
	#[error("Invalid cube configuration: {0}")]
	InvalidConfiguration(#[from] CubeError),
	#[error(transparent)]
	SymmetryResolution(#[from] SymmetryResolutionFailure),
	#[error("The cube is not within the phase 2 subgroup")]
	NotInSubgroup,
	#[error("Phase 1 got stuck before reaching the subgroup")]
	Phase1Unsolvable,
	#[error("Phase 2 ran out of widening rounds")]
	Phase2Unsolvable,
}
