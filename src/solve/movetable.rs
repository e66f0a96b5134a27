//! Transition tables of the coordinates under turns and symmetries.

use log::{info, trace};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::{
	storage::TableFile,
	symclass::{SymClassTable, SymCoord},
	SymmetryResolutionFailure, TableError,
};
use crate::cube::{
	coord::*,
	cubiecube::TURN_CUBES,
	symmetry::*,
	turn::*,
};

/// v[coord][i] is the coordinate when applying move i on coord
pub type Movetable = Vec<Vec<u16>>;

/// v[coord][i] is the coordinate of the i-th symmetry of coord
pub type Symtable = Vec<Vec<u16>>;

/// v[class][i] is the raw coordinate or SymCoord belonging to class and symmetry/move i
pub type SymMovetable = Vec<Vec<u32>>;

/// The tables of a symmetry reduced coordinate.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymCoordTables {
	/// v[class][turn] is the SymCoord after applying the turn on the representative
	pub moves: SymMovetable,
	/// v[class][s] is the raw coordinate of S * R * S^-1
	pub sym: SymMovetable,
	/// v[class][s] is the raw coordinate of S^-1 * R * S
	pub sym_inv: SymMovetable,
}

impl SymCoordTables {
	pub fn generate(classes: &SymClassTable) -> Result<Self, SymmetryResolutionFailure> {
		let coord = classes.coord();

		let conjugated = |invert: bool| -> SymMovetable {
			(0..classes.num_classes())
				.into_par_iter()
				.map(|class| {
					let rep = coord.decode(classes.representative(class));
					(0..NUM_SYMMETRIES_D4H)
						.map(|s| coord.encode(&conjugate(&rep, s, invert)) as u32)
						.collect()
				})
				.collect()
		};
		let sym = conjugated(false);
		let sym_inv = conjugated(true);

		let moves = (0..classes.num_classes())
			.into_par_iter()
			.map(|class| {
				let rep = coord.decode(classes.representative(class));
				TURN_CUBES
					.iter()
					.map(|turn| {
						let raw = coord.encode(&rep.multiply(turn));
						let next = classes.sym_coord(raw);
						let target = next.class();
						let s = resolve_symmetry(&sym_inv[target], next.sym(), raw, target)?;
						Ok::<_, SymmetryResolutionFailure>(SymCoord::new(target, s).0)
					})
					.collect::<Result<Vec<u32>, _>>()
			})
			.collect::<Result<SymMovetable, SymmetryResolutionFailure>>()?;

		info!("Generated symmetry move tables of {}", coord);
		Ok(Self { moves, sym, sym_inv })
	}

	/// The SymCoord reached by applying `turn` on the representative of `class`
	pub fn apply(&self, class: usize, turn: Turn) -> SymCoord {
		SymCoord(self.moves[class][turn.index()])
	}

	/// Find a symmetry s with S^-1 * R * S having the raw coordinate `raw`,
	/// trying `sym` first.
	pub fn resolve(
		&self,
		class: usize,
		sym: usize,
		raw: usize,
	) -> Result<usize, SymmetryResolutionFailure> {
		resolve_symmetry(&self.sym_inv[class], sym, raw, class)
	}

	fn is_well_formed(&self, classes: usize) -> bool {
		let rows = |t: &SymMovetable, width: usize| {
			t.len() == classes && t.iter().all(|r| r.len() == width)
		};

		rows(&self.moves, NUM_TURNS)
			&& rows(&self.sym, NUM_SYMMETRIES_D4H)
			&& rows(&self.sym_inv, NUM_SYMMETRIES_D4H)
			&& self.moves.iter().flatten().all(|s| SymCoord(*s).class() < classes)
	}
}

/// Check that `sym` turns the representative into `raw`, otherwise scan all
/// symmetries for one that does.
pub fn resolve_symmetry(
	sym_inv: &[u32],
	sym: usize,
	raw: usize,
	class: usize,
) -> Result<usize, SymmetryResolutionFailure> {
	if sym_inv[sym] as usize == raw {
		return Ok(sym);
	}

	trace!("Re-resolving symmetry {} of class {} for raw coordinate {}", sym, class, raw);
	sym_inv
		.iter()
		.position(|r| *r as usize == raw)
		.ok_or(SymmetryResolutionFailure { class, raw })
}

// ===== Table Generating =====

/// Create a movetable: decode every value, apply each turn and encode again
pub fn create_movetable(coord: Coord, turns: &[Turn]) -> Movetable {
	(0..coord.size())
		.into_par_iter()
		.map(|idx| {
			let cube = coord.decode(idx);
			turns
				.iter()
				.map(|turn| coord.encode(&cube.multiply(&TURN_CUBES[turn.index()])) as u16)
				.collect()
		})
		.collect()
}

/// Create a table holding the coordinate of S * c * S^-1 for every value c
pub fn create_conjtable(coord: Coord) -> Symtable {
	(0..coord.size())
		.into_par_iter()
		.map(|idx| {
			let cube = coord.decode(idx);
			(0..NUM_SYMMETRIES_D4H)
				.map(|s| coord.encode(&conjugate(&cube, s, false)) as u16)
				.collect()
		})
		.collect()
}

/// All transition tables used by the pruning tables and the search.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveTables {
	/// Corner orientation under all 18 turns
	pub twist: Movetable,
	/// Corner orientation under the 16 symmetries
	pub twist_conj: Symtable,
	/// Edge orientation under all 18 turns
	pub flip: Movetable,
	/// Ud-slice position under all 18 turns
	pub udslice: Movetable,
	pub flip_udslice: SymCoordTables,
	/// Corner permutation under all 18 turns
	pub corner_perm: Movetable,
	pub corner_perm_sym: SymCoordTables,
	/// Permutation of the U and D edges under the 10 phase 2 turns
	pub edge8: Movetable,
	/// Permutation of the U and D edges under the 16 symmetries
	pub edge8_conj: Symtable,
	/// Ordered ud-slice position under all 18 turns
	pub udslice_sorted: Movetable,
}

impl MoveTables {
	pub fn generate(
		flip_udslice: &SymClassTable,
		corner_perm: &SymClassTable,
	) -> Result<Self, TableError> {
		info!("Generating move tables");

		let tables = Self {
			twist: create_movetable(Coord::CornerOrientation, &Turn::ALL),
			twist_conj: create_conjtable(Coord::CornerOrientation),
			flip: create_movetable(Coord::EdgeOrientation, &Turn::ALL),
			udslice: create_movetable(Coord::UDSlice, &Turn::ALL),
			flip_udslice: SymCoordTables::generate(flip_udslice)?,
			corner_perm: create_movetable(Coord::CornerPermutation, &Turn::ALL),
			corner_perm_sym: SymCoordTables::generate(corner_perm)?,
			edge8: create_movetable(Coord::Phase2EdgePermutation, &Turn::PHASE2),
			edge8_conj: create_conjtable(Coord::Phase2EdgePermutation),
			udslice_sorted: create_movetable(Coord::UDSliceSorted, &Turn::ALL),
		};

		info!("Generated move tables");
		Ok(tables)
	}

	/// Number of flip-udslice classes the tables were built for
	pub fn flip_udslice_classes(&self) -> usize {
		self.flip_udslice.moves.len()
	}

	/// Number of corner permutation classes the tables were built for
	pub fn corner_perm_classes(&self) -> usize {
		self.corner_perm_sym.moves.len()
	}
}

impl TableFile for MoveTables {
	const NAME: &'static str = "move tables";

	fn is_well_formed(&self) -> bool {
		let shape = |t: &Vec<Vec<u16>>, rows: usize, width: usize, range: usize| {
			t.len() == rows
				&& t.iter().all(|r| r.len() == width && r.iter().all(|v| (*v as usize) < range))
		};

		shape(&self.twist, N_TWIST, NUM_TURNS, N_TWIST)
			&& shape(&self.twist_conj, N_TWIST, NUM_SYMMETRIES_D4H, N_TWIST)
			&& shape(&self.flip, N_FLIP, NUM_TURNS, N_FLIP)
			&& shape(&self.udslice, N_UDSLICE, NUM_TURNS, N_UDSLICE)
			&& shape(&self.corner_perm, N_CORNER_PERM, NUM_TURNS, N_CORNER_PERM)
			&& shape(&self.edge8, N_EDGE8_PERM, NUM_PHASE2_TURNS, N_EDGE8_PERM)
			&& shape(&self.edge8_conj, N_EDGE8_PERM, NUM_SYMMETRIES_D4H, N_EDGE8_PERM)
			&& shape(&self.udslice_sorted, N_UDSLICE_SORTED, NUM_TURNS, N_UDSLICE_SORTED)
			&& self.flip_udslice.is_well_formed(self.flip_udslice_classes())
			&& self.corner_perm_sym.is_well_formed(self.corner_perm_classes())
	}
}
