//! Lower bounds of the distance to the goal of each phase.
//!
//! Both tables are dense grids indexed by a symmetry class and a secondary
//! coordinate, where the secondary coordinate is taken in the frame in which
//! the class representative is exact. They are filled by a breadth-first
//! search starting at cell (0, 0).

use std::sync::atomic::{AtomicU8, Ordering};

use log::info;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::{movetable::MoveTables, storage::TableFile, symclass::SymClassTable, TableError};
use crate::cube::{coord::*, symmetry::NUM_SYMMETRIES_D4H, turn::*};

/// Marks a cell whose distance is not known yet
pub const UNKNOWN: u8 = 42;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PruningTable {
	classes: usize,
	width: usize,
	/// v[class * width + coord] is the distance
	data: Vec<u8>,
}

/// The graph a pruning table is built over.
trait Space: Sync {
	const NAME: &'static str;

	fn classes(&self) -> usize;
	fn width(&self) -> usize;
	fn num_turns(&self) -> usize;

	/// The cell reached from (class, coord) by the i-th turn
	fn neighbour(&self, class: usize, coord: usize, i: usize) -> (usize, usize);

	/// Bitmask of the symmetries fixing the representative of the class
	fn stabilizer(&self, class: usize) -> u16;

	/// The secondary coordinate conjugated by symmetry `sym`
	fn conjugate(&self, coord: usize, sym: usize) -> usize;
}

/// Flip-udslice classes times corner orientation, all 18 turns
struct Phase1Space<'a> {
	tables: &'a MoveTables,
	classes: &'a SymClassTable,
}

impl Space for Phase1Space<'_> {
	const NAME: &'static str = "phase 1 pruning table";

	fn classes(&self) -> usize {
		self.classes.num_classes()
	}

	fn width(&self) -> usize {
		N_TWIST
	}

	fn num_turns(&self) -> usize {
		NUM_TURNS
	}

	fn neighbour(&self, class: usize, twist: usize, i: usize) -> (usize, usize) {
		let next = self.tables.flip_udslice.apply(class, Turn::ALL[i]);
		let twist = self.tables.twist[twist][i] as usize;
		(next.class(), self.conjugate(twist, next.sym()))
	}

	fn stabilizer(&self, class: usize) -> u16 {
		self.classes.stabilizer(class)
	}

	fn conjugate(&self, twist: usize, sym: usize) -> usize {
		self.tables.twist_conj[twist][sym] as usize
	}
}

/// Corner permutation classes times U and D edge permutation, the 10 phase 2 turns
struct Phase2Space<'a> {
	tables: &'a MoveTables,
	classes: &'a SymClassTable,
}

impl Space for Phase2Space<'_> {
	const NAME: &'static str = "phase 2 pruning table";

	fn classes(&self) -> usize {
		self.classes.num_classes()
	}

	fn width(&self) -> usize {
		N_EDGE8_PERM
	}

	fn num_turns(&self) -> usize {
		NUM_PHASE2_TURNS
	}

	fn neighbour(&self, class: usize, edge8: usize, i: usize) -> (usize, usize) {
		let next = self.tables.corner_perm_sym.apply(class, Turn::PHASE2[i]);
		let edge8 = self.tables.edge8[edge8][i] as usize;
		(next.class(), self.conjugate(edge8, next.sym()))
	}

	fn stabilizer(&self, class: usize) -> u16 {
		self.classes.stabilizer(class)
	}

	fn conjugate(&self, edge8: usize, sym: usize) -> usize {
		self.tables.edge8_conj[edge8][sym] as usize
	}
}

/// Write `value` into the cell if it is still unknown
fn try_set(cell: &AtomicU8, value: u8) -> bool {
	cell.compare_exchange(UNKNOWN, value, Ordering::Relaxed, Ordering::Relaxed)
		.is_ok()
}

fn fill<S: Space>(space: &S) -> Result<PruningTable, TableError> {
	let (classes, width) = (space.classes(), space.width());
	let total = classes * width;

	let data: Vec<AtomicU8> = (0..total).into_par_iter().map(|_| AtomicU8::new(UNKNOWN)).collect();
	data[0].store(0, Ordering::Relaxed);

	let mut filled = 1;
	let mut depth = 0;

	while depth < UNKNOWN - 1 {
		// Past half of the grid, unknown cells look for a neighbour at the current depth
		let backward = filled > total / 2;

		let added: usize = data
			.par_chunks(width)
			.enumerate()
			.map(|(class, row)| {
				let mut added = 0;

				for (coord, cell) in row.iter().enumerate() {
					if backward {
						if cell.load(Ordering::Relaxed) != UNKNOWN {
							continue;
						}

						let near = (0..space.num_turns()).any(|i| {
							let (c, y) = space.neighbour(class, coord, i);
							data[c * width + y].load(Ordering::Relaxed) == depth
						});
						if near && try_set(cell, depth + 1) {
							added += 1;
						}
					} else {
						if cell.load(Ordering::Relaxed) != depth {
							continue;
						}

						for i in 0..space.num_turns() {
							let (c, y) = space.neighbour(class, coord, i);
							if !try_set(&data[c * width + y], depth + 1) {
								continue;
							}
							added += 1;

							let mask = space.stabilizer(c);
							for sym in 1..NUM_SYMMETRIES_D4H {
								if mask & (1 << sym) == 0 {
									continue;
								}
								let y = space.conjugate(y, sym);
								if try_set(&data[c * width + y], depth + 1) {
									added += 1;
								}
							}
						}
					}
				}

				added
			})
			.sum();

		if added == 0 {
			break;
		}

		filled += added;
		depth += 1;
		info!(
			"{}: depth {} {} {} cells ({}/{})",
			S::NAME,
			depth,
			if backward { "backward" } else { "forward" },
			added,
			filled,
			total
		);
	}

	if filled < total {
		return Err(TableError::Unreached { table: S::NAME, cells: total - filled });
	}

	let data: Vec<u8> = data.into_iter().map(AtomicU8::into_inner).collect();
	let table = PruningTable { classes, width, data };
	info!("{} depth distribution: {:?}", S::NAME, table.distribution());

	Ok(table)
}

impl PruningTable {
	/// Distances to the phase 1 goal, indexed by flip-udslice class and corner orientation
	pub fn phase1(tables: &MoveTables, classes: &SymClassTable) -> Result<Self, TableError> {
		fill(&Phase1Space { tables, classes })
	}

	/// Distances to the phase 2 goal, indexed by corner permutation class and U/D edge permutation
	pub fn phase2(tables: &MoveTables, classes: &SymClassTable) -> Result<Self, TableError> {
		fill(&Phase2Space { tables, classes })
	}

	pub fn get(&self, class: usize, coord: usize) -> u8 {
		self.data[class * self.width + coord]
	}

	pub fn classes(&self) -> usize {
		self.classes
	}

	pub fn width(&self) -> usize {
		self.width
	}

	/// v[d] is the number of cells at distance d
	pub fn distribution(&self) -> Vec<usize> {
		let mut out = vec![];
		for d in self.data.iter().map(|d| *d as usize) {
			if d >= out.len() {
				out.resize(d + 1, 0);
			}
			out[d] += 1;
		}
		out
	}
}

impl TableFile for PruningTable {
	const NAME: &'static str = "pruning table";

	fn is_well_formed(&self) -> bool {
		self.data.len() == self.classes * self.width
			&& !self.data.is_empty()
			&& self.data[0] == 0
			&& self.data.iter().all(|d| *d < UNKNOWN)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	/// A ring of 5 cells in one class, turns step one cell in either direction.
	/// The symmetry 1 mirrors the ring.
	struct Ring;

	impl Space for Ring {
		const NAME: &'static str = "ring";

		fn classes(&self) -> usize {
			1
		}

		fn width(&self) -> usize {
			5
		}

		fn num_turns(&self) -> usize {
			2
		}

		fn neighbour(&self, _: usize, coord: usize, i: usize) -> (usize, usize) {
			(0, if i == 0 { (coord + 1) % 5 } else { (coord + 4) % 5 })
		}

		fn stabilizer(&self, _: usize) -> u16 {
			0b11
		}

		fn conjugate(&self, coord: usize, sym: usize) -> usize {
			if sym == 1 { (5 - coord) % 5 } else { coord }
		}
	}

	/// Cells 0, 1 and 2 form a cycle, cells 3 and 4 only lead to themselves
	struct Dead;

	impl Space for Dead {
		const NAME: &'static str = "dead end";

		fn classes(&self) -> usize {
			1
		}

		fn width(&self) -> usize {
			5
		}

		fn num_turns(&self) -> usize {
			1
		}

		fn neighbour(&self, _: usize, coord: usize, _: usize) -> (usize, usize) {
			(0, if coord < 3 { (coord + 1) % 3 } else { coord })
		}

		fn stabilizer(&self, _: usize) -> u16 {
			1
		}

		fn conjugate(&self, coord: usize, _: usize) -> usize {
			coord
		}
	}

	#[test]
	/// Check the breadth-first fill on small graphs
	fn fill_small_spaces() {
		let table = fill(&Ring).unwrap();
		assert_eq!(table.data, vec![0, 1, 2, 2, 1]);
		assert_eq!(table.distribution(), vec![1, 2, 2]);
		assert!(table.is_well_formed());

		match fill(&Dead) {
			Err(TableError::Unreached { table, cells }) => {
				assert_eq!(table, "dead end");
				assert_eq!(cells, 2);
			}
			other => panic!("expected unreached cells, got {:?}", other.map(|t| t.data)),
		}
	}

	#[test]
	fn corrupt_tables_are_rejected() {
		let table = PruningTable { classes: 1, width: 3, data: vec![0, 1, UNKNOWN] };
		assert!(!table.is_well_formed());

		let table = PruningTable { classes: 2, width: 3, data: vec![0, 1, 2] };
		assert!(!table.is_well_formed());
	}
}
