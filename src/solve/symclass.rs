//! Equivalence classes of a raw coordinate under the 16 symmetries of D4h.

use log::info;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::storage::TableFile;
use crate::cube::{coord::Coord, cubiecube::CubieCube, symmetry::*};

/// A symmetry reduced coordinate, stored as class * 16 + symmetry.
///
/// It stands for the raw coordinate of S^-1 * R * S, where R is the
/// representative of the class and S the symmetry.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct SymCoord(pub u32);

impl SymCoord {
	pub const fn new(class: usize, sym: usize) -> Self {
		Self((class * NUM_SYMMETRIES_D4H + sym) as u32)
	}

	pub const fn class(self) -> usize {
		self.0 as usize / NUM_SYMMETRIES_D4H
	}

	pub const fn sym(self) -> usize {
		self.0 as usize % NUM_SYMMETRIES_D4H
	}
}

/// Maps every raw coordinate to its class and the symmetry leading there.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymClassTable {
	coord: Coord,
	/// v[raw] is the SymCoord of raw
	raw_to_sym: Vec<u32>,
	/// v[class] is the raw coordinate of the class representative
	class_to_raw: Vec<u32>,
	/// Bit s of v[class] is set if the symmetry s leaves the representative unchanged
	stabilizers: Vec<u16>,
}

impl SymClassTable {
	/// Reduce every raw value of `coord` to the smallest value reachable by
	/// conjugation. Each new smallest value becomes the next class.
	pub fn generate(coord: Coord) -> Self {
		let size = coord.size();

		let reduced: Vec<(u32, u8)> = (0..size)
			.into_par_iter()
			.map(|raw| {
				let cube = coord.decode(raw);
				let (min, sym) = reduce_to_minimum(&cube, |c| coord.encode(c));
				(min as u32, sym as u8)
			})
			.collect();

		let mut raw_to_sym = vec![0u32; size];
		let mut class_to_raw = vec![];

		for (raw, (min, sym)) in reduced.into_iter().enumerate() {
			// Raw values are visited in ascending order, so the minimum of
			// an orbit is always its first member.
			let class = if min as usize == raw {
				class_to_raw.push(min);
				class_to_raw.len() - 1
			} else {
				SymCoord(raw_to_sym[min as usize]).class()
			};
			raw_to_sym[raw] = SymCoord::new(class, sym as usize).0;
		}

		let stabilizers = class_to_raw
			.par_iter()
			.map(|rep| {
				let cube = coord.decode(*rep as usize);
				(0..NUM_SYMMETRIES_D4H)
					.filter(|s| coord.encode(&conjugate(&cube, *s, false)) == *rep as usize)
					.fold(0u16, |mask, s| mask | (1 << s))
			})
			.collect();

		info!("{} has {} symmetry classes", coord, class_to_raw.len());

		Self {
			coord,
			raw_to_sym,
			class_to_raw,
			stabilizers,
		}
	}

	/// The classes of the ud-slice position combined with the edge orientation
	pub fn flip_udslice() -> Self {
		Self::generate(Coord::FlipUDSlice)
	}

	/// The classes of the corner permutation
	pub fn corner_permutation() -> Self {
		Self::generate(Coord::CornerPermutation)
	}

	pub fn coord(&self) -> Coord {
		self.coord
	}

	pub fn num_classes(&self) -> usize {
		self.class_to_raw.len()
	}

	pub fn sym_coord(&self, raw: usize) -> SymCoord {
		SymCoord(self.raw_to_sym[raw])
	}

	/// The SymCoord of the cube's coordinate
	pub fn classify(&self, cube: &CubieCube) -> SymCoord {
		self.sym_coord(self.coord.encode(cube))
	}

	/// The raw coordinate of the class representative
	pub fn representative(&self, class: usize) -> usize {
		self.class_to_raw[class] as usize
	}

	pub fn stabilizer(&self, class: usize) -> u16 {
		self.stabilizers[class]
	}

	pub fn stabilizers(&self) -> &[u16] {
		&self.stabilizers
	}
}

impl TableFile for SymClassTable {
	const NAME: &'static str = "symmetry class table";

	fn is_well_formed(&self) -> bool {
		let classes = self.class_to_raw.len();

		self.raw_to_sym.len() == self.coord.size()
			&& self.stabilizers.len() == classes
			&& self.class_to_raw.iter().all(|r| (*r as usize) < self.coord.size())
			&& self.raw_to_sym.iter().all(|s| SymCoord(*s).class() < classes)
	}
}
