//! Coordinates: small integers describing parts of a cube.
//!
//! Every coordinate maps the solved cube to 0. The `set_*` functions only
//! touch the part of the cube their coordinate describes, so applying one
//! to a solved cube gives a representative with everything else solved.

use const_for::const_for;
use serde::{Deserialize, Serialize};

use crate::{
	cube::{cubiecube::*, *},
	math::*,
};

/// Corner orientations, 3^7
pub const N_TWIST: usize = 2187;
/// Edge orientations, 2^11
pub const N_FLIP: usize = 2048;
/// Positions of the 4 ud-slice edges, 12 choose 4
pub const N_UDSLICE: usize = 495;
/// Ordered positions of the 4 ud-slice edges
pub const N_UDSLICE_SORTED: usize = N_UDSLICE * 24;
/// Combined ud-slice position and edge orientation
pub const N_FLIP_UDSLICE: usize = N_UDSLICE * N_FLIP;
pub const N_CORNER_PERM: usize = 40320;
pub const N_EDGE_PERM: usize = 479001600;
/// Permutation of the 8 edges of the U and D layer
pub const N_EDGE8_PERM: usize = 40320;

/// Generate a power list where v[i] = base^i from 0..N (exclusive)
const fn pow_list<const N: usize>(base: usize) -> [usize; N] {
	let mut out = [1; N];
	const_for!(i in 1..N => { out[i] = out[i-1] * base; });
	out
}

/// The different coordinates a cube can be reduced to.
#[derive(
	Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize, strum::EnumIter,
	strum::Display,
)]
pub enum Coord {
	CornerOrientation,
	EdgeOrientation,
	UDSlice,
	UDSliceSorted,
	FlipUDSlice,
	CornerPermutation,
	EdgePermutation,
	Phase2EdgePermutation,
}

impl Coord {
	/// The number of values the coordinate can take
	pub const fn size(self) -> usize {
		match self {
			Coord::CornerOrientation => N_TWIST,
			Coord::EdgeOrientation => N_FLIP,
			Coord::UDSlice => N_UDSLICE,
			Coord::UDSliceSorted => N_UDSLICE_SORTED,
			Coord::FlipUDSlice => N_FLIP_UDSLICE,
			Coord::CornerPermutation => N_CORNER_PERM,
			Coord::EdgePermutation => N_EDGE_PERM,
			Coord::Phase2EdgePermutation => N_EDGE8_PERM,
		}
	}

	pub fn encode(self, cube: &CubieCube) -> usize {
		match self {
			Coord::CornerOrientation => cube.corner_orientation_coord(),
			Coord::EdgeOrientation => cube.edge_orientation_coord(),
			Coord::UDSlice => cube.udslice_coord(),
			Coord::UDSliceSorted => cube.udslice_sorted_coord(),
			Coord::FlipUDSlice => cube.flip_udslice_coord(),
			Coord::CornerPermutation => cube.corner_permutation_coord(),
			Coord::EdgePermutation => cube.edge_permutation_coord(),
			Coord::Phase2EdgePermutation => cube.phase2_edge_permutation_coord(),
		}
	}

	/// A cube with the given coordinate, all other pieces are solved
	pub fn decode(self, coord: usize) -> CubieCube {
		let mut cube = CubieCube::new();
		match self {
			Coord::CornerOrientation => cube.set_corner_orientation(coord),
			Coord::EdgeOrientation => cube.set_edge_orientation(coord),
			Coord::UDSlice => cube.set_udslice(coord),
			Coord::UDSliceSorted => cube.set_udslice_sorted(coord),
			Coord::FlipUDSlice => cube.set_flip_udslice(coord),
			Coord::CornerPermutation => cube.set_corner_permutation(coord),
			Coord::EdgePermutation => cube.set_edge_permutation(coord),
			Coord::Phase2EdgePermutation => cube.set_phase2_edge_permutation(coord),
		}
		cube
	}
}

impl CubieCube {
	// ===== Coordinate set functions =====

	/// Set the corner orientation according to the given coordinate
	pub fn set_corner_orientation(&mut self, coord: usize) {
		debug_assert!(coord < N_TWIST);

		let mut x = coord;
		let mut parity = 0;

		for i in 0..NUM_CORNERS - 1 {
			self.corners[i].1 = (x % 3) as Ori;
			parity += x % 3;
			x /= 3;
		}
		self.corners[NUM_CORNERS - 1].1 = ((3 - parity % 3) % 3) as Ori;
	}

	/// Set the edge orientation according to the given coordinate
	pub fn set_edge_orientation(&mut self, coord: usize) {
		debug_assert!(coord < N_FLIP);

		for i in 0..NUM_EDGES - 1 {
			self.edges[i].1 = ((coord >> i) & 1) as Ori;
		}
		self.edges[NUM_EDGES - 1].1 = (coord.count_ones() & 1) as Ori;
	}

	/// Place the ud-slice edges in the given order on the chosen positions,
	/// the remaining edges keep their solved order.
	fn place_edges(&mut self, chosen: &[bool], slice: &[Edge]) {
		let mut slice = slice.iter();
		let mut others = EDGES.iter().filter(|e| !e.is_udslice());

		for (pos, is_slice) in chosen.iter().enumerate() {
			let next = if *is_slice { slice.next() } else { others.next() };
			if let Some(e) = next {
				self.edges[pos].0 = *e;
			}
		}
	}

	/// Set the position of the ud-slice edges according to the coordinate
	pub fn set_udslice(&mut self, coord: usize) {
		debug_assert!(coord < N_UDSLICE);

		let chosen = get_nck(NUM_EDGES, UDSLICE_EDGES.len(), coord);
		self.place_edges(&chosen, &UDSLICE_EDGES);
	}

	/// Set the position and order of the ud-slice edges
	pub fn set_udslice_sorted(&mut self, coord: usize) {
		debug_assert!(coord < N_UDSLICE_SORTED);

		let chosen = get_nck(NUM_EDGES, UDSLICE_EDGES.len(), coord / 24);
		let slice = permute_vec(&UDSLICE_EDGES, coord % 24);
		self.place_edges(&chosen, &slice);
	}

	/// Set the ud-slice position (coord / 2048) and the edge orientation (coord % 2048)
	pub fn set_flip_udslice(&mut self, coord: usize) {
		debug_assert!(coord < N_FLIP_UDSLICE);

		self.set_udslice(coord / N_FLIP);
		self.set_edge_orientation(coord % N_FLIP);
	}

	/// Set the corner permutation according to the given coordinate
	pub fn set_corner_permutation(&mut self, coord: usize) {
		debug_assert!(coord < N_CORNER_PERM);

		let cs = permute_vec(&CORNERS, coord);
		for (i, corner) in cs.into_iter().enumerate() {
			self.corners[i].0 = corner;
		}
	}

	/// Set the edge permutation according to the given coordinate
	pub fn set_edge_permutation(&mut self, coord: usize) {
		debug_assert!(coord < N_EDGE_PERM);

		let es = permute_vec(&EDGES, coord);
		for (i, edge) in es.into_iter().enumerate() {
			self.edges[i].0 = edge;
		}
	}

	/// Permute the edges of the U and D layer, the ud-slice stays solved
	pub fn set_phase2_edge_permutation(&mut self, coord: usize) {
		debug_assert!(coord < N_EDGE8_PERM);

		let es = permute_vec(&EDGES[..8], coord);
		for (i, edge) in es.into_iter().enumerate() {
			self.edges[i].0 = edge;
		}
		for i in 8..NUM_EDGES {
			self.edges[i].0 = EDGES[i];
		}
	}

	// ===== Coordinate get functions =====

	/// Return the cube's corner orientation coordinate
	pub fn corner_orientation_coord(&self) -> usize {
		const POW: [usize; NUM_CORNERS] = pow_list::<NUM_CORNERS>(3);

		self.corners
			.iter()
			.take(NUM_CORNERS - 1)
			.zip(POW)
			.map(|((_, o), p)| *o as usize * p)
			.sum()
	}

	/// Return the cube's edges orientation coordinate
	pub fn edge_orientation_coord(&self) -> usize {
		self.edges
			.iter()
			.take(NUM_EDGES - 1)
			.enumerate()
			.map(|(i, (_, o))| (*o as usize) << i)
			.sum()
	}

	/// Which positions hold a ud-slice edge
	fn udslice_positions(&self) -> [bool; NUM_EDGES] {
		self.edges.map(|(e, _)| e.is_udslice())
	}

	/// Return the cube's udslice position coordinate
	/// That's the coordinate which tells us the position of the UD-Slice (FR, FL, BL, BR)
	pub fn udslice_coord(&self) -> usize {
		// https://kociemba.org/math/UDSliceCoord.htm
		map_nck(&self.udslice_positions())
	}

	/// The udslice coordinate times 24 plus the order of the ud-slice edges
	pub fn udslice_sorted_coord(&self) -> usize {
		let order: Vec<_> = self
			.edges
			.iter()
			.filter(|(e, _)| e.is_udslice())
			.map(|(e, _)| *e as usize - Edge::FR as usize)
			.collect();

		self.udslice_coord() * 24 + map_permutation(&order)
	}

	/// The udslice coordinate times 2048 plus the edge orientation coordinate
	pub fn flip_udslice_coord(&self) -> usize {
		self.udslice_coord() * N_FLIP + self.edge_orientation_coord()
	}

	/// Return the cube's corner permutation as a coordinate.
	pub fn corner_permutation_coord(&self) -> usize {
		map_permutation(&self.corners.map(|(c, _)| c as usize))
	}

	/// Return the cube's edge permutation as a coordinate
	pub fn edge_permutation_coord(&self) -> usize {
		map_permutation(&self.edges.map(|(e, _)| e as usize))
	}

	/// Return the cube's coordinate of the non-udslice edges permutation.
	/// Only meaningful if the U and D layer edges are within the U and D layer.
	pub fn phase2_edge_permutation_coord(&self) -> usize {
		let perm: Vec<_> = self.edges.iter().take(8).map(|(e, _)| *e as usize).collect();
		debug_assert!(perm.iter().all(|e| *e < 8));
		map_permutation(&perm)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rand::{rngs::StdRng, Rng, SeedableRng};
	use strum::IntoEnumIterator;

	#[test]
	/// Check that decoding and encoding a coordinate gives the same coordinate
	fn coordinate_roundtrip() {
		for coord in Coord::iter().filter(|c| *c != Coord::EdgePermutation) {
			for value in 0..coord.size() {
				let cube = coord.decode(value);
				assert_eq!(coord.encode(&cube), value, "{coord} of {value}");
			}
		}

		let mut rng = StdRng::seed_from_u64(5);
		for _ in 0..10000 {
			let value = rng.gen_range(0..N_EDGE_PERM);
			let cube = Coord::EdgePermutation.decode(value);
			assert_eq!(Coord::EdgePermutation.encode(&cube), value);
		}
	}

	#[test]
	/// The solved cube has all coordinates 0
	fn solved_is_zero() {
		let cube = CubieCube::new();
		for coord in Coord::iter() {
			assert_eq!(coord.encode(&cube), 0, "{coord}");
			assert_eq!(coord.decode(0), cube, "{coord}");
		}
	}

	#[test]
	/// Decoded cubes are valid where the coordinate allows it
	fn decoded_cubes_are_orientation_valid() {
		for value in 0..N_TWIST {
			let cube = Coord::CornerOrientation.decode(value);
			let sum: usize = cube.corners.iter().map(|(_, o)| *o as usize).sum();
			assert_eq!(sum % 3, 0);
		}
		for value in 0..N_FLIP {
			assert_eq!(Coord::EdgeOrientation.decode(value).verify(), Ok(()));
		}
	}

	#[test]
	/// Phase 2 turns never leave the subgroup
	fn phase2_turns_keep_subgroup() {
		let mut rng = StdRng::seed_from_u64(9);
		let mut cube = CubieCube::new();

		for _ in 0..200 {
			let turn = turn::Turn::PHASE2[rng.gen_range(0..turn::NUM_PHASE2_TURNS)];
			cube.apply_turn(turn);
			assert!(cube.in_phase2_subgroup());
			assert!(cube.phase2_edge_permutation_coord() < N_EDGE8_PERM);
			assert!(cube.udslice_sorted_coord() < 24);
		}

		cube.apply_turn(turn::Turn::new(turn::TurnSide::Front, turn::TurnWise::Clockwise));
		assert!(!cube.in_phase2_subgroup());
	}
}
