use const_for::const_for;
use rand::Rng;

use crate::{
	cube::{coord::*, turn::*, *},
	math::permutation_parity,
};

/// Orientation of a single cubie.
/// Corners use 0..3, mirrored corners (only produced by symmetries) 3..6.
pub type Ori = u8;

pub type CornerList = [(Corner, Ori); NUM_CORNERS];
pub type EdgeList = [(Edge, Ori); NUM_EDGES];

/// The cube specification as Kociemba published in
/// https://kociemba.org/math/cubielevel.htm
///
/// `corners[i]` is the corner sitting at position i together with its
/// orientation, the same goes for `edges`.
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub struct CubieCube {
	pub corners: CornerList,
	pub edges: EdgeList,
}

// ===== Tranformation-Corners =====
#[rustfmt::skip]
pub(crate) const TC_BASE: CornerList = [
	(Corner::URF, 0), (Corner::UFL, 0), (Corner::ULB, 0), (Corner::UBR, 0),
	(Corner::DFR, 0), (Corner::DLF, 0), (Corner::DBL, 0), (Corner::DRB, 0),
];
#[rustfmt::skip]
const TC_UP: CornerList = [
	(Corner::UBR, 0), (Corner::URF, 0), (Corner::UFL, 0), (Corner::ULB, 0),
	(Corner::DFR, 0), (Corner::DLF, 0), (Corner::DBL, 0), (Corner::DRB, 0),
];
#[rustfmt::skip]
const TC_RIGHT: CornerList = [
	(Corner::DFR, 2), (Corner::UFL, 0), (Corner::ULB, 0), (Corner::URF, 1),
	(Corner::DRB, 1), (Corner::DLF, 0), (Corner::DBL, 0), (Corner::UBR, 2),
];
#[rustfmt::skip]
const TC_FRONT: CornerList = [
	(Corner::UFL, 1), (Corner::DLF, 2), (Corner::ULB, 0), (Corner::UBR, 0),
	(Corner::URF, 2), (Corner::DFR, 1), (Corner::DBL, 0), (Corner::DRB, 0),
];
#[rustfmt::skip]
const TC_DOWN: CornerList = [
	(Corner::URF, 0), (Corner::UFL, 0), (Corner::ULB, 0), (Corner::UBR, 0),
	(Corner::DLF, 0), (Corner::DBL, 0), (Corner::DRB, 0), (Corner::DFR, 0),
];
#[rustfmt::skip]
const TC_LEFT: CornerList = [
	(Corner::URF, 0), (Corner::ULB, 1), (Corner::DBL, 2), (Corner::UBR, 0),
	(Corner::DFR, 0), (Corner::UFL, 2), (Corner::DLF, 1), (Corner::DRB, 0),
];
#[rustfmt::skip]
const TC_BACK: CornerList = [
	(Corner::URF, 0), (Corner::UFL, 0), (Corner::UBR, 1), (Corner::DRB, 2),
	(Corner::DFR, 0), (Corner::DLF, 0), (Corner::ULB, 2), (Corner::DBL, 1),
];

/// Combine two corner orientations.
/// If one of them is mirrored, the other one is counted backwards.
const fn twist_orientations(o1: Ori, o2: Ori) -> Ori {
	if o1 < 3 && o2 < 3 {
		(o1 + o2) % 3
	} else if o1 < 3 {
		let ori = o1 + o2;
		if ori >= 6 { ori - 3 } else { ori }
	} else if o2 < 3 {
		let ori = o1 - o2;
		if ori < 3 { ori + 3 } else { ori }
	} else if o1 < o2 {
		o1 + 3 - o2
	} else {
		o1 - o2
	}
}

/// t1 * t2, meaning t2 is applied after t1
pub(crate) const fn chain_corners(t1: &CornerList, t2: &CornerList) -> CornerList {
	let mut out = TC_BASE;

	const_for!(i in 0..NUM_CORNERS => {
		let (c2, o2) = t2[i];
		let (c1, o1) = t1[c2 as usize];
		out[i] = (c1, twist_orientations(o1, o2));
	});

	out
}

// ===== Edge Transformations =====
#[rustfmt::skip]
pub(crate) const TE_BASE: EdgeList = [
	(Edge::UR, 0), (Edge::UF, 0), (Edge::UL, 0), (Edge::UB, 0),
	(Edge::DR, 0), (Edge::DF, 0), (Edge::DL, 0), (Edge::DB, 0),
	(Edge::FR, 0), (Edge::FL, 0), (Edge::BL, 0), (Edge::BR, 0),
];
#[rustfmt::skip]
const TE_UP: EdgeList = [
	(Edge::UB, 0), (Edge::UR, 0), (Edge::UF, 0), (Edge::UL, 0),
	(Edge::DR, 0), (Edge::DF, 0), (Edge::DL, 0), (Edge::DB, 0),
	(Edge::FR, 0), (Edge::FL, 0), (Edge::BL, 0), (Edge::BR, 0),
];
#[rustfmt::skip]
const TE_RIGHT: EdgeList = [
	(Edge::FR, 0), (Edge::UF, 0), (Edge::UL, 0), (Edge::UB, 0),
	(Edge::BR, 0), (Edge::DF, 0), (Edge::DL, 0), (Edge::DB, 0),
	(Edge::DR, 0), (Edge::FL, 0), (Edge::BL, 0), (Edge::UR, 0),
];
#[rustfmt::skip]
const TE_FRONT: EdgeList = [
	(Edge::UR, 0), (Edge::FL, 1), (Edge::UL, 0), (Edge::UB, 0),
	(Edge::DR, 0), (Edge::FR, 1), (Edge::DL, 0), (Edge::DB, 0),
	(Edge::UF, 1), (Edge::DF, 1), (Edge::BL, 0), (Edge::BR, 0),
];
#[rustfmt::skip]
const TE_DOWN: EdgeList = [
	(Edge::UR, 0), (Edge::UF, 0), (Edge::UL, 0), (Edge::UB, 0),
	(Edge::DF, 0), (Edge::DL, 0), (Edge::DB, 0), (Edge::DR, 0),
	(Edge::FR, 0), (Edge::FL, 0), (Edge::BL, 0), (Edge::BR, 0),
];
#[rustfmt::skip]
const TE_LEFT: EdgeList = [
	(Edge::UR, 0), (Edge::UF, 0), (Edge::BL, 0), (Edge::UB, 0),
	(Edge::DR, 0), (Edge::DF, 0), (Edge::FL, 0), (Edge::DB, 0),
	(Edge::FR, 0), (Edge::UL, 0), (Edge::DL, 0), (Edge::BR, 0),
];
#[rustfmt::skip]
const TE_BACK: EdgeList = [
	(Edge::UR, 0), (Edge::UF, 0), (Edge::UL, 0), (Edge::BR, 1),
	(Edge::DR, 0), (Edge::DF, 0), (Edge::DL, 0), (Edge::BL, 1),
	(Edge::FR, 0), (Edge::FL, 0), (Edge::UB, 1), (Edge::DB, 1),
];

/// t1 * t2, meaning t2 is applied after t1
pub(crate) const fn chain_edges(t1: &EdgeList, t2: &EdgeList) -> EdgeList {
	let mut out = TE_BASE;

	const_for!(i in 0..NUM_EDGES => {
		let (e2, o2) = t2[i];
		let (e1, o1) = t1[e2 as usize];
		out[i] = (e1, (o1 + o2) & 1);
	});

	out
}

/// TURN_CUBES[turn.index()] is the cube after applying `turn` to a solved cube
const fn generate_turn_table() -> [CubieCube; NUM_TURNS] {
	const BASE: [CubieCube; NUM_TURNSIDES] = [
		CubieCube::from_lists(TC_UP, TE_UP),
		CubieCube::from_lists(TC_RIGHT, TE_RIGHT),
		CubieCube::from_lists(TC_FRONT, TE_FRONT),
		CubieCube::from_lists(TC_DOWN, TE_DOWN),
		CubieCube::from_lists(TC_LEFT, TE_LEFT),
		CubieCube::from_lists(TC_BACK, TE_BACK),
	];

	let mut out = [CubieCube::new(); NUM_TURNS];

	const_for!(i in 0..NUM_TURNSIDES => {
		let base = BASE[i];
		out[3*i] = base;
		out[3*i + 1] = base.multiply(&base);
		out[3*i + 2] = out[3*i + 1].multiply(&base);
	});

	out
}

pub const TURN_CUBES: [CubieCube; NUM_TURNS] = generate_turn_table();

impl Default for CubieCube {
	fn default() -> Self {
		Self::new()
	}
}

impl CubieCube {
	pub const fn new() -> Self {
		Self::from_lists(TC_BASE, TE_BASE)
	}

	pub const fn from_lists(corners: CornerList, edges: EdgeList) -> Self {
		CubieCube { corners, edges }
	}

	/// The cube you get by applying `turns` to a solved cube
	pub fn from_turns(turns: &[Turn]) -> Self {
		let mut out = Self::new();
		out.apply_turns(turns.iter().copied());
		out
	}

	/// Get the corner and orientation at position 'c'
	pub const fn corner(&self, c: Corner) -> (Corner, Ori) {
		self.corners[c as usize]
	}

	/// Get the edge and orientation at position 'e'
	pub const fn edge(&self, e: Edge) -> (Edge, Ori) {
		self.edges[e as usize]
	}

	/// The composition self * rhs: first self, then rhs
	pub const fn multiply(&self, rhs: &CubieCube) -> CubieCube {
		CubieCube {
			corners: chain_corners(&self.corners, &rhs.corners),
			edges: chain_edges(&self.edges, &rhs.edges),
		}
	}

	/// The cube c with self * c == c * self == solved
	pub fn inverse(&self) -> CubieCube {
		let mut out = CubieCube::new();

		for (pos, (c, _)) in self.corners.iter().enumerate() {
			out.corners[*c as usize].0 = CORNERS[pos];
		}
		for i in 0..NUM_CORNERS {
			let (c, _) = out.corners[i];
			let ori = self.corners[c as usize].1;
			out.corners[i].1 = if ori >= 3 { ori } else { (3 - ori) % 3 };
		}

		for (pos, (e, _)) in self.edges.iter().enumerate() {
			out.edges[*e as usize].0 = EDGES[pos];
		}
		for i in 0..NUM_EDGES {
			let (e, _) = out.edges[i];
			out.edges[i].1 = self.edges[e as usize].1;
		}

		out
	}

	pub fn is_solved(&self) -> bool {
		self.edges == TE_BASE && self.corners == TC_BASE
	}

	/// Whether the cube can be solved with `Turn::PHASE2` alone
	pub fn in_phase2_subgroup(&self) -> bool {
		self.corner_orientation_coord() == 0
			&& self.edge_orientation_coord() == 0
			&& self.udslice_coord() == 0
	}

	/// 0 for an even corner permutation, 1 otherwise
	pub fn corner_parity(&self) -> usize {
		permutation_parity(&self.corners.map(|(c, _)| c as usize))
	}

	/// 0 for an even edge permutation, 1 otherwise
	pub fn edge_parity(&self) -> usize {
		permutation_parity(&self.edges.map(|(e, _)| e as usize))
	}

	/// Check that the cube could be reached by turning a solved cube.
	pub fn verify(&self) -> Result<(), CubeError> {
		// Check that all corners are there once
		let mut contains = [false; NUM_CORNERS];
		for (c, o) in self.corners {
			if o >= 3 {
				return Err(CubeError::Orientation);
			}
			contains[c as usize] = true;
		}
		if contains.contains(&false) {
			return Err(CubeError::Cubies);
		}

		// Check that all edges are there once
		let mut contains = [false; NUM_EDGES];
		for (e, o) in self.edges {
			if o >= 2 {
				return Err(CubeError::Orientation);
			}
			contains[e as usize] = true;
		}
		if contains.contains(&false) {
			return Err(CubeError::Cubies);
		}

		// The sum of the corner orientations have to be divisible by 3
		let twist = self.corners.iter().map(|(_, o)| *o as usize).sum::<usize>() % 3;
		if twist != 0 {
			return Err(CubeError::CornerOrientation(twist));
		}

		// The sum of the edge orientations have to be divisible by 2
		let flip = self.edges.iter().map(|(_, o)| *o as usize).sum::<usize>() % 2;
		if flip != 0 {
			return Err(CubeError::EdgeOrientation);
		}

		// There must be an even number of swap throughout the permutations
		if self.corner_parity() != self.edge_parity() {
			return Err(CubeError::Permutation);
		}

		Ok(())
	}

	pub fn is_solvable(&self) -> bool {
		self.verify().is_ok()
	}

	/// A uniformly distributed solvable cube
	pub fn random_with<R: Rng + ?Sized>(rng: &mut R) -> Self {
		let mut cube = CubieCube::new();

		cube.set_corner_permutation(rng.gen_range(0..N_CORNER_PERM));
		cube.set_edge_permutation(rng.gen_range(0..N_EDGE_PERM));
		if cube.corner_parity() != cube.edge_parity() {
			cube.edges.swap(0, 1);
		}

		cube.set_corner_orientation(rng.gen_range(0..N_TWIST));
		cube.set_edge_orientation(rng.gen_range(0..N_FLIP));

		cube
	}

	pub fn random() -> Self {
		Self::random_with(&mut rand::thread_rng())
	}
}

impl std::ops::Mul for CubieCube {
	type Output = CubieCube;

	fn mul(self, rhs: CubieCube) -> CubieCube {
		self.multiply(&rhs)
	}
}

impl RubiksCube for CubieCube {
	fn apply_turn(&mut self, turn: Turn) {
		*self = self.multiply(&TURN_CUBES[turn.index()]);
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rand::{rngs::StdRng, SeedableRng};

	#[test]
	/// Check that all basic turnings result to neutral after 4 turns
	fn cubiecube_turns1() {
		for side in TurnSide::ALL {
			let mut cube = CubieCube::new();
			let turn = Turn::new(side, TurnWise::Clockwise);

			for _ in 0..4 {
				cube.apply_turn(turn);
			}

			if !cube.is_solved() {
				panic!("Turn {} doesn't result to neutral element after 4 turns.", turn);
			}
		}
	}

	#[test]
	/// Check that double and counter clockwise turns are repeated quarter turns
	fn cubiecube_turn_powers() {
		for side in TurnSide::ALL {
			let quarter = TURN_CUBES[Turn::new(side, TurnWise::Clockwise).index()];
			let double = TURN_CUBES[Turn::new(side, TurnWise::Double).index()];
			let counter = TURN_CUBES[Turn::new(side, TurnWise::CounterClockwise).index()];

			assert_eq!(quarter * quarter, double);
			assert_eq!(quarter * counter, CubieCube::new());
			assert_eq!(counter, quarter.inverse());
		}
	}

	#[test]
	/// Check that every turn is undone by its inverse and keeps the cube solvable
	fn turn_inverse_and_invariants() {
		let mut rng = StdRng::seed_from_u64(3);

		for _ in 0..50 {
			let cube = CubieCube::random_with(&mut rng);
			assert_eq!(cube.verify(), Ok(()));

			for turn in Turn::ALL {
				let mut c = cube;
				c.apply_turn(turn);
				assert_eq!(c.verify(), Ok(()), "{turn} broke the cube");

				c.apply_turn(turn.inverse());
				assert_eq!(c, cube);
			}
		}
	}

	#[test]
	/// Check the group laws on random cubes
	fn group_laws() {
		let mut rng = StdRng::seed_from_u64(11);
		let solved = CubieCube::new();

		for _ in 0..100 {
			let a = CubieCube::random_with(&mut rng);
			let b = CubieCube::random_with(&mut rng);
			let c = CubieCube::random_with(&mut rng);

			assert_eq!(a * a.inverse(), solved);
			assert_eq!(a.inverse() * a, solved);
			assert_eq!((a * b) * c, a * (b * c));
			assert_eq!((a * b).inverse(), b.inverse() * a.inverse());
		}
	}

	#[test]
	/// Applying turns to a cube is the same as multiplying with the turned cube
	fn turns_are_products() -> Result<(), ParseTurnError> {
		let turns = parse_turns("L B R2 U D' R D2 L U' R' B2")?;
		let mut cube = CubieCube::new();
		cube.apply_turns(turns.iter().copied());

		let product = turns
			.iter()
			.fold(CubieCube::new(), |acc, t| acc * TURN_CUBES[t.index()]);
		assert_eq!(cube, product);
		assert_eq!(cube, CubieCube::from_turns(&turns));
		Ok(())
	}

	#[test]
	/// Check that each broken invariant is reported
	fn verify_rejects() {
		let mut cube = CubieCube::new();
		cube.corners[0].1 = 1;
		assert_eq!(cube.verify(), Err(CubeError::CornerOrientation(1)));

		let mut cube = CubieCube::new();
		cube.edges[5].1 = 1;
		assert_eq!(cube.verify(), Err(CubeError::EdgeOrientation));

		let mut cube = CubieCube::new();
		cube.edges.swap(2, 7);
		assert_eq!(cube.verify(), Err(CubeError::Permutation));

		let mut cube = CubieCube::new();
		cube.corners[1].0 = Corner::URF;
		assert_eq!(cube.verify(), Err(CubeError::Cubies));

		let mut cube = CubieCube::new();
		cube.corners[1].1 = 3;
		assert_eq!(cube.verify(), Err(CubeError::Orientation));

		let mut cube = CubieCube::new();
		cube.edges.swap(2, 7);
		cube.corners.swap(0, 1);
		assert_eq!(cube.verify(), Ok(()));
	}
}
