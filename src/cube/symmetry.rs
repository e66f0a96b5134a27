//! Whole-cube rotations and reflections.
//!
//! Symmetry number `16*a + 8*b + 2*c + d` is URF3^a * F2^b * U4^c * LR2^d.
//! The first 16 keep the U/D axis in place and are used to reduce the
//! coordinates of both phases, the 3-fold rotation around the URF-DBL
//! diagonal only matters for re-orienting a whole cube.

use const_for::const_for;

use crate::cube::{cubiecube::*, turn::*, *};

// ===== Symmetry Transformations =====

#[rustfmt::skip]
const TC_S_URF3: CornerList = [
	(Corner::URF, 1), (Corner::DFR, 2), (Corner::DLF, 1), (Corner::UFL, 2),
	(Corner::UBR, 2), (Corner::DRB, 1), (Corner::DBL, 2), (Corner::ULB, 1),
];
#[rustfmt::skip]
const TC_S_F2: CornerList = [
	(Corner::DLF, 0), (Corner::DFR, 0), (Corner::DRB, 0), (Corner::DBL, 0),
	(Corner::UFL, 0), (Corner::URF, 0), (Corner::UBR, 0), (Corner::ULB, 0),
];
#[rustfmt::skip]
const TC_S_U4: CornerList = [
	(Corner::UBR, 0), (Corner::URF, 0), (Corner::UFL, 0), (Corner::ULB, 0),
	(Corner::DRB, 0), (Corner::DFR, 0), (Corner::DLF, 0), (Corner::DBL, 0),
];
#[rustfmt::skip]
const TC_S_LR2: CornerList = [
	(Corner::UFL, 3), (Corner::URF, 3), (Corner::UBR, 3), (Corner::ULB, 3),
	(Corner::DLF, 3), (Corner::DFR, 3), (Corner::DRB, 3), (Corner::DBL, 3),
];

#[rustfmt::skip]
const TE_S_URF3: EdgeList = [
	(Edge::UF, 1), (Edge::FR, 0), (Edge::DF, 1), (Edge::FL, 0),
	(Edge::UB, 1), (Edge::BR, 0), (Edge::DB, 1), (Edge::BL, 0),
	(Edge::UR, 1), (Edge::DR, 1), (Edge::DL, 1), (Edge::UL, 1),
];
#[rustfmt::skip]
const TE_S_F2: EdgeList = [
	(Edge::DL, 0), (Edge::DF, 0), (Edge::DR, 0), (Edge::DB, 0),
	(Edge::UL, 0), (Edge::UF, 0), (Edge::UR, 0), (Edge::UB, 0),
	(Edge::FL, 0), (Edge::FR, 0), (Edge::BR, 0), (Edge::BL, 0),
];
#[rustfmt::skip]
const TE_S_U4: EdgeList = [
	(Edge::UB, 0), (Edge::UR, 0), (Edge::UF, 0), (Edge::UL, 0),
	(Edge::DB, 0), (Edge::DR, 0), (Edge::DF, 0), (Edge::DL, 0),
	(Edge::BR, 1), (Edge::FR, 1), (Edge::FL, 1), (Edge::BL, 1),
];
#[rustfmt::skip]
const TE_S_LR2: EdgeList = [
	(Edge::UL, 0), (Edge::UF, 0), (Edge::UR, 0), (Edge::UB, 0),
	(Edge::DL, 0), (Edge::DF, 0), (Edge::DR, 0), (Edge::DB, 0),
	(Edge::FL, 0), (Edge::FR, 0), (Edge::BR, 0), (Edge::BL, 0),
];

pub const NUM_SYMMETRIES: usize = 48;
/// The symmetries which keep the U/D axis (the group D4h)
pub const NUM_SYMMETRIES_D4H: usize = 16;

pub const fn generate_symmetries() -> [CubieCube; NUM_SYMMETRIES] {
	const URF3: CubieCube = CubieCube::from_lists(TC_S_URF3, TE_S_URF3);
	const F2: CubieCube = CubieCube::from_lists(TC_S_F2, TE_S_F2);
	const U4: CubieCube = CubieCube::from_lists(TC_S_U4, TE_S_U4);
	const LR2: CubieCube = CubieCube::from_lists(TC_S_LR2, TE_S_LR2);

	let mut out = [CubieCube::new(); NUM_SYMMETRIES];

	const_for!(x1 in 0..3 => {
		const_for!(x2 in 0..2 => {
			const_for!(x3 in 0..4 => {
				const_for!(x4 in 0..2 => {
					let mut cube = CubieCube::new();
					const_for!(_ in 0..x1 => { cube = cube.multiply(&URF3); });
					const_for!(_ in 0..x2 => { cube = cube.multiply(&F2); });
					const_for!(_ in 0..x3 => { cube = cube.multiply(&U4); });
					const_for!(_ in 0..x4 => { cube = cube.multiply(&LR2); });

					let idx = 16*x1 + 8*x2 + 2*x3 + x4;
					out[idx] = cube;
				});
			});
		});
	});

	out
}

pub const SYMMETRIES: [CubieCube; NUM_SYMMETRIES] = generate_symmetries();

const fn is_identity(cube: &CubieCube) -> bool {
	const_for!(i in 0..NUM_CORNERS => {
		let (c, o) = cube.corners[i];
		if c as usize != i || o != 0 { return false; }
	});
	const_for!(i in 0..NUM_EDGES => {
		let (e, o) = cube.edges[i];
		if e as usize != i || o != 0 { return false; }
	});
	true
}

pub const fn generate_symmetry_inverse_list() -> [usize; NUM_SYMMETRIES] {
	let mut out = [NUM_SYMMETRIES; NUM_SYMMETRIES];

	const_for!(i in 0..NUM_SYMMETRIES => {
		const_for!(j in 0..NUM_SYMMETRIES => {
			if is_identity(&SYMMETRIES[i].multiply(&SYMMETRIES[j])) {
				out[i] = j;
				break;
			}
		});
	});

	out
}

/// SYMMETRIES[i] * SYMMETRIES[SYMMETRY_INVERSE[i]] is the identity
pub const SYMMETRY_INVERSE: [usize; NUM_SYMMETRIES] = generate_symmetry_inverse_list();

/// S * cube * S^-1 for the symmetry S with number `sym`,
/// or S^-1 * cube * S if `invert` is set.
pub fn conjugate(cube: &CubieCube, sym: usize, invert: bool) -> CubieCube {
	let (s, s_inv) = if invert {
		(SYMMETRY_INVERSE[sym], sym)
	} else {
		(sym, SYMMETRY_INVERSE[sym])
	};

	SYMMETRIES[s].multiply(cube).multiply(&SYMMETRIES[s_inv])
}

/// Conjugate the cube with all symmetries of D4h and return the smallest
/// value of `measure` together with the first symmetry reaching it.
pub fn reduce_to_minimum<F>(cube: &CubieCube, measure: F) -> (usize, usize)
where
	F: Fn(&CubieCube) -> usize,
{
	let mut best = (usize::MAX, 0);
	for sym in 0..NUM_SYMMETRIES_D4H {
		let value = measure(&conjugate(cube, sym, false));
		if value < best.0 {
			best = (value, sym);
		}
	}
	best
}

/// All of the 48 symmetries which leave the cube unchanged
pub fn self_symmetries(cube: &CubieCube) -> Vec<usize> {
	(0..NUM_SYMMETRIES)
		.filter(|s| conjugate(cube, *s, false) == *cube)
		.collect()
}

/// Composition and conjugation tables of the symmetries.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SymmetryGroup {
	/// mult[a][b] is the number of SYMMETRIES[a] * SYMMETRIES[b]
	mult: [[u8; NUM_SYMMETRIES_D4H]; NUM_SYMMETRIES_D4H],
	/// conj_turn[s][t] is the index of the turn S * T * S^-1
	conj_turn: [[u8; NUM_TURNS]; NUM_SYMMETRIES],
}

impl Default for SymmetryGroup {
	fn default() -> Self {
		Self::new()
	}
}

impl SymmetryGroup {
	pub fn new() -> Self {
		let mut mult = [[0; NUM_SYMMETRIES_D4H]; NUM_SYMMETRIES_D4H];
		for (a, row) in mult.iter_mut().enumerate() {
			for (b, entry) in row.iter_mut().enumerate() {
				let product = SYMMETRIES[a].multiply(&SYMMETRIES[b]);
				let c = SYMMETRIES[..NUM_SYMMETRIES_D4H]
					.iter()
					.position(|s| *s == product)
					.expect("D4h is closed under composition");
				*entry = c as u8;
			}
		}

		let mut conj_turn = [[0; NUM_TURNS]; NUM_SYMMETRIES];
		for (s, row) in conj_turn.iter_mut().enumerate() {
			for (t, entry) in row.iter_mut().enumerate() {
				let cube = conjugate(&TURN_CUBES[t], s, false);
				let conj = TURN_CUBES
					.iter()
					.position(|c| *c == cube)
					.expect("symmetries map face turns onto face turns");
				*entry = conj as u8;
			}
		}

		Self { mult, conj_turn }
	}

	/// The number of S_a * S_b, both taken from D4h
	pub fn multiply(&self, a: usize, b: usize) -> usize {
		self.mult[a][b] as usize
	}

	pub fn inverse(&self, sym: usize) -> usize {
		SYMMETRY_INVERSE[sym]
	}

	/// The turn S * turn * S^-1
	pub fn conjugate_turn(&self, sym: usize, turn: Turn) -> Turn {
		Turn::ALL[self.conj_turn[sym][turn.index()] as usize]
	}

	/// The side a turn of `side` is moved to by S * turn * S^-1
	pub fn conjugate_side(&self, sym: usize, side: TurnSide) -> TurnSide {
		self.conjugate_turn(sym, Turn::new(side, TurnWise::Clockwise)).side
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rand::{rngs::StdRng, SeedableRng};

	#[test]
	/// Check that the generators have the expected order
	fn generator_orders() {
		let order = |sym: usize, n: usize| {
			let mut cube = CubieCube::new();
			for _ in 0..n {
				cube = cube * SYMMETRIES[sym];
			}
			cube.is_solved()
		};

		assert!(order(16, 3) && !order(16, 1));
		assert!(order(8, 2) && !order(8, 1));
		assert!(order(2, 4) && !order(2, 2));
		assert!(order(1, 2) && !order(1, 1));
	}

	#[test]
	/// Check that each symmetry has a distinct inverse
	fn symmetry_inverses() {
		let mut seen = [false; NUM_SYMMETRIES];
		for (s, inv) in SYMMETRY_INVERSE.iter().enumerate() {
			assert!(*inv < NUM_SYMMETRIES);
			assert!((SYMMETRIES[s] * SYMMETRIES[*inv]).is_solved());
			assert!(!seen[*inv]);
			seen[*inv] = true;
		}
		assert_eq!(SYMMETRY_INVERSE[0], 0);
	}

	#[test]
	/// Check the composition table against conjugating twice
	fn composition_table() {
		let group = SymmetryGroup::new();
		let mut rng = StdRng::seed_from_u64(1);
		let cube = CubieCube::random_with(&mut rng);

		for a in 0..NUM_SYMMETRIES_D4H {
			assert_eq!(group.multiply(a, group.inverse(a)), 0);

			for b in 0..NUM_SYMMETRIES_D4H {
				let ab = group.multiply(a, b);
				let twice = conjugate(&conjugate(&cube, b, false), a, false);
				assert_eq!(conjugate(&cube, ab, false), twice);

				for c in 0..NUM_SYMMETRIES_D4H {
					let left = group.multiply(group.multiply(a, b), c);
					let right = group.multiply(a, group.multiply(b, c));
					assert_eq!(left, right);
				}
			}
		}
	}

	#[test]
	/// Check the conjugated turns
	fn conjugated_turns() -> Result<(), ParseTurnError> {
		let group = SymmetryGroup::new();
		let turns = parse_turns("R L'")?;

		// The mirror swaps R and L and the turning direction
		assert_eq!(group.conjugate_turn(1, turns[0]), "L'".parse::<Turn>()?);
		assert_eq!(group.conjugate_turn(1, turns[1]), "R".parse::<Turn>()?);

		for sym in 0..NUM_SYMMETRIES_D4H {
			let up = group.conjugate_side(sym, TurnSide::Up);
			assert!(up == TurnSide::Up || up == TurnSide::Down);

			for turn in Turn::ALL {
				let conj = group.conjugate_turn(sym, turn);
				let cube = conjugate(&TURN_CUBES[turn.index()], sym, false);
				assert_eq!(cube, TURN_CUBES[conj.index()]);
				assert_eq!(conj.phase2_index().is_some(), turn.phase2_index().is_some());
			}
		}

		assert_ne!(group.conjugate_side(16, TurnSide::Up), TurnSide::Up);
		Ok(())
	}

	#[test]
	/// Check the symmetries of some special cubes
	fn cube_self_symmetries() -> Result<(), ParseTurnError> {
		assert_eq!(self_symmetries(&CubieCube::new()).len(), NUM_SYMMETRIES);

		let up = CubieCube::from_turns(&parse_turns("U")?);
		assert_eq!(self_symmetries(&up), vec![0, 2, 4, 6]);

		let mut superflip = CubieCube::new();
		for edge in superflip.edges.iter_mut() {
			edge.1 = 1;
		}
		assert_eq!(self_symmetries(&superflip).len(), NUM_SYMMETRIES);
		Ok(())
	}

	#[test]
	/// The coordinates reduced with symmetries only depend on their own coordinate
	fn coordinates_are_symmetry_compatible() {
		use crate::cube::coord::Coord;

		let mut rng = StdRng::seed_from_u64(2);
		for _ in 0..200 {
			let cube = CubieCube::random_with(&mut rng);
			for coord in [Coord::CornerOrientation, Coord::FlipUDSlice, Coord::CornerPermutation] {
				let rep = coord.decode(coord.encode(&cube));
				for sym in 0..NUM_SYMMETRIES_D4H {
					let a = coord.encode(&conjugate(&cube, sym, false));
					let b = coord.encode(&conjugate(&rep, sym, false));
					assert_eq!(a, b, "{coord} with symmetry {sym}");
				}
			}

			let (value, sym) = reduce_to_minimum(&cube, |c| c.flip_udslice_coord());
			assert!(value <= cube.flip_udslice_coord());
			assert_eq!(conjugate(&cube, sym, false).flip_udslice_coord(), value);
		}
	}
}
