//! Herbert Kociemba's two-phase algorithm.
//! http://kociemba.org/cube.htm
//!
//! Phase 1 brings the cube into the subgroup <U, D, R2, F2, L2, B2>, phase 2
//! solves it using only those turns. Both phases are guided by the pruning
//! tables and follow the first turn which gets strictly closer to the goal.

use std::{
	collections::{HashSet, VecDeque},
	path::Path,
};

use log::debug;

use super::{
	movetable::MoveTables,
	pruning::PruningTable,
	storage::TableFile,
	symclass::{SymClassTable, SymCoord},
	SolveError, SymmetryResolutionFailure, TableError,
};
use crate::cube::{
	coord::{Coord, N_EDGE8_PERM, N_FLIP, N_TWIST},
	cubiecube::CubieCube,
	symmetry::*,
	turn::*,
	RubiksCube,
};

const FLIP_UDSLICE_FILE: &str = "flip_udslice_classes.bin";
const CORNER_PERM_FILE: &str = "corner_perm_classes.bin";
const MOVES_FILE: &str = "move_tables.bin";
const PHASE1_FILE: &str = "phase1_pruning.bin";
const PHASE2_FILE: &str = "phase2_pruning.bin";

// ===== Tables =====

/// Every table the search needs. Built once, then only read.
#[derive(Clone, Debug)]
pub struct KociembaData {
	pub symmetries: SymmetryGroup,
	pub flip_udslice: SymClassTable,
	pub corner_perm: SymClassTable,
	pub moves: MoveTables,
	pub phase1: PruningTable,
	pub phase2: PruningTable,
}

impl KociembaData {
	fn from_tables(
		flip_udslice: SymClassTable,
		corner_perm: SymClassTable,
		moves: MoveTables,
		phase1: PruningTable,
		phase2: PruningTable,
	) -> Result<Self, TableError> {
		let data = Self {
			symmetries: SymmetryGroup::new(),
			flip_udslice,
			corner_perm,
			moves,
			phase1,
			phase2,
		};
		data.check_consistency()?;
		Ok(data)
	}

	/// Tables loaded from different sources must fit together
	fn check_consistency(&self) -> Result<(), TableError> {
		let checks = [
			(self.flip_udslice.coord() == Coord::FlipUDSlice, FLIP_UDSLICE_FILE),
			(self.corner_perm.coord() == Coord::CornerPermutation, CORNER_PERM_FILE),
			(
				self.moves.flip_udslice_classes() == self.flip_udslice.num_classes()
					&& self.moves.corner_perm_classes() == self.corner_perm.num_classes(),
				MOVES_FILE,
			),
			(
				self.phase1.classes() == self.flip_udslice.num_classes()
					&& self.phase1.width() == N_TWIST,
				PHASE1_FILE,
			),
			(
				self.phase2.classes() == self.corner_perm.num_classes()
					&& self.phase2.width() == N_EDGE8_PERM,
				PHASE2_FILE,
			),
		];

		match checks.iter().find(|(ok, _)| !ok) {
			Some((_, table)) => Err(TableError::Shape { table: *table }),
			None => Ok(()),
		}
	}

	/// Generate all tables from scratch
	pub fn generate() -> Result<Self, TableError> {
		let flip_udslice = SymClassTable::flip_udslice();
		let corner_perm = SymClassTable::corner_permutation();
		let moves = MoveTables::generate(&flip_udslice, &corner_perm)?;
		let phase1 = PruningTable::phase1(&moves, &flip_udslice)?;
		let phase2 = PruningTable::phase2(&moves, &corner_perm)?;

		Self::from_tables(flip_udslice, corner_perm, moves, phase1, phase2)
	}

	/// Load all five table files from `dir`
	pub fn load(dir: &Path) -> Result<Self, TableError> {
		Self::from_tables(
			SymClassTable::load(&dir.join(FLIP_UDSLICE_FILE))?,
			SymClassTable::load(&dir.join(CORNER_PERM_FILE))?,
			MoveTables::load(&dir.join(MOVES_FILE))?,
			PruningTable::load(&dir.join(PHASE1_FILE))?,
			PruningTable::load(&dir.join(PHASE2_FILE))?,
		)
	}

	pub fn save(&self, dir: &Path) -> Result<(), TableError> {
		self.flip_udslice.save(&dir.join(FLIP_UDSLICE_FILE))?;
		self.corner_perm.save(&dir.join(CORNER_PERM_FILE))?;
		self.moves.save(&dir.join(MOVES_FILE))?;
		self.phase1.save(&dir.join(PHASE1_FILE))?;
		self.phase2.save(&dir.join(PHASE2_FILE))
	}

	/// Load every table from `dir`, generating and saving the ones which
	/// are missing or corrupt.
	pub fn load_or_generate(dir: &Path) -> Result<Self, TableError> {
		let flip_udslice = SymClassTable::load_or_generate(
			&dir.join(FLIP_UDSLICE_FILE),
			|t| t.coord() == Coord::FlipUDSlice,
			|| Ok(SymClassTable::flip_udslice()),
		)?;
		let corner_perm = SymClassTable::load_or_generate(
			&dir.join(CORNER_PERM_FILE),
			|t| t.coord() == Coord::CornerPermutation,
			|| Ok(SymClassTable::corner_permutation()),
		)?;
		let moves = MoveTables::load_or_generate(
			&dir.join(MOVES_FILE),
			|t| {
				t.flip_udslice_classes() == flip_udslice.num_classes()
					&& t.corner_perm_classes() == corner_perm.num_classes()
			},
			|| MoveTables::generate(&flip_udslice, &corner_perm),
		)?;
		let phase1 = PruningTable::load_or_generate(
			&dir.join(PHASE1_FILE),
			|t| t.classes() == flip_udslice.num_classes() && t.width() == N_TWIST,
			|| PruningTable::phase1(&moves, &flip_udslice),
		)?;
		let phase2 = PruningTable::load_or_generate(
			&dir.join(PHASE2_FILE),
			|t| t.classes() == corner_perm.num_classes() && t.width() == N_EDGE8_PERM,
			|| PruningTable::phase2(&moves, &corner_perm),
		)?;

		Self::from_tables(flip_udslice, corner_perm, moves, phase1, phase2)
	}

	pub fn solver(&self) -> Solver<'_> {
		Solver::new(self)
	}
}

// ===== Configuration =====

/// Bounds of the search
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct SearchLimits {
	/// How often phase 2 may restart with a wider frontier
	pub max_widening_rounds: usize,
	/// Phase 2 paths reaching this length are not expanded further
	pub max_phase2_length: usize,
	/// A widening round producing more nodes than this gives up
	pub max_frontier: usize,
	/// How many re-oriented cubes are tried after a failed phase 2
	pub orientations: usize,
}

impl Default for SearchLimits {
	fn default() -> Self {
		Self {
			max_widening_rounds: 18,
			max_phase2_length: 18,
			max_frontier: 1 << 20,
			orientations: 3,
		}
	}
}

impl SearchLimits {
	pub fn with_max_widening_rounds(mut self, rounds: usize) -> Self {
		self.max_widening_rounds = rounds;
		self
	}

	pub fn with_max_phase2_length(mut self, length: usize) -> Self {
		self.max_phase2_length = length;
		self
	}

	pub fn with_max_frontier(mut self, size: usize) -> Self {
		self.max_frontier = size;
		self
	}

	pub fn with_orientations(mut self, orientations: usize) -> Self {
		self.orientations = orientations;
		self
	}
}

// ===== Search nodes =====

/// A phase 1 state. Equality only looks at the coordinates.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
struct Phase1Node {
	twist: u16,
	flip_udslice: SymCoord,
	flip: u16,
	udslice: u16,
}

impl Phase1Node {
	fn from_cube(data: &KociembaData, cube: &CubieCube) -> Self {
		Self {
			twist: cube.corner_orientation_coord() as u16,
			flip_udslice: data.flip_udslice.classify(cube),
			flip: cube.edge_orientation_coord() as u16,
			udslice: cube.udslice_coord() as u16,
		}
	}

	fn is_goal(&self) -> bool {
		self.twist == 0 && self.flip == 0 && self.udslice == 0
	}

	fn prune(&self, data: &KociembaData) -> u8 {
		let sym = self.flip_udslice.sym();
		let twist = data.moves.twist_conj[self.twist as usize][sym];
		data.phase1.get(self.flip_udslice.class(), twist as usize)
	}

	fn apply(&self, data: &KociembaData, turn: Turn) -> Result<Self, SymmetryResolutionFailure> {
		let moves = &data.moves;
		let t = turn.index();

		// The representative is S * cube * S^-1, so it is turned by S * turn * S^-1
		let sym = self.flip_udslice.sym();
		let conj = data.symmetries.conjugate_turn(sym, turn);
		let next = moves.flip_udslice.apply(self.flip_udslice.class(), conj);

		let flip = moves.flip[self.flip as usize][t];
		let udslice = moves.udslice[self.udslice as usize][t];
		let raw = udslice as usize * N_FLIP + flip as usize;

		let sym = data.symmetries.multiply(next.sym(), sym);
		let sym = moves.flip_udslice.resolve(next.class(), sym, raw)?;

		Ok(Self {
			twist: moves.twist[self.twist as usize][t],
			flip_udslice: SymCoord::new(next.class(), sym),
			flip,
			udslice,
		})
	}
}

/// A phase 2 state. Equality only looks at the coordinates.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
struct Phase2Node {
	corner_perm: SymCoord,
	corner_raw: u16,
	edge8: u16,
	udslice_sorted: u16,
}

impl Phase2Node {
	fn from_cube(data: &KociembaData, cube: &CubieCube) -> Result<Self, SolveError> {
		if !cube.in_phase2_subgroup() {
			return Err(SolveError::NotInSubgroup);
		}

		Ok(Self {
			corner_perm: data.corner_perm.classify(cube),
			corner_raw: cube.corner_permutation_coord() as u16,
			edge8: cube.phase2_edge_permutation_coord() as u16,
			udslice_sorted: cube.udslice_sorted_coord() as u16,
		})
	}

	fn is_goal(&self) -> bool {
		self.edge8 == 0 && self.udslice_sorted == 0 && self.corner_perm.class() == 0
	}

	fn prune(&self, data: &KociembaData) -> u8 {
		let edge8 = data.moves.edge8_conj[self.edge8 as usize][self.corner_perm.sym()];
		data.phase2.get(self.corner_perm.class(), edge8 as usize)
	}

	/// Apply the i-th phase 2 turn
	fn apply(&self, data: &KociembaData, i: usize) -> Result<Self, SymmetryResolutionFailure> {
		let moves = &data.moves;
		let turn = Turn::PHASE2[i];
		let t = turn.index();

		let sym = self.corner_perm.sym();
		let conj = data.symmetries.conjugate_turn(sym, turn);
		let next = moves.corner_perm_sym.apply(self.corner_perm.class(), conj);

		let corner_raw = moves.corner_perm[self.corner_raw as usize][t];
		let sym = data.symmetries.multiply(next.sym(), sym);
		let sym = moves.corner_perm_sym.resolve(next.class(), sym, corner_raw as usize)?;

		Ok(Self {
			corner_perm: SymCoord::new(next.class(), sym),
			corner_raw,
			edge8: moves.edge8[self.edge8 as usize][i],
			udslice_sorted: moves.udslice_sorted[self.udslice_sorted as usize][t],
		})
	}
}

/// Skip turns of the side just turned, and X after X Y when X and Y are opposite
fn is_redundant(path: &[Turn], turn: Turn) -> bool {
	match path {
		[.., last] if last.side == turn.side => true,
		[.., before, last] => last.side == turn.side.opposite() && before.side == turn.side,
		_ => false,
	}
}

type Frontier = VecDeque<(Phase2Node, Vec<Turn>)>;

enum Phase2State {
	/// Follow strictly decreasing pruning values from the frontier
	Descent { round: usize },
	/// Restart from the phase 2 start and expand every turn for the given number of layers
	Widening(usize),
	Solved(Vec<Turn>),
	Exhausted,
}

/// How the cube is turned before searching
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum Orientation {
	/// S * cube * S^-1
	Symmetry(usize),
	/// cube^-1
	Inverse,
}

impl Orientation {
	const ALL: [Orientation; 4] = [
		Orientation::Symmetry(0),
		Orientation::Symmetry(16),
		Orientation::Symmetry(32),
		Orientation::Inverse,
	];

	fn apply(self, cube: &CubieCube) -> CubieCube {
		match self {
			Orientation::Symmetry(sym) => conjugate(cube, sym, false),
			Orientation::Inverse => cube.inverse(),
		}
	}

	/// Turn a solution of the re-oriented cube into one of the original cube
	fn restore(self, group: &SymmetryGroup, turns: Vec<Turn>) -> Vec<Turn> {
		match self {
			Orientation::Symmetry(sym) => turns
				.into_iter()
				.map(|t| group.conjugate_turn(SYMMETRY_INVERSE[sym], t))
				.collect(),
			Orientation::Inverse => turns.into_iter().rev().map(Turn::inverse).collect(),
		}
	}
}

// ===== Solving =====

/// Solves cubes with a shared set of tables
#[derive(Clone, Copy, Debug)]
pub struct Solver<'a> {
	data: &'a KociembaData,
	limits: SearchLimits,
}

impl<'a> Solver<'a> {
	pub fn new(data: &'a KociembaData) -> Self {
		Self::with_limits(data, SearchLimits::default())
	}

	pub fn with_limits(data: &'a KociembaData, limits: SearchLimits) -> Self {
		Self { data, limits }
	}

	pub fn limits(&self) -> SearchLimits {
		self.limits
	}

	/// Find a sequence of turns solving the cube. It is short, not optimal.
	pub fn solve(&self, cube: &CubieCube) -> Result<Vec<Turn>, SolveError> {
		cube.verify()?;

		let attempts = Orientation::ALL.iter().take(self.limits.orientations + 1);
		for orientation in attempts {
			let oriented = orientation.apply(cube);

			match self.solve_oriented(&oriented) {
				Ok(turns) => {
					let turns = simplify_turns(orientation.restore(&self.data.symmetries, turns));
					debug!("Solved with {} turns ({:?})", turns.len(), orientation);
					debug_assert!({
						let mut c = *cube;
						c.apply_turns(turns.iter().copied());
						c.is_solved()
					});
					return Ok(turns);
				}
				Err(SolveError::Phase2Unsolvable) => {
					debug!("Phase 2 failed for {:?}", orientation);
				}
				Err(e) => return Err(e),
			}
		}

		Err(SolveError::Phase2Unsolvable)
	}

	fn solve_oriented(&self, cube: &CubieCube) -> Result<Vec<Turn>, SolveError> {
		let mut turns = self.phase1(cube)?;

		let mut cube = *cube;
		cube.apply_turns(turns.iter().copied());
		turns.extend(self.phase2(&cube)?);

		Ok(simplify_turns(turns))
	}

	/// Turns bringing the cube into the phase 2 subgroup
	pub fn phase1(&self, cube: &CubieCube) -> Result<Vec<Turn>, SolveError> {
		let data = self.data;

		let mut node = Phase1Node::from_cube(data, cube);
		let mut visited = HashSet::from([node]);
		let mut turns = vec![];

		while !node.is_goal() {
			let prune = node.prune(data);
			let mut found = None;

			for turn in Turn::ALL {
				let next = node.apply(data, turn)?;
				if next.prune(data) < prune && visited.insert(next) {
					found = Some((turn, next));
					break;
				}
			}

			let (turn, next) = found.ok_or(SolveError::Phase1Unsolvable)?;
			turns.push(turn);
			node = next;
		}

		debug!("Phase 1: {}", format_turns(&turns));
		Ok(turns)
	}

	/// Turns solving a cube from the phase 2 subgroup, using only phase 2 turns
	pub fn phase2(&self, cube: &CubieCube) -> Result<Vec<Turn>, SolveError> {
		let start = Phase2Node::from_cube(self.data, cube)?;

		let mut visited = HashSet::from([start]);
		let mut frontier: Frontier = VecDeque::from([(start, vec![])]);
		let mut state = Phase2State::Descent { round: 0 };

		loop {
			state = match state {
				Phase2State::Descent { round } => match self.descend(&mut frontier, &mut visited)? {
					Some(turns) => Phase2State::Solved(turns),
					None => Phase2State::Widening(round + 1),
				},
				Phase2State::Widening(round) if round > self.limits.max_widening_rounds => {
					Phase2State::Exhausted
				}
				Phase2State::Widening(round) => {
					debug!("Phase 2 widening by {} turns", round);
					match self.widen(start, round, &mut visited)? {
						Some(wide) => {
							frontier = wide;
							Phase2State::Descent { round }
						}
						None => Phase2State::Exhausted,
					}
				}
				Phase2State::Solved(turns) => {
					debug!("Phase 2: {}", format_turns(&turns));
					return Ok(turns);
				}
				Phase2State::Exhausted => return Err(SolveError::Phase2Unsolvable),
			};
		}
	}

	/// Depth first along strictly decreasing pruning values until the goal
	/// is found or the frontier runs empty
	fn descend(
		&self,
		frontier: &mut Frontier,
		visited: &mut HashSet<Phase2Node>,
	) -> Result<Option<Vec<Turn>>, SymmetryResolutionFailure> {
		let data = self.data;

		while let Some((node, path)) = frontier.pop_front() {
			if node.is_goal() {
				return Ok(Some(path));
			}
			if path.len() >= self.limits.max_phase2_length {
				continue;
			}

			let prune = node.prune(data);
			let mut children = vec![];

			for (i, turn) in Turn::PHASE2.iter().enumerate() {
				if is_redundant(&path, *turn) {
					continue;
				}

				let next = node.apply(data, i)?;
				if next.prune(data) < prune && visited.insert(next) {
					let mut path = path.clone();
					path.push(*turn);
					children.push((next, path));
				}
			}

			// The first turn ends up in front
			for child in children.into_iter().rev() {
				frontier.push_front(child);
			}
		}

		Ok(None)
	}

	/// All non-redundant paths of `layers` turns from the start along which the
	/// pruning value never decreases. Only the last layer is checked against
	/// the visited nodes.
	fn widen(
		&self,
		start: Phase2Node,
		layers: usize,
		visited: &mut HashSet<Phase2Node>,
	) -> Result<Option<Frontier>, SymmetryResolutionFailure> {
		let mut layer = vec![(start, vec![])];

		for depth in 1..=layers {
			let mut next_layer = vec![];

			for (node, path) in &layer {
				let prune = node.prune(self.data);

				for (i, turn) in Turn::PHASE2.iter().enumerate() {
					if is_redundant(path, *turn) {
						continue;
					}

					let next = node.apply(self.data, i)?;
					if next.prune(self.data) < prune {
						continue;
					}
					if depth == layers && !visited.insert(next) {
						continue;
					}

					let mut path = path.clone();
					path.push(*turn);
					next_layer.push((next, path));
				}

				if next_layer.len() > self.limits.max_frontier {
					debug!("Phase 2 frontier exceeds {} nodes", self.limits.max_frontier);
					return Ok(None);
				}
			}

			layer = next_layer;
		}

		Ok(Some(layer.into()))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rand::{rngs::StdRng, SeedableRng};

	#[test]
	/// Check the rules for skipping redundant turns
	fn redundant_turns() -> Result<(), ParseTurnError> {
		let path = parse_turns("R2 U")?;
		assert!(is_redundant(&path, "U2".parse::<Turn>()?));
		assert!(is_redundant(&path, "U'".parse::<Turn>()?));
		assert!(!is_redundant(&path, "D".parse::<Turn>()?));
		assert!(!is_redundant(&path, "R2".parse::<Turn>()?));

		let path = parse_turns("U D")?;
		assert!(is_redundant(&path, "U".parse::<Turn>()?));
		assert!(is_redundant(&path, "D2".parse::<Turn>()?));
		assert!(!is_redundant(&path, "F2".parse::<Turn>()?));

		assert!(!is_redundant(&[], "U".parse::<Turn>()?));
		Ok(())
	}

	#[test]
	/// Solutions of a re-oriented cube can be turned back into a solution of the cube
	fn restore_orientations() {
		let group = SymmetryGroup::new();
		let mut rng = StdRng::seed_from_u64(11);

		for orientation in Orientation::ALL {
			let scramble = random_sequence(&mut rng, 25);
			let cube = CubieCube::from_turns(&scramble);
			let oriented = orientation.apply(&cube);

			// The plain inverse of the scramble, expressed for the re-oriented cube
			let solution: Vec<Turn> = match orientation {
				Orientation::Symmetry(sym) => scramble
					.iter()
					.rev()
					.map(|t| group.conjugate_turn(sym, t.inverse()))
					.collect(),
				Orientation::Inverse => scramble.clone(),
			};

			let mut check = oriented;
			check.apply_turns(solution.iter().copied());
			assert!(check.is_solved(), "{:?}", orientation);

			let mut check = cube;
			check.apply_turns(orientation.restore(&group, solution));
			assert!(check.is_solved(), "{:?}", orientation);
		}
	}

	#[test]
	fn search_limits() {
		let limits = SearchLimits::default();
		assert_eq!(limits.max_widening_rounds, 18);
		assert_eq!(limits.max_phase2_length, 18);

		let limits = limits.with_max_frontier(10).with_orientations(0).with_max_phase2_length(12);
		assert_eq!(limits.max_frontier, 10);
		assert_eq!(limits.orientations, 0);
		assert_eq!(limits.max_phase2_length, 12);
		assert_eq!(limits.max_widening_rounds, 18);
	}
}
