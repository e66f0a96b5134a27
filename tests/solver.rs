mod common;

use std::error::Error;

use common::DATA;
use rand::{rngs::StdRng, SeedableRng};
use rayon::prelude::*;
use twophase::prelude::*;

fn replay(cube: &CubieCube, turns: &[Turn]) -> CubieCube {
	let mut cube = *cube;
	cube.apply_turns(turns.iter().copied());
	cube
}

#[test_log::test]
fn solved_cube_needs_no_turns() -> Result<(), SolveError> {
	let solution = DATA.solver().solve(&CubieCube::new())?;
	assert!(solution.is_empty());
	Ok(())
}

#[test_log::test]
/// A single quarter turn is undone by its inverse
fn single_quarter_turns() -> Result<(), SolveError> {
	let solver = DATA.solver();

	for side in TurnSide::ALL {
		for wise in [TurnWise::Clockwise, TurnWise::CounterClockwise] {
			let turn = Turn::new(side, wise);
			let cube = CubieCube::from_turns(&[turn]);
			assert_eq!(solver.solve(&cube)?, vec![turn.inverse()], "{}", turn);
		}
	}

	Ok(())
}

#[test_log::test]
/// Solve a fixed scramble and replay the solution
fn fixed_scramble() -> Result<(), Box<dyn Error>> {
	let scramble = parse_turns("D2 F' L2 U R2 B' L' D F2 R U' B2 L D' R' F U2 B L2 D")?;
	assert_eq!(scramble.len(), 20);

	let cube = CubieCube::from_turns(&scramble);
	let solution = DATA.solver().solve(&cube)?;

	assert!(replay(&cube, &solution).is_solved());
	log::info!("{} turns: {}", solution.len(), format_turns(&solution));
	Ok(())
}

#[test_log::test]
/// Invalid cubes are rejected before any search
fn invalid_cube_is_rejected() {
	let mut cube = CubieCube::new();
	cube.corners[0].1 = 1;
	assert_eq!(
		DATA.solver().solve(&cube),
		Err(SolveError::InvalidConfiguration(CubeError::CornerOrientation(1)))
	);

	let mut cube = CubieCube::new();
	cube.edges.swap(0, 1);
	assert_eq!(
		DATA.solver().solve(&cube),
		Err(SolveError::InvalidConfiguration(CubeError::Permutation))
	);
}

#[test_log::test]
/// Phase 1 always ends inside the subgroup
fn phase1_reaches_subgroup() -> Result<(), SolveError> {
	let solver = DATA.solver();
	let mut rng = StdRng::seed_from_u64(31);

	for _ in 0..50 {
		let cube = CubieCube::random_with(&mut rng);
		let turns = solver.phase1(&cube)?;
		let cube = replay(&cube, &turns);

		assert_eq!(cube.corner_orientation_coord(), 0);
		assert_eq!(cube.edge_orientation_coord(), 0);
		assert_eq!(cube.udslice_coord(), 0);
	}

	Ok(())
}

#[test_log::test]
fn phase2_needs_subgroup() -> Result<(), Box<dyn Error>> {
	let cube = CubieCube::from_turns(&parse_turns("R U")?);
	assert_eq!(DATA.solver().phase2(&cube), Err(SolveError::NotInSubgroup));

	for scramble in ["R2 U", "R2 U D' F2 L2 U2"] {
		let cube = CubieCube::from_turns(&parse_turns(scramble)?);
		let turns = DATA.solver().phase2(&cube)?;
		assert!(turns.iter().all(|t| t.phase2_index().is_some()));
		assert!(replay(&cube, &turns).is_solved(), "{}", scramble);
	}
	Ok(())
}

#[test_log::test]
/// Widening starts only once the descent is stuck and solves cubes the
/// descent alone gives up on
fn widening_rescues_stuck_descent() -> Result<(), SolveError> {
	let descent = Solver::with_limits(&DATA, SearchLimits::default().with_max_widening_rounds(0));
	let widening = DATA.solver();
	let mut rng = StdRng::seed_from_u64(34);
	let (mut stuck, mut rescued) = (0, 0);

	for _ in 0..20 {
		let cube = CubieCube::random_with(&mut rng);
		let cube = replay(&cube, &widening.phase1(&cube)?);

		match descent.phase2(&cube) {
			Ok(turns) => assert_eq!(widening.phase2(&cube)?, turns),
			Err(e) => {
				assert_eq!(e, SolveError::Phase2Unsolvable);
				stuck += 1;
				if let Ok(turns) = widening.phase2(&cube) {
					assert!(replay(&cube, &turns).is_solved());
					rescued += 1;
				}
			}
		}
	}

	log::info!("Widening rescued {} of {} stuck cubes", rescued, stuck);
	assert!(rescued > 0);
	Ok(())
}

#[test_log::test]
/// Random cubes solved at the same time with the shared tables
fn concurrent_random_cubes() {
	let mut rng = StdRng::seed_from_u64(32);
	let cubes: Vec<_> = (0..16).map(|_| CubieCube::random_with(&mut rng)).collect();

	let solved = cubes
		.par_iter()
		.map(|cube| match DATA.solver().solve(cube) {
			Ok(turns) => {
				assert!(replay(cube, &turns).is_solved());
				true
			}
			Err(e) => {
				assert_eq!(e, SolveError::Phase2Unsolvable);
				false
			}
		})
		.filter(|ok| *ok)
		.count();

	log::info!("Solved {} of {} random cubes", solved, cubes.len());
	assert!(solved > 0);
}

#[test_log::test]
/// Without widening and re-orientation the search may give up, but it never
/// returns a wrong solution
fn tight_limits() {
	let limits = SearchLimits::default()
		.with_max_widening_rounds(0)
		.with_orientations(0);
	let solver = Solver::with_limits(&DATA, limits);
	let mut rng = StdRng::seed_from_u64(33);

	for _ in 0..10 {
		let cube = CubieCube::random_with(&mut rng);
		match solver.solve(&cube) {
			Ok(turns) => assert!(replay(&cube, &turns).is_solved()),
			Err(e) => assert_eq!(e, SolveError::Phase2Unsolvable),
		}
	}
}
