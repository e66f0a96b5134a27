//! A Rubik's cube solver using Herbert Kociemba's two-phase algorithm.
//!
//! Turning a cube:
//!
//! ```
//! use twophase::prelude::*;
//!
//! let mut cube = CubieCube::new();
//!
//! let turns = parse_turns("R U R' U'").unwrap();
//! for _ in 0..6 {
//!     cube.apply_turns(turns.iter().copied());
//! }
//!
//! assert!(cube.is_solved());
//! ```
//!
//! Solving a cube needs the tables, which take a while to generate the
//! first time and are cached in the given directory:
//!
//! ```no_run
//! use twophase::prelude::*;
//!
//! let data = KociembaData::load_or_generate("tables".as_ref()).unwrap();
//! let cube = CubieCube::random();
//!
//! let solution = data.solver().solve(&cube).unwrap();
//! println!("{}", format_turns(&solution));
//! ```

pub mod cube;
mod math;
pub mod solve;

pub mod prelude {
	pub use crate::cube::{coord::Coord, cubiecube::*, symmetry::*, turn::*, *};
	pub use crate::solve::{
		kociemba::{KociembaData, SearchLimits, Solver},
		SolveError, TableError,
	};
}
