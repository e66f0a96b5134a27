pub mod coord;
pub mod cubiecube;
pub mod symmetry;
pub mod turn;

use strum::EnumCount;
use turn::*;

// ===== Edge Piece =====

/// All the different position names for an Edge
#[derive(
	Clone, Copy, Default, PartialEq, Eq, Hash, Debug, strum::EnumIter, strum::EnumCount,
	strum::Display,
)]
#[allow(clippy::upper_case_acronyms)]
#[repr(usize)]
#[rustfmt::skip]
pub enum Edge {
	#[default]
	UR, UF, UL, UB, // up edges
	DR, DF, DL, DB, // down edges
	FR, FL, BL, BR, // ud-slice (middle edges)
}

pub const NUM_EDGES: usize = Edge::COUNT;

/// All edges in their solved order, usable in const contexts.
#[rustfmt::skip]
pub const EDGES: [Edge; NUM_EDGES] = [
	Edge::UR, Edge::UF, Edge::UL, Edge::UB,
	Edge::DR, Edge::DF, Edge::DL, Edge::DB,
	Edge::FR, Edge::FL, Edge::BL, Edge::BR,
];

/// The four edges which belong to the ud-slice, in solved order.
pub const UDSLICE_EDGES: [Edge; 4] = [Edge::FR, Edge::FL, Edge::BL, Edge::BR];

impl Edge {
	/// Whether the edge belongs to the middle layer between U and D
	pub const fn is_udslice(self) -> bool {
		self as usize >= Edge::FR as usize
	}
}

// ===== Corner Piece =====

/// A corner piece.
/// The first letter always names the U or D face, the others follow clockwise.
#[derive(
	Clone, Copy, Default, PartialEq, Eq, Hash, Debug, strum::EnumIter, strum::EnumCount,
	strum::Display,
)]
#[allow(clippy::upper_case_acronyms)]
#[repr(usize)]
#[rustfmt::skip]
pub enum Corner {
	#[default]
	URF, UFL, ULB, UBR,
	DFR, DLF, DBL, DRB,
}

pub const NUM_CORNERS: usize = Corner::COUNT;

#[rustfmt::skip]
pub const CORNERS: [Corner; NUM_CORNERS] = [
	Corner::URF, Corner::UFL, Corner::ULB, Corner::UBR,
	Corner::DFR, Corner::DLF, Corner::DBL, Corner::DRB,
];

/// It contains all the different ways a cube configuration
/// could be illegal.
/// From it, you are able to know how to fix the cube.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CubeError {
	#[error("The orientation-parity of the corners are off by +{0}")]
	CornerOrientation(usize),
	#[error("The orientation-parity of the edges are off by 1")]
	EdgeOrientation,
	#[error("The number of swaps needed is odd")]
	Permutation,
	#[error("Not all cubies are present on the cube")]
	Cubies,
	#[error("A cubie carries an orientation outside of its range")]
	Orientation,
}

/// The RubiksCube trait.
pub trait RubiksCube {
	fn apply_turn(&mut self, turn: Turn);

	fn apply_turns<I>(&mut self, turns: I)
	where
		I: IntoIterator<Item = Turn>,
	{
		for turn in turns {
			self.apply_turn(turn);
		}
	}
}
