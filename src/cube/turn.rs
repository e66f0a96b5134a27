use rand::Rng;

/// Total number of sides
pub const NUM_TURNSIDES: usize = 6;
/// Total number of ways to adjust your turn
pub const NUM_TURNWISES: usize = 3;
/// Total number of face turns
pub const NUM_TURNS: usize = NUM_TURNSIDES * NUM_TURNWISES;
/// Number of turns which keep a cube inside the phase 2 subgroup
pub const NUM_PHASE2_TURNS: usize = 10;

/// The sides you can turn in a cube.
/// Opposite sides are three apart.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, strum::EnumIter)]
#[repr(u8)]
pub enum TurnSide {
	Up,
	Right,
	Front,
	Down,
	Left,
	Back,
}

impl TurnSide {
	pub const ALL: [TurnSide; NUM_TURNSIDES] = [
		TurnSide::Up,
		TurnSide::Right,
		TurnSide::Front,
		TurnSide::Down,
		TurnSide::Left,
		TurnSide::Back,
	];

	/// The side on the opposite of the cube
	pub const fn opposite(self) -> Self {
		Self::ALL[(self as usize + 3) % NUM_TURNSIDES]
	}
}

/// You can either turn a side in (Counter-)Clockwise and Half turns
/// This is the enum for that
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, strum::EnumIter)]
#[repr(u8)]
pub enum TurnWise {
	Clockwise,
	Double,
	CounterClockwise,
}

impl TurnWise {
	pub const ALL: [TurnWise; NUM_TURNWISES] = [
		TurnWise::Clockwise,
		TurnWise::Double,
		TurnWise::CounterClockwise,
	];

	/// Number of clockwise quarter turns
	pub const fn quarter_turns(self) -> usize {
		self as usize + 1
	}

	/// None if the quarter turns add up to a full rotation
	pub const fn from_quarter_turns(n: usize) -> Option<Self> {
		match n % 4 {
			1 => Some(TurnWise::Clockwise),
			2 => Some(TurnWise::Double),
			3 => Some(TurnWise::CounterClockwise),
			_ => None,
		}
	}
}

impl std::fmt::Display for TurnWise {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		match self {
			TurnWise::Clockwise => write!(f, ""),
			TurnWise::CounterClockwise => write!(f, "'"),
			TurnWise::Double => write!(f, "2"),
		}
	}
}

/// An entire turn
///
/// side: The side to turn
/// wise: See the definiton of TurnWise
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Turn {
	pub side: TurnSide,
	pub wise: TurnWise,
}

const fn generate_turn_list() -> [Turn; NUM_TURNS] {
	let mut out = [Turn::new(TurnSide::Up, TurnWise::Clockwise); NUM_TURNS];
	let mut i = 0;
	while i < NUM_TURNS {
		out[i] = Turn::new(
			TurnSide::ALL[i / NUM_TURNWISES],
			TurnWise::ALL[i % NUM_TURNWISES],
		);
		i += 1;
	}
	out
}

/// Position of every turn in `Turn::PHASE2`
#[rustfmt::skip]
const PHASE2_INDEX: [Option<usize>; NUM_TURNS] = [
	Some(0), Some(1), Some(2), // U
	None, Some(3), None,       // R
	None, Some(4), None,       // F
	Some(5), Some(6), Some(7), // D
	None, Some(8), None,       // L
	None, Some(9), None,       // B
];

impl Turn {
	/// All face turns, ordered by their index
	pub const ALL: [Turn; NUM_TURNS] = generate_turn_list();

	/// The turns which keep corner and edge orientation as well as the ud-slice intact
	#[rustfmt::skip]
	pub const PHASE2: [Turn; NUM_PHASE2_TURNS] = [
		Turn::new(TurnSide::Up, TurnWise::Clockwise),
		Turn::new(TurnSide::Up, TurnWise::Double),
		Turn::new(TurnSide::Up, TurnWise::CounterClockwise),
		Turn::new(TurnSide::Right, TurnWise::Double),
		Turn::new(TurnSide::Front, TurnWise::Double),
		Turn::new(TurnSide::Down, TurnWise::Clockwise),
		Turn::new(TurnSide::Down, TurnWise::Double),
		Turn::new(TurnSide::Down, TurnWise::CounterClockwise),
		Turn::new(TurnSide::Left, TurnWise::Double),
		Turn::new(TurnSide::Back, TurnWise::Double),
	];

	pub const fn new(side: TurnSide, wise: TurnWise) -> Self {
		Self { side, wise }
	}

	/// 3 * side + quarter turns - 1
	pub const fn index(self) -> usize {
		self.side as usize * NUM_TURNWISES + self.wise as usize
	}

	/// The position within `Turn::PHASE2`, None for quarter turns of R, F, L and B
	pub const fn phase2_index(self) -> Option<usize> {
		PHASE2_INDEX[self.index()]
	}

	/// Turn itself to the turn, which negates itself.
	/// In terms of set theory, convert itself the inverse operation of the current one.
	pub fn invert(&mut self) {
		match self.wise {
			TurnWise::CounterClockwise => self.wise = TurnWise::Clockwise,
			TurnWise::Clockwise => self.wise = TurnWise::CounterClockwise,
			_ => {}
		}
	}

	pub fn inverse(self) -> Self {
		let mut out = self;
		out.invert();
		out
	}
}

impl std::fmt::Display for Turn {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		match self.side {
			TurnSide::Up => write!(f, "U"),
			TurnSide::Down => write!(f, "D"),
			TurnSide::Back => write!(f, "B"),
			TurnSide::Front => write!(f, "F"),
			TurnSide::Left => write!(f, "L"),
			TurnSide::Right => write!(f, "R"),
		}?;
		write!(f, "{}", self.wise)
	}
}

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum ParseTurnError {
	#[error("Empty turn")]
	Empty,
	#[error("Invalid side \"{0}\"")]
	Side(char),
	#[error("Invalid suffix in turn \"{0}\"")]
	Suffix(String),
}

impl std::str::FromStr for Turn {
	type Err = ParseTurnError;

	fn from_str(item: &str) -> Result<Self, Self::Err> {
		let mut chars = item.chars();

		let side = match chars.next().ok_or(ParseTurnError::Empty)? {
			'U' => TurnSide::Up,
			'D' => TurnSide::Down,
			'B' => TurnSide::Back,
			'F' => TurnSide::Front,
			'L' => TurnSide::Left,
			'R' => TurnSide::Right,
			c => return Err(ParseTurnError::Side(c)),
		};

		let wise = match chars.as_str() {
			"" => TurnWise::Clockwise,
			"2" => TurnWise::Double,
			"'" => TurnWise::CounterClockwise,
			_ => return Err(ParseTurnError::Suffix(item.to_owned())),
		};

		Ok(Self { side, wise })
	}
}

/// Parse a whitespace separated sequence like "R U R' U'"
pub fn parse_turns(string: &str) -> Result<Vec<Turn>, ParseTurnError> {
	string.split_whitespace().map(str::parse).collect()
}

/// Format a sequence of turns the way `parse_turns` reads them
pub fn format_turns(turns: &[Turn]) -> String {
	turns
		.iter()
		.map(Turn::to_string)
		.collect::<Vec<_>>()
		.join(" ")
}

/// Generate a random scramble of length `n`.
/// Two following turns never turn the same side.
pub fn random_sequence<R: Rng + ?Sized>(rng: &mut R, n: usize) -> Vec<Turn> {
	let mut out: Vec<Turn> = Vec::with_capacity(n);

	while out.len() < n {
		let turn = Turn::ALL[rng.gen_range(0..NUM_TURNS)];
		if out.last().is_some_and(|t| t.side == turn.side) {
			continue;
		}
		out.push(turn);
	}

	out
}

/// Combine following turns of the same side into one single turn and
/// drop the ones that cancel out.
pub fn simplify_turns<I>(turns: I) -> Vec<Turn>
where
	I: IntoIterator<Item = Turn>,
{
	let mut out: Vec<Turn> = vec![];

	for turn in turns {
		if let Some(last) = out.last_mut() {
			if last.side == turn.side {
				let quarters = last.wise.quarter_turns() + turn.wise.quarter_turns();
				match TurnWise::from_quarter_turns(quarters) {
					Some(wise) => last.wise = wise,
					None => {
						out.pop();
					}
				}
				continue;
			}
		}

		out.push(turn);
	}

	out
}
