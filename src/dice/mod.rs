//! Die types and the settled physical rolls that the evaluator consumes.
//!
//! A [`DieRoll`] is what a connected die reports once it has come to rest: the kind of die it is and the face it
//! landed on. For producing rolls without hardware (tests, demos, the CLI), see the [`roller`] module.

pub mod roller;

use alloc::{borrow::ToOwned, string::String, vec::Vec};
use core::{fmt, str::FromStr};

pub use self::roller::Roller;

/// Kinds of dice known to the formula engine.
///
/// Physical dice report one of the primitive types. [`Self::D6Pipped`] is only ever reported by hardware (it is a
/// second physical variant of the d6), and [`Self::D100`] is only ever requested by formulas (it is resolved from a
/// [`Self::D00`] tens roll and a [`Self::D10`] units roll).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[expect(clippy::exhaustive_enums, reason = "Matches the set of dice that exist in hardware")]
pub enum DieType {
	/// Four-sided die
	D4,

	/// Six-sided die
	D6,

	/// Six-sided die with pips instead of numerals
	D6Pipped,

	/// Six-sided Fudge/FATE die
	D6Fudge,

	/// Eight-sided die
	D8,

	/// Ten-sided die, faces 0 through 9
	D10,

	/// Ten-sided percentile die, faces 00 through 90
	D00,

	/// Twelve-sided die
	D12,

	/// Twenty-sided die
	D20,

	/// Percentile roll made of a [`Self::D00`] and a [`Self::D10`]
	D100,
}

impl DieType {
	/// Every die type, physical variants first.
	pub const ALL: [Self; 10] = [
		Self::D4,
		Self::D6,
		Self::D6Pipped,
		Self::D6Fudge,
		Self::D8,
		Self::D10,
		Self::D00,
		Self::D12,
		Self::D20,
		Self::D100,
	];

	/// Maps the text following the `d` of a dice literal to a die type.
	/// The text is expected to already be lowercase, so `"f"` is the Fudge die.
	///
	/// # Examples
	/// ```
	/// use roll_formula::dice::DieType;
	///
	/// assert_eq!(DieType::from_sides("20"), Some(DieType::D20));
	/// assert_eq!(DieType::from_sides("00"), Some(DieType::D00));
	/// assert_eq!(DieType::from_sides("f"), Some(DieType::D6Fudge));
	/// assert_eq!(DieType::from_sides("7"), None);
	/// ```
	#[must_use]
	pub fn from_sides(sides: &str) -> Option<Self> {
		Some(match sides {
			"4" => Self::D4,
			"6" => Self::D6,
			"8" => Self::D8,
			"10" => Self::D10,
			"00" => Self::D00,
			"12" => Self::D12,
			"20" => Self::D20,
			"100" => Self::D100,
			"f" => Self::D6Fudge,
			_ => return None,
		})
	}

	/// Number of faces on the die.
	#[must_use]
	pub const fn face_count(self) -> u8 {
		match self {
			Self::D4 => 4,
			Self::D6 | Self::D6Pipped | Self::D6Fudge => 6,
			Self::D8 => 8,
			Self::D10 | Self::D00 => 10,
			Self::D12 => 12,
			Self::D20 => 20,
			Self::D100 => 100,
		}
	}

	/// Lowest value the die can report.
	#[must_use]
	pub const fn lowest_face(self) -> i32 {
		match self {
			Self::D10 | Self::D00 => 0,
			_ => 1,
		}
	}

	/// Highest value the die can report.
	#[must_use]
	pub const fn highest_face(self) -> i32 {
		match self {
			Self::D10 => 9,
			Self::D00 => 90,
			_ => self.face_count() as i32,
		}
	}

	/// All of the values the die can report, lowest first.
	///
	/// # Examples
	/// ```
	/// use roll_formula::dice::DieType;
	///
	/// assert_eq!(DieType::D4.faces(), vec![1, 2, 3, 4]);
	/// assert_eq!(DieType::D00.faces()[..3], [0, 10, 20]);
	/// ```
	#[must_use]
	pub fn faces(self) -> Vec<i32> {
		let step = if self == Self::D00 { 10 } else { 1 };
		(0..i32::from(self.face_count()))
			.map(|index| self.lowest_face().saturating_add(index.saturating_mul(step)))
			.collect()
	}

	/// Whether a physical roll of type `other` can stand in for a requested die of this type.
	/// Pipped d6s count as regular d6s.
	#[must_use]
	pub const fn accepts(self, other: Self) -> bool {
		matches!(
			(self, other),
			(Self::D4, Self::D4)
				| (Self::D6, Self::D6 | Self::D6Pipped)
				| (Self::D6Pipped, Self::D6Pipped)
				| (Self::D6Fudge, Self::D6Fudge)
				| (Self::D8, Self::D8)
				| (Self::D10, Self::D10)
				| (Self::D00, Self::D00)
				| (Self::D12, Self::D12)
				| (Self::D20, Self::D20)
				| (Self::D100, Self::D100)
		)
	}

	/// Notation name of the die, without any count.
	#[must_use]
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::D4 => "d4",
			Self::D6 => "d6",
			Self::D6Pipped => "d6pipped",
			Self::D6Fudge => "dF",
			Self::D8 => "d8",
			Self::D10 => "d10",
			Self::D00 => "d00",
			Self::D12 => "d12",
			Self::D20 => "d20",
			Self::D100 => "d100",
		}
	}
}

impl fmt::Display for DieType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for DieType {
	type Err = ParseRollError;

	/// Parses a die type name such as `d20`, `D00`, `dF` or `d6pipped`.
	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let lc = s.to_ascii_lowercase();
		if lc == "d6pipped" {
			return Ok(Self::D6Pipped);
		}
		lc.strip_prefix('d')
			.and_then(Self::from_sides)
			.ok_or_else(|| ParseRollError::UnknownDieType(s.to_owned()))
	}
}

/// A single settled roll reported by a physical die.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[expect(clippy::exhaustive_structs, reason = "A roll is exactly a die and a face")]
pub struct DieRoll {
	/// Kind of die that was rolled
	pub die_type: DieType,

	/// Face value the die landed on
	pub value: i32,
}

impl DieRoll {
	/// Creates a new roll of the given die type and value.
	#[must_use]
	pub const fn new(die_type: DieType, value: i32) -> Self {
		Self { die_type, value }
	}
}

impl fmt::Display for DieRoll {
	/// Formats the roll as `<die>:<value>`, which [`DieRoll::from_str()`] accepts back.
	///
	/// # Examples
	/// ```
	/// use roll_formula::dice::{DieRoll, DieType};
	///
	/// let roll = DieRoll::new(DieType::D20, 15);
	/// assert_eq!(roll.to_string(), "d20:15");
	/// assert_eq!("d20:15".parse::<DieRoll>()?, roll);
	/// # Ok::<(), roll_formula::dice::ParseRollError>(())
	/// ```
	///
	/// [`DieRoll::from_str()`]: ./struct.DieRoll.html#method.from_str
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}:{}", self.die_type, self.value)
	}
}

impl FromStr for DieRoll {
	type Err = ParseRollError;

	/// Parses a roll written as `<die>:<value>` or `<die>=<value>`, e.g. `d00:40` or `d6pipped=3`.
	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let (die, value) = s
			.split_once([':', '='])
			.ok_or_else(|| ParseRollError::MissingValue(s.to_owned()))?;
		let die_type = die.trim().parse()?;
		let value = value
			.trim()
			.parse()
			.map_err(|_err| ParseRollError::InvalidValue(value.to_owned()))?;
		Ok(Self { die_type, value })
	}
}

/// An error resulting from parsing a [`DieType`] or [`DieRoll`] from text
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ParseRollError {
	/// The die name isn't one of the known [`DieType`]s.
	#[error("unknown die type: {0}")]
	UnknownDieType(String),

	/// The roll has no `:` or `=` separating the die from its value.
	#[error("missing roll value in {0:?}")]
	MissingValue(String),

	/// The roll value isn't an integer.
	#[error("invalid roll value: {0:?}")]
	InvalidValue(String),
}
