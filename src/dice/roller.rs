//! Abstractions for producing [`DieRoll`]s without physical dice.
//!
//! The formula engine itself never generates random numbers. Rollers stand in for the hardware when there is none:
//! they produce exactly the settled rolls that a connected set of dice would report for a formula.

use alloc::vec::Vec;
use core::iter::Peekable;

#[cfg(feature = "fastrand")]
use fastrand::Rng;

use super::{DieRoll, DieType};
use crate::formula::RollFormulaTree;

/// Rolls dice - what else is there to say?
pub trait Roller {
	/// Rolls a single physical die.
	#[must_use]
	fn roll_die(&mut self, die_type: DieType) -> DieRoll;

	/// Rolls every physical die that a formula needs in order to be resolved, in formula order.
	/// A `d100` request is rolled as a `d00` followed by a `d10`, since that is what the hardware reports.
	///
	/// # Examples
	/// ```
	/// use roll_formula::{dice::{roller::{Max as MaxRoller, Roller}, DieRoll, DieType}, formula::RollFormulaTree};
	///
	/// let tree = RollFormulaTree::dice(DieType::D100, 1);
	/// assert_eq!(
	/// 	MaxRoller.roll_formula(&tree),
	/// 	vec![DieRoll::new(DieType::D00, 90), DieRoll::new(DieType::D10, 9)]
	/// );
	/// ```
	fn roll_formula(&mut self, tree: &RollFormulaTree) -> Vec<DieRoll>
	where
		Self: Sized,
	{
		let mut rolls = Vec::new();
		roll_into(self, tree, &mut rolls);
		rolls
	}
}

/// Walks a formula tree and appends a roll for each physical die it requests.
fn roll_into(roller: &mut impl Roller, tree: &RollFormulaTree, rolls: &mut Vec<DieRoll>) {
	match tree {
		RollFormulaTree::Constant(..) => {}
		RollFormulaTree::Dice { die_type, count } => {
			for _ in 0..*count {
				if *die_type == DieType::D100 {
					rolls.push(roller.roll_die(DieType::D00));
					rolls.push(roller.roll_die(DieType::D10));
				} else {
					rolls.push(roller.roll_die(*die_type));
				}
			}
		}
		RollFormulaTree::Modifier { groups, .. } => {
			for group in groups {
				roll_into(roller, group, rolls);
			}
		}
		RollFormulaTree::Operation { left, right, .. } => {
			roll_into(roller, left, rolls);
			roll_into(roller, right, rolls);
		}
	}
}

/// Generates rolls with random values using [fastrand]. Requires the `fastrand` feature (enabled by default).
///
/// # Examples
///
/// ## Default fastrand roller
/// ```
/// use roll_formula::dice::{roller::{FastRand as FastRandRoller, Roller}, DieType};
///
/// let mut roller = FastRandRoller::default();
/// let roll = roller.roll_die(DieType::D20);
/// assert!((1..=20).contains(&roll.value));
/// ```
///
/// ## Manually seeded fastrand roller
/// ```
/// use roll_formula::dice::{roller::{FastRand as FastRandRoller, Roller}, DieType};
///
/// let mut roller = FastRandRoller::with_seed(0x750c38d574400);
/// let roll = roller.roll_die(DieType::D00);
/// assert_eq!(roll.value % 10, 0);
/// ```
#[cfg(feature = "fastrand")]
#[derive(Debug, Clone)]
#[cfg_attr(feature = "std", derive(Default))]
pub struct FastRand(Rng);

#[cfg(feature = "fastrand")]
impl FastRand {
	/// Creates a new fastrand roller that uses the given RNG instance to generate rolls.
	#[must_use]
	#[inline]
	pub const fn new(rng: Rng) -> Self {
		Self(rng)
	}

	/// Creates a new fastrand roller that uses a pre-seeded RNG instance to generate rolls.
	#[must_use]
	#[inline]
	pub fn with_seed(seed: u64) -> Self {
		Self(Rng::with_seed(seed))
	}
}

#[cfg(feature = "fastrand")]
impl Roller for FastRand {
	/// Rolls a single die by picking one of its faces using the [`fastrand::Rng`] the roller was created with.
	#[inline]
	fn roll_die(&mut self, die_type: DieType) -> DieRoll {
		let faces = die_type.faces();
		let value = faces.get(self.0.usize(..faces.len())).copied().unwrap_or_default();
		DieRoll::new(die_type, value)
	}
}

/// Generates rolls that always land on their highest face.
///
/// # Examples
/// ```
/// use roll_formula::dice::{roller::{Max as MaxRoller, Roller}, DieRoll, DieType};
///
/// let mut roller = MaxRoller;
/// assert_eq!(roller.roll_die(DieType::D20), DieRoll::new(DieType::D20, 20));
/// assert_eq!(roller.roll_die(DieType::D10), DieRoll::new(DieType::D10, 9));
/// ```
#[derive(Debug, Default, Clone)]
#[expect(clippy::exhaustive_structs, reason = "Highly unlikely to change")]
pub struct Max;

impl Roller for Max {
	/// Rolls a single die, always with its highest face.
	#[inline]
	fn roll_die(&mut self, die_type: DieType) -> DieRoll {
		DieRoll::new(die_type, die_type.highest_face())
	}
}

/// Generates rolls from an iterator of values. Mainly useful for testing purposes.
///
/// # Examples
/// ```
/// use roll_formula::{dice::{roller::{Iter as IterRoller, Roller}, DieRoll, DieType}, parse};
///
/// let mut roller = IterRoller::new(vec![3, 5, 2]);
/// let tree = parse("2d6+1d4")?;
/// assert_eq!(
/// 	roller.roll_formula(&tree),
/// 	vec![DieRoll::new(DieType::D6, 3), DieRoll::new(DieType::D6, 5), DieRoll::new(DieType::D4, 2)]
/// );
/// # Ok::<(), roll_formula::parse::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct Iter<I: Iterator<Item = i32>>(Peekable<I>);

impl<I: Iterator<Item = i32>> Iter<I> {
	/// Checks whether the iterator still has values available.
	#[inline]
	pub fn can_roll(&mut self) -> bool {
		self.0.peek().is_some()
	}

	/// Creates a new roller that uses the given iterator to provide roll values.
	#[must_use]
	#[inline]
	pub fn new(iter: impl IntoIterator<IntoIter = I>) -> Self {
		Self(iter.into_iter().peekable())
	}
}

impl<I: Iterator<Item = i32>> Roller for Iter<I> {
	/// Rolls a die with the value from the next iteration.
	///
	/// # Panics
	/// If the iterator has finished, this will panic.
	#[inline]
	#[expect(
		clippy::expect_used,
		reason = "Mostly for testing, otherwise manual checking of can_roll() is expected"
	)]
	fn roll_die(&mut self, die_type: DieType) -> DieRoll {
		DieRoll::new(die_type, self.0.next().expect("iterator is finished"))
	}
}
