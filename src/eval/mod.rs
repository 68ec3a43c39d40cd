//! Evaluation of formula trees against physical die rolls.
//!
//! Rolls arrive one at a time from connected dice, so evaluation is attempted repeatedly against a growing pool.
//! An attempt either resolves the whole formula or reports that it's still waiting for rolls; there is no partial
//! result. Dice nodes claim rolls left to right, first match in pool order, and a roll is never claimed twice.

pub mod mapping;
mod matcher;

use alloc::vec::Vec;
use core::fmt;

pub use self::mapping::{map_formula_to_rolls, RollMapping};
use self::matcher::Matcher;
use crate::{dice::DieRoll, formula::RollFormulaTree};

/// Final result of a resolved formula
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub struct RollFormulaResult {
	/// Computed value. Division makes fractional values possible.
	pub value: f64,

	/// Rolls that were consumed by the formula but excluded from the value by a keep/drop modifier, in the order
	/// they were dropped
	pub dropped: Vec<DieRoll>,
}

impl fmt::Display for RollFormulaResult {
	/// Formats the value, followed by the dropped rolls if there are any.
	///
	/// # Examples
	/// ```
	/// use roll_formula::{dice::{DieRoll, DieType}, eval::evaluate, parse};
	///
	/// let rolls = [DieRoll::new(DieType::D20, 4), DieRoll::new(DieType::D20, 17)];
	/// let result = evaluate(&parse("2d20kh1+2")?, &rolls).expect("formula should be resolved");
	/// assert_eq!(result.to_string(), "19 (dropped: d20:4)");
	/// # Ok::<(), roll_formula::parse::Error>(())
	/// ```
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.value)?;
		if !self.dropped.is_empty() {
			f.write_str(" (dropped: ")?;
			for (i, roll) in self.dropped.iter().enumerate() {
				if i > 0 {
					f.write_str(", ")?;
				}
				write!(f, "{roll}")?;
			}
			f.write_str(")")?;
		}
		Ok(())
	}
}

/// Ordered pool of settled rolls awaiting consumption by formulas
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RollPool {
	/// Rolls not consumed yet, in arrival order
	rolls: Vec<DieRoll>,
}

impl RollPool {
	/// Creates an empty pool.
	#[must_use]
	pub const fn new() -> Self {
		Self { rolls: Vec::new() }
	}

	/// Adds a roll to the end of the pool.
	pub fn push(&mut self, roll: DieRoll) {
		self.rolls.push(roll);
	}

	/// Rolls currently in the pool, in order.
	#[must_use]
	pub fn rolls(&self) -> &[DieRoll] {
		&self.rolls
	}

	/// Number of rolls in the pool.
	#[must_use]
	pub fn len(&self) -> usize {
		self.rolls.len()
	}

	/// Checks whether the pool has no rolls.
	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.rolls.is_empty()
	}

	/// Removes every roll from the pool.
	pub fn clear(&mut self) {
		self.rolls.clear();
	}

	/// Consumes the pool, returning its rolls.
	#[must_use]
	pub fn into_rolls(self) -> Vec<DieRoll> {
		self.rolls
	}

	/// Attempts to resolve a formula against the rolls in the pool.
	///
	/// On success, every roll the formula matched (kept or dropped) is removed from the pool and the rest stay in
	/// their original order. When the formula can't be resolved yet, `None` is returned and the pool is left exactly
	/// as it was, so the attempt can simply be repeated once more rolls have arrived.
	///
	/// # Examples
	/// ```
	/// use roll_formula::{dice::{DieRoll, DieType}, eval::RollPool, parse};
	///
	/// let tree = parse("1d6+1d6")?;
	/// let mut pool = RollPool::from(vec![DieRoll::new(DieType::D6, 4)]);
	/// assert_eq!(pool.evaluate(&tree), None);
	/// assert_eq!(pool.len(), 1);
	///
	/// pool.push(DieRoll::new(DieType::D6, 2));
	/// pool.push(DieRoll::new(DieType::D20, 11));
	/// let result = pool.evaluate(&tree).expect("formula should be resolved");
	/// assert_eq!(result.value, 6.0);
	/// assert_eq!(pool.rolls(), [DieRoll::new(DieType::D20, 11)]);
	/// # Ok::<(), roll_formula::parse::Error>(())
	/// ```
	pub fn evaluate(&mut self, tree: &RollFormulaTree) -> Option<RollFormulaResult> {
		let mut matcher = Matcher::new(&self.rolls);
		let Some(resolved) = matcher.resolve(tree) else {
			#[cfg(feature = "logging")]
			log::trace!("formula {tree} is waiting for more rolls ({} in pool)", self.rolls.len());
			return None;
		};

		let result = RollFormulaResult {
			value: resolved.value,
			dropped: resolved.dropped.iter().map(|&index| matcher.roll(index)).collect(),
		};
		let remaining = matcher
			.available()
			.iter()
			.map(|&index| matcher.roll(index))
			.collect::<Vec<_>>();

		#[cfg(feature = "logging")]
		log::debug!(
			"resolved {tree} to {result} using {} of {} roll(s)",
			self.rolls.len().saturating_sub(remaining.len()),
			self.rolls.len()
		);

		self.rolls = remaining;
		Some(result)
	}
}

impl From<Vec<DieRoll>> for RollPool {
	fn from(rolls: Vec<DieRoll>) -> Self {
		Self { rolls }
	}
}

impl From<&[DieRoll]> for RollPool {
	fn from(rolls: &[DieRoll]) -> Self {
		Self { rolls: rolls.to_vec() }
	}
}

impl FromIterator<DieRoll> for RollPool {
	fn from_iter<T: IntoIterator<Item = DieRoll>>(iter: T) -> Self {
		Self {
			rolls: iter.into_iter().collect(),
		}
	}
}

impl Extend<DieRoll> for RollPool {
	fn extend<T: IntoIterator<Item = DieRoll>>(&mut self, iter: T) {
		self.rolls.extend(iter);
	}
}

/// Attempts to resolve a formula against a set of rolls, without consuming them.
///
/// Returns `None` if the rolls aren't sufficient to resolve the formula yet. See [`RollPool::evaluate()`] for a
/// version that removes the matched rolls.
///
/// # Examples
/// ```
/// use roll_formula::{dice::{DieRoll, DieType}, eval::evaluate, parse};
///
/// let rolls = [3, 7, 1, 9].map(|value| DieRoll::new(DieType::D6, value));
/// let result = evaluate(&parse("4d6kh2")?, &rolls).expect("formula should be resolved");
/// assert_eq!(result.value, 16.0);
/// assert_eq!(result.dropped, [DieRoll::new(DieType::D6, 1), DieRoll::new(DieType::D6, 3)]);
///
/// assert_eq!(evaluate(&parse("5d6")?, &rolls), None);
/// # Ok::<(), roll_formula::parse::Error>(())
/// ```
#[must_use]
pub fn evaluate(tree: &RollFormulaTree, rolls: &[DieRoll]) -> Option<RollFormulaResult> {
	RollPool::from(rolls).evaluate(tree)
}
