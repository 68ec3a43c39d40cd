//! Incremental resolution of a formula while physical rolls keep arriving.
//!
//! Connected dice report their results independently and at their own pace. A [`LiveRoll`] keeps the history of
//! rolls received for one formula and re-attempts evaluation on each change, so the caller only needs to feed it
//! rolls and check whether a result is available. Timeouts and cancellation are left to the caller.

use alloc::{string::String, vec::Vec};
use core::{fmt, str::FromStr};

use crate::{
	dice::DieRoll,
	eval::{self, map_formula_to_rolls, RollFormulaResult, RollMapping, RollPool},
	formula::{RollFormulaTree, SimplifiedRollFormula},
	parse::{self, parse},
};

/// A formula parsed once from its notation
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RollFormula {
	/// Notation as entered
	notation: String,

	/// Parsed tree
	tree: RollFormulaTree,
}

impl RollFormula {
	/// Parses notation into a formula.
	///
	/// # Errors
	/// If the notation isn't a valid formula, the parse error is returned.
	pub fn new(notation: impl Into<String>) -> Result<Self, parse::Error> {
		let notation = notation.into();
		let tree = parse(&notation)?;
		Ok(Self { notation, tree })
	}

	/// Notation the formula was parsed from, as entered.
	#[must_use]
	pub fn notation(&self) -> &str {
		&self.notation
	}

	/// Parsed tree of the formula.
	#[must_use]
	pub const fn tree(&self) -> &RollFormulaTree {
		&self.tree
	}

	/// Attempts to resolve the formula against a set of rolls. See [`eval::evaluate()`].
	#[must_use]
	pub fn evaluate(&self, rolls: &[DieRoll]) -> Option<RollFormulaResult> {
		eval::evaluate(&self.tree, rolls)
	}

	/// Matches rolls to the formula's dice nodes. See [`map_formula_to_rolls()`].
	#[must_use]
	pub fn map_rolls(&self, rolls: &[DieRoll]) -> RollMapping<'_> {
		map_formula_to_rolls(&self.tree, rolls)
	}

	/// Classifies the formula as a simple shape, if it has one. See [`RollFormulaTree::simplify()`].
	#[must_use]
	pub fn simplify(&self) -> Option<SimplifiedRollFormula> {
		self.tree.simplify()
	}
}

impl FromStr for RollFormula {
	type Err = parse::Error;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::new(s)
	}
}

impl fmt::Display for RollFormula {
	/// Formats the canonical notation of the formula (not necessarily the notation as entered).
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.tree)
	}
}

/// A formula being resolved from rolls as they arrive
///
/// # Examples
/// ```
/// use roll_formula::{dice::{DieRoll, DieType}, live::{LiveRoll, RollFormula}};
///
/// let mut roll = LiveRoll::new(RollFormula::new("2d20kh1+5")?);
/// assert!(roll.push(DieRoll::new(DieType::D20, 8)).is_none());
/// assert!(!roll.is_resolved());
///
/// let result = roll.push(DieRoll::new(DieType::D20, 14)).expect("formula should be resolved");
/// assert_eq!(result.value, 19.0);
/// assert_eq!(result.dropped, [DieRoll::new(DieType::D20, 8)]);
/// # Ok::<(), roll_formula::parse::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct LiveRoll {
	/// Formula to resolve
	formula: RollFormula,

	/// Every roll received so far, oldest first
	rolls: Vec<DieRoll>,

	/// Result of the latest evaluation attempt
	result: Option<RollFormulaResult>,

	/// Rolls the latest successful attempt left unmatched
	unused: Vec<DieRoll>,
}

impl LiveRoll {
	/// Starts resolving a formula with no rolls received yet.
	/// Formulas that need no dice at all are resolved immediately.
	#[must_use]
	pub fn new(formula: RollFormula) -> Self {
		let mut live = Self {
			formula,
			rolls: Vec::new(),
			result: None,
			unused: Vec::new(),
		};
		live.reevaluate();
		live
	}

	/// Formula being resolved.
	#[must_use]
	pub const fn formula(&self) -> &RollFormula {
		&self.formula
	}

	/// Every roll received so far, oldest first.
	#[must_use]
	pub fn rolls(&self) -> &[DieRoll] {
		&self.rolls
	}

	/// Records a newly settled roll and attempts to resolve the formula again.
	/// Returns the result if the formula is now resolved.
	pub fn push(&mut self, roll: DieRoll) -> Option<&RollFormulaResult> {
		#[cfg(feature = "logging")]
		log::trace!("received {roll} for {}", self.formula);

		self.rolls.push(roll);
		self.reevaluate();
		self.result.as_ref()
	}

	/// Discards the roll at `index` in [`Self::rolls()`] and attempts to resolve the formula again.
	/// Returns the removed roll, or `None` if the index is out of bounds.
	pub fn remove(&mut self, index: usize) -> Option<DieRoll> {
		if index >= self.rolls.len() {
			return None;
		}
		let roll = self.rolls.remove(index);
		self.reevaluate();
		Some(roll)
	}

	/// Result of the formula, if enough rolls have been received.
	#[must_use]
	pub const fn result(&self) -> Option<&RollFormulaResult> {
		self.result.as_ref()
	}

	/// Checks whether enough rolls have been received to resolve the formula.
	#[must_use]
	pub const fn is_resolved(&self) -> bool {
		self.result.is_some()
	}

	/// Rolls received that the resolved formula didn't need, oldest first.
	/// Empty while the formula is unresolved.
	#[must_use]
	pub fn unused_rolls(&self) -> &[DieRoll] {
		&self.unused
	}

	/// Matches the received rolls to the formula's dice nodes, for showing progress.
	#[must_use]
	pub fn mapping(&self) -> RollMapping<'_> {
		self.formula.map_rolls(&self.rolls)
	}

	/// Evaluates the formula against a fresh copy of the roll history.
	fn reevaluate(&mut self) {
		let mut pool = RollPool::from(self.rolls.as_slice());
		self.result = pool.evaluate(self.formula.tree());
		self.unused = if self.result.is_some() {
			pool.into_rolls()
		} else {
			Vec::new()
		};

		#[cfg(feature = "logging")]
		if let Some(result) = &self.result {
			log::debug!("{} resolved after {} roll(s): {result}", self.formula, self.rolls.len());
		}
	}
}
