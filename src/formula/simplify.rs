//! Compact classification of common formula shapes, for summaries and simple editors.
//!
//! This view is lossy and must never be used to compute a result.

use alloc::vec::Vec;
use core::fmt;

use super::{ArithOp, ModifierKind, RollFormulaTree};
use crate::dice::DieType;

/// A formula of the shape "dice ± constant", optionally rolled with advantage or disadvantage and optionally with a
/// guidance bonus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub struct SimplifiedRollFormula {
	/// Type of the main dice
	pub die_type: DieType,

	/// Number of main dice (always 1 when [`Self::modifier`] is set)
	pub die_count: u32,

	/// Flat value added to the dice
	pub constant: i32,

	/// Advantage or disadvantage on the main die, if any
	pub modifier: Option<Advantage>,

	/// Extra bonus dice, if any
	pub bonus: Option<Bonus>,
}

/// Rolling two dice and keeping one of them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[expect(clippy::exhaustive_enums, reason = "There are only two ways to keep one of two dice")]
pub enum Advantage {
	/// Keep the highest of two dice (`2dXkh1`)
	Advantage,

	/// Keep the lowest of two dice (`2dXkl1`)
	Disadvantage,
}

/// Extra dice added on top of the main roll
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum Bonus {
	/// One extra d4 (`+1d4`)
	Guidance,
}

impl SimplifiedRollFormula {
	/// Creates a plain "dice" formula with no constant, modifier or bonus.
	#[must_use]
	pub const fn new(die_type: DieType, die_count: u32) -> Self {
		Self {
			die_type,
			die_count,
			constant: 0,
			modifier: None,
			bonus: None,
		}
	}

	/// Sets the constant.
	#[must_use]
	pub const fn with_constant(mut self, constant: i32) -> Self {
		self.constant = constant;
		self
	}

	/// Sets advantage or disadvantage. The main die count becomes 1.
	#[must_use]
	pub const fn with_modifier(mut self, modifier: Advantage) -> Self {
		self.die_count = 1;
		self.modifier = Some(modifier);
		self
	}

	/// Sets the bonus.
	#[must_use]
	pub const fn with_bonus(mut self, bonus: Bonus) -> Self {
		self.bonus = Some(bonus);
		self
	}

	/// Builds the full formula tree this simplified formula stands for.
	///
	/// # Examples
	/// ```
	/// use roll_formula::{dice::DieType, formula::simplify::{Advantage, Bonus, SimplifiedRollFormula}};
	///
	/// let simple = SimplifiedRollFormula::new(DieType::D20, 1)
	/// 	.with_constant(-2)
	/// 	.with_modifier(Advantage::Disadvantage)
	/// 	.with_bonus(Bonus::Guidance);
	/// assert_eq!(simple.to_tree().to_string(), "2d20kl1-2+1d4");
	/// assert_eq!(simple.to_tree().simplify(), Some(simple));
	/// ```
	#[must_use]
	pub fn to_tree(&self) -> RollFormulaTree {
		let mut tree = match self.modifier {
			None => RollFormulaTree::dice(self.die_type, self.die_count),
			Some(modifier) => RollFormulaTree::modifier(
				match modifier {
					Advantage::Advantage => ModifierKind::KeepHighest,
					Advantage::Disadvantage => ModifierKind::KeepLowest,
				},
				1,
				alloc::vec![RollFormulaTree::dice(self.die_type, 2)],
			),
		};

		if self.constant > 0 {
			tree = RollFormulaTree::operation(ArithOp::Add, tree, RollFormulaTree::constant(self.constant));
		} else if self.constant < 0 {
			tree = match self.constant.checked_neg() {
				Some(value) => RollFormulaTree::operation(ArithOp::Sub, tree, RollFormulaTree::constant(value)),
				None => RollFormulaTree::operation(ArithOp::Add, tree, RollFormulaTree::constant(self.constant)),
			};
		}

		match self.bonus {
			Some(Bonus::Guidance) => {
				RollFormulaTree::operation(ArithOp::Add, tree, RollFormulaTree::dice(DieType::D4, 1))
			}
			None => tree,
		}
	}
}

impl fmt::Display for SimplifiedRollFormula {
	/// Formats the notation of [`Self::to_tree()`].
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.to_tree())
	}
}

impl RollFormulaTree {
	/// Classifies the formula as a [`SimplifiedRollFormula`] when it has one of the common shapes:
	/// a single dice pool (or a `kh1`/`kl1` over exactly two dice of one type), plus or minus any constants, plus
	/// optionally one `1d4` guidance bonus. Returns `None` for anything else.
	///
	/// # Examples
	/// ```
	/// use roll_formula::{dice::DieType, formula::simplify::{Advantage, Bonus, SimplifiedRollFormula}, parse};
	///
	/// assert_eq!(
	/// 	parse("2d20kh1+5")?.simplify(),
	/// 	Some(SimplifiedRollFormula::new(DieType::D20, 1).with_constant(5).with_modifier(Advantage::Advantage)),
	/// );
	/// assert_eq!(
	/// 	parse("3d6-1+1d4")?.simplify(),
	/// 	Some(SimplifiedRollFormula::new(DieType::D6, 3).with_constant(-1).with_bonus(Bonus::Guidance)),
	/// );
	/// assert_eq!(parse("1d20*2")?.simplify(), None);
	/// assert_eq!(parse("{1d20,1d12}kh1")?.simplify(), None);
	/// # Ok::<(), roll_formula::parse::Error>(())
	/// ```
	#[must_use]
	pub fn simplify(&self) -> Option<SimplifiedRollFormula> {
		let mut terms = Vec::new();
		flatten_additive(self, true, &mut terms);

		let mut main = None;
		let mut constant: i32 = 0;
		let mut bonus = None;
		for (positive, term) in terms {
			match term {
				Self::Constant(value) => {
					let value = if positive { *value } else { value.checked_neg()? };
					constant = constant.checked_add(value)?;
				}
				_ if !positive => return None,
				_ if main.is_none() => main = Some(classify_main(term)?),
				Self::Dice {
					die_type: DieType::D4,
					count: 1,
				} if bonus.is_none() => bonus = Some(Bonus::Guidance),
				_ => return None,
			}
		}

		let (die_type, die_count, modifier) = main?;
		Some(SimplifiedRollFormula {
			die_type,
			die_count,
			constant,
			modifier,
			bonus,
		})
	}
}

/// Splits a chain of additions and subtractions into its signed terms, left to right.
fn flatten_additive<'a>(tree: &'a RollFormulaTree, positive: bool, terms: &mut Vec<(bool, &'a RollFormulaTree)>) {
	match tree {
		RollFormulaTree::Operation {
			operator: operator @ (ArithOp::Add | ArithOp::Sub),
			left,
			right,
		} => {
			flatten_additive(left, positive, terms);
			flatten_additive(right, positive == (*operator == ArithOp::Add), terms);
		}
		_ => terms.push((positive, tree)),
	}
}

/// Classifies the main dice term of a simplified formula.
fn classify_main(term: &RollFormulaTree) -> Option<(DieType, u32, Option<Advantage>)> {
	match term {
		RollFormulaTree::Dice { die_type, count } => Some((*die_type, *count, None)),
		RollFormulaTree::Modifier { kind, count: 1, groups } => {
			let advantage = match kind {
				ModifierKind::KeepHighest => Advantage::Advantage,
				ModifierKind::KeepLowest => Advantage::Disadvantage,
				ModifierKind::DropHighest | ModifierKind::DropLowest => return None,
			};
			match groups.as_slice() {
				[RollFormulaTree::Dice { die_type, count: 2 }] => Some((*die_type, 1, Some(advantage))),
				_ => None,
			}
		}
		_ => None,
	}
}
