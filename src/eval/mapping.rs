//! Attribution of rolls to the dice nodes of a formula, for highlighting which physical die fed which part of it.

use alloc::vec::Vec;
use core::ptr;

use super::matcher::Matcher;
use crate::{dice::DieRoll, formula::RollFormulaTree};

/// Rolls matched to each dice node of a formula tree.
///
/// Nodes are looked up by identity rather than by value, so two equal dice nodes in the same formula (as in
/// `1d6+1d6`) each get their own rolls.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RollMapping<'a> {
	/// Matched rolls per dice node, in formula order
	entries: Vec<(&'a RollFormulaTree, Vec<DieRoll>)>,
}

impl<'a> RollMapping<'a> {
	/// Rolls matched to the given node, or `None` if the node didn't match any roll (or isn't part of the mapped
	/// tree).
	#[must_use]
	pub fn get(&self, node: &RollFormulaTree) -> Option<&[DieRoll]> {
		self.entries
			.iter()
			.find(|(entry, _)| ptr::eq(*entry, node))
			.map(|(_, rolls)| rolls.as_slice())
	}

	/// Iterates over the dice nodes that matched at least one roll, in formula order.
	pub fn iter(&self) -> impl Iterator<Item = (&'a RollFormulaTree, &[DieRoll])> + '_ {
		self.entries
			.iter()
			.map(|(node, rolls)| (*node, rolls.as_slice()))
	}

	/// Number of dice nodes that matched at least one roll.
	#[must_use]
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	/// Checks whether no dice node matched any roll.
	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}
}

/// Matches rolls to every dice node of a formula, using the same first-match rules as evaluation.
///
/// Unlike evaluation, this never gives up: nodes that are only partially matched still get the rolls they could
/// claim, so a UI can show progress while rolls are arriving. A `d100` node lists its `d00` and `d10` rolls
/// interleaved.
///
/// # Examples
/// ```
/// use roll_formula::{dice::{DieRoll, DieType}, eval::map_formula_to_rolls, formula::RollFormulaTree, parse};
///
/// let tree = parse("2d6+1d20")?;
/// let rolls = [DieRoll::new(DieType::D20, 12), DieRoll::new(DieType::D6, 5)];
/// let mapping = map_formula_to_rolls(&tree, &rolls);
///
/// let RollFormulaTree::Operation { left, right, .. } = &tree else { unreachable!() };
/// assert_eq!(mapping.get(left), Some(&[DieRoll::new(DieType::D6, 5)][..]));
/// assert_eq!(mapping.get(right), Some(&[DieRoll::new(DieType::D20, 12)][..]));
/// # Ok::<(), roll_formula::parse::Error>(())
/// ```
#[must_use]
pub fn map_formula_to_rolls<'a>(tree: &'a RollFormulaTree, rolls: &[DieRoll]) -> RollMapping<'a> {
	let mut matcher = Matcher::new(rolls);
	let mut mapping = RollMapping::default();
	collect(tree, &mut matcher, &mut mapping);
	mapping
}

/// Walks the tree in evaluation order, recording the rolls each dice node claims.
fn collect<'a>(tree: &'a RollFormulaTree, matcher: &mut Matcher<'_>, mapping: &mut RollMapping<'a>) {
	match tree {
		RollFormulaTree::Constant(..) => {}
		RollFormulaTree::Dice { die_type, count } => {
			let taken = matcher.take_dice(*die_type, *count);
			if !taken.is_empty() {
				let rolls = taken.into_iter().map(|index| matcher.roll(index)).collect();
				mapping.entries.push((tree, rolls));
			}
		}
		RollFormulaTree::Modifier { groups, .. } => {
			for group in groups {
				collect(group, matcher, mapping);
			}
		}
		RollFormulaTree::Operation { left, right, .. } => {
			collect(left, matcher, mapping);
			collect(right, matcher, mapping);
		}
	}
}
