//! Matching of formula dice against a pool of physical rolls, and resolution of formula values from those matches.
//!
//! Rolls are referred to by their index in the pool's backing slice, so that two rolls with the same die type and
//! value stay distinguishable and no physical roll is ever attributed to two dice nodes.

use alloc::{vec, vec::Vec};

use crate::{
	dice::{DieRoll, DieType},
	formula::{ModifierKind, RollFormulaTree},
};

/// A resolved (sub-)formula, with rolls referred to by index
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Resolved {
	/// Computed value
	pub(crate) value: f64,

	/// Rolls consumed but excluded from the value by a keep/drop modifier
	pub(crate) dropped: Vec<usize>,
}

/// One rankable candidate of a keep/drop modifier: a roll, a d00+d10 pair, or a whole group
#[derive(Debug)]
struct Candidate {
	/// Value used for ranking
	value: f64,

	/// Whether the value counts toward the sum when kept (excluded rolls don't)
	counted: bool,

	/// Every roll backing the candidate, dropped along with it if it loses the ranking
	rolls: Vec<usize>,

	/// Rolls the candidate itself already dropped
	dropped: Vec<usize>,
}

/// Working state of one evaluation attempt over a roll pool
#[derive(Debug, Clone)]
pub(crate) struct Matcher<'r> {
	/// Every roll of the pool, including already-matched ones
	rolls: &'r [DieRoll],

	/// Indices of rolls that haven't been matched yet, in pool order
	available: Vec<usize>,

	/// Rolls that count as zero while still being consumed (per index)
	excluded: Vec<bool>,
}

impl<'r> Matcher<'r> {
	/// Creates a matcher with every roll available and none excluded.
	pub(crate) fn new(rolls: &'r [DieRoll]) -> Self {
		Self {
			rolls,
			available: (0..rolls.len()).collect(),
			excluded: vec![false; rolls.len()],
		}
	}

	/// Indices of the rolls that haven't been matched, in pool order.
	pub(crate) fn available(&self) -> &[usize] {
		&self.available
	}

	/// Roll at the given index.
	pub(crate) fn roll(&self, index: usize) -> DieRoll {
		self.rolls[index]
	}

	/// Removes and returns the first available roll that can stand in for `die_type`.
	fn take_first(&mut self, die_type: DieType) -> Option<usize> {
		let rolls = self.rolls;
		let pos = self
			.available
			.iter()
			.position(|&index| die_type.accepts(rolls[index].die_type))?;
		Some(self.available.remove(pos))
	}

	/// Takes up to `count` matching rolls for a dice node, first match in pool order.
	///
	/// A `d100` request takes a `d00` and a `d10` per die, and only stops early once neither is left, so the result
	/// may hold an incomplete pair. Anything short of `count` complete matches leaves the node unresolved; the rolls
	/// taken here stay taken for the rest of the attempt.
	pub(crate) fn take_dice(&mut self, die_type: DieType, count: u32) -> Vec<usize> {
		let mut taken = Vec::new();
		for _ in 0..count {
			if die_type == DieType::D100 {
				let tens = self.take_first(DieType::D00);
				let units = self.take_first(DieType::D10);
				if tens.is_none() && units.is_none() {
					break;
				}
				taken.extend(tens);
				taken.extend(units);
			} else {
				match self.take_first(die_type) {
					Some(index) => taken.push(index),
					None => break,
				}
			}
		}

		#[cfg(feature = "logging")]
		log::trace!("matched {} of {count} {die_type} roll(s)", taken.len());

		taken
	}

	/// Matches a dice node and splits the result into individually rankable candidates, or `None` if there aren't
	/// enough rolls.
	fn dice_candidates(&mut self, die_type: DieType, count: u32) -> Option<Vec<Candidate>> {
		let taken = self.take_dice(die_type, count);
		let expected = usize::try_from(count).ok()?;

		if die_type != DieType::D100 {
			if taken.len() != expected {
				return None;
			}
			return Some(
				taken
					.into_iter()
					.map(|index| Candidate {
						value: f64::from(self.rolls[index].value),
						counted: !self.excluded[index],
						rolls: vec![index],
						dropped: Vec::new(),
					})
					.collect(),
			);
		}

		let (tens, units): (Vec<usize>, Vec<usize>) = taken
			.into_iter()
			.partition(|&index| self.rolls[index].die_type == DieType::D00);
		if tens.len() != expected || units.len() != expected {
			return None;
		}
		Some(
			tens.into_iter()
				.zip(units)
				.map(|(t, u)| Candidate {
					value: f64::from(percentile(self.rolls[t].value, self.rolls[u].value)),
					counted: !self.excluded[t] && !self.excluded[u],
					rolls: vec![t, u],
					dropped: Vec::new(),
				})
				.collect(),
		)
	}

	/// Resolves a formula tree against the available rolls, consuming the rolls it matches.
	/// Returns `None` when some required rolls haven't arrived yet.
	pub(crate) fn resolve(&mut self, tree: &RollFormulaTree) -> Option<Resolved> {
		match tree {
			RollFormulaTree::Constant(value) => Some(Resolved {
				value: f64::from(*value),
				dropped: Vec::new(),
			}),

			RollFormulaTree::Dice { die_type, count } => {
				let candidates = self.dice_candidates(*die_type, *count)?;
				Some(Resolved {
					value: candidates
						.iter()
						.filter(|candidate| candidate.counted)
						.map(|candidate| candidate.value)
						.sum(),
					dropped: Vec::new(),
				})
			}

			RollFormulaTree::Modifier { kind, count, groups } => match groups.as_slice() {
				[] => Some(Resolved {
					value: 0.0,
					dropped: Vec::new(),
				}),
				[RollFormulaTree::Dice { die_type, count: dice_count }] => {
					let candidates = self.dice_candidates(*die_type, *dice_count)?;
					Some(select(*kind, *count, candidates))
				}
				[group] => self.resolve_nested(*kind, *count, group),
				groups => {
					let mut candidates = Vec::with_capacity(groups.len());
					for group in groups {
						let before = self.available.clone();
						let resolved = self.resolve(group)?;
						candidates.push(Candidate {
							value: resolved.value,
							counted: true,
							rolls: self.consumed_since(&before),
							dropped: resolved.dropped,
						});
					}
					Some(select(*kind, *count, candidates))
				}
			},

			RollFormulaTree::Operation { operator, left, right } => {
				let left = self.resolve(left)?;
				let right = self.resolve(right)?;
				let mut dropped = left.dropped;
				dropped.extend(right.dropped);
				Some(Resolved {
					value: operator.apply(left.value, right.value),
					dropped,
				})
			}
		}
	}

	/// Resolves a modifier over a single group that isn't a plain dice node, e.g. `{2d6+1}kh1`.
	///
	/// This takes two passes: the first learns which leaf rolls the group consumes, the keep/drop rule then ranks
	/// those rolls (ignoring any the group dropped itself), and the second pass recomputes the group from the same
	/// starting pool with every non-kept roll excluded, so that the group's own arithmetic only sees kept rolls.
	fn resolve_nested(&mut self, kind: ModifierKind, count: u32, group: &RollFormulaTree) -> Option<Resolved> {
		let before = self.available.clone();
		let first = self.resolve(group)?;
		let used = self.consumed_since(&before);

		let rolls = self.rolls;
		let mut candidates = used
			.iter()
			.copied()
			.filter(|index| !first.dropped.contains(index))
			.collect::<Vec<_>>();
		candidates.sort_by_key(|&index| rolls[index].value);
		let kept = candidates
			.get(kind.kept_range(count, candidates.len()))
			.unwrap_or_default();

		let mut rerun = Matcher {
			rolls,
			available: before.clone(),
			excluded: self.excluded.clone(),
		};
		for &index in &before {
			if !kept.contains(&index) {
				rerun.excluded[index] = true;
			}
		}
		// Same pool and same tree, so the second pass matches the same rolls as the first
		let value = rerun.resolve(group).map_or(0.0, |resolved| resolved.value);

		Some(Resolved {
			value,
			dropped: used.into_iter().filter(|index| !kept.contains(index)).collect(),
		})
	}

	/// Rolls that were available in `before` but have been matched since, in pool order.
	fn consumed_since(&self, before: &[usize]) -> Vec<usize> {
		before
			.iter()
			.copied()
			.filter(|index| !self.available.contains(index))
			.collect()
	}
}

/// Applies a keep/drop rule to a set of candidates.
///
/// Candidates are ranked by ascending value (ties keep their matching order), the kept ones are summed, and every
/// roll backing a non-kept candidate is dropped. Rolls that kept candidates dropped themselves are passed along.
fn select(kind: ModifierKind, count: u32, mut candidates: Vec<Candidate>) -> Resolved {
	candidates.sort_by(|a, b| a.value.total_cmp(&b.value));
	let kept = kind.kept_range(count, candidates.len());

	let mut value = 0.0;
	let mut dropped = Vec::new();
	for (i, candidate) in candidates.into_iter().enumerate() {
		if kept.contains(&i) {
			if candidate.counted {
				value += candidate.value;
			}
			dropped.extend(candidate.dropped);
		} else {
			dropped.extend(candidate.rolls);
		}
	}

	Resolved { value, dropped }
}

/// Combines a d00 (tens) and a d10 (units) roll into a percentile value, where 00 and 0 make 100.
#[must_use]
pub(crate) const fn percentile(tens: i32, units: i32) -> i32 {
	match tens.saturating_add(units) {
		0 => 100,
		value => value,
	}
}
