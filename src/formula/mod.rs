//! The expression tree shared by the parser, the evaluator and the auxiliary views.

pub mod simplify;

use alloc::{boxed::Box, vec::Vec};
use core::{fmt, ops::Range};

pub use self::simplify::SimplifiedRollFormula;
use crate::dice::DieType;

/// Immutable expression tree of a roll formula.
///
/// A tree produced by the parser never contains a bare list: every brace-delimited list is wrapped by a
/// [`Self::Modifier`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum RollFormulaTree {
	/// Standalone integer
	Constant(i32),

	/// Request for `count` dice of one type
	Dice {
		/// Type of the dice to roll
		die_type: DieType,

		/// Number of dice to roll
		count: u32,
	},

	/// Keep/drop rule applied to the rolls of one dice group, or across the totals of several groups
	Modifier {
		/// Which rolls to keep or drop
		kind: ModifierKind,

		/// Number of rolls the rule applies to
		count: u32,

		/// Sub-trees the rule ranks. With a single group, the group's individual rolls are ranked; with several
		/// groups, each group's total is ranked as one item.
		groups: Vec<Self>,
	},

	/// Binary arithmetic between two sub-trees
	Operation {
		/// Operator to apply
		operator: ArithOp,

		/// Left-hand side, which has first claim on ambiguous rolls
		left: Box<Self>,

		/// Right-hand side
		right: Box<Self>,
	},
}

impl RollFormulaTree {
	/// Creates a constant node.
	#[must_use]
	#[inline]
	pub const fn constant(value: i32) -> Self {
		Self::Constant(value)
	}

	/// Creates a dice node.
	#[must_use]
	#[inline]
	pub const fn dice(die_type: DieType, count: u32) -> Self {
		Self::Dice { die_type, count }
	}

	/// Creates a modifier node over the given groups.
	#[must_use]
	#[inline]
	pub const fn modifier(kind: ModifierKind, count: u32, groups: Vec<Self>) -> Self {
		Self::Modifier { kind, count, groups }
	}

	/// Creates an operation node.
	#[must_use]
	pub fn operation(operator: ArithOp, left: Self, right: Self) -> Self {
		Self::Operation {
			operator,
			left: Box::new(left),
			right: Box::new(right),
		}
	}

	/// Checks whether the formula is deterministic (needs no rolls at all to be resolved).
	///
	/// # Examples
	/// ```
	/// use roll_formula::parse;
	///
	/// assert!(parse("(3+4)*2")?.is_deterministic());
	/// assert!(parse("{5}kh1")?.is_deterministic());
	/// assert!(!parse("1d20+5")?.is_deterministic());
	/// assert!(parse("0d6+1")?.is_deterministic());
	/// # Ok::<(), roll_formula::parse::Error>(())
	/// ```
	#[must_use]
	pub fn is_deterministic(&self) -> bool {
		match self {
			Self::Constant(..) => true,
			Self::Dice { count, .. } => *count == 0,
			Self::Modifier { groups, .. } => groups.iter().all(Self::is_deterministic),
			Self::Operation { left, right, .. } => left.is_deterministic() && right.is_deterministic(),
		}
	}

	/// Number of physical dice that must be rolled to resolve the formula. A `d100` counts as two (a `d00` and a `d10`).
	///
	/// # Examples
	/// ```
	/// use roll_formula::parse;
	///
	/// assert_eq!(parse("{2d6, 1d8}kh1 + 3")?.dice_count(), 3);
	/// assert_eq!(parse("1d100")?.dice_count(), 2);
	/// # Ok::<(), roll_formula::parse::Error>(())
	/// ```
	#[must_use]
	pub fn dice_count(&self) -> u64 {
		match self {
			Self::Constant(..) => 0,
			Self::Dice { die_type, count } => {
				let per_die = if *die_type == DieType::D100 { 2 } else { 1 };
				u64::from(*count).saturating_mul(per_die)
			}
			Self::Modifier { groups, .. } => groups
				.iter()
				.map(Self::dice_count)
				.fold(0, u64::saturating_add),
			Self::Operation { left, right, .. } => left.dice_count().saturating_add(right.dice_count()),
		}
	}

	/// Binding strength of the node when rendered as notation (higher binds tighter).
	const fn precedence(&self) -> u8 {
		match self {
			Self::Operation { operator, .. } => operator.precedence(),
			Self::Constant(..) | Self::Dice { .. } | Self::Modifier { .. } => 3,
		}
	}
}

impl fmt::Display for RollFormulaTree {
	/// Renders the tree as roll notation. Parsing the output yields a structurally equal tree for any tree the parser
	/// can produce. Any other tree renders to notation that parses and evaluates to the same value.
	///
	/// Parentheses are only added where the tree's shape differs from what precedence and left-associativity would
	/// produce. Modifiers use brace syntax unless they apply to a single dice node. A negative constant on the right
	/// of an addition or subtraction is folded into the operator. Elsewhere it's written as a subtraction from zero,
	/// since the notation has no unary minus.
	///
	/// # Examples
	/// ```
	/// use roll_formula::{dice::DieType, formula::{ArithOp, RollFormulaTree}, parse};
	///
	/// assert_eq!(parse("d20 kh + 3")?.to_string(), "1d20kh1+3");
	/// assert_eq!(parse("{2d6 + 1}kh1")?.to_string(), "{2d6+1}kh1");
	/// assert_eq!(parse("(1d6 + 2) * 3")?.to_string(), "(1d6+2)*3");
	///
	/// let tree = RollFormulaTree::operation(
	/// 	ArithOp::Add,
	/// 	RollFormulaTree::dice(DieType::D20, 1),
	/// 	RollFormulaTree::constant(-3),
	/// );
	/// assert_eq!(tree.to_string(), "1d20-3");
	///
	/// let tree = RollFormulaTree::operation(
	/// 	ArithOp::Mul,
	/// 	RollFormulaTree::dice(DieType::D20, 1),
	/// 	RollFormulaTree::constant(-3),
	/// );
	/// assert_eq!(tree.to_string(), "1d20*(0-3)");
	/// # Ok::<(), roll_formula::parse::Error>(())
	/// ```
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Constant(value) if *value < 0 => match value.checked_neg() {
				Some(positive) => write!(f, "(0-{positive})"),
				None => write!(f, "(0-{}-1)", i32::MAX),
			},
			Self::Constant(value) => write!(f, "{value}"),
			Self::Dice { die_type, count } => write!(f, "{count}{die_type}"),

			Self::Modifier { kind, count, groups } => {
				if let [group @ Self::Dice { .. }] = groups.as_slice() {
					write!(f, "{group}")?;
				} else {
					f.write_str("{")?;
					for (i, group) in groups.iter().enumerate() {
						if i > 0 {
							f.write_str(",")?;
						}
						write!(f, "{group}")?;
					}
					f.write_str("}")?;
				}
				write!(f, "{kind}{count}")
			}

			Self::Operation { operator, left, right } => {
				let prec = operator.precedence();
				if left.precedence() < prec {
					write!(f, "({left})")?;
				} else {
					write!(f, "{left}")?;
				}

				match (operator, right.as_ref()) {
					(ArithOp::Add | ArithOp::Sub, Self::Constant(value)) if *value < 0 && *value > i32::MIN => {
						let flipped = if *operator == ArithOp::Add { ArithOp::Sub } else { ArithOp::Add };
						write!(f, "{flipped}{}", value.unsigned_abs())
					}
					_ if right.precedence() <= prec => write!(f, "{operator}({right})"),
					_ => write!(f, "{operator}{right}"),
				}
			}
		}
	}
}

/// Arithmetic operators usable between sub-trees.
///
/// The `,` list separator has no variant here: it only exists in the token stream and is consumed by the parser
/// when building brace lists, so it can never reach arithmetic evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[expect(clippy::exhaustive_enums, reason = "The notation has exactly these operators")]
pub enum ArithOp {
	/// Addition (`+`)
	Add,

	/// Subtraction (`-`)
	Sub,

	/// Multiplication (`*`)
	Mul,

	/// Division (`/`)
	Div,
}

impl ArithOp {
	/// Applies the operator to two resolved values.
	///
	/// Division by zero doesn't fault: `a / 0` yields `a` unchanged so that no `NaN` or infinity ever reaches a
	/// display.
	///
	/// # Examples
	/// ```
	/// use roll_formula::formula::ArithOp;
	///
	/// assert_eq!(ArithOp::Div.apply(7.0, 2.0), 3.5);
	/// assert_eq!(ArithOp::Div.apply(6.0, 0.0), 6.0);
	/// ```
	#[must_use]
	pub fn apply(self, left: f64, right: f64) -> f64 {
		match self {
			Self::Add => left + right,
			Self::Sub => left - right,
			Self::Mul => left * right,
			Self::Div if right == 0.0 => left,
			Self::Div => left / right,
		}
	}

	/// Notation symbol of the operator.
	#[must_use]
	pub const fn symbol(self) -> char {
		match self {
			Self::Add => '+',
			Self::Sub => '-',
			Self::Mul => '*',
			Self::Div => '/',
		}
	}

	/// Binding strength of the operator (multiplicative binds tighter than additive).
	const fn precedence(self) -> u8 {
		match self {
			Self::Add | Self::Sub => 1,
			Self::Mul | Self::Div => 2,
		}
	}
}

impl fmt::Display for ArithOp {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.symbol())
	}
}

/// Keep/drop rules, named like the [Roll20 roll modifiers](https://wiki.roll20.net/Dice_Reference#Roll_Modifiers).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[expect(clippy::exhaustive_enums, reason = "The notation has exactly these modifiers")]
pub enum ModifierKind {
	/// Keeps the highest x rolls (`kh`)
	KeepHighest,

	/// Keeps the lowest x rolls (`kl`)
	KeepLowest,

	/// Drops the highest x rolls (`dh`)
	DropHighest,

	/// Drops the lowest x rolls (`dl`)
	DropLowest,
}

impl ModifierKind {
	/// Maps a two-letter modifier marker (`kh`, `kl`, `dh`, `dl`) to its kind.
	#[must_use]
	pub fn from_marker(marker: &str) -> Option<Self> {
		Some(match marker {
			"kh" => Self::KeepHighest,
			"kl" => Self::KeepLowest,
			"dh" => Self::DropHighest,
			"dl" => Self::DropLowest,
			_ => return None,
		})
	}

	/// Notation marker of the modifier.
	#[must_use]
	pub const fn marker(self) -> &'static str {
		match self {
			Self::KeepHighest => "kh",
			Self::KeepLowest => "kl",
			Self::DropHighest => "dh",
			Self::DropLowest => "dl",
		}
	}

	/// Index range of the kept candidates, given `len` candidates sorted by ascending value.
	/// `count` is clamped to the number of candidates.
	///
	/// # Examples
	/// ```
	/// use roll_formula::formula::ModifierKind;
	///
	/// // Sorted rolls: [1, 3, 7, 9]
	/// assert_eq!(ModifierKind::KeepHighest.kept_range(2, 4), 2..4);
	/// assert_eq!(ModifierKind::DropLowest.kept_range(2, 4), 2..4);
	/// assert_eq!(ModifierKind::KeepLowest.kept_range(1, 4), 0..1);
	/// assert_eq!(ModifierKind::DropHighest.kept_range(1, 4), 0..3);
	/// assert_eq!(ModifierKind::KeepHighest.kept_range(10, 4), 0..4);
	/// ```
	#[must_use]
	pub fn kept_range(self, count: u32, len: usize) -> Range<usize> {
		let k = usize::try_from(count).map_or(len, |count| count.min(len));
		match self {
			Self::KeepHighest => len.saturating_sub(k)..len,
			Self::KeepLowest => 0..k,
			Self::DropHighest => 0..len.saturating_sub(k),
			Self::DropLowest => k..len,
		}
	}
}

impl fmt::Display for ModifierKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.marker())
	}
}
