//! Parsing of roll notation into a [`RollFormulaTree`].
//!
//! Notation grammar (case-insensitive):
//! ```text
//! expr      := additive
//! additive  := mult (("+"|"-") mult)*
//! mult      := modified (("*"|"/") modified)*
//! modified  := primary [modifier]
//! primary   := constant | dice | "(" expr ")" | "{" expr ("," expr)* "}"
//! dice      := [count] "d" (sides | "F")
//! modifier  := ("k"|"d")("h"|"l") [count]
//! constant  := digits
//! ```

pub mod lexer;
pub mod parser;

use core::str::FromStr;

pub use self::{
	lexer::{tokenize, tokenize_tolerant, LexError, Token, TokenKind},
	parser::{Parser, SyntaxError, SyntaxErrorKind},
};
use crate::formula::RollFormulaTree;

/// Parses roll notation into a formula tree.
///
/// # Errors
/// If the notation contains an unrecognized character or an invalid token, a [`Error::Lex`] is returned. If the
/// tokens don't form a valid formula, a [`Error::Syntax`] is returned.
///
/// # Examples
/// ```
/// use roll_formula::{dice::DieType, formula::{ArithOp, ModifierKind, RollFormulaTree}, parse};
///
/// let tree = parse("2d20kh1 + 1d4 - 3")?;
/// assert_eq!(
/// 	tree,
/// 	RollFormulaTree::operation(
/// 		ArithOp::Sub,
/// 		RollFormulaTree::operation(
/// 			ArithOp::Add,
/// 			RollFormulaTree::modifier(ModifierKind::KeepHighest, 1, vec![RollFormulaTree::dice(DieType::D20, 2)]),
/// 			RollFormulaTree::dice(DieType::D4, 1),
/// 		),
/// 		RollFormulaTree::constant(3),
/// 	)
/// );
///
/// assert!(parse("(2d6").is_err());
/// # Ok::<(), roll_formula::parse::Error>(())
/// ```
pub fn parse(notation: &str) -> Result<RollFormulaTree, Error> {
	let tokens = tokenize(notation)?;
	Ok(Parser::new(&tokens, notation.chars().count()).parse()?)
}

impl FromStr for RollFormulaTree {
	type Err = Error;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		parse(s)
	}
}

/// Error that can occur while parsing notation
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
	/// The notation contains text that isn't a valid token.
	#[error("invalid notation: {0}")]
	Lex(#[from] LexError),

	/// The tokens don't form a valid formula.
	#[error("invalid formula: {0}")]
	Syntax(#[from] SyntaxError),
}

impl Error {
	/// 0-based character offset of the problem in the notation, for highlighting.
	#[must_use]
	pub const fn position(&self) -> usize {
		match self {
			Self::Lex(err) => err.position,
			Self::Syntax(err) => err.position,
		}
	}

	/// Number of characters to highlight starting at [`Self::position()`] (at least 1).
	#[must_use]
	pub fn highlight_len(&self) -> usize {
		match self {
			Self::Lex(err) => err.content.chars().count().max(1),
			Self::Syntax(..) => 1,
		}
	}
}
