//! Recursive-descent parser building a [`RollFormulaTree`] from a token sequence.
//!
//! Precedence levels, tightest first:
//! 1. primary: constant, dice, `( expr )`, or a brace list `{ expr, expr, ... }`
//! 2. modifier: a primary followed by an optional keep/drop modifier
//! 3. multiplicative: left-associative `*` and `/`
//! 4. additive: left-associative `+` and `-`

use alloc::{vec, vec::Vec};

use super::lexer::{Grouping, Operator, Token, TokenKind};
use crate::formula::{ArithOp, RollFormulaTree};

/// Error produced when a token sequence doesn't form a valid formula
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("{kind} at position {position}")]
#[non_exhaustive]
pub struct SyntaxError {
	/// What went wrong
	pub kind: SyntaxErrorKind,

	/// 0-based character offset of the offending token, or the length of the notation when it ended prematurely
	pub position: usize,
}

/// Kinds of [`SyntaxError`]
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SyntaxErrorKind {
	/// A modifier follows something other than a dice literal or a brace list.
	#[error("Modifier must be applied to a dice roll")]
	ModifierWithoutDice,

	/// A brace list was used without a modifier consuming it.
	#[error("Expected a single expression, got a list")]
	UnexpectedList,

	/// A closing delimiter is missing.
	#[error("expected '{0}'")]
	Expected(Grouping),

	/// A token appeared where an expression was expected.
	#[error("unexpected {0}")]
	UnexpectedToken(TokenKind),

	/// The notation ended where an expression was expected.
	#[error("unexpected end of formula")]
	UnexpectedEnd,

	/// Tokens remain after a complete formula.
	#[error("unexpected trailing {0}")]
	TrailingToken(TokenKind),
}

/// Result type of the parser's internal productions
type PResult<T = RollFormulaTree> = Result<T, SyntaxError>;

/// Output of the primary level: either a single expression or a brace list awaiting a modifier
#[derive(Debug)]
enum Primary {
	/// Any single expression
	Single(RollFormulaTree),

	/// Elements of a brace list
	List(Vec<RollFormulaTree>),
}

/// Recursive-descent parser over a token slice
#[derive(Debug, Clone)]
pub struct Parser<'t> {
	/// Tokens to parse
	tokens: &'t [Token],

	/// Index of the next token
	pos: usize,

	/// Position reported for errors at the end of input
	end: usize,
}

impl<'t> Parser<'t> {
	/// Creates a parser for the given tokens. `end` is the position to report when the input ends prematurely,
	/// usually the character length of the notation.
	#[must_use]
	pub const fn new(tokens: &'t [Token], end: usize) -> Self {
		Self { tokens, pos: 0, end }
	}

	/// Parses the tokens as one complete formula.
	///
	/// # Errors
	/// If the tokens don't form exactly one valid expression, an error describing the first problem is returned.
	/// No partial tree is ever produced.
	pub fn parse(mut self) -> PResult {
		let expr = self.expression()?;
		match self.peek() {
			Some(token) => Err(SyntaxError {
				kind: SyntaxErrorKind::TrailingToken(token.kind),
				position: token.position,
			}),
			None => Ok(expr),
		}
	}

	/// Parses a full expression (the additive level) starting at the current token.
	///
	/// # Errors
	/// If the tokens at the current position don't form a valid expression.
	pub fn expression(&mut self) -> PResult {
		self.additive()
	}

	/// Looks at the next token without consuming it.
	fn peek(&self) -> Option<&'t Token> {
		self.tokens.get(self.pos)
	}

	/// Consumes the next token.
	fn advance(&mut self) -> Option<&'t Token> {
		let token = self.tokens.get(self.pos)?;
		self.pos = self.pos.saturating_add(1);
		Some(token)
	}

	/// Consumes the next token if it's the given operator.
	fn eat_operator(&mut self, op: Operator) -> bool {
		let matches = self
			.peek()
			.is_some_and(|token| token.kind == TokenKind::Operator(op));
		if matches {
			self.pos = self.pos.saturating_add(1);
		}
		matches
	}

	/// Consumes the next token if it's an arithmetic operator accepted by `filter`.
	fn eat_arith(&mut self, filter: fn(ArithOp) -> bool) -> Option<ArithOp> {
		let op = match self.peek()?.kind {
			TokenKind::Operator(op) => op.arith().filter(|op| filter(*op))?,
			_ => return None,
		};
		self.pos = self.pos.saturating_add(1);
		Some(op)
	}

	/// Consumes the expected closing delimiter.
	fn expect(&mut self, grouping: Grouping) -> PResult<()> {
		match self.peek() {
			Some(token) if token.kind == TokenKind::Grouping(grouping) => {
				self.pos = self.pos.saturating_add(1);
				Ok(())
			}
			Some(token) => Err(SyntaxError {
				kind: SyntaxErrorKind::Expected(grouping),
				position: token.position,
			}),
			None => Err(SyntaxError {
				kind: SyntaxErrorKind::Expected(grouping),
				position: self.end,
			}),
		}
	}

	/// additive := multiplicative (("+" | "-") multiplicative)*
	fn additive(&mut self) -> PResult {
		let mut expr = self.multiplicative()?;
		while let Some(op) = self.eat_arith(|op| matches!(op, ArithOp::Add | ArithOp::Sub)) {
			let right = self.multiplicative()?;
			expr = RollFormulaTree::operation(op, expr, right);
		}
		Ok(expr)
	}

	/// multiplicative := modified (("*" | "/") modified)*
	fn multiplicative(&mut self) -> PResult {
		let mut expr = self.modified()?;
		while let Some(op) = self.eat_arith(|op| matches!(op, ArithOp::Mul | ArithOp::Div)) {
			let right = self.modified()?;
			expr = RollFormulaTree::operation(op, expr, right);
		}
		Ok(expr)
	}

	/// modified := primary [modifier]
	fn modified(&mut self) -> PResult {
		let (primary, position) = self.primary()?;

		if let Some(&Token {
			kind: TokenKind::Modifier { kind, count },
			position: modifier_position,
			..
		}) = self.peek()
		{
			self.pos = self.pos.saturating_add(1);
			let groups = match primary {
				Primary::List(nodes) => nodes,
				Primary::Single(dice @ RollFormulaTree::Dice { .. }) => vec![dice],
				Primary::Single(..) => {
					return Err(SyntaxError {
						kind: SyntaxErrorKind::ModifierWithoutDice,
						position: modifier_position,
					});
				}
			};
			return Ok(RollFormulaTree::modifier(kind, count, groups));
		}

		match primary {
			Primary::Single(node) => Ok(node),
			Primary::List(..) => Err(SyntaxError {
				kind: SyntaxErrorKind::UnexpectedList,
				position,
			}),
		}
	}

	/// primary := constant | dice | "(" expression ")" | "{" expression ("," expression)* "}"
	///
	/// Also returns the position of the primary's first token.
	fn primary(&mut self) -> PResult<(Primary, usize)> {
		let Some(token) = self.advance() else {
			return Err(SyntaxError {
				kind: SyntaxErrorKind::UnexpectedEnd,
				position: self.end,
			});
		};

		let primary = match token.kind {
			TokenKind::Constant(value) => Primary::Single(RollFormulaTree::constant(value)),
			TokenKind::Dice { die_type, count } => Primary::Single(RollFormulaTree::dice(die_type, count)),

			TokenKind::Grouping(Grouping::OpenParen) => {
				let node = self.expression()?;
				self.expect(Grouping::CloseParen)?;
				Primary::Single(node)
			}

			TokenKind::Grouping(Grouping::OpenBrace) => {
				let mut nodes = vec![self.expression()?];
				while self.eat_operator(Operator::Comma) {
					nodes.push(self.expression()?);
				}
				self.expect(Grouping::CloseBrace)?;
				Primary::List(nodes)
			}

			TokenKind::Modifier { .. } => {
				return Err(SyntaxError {
					kind: SyntaxErrorKind::ModifierWithoutDice,
					position: token.position,
				});
			}

			kind @ (TokenKind::Operator(..) | TokenKind::Grouping(..)) => {
				return Err(SyntaxError {
					kind: SyntaxErrorKind::UnexpectedToken(kind),
					position: token.position,
				});
			}
		};

		Ok((primary, token.position))
	}
}
