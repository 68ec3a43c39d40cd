//! Tokenization of roll notation.
//!
//! At every position, the token rules are tried in a fixed order: whitespace, operator, grouping, modifier, dice,
//! then constant. Modifiers must come before dice so that a `dh`/`dl` marker isn't taken as the start of a dice
//! literal.

use alloc::{
	string::{String, ToString},
	vec::Vec,
};
use core::fmt;

use chumsky::prelude::*;

use crate::{
	dice::DieType,
	formula::{ArithOp, ModifierKind},
};

/// A single lexed element of roll notation
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct Token {
	/// What the token is
	pub kind: TokenKind,

	/// 0-based character offset of the token in the notation
	pub position: usize,

	/// Raw text of the token (lowercased)
	pub content: String,
}

impl fmt::Display for Token {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.content)
	}
}

/// Kinds of [`Token`] along with their decoded values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum TokenKind {
	/// Arithmetic operator or list separator
	Operator(Operator),

	/// Parenthesis or brace
	Grouping(Grouping),

	/// Integer literal
	Constant(i32),

	/// Dice literal such as `2d20` or `dF`. The count defaults to 1 when omitted.
	Dice {
		/// Type of the dice
		die_type: DieType,

		/// Number of dice
		count: u32,
	},

	/// Keep/drop modifier such as `kh` or `dl2`. The count defaults to 1 when omitted.
	Modifier {
		/// Which rule the modifier applies
		kind: ModifierKind,

		/// Number of rolls the rule applies to
		count: u32,
	},
}

impl fmt::Display for TokenKind {
	/// Describes the kind of token, for use in error messages.
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Operator(op) => write!(f, "operator '{op}'"),
			Self::Grouping(grouping) => write!(f, "'{grouping}'"),
			Self::Constant(..) => f.write_str("constant"),
			Self::Dice { .. } => f.write_str("dice"),
			Self::Modifier { .. } => f.write_str("modifier"),
		}
	}
}

/// Operators that can appear between expressions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[expect(clippy::exhaustive_enums, reason = "The notation has exactly these operators")]
pub enum Operator {
	/// `+`
	Add,

	/// `-`
	Sub,

	/// `*`
	Mul,

	/// `/`
	Div,

	/// `,`, which only separates the elements of a brace list
	Comma,
}

impl Operator {
	/// Arithmetic counterpart of the operator, or `None` for the list separator.
	#[must_use]
	pub const fn arith(self) -> Option<ArithOp> {
		match self {
			Self::Add => Some(ArithOp::Add),
			Self::Sub => Some(ArithOp::Sub),
			Self::Mul => Some(ArithOp::Mul),
			Self::Div => Some(ArithOp::Div),
			Self::Comma => None,
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
			Self::Comma => ',',
		}
	}
}

impl fmt::Display for Operator {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.symbol())
	}
}

/// Grouping delimiters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[expect(clippy::exhaustive_enums, reason = "The notation has exactly these delimiters")]
pub enum Grouping {
	/// `(`
	OpenParen,

	/// `)`
	CloseParen,

	/// `{`
	OpenBrace,

	/// `}`
	CloseBrace,
}

impl Grouping {
	/// Notation symbol of the delimiter.
	#[must_use]
	pub const fn symbol(self) -> char {
		match self {
			Self::OpenParen => '(',
			Self::CloseParen => ')',
			Self::OpenBrace => '{',
			Self::CloseBrace => '}',
		}
	}
}

impl fmt::Display for Grouping {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.symbol())
	}
}

/// Error produced when notation contains text that isn't a valid token
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("{kind} at position {position}: {content:?}")]
#[non_exhaustive]
pub struct LexError {
	/// What went wrong
	pub kind: LexErrorKind,

	/// 0-based character offset of the offending text
	pub position: usize,

	/// Offending text
	pub content: String,
}

/// Kinds of [`LexError`]
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum LexErrorKind {
	/// No token rule matches the character.
	#[error("unrecognized character")]
	UnrecognizedCharacter,

	/// The dice literal has a number of sides that no die has.
	#[error("unknown die type")]
	UnknownDieType,

	/// A constant or count doesn't fit in its integer type.
	#[error("number too large")]
	NumberTooLarge,
}

/// Tokenizes roll notation, failing on the first unrecognized character.
///
/// # Errors
/// If any part of the notation isn't a valid token, the error for the first such part is returned.
///
/// # Examples
/// ```
/// use roll_formula::{dice::DieType, formula::ModifierKind, parse::lexer::{tokenize, TokenKind}};
///
/// let tokens = tokenize("2d20kh + 3")?;
/// let kinds = tokens.iter().map(|token| token.kind).collect::<Vec<_>>();
/// assert_eq!(kinds[0], TokenKind::Dice { die_type: DieType::D20, count: 2 });
/// assert_eq!(kinds[1], TokenKind::Modifier { kind: ModifierKind::KeepHighest, count: 1 });
/// assert_eq!(tokens[3].position, 9);
/// # Ok::<(), roll_formula::parse::lexer::LexError>(())
/// ```
pub fn tokenize(notation: &str) -> Result<Vec<Token>, LexError> {
	match tokenize_tolerant(notation) {
		(tokens, None) => Ok(tokens),
		(_, Some(err)) => Err(err),
	}
}

/// Tokenizes roll notation, stopping at the first unrecognized character.
/// Everything lexed up to that point is returned along with the error describing the offending text, so that a UI
/// can still render the valid part and highlight the rest.
///
/// # Examples
/// ```
/// use roll_formula::parse::lexer::{tokenize_tolerant, LexErrorKind};
///
/// let (tokens, err) = tokenize_tolerant("1d6 + 2 $ 4");
/// assert_eq!(tokens.len(), 3);
/// let err = err.unwrap();
/// assert_eq!(err.kind, LexErrorKind::UnrecognizedCharacter);
/// assert_eq!(err.position, 8);
/// assert_eq!(err.content, "$");
/// ```
#[must_use]
pub fn tokenize_tolerant(notation: &str) -> (Vec<Token>, Option<LexError>) {
	let text = notation.to_ascii_lowercase();
	let (raw_tokens, unrecognized) = match lexer().parse(text.as_str()).into_result() {
		Ok(output) => output,
		Err(errs) => {
			// The lexer consumes any trailing input itself, so this is only a fallback
			let start = errs.first().map_or(0, |err| err.span().start);
			return (
				Vec::new(),
				Some(LexError {
					kind: LexErrorKind::UnrecognizedCharacter,
					position: char_offset(&text, start),
					content: text.get(start..).unwrap_or_default().to_string(),
				}),
			);
		}
	};

	let mut tokens = Vec::with_capacity(raw_tokens.len());
	for (raw, span) in raw_tokens {
		match process_token(&text, raw, span) {
			Ok(token) => tokens.push(token),
			Err(err) => return (tokens, Some(err)),
		}
	}

	let err = unrecognized.map(|(c, span)| LexError {
		kind: LexErrorKind::UnrecognizedCharacter,
		position: char_offset(&text, span.start),
		content: c.to_string(),
	});
	(tokens, err)
}

/// Undecoded token as matched by the lexer rules
#[derive(Debug, Clone)]
enum RawToken {
	/// One of `+ - * / ,`
	Operator(char),

	/// One of `( ) { }`
	Grouping(char),

	/// `[kd][hl]` followed by optional digits
	Modifier {
		/// `k` or `d`
		action: char,

		/// `h` or `l`
		side: char,

		/// Digits after the marker
		count: Option<String>,
	},

	/// Optional digits, `d`, then digits or `f`
	Dice {
		/// Digits before the `d`
		count: Option<String>,

		/// Text after the `d`
		sides: String,
	},

	/// Digits
	Constant(String),
}

/// Parser output type with the span of each element
type Spanned<T> = (T, SimpleSpan);

/// Generates a parser for a single raw token. The order of the rules in the `choice` is significant.
fn raw_token<'src>() -> impl Parser<'src, &'src str, RawToken, extra::Err<Rich<'src, char>>> + Clone {
	let digits = text::digits(10).collect::<String>();

	let operator = one_of("+-*/,").map(RawToken::Operator);
	let grouping = one_of("(){}").map(RawToken::Grouping);
	let modifier = one_of("kd")
		.then(one_of("hl"))
		.then(digits.clone().or_not())
		.map(|((action, side), count)| RawToken::Modifier { action, side, count });
	let dice = digits
		.clone()
		.or_not()
		.then_ignore(just('d'))
		.then(digits.clone().or(just('f').to(String::from("f"))))
		.map(|(count, sides)| RawToken::Dice { count, sides });
	let constant = digits.map(RawToken::Constant);

	choice((operator, grouping, modifier, dice, constant))
}

/// Generates a parser that lexes as many raw tokens as possible, then captures the first unrecognized character (if
/// any) and ignores the rest of the input.
fn lexer<'src>(
) -> impl Parser<'src, &'src str, (Vec<Spanned<RawToken>>, Option<Spanned<char>>), extra::Err<Rich<'src, char>>> {
	let token = raw_token().map_with(|token, e| (token, e.span())).padded();
	let unrecognized = text::whitespace().ignore_then(any().map_with(|c, e| (c, e.span())));

	token
		.repeated()
		.collect::<Vec<_>>()
		.then(unrecognized.or_not())
		.then_ignore(any().repeated())
}

/// Decodes a raw token into a [`Token`].
fn process_token(text: &str, raw: RawToken, span: SimpleSpan) -> Result<Token, LexError> {
	let position = char_offset(text, span.start);
	let content = text.get(span.start..span.end).unwrap_or_default().to_string();
	let fail = |kind| LexError {
		kind,
		position,
		content: content.clone(),
	};

	let kind = match raw {
		RawToken::Operator(c) => TokenKind::Operator(match c {
			'+' => Operator::Add,
			'-' => Operator::Sub,
			'*' => Operator::Mul,
			'/' => Operator::Div,
			',' => Operator::Comma,
			_ => return Err(fail(LexErrorKind::UnrecognizedCharacter)),
		}),
		RawToken::Grouping(c) => TokenKind::Grouping(match c {
			'(' => Grouping::OpenParen,
			')' => Grouping::CloseParen,
			'{' => Grouping::OpenBrace,
			'}' => Grouping::CloseBrace,
			_ => return Err(fail(LexErrorKind::UnrecognizedCharacter)),
		}),
		RawToken::Constant(digits) => {
			TokenKind::Constant(digits.parse().map_err(|_err| fail(LexErrorKind::NumberTooLarge))?)
		}
		RawToken::Dice { count, sides } => TokenKind::Dice {
			die_type: DieType::from_sides(&sides).ok_or_else(|| fail(LexErrorKind::UnknownDieType))?,
			count: parse_count(count.as_deref()).ok_or_else(|| fail(LexErrorKind::NumberTooLarge))?,
		},
		RawToken::Modifier { action, side, count } => {
			let mut marker = String::with_capacity(2);
			marker.push(action);
			marker.push(side);
			TokenKind::Modifier {
				kind: ModifierKind::from_marker(&marker).ok_or_else(|| fail(LexErrorKind::UnrecognizedCharacter))?,
				count: parse_count(count.as_deref()).ok_or_else(|| fail(LexErrorKind::NumberTooLarge))?,
			}
		}
	};

	Ok(Token {
		kind,
		position,
		content,
	})
}

/// Parses the optional count of a dice or modifier literal, defaulting to 1 when absent.
fn parse_count(digits: Option<&str>) -> Option<u32> {
	digits.map_or(Some(1), |digits| digits.parse().ok())
}

/// Converts a byte offset in `text` to a character offset.
fn char_offset(text: &str, byte_offset: usize) -> usize {
	text.get(..byte_offset)
		.map_or(byte_offset, |prefix| prefix.chars().count())
}
