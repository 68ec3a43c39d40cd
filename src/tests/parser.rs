use crate::{
	dice::DieType,
	formula::{ArithOp, ModifierKind, RollFormulaTree},
	parse::{
		self,
		lexer::{Grouping, Operator, TokenKind},
		parse, SyntaxErrorKind,
	},
};

fn dice(count: u32, die_type: DieType) -> RollFormulaTree {
	RollFormulaTree::dice(die_type, count)
}

fn num(value: i32) -> RollFormulaTree {
	RollFormulaTree::constant(value)
}

fn op(operator: ArithOp, left: RollFormulaTree, right: RollFormulaTree) -> RollFormulaTree {
	RollFormulaTree::operation(operator, left, right)
}

fn syntax_error(notation: &str) -> (SyntaxErrorKind, usize) {
	match parse(notation).unwrap_err() {
		parse::Error::Syntax(err) => (err.kind, err.position),
		err => panic!("expected a syntax error, got {err:?}"),
	}
}

#[test]
fn constant() {
	assert_eq!(parse("42").unwrap(), num(42));
}

#[test]
fn single_dice() {
	assert_eq!(parse("3d8").unwrap(), dice(3, DieType::D8));
	assert_eq!(parse("d20").unwrap(), dice(1, DieType::D20));
}

#[test]
fn additive_is_left_associative() {
	assert_eq!(
		parse("10 - 3 - 2").unwrap(),
		op(ArithOp::Sub, op(ArithOp::Sub, num(10), num(3)), num(2))
	);
}

#[test]
fn multiplicative_binds_tighter() {
	assert_eq!(
		parse("1 + 2 * 3").unwrap(),
		op(ArithOp::Add, num(1), op(ArithOp::Mul, num(2), num(3)))
	);
	assert_eq!(
		parse("8 / 4 * 2").unwrap(),
		op(ArithOp::Mul, op(ArithOp::Div, num(8), num(4)), num(2))
	);
}

#[test]
fn parentheses_override_precedence() {
	assert_eq!(
		parse("(1d6 + 2) * 3").unwrap(),
		op(ArithOp::Mul, op(ArithOp::Add, dice(1, DieType::D6), num(2)), num(3))
	);
	assert_eq!(parse("((7))").unwrap(), num(7));
}

#[test]
fn modifier_on_dice() {
	assert_eq!(
		parse("4d6dl1").unwrap(),
		RollFormulaTree::modifier(ModifierKind::DropLowest, 1, vec![dice(4, DieType::D6)])
	);
	assert_eq!(parse("2d20kh").unwrap(), parse("2d20kh1").unwrap());
}

#[test]
fn modifier_binds_tighter_than_arithmetic() {
	assert_eq!(
		parse("2d20kh1 * 2").unwrap(),
		op(
			ArithOp::Mul,
			RollFormulaTree::modifier(ModifierKind::KeepHighest, 1, vec![dice(2, DieType::D20)]),
			num(2)
		)
	);
}

#[test]
fn modifier_on_parenthesized_dice() {
	assert_eq!(parse("(2d6)kh1").unwrap(), parse("2d6kh1").unwrap());
}

#[test]
fn modifier_on_list() {
	assert_eq!(
		parse("{2d6, 1d8 + 1}kh1").unwrap(),
		RollFormulaTree::modifier(
			ModifierKind::KeepHighest,
			1,
			vec![dice(2, DieType::D6), op(ArithOp::Add, dice(1, DieType::D8), num(1))]
		)
	);
	assert_eq!(
		parse("{2d6 + 1}kl").unwrap(),
		RollFormulaTree::modifier(
			ModifierKind::KeepLowest,
			1,
			vec![op(ArithOp::Add, dice(2, DieType::D6), num(1))]
		)
	);
}

#[test]
fn nested_lists() {
	assert_eq!(
		parse("{{1d6, 1d8}kh1, 1d10}dl1").unwrap(),
		RollFormulaTree::modifier(
			ModifierKind::DropLowest,
			1,
			vec![
				RollFormulaTree::modifier(
					ModifierKind::KeepHighest,
					1,
					vec![dice(1, DieType::D6), dice(1, DieType::D8)]
				),
				dice(1, DieType::D10),
			]
		)
	);
}

#[test]
fn modifier_without_dice() {
	assert_eq!(syntax_error("kh1"), (SyntaxErrorKind::ModifierWithoutDice, 0));
	assert_eq!(syntax_error("5kh1"), (SyntaxErrorKind::ModifierWithoutDice, 1));
	assert_eq!(syntax_error("(1d6+1)kh1"), (SyntaxErrorKind::ModifierWithoutDice, 7));
	assert_eq!(syntax_error("1d6 + dl"), (SyntaxErrorKind::ModifierWithoutDice, 6));
}

#[test]
fn list_without_modifier() {
	assert_eq!(syntax_error("{1d6, 1d8}"), (SyntaxErrorKind::UnexpectedList, 0));
	assert_eq!(syntax_error("2 + {1d6}"), (SyntaxErrorKind::UnexpectedList, 4));
}

#[test]
fn unclosed_groupings() {
	assert_eq!(syntax_error("(2d6"), (SyntaxErrorKind::Expected(Grouping::CloseParen), 4));
	assert_eq!(syntax_error("{2d6, 1"), (SyntaxErrorKind::Expected(Grouping::CloseBrace), 7));
	assert_eq!(syntax_error("(1 }"), (SyntaxErrorKind::Expected(Grouping::CloseParen), 3));
}

#[test]
fn missing_operands() {
	assert_eq!(syntax_error(""), (SyntaxErrorKind::UnexpectedEnd, 0));
	assert_eq!(syntax_error("1d6 +"), (SyntaxErrorKind::UnexpectedEnd, 5));
	assert_eq!(
		syntax_error("* 2"),
		(SyntaxErrorKind::UnexpectedToken(TokenKind::Operator(Operator::Mul)), 0)
	);
	assert_eq!(
		syntax_error("()"),
		(SyntaxErrorKind::UnexpectedToken(TokenKind::Grouping(Grouping::CloseParen)), 1)
	);
}

#[test]
fn trailing_tokens() {
	assert_eq!(syntax_error("1d6 2"), (SyntaxErrorKind::TrailingToken(TokenKind::Constant(2)), 4));
	assert_eq!(
		syntax_error("1d6)"),
		(SyntaxErrorKind::TrailingToken(TokenKind::Grouping(Grouping::CloseParen)), 3)
	);
	assert_eq!(
		syntax_error("1, 2"),
		(SyntaxErrorKind::TrailingToken(TokenKind::Operator(Operator::Comma)), 1)
	);
}

#[test]
fn lex_errors_pass_through() {
	let err = parse("1d6 + ?").unwrap_err();
	assert!(matches!(err, parse::Error::Lex(..)));
	assert_eq!(err.position(), 6);
	assert_eq!(err.highlight_len(), 1);

	let err = parse("2d13").unwrap_err();
	assert_eq!(err.position(), 0);
	assert_eq!(err.highlight_len(), 4);
}

#[test]
fn error_messages() {
	assert_eq!(
		parse("kh1").unwrap_err().to_string(),
		"invalid formula: Modifier must be applied to a dice roll at position 0"
	);
	assert_eq!(
		parse("{1d6}").unwrap_err().to_string(),
		"invalid formula: Expected a single expression, got a list at position 0"
	);
	assert_eq!(
		parse("1d6 + $").unwrap_err().to_string(),
		"invalid notation: unrecognized character at position 6: \"$\""
	);
}

#[test]
fn from_str() {
	assert_eq!("1d4 + 1".parse::<RollFormulaTree>().unwrap(), parse("1d4+1").unwrap());
}
