use crate::{
	dice::DieType,
	formula::ModifierKind,
	parse::lexer::{tokenize, tokenize_tolerant, Grouping, LexErrorKind, Operator, TokenKind},
};

fn kinds(notation: &str) -> Vec<TokenKind> {
	tokenize(notation).unwrap().into_iter().map(|token| token.kind).collect()
}

#[test]
fn basic_formula() {
	assert_eq!(
		kinds("2d20kh1+1d4-3"),
		[
			TokenKind::Dice {
				die_type: DieType::D20,
				count: 2
			},
			TokenKind::Modifier {
				kind: ModifierKind::KeepHighest,
				count: 1
			},
			TokenKind::Operator(Operator::Add),
			TokenKind::Dice {
				die_type: DieType::D4,
				count: 1
			},
			TokenKind::Operator(Operator::Sub),
			TokenKind::Constant(3),
		]
	);
}

#[test]
fn counts_default_to_one() {
	assert_eq!(kinds("d6"), kinds("1d6"));
	assert_eq!(kinds("2d6kh"), kinds("2d6kh1"));
	assert_eq!(
		kinds("2d6dl")[1],
		TokenKind::Modifier {
			kind: ModifierKind::DropLowest,
			count: 1
		}
	);
}

#[test]
fn modifiers_win_over_dice() {
	assert_eq!(
		kinds("4d6dh2"),
		[
			TokenKind::Dice {
				die_type: DieType::D6,
				count: 4
			},
			TokenKind::Modifier {
				kind: ModifierKind::DropHighest,
				count: 2
			},
		]
	);
	assert_eq!(
		kinds("{1d8,1d10}dl")[5],
		TokenKind::Modifier {
			kind: ModifierKind::DropLowest,
			count: 1
		}
	);
}

#[test]
fn all_dice_sizes() {
	let sizes = [
		("d4", DieType::D4),
		("d6", DieType::D6),
		("d8", DieType::D8),
		("d10", DieType::D10),
		("d00", DieType::D00),
		("d12", DieType::D12),
		("d20", DieType::D20),
		("d100", DieType::D100),
		("dF", DieType::D6Fudge),
	];
	for (notation, die_type) in sizes {
		assert_eq!(kinds(notation), [TokenKind::Dice { die_type, count: 1 }], "{notation}");
	}
}

#[test]
fn case_and_whitespace_insensitive() {
	assert_eq!(kinds("  2D20 KH1 +\t3 "), kinds("2d20kh1+3"));
	assert_eq!(kinds("4DF"), kinds("4df"));
}

#[test]
fn groupings_and_commas() {
	assert_eq!(
		kinds("({1d6,2})"),
		[
			TokenKind::Grouping(Grouping::OpenParen),
			TokenKind::Grouping(Grouping::OpenBrace),
			TokenKind::Dice {
				die_type: DieType::D6,
				count: 1
			},
			TokenKind::Operator(Operator::Comma),
			TokenKind::Constant(2),
			TokenKind::Grouping(Grouping::CloseBrace),
			TokenKind::Grouping(Grouping::CloseParen),
		]
	);
}

#[test]
fn positions_and_contents() {
	let tokens = tokenize(" 10d6 * 2").unwrap();
	let positions = tokens.iter().map(|token| token.position).collect::<Vec<_>>();
	let contents = tokens.iter().map(|token| token.content.as_str()).collect::<Vec<_>>();
	assert_eq!(positions, [1, 6, 8]);
	assert_eq!(contents, ["10d6", "*", "2"]);
}

#[test]
fn unrecognized_character() {
	let err = tokenize("1d6 + x").unwrap_err();
	assert_eq!(err.kind, LexErrorKind::UnrecognizedCharacter);
	assert_eq!(err.position, 6);
	assert_eq!(err.content, "x");
}

#[test]
fn unknown_die_size() {
	let err = tokenize("1 + 3d7").unwrap_err();
	assert_eq!(err.kind, LexErrorKind::UnknownDieType);
	assert_eq!(err.position, 4);
	assert_eq!(err.content, "3d7");
}

#[test]
fn number_too_large() {
	let err = tokenize("99999999999").unwrap_err();
	assert_eq!(err.kind, LexErrorKind::NumberTooLarge);
	assert_eq!(err.position, 0);

	let err = tokenize("99999999999d6").unwrap_err();
	assert_eq!(err.kind, LexErrorKind::NumberTooLarge);
}

#[test]
fn tolerant_keeps_valid_prefix() {
	let (tokens, err) = tokenize_tolerant("2d6 + 4 ? 1d8");
	assert_eq!(tokens.len(), 3);
	assert_eq!(tokens[2].kind, TokenKind::Constant(4));

	let err = err.unwrap();
	assert_eq!(err.kind, LexErrorKind::UnrecognizedCharacter);
	assert_eq!(err.position, 8);
}

#[test]
fn tolerant_without_error() {
	let (tokens, err) = tokenize_tolerant("1d20 + 5");
	assert_eq!(tokens.len(), 3);
	assert!(err.is_none());
}

#[test]
fn positions_count_characters() {
	let err = tokenize("1d6 é").unwrap_err();
	assert_eq!(err.position, 4);
	assert_eq!(err.content, "é");
}

#[test]
fn empty_input() {
	assert!(tokenize("").unwrap().is_empty());
	assert!(tokenize("   ").unwrap().is_empty());
}
