use crate::{
	dice::DieType,
	eval::evaluate,
	formula::{ArithOp, ModifierKind, RollFormulaTree},
	parse,
};

/// Notation the parser accepts, in canonical form
const CANONICAL: &[&str] = &[
	"42",
	"1d20",
	"3d6+2",
	"1d20-1d4-3",
	"2d20kh1+5",
	"2d20kl1-1",
	"4d6dl1",
	"4d6dh2*2",
	"1d100+1d00",
	"1dF+2dF",
	"(1d6+2)*3",
	"1d8*(2+1d4)",
	"10-(3-2)",
	"8/(4/2)",
	"8/4/2",
	"{2d6,1d8}kh1",
	"{2d6+1}kh1",
	"{1d20+5,1d12}kl1+1d4",
	"{{1d6,1d8}kh1,1d10}dl1",
	"{4d6dl1,4d6dl1,4d6dl1}dh1",
	"1d6/0",
];

#[test]
fn canonical_notation_round_trips() {
	for notation in CANONICAL {
		let tree = parse(notation).unwrap();
		assert_eq!(tree.to_string(), *notation);
	}
}

#[test]
fn parse_is_idempotent() {
	let noisy = [
		"d20 KH + 3",
		" ( 1D6 + 2 ) * 3 ",
		"((1d4))",
		"{ 2d6 , (1d8) } kh",
		"(2d6)kh1",
		"1 + (2 * 3)",
		"(1 + 2) + 3",
	];
	for notation in CANONICAL.iter().copied().chain(noisy) {
		let tree = parse(notation).unwrap();
		let reparsed = parse(&tree.to_string()).unwrap();
		assert_eq!(reparsed, tree, "{notation} -> {tree}");
	}
}

#[test]
fn redundant_parentheses_are_dropped() {
	assert_eq!(parse("(1 + 2) + 3").unwrap().to_string(), "1+2+3");
	assert_eq!(parse("1 + (2 * 3)").unwrap().to_string(), "1+2*3");
	assert_eq!(parse("((1d4))").unwrap().to_string(), "1d4");
}

#[test]
fn required_parentheses_are_kept() {
	assert_eq!(parse("1 - (2 + 3)").unwrap().to_string(), "1-(2+3)");
	assert_eq!(parse("2 * (3 * 4)").unwrap().to_string(), "2*(3*4)");
}

#[test]
fn negative_constants_fold_into_operator() {
	let tree = RollFormulaTree::operation(
		ArithOp::Sub,
		RollFormulaTree::dice(DieType::D20, 1),
		RollFormulaTree::constant(-2),
	);
	assert_eq!(tree.to_string(), "1d20+2");

	let tree = RollFormulaTree::operation(
		ArithOp::Mul,
		RollFormulaTree::dice(DieType::D20, 1),
		RollFormulaTree::constant(-2),
	);
	assert_eq!(tree.to_string(), "1d20*(0-2)");
}

#[test]
fn negative_constants_render_as_parseable_notation() {
	assert_eq!(RollFormulaTree::constant(-5).to_string(), "(0-5)");
	assert_eq!(RollFormulaTree::constant(i32::MIN).to_string(), "(0-2147483647-1)");

	for value in [-3, i32::MIN] {
		for operator in [ArithOp::Add, ArithOp::Sub, ArithOp::Mul, ArithOp::Div] {
			let tree = RollFormulaTree::operation(
				operator,
				RollFormulaTree::constant(10),
				RollFormulaTree::constant(value),
			);
			let notation = tree.to_string();
			let reparsed = parse(&notation).unwrap_or_else(|err| panic!("{notation} doesn't parse: {err}"));
			assert_eq!(
				evaluate(&reparsed, &[]).unwrap().value,
				evaluate(&tree, &[]).unwrap().value,
				"{notation}"
			);
		}
	}
}

#[test]
fn single_dice_modifier_has_no_braces() {
	let tree = RollFormulaTree::modifier(ModifierKind::DropLowest, 1, vec![RollFormulaTree::dice(DieType::D6, 4)]);
	assert_eq!(tree.to_string(), "4d6dl1");

	let tree = RollFormulaTree::modifier(ModifierKind::KeepHighest, 2, vec![RollFormulaTree::constant(5)]);
	assert_eq!(tree.to_string(), "{5}kh2");
}

#[test]
fn deterministic_formulas() {
	assert!(parse("3 * (2 + 1)").unwrap().is_deterministic());
	assert!(parse("{1, 2}kh1").unwrap().is_deterministic());
	assert!(!parse("{1, 1d4}kh1").unwrap().is_deterministic());
	assert!(!parse("1d100").unwrap().is_deterministic());
}

#[test]
fn kept_ranges_are_clamped() {
	assert_eq!(ModifierKind::KeepHighest.kept_range(0, 3), 3..3);
	assert_eq!(ModifierKind::DropHighest.kept_range(5, 3), 0..0);
	assert_eq!(ModifierKind::DropLowest.kept_range(5, 3), 3..3);
	assert_eq!(ModifierKind::KeepLowest.kept_range(u32::MAX, 2), 0..2);
	assert_eq!(ModifierKind::KeepHighest.kept_range(1, 0), 0..0);
}

#[test]
fn division() {
	assert_eq!(ArithOp::Div.apply(7.0, 2.0), 3.5);
	assert_eq!(ArithOp::Div.apply(6.0, 0.0), 6.0);
	assert_eq!(ArithOp::Div.apply(-6.0, 0.0), -6.0);
}
