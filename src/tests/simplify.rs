use crate::{
	dice::DieType,
	formula::simplify::{Advantage, Bonus, SimplifiedRollFormula},
	parse,
};

fn simplify(notation: &str) -> Option<SimplifiedRollFormula> {
	parse(notation).unwrap().simplify()
}

#[test]
fn plain_dice() {
	assert_eq!(simplify("1d20"), Some(SimplifiedRollFormula::new(DieType::D20, 1)));
	assert_eq!(simplify("8d6"), Some(SimplifiedRollFormula::new(DieType::D6, 8)));
}

#[test]
fn constants_are_summed() {
	assert_eq!(
		simplify("1d8 + 2 + 3 - 1"),
		Some(SimplifiedRollFormula::new(DieType::D8, 1).with_constant(4))
	);
	assert_eq!(
		simplify("5 + 2d4"),
		Some(SimplifiedRollFormula::new(DieType::D4, 2).with_constant(5))
	);
	assert_eq!(
		simplify("1d12 - 7"),
		Some(SimplifiedRollFormula::new(DieType::D12, 1).with_constant(-7))
	);
}

#[test]
fn advantage_and_disadvantage() {
	assert_eq!(
		simplify("2d20kh1"),
		Some(SimplifiedRollFormula::new(DieType::D20, 1).with_modifier(Advantage::Advantage))
	);
	assert_eq!(
		simplify("2d20kl + 1"),
		Some(
			SimplifiedRollFormula::new(DieType::D20, 1)
				.with_constant(1)
				.with_modifier(Advantage::Disadvantage)
		)
	);
}

#[test]
fn guidance_bonus() {
	assert_eq!(
		simplify("1d20 + 1d4"),
		Some(SimplifiedRollFormula::new(DieType::D20, 1).with_bonus(Bonus::Guidance))
	);
	assert_eq!(
		simplify("2d20kh1 + 3 + 1d4"),
		Some(
			SimplifiedRollFormula::new(DieType::D20, 1)
				.with_constant(3)
				.with_modifier(Advantage::Advantage)
				.with_bonus(Bonus::Guidance)
		)
	);
}

#[test]
fn main_d4_is_not_a_bonus() {
	assert_eq!(simplify("1d4 + 2"), Some(SimplifiedRollFormula::new(DieType::D4, 1).with_constant(2)));
}

#[test]
fn unsupported_shapes() {
	for notation in [
		"7",
		"1d20 * 2",
		"1d20 - 1d4",
		"1d20 + 1d6",
		"1d20 + 1d4 + 1d4",
		"2d20 + 1d8",
		"3d20kh1",
		"2d20kh2",
		"2d20dl1",
		"{1d20, 1d20}kh1",
		"(1d20 + 2) * 1",
	] {
		assert_eq!(simplify(notation), None, "{notation}");
	}
}

#[test]
fn trees_round_trip() {
	for notation in ["1d20", "3d6+2", "2d20kh1-1", "2d20kl1+1d4", "1d8+5+1d4"] {
		let simple = simplify(notation).unwrap();
		assert_eq!(simple.to_tree().simplify(), Some(simple), "{notation}");
	}
	assert_eq!(simplify("1d8+5+1d4").unwrap().to_string(), "1d8+5+1d4");
}

#[test]
fn extreme_constant_renders_as_valid_notation() {
	let simple = SimplifiedRollFormula::new(DieType::D20, 1).with_constant(i32::MIN);
	assert_eq!(simple.to_string(), "1d20+(0-2147483647-1)");
	assert!(parse(&simple.to_string()).is_ok());
}
