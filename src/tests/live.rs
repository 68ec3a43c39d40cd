use crate::{
	dice::{roller::Iter as IterRoller, roller::Roller, DieRoll, DieType},
	live::{LiveRoll, RollFormula},
	parse,
};

#[test]
fn formula_keeps_notation() {
	let formula = RollFormula::new("2D20 kh + 3").unwrap();
	assert_eq!(formula.notation(), "2D20 kh + 3");
	assert_eq!(formula.to_string(), "2d20kh1+3");
	assert_eq!(formula.tree(), &parse("2d20kh1+3").unwrap());
	assert!(formula.simplify().is_some());
}

#[test]
fn formula_rejects_invalid_notation() {
	assert!(RollFormula::new("(2d6").is_err());
	assert!("kh1".parse::<RollFormula>().is_err());
}

#[test]
fn deterministic_formula_resolves_immediately() {
	let roll = LiveRoll::new(RollFormula::new("3 * 4").unwrap());
	assert!(roll.is_resolved());
	assert_eq!(roll.result().unwrap().value, 12.0);
}

#[test]
fn resolves_once_all_rolls_arrive() {
	let mut roll = LiveRoll::new(RollFormula::new("{2d6, 1d8}kh1 + 1d4").unwrap());
	assert!(!roll.is_resolved());

	assert!(roll.push(DieRoll::new(DieType::D8, 7)).is_none());
	assert!(roll.push(DieRoll::new(DieType::D6, 1)).is_none());
	assert!(roll.push(DieRoll::new(DieType::D4, 4)).is_none());

	let result = roll.push(DieRoll::new(DieType::D6, 2)).unwrap();
	assert_eq!(result.value, 11.0);
	assert_eq!(result.dropped, [DieRoll::new(DieType::D6, 1), DieRoll::new(DieType::D6, 2)]);
	assert!(roll.unused_rolls().is_empty());
}

#[test]
fn extra_rolls_are_unused() {
	let mut roll = LiveRoll::new(RollFormula::new("1d20").unwrap());
	roll.push(DieRoll::new(DieType::D6, 3));
	assert!(roll.unused_rolls().is_empty());

	roll.push(DieRoll::new(DieType::D20, 12));
	roll.push(DieRoll::new(DieType::D20, 18));
	assert_eq!(roll.result().unwrap().value, 12.0);
	assert_eq!(
		roll.unused_rolls(),
		[DieRoll::new(DieType::D6, 3), DieRoll::new(DieType::D20, 18)]
	);
	assert_eq!(roll.rolls().len(), 3);
}

#[test]
fn removing_a_roll_reevaluates() {
	let mut roll = LiveRoll::new(RollFormula::new("1d6 + 1d6").unwrap());
	roll.push(DieRoll::new(DieType::D6, 6));
	roll.push(DieRoll::new(DieType::D6, 1));
	assert_eq!(roll.result().unwrap().value, 7.0);

	assert_eq!(roll.remove(0), Some(DieRoll::new(DieType::D6, 6)));
	assert!(!roll.is_resolved());
	assert_eq!(roll.remove(5), None);

	roll.push(DieRoll::new(DieType::D6, 4));
	assert_eq!(roll.result().unwrap().value, 5.0);
}

#[test]
fn mapping_shows_progress() {
	let mut roll = LiveRoll::new(RollFormula::new("2d6 + 1d20").unwrap());
	roll.push(DieRoll::new(DieType::D20, 9));
	roll.push(DieRoll::new(DieType::D6, 3));

	let mapping = roll.mapping();
	let matched = mapping.iter().map(|(node, rolls)| (node.to_string(), rolls.len())).collect::<Vec<_>>();
	assert_eq!(matched, [("2d6".to_owned(), 1), ("1d20".to_owned(), 1)]);
}

#[test]
fn rolled_rolls_resolve_in_any_order() {
	let formula = RollFormula::new("{3d6dl1, 1d12}kh1 - 1d4").unwrap();
	let rolls = IterRoller::new([5, 2, 4, 9, 3]).roll_formula(formula.tree());
	let expected = formula.evaluate(&rolls).unwrap();
	assert_eq!(expected.value, 9.0 - 3.0);

	let mut roll = LiveRoll::new(formula);
	for die in rolls.iter().rev() {
		roll.push(*die);
	}
	assert_eq!(roll.result().map(|result| result.value), Some(expected.value));
}
