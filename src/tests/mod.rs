mod formula;
mod lexer;
mod live;
mod parser;
mod simplify;

use crate::dice::{DieRoll, DieType};

/// Builds rolls of one die type from their values.
fn rolls_of(die_type: DieType, values: &[i32]) -> Vec<DieRoll> {
	values.iter().map(|&value| DieRoll::new(die_type, value)).collect()
}
