use std::{
	env,
	io::{self, Write},
	process::ExitCode,
};

use ariadne::{Label, Report, ReportKind, Source};
use roll_formula::{
	dice::roller::{FastRand as FastRandRoller, Roller},
	live::{LiveRoll, RollFormula},
	parse::{self, tokenize_tolerant},
	DieRoll,
};

fn main() -> ExitCode {
	pretty_env_logger::init();

	// Arguments that parse as rolls (e.g. `d20:15`) are fed to the formula, the rest make up the notation so that it
	// can be left unquoted even with spaces. The first argument is the executable itself.
	let mut rolls = Vec::new();
	let mut words = Vec::new();
	for arg in env::args().skip(1) {
		match arg.parse::<DieRoll>() {
			Ok(roll) => rolls.push(roll),
			Err(..) => words.push(arg),
		}
	}

	let input = if words.is_empty() {
		let mut lines = io::stdin().lines();

		// If there isn't already input available in stdin, display a prompt for it
		if lines.size_hint().1.is_none() {
			print!("Enter roll formula: ");
			if let Err(err) = io::stdout().flush() {
				eprintln!("Unable to flush stdout: {err}");
			}
		}

		match lines.next() {
			Some(Ok(line)) => line,
			Some(Err(err)) => {
				eprintln!("Unable to read stdin: {err}");
				return ExitCode::FAILURE;
			}
			None => return ExitCode::SUCCESS,
		}
	} else {
		words.join(" ")
	};

	println!("Input: {input}");

	let (tokens, _) = tokenize_tolerant(&input);
	println!(
		"Tokens: {}",
		tokens.iter().map(ToString::to_string).collect::<Vec<_>>().join(" ")
	);

	let formula = match RollFormula::new(input.as_str()) {
		Ok(formula) => formula,
		Err(err) => {
			report(&input, &err);
			return ExitCode::FAILURE;
		}
	};

	println!("Parsed: {:?}", formula.tree());
	println!("Notation: {formula}");
	println!("Deterministic: {}", formula.tree().is_deterministic());
	match formula.simplify() {
		Some(simple) => println!("Simplified: {simple:?}"),
		None => println!("Simplified: n/a"),
	}

	if rolls.is_empty() {
		rolls = FastRandRoller::default().roll_formula(formula.tree());
		println!("Virtual rolls: {}", describe(&rolls));
	}

	let mut live = LiveRoll::new(formula);
	for roll in rolls {
		live.push(roll);
	}

	println!();
	for (node, matched) in live.mapping().iter() {
		println!("{node} <- {}", describe(matched));
	}

	match live.result() {
		Some(result) => {
			println!("Result: {result}");
			if !live.unused_rolls().is_empty() {
				println!("Unused rolls: {}", describe(live.unused_rolls()));
			}
		}
		None => println!("Waiting for more rolls"),
	}

	ExitCode::SUCCESS
}

/// Lists rolls separated by spaces.
fn describe(rolls: &[DieRoll]) -> String {
	rolls.iter().map(ToString::to_string).collect::<Vec<_>>().join(" ")
}

/// Prints a parse error to stderr with the offending part of the input highlighted.
fn report(input: &str, err: &parse::Error) {
	let start = err.position();
	let span = start..start + err.highlight_len();
	let printed = Report::build(ReportKind::Error, span.clone())
		.with_message("Invalid roll formula")
		.with_label(Label::new(span).with_message(err.to_string()))
		.finish()
		.eprint(Source::from(input));

	if printed.is_err() {
		eprintln!("Invalid roll formula: {err}");
	}
}
