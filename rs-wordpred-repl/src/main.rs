use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use clap::Parser;
use rs_wordpred_core::{NextWordPredictor, PredictionRequest, Predictions};

/// Interactive next-word prediction over a text corpus.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
	/// Corpus file to learn word order from
	#[arg(default_value = "check.txt", env = "WORDPRED_CORPUS")]
	corpus: PathBuf,

	/// Count n-grams on all CPU cores
	#[arg(long)]
	parallel: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
	env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
	let args = Args::parse();

	let mut model = NextWordPredictor::new();
	let loaded = if args.parallel {
		model.load_corpus_parallel(&args.corpus)
	} else {
		model.load_corpus(&args.corpus)
	};

	// A missing corpus is reported, the loop still runs on an empty model
	if let Err(e) = loaded {
		log::error!("{e}");
	}

	let stdin = io::stdin();
	let stdout = io::stdout();
	run(&model, stdin.lock(), stdout.lock())?;
	Ok(())
}

/// Prompt/predict/render loop.
///
/// Reads a prefix, the last word and the second last word, prints the
/// predictions, then asks whether to continue. Anything but `y` (or end of
/// input) stops the loop.
fn run<R: BufRead, W: Write>(model: &NextWordPredictor, mut input: R, mut output: W) -> io::Result<()> {
	loop {
		let Some(prefix) = prompt(&mut input, &mut output, "Enter a prefix for the next word: ")? else { break };
		let Some(last_word) = prompt(&mut input, &mut output, "Enter the last word (optional): ")? else { break };
		let Some(second_last_word) = prompt(&mut input, &mut output, "Enter the second last word (optional): ")? else { break };

		let request = PredictionRequest::new(&prefix, &last_word, &second_last_word);
		let predictions = model.predict_request(&request);
		write!(output, "{}", render(&request.prefix, &predictions))?;

		match prompt(&mut input, &mut output, "Do you want to continue? (y/n): ")? {
			Some(answer) if answer.trim().eq_ignore_ascii_case("y") => (),
			_ => break,
		}
	}
	Ok(())
}

/// Writes `message` and reads one line. `None` on end of input.
fn prompt<R: BufRead, W: Write>(input: &mut R, output: &mut W, message: &str) -> io::Result<Option<String>> {
	write!(output, "{message}")?;
	output.flush()?;

	let mut line = String::new();
	if input.read_line(&mut line)? == 0 {
		return Ok(None);
	}
	Ok(Some(line.trim_end_matches(['\r', '\n']).to_owned()))
}

/// Formats predictions by descending score, two decimals each.
fn render(prefix: &str, predictions: &Predictions) -> String {
	if predictions.is_empty() {
		return format!("No predictions available for prefix '{prefix}'.\n");
	}

	let mut text = format!("Predictions for prefix '{prefix}':\n");
	for (word, score) in predictions.ranked() {
		text.push_str(&format!("{word}: {score:.2}\n"));
	}
	text
}
