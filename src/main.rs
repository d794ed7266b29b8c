use std::{
	fs,
	io::{self, BufRead, Write},
	process::ExitCode,
};

use anyhow::Context as _;
use bpaf::{construct, long, short, Parser};
use lasso::Rodeo;
use quotient::{
	exec::{
		session::{OutputEvent, Session},
		Config,
	},
	frontend::{parse::parse, unparse::pretty_print_program},
};
use tracing_subscriber::EnvFilter;

/// Submits one program and prints its events; returns whether it ran without error.
fn run(session: &mut Session, source: &str, dump_ast: bool) -> bool {
	if dump_ast {
		let mut interner = Rodeo::new();
		if let Ok(program) = parse(source, &mut interner) {
			eprintln!("{}", pretty_print_program(&program, &interner));
		}
	}

	let mut succeeded = true;
	for event in session.submit(source) {
		match event {
			OutputEvent::Standard { text } => println!("{text}"),
			OutputEvent::Error { text } => {
				eprintln!("{text}");
				succeeded = false;
			}
		}
	}
	succeeded
}

fn repl(session: &mut Session, dump_ast: bool) -> anyhow::Result<()> {
	let stdin = io::stdin();
	let mut lines = stdin.lock().lines();
	loop {
		print!("> ");
		io::stdout().flush()?;
		let Some(line) = lines.next() else { break };
		run(session, &line.context("failed to read from standard input")?, dump_ast);
	}
	println!();
	Ok(())
}

enum InputOption {
	Direct(String),
	FilePath(String),
}

struct Options {
	input: Option<InputOption>,
	precision: usize,
	workers: usize,
	parallel_depth: usize,
	dump_ast: bool,
}

fn main() -> anyhow::Result<ExitCode> {
	tracing_subscriber::fmt()
		.with_writer(io::stderr)
		.with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
		.init();

	let defaults = Config::default();
	let options: Options = construct!(Options {
		input(construct!([
			c(short('c').argument::<String>("SOURCE").help("Read the program from the argument").map(InputOption::Direct)),
			f(short('f').argument::<String>("PATH").help("Read the program from a file").map(InputOption::FilePath)),
		]).optional()),
		precision(long("precision").argument::<usize>("DIGITS").help("Significant digits of non-terminating decimals").fallback(defaults.precision)),
		workers(long("workers").argument::<usize>("N").help("Threads a single `map` may use").fallback(defaults.workers)),
		parallel_depth(long("parallel-depth").argument::<usize>("N").help("Levels of a `reduce` that fork threads").fallback(defaults.parallel_depth)),
		dump_ast(long("dump-ast").help("Print the parsed program to standard error").switch()),
	})
	.to_options()
	.descr("Evaluate programs over exact fractions and integer sequences")
	.run();

	let config = Config { precision: options.precision, workers: options.workers, parallel_depth: options.parallel_depth };
	tracing::debug!(?config, "starting session");
	let mut session = Session::new(config);

	let source = match options.input {
		Some(InputOption::Direct(source)) => source,
		Some(InputOption::FilePath(path)) =>
			fs::read_to_string(&path).with_context(|| format!("failed to read `{path}`"))?,
		None => {
			repl(&mut session, options.dump_ast)?;
			return Ok(ExitCode::SUCCESS);
		}
	};

	Ok(if run(&mut session, &source, options.dump_ast) { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}
