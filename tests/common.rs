use std::{
	ffi::OsStr,
	fs,
	path::{Path, PathBuf},
};

use quotient::exec::session::{OutputEvent, Session};

pub const EXTENSION: &str = "qt";

pub fn programs(directory: impl AsRef<Path>) -> Vec<PathBuf> {
	let mut paths: Vec<_> = fs::read_dir(directory)
		.unwrap()
		.flatten()
		.map(|x| x.path())
		.filter(|x| x.extension() == Some(OsStr::new(EXTENSION)))
		.collect();
	paths.sort();
	paths
}

pub fn run(source: &str) -> Vec<OutputEvent> { Session::default().submit(source).collect() }

pub fn standard(text: &str) -> OutputEvent { OutputEvent::Standard { text: text.to_owned() } }

pub fn error(text: &str) -> OutputEvent { OutputEvent::Error { text: text.to_owned() } }
