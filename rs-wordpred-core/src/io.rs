use std::fs::File;
use std::io::{BufRead, BufReader, Lines};
use std::path::{Path, PathBuf};
use std::{env, fs, io};

/// Opens a text file and returns a lazy iterator over its lines.
///
/// - Streams through a `BufReader`, the file is never fully loaded
/// - Splits on `\n` / `\r\n`
pub(crate) fn read_lines<P: AsRef<Path>>(filename: P) -> io::Result<Lines<BufReader<File>>> {
	Ok(BufReader::new(File::open(filename)?).lines())
}

/// Extracts the base filename without extension.
///
/// Examples:
/// - `"./data/shakespeare.txt"` → `"shakespeare"`
/// - `"check.txt"` → `"check"`
pub fn get_filename<P: AsRef<Path>>(input_path: P) -> io::Result<String> {
	let stem = input_path
		.as_ref()
		.file_stem()
		.ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "Path has no filename"))?;

	Ok(stem.to_string_lossy().to_string())
}

/// Normalize a folder path.
///
/// - `"."` or `"./"` resolves to the current working directory
/// - Other paths are returned as-is (not canonicalized)
pub fn normalize_folder(input: &str) -> PathBuf {
	if input == "." || input == "./" {
		env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
	} else {
		PathBuf::from(input)
	}
}

/// Lists all files with a given extension in a directory, sorted by name.
///
/// Returns file names only (no paths).
pub fn list_files<P: AsRef<Path>>(dir: P, extension: &str) -> io::Result<Vec<String>> {
	let mut files = Vec::new();

	for entry in fs::read_dir(dir)? {
		let path = entry?.path();

		if path.is_file() && path.extension() == Some(std::ffi::OsStr::new(extension)) {
			if let Some(name) = path.file_name() {
				files.push(name.to_string_lossy().to_string());
			}
		}
	}

	files.sort();
	Ok(files)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn filename_drops_folder_and_extension() {
		assert_eq!(get_filename("./data/shakespeare.txt").unwrap(), "shakespeare");
		assert_eq!(get_filename("check.txt").unwrap(), "check");
	}

	#[test]
	fn list_files_filters_by_extension() {
		let dir = tempfile::tempdir().unwrap();
		fs::write(dir.path().join("b.txt"), "b").unwrap();
		fs::write(dir.path().join("a.txt"), "a").unwrap();
		fs::write(dir.path().join("notes.md"), "x").unwrap();
		fs::create_dir(dir.path().join("nested.txt")).unwrap();

		assert_eq!(list_files(dir.path(), "txt").unwrap(), vec!["a.txt", "b.txt"]);
	}

	#[test]
	fn read_lines_streams_each_line() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("corpus.txt");
		fs::write(&path, "first line\r\nsecond line\n").unwrap();

		let lines: Vec<String> = read_lines(&path).unwrap().collect::<io::Result<_>>().unwrap();
		assert_eq!(lines, vec!["first line", "second line"]);
	}

	#[test]
	fn read_lines_fails_on_missing_file() {
		assert!(read_lines("definitely/not/here.txt").is_err());
	}
}
