use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Stdin, StdoutLock, Write};
use std::path::Path;

use anyhow::{Context, Result};

pub enum InputSource {
    File(BufReader<File>),
    Stdin(BufReader<Stdin>),
}

pub fn open_input(path: Option<&Path>) -> Result<InputSource> {
    match path {
        Some(p) => {
            let file = File::open(p)
                .with_context(|| format!("Failed to open input file: {}", p.display()))?;
            Ok(InputSource::File(BufReader::new(file)))
        }
        None => Ok(InputSource::Stdin(BufReader::new(io::stdin()))),
    }
}

impl InputSource {
    /// `(structure, name)` for every non-blank line. The name is whatever
    /// follows the first run of whitespace and may be empty.
    pub fn read_entries(self) -> Result<Vec<(String, String)>> {
        let lines: Box<dyn Iterator<Item = io::Result<String>>> = match self {
            InputSource::File(r) => Box::new(r.lines()),
            InputSource::Stdin(r) => Box::new(r.lines()),
        };
        let mut entries = Vec::new();
        for (number, line) in lines.enumerate() {
            let line = line.with_context(|| format!("Failed to read input line {}", number + 1))?;
            if let Some(entry) = split_entry(&line) {
                entries.push(entry);
            }
        }
        Ok(entries)
    }
}

fn split_entry(line: &str) -> Option<(String, String)> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    Some(match line.split_once(char::is_whitespace) {
        Some((structure, name)) => (structure.to_string(), name.trim().to_string()),
        None => (line.to_string(), String::new()),
    })
}

pub enum OutputTarget {
    File(BufWriter<File>),
    Stdout(BufWriter<StdoutLock<'static>>),
}

impl Write for OutputTarget {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            OutputTarget::File(w) => w.write(buf),
            OutputTarget::Stdout(w) => w.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            OutputTarget::File(w) => w.flush(),
            OutputTarget::Stdout(w) => w.flush(),
        }
    }
}

pub fn create_output(path: Option<&Path>) -> Result<OutputTarget> {
    match path {
        Some(p) => {
            let file = File::create(p)
                .with_context(|| format!("Failed to create output file: {}", p.display()))?;
            Ok(OutputTarget::File(BufWriter::new(file)))
        }
        None => Ok(OutputTarget::Stdout(BufWriter::new(io::stdout().lock()))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entry_with_name() {
        assert_eq!(
            split_entry("CCO  ethanol absolute"),
            Some(("CCO".to_string(), "ethanol absolute".to_string()))
        );
    }

    #[test]
    fn entry_without_name() {
        assert_eq!(split_entry("c1ccccc1"), Some(("c1ccccc1".to_string(), String::new())));
        assert_eq!(split_entry("  \t "), None);
    }
}
