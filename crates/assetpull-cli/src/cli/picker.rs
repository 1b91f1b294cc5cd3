//! Line-based prompts on the terminal.

use assetpull_core::batch::{Picker, ScanEntry};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// What the user typed at the selection prompt.
#[derive(Debug, PartialEq, Eq)]
enum Selection {
    Cancel,
    /// Zero-based indices, ascending and unique.
    Indices(Vec<usize>),
}

/// Parses `all`, `q`, or 1-based indices and ranges (`1,3 5-7`).
/// Empty input selects everything.
fn parse_selection(line: &str, count: usize) -> Result<Selection, String> {
    let line = line.trim();
    if line.eq_ignore_ascii_case("q") || line.eq_ignore_ascii_case("quit") {
        return Ok(Selection::Cancel);
    }
    if line.is_empty() || line.eq_ignore_ascii_case("all") {
        return Ok(Selection::Indices((0..count).collect()));
    }

    let mut picked = vec![false; count];
    for token in line.split(|c: char| c == ',' || c.is_whitespace()) {
        if token.is_empty() {
            continue;
        }
        let (lo, hi) = match token.split_once('-') {
            Some((a, b)) => (parse_index(a, count)?, parse_index(b, count)?),
            None => {
                let i = parse_index(token, count)?;
                (i, i)
            }
        };
        if lo > hi {
            return Err(format!("empty range: {}", token));
        }
        for slot in &mut picked[lo..=hi] {
            *slot = true;
        }
    }
    Ok(Selection::Indices(
        picked
            .iter()
            .enumerate()
            .filter_map(|(i, &p)| p.then_some(i))
            .collect(),
    ))
}

fn parse_index(s: &str, count: usize) -> Result<usize, String> {
    let n: usize = s
        .trim()
        .parse()
        .map_err(|_| format!("not a number: {}", s))?;
    if n == 0 || n > count {
        return Err(format!("out of range: {} (1-{})", n, count));
    }
    Ok(n - 1)
}

/// Prompts on stdout and reads answers from `input`. End of input cancels.
pub struct TerminalPicker<R> {
    input: Mutex<R>,
    /// Relative directory answers are taken relative to this.
    base: PathBuf,
}

impl TerminalPicker<io::BufReader<io::Stdin>> {
    pub fn stdin(base: PathBuf) -> Self {
        Self::new(io::BufReader::new(io::stdin()), base)
    }
}

impl<R: BufRead + Send> TerminalPicker<R> {
    pub fn new(input: R, base: PathBuf) -> Self {
        Self {
            input: Mutex::new(input),
            base,
        }
    }

    fn prompt(&self, text: &str) -> Option<String> {
        print!("{}", text);
        let _ = io::stdout().flush();
        let mut line = String::new();
        let mut input = self.input.lock().ok()?;
        match input.read_line(&mut line) {
            Ok(0) | Err(_) => None,
            Ok(_) => Some(line),
        }
    }
}

impl<R: BufRead + Send> Picker for TerminalPicker<R> {
    fn multi_select(&self, items: &[ScanEntry]) -> Option<Vec<usize>> {
        println!("Remote images:");
        for (i, item) in items.iter().enumerate() {
            println!(
                "  {:>3}. {}  ({} reference(s) in {} document(s))",
                i + 1,
                item.key,
                item.occurrences,
                item.documents.len()
            );
        }
        loop {
            let line = self.prompt("Download which? [all] (numbers, ranges, q to cancel): ")?;
            match parse_selection(&line, items.len()) {
                Ok(Selection::Cancel) => return None,
                Ok(Selection::Indices(indices)) => return Some(indices),
                Err(msg) => println!("  {}", msg),
            }
        }
    }

    fn select_directory(&self, default: &Path) -> Option<PathBuf> {
        let line = self.prompt(&format!("Save to [{}]: ", default.display()))?;
        let answer = line.trim();
        if answer.is_empty() {
            return Some(default.to_path_buf());
        }
        if answer.eq_ignore_ascii_case("q") {
            return None;
        }
        Some(self.base.join(answer))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assetpull_core::scan::{DocumentId, TagKind};
    use std::io::Cursor;

    fn entries(n: usize) -> Vec<ScanEntry> {
        (0..n)
            .map(|i| ScanEntry {
                key: format!("https://x.test/{}.png", i),
                tag_kind: TagKind::PlainImage,
                documents: vec![DocumentId::new("/p/a.md")],
                occurrences: 1,
            })
            .collect()
    }

    #[test]
    fn parse_selection_forms() {
        assert_eq!(parse_selection("all\n", 3), Ok(Selection::Indices(vec![0, 1, 2])));
        assert_eq!(parse_selection("", 2), Ok(Selection::Indices(vec![0, 1])));
        assert_eq!(parse_selection(" q ", 2), Ok(Selection::Cancel));
        assert_eq!(
            parse_selection("3, 1 1", 4),
            Ok(Selection::Indices(vec![0, 2]))
        );
        assert_eq!(
            parse_selection("2-4", 5),
            Ok(Selection::Indices(vec![1, 2, 3]))
        );
        assert!(parse_selection("0", 3).is_err());
        assert!(parse_selection("4", 3).is_err());
        assert!(parse_selection("x", 3).is_err());
        assert!(parse_selection("3-1", 3).is_err());
    }

    #[test]
    fn reprompts_after_bad_input() {
        let picker = TerminalPicker::new(Cursor::new("9\n2\n"), PathBuf::from("/p"));
        assert_eq!(picker.multi_select(&entries(3)), Some(vec![1]));
    }

    #[test]
    fn end_of_input_cancels() {
        let picker = TerminalPicker::new(Cursor::new(""), PathBuf::from("/p"));
        assert_eq!(picker.multi_select(&entries(1)), None);
        assert_eq!(picker.select_directory(Path::new("/p/assets")), None);
    }

    #[test]
    fn directory_default_and_relative_answers() {
        let picker = TerminalPicker::new(Cursor::new("\npublic/img\nq\n"), PathBuf::from("/p"));
        assert_eq!(
            picker.select_directory(Path::new("/p/src/assets")),
            Some(PathBuf::from("/p/src/assets"))
        );
        assert_eq!(
            picker.select_directory(Path::new("/p/src/assets")),
            Some(PathBuf::from("/p/public/img"))
        );
        assert_eq!(picker.select_directory(Path::new("/p/src/assets")), None);
    }
}
