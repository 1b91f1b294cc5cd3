//! Markdown inline image syntax: `![alt](url "title")` and `![alt](<url>)`.

use std::ops::Range;

/// Finds the destination span of every inline Markdown image in `text[from..]`.
pub fn image_destinations(text: &str, from: usize) -> Vec<Range<usize>> {
    let bytes = text.as_bytes();
    let mut out = Vec::new();
    let mut i = from;

    while let Some(rel) = text.get(i..).and_then(|t| t.find("![")) {
        let bang = i + rel;
        i = bang + 2;

        // Alt text: balanced brackets, may contain nested `[..]`.
        let mut depth = 1usize;
        let mut j = bang + 2;
        while j < bytes.len() && depth > 0 {
            match bytes[j] {
                b'\\' => j += 1,
                b'[' => depth += 1,
                b']' => depth -= 1,
                b'\n' if bytes.get(j + 1) == Some(&b'\n') => break,
                _ => {}
            }
            j += 1;
        }
        if depth != 0 || bytes.get(j) != Some(&b'(') {
            continue;
        }
        j += 1;
        while j < bytes.len() && (bytes[j] == b' ' || bytes[j] == b'\t') {
            j += 1;
        }

        let dest = if bytes.get(j) == Some(&b'<') {
            let start = j + 1;
            match text[start..].find(|c: char| c == '>' || c == '\n') {
                Some(r) if bytes[start + r] == b'>' => start..start + r,
                _ => continue,
            }
        } else {
            let start = j;
            let mut k = j;
            let mut parens = 0usize;
            while k < bytes.len() && !bytes[k].is_ascii_whitespace() {
                match bytes[k] {
                    b'(' => parens += 1,
                    b')' if parens == 0 => break,
                    b')' => parens -= 1,
                    _ => {}
                }
                k += 1;
            }
            start..k
        };
        if !dest.is_empty() {
            i = dest.end;
            out.push(dest);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dests(text: &str) -> Vec<&str> {
        image_destinations(text, 0)
            .into_iter()
            .map(|r| &text[r])
            .collect()
    }

    #[test]
    fn plain_and_titled() {
        let text = "![a](https://x.test/a.png) and ![b [c]](https://x.test/b.png \"B\")";
        assert_eq!(dests(text), vec!["https://x.test/a.png", "https://x.test/b.png"]);
    }

    #[test]
    fn angle_brackets_and_parens() {
        let text = "![a](<https://x.test/a b.png>) ![w](https://x.test/wiki/A_(b).png)";
        assert_eq!(
            dests(text),
            vec!["https://x.test/a b.png", "https://x.test/wiki/A_(b).png"]
        );
    }

    #[test]
    fn links_are_not_images() {
        assert!(dests("[link](https://x.test/a.png) ![broken] (x)").is_empty());
    }
}
