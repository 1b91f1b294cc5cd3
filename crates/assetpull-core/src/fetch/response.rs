//! Parse HTTP response header lines into the fields the engine needs.

/// Status and headers of one response hop.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponseHead {
    /// Status code from the status line, if one was seen.
    pub status: Option<u32>,
    /// `Content-Length`, if present and numeric.
    pub content_length: Option<u64>,
    /// Raw `Location` value, if present.
    pub location: Option<String>,
}

impl ResponseHead {
    pub fn is_success(&self) -> bool {
        matches!(self.status, Some(200..=299))
    }

    pub fn is_redirect(&self) -> bool {
        self.status.map(is_redirect_status).unwrap_or(false)
    }
}

/// Redirect statuses the engine follows by re-issuing the request.
pub fn is_redirect_status(code: u32) -> bool {
    matches!(code, 301 | 302 | 303 | 307 | 308)
}

/// Parse the status code out of a line like `HTTP/1.1 302 Found`.
fn parse_status_line(line: &str) -> Option<u32> {
    let mut parts = line.split_whitespace();
    let proto = parts.next()?;
    if !proto.starts_with("HTTP/") {
        return None;
    }
    parts.next()?.parse().ok()
}

/// Feed one raw header line into `head`. A new status line resets the head,
/// so interim responses (e.g. `100 Continue`) do not leak into the final one.
pub(crate) fn push_header_line(head: &mut ResponseHead, line: &str) {
    let line = line.trim();
    if line.is_empty() {
        return;
    }
    if let Some(code) = parse_status_line(line) {
        *head = ResponseHead {
            status: Some(code),
            ..ResponseHead::default()
        };
        return;
    }
    if let Some((name, value)) = line.split_once(':') {
        let name = name.trim();
        let value = value.trim();
        if name.eq_ignore_ascii_case("content-length") {
            if let Ok(n) = value.parse::<u64>() {
                head.content_length = Some(n);
            }
        }
        if name.eq_ignore_ascii_case("location") && !value.is_empty() {
            head.location = Some(value.to_string());
        }
    }
}

/// Parse collected header lines into a ResponseHead.
pub fn parse_headers<S: AsRef<str>>(lines: &[S]) -> ResponseHead {
    let mut head = ResponseHead::default();
    for line in lines {
        push_header_line(&mut head, line.as_ref());
    }
    head
}
