//! Filesystem-safe filename sanitization.

/// Characters that cannot appear in a filename on at least one common platform.
const PATH_HOSTILE: &[char] = &['/', '\\', ':', '*', '?', '"', '<', '>', '|'];

/// Sanitizes a candidate filename for saving next to project sources.
///
/// - Replaces NUL, path-hostile characters (`/ \ : * ? " < > |`), whitespace
///   and control characters with `_`
/// - Collapses consecutive underscores
/// - Trims leading/trailing dots, spaces and underscores
/// - Limits length to 255 bytes (NAME_MAX)
///
/// Sanitizing an already sanitized name returns it unchanged.
pub fn sanitize_filename(name: &str) -> String {
    const NAME_MAX: usize = 255;

    let mut out = String::with_capacity(name.len());
    let mut prev_underscore = false;

    for c in name.chars() {
        let replacement = if c == '\0' || c.is_control() || c.is_whitespace() || PATH_HOSTILE.contains(&c) {
            '_'
        } else {
            c
        };

        if replacement == '_' {
            if !prev_underscore {
                out.push('_');
            }
            prev_underscore = true;
        } else {
            out.push(replacement);
            prev_underscore = false;
        }
    }

    let trimmed = out.trim_matches(|c| c == ' ' || c == '.' || c == '_');

    if trimmed.len() > NAME_MAX {
        let mut take = NAME_MAX;
        while take > 0 && !trimmed.is_char_boundary(take) {
            take -= 1;
        }
        trimmed[..take].to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn removes_slash_and_backslash() {
        assert_eq!(sanitize_filename("a/b\\c.png"), "a_b_c.png");
    }

    #[test]
    fn replaces_windows_hostile_characters() {
        assert_eq!(sanitize_filename("img:1*2?.jpg"), "img_1_2_.jpg");
        assert_eq!(sanitize_filename("a<b>c|d\".gif"), "a_b_c_d_.gif");
    }

    #[test]
    fn trims_dots_and_spaces() {
        assert_eq!(sanitize_filename("  ..  photo.jpg  ..  "), "photo.jpg");
    }

    #[test]
    fn collapses_underscores() {
        assert_eq!(sanitize_filename("hero   image.jpg"), "hero_image.jpg");
        assert_eq!(sanitize_filename("file___name.png"), "file_name.png");
    }

    #[test]
    fn control_chars() {
        assert_eq!(sanitize_filename("file\x00name.png"), "file_name.png");
    }

    #[test]
    fn idempotent() {
        let once = sanitize_filename("my photo: (v2)?.jpeg");
        assert_eq!(sanitize_filename(&once), once);
    }
}
