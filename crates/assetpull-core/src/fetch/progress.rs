//! Byte-level progress for a single fetch.

/// Cumulative progress after a chunk was written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FetchProgress {
    /// Bytes written so far for this URL.
    pub bytes_read: u64,
    /// Expected total from `Content-Length`, 0 when unknown.
    pub total_bytes: u64,
}

impl FetchProgress {
    /// Fraction complete in [0.0, 1.0], or None when the total is unknown.
    pub fn fraction(&self) -> Option<f64> {
        if self.total_bytes == 0 {
            return None;
        }
        Some((self.bytes_read as f64 / self.total_bytes as f64).min(1.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fraction_known_total() {
        let p = FetchProgress {
            bytes_read: 50,
            total_bytes: 200,
        };
        assert_eq!(p.fraction(), Some(0.25));
    }

    #[test]
    fn fraction_unknown_total() {
        let p = FetchProgress {
            bytes_read: 50,
            total_bytes: 0,
        };
        assert_eq!(p.fraction(), None);
    }

    #[test]
    fn fraction_clamped() {
        let p = FetchProgress {
            bytes_read: 300,
            total_bytes: 200,
        };
        assert_eq!(p.fraction(), Some(1.0));
    }
}
