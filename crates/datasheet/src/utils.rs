use std::path::Path;

#[inline]
pub(crate) fn relpath<P1, P2>(path: P1, prefix: P2) -> String
where
    P1: AsRef<Path>,
    P2: AsRef<Path>,
{
    path.as_ref()
        .strip_prefix(prefix)
        .expect("valid prefix")
        .to_str()
        .unwrap()
        .into()
}

/// Formats large counts the way the datasheets do (`1.23B`,
/// `4.56M`, `7.89K`); small values are printed as-is.
pub(crate) fn human_readable_large_int(value: u64) -> String {
    const THRESHOLDS: [(u64, &str); 3] = [
        (1_000_000_000, "B"),
        (1_000_000, "M"),
        (1_000, "K"),
    ];

    for (threshold, label) in THRESHOLDS {
        if value > threshold {
            return format!(
                "{:.2}{label}",
                value as f64 / threshold as f64
            );
        }
    }

    value.to_string()
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    #[test]
    fn relpath_ok() {
        let path = PathBuf::from("/home/foo/bar/baz.txt");
        let prefix = PathBuf::from("/home/foo");
        assert_eq!(relpath(path, prefix), "bar/baz.txt");
    }

    #[test]
    #[should_panic]
    fn relpath_panic() {
        let path = PathBuf::from("/home/foo/bar/baz.txt");
        let prefix = PathBuf::from("/home/bar");
        let _ = relpath(path, prefix);
    }

    #[test]
    fn human_readable() {
        assert_eq!(human_readable_large_int(0), "0");
        assert_eq!(human_readable_large_int(999), "999");
        assert_eq!(human_readable_large_int(1_000), "1000");
        assert_eq!(human_readable_large_int(1_500), "1.50K");
        assert_eq!(human_readable_large_int(2_340_000), "2.34M");
        assert_eq!(
            human_readable_large_int(1_250_000_000),
            "1.25B"
        );
    }
}
