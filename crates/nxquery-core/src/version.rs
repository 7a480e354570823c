// ── Version comparison ──
//
// Dotted numeric versions, compared segment by segment. Missing trailing
// segments count as zero and non-numeric segments parse as zero.

use std::cmp::Ordering;

fn segments(version: &str) -> Vec<u64> {
    version
        .trim()
        .split('.')
        .map(|s| s.trim().parse().unwrap_or(0))
        .collect()
}

/// Compare two dotted version strings.
pub fn compare_versions(left: &str, right: &str) -> Ordering {
    let left = segments(left);
    let right = segments(right);
    let len = left.len().max(right.len());

    (0..len)
        .map(|i| {
            let l = left.get(i).copied().unwrap_or(0);
            let r = right.get(i).copied().unwrap_or(0);
            l.cmp(&r)
        })
        .find(|ord| ord.is_ne())
        .unwrap_or(Ordering::Equal)
}

/// `true` when `version` satisfies the `minimum` gate (equality included).
pub fn is_version_greater_or_equal(version: &str, minimum: &str) -> bool {
    compare_versions(version, minimum) != Ordering::Less
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equal_versions_satisfy_gate() {
        assert!(is_version_greater_or_equal("5.2.4", "5.2.4"));
    }

    #[test]
    fn segments_compare_numerically() {
        assert!(is_version_greater_or_equal("5.2.10", "5.2.4"));
        assert!(!is_version_greater_or_equal("5.1.9", "5.2.4"));
        assert!(is_version_greater_or_equal("6.0", "5.2.4"));
    }

    #[test]
    fn missing_segments_are_zero() {
        assert!(is_version_greater_or_equal("5", "4.9.9"));
        assert!(is_version_greater_or_equal("5.2", "5.2.0"));
        assert!(!is_version_greater_or_equal("5.2", "5.2.1"));
        assert_eq!(compare_versions("5.2.0.0", "5.2"), Ordering::Equal);
    }

    #[test]
    fn non_numeric_segments_are_zero() {
        assert!(is_version_greater_or_equal("5.x.4", "5.0.4"));
        assert!(!is_version_greater_or_equal("5.2-rc1", "5.2.4"));
        assert_eq!(compare_versions("abc", "0"), Ordering::Equal);
    }
}
