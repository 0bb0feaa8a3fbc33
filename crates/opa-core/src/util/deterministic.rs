//! Deterministic ordering helpers.
//!
//! Everything that feeds a fingerprint or an error message goes through
//! here, so identical catalogs always produce identical output regardless
//! of the order their documents were written in.

/// Borrow `values` in ascending byte-wise order.
///
/// The source slice is left untouched: emitted rules keep their original
/// field order, only the canonical form is sorted.
pub fn sorted_strs(values: &[String]) -> Vec<&str> {
    let mut sorted: Vec<&str> = values.iter().map(String::as_str).collect();
    sorted.sort_unstable();
    sorted
}

/// Collect `names` into an owned, sorted list for diagnostics.
pub fn sorted_names<'a>(names: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let mut sorted: Vec<String> = names.into_iter().map(str::to_string).collect();
    sorted.sort();
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn sorted_strs_orders_bytewise() {
        let values = strings(&["list", "Get", "get", "watch"]);

        // Uppercase sorts before lowercase; no case folding.
        assert_eq!(sorted_strs(&values), vec!["Get", "get", "list", "watch"]);
    }

    #[test]
    fn sorted_strs_does_not_reorder_source() {
        let values = strings(&["watch", "get"]);
        let _ = sorted_strs(&values);

        assert_eq!(values, strings(&["watch", "get"]));
    }

    #[test]
    fn sorted_strs_keeps_duplicates() {
        let values = strings(&["get", "list", "get"]);
        assert_eq!(sorted_strs(&values), vec!["get", "get", "list"]);
    }

    #[test]
    fn sorted_strs_compares_unicode_by_bytes() {
        // U+00E9 (0xC3 0xA9) sorts after 'z' (0x7A) byte-wise.
        let values = strings(&["\u{e9}t\u{e9}", "zeta", "e\u{301}t\u{e9}"]);
        assert_eq!(
            sorted_strs(&values),
            vec!["e\u{301}t\u{e9}", "zeta", "\u{e9}t\u{e9}"]
        );
    }

    #[test]
    fn sorted_names_is_deterministic_across_runs() {
        let first = sorted_names(["b.v2", "a.v1", "c.v0"]);
        let second = sorted_names(["c.v0", "b.v2", "a.v1"]);

        assert_eq!(first, second);
        assert_eq!(first, vec!["a.v1", "b.v2", "c.v0"]);
    }
}
