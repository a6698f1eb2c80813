//! Cache Entry Module
//!
//! Size accounting shared by the cache tier and the admission loop.

// == Accounted Size ==
/// Returns the number of bytes an entry occupies in the cache budget.
///
/// An entry is charged for its key and its value; there is no per-entry
/// overhead and the size is never stored alongside the entry.
pub fn accounted_size(key: &str, value: &str) -> usize {
    key.len() + value.len()
}

/// Size change that replacing `old_value` with `new_value` introduces.
pub fn overwrite_delta(old_value: &str, new_value: &str) -> isize {
    new_value.len() as isize - old_value.len() as isize
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accounted_size_counts_key_and_value() {
        assert_eq!(accounted_size("111", "aaa"), 6);
        assert_eq!(accounted_size("4", "d"), 2);
        assert_eq!(accounted_size("666", "evil"), 7);
    }

    #[test]
    fn test_accounted_size_uses_bytes_not_chars() {
        // "é" is two bytes in UTF-8
        assert_eq!(accounted_size("é", ""), 2);
    }

    #[test]
    fn test_accounted_size_empty_entry() {
        assert_eq!(accounted_size("", ""), 0);
    }

    #[test]
    fn test_overwrite_delta_shrink_and_grow() {
        assert_eq!(overwrite_delta("aaa", "aa"), -1);
        assert_eq!(overwrite_delta("aa", "aaaa"), 2);
        assert_eq!(overwrite_delta("abc", "xyz"), 0);
    }
}
