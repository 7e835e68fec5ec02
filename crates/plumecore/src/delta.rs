use serde::{Deserialize, Serialize};

/// Minimal change descriptor for a single contiguous edit.
///
/// Describes a transition between two documents as "keep `retain`
/// characters, remove `delete` characters, splice in `insert`". This is
/// bookkeeping for change events, not a formatting model; structured
/// document operations belong to the wrapped widget.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Delta {
    pub retain: usize,
    pub delete: usize,
    pub insert: String,
}

impl Delta {
    /// Describe an insertion of `text` after `retain` characters.
    pub fn insertion(retain: usize, text: &str) -> Self {
        Self {
            retain,
            delete: 0,
            insert: text.to_string(),
        }
    }

    /// Describe a removal of `count` characters after `retain`.
    pub fn removal(retain: usize, count: usize) -> Self {
        Self {
            retain,
            delete: count,
            insert: String::new(),
        }
    }

    /// Compute the descriptor between two documents by trimming the
    /// common prefix and suffix, in characters.
    pub fn between(old: &str, new: &str) -> Self {
        let old_chars: Vec<char> = old.chars().collect();
        let new_chars: Vec<char> = new.chars().collect();

        let mut prefix = 0;
        while prefix < old_chars.len()
            && prefix < new_chars.len()
            && old_chars[prefix] == new_chars[prefix]
        {
            prefix += 1;
        }

        let mut suffix = 0;
        while suffix < old_chars.len() - prefix
            && suffix < new_chars.len() - prefix
            && old_chars[old_chars.len() - 1 - suffix] == new_chars[new_chars.len() - 1 - suffix]
        {
            suffix += 1;
        }

        Self {
            retain: prefix,
            delete: old_chars.len() - prefix - suffix,
            insert: new_chars[prefix..new_chars.len() - suffix].iter().collect(),
        }
    }

    /// True when the descriptor changes nothing.
    pub fn is_identity(&self) -> bool {
        self.delete == 0 && self.insert.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_between_equal_documents() {
        let delta = Delta::between("hello", "hello");
        assert!(delta.is_identity());
        assert_eq!(delta.retain, 5);
    }

    #[test]
    fn test_pure_insertion() {
        let delta = Delta::between("helo", "hello");
        assert_eq!(delta.retain, 3);
        assert_eq!(delta.delete, 0);
        assert_eq!(delta.insert, "l");
    }

    #[test]
    fn test_pure_removal() {
        let delta = Delta::between("hello world", "hello");
        assert_eq!(delta.retain, 5);
        assert_eq!(delta.delete, 6);
        assert_eq!(delta.insert, "");
    }

    #[test]
    fn test_replacement_in_the_middle() {
        let delta = Delta::between("one two three", "one 2 three");
        assert_eq!(delta.retain, 4);
        assert_eq!(delta.delete, 3);
        assert_eq!(delta.insert, "2");
    }

    #[test]
    fn test_full_replacement() {
        let delta = Delta::between("abc", "xyz");
        assert_eq!(delta.retain, 0);
        assert_eq!(delta.delete, 3);
        assert_eq!(delta.insert, "xyz");
    }

    #[test]
    fn test_empty_to_content() {
        let delta = Delta::between("", "hello");
        assert_eq!(delta, Delta::insertion(0, "hello"));
    }

    #[test]
    fn test_multibyte_characters_counted_as_chars() {
        let delta = Delta::between("日本", "日本語");
        assert_eq!(delta.retain, 2);
        assert_eq!(delta.delete, 0);
        assert_eq!(delta.insert, "語");
    }

    #[test]
    fn test_constructors() {
        assert_eq!(
            Delta::insertion(2, "ab"),
            Delta {
                retain: 2,
                delete: 0,
                insert: "ab".to_string()
            }
        );
        assert_eq!(
            Delta::removal(1, 3),
            Delta {
                retain: 1,
                delete: 3,
                insert: String::new()
            }
        );
    }
}
