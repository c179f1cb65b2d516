use std::collections::HashSet;
use std::fs;
use std::path::Path;

use crate::errors::LoadError;

/// Turn the contents of a word list file into a normalized list of words: one word per line,
/// trimmed and upper-cased, with blank lines and repeats dropped. The first occurrence of each
/// word determines its position.
pub fn parse_word_list(contents: &str) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::new();

    contents
        .lines()
        .map(|line| line.trim().to_uppercase())
        .filter(|word| !word.is_empty())
        .filter(|word| seen.insert(word.clone()))
        .collect()
}

/// Read and normalize a word list file.
pub fn load_word_list<P: AsRef<Path>>(path: P) -> Result<Vec<String>, LoadError> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let words = parse_word_list(&contents);
    log::debug!("Loaded {} words from {}", words.len(), path.display());

    Ok(words)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_word_list_normalizes_entries() {
        let words = parse_word_list("one\n  Two \n\nONE\nthree\r\n\n");

        assert_eq!(words, vec!["ONE", "TWO", "THREE"]);
    }

    #[test]
    fn test_load_word_list_from_fixture() {
        let words =
            load_word_list(concat!(env!("CARGO_MANIFEST_DIR"), "/data/words0.txt")).unwrap();

        assert_eq!(words.len(), 10);
        assert_eq!(words[0], "ONE");
        assert_eq!(words[9], "TEN");
    }

    #[test]
    fn test_load_word_list_reports_missing_file() {
        let result = load_word_list("/nonexistent/words.txt");

        assert!(matches!(result, Err(LoadError::Io { .. })));
    }
}
