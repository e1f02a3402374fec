use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// Parse a class list: one student name per line.
///
/// Lines are trimmed and blank lines skipped. Names are otherwise kept as written:
/// duplicates stay, and nothing is normalized.
pub fn parse_names(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Read a class list from a text file.
pub fn read_names(path: &Path) -> Result<Vec<String>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read class list at {}", path.display()))?;
    Ok(parse_names(&text))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    #[test]
    fn test_parse_names_skips_blank_lines() {
        let names = parse_names("  Amine Benali \n\n\tSara Haddad\r\n   \n");
        assert_eq!(names, vec!["Amine Benali", "Sara Haddad"]);
    }

    #[test]
    fn test_parse_names_keeps_duplicates_and_case() {
        let names = parse_names("Lina\nlina\nLina\n");
        assert_eq!(names, vec!["Lina", "lina", "Lina"]);
    }

    #[test]
    fn test_read_names_from_file() {
        let path = env::temp_dir().join("classe_diag_test_names.txt");
        std::fs::write(&path, "Youssef\nMeriem\n").unwrap();

        let names = read_names(&path).unwrap();
        assert_eq!(names, vec!["Youssef", "Meriem"]);

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_read_missing_file_fails() {
        let path = env::temp_dir().join("classe_diag_test_names_missing.txt");
        let _ = std::fs::remove_file(&path);
        assert!(read_names(&path).is_err());
    }
}
