//! Identifier source and output directory glue
//!
//! The identifier list is newline-delimited. Lines are trimmed; blank lines
//! and lines starting with `#` are ignored.

use std::path::Path;

use crate::utils::error::InputError;

/// Parse identifiers from the contents of an identifier list
pub fn parse_identifiers(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(String::from)
        .collect()
}

/// Load identifiers from `path`
///
/// # Errors
///
/// Returns `InputError::NotFound` if the file does not exist and
/// `InputError::Read` if it cannot be read.
pub fn load_identifiers(path: &Path) -> Result<Vec<String>, InputError> {
    if !path.exists() {
        return Err(InputError::NotFound {
            path: path.to_path_buf(),
        });
    }

    let content = std::fs::read_to_string(path).map_err(|source| InputError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(parse_identifiers(&content))
}

/// Create the output directory (and parents) if it does not exist
pub fn ensure_output_directory(path: &Path) -> Result<(), InputError> {
    std::fs::create_dir_all(path).map_err(|source| InputError::CreateDir {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_identifiers_skips_comments_and_blanks() {
        let content = "# This is a comment\n\
            https://datacatalogue.cessda.eu/detail/guid1\n\
            \n\
              https://datacatalogue.cessda.eu/detail/guid2  \n\
            # Another comment\n\
            \t\n\
            doi:10.1234/abc\n";

        assert_eq!(
            parse_identifiers(content),
            vec![
                "https://datacatalogue.cessda.eu/detail/guid1",
                "https://datacatalogue.cessda.eu/detail/guid2",
                "doi:10.1234/abc",
            ]
        );
    }

    #[test]
    fn test_parse_identifiers_keeps_duplicates_in_order() {
        assert_eq!(parse_identifiers("b\na\nb\r\n"), vec!["b", "a", "b"]);
    }

    #[test]
    fn test_load_identifiers_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = load_identifiers(&dir.path().join("guids.txt")).unwrap_err();
        assert!(matches!(err, InputError::NotFound { .. }));
    }

    #[test]
    fn test_load_identifiers_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("guids.txt");
        std::fs::write(&path, "# header\nguid-1\nguid-2\n").unwrap();

        assert_eq!(load_identifiers(&path).unwrap(), vec!["guid-1", "guid-2"]);
    }

    #[test]
    fn test_ensure_output_directory_nested() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("a").join("b");

        ensure_output_directory(&nested).unwrap();
        assert!(nested.is_dir());
        // Idempotent
        ensure_output_directory(&nested).unwrap();
    }
}
