//! The optional `.env` file.

use std::path::Path;

/// Load `.env` from the current directory or one of its parents. Variables already set in
/// the environment are kept. A missing file is fine; a malformed one is an error.
pub fn load() -> Result<(), dotenvy::Error> {
    ignore_missing(dotenvy::dotenv().map(drop))
}

/// Load a specific env file, with the same rules as [`load`].
pub fn load_from(path: &Path) -> Result<(), dotenvy::Error> {
    ignore_missing(dotenvy::from_path(path))
}

fn ignore_missing(result: Result<(), dotenvy::Error>) -> Result<(), dotenvy::Error> {
    match result {
        Err(err) if err.not_found() => Ok(()),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn a_missing_file_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();

        assert!(load_from(&dir.path().join(".env")).is_ok());
    }

    #[test]
    fn variables_are_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".env");
        std::fs::write(&path, "PSYLLID_DOTENV_LOADED=yes\n").unwrap();

        load_from(&path).unwrap();

        assert_eq!(std::env::var("PSYLLID_DOTENV_LOADED").as_deref(), Ok("yes"));
    }

    #[test]
    fn a_malformed_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".env");
        std::fs::write(&path, "PSYLLID_DOTENV_BROKEN='unterminated\n").unwrap();

        let err = load_from(&path).unwrap_err();

        assert!(!err.not_found(), "{err}");
    }
}
