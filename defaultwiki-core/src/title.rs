use std::fmt;

use serde::Serialize;

/// The page that can never be deleted and that `/` points at.
pub const FRONT_PAGE: &str = "FrontPage";

#[derive(Debug, PartialEq, Eq)]
pub enum TitleError {
    Invalid(String),
}

impl fmt::Display for TitleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TitleError::Invalid(raw) => write!(f, "Invalid page title: {:?}", raw),
        }
    }
}

impl std::error::Error for TitleError {}

/// A page identifier that is safe to use as a file name stem.
///
/// Only ASCII letters, digits and `-` are accepted, so a title can never
/// contain a path separator, a dot or an encoded escape.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Title(String);

impl Title {
    pub fn parse(raw: &str) -> Result<Self, TitleError> {
        if is_valid_title(raw) {
            Ok(Title(raw.to_string()))
        } else {
            Err(TitleError::Invalid(raw.to_string()))
        }
    }

    pub fn front_page() -> Self {
        Title(FRONT_PAGE.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_front_page(&self) -> bool {
        self.0.eq_ignore_ascii_case(FRONT_PAGE)
    }
}

impl fmt::Display for Title {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Title {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

fn is_valid_title(raw: &str) -> bool {
    !raw.is_empty() && raw.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_path_safe_titles() {
        for raw in ["FrontPage", "a", "release-notes-2024", "-", "ABC123"] {
            let title = Title::parse(raw).unwrap();
            assert_eq!(title.as_str(), raw);
        }
    }

    #[test]
    fn test_rejects_everything_else() {
        let bad = [
            "",
            "../etc/passwd",
            "a/b",
            "a.txt",
            "with space",
            "under_score",
            "%2e%2e",
            "caf\u{e9}",
            "tab\t",
            "semi;colon",
            "new\nline",
        ];
        for raw in bad {
            assert_eq!(
                Title::parse(raw),
                Err(TitleError::Invalid(raw.to_string())),
                "{raw:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_front_page_is_case_insensitive() {
        assert!(Title::parse("FrontPage").unwrap().is_front_page());
        assert!(Title::parse("frontpage").unwrap().is_front_page());
        assert!(Title::parse("FRONTPAGE").unwrap().is_front_page());
        assert!(!Title::parse("FrontPage2").unwrap().is_front_page());
        assert!(Title::front_page().is_front_page());
    }
}
