use super::DomainError;
use serde::{Serialize, Serializer};
use std::fmt;

/// A repository path guaranteed to be **relative** and normalized.
///
/// Invariants, enforced at construction:
/// - never absolute, never escapes its root through `..`
/// - `/` separated (backslashes are converted), no `.` or empty segments
///
/// Snapshot contents, catalog records and blueprint entries are all keyed by
/// this type, so two spellings of one file always compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RelativePath(String);

impl RelativePath {
    /// Create a new relative path.
    ///
    /// # Panics
    /// Panics if the path is absolute or escapes its root (use `try_new` for fallible).
    pub fn new(path: impl AsRef<str>) -> Self {
        match Self::try_new(path.as_ref()) {
            Ok(p) => p,
            Err(e) => panic!("RelativePath: {e}"),
        }
    }

    /// Fallible constructor.
    pub fn try_new(path: impl AsRef<str>) -> Result<Self, DomainError> {
        let raw = path.as_ref();
        let unified = raw.replace('\\', "/");

        if unified.starts_with('/') || has_drive_prefix(&unified) {
            return Err(DomainError::InvalidPath {
                path: raw.to_string(),
                reason: "absolute paths are not allowed".into(),
            });
        }

        let mut segments: Vec<&str> = Vec::new();
        for segment in unified.split('/') {
            match segment {
                "" | "." => {}
                ".." => {
                    if segments.pop().is_none() {
                        return Err(DomainError::InvalidPath {
                            path: raw.to_string(),
                            reason: "path escapes its root".into(),
                        });
                    }
                }
                other => segments.push(other),
            }
        }

        Ok(Self(segments.join("/")))
    }

    /// Join a relative segment (which may contain `..`) onto this path.
    pub fn join(&self, segment: impl AsRef<str>) -> Result<Self, DomainError> {
        let segment = segment.as_ref();
        if segment.starts_with('/') {
            return Err(DomainError::InvalidPath {
                path: segment.to_string(),
                reason: "cannot join an absolute path".into(),
            });
        }
        if self.0.is_empty() {
            Self::try_new(segment)
        } else {
            Self::try_new(format!("{}/{}", self.0, segment))
        }
    }

    /// The containing directory (empty path for top-level entries).
    pub fn parent(&self) -> RelativePath {
        match self.0.rsplit_once('/') {
            Some((dir, _)) => Self(dir.to_string()),
            None => Self(String::new()),
        }
    }

    /// Last segment.
    pub fn file_name(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or("")
    }

    /// File name up to the first `.`, so `hero.module.css` has stem `hero`.
    pub fn stem(&self) -> &str {
        let name = self.file_name();
        match name.find('.') {
            Some(0) | None => name,
            Some(idx) => &name[..idx],
        }
    }

    /// Extension after the last `.` of the file name.
    pub fn extension(&self) -> Option<&str> {
        let name = self.file_name();
        match name.rfind('.') {
            Some(0) | None => None,
            Some(idx) => Some(&name[idx + 1..]),
        }
    }

    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('/').filter(|s| !s.is_empty())
    }

    /// Whether `self` lives at or below `dir`.
    pub fn starts_with(&self, dir: &RelativePath) -> bool {
        dir.0.is_empty()
            || self.0 == dir.0
            || (self.0.starts_with(&dir.0) && self.0.as_bytes().get(dir.0.len()) == Some(&b'/'))
    }

    /// Strip a directory prefix, returning the remainder.
    pub fn strip_prefix(&self, dir: &RelativePath) -> Option<RelativePath> {
        if dir.0.is_empty() {
            return Some(self.clone());
        }
        if !self.starts_with(dir) {
            return None;
        }
        Some(Self(self.0[dir.0.len()..].trim_start_matches('/').to_string()))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn has_drive_prefix(s: &str) -> bool {
    let bytes = s.as_bytes();
    bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':'
}

impl AsRef<str> for RelativePath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for RelativePath {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl fmt::Display for RelativePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for RelativePath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

/// Normalize a file stem into a kebab-case identity.
///
/// | Input | Output |
/// |-------|--------|
/// | "HeroSection" | "hero-section" |
/// | "hero_section" | "hero-section" |
/// | "CTAButton" | "cta-button" |
pub fn to_kebab_case(s: &str) -> String {
    split_words(s).join("-")
}

/// Split a string into words based on casing and separators.
///
/// 1. `_`, `-`, `.` and whitespace always split
/// 2. `aB` splits between `a` and `B`
/// 3. `HTTPRequest` splits between `P` and `R` (Upper Upper Lower)
fn split_words(input: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '_' || c == '-' || c == '.' || c.is_whitespace() {
            if !current.is_empty() {
                words.push(current.to_lowercase());
                current.clear();
            }
            continue;
        }

        if let Some(&next) = chars.peek() {
            if (c.is_lowercase() || c.is_ascii_digit()) && next.is_uppercase() {
                current.push(c);
                words.push(current.to_lowercase());
                current.clear();
                continue;
            }

            if c.is_uppercase()
                && next.is_uppercase()
                && chars.clone().nth(1).is_some_and(|n| n.is_lowercase())
            {
                current.push(c);
                words.push(current.to_lowercase());
                current.clear();
                continue;
            }
        }

        current.push(c);
    }

    if !current.is_empty() {
        words.push(current.to_lowercase());
    }

    words
}
