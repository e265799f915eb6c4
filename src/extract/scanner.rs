//! Identifier code scanner
//!
//! Catalog codes show up in thread bodies in loose forms such as `CLUB-123`,
//! `CLUB123` or `club-123`. The scanner finds every occurrence of a marker
//! keyword, validates the numeric tail that follows it, and normalizes the
//! hit to `KEYWORD-NNN` using the keyword's configured casing.

/// Separator allowed between a keyword and its numeric tail
const SEPARATOR: char = '-';

/// Number of digits in a normalized tail
const TAIL_DIGITS: usize = 3;

/// Insertion-ordered set of normalized identifier codes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdentifierSet {
    codes: Vec<String>,
}

impl IdentifierSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a code, returning false if it was already present
    pub fn insert(&mut self, code: String) -> bool {
        if self.contains(&code) {
            return false;
        }
        self.codes.push(code);
        true
    }

    pub fn contains(&self, code: &str) -> bool {
        self.codes.iter().any(|c| c == code)
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.codes.iter().map(String::as_str)
    }

    /// Adds every code of `other` that is not already present
    pub fn union(&mut self, other: IdentifierSet) {
        for code in other.codes {
            self.insert(code);
        }
    }

    /// Joins the codes with `separator`, in insertion order
    pub fn join(&self, separator: &str) -> String {
        self.codes.join(separator)
    }
}

impl<'a> IntoIterator for &'a IdentifierSet {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.codes.iter()
    }
}

impl FromIterator<String> for IdentifierSet {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        let mut set = IdentifierSet::new();
        for code in iter {
            set.insert(code);
        }
        set
    }
}

/// Scans `body` for identifier codes marked by `keyword`
///
/// Every occurrence of the keyword is examined, including occurrences that
/// overlap the tail of a previous hit, so `"ABC-123ABC-456"` yields both
/// codes. The exact casing is searched first; only when it no longer occurs
/// in the unscanned rest of the body is the lowercase form tried.
///
/// # Example
///
/// ```
/// use forum_harvest::extract::scan;
///
/// let codes = scan("new: CLUB-123, CLUB12x and club456", "CLUB");
/// assert_eq!(codes.join(","), "CLUB-123,CLUB-456");
/// ```
pub fn scan(body: &str, keyword: &str) -> IdentifierSet {
    let mut found = IdentifierSet::new();
    if keyword.is_empty() {
        return found;
    }

    let lowered = keyword.to_lowercase();
    let mut cursor = 0;

    while let Some((index, matched_len)) = find_keyword(body, keyword, &lowered, cursor) {
        if let Some(tail) = numeric_tail(&body[index..], matched_len) {
            found.insert(format!("{}{}{}", keyword, SEPARATOR, tail));
        }

        cursor = next_char_boundary(body, index);
    }

    found
}

/// Finds the next keyword occurrence at or after `from`
///
/// Returns the byte index of the occurrence and the byte length of the text
/// that matched (the lowercase form may differ in length for non-ASCII).
fn find_keyword(body: &str, keyword: &str, lowered: &str, from: usize) -> Option<(usize, usize)> {
    let rest = body.get(from..)?;

    if let Some(pos) = rest.find(keyword) {
        return Some((from + pos, keyword.len()));
    }

    rest.find(lowered).map(|pos| (from + pos, lowered.len()))
}

/// Validates the tail following a keyword occurrence
///
/// `site` starts at the occurrence. The character right after the keyword
/// must be a digit or the separator. The window of keyword plus tail
/// characters is cut from the site and its last three characters must all be
/// ASCII digits. A separator makes the window one character longer, so the
/// tail is still the three characters after it.
fn numeric_tail(site: &str, matched_len: usize) -> Option<String> {
    let next = site[matched_len..].chars().next()?;
    if !next.is_ascii_digit() && next != SEPARATOR {
        return None;
    }

    let tail_len = if next == SEPARATOR {
        TAIL_DIGITS + 1
    } else {
        TAIL_DIGITS
    };

    let keyword_chars = site[..matched_len].chars().count();
    let window: Vec<char> = site.chars().take(keyword_chars + tail_len).collect();
    let candidate = &window[window.len().saturating_sub(TAIL_DIGITS)..];

    if candidate.len() == TAIL_DIGITS && candidate.iter().all(|c| c.is_ascii_digit()) {
        Some(candidate.iter().collect())
    } else {
        None
    }
}

/// Byte index of the character after the one starting at `index`
fn next_char_boundary(body: &str, index: usize) -> usize {
    body[index..]
        .chars()
        .next()
        .map(|c| index + c.len_utf8())
        .unwrap_or(body.len())
}
