//! Filter helpers.
//!
//! The mapper treats filter fragments as trusted input and never rewrites
//! them. Callers interpolating untrusted text into a fragment escape the
//! value first.

/// Escape special characters in a filter value (RFC 4515).
///
/// ```
/// use ldapom::filter::escape;
///
/// assert_eq!(escape("a(b)*c"), "a\\28b\\29\\2ac");
/// ```
pub fn escape(value: &str) -> String {
    value
        .replace('\\', "\\5c")
        .replace('*', "\\2a")
        .replace('(', "\\28")
        .replace(')', "\\29")
        .replace('\0', "\\00")
}
