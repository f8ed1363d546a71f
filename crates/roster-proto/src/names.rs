//! NAMES-reply (numeric 353) helpers.
//!
//! The trailing argument of a 353 reply is a space-separated nick list
//! where operators and voiced users carry a `@` or `+` sigil. Sigils are
//! presentation only and are stripped before identity comparison.

/// Strip one leading `@` or `+` sigil from a NAMES token.
///
/// # Example
///
/// ```
/// use roster_proto::names;
///
/// assert_eq!(names::strip_sigil(b"@alice"), b"alice");
/// assert_eq!(names::strip_sigil(b"+bob"), b"bob");
/// assert_eq!(names::strip_sigil(b"carol"), b"carol");
/// ```
pub fn strip_sigil(token: &[u8]) -> &[u8] {
    match token.first() {
        Some(b'@') | Some(b'+') => &token[1..],
        _ => token,
    }
}

/// Split a 353 trailing argument into nick tokens, skipping empty
/// tokens from doubled spaces.
pub fn tokens(listing: &[u8]) -> impl Iterator<Item = &[u8]> {
    listing.split(|&b| b == b' ').filter(|t| !t.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_sigil() {
        assert_eq!(strip_sigil(b"@op"), b"op");
        assert_eq!(strip_sigil(b"+voiced"), b"voiced");
        assert_eq!(strip_sigil(b"plain"), b"plain");
        // Only one sigil is stripped; the rest is identity.
        assert_eq!(strip_sigil(b"@+odd"), b"+odd");
        assert_eq!(strip_sigil(b""), b"");
    }

    #[test]
    fn test_tokens_skip_empties() {
        let listing = b"@alice  +bob carol ";
        let nicks: Vec<&[u8]> = tokens(listing).collect();
        assert_eq!(nicks, vec![&b"@alice"[..], &b"+bob"[..], &b"carol"[..]]);
    }
}
