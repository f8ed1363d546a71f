//! Prefix identity helpers.
//!
//! A message prefix of the form `nick!user@host` identifies the acting
//! nick; the part after `!` is opaque identity info the bot records but
//! never interprets.

/// The nick portion of a prefix: everything before the first `!`.
///
/// A prefix without `!` (e.g. a bare server name) is returned whole.
///
/// # Example
///
/// ```
/// use roster_proto::prefix;
///
/// assert_eq!(prefix::nick(b"alice!ident@example.net"), b"alice");
/// assert_eq!(prefix::nick(b"irc.example.net"), b"irc.example.net");
/// ```
pub fn nick(prefix: &[u8]) -> &[u8] {
    match prefix.iter().position(|&b| b == b'!') {
        Some(split) => &prefix[..split],
        None => prefix,
    }
}

/// The opaque `user@host` portion of a prefix: everything after the
/// first `!`, or `None` when the prefix carries no user info.
///
/// # Example
///
/// ```
/// use roster_proto::prefix;
///
/// assert_eq!(
///     prefix::user_info(b"alice!ident@example.net"),
///     Some(&b"ident@example.net"[..])
/// );
/// assert_eq!(prefix::user_info(b"irc.example.net"), None);
/// ```
pub fn user_info(prefix: &[u8]) -> Option<&[u8]> {
    prefix
        .iter()
        .position(|&b| b == b'!')
        .map(|split| &prefix[split + 1..])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nick_splits_at_first_bang() {
        assert_eq!(nick(b"alice!ident@host"), b"alice");
        // Only the first `!` matters.
        assert_eq!(nick(b"a!b!c@host"), b"a");
    }

    #[test]
    fn test_server_prefix_has_no_user_info() {
        assert_eq!(nick(b"irc.libera.chat"), b"irc.libera.chat");
        assert_eq!(user_info(b"irc.libera.chat"), None);
    }

    #[test]
    fn test_user_info_is_remainder() {
        assert_eq!(user_info(b"alice!ident@host"), Some(&b"ident@host"[..]));
        assert_eq!(user_info(b"alice!"), Some(&b""[..]));
    }
}
