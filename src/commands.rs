//! Bot command handling for PRIVMSG traffic.
//!
//! A message is a command when it is addressed `ownnick: …` in a
//! channel or arrives in a query. Handlers are pure: they read the
//! registry and return [`Response`] values; the wire layer decides how
//! to send them.

use roster_proto::line::ParsedLine;

use crate::error::EventError;
use crate::events::{arg, source_nick};
use crate::state::NickRegistry;

/// Zero-width space inserted into reported nicks so a roster listing
/// does not highlight everyone it names.
const ZWSP: char = '\u{200B}';

/// Flush threshold for chunked responses, in payload bytes.
const RESPONSE_CHUNK_BYTES: usize = 300;

/// An outbound reply produced by command handling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    /// Nick or channel to send to.
    pub target: Vec<u8>,
    /// Message text.
    pub text: Vec<u8>,
}

/// Handle one PRIVMSG line.
///
/// Returns the responses to send, which is empty when the message was
/// not addressed to the bot. Registry rejections (e.g. a roster query
/// for a channel nobody occupies) propagate for the caller to report.
pub fn handle_privmsg(
    registry: &NickRegistry,
    own_nick: &[u8],
    line: &ParsedLine<'_>,
) -> Result<Vec<Response>, EventError> {
    let sender = source_nick(line)?;
    let target = arg(line, 0)?;
    let text = arg(line, 1)?;

    // In queries the sender is also where responses go.
    let is_query = target == own_nick;
    let reply_to = if is_query { sender } else { target };

    let (command, response_prefix) = if let Some(command) = addressed_command(own_nick, text) {
        let mut prefix = sender.to_vec();
        prefix.extend_from_slice(b": ");
        (command, prefix)
    } else if is_query {
        (trim_spaces(text), Vec::new())
    } else {
        return Ok(Vec::new());
    };

    let verb = command.split(|&b| b == b' ').next().unwrap_or_default();

    if verb == b"nicks" {
        let members = registry.snapshot_channel(reply_to)?;
        Ok(roster_responses(reply_to, &response_prefix, &members))
    } else {
        let mut text = response_prefix;
        text.extend_from_slice(b"Commands: nicks");
        Ok(vec![Response {
            target: reply_to.to_vec(),
            text,
        }])
    }
}

/// The command text of a message addressed `ownnick: command`, with the
/// own-nick match case-insensitive. `None` when not addressed.
fn addressed_command<'a>(own_nick: &[u8], text: &'a [u8]) -> Option<&'a [u8]> {
    if text.len() < own_nick.len() + 1 {
        return None;
    }
    let (name, rest) = text.split_at(own_nick.len());
    if name.eq_ignore_ascii_case(own_nick) && rest.first() == Some(&b':') {
        Some(trim_spaces(&rest[1..]))
    } else {
        None
    }
}

fn trim_spaces(text: &[u8]) -> &[u8] {
    text.trim_ascii()
}

/// Build the chunked `nicks` listing.
///
/// Nicks are munged with a zero-width space after their first character
/// and flushed whenever the pending payload reaches the chunk size.
fn roster_responses(target: &[u8], response_prefix: &[u8], members: &[Vec<u8>]) -> Vec<Response> {
    let mut responses = Vec::new();
    let mut payload: Vec<u8> = Vec::new();

    for nick in members {
        payload.extend_from_slice(&munge_nick(nick));
        payload.push(b' ');

        if payload.len() >= RESPONSE_CHUNK_BYTES {
            responses.push(make_response(target, response_prefix, &payload));
            payload.clear();
        }
    }
    if !payload.is_empty() {
        responses.push(make_response(target, response_prefix, &payload));
    }
    responses
}

fn make_response(target: &[u8], response_prefix: &[u8], payload: &[u8]) -> Response {
    let mut text = response_prefix.to_vec();
    text.extend_from_slice(payload);
    Response {
        target: target.to_vec(),
        text,
    }
}

/// Insert a zero-width space after the nick's first character.
///
/// Nicks are decoded lossily for the insertion; the munged form is
/// presentation only and never flows back into the registry.
fn munge_nick(nick: &[u8]) -> Vec<u8> {
    let text = String::from_utf8_lossy(nick);
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => {
            let mut munged = String::with_capacity(text.len() + ZWSP.len_utf8());
            munged.push(first);
            munged.push(ZWSP);
            munged.push_str(chars.as_str());
            munged.into_bytes()
        }
        None => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RegistryError;
    use roster_proto::parse_line;

    fn seeded_registry() -> NickRegistry {
        let registry = NickRegistry::new();
        let listing: Vec<&[u8]> = vec![b"alice", b"bob"];
        registry.apply_names_listing(b"#chan", listing);
        registry
    }

    fn handle(registry: &NickRegistry, raw: &[u8]) -> Result<Vec<Response>, EventError> {
        let line = parse_line(raw).expect("test line must parse");
        handle_privmsg(registry, b"roster", &line)
    }

    #[test]
    fn test_unaddressed_channel_chatter_is_ignored() {
        let registry = seeded_registry();
        let responses = handle(&registry, b":alice!u@h PRIVMSG #chan :hello all").unwrap();
        assert!(responses.is_empty());
    }

    #[test]
    fn test_addressed_nicks_command() {
        let registry = seeded_registry();
        let responses = handle(&registry, b":alice!u@h PRIVMSG #chan :roster: nicks").unwrap();

        assert_eq!(responses.len(), 1);
        assert_eq!(responses[0].target, b"#chan".to_vec());

        let text = String::from_utf8(responses[0].text.clone()).unwrap();
        assert!(text.starts_with("alice: "));
        assert!(text.contains("a\u{200B}lice"));
        assert!(text.contains("b\u{200B}ob"));
    }

    #[test]
    fn test_addressing_is_case_insensitive() {
        let registry = seeded_registry();
        let responses = handle(&registry, b":alice!u@h PRIVMSG #chan :ROSTER: nicks").unwrap();
        assert_eq!(responses.len(), 1);
    }

    #[test]
    fn test_query_needs_no_address() {
        let registry = seeded_registry();
        // In a query, responses go back to the sender; #chan has a
        // roster but the query "channel" does not.
        let err = handle(&registry, b":alice!u@h PRIVMSG roster :nicks").unwrap_err();
        assert!(matches!(
            err,
            EventError::Registry(RegistryError::UnknownChannel(_))
        ));
    }

    #[test]
    fn test_unknown_command_lists_commands() {
        let registry = seeded_registry();
        let responses = handle(&registry, b":alice!u@h PRIVMSG #chan :roster: help").unwrap();

        assert_eq!(responses.len(), 1);
        assert_eq!(responses[0].text, b"alice: Commands: nicks".to_vec());
    }

    #[test]
    fn test_surrounding_spaces_are_trimmed() {
        let registry = seeded_registry();
        let responses = handle(&registry, b":alice!u@h PRIVMSG #chan :roster:   nicks  ").unwrap();
        assert_eq!(responses.len(), 1);
        assert!(responses[0].text.starts_with(b"alice: "));
    }

    #[test]
    fn test_long_rosters_are_chunked() {
        let registry = NickRegistry::new();
        let nicks: Vec<Vec<u8>> = (0..60)
            .map(|i| format!("member{i:02}xxxxxxxx").into_bytes())
            .collect();
        registry.apply_names_listing(b"#big", nicks.iter().map(|n| n.as_slice()));

        let responses = handle(&registry, b":alice!u@h PRIVMSG #big :roster: nicks").unwrap();
        assert!(responses.len() > 1, "expected chunked output");

        // Every chunk stays near the flush threshold and every nick
        // appears exactly once across the chunks.
        let mut total = 0;
        for response in &responses {
            let payload = &response.text[b"alice: ".len()..];
            assert!(payload.len() <= RESPONSE_CHUNK_BYTES + 32);
            total += payload
                .split(|&b| b == b' ')
                .filter(|t| !t.is_empty())
                .count();
        }
        assert_eq!(total, 60);
    }

    #[test]
    fn test_munge_inserts_zwsp_after_first_char() {
        assert_eq!(munge_nick(b"alice"), "a\u{200B}lice".as_bytes().to_vec());
        assert_eq!(munge_nick(b"x"), "x\u{200B}".as_bytes().to_vec());
    }
}
