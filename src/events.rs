//! Protocol event processing.
//!
//! Stateless translation of parsed lines into registry operations.
//! Only membership events are handled here; everything else is some
//! other layer's business and passes through untouched.
//!
//! Events are applied one at a time in wire order. Anything the
//! registry rejects surfaces as an error for the caller to report and
//! drop; a bad server message never unwinds further than that.

use roster_proto::line::ParsedLine;
use roster_proto::{names, prefix};

use crate::error::{lossy, EventError};
use crate::state::NickRegistry;

/// Apply one parsed line to the registry.
///
/// Commands that do not affect membership return `Ok` without touching
/// any state.
pub fn apply(registry: &NickRegistry, line: &ParsedLine<'_>) -> Result<(), EventError> {
    match line.command {
        b"353" => on_names(registry, line),
        b"JOIN" => on_join(registry, line),
        b"PART" => on_part(registry, line),
        b"NICK" => on_nick(registry, line),
        b"QUIT" => on_quit(registry, line),
        b"KICK" => on_kick(registry, line),
        _ => Ok(()),
    }
}

fn command_name(line: &ParsedLine<'_>) -> String {
    lossy(line.command)
}

/// The acting nick: the prefix up to its first `!`.
pub(crate) fn source_nick<'a>(line: &ParsedLine<'a>) -> Result<&'a [u8], EventError> {
    line.prefix
        .map(prefix::nick)
        .ok_or_else(|| EventError::MissingPrefix {
            command: command_name(line),
        })
}

pub(crate) fn arg<'a>(line: &ParsedLine<'a>, index: usize) -> Result<&'a [u8], EventError> {
    line.params
        .get(index)
        .copied()
        .ok_or_else(|| EventError::MissingArgument {
            command: command_name(line),
        })
}

/// Numeric 353: a channel's occupant listing.
///
/// Modern servers send (client, symbol, channel, names); RFC 1459 had
/// no symbol. The channel and listing are the last two arguments in
/// both shapes.
fn on_names(registry: &NickRegistry, line: &ParsedLine<'_>) -> Result<(), EventError> {
    if line.params.len() < 2 {
        return Err(EventError::MissingArgument {
            command: command_name(line),
        });
    }
    let channel = line.params[line.params.len() - 2];
    let listing = line.params[line.params.len() - 1];

    registry.apply_names_listing(channel, names::tokens(listing));
    Ok(())
}

fn on_join(registry: &NickRegistry, line: &ParsedLine<'_>) -> Result<(), EventError> {
    let nick = source_nick(line)?;
    let channel = arg(line, 0)?;
    // The JOIN prefix is the one place identity is learned.
    let user = line.prefix.and_then(prefix::user_info);

    registry.add_nick_to_channel(nick, channel, user, false)?;
    Ok(())
}

fn on_part(registry: &NickRegistry, line: &ParsedLine<'_>) -> Result<(), EventError> {
    let nick = source_nick(line)?;
    let channel = arg(line, 0)?;

    registry.remove_nick_from_channel(nick, channel)?;
    Ok(())
}

fn on_nick(registry: &NickRegistry, line: &ParsedLine<'_>) -> Result<(), EventError> {
    let old = source_nick(line)?;
    let new = arg(line, 0)?;

    registry.rename_nick(old, new)?;
    Ok(())
}

fn on_quit(registry: &NickRegistry, line: &ParsedLine<'_>) -> Result<(), EventError> {
    let nick = source_nick(line)?;

    registry.quit_nick(nick)?;
    Ok(())
}

fn on_kick(registry: &NickRegistry, line: &ParsedLine<'_>) -> Result<(), EventError> {
    let channel = arg(line, 0)?;
    let target = arg(line, 1)?;

    registry.kick(target, channel)?;
    Ok(())
}
