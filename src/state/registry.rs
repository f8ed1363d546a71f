//! Nick and channel membership registry.
//!
//! The registry owns the authoritative nick → channels mapping and a
//! by-channel index derived from it. Both live behind one mutex and
//! every operation acquires it exactly once, so callers observe either
//! the pre- or post-state of an operation, never anything in between,
//! and the two views can never diverge.
//!
//! A nick record moves through three states: unknown (no record),
//! present (one or more channels), and vacant (record retained, zero
//! channels, identity cleared). Vacant records are kept; whether to
//! drop them eventually is the caller's policy, not the registry's.
//!
//! No I/O happens while the lock is held; hold times are bounded by
//! map-sized work only.

use std::collections::{HashMap, HashSet};

use parking_lot::Mutex;
use roster_proto::names;

use crate::error::{lossy, RegistryError};

/// A tracked nick.
#[derive(Debug, Clone, Default)]
struct NickRecord {
    /// Channels the nick currently occupies.
    channels: HashSet<Vec<u8>>,
    /// Opaque `user@host` info from the last JOIN prefix. Cleared when
    /// the nick leaves its last channel: identity cannot be trusted
    /// across a disappearance.
    user: Option<Vec<u8>>,
}

/// Registry state. `members` is the by-channel index of `nicks` and is
/// updated in the same critical section by every mutation.
#[derive(Debug, Default)]
struct Inner {
    nicks: HashMap<Vec<u8>, NickRecord>,
    members: HashMap<Vec<u8>, HashSet<Vec<u8>>>,
}

/// Concurrency-safe nick/channel membership store.
#[derive(Debug, Default)]
pub struct NickRegistry {
    inner: Mutex<Inner>,
}

/// Record a membership in both views. Tolerant of memberships that
/// already exist; `user`, when given, replaces the stored identity.
fn insert_membership(inner: &mut Inner, nick: &[u8], channel: &[u8], user: Option<&[u8]>) {
    let record = inner.nicks.entry(nick.to_vec()).or_default();
    record.channels.insert(channel.to_vec());
    if let Some(user) = user {
        record.user = Some(user.to_vec());
    }
    inner
        .members
        .entry(channel.to_vec())
        .or_default()
        .insert(nick.to_vec());
}

/// Drop a nick from a channel's member set, removing the channel entry
/// once its last member is gone. A channel with no members does not
/// exist.
fn unindex_membership(inner: &mut Inner, nick: &[u8], channel: &[u8]) {
    let emptied = match inner.members.get_mut(channel) {
        Some(members) => {
            members.remove(nick);
            members.is_empty()
        }
        None => false,
    };
    if emptied {
        inner.members.remove(channel);
    }
}

impl NickRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear all records.
    ///
    /// Runs once per successful connection, before any event from that
    /// connection is processed.
    pub fn reset(&self) {
        *self.inner.lock() = Inner::default();
    }

    /// Add `nick` to `channel`, creating the record on first sighting.
    ///
    /// `user` carries the opaque `user@host` identity from a JOIN
    /// prefix; NAMES replays pass `None` and never touch identity.
    ///
    /// With `allow_already_present` false a duplicate membership is a
    /// protocol anomaly (`AlreadyInChannel`) and nothing is mutated;
    /// with true (NAMES replay) re-adding is a no-op.
    pub fn add_nick_to_channel(
        &self,
        nick: &[u8],
        channel: &[u8],
        user: Option<&[u8]>,
        allow_already_present: bool,
    ) -> Result<(), RegistryError> {
        let mut guard = self.inner.lock();
        let inner = &mut *guard;

        if !allow_already_present
            && inner
                .nicks
                .get(nick)
                .is_some_and(|record| record.channels.contains(channel))
        {
            return Err(RegistryError::AlreadyInChannel {
                nick: lossy(nick),
                channel: lossy(channel),
            });
        }

        insert_membership(inner, nick, channel, user);
        Ok(())
    }

    /// Remove `nick` from `channel`.
    ///
    /// Leaving the last channel moves the record to vacant: identity is
    /// cleared, the record stays.
    pub fn remove_nick_from_channel(
        &self,
        nick: &[u8],
        channel: &[u8],
    ) -> Result<(), RegistryError> {
        let mut guard = self.inner.lock();
        let inner = &mut *guard;

        let record = inner
            .nicks
            .get_mut(nick)
            .ok_or_else(|| RegistryError::UnknownNick(lossy(nick)))?;
        if !record.channels.remove(channel) {
            return Err(RegistryError::NotInChannel {
                nick: lossy(nick),
                channel: lossy(channel),
            });
        }
        if record.channels.is_empty() {
            record.user = None;
        }

        unindex_membership(inner, nick, channel);
        Ok(())
    }

    /// Re-key a record from `old` to `new`, preserving channel
    /// membership and identity.
    ///
    /// Fails without mutating either record when `old` is unknown or
    /// `new` already exists.
    pub fn rename_nick(&self, old: &[u8], new: &[u8]) -> Result<(), RegistryError> {
        let mut guard = self.inner.lock();
        let inner = &mut *guard;

        if inner.nicks.contains_key(new) {
            return Err(RegistryError::NameCollision(lossy(new)));
        }
        let Some(record) = inner.nicks.remove(old) else {
            return Err(RegistryError::UnknownNick(lossy(old)));
        };

        for channel in &record.channels {
            if let Some(members) = inner.members.get_mut(channel) {
                members.remove(old);
                members.insert(new.to_vec());
            }
        }
        inner.nicks.insert(new.to_vec(), record);
        Ok(())
    }

    /// Empty the nick's channel set and clear its identity.
    ///
    /// The record itself is retained (vacant state).
    pub fn quit_nick(&self, nick: &[u8]) -> Result<(), RegistryError> {
        let mut guard = self.inner.lock();
        let inner = &mut *guard;

        let record = inner
            .nicks
            .get_mut(nick)
            .ok_or_else(|| RegistryError::UnknownNick(lossy(nick)))?;
        let channels = std::mem::take(&mut record.channels);
        record.user = None;

        for channel in &channels {
            unindex_membership(inner, nick, channel);
        }
        Ok(())
    }

    /// A KICK is a forced PART; same transition, same errors.
    pub fn kick(&self, nick: &[u8], channel: &[u8]) -> Result<(), RegistryError> {
        self.remove_nick_from_channel(nick, channel)
    }

    /// Replay a NAMES listing into the channel.
    ///
    /// Tokens are stripped of one leading `@`/`+` sigil; nicks already
    /// known are fine (the listing restates current occupancy). The
    /// whole listing applies under one lock acquisition.
    pub fn apply_names_listing<'a>(
        &self,
        channel: &[u8],
        nick_tokens: impl IntoIterator<Item = &'a [u8]>,
    ) {
        let mut guard = self.inner.lock();
        let inner = &mut *guard;
        for token in nick_tokens {
            let nick = names::strip_sigil(token);
            if nick.is_empty() {
                continue;
            }
            insert_membership(inner, nick, channel, None);
        }
    }

    /// The nicks currently in `channel`, as a sorted copy.
    ///
    /// The copy is taken entirely inside the lock; callers may iterate
    /// it freely afterwards. A channel nobody occupies does not exist:
    /// that is `UnknownChannel`, never a silent empty list.
    pub fn snapshot_channel(&self, channel: &[u8]) -> Result<Vec<Vec<u8>>, RegistryError> {
        let inner = self.inner.lock();
        let members = inner
            .members
            .get(channel)
            .ok_or_else(|| RegistryError::UnknownChannel(lossy(channel)))?;
        let mut nicks: Vec<Vec<u8>> = members.iter().cloned().collect();
        nicks.sort_unstable();
        Ok(nicks)
    }

    /// The channels `nick` currently occupies, as a sorted copy.
    pub fn nick_channels(&self, nick: &[u8]) -> Result<Vec<Vec<u8>>, RegistryError> {
        let inner = self.inner.lock();
        let record = inner
            .nicks
            .get(nick)
            .ok_or_else(|| RegistryError::UnknownNick(lossy(nick)))?;
        let mut channels: Vec<Vec<u8>> = record.channels.iter().cloned().collect();
        channels.sort_unstable();
        Ok(channels)
    }

    /// The stored `user@host` identity for `nick`, if any.
    pub fn identity(&self, nick: &[u8]) -> Result<Option<Vec<u8>>, RegistryError> {
        let inner = self.inner.lock();
        let record = inner
            .nicks
            .get(nick)
            .ok_or_else(|| RegistryError::UnknownNick(lossy(nick)))?;
        Ok(record.user.clone())
    }

    /// Verify the two views agree and vacant records carry no identity.
    #[cfg(test)]
    fn assert_consistent(&self) {
        let inner = self.inner.lock();
        for (nick, record) in &inner.nicks {
            if record.channels.is_empty() {
                assert!(record.user.is_none(), "vacant record retains identity");
            }
            for channel in &record.channels {
                assert!(
                    inner.members.get(channel).is_some_and(|m| m.contains(nick)),
                    "by-channel index missing a membership"
                );
            }
        }
        for (channel, members) in &inner.members {
            assert!(!members.is_empty(), "empty channel retained in index");
            for nick in members {
                assert!(
                    inner
                        .nicks
                        .get(nick)
                        .is_some_and(|r| r.channels.contains(channel)),
                    "by-channel index lists a stale membership"
                );
            }
        }
    }
}
