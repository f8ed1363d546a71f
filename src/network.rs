//! Connection lifecycle and wire glue.
//!
//! Deliberately thin: connect, register, keep the link alive, and
//! shovel parsed lines into event processing. Membership semantics live
//! in [`crate::state`] and [`crate::events`]; nothing here holds the
//! registry lock across I/O.

use std::sync::Arc;

use bytes::{BufMut, Bytes, BytesMut};
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_util::codec::Framed;
use tracing::{info, warn};

use roster_proto::line::ParsedLine;
use roster_proto::{parse_line, LineCodec};

use crate::commands;
use crate::config::Config;
use crate::events;
use crate::state::NickRegistry;

/// Outbound queue depth; senders block once it fills.
const SEND_QUEUE_DEPTH: usize = 64;

/// Connect, register, and process the connection until it closes.
pub async fn run(config: &Config, registry: Arc<NickRegistry>) -> anyhow::Result<()> {
    let stream = TcpStream::connect(&config.server.address).await?;
    info!(server = %config.server.address, "Connected");

    let framed = Framed::new(stream, LineCodec::new());
    let (mut sink, mut lines) = framed.split();

    let (tx, mut rx) = mpsc::channel::<Bytes>(SEND_QUEUE_DEPTH);
    let writer = tokio::spawn(async move {
        while let Some(line) = rx.recv().await {
            if let Err(e) = sink.send(line).await {
                warn!(error = %e, "Write failed; closing writer");
                break;
            }
        }
    });

    let own_nick = config.bot.nick.as_bytes().to_vec();
    send(&tx, command_line(&[b"NICK", &own_nick])).await?;
    send(&tx, user_line(config)).await?;

    // Connect is a barrier: the roster empties before any event from
    // this connection is processed, and nothing from a previous
    // connection survives it.
    registry.reset();
    info!("Roster reset for new connection");

    while let Some(frame) = lines.next().await {
        let raw = match frame {
            Ok(raw) => raw,
            Err(e) => {
                warn!(error = %e, "Transport error; closing connection");
                break;
            }
        };

        let line = match parse_line(&raw) {
            Ok(line) => line,
            Err(e) => {
                warn!(
                    error = %e,
                    line = %String::from_utf8_lossy(&raw),
                    "Dropping unparsable line"
                );
                continue;
            }
        };

        dispatch(config, &registry, &tx, &own_nick, &line).await?;
    }

    info!("Connection closed");
    drop(tx);
    let _ = writer.await;
    Ok(())
}

/// Route one parsed line.
///
/// PING and PRIVMSG are connection-level concerns; everything else goes
/// to the event processor, which ignores what it does not track.
/// Malformed or out-of-order events are reported and dropped, never
/// fatal.
async fn dispatch(
    config: &Config,
    registry: &NickRegistry,
    tx: &mpsc::Sender<Bytes>,
    own_nick: &[u8],
    line: &ParsedLine<'_>,
) -> anyhow::Result<()> {
    match line.command {
        b"PING" => {
            let pong = match line.params.first() {
                Some(token) => trailing_line(b"PONG", &[], token),
                None => command_line(&[b"PONG"]),
            };
            send(tx, pong).await?;
        }
        b"001" => {
            // Registered; bring up the channels we track.
            for channel in &config.bot.channels {
                send(tx, command_line(&[b"JOIN", channel.as_bytes()])).await?;
            }
        }
        b"PRIVMSG" => match commands::handle_privmsg(registry, own_nick, line) {
            Ok(responses) => {
                for response in responses {
                    send(
                        tx,
                        trailing_line(b"PRIVMSG", &[&response.target], &response.text),
                    )
                    .await?;
                }
            }
            Err(e) => warn!(error = %e, "Dropping command"),
        },
        _ => {
            if let Err(e) = events::apply(registry, line) {
                warn!(
                    error = %e,
                    command = %String::from_utf8_lossy(line.command),
                    "Dropping event"
                );
            }
        }
    }
    Ok(())
}

async fn send(tx: &mpsc::Sender<Bytes>, line: Bytes) -> anyhow::Result<()> {
    tx.send(line)
        .await
        .map_err(|_| anyhow::anyhow!("writer task closed"))
}

/// `<COMMAND> <arg> <arg>` with no trailing section.
fn command_line(parts: &[&[u8]]) -> Bytes {
    let mut line = BytesMut::new();
    for (i, part) in parts.iter().enumerate() {
        if i > 0 {
            line.put_u8(b' ');
        }
        line.put_slice(part);
    }
    line.freeze()
}

/// `<COMMAND> <arg>… :<trailing>`.
fn trailing_line(command: &[u8], args: &[&[u8]], trailing: &[u8]) -> Bytes {
    let mut line = BytesMut::new();
    line.put_slice(command);
    for arg in args {
        line.put_u8(b' ');
        line.put_slice(arg);
    }
    line.put_slice(b" :");
    line.put_slice(trailing);
    line.freeze()
}

fn user_line(config: &Config) -> Bytes {
    trailing_line(
        b"USER",
        &[config.bot.username().as_bytes(), b"0", b"*"],
        config.bot.realname.as_bytes(),
    )
}
