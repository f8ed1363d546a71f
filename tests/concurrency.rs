//! Concurrent snapshot consistency.
//!
//! Readers taking snapshots during an interleaved stream of mutations
//! must never observe a partially applied operation.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use rosterbot::state::NickRegistry;

const WRITER_THREADS: usize = 4;
const ITERATIONS: usize = 500;

#[test]
fn snapshots_never_observe_partial_membership_churn() {
    let registry = Arc::new(NickRegistry::new());

    // An anchor member keeps the channel alive throughout.
    registry
        .add_nick_to_channel(b"keeper", b"#chan", None, false)
        .unwrap();

    let done = Arc::new(AtomicBool::new(false));

    let readers: Vec<_> = (0..2)
        .map(|_| {
            let registry = Arc::clone(&registry);
            let done = Arc::clone(&done);
            thread::spawn(move || {
                while !done.load(Ordering::Relaxed) {
                    let snapshot = registry
                        .snapshot_channel(b"#chan")
                        .expect("anchored channel must always exist");

                    // Sorted, duplicate-free, anchored, and only ever
                    // containing nicks the writers actually use.
                    assert!(snapshot.windows(2).all(|w| w[0] < w[1]));
                    assert!(snapshot.contains(&b"keeper".to_vec()));
                    for nick in &snapshot {
                        assert!(
                            nick == b"keeper" || nick.starts_with(b"writer"),
                            "unexpected member {:?}",
                            String::from_utf8_lossy(nick)
                        );
                    }
                }
            })
        })
        .collect();

    let writers: Vec<_> = (0..WRITER_THREADS)
        .map(|id| {
            let registry = Arc::clone(&registry);
            thread::spawn(move || {
                let nick = format!("writer{id}").into_bytes();
                for _ in 0..ITERATIONS {
                    registry
                        .add_nick_to_channel(&nick, b"#chan", Some(b"u@h"), false)
                        .expect("join after part must succeed");
                    registry
                        .remove_nick_from_channel(&nick, b"#chan")
                        .expect("part after join must succeed");
                }
            })
        })
        .collect();

    for writer in writers {
        writer.join().expect("writer panicked");
    }
    done.store(true, Ordering::Relaxed);
    for reader in readers {
        reader.join().expect("reader panicked");
    }

    // All churn removed itself; only the anchor remains.
    assert_eq!(
        registry.snapshot_channel(b"#chan").unwrap(),
        vec![b"keeper".to_vec()]
    );
}

#[test]
fn renames_are_atomic_across_both_views() {
    let registry = Arc::new(NickRegistry::new());

    registry
        .add_nick_to_channel(b"flip", b"#one", Some(b"u@h"), false)
        .unwrap();
    registry
        .add_nick_to_channel(b"flip", b"#two", None, false)
        .unwrap();

    let done = Arc::new(AtomicBool::new(false));

    let reader = {
        let registry = Arc::clone(&registry);
        let done = Arc::clone(&done);
        thread::spawn(move || {
            while !done.load(Ordering::Relaxed) {
                // Whichever name is current, a single atomic read must
                // see its full membership, never half a rename.
                for nick in [&b"flip"[..], &b"flop"[..]] {
                    if let Ok(channels) = registry.nick_channels(nick) {
                        assert_eq!(
                            channels,
                            vec![b"#one".to_vec(), b"#two".to_vec()],
                            "rename observed half-applied"
                        );
                    }
                }

                // Each channel holds exactly one of the two names.
                for channel in [&b"#one"[..], &b"#two"[..]] {
                    let snapshot = registry.snapshot_channel(channel).unwrap();
                    assert_eq!(snapshot.len(), 1, "rename duplicated a member");
                    assert!(snapshot[0] == b"flip" || snapshot[0] == b"flop");
                }
            }
        })
    };

    let writer = {
        let registry = Arc::clone(&registry);
        thread::spawn(move || {
            for _ in 0..ITERATIONS {
                registry.rename_nick(b"flip", b"flop").expect("flip -> flop");
                registry.rename_nick(b"flop", b"flip").expect("flop -> flip");
            }
        })
    };

    writer.join().expect("writer panicked");
    done.store(true, Ordering::Relaxed);
    reader.join().expect("reader panicked");

    // Identity rode along through every rename.
    assert_eq!(registry.identity(b"flip").unwrap(), Some(b"u@h".to_vec()));
}
