// Copyright 2025 the Terminput Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Output chunks and the bounded broadcast bus that carries them.

use std::fmt;
use std::ops::Deref;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, SyncSender, TrySendError};
use std::thread;
use std::time::Duration;

use smallvec::SmallVec;

/// Number of chunks each subscriber may have queued before emission blocks.
pub const OUTPUT_CAPACITY: usize = 64;

/// How long a blocked emission sleeps before retrying a full queue.
const FULL_QUEUE_BACKOFF: Duration = Duration::from_millis(1);

/// One atomic unit of output: a key's sequence, one commit, or one paste marker.
///
/// Short chunks (every key sequence and most typed text) are stored inline.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct OutputChunk(SmallVec<[u8; 16]>);

impl OutputChunk {
    /// Copy `bytes` into a chunk.
    pub fn from_slice(bytes: &[u8]) -> Self {
        Self(SmallVec::from_slice(bytes))
    }

    /// The chunk's bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl Deref for OutputChunk {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.0
    }
}

impl AsRef<[u8]> for OutputChunk {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<&[u8]> for OutputChunk {
    fn from(bytes: &[u8]) -> Self {
        Self::from_slice(bytes)
    }
}

impl fmt::Debug for OutputChunk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "OutputChunk(b\"{}\")", self.0.escape_ascii())
    }
}

/// Why [`OutputStream::recv_timeout`] returned without a chunk.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RecvError {
    /// Nothing arrived within the timeout.
    Timeout,
    /// The session was detached or dropped; the stream will never yield again.
    Detached,
}

impl fmt::Display for RecvError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timeout => f.write_str("timed out waiting for terminal input"),
            Self::Detached => f.write_str("terminal input session detached"),
        }
    }
}

impl std::error::Error for RecvError {}

/// Receiving end of one output subscription.
///
/// Created by [`TerminalInput::subscribe`](crate::TerminalInput::subscribe). A stream stops
/// yielding as soon as the session is detached, even if chunks were still queued for it.
/// Dropping the stream unsubscribes it; a stream that is kept alive but never read holds back
/// the producer once its queue is full.
pub struct OutputStream {
    rx: Receiver<OutputChunk>,
    epoch: u64,
    current_epoch: Arc<AtomicU64>,
}

impl OutputStream {
    /// Whether the session this stream belongs to is still attached.
    pub fn is_attached(&self) -> bool {
        self.current_epoch.load(Ordering::Acquire) == self.epoch
    }

    /// Block until the next chunk arrives.
    ///
    /// Returns `None` once the session is detached or dropped.
    pub fn recv(&self) -> Option<OutputChunk> {
        let chunk = self.rx.recv().ok()?;
        self.is_attached().then_some(chunk)
    }

    /// Take the next chunk if one is already queued.
    pub fn try_recv(&self) -> Option<OutputChunk> {
        let chunk = self.rx.try_recv().ok()?;
        self.is_attached().then_some(chunk)
    }

    /// Block for at most `timeout` waiting for the next chunk.
    pub fn recv_timeout(&self, timeout: Duration) -> Result<OutputChunk, RecvError> {
        match self.rx.recv_timeout(timeout) {
            Ok(chunk) if self.is_attached() => Ok(chunk),
            Ok(_) | Err(RecvTimeoutError::Disconnected) => Err(RecvError::Detached),
            Err(RecvTimeoutError::Timeout) if self.is_attached() => Err(RecvError::Timeout),
            Err(RecvTimeoutError::Timeout) => Err(RecvError::Detached),
        }
    }

    /// Iterate over the chunks already queued, without blocking.
    pub fn try_iter(&self) -> TryIter<'_> {
        TryIter { stream: self }
    }
}

impl fmt::Debug for OutputStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OutputStream")
            .field("epoch", &self.epoch)
            .field("attached", &self.is_attached())
            .finish_non_exhaustive()
    }
}

impl Iterator for OutputStream {
    type Item = OutputChunk;

    fn next(&mut self) -> Option<OutputChunk> {
        self.recv()
    }
}

/// Non-blocking iterator returned by [`OutputStream::try_iter`].
#[derive(Debug)]
pub struct TryIter<'a> {
    stream: &'a OutputStream,
}

impl Iterator for TryIter<'_> {
    type Item = OutputChunk;

    fn next(&mut self) -> Option<OutputChunk> {
        self.stream.try_recv()
    }
}

/// Sending half of one subscription, tagged with the epoch it was attached in.
#[derive(Debug)]
struct Subscriber {
    tx: SyncSender<OutputChunk>,
    epoch: u64,
}

impl Subscriber {
    /// Queue `chunk`, waiting while the queue is full.
    ///
    /// Gives up once the subscriber's epoch has ended, so a detach never waits on a stalled
    /// reader. Returns `false` if the subscriber is gone.
    fn deliver(&self, mut chunk: OutputChunk, current_epoch: &AtomicU64) -> bool {
        loop {
            match self.tx.try_send(chunk) {
                Ok(()) => return true,
                Err(TrySendError::Disconnected(_)) => return false,
                Err(TrySendError::Full(back)) => {
                    if current_epoch.load(Ordering::Acquire) != self.epoch {
                        tracing::debug!("abandoning blocked emission after detach");
                        return false;
                    }
                    chunk = back;
                    thread::sleep(FULL_QUEUE_BACKOFF);
                }
            }
        }
    }
}

/// Fan-out of chunks to every live subscriber.
#[derive(Debug)]
pub(crate) struct OutputBus {
    subscribers: Vec<Subscriber>,
    epoch: Arc<AtomicU64>,
}

impl OutputBus {
    pub(crate) fn new() -> Self {
        Self {
            subscribers: Vec::new(),
            epoch: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Shared epoch counter, bumped on every detach.
    pub(crate) fn epoch(&self) -> &Arc<AtomicU64> {
        &self.epoch
    }

    pub(crate) fn subscribe(&mut self) -> OutputStream {
        let (tx, rx) = mpsc::sync_channel(OUTPUT_CAPACITY);
        let epoch = self.epoch.load(Ordering::Acquire);
        self.subscribers.push(Subscriber { tx, epoch });
        OutputStream {
            rx,
            epoch,
            current_epoch: Arc::clone(&self.epoch),
        }
    }

    pub(crate) fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    /// Drop every subscriber attached before epoch `ended`'s successor began.
    ///
    /// Subscribers that attached after the epoch was advanced are kept; their streams report
    /// themselves attached and must keep receiving.
    pub(crate) fn detach_through(&mut self, ended: u64) {
        self.subscribers.retain(|sub| sub.epoch > ended);
    }

    /// Deliver `bytes` to every subscriber, blocking on full queues.
    ///
    /// Subscribers whose stream was dropped, or whose epoch ended while they were full, are
    /// pruned.
    pub(crate) fn emit(&mut self, bytes: &[u8]) {
        if bytes.is_empty() {
            return;
        }
        if self.subscribers.is_empty() {
            tracing::trace!(len = bytes.len(), "no subscriber attached, dropping output");
            return;
        }
        let chunk = OutputChunk::from_slice(bytes);
        tracing::trace!(chunk = ?chunk, subscribers = self.subscribers.len(), "emit");
        let epoch = &self.epoch;
        self.subscribers.retain(|sub| sub.deliver(chunk.clone(), epoch));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chunk_debug_escapes_control_bytes() {
        let chunk = OutputChunk::from_slice(b"\x1b[A");
        assert_eq!(format!("{chunk:?}"), "OutputChunk(b\"\\x1b[A\")");
        assert_eq!(chunk.as_bytes(), b"\x1b[A");
        assert_eq!(&*chunk, b"\x1b[A");
    }

    #[test]
    fn emit_without_subscribers_is_noop() {
        let mut bus = OutputBus::new();
        bus.emit(b"lost");
        let stream = bus.subscribe();
        assert_eq!(stream.try_recv(), None, "nothing is replayed to late subscribers");
    }

    #[test]
    fn broadcast_reaches_every_subscriber() {
        let mut bus = OutputBus::new();
        let a = bus.subscribe();
        let b = bus.subscribe();
        bus.emit(b"x");
        assert_eq!(a.try_recv().as_deref(), Some(&b"x"[..]));
        assert_eq!(b.try_recv().as_deref(), Some(&b"x"[..]));
    }

    #[test]
    fn dropped_streams_are_pruned() {
        let mut bus = OutputBus::new();
        let kept = bus.subscribe();
        drop(bus.subscribe());
        assert_eq!(bus.subscriber_count(), 2);
        bus.emit(b"y");
        assert_eq!(bus.subscriber_count(), 1);
        assert!(kept.try_recv().is_some(), "live stream still receives");
    }

    #[test]
    fn empty_chunks_are_skipped() {
        let mut bus = OutputBus::new();
        let stream = bus.subscribe();
        bus.emit(b"");
        assert_eq!(stream.try_recv(), None);
    }

    #[test]
    fn epoch_change_silences_stream() {
        let mut bus = OutputBus::new();
        let stream = bus.subscribe();
        bus.emit(b"queued");
        let ended = bus.epoch().fetch_add(1, Ordering::AcqRel);
        bus.detach_through(ended);
        assert_eq!(bus.subscriber_count(), 0);
        assert!(!stream.is_attached());
        assert_eq!(stream.try_recv(), None, "buffered chunk must not be delivered");
        assert_eq!(
            stream.recv_timeout(Duration::from_millis(1)),
            Err(RecvError::Detached)
        );
    }

    #[test]
    fn subscriber_attached_after_epoch_advance_survives_detach() {
        let mut bus = OutputBus::new();
        let old = bus.subscribe();
        let ended = bus.epoch().fetch_add(1, Ordering::AcqRel);
        // Subscribes between the epoch advance and the detach taking effect.
        let late = bus.subscribe();
        bus.detach_through(ended);

        assert!(!old.is_attached());
        assert!(late.is_attached());
        bus.emit(b"after");
        assert_eq!(late.try_recv().as_deref(), Some(&b"after"[..]));
    }

    #[test]
    fn full_queue_emission_gives_up_when_epoch_ends() {
        let mut bus = OutputBus::new();
        let stalled = bus.subscribe();
        for _ in 0..OUTPUT_CAPACITY {
            bus.emit(b"x");
        }
        let epoch = Arc::clone(bus.epoch());
        let emitter = thread::spawn(move || {
            bus.emit(b"blocked");
            bus
        });
        thread::sleep(Duration::from_millis(20));
        assert!(!emitter.is_finished(), "emission waits on a full queue");

        epoch.fetch_add(1, Ordering::AcqRel);
        let bus = emitter.join().unwrap();
        assert_eq!(bus.subscriber_count(), 0, "detached subscriber was pruned");
        assert!(!stalled.is_attached());
    }
}
