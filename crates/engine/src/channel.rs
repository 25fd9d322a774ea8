//! Bounded command queue drained by a dedicated writer thread.

use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::thread::{self, JoinHandle};

use crossbeam::channel::{Receiver, Sender, TrySendError};
use openracing_errors::TransportError;
use parking_lot::{Condvar, Mutex};
use racing_wheel_hid_logitech_protocol::Command;
use tracing::{error, info, warn};

use crate::ports::{CommandChannel, ReportWriter};

/// Queue depth of [`QueuedChannel`] when none is given.
pub const DEFAULT_QUEUE_CAPACITY: usize = 64;

/// Thread name of the report writer.
pub const WRITER_THREAD_NAME: &str = "ffb-writer";

#[derive(Debug, Default)]
struct QueueShared {
    /// Commands accepted but not yet written.
    pending: Mutex<usize>,
    drained: Condvar,
    write_failures: AtomicU64,
}

impl QueueShared {
    fn complete_one(&self) {
        let mut pending = self.pending.lock();
        *pending = pending.saturating_sub(1);
        if *pending == 0 {
            self.drained.notify_all();
        }
    }

    fn abandon(&self) {
        *self.pending.lock() = 0;
        self.drained.notify_all();
    }
}

/// [`CommandChannel`] backed by a crossbeam bounded channel.
///
/// `is_busy` reports whether any accepted command is still waiting for the
/// writer, mirroring an output ring whose head has not caught up with its tail.
#[derive(Debug)]
pub struct QueuedChannel {
    tx: Option<Sender<Command>>,
    shared: Arc<QueueShared>,
    writer: Option<JoinHandle<()>>,
}

impl QueuedChannel {
    /// Spawn the writer thread with [`DEFAULT_QUEUE_CAPACITY`].
    ///
    /// # Errors
    ///
    /// Returns the OS error if the writer thread cannot be spawned.
    pub fn spawn<W: ReportWriter>(writer: W) -> io::Result<Self> {
        Self::with_capacity(writer, DEFAULT_QUEUE_CAPACITY)
    }

    /// Spawn the writer thread with a queue of `capacity` commands.
    ///
    /// # Errors
    ///
    /// Returns the OS error if the writer thread cannot be spawned.
    pub fn with_capacity<W: ReportWriter>(writer: W, capacity: usize) -> io::Result<Self> {
        let (tx, rx) = crossbeam::channel::bounded(capacity.max(1));
        let shared = Arc::new(QueueShared::default());
        let thread_shared = Arc::clone(&shared);
        let handle = thread::Builder::new()
            .name(WRITER_THREAD_NAME.to_string())
            .spawn(move || Self::run(rx, writer, thread_shared))?;
        info!(capacity, "Command writer started");
        Ok(Self {
            tx: Some(tx),
            shared,
            writer: Some(handle),
        })
    }

    /// Commands accepted but not yet written.
    pub fn pending(&self) -> usize {
        *self.shared.pending.lock()
    }

    /// Reports the sink rejected.
    pub fn write_failures(&self) -> u64 {
        self.shared.write_failures.load(Ordering::Relaxed)
    }

    /// Close the queue, let the writer flush what it has, and join it.
    pub fn shutdown(&mut self) {
        self.tx = None;
        if let Some(handle) = self.writer.take() {
            if handle.join().is_err() {
                error!("Command writer panicked");
                self.shared.abandon();
            }
            info!("Command writer stopped");
        }
    }

    fn run<W: ReportWriter>(rx: Receiver<Command>, mut writer: W, shared: Arc<QueueShared>) {
        for report in rx.iter() {
            if let Err(e) = writer.write_report(&report) {
                shared.write_failures.fetch_add(1, Ordering::Relaxed);
                warn!(error = %e, "Failed to write report {:02X?}", report);
            }
            shared.complete_one();
        }
        shared.abandon();
    }
}

impl CommandChannel for QueuedChannel {
    fn send(&self, command: &Command) -> Result<(), TransportError> {
        let Some(tx) = self.tx.as_ref() else {
            return Err(TransportError::Closed);
        };

        // Count before handing over so the writer can never decrement first.
        *self.shared.pending.lock() += 1;
        match tx.try_send(*command) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(_)) => {
                self.shared.complete_one();
                Err(TransportError::QueueFull)
            }
            Err(TrySendError::Disconnected(_)) => {
                self.shared.complete_one();
                Err(TransportError::Closed)
            }
        }
    }

    fn is_busy(&self) -> bool {
        self.pending() > 0
    }

    fn wait_for_drain(&self) {
        let mut pending = self.shared.pending.lock();
        while *pending > 0 {
            self.shared.drained.wait(&mut pending);
        }
    }
}

impl Drop for QueuedChannel {
    fn drop(&mut self) {
        self.shutdown();
    }
}
