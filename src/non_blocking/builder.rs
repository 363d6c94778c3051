// Copyright 2024 BlancLog Developers
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::io::Write;
use std::thread::JoinHandle;
use std::time::Duration;

use crossbeam_channel::SendTimeoutError;
use crossbeam_channel::Sender;
use crossbeam_channel::bounded;
use crossbeam_channel::unbounded;

use super::Message;
use super::worker::Worker;
use crate::Error;

/// A guard that flushes log records associated with a [`NonBlocking`] writer
/// on drop.
///
/// Writing to a [`NonBlocking`] writer does not immediately write the log
/// record to the underlying output; a dedicated logging thread does so at
/// some later point. If the program terminates abruptly (an uncaught panic or
/// `std::process::exit`), records that are still buffered would be lost.
/// Assign the `WorkerGuard` in `main` (or whatever the entrypoint is) so that
/// it is dropped during unwinding or when `main` exits, which flushes all
/// buffered records.
#[derive(Debug)]
pub struct WorkerGuard {
    _guard: Option<JoinHandle<()>>,
    sender: Sender<Message>,
    shutdown: Sender<()>,
    shutdown_timeout: Duration,
}

impl WorkerGuard {
    fn new(
        handle: JoinHandle<()>,
        sender: Sender<Message>,
        shutdown: Sender<()>,
        shutdown_timeout: Option<Duration>,
    ) -> Self {
        const DEFAULT_SHUTDOWN_TIMEOUT: Duration = Duration::from_millis(100);

        WorkerGuard {
            _guard: Some(handle),
            sender,
            shutdown,
            shutdown_timeout: shutdown_timeout.unwrap_or(DEFAULT_SHUTDOWN_TIMEOUT),
        }
    }
}

impl Drop for WorkerGuard {
    fn drop(&mut self) {
        let shutdown_timeout = self.shutdown_timeout;
        match self
            .sender
            .send_timeout(Message::Shutdown, shutdown_timeout)
        {
            Ok(()) => {
                // Wait for the worker to drain all messages before dropping.
                // The worker acknowledges by receiving on the zero-capacity
                // shutdown channel; send_timeout keeps drop from blocking
                // indefinitely.
                let _ = self.shutdown.send_timeout((), shutdown_timeout);
            }
            Err(SendTimeoutError::Disconnected(_)) => (),
            Err(SendTimeoutError::Timeout(err)) => {
                eprintln!("failed to send shutdown signal to logging worker: {err:?}")
            }
        }
    }
}

/// A non-blocking writer that forwards records over a channel.
#[derive(Clone, Debug)]
pub struct NonBlocking<T: Write + Send + 'static> {
    sender: Sender<Message>,
    marker: std::marker::PhantomData<T>,
}

impl<T: Write + Send + 'static> NonBlocking<T> {
    fn create(
        writer: T,
        thread_name: String,
        buffered_lines_limit: Option<usize>,
        shutdown_timeout: Option<Duration>,
    ) -> (Self, WorkerGuard) {
        let (sender, receiver) = match buffered_lines_limit {
            Some(cap) => bounded(cap),
            None => unbounded(),
        };

        let (shutdown_sender, shutdown_receiver) = bounded(0);

        let worker = Worker::new(writer, receiver, shutdown_receiver);
        let worker_guard = WorkerGuard::new(
            worker.make_thread(thread_name),
            sender.clone(),
            shutdown_sender,
            shutdown_timeout,
        );

        let marker = std::marker::PhantomData;
        (Self { sender, marker }, worker_guard)
    }

    /// Enqueues a formatted record for the writer thread.
    pub fn send(&self, record: Vec<u8>) -> Result<(), Error> {
        self.sender
            .send(Message::Record(record))
            .map_err(|err| Error::new("failed to send log message").with_source(err))
    }
}

/// A builder for configuring [`NonBlocking`].
#[derive(Debug)]
pub struct NonBlockingBuilder<T: Write + Send + 'static> {
    thread_name: String,
    buffered_lines_limit: Option<usize>,
    shutdown_timeout: Option<Duration>,
    writer: T,
}

impl<T: Write + Send + 'static> NonBlockingBuilder<T> {
    /// Creates a new [`NonBlockingBuilder`] with the specified writer.
    pub fn new(thread_name: impl Into<String>, writer: T) -> Self {
        Self {
            thread_name: thread_name.into(),
            buffered_lines_limit: None,
            shutdown_timeout: None,
            writer,
        }
    }

    /// Sets the buffer size of pending messages.
    pub fn buffered_lines_limit(mut self, buffered_lines_limit: Option<usize>) -> Self {
        self.buffered_lines_limit = buffered_lines_limit;
        self
    }

    /// Sets the shutdown timeout before the worker guard dropped.
    pub fn shutdown_timeout(mut self, shutdown_timeout: Option<Duration>) -> Self {
        self.shutdown_timeout = shutdown_timeout;
        self
    }

    /// Completes the builder, returning the configured `NonBlocking`.
    pub fn build(self) -> (NonBlocking<T>, WorkerGuard) {
        NonBlocking::create(
            self.writer,
            self.thread_name,
            self.buffered_lines_limit,
            self.shutdown_timeout,
        )
    }
}
