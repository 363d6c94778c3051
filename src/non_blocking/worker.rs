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

use std::io;
use std::io::Write;

use crossbeam_channel::Receiver;
use crossbeam_channel::RecvError;
use crossbeam_channel::TryRecvError;

use super::Message;

/// The receiving half of a [`NonBlocking`](super::NonBlocking) writer.
///
/// Owns the underlying writer and the two channels the guard talks over: the
/// record channel carries formatted log lines, and the zero-capacity shutdown
/// channel carries the drain acknowledgement.
pub(crate) struct Worker<T: Write + Send + 'static> {
    writer: T,
    receiver: Receiver<Message>,
    shutdown: Receiver<()>,
}

/// Outcome of one receive step on the record channel.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub(crate) enum WorkerState {
    /// No message pending; go back to a blocking receive.
    Empty,
    /// All senders are gone; nothing more will arrive.
    Disconnected,
    /// A record was written; keep draining.
    Continue,
    /// The guard requested shutdown.
    Shutdown,
}

impl<T: Write + Send + 'static> Worker<T> {
    pub(crate) fn new(writer: T, receiver: Receiver<Message>, shutdown: Receiver<()>) -> Worker<T> {
        Self {
            writer,
            receiver,
            shutdown,
        }
    }

    fn handle(&mut self, message: Message) -> io::Result<WorkerState> {
        match message {
            Message::Record(record) => {
                self.writer.write_all(&record)?;
                Ok(WorkerState::Continue)
            }
            Message::Shutdown => Ok(WorkerState::Shutdown),
        }
    }

    /// Blocks until a message arrives, then drains every message already
    /// queued and flushes. Returns the state that ended the drain.
    pub(crate) fn work(&mut self) -> io::Result<WorkerState> {
        let mut state = match self.receiver.recv() {
            Ok(message) => self.handle(message)?,
            Err(RecvError) => WorkerState::Disconnected,
        };

        while state == WorkerState::Continue {
            state = match self.receiver.try_recv() {
                Ok(message) => self.handle(message)?,
                Err(TryRecvError::Empty) => WorkerState::Empty,
                Err(TryRecvError::Disconnected) => WorkerState::Disconnected,
            };
        }

        self.writer.flush()?;
        Ok(state)
    }

    pub(crate) fn make_thread(mut self, name: String) -> std::thread::JoinHandle<()> {
        std::thread::Builder::new()
            .name(name)
            .spawn(move || {
                loop {
                    match self.work() {
                        Ok(WorkerState::Continue) | Ok(WorkerState::Empty) => {}
                        Ok(WorkerState::Shutdown) | Ok(WorkerState::Disconnected) => {
                            // Every record queued ahead of the shutdown message
                            // has been written by now. Receiving on the
                            // zero-capacity shutdown channel unblocks the
                            // guard's `drop`, which is waiting on the paired
                            // send before letting the process continue.
                            let _ = self.shutdown.recv();
                            break;
                        }
                        Err(err) => {
                            eprintln!("failed to write log: {err}");
                        }
                    }
                }
                if let Err(err) = self.writer.flush() {
                    eprintln!("failed to flush: {err}");
                }
            })
            .expect("failed to spawn the non-blocking log writer thread")
    }
}

#[cfg(test)]
mod tests {
    use crossbeam_channel::bounded;
    use crossbeam_channel::unbounded;

    use super::*;

    #[test]
    fn test_work_drains_queued_records() {
        let (sender, receiver) = unbounded();
        let (_shutdown_sender, shutdown_receiver) = bounded::<()>(0);
        let mut worker = Worker::new(Vec::new(), receiver, shutdown_receiver);

        sender.send(Message::Record(b"one\n".to_vec())).unwrap();
        sender.send(Message::Record(b"two\n".to_vec())).unwrap();
        let state = worker.work().unwrap();

        assert_eq!(state, WorkerState::Empty);
        assert_eq!(worker.writer, b"one\ntwo\n");
    }

    #[test]
    fn test_records_ahead_of_shutdown_are_written() {
        let (sender, receiver) = unbounded();
        let (_shutdown_sender, shutdown_receiver) = bounded::<()>(0);
        let mut worker = Worker::new(Vec::new(), receiver, shutdown_receiver);

        sender.send(Message::Record(b"pending\n".to_vec())).unwrap();
        sender.send(Message::Shutdown).unwrap();
        let state = worker.work().unwrap();

        assert_eq!(state, WorkerState::Shutdown);
        assert_eq!(worker.writer, b"pending\n");
    }

    #[test]
    fn test_disconnect_ends_the_drain() {
        let (sender, receiver) = unbounded();
        let (_shutdown_sender, shutdown_receiver) = bounded::<()>(0);
        let mut worker = Worker::new(Vec::new(), receiver, shutdown_receiver);

        sender.send(Message::Record(b"last\n".to_vec())).unwrap();
        drop(sender);
        let state = worker.work().unwrap();

        assert_eq!(state, WorkerState::Disconnected);
        assert_eq!(worker.writer, b"last\n");
    }
}
