// Copyright 2024, The Android Open Source Project
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


use crate::buffer::{BufferPool, Owner};
use media_omx::{Message, Observer, Result, Status};
use std::collections::VecDeque;
use std::sync::{Condvar, Mutex};
use std::time::{Duration, Instant};

/// Input and output buffer pools, updated as buffers come back
pub type Pools<'a> = Option<(&'a mut BufferPool, &'a mut BufferPool)>;

/// Queue of the messages of a node.
///
/// Messages are pushed by the component through `Observer`, and pulled by
/// the client with `dequeue_message()`.
#[derive(Default)]
pub struct CodecObserver {
    queue: Mutex<VecDeque<Message>>,
    cvar: Condvar,
}

impl CodecObserver {
    pub fn new() -> Self {
        Default::default()
    }

    /// Wait up to `timeout` for the next event.
    ///
    /// With `pools`, buffer done messages found on the way are consumed, and
    /// their buffers given back to the client. Without, they stay queued.
    /// A buffer done message on a buffer absent of the pools is `BadValue`.
    pub fn dequeue_message(&self, timeout: Duration, mut pools: Pools) -> Result<Message> {
        let deadline = Instant::now() + timeout;
        let mut queue = self.queue.lock().unwrap();
        loop {
            let mut i = 0;
            while i < queue.len() {
                let (pool, buffer) = match (&queue[i], pools.as_mut()) {
                    (Message::Event { .. }, _) => {
                        return queue.remove(i).ok_or(Status::Unknown);
                    }
                    (_, None) => {
                        i += 1;
                        continue;
                    }
                    (Message::EmptyBufferDone { buffer }, Some((input, _))) => (input, *buffer),
                    (Message::FillBufferDone { buffer, .. }, Some((_, output))) => {
                        (output, *buffer)
                    }
                };
                queue.remove(i);
                if !pool.set_owner(buffer, Owner::Client) {
                    log::error!("Buffer {:?} returned on port {}", buffer, pool.port_index());
                    return Err(Status::BadValue);
                }
            }

            let now = Instant::now();
            if now >= deadline {
                return Err(Status::TimedOut);
            }
            queue = self.cvar.wait_timeout(queue, deadline - now).unwrap().0;
        }
    }
}

impl Observer for CodecObserver {
    fn on_messages(&self, messages: &[Message]) {
        self.queue.lock().unwrap().extend(messages.iter().cloned());
        self.cvar.notify_all();
    }
}
