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

use crate::command::Command;
use crate::status::{Result, Status};
use std::sync::{Arc, Mutex};

/// Identifier of a buffer, given by the component on `use_buffer()`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BufferId(pub u32);

/// Event type (`OMX_EVENTTYPE`)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventType {
    /// A command completed, `data1` is the command type, `data2` its target
    CmdComplete,
    /// An error occured, `data1` is the OMX error code
    Error,
    /// A marked buffer reached its target
    Mark,
    /// The format of a port changed, `data1` is the port index
    PortSettingsChanged,
    /// A buffer carrying a flag went through, `data1` is the port index
    BufferFlag,
}

/// Message sent by a component to its observer
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    /// Asynchronous event
    Event {
        /// Kind of event
        event: EventType,
        /// First auxiliary value
        data1: u32,
        /// Second auxiliary value
        data2: u32,
    },
    /// An input buffer is returned to the client
    EmptyBufferDone {
        /// The returned buffer
        buffer: BufferId,
    },
    /// An output buffer is returned to the client
    FillBufferDone {
        /// The returned buffer
        buffer: BufferId,
        /// Offset of the data in the buffer
        range_offset: u32,
        /// Length of the data in the buffer
        range_length: u32,
        /// Buffer flags
        flags: u32,
        /// Presentation timestamp in microseconds
        timestamp: u64,
    },
}

impl Message {
    /// Completion event of a command
    pub fn command_complete(command: Command) -> Self {
        let (data1, data2) = command.to_raw();
        Self::Event { event: EventType::CmdComplete, data1, data2 }
    }

    /// Port settings changed event on a port
    pub fn port_settings_changed(port_index: u32, param_index: u32) -> Self {
        Self::Event { event: EventType::PortSettingsChanged, data1: port_index, data2: param_index }
    }

    /// Error event
    pub fn error(code: u32) -> Self {
        Self::Event { event: EventType::Error, data1: code, data2: 0 }
    }

    /// Returns true when the message is the completion of `command`
    pub fn is_command_complete(&self, command: Command) -> bool {
        *self == Self::command_complete(command)
    }
}

/// Shared memory region backing a buffer.
/// Clones refer to the same region; the size is fixed at allocation.
#[derive(Debug, Clone)]
pub struct SharedMemory {
    data: Arc<Mutex<Vec<u8>>>,
    size: usize,
}

impl SharedMemory {
    /// Allocate a zeroed region of `size` bytes
    pub fn allocate(size: usize) -> Result<Self> {
        if size == 0 {
            return Err(Status::BadValue);
        }
        let mut data = Vec::new();
        data.try_reserve_exact(size).map_err(|_| Status::NoMemory)?;
        data.resize(size, 0);
        Ok(Self { data: Arc::new(Mutex::new(data)), size })
    }

    /// Size of the region in bytes
    pub fn size(&self) -> usize {
        self.size
    }

    /// Copy `bytes` at `offset` in the region
    pub fn write(&self, offset: usize, bytes: &[u8]) -> Result<()> {
        let end = offset.checked_add(bytes.len()).filter(|&end| end <= self.size);
        let Some(end) = end else {
            return Err(Status::BadValue);
        };
        self.data.lock().unwrap()[offset..end].copy_from_slice(bytes);
        Ok(())
    }

    /// Copy `len` bytes from `offset` out of the region
    pub fn read(&self, offset: usize, len: usize) -> Result<Vec<u8>> {
        let end = offset.checked_add(len).filter(|&end| end <= self.size);
        let Some(end) = end else {
            return Err(Status::BadValue);
        };
        Ok(self.data.lock().unwrap()[offset..end].to_vec())
    }
}

/// Buffer handed to a component on `use_buffer()`
#[derive(Debug, Clone)]
pub struct CodecBuffer {
    /// Backing memory, shared between client and component
    pub memory: SharedMemory,
    /// Offset of valid data
    pub range_offset: u32,
    /// Length of valid data
    pub range_length: u32,
}

impl CodecBuffer {
    /// Buffer over the whole `memory`, with an empty range
    pub fn new(memory: SharedMemory) -> Self {
        Self { memory, range_offset: 0, range_length: 0 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::State;

    #[test]
    fn command_complete() {
        let msg = Message::command_complete(Command::StateSet(State::Idle));
        assert_eq!(msg, Message::Event { event: EventType::CmdComplete, data1: 0, data2: 2 });
        assert!(msg.is_command_complete(Command::StateSet(State::Idle)));
        assert!(!msg.is_command_complete(Command::StateSet(State::Loaded)));
        assert!(!msg.is_command_complete(Command::Flush(2)));
    }

    #[test]
    fn shared_memory() {
        let memory = SharedMemory::allocate(8).unwrap();
        let alias = memory.clone();
        memory.write(2, &[1, 2, 3]).unwrap();
        assert_eq!(alias.read(0, 6).unwrap(), [0, 0, 1, 2, 3, 0]);
        assert_eq!(memory.write(6, &[0; 3]), Err(Status::BadValue));
        assert_eq!(memory.read(usize::MAX, 2), Err(Status::BadValue));
        assert_eq!(SharedMemory::allocate(0).unwrap_err(), Status::BadValue);
    }
}
