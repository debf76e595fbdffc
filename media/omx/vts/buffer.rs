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


use crate::error::{CallResult, Error, Result};
use crate::port::get_param;
use media_omx::{BufferId, CodecBuffer, Node, PortDefinition, SharedMemory};

/// Owner of a buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Owner {
    Client,
    Component,
}

/// Buffer of a port, as tracked by the client
#[derive(Debug, Clone)]
pub struct BufferInfo {
    pub id: BufferId,
    pub owner: Owner,
    pub memory: SharedMemory,
}

/// Buffers of a port, in allocation order
#[derive(Debug, Default)]
pub struct BufferPool {
    port_index: u32,
    buffers: Vec<BufferInfo>,
}

impl BufferPool {
    pub fn new() -> Self {
        Default::default()
    }

    /// Port the buffers were allocated on
    pub fn port_index(&self) -> u32 {
        self.port_index
    }

    pub fn buffers(&self) -> &[BufferInfo] {
        &self.buffers
    }

    pub fn len(&self) -> usize {
        self.buffers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffers.is_empty()
    }

    /// Change the owner of a buffer, returns false when the buffer is unknown
    pub(crate) fn set_owner(&mut self, id: BufferId, owner: Owner) -> bool {
        let Some(buffer) = self.buffers.iter_mut().find(|b| b.id == id) else {
            return false;
        };
        buffer.owner = owner;
        true
    }

    /// Index of the first buffer owned by the client
    pub fn empty_buffer_index(&self) -> Option<usize> {
        self.buffers.iter().position(|b| b.owner == Owner::Client)
    }

    /// Check that every buffer is back with the client
    pub fn all_returned(&self) -> Result<()> {
        match self.buffers.iter().find(|b| b.owner != Owner::Client) {
            Some(b) => Err(Error::BufferNotReturned { port_index: self.port_index, id: b.id }),
            None => Ok(()),
        }
    }
}

/// Allocate and give to the component the buffers of a port,
/// as many and as large as its definition asks for.
pub fn allocate_port_buffers(
    node: &dyn Node,
    pool: &mut BufferPool,
    port_index: u32,
) -> Result<()> {
    pool.buffers.clear();
    pool.port_index = port_index;

    let definition = get_param(node, &PortDefinition { port_index, ..Default::default() })?;
    for _ in 0..definition.buffer_count_actual {
        let memory = SharedMemory::allocate(definition.buffer_size as usize).call("allocate")?;
        let buffer = CodecBuffer::new(memory.clone());
        let id = node.use_buffer(port_index, &buffer).call("use_buffer")?;
        pool.buffers.push(BufferInfo { id, owner: Owner::Client, memory });
    }
    log::debug!("{} buffers allocated on port {}", pool.len(), port_index);
    Ok(())
}

/// Release the buffers of the pool to the component, and forget them
pub fn free_port_buffers(node: &dyn Node, pool: &mut BufferPool) -> Result<()> {
    for buffer in pool.buffers.drain(..) {
        node.free_buffer(pool.port_index, buffer.id).call("free_buffer")?;
    }
    Ok(())
}

/// Give an output buffer to the component, for filling
pub fn dispatch_output_buffer(node: &dyn Node, pool: &mut BufferPool, index: usize) -> Result<()> {
    let buffer = &mut pool.buffers[index];
    node.fill_buffer(buffer.id).call("fill_buffer")?;
    buffer.owner = Owner::Component;
    Ok(())
}

/// Give an input buffer holding `bytes` bytes of payload to the component
pub fn dispatch_input_buffer(
    node: &dyn Node,
    pool: &mut BufferPool,
    index: usize,
    bytes: u32,
    flags: u32,
    timestamp: u64,
) -> Result<()> {
    let buffer = &mut pool.buffers[index];
    node.empty_buffer(buffer.id, 0, bytes, flags, timestamp).call("empty_buffer")?;
    buffer.owner = Owner::Component;
    Ok(())
}
