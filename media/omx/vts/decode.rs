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


use crate::buffer::{
    allocate_port_buffers, dispatch_input_buffer, dispatch_output_buffer, free_port_buffers,
    BufferPool,
};
use crate::port::{input_channel_info, set_default_port_param};
use crate::{Client, Error, Result};
use media_omx::{CodingType, Command, EventType, Message, SharedMemory, Status};
use std::collections::VecDeque;
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

/// Description of a frame of an elementary stream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameInfo {
    pub bytes: usize,
    pub flags: u32,
    pub timestamp: u64,
}

/// Elementary stream, read frame by frame.
///
/// The info text lists each frame as a whitespace separated triple
/// `bytes flags timestamp`; the frame payloads follow each other in `media`.
pub struct ElementaryStream<R> {
    media: R,
    info: VecDeque<String>,
}

impl ElementaryStream<BufReader<File>> {
    pub fn open(media: &Path, info: &Path) -> Result<Self> {
        let info = std::fs::read_to_string(info)?;
        Ok(Self::new(BufReader::new(File::open(media)?), &info))
    }
}

impl<R: Read> ElementaryStream<R> {
    pub fn new(media: R, info: &str) -> Self {
        Self { media, info: info.split_whitespace().map(String::from).collect() }
    }

    fn field<T: std::str::FromStr>(&mut self, name: &str) -> Result<T> {
        let token = self.info.pop_front();
        token
            .as_deref()
            .and_then(|t| t.parse().ok())
            .ok_or_else(|| Error::StreamInfo(format!("{} expected, found {:?}", name, token)))
    }

    /// Next frame description, `None` once the byte counts end
    pub fn next_info(&mut self) -> Result<Option<FrameInfo>> {
        let Some(bytes) = self.info.pop_front().and_then(|t| t.parse().ok()) else {
            return Ok(None);
        };
        let flags = self.field("flags")?;
        let timestamp = self.field("timestamp")?;
        Ok(Some(FrameInfo { bytes, flags, timestamp }))
    }

    /// Copy the next frame into `memory`, `None` at the end of the stream
    pub fn read_frame(&mut self, memory: &SharedMemory) -> Result<Option<FrameInfo>> {
        let Some(info) = self.next_info()? else {
            return Ok(None);
        };
        if info.bytes > memory.size() {
            return Err(Error::FrameTooLarge { size: info.bytes, capacity: memory.size() });
        }
        let mut payload = vec![0; info.bytes];
        self.media.read_exact(&mut payload).map_err(|e| match e.kind() {
            io::ErrorKind::UnexpectedEof => Error::ShortRead(info.bytes),
            _ => Error::Io(e),
        })?;
        memory.write(0, &payload).map_err(|status| Error::Call { call: "write", status })?;
        Ok(Some(info))
    }
}

/// Fill and dispatch an input buffer with the next frame.
/// Returns false at the end of the stream.
fn dispatch_frame<R: Read>(
    client: &Client,
    input: &mut BufferPool,
    index: usize,
    stream: &mut ElementaryStream<R>,
) -> Result<bool> {
    let Some(info) = stream.read_frame(&input.buffers()[index].memory)? else {
        return Ok(false);
    };
    // Frame flags are not forwarded
    dispatch_input_buffer(client.node(), input, index, info.bytes as u32, 0, info.timestamp)?;
    Ok(true)
}

/// Decode up to `frames` frames of `stream`, reconfiguring the output port
/// when the component asks for it.
/// Waits without any input buffer to fill before the pump gives up
pub const STALL_LIMIT: u32 = 100;

/// Feed up to `frames` frames of `stream` to the component, stopping early
/// at the end of the stream. Fails with `Stalled` once `STALL_LIMIT` waits
/// pass in a row with no input buffer back from the component.
#[allow(clippy::too_many_arguments)]
pub fn decode_frames<R: Read>(
    client: &Client,
    input: &mut BufferPool,
    output: &mut BufferPool,
    encoding: CodingType,
    input_port: u32,
    output_port: u32,
    mut frames: u32,
    stream: &mut ElementaryStream<R>,
) -> Result<()> {
    for index in 0..output.len() {
        dispatch_output_buffer(client.node(), output, index)?;
    }
    for index in 0..input.len() {
        if frames == 0 || !dispatch_frame(client, input, index, stream)? {
            break;
        }
        frames -= 1;
    }

    let mut stalled = 0;
    loop {
        match client.dequeue(Some((&mut *input, &mut *output))) {
            Ok(Message::Event { event: EventType::PortSettingsChanged, data1, .. })
                if data1 == output_port =>
            {
                reconfigure_output_port(client, input, output, encoding, input_port, output_port)?;
            }
            Ok(message) => return Err(Error::UnexpectedEvent(message)),
            Err(Status::TimedOut) => (),
            Err(status) => return Err(Error::NoMessage(status)),
        }

        if frames == 0 {
            break;
        }
        if let Some(index) = input.empty_buffer_index() {
            if !dispatch_frame(client, input, index, stream)? {
                break;
            }
            frames -= 1;
            stalled = 0;
        } else {
            stalled += 1;
            if stalled >= STALL_LIMIT {
                return Err(Error::Stalled(stalled));
            }
        }
        if let Some(index) = output.empty_buffer_index() {
            dispatch_output_buffer(client.node(), output, index)?;
        }
    }
    Ok(())
}

/// Disable the output port, apply the format found by the component on the
/// input port, then enable the output port with fresh buffers.
pub fn reconfigure_output_port(
    client: &Client,
    input: &mut BufferPool,
    output: &mut BufferPool,
    encoding: CodingType,
    input_port: u32,
    output_port: u32,
) -> Result<()> {
    log::info!("Reconfiguring output port {}", output_port);
    let node = client.node();

    let command = Command::PortDisable(output_port);
    client.send_command(command)?;
    // The port holds the buffers until they are freed
    client.expect_timeout(input, output)?;
    output.all_returned()?;
    free_port_buffers(node, output)?;
    client.expect_complete(command, Some((&mut *input, &mut *output)))?;

    let format = input_channel_info(node, input_port, encoding)?;
    set_default_port_param(node, output_port, CodingType::Pcm, format)?;

    let command = Command::PortEnable(output_port);
    client.send_command(command)?;
    // Nor is it enabled before it is populated
    client.expect_timeout(input, output)?;
    allocate_port_buffers(node, output, output_port)?;
    client.expect_complete(command, Some((&mut *input, &mut *output)))?;

    for index in 0..output.len() {
        dispatch_output_buffer(node, output, index)?;
    }
    Ok(())
}
