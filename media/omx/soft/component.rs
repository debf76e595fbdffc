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


use crate::{Codec, StreamFormat};
use media_omx::{
    error_code, Aac, AacProfile, AacStreamFormat, AudioPortDefinition, AudioPortFormat, Amr,
    AmrBandMode, BufferId, ChannelMode, ChannelType, CodecBuffer, CodingType, Command,
    ComponentRole, Direction, Index, Message, Mp3, Node, Observer, Opus, Parameter,
    ParameterIndex, Pcm, PortDefinition, PortParam, ProfileQuery, Result, SharedMemory, State,
    Status, Vorbis, MAX_CHANNELS, PORT_ALL,
};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

const PORT_INPUT: u32 = 0;
const PORT_OUTPUT: u32 = 1;

const BUFFER_COUNT: u32 = 4;
const BUFFER_SIZE: u32 = 8192;

/// Software loopback decoder, instantiated by `SoftOmx::allocate_node()`
pub struct SoftComponent {
    observer: Arc<dyn Observer>,
    inner: Mutex<Inner>,
}

struct Buffer {
    id: BufferId,
    memory: SharedMemory,
    /// The buffer is owned by the component
    held: bool,
}

struct Port {
    definition: PortDefinition,
    formats: Vec<CodingType>,
    pcm: Pcm,
    buffers: Vec<Buffer>,
}

/// Commands waiting on the client to complete
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pending {
    ToIdle,
    ToLoaded,
    PortDisable(u32),
    PortEnable(u32),
}

struct Frame {
    buffer: BufferId,
    offset: u32,
    length: u32,
    flags: u32,
    timestamp: u64,
}

/// Codec-specific configuration of the input port
enum CodecBlock {
    Mp3(Mp3),
    Amr(Amr),
    Aac(Aac),
    Vorbis(Vorbis),
    Opus(Opus),
    None,
}

struct Inner {
    codec: &'static Codec,
    state: State,
    freed: bool,
    pending: Vec<Pending>,
    ports: [Port; 2],
    block: CodecBlock,
    frames: VecDeque<Frame>,
    outputs: VecDeque<BufferId>,
    detected: bool,
    reconfiguring: bool,
    next_id: u32,
    outbox: Vec<Message>,
}

fn decode<T: Parameter>(params: &[u8]) -> Result<T> {
    T::from_bytes(params).ok_or(Status::BadValue)
}

impl Port {
    fn new(port_index: u32, dir: Direction, formats: Vec<CodingType>) -> Self {
        let mut channel_mapping = [ChannelType::None; MAX_CHANNELS];
        channel_mapping[0] = ChannelType::LF;
        channel_mapping[1] = ChannelType::RF;
        Self {
            definition: PortDefinition {
                port_index,
                dir,
                buffer_count_actual: BUFFER_COUNT,
                buffer_count_min: BUFFER_COUNT,
                buffer_size: BUFFER_SIZE,
                enabled: true,
                audio: AudioPortDefinition { flag_error_concealment: false, encoding: formats[0] },
                ..Default::default()
            },
            formats,
            pcm: Pcm {
                port_index,
                channels: 2,
                interleaved: true,
                bits_per_sample: 16,
                sampling_rate: 44100,
                channel_mapping,
                ..Default::default()
            },
            buffers: Vec::new(),
        }
    }

    fn populated(&self) -> bool {
        self.buffers.len() as u32 >= self.definition.buffer_count_actual
    }

    fn buffer_mut(&mut self, id: BufferId) -> Option<&mut Buffer> {
        self.buffers.iter_mut().find(|b| b.id == id)
    }
}

impl CodecBlock {
    fn new(coding: CodingType) -> Self {
        match coding {
            CodingType::Mp3 => Self::Mp3(Mp3 {
                channels: 2,
                sample_rate: 44100,
                channel_mode: ChannelMode::Stereo,
                ..Default::default()
            }),
            CodingType::Amr => Self::Amr(Amr {
                channels: 1,
                band_mode: AmrBandMode::NB0,
                ..Default::default()
            }),
            CodingType::Aac => Self::Aac(Aac {
                channels: 2,
                sample_rate: 44100,
                profile: AacProfile::LC,
                stream_format: AacStreamFormat::Mp4Adts,
                channel_mode: ChannelMode::Stereo,
                ..Default::default()
            }),
            CodingType::Vorbis => {
                Self::Vorbis(Vorbis { channels: 2, sample_rate: 44100, ..Default::default() })
            }
            CodingType::AndroidOpus => {
                Self::Opus(Opus { channels: 2, sample_rate: 44100, ..Default::default() })
            }
            _ => Self::None,
        }
    }

    fn index(&self) -> Option<Index> {
        match self {
            Self::Mp3(_) => Some(Mp3::INDEX),
            Self::Amr(_) => Some(Amr::INDEX),
            Self::Aac(_) => Some(Aac::INDEX),
            Self::Vorbis(_) => Some(Vorbis::INDEX),
            Self::Opus(_) => Some(Opus::INDEX),
            Self::None => None,
        }
    }

    fn get(&self, params: &[u8]) -> Result<Vec<u8>> {
        let (port_index, bytes) = match self {
            Self::Mp3(p) => (decode::<Mp3>(params)?.port_index, p.to_bytes()),
            Self::Amr(p) => (decode::<Amr>(params)?.port_index, p.to_bytes()),
            Self::Aac(p) => (decode::<Aac>(params)?.port_index, p.to_bytes()),
            Self::Vorbis(p) => (decode::<Vorbis>(params)?.port_index, p.to_bytes()),
            Self::Opus(p) => (decode::<Opus>(params)?.port_index, p.to_bytes()),
            Self::None => return Err(Status::NameNotFound),
        };
        if port_index != PORT_INPUT {
            return Err(Status::BadValue);
        }
        Ok(bytes)
    }

    fn set(&mut self, params: &[u8]) -> Result<()> {
        let (port_index, channels, block) = match self {
            Self::Mp3(_) => {
                let p: Mp3 = decode(params)?;
                (p.port_index, p.channels, Self::Mp3(p))
            }
            Self::Amr(_) => {
                let p: Amr = decode(params)?;
                (p.port_index, p.channels, Self::Amr(p))
            }
            Self::Aac(_) => {
                let p: Aac = decode(params)?;
                (p.port_index, p.channels, Self::Aac(p))
            }
            Self::Vorbis(_) => {
                let p: Vorbis = decode(params)?;
                (p.port_index, p.channels, Self::Vorbis(p))
            }
            Self::Opus(_) => {
                let p: Opus = decode(params)?;
                (p.port_index, p.channels, Self::Opus(p))
            }
            Self::None => return Err(Status::NameNotFound),
        };
        if port_index != PORT_INPUT || channels == 0 || channels as usize > MAX_CHANNELS {
            return Err(Status::BadValue);
        }
        *self = block;
        Ok(())
    }

    /// Update the block with the format found in the stream header
    fn set_stream(&mut self, format: StreamFormat) {
        match self {
            Self::Mp3(p) => {
                (p.channels, p.sample_rate) = (format.channels, format.sample_rate);
                p.channel_mode = ChannelMode::from_channels(format.channels);
            }
            Self::Amr(p) => p.channels = format.channels,
            Self::Aac(p) => {
                (p.channels, p.sample_rate) = (format.channels, format.sample_rate);
                p.channel_mode = ChannelMode::from_channels(format.channels);
            }
            Self::Vorbis(p) => (p.channels, p.sample_rate) = (format.channels, format.sample_rate),
            Self::Opus(p) => (p.channels, p.sample_rate) = (format.channels, format.sample_rate),
            Self::None => (),
        }
    }
}

impl SoftComponent {
    pub(crate) fn new(codec: &'static Codec, observer: Arc<dyn Observer>) -> Self {
        let input_formats = vec![codec.coding];
        let inner = Inner {
            codec,
            state: State::Loaded,
            freed: false,
            pending: Vec::new(),
            ports: [
                Port::new(PORT_INPUT, Direction::Input, input_formats),
                Port::new(PORT_OUTPUT, Direction::Output, vec![CodingType::Pcm]),
            ],
            block: CodecBlock::new(codec.coding),
            frames: VecDeque::new(),
            outputs: VecDeque::new(),
            detected: false,
            reconfiguring: false,
            next_id: 1,
            outbox: Vec::new(),
        };
        Self { observer, inner: Mutex::new(inner) }
    }

    /// Run `f` on the component, then deliver the messages it emitted.
    /// Messages are delivered out of the lock, the observer may call back.
    fn with_inner<T>(&self, f: impl FnOnce(&mut Inner) -> Result<T>) -> Result<T> {
        let (result, messages) = {
            let mut inner = self.inner.lock().unwrap();
            if inner.freed {
                return Err(Status::InvalidOperation);
            }
            let result = f(&mut inner);
            (result, std::mem::take(&mut inner.outbox))
        };
        if !messages.is_empty() {
            self.observer.on_messages(&messages);
        }
        result
    }
}

impl Node for SoftComponent {
    fn get_parameter(&self, index: Index, params: &[u8]) -> Result<Vec<u8>> {
        self.with_inner(|inner| inner.get_parameter(index, params))
    }

    fn set_parameter(&self, index: Index, params: &[u8]) -> Result<()> {
        self.with_inner(|inner| inner.set_parameter(index, params))
    }

    fn send_command(&self, command: Command) -> Result<()> {
        self.with_inner(|inner| inner.send_command(command))
    }

    fn use_buffer(&self, port_index: u32, buffer: &CodecBuffer) -> Result<BufferId> {
        self.with_inner(|inner| inner.use_buffer(port_index, buffer))
    }

    fn free_buffer(&self, port_index: u32, buffer: BufferId) -> Result<()> {
        self.with_inner(|inner| inner.free_buffer(port_index, buffer))
    }

    fn empty_buffer(
        &self,
        buffer: BufferId,
        range_offset: u32,
        range_length: u32,
        flags: u32,
        timestamp: u64,
    ) -> Result<()> {
        let frame = Frame { buffer, offset: range_offset, length: range_length, flags, timestamp };
        self.with_inner(|inner| inner.empty_buffer(frame))
    }

    fn fill_buffer(&self, buffer: BufferId) -> Result<()> {
        self.with_inner(|inner| inner.fill_buffer(buffer))
    }

    fn free_node(&self) -> Result<()> {
        self.with_inner(|inner| {
            log::info!("Freeing node {}", inner.codec.role());
            inner.freed = true;
            Ok(())
        })
    }
}

impl Inner {
    fn emit(&mut self, message: Message) {
        self.outbox.push(message);
    }

    fn port(&self, port_index: u32) -> Result<&Port> {
        self.ports.get(port_index as usize).ok_or(Status::BadValue)
    }

    fn port_mut(&mut self, port_index: u32) -> Result<&mut Port> {
        self.ports.get_mut(port_index as usize).ok_or(Status::BadValue)
    }

    /// Port settings can change in the loaded state, or while the port is disabled
    fn check_configurable(&self, port_index: u32) -> Result<()> {
        let port = self.port(port_index)?;
        if self.state != State::Loaded && port.definition.enabled {
            log::error!("Port {} cannot be configured in state {:?}", port_index, self.state);
            return Err(Status::InvalidOperation);
        }
        Ok(())
    }

    fn pcm_port(&self, port_index: u32) -> Result<&Port> {
        if port_index == PORT_INPUT && self.codec.coding != CodingType::Pcm {
            return Err(Status::BadValue);
        }
        self.port(port_index)
    }

    fn get_parameter(&self, index: Index, params: &[u8]) -> Result<Vec<u8>> {
        match index {
            Index::ParamAudioInit => {
                Ok(PortParam { ports: 2, start_port_number: PORT_INPUT }.to_bytes())
            }
            Index::ParamStandardComponentRole => {
                let role = ComponentRole::new(&self.codec.role()).ok_or(Status::Unknown)?;
                Ok(role.to_bytes())
            }
            Index::ParamPortDefinition => {
                let query: PortDefinition = decode(params)?;
                let port = self.port(query.port_index)?;
                let definition =
                    PortDefinition { populated: port.populated(), ..port.definition.clone() };
                Ok(definition.to_bytes())
            }
            Index::ParamAudioPortFormat => {
                let query: AudioPortFormat = decode(params)?;
                let port = self.port(query.port_index)?;
                let encoding = *port.formats.get(query.index as usize).ok_or(Status::BadValue)?;
                Ok(AudioPortFormat { encoding, ..query }.to_bytes())
            }
            Index::ParamAudioPcm => {
                let query: Pcm = decode(params)?;
                Ok(self.pcm_port(query.port_index)?.pcm.to_bytes())
            }
            Index::ParamAudioProfileQuerySupported => {
                let query: ProfileQuery = decode(params)?;
                if query.port_index != PORT_INPUT {
                    return Err(Status::BadValue);
                }
                let profiles = self.codec.profiles;
                let profile =
                    *profiles.get(query.profile_index as usize).ok_or(Status::BadValue)?;
                Ok(ProfileQuery { profile, ..query }.to_bytes())
            }
            index if Some(index) == self.block.index() => self.block.get(params),
            _ => Err(Status::NameNotFound),
        }
    }

    fn set_parameter(&mut self, index: Index, params: &[u8]) -> Result<()> {
        match index {
            Index::ParamStandardComponentRole => {
                let role: ComponentRole = decode(params)?;
                if self.state != State::Loaded {
                    return Err(Status::InvalidOperation);
                }
                if role.name() != self.codec.role() {
                    log::error!("Unsupported role `{}`", role.name());
                    return Err(Status::BadValue);
                }
                Ok(())
            }
            Index::ParamPortDefinition => {
                let definition: PortDefinition = decode(params)?;
                self.check_configurable(definition.port_index)?;
                let port = self.port_mut(definition.port_index)?;
                if definition.buffer_count_actual < port.definition.buffer_count_min
                    || definition.buffer_size == 0
                    || !port.formats.contains(&definition.audio.encoding)
                {
                    return Err(Status::BadValue);
                }
                port.definition.buffer_count_actual = definition.buffer_count_actual;
                port.definition.buffer_size = definition.buffer_size;
                port.definition.audio = definition.audio;
                Ok(())
            }
            Index::ParamAudioPortFormat => {
                let format: AudioPortFormat = decode(params)?;
                self.check_configurable(format.port_index)?;
                let port = self.port_mut(format.port_index)?;
                if !port.formats.contains(&format.encoding) {
                    return Err(Status::BadValue);
                }
                port.definition.audio.encoding = format.encoding;
                Ok(())
            }
            Index::ParamAudioPcm => {
                let pcm: Pcm = decode(params)?;
                let port_index = pcm.port_index;
                self.pcm_port(port_index)?;
                self.check_configurable(port_index)?;
                if pcm.channels == 0 || pcm.channels as usize > MAX_CHANNELS {
                    return Err(Status::BadValue);
                }
                self.port_mut(port_index)?.pcm = pcm;
                Ok(())
            }
            index if Some(index) == self.block.index() => {
                self.check_configurable(PORT_INPUT)?;
                self.block.set(params)
            }
            _ => Err(Status::NameNotFound),
        }
    }

    fn ports_of(&self, port_index: u32) -> Result<Vec<u32>> {
        match port_index {
            PORT_ALL => Ok(vec![PORT_INPUT, PORT_OUTPUT]),
            PORT_INPUT | PORT_OUTPUT => Ok(vec![port_index]),
            _ => Err(Status::BadValue),
        }
    }

    fn send_command(&mut self, command: Command) -> Result<()> {
        log::debug!("{:?} in state {:?}", command, self.state);
        match command {
            Command::StateSet(state) => self.set_state(state),
            Command::Flush(port_index) => {
                for port_index in self.ports_of(port_index)? {
                    self.return_buffers(port_index);
                    self.emit(Message::command_complete(Command::Flush(port_index)));
                }
            }
            Command::PortDisable(port_index) => {
                for port_index in self.ports_of(port_index)? {
                    self.ports[port_index as usize].definition.enabled = false;
                    self.return_buffers(port_index);
                    self.pending.push(Pending::PortDisable(port_index));
                }
            }
            Command::PortEnable(port_index) => {
                for port_index in self.ports_of(port_index)? {
                    self.ports[port_index as usize].definition.enabled = true;
                    self.pending.push(Pending::PortEnable(port_index));
                }
            }
        }
        self.advance();
        self.process();
        Ok(())
    }

    fn set_state(&mut self, state: State) {
        if state == self.state {
            self.emit(Message::error(error_code::SAME_STATE));
            return;
        }
        let transitioning =
            self.pending.iter().any(|p| matches!(p, Pending::ToIdle | Pending::ToLoaded));
        match (self.state, state) {
            _ if transitioning => {
                self.emit(Message::error(error_code::INCORRECT_STATE_TRANSITION));
            }
            (State::Loaded, State::Idle) => self.pending.push(Pending::ToIdle),
            (State::Idle, State::Loaded) => self.pending.push(Pending::ToLoaded),
            (State::Idle, State::Executing) => {
                self.state = State::Executing;
                self.emit(Message::command_complete(Command::StateSet(state)));
            }
            (State::Executing, State::Idle) => {
                self.return_buffers(PORT_INPUT);
                self.return_buffers(PORT_OUTPUT);
                self.state = State::Idle;
                self.emit(Message::command_complete(Command::StateSet(state)));
            }
            (from, to) => {
                log::error!("Illegal transition {:?} -> {:?}", from, to);
                self.emit(Message::error(error_code::INCORRECT_STATE_TRANSITION));
            }
        }
    }

    /// Give back to the client the buffers of the port held by the component
    fn return_buffers(&mut self, port_index: u32) {
        if port_index == PORT_INPUT {
            self.frames.clear();
        } else {
            self.outputs.clear();
        }
        for buffer in self.ports[port_index as usize].buffers.iter_mut().filter(|b| b.held) {
            buffer.held = false;
            self.outbox.push(if port_index == PORT_INPUT {
                Message::EmptyBufferDone { buffer: buffer.id }
            } else {
                Message::FillBufferDone {
                    buffer: buffer.id,
                    range_offset: 0,
                    range_length: 0,
                    flags: 0,
                    timestamp: 0,
                }
            });
        }
    }

    /// Complete the pending commands whose condition is met
    fn advance(&mut self) {
        let mut i = 0;
        while i < self.pending.len() {
            let done = match self.pending[i] {
                Pending::ToIdle => {
                    self.ports.iter().all(|p| !p.definition.enabled || p.populated())
                }
                Pending::ToLoaded => self.ports.iter().all(|p| p.buffers.is_empty()),
                Pending::PortDisable(p) => self.ports[p as usize].buffers.is_empty(),
                Pending::PortEnable(p) => {
                    self.state == State::Loaded || self.ports[p as usize].populated()
                }
            };
            if done {
                let pending = self.pending.remove(i);
                self.complete(pending);
            } else {
                i += 1;
            }
        }
    }

    fn complete(&mut self, pending: Pending) {
        let command = match pending {
            Pending::ToIdle => {
                self.state = State::Idle;
                Command::StateSet(State::Idle)
            }
            Pending::ToLoaded => {
                self.state = State::Loaded;
                Command::StateSet(State::Loaded)
            }
            Pending::PortDisable(p) => Command::PortDisable(p),
            Pending::PortEnable(p) => {
                if p == PORT_OUTPUT {
                    self.reconfiguring = false;
                }
                Command::PortEnable(p)
            }
        };
        log::info!("{} completed {:?}", self.codec.role(), command);
        self.emit(Message::command_complete(command));
    }

    fn use_buffer(&mut self, port_index: u32, buffer: &CodecBuffer) -> Result<BufferId> {
        let allowed = self.pending.contains(&Pending::ToIdle)
            || self.pending.contains(&Pending::PortEnable(port_index));
        let id = BufferId(self.next_id);
        let port = self.port_mut(port_index)?;
        if !allowed {
            log::error!("Buffer given to port {} outside of its population", port_index);
            return Err(Status::InvalidOperation);
        }
        if port.populated() || (buffer.memory.size() as u64) < port.definition.buffer_size as u64
        {
            return Err(Status::BadValue);
        }
        port.buffers.push(Buffer { id, memory: buffer.memory.clone(), held: false });
        self.next_id += 1;
        self.advance();
        Ok(id)
    }

    fn free_buffer(&mut self, port_index: u32, id: BufferId) -> Result<()> {
        let allowed = self.pending.contains(&Pending::ToLoaded)
            || self.pending.contains(&Pending::PortDisable(port_index));
        let port = self.port_mut(port_index)?;
        let Some(position) = port.buffers.iter().position(|b| b.id == id) else {
            return Err(Status::BadValue);
        };
        if !allowed && port.definition.enabled {
            log::error!("Buffer {:?} of port {} freed while in use", id, port_index);
            return Err(Status::InvalidOperation);
        }
        port.buffers.remove(position);
        self.advance();
        Ok(())
    }

    /// Take ownership of a buffer of the port, for processing
    fn hold(&mut self, port_index: u32, id: BufferId) -> Result<&mut Buffer> {
        if !matches!(self.state, State::Idle | State::Executing) {
            return Err(Status::InvalidOperation);
        }
        let port = self.port_mut(port_index)?;
        if !port.definition.enabled {
            return Err(Status::InvalidOperation);
        }
        let buffer = port.buffer_mut(id).ok_or(Status::BadValue)?;
        if buffer.held {
            return Err(Status::InvalidOperation);
        }
        Ok(buffer)
    }

    fn empty_buffer(&mut self, frame: Frame) -> Result<()> {
        let buffer = self.hold(PORT_INPUT, frame.buffer)?;
        if (frame.offset as u64) + (frame.length as u64) > buffer.memory.size() as u64 {
            return Err(Status::BadValue);
        }
        buffer.held = true;
        self.frames.push_back(frame);
        self.process();
        Ok(())
    }

    fn fill_buffer(&mut self, id: BufferId) -> Result<()> {
        self.hold(PORT_OUTPUT, id)?.held = true;
        self.outputs.push_back(id);
        self.process();
        Ok(())
    }

    /// Inspect the stream on its first frame, raising a port settings change
    /// when the output configuration does not match.
    fn detect_stream(&mut self) {
        self.detected = true;
        let Some(format) = self.codec.stream else {
            return;
        };
        self.block.set_stream(format);
        let pcm = &self.ports[PORT_OUTPUT as usize].pcm;
        if pcm.channels != format.channels || pcm.sampling_rate != format.sample_rate {
            log::info!(
                "Output format changes to {} channels at {} Hz",
                format.channels,
                format.sample_rate
            );
            self.reconfiguring = true;
            let index = Index::ParamPortDefinition as u32;
            self.emit(Message::port_settings_changed(PORT_OUTPUT, index));
        }
    }

    /// Decode queued frames into queued output buffers
    fn process(&mut self) {
        if self.state != State::Executing {
            return;
        }
        while !self.frames.is_empty() {
            if !self.detected {
                self.detect_stream();
            }
            if self.reconfiguring
                || !self.ports[PORT_OUTPUT as usize].definition.enabled
                || self.outputs.is_empty()
            {
                return;
            }
            let (Some(frame), Some(output)) = (self.frames.pop_front(), self.outputs.pop_front())
            else {
                return;
            };
            self.release(PORT_INPUT, frame.buffer);
            self.release(PORT_OUTPUT, output);
            let range_length = match self.copy_frame(&frame, output) {
                Ok(length) => length,
                Err(status) => {
                    log::error!("Frame of buffer {:?} not decoded: {}", frame.buffer, status);
                    0
                }
            };
            self.emit(Message::FillBufferDone {
                buffer: output,
                range_offset: 0,
                range_length,
                flags: frame.flags,
                timestamp: frame.timestamp,
            });
            self.emit(Message::EmptyBufferDone { buffer: frame.buffer });
        }
    }

    fn release(&mut self, port_index: u32, id: BufferId) {
        if let Some(buffer) = self.ports[port_index as usize].buffer_mut(id) {
            buffer.held = false;
        }
    }

    fn copy_frame(&self, frame: &Frame, output: BufferId) -> Result<u32> {
        let memory = |port_index: u32, id: BufferId| {
            let port = &self.ports[port_index as usize];
            port.buffers.iter().find(|b| b.id == id).map(|b| &b.memory).ok_or(Status::BadValue)
        };
        let input = memory(PORT_INPUT, frame.buffer)?;
        let data = input.read(frame.offset as usize, frame.length as usize)?;
        let output = memory(PORT_OUTPUT, output)?;
        let length = data.len().min(output.size());
        output.write(0, &data[..length])?;
        Ok(length as u32)
    }
}
