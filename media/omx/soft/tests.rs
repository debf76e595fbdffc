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


use crate::{SoftOmx, SoftOmxStore};
use media_omx::{
    error_code, AacProfile, AudioPortFormat, BufferId, CodecBuffer, CodingType, Command,
    ComponentRole, EventType, Index, Message, Node, Observer, Omx, OmxStore, Parameter, Pcm,
    PortDefinition, PortParam, ProfileQuery, SharedMemory, State, Status,
};
use std::sync::{Arc, Mutex};

struct MessageSink {
    messages: Mutex<Vec<Message>>,
}

impl MessageSink {
    fn new() -> Self {
        MessageSink { messages: Mutex::new(Vec::new()) }
    }

    fn take(&self) -> Vec<Message> {
        std::mem::take(&mut *self.messages.lock().unwrap())
    }
}

impl Observer for MessageSink {
    fn on_messages(&self, messages: &[Message]) {
        self.messages.lock().unwrap().extend_from_slice(messages);
    }
}

fn allocate(name: &str) -> (Arc<MessageSink>, Arc<dyn Node>) {
    let sink = Arc::new(MessageSink::new());
    let node = SoftOmx::new().allocate_node(name, sink.clone()).unwrap();
    (sink, node)
}

fn port_definition(node: &dyn Node, port_index: u32) -> PortDefinition {
    let query = PortDefinition { port_index, ..Default::default() };
    let data = node.get_parameter(Index::ParamPortDefinition, &query.to_bytes()).unwrap();
    PortDefinition::from_bytes(&data).unwrap()
}

fn use_buffers(node: &dyn Node, port_index: u32) -> Vec<(BufferId, SharedMemory)> {
    let definition = port_definition(node, port_index);
    (0..definition.buffer_count_actual)
        .map(|_| {
            let memory = SharedMemory::allocate(definition.buffer_size as usize).unwrap();
            let id = node.use_buffer(port_index, &CodecBuffer::new(memory.clone())).unwrap();
            (id, memory)
        })
        .collect()
}

fn complete(command: Command) -> Vec<Message> {
    vec![Message::command_complete(command)]
}

/// Bring the node to executing, returns the input and output buffers
fn to_executing(
    sink: &MessageSink,
    node: &dyn Node,
) -> (Vec<(BufferId, SharedMemory)>, Vec<(BufferId, SharedMemory)>) {
    node.send_command(Command::StateSet(State::Idle)).unwrap();
    let input = use_buffers(node, 0);
    let output = use_buffers(node, 1);
    assert_eq!(sink.take(), complete(Command::StateSet(State::Idle)));
    node.send_command(Command::StateSet(State::Executing)).unwrap();
    assert_eq!(sink.take(), complete(Command::StateSet(State::Executing)));
    (input, output)
}

#[test]
fn store() {
    let store = SoftOmxStore::new();
    assert_eq!(store.node_prefix(), "OMX.soft.");
    assert!(!store.list_service_attributes().unwrap().is_empty());
    assert!(store.get_omx("legacy").is_none());

    let roles = store.list_roles();
    assert_eq!(roles.len(), 7);
    let mp3 = roles.iter().find(|r| r.role == "audio_decoder.mp3").unwrap();
    assert!(!mp3.is_encoder);
    assert_eq!(mp3.nodes[0].name, "OMX.soft.mp3.decoder");
    assert_eq!(mp3.nodes[0].owner, "default");

    let omx = store.get_omx("default").unwrap();
    let nodes = omx.list_nodes().unwrap();
    assert_eq!(nodes.len(), 7);
    assert!(nodes.iter().all(|n| n.name.starts_with("OMX.soft.") && n.roles.len() == 1));

    let sink = Arc::new(MessageSink::new());
    assert_eq!(omx.allocate_node("OMX.soft.h264.decoder", sink).err(), Some(Status::NameNotFound));
}

#[test]
fn parameters() {
    let (_, node) = allocate("OMX.soft.aac.decoder");

    let data = node.get_parameter(Index::ParamAudioInit, &PortParam::default().to_bytes()).unwrap();
    let ports = PortParam::from_bytes(&data).unwrap();
    assert_eq!((ports.ports, ports.start_port_number), (2, 0));

    let role = ComponentRole::new("audio_decoder.aac").unwrap();
    node.set_parameter(Index::ParamStandardComponentRole, &role.to_bytes()).unwrap();
    let other = ComponentRole::new("audio_decoder.mp3").unwrap();
    assert_eq!(
        node.set_parameter(Index::ParamStandardComponentRole, &other.to_bytes()),
        Err(Status::BadValue)
    );

    let query = AudioPortFormat { port_index: 1, index: 0, ..Default::default() };
    let data = node.get_parameter(Index::ParamAudioPortFormat, &query.to_bytes()).unwrap();
    assert_eq!(AudioPortFormat::from_bytes(&data).unwrap().encoding, CodingType::Pcm);
    let query = AudioPortFormat { port_index: 1, index: 1, ..Default::default() };
    assert!(node.get_parameter(Index::ParamAudioPortFormat, &query.to_bytes()).is_err());

    let format = AudioPortFormat { port_index: 0, index: 0xdead, encoding: CodingType::Aac };
    node.set_parameter(Index::ParamAudioPortFormat, &format.to_bytes()).unwrap();
    let format = AudioPortFormat { port_index: 0, index: 0, encoding: CodingType::Mp3 };
    assert_eq!(
        node.set_parameter(Index::ParamAudioPortFormat, &format.to_bytes()),
        Err(Status::BadValue)
    );

    let mut profiles = Vec::new();
    let mut query = ProfileQuery::default();
    let index = Index::ParamAudioProfileQuerySupported;
    while let Ok(data) = node.get_parameter(index, &query.to_bytes()) {
        profiles.push(ProfileQuery::from_bytes(&data).unwrap().profile);
        query.profile_index += 1;
    }
    assert_eq!(profiles.len(), 5);
    assert_eq!(profiles[0], AacProfile::LC as u32);

    let pcm = Pcm { port_index: 0, channels: 2, ..Default::default() };
    assert_eq!(node.get_parameter(Index::ParamAudioPcm, &pcm.to_bytes()), Err(Status::BadValue));
    assert_eq!(
        node.get_parameter(Index::ParamAudioMp3, &[0; 28]),
        Err(Status::NameNotFound)
    );
}

#[test]
fn port_definition_constraints() {
    let (_, node) = allocate("OMX.soft.pcm.decoder");
    let mut definition = port_definition(node.as_ref(), 0);
    assert!(definition.enabled);
    assert!(!definition.populated);
    assert_eq!(definition.audio.encoding, CodingType::Pcm);

    definition.audio.flag_error_concealment = true;
    node.set_parameter(Index::ParamPortDefinition, &definition.to_bytes()).unwrap();
    assert!(port_definition(node.as_ref(), 0).audio.flag_error_concealment);

    definition.buffer_count_actual = definition.buffer_count_min - 1;
    assert_eq!(
        node.set_parameter(Index::ParamPortDefinition, &definition.to_bytes()),
        Err(Status::BadValue)
    );
    definition.port_index = 2;
    assert_eq!(
        node.set_parameter(Index::ParamPortDefinition, &definition.to_bytes()),
        Err(Status::BadValue)
    );
}

#[test]
fn idle_waits_for_population() {
    let (sink, node) = allocate("OMX.soft.pcm.decoder");
    let memory = SharedMemory::allocate(8192).unwrap();
    assert_eq!(
        node.use_buffer(0, &CodecBuffer::new(memory)),
        Err(Status::InvalidOperation)
    );

    node.send_command(Command::StateSet(State::Idle)).unwrap();
    assert!(sink.take().is_empty());
    let input = use_buffers(node.as_ref(), 0);
    assert!(sink.take().is_empty());
    assert!(port_definition(node.as_ref(), 0).populated);
    let output = use_buffers(node.as_ref(), 1);
    assert_eq!(sink.take(), complete(Command::StateSet(State::Idle)));

    node.send_command(Command::StateSet(State::Loaded)).unwrap();
    for (id, _) in input {
        node.free_buffer(0, id).unwrap();
    }
    assert!(sink.take().is_empty());
    for (id, _) in output {
        node.free_buffer(1, id).unwrap();
    }
    assert_eq!(sink.take(), complete(Command::StateSet(State::Loaded)));
}

#[test]
fn state_errors() {
    let (sink, node) = allocate("OMX.soft.pcm.decoder");
    node.send_command(Command::StateSet(State::Loaded)).unwrap();
    assert_eq!(sink.take(), vec![Message::error(error_code::SAME_STATE)]);
    node.send_command(Command::StateSet(State::Executing)).unwrap();
    assert_eq!(sink.take(), vec![Message::error(error_code::INCORRECT_STATE_TRANSITION)]);
    assert_eq!(node.send_command(Command::Flush(7)), Err(Status::BadValue));

    node.free_node().unwrap();
    assert_eq!(
        node.send_command(Command::StateSet(State::Idle)),
        Err(Status::InvalidOperation)
    );
}

#[test]
fn loopback() {
    let (sink, node) = allocate("OMX.soft.pcm.decoder");
    let (input, output) = to_executing(&sink, node.as_ref());

    input[0].1.write(0, b"frame").unwrap();
    node.empty_buffer(input[0].0, 0, 5, 0, 42).unwrap();
    assert!(sink.take().is_empty());
    assert_eq!(node.empty_buffer(input[0].0, 0, 5, 0, 42), Err(Status::InvalidOperation));

    node.fill_buffer(output[0].0).unwrap();
    assert_eq!(
        sink.take(),
        vec![
            Message::FillBufferDone {
                buffer: output[0].0,
                range_offset: 0,
                range_length: 5,
                flags: 0,
                timestamp: 42,
            },
            Message::EmptyBufferDone { buffer: input[0].0 },
        ]
    );
    assert_eq!(output[0].1.read(0, 5).unwrap(), b"frame");

    node.fill_buffer(output[1].0).unwrap();
    node.send_command(Command::Flush(1)).unwrap();
    let messages = sink.take();
    assert_eq!(messages.len(), 2);
    assert!(matches!(messages[0], Message::FillBufferDone { range_length: 0, .. }));
    assert!(messages[1].is_command_complete(Command::Flush(1)));

    node.empty_buffer(input[1].0, 0, 5, 0, 0).unwrap();
    node.send_command(Command::StateSet(State::Idle)).unwrap();
    assert_eq!(
        sink.take(),
        vec![
            Message::EmptyBufferDone { buffer: input[1].0 },
            Message::command_complete(Command::StateSet(State::Idle)),
        ]
    );
}

#[test]
fn port_settings_change() {
    let (sink, node) = allocate("OMX.soft.mp3.decoder");
    let (input, output) = to_executing(&sink, node.as_ref());

    for (id, _) in &output {
        node.fill_buffer(*id).unwrap();
    }
    node.empty_buffer(input[0].0, 0, 16, 0, 0).unwrap();
    let messages = sink.take();
    assert_eq!(messages.len(), 1);
    assert!(matches!(
        messages[0],
        Message::Event { event: EventType::PortSettingsChanged, data1: 1, .. }
    ));

    node.send_command(Command::PortDisable(1)).unwrap();
    let messages = sink.take();
    assert_eq!(messages.len(), output.len());
    assert!(messages.iter().all(|m| matches!(m, Message::FillBufferDone { .. })));
    for (id, _) in &output {
        node.free_buffer(1, *id).unwrap();
    }
    assert_eq!(sink.take(), complete(Command::PortDisable(1)));

    let query = Pcm { port_index: 1, ..Default::default() };
    let data = node.get_parameter(Index::ParamAudioPcm, &query.to_bytes()).unwrap();
    let pcm = Pcm { sampling_rate: 48000, ..Pcm::from_bytes(&data).unwrap() };
    node.set_parameter(Index::ParamAudioPcm, &pcm.to_bytes()).unwrap();

    node.send_command(Command::PortEnable(1)).unwrap();
    assert!(sink.take().is_empty());
    let output = use_buffers(node.as_ref(), 1);
    assert_eq!(sink.take(), complete(Command::PortEnable(1)));
    assert_eq!(
        node.set_parameter(Index::ParamAudioPcm, &pcm.to_bytes()),
        Err(Status::InvalidOperation)
    );

    node.fill_buffer(output[0].0).unwrap();
    let messages = sink.take();
    assert_eq!(messages.len(), 2);
    assert!(matches!(messages[0], Message::FillBufferDone { range_length: 16, .. }));
    assert_eq!(messages[1], Message::EmptyBufferDone { buffer: input[0].0 });
}
