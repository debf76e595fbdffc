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


use crate::audio_dec::AudioDecTest;
use crate::buffer::{allocate_port_buffers, dispatch_output_buffer, BufferPool, Owner};
use crate::decode::{decode_frames, reconfigure_output_port, ElementaryStream, STALL_LIMIT};
use crate::env::{ComponentTestEnvironment, MasterTestEnvironment};
use crate::observer::CodecObserver;
use crate::port::{
    enumerate_profiles, get_param, pick_amr_band_mode, set_default_port_param, setup_aac_port,
    setup_amr_port, setup_flac_port, setup_mp3_port, setup_opus_port, setup_pcm_port,
    setup_vorbis_port,
};
use crate::role::StandardComp;
use crate::runner::TestSuite;
use crate::state::{
    executing_to_idle, flush_ports, idle_to_executing, idle_to_loaded, loaded_to_idle,
};
use crate::{master, Client, Error, TestConfig};
use clap::error::ErrorKind;
use clap::Parser;
use media_omx_soft::{SoftOmx, SoftOmxStore};
use media_omx::{
    Aac, AacProfile, AacStreamFormat, Amr, AmrBandMode, BufferId, ChannelMode, CodecBuffer,
    CodingType, Command, ComponentInfo, EventType, Index, Message, Mp3, Mp3StreamFormat, Node,
    NumericalData, Observer, Omx, OmxStore, Opus, Parameter, PcmMode, PortParam,
    Result as OmxResult, State, Status, Vorbis,
};
use std::fs;
use std::io::Cursor;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

const TIMEOUT: Duration = Duration::from_millis(1);

fn client(codec: &str) -> Client {
    let name = format!("OMX.soft.{}.decoder", codec);
    Client::new(&SoftOmx::new(), &name, TIMEOUT).unwrap()
}

fn config(res_dir: &Path, frames: u32) -> TestConfig {
    TestConfig { timeout: TIMEOUT, frames, res_dir: res_dir.into() }
}

/// Media and info text of `count` frames of `size` bytes
fn stream_files(count: usize, size: usize) -> (Vec<u8>, String) {
    let media = (0..count * size).map(|i| i as u8).collect();
    let info = (0..count).map(|i| format!("{} 0 {}\n", size, i * 1000)).collect();
    (media, info)
}

fn write_clip(res_dir: &Path, comp: StandardComp, count: usize, size: usize) {
    let (media_path, info_path) = comp.clip(res_dir).unwrap();
    let (media, info) = stream_files(count, size);
    fs::write(media_path, media).unwrap();
    fs::write(info_path, info).unwrap();
}

fn error_event() -> Message {
    Message::Event { event: EventType::Error, data1: 0, data2: 0 }
}

#[test]
fn role_resolution() {
    let comp = StandardComp::from_role("audio_decoder.amrwb").unwrap();
    assert_eq!(comp, StandardComp::AmrWb);
    assert_eq!(comp.coding(), CodingType::Amr);
    assert_eq!(StandardComp::from_role("audio_decoder.OPUS").unwrap(), StandardComp::Opus);
    assert_eq!(StandardComp::Opus.coding(), CodingType::AndroidOpus);
    assert_eq!(StandardComp::from_role("audio_decoder.pcm").unwrap().coding(), CodingType::Pcm);

    assert!(matches!(StandardComp::from_role("audio_decoder.flac"), Err(Error::InvalidRole(_))));
    assert!(matches!(StandardComp::from_role("mp3"), Err(Error::InvalidRole(_))));
    assert!(matches!(StandardComp::from_role("audio.decoder.mp3"), Err(Error::InvalidRole(_))));

    let (media, info) = StandardComp::Aac.clip(Path::new("/sdcard/media/")).unwrap();
    assert_eq!(media, Path::new("/sdcard/media/bbb_aac_stereo_128kbps_48000hz.aac"));
    assert_eq!(info, Path::new("/sdcard/media/bbb_aac_stereo_128kbps_48000hz.info"));
    let (media, _) = StandardComp::AmrNb.clip(Path::new("/res")).unwrap();
    assert_eq!(media, Path::new("/res/sine_amrnb_1ch_12kbps_8000hz.amrnb"));
    assert!(StandardComp::Pcm.clip(Path::new("/res")).is_none());
}

#[test]
fn amr_band_modes() {
    assert_eq!(pick_amr_band_mode(false, 4750), AmrBandMode::NB0);
    assert_eq!(pick_amr_band_mode(false, 4751), AmrBandMode::NB1);
    assert_eq!(pick_amr_band_mode(false, 10200), AmrBandMode::NB6);
    assert_eq!(pick_amr_band_mode(false, 12200), AmrBandMode::NB7);
    assert_eq!(pick_amr_band_mode(true, 0), AmrBandMode::WB0);
    assert_eq!(pick_amr_band_mode(true, 12650), AmrBandMode::WB2);
    assert_eq!(pick_amr_band_mode(true, 23050), AmrBandMode::WB7);
    assert_eq!(pick_amr_band_mode(true, 23850), AmrBandMode::WB8);
}

#[test]
fn elementary_stream() {
    let info = "4 0 0\n3 1\n33\n 2 0 66";
    let mut stream = ElementaryStream::new(Cursor::new(b"abcdefghi".to_vec()), info);
    let memory = media_omx::SharedMemory::allocate(4).unwrap();

    let frame = stream.read_frame(&memory).unwrap().unwrap();
    assert_eq!((frame.bytes, frame.flags, frame.timestamp), (4, 0, 0));
    assert_eq!(memory.read(0, 4).unwrap(), b"abcd");
    let frame = stream.read_frame(&memory).unwrap().unwrap();
    assert_eq!((frame.bytes, frame.flags, frame.timestamp), (3, 1, 33));
    assert_eq!(memory.read(0, 3).unwrap(), b"efg");
    stream.read_frame(&memory).unwrap().unwrap();
    assert!(stream.read_frame(&memory).unwrap().is_none());

    let mut stream = ElementaryStream::new(Cursor::new(vec![0; 8]), "8 0 0");
    assert!(matches!(stream.read_frame(&memory), Err(Error::FrameTooLarge { size: 8, .. })));
    let mut stream = ElementaryStream::new(Cursor::new(vec![0; 2]), "3 0 0");
    assert!(matches!(stream.read_frame(&memory), Err(Error::ShortRead(3))));
    let mut stream = ElementaryStream::new(Cursor::new(vec![0; 2]), "2 zero 0");
    assert!(matches!(stream.read_frame(&memory), Err(Error::StreamInfo(_))));
}

#[test]
fn observer_reconciles_buffers() {
    let client = client("pcm");
    let (mut input, mut output) = (BufferPool::new(), BufferPool::new());
    loaded_to_idle(&client, &mut input, &mut output, 0, 1).unwrap();
    idle_to_executing(&client).unwrap();
    dispatch_output_buffer(client.node(), &mut output, 0).unwrap();
    assert_eq!(output.buffers()[0].owner, Owner::Component);

    let observer = &client.observer;
    let returned = Message::FillBufferDone {
        buffer: output.buffers()[0].id,
        range_offset: 0,
        range_length: 0,
        flags: 0,
        timestamp: 0,
    };
    observer.on_messages(&[returned, error_event()]);

    // Left queued without pools
    assert_eq!(observer.dequeue_message(TIMEOUT, None), Ok(error_event()));
    assert_eq!(output.buffers()[0].owner, Owner::Component);
    assert_eq!(
        observer.dequeue_message(TIMEOUT, Some((&mut input, &mut output))),
        Err(Status::TimedOut)
    );
    assert_eq!(output.buffers()[0].owner, Owner::Client);
    output.all_returned().unwrap();

    observer.on_messages(&[Message::EmptyBufferDone { buffer: BufferId(0xbad) }]);
    assert_eq!(
        observer.dequeue_message(TIMEOUT, Some((&mut input, &mut output))),
        Err(Status::BadValue)
    );
}

#[test]
fn observer_waits_for_messages() {
    let observer = Arc::new(CodecObserver::new());
    let sender = observer.clone();
    let thread = std::thread::spawn(move || {
        std::thread::sleep(Duration::from_millis(20));
        sender.on_messages(&[error_event()]);
    });
    assert_eq!(observer.dequeue_message(Duration::from_secs(5), None), Ok(error_event()));
    thread.join().unwrap();
}

#[test]
fn state_cycle() {
    let client = client("pcm");
    let (mut input, mut output) = (BufferPool::new(), BufferPool::new());
    loaded_to_idle(&client, &mut input, &mut output, 0, 1).unwrap();
    assert_eq!((input.port_index(), output.port_index()), (0, 1));
    assert_eq!(input.len(), 4);
    idle_to_executing(&client).unwrap();

    for index in 0..output.len() {
        dispatch_output_buffer(client.node(), &mut output, index).unwrap();
    }
    flush_ports(&client, &mut input, &mut output, 0, 1).unwrap();

    dispatch_output_buffer(client.node(), &mut output, 2).unwrap();
    executing_to_idle(&client, &mut input, &mut output).unwrap();
    idle_to_loaded(&client, &mut input, &mut output).unwrap();
    assert!(input.is_empty() && output.is_empty());
}

/// Node completing every command as soon as it is sent
struct EagerNode {
    observer: Arc<dyn Observer>,
}

impl Node for EagerNode {
    fn get_parameter(&self, _: Index, _: &[u8]) -> OmxResult<Vec<u8>> {
        Err(Status::NameNotFound)
    }
    fn set_parameter(&self, _: Index, _: &[u8]) -> OmxResult<()> {
        Err(Status::NameNotFound)
    }
    fn send_command(&self, command: Command) -> OmxResult<()> {
        self.observer.on_messages(&[Message::command_complete(command)]);
        Ok(())
    }
    fn use_buffer(&self, _: u32, _: &CodecBuffer) -> OmxResult<BufferId> {
        Err(Status::InvalidOperation)
    }
    fn free_buffer(&self, _: u32, _: BufferId) -> OmxResult<()> {
        Ok(())
    }
    fn empty_buffer(&self, _: BufferId, _: u32, _: u32, _: u32, _: u64) -> OmxResult<()> {
        Ok(())
    }
    fn fill_buffer(&self, _: BufferId) -> OmxResult<()> {
        Ok(())
    }
    fn free_node(&self) -> OmxResult<()> {
        Ok(())
    }
}

#[test]
fn early_completion() {
    let observer = Arc::new(CodecObserver::new());
    let node = Arc::new(EagerNode { observer: observer.clone() });
    let client = Client { node, observer, timeout: TIMEOUT };
    let (mut input, mut output) = (BufferPool::new(), BufferPool::new());

    let result = loaded_to_idle(&client, &mut input, &mut output, 0, 1);
    assert!(matches!(
        result,
        Err(Error::EarlyMessage(m)) if m.is_command_complete(Command::StateSet(State::Idle))
    ));
    let result = idle_to_loaded(&client, &mut input, &mut output);
    assert!(matches!(result, Err(Error::EarlyMessage(_))));
    idle_to_executing(&client).unwrap();
}

#[test]
fn decode_pcm_frames() {
    let client = client("pcm");
    let node = client.node();
    set_default_port_param(node, 0, CodingType::Pcm, Default::default()).unwrap();
    set_default_port_param(node, 1, CodingType::Pcm, Default::default()).unwrap();

    let (media, info) = stream_files(1100, 32);
    let mut stream = ElementaryStream::new(Cursor::new(media), &info);
    let (mut input, mut output) = (BufferPool::new(), BufferPool::new());
    loaded_to_idle(&client, &mut input, &mut output, 0, 1).unwrap();
    idle_to_executing(&client).unwrap();
    decode_frames(&client, &mut input, &mut output, CodingType::Pcm, 0, 1, 1024, &mut stream)
        .unwrap();

    // The budget stops the decode on frame 1024
    assert_eq!(stream.next_info().unwrap().unwrap().timestamp, 1024 * 1000);
    executing_to_idle(&client, &mut input, &mut output).unwrap();
    idle_to_loaded(&client, &mut input, &mut output).unwrap();
}

#[test]
fn decode_test_reconfigures_output() {
    let res_dir = tempfile::tempdir().unwrap();
    let config = config(res_dir.path(), 32);
    let omx = SoftOmx::new();
    for codec in ["mp3", "amrnb", "amrwb", "aac", "vorbis", "opus"] {
        let role = format!("audio_decoder.{}", codec);
        write_clip(res_dir.path(), StandardComp::from_role(&role).unwrap(), 40, 64);

        let component = format!("OMX.soft.{}.decoder", codec);
        let test = AudioDecTest::set_up(&omx, &component, &role, &config).unwrap();
        test.decode_test().unwrap();
    }
}

#[test]
fn decode_test_stream_shorter_than_budget() {
    let res_dir = tempfile::tempdir().unwrap();
    write_clip(res_dir.path(), StandardComp::Mp3, 3, 64);
    let config = config(res_dir.path(), 1024);
    let omx = SoftOmx::new();
    let test =
        AudioDecTest::set_up(&omx, "OMX.soft.mp3.decoder", "audio_decoder.mp3", &config).unwrap();
    test.decode_test().unwrap();
}

#[test]
fn audio_dec_cases() {
    let res_dir = tempfile::tempdir().unwrap();
    let config = config(res_dir.path(), 8);
    let omx = SoftOmx::new();

    let test = AudioDecTest::set_up(&omx, "OMX.soft.aac.decoder", "audio_decoder.aac", &config);
    let test = test.unwrap();
    test.set_role().unwrap();
    test.enumerate_port_format().unwrap();
    assert!(matches!(test.decode_test(), Err(Error::Io(_))));

    let test = AudioDecTest::set_up(&omx, "OMX.soft.aac.decoder", "audio_decoder.mp3", &config);
    assert!(matches!(
        test.unwrap().set_role(),
        Err(Error::Call { call: "set_parameter", status: Status::BadValue })
    ));

    let test = AudioDecTest::set_up(&omx, "OMX.soft.pcm.decoder", "audio_decoder.pcm", &config);
    assert!(matches!(test.unwrap().decode_test(), Err(Error::NoClip(_))));

    let test = AudioDecTest::set_up(&omx, "soft.pcm.decoder", "audio_decoder.pcm", &config);
    assert!(matches!(test, Err(Error::InvalidComponent(_))));
    let test = AudioDecTest::set_up(&omx, "OMX.soft.pcm.decoder", "", &config);
    assert!(matches!(test, Err(Error::InvalidRole(_))));
    let test = AudioDecTest::set_up(&omx, "OMX.soft.flac.decoder", "audio_decoder.flac", &config);
    assert!(matches!(test, Err(Error::Call { call: "allocate_node", .. })));

    let summary = crate::audio_dec::run(&omx, "OMX.soft.pcm.decoder", "audio_decoder.pcm", &config);
    assert_eq!(summary.passed, 2);
    assert_eq!(summary.failed, ["AudioDecTest.DecodeTest"]);
    assert_eq!(summary.exit_code(), 1);
}

#[test]
fn port_parameters() {
    let client = client("aac");
    let profiles = enumerate_profiles(client.node(), 0);
    assert_eq!(profiles, [2, 5, 29, 23, 39]);
    assert!(enumerate_profiles(self::client("mp3").node(), 0).is_empty());

    let result =
        setup_pcm_port(client.node(), 1, 3, NumericalData::Signed, 16, 48000, PcmMode::Linear);
    assert!(matches!(result, Err(Error::ChannelCount(3))));
    setup_pcm_port(client.node(), 1, 1, NumericalData::Signed, 16, 48000, PcmMode::Linear)
        .unwrap();

    let mut pool = BufferPool::new();
    assert!(matches!(
        allocate_port_buffers(client.node(), &mut pool, 0),
        Err(Error::Call { call: "use_buffer", status: Status::InvalidOperation })
    ));
}

#[test]
fn master_listing() {
    let store: Arc<dyn OmxStore> = Arc::new(SoftOmxStore::new());
    assert_eq!(master::run(&store, "default").exit_code(), 0);
    let summary = master::run(&store, "legacy");
    assert_eq!(summary.failed.len(), 4);

    let nodes = store.get_omx("default").unwrap().list_nodes().unwrap();
    let lines = master::component_info_lines(&nodes);
    assert!(lines.contains(&"OMX.soft.mp3.decoder | audio_decoder.mp3 ".to_string()));

    let info = ComponentInfo { name: "OMX.x".into(), roles: vec!["a.b".into(), "a.c".into()] };
    assert_eq!(master::component_info_lines(&[info]), ["OMX.x | a.b a.c "]);
}

#[test]
fn runner_summary() {
    let summary = TestSuite::new("Suite")
        .add("Pass", || Ok(()))
        .add("Fail", || Err(Error::PortCount(3)))
        .run();
    assert_eq!(summary.passed, 1);
    assert_eq!(summary.failed, ["Suite.Fail"]);
    assert_eq!(summary.exit_code(), 1);
    assert_eq!(TestSuite::new("Empty").run().exit_code(), 0);
}

/// Soft component deviating from the protocol as scripted
struct DeviantNode {
    inner: Arc<dyn Node>,
    observer: Arc<dyn Observer>,
    eager: Option<Command>,
    ports: Option<PortParam>,
}

impl Node for DeviantNode {
    fn get_parameter(&self, index: Index, params: &[u8]) -> OmxResult<Vec<u8>> {
        match (&self.ports, index) {
            (Some(ports), Index::ParamAudioInit) => Ok(ports.to_bytes()),
            _ => self.inner.get_parameter(index, params),
        }
    }
    fn set_parameter(&self, index: Index, params: &[u8]) -> OmxResult<()> {
        self.inner.set_parameter(index, params)
    }
    fn send_command(&self, command: Command) -> OmxResult<()> {
        self.inner.send_command(command)?;
        if self.eager == Some(command) {
            self.observer.on_messages(&[Message::command_complete(command)]);
        }
        Ok(())
    }
    fn use_buffer(&self, port_index: u32, buffer: &CodecBuffer) -> OmxResult<BufferId> {
        self.inner.use_buffer(port_index, buffer)
    }
    fn free_buffer(&self, port_index: u32, buffer: BufferId) -> OmxResult<()> {
        self.inner.free_buffer(port_index, buffer)
    }
    fn empty_buffer(&self, id: BufferId, off: u32, len: u32, flags: u32, ts: u64) -> OmxResult<()> {
        self.inner.empty_buffer(id, off, len, flags, ts)
    }
    fn fill_buffer(&self, buffer: BufferId) -> OmxResult<()> {
        self.inner.fill_buffer(buffer)
    }
    fn free_node(&self) -> OmxResult<()> {
        self.inner.free_node()
    }
}

/// Service allocating soft components wrapped in `DeviantNode`
#[derive(Default)]
struct DeviantOmx {
    soft: SoftOmx,
    eager: Option<Command>,
    ports: Option<PortParam>,
}

impl Omx for DeviantOmx {
    fn list_nodes(&self) -> OmxResult<Vec<ComponentInfo>> {
        self.soft.list_nodes()
    }
    fn allocate_node(&self, name: &str, observer: Arc<dyn Observer>) -> OmxResult<Arc<dyn Node>> {
        let inner = self.soft.allocate_node(name, observer.clone())?;
        Ok(Arc::new(DeviantNode {
            inner,
            observer,
            eager: self.eager,
            ports: self.ports.clone(),
        }))
    }
}

/// Client of a pcm decoder in the executing state, with its pools
fn executing(omx: &dyn Omx) -> (Client, BufferPool, BufferPool) {
    let client = Client::new(omx, "OMX.soft.pcm.decoder", TIMEOUT).unwrap();
    let (mut input, mut output) = (BufferPool::new(), BufferPool::new());
    loaded_to_idle(&client, &mut input, &mut output, 0, 1).unwrap();
    idle_to_executing(&client).unwrap();
    (client, input, output)
}

#[test]
fn audio_port_range() {
    let res_dir = tempfile::tempdir().unwrap();
    let config = config(res_dir.path(), 8);
    let (component, role) = ("OMX.soft.pcm.decoder", "audio_decoder.pcm");

    let ports = PortParam { ports: 2, start_port_number: u32::MAX };
    let omx = DeviantOmx { ports: Some(ports), ..Default::default() };
    let test = AudioDecTest::set_up(&omx, component, role, &config).unwrap();
    assert!(matches!(test.enumerate_port_format(), Err(Error::PortRange(u32::MAX))));
    assert!(matches!(test.decode_test(), Err(Error::PortRange(u32::MAX))));

    let ports = PortParam { ports: 3, start_port_number: 0 };
    let omx = DeviantOmx { ports: Some(ports), ..Default::default() };
    let test = AudioDecTest::set_up(&omx, component, role, &config).unwrap();
    assert!(matches!(test.enumerate_port_format(), Err(Error::PortCount(3))));

    let summary = crate::audio_dec::run(&omx, component, role, &config);
    assert_eq!(summary.failed.len(), 2);
}

#[test]
fn reconfiguration_early_disable() {
    let omx = DeviantOmx { eager: Some(Command::PortDisable(1)), ..Default::default() };
    let (client, mut input, mut output) = executing(&omx);
    let result =
        reconfigure_output_port(&client, &mut input, &mut output, CodingType::Pcm, 0, 1);
    assert!(matches!(
        result,
        Err(Error::EarlyMessage(m)) if m.is_command_complete(Command::PortDisable(1))
    ));
}

#[test]
fn reconfiguration_early_enable() {
    let omx = DeviantOmx { eager: Some(Command::PortEnable(1)), ..Default::default() };
    let (client, mut input, mut output) = executing(&omx);
    let result =
        reconfigure_output_port(&client, &mut input, &mut output, CodingType::Pcm, 0, 1);
    assert!(matches!(
        result,
        Err(Error::EarlyMessage(m)) if m.is_command_complete(Command::PortEnable(1))
    ));
    // Output buffers were freed on disable, none allocated since
    assert!(output.is_empty());
}

#[test]
fn reconfiguration_completes() {
    let (client, mut input, mut output) = executing(&SoftOmx::new());
    reconfigure_output_port(&client, &mut input, &mut output, CodingType::Pcm, 0, 1).unwrap();
    assert_eq!(output.len(), 4);
    assert!(output.buffers().iter().all(|b| b.owner == Owner::Component));
    executing_to_idle(&client, &mut input, &mut output).unwrap();
    idle_to_loaded(&client, &mut input, &mut output).unwrap();
}

#[test]
fn pump_rejects_foreign_events() {
    let (media, info) = stream_files(16, 32);
    let events = [
        Message::port_settings_changed(0, Index::ParamPortDefinition as u32),
        Message::error(0x8000_1001),
        Message::command_complete(Command::Flush(1)),
    ];
    for event in events {
        let (client, mut input, mut output) = executing(&SoftOmx::new());
        client.observer.on_messages(&[event.clone()]);
        let mut stream = ElementaryStream::new(Cursor::new(media.clone()), &info);
        let result = decode_frames(
            &client,
            &mut input,
            &mut output,
            CodingType::Pcm,
            0,
            1,
            8,
            &mut stream,
        );
        assert!(matches!(result, Err(Error::UnexpectedEvent(m)) if m == event));
    }
}

#[test]
fn pump_stalls_without_input_buffers() {
    let (client, _, mut output) = executing(&SoftOmx::new());
    let (media, info) = stream_files(16, 32);
    let mut stream = ElementaryStream::new(Cursor::new(media), &info);
    let mut input = BufferPool::new();
    let result =
        decode_frames(&client, &mut input, &mut output, CodingType::Pcm, 0, 1, 8, &mut stream);
    assert!(matches!(result, Err(Error::Stalled(STALL_LIMIT))));
    // Nothing was read from the stream
    assert_eq!(stream.next_info().unwrap().unwrap().timestamp, 0);
}

#[test]
fn codec_port_setup() {
    let node = client("mp3");
    setup_mp3_port(node.node(), 0, Mp3StreamFormat::Mp2Layer3, 1, 128000, 32000).unwrap();
    let mp3 = get_param(node.node(), &Mp3::default()).unwrap();
    assert_eq!((mp3.channels, mp3.bit_rate, mp3.sample_rate), (1, 128000, 32000));
    assert_eq!((mp3.channel_mode, mp3.format), (ChannelMode::Mono, Mp3StreamFormat::Mp2Layer3));
    assert!(matches!(
        setup_mp3_port(node.node(), 1, Mp3StreamFormat::Mp1Layer3, 2, 0, 44100),
        Err(Error::Call { call: "get_parameter", status: Status::BadValue })
    ));

    let node = client("opus");
    setup_opus_port(node.node(), 0, 2, 96000, 48000).unwrap();
    let opus = get_param(node.node(), &Opus::default()).unwrap();
    assert_eq!((opus.channels, opus.bit_rate, opus.sample_rate), (2, 96000, 48000));

    let node = client("vorbis");
    setup_vorbis_port(node.node(), 0, 1, 64000, 22050, -1).unwrap();
    let vorbis = get_param(node.node(), &Vorbis::default()).unwrap();
    assert_eq!((vorbis.channels, vorbis.sample_rate, vorbis.quality), (1, 22050, -1));

    let node = client("aac");
    setup_aac_port(node.node(), 0, AacProfile::HE, AacStreamFormat::Adif, 1, 0, 24000).unwrap();
    let aac = get_param(node.node(), &Aac::default()).unwrap();
    assert_eq!((aac.profile, aac.stream_format), (AacProfile::HE, AacStreamFormat::Adif));
    assert_eq!((aac.channels, aac.channel_mode), (1, ChannelMode::Mono));
}

#[test]
fn amr_port_setup() {
    let node = client("amrwb");
    setup_amr_port(node.node(), 0, 23850, true).unwrap();
    let amr = get_param(node.node(), &Amr::default()).unwrap();
    assert_eq!((amr.channels, amr.bit_rate, amr.band_mode), (1, 23850, AmrBandMode::WB8));

    let node = client("amrnb");
    setup_amr_port(node.node(), 0, 12200, false).unwrap();
    let amr = get_param(node.node(), &Amr::default()).unwrap();
    assert_eq!(amr.band_mode, AmrBandMode::NB7);
    setup_amr_port(node.node(), 0, 5000, false).unwrap();
    assert_eq!(get_param(node.node(), &Amr::default()).unwrap().band_mode, AmrBandMode::NB1);
}

#[test]
fn flac_port_setup_unsupported() {
    // No soft component carries a FLAC block
    let node = client("mp3");
    assert!(matches!(
        setup_flac_port(node.node(), 0, 2, 44100, 5),
        Err(Error::Call { call: "get_parameter", status: Status::NameNotFound })
    ));
}

#[test]
fn command_lines() {
    let env = ComponentTestEnvironment::try_parse_from([
        "media_omx_audio_dec_test",
        "-I",
        "default",
        "-C",
        "OMX.soft.mp3.decoder",
        "-R",
        "audio_decoder.mp3",
        "-Q",
        "3",
    ])
    .unwrap();
    assert_eq!(env.component, "OMX.soft.mp3.decoder");
    assert_eq!(env.role, "audio_decoder.mp3");
    assert_eq!(env.quirks, 3);
    assert_eq!(env.res, Path::new(crate::role::DEFAULT_RES_DIR));

    let env = MasterTestEnvironment::try_parse_from(["media_omx_master_test"]).unwrap();
    assert_eq!(env.instance, "default");

    let e = ComponentTestEnvironment::try_parse_from(["media_omx_audio_dec_test", "--bogus"])
        .unwrap_err();
    assert_eq!((e.kind(), e.exit_code()), (ErrorKind::UnknownArgument, 2));
    let e = ComponentTestEnvironment::try_parse_from(["media_omx_audio_dec_test", "-Q", "many"])
        .unwrap_err();
    assert_eq!((e.kind(), e.exit_code()), (ErrorKind::ValueValidation, 2));
    let e = MasterTestEnvironment::try_parse_from(["media_omx_master_test", "-C", "OMX.x"])
        .unwrap_err();
    assert_eq!((e.kind(), e.exit_code()), (ErrorKind::UnknownArgument, 2));
}
