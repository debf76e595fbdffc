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

use crate::reader::{Read, Reader};
use crate::writer::{Write, Writer};

/// Index of a parameter structure (`OMX_INDEXTYPE`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
#[allow(missing_docs)]
pub enum Index {
    ParamAudioInit = 0x0100_0002,
    ParamStandardComponentRole = 0x0100_0017,
    ParamPortDefinition = 0x0200_0001,
    ParamAudioPortFormat = 0x0400_0001,
    ParamAudioPcm = 0x0400_0002,
    ParamAudioAac = 0x0400_0003,
    ParamAudioMp3 = 0x0400_0005,
    ParamAudioAmr = 0x0400_0009,
    ParamAudioVorbis = 0x0400_001b,
    ParamAudioFlac = 0x0400_001c,
    ParamAudioAndroidOpus = 0x6f40_0002,
    ParamAudioProfileQuerySupported = 0x6f40_0005,
}

impl Index {
    fn to_bytes<T: Write>(param: &T) -> Vec<u8> {
        let mut w = Writer::new(Vec::with_capacity(64));
        w.write(param);
        w.into_vec()
    }

    fn from_bytes<T: Read>(data: &[u8]) -> Option<T> {
        Reader::new(data).read()
    }
}

/// Define the index of a parameter structure
pub trait ParameterIndex {
    /// Index of the parameter
    const INDEX: Index;
}

/// Parameter structure exchanged through `get_parameter()` / `set_parameter()`
pub trait Parameter: ParameterIndex + Sized {
    /// Memory image of the structure
    fn to_bytes(&self) -> Vec<u8>;
    /// Structure from its memory image, `None` when truncated or invalid
    fn from_bytes(data: &[u8]) -> Option<Self>;
}

pub use defs::*;

#[allow(missing_docs)]
#[rustfmt::skip]
mod defs {

use super::*;
use crate::omx_derive::{Read, Write, Parameter};


// Enumerations

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Read, Write)]
pub enum Direction {
    #[default]
    Input = 0,
    Output = 1,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Read, Write)]
pub enum PortDomain {
    #[default]
    Audio = 0,
    Video = 1,
    Image = 2,
    Other = 3,
}

/// OMX_AUDIO_CODINGTYPE
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Read, Write)]
#[repr(u32)]
pub enum CodingType {
    #[default]
    Unused = 0,
    AutoDetect = 1,
    Pcm = 2,
    Amr = 4,
    Aac = 21,
    Mp3 = 22,
    Vorbis = 24,
    Flac = 28,
    AndroidOpus = 0x6f10_0002,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Read, Write)]
pub enum NumericalData {
    #[default]
    Signed = 0,
    Unsigned = 1,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Read, Write)]
pub enum Endian {
    Big = 0,
    #[default]
    Little = 1,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Read, Write)]
pub enum PcmMode {
    #[default]
    Linear = 0,
    ALaw = 1,
    MuLaw = 2,
}

/// OMX_AUDIO_CHANNELTYPE
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Read, Write)]
pub enum ChannelType {
    #[default]
    None = 0,
    LF = 1,
    RF = 2,
    CF = 3,
    LS = 4,
    RS = 5,
    LFE = 6,
    CS = 7,
    LR = 8,
    RR = 9,
}

pub const MAX_CHANNELS: usize = 16;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Read, Write)]
pub enum ChannelMode {
    #[default]
    Stereo = 0,
    JointStereo = 1,
    Dual = 2,
    Mono = 3,
}

impl ChannelMode {
    /// Mono for a single channel, stereo otherwise
    pub fn from_channels(channels: u32) -> Self {
        if channels == 1 { Self::Mono } else { Self::Stereo }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Read, Write)]
pub enum Mp3StreamFormat {
    #[default]
    Mp1Layer3 = 0,
    Mp2Layer3 = 1,
    Mp2_5Layer3 = 2,
}

/// OMX_AUDIO_AMRBANDMODETYPE
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Read, Write)]
pub enum AmrBandMode {
    #[default]
    Unused = 0,
    NB0 = 1,
    NB1 = 2,
    NB2 = 3,
    NB3 = 4,
    NB4 = 5,
    NB5 = 6,
    NB6 = 7,
    NB7 = 8,
    WB0 = 9,
    WB1 = 10,
    WB2 = 11,
    WB3 = 12,
    WB4 = 13,
    WB5 = 14,
    WB6 = 15,
    WB7 = 16,
    WB8 = 17,
}

/// OMX_AUDIO_AACPROFILETYPE
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Read, Write)]
pub enum AacProfile {
    #[default]
    Null = 0,
    Main = 1,
    LC = 2,
    SSR = 3,
    LTP = 4,
    HE = 5,
    Scalable = 6,
    ERLC = 17,
    ERScalable = 20,
    LD = 23,
    HEPS = 29,
    ELD = 39,
}

/// OMX_AUDIO_AACSTREAMFORMATTYPE
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Read, Write)]
pub enum AacStreamFormat {
    #[default]
    Mp2Adts = 0,
    Mp4Adts = 1,
    Mp4Loas = 2,
    Mp4Latm = 3,
    Adif = 4,
    Mp4FF = 5,
    Raw = 6,
}


// OMX_IndexParamAudioInit

impl ParameterIndex for PortParam {
    const INDEX: Index = Index::ParamAudioInit;
}

#[derive(Debug, Clone, Default, Read, Write, Parameter)]
pub struct PortParam {
    pub ports: u32,
    pub start_port_number: u32,
}

#[test]
fn test_port_param() {
    let dump = [0x02, 0x00, 0x00, 0x00, 0x04, 0x00, 0x00, 0x00];
    let p = PortParam::from_bytes(&dump).unwrap();
    assert_eq!(p.ports, 2);
    assert_eq!(p.start_port_number, 4);
    assert_eq!(p.to_bytes(), &dump[..]);
    assert!(PortParam::from_bytes(&dump[..7]).is_none());
}


// OMX_IndexParamStandardComponentRole

impl ParameterIndex for ComponentRole {
    const INDEX: Index = Index::ParamStandardComponentRole;
}

pub const MAX_STRINGNAME_SIZE: usize = 128;

#[derive(Debug, Clone, Read, Write, Parameter)]
pub struct ComponentRole {
    pub role: [u8; MAX_STRINGNAME_SIZE],
}

impl ComponentRole {
    /// Role parameter, `None` when the name does not fit with its terminator
    pub fn new(role: &str) -> Option<Self> {
        let bytes = role.as_bytes();
        if bytes.len() >= MAX_STRINGNAME_SIZE {
            return None;
        }
        let mut param = Self { role: [0; MAX_STRINGNAME_SIZE] };
        param.role[..bytes.len()].copy_from_slice(bytes);
        Some(param)
    }

    /// Name of the role, up to the terminator
    pub fn name(&self) -> String {
        let len = self.role.iter().position(|&b| b == 0).unwrap_or(self.role.len());
        String::from_utf8_lossy(&self.role[..len]).into_owned()
    }
}

#[test]
fn test_component_role() {
    let p = ComponentRole::new("audio_decoder.mp3").unwrap();
    let dump = p.to_bytes();
    assert_eq!(dump.len(), MAX_STRINGNAME_SIZE);
    assert_eq!(&dump[..6], b"audio_");
    assert_eq!(ComponentRole::from_bytes(&dump).unwrap().name(), "audio_decoder.mp3");
    assert!(ComponentRole::new(&"x".repeat(MAX_STRINGNAME_SIZE)).is_none());
}


// OMX_IndexParamPortDefinition

impl ParameterIndex for PortDefinition {
    const INDEX: Index = Index::ParamPortDefinition;
}

#[derive(Debug, Clone, Default, PartialEq, Read, Write)]
pub struct AudioPortDefinition {
    pub flag_error_concealment: bool,
    pub encoding: CodingType,
}

#[derive(Debug, Clone, Default, PartialEq, Read, Write, Parameter)]
pub struct PortDefinition {
    pub port_index: u32,
    pub dir: Direction,
    pub buffer_count_actual: u32,
    pub buffer_count_min: u32,
    pub buffer_size: u32,
    pub enabled: bool,
    pub populated: bool,
    pub domain: PortDomain,
    pub audio: AudioPortDefinition,
    pub buffers_contiguous: bool,
    pub buffer_alignment: u32,
}

#[test]
fn test_port_definition() {
    let dump = [
        0x01, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x04, 0x00, 0x00, 0x00,
        0x02, 0x00, 0x00, 0x00, 0x00, 0x20, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00,
        0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00,
        0x02, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    ];
    let p = PortDefinition::from_bytes(&dump).unwrap();
    assert_eq!(p.port_index, 1);
    assert_eq!(p.dir, Direction::Output);
    assert_eq!(p.buffer_count_actual, 4);
    assert_eq!(p.buffer_count_min, 2);
    assert_eq!(p.buffer_size, 8192);
    assert!(p.enabled);
    assert!(!p.populated);
    assert!(p.audio.flag_error_concealment);
    assert_eq!(p.audio.encoding, CodingType::Pcm);
    assert_eq!(p.to_bytes(), &dump[..]);
}


// OMX_IndexParamAudioPortFormat

impl ParameterIndex for AudioPortFormat {
    const INDEX: Index = Index::ParamAudioPortFormat;
}

#[derive(Debug, Clone, Default, Read, Write, Parameter)]
pub struct AudioPortFormat {
    pub port_index: u32,
    pub index: u32,
    pub encoding: CodingType,
}

#[test]
fn test_audio_port_format() {
    let dump = [0x00, 0x00, 0x00, 0x00, 0x03, 0x00, 0x00, 0x00, 0x02, 0x00, 0x10, 0x6f];
    let p = AudioPortFormat::from_bytes(&dump).unwrap();
    assert_eq!(p.index, 3);
    assert_eq!(p.encoding, CodingType::AndroidOpus);
    assert_eq!(p.to_bytes(), &dump[..]);

    let unknown = [0x00, 0x00, 0x00, 0x00, 0x03, 0x00, 0x00, 0x00, 0x63, 0x00, 0x00, 0x00];
    assert!(AudioPortFormat::from_bytes(&unknown).is_none());
}


// OMX_IndexParamAudioPcm

impl ParameterIndex for Pcm {
    const INDEX: Index = Index::ParamAudioPcm;
}

#[derive(Debug, Clone, Default, PartialEq, Read, Write, Parameter)]
pub struct Pcm {
    pub port_index: u32,
    pub channels: u32,
    pub num_data: NumericalData,
    pub endian: Endian,
    pub interleaved: bool,
    pub bits_per_sample: u32,
    pub sampling_rate: u32,
    pub pcm_mode: PcmMode,
    pub channel_mapping: [ChannelType; MAX_CHANNELS],
}

#[test]
fn test_pcm() {
    let p = Pcm {
        port_index: 1,
        channels: 2,
        endian: Endian::Little,
        interleaved: true,
        bits_per_sample: 16,
        sampling_rate: 48000,
        channel_mapping: {
            let mut m = [ChannelType::None; MAX_CHANNELS];
            m[0] = ChannelType::LF;
            m[1] = ChannelType::RF;
            m
        },
        ..Default::default()
    };
    let dump = p.to_bytes();
    assert_eq!(dump.len(), 4 * (8 + MAX_CHANNELS));
    assert_eq!(&dump[24..28], &[0x80, 0xbb, 0x00, 0x00]);
    assert_eq!(&dump[32..40], &[0x01, 0x00, 0x00, 0x00, 0x02, 0x00, 0x00, 0x00]);
    assert_eq!(Pcm::from_bytes(&dump).unwrap(), p);
}


// OMX_IndexParamAudioMp3

impl ParameterIndex for Mp3 {
    const INDEX: Index = Index::ParamAudioMp3;
}

#[derive(Debug, Clone, Default, Read, Write, Parameter)]
pub struct Mp3 {
    pub port_index: u32,
    pub channels: u32,
    pub bit_rate: u32,
    pub sample_rate: u32,
    pub audio_band_width: u32,
    pub channel_mode: ChannelMode,
    pub format: Mp3StreamFormat,
}


// OMX_IndexParamAudioFlac

impl ParameterIndex for Flac {
    const INDEX: Index = Index::ParamAudioFlac;
}

#[derive(Debug, Clone, Default, Read, Write, Parameter)]
pub struct Flac {
    pub port_index: u32,
    pub channels: u32,
    pub sample_rate: u32,
    pub compression_level: u32,
}


// OMX_IndexParamAudioAndroidOpus

impl ParameterIndex for Opus {
    const INDEX: Index = Index::ParamAudioAndroidOpus;
}

#[derive(Debug, Clone, Default, Read, Write, Parameter)]
pub struct Opus {
    pub port_index: u32,
    pub channels: u32,
    pub bit_rate: u32,
    pub sample_rate: u32,
    pub audio_band_width: u32,
}


// OMX_IndexParamAudioAmr

impl ParameterIndex for Amr {
    const INDEX: Index = Index::ParamAudioAmr;
}

#[derive(Debug, Clone, Default, Read, Write, Parameter)]
pub struct Amr {
    pub port_index: u32,
    pub channels: u32,
    pub bit_rate: u32,
    pub band_mode: AmrBandMode,
    pub dtx_mode: u32,
    pub frame_format: u32,
}

#[test]
fn test_amr() {
    let dump = [
        0x00, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0xe0, 0x2e, 0x00, 0x00,
        0x08, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    ];
    let p = Amr::from_bytes(&dump).unwrap();
    assert_eq!(p.channels, 1);
    assert_eq!(p.bit_rate, 12000);
    assert_eq!(p.band_mode, AmrBandMode::NB7);
    assert_eq!(p.to_bytes(), &dump[..]);
}


// OMX_IndexParamAudioVorbis

impl ParameterIndex for Vorbis {
    const INDEX: Index = Index::ParamAudioVorbis;
}

#[derive(Debug, Clone, Default, Read, Write, Parameter)]
pub struct Vorbis {
    pub port_index: u32,
    pub channels: u32,
    pub bit_rate: u32,
    pub min_bit_rate: u32,
    pub max_bit_rate: u32,
    pub sample_rate: u32,
    pub audio_band_width: u32,
    pub quality: i32,
    pub managed: bool,
    pub downmix: bool,
}


// OMX_IndexParamAudioAac

impl ParameterIndex for Aac {
    const INDEX: Index = Index::ParamAudioAac;
}

#[derive(Debug, Clone, Default, Read, Write, Parameter)]
pub struct Aac {
    pub port_index: u32,
    pub channels: u32,
    pub sample_rate: u32,
    pub bit_rate: u32,
    pub audio_band_width: u32,
    pub frame_length: u32,
    pub aac_tools: u32,
    pub aacer_tools: u32,
    pub profile: AacProfile,
    pub stream_format: AacStreamFormat,
    pub channel_mode: ChannelMode,
}


// OMX_IndexParamAudioProfileQuerySupported

impl ParameterIndex for ProfileQuery {
    const INDEX: Index = Index::ParamAudioProfileQuerySupported;
}

#[derive(Debug, Clone, Default, Read, Write, Parameter)]
pub struct ProfileQuery {
    pub port_index: u32,
    pub profile: u32,
    pub profile_index: u32,
}

}
