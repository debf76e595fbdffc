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


//! Typed access to the parameters of the ports

use crate::error::{CallResult, Error, Result};
use media_omx::{
    Aac, AacProfile, AacStreamFormat, Amr, AmrBandMode, AudioPortFormat, ChannelMode,
    ChannelType, CodingType, ComponentRole, Endian, Flac, Mp3, Mp3StreamFormat, Node,
    NumericalData, Opus, Parameter, Pcm, PcmMode, PortDefinition, ProfileQuery, Status, Vorbis,
    MAX_CHANNELS,
};

/// Bound of the enumerations of port formats and profiles
const MAX_ENUMERATION: u32 = 512;

/// Format index written on `set_parameter()`, which the component shall ignore
pub const RANDOM_INDEX: u32 = 1729;

/// Read a parameter structure, `param` selecting what to read
pub fn get_param<T: Parameter>(node: &dyn Node, param: &T) -> Result<T> {
    try_get_param(node, param).call("get_parameter")
}

fn try_get_param<T: Parameter>(node: &dyn Node, param: &T) -> media_omx::Result<T> {
    let data = node.get_parameter(T::INDEX, &param.to_bytes())?;
    T::from_bytes(&data).ok_or(Status::BadValue)
}

/// Write a parameter structure
pub fn set_param<T: Parameter>(node: &dyn Node, param: &T) -> Result<()> {
    node.set_parameter(T::INDEX, &param.to_bytes()).call("set_parameter")
}

pub fn set_role(node: &dyn Node, role: &str) -> Result<()> {
    let param = ComponentRole::new(role).ok_or_else(|| Error::InvalidRole(role.into()))?;
    set_param(node, &param)
}

/// Select the encoding of a port, among the ones it enumerates.
/// Falls back to the first encoding when `encoding` is not supported.
pub fn set_audio_port_format(node: &dyn Node, port_index: u32, encoding: CodingType) -> Result<()> {
    let mut formats = Vec::new();
    let mut query = AudioPortFormat { port_index, ..Default::default() };
    let status = loop {
        match try_get_param(node, &query) {
            Ok(format) => formats.push(format.encoding),
            Err(status) => break status,
        }
        query.index += 1;
        if query.index == MAX_ENUMERATION {
            log::warn!("Port {} enumerates too many formats", port_index);
            break Status::BadValue;
        }
    };
    let Some(&first) = formats.first() else {
        return Err(Error::Call { call: "get_parameter", status });
    };

    let encoding = if formats.contains(&encoding) {
        encoding
    } else {
        log::error!("Setting default port format {:?}", first);
        first
    };
    set_param(node, &AudioPortFormat { port_index, index: RANDOM_INDEX, encoding })
}

/// Profiles supported on a port
pub fn enumerate_profiles(node: &dyn Node, port_index: u32) -> Vec<u32> {
    let mut profiles = Vec::new();
    let mut query = ProfileQuery { port_index, ..Default::default() };
    while let Ok(param) = try_get_param(node, &query) {
        profiles.push(param.profile);
        query.profile_index += 1;
        if query.profile_index == MAX_ENUMERATION {
            log::warn!("Port {} enumerates too many profiles", port_index);
            break;
        }
    }
    profiles
}

pub fn setup_pcm_port(
    node: &dyn Node,
    port_index: u32,
    channels: u32,
    num_data: NumericalData,
    bits_per_sample: u32,
    sampling_rate: u32,
    pcm_mode: PcmMode,
) -> Result<()> {
    let mut channel_mapping = [ChannelType::None; MAX_CHANNELS];
    match channels {
        1 => channel_mapping[0] = ChannelType::CF,
        2 => channel_mapping[..2].copy_from_slice(&[ChannelType::LF, ChannelType::RF]),
        _ => return Err(Error::ChannelCount(channels)),
    }
    let param = get_param(node, &Pcm { port_index, ..Default::default() })?;
    set_param(
        node,
        &Pcm {
            channels,
            num_data,
            endian: Endian::Little,
            interleaved: true,
            bits_per_sample,
            sampling_rate,
            pcm_mode,
            channel_mapping,
            ..param
        },
    )
}

pub fn setup_mp3_port(
    node: &dyn Node,
    port_index: u32,
    format: Mp3StreamFormat,
    channels: u32,
    bit_rate: u32,
    sample_rate: u32,
) -> Result<()> {
    let param = get_param(node, &Mp3 { port_index, ..Default::default() })?;
    set_param(
        node,
        &Mp3 {
            channels,
            bit_rate,
            sample_rate,
            audio_band_width: 0,
            channel_mode: ChannelMode::from_channels(channels),
            format,
            ..param
        },
    )
}

pub fn setup_flac_port(
    node: &dyn Node,
    port_index: u32,
    channels: u32,
    sample_rate: u32,
    compression_level: u32,
) -> Result<()> {
    let param = get_param(node, &Flac { port_index, ..Default::default() })?;
    set_param(node, &Flac { channels, sample_rate, compression_level, ..param })
}

pub fn setup_opus_port(
    node: &dyn Node,
    port_index: u32,
    channels: u32,
    bit_rate: u32,
    sample_rate: u32,
) -> Result<()> {
    let param = get_param(node, &Opus { port_index, ..Default::default() })?;
    set_param(node, &Opus { channels, bit_rate, sample_rate, ..param })
}

/// AMR band mode of a bit rate, in bits per second
pub fn pick_amr_band_mode(wide_band: bool, bit_rate: u32) -> AmrBandMode {
    use AmrBandMode::*;

    #[rustfmt::skip]
    let modes: &[(u32, AmrBandMode)] = if wide_band {
        &[(6600, WB0), (8850, WB1), (12650, WB2), (14250, WB3),
          (15850, WB4), (18250, WB5), (19850, WB6), (23050, WB7)]
    } else {
        &[(4750, NB0), (5150, NB1), (5900, NB2), (6700, NB3),
          (7400, NB4), (7950, NB5), (10200, NB6)]
    };
    let last = if wide_band { WB8 } else { NB7 };
    modes.iter().find(|(bps, _)| bit_rate <= *bps).map_or(last, |&(_, mode)| mode)
}

pub fn setup_amr_port(
    node: &dyn Node,
    port_index: u32,
    bit_rate: u32,
    wide_band: bool,
) -> Result<()> {
    let param = get_param(node, &Amr { port_index, ..Default::default() })?;
    set_param(
        node,
        &Amr {
            channels: 1,
            bit_rate,
            band_mode: pick_amr_band_mode(wide_band, bit_rate),
            ..param
        },
    )
}

pub fn setup_vorbis_port(
    node: &dyn Node,
    port_index: u32,
    channels: u32,
    bit_rate: u32,
    sample_rate: u32,
    quality: i32,
) -> Result<()> {
    let param = get_param(node, &Vorbis { port_index, ..Default::default() })?;
    set_param(node, &Vorbis { channels, bit_rate, sample_rate, quality, ..param })
}

pub fn setup_aac_port(
    node: &dyn Node,
    port_index: u32,
    profile: AacProfile,
    stream_format: AacStreamFormat,
    channels: u32,
    bit_rate: u32,
    sample_rate: u32,
) -> Result<()> {
    let param = get_param(node, &Aac { port_index, ..Default::default() })?;
    set_param(
        node,
        &Aac {
            channels,
            sample_rate,
            bit_rate,
            profile,
            stream_format,
            channel_mode: ChannelMode::from_channels(channels),
            ..param
        },
    )
}

/// Channel count and sample rate of a port
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AudioFormat {
    pub channels: u32,
    pub sample_rate: u32,
}

impl Default for AudioFormat {
    fn default() -> Self {
        Self { channels: 2, sample_rate: 44100 }
    }
}

/// Configure the encoding of a port, with error concealment.
/// PCM ports get signed 16 bits samples, AAC ports an MP4 ADTS stream.
pub fn set_default_port_param(
    node: &dyn Node,
    port_index: u32,
    encoding: CodingType,
    format: AudioFormat,
) -> Result<()> {
    let mut definition = get_param(node, &PortDefinition { port_index, ..Default::default() })?;
    definition.audio.flag_error_concealment = true;
    definition.audio.encoding = encoding;
    set_param(node, &definition)?;

    match encoding {
        CodingType::Pcm => setup_pcm_port(
            node,
            port_index,
            format.channels,
            NumericalData::Signed,
            16,
            format.sample_rate,
            PcmMode::Linear,
        ),
        CodingType::Aac => setup_aac_port(
            node,
            port_index,
            AacProfile::Null,
            AacStreamFormat::Mp4Adts,
            format.channels,
            0,
            format.sample_rate,
        ),
        _ => Ok(()),
    }
}

/// Channel count and sample rate of the input port, as updated by the
/// component after parsing the stream header.
/// AMR blocks carry no sample rate, 8 kHz is reported.
pub fn input_channel_info(
    node: &dyn Node,
    port_index: u32,
    encoding: CodingType,
) -> Result<AudioFormat> {
    let (channels, sample_rate) = match encoding {
        CodingType::Pcm => {
            let p = get_param(node, &Pcm { port_index, ..Default::default() })?;
            (p.channels, p.sampling_rate)
        }
        CodingType::Mp3 => {
            let p = get_param(node, &Mp3 { port_index, ..Default::default() })?;
            (p.channels, p.sample_rate)
        }
        CodingType::AndroidOpus => {
            let p = get_param(node, &Opus { port_index, ..Default::default() })?;
            (p.channels, p.sample_rate)
        }
        CodingType::Vorbis => {
            let p = get_param(node, &Vorbis { port_index, ..Default::default() })?;
            (p.channels, p.sample_rate)
        }
        CodingType::Amr => {
            let p = get_param(node, &Amr { port_index, ..Default::default() })?;
            (p.channels, 8000)
        }
        CodingType::Aac => {
            let p = get_param(node, &Aac { port_index, ..Default::default() })?;
            (p.channels, p.sample_rate)
        }
        _ => return Err(Error::UnsupportedCoding(encoding)),
    };
    Ok(AudioFormat { channels, sample_rate })
}
