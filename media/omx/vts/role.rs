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


use crate::{Error, Result};
use media_omx::CodingType;
use std::path::{Path, PathBuf};

/// Directory of the test clips on the device
pub const DEFAULT_RES_DIR: &str = "/sdcard/media/";

/// Standard audio decoder component, as named by the suffix of its role
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StandardComp {
    Mp3,
    AmrNb,
    AmrWb,
    Aac,
    Vorbis,
    Opus,
    Pcm,
}

type Entry = (&'static str, StandardComp, CodingType, Option<&'static str>);

/// Indexed by `StandardComp`
static COMPONENTS: [Entry; 7] = [
    ("mp3", StandardComp::Mp3, CodingType::Mp3, Some("bbb_mp3_stereo_192kbps_48000hz")),
    ("amrnb", StandardComp::AmrNb, CodingType::Amr, Some("sine_amrnb_1ch_12kbps_8000hz")),
    ("amrwb", StandardComp::AmrWb, CodingType::Amr, Some("sine_amrwb_1ch_24kbps_16000hz")),
    ("aac", StandardComp::Aac, CodingType::Aac, Some("bbb_aac_stereo_128kbps_48000hz")),
    ("vorbis", StandardComp::Vorbis, CodingType::Vorbis, Some("bbb_vorbis_stereo_128kbps_48000hz")),
    ("opus", StandardComp::Opus, CodingType::AndroidOpus, Some("bbb_opus_stereo_128kbps_48000hz")),
    ("pcm", StandardComp::Pcm, CodingType::Pcm, None),
];

impl StandardComp {
    /// Component of a role such as `audio_decoder.mp3`.
    /// The suffix following the first `.` is matched regardless of case.
    pub fn from_role(role: &str) -> Result<Self> {
        let suffix = role.split_once('.').map(|(_, suffix)| suffix);
        suffix
            .and_then(|s| COMPONENTS.iter().find(|(name, ..)| name.eq_ignore_ascii_case(s)))
            .map(|&(_, comp, ..)| comp)
            .ok_or_else(|| Error::InvalidRole(role.into()))
    }

    fn entry(&self) -> &'static Entry {
        &COMPONENTS[*self as usize]
    }

    pub fn name(&self) -> &'static str {
        self.entry().0
    }

    /// Coding of the input port
    pub fn coding(&self) -> CodingType {
        self.entry().2
    }

    /// Elementary stream and info file of the test clip, under `res_dir`
    pub fn clip(&self, res_dir: &Path) -> Option<(PathBuf, PathBuf)> {
        let base = self.entry().3?;
        Some((
            res_dir.join(format!("{}.{}", base, self.name())),
            res_dir.join(format!("{}.info", base)),
        ))
    }
}
