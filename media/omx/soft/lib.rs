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

//! Software OMX components
//!
//! One loopback audio decoder per standard audio role. A decoded frame carries
//! the payload of its input frame unchanged; the components implement the
//! port, buffer and state protocol of OpenMAX IL faithfully, so that clients
//! can be exercised against them:
//!
//! ```text
//!       empty_buffer()                       fill_buffer()
//!             |                                    |
//!        _____v_____________        _______________v___
//!       |  Input port (0)   | ---> |  Output port (1)   |
//!       |  coded frames     | copy |  PCM frames        |
//!       |___________________|      |____________________|
//!             |                                    |
//!             v EmptyBufferDone                    v FillBufferDone
//! ```
//!
//! Compressed roles discover the stream format on their first frame. When it
//! differs from the output configuration, the output port settings change and
//! no frame is produced until the client has reconfigured the output port.

mod component;

#[cfg(test)]
mod tests;

pub use component::SoftComponent;

use media_omx::{
    Attribute, CodingType, ComponentInfo, Node, NodeInfo, Observer, Omx, OmxStore, Result,
    RoleInfo, Status,
};
use std::sync::Arc;

const NODE_PREFIX: &str = "OMX.soft.";

/// Name of the OMX service instance of the software components
pub const INSTANCE_NAME: &str = "default";

/// Format of the elementary stream, as found when parsing its header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct StreamFormat {
    pub channels: u32,
    pub sample_rate: u32,
}

/// Description of a software decoder
#[derive(Debug)]
pub(crate) struct Codec {
    pub name: &'static str,
    pub coding: CodingType,
    pub media_type: &'static str,
    pub stream: Option<StreamFormat>,
    pub profiles: &'static [u32],
}

const STEREO_48K: Option<StreamFormat> = Some(StreamFormat { channels: 2, sample_rate: 48000 });

#[rustfmt::skip]
static CODECS: [Codec; 7] = [
    Codec {
        name: "mp3", coding: CodingType::Mp3, media_type: "audio/mpeg",
        stream: STEREO_48K, profiles: &[],
    },
    Codec {
        name: "amrnb", coding: CodingType::Amr, media_type: "audio/3gpp",
        stream: Some(StreamFormat { channels: 1, sample_rate: 8000 }), profiles: &[],
    },
    Codec {
        name: "amrwb", coding: CodingType::Amr, media_type: "audio/amr-wb",
        stream: Some(StreamFormat { channels: 1, sample_rate: 16000 }), profiles: &[],
    },
    Codec {
        name: "aac", coding: CodingType::Aac, media_type: "audio/mp4a-latm",
        stream: STEREO_48K, profiles: &[2, 5, 29, 23, 39],
    },
    Codec {
        name: "vorbis", coding: CodingType::Vorbis, media_type: "audio/vorbis",
        stream: STEREO_48K, profiles: &[],
    },
    Codec {
        name: "opus", coding: CodingType::AndroidOpus, media_type: "audio/opus",
        stream: STEREO_48K, profiles: &[],
    },
    Codec {
        name: "pcm", coding: CodingType::Pcm, media_type: "audio/raw",
        stream: None, profiles: &[],
    },
];

impl Codec {
    fn component_name(&self) -> String {
        format!("{}{}.decoder", NODE_PREFIX, self.name)
    }

    pub(crate) fn role(&self) -> String {
        format!("audio_decoder.{}", self.name)
    }

    fn by_component_name(name: &str) -> Option<&'static Codec> {
        CODECS.iter().find(|c| c.component_name() == name)
    }
}

/// OMX service instance of the software components
#[derive(Default)]
pub struct SoftOmx {}

impl SoftOmx {
    /// New service instance
    pub fn new() -> Self {
        Self {}
    }
}

impl Omx for SoftOmx {
    fn list_nodes(&self) -> Result<Vec<ComponentInfo>> {
        Ok(CODECS
            .iter()
            .map(|c| ComponentInfo { name: c.component_name(), roles: vec![c.role()] })
            .collect())
    }

    fn allocate_node(&self, name: &str, observer: Arc<dyn Observer>) -> Result<Arc<dyn Node>> {
        let Some(codec) = Codec::by_component_name(name) else {
            log::error!("No component named `{}`", name);
            return Err(Status::NameNotFound);
        };
        log::info!("Allocating node {}", name);
        Ok(Arc::new(SoftComponent::new(codec, observer)))
    }
}

/// Store exposing the software OMX service instance
pub struct SoftOmxStore {
    omx: Arc<SoftOmx>,
}

impl SoftOmxStore {
    /// New store, with its single `default` instance
    pub fn new() -> Self {
        Self { omx: Arc::new(SoftOmx::new()) }
    }
}

impl Default for SoftOmxStore {
    fn default() -> Self {
        Self::new()
    }
}

impl OmxStore for SoftOmxStore {
    fn list_service_attributes(&self) -> Result<Vec<Attribute>> {
        Ok(vec![
            Attribute { key: "max-concurrent-instances".into(), value: "32".into() },
            Attribute { key: "supports-multiple-secure-codecs".into(), value: "0".into() },
        ])
    }

    fn node_prefix(&self) -> String {
        NODE_PREFIX.into()
    }

    fn list_roles(&self) -> Vec<RoleInfo> {
        CODECS
            .iter()
            .map(|c| RoleInfo {
                role: c.role(),
                media_type: c.media_type.into(),
                is_encoder: false,
                nodes: vec![NodeInfo { name: c.component_name(), owner: INSTANCE_NAME.into() }],
            })
            .collect()
    }

    fn get_omx(&self, instance: &str) -> Option<Arc<dyn Omx>> {
        if instance != INSTANCE_NAME {
            return None;
        }
        Some(self.omx.clone())
    }
}
