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


//! Audio decoder test cases. Each case runs on a freshly allocated node,
//! freed when the case ends.

use crate::buffer::BufferPool;
use crate::decode::{decode_frames, ElementaryStream};
use crate::port::{get_param, input_channel_info, set_audio_port_format, set_default_port_param};
use crate::role::StandardComp;
use crate::runner::{Summary, TestSuite};
use crate::state::{executing_to_idle, idle_to_executing, idle_to_loaded, loaded_to_idle};
use crate::{Client, Error, Result, TestConfig};
use media_omx::{CodingType, Omx, PortParam};

/// Node under test, with the component its role designates
pub struct AudioDecTest {
    client: Client,
    role: String,
    comp: StandardComp,
    config: TestConfig,
}

impl AudioDecTest {
    pub fn set_up(omx: &dyn Omx, component: &str, role: &str, config: &TestConfig) -> Result<Self> {
        if !component.starts_with("OMX.") {
            return Err(Error::InvalidComponent(component.into()));
        }
        let client = Client::new(omx, component, config.timeout)?;
        let comp = StandardComp::from_role(role)?;
        Ok(Self { client, role: role.into(), comp, config: config.clone() })
    }

    /// Input and output port indices: the component has exactly two ports
    fn ports(&self) -> Result<(u32, u32)> {
        match get_param(self.client.node(), &PortParam::default()) {
            Ok(PortParam { ports: 2, start_port_number }) => start_port_number
                .checked_add(1)
                .map(|output_port| (start_port_number, output_port))
                .ok_or(Error::PortRange(start_port_number)),
            Ok(PortParam { ports, .. }) => Err(Error::PortCount(ports)),
            Err(e) => {
                log::warn!("No audio port information: {}", e);
                Ok((0, 1))
            }
        }
    }

    pub fn set_role(&self) -> Result<()> {
        crate::port::set_role(self.client.node(), &self.role)
    }

    /// Mandatory port parameters: the coding of the role on input, PCM on output
    pub fn enumerate_port_format(&self) -> Result<()> {
        self.set_role()?;
        let (input_port, output_port) = self.ports()?;
        let node = self.client.node();
        set_audio_port_format(node, input_port, self.comp.coding())?;
        set_audio_port_format(node, output_port, CodingType::Pcm)
    }

    /// Decode the test clip of the role, through a complete state cycle
    pub fn decode_test(&self) -> Result<()> {
        self.set_role()?;
        let (input_port, output_port) = self.ports()?;
        let Some((media, info)) = self.comp.clip(&self.config.res_dir) else {
            return Err(Error::NoClip(self.role.clone()));
        };
        let mut stream = ElementaryStream::open(&media, &info)?;

        let node = self.client.node();
        let encoding = self.comp.coding();
        set_default_port_param(node, input_port, encoding, Default::default())?;
        let format = input_channel_info(node, input_port, encoding)?;
        set_default_port_param(node, output_port, CodingType::Pcm, format)?;

        let (mut input, mut output) = (BufferPool::new(), BufferPool::new());
        let client = &self.client;
        loaded_to_idle(client, &mut input, &mut output, input_port, output_port)?;
        idle_to_executing(client)?;
        decode_frames(
            client,
            &mut input,
            &mut output,
            encoding,
            input_port,
            output_port,
            self.config.frames,
            &mut stream,
        )?;
        executing_to_idle(client, &mut input, &mut output)?;
        idle_to_loaded(client, &mut input, &mut output)
    }
}

impl Drop for AudioDecTest {
    fn drop(&mut self) {
        if let Err(status) = self.client.node.free_node() {
            log::error!("Freeing node: {}", status);
        }
    }
}

/// Run the audio decoder test cases on `component`, taking `role`
pub fn run(omx: &dyn Omx, component: &str, role: &str, config: &TestConfig) -> Summary {
    let case = |f: fn(&AudioDecTest) -> Result<()>| {
        move || f(&AudioDecTest::set_up(omx, component, role, config)?)
    };
    TestSuite::new("AudioDecTest")
        .add("SetRole", case(AudioDecTest::set_role))
        .add("EnumeratePortFormat", case(AudioDecTest::enumerate_port_format))
        .add("DecodeTest", case(AudioDecTest::decode_test))
        .run()
}
