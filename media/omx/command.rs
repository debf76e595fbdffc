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

use num_derive::{FromPrimitive, ToPrimitive};
use num_traits::{FromPrimitive, ToPrimitive};

/// Port index addressing every port of a component (`OMX_ALL`)
pub const PORT_ALL: u32 = 0xffff_ffff;

/// Component state (`OMX_STATETYPE`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromPrimitive, ToPrimitive)]
pub enum State {
    /// Unrecoverable error state
    Invalid = 0,
    /// Created, no resources
    Loaded = 1,
    /// Resources allocated, not processing
    Idle = 2,
    /// Processing buffers
    Executing = 3,
    /// Processing suspended, buffers kept
    Pause = 4,
    /// Waiting for resources to become available
    WaitForResources = 5,
}

/// Raw command type (`OMX_COMMANDTYPE`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromPrimitive, ToPrimitive)]
pub enum CommandType {
    /// Change the component state
    StateSet = 0,
    /// Return all buffers of a port
    Flush = 1,
    /// Disable a port
    PortDisable = 2,
    /// Enable a port
    PortEnable = 3,
}

/// Command sent from the client to a component.
/// The target is a state or a port index, as in `OMX_SendCommand`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Transition to the given state
    StateSet(State),
    /// Flush the port, or every port with `PORT_ALL`
    Flush(u32),
    /// Disable the port, the component returns its buffers
    PortDisable(u32),
    /// Enable the port, completes when the port is populated
    PortEnable(u32),
}

impl Command {
    /// Command type of the command
    pub fn command_type(&self) -> CommandType {
        match self {
            Self::StateSet(_) => CommandType::StateSet,
            Self::Flush(_) => CommandType::Flush,
            Self::PortDisable(_) => CommandType::PortDisable,
            Self::PortEnable(_) => CommandType::PortEnable,
        }
    }

    /// Raw `(command, param)` pair of the command
    pub fn to_raw(&self) -> (u32, u32) {
        let param = match *self {
            Self::StateSet(state) => state.to_u32().unwrap_or_default(),
            Self::Flush(port) | Self::PortDisable(port) | Self::PortEnable(port) => port,
        };
        (self.command_type().to_u32().unwrap_or_default(), param)
    }

    /// Command from its raw `(command, param)` pair
    pub fn from_raw(command: u32, param: u32) -> Option<Self> {
        Some(match CommandType::from_u32(command)? {
            CommandType::StateSet => Self::StateSet(State::from_u32(param)?),
            CommandType::Flush => Self::Flush(param),
            CommandType::PortDisable => Self::PortDisable(param),
            CommandType::PortEnable => Self::PortEnable(param),
        })
    }
}

#[test]
fn test_command_raw() {
    assert_eq!(Command::StateSet(State::Idle).to_raw(), (0, 2));
    assert_eq!(Command::PortDisable(1).to_raw(), (2, 1));
    assert_eq!(Command::from_raw(1, PORT_ALL), Some(Command::Flush(PORT_ALL)));
    assert_eq!(Command::from_raw(0, 3), Some(Command::StateSet(State::Executing)));
    assert_eq!(Command::from_raw(0, 9), None);
    assert_eq!(Command::from_raw(7, 0), None);
}
