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

//! OpenMAX IL component interface, as exposed by the media OMX service:
//! component store and nodes, commands, messages and parameter structures
//! with their memory image encoding.

use std::sync::Arc;
use std::time::Duration;

use media_omx_derive as omx_derive;

mod command;
mod message;
mod param;
mod reader;
mod status;
mod writer;

pub use command::*;
pub use message::*;
pub use param::*;
pub use status::*;

/// Timeout used by clients waiting on a component message (100 ms)
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(100);

/// Receiver of the messages of a node
pub trait Observer: Send + Sync {
    /// Batch of messages, in emission order
    fn on_messages(&self, messages: &[Message]);
}

/// Instance of a component
pub trait Node: Send + Sync {
    /// Read the parameter structure at `index`.
    /// `params` is the input image, giving at least the port to query.
    fn get_parameter(&self, index: Index, params: &[u8]) -> Result<Vec<u8>>;

    /// Write the parameter structure at `index`
    fn set_parameter(&self, index: Index, params: &[u8]) -> Result<()>;

    /// Send a command, its completion is notified by a `CmdComplete` event
    fn send_command(&self, command: Command) -> Result<()>;

    /// Give a buffer to the port, returns the identifier of the buffer
    fn use_buffer(&self, port_index: u32, buffer: &CodecBuffer) -> Result<BufferId>;

    /// Release a buffer of the port
    fn free_buffer(&self, port_index: u32, buffer: BufferId) -> Result<()>;

    /// Hand an input buffer filled with `range_length` bytes to the component
    fn empty_buffer(
        &self,
        buffer: BufferId,
        range_offset: u32,
        range_length: u32,
        flags: u32,
        timestamp: u64,
    ) -> Result<()>;

    /// Hand an output buffer to be filled to the component
    fn fill_buffer(&self, buffer: BufferId) -> Result<()>;

    /// Destroy the node
    fn free_node(&self) -> Result<()>;
}

/// Component name and supported roles
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentInfo {
    /// Component name, `OMX.` prefixed
    pub name: String,
    /// Roles the component can take
    pub roles: Vec<String>,
}

/// OMX service instance
pub trait Omx: Send + Sync {
    /// List the available components
    fn list_nodes(&self) -> Result<Vec<ComponentInfo>>;

    /// Instantiate the component `name`, notifying `observer` of its messages
    fn allocate_node(&self, name: &str, observer: Arc<dyn Observer>) -> Result<Arc<dyn Node>>;
}

/// Attribute of the OMX store service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    /// Attribute key
    pub key: String,
    /// Attribute value
    pub value: String,
}

/// Node of a role, as listed by the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeInfo {
    /// Component name
    pub name: String,
    /// Component owner (instance name)
    pub owner: String,
}

/// Components available for a role
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleInfo {
    /// Role name, such as `audio_decoder.mp3`
    pub role: String,
    /// Media type of the role
    pub media_type: String,
    /// Encoder or decoder role
    pub is_encoder: bool,
    /// Components providing the role
    pub nodes: Vec<NodeInfo>,
}

/// Store of OMX service instances
pub trait OmxStore: Send + Sync {
    /// Service-wide attributes
    fn list_service_attributes(&self) -> Result<Vec<Attribute>>;

    /// Prefix of the component names
    fn node_prefix(&self) -> String;

    /// Roles and the components providing them
    fn list_roles(&self) -> Vec<RoleInfo>;

    /// OMX service instance by name
    fn get_omx(&self, instance: &str) -> Option<Arc<dyn Omx>>;
}
