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


//! Compliance tests of OMX audio decoder components.
//!
//! The client drives a component through the OpenMAX IL protocol: state
//! transitions, buffer exchanges and port reconfiguration. The component
//! under test shall follow the protocol to the letter: a completion arriving
//! before the client supplied or released what the protocol requires fails
//! the test, as does a missing one.
//!
//! ```text
//!                       set_role / set_default_port_param
//!                                      |
//!    Loaded --[ allocate_port_buffers ]--> Idle ----> Executing
//!      ^                                    |  ^          |
//!      +------[ free_port_buffers ]---------+  +----------+
//!                                             decode_frames
//!                                             (reconfigure_output_port)
//! ```

pub mod audio_dec;
pub mod buffer;
pub mod decode;
pub mod env;
pub mod master;
pub mod observer;
pub mod port;
pub mod role;
pub mod runner;
pub mod state;

mod error;

#[cfg(test)]
mod tests;

pub use error::{Error, Result};

use buffer::BufferPool;
use error::CallResult;
use media_omx::{Command, Message, Node, Omx, Status, DEFAULT_TIMEOUT};
use observer::{CodecObserver, Pools};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Settings of a test run
#[derive(Debug, Clone)]
pub struct TestConfig {
    /// Wait for each message of the component
    pub timeout: Duration,
    /// Frame budget of a decode
    pub frames: u32,
    /// Directory of the test clips
    pub res_dir: PathBuf,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self { timeout: DEFAULT_TIMEOUT, frames: 1024, res_dir: role::DEFAULT_RES_DIR.into() }
    }
}

/// Node under test, with the observer of its messages
pub struct Client {
    pub node: Arc<dyn Node>,
    pub observer: Arc<CodecObserver>,
    pub timeout: Duration,
}

impl Client {
    /// Allocate the component `name` on `omx`
    pub fn new(omx: &dyn Omx, name: &str, timeout: Duration) -> Result<Self> {
        let observer = Arc::new(CodecObserver::new());
        let node = omx.allocate_node(name, observer.clone()).call("allocate_node")?;
        Ok(Self { node, observer, timeout })
    }

    pub fn node(&self) -> &dyn Node {
        self.node.as_ref()
    }

    pub fn send_command(&self, command: Command) -> Result<()> {
        log::debug!("Sending {:?}", command);
        self.node.send_command(command).call("send_command")
    }

    /// Next event of the node, see `CodecObserver::dequeue_message()`
    pub fn dequeue(&self, pools: Pools) -> media_omx::Result<Message> {
        self.observer.dequeue_message(self.timeout, pools)
    }

    /// Check that the node stays silent
    pub fn expect_timeout(&self, input: &mut BufferPool, output: &mut BufferPool) -> Result<()> {
        match self.dequeue(Some((input, output))) {
            Err(Status::TimedOut) => Ok(()),
            Ok(message) => Err(Error::EarlyMessage(message)),
            Err(status) => Err(Error::NoMessage(status)),
        }
    }

    /// Check that the next event is the completion of `command`
    pub fn expect_complete(&self, command: Command, pools: Pools) -> Result<()> {
        match self.dequeue(pools) {
            Ok(message) if message.is_command_complete(command) => Ok(()),
            Ok(received) => Err(Error::UnexpectedCompletion { expected: command, received }),
            Err(status) => Err(Error::NoMessage(status)),
        }
    }
}
