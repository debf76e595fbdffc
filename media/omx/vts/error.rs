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


use media_omx::{BufferId, CodingType, Command, Message, Status};
use thiserror::Error;

/// Protocol violation, or failure to drive the component
#[derive(Debug, Error)]
pub enum Error {
    #[error("{call} failed: {status}")]
    Call { call: &'static str, status: Status },
    #[error("no message: {0}")]
    NoMessage(Status),
    #[error("expected a timeout, received {0:?}")]
    EarlyMessage(Message),
    #[error("expected completion of {expected:?}, received {received:?}")]
    UnexpectedCompletion { expected: Command, received: Message },
    #[error("unexpected event {0:?}")]
    UnexpectedEvent(Message),
    #[error("buffer {id:?} of port {port_index} is owned by the component")]
    BufferNotReturned { port_index: u32, id: BufferId },
    #[error("invalid component name `{0}`")]
    InvalidComponent(String),
    #[error("invalid component role `{0}`")]
    InvalidRole(String),
    #[error("component has {0} audio ports, expected 2")]
    PortCount(u32),
    #[error("audio ports start at {0}, no room for the output port")]
    PortRange(u32),
    #[error("no input buffer returned after {0} waits")]
    Stalled(u32),
    #[error("unsupported channel count {0}")]
    ChannelCount(u32),
    #[error("no channel information for coding {0:?}")]
    UnsupportedCoding(CodingType),
    #[error("no test clip for `{0}`")]
    NoClip(String),
    #[error("malformed stream info: {0}")]
    StreamInfo(String),
    #[error("frame of {size} bytes exceeds buffer of {capacity} bytes")]
    FrameTooLarge { size: usize, capacity: usize },
    #[error("stream ended within a frame of {0} bytes")]
    ShortRead(usize),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Name the failing call of a `Status` error
pub(crate) trait CallResult<T> {
    fn call(self, call: &'static str) -> Result<T>;
}

impl<T> CallResult<T> for media_omx::Result<T> {
    fn call(self, call: &'static str) -> Result<T> {
        self.map_err(|status| Error::Call { call, status })
    }
}
