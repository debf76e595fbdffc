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


//! State transitions of a node, with the checks of the buffer exchanges
//! each transition implies.

use crate::buffer::{allocate_port_buffers, free_port_buffers, BufferPool};
use crate::{Client, Result};
use media_omx::{Command, State};

/// Loaded to idle: completes only once both ports are populated
pub fn loaded_to_idle(
    client: &Client,
    input: &mut BufferPool,
    output: &mut BufferPool,
    input_port: u32,
    output_port: u32,
) -> Result<()> {
    let command = Command::StateSet(State::Idle);
    client.send_command(command)?;

    client.expect_timeout(input, output)?;
    allocate_port_buffers(client.node(), input, input_port)?;

    client.expect_timeout(input, output)?;
    allocate_port_buffers(client.node(), output, output_port)?;

    client.expect_complete(command, Some((input, output)))
}

/// Idle to loaded: completes only once the buffers of both ports are freed
pub fn idle_to_loaded(
    client: &Client,
    input: &mut BufferPool,
    output: &mut BufferPool,
) -> Result<()> {
    let command = Command::StateSet(State::Loaded);
    client.send_command(command)?;

    client.expect_timeout(input, output)?;
    free_port_buffers(client.node(), input)?;

    client.expect_timeout(input, output)?;
    free_port_buffers(client.node(), output)?;

    client.expect_complete(command, Some((input, output)))
}

pub fn idle_to_executing(client: &Client) -> Result<()> {
    let command = Command::StateSet(State::Executing);
    client.send_command(command)?;
    client.expect_complete(command, None)
}

/// Executing to idle: every buffer is back with the client on completion
pub fn executing_to_idle(
    client: &Client,
    input: &mut BufferPool,
    output: &mut BufferPool,
) -> Result<()> {
    let command = Command::StateSet(State::Idle);
    client.send_command(command)?;
    client.expect_complete(command, Some((&mut *input, &mut *output)))?;
    output.all_returned()?;
    input.all_returned()
}

/// Flush the input port then the output port, each flush returning every
/// buffer of its port to the client.
pub fn flush_ports(
    client: &Client,
    input: &mut BufferPool,
    output: &mut BufferPool,
    input_port: u32,
    output_port: u32,
) -> Result<()> {
    let command = Command::Flush(input_port);
    client.send_command(command)?;
    client.expect_complete(command, Some((&mut *input, &mut *output)))?;
    input.all_returned()?;

    let command = Command::Flush(output_port);
    client.send_command(command)?;
    client.expect_complete(command, Some((&mut *input, &mut *output)))?;
    output.all_returned()
}
