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


//! Command line of the test binaries.
//! Malformed arguments exit with status 2, usage on the error stream.

use crate::role::DEFAULT_RES_DIR;
use clap::Parser;
use std::path::PathBuf;

/// Audio decoder component test
#[derive(Debug, Parser)]
#[command(about = "Audio decoder compliance test of an OMX component")]
pub struct ComponentTestEnvironment {
    /// HAL instance to test
    #[arg(short = 'I', long, default_value = "default")]
    pub instance: String,

    /// OMX component to test
    #[arg(short = 'C', long, default_value = "")]
    pub component: String,

    /// OMX component role
    #[arg(short = 'R', long, default_value = "")]
    pub role: String,

    /// Component quirks (legacy, unused)
    #[arg(short = 'Q', long, default_value_t = 0)]
    pub quirks: i32,

    /// Directory of the test clips
    #[arg(long, default_value = DEFAULT_RES_DIR)]
    pub res: PathBuf,
}

/// OMX store test
#[derive(Debug, Parser)]
#[command(about = "Listing test of the OMX store")]
pub struct MasterTestEnvironment {
    /// HAL instance to test
    #[arg(short = 'I', long, default_value = "default")]
    pub instance: String,
}
