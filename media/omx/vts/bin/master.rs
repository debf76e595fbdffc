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


//! Listing test of the OMX store, run against the software components.

use anyhow::Result;
use clap::Parser;
use log::{error, info};
use media_omx::OmxStore;
use media_omx_soft::SoftOmxStore;
use media_omx_vts::{env::MasterTestEnvironment, master};
use std::sync::Arc;

fn try_main() -> Result<i32> {
    env_logger::init();
    let env = MasterTestEnvironment::parse();

    let store: Arc<dyn OmxStore> = Arc::new(SoftOmxStore::new());
    let summary = master::run(&store, &env.instance);
    info!("Test result = {}", summary.exit_code());
    Ok(summary.exit_code())
}

fn main() {
    match try_main() {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            error!("{:?}", e);
            std::process::exit(1)
        }
    }
}
