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


//! Listing test cases of the OMX store. Empty lists are reported, and do
//! not fail.

use crate::error::CallResult;
use crate::runner::{Summary, TestSuite};
use crate::Result;
use media_omx::{ComponentInfo, Omx, OmxStore, Status};
use std::sync::Arc;

pub struct MasterTest {
    store: Arc<dyn OmxStore>,
    omx: Arc<dyn Omx>,
}

fn warn_if_empty(empty: bool, what: &str) {
    if empty {
        eprintln!("[          ] Warning ! {} empty", what);
    }
}

/// One line per component: its name, then its roles
pub fn component_info_lines(nodes: &[ComponentInfo]) -> Vec<String> {
    nodes
        .iter()
        .map(|n| n.roles.iter().fold(format!("{} | ", n.name), |line, role| line + role + " "))
        .collect()
}

impl MasterTest {
    pub fn set_up(store: &Arc<dyn OmxStore>, instance: &str) -> Result<Self> {
        let omx = store.get_omx(instance).ok_or(Status::NameNotFound).call("get_omx")?;
        Ok(Self { store: store.clone(), omx })
    }

    pub fn list_service_attributes(&self) -> Result<()> {
        let attributes = self.store.list_service_attributes().call("list_service_attributes")?;
        warn_if_empty(attributes.is_empty(), "Attribute list");
        Ok(())
    }

    pub fn node_prefix(&self) -> Result<()> {
        warn_if_empty(self.store.node_prefix().is_empty(), "Node Prefix");
        Ok(())
    }

    pub fn list_roles(&self) -> Result<()> {
        warn_if_empty(self.store.list_roles().is_empty(), "RoleInfo list");
        Ok(())
    }

    pub fn list_nodes(&self) -> Result<()> {
        let nodes = self.omx.list_nodes().call("list_nodes")?;
        warn_if_empty(nodes.is_empty(), "ComponentInfo list");
        for line in component_info_lines(&nodes) {
            println!("{}", line);
        }
        Ok(())
    }
}

/// Run the store test cases on `instance`
pub fn run(store: &Arc<dyn OmxStore>, instance: &str) -> Summary {
    let case = |f: fn(&MasterTest) -> Result<()>| move || f(&MasterTest::set_up(store, instance)?);
    TestSuite::new("MasterTest")
        .add("ListServiceAttr", case(MasterTest::list_service_attributes))
        .add("getNodePrefix", case(MasterTest::node_prefix))
        .add("ListRoles", case(MasterTest::list_roles))
        .add("ListNodes", case(MasterTest::list_nodes))
        .run()
}

