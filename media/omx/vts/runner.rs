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


//! Sequential runner of test cases, reporting in the GoogleTest format.

use crate::Result;
use std::time::Instant;

type TestFn<'a> = Box<dyn Fn() -> Result<()> + 'a>;

/// Named list of test cases
pub struct TestSuite<'a> {
    name: &'static str,
    cases: Vec<(&'static str, TestFn<'a>)>,
}

/// Outcome of a suite
#[derive(Debug, Default)]
pub struct Summary {
    pub passed: usize,
    pub failed: Vec<String>,
}

impl Summary {
    /// Process exit status: 0 when every case passed
    pub fn exit_code(&self) -> i32 {
        if self.failed.is_empty() {
            0
        } else {
            1
        }
    }
}

impl<'a> TestSuite<'a> {
    pub fn new(name: &'static str) -> Self {
        Self { name, cases: Vec::new() }
    }

    pub fn add(mut self, name: &'static str, case: impl Fn() -> Result<()> + 'a) -> Self {
        self.cases.push((name, Box::new(case)));
        self
    }

    pub fn run(&self) -> Summary {
        let mut summary = Summary::default();
        println!("[==========] Running {} tests from {}.", self.cases.len(), self.name);
        for (name, case) in self.cases.iter() {
            let name = format!("{}.{}", self.name, name);
            println!("[ RUN      ] {}", name);
            let start = Instant::now();
            let result = case();
            let elapsed = start.elapsed().as_millis();
            match result {
                Ok(()) => {
                    println!("[       OK ] {} ({} ms)", name, elapsed);
                    summary.passed += 1;
                }
                Err(e) => {
                    log::error!("{}: {}", name, e);
                    println!("Failure: {}", e);
                    println!("[  FAILED  ] {} ({} ms)", name, elapsed);
                    summary.failed.push(name);
                }
            }
        }
        println!("[==========] {} tests ran.", self.cases.len());
        println!("[  PASSED  ] {} tests.", summary.passed);
        if !summary.failed.is_empty() {
            println!("[  FAILED  ] {} tests, listed below:", summary.failed.len());
            for name in summary.failed.iter() {
                println!("[  FAILED  ] {}", name);
            }
        }
        summary
    }
}
