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
use thiserror::Error;

/// Error status of the OMX service calls, numbered as Android `status_t`.
/// Success is carried by `Ok(..)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, FromPrimitive, ToPrimitive)]
#[repr(i32)]
pub enum Status {
    /// Resource allocation failed
    #[error("NO_MEMORY")]
    NoMemory = -12,
    /// Invalid argument, or unknown buffer / port reference
    #[error("BAD_VALUE")]
    BadValue = -22,
    /// Unknown component, instance or parameter index
    #[error("NAME_NOT_FOUND")]
    NameNotFound = -2,
    /// Call not allowed in the current component or port state
    #[error("INVALID_OPERATION")]
    InvalidOperation = -38,
    /// No message before the end of the wait
    #[error("TIMED_OUT")]
    TimedOut = -110,
    /// Unclassified failure
    #[error("UNKNOWN_ERROR")]
    Unknown = i32::MIN,
}

/// Result of an OMX service call
pub type Result<T> = std::result::Result<T, Status>;

/// OMX IL error codes (`OMX_ERRORTYPE`), reported in `Error` events
#[allow(missing_docs)]
pub mod error_code {
    pub const SAME_STATE: u32 = 0x8000_1012;
    pub const INCORRECT_STATE_TRANSITION: u32 = 0x8000_1017;
}

#[test]
fn test_status_values() {
    use num_traits::{FromPrimitive, ToPrimitive};

    assert_eq!(Status::TimedOut.to_i32(), Some(-110));
    assert_eq!(Status::from_i32(-22), Some(Status::BadValue));
    assert_eq!(Status::from_i32(0), None);
    assert_eq!(Status::TimedOut.to_string(), "TIMED_OUT");
}
