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

/// Encoding of an OMX structure to its little-endian memory image
pub trait Write {
    /// Append the value
    fn write(&self, w: &mut Writer)
    where
        Self: Sized;
}

/// Output buffer of a parameter structure
pub struct Writer {
    vec: Vec<u8>,
}

impl Writer {
    pub(crate) fn new(vec: Vec<u8>) -> Self {
        Self { vec }
    }

    pub(crate) fn into_vec(self) -> Vec<u8> {
        self.vec
    }

    pub(crate) fn put(&mut self, slice: &[u8]) {
        self.vec.extend_from_slice(slice);
    }

    pub(crate) fn write<T: Write>(&mut self, v: &T) {
        v.write(self)
    }

    pub(crate) fn write_u32(&mut self, v: u32) {
        self.put(&v.to_le_bytes());
    }

    pub(crate) fn write_i32(&mut self, v: i32) {
        self.put(&v.to_le_bytes());
    }

    pub(crate) fn write_bool(&mut self, v: bool) {
        self.write_u32(v.into());
    }

    pub(crate) fn write_bytes<const N: usize>(&mut self, bytes: &[u8; N]) {
        self.put(bytes);
    }
}

impl<T: Write, const N: usize> Write for [T; N] {
    fn write(&self, w: &mut Writer) {
        for item in self {
            w.write(item);
        }
    }
}
