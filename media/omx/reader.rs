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

/// Decoding of an OMX structure from its little-endian memory image
pub trait Read {
    /// Read a value, `None` when the data is too short or invalid
    fn read(r: &mut Reader) -> Option<Self>
    where
        Self: Sized;
}

/// Cursor over the bytes of a parameter structure
pub struct Reader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    pub(crate) fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    pub(crate) fn get(&mut self, n: usize) -> Option<&'a [u8]> {
        if self.pos + n > self.data.len() {
            return None;
        }
        let old_pos = self.pos;
        self.pos += n;
        Some(&self.data[old_pos..self.pos])
    }

    pub(crate) fn read<T: Read>(&mut self) -> Option<T> {
        T::read(self)
    }

    pub(crate) fn read_u32(&mut self) -> Option<u32> {
        Some(u32::from_le_bytes(self.read_bytes()?))
    }

    pub(crate) fn read_i32(&mut self) -> Option<i32> {
        Some(i32::from_le_bytes(self.read_bytes()?))
    }

    pub(crate) fn read_bool(&mut self) -> Option<bool> {
        Some(self.read_u32()? != 0)
    }

    pub(crate) fn read_bytes<const N: usize>(&mut self) -> Option<[u8; N]> {
        <[u8; N]>::try_from(self.get(N)?).ok()
    }
}

impl<T: Read, const N: usize> Read for [T; N] {
    fn read(r: &mut Reader) -> Option<Self> {
        let vec: Vec<T> = (0..N).map_while(|_| r.read()).collect();
        vec.try_into().ok()
    }
}
