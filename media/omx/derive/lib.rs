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

//! Derive of traits :
//! - `omx::reader::Read`, `omx::writer::Write`
//! - `omx::param::Parameter`

extern crate proc_macro;
mod enum_data;
mod struct_data;

use proc_macro::TokenStream;
use quote::quote;
use syn::{DeriveInput, Error};

/// Derive of `omx::reader::Read` trait
#[proc_macro_derive(Read)]
pub fn derive_read(input: TokenStream) -> TokenStream {
    let input = syn::parse_macro_input!(input as DeriveInput);
    let (ident, data) = (&input.ident, &input.data);
    let expanded = match data {
        syn::Data::Enum(ref data) => enum_data::derive_read(ident, data),
        syn::Data::Struct(ref data) => struct_data::derive_read(ident, data),
        _ => Err(Error::new(ident.span(), "Unsupported kind of input")),
    }
    .unwrap_or_else(Error::into_compile_error);
    TokenStream::from(expanded)
}

/// Derive of `omx::writer::Write` trait
#[proc_macro_derive(Write)]
pub fn derive_write(input: TokenStream) -> TokenStream {
    let input = syn::parse_macro_input!(input as DeriveInput);
    let (ident, data) = (&input.ident, &input.data);
    let expanded = match data {
        syn::Data::Enum(ref data) => enum_data::derive_write(ident, data),
        syn::Data::Struct(ref data) => struct_data::derive_write(ident, data),
        _ => Err(Error::new(ident.span(), "Unsupported kind of input")),
    }
    .unwrap_or_else(Error::into_compile_error);
    TokenStream::from(expanded)
}

/// Derive of `omx::param::Parameter`
///
/// The type must implement `ParameterIndex`, `Read` and `Write`.
#[proc_macro_derive(Parameter)]
pub fn derive_parameter(input: TokenStream) -> TokenStream {
    let input = syn::parse_macro_input!(input as DeriveInput);
    let name = &input.ident;
    TokenStream::from(quote! {
        impl Parameter for #name {
            fn to_bytes(&self) -> Vec<u8> {
                Index::to_bytes(self)
            }
            fn from_bytes(data: &[u8]) -> Option<Self> {
                Index::from_bytes(data)
            }
        }
    })
}
