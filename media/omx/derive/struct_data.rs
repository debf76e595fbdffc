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

//! Derive of `omx::reader::Read` and `omx::writer::Write` traits on a `struct`
//!
//! ```ignore
//! #[derive(Read, Write)]
//! struct Example {
//!    port_index: u32,
//!    level: i32,
//!    enabled: bool,
//!    role: [u8; 128],
//!    mapping: [ChannelType; 16],
//!    other: OtherType,
//! }
//! ```
//!
//! Produces:
//!
//! ```ignore
//! impl Read for Example {
//!     fn read(r: &mut Reader) -> Option<Self> {
//!         Some(Self {
//!             port_index: r.read_u32()?,
//!             level: r.read_i32()?,
//!             enabled: r.read_bool()?,
//!             role: r.read_bytes()?,
//!             mapping: r.read()?,
//!             other: r.read()?,
//!         })
//!     }
//! }
//!
//! impl Write for Example {
//!     fn write(&self, w: &mut Writer) {
//!         w.write_u32(self.port_index);
//!         w.write_i32(self.level);
//!         w.write_bool(self.enabled);
//!         w.write_bytes(&self.role);
//!         w.write(&self.mapping);
//!         w.write(&self.other);
//!     }
//! }
//! ```
//!
//! Booleans are `OMX_BOOL`, carried on 32 bits.

use proc_macro2::TokenStream;
use quote::{format_ident, quote, quote_spanned};
use syn::{spanned::Spanned, Error};

const SCALARS: [&str; 3] = ["u32", "i32", "bool"];

enum Kind<'a> {
    Scalar(&'a syn::TypePath, &'static str),
    Bytes(&'a syn::TypeArray),
    Other(&'a syn::Type),
}

fn kind_of(ty: &syn::Type) -> Kind<'_> {
    match ty {
        syn::Type::Path(v) => match SCALARS.iter().find(|s| v.path.is_ident(s)) {
            Some(s) => Kind::Scalar(v, *s),
            None => Kind::Other(ty),
        },
        syn::Type::Array(v) => match &*v.elem {
            syn::Type::Path(e) if e.path.is_ident("u8") => Kind::Bytes(v),
            _ => Kind::Other(ty),
        },
        ty => Kind::Other(ty),
    }
}

fn named_fields(data: &syn::DataStruct) -> Result<Vec<&syn::Field>, Error> {
    data.fields
        .iter()
        .map(|field| match field.ident {
            Some(_) => Ok(field),
            None => Err(Error::new(field.span(), "Only named fields supported")),
        })
        .collect()
}

pub(crate) fn derive_read(name: &syn::Ident, data: &syn::DataStruct) -> Result<TokenStream, Error> {
    let mut fields = Vec::new();
    for field in named_fields(data)? {
        let ident = field.ident.as_ref().unwrap();
        let fn_token = match kind_of(&field.ty) {
            Kind::Scalar(v, s) => {
                let read_fn = format_ident!("read_{}", s);
                quote_spanned! { v.span() => #read_fn()? }
            }
            Kind::Bytes(v) => quote_spanned! { v.span() => read_bytes()? },
            Kind::Other(ty) => quote_spanned! { ty.span() => read()? },
        };
        fields.push(quote! { #ident: r.#fn_token });
    }

    Ok(quote! {
        impl Read for #name {
            fn read(r: &mut Reader) -> Option<Self> {
                Some(Self {
                    #( #fields ),*
                })
            }
        }
    })
}

pub(crate) fn derive_write(
    name: &syn::Ident,
    data: &syn::DataStruct,
) -> Result<TokenStream, Error> {
    let mut fields = Vec::new();
    for field in named_fields(data)? {
        let ident = field.ident.as_ref().unwrap();
        let fn_token = match kind_of(&field.ty) {
            Kind::Scalar(v, s) => {
                let write_fn = format_ident!("write_{}", s);
                quote_spanned! { v.span() => #write_fn(self.#ident) }
            }
            Kind::Bytes(v) => quote_spanned! { v.span() => write_bytes(&self.#ident) },
            Kind::Other(ty) => quote_spanned! { ty.span() => write(&self.#ident) },
        };
        fields.push(quote! { w.#fn_token; });
    }

    Ok(quote! {
        impl Write for #name {
            fn write(&self, w: &mut Writer) {
                #( #fields )*
            }
        }
    })
}
