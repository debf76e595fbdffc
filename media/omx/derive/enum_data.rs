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

//! Derive of `omx::reader::Read` and `omx::writer::Write` traits on an `enum`.
//! OMX enumerations are carried on 32 bits.
//!
//! ```ignore
//! #[derive(Read, Write)]
//! enum Example {
//!    FirstVariant = 0,
//!    VendorVariant = 0x7f000001,
//! }
//! ```
//!
//! Produces:
//!
//! ```ignore
//! impl Read for Example {
//!     fn read(r: &mut Reader) -> Option<Self> {
//!         match r.read_u32()? {
//!             0 => Some(Self::FirstVariant),
//!             0x7f000001 => Some(Self::VendorVariant),
//!             _ => None,
//!         }
//!     }
//! }
//!
//! impl Write for Example {
//!     fn write(&self, w: &mut Writer) {
//!         w.write_u32(match self {
//!             Self::FirstVariant => 0,
//!             Self::VendorVariant => 0x7f000001,
//!         })
//!     }
//! }
//! ```

use proc_macro2::TokenStream;
use quote::quote;
use syn::{spanned::Spanned, Error};

fn discriminants(data: &syn::DataEnum) -> Result<Vec<(&syn::Ident, &syn::Expr)>, Error> {
    data.variants
        .iter()
        .map(|variant| {
            if !variant.fields.is_empty() {
                return Err(Error::new(variant.span(), "Only unit variants supported"));
            }
            match variant.discriminant {
                Some((_, ref discriminant)) => Ok((&variant.ident, discriminant)),
                None => Err(Error::new(variant.span(), "Missing discriminant")),
            }
        })
        .collect()
}

pub(crate) fn derive_read(name: &syn::Ident, data: &syn::DataEnum) -> Result<TokenStream, Error> {
    let mut variants: Vec<TokenStream> = Vec::new();
    for (ident, discriminant) in discriminants(data)? {
        variants.push(quote! { #discriminant => Some(Self::#ident) });
    }
    variants.push(quote! { _ => None });

    Ok(quote! {
        impl Read for #name {
            fn read(r: &mut Reader) -> Option<Self> {
                match r.read_u32()? {
                    #( #variants ),*
                }
            }
        }
    })
}

pub(crate) fn derive_write(name: &syn::Ident, data: &syn::DataEnum) -> Result<TokenStream, Error> {
    let mut variants: Vec<TokenStream> = Vec::new();
    for (ident, discriminant) in discriminants(data)? {
        variants.push(quote! { Self::#ident => #discriminant });
    }

    Ok(quote! {
        impl Write for #name {
            fn write(&self, w: &mut Writer) {
                w.write_u32(
                    match self {
                        #( #variants ),*
                    }
                )
            }
        }
    })
}
