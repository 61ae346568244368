// Procedural macros for fieldguard
// Builds the external-name field table of a record type at compile time

use proc_macro::TokenStream;

mod attrs;
mod case;
mod record;

/// Implements `Record` and `Schema` for a struct with named fields.
///
/// External names come from `#[field(rename = "...")]`, then
/// `#[serde(rename = "...")]`, then the container's
/// `#[serde(rename_all = "...")]`, then the field name itself.
/// `#[field(skip)]` and `#[serde(skip)]` leave a field out.
///
/// Generic structs are supported: every exposed field whose type mentions a
/// type parameter gets a `ToValue` bound on the generated impls.
#[proc_macro_derive(Record, attributes(field))]
pub fn record_derive(input: TokenStream) -> TokenStream {
    record::record_derive_impl(input)
}
