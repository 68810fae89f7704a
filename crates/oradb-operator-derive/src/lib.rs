use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

mod diff;

/// Derives `Diff` for a struct by recursing into every field.
///
/// See the documentation on the `Diff` trait in the `oradb-operator` crate
/// for the semantics of the generated implementation and an example.
#[proc_macro_derive(Diff, attributes(diff))]
pub fn derive_diff(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    diff::derive(input).into()
}
