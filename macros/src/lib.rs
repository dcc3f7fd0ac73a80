mod model;
mod route;

use proc_macro::TokenStream;

/// Creates a new documentation function for the route, named after the original function with the suffix `_docs`.
///
/// The first line of the doc comment becomes the operation summary, the rest becomes the description.
#[proc_macro_attribute]
pub fn route(args: TokenStream, input: TokenStream) -> TokenStream {
	route::from_input(args, input)
}

/// Creates input structs for the model: `CreateX` and/or `UpdateX`.
///
/// `#[model]` generates both, `#[model(create)]` or `#[model(update)]` only one of them.
/// Fields with `#[serde(skip_deserializing)]` or `#[serde(skip)]` are left out. Every other
/// field is copied verbatim (including attributes) into `CreateX`, and wrapped in an `Option`
/// in `UpdateX` unless it already is one.
#[proc_macro_attribute]
pub fn model(args: TokenStream, input: TokenStream) -> TokenStream {
	model::from_input(args, input)
}
