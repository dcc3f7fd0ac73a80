use darling::{ast, FromDeriveInput, FromField, FromMeta};
use proc_macro2::TokenTree;
use quote::{format_ident, quote, ToTokens};
use syn::Meta;

#[derive(Debug, Default, FromMeta)]
struct ModelArgs {
	#[darling(default)]
	create: bool,
	#[darling(default)]
	update: bool,
}

#[derive(Debug, FromDeriveInput)]
#[darling(supports(struct_named), forward_attrs)]
struct ModelInputReceiver {
	ident: syn::Ident,

	generics: syn::Generics,

	data: ast::Data<(), ModelFieldReceiver>,

	attrs: Vec<syn::Attribute>,
}

#[derive(Debug, FromField)]
#[darling(forward_attrs)]
struct ModelFieldReceiver {
	ident: Option<syn::Ident>,

	ty: syn::Type,
	vis: syn::Visibility,

	attrs: Vec<syn::Attribute>,
}

/// Whether the field carries `#[serde(skip)]` or `#[serde(skip_deserializing)]`.
fn is_server_owned(attrs: &[syn::Attribute]) -> bool {
	attrs.iter().any(|attr| {
		let Meta::List(ref list) = attr.meta else {
			return false;
		};

		if !list.path.is_ident("serde") {
			return false;
		}

		list.tokens.to_token_stream().into_iter().any(|token| {
			matches!(token, TokenTree::Ident(ref ident) if ident == "skip_deserializing" || ident == "skip")
		})
	})
}

fn is_option(ty: &syn::Type) -> bool {
	let syn::Type::Path(path) = ty else {
		return false;
	};

	path.qself.is_none()
		&& path
			.path
			.segments
			.last()
			.is_some_and(|segment| segment.ident == "Option")
}

pub fn from_input(
	args: proc_macro::TokenStream,
	input: proc_macro::TokenStream,
) -> proc_macro::TokenStream {
	let args = match ast::NestedMeta::parse_meta_list(args.into()) {
		Ok(x) => x,
		Err(e) => return e.into_compile_error().into(),
	};

	let args = match ModelArgs::from_list(&args) {
		Ok(x) => x,
		Err(e) => return e.write_errors().into(),
	};

	// A bare `#[model]` generates both inputs
	let (create, update) = if args.create || args.update {
		(args.create, args.update)
	} else {
		(true, true)
	};

	let input = syn::parse_macro_input!(input as syn::DeriveInput);
	let receiver = match ModelInputReceiver::from_derive_input(&input) {
		Ok(x) => x,
		Err(e) => return e.write_errors().into(),
	};

	let ident = &receiver.ident;
	let vis = &input.vis;
	let generics = &receiver.generics;
	let create_ident = format_ident!("Create{}", ident);
	let update_ident = format_ident!("Update{}", ident);

	let attrs = &receiver.attrs;

	let Some(fields) = receiver.data.take_struct() else {
		return syn::Error::new_spanned(&input.ident, "#[model] expects a struct with named fields")
			.into_compile_error()
			.into();
	};

	let fields = fields
		.iter()
		.filter_map(|field| {
			let ident = field.ident.as_ref()?;

			if is_server_owned(&field.attrs) {
				return None;
			}

			Some((&field.attrs, ident, &field.ty, &field.vis))
		})
		.collect::<Vec<_>>();

	let create_struct = create.then(|| {
		let create_fields = fields.iter().map(|(attrs, ident, ty, vis)| {
			quote! {
				#(#attrs)*
				#vis #ident: #ty,
			}
		});

		quote! {
			#(#attrs)*
			#vis struct #create_ident #generics {
				#(
					#create_fields
				)*
			}
		}
	});

	let update_struct = update.then(|| {
		let update_fields = fields.iter().map(|(attrs, ident, ty, vis)| {
			let ty = if is_option(ty) {
				quote!(#ty)
			} else {
				quote!(Option<#ty>)
			};

			quote! {
				#(#attrs)*
				#vis #ident: #ty,
			}
		});

		quote! {
			#(#attrs)*
			#vis struct #update_ident #generics {
				#(
					#update_fields
				)*
			}
		}
	});

	quote! {
		#input

		#create_struct

		#update_struct
	}
	.into()
}
