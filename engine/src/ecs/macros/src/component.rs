use proc_macro::TokenStream;
use quote::quote;
use syn::{DeriveInput, parse_macro_input};

pub fn derive_component(input: TokenStream) -> TokenStream {
    let ast = parse_macro_input!(input as DeriveInput);

    let name = &ast.ident;
    let (impl_generics, type_generics, where_clause) = ast.generics.split_for_impl();

    // `::tiny2d_engine` resolves inside the engine crate through `extern crate self as
    // tiny2d_engine;` in its lib.rs, and through the normal dependency everywhere else.
    TokenStream::from(quote! {
        impl #impl_generics ::tiny2d_engine::ecs::Component for #name #type_generics #where_clause {
        }
    })
}
