mod decode_field;
mod decode_record;

use decode_field::FieldRole;
use decode_record::decode_record;
use proc_macro::TokenStream;
use quote::quote;
use syn::{ItemStruct, parse_macro_input};

/// Registers the fields of a struct so that rows can be scanned into it.
///
/// Field attributes, inside `#[scanx(..)]`:
/// - `name = "column"`: column name used verbatim, by default the field name
///   without a leading underscore, passed through the mapper.
/// - `ignore`: the field receives no column and keeps its default value.
/// - `embed`: the columns of the inner record are promoted into this one.
/// - `nested`: the columns of the inner record are reached as `field.column`.
///
/// Struct attributes:
/// - `decode`: the struct implements `AsValue` and is scanned from a single
///   column as a whole.
/// - `rename_all = "camelCase"`: case applied to every field name.
#[proc_macro_derive(Record, attributes(scanx))]
pub fn derive_record(input: TokenStream) -> TokenStream {
    let item: ItemStruct = parse_macro_input!(input as ItemStruct);
    let name = &item.ident;
    let (impl_generics, ty_generics, where_clause) = item.generics.split_for_impl();
    let record = decode_record(&item);
    let defs = record
        .fields
        .iter()
        .filter(|f| f.role != FieldRole::Ignored)
        .map(|f| {
            let ident = f.ident.to_string();
            let column = &f.name;
            let renamed = f.renamed;
            let ty = &f.ty;
            let kind = match f.role {
                FieldRole::Embedded => {
                    quote!(::scanx::FieldKind::Embedded(<#ty as ::scanx::Destination>::field_defs))
                }
                FieldRole::Nested => {
                    quote!(::scanx::FieldKind::Nested(<#ty as ::scanx::Destination>::field_defs))
                }
                _ => quote!(::scanx::FieldKind::Column),
            };
            quote! {
                ::scanx::FieldDef {
                    ident: #ident,
                    name: #column,
                    renamed: #renamed,
                    kind: #kind,
                }
            }
        });
    let slots = record.fields.iter().map(|f| {
        let field = &f.ident;
        match f.role {
            FieldRole::Column => quote!(out.push(Some(&mut self.#field));),
            FieldRole::Embedded | FieldRole::Nested => {
                quote!(::scanx::Destination::field_slots(&mut self.#field, out);)
            }
            FieldRole::Ignored => quote!(),
        }
    });
    let self_decoding = record.decode;
    let decoder = if record.decode {
        quote!(Some(self))
    } else {
        quote!(None)
    };
    quote! {
        impl #impl_generics ::scanx::Destination for #name #ty_generics #where_clause {
            const KIND: ::scanx::Kind = ::scanx::Kind::Record;
            const SELF_DECODING: bool = #self_decoding;

            fn field_defs() -> &'static [::scanx::FieldDef] {
                const FIELDS: &[::scanx::FieldDef] = &[#(#defs),*];
                FIELDS
            }

            #[allow(unused_variables)]
            fn field_slots<'a>(
                &'a mut self,
                out: &mut ::std::vec::Vec<::std::option::Option<&'a mut dyn ::scanx::ScanTarget>>,
            ) {
                #(#slots)*
            }

            fn decoder(&mut self) -> ::std::option::Option<&mut dyn ::scanx::ScanTarget> {
                #decoder
            }
        }

        impl #impl_generics ::scanx::Element for #name #ty_generics #where_clause {
            type Target = Self;
            fn from_target(target: Self) -> Self {
                target
            }
        }
    }
    .into()
}
