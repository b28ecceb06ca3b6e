use crate::decode_field::{FieldMetadata, FieldRole, decode_field};
use convert_case::{Case, Casing};
use quote::ToTokens;
use syn::{Fields, ItemStruct, LitStr, parse::ParseBuffer};

pub(crate) struct RecordMetadata {
    pub(crate) fields: Vec<FieldMetadata>,
    pub(crate) decode: bool,
}

fn decode_case(value: &str) -> Case {
    match value {
        "snake_case" => Case::Snake,
        "camelCase" => Case::Camel,
        "PascalCase" => Case::Pascal,
        "kebab-case" => Case::Kebab,
        "SCREAMING_SNAKE_CASE" => Case::UpperSnake,
        _ => panic!(
            "Unknown case `{value}` in `rename_all`, expected one of: snake_case, camelCase, PascalCase, kebab-case, SCREAMING_SNAKE_CASE"
        ),
    }
}

pub fn decode_record(item: &ItemStruct) -> RecordMetadata {
    let (Fields::Named(..) | Fields::Unit) = item.fields else {
        panic!(
            "Record `{}` must have named fields, tuple structs cannot be mapped to columns",
            item.ident
        );
    };
    let mut fields: Vec<_> = item.fields.iter().map(decode_field).collect();
    let mut decode = false;
    let mut rename_all = None;
    for attr in &item.attrs {
        let meta = &attr.meta;
        if meta.path().is_ident("scanx") {
            let Ok(list) = meta.require_list() else {
                panic!("Error while parsing `scanx`, use it like: `#[scanx(attribute = value, ..)]`",);
            };
            let _ = list.parse_nested_meta(|arg| {
                if arg.path.is_ident("decode") {
                    let Err(..) = arg.value() else {
                        // value() is Err for Meta::Path
                        panic!("Error while parsing `decode`, use it like: `#[scanx(decode)]`");
                    };
                    decode = true;
                } else if arg.path.is_ident("rename_all") {
                    let Ok(value) = arg.value().and_then(ParseBuffer::parse::<LitStr>) else {
                        panic!(
                            "Error while parsing `rename_all`, use it like: `#[scanx(rename_all = \"camelCase\")]`"
                        );
                    };
                    rename_all = Some(decode_case(&value.value()));
                } else {
                    panic!(
                        "Unknown attribute `{}` inside scanx macro",
                        arg.path.to_token_stream().to_string()
                    );
                }
                Ok(())
            });
        }
    }
    if let Some(case) = rename_all {
        for field in fields.iter_mut().filter(|f| !f.renamed) {
            field.name = field.name.to_case(case);
            field.renamed = !matches!(field.role, FieldRole::Embedded);
        }
    }
    RecordMetadata { fields, decode }
}
