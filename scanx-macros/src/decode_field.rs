use quote::ToTokens;
use syn::{Field, Ident, LitStr, Type, ext::IdentExt, parse::ParseBuffer};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FieldRole {
    Column,
    Embedded,
    Nested,
    Ignored,
}

pub(crate) struct FieldMetadata {
    pub(crate) ident: Ident,
    pub(crate) ty: Type,
    pub(crate) name: String,
    pub(crate) renamed: bool,
    pub(crate) role: FieldRole,
}

pub fn decode_field(field: &Field) -> FieldMetadata {
    let ident = field
        .ident
        .clone()
        .expect("Record fields are expected to have a name");
    let mut name = ident.unraw().to_string();
    if name.starts_with('_') {
        name.remove(0);
    }
    let mut metadata = FieldMetadata {
        ident,
        ty: field.ty.clone(),
        name,
        renamed: false,
        role: FieldRole::Column,
    };
    let mut set_role = |role: FieldRole, attribute: &str| {
        if metadata.role != FieldRole::Column {
            panic!(
                "Field `{}` can have only one of `embed`, `nested` and `ignore`, found `{}` as well",
                metadata.ident, attribute
            );
        }
        metadata.role = role;
    };
    let mut roles = Vec::new();
    let mut rename = None;
    for attr in &field.attrs {
        let meta = &attr.meta;
        if meta.path().is_ident("scanx") {
            let Ok(list) = meta.require_list() else {
                panic!(
                    "Error while parsing `scanx`, use it like: `#[scanx(attribute = value, ...)]`",
                );
            };
            let _ = list.parse_nested_meta(|arg| {
                if arg.path.is_ident("name") {
                    let Ok(v) = arg.value().and_then(ParseBuffer::parse::<LitStr>) else {
                        panic!(
                            "Error while parsing `name`, use it like: `#[scanx(name = \"my_column\")]`"
                        );
                    };
                    rename = Some(v.value());
                } else if arg.path.is_ident("embed") {
                    let Err(..) = arg.value() else {
                        // value() is Err for Meta::Path
                        panic!("Error while parsing `embed`, use it like: `#[scanx(embed)]`");
                    };
                    roles.push((FieldRole::Embedded, "embed"));
                } else if arg.path.is_ident("nested") {
                    let Err(..) = arg.value() else {
                        panic!("Error while parsing `nested`, use it like: `#[scanx(nested)]`");
                    };
                    roles.push((FieldRole::Nested, "nested"));
                } else if arg.path.is_ident("ignore") {
                    let Err(..) = arg.value() else {
                        panic!("Error while parsing `ignore`, use it like: `#[scanx(ignore)]`");
                    };
                    roles.push((FieldRole::Ignored, "ignore"));
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
    for (role, attribute) in roles {
        set_role(role, attribute);
    }
    if let Some(name) = rename {
        if metadata.role == FieldRole::Embedded {
            panic!(
                "Field `{}` is embedded, its columns keep their own names and `name` cannot be used",
                metadata.ident
            );
        }
        metadata.name = name;
        metadata.renamed = true;
    }
    metadata
}
