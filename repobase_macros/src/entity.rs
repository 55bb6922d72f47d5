use proc_macro::TokenStream;
use quote::quote;
use syn::ext::IdentExt;
use syn::parse::ParseStream;
use syn::{Attribute, Data, DeriveInput, Fields, LitStr};

pub fn derive_entity(input: TokenStream) -> TokenStream {
    let input = syn::parse_macro_input!(input as DeriveInput);
    match expand(&input) {
        Ok(expanded) => expanded.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

fn expand(input: &DeriveInput) -> syn::Result<proc_macro2::TokenStream> {
    let name = &input.ident;
    let collection = extract_collection(input)?;
    let id_field = extract_id_field(input)?;
    let layout = document_layout(input)?;

    let id_key = layout
        .keys
        .iter()
        .find(|(ident, _)| *ident == id_field)
        .map(|(_, key)| key.clone())
        .ok_or_else(|| {
            syn::Error::new_spanned(&id_field, "Entity derive: the id field must be serialized")
        })?;

    // Flattened fields contribute keys only known at runtime.
    let fields = if layout.flattened {
        quote! { ::std::option::Option::None }
    } else {
        let keys = layout.keys.iter().map(|(_, key)| key);
        quote! { ::std::option::Option::Some(&[#(#keys),*]) }
    };

    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    Ok(quote! {
        impl #impl_generics repobase::Entity for #name #ty_generics #where_clause {
            const COLLECTION: &'static str = #collection;
            const ID_FIELD: &'static str = #id_key;
            const FIELDS: ::std::option::Option<&'static [&'static str]> = #fields;

            fn id(&self) -> &str {
                &self.#id_field
            }

            fn set_id(&mut self, id: ::std::string::String) {
                self.#id_field = id;
            }
        }
    })
}

fn extract_collection(input: &DeriveInput) -> syn::Result<String> {
    for attr in &input.attrs {
        if !attr.path().is_ident("entity") {
            continue;
        }

        let mut collection = None;
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("collection") {
                let value: LitStr = meta.value()?.parse()?;
                collection = Some(value.value());
                Ok(())
            } else {
                Err(meta.error("expected `collection = \"...\"`"))
            }
        })?;

        if let Some(c) = collection {
            return Ok(c);
        }
    }

    // snake_case type name + "s"
    let name = input.ident.to_string();
    Ok(format!("{}s", to_snake_case(&name)))
}

fn named_fields(input: &DeriveInput) -> syn::Result<&syn::FieldsNamed> {
    let Data::Struct(data_struct) = &input.data else {
        return Err(syn::Error::new_spanned(
            &input.ident,
            "Entity can only be derived for structs",
        ));
    };
    match &data_struct.fields {
        Fields::Named(fields) => Ok(fields),
        _ => Err(syn::Error::new_spanned(
            &input.ident,
            "Entity requires a struct with named fields",
        )),
    }
}

fn extract_id_field(input: &DeriveInput) -> syn::Result<syn::Ident> {
    let fields = named_fields(input)?;

    for field in &fields.named {
        for attr in &field.attrs {
            if !attr.path().is_ident("entity") {
                continue;
            }
            let mut is_id = false;
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("id") {
                    is_id = true;
                    Ok(())
                } else {
                    Err(meta.error("expected `id`"))
                }
            })?;
            if is_id {
                if let Some(ident) = &field.ident {
                    return Ok(ident.clone());
                }
            }
        }
    }

    fields
        .named
        .iter()
        .filter_map(|field| field.ident.as_ref())
        .find(|ident| *ident == "id")
        .cloned()
        .ok_or_else(|| {
            syn::Error::new_spanned(
                &input.ident,
                "Entity derive: no field marked with #[entity(id)] and no field named `id`",
            )
        })
}

/// Serialized root keys of the struct, as serde would write them.
struct DocumentLayout {
    keys: Vec<(syn::Ident, String)>,
    flattened: bool,
}

#[derive(Default)]
struct SerdeField {
    rename: Option<String>,
    skipped: bool,
    flatten: bool,
}

fn document_layout(input: &DeriveInput) -> syn::Result<DocumentLayout> {
    let rename_all = container_rename_all(&input.attrs)?;
    let mut layout = DocumentLayout {
        keys: Vec::new(),
        flattened: false,
    };

    for field in &named_fields(input)?.named {
        let Some(ident) = &field.ident else {
            continue;
        };
        let serde = field_serde(&field.attrs)?;
        if serde.flatten {
            layout.flattened = true;
            continue;
        }
        if serde.skipped {
            continue;
        }
        let key = match serde.rename {
            Some(rename) => rename,
            None => {
                let raw = ident.unraw().to_string();
                match &rename_all {
                    Some(rule) => apply_rename_rule(rule, &raw),
                    None => raw,
                }
            }
        };
        layout.keys.push((ident.clone(), key));
    }

    Ok(layout)
}

fn container_rename_all(attrs: &[Attribute]) -> syn::Result<Option<String>> {
    let mut rename_all = None;
    for attr in attrs.iter().filter(|attr| attr.path().is_ident("serde")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("rename_all") {
                let rule = serialize_name(meta.input)?;
                if !RENAME_RULES.contains(&rule.value().as_str()) {
                    return Err(syn::Error::new_spanned(
                        &rule,
                        "Entity derive: unknown serde rename_all rule",
                    ));
                }
                rename_all = Some(rule.value());
                Ok(())
            } else {
                skip_meta_value(meta.input)
            }
        })?;
    }
    Ok(rename_all)
}

fn field_serde(attrs: &[Attribute]) -> syn::Result<SerdeField> {
    let mut serde = SerdeField::default();
    for attr in attrs.iter().filter(|attr| attr.path().is_ident("serde")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("rename") {
                serde.rename = Some(serialize_name(meta.input)?.value());
                Ok(())
            } else if meta.path.is_ident("skip") || meta.path.is_ident("skip_serializing") {
                serde.skipped = true;
                Ok(())
            } else if meta.path.is_ident("flatten") {
                serde.flatten = true;
                Ok(())
            } else {
                skip_meta_value(meta.input)
            }
        })?;
    }
    Ok(serde)
}

/// Name used when serializing: `= "name"` or `(serialize = "name", ...)`.
fn serialize_name(input: ParseStream) -> syn::Result<LitStr> {
    if input.peek(syn::Token![=]) {
        input.parse::<syn::Token![=]>()?;
        return input.parse();
    }

    let content;
    syn::parenthesized!(content in input);
    let mut name = None;
    while !content.is_empty() {
        let key: syn::Ident = content.parse()?;
        content.parse::<syn::Token![=]>()?;
        let value: LitStr = content.parse()?;
        if key == "serialize" {
            name = Some(value);
        }
        if !content.is_empty() {
            content.parse::<syn::Token![,]>()?;
        }
    }
    name.ok_or_else(|| content.error("expected `serialize = \"...\"`"))
}

// Consume the value of a serde option this derive does not interpret.
fn skip_meta_value(input: ParseStream) -> syn::Result<()> {
    if input.peek(syn::Token![=]) {
        input.parse::<syn::Token![=]>()?;
        input.parse::<syn::Expr>()?;
    } else if input.peek(syn::token::Paren) {
        let content;
        syn::parenthesized!(content in input);
        content.parse::<proc_macro2::TokenStream>()?;
    }
    Ok(())
}

const RENAME_RULES: &[&str] = &[
    "lowercase",
    "UPPERCASE",
    "PascalCase",
    "camelCase",
    "snake_case",
    "SCREAMING_SNAKE_CASE",
    "kebab-case",
    "SCREAMING-KEBAB-CASE",
];

/// serde's `rename_all` applied to a snake_case field name.
fn apply_rename_rule(rule: &str, field: &str) -> String {
    match rule {
        "lowercase" | "snake_case" => field.to_string(),
        "UPPERCASE" | "SCREAMING_SNAKE_CASE" => field.to_ascii_uppercase(),
        "PascalCase" => to_pascal_case(field),
        "camelCase" => {
            let pascal = to_pascal_case(field);
            let mut chars = pascal.chars();
            match chars.next() {
                Some(first) => first.to_lowercase().chain(chars).collect(),
                None => pascal,
            }
        }
        "kebab-case" => field.replace('_', "-"),
        "SCREAMING-KEBAB-CASE" => field.replace('_', "-").to_ascii_uppercase(),
        _ => field.to_string(),
    }
}

fn to_pascal_case(field: &str) -> String {
    let mut result = String::new();
    let mut capitalize = true;
    for ch in field.chars() {
        if ch == '_' {
            capitalize = true;
        } else if capitalize {
            result.extend(ch.to_uppercase());
            capitalize = false;
        } else {
            result.push(ch);
        }
    }
    result
}

fn to_snake_case(s: &str) -> String {
    let mut result = String::new();
    for (i, ch) in s.chars().enumerate() {
        if ch.is_uppercase() {
            if i > 0 {
                result.push('_');
            }
            result.extend(ch.to_lowercase());
        } else {
            result.push(ch);
        }
    }
    result
}
