use crate::case::RenameRule;
use syn::meta::ParseNestedMeta;
use syn::{Attribute, LitStr, Result, Token};

/// Naming options collected from a field's attributes
#[derive(Default)]
pub struct FieldAttrs {
    pub rename: Option<String>,
    pub skip: bool,
}

/// Read `#[field(...)]` and `#[serde(...)]` on a field.
///
/// `#[field]` wins over `#[serde]` when both rename the field.
pub fn field_attrs(attrs: &[Attribute]) -> Result<FieldAttrs> {
    let mut own = FieldAttrs::default();
    let mut serde = FieldAttrs::default();

    for attr in attrs {
        if attr.path().is_ident("field") {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("rename") {
                    own.rename = Some(meta.value()?.parse::<LitStr>()?.value());
                    Ok(())
                } else if meta.path.is_ident("skip") {
                    own.skip = true;
                    Ok(())
                } else {
                    Err(meta.error("expected `rename = \"...\"` or `skip`"))
                }
            })?;
        } else if attr.path().is_ident("serde") {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("rename") {
                    serde.rename = serde_rename(&meta)?.or(serde.rename.take());
                } else if meta.path.is_ident("skip") || meta.path.is_ident("skip_deserializing") {
                    serde.skip = true;
                } else {
                    ignore(&meta)?;
                }
                Ok(())
            })?;
        }
    }

    Ok(FieldAttrs {
        rename: own.rename.or(serde.rename),
        skip: own.skip || serde.skip,
    })
}

/// Read the container-level `rename_all` rule.
///
/// `#[field(rename_all = "...")]` wins over `#[serde(rename_all = "...")]`.
pub fn container_rename_all(attrs: &[Attribute]) -> Result<Option<RenameRule>> {
    let mut own = None;
    let mut serde = None;

    for attr in attrs {
        if attr.path().is_ident("field") {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("rename_all") {
                    own = Some(rename_rule(meta.value()?.parse::<LitStr>()?)?);
                    Ok(())
                } else {
                    Err(meta.error("expected `rename_all = \"...\"`"))
                }
            })?;
        } else if attr.path().is_ident("serde") {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("rename_all") {
                    if let Some(lit) = serde_rename_lit(&meta)? {
                        serde = Some(rename_rule(lit)?);
                    }
                } else {
                    ignore(&meta)?;
                }
                Ok(())
            })?;
        }
    }

    Ok(own.or(serde))
}

fn rename_rule(lit: LitStr) -> Result<RenameRule> {
    RenameRule::parse(&lit.value())
        .ok_or_else(|| syn::Error::new(lit.span(), format!("unknown rename rule `{}`", lit.value())))
}

fn serde_rename(meta: &ParseNestedMeta) -> Result<Option<String>> {
    Ok(serde_rename_lit(meta)?.map(|lit| lit.value()))
}

/// `name = "x"` or `name(deserialize = "x")`. Incoming data is what gets
/// validated, so only the deserialize half counts.
fn serde_rename_lit(meta: &ParseNestedMeta) -> Result<Option<LitStr>> {
    if meta.input.peek(Token![=]) {
        return Ok(Some(meta.value()?.parse()?));
    }

    let mut found = None;
    meta.parse_nested_meta(|inner| {
        let lit: LitStr = inner.value()?.parse()?;
        if inner.path.is_ident("deserialize") {
            found = Some(lit);
        }
        Ok(())
    })?;
    Ok(found)
}

/// Consume a serde option this crate does not care about
fn ignore(meta: &ParseNestedMeta) -> Result<()> {
    if meta.input.peek(Token![=]) {
        let _: syn::Expr = meta.value()?.parse()?;
    } else if meta.input.peek(syn::token::Paren) {
        let content;
        syn::parenthesized!(content in meta.input);
        let _: proc_macro2::TokenStream = content.parse()?;
    }
    Ok(())
}
