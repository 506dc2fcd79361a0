//! Proc macros for the config-migrator crate.
//!
//! This crate provides the `#[migration_step]` attribute macro

use proc_macro::TokenStream;
use quote::quote;
use syn::{Expr, ItemFn, Lit, meta::ParseNestedMeta, parse_macro_input, spanned::Spanned};

/// Step options parsed from `#[migration_step(...)]` arguments.
#[derive(Default)]
struct StepOptions {
    version: Option<u32>,
    name: Option<String>,
}

impl StepOptions {
    fn parse(&mut self, meta: ParseNestedMeta) -> syn::Result<()> {
        if meta.path.is_ident("version") {
            let value: Expr = meta.value()?.parse()?;
            if let Expr::Lit(expr_lit) = value {
                if let Lit::Int(lit_int) = expr_lit.lit {
                    let version = lit_int.base10_parse::<u32>()?;
                    if version == 0 {
                        return Err(syn::Error::new(
                            lit_int.span(),
                            "version must be greater than zero",
                        ));
                    }
                    self.version = Some(version);
                } else {
                    return Err(syn::Error::new(
                        expr_lit.span(),
                        "version must be an integer",
                    ));
                }
            } else {
                return Err(syn::Error::new(value.span(), "version must be a literal"));
            }
        } else if meta.path.is_ident("name") {
            let value: Expr = meta.value()?.parse()?;
            if let Expr::Lit(expr_lit) = value {
                if let Lit::Str(lit_str) = expr_lit.lit {
                    self.name = Some(lit_str.value());
                } else {
                    return Err(syn::Error::new(expr_lit.span(), "name must be a string"));
                }
            } else {
                return Err(syn::Error::new(value.span(), "name must be a literal"));
            }
        } else {
            return Err(syn::Error::new(
                meta.path.span(),
                format!("unknown migration_step attribute: {:?}", meta.path.get_ident()),
            ));
        }
        Ok(())
    }
}

/// Registers a function as the migration step for one config version.
///
/// The annotated function must have the signature
/// `fn(&mut SettingsStore, &mut Collaborators<'_>)`.
///
/// # Example
///
/// ```rust,ignore
/// use config_migrator::{Collaborators, SettingsStore, migration_step};
///
/// #[migration_step(version = 8, name = "Disable searches on start")]
/// fn disable_startup_search(settings: &mut SettingsStore, _: &mut Collaborators<'_>) {
///     settings.set_bool("General", "recentsearch_startup", false);
/// }
/// ```
///
/// This expands to the function itself plus:
///
/// ```rust,ignore
/// config_migrator::inventory::submit! {
///     config_migrator::MigrationStep::new(8, "Disable searches on start", disable_startup_search)
/// }
/// ```
#[proc_macro_attribute]
pub fn migration_step(args: TokenStream, item: TokenStream) -> TokenStream {
    let mut options = StepOptions::default();
    let parser = syn::meta::parser(|meta| options.parse(meta));
    parse_macro_input!(args with parser);
    let input = parse_macro_input!(item as ItemFn);

    match migration_step_impl(options, input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

fn migration_step_impl(
    options: StepOptions,
    input: ItemFn,
) -> syn::Result<proc_macro2::TokenStream> {
    let version = options.version.ok_or_else(|| {
        syn::Error::new(
            proc_macro2::Span::call_site(),
            "missing required attribute: #[migration_step(version = ...)]",
        )
    })?;

    let name = options.name.ok_or_else(|| {
        syn::Error::new(
            proc_macro2::Span::call_site(),
            "missing required attribute: #[migration_step(name = \"...\")]",
        )
    })?;

    let ident = &input.sig.ident;

    Ok(quote! {
        #input

        ::config_migrator::inventory::submit! {
            ::config_migrator::MigrationStep::new(#version, #name, #ident)
        }
    })
}
