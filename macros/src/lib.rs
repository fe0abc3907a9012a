//! Derive macros for the Composable Todo framework
//!
//! # Available Macros
//!
//! - `#[derive(Action)]` - Generates helpers for action enums (commands/events)
//!
//! # Example
//!
//! ```ignore
//! use composable_todo_macros::Action;
//!
//! #[derive(Action, Clone, Debug)]
//! enum TodoAction {
//!     #[command]
//!     AddTodo { text: String },
//!
//!     #[event]
//!     PersistFailed { error: String },
//! }
//!
//! assert!(TodoAction::AddTodo { text: "milk".into() }.is_command());
//! assert_eq!(TodoAction::AddTodo { text: "milk".into() }.name(), "AddTodo");
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{parse_macro_input, Attribute, Data, DeriveInput, Fields, Ident};

/// Derive macro for Action enums
///
/// Generates helper methods for action enums:
/// - `is_command()` - Returns true if this variant is a command (a user intent)
/// - `is_event()` - Returns true if this variant is an event (a fact fed back by an effect)
/// - `name()` - Returns the variant name, used as a structured log field
///
/// # Attributes
///
/// - `#[command]` - Mark a variant as a command
/// - `#[event]` - Mark a variant as an event
///
/// Unmarked variants are neither.
///
/// # Errors
///
/// Produces a compile error if:
/// - Applied to a non-enum type
/// - A variant has both `#[command]` and `#[event]` attributes
#[proc_macro_derive(Action, attributes(command, event))]
pub fn derive_action(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let name = &input.ident;

    let Data::Enum(data_enum) = &input.data else {
        return syn::Error::new_spanned(&input, "#[derive(Action)] can only be used on enums")
            .to_compile_error()
            .into();
    };

    let mut is_command_arms = Vec::new();
    let mut is_event_arms = Vec::new();
    let mut name_arms = Vec::new();

    for variant in &data_enum.variants {
        let is_command = has_attribute(&variant.attrs, "command");
        let is_event = has_attribute(&variant.attrs, "event");

        if is_command && is_event {
            return syn::Error::new_spanned(
                variant,
                "Variant cannot be both #[command] and #[event]",
            )
            .to_compile_error()
            .into();
        }

        let pattern = variant_pattern(&variant.ident, &variant.fields);

        if is_command {
            is_command_arms.push(quote! { #pattern => true, });
        }
        if is_event {
            is_event_arms.push(quote! { #pattern => true, });
        }

        let label = variant.ident.to_string();
        name_arms.push(quote! { #pattern => #label, });
    }

    let expanded = quote! {
        impl #name {
            /// Returns true if this action is a command
            #[must_use]
            #[allow(unreachable_patterns)]
            pub const fn is_command(&self) -> bool {
                match self {
                    #(#is_command_arms)*
                    _ => false,
                }
            }

            /// Returns true if this action is an event
            #[must_use]
            #[allow(unreachable_patterns)]
            pub const fn is_event(&self) -> bool {
                match self {
                    #(#is_event_arms)*
                    _ => false,
                }
            }

            /// Returns the variant name of this action
            #[must_use]
            pub const fn name(&self) -> &'static str {
                match self {
                    #(#name_arms)*
                }
            }
        }
    };

    TokenStream::from(expanded)
}

/// Build a wildcard pattern matching any value of the variant
fn variant_pattern(variant: &Ident, fields: &Fields) -> TokenStream2 {
    match fields {
        Fields::Named(_) => quote! { Self::#variant { .. } },
        Fields::Unnamed(_) => quote! { Self::#variant(..) },
        Fields::Unit => quote! { Self::#variant },
    }
}

/// Helper function to check if an attribute list contains a specific attribute
fn has_attribute(attrs: &[Attribute], name: &str) -> bool {
    attrs.iter().any(|attr| attr.path().is_ident(name))
}
