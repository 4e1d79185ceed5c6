//! Conversions from `syn` syntax to descriptor vocabulary.

use privy_core::Accessibility;
use quote::ToTokens;

/// Render a syntax node as compact source text, e.g. `Vec<String>`.
pub fn render(node: &impl ToTokens) -> String {
    let raw = node.to_token_stream().to_string();
    [
        (" :: ", "::"),
        (":: ", "::"),
        (" <", "<"),
        ("< ", "<"),
        (" >", ">"),
        (" ,", ","),
        (" ;", ";"),
        ("& ", "&"),
        ("* ", "*"),
        ("[ ", "["),
        (" ]", "]"),
        ("( ", "("),
        (" )", ")"),
    ]
    .iter()
    .fold(raw, |acc, (from, to)| acc.replace(from, to))
}

/// Map a declared visibility onto [`Accessibility`].
pub fn accessibility(vis: &syn::Visibility) -> Accessibility {
    match vis {
        syn::Visibility::Public(_) => Accessibility::Public,
        syn::Visibility::Inherited => Accessibility::Private,
        syn::Visibility::Restricted(restricted) => {
            let path = render(&restricted.path);
            if restricted.in_token.is_some() {
                return match path.as_str() {
                    "self" => Accessibility::Private,
                    "crate" => Accessibility::Crate,
                    _ => Accessibility::Restricted(format!("in {path}")),
                };
            }
            match path.as_str() {
                "crate" => Accessibility::Crate,
                "self" => Accessibility::Private,
                _ => Accessibility::Restricted(path),
            }
        }
    }
}

/// Identifier segments of a path, ignoring generic arguments.
pub fn path_segments(path: &syn::Path) -> Vec<String> {
    path.segments.iter().map(|s| s.ident.to_string()).collect()
}
