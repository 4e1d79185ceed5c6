//! Collects type definitions from parsed Rust files.
//!
//! Collection runs in two passes. The first records every struct, enum and
//! union with its fields. The second attaches inherent impl members to the
//! type they name, so an impl may appear before its type or in another module.

use privy_core::{
    BehaviorDescriptor, FieldDescriptor, MemberScope, TypeCatalog, TypeDefinition, TypeDescriptor,
};
use tracing::{debug, trace};

use crate::error::{SourceError, SourceResult};
use crate::render::{accessibility, path_segments, render};

/// Accumulates definitions across one or more files.
#[derive(Default)]
pub struct Collector {
    catalog: TypeCatalog,
    impls: Vec<(Vec<String>, syn::ItemImpl)>,
}

impl Collector {
    /// Create an empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record every type and impl in `file`, placed at `module_path`.
    ///
    /// `origin` names the file in errors. A type whose path was already
    /// collected is rejected with [`SourceError::DuplicateType`].
    pub fn add_file(
        &mut self,
        file: &syn::File,
        module_path: &[String],
        origin: &str,
    ) -> SourceResult<()> {
        self.add_items(&file.items, &mut module_path.to_vec(), origin)
    }

    fn add_items(
        &mut self,
        items: &[syn::Item],
        module: &mut Vec<String>,
        origin: &str,
    ) -> SourceResult<()> {
        for item in items {
            match item {
                syn::Item::Struct(s) => {
                    let ty = TypeDescriptor::new(s.ident.to_string()).in_module(module.clone());
                    self.declare(with_fields(TypeDefinition::new(ty), &s.fields), origin)?;
                }
                syn::Item::Union(u) => {
                    let ty = TypeDescriptor::new(u.ident.to_string()).in_module(module.clone());
                    let fields = syn::Fields::Named(u.fields.clone());
                    self.declare(with_fields(TypeDefinition::new(ty), &fields), origin)?;
                }
                syn::Item::Enum(e) => {
                    let ty = TypeDescriptor::new(e.ident.to_string()).in_module(module.clone());
                    self.declare(TypeDefinition::new(ty), origin)?;
                }
                syn::Item::Impl(i) => self.impls.push((module.clone(), i.clone())),
                syn::Item::Mod(m) => {
                    if let Some((_, inner)) = &m.content {
                        module.push(m.ident.to_string());
                        self.add_items(inner, module, origin)?;
                        module.pop();
                    }
                }
                _ => {}
            }
        }
        Ok(())
    }

    fn declare(&mut self, def: TypeDefinition, origin: &str) -> SourceResult<()> {
        let ty = def.descriptor.qualified_name();
        if self.catalog.insert_new(def) {
            Ok(())
        } else {
            Err(SourceError::DuplicateType {
                file: origin.to_string(),
                ty,
            })
        }
    }

    /// Attach impl members and return the finished catalog.
    pub fn finish(mut self) -> TypeCatalog {
        let impls = std::mem::take(&mut self.impls);
        for (module, item) in &impls {
            let syn::Type::Path(self_ty) = item.self_ty.as_ref() else {
                continue;
            };
            let segments = path_segments(&self_ty.path);
            let Some(target) = resolve_in(&self.catalog, module, &segments) else {
                debug!(path = %segments.join("::"), "impl target not declared in sources");
                continue;
            };
            match &item.trait_ {
                None => self.attach_inherent(&target, item),
                Some((_, trait_path, _)) => self.attach_deref(&target, trait_path, item),
            }
        }
        debug!(types = self.catalog.len(), "collected source types");
        self.catalog
    }

    fn attach_inherent(&mut self, target: &TypeDescriptor, item: &syn::ItemImpl) {
        let Some(def) = self.catalog.definition_mut(target) else {
            return;
        };
        for member in &item.items {
            match member {
                syn::ImplItem::Fn(f) => {
                    let scope = if f.sig.receiver().is_some() {
                        MemberScope::Instance
                    } else {
                        MemberScope::Static
                    };
                    let params = f.sig.inputs.iter().filter_map(|arg| match arg {
                        syn::FnArg::Typed(pat) => Some(render(&pat.ty)),
                        syn::FnArg::Receiver(_) => None,
                    });
                    let mut behavior = BehaviorDescriptor::new(target.clone(), f.sig.ident.to_string())
                        .with_parameters(params)
                        .with_accessibility(accessibility(&f.vis))
                        .with_scope(scope);
                    if let syn::ReturnType::Type(_, ret) = &f.sig.output {
                        behavior = behavior.with_return_type(render(ret));
                    }
                    if def.behaviors.contains(&behavior) {
                        debug!(behavior = %behavior, "skipping repeated behavior from another impl");
                        continue;
                    }
                    trace!(behavior = %behavior, "declared behavior");
                    def.behaviors.push(behavior);
                }
                syn::ImplItem::Const(c) => {
                    let field = FieldDescriptor::new(target.clone(), c.ident.to_string(), render(&c.ty))
                        .with_accessibility(accessibility(&c.vis))
                        .with_scope(MemberScope::Static);
                    if def.fields.contains(&field) {
                        debug!(field = %field, "skipping repeated const from another impl");
                        continue;
                    }
                    def.fields.push(field);
                }
                _ => {}
            }
        }
    }

    /// `impl Deref for T { type Target = U; }` makes `U` the supertype of `T`.
    fn attach_deref(&mut self, target: &TypeDescriptor, trait_path: &syn::Path, item: &syn::ItemImpl) {
        if path_segments(trait_path).last().map(String::as_str) != Some("Deref") {
            return;
        }
        let deref_target = item.items.iter().find_map(|member| match member {
            syn::ImplItem::Type(t) if t.ident == "Target" => Some(render(&t.ty)),
            _ => None,
        });
        if let (Some(def), Some(supertype)) = (self.catalog.definition_mut(target), deref_target) {
            def.supertype = Some(supertype);
        }
    }
}

fn with_fields(mut def: TypeDefinition, fields: &syn::Fields) -> TypeDefinition {
    for (idx, field) in fields.iter().enumerate() {
        let name = field
            .ident
            .as_ref()
            .map_or_else(|| idx.to_string(), ToString::to_string);
        let descriptor = FieldDescriptor::new(def.descriptor.clone(), name, render(&field.ty))
            .with_accessibility(accessibility(&field.vis));
        def.fields.push(descriptor);
    }
    def
}

/// Resolve a path written inside `module` to a collected type.
///
/// `crate::`, `self::` and `super::` prefixes are honored. Other paths are
/// tried relative to `module` first, then matched anywhere in the catalog.
fn resolve_in(catalog: &TypeCatalog, module: &[String], segments: &[String]) -> Option<TypeDescriptor> {
    let (name, prefix) = segments.split_last()?;
    let mut base: Vec<String> = module.to_vec();
    let mut rest = prefix;
    let mut anchored = false;
    while let Some((head, tail)) = rest.split_first() {
        match head.as_str() {
            "crate" => {
                base.clear();
                anchored = true;
            }
            "self" => anchored = true,
            "super" => {
                base.pop();
                anchored = true;
            }
            _ => break,
        }
        rest = tail;
    }
    if name == "Self" {
        return None;
    }
    base.extend(rest.iter().cloned());
    let exact = TypeDescriptor::new(name.clone()).in_module(base);
    if catalog.definition(&exact).is_some() {
        return Some(exact);
    }
    if anchored {
        return None;
    }
    let mut wanted = rest.to_vec();
    wanted.push(name.clone());
    catalog.get(&wanted.join("::")).map(|t| t.descriptor.clone())
}
