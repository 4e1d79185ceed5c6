use serde::{Deserialize, Serialize};

use crate::model::{
    Accessibility, BehaviorDescriptor, FieldDescriptor, MemberScope, TypeDescriptor,
};

/// Access to type metadata: which types exist and what each declares.
///
/// Implementations report only members declared directly on the type.
/// Members a type picks up from elsewhere (trait impls, supertypes, deref
/// targets) are not declared members.
pub trait TypeIntrospection {
    /// Look up a type by bare name or path.
    fn resolve(&self, name: &str) -> Option<TypeDescriptor>;

    /// Fields declared on `ty`, in declaration order.
    fn declared_fields(&self, ty: &TypeDescriptor) -> Vec<FieldDescriptor>;

    /// Behaviors declared on `ty`, in declaration order.
    fn declared_behaviors(&self, ty: &TypeDescriptor) -> Vec<BehaviorDescriptor>;

    /// Whether a member with this accessibility is out of reach for
    /// generated code.
    fn is_non_public(&self, accessibility: &Accessibility) -> bool {
        accessibility.is_private()
    }
}

/// One type with everything it declares.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeDefinition {
    /// The type's identity.
    pub descriptor: TypeDescriptor,
    /// Name of the type this one extends, if the metadata source has such a
    /// notion. Its members are never folded into this definition.
    #[serde(default)]
    pub supertype: Option<String>,
    /// Declared fields, in declaration order.
    #[serde(default)]
    pub fields: Vec<FieldDescriptor>,
    /// Declared behaviors, in declaration order.
    #[serde(default)]
    pub behaviors: Vec<BehaviorDescriptor>,
}

impl TypeDefinition {
    /// Create a definition with no members.
    pub fn new(descriptor: TypeDescriptor) -> Self {
        Self {
            descriptor,
            supertype: None,
            fields: Vec::new(),
            behaviors: Vec::new(),
        }
    }

    /// Record the type this one extends.
    pub fn extends(mut self, supertype: impl Into<String>) -> Self {
        self.supertype = Some(supertype.into());
        self
    }

    /// Declare an instance field.
    pub fn field(
        self,
        name: impl Into<String>,
        value_type: impl Into<String>,
        accessibility: Accessibility,
    ) -> Self {
        self.push_field(name, value_type, accessibility, MemberScope::Instance)
    }

    /// Declare a static (type-level) field.
    pub fn static_field(
        self,
        name: impl Into<String>,
        value_type: impl Into<String>,
        accessibility: Accessibility,
    ) -> Self {
        self.push_field(name, value_type, accessibility, MemberScope::Static)
    }

    /// Declare a method taking `self`.
    pub fn method(
        self,
        name: impl Into<String>,
        parameters: &[&str],
        return_type: Option<&str>,
        accessibility: Accessibility,
    ) -> Self {
        self.push_behavior(name, parameters, return_type, accessibility, MemberScope::Instance)
    }

    /// Declare an associated function without `self`.
    pub fn associated_fn(
        self,
        name: impl Into<String>,
        parameters: &[&str],
        return_type: Option<&str>,
        accessibility: Accessibility,
    ) -> Self {
        self.push_behavior(name, parameters, return_type, accessibility, MemberScope::Static)
    }

    fn push_field(
        mut self,
        name: impl Into<String>,
        value_type: impl Into<String>,
        accessibility: Accessibility,
        scope: MemberScope,
    ) -> Self {
        let field = FieldDescriptor::new(self.descriptor.clone(), name, value_type)
            .with_accessibility(accessibility)
            .with_scope(scope);
        self.fields.push(field);
        self
    }

    fn push_behavior(
        mut self,
        name: impl Into<String>,
        parameters: &[&str],
        return_type: Option<&str>,
        accessibility: Accessibility,
        scope: MemberScope,
    ) -> Self {
        let mut behavior = BehaviorDescriptor::new(self.descriptor.clone(), name)
            .with_parameters(parameters.iter().copied())
            .with_accessibility(accessibility)
            .with_scope(scope);
        if let Some(ret) = return_type {
            behavior = behavior.with_return_type(ret);
        }
        self.behaviors.push(behavior);
        self
    }
}

/// An in-memory [`TypeIntrospection`] over a fixed list of definitions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeCatalog {
    types: Vec<TypeDefinition>,
}

impl TypeCatalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self { types: Vec::new() }
    }

    /// Add a definition, builder style.
    pub fn with_type(mut self, definition: TypeDefinition) -> Self {
        self.insert(definition);
        self
    }

    /// Add a definition. A later definition with the same descriptor
    /// replaces the earlier one in place.
    pub fn insert(&mut self, definition: TypeDefinition) {
        match self
            .types
            .iter_mut()
            .find(|t| t.descriptor == definition.descriptor)
        {
            Some(existing) => *existing = definition,
            None => self.types.push(definition),
        }
    }

    /// Add a definition only if its descriptor is not already present.
    ///
    /// Returns false and leaves the catalog unchanged on a duplicate.
    pub fn insert_new(&mut self, definition: TypeDefinition) -> bool {
        if self.definition(&definition.descriptor).is_some() {
            return false;
        }
        self.types.push(definition);
        true
    }

    /// Find the first definition whose descriptor matches `name`.
    pub fn get(&self, name: &str) -> Option<&TypeDefinition> {
        self.types.iter().find(|t| t.descriptor.matches(name))
    }

    /// Find the definition for an exact descriptor.
    pub fn definition(&self, ty: &TypeDescriptor) -> Option<&TypeDefinition> {
        self.types.iter().find(|t| &t.descriptor == ty)
    }

    /// Mutable access to the definition for an exact descriptor.
    pub fn definition_mut(&mut self, ty: &TypeDescriptor) -> Option<&mut TypeDefinition> {
        self.types.iter_mut().find(|t| &t.descriptor == ty)
    }

    /// All definitions, in insertion order.
    pub fn types(&self) -> &[TypeDefinition] {
        &self.types
    }

    /// Number of definitions.
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Returns true if the catalog holds no definitions.
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Load a catalog from its JSON form.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

impl TypeIntrospection for TypeCatalog {
    fn resolve(&self, name: &str) -> Option<TypeDescriptor> {
        self.get(name).map(|t| t.descriptor.clone())
    }

    fn declared_fields(&self, ty: &TypeDescriptor) -> Vec<FieldDescriptor> {
        self.definition(ty)
            .map(|t| t.fields.clone())
            .unwrap_or_default()
    }

    fn declared_behaviors(&self, ty: &TypeDescriptor) -> Vec<BehaviorDescriptor> {
        self.definition(ty)
            .map(|t| t.behaviors.clone())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> TypeCatalog {
        TypeCatalog::new()
            .with_type(
                TypeDefinition::new(TypeDescriptor::new("Base"))
                    .field("id", "u64", Accessibility::Private)
                    .method("touch", &[], None, Accessibility::Private),
            )
            .with_type(
                TypeDefinition::new(TypeDescriptor::new("Derived").in_module(["model"]))
                    .extends("Base")
                    .field("label", "String", Accessibility::Public)
                    .static_field("LIMIT", "usize", Accessibility::Private)
                    .associated_fn("build", &["&str"], Some("Self"), Accessibility::Crate),
            )
    }

    #[test]
    fn resolve_by_name_and_path() {
        let cat = catalog();
        assert_eq!(cat.resolve("Base"), Some(TypeDescriptor::new("Base")));
        let derived = cat.resolve("model::Derived").unwrap();
        assert_eq!(derived.module_path, vec!["model".to_string()]);
        assert_eq!(cat.resolve("Derived"), Some(derived));
        assert_eq!(cat.resolve("Missing"), None);
    }

    #[test]
    fn declared_members_exclude_supertype() {
        let cat = catalog();
        let derived = cat.resolve("Derived").unwrap();
        let fields = cat.declared_fields(&derived);
        assert_eq!(fields.len(), 2);
        assert!(fields.iter().all(|f| f.declaring_type == derived));
        assert!(fields.iter().all(|f| f.name != "id"));

        let behaviors = cat.declared_behaviors(&derived);
        assert_eq!(behaviors.len(), 1);
        assert_eq!(behaviors[0].scope, MemberScope::Static);
        assert_eq!(behaviors[0].signature(), "build(&str) -> Self");
    }

    #[test]
    fn unknown_descriptor_has_no_members() {
        let cat = catalog();
        let ghost = TypeDescriptor::new("Ghost");
        assert!(cat.declared_fields(&ghost).is_empty());
        assert!(cat.declared_behaviors(&ghost).is_empty());
    }

    #[test]
    fn insert_replaces_same_descriptor() {
        let mut cat = catalog();
        assert_eq!(cat.len(), 2);
        cat.insert(TypeDefinition::new(TypeDescriptor::new("Base")));
        assert_eq!(cat.len(), 2);
        assert!(cat.get("Base").unwrap().fields.is_empty());
        assert_eq!(cat.types()[0].descriptor.name, "Base");
    }

    #[test]
    fn insert_new_keeps_first_definition() {
        let mut cat = catalog();
        assert!(!cat.insert_new(TypeDefinition::new(TypeDescriptor::new("Base"))));
        assert_eq!(cat.len(), 2);
        assert_eq!(cat.get("Base").unwrap().fields.len(), 1);

        let fresh = TypeDescriptor::new("Base").in_module(["main"]);
        assert!(cat.insert_new(TypeDefinition::new(fresh)));
        assert_eq!(cat.len(), 3);
    }

    #[test]
    fn default_predicate_is_strictly_private() {
        let cat = TypeCatalog::new();
        assert!(cat.is_empty());
        assert!(cat.is_non_public(&Accessibility::Private));
        assert!(!cat.is_non_public(&Accessibility::Crate));
        assert!(!cat.is_non_public(&Accessibility::Restricted("super".into())));
        assert!(!cat.is_non_public(&Accessibility::Public));
    }

    #[test]
    fn catalog_from_json() {
        let json = r#"{
            "types": [
                {
                    "descriptor": { "name": "Counter" },
                    "fields": [
                        {
                            "declaring_type": { "name": "Counter" },
                            "name": "count",
                            "value_type": "u32"
                        }
                    ]
                }
            ]
        }"#;
        let cat = TypeCatalog::from_json(json).unwrap();
        let counter = cat.resolve("Counter").unwrap();
        let fields = cat.declared_fields(&counter);
        assert_eq!(fields.len(), 1);
        assert!(fields[0].accessibility.is_private());
        assert!(cat.declared_behaviors(&counter).is_empty());
    }
}
