use std::fmt;

use serde::{Deserialize, Serialize};

/// Identity of an inspected type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypeDescriptor {
    /// The type's own name, e.g. `Counter`.
    pub name: String,
    /// Module path leading to the type, outermost segment first.
    #[serde(default)]
    pub module_path: Vec<String>,
}

impl TypeDescriptor {
    /// Create a descriptor for a type at the crate root.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            module_path: Vec::new(),
        }
    }

    /// Place the type inside the given module path.
    pub fn in_module<S: Into<String>>(mut self, path: impl IntoIterator<Item = S>) -> Self {
        self.module_path = path.into_iter().map(Into::into).collect();
        self
    }

    /// The `::`-joined path of the type, e.g. `shapes::Circle`.
    pub fn qualified_name(&self) -> String {
        if self.module_path.is_empty() {
            return self.name.clone();
        }
        format!("{}::{}", self.module_path.join("::"), self.name)
    }

    /// Whether `path` names this type.
    ///
    /// Accepts the bare name, the fully qualified path, or any trailing part
    /// of it. A leading `crate::` is ignored.
    pub fn matches(&self, path: &str) -> bool {
        let path = path.trim();
        let path = path.strip_prefix("crate::").unwrap_or(path);
        if path.is_empty() {
            return false;
        }
        let wanted: Vec<&str> = path.split("::").map(str::trim).collect();
        let own: Vec<&str> = self
            .module_path
            .iter()
            .map(String::as_str)
            .chain(std::iter::once(self.name.as_str()))
            .collect();
        own.ends_with(&wanted)
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.qualified_name())
    }
}

/// Declared accessibility of a member.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Accessibility {
    /// Visible everywhere (`pub`).
    Public,
    /// Visible within the declaring crate (`pub(crate)`).
    Crate,
    /// Visible within a named ancestor module (`pub(super)`, `pub(in path)`).
    Restricted(String),
    /// Visible only inside the declaring module.
    #[default]
    Private,
}

impl Accessibility {
    /// True only for strictly private members.
    ///
    /// Crate-wide and module-restricted visibility do not count: code in the
    /// same crate can already reach those members directly.
    pub fn is_private(&self) -> bool {
        matches!(self, Self::Private)
    }
}

impl fmt::Display for Accessibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Public => write!(f, "pub"),
            Self::Crate => write!(f, "pub(crate)"),
            Self::Restricted(path) => write!(f, "pub({path})"),
            Self::Private => write!(f, "private"),
        }
    }
}

/// Whether a member belongs to values of the type or to the type itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemberScope {
    /// A struct field, or a method taking `self`.
    #[default]
    Instance,
    /// An associated constant, or an associated function without `self`.
    Static,
}

impl fmt::Display for MemberScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Instance => write!(f, "instance"),
            Self::Static => write!(f, "static"),
        }
    }
}

/// A field declared directly on a type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FieldDescriptor {
    /// The type that declares the field.
    pub declaring_type: TypeDescriptor,
    /// Field name. Positional fields use their index (`0`, `1`, ...).
    pub name: String,
    /// The declared value type, as written in source.
    pub value_type: String,
    /// Declared accessibility.
    #[serde(default)]
    pub accessibility: Accessibility,
    /// Instance field or static (type-level) field.
    #[serde(default)]
    pub scope: MemberScope,
}

impl FieldDescriptor {
    /// Create a private instance field.
    pub fn new(
        declaring_type: TypeDescriptor,
        name: impl Into<String>,
        value_type: impl Into<String>,
    ) -> Self {
        Self {
            declaring_type,
            name: name.into(),
            value_type: value_type.into(),
            accessibility: Accessibility::Private,
            scope: MemberScope::Instance,
        }
    }

    /// Set the declared accessibility.
    pub fn with_accessibility(mut self, accessibility: Accessibility) -> Self {
        self.accessibility = accessibility;
        self
    }

    /// Set the member scope.
    pub fn with_scope(mut self, scope: MemberScope) -> Self {
        self.scope = scope;
        self
    }
}

impl fmt::Display for FieldDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}: {}", self.declaring_type, self.name, self.value_type)
    }
}

/// A behavior (method or associated function) declared directly on a type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BehaviorDescriptor {
    /// The type that declares the behavior.
    pub declaring_type: TypeDescriptor,
    /// Behavior name.
    pub name: String,
    /// Parameter types in declaration order, excluding the receiver.
    #[serde(default)]
    pub parameters: Vec<String>,
    /// Declared return type, `None` for `()`.
    #[serde(default)]
    pub return_type: Option<String>,
    /// Declared accessibility.
    #[serde(default)]
    pub accessibility: Accessibility,
    /// Method with a receiver, or associated function without one.
    #[serde(default)]
    pub scope: MemberScope,
}

impl BehaviorDescriptor {
    /// Create a private instance method with no parameters and no return value.
    pub fn new(declaring_type: TypeDescriptor, name: impl Into<String>) -> Self {
        Self {
            declaring_type,
            name: name.into(),
            parameters: Vec::new(),
            return_type: None,
            accessibility: Accessibility::Private,
            scope: MemberScope::Instance,
        }
    }

    /// Set the parameter types.
    pub fn with_parameters<S: Into<String>>(mut self, parameters: impl IntoIterator<Item = S>) -> Self {
        self.parameters = parameters.into_iter().map(Into::into).collect();
        self
    }

    /// Set the return type.
    pub fn with_return_type(mut self, return_type: impl Into<String>) -> Self {
        self.return_type = Some(return_type.into());
        self
    }

    /// Set the declared accessibility.
    pub fn with_accessibility(mut self, accessibility: Accessibility) -> Self {
        self.accessibility = accessibility;
        self
    }

    /// Set the member scope.
    pub fn with_scope(mut self, scope: MemberScope) -> Self {
        self.scope = scope;
        self
    }

    /// Name plus parameter and return types, e.g. `scale(f64) -> Circle`.
    pub fn signature(&self) -> String {
        let params = self.parameters.join(", ");
        match &self.return_type {
            Some(ret) => format!("{}({params}) -> {ret}", self.name),
            None => format!("{}({params})", self.name),
        }
    }
}

impl fmt::Display for BehaviorDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.declaring_type, self.signature())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn circle() -> TypeDescriptor {
        TypeDescriptor::new("Circle").in_module(["geometry", "shapes"])
    }

    #[test]
    fn qualified_name() {
        assert_eq!(TypeDescriptor::new("Counter").qualified_name(), "Counter");
        assert_eq!(circle().qualified_name(), "geometry::shapes::Circle");
        assert_eq!(circle().to_string(), "geometry::shapes::Circle");
    }

    #[test]
    fn matches_bare_and_qualified_paths() {
        let ty = circle();
        assert!(ty.matches("Circle"));
        assert!(ty.matches("shapes::Circle"));
        assert!(ty.matches("geometry::shapes::Circle"));
        assert!(ty.matches("crate::geometry::shapes::Circle"));
        assert!(ty.matches(" Circle "));
        assert!(!ty.matches("Square"));
        assert!(!ty.matches("other::Circle"));
        assert!(!ty.matches("Circ"));
        assert!(!ty.matches(""));
    }

    #[test]
    fn only_private_is_private() {
        assert!(Accessibility::Private.is_private());
        assert!(!Accessibility::Public.is_private());
        assert!(!Accessibility::Crate.is_private());
        assert!(!Accessibility::Restricted("super".into()).is_private());
    }

    #[test]
    fn accessibility_display() {
        assert_eq!(Accessibility::Public.to_string(), "pub");
        assert_eq!(Accessibility::Crate.to_string(), "pub(crate)");
        assert_eq!(Accessibility::Restricted("super".into()).to_string(), "pub(super)");
        assert_eq!(Accessibility::Private.to_string(), "private");
    }

    #[test]
    fn field_defaults_to_private_instance() {
        let field = FieldDescriptor::new(circle(), "radius", "f64");
        assert_eq!(field.accessibility, Accessibility::Private);
        assert_eq!(field.scope, MemberScope::Instance);
        assert_eq!(field.to_string(), "geometry::shapes::Circle::radius: f64");
    }

    #[test]
    fn behavior_signature() {
        let scale = BehaviorDescriptor::new(circle(), "scale")
            .with_parameters(["f64"])
            .with_return_type("Circle");
        assert_eq!(scale.signature(), "scale(f64) -> Circle");

        let reset = BehaviorDescriptor::new(TypeDescriptor::new("Counter"), "reset");
        assert_eq!(reset.signature(), "reset()");
        insta::assert_snapshot!(scale.to_string(), @"geometry::shapes::Circle::scale(f64) -> Circle");
    }

    #[test]
    fn field_json_shape() {
        let field = FieldDescriptor::new(TypeDescriptor::new("Counter"), "count", "u32")
            .with_scope(MemberScope::Static);
        let json = serde_json::to_value(&field).unwrap();
        assert_eq!(json["declaring_type"]["name"], "Counter");
        assert_eq!(json["accessibility"], "private");
        assert_eq!(json["scope"], "static");

        let back: FieldDescriptor = serde_json::from_value(json).unwrap();
        assert_eq!(back, field);
    }

    #[test]
    fn behavior_json_defaults() {
        let behavior: BehaviorDescriptor = serde_json::from_str(
            r#"{ "declaring_type": { "name": "Counter" }, "name": "tick" }"#,
        )
        .unwrap();
        assert!(behavior.parameters.is_empty());
        assert_eq!(behavior.return_type, None);
        assert_eq!(behavior.accessibility, Accessibility::Private);
        assert_eq!(behavior.scope, MemberScope::Instance);
    }
}
