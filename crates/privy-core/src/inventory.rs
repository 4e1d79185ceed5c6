//! Private member inventory for a single target type.
//!
//! The inventory is computed once at construction and never changes. All
//! selection goes through a caller-supplied [`Randomness`] source, so the
//! same inventory can be queried from several threads at once.

use std::fmt;

use serde::Serialize;
use tracing::{debug, trace};

use crate::error::{InventoryError, InventoryResult};
use crate::introspect::TypeIntrospection;
use crate::model::{Accessibility, BehaviorDescriptor, FieldDescriptor, TypeDescriptor};
use crate::random::Randomness;

/// A selected private member.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Member<'a> {
    /// A private field.
    Field(&'a FieldDescriptor),
    /// A private behavior.
    Behavior(&'a BehaviorDescriptor),
}

impl Member<'_> {
    /// The member's name.
    pub fn name(&self) -> &str {
        match self {
            Self::Field(f) => &f.name,
            Self::Behavior(b) => &b.name,
        }
    }

    /// Returns true for fields.
    pub fn is_field(&self) -> bool {
        matches!(self, Self::Field(_))
    }
}

impl fmt::Display for Member<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Field(field) => write!(f, "field {field}"),
            Self::Behavior(behavior) => write!(f, "behavior {behavior}"),
        }
    }
}

/// The private fields and private behaviors declared by one type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MemberInventory {
    target: TypeDescriptor,
    fields: Vec<FieldDescriptor>,
    behaviors: Vec<BehaviorDescriptor>,
}

impl MemberInventory {
    /// Inspect `target` through `introspection`.
    ///
    /// Fails with [`InventoryError::InvalidArgument`] when `target` is `None`.
    pub fn create<I>(introspection: &I, target: Option<&TypeDescriptor>) -> InventoryResult<Self>
    where
        I: TypeIntrospection + ?Sized,
    {
        let target = target.ok_or_else(|| {
            InventoryError::InvalidArgument("target type cannot be absent".into())
        })?;
        Ok(Self::build(
            target.clone(),
            introspection.declared_fields(target),
            introspection.declared_behaviors(target),
            |access| introspection.is_non_public(access),
        ))
    }

    /// Resolve `name` through `introspection`, then inspect it.
    ///
    /// A blank name or one the introspection cannot resolve counts as an
    /// absent target.
    pub fn create_by_name<I>(introspection: &I, name: &str) -> InventoryResult<Self>
    where
        I: TypeIntrospection + ?Sized,
    {
        if name.trim().is_empty() {
            return Err(InventoryError::InvalidArgument(
                "target type cannot be absent".into(),
            ));
        }
        let target = introspection.resolve(name).ok_or_else(|| {
            InventoryError::InvalidArgument(format!("unknown target type: \"{name}\""))
        })?;
        Self::create(introspection, Some(&target))
    }

    /// Build from descriptors collected elsewhere.
    ///
    /// Applies the same filter as [`create`](Self::create): only strictly
    /// private members declared on `target` itself are kept.
    pub fn from_members(
        target: TypeDescriptor,
        fields: impl IntoIterator<Item = FieldDescriptor>,
        behaviors: impl IntoIterator<Item = BehaviorDescriptor>,
    ) -> Self {
        Self::build(target, fields, behaviors, Accessibility::is_private)
    }

    fn build(
        target: TypeDescriptor,
        fields: impl IntoIterator<Item = FieldDescriptor>,
        behaviors: impl IntoIterator<Item = BehaviorDescriptor>,
        is_non_public: impl Fn(&Accessibility) -> bool,
    ) -> Self {
        let fields: Vec<_> = fields
            .into_iter()
            .filter(|f| f.declaring_type == target && is_non_public(&f.accessibility))
            .collect();
        let behaviors: Vec<_> = behaviors
            .into_iter()
            .filter(|b| b.declaring_type == target && is_non_public(&b.accessibility))
            .collect();

        debug!(
            ty = %target,
            fields = fields.len(),
            behaviors = behaviors.len(),
            "built private member inventory"
        );

        Self {
            target,
            fields,
            behaviors,
        }
    }

    /// The inspected type.
    pub fn described_type(&self) -> &TypeDescriptor {
        &self.target
    }

    /// Private fields, in declaration order.
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    /// Private behaviors, in declaration order.
    pub fn behaviors(&self) -> &[BehaviorDescriptor] {
        &self.behaviors
    }

    /// Returns true if at least one private field or behavior was found.
    pub fn has_private_members(&self) -> bool {
        !self.fields.is_empty() || !self.behaviors.is_empty()
    }

    /// Share of fields among all private members, `None` if there are none.
    pub fn field_ratio(&self) -> Option<f64> {
        let total = self.fields.len() + self.behaviors.len();
        if total == 0 {
            return None;
        }
        Some(self.fields.len() as f64 / total as f64)
    }

    /// Decide whether the next selection should take a field.
    ///
    /// With both collections non-empty, returns true with probability
    /// `fields / (fields + behaviors)`. If only one side has members the
    /// answer is fixed. Calling this on an inventory with no private members
    /// fails with [`InventoryError::InvalidState`].
    pub fn prefer_field<R: Randomness>(&self, rng: &mut R) -> InventoryResult<bool> {
        match (self.fields.is_empty(), self.behaviors.is_empty()) {
            (true, true) => Err(InventoryError::InvalidState(format!(
                "{} has no private fields or behaviors",
                self.target
            ))),
            (true, false) => Ok(false),
            (false, true) => Ok(true),
            (false, false) => {
                let total = self.fields.len() + self.behaviors.len();
                let ratio = self.fields.len() as f64 / total as f64;
                let draw = rng.next_unit();
                trace!(ty = %self.target, draw, ratio, "field preference draw");
                Ok(draw <= ratio)
            }
        }
    }

    /// Pick one private field uniformly.
    pub fn choose_field<R: Randomness>(&self, rng: &mut R) -> InventoryResult<&FieldDescriptor> {
        rng.choose(&self.fields).ok_or_else(|| {
            InventoryError::InvalidState(format!("no private field on {}", self.target))
        })
    }

    /// Pick one private behavior uniformly.
    pub fn choose_behavior<R: Randomness>(
        &self,
        rng: &mut R,
    ) -> InventoryResult<&BehaviorDescriptor> {
        rng.choose(&self.behaviors).ok_or_else(|| {
            InventoryError::InvalidState(format!("no private behavior on {}", self.target))
        })
    }

    /// Decide between fields and behaviors, then pick within the winner.
    pub fn choose_member<R: Randomness>(&self, rng: &mut R) -> InventoryResult<Member<'_>> {
        if self.prefer_field(rng)? {
            self.choose_field(rng).map(Member::Field)
        } else {
            self.choose_behavior(rng).map(Member::Behavior)
        }
    }
}
