//! Constructor selection strategies.
//!
//! Which constructor the builder invokes for a class is a pluggable policy behind
//! the [`ConstructorStrategy`] trait. The engine ships exactly one implementation,
//! [`MaxParamsPublicPreferred`], which matches the default policy of the fixture
//! engine: prefer public constructors, then take the one with the most parameters.

use crate::{
    model::descriptor::{ConstructorDesc, TypeDescriptor},
    Error::NoUsableConstructor,
    Result,
};

/// Pluggable policy deciding which declared constructor to invoke.
pub trait ConstructorStrategy: Send + Sync {
    /// Pick one constructor of a class descriptor.
    ///
    /// # Errors
    /// Returns [`NoUsableConstructor`] when the descriptor declares no
    /// constructor at all.
    fn select<'a>(&self, descriptor: &'a TypeDescriptor) -> Result<&'a ConstructorDesc>;
}

/// The default policy: "max parameters, public preferred".
///
/// If at least one publicly visible constructor exists, the candidate pool is
/// all public constructors; otherwise the pool is all declared constructors
/// regardless of visibility. Within the pool the constructor with the greatest
/// parameter count wins; ties break to the first declared.
pub struct MaxParamsPublicPreferred;

impl ConstructorStrategy for MaxParamsPublicPreferred {
    fn select<'a>(&self, descriptor: &'a TypeDescriptor) -> Result<&'a ConstructorDesc> {
        let any_public = descriptor.constructors.iter().any(ConstructorDesc::is_public);
        let pool = descriptor
            .constructors
            .iter()
            .filter(|c| !any_public || c.is_public());

        // Strictly-greater comparison keeps the first declared on ties
        let mut selected: Option<&ConstructorDesc> = None;
        for candidate in pool {
            match selected {
                Some(best) if candidate.params.len() <= best.params.len() => {}
                _ => selected = Some(candidate),
            }
        }

        selected.ok_or_else(|| NoUsableConstructor(descriptor.name.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{
        builder::DescriptorBuilder,
        kind::PrimitiveKind,
        registry::TypeRegistry,
    };

    #[test]
    fn test_max_params_wins() {
        let registry = TypeRegistry::new();
        let i4 = registry.primitive(PrimitiveKind::I4);
        let string = registry.primitive(PrimitiveKind::String);

        let token = DescriptorBuilder::class(&registry, "Widget")
            .ctor(&[("id", i4)])
            .ctor(&[("id", i4), ("name", string)])
            .finish()
            .unwrap();
        let descriptor = registry.get(&token).unwrap();

        let selected = MaxParamsPublicPreferred.select(&descriptor).unwrap();
        assert_eq!(selected.params.len(), 2);
    }

    #[test]
    fn test_public_pool_preferred() {
        let registry = TypeRegistry::new();
        let i4 = registry.primitive(PrimitiveKind::I4);
        let string = registry.primitive(PrimitiveKind::String);

        // The private constructor has more parameters, but a public one exists
        let token = DescriptorBuilder::class(&registry, "Widget")
            .private_ctor(&[("id", i4), ("name", string), ("extra", i4)])
            .ctor(&[("id", i4)])
            .finish()
            .unwrap();
        let descriptor = registry.get(&token).unwrap();

        let selected = MaxParamsPublicPreferred.select(&descriptor).unwrap();
        assert!(selected.is_public());
        assert_eq!(selected.params.len(), 1);
    }

    #[test]
    fn test_private_pool_when_no_public() {
        let registry = TypeRegistry::new();
        let i4 = registry.primitive(PrimitiveKind::I4);

        let token = DescriptorBuilder::class(&registry, "Widget")
            .private_ctor(&[("id", i4)])
            .finish()
            .unwrap();
        let descriptor = registry.get(&token).unwrap();

        let selected = MaxParamsPublicPreferred.select(&descriptor).unwrap();
        assert!(!selected.is_public());
    }

    #[test]
    fn test_tie_breaks_to_first_declared() {
        let registry = TypeRegistry::new();
        let i4 = registry.primitive(PrimitiveKind::I4);
        let string = registry.primitive(PrimitiveKind::String);

        let token = DescriptorBuilder::class(&registry, "Widget")
            .ctor(&[("first", i4)])
            .ctor(&[("second", string)])
            .finish()
            .unwrap();
        let descriptor = registry.get(&token).unwrap();

        let selected = MaxParamsPublicPreferred.select(&descriptor).unwrap();
        assert_eq!(selected.params[0].name, "first");
    }

    #[test]
    fn test_no_constructor_fails() {
        let registry = TypeRegistry::new();
        let token = DescriptorBuilder::class(&registry, "Bare").finish().unwrap();
        let descriptor = registry.get(&token).unwrap();

        assert!(matches!(
            MaxParamsPublicPreferred.select(&descriptor),
            Err(NoUsableConstructor(name)) if name == "Bare"
        ));
    }
}
