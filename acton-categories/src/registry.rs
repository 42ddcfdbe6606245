//! Category type registry
//!
//! The registry is built once at startup and then shared read-only behind an
//! `Arc` through [`crate::state::CategoriesState`]. Registration is
//! idempotent, keeps the set ordered by singular label, and hands back the
//! exact descriptor it was given so calls can be chained.
//!
//! # Example
//!
//! ```rust,ignore
//! use acton_categories::registry::CategoryRegistry;
//!
//! let registry = CategoryRegistry::builder()
//!     .register::<Colour>()
//!     .register::<Region>()
//!     .build();
//!
//! for category_type in registry.list_registered_types() {
//!     println!("{}", registry.resolve_identifier(category_type));
//! }
//! ```

use std::any::TypeId;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};

use crate::error::{CategoryError, CategoryResult};
use crate::forms::ValidationErrors;
use crate::schema::{CategoryMeta, FieldDef, SchemaDescribable};
use crate::store::CategoryRecord;

/// Stable `(namespace, name)` pair addressing a category type over HTTP
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TypeIdentifier {
    /// Namespace (application label)
    pub namespace: String,
    /// Lowercase model name
    pub name: String,
}

impl TypeIdentifier {
    /// Create an identifier from its two parts
    #[must_use]
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for TypeIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.namespace, self.name)
    }
}

/// Resolved description of a registered category type
///
/// Built from a [`SchemaDescribable`] implementation by [`CategoryType::of`].
/// Two descriptors denote the same type iff they were built from the same
/// Rust type.
pub struct CategoryType {
    type_id: TypeId,
    rust_name: &'static str,
    namespace: &'static str,
    model_name: &'static str,
    meta: CategoryMeta,
    fields: Vec<FieldDef>,
    clean: fn(&CategoryRecord, &mut ValidationErrors),
}

impl CategoryType {
    /// Resolve the schema of `T`
    ///
    /// The base `category_name` field is placed first.
    #[must_use]
    pub fn of<T: SchemaDescribable>() -> Arc<Self> {
        let mut fields = vec![FieldDef::category_name()];
        fields.extend(T::fields());

        Arc::new(Self {
            type_id: TypeId::of::<T>(),
            rust_name: std::any::type_name::<T>(),
            namespace: T::namespace(),
            model_name: T::model_name(),
            meta: T::meta(),
            fields,
            clean: T::clean,
        })
    }

    /// Whether this descriptor was built from `T`
    #[must_use]
    pub fn is<T: SchemaDescribable>(&self) -> bool {
        self.type_id == TypeId::of::<T>()
    }

    /// Rust type identity of the described type
    #[must_use]
    pub const fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Namespace as declared by the type
    #[must_use]
    pub const fn namespace(&self) -> &'static str {
        self.namespace
    }

    /// Model name as declared by the type
    #[must_use]
    pub const fn model_name(&self) -> &'static str {
        self.model_name
    }

    /// Display metadata
    #[must_use]
    pub const fn meta(&self) -> &CategoryMeta {
        &self.meta
    }

    /// All fields, `category_name` first
    #[must_use]
    pub fn fields(&self) -> &[FieldDef] {
        &self.fields
    }

    /// Singular label with its first letter capitalised
    #[must_use]
    pub fn verbose_name_capitalized(&self) -> String {
        capfirst(&self.meta.verbose_name)
    }

    /// Run the type's whole-record validation
    pub fn clean(&self, record: &CategoryRecord, errors: &mut ValidationErrors) {
        (self.clean)(record, errors);
    }

    fn compute_identifier(&self) -> TypeIdentifier {
        TypeIdentifier::new(self.namespace, self.model_name.to_lowercase())
    }
}

impl fmt::Debug for CategoryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CategoryType")
            .field("type", &self.rust_name)
            .field("verbose_name", &self.meta.verbose_name)
            .field("fields", &self.fields.len())
            .finish_non_exhaustive()
    }
}

/// Whether `segment` is a word (`[A-Za-z0-9_]+`)
pub(crate) fn is_word(segment: &str) -> bool {
    !segment.is_empty()
        && segment
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Upper-case the first character, leaving the rest untouched
#[must_use]
pub fn capfirst(value: &str) -> String {
    let mut chars = value.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

#[derive(Debug, Default)]
struct IdentifierIndex {
    by_type: HashMap<TypeId, TypeIdentifier>,
    by_identifier: HashMap<TypeIdentifier, usize>,
}

/// Ordered set of registered category types
#[derive(Debug, Default)]
pub struct CategoryRegistry {
    types: Vec<Arc<CategoryType>>,
    identifiers: OnceCell<IdentifierIndex>,
}

impl CategoryRegistry {
    /// Create an empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start composing a registry
    #[must_use]
    pub fn builder() -> CategoryRegistryBuilder {
        CategoryRegistryBuilder::default()
    }

    /// Register the type `T`, returning its descriptor
    ///
    /// Registering a type twice is a no-op; the descriptor already held by
    /// the registry is returned.
    ///
    /// # Panics
    ///
    /// Panics if `T` cannot be registered; see [`Self::try_register_type`].
    pub fn register<T: SchemaDescribable>(&mut self) -> Arc<CategoryType> {
        if let Some(existing) = self.types.iter().find(|t| t.is::<T>()) {
            return Arc::clone(existing);
        }
        self.register_type(CategoryType::of::<T>())
    }

    /// Register a resolved descriptor and hand the same `Arc` back
    ///
    /// # Panics
    ///
    /// Panics if the descriptor cannot be registered; see
    /// [`Self::try_register_type`].
    pub fn register_type(&mut self, category_type: Arc<CategoryType>) -> Arc<CategoryType> {
        match self.try_register_type(category_type) {
            Ok(registered) => registered,
            Err(e) => panic!("{e}"),
        }
    }

    /// Register a resolved descriptor, rejecting one that cannot be routed
    ///
    /// # Errors
    ///
    /// Returns [`CategoryError::Config`] if the namespace or model name is
    /// not a word, or if a different type already holds the same
    /// identifier.
    pub fn try_register_type(
        &mut self,
        category_type: Arc<CategoryType>,
    ) -> CategoryResult<Arc<CategoryType>> {
        if self.contains(&category_type) {
            return Ok(category_type);
        }

        let identifier = category_type.compute_identifier();
        if !is_word(&identifier.namespace) || !is_word(&identifier.name) {
            return Err(CategoryError::Config(format!(
                "category type {} has identifier {identifier}; namespace and model name must match [A-Za-z0-9_]+",
                category_type.rust_name
            )));
        }
        if let Some(holder) = self
            .types
            .iter()
            .find(|t| t.compute_identifier() == identifier)
        {
            return Err(CategoryError::Config(format!(
                "category types {} and {} share identifier {identifier}",
                holder.rust_name, category_type.rust_name
            )));
        }

        tracing::debug!(
            namespace = category_type.namespace(),
            model = category_type.model_name(),
            "Registering category type"
        );

        self.types.push(Arc::clone(&category_type));
        self.types
            .sort_by(|a, b| a.meta.verbose_name.cmp(&b.meta.verbose_name));
        // Index positions moved; rebuild lazily on next lookup.
        self.identifiers.take();

        Ok(category_type)
    }

    /// Whether a descriptor for the same Rust type is registered
    #[must_use]
    pub fn contains(&self, category_type: &CategoryType) -> bool {
        self.types
            .iter()
            .any(|t| t.type_id == category_type.type_id)
    }

    /// Registered types, ordered by singular label
    #[must_use]
    pub fn list_registered_types(&self) -> &[Arc<CategoryType>] {
        &self.types
    }

    /// Number of registered types
    #[must_use]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Whether nothing is registered
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Stable identifier for a category type
    ///
    /// The first call resolves every registered type at once and caches the
    /// result until [`Self::clear_identifier_cache`]. Types that were never
    /// registered are resolved directly and not cached.
    #[must_use]
    pub fn resolve_identifier(&self, category_type: &CategoryType) -> TypeIdentifier {
        self.index()
            .by_type
            .get(&category_type.type_id)
            .cloned()
            .unwrap_or_else(|| category_type.compute_identifier())
    }

    /// Identifiers of every registered type, in registry order
    #[must_use]
    pub fn category_identifiers(&self) -> Vec<TypeIdentifier> {
        let index = self.index();
        self.types
            .iter()
            .filter_map(|t| index.by_type.get(&t.type_id).cloned())
            .collect()
    }

    /// Find the registered type addressed by `(namespace, name)`
    #[must_use]
    pub fn lookup(&self, namespace: &str, name: &str) -> Option<Arc<CategoryType>> {
        let key = TypeIdentifier::new(namespace, name);
        self.index()
            .by_identifier
            .get(&key)
            .and_then(|&position| self.types.get(position))
            .cloned()
    }

    /// Drop the cached identifiers
    pub fn clear_identifier_cache(&mut self) {
        self.identifiers.take();
    }

    fn index(&self) -> &IdentifierIndex {
        self.identifiers.get_or_init(|| {
            let mut index = IdentifierIndex::default();
            for (position, category_type) in self.types.iter().enumerate() {
                let identifier = category_type.compute_identifier();
                index.by_identifier.insert(identifier.clone(), position);
                index.by_type.insert(category_type.type_id, identifier);
            }
            index
        })
    }
}

/// Startup-time builder for [`CategoryRegistry`]
#[derive(Debug, Default)]
pub struct CategoryRegistryBuilder {
    registry: CategoryRegistry,
}

impl CategoryRegistryBuilder {
    /// Register `T`
    ///
    /// # Panics
    ///
    /// Panics if `T` cannot be registered; see
    /// [`CategoryRegistry::try_register_type`].
    #[must_use]
    pub fn register<T: SchemaDescribable>(mut self) -> Self {
        self.registry.register::<T>();
        self
    }

    /// Register a resolved descriptor
    ///
    /// # Panics
    ///
    /// Panics if the descriptor cannot be registered; see
    /// [`CategoryRegistry::try_register_type`].
    #[must_use]
    pub fn register_type(mut self, category_type: Arc<CategoryType>) -> Self {
        self.registry.register_type(category_type);
        self
    }

    /// Finish composition
    #[must_use]
    pub fn build(self) -> CategoryRegistry {
        self.registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{CategoryMeta, FieldDef};
    use crate::testing::{Fixture, TestCategory};
    use proptest::prelude::*;

    struct Tag;
    struct ShoutedTag;
    struct Dashed;

    impl SchemaDescribable for Tag {
        fn namespace() -> &'static str {
            "blog"
        }
        fn model_name() -> &'static str {
            "Tag"
        }
        fn meta() -> CategoryMeta {
            CategoryMeta::new("tag", "tags")
        }
        fn fields() -> Vec<FieldDef> {
            Vec::new()
        }
    }

    impl SchemaDescribable for ShoutedTag {
        fn namespace() -> &'static str {
            "blog"
        }
        fn model_name() -> &'static str {
            "TAG"
        }
        fn meta() -> CategoryMeta {
            CategoryMeta::new("shouted tag", "shouted tags")
        }
        fn fields() -> Vec<FieldDef> {
            Vec::new()
        }
    }

    impl SchemaDescribable for Dashed {
        fn namespace() -> &'static str {
            "my-app"
        }
        fn model_name() -> &'static str {
            "Thing"
        }
        fn meta() -> CategoryMeta {
            CategoryMeta::new("thing", "things")
        }
        fn fields() -> Vec<FieldDef> {
            Vec::new()
        }
    }

    #[test]
    fn test_register_function() {
        let mut registry = CategoryRegistry::new();
        registry.register::<TestCategory>();

        assert_eq!(registry.len(), 1);
        assert!(registry.list_registered_types()[0].is::<TestCategory>());
    }

    #[test]
    fn test_register_returns_same_descriptor() {
        let mut registry = CategoryRegistry::new();
        let descriptor = CategoryType::of::<TestCategory>();

        let returned = registry.register_type(Arc::clone(&descriptor));
        assert!(Arc::ptr_eq(&descriptor, &returned));

        // Second registration of an equal type is a no-op and still chains
        let again = registry.register_type(Arc::clone(&descriptor));
        assert!(Arc::ptr_eq(&descriptor, &again));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_register_twice_keeps_one_entry() {
        let mut registry = CategoryRegistry::new();
        let first = registry.register::<TestCategory>();
        let second = registry.register::<TestCategory>();

        assert_eq!(registry.len(), 1);
        assert!(Arc::ptr_eq(&first, &second));

        // A fresh descriptor of the same type is also rejected
        registry.register_type(CategoryType::of::<TestCategory>());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_empty_registry() {
        let registry = CategoryRegistry::new();
        assert!(registry.is_empty());
        assert!(registry.list_registered_types().is_empty());
        assert!(registry.category_identifiers().is_empty());
        assert!(registry.lookup("taxonomy", "testcategory").is_none());
    }

    #[test]
    fn test_sorted_by_verbose_name() {
        let registry = CategoryRegistry::builder()
            .register::<Fixture<0>>()
            .register::<Fixture<1>>()
            .register::<Fixture<2>>()
            .build();

        let labels: Vec<_> = registry
            .list_registered_types()
            .iter()
            .map(|t| t.meta().verbose_name.clone())
            .collect();
        let mut sorted = labels.clone();
        sorted.sort();
        assert_eq!(labels, sorted);
    }

    #[test]
    fn test_resolve_identifier() {
        let registry = CategoryRegistry::builder().register::<TestCategory>().build();
        let category_type = &registry.list_registered_types()[0];

        let identifier = registry.resolve_identifier(category_type);
        assert_eq!(identifier, TypeIdentifier::new("taxonomy", "testcategory"));
        assert_eq!(identifier.to_string(), "taxonomy.testcategory");
    }

    #[test]
    fn test_resolve_unregistered_identifier() {
        let registry = CategoryRegistry::new();
        let descriptor = CategoryType::of::<TestCategory>();
        assert_eq!(
            registry.resolve_identifier(&descriptor),
            TypeIdentifier::new("taxonomy", "testcategory")
        );
    }

    #[test]
    fn test_lookup() {
        let registry = CategoryRegistry::builder()
            .register::<TestCategory>()
            .register::<Fixture<3>>()
            .build();

        let found = registry.lookup("taxonomy", "testcategory").unwrap();
        assert!(found.is::<TestCategory>());
        assert!(registry.lookup("taxonomy", "foo").is_none());
        assert!(registry.lookup("other", "testcategory").is_none());
        // Identifiers are matched exactly
        assert!(registry.lookup("taxonomy", "TestCategory").is_none());
    }

    #[test]
    fn test_lookup_after_late_registration() {
        let mut registry = CategoryRegistry::new();
        registry.register::<Fixture<1>>();
        assert!(registry.lookup("taxonomy", "testcategory").is_none());

        registry.register::<TestCategory>();
        assert!(registry.lookup("taxonomy", "testcategory").is_some());
        assert!(registry.lookup("fixtures", "fixture1").is_some());
    }

    #[test]
    fn test_clear_identifier_cache() {
        let mut registry = CategoryRegistry::builder().register::<TestCategory>().build();
        let before = registry.category_identifiers();
        registry.clear_identifier_cache();
        assert_eq!(before, registry.category_identifiers());
    }

    #[test]
    fn test_is_word() {
        assert!(is_word("test_category1"));
        assert!(!is_word(""));
        assert!(!is_word("test-category"));
        assert!(!is_word("a.b"));
    }

    #[test]
    fn test_try_register_rejects_shared_identifier() {
        let mut registry = CategoryRegistry::new();
        registry.register::<Tag>();

        let err = registry
            .try_register_type(CategoryType::of::<ShoutedTag>())
            .unwrap_err();
        assert!(matches!(err, CategoryError::Config(_)));
        assert!(err.to_string().contains("blog.tag"));

        assert_eq!(registry.len(), 1);
        assert!(registry.lookup("blog", "tag").unwrap().is::<Tag>());
    }

    #[test]
    fn test_try_register_rejects_non_word_namespace() {
        let mut registry = CategoryRegistry::new();

        let err = registry
            .try_register_type(CategoryType::of::<Dashed>())
            .unwrap_err();
        assert!(matches!(err, CategoryError::Config(_)));
        assert!(err.to_string().contains("my-app.thing"));
        assert!(registry.is_empty());
    }

    #[test]
    #[should_panic(expected = "share identifier blog.tag")]
    fn test_builder_panics_on_shared_identifier() {
        let _ = CategoryRegistry::builder()
            .register::<Tag>()
            .register::<ShoutedTag>()
            .build();
    }

    #[test]
    #[should_panic(expected = "must match [A-Za-z0-9_]+")]
    fn test_builder_panics_on_non_word_namespace() {
        let _ = CategoryRegistry::builder().register::<Dashed>().build();
    }

    #[test]
    fn test_capfirst() {
        assert_eq!(capfirst("test category"), "Test category");
        assert_eq!(capfirst("Already"), "Already");
        assert_eq!(capfirst(""), "");
        assert_eq!(capfirst("éclair"), "Éclair");
    }

    fn register_index(registry: &mut CategoryRegistry, index: usize) {
        match index {
            0 => registry.register::<Fixture<0>>(),
            1 => registry.register::<Fixture<1>>(),
            2 => registry.register::<Fixture<2>>(),
            3 => registry.register::<Fixture<3>>(),
            _ => registry.register::<Fixture<4>>(),
        };
    }

    proptest! {
        #[test]
        fn prop_registration_is_idempotent_and_sorted(order in proptest::collection::vec(0usize..5, 0..20)) {
            let mut registry = CategoryRegistry::new();
            for &index in &order {
                register_index(&mut registry, index);
            }

            let mut distinct = order.clone();
            distinct.sort_unstable();
            distinct.dedup();
            prop_assert_eq!(registry.len(), distinct.len());

            let labels: Vec<_> = registry
                .list_registered_types()
                .iter()
                .map(|t| t.meta().verbose_name.clone())
                .collect();
            let mut sorted = labels.clone();
            sorted.sort();
            prop_assert_eq!(labels, sorted);
        }
    }
}
