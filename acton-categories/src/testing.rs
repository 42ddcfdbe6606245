//! Category types shared by unit tests

use crate::schema::{CategoryMeta, FieldDef, SchemaDescribable};

/// A category with one required type-specific field
pub struct TestCategory;

impl SchemaDescribable for TestCategory {
    fn namespace() -> &'static str {
        "taxonomy"
    }

    fn model_name() -> &'static str {
        "TestCategory"
    }

    fn meta() -> CategoryMeta {
        CategoryMeta::new("Test Category", "Test Categories")
    }

    fn fields() -> Vec<FieldDef> {
        vec![FieldDef::char("some_field", "Some field", 100).required()]
    }
}

/// Distinct category types for ordering tests
///
/// Labels are deliberately out of step with `N`.
pub struct Fixture<const N: usize>;

impl<const N: usize> SchemaDescribable for Fixture<N> {
    fn namespace() -> &'static str {
        "fixtures"
    }

    fn model_name() -> &'static str {
        match N {
            0 => "Fixture0",
            1 => "Fixture1",
            2 => "Fixture2",
            3 => "Fixture3",
            _ => "Fixture4",
        }
    }

    fn meta() -> CategoryMeta {
        let (singular, plural) = match N {
            0 => ("zeta fixture", "zeta fixtures"),
            1 => ("alpha fixture", "alpha fixtures"),
            2 => ("mu fixture", "mu fixtures"),
            3 => ("beta fixture", "beta fixtures"),
            _ => ("omega fixture", "omega fixtures"),
        };
        CategoryMeta::new(singular, plural)
    }

    fn fields() -> Vec<FieldDef> {
        Vec::new()
    }
}
