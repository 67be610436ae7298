use serde::{Deserialize, Serialize};

/// Bucket used for expenses recorded without a subcategory.
pub const UNCATEGORIZED: &str = "Uncategorized";

const DEFAULT_TAXONOMY: &[(&str, &[&str])] = &[
    (
        "Revenue",
        &["Services", "Product Sales", "Other Revenue", "Dividends", "Yields"],
    ),
    ("Food", &["Restaurants", "Groceries", "Delivery", "Snacks"]),
    (
        "Housing",
        &["Rent", "Utilities", "Maintenance", "Condo Fees", "Property Tax"],
    ),
    (
        "Transport",
        &["Fuel", "Public Transport", "Vehicle Maintenance", "Ride Apps"],
    ),
    (
        "Leisure",
        &["Cinema", "Travel", "Hobbies", "Shows", "Streaming"],
    ),
    (
        "Work Supplies",
        &["Equipment", "Supplies", "Software", "Courses"],
    ),
    ("Taxes", &["DAS", "IRPJ", "Other Taxes", "INSS"]),
    ("Health", &["Appointments", "Medication", "Health Plan"]),
    ("Education", &["Courses", "Books", "Tuition"]),
    ("Other", &["Gifts", "Donations", "Miscellaneous"]),
];

/// One category and the subcategories it permits, in display order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryDef {
    pub name: String,
    pub subcategories: Vec<String>,
}

/// Closed two-level classification: category -> ordered subcategories.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Taxonomy {
    categories: Vec<CategoryDef>,
}

impl Taxonomy {
    pub fn new(categories: Vec<CategoryDef>) -> Self {
        Self { categories }
    }

    pub fn categories(&self) -> &[CategoryDef] {
        &self.categories
    }

    pub fn category(&self, name: &str) -> Option<&CategoryDef> {
        self.categories.iter().find(|c| c.name == name)
    }

    /// Permitted subcategories for a category; empty when the category is unknown.
    pub fn subcategories(&self, category: &str) -> &[String] {
        self.category(category)
            .map(|c| c.subcategories.as_slice())
            .unwrap_or(&[])
    }

    /// Check a (category, subcategory) pair against the taxonomy.
    pub fn check(&self, category: &str, subcategory: Option<&str>) -> Result<(), TaxonomyError> {
        let def = self
            .category(category)
            .ok_or_else(|| TaxonomyError::UnknownCategory(category.to_string()))?;

        match subcategory {
            Some(sub) if !def.subcategories.iter().any(|s| s == sub) => {
                Err(TaxonomyError::SubcategoryNotInCategory {
                    category: category.to_string(),
                    subcategory: sub.to_string(),
                })
            }
            _ => Ok(()),
        }
    }
}

impl Default for Taxonomy {
    fn default() -> Self {
        Self::new(
            DEFAULT_TAXONOMY
                .iter()
                .map(|(name, subs)| CategoryDef {
                    name: name.to_string(),
                    subcategories: subs.iter().map(|s| s.to_string()).collect(),
                })
                .collect(),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaxonomyError {
    UnknownCategory(String),
    SubcategoryNotInCategory { category: String, subcategory: String },
}

impl std::fmt::Display for TaxonomyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TaxonomyError::UnknownCategory(name) => write!(f, "unknown category '{}'", name),
            TaxonomyError::SubcategoryNotInCategory {
                category,
                subcategory,
            } => write!(
                f,
                "subcategory '{}' does not belong to category '{}'",
                subcategory, category
            ),
        }
    }
}

impl std::error::Error for TaxonomyError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_taxonomy_order() {
        let taxonomy = Taxonomy::default();
        let names: Vec<&str> = taxonomy
            .categories()
            .iter()
            .map(|c| c.name.as_str())
            .collect();
        assert_eq!(names.first(), Some(&"Revenue"));
        assert_eq!(names.len(), 10);
        assert_eq!(taxonomy.subcategories("Housing")[0], "Rent");
    }

    #[test]
    fn test_check() {
        let taxonomy = Taxonomy::default();
        assert!(taxonomy.check("Housing", Some("Rent")).is_ok());
        assert!(taxonomy.check("Housing", None).is_ok());
        assert_eq!(
            taxonomy.check("Housing", Some("Groceries")),
            Err(TaxonomyError::SubcategoryNotInCategory {
                category: "Housing".into(),
                subcategory: "Groceries".into(),
            })
        );
        assert_eq!(
            taxonomy.check("Pets", None),
            Err(TaxonomyError::UnknownCategory("Pets".into()))
        );
    }

    #[test]
    fn test_unknown_category_has_no_subcategories() {
        assert!(Taxonomy::default().subcategories("Pets").is_empty());
    }
}
