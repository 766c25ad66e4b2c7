//! Static category taxonomy for both cohorts.
//!
//! Declaration order is significant: menus are generated from it and must stay
//! stable between calls.

use crate::db::types::Cohort;

/// Categories offered to the narrow cohort
pub const NARROW_CATEGORIES: &[&str] = &[
    "Nature",
    "Abstract",
    "Animals",
    "Space",
    "Cities",
    "Fantasy",
    "Technology",
];

/// Category → subcategories offered to the wide cohort
pub const WIDE_CATEGORIES: &[(&str, &[&str])] = &[
    (
        "Nature",
        &[
            "Mountains",
            "Forests",
            "Beaches",
            "Sunsets",
            "Rivers",
            "Waterfalls",
            "Deserts",
            "Caves",
        ],
    ),
    (
        "Space",
        &["Galaxies", "Planets", "Nebulae", "Stars", "Black Holes"],
    ),
    (
        "Animals",
        &["Wildlife animals", "Pets", "Birds", "Reptiles", "Cats", "Dogs"],
    ),
    (
        "Abstract",
        &["Fractals", "Geometric", "Minimalist", "3D", "Textures", "Surreal"],
    ),
    (
        "Cities",
        &[
            "Skylines",
            "Bridges",
            "Streets",
            "Landmarks",
            "Nightscapes",
            "Futuristic Cities",
        ],
    ),
    (
        "Fantasy",
        &["Dragons", "Magical Landscapes", "Fairy Tales", "Fantasy Art"],
    ),
    (
        "Technology",
        &["Cyberpunk", "Futuristic", "AI & Robotics", "Gadgets"],
    ),
    (
        "Cars & Vehicles",
        &[
            "Sports Cars",
            "Motorcycles",
            "Classic Cars",
            "Airplanes",
            "Trains",
            "Boats",
        ],
    ),
    ("Seasons", &["Spring", "Summer", "Autumn", "Winter"]),
    (
        "Dark & Gothic",
        &["Dark Aesthetic", "Horror", "Gothic Art", "Skulls", "Vampires"],
    ),
];

/// A concrete leaf a user can pick.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Selection {
    Narrow { category: String },
    Wide { category: String, subcategory: String },
}

impl Selection {
    pub fn narrow(category: impl Into<String>) -> Self {
        Selection::Narrow {
            category: category.into(),
        }
    }

    pub fn wide(category: impl Into<String>, subcategory: impl Into<String>) -> Self {
        Selection::Wide {
            category: category.into(),
            subcategory: subcategory.into(),
        }
    }

    /// Cache partition key: `Category` or `Category:Subcategory`
    pub fn category_key(&self) -> String {
        match self {
            Selection::Narrow { category } => category.clone(),
            Selection::Wide {
                category,
                subcategory,
            } => format!("{}:{}", category, subcategory),
        }
    }

    /// Search query sent to the image provider (the leaf name)
    pub fn query(&self) -> &str {
        match self {
            Selection::Narrow { category } => category,
            Selection::Wide { subcategory, .. } => subcategory,
        }
    }

    /// Whether the selection names an entry of the taxonomy
    pub fn is_known(&self) -> bool {
        match self {
            Selection::Narrow { category } => NARROW_CATEGORIES.contains(&category.as_str()),
            Selection::Wide {
                category,
                subcategory,
            } => list_subcategories(category).contains(&subcategory.as_str()),
        }
    }
}

/// Top-level names shown to `cohort`, in declaration order
pub fn list_top_level(cohort: Cohort) -> Vec<&'static str> {
    match cohort {
        Cohort::Narrow => NARROW_CATEGORIES.to_vec(),
        Cohort::Wide => WIDE_CATEGORIES.iter().map(|(name, _)| *name).collect(),
    }
}

/// Wide subcategories of `category`, empty when the category is unknown
pub fn list_subcategories(category: &str) -> &'static [&'static str] {
    WIDE_CATEGORIES
        .iter()
        .find(|(name, _)| *name == category)
        .map(|(_, subcategories)| *subcategories)
        .unwrap_or(&[])
}

/// Every selectable leaf: narrow categories first, then wide pairs
pub fn leaves() -> Vec<Selection> {
    let narrow = NARROW_CATEGORIES.iter().map(|c| Selection::narrow(*c));
    let wide = WIDE_CATEGORIES.iter().flat_map(|(category, subcategories)| {
        subcategories
            .iter()
            .map(move |subcategory| Selection::wide(*category, *subcategory))
    });

    narrow.chain(wide).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_top_level_order_is_stable() {
        assert_eq!(
            list_top_level(Cohort::Narrow),
            vec!["Nature", "Abstract", "Animals", "Space", "Cities", "Fantasy", "Technology"]
        );

        let wide = list_top_level(Cohort::Wide);
        assert_eq!(wide.len(), 10);
        assert_eq!(wide[0], "Nature");
        assert_eq!(wide[7], "Cars & Vehicles");
        assert_eq!(wide[9], "Dark & Gothic");
        assert_eq!(wide, list_top_level(Cohort::Wide));
    }

    #[test]
    fn test_list_subcategories() {
        assert_eq!(
            list_subcategories("Seasons"),
            &["Spring", "Summer", "Autumn", "Winter"]
        );
        assert!(list_subcategories("Underwater").is_empty());
        // Lookup is exact
        assert!(list_subcategories("nature").is_empty());
    }

    #[test]
    fn test_category_key_and_query() {
        let narrow = Selection::narrow("Space");
        assert_eq!(narrow.category_key(), "Space");
        assert_eq!(narrow.query(), "Space");

        let wide = Selection::wide("Cars & Vehicles", "Classic Cars");
        assert_eq!(wide.category_key(), "Cars & Vehicles:Classic Cars");
        assert_eq!(wide.query(), "Classic Cars");
    }

    #[test]
    fn test_is_known() {
        assert!(Selection::narrow("Nature").is_known());
        assert!(!Selection::narrow("Seasons").is_known());
        assert!(Selection::wide("Space", "Nebulae").is_known());
        assert!(!Selection::wide("Space", "Mountains").is_known());
        assert!(!Selection::wide("Oceans", "Reefs").is_known());
    }

    #[test]
    fn test_leaves_walk_narrow_then_wide() {
        let leaves = leaves();
        let wide_total: usize = WIDE_CATEGORIES.iter().map(|(_, s)| s.len()).sum();

        assert_eq!(leaves.len(), NARROW_CATEGORIES.len() + wide_total);
        assert_eq!(leaves[0], Selection::narrow("Nature"));
        assert_eq!(leaves[6], Selection::narrow("Technology"));
        assert_eq!(leaves[7], Selection::wide("Nature", "Mountains"));
        assert_eq!(
            leaves.last(),
            Some(&Selection::wide("Dark & Gothic", "Vampires"))
        );
    }
}
