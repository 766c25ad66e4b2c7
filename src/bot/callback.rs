//! Inline keyboard callback payloads.
//!
//! Payloads are parsed into [`CallbackEvent`] at the dispatcher boundary so the
//! rest of the bot never handles raw strings.

use crate::wallpaper::Selection;

const CATEGORY_PREFIX: &str = "cat:";
const SUBCATEGORY_PREFIX: &str = "subcat:";
const NARROW_CATEGORY_PREFIX: &str = "narrow_cat:";
const USAGE_PREFIX: &str = "used:";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallbackEvent {
    /// Wide user opened a top-level category (`cat:<Category>`)
    CategoryOpened { category: String },
    /// Wide user picked a subcategory (`subcat:<Category>:<Subcategory>`)
    SubcategoryChosen {
        category: String,
        subcategory: String,
    },
    /// Narrow user picked a category (`narrow_cat:<Category>`)
    CategoryChosen { category: String },
    /// Answer to the evening usage prompt (`used:yes` / `used:no`)
    UsageAnswered { used: bool },
}

impl CallbackEvent {
    /// Parse callback data; anything outside the known shapes yields `None`
    pub fn parse(data: &str) -> Option<Self> {
        if let Some(category) = data.strip_prefix(NARROW_CATEGORY_PREFIX) {
            return non_empty(category).map(|category| CallbackEvent::CategoryChosen { category });
        }

        if let Some(rest) = data.strip_prefix(SUBCATEGORY_PREFIX) {
            let (category, subcategory) = rest.split_once(':')?;
            return Some(CallbackEvent::SubcategoryChosen {
                category: non_empty(category)?,
                subcategory: non_empty(subcategory)?,
            });
        }

        if let Some(category) = data.strip_prefix(CATEGORY_PREFIX) {
            return non_empty(category).map(|category| CallbackEvent::CategoryOpened { category });
        }

        match data.strip_prefix(USAGE_PREFIX)? {
            "yes" => Some(CallbackEvent::UsageAnswered { used: true }),
            "no" => Some(CallbackEvent::UsageAnswered { used: false }),
            _ => None,
        }
    }

    pub fn to_payload(&self) -> String {
        match self {
            CallbackEvent::CategoryOpened { category } => {
                format!("{}{}", CATEGORY_PREFIX, category)
            }
            CallbackEvent::SubcategoryChosen {
                category,
                subcategory,
            } => format!("{}{}:{}", SUBCATEGORY_PREFIX, category, subcategory),
            CallbackEvent::CategoryChosen { category } => {
                format!("{}{}", NARROW_CATEGORY_PREFIX, category)
            }
            CallbackEvent::UsageAnswered { used } => {
                format!("{}{}", USAGE_PREFIX, if *used { "yes" } else { "no" })
            }
        }
    }

    /// The leaf selection this event picks, if it picks one
    pub fn selection(&self) -> Option<Selection> {
        match self {
            CallbackEvent::CategoryChosen { category } => Some(Selection::narrow(category.clone())),
            CallbackEvent::SubcategoryChosen {
                category,
                subcategory,
            } => Some(Selection::wide(category.clone(), subcategory.clone())),
            _ => None,
        }
    }
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}
