//! Button menus sent with prompts
use crate::bot::callback::CallbackEvent;
use crate::db::types::Cohort;
use crate::wallpaper::taxonomy;
use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuButton {
    pub label: String,
    pub event: CallbackEvent,
}

/// Ordered rows of buttons
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Menu {
    pub rows: Vec<Vec<MenuButton>>,
}

impl Menu {
    /// One button per row
    pub fn column(buttons: Vec<MenuButton>) -> Self {
        Self {
            rows: buttons.into_iter().map(|b| vec![b]).collect(),
        }
    }

    /// All buttons side by side
    pub fn row(buttons: Vec<MenuButton>) -> Self {
        Self {
            rows: vec![buttons],
        }
    }

    pub fn to_keyboard(&self) -> InlineKeyboardMarkup {
        InlineKeyboardMarkup::new(self.rows.iter().map(|row| {
            row.iter()
                .map(|button| {
                    InlineKeyboardButton::callback(button.label.clone(), button.event.to_payload())
                })
                .collect::<Vec<_>>()
        }))
    }
}

/// Morning menu sized to the cohort
pub fn category_menu(cohort: Cohort) -> Menu {
    let buttons = taxonomy::list_top_level(cohort)
        .into_iter()
        .map(|name| {
            let category = name.to_string();
            let event = match cohort {
                Cohort::Narrow => CallbackEvent::CategoryChosen { category },
                Cohort::Wide => CallbackEvent::CategoryOpened { category },
            };
            MenuButton {
                label: name.to_string(),
                event,
            }
        })
        .collect();

    Menu::column(buttons)
}

/// Second-level menu of a wide category, `None` when the category is unknown
pub fn subcategory_menu(category: &str) -> Option<Menu> {
    let subcategories = taxonomy::list_subcategories(category);
    if subcategories.is_empty() {
        return None;
    }

    let buttons = subcategories
        .iter()
        .map(|subcategory| MenuButton {
            label: subcategory.to_string(),
            event: CallbackEvent::SubcategoryChosen {
                category: category.to_string(),
                subcategory: subcategory.to_string(),
            },
        })
        .collect();

    Some(Menu::column(buttons))
}

/// Yes/No in a single row
pub fn usage_menu() -> Menu {
    Menu::row(vec![
        MenuButton {
            label: "Yes".to_string(),
            event: CallbackEvent::UsageAnswered { used: true },
        },
        MenuButton {
            label: "No".to_string(),
            event: CallbackEvent::UsageAnswered { used: false },
        },
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_narrow_menu_picks_directly() {
        let menu = category_menu(Cohort::Narrow);

        assert_eq!(menu.rows.len(), 7);
        assert!(menu.rows.iter().all(|row| row.len() == 1));
        assert_eq!(menu.rows[0][0].label, "Nature");
        assert_eq!(menu.rows[0][0].event.to_payload(), "narrow_cat:Nature");
    }

    #[test]
    fn test_wide_menu_opens_subcategories() {
        let menu = category_menu(Cohort::Wide);

        assert_eq!(menu.rows.len(), 10);
        assert_eq!(menu.rows[7][0].label, "Cars & Vehicles");
        assert_eq!(menu.rows[7][0].event.to_payload(), "cat:Cars & Vehicles");
    }

    #[test]
    fn test_subcategory_menu() {
        let menu = subcategory_menu("Seasons").unwrap();
        let payloads: Vec<String> = menu
            .rows
            .iter()
            .map(|row| row[0].event.to_payload())
            .collect();
        assert_eq!(
            payloads,
            vec![
                "subcat:Seasons:Spring",
                "subcat:Seasons:Summer",
                "subcat:Seasons:Autumn",
                "subcat:Seasons:Winter"
            ]
        );

        assert!(subcategory_menu("Unknown").is_none());
    }

    #[test]
    fn test_usage_menu_is_one_row() {
        let menu = usage_menu();
        assert_eq!(menu.rows.len(), 1);
        assert_eq!(menu.rows[0].len(), 2);
        assert_eq!(menu.rows[0][0].event.to_payload(), "used:yes");
        assert_eq!(menu.rows[0][1].event.to_payload(), "used:no");
    }

    #[test]
    fn test_to_keyboard_keeps_layout() {
        let keyboard = usage_menu().to_keyboard();
        assert_eq!(keyboard.inline_keyboard.len(), 1);
        assert_eq!(keyboard.inline_keyboard[0].len(), 2);
        assert_eq!(keyboard.inline_keyboard[0][0].text, "Yes");
    }
}
