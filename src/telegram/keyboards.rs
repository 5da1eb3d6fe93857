use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup};

const PICK_PREFIX: &str = "cat_";
const DELETE_PREFIX: &str = "del_";

/// Payload carried by an inline button
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallbackAction {
    /// `cat_<name>`: category chosen for the pending expense
    PickCategory(String),
    /// `del_<name>`: category chosen for deletion
    DeleteCategory(String),
}

impl CallbackAction {
    pub fn parse(data: &str) -> Option<Self> {
        if let Some(name) = data.strip_prefix(PICK_PREFIX) {
            return Some(CallbackAction::PickCategory(name.to_string()));
        }
        if let Some(name) = data.strip_prefix(DELETE_PREFIX) {
            return Some(CallbackAction::DeleteCategory(name.to_string()));
        }
        None
    }

    pub fn encode(&self) -> String {
        match self {
            CallbackAction::PickCategory(name) => format!("{}{}", PICK_PREFIX, name),
            CallbackAction::DeleteCategory(name) => format!("{}{}", DELETE_PREFIX, name),
        }
    }
}

/// One button per category, one per row
pub fn category_keyboard(categories: &[String]) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(categories.iter().map(|category| {
        vec![InlineKeyboardButton::callback(
            category.clone(),
            CallbackAction::PickCategory(category.clone()).encode(),
        )]
    }))
}

pub fn delete_keyboard(categories: &[String]) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(categories.iter().map(|category| {
        vec![InlineKeyboardButton::callback(
            format!("Удалить: {}", category),
            CallbackAction::DeleteCategory(category.clone()).encode(),
        )]
    }))
}
