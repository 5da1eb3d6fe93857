use super::period::ExpenseDate;

/// Categories every fresh installation starts with, in display order
pub const DEFAULT_CATEGORIES: [&str; 7] = [
    "Еда",
    "Транспорт",
    "Жильё",
    "Развлечения",
    "Покупки",
    "Здоровье",
    "Другое",
];

/// A recorded expense as read back for reports
#[derive(Debug, Clone, PartialEq)]
pub struct Expense {
    pub amount: f64,
    pub category: String,
    pub date: ExpenseDate,
    /// Telegram username, or first name when the user has none
    pub username: String,
}

/// An expense about to be inserted
#[derive(Debug, Clone, PartialEq)]
pub struct NewExpense {
    pub user_id: i64,
    pub amount: f64,
    pub category: String,
    pub date: ExpenseDate,
    pub username: String,
}

impl NewExpense {
    pub fn into_expense(self) -> Expense {
        Expense {
            amount: self.amount,
            category: self.category,
            date: self.date,
            username: self.username,
        }
    }
}
