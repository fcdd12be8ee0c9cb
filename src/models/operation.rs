use chrono::NaiveDate;
use rust_decimal::Decimal;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationType {
    Income,
    Expense,
    Savings,
}

impl OperationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
            Self::Savings => "savings",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "income" | "in" => Some(Self::Income),
            "expense" | "expenses" | "out" => Some(Self::Expense),
            "savings" | "saving" => Some(Self::Savings),
            _ => None,
        }
    }

    pub fn all() -> &'static [OperationType] {
        &[Self::Income, Self::Expense, Self::Savings]
    }
}

impl std::fmt::Display for OperationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single dated financial entry. Amounts are non-negative; the direction
/// of money comes from `kind`.
#[derive(Debug, Clone, PartialEq)]
pub struct Operation {
    pub id: Option<i64>,
    pub kind: OperationType,
    pub amount: Decimal,
    pub concept: String,
    pub description: Option<String>,
    pub date: NaiveDate,
    pub category_id: Option<i64>,
}

impl Operation {
    pub fn new(kind: OperationType, amount: Decimal, concept: String, date: NaiveDate) -> Self {
        Self {
            id: None,
            kind,
            amount,
            concept,
            description: None,
            date,
            category_id: None,
        }
    }

    pub fn with_category(mut self, category_id: i64) -> Self {
        self.category_id = Some(category_id);
        self
    }

    pub fn with_description(mut self, description: String) -> Self {
        self.description = Some(description);
        self
    }
}
