use super::OperationType;

/// One of the three 50/30/20 buckets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Segment {
    Needs,
    Wants,
    Savings,
}

impl Segment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Needs => "needs",
            Self::Wants => "wants",
            Self::Savings => "savings",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "needs" | "need" => Some(Self::Needs),
            "wants" | "want" => Some(Self::Wants),
            "savings" | "saving" => Some(Self::Savings),
            _ => None,
        }
    }

    pub fn all() -> &'static [Segment] {
        &[Self::Needs, Self::Wants, Self::Savings]
    }
}

impl std::fmt::Display for Segment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A user category. `kind` and `segment` are stored independently and may
/// disagree; see [`Category::is_consistent`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub id: Option<i64>,
    pub name: String,
    pub kind: OperationType,
    pub segment: Option<Segment>,
}

impl Category {
    pub fn new(name: String, kind: OperationType) -> Self {
        Self {
            id: None,
            name,
            kind,
            segment: None,
        }
    }

    pub fn with_segment(mut self, segment: Segment) -> Self {
        self.segment = Some(segment);
        self
    }

    /// Whether the stored segment agrees with the category type: income has no
    /// segment, savings maps to savings, expenses map to needs or wants.
    /// An expense or savings category without a segment is unclassified, not
    /// inconsistent.
    pub fn is_consistent(&self) -> bool {
        match (self.kind, self.segment) {
            (_, None) => true,
            (OperationType::Income, Some(_)) => false,
            (OperationType::Savings, Some(seg)) => seg == Segment::Savings,
            (OperationType::Expense, Some(seg)) => seg != Segment::Savings,
        }
    }

    /// Find a category by name (case-insensitive) in a slice.
    pub fn find_by_name<'a>(categories: &'a [Category], name: &str) -> Option<&'a Category> {
        let lower = name.to_lowercase();
        categories.iter().find(|c| c.name.to_lowercase() == lower)
    }

    /// Find a category by ID in a slice.
    pub fn find_by_id(categories: &[Category], id: i64) -> Option<&Category> {
        categories.iter().find(|c| c.id == Some(id))
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}
