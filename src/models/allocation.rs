use super::Segment;

/// Target percentage split across the three segments.
///
/// Values are not coerced: a rule whose parts do not add up to 100 is
/// representable so that it can be shown and corrected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AllocationRule {
    pub needs_percent: u8,
    pub wants_percent: u8,
    pub savings_percent: u8,
}

impl AllocationRule {
    pub const DEFAULT: AllocationRule = AllocationRule::new(50, 30, 20);

    pub const fn new(needs_percent: u8, wants_percent: u8, savings_percent: u8) -> Self {
        Self {
            needs_percent,
            wants_percent,
            savings_percent,
        }
    }

    pub fn percent_for(&self, segment: Segment) -> u8 {
        match segment {
            Segment::Needs => self.needs_percent,
            Segment::Wants => self.wants_percent,
            Segment::Savings => self.savings_percent,
        }
    }

    pub fn set_percent(&mut self, segment: Segment, value: u8) {
        match segment {
            Segment::Needs => self.needs_percent = value,
            Segment::Wants => self.wants_percent = value,
            Segment::Savings => self.savings_percent = value,
        }
    }

    pub fn total(&self) -> i32 {
        i32::from(self.needs_percent) + i32::from(self.wants_percent) + i32::from(self.savings_percent)
    }
}

impl Default for AllocationRule {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl std::fmt::Display for AllocationRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}/{}/{}",
            self.needs_percent, self.wants_percent, self.savings_percent
        )
    }
}
