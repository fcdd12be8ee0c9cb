mod allocation;
mod category;
mod operation;
mod period;

pub use allocation::AllocationRule;
pub use category::{Category, Segment};
pub use operation::{Operation, OperationType};
pub use period::{parse_date, Period, YearMonth};
