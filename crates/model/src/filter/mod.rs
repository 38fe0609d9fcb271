pub mod descriptor;
pub mod kind;
pub mod sort;

pub use descriptor::{FilterDescriptor, FilterValue};
pub use kind::{FilterOperator, FilterType};
pub use sort::{SortDirection, SortRequest};
