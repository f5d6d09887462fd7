pub mod budget;
pub mod resolver;
pub mod result;

pub use budget::PollBudget;
pub use resolver::ElementResolver;
pub use result::{Resolved, ResolvedAll};
