pub mod criteria;
pub mod dashboard;
pub mod transaction;

pub use criteria::*;
pub use dashboard::*;
pub use transaction::*;
