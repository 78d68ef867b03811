mod aggregate;
mod category;
mod ledger;
mod money;
mod period;

pub use aggregate::*;
pub use category::*;
pub use ledger::*;
pub use money::*;
pub use period::*;
