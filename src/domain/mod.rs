mod group;
mod ledger;
mod money;
mod transaction;

pub use group::*;
pub use ledger::*;
pub use money::*;
pub use transaction::*;
