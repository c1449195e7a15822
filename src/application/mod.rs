// Application layer: the ledger model and its error taxonomy.
// Front ends (the CLI, tests) drive the ledger only through `LedgerModel`.

pub mod error;
mod model;

pub use error::*;
pub use model::*;
