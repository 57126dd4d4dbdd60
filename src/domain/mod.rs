mod budget;
mod ledger;
mod money;
mod record;

pub use budget::*;
pub use ledger::*;
pub use money::*;
pub use record::*;
