mod account;
mod auth;
mod ledger;
mod money;

pub use account::*;
pub use auth::*;
pub use ledger::*;
pub use money::*;
