pub mod club;
pub mod ledger;
pub mod snapshot;
