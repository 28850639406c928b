pub mod asset;
pub mod ledger;
pub mod month;
pub mod settings;
pub mod snapshot;
pub mod summary;
pub mod transaction;
