pub mod insight_service;
pub mod ledger_service;
pub mod snapshot_service;
pub mod summary_service;
