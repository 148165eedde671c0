pub mod batcher;
pub mod explorer;
pub mod filters;
pub mod json_codecs;
pub mod ledger;
pub mod paginator;
pub mod records;
pub mod snapshot;
