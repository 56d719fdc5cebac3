//! Sellerdesk
//!
//! Sellerdesk is the data layer of a marketplace seller dashboard: record
//! stores, filter and sort pipelines, paginated tables with selection and
//! inline stock edits, the order fulfilment state machine, the payouts ledger,
//! theme resolution and seeded mock data.

pub mod criteria;
pub mod finance;
pub mod fixtures;
pub mod generators;
pub mod orders;
pub mod pagination;
pub mod pipeline;
pub mod prelude;
pub mod products;
pub mod render;
pub mod stock;
pub mod store;
pub mod table;
pub mod theme;
