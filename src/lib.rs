#![doc(test(attr(deny(warnings))))]

//! Brewbooks is the bookkeeping core for a small craft-beverage producer:
//! production batches, a cash ledger, and sales records feed a
//! cost-allocation engine, a financial aggregator, and a last-writer-wins
//! reconciliation merge. Rendering, charts, and the credential gate live in
//! the presentation layer and only call the pure services exposed here.

pub mod domain;
pub mod errors;
pub mod ledger;
pub mod services;
pub mod storage;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Brewbooks tracing initialized.");
    });
}
