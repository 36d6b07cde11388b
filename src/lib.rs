#![doc(test(attr(deny(warnings))))]

//! Flow Finance tracks income and expenses in fixed fourteen-day periods,
//! grades each period's budget health, and materializes recurring
//! transactions into the current period without duplicating them.

pub mod config;
pub mod currency;
pub mod errors;
pub mod ledger;
pub mod session;
pub mod storage;
pub mod time;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup debug log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::debug!("Flow Finance tracing initialized.");
    });
}

#[cfg(test)]
mod tests {
    #[test]
    fn init_does_not_panic() {
        super::init();
        super::init();
    }
}
