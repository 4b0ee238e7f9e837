//! Test helpers module
//!
//! Mock Telegram API server, inbound-update builders and the unified test
//! context used by the integration suites.

pub mod telegram_mock;
pub mod test_context;
pub mod test_data;

pub use telegram_mock::*;
pub use test_context::*;
