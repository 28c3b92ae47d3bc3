//! Every token minted by this contract opens a fixed-duration English
//! auction. Outbid accounts collect their refunds through a pull-payment
//! ledger, and token ownership can only ever move to the winning bidder
//! after the auction has closed.
#![cfg_attr(not(feature = "std"), no_std)]

use concordium_std::{Amount, Duration};

/// Lowest acceptable first bid.
pub const START_PRICE: Amount = Amount::from_micro_ccd(500_000);

/// Minimum raise over the current bid.
pub const MIN_BID_INCREMENT: Amount = Amount::from_micro_ccd(10_000);

/// Trailing window before the deadline. A bid landing inside it pushes the
/// deadline forward by the full window, repeatedly if needed.
pub const BID_EXTENSION_WINDOW: Duration = Duration::from_millis(2 * 60 * 1000);

mod contract;
mod events;
mod external;
mod state;
