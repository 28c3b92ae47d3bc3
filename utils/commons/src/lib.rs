//! Shared types and capabilities for the timed auction contract.
#![cfg_attr(not(feature = "std"), no_std)]

pub use crate::{constants::*, errors::*, ledger::*, mutex::*, types::*};

use concordium_cis1::*;
use concordium_std::*;

mod constants;
mod errors;
mod ledger;
mod mutex;
mod types;
