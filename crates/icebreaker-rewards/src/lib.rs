pub mod contract;
pub mod error;
pub mod msg;
pub mod testing;

pub mod correlator;
pub mod oracle;
pub mod pair;
pub mod registry;
pub mod reward;
pub mod state;
mod token;

pub use crate::error::ContractError;
