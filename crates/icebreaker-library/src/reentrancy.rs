//! A contract takes the guard with [enter] in `execute` right before it dispatches sub-messages
//! to an untrusted contract, and releases it with [exit] in the `reply` of its final sub-message.
//! Any `execute` that lands in between (a token contract calling back into us mid-transfer)
//! is rejected by [assert_not_entered].
//!
//! If the transaction fails, CosmWasm reverts the flag together with every other write,
//! so the guard can never be left dangling.

use cosmwasm_std::{StdError, StdResult, Storage};
use cw_storage_plus::Item;

const ENTERED: Item<bool> = Item::new("_entered");

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ReentrancyError {
    #[error("{0}")]
    Std(#[from] StdError),

    #[error("Reentrant call")]
    Reentrancy,
}

/// Returns true while an outward call is in flight.
pub fn is_entered(storage: &dyn Storage) -> StdResult<bool> {
    Ok(ENTERED.may_load(storage)?.unwrap_or(false))
}

pub fn assert_not_entered(storage: &dyn Storage) -> Result<(), ReentrancyError> {
    if is_entered(storage)? {
        return Err(ReentrancyError::Reentrancy);
    }
    Ok(())
}

/// Take the guard. Fails if it is already held.
pub fn enter(storage: &mut dyn Storage) -> Result<(), ReentrancyError> {
    assert_not_entered(storage)?;
    ENTERED.save(storage, &true)?;
    Ok(())
}

/// Release the guard.
pub fn exit(storage: &mut dyn Storage) -> StdResult<()> {
    ENTERED.save(storage, &false)
}
