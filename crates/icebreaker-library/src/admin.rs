use cosmwasm_std::{Addr, Event, MessageInfo, Response, StdError, StdResult, Storage};
use cw_storage_plus::Item;

const ADMIN: Item<Addr> = Item::new("_admin");

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum AdminError {
    #[error("{0}")]
    Std(#[from] StdError),

    #[error("Unauthorized caller")]
    UnauthorizedCaller,
}

/// Set the [ADMIN] of the contract (this is internal, no checks are done)
pub fn set_admin(storage: &mut dyn Storage, admin: &Addr) -> Result<(), AdminError> {
    ADMIN.save(storage, admin)?;
    Ok(())
}

/// Get the admin of the contract.
/// If [set_admin] has not been called, it will return an [StdError::NotFound]
pub fn get_admin(storage: &dyn Storage) -> StdResult<Addr> {
    ADMIN.may_load(storage)?.ok_or(StdError::not_found("admin"))
}

/// Hand the admin role to `new_admin`.
/// Only the current admin can do this, and the change is immediate (single step).
pub fn transfer_admin(
    storage: &mut dyn Storage,
    info: &MessageInfo,
    new_admin: Addr,
) -> Result<Response, AdminError> {
    assert_admin(storage, info)?;

    let old_admin = ADMIN.load(storage)?;
    ADMIN.save(storage, &new_admin)?;
    Ok(Response::new().add_event(
        Event::new("TransferredAdmin")
            .add_attribute("old_admin", old_admin.as_str())
            .add_attribute("new_admin", new_admin.as_str()),
    ))
}

/// Asserts that the sender of the message is the admin of the contract
pub fn assert_admin(storage: &dyn Storage, info: &MessageInfo) -> Result<(), AdminError> {
    let admin = ADMIN.load(storage)?;
    if info.sender != admin {
        return Err(AdminError::UnauthorizedCaller);
    }
    Ok(())
}

/// Returns true when `sender` currently holds the admin role.
pub fn is_admin(storage: &dyn Storage, sender: &Addr) -> StdResult<bool> {
    Ok(&ADMIN.load(storage)? == sender)
}
