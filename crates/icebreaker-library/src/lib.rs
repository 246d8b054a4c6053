pub mod testing;

/// The single privileged identity of a contract.
/// - `transfer_admin` only allows the current admin to hand the role to a new admin.
/// - `assert_admin` checks if the current message sender is the admin.
pub mod admin;

/// Storage flag held while a contract has outward calls in flight.
pub mod reentrancy;

pub mod time;
