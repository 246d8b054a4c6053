use cosmwasm_std::StdError;
use icebreaker_library::admin::AdminError;
use icebreaker_library::reentrancy::ReentrancyError;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum ContractError {
    #[error("{0}")]
    Std(#[from] StdError),

    #[error("Invalid participants: a participant cannot interact with itself")]
    InvalidParticipants {},

    #[error("Unauthorized caller")]
    UnauthorizedCaller {},

    #[error("Reentrant call")]
    Reentrancy {},

    #[error("Minimum reward interval has not elapsed for this pair")]
    RewardInterval {},

    #[error("Ice breaker fee payment failed")]
    IceBreakerFee {},

    #[error("Tip transfer failed")]
    TipUser {},

    #[error("Reward transfer failed")]
    RewardTransferFailed {},

    #[error("Withdraw transfer failed")]
    WithdrawFailed {},

    #[error("Unknown or stale request")]
    UnknownOrStaleRequest {},

    #[error("Unexpected request id: {request_id}")]
    UnexpectedRequestId { request_id: String },

    #[error("Insufficient oracle response data")]
    InsufficientResponseData {},

    #[error("Unknown reply id: {id}")]
    UnknownReplyId { id: u64 },
}

impl From<AdminError> for ContractError {
    fn from(err: AdminError) -> Self {
        match err {
            AdminError::Std(err) => ContractError::Std(err),
            AdminError::UnauthorizedCaller => ContractError::UnauthorizedCaller {},
        }
    }
}

impl From<ReentrancyError> for ContractError {
    fn from(err: ReentrancyError) -> Self {
        match err {
            ReentrancyError::Std(err) => ContractError::Std(err),
            ReentrancyError::Reentrancy => ContractError::Reentrancy {},
        }
    }
}
