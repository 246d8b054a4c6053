//! The narrow interface to the external Oracle Service.
//!
//! The oracle is a contract that accepts [OracleExecuteMsg::SubmitRequest], answers it with the
//! request id as its execute-response data, and later delivers the result to the controller with
//! `ExecuteMsg::FulfillRequest`. How the oracle computes the result is out of scope.

use crate::correlator::RequestId;
use crate::error::ContractError;
use cosmwasm_schema::cw_serde;
use cosmwasm_std::{
    to_json_binary, Addr, Binary, CosmosMsg, StdError, StdResult, SubMsgResponse, Uint256, WasmMsg,
};

/// Length of the big-endian unsigned integer carried by a successful response
pub const RESPONSE_WORD_BYTES: usize = 32;

#[cw_serde]
pub enum OracleExecuteMsg {
    SubmitRequest {
        subscription_id: u64,
        /// Ordered arguments handed to the oracle computation
        args: Vec<String>,
    },
}

/// New `SubmitRequest` (sub_message) to the oracle
pub fn submit_request(
    oracle: &Addr,
    subscription_id: u64,
    args: Vec<String>,
) -> StdResult<CosmosMsg> {
    Ok(WasmMsg::Execute {
        contract_addr: oracle.to_string(),
        msg: to_json_binary(&OracleExecuteMsg::SubmitRequest {
            subscription_id,
            args,
        })?,
        funds: vec![],
    }
    .into())
}

/// Read the request id the oracle returned from a successful `SubmitRequest` sub_message.
#[allow(deprecated)]
pub fn parse_request_id(response: SubMsgResponse) -> Result<RequestId, ContractError> {
    let raw = response
        .msg_responses
        .into_iter()
        .next()
        .map(|msg_response| msg_response.value)
        .or(response.data)
        .ok_or_else(|| StdError::generic_err("oracle returned no response data"))?;

    let data = cw_utils::parse_execute_response_data(raw.as_slice())
        .map_err(|err| StdError::generic_err(err.to_string()))?
        .data
        .filter(|data| !data.is_empty())
        .ok_or_else(|| StdError::generic_err("oracle returned no request id"))?;

    Ok(RequestId::from(data.to_vec()))
}

/// Decode the numeric result of a successful oracle response.
/// The first [RESPONSE_WORD_BYTES] bytes are read as a big-endian integer.
pub fn decode_response(response: &Binary) -> Result<Uint256, ContractError> {
    let word: [u8; RESPONSE_WORD_BYTES] = response
        .as_slice()
        .get(..RESPONSE_WORD_BYTES)
        .and_then(|word| word.try_into().ok())
        .ok_or(ContractError::InsufficientResponseData {})?;
    Ok(Uint256::from_be_bytes(word))
}

#[cfg(test)]
mod tests {
    use super::*;
    use cosmwasm_std::from_json;

    #[test]
    fn test_submit_request() {
        let oracle = Addr::unchecked("oracle");
        let msg = submit_request(&oracle, 7, vec!["a".to_string(), "b".to_string()]).unwrap();

        let CosmosMsg::Wasm(WasmMsg::Execute {
            contract_addr,
            msg,
            funds,
        }) = msg
        else {
            panic!("expected a wasm execute message");
        };
        assert_eq!(contract_addr, "oracle");
        assert!(funds.is_empty());
        assert_eq!(
            from_json::<OracleExecuteMsg>(&msg).unwrap(),
            OracleExecuteMsg::SubmitRequest {
                subscription_id: 7,
                args: vec!["a".to_string(), "b".to_string()],
            }
        );
    }

    #[test]
    fn test_decode_response() {
        let mut word = [0u8; 32];
        word[31] = 42;
        assert_eq!(
            decode_response(&Binary::from(word.to_vec())).unwrap(),
            Uint256::from(42u128)
        );

        // trailing bytes are ignored
        let mut long = word.to_vec();
        long.extend_from_slice(&[0xff; 8]);
        assert_eq!(
            decode_response(&Binary::from(long)).unwrap(),
            Uint256::from(42u128)
        );
    }

    #[test]
    fn test_decode_response_insufficient() {
        assert_eq!(
            decode_response(&Binary::default()),
            Err(ContractError::InsufficientResponseData {})
        );
        assert_eq!(
            decode_response(&Binary::from(vec![1u8; 31])),
            Err(ContractError::InsufficientResponseData {})
        );
    }
}
