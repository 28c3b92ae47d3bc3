use super::*;

pub type ContractResult<A> = Result<A, ContractError>;

/// Contract token ID type.
pub type ContractTokenId = TokenIdVec;

/// Wrapping the custom errors in a type with CIS1 errors.
pub type ContractError = Cis1Error<CustomContractError>;

/// The CIS1 transfer parameter specialized to the token ID type used by
/// this contract.
pub type TransferParameter = TransferParams<ContractTokenId>;
