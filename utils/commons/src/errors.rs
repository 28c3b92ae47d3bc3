use super::*;

/// The custom errors the contract can produce.
#[derive(Serialize, Debug, PartialEq, Eq, Reject, SchemaType)]
pub enum CustomContractError {
    /// Failed parsing the parameter (Error code: -1).
    #[from(ParseError)]
    ParseParams,
    /// Failed logging: Log is full (Error code: -2).
    LogFull,
    /// Failed logging: Log is malformed (Error code: -3).
    LogMalformed,
    /// Sender is not the contract owner (Error code: -4).
    NotOwner,
    /// Token with this identifier was never minted (Error code: -5).
    NotExistingTokenId,
    /// Failing to mint a token because the token ID is already taken
    /// (Error code: -6).
    TokenIdAlreadyExists,
    /// Only account addresses can perform this action (Error code: -7).
    OnlyAccountAddress,
    /// The contract owner is not allowed to place bids (Error code: -8).
    ContractOwnerNotAllowedToBid,
    /// Attached CCD is below the required bid, or no CCD is owed to the
    /// caller (Error code: -9).
    NotEnoughCcd,
    /// The auction deadline has passed (Error code: -10).
    AuctionFinished,
    /// The auction deadline has not passed yet (Error code: -11).
    AuctionStillOpen,
    /// No bid was ever placed on this token (Error code: -12).
    NoBidReceivedForThisToken,
    /// A bid was already placed on this token (Error code: -13).
    BidReceivedForThisToken,
    /// Transfer destination is not the winning bidder (Error code: -14).
    AddressIsNotHighestBidder,
    /// This function is permanently disabled (Error code: -15).
    FunctionDisabled,
    /// Outgoing CCD transfer failed (Error code: -16).
    TransferFailed,
    /// Attempt to re-enter a guarded operation (Error code: -17).
    ReentrantCall,
    /// Unauthorized (Error code: -18).
    Unauthorized,
}

/// Mapping the logging errors to CustomContractError.
impl From<LogError> for CustomContractError {
    fn from(le: LogError) -> Self {
        match le {
            LogError::Full => Self::LogFull,
            LogError::Malformed => Self::LogMalformed,
        }
    }
}

/// Mapping errors related to CCD transfers to CustomContractError.
impl From<TransferError> for CustomContractError {
    fn from(_te: TransferError) -> Self {
        Self::TransferFailed
    }
}

/// Mapping CustomContractError to ContractError.
impl From<CustomContractError> for ContractError {
    fn from(c: CustomContractError) -> Self {
        Cis1Error::Custom(c)
    }
}
