use commons::ContractTokenId;
use concordium_std::*;

/// Parameter for the `mint` entrypoint.
#[derive(Debug, Serialize, SchemaType)]
pub struct MintParams {
    /// Identifier of the freshly minted token.
    pub token_id: ContractTokenId,
    /// Opaque metadata reference stored with the auction record.
    pub metadata_url: String,
    /// Length of the bidding window.
    pub duration: Duration,
}

/// Parameter carrying a single token identifier.
#[derive(Debug, Serialize, SchemaType)]
pub struct TokenParams {
    pub token_id: ContractTokenId,
}

/// Parameter for the `approve` entrypoint.
#[derive(Debug, Serialize, SchemaType)]
pub struct ApproveParams {
    pub token_id: ContractTokenId,
    /// Account being authorized to receive the token.
    pub to: AccountAddress,
}

/// Parameter for the `pendingReturn` view.
#[derive(Debug, Serialize, SchemaType)]
pub struct AccountParams {
    pub account: AccountAddress,
}
