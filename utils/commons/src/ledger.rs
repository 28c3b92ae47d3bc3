use super::*;

/// Per-token ownership entry.
#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
pub struct TokenEntry {
    /// Current owner account.
    pub owner: AccountAddress,
    /// Account authorized to receive this token, if any. Cleared on every
    /// transfer.
    pub approved: Option<AccountAddress>,
}

/// Token-ownership ledger: owner and single-token approval per token,
/// balance per account, total minted supply. Entries are never deleted.
#[derive(Serial, DeserialWithState)]
#[concordium(state_parameter = "S")]
pub struct TokenLedger<S: HasStateApi> {
    tokens: StateMap<ContractTokenId, TokenEntry, S>,
    balances: StateMap<AccountAddress, u64, S>,
    minted: u64,
}

impl<S: HasStateApi> TokenLedger<S> {
    /// Create an empty ledger.
    pub fn new(state_builder: &mut StateBuilder<S>) -> Self {
        Self {
            tokens: state_builder.new_map(),
            balances: state_builder.new_map(),
            minted: 0,
        }
    }

    /// Mint a fresh token to `owner`.
    pub fn mint(
        &mut self,
        token_id: ContractTokenId,
        owner: AccountAddress,
    ) -> Result<(), CustomContractError> {
        ensure!(
            self.tokens.get(&token_id).is_none(),
            CustomContractError::TokenIdAlreadyExists
        );
        self.tokens.insert(
            token_id,
            TokenEntry {
                owner,
                approved: None,
            },
        );
        let owned = self.balance_of(&owner);
        self.balances.insert(owner, owned + 1);
        self.minted += 1;
        Ok(())
    }

    pub fn owner_of(
        &self,
        token_id: &ContractTokenId,
    ) -> Result<AccountAddress, CustomContractError> {
        self.tokens
            .get(token_id)
            .map(|entry| entry.owner)
            .ok_or(CustomContractError::NotExistingTokenId)
    }

    pub fn approved(
        &self,
        token_id: &ContractTokenId,
    ) -> Result<Option<AccountAddress>, CustomContractError> {
        self.tokens
            .get(token_id)
            .map(|entry| entry.approved)
            .ok_or(CustomContractError::NotExistingTokenId)
    }

    pub fn balance_of(&self, account: &AccountAddress) -> u64 {
        self.balances.get(account).map(|owned| *owned).unwrap_or(0)
    }

    /// Total number of tokens minted so far.
    pub fn supply(&self) -> u64 {
        self.minted
    }

    /// Authorize `to` to receive the token. `sender` must be the current
    /// owner of the token.
    pub fn approve(
        &mut self,
        sender: &AccountAddress,
        token_id: &ContractTokenId,
        to: AccountAddress,
    ) -> Result<(), CustomContractError> {
        let mut entry_ref = self
            .tokens
            .get_mut(token_id)
            .ok_or(CustomContractError::NotExistingTokenId)?;
        let entry = entry_ref.get_mut();
        ensure_eq!(&entry.owner, sender, CustomContractError::Unauthorized);
        entry.approved = Some(to);
        Ok(())
    }

    /// Move the token from `from` to `to`, clearing the approval. `sender`
    /// must be the owner or the approved account, and `from` must hold the
    /// token.
    pub fn transfer(
        &mut self,
        sender: &AccountAddress,
        token_id: &ContractTokenId,
        from: &AccountAddress,
        to: AccountAddress,
    ) -> Result<(), ContractError> {
        {
            let mut entry_ref = self
                .tokens
                .get_mut(token_id)
                .ok_or(ContractError::InvalidTokenId)?;
            let entry = entry_ref.get_mut();
            ensure!(
                sender == &entry.owner || entry.approved.as_ref() == Some(sender),
                ContractError::Unauthorized
            );
            ensure_eq!(&entry.owner, from, ContractError::InsufficientFunds);
            entry.owner = to;
            entry.approved = None;
        }
        let held = self.balance_of(from);
        self.balances.insert(*from, held.saturating_sub(1));
        let held = self.balance_of(&to);
        self.balances.insert(to, held + 1);
        Ok(())
    }
}

#[concordium_cfg_test]
mod tests {
    use super::*;
    use concordium_std::test_infrastructure::*;

    const OWNER: AccountAddress = AccountAddress([7; 32]);
    const RECEIVER: AccountAddress = AccountAddress([8; 32]);
    const STRANGER: AccountAddress = AccountAddress([9; 32]);

    fn token_0() -> ContractTokenId {
        TokenIdVec(vec![0])
    }

    fn fresh_ledger() -> TokenLedger<TestStateApi> {
        let mut state_builder = TestStateBuilder::new();
        TokenLedger::new(&mut state_builder)
    }

    #[concordium_test]
    fn test_mint_and_views() {
        let mut ledger = fresh_ledger();

        ledger.mint(token_0(), OWNER).expect_report("Minting failed");

        claim_eq!(ledger.owner_of(&token_0()), Ok(OWNER));
        claim_eq!(ledger.approved(&token_0()), Ok(None));
        claim_eq!(ledger.balance_of(&OWNER), 1);
        claim_eq!(ledger.supply(), 1);

        claim_eq!(
            ledger.mint(token_0(), OWNER),
            Err(CustomContractError::TokenIdAlreadyExists)
        );
        claim_eq!(
            ledger.owner_of(&TokenIdVec(vec![1])),
            Err(CustomContractError::NotExistingTokenId)
        );
    }

    #[concordium_test]
    fn test_approve_requires_owner() {
        let mut ledger = fresh_ledger();
        ledger.mint(token_0(), OWNER).expect_report("Minting failed");

        claim_eq!(
            ledger.approve(&STRANGER, &token_0(), RECEIVER),
            Err(CustomContractError::Unauthorized)
        );

        ledger
            .approve(&OWNER, &token_0(), RECEIVER)
            .expect_report("Approval failed");
        claim_eq!(ledger.approved(&token_0()), Ok(Some(RECEIVER)));
    }

    #[concordium_test]
    fn test_transfer_by_approved_account() {
        let mut ledger = fresh_ledger();
        ledger.mint(token_0(), OWNER).expect_report("Minting failed");
        ledger
            .approve(&OWNER, &token_0(), RECEIVER)
            .expect_report("Approval failed");

        claim_eq!(
            ledger.transfer(&STRANGER, &token_0(), &OWNER, RECEIVER),
            Err(ContractError::Unauthorized)
        );
        claim_eq!(
            ledger.transfer(&RECEIVER, &token_0(), &STRANGER, RECEIVER),
            Err(ContractError::InsufficientFunds)
        );

        ledger
            .transfer(&RECEIVER, &token_0(), &OWNER, RECEIVER)
            .expect_report("Transfer failed");

        claim_eq!(ledger.owner_of(&token_0()), Ok(RECEIVER));
        // The approval does not survive the transfer
        claim_eq!(ledger.approved(&token_0()), Ok(None));
        claim_eq!(ledger.balance_of(&OWNER), 0);
        claim_eq!(ledger.balance_of(&RECEIVER), 1);
    }
}
