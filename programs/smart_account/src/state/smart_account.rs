use anchor_lang::prelude::*;

use crate::constants::{SignerAddress, SMART_ACCOUNT_SEED, ZERO_ADDRESS};
use crate::error::SmartAccountError;
use crate::signature::Domain;
use crate::utils::PdaSigner;
use crate::ID;

/// State of a single smart account.
/// The PDA holding this data is also the account's lamport vault and the
/// signer of every sub-call it executes.
#[account]
#[derive(Default, Debug, InitSpace)]
pub struct SmartAccount {
    /// Current administrative signer
    pub owner: [u8; 20],
    /// Proposed successor, zero when no transfer is pending
    pub pending_owner: [u8; 20],
    /// The only key allowed to call the validation entrypoint
    pub trusted_relayer: Pubkey,
    /// Factory admin the address was derived from
    pub admin: [u8; 20],
    /// Factory nonce the address was derived from
    pub salt: u64,
    pub chain_id: u64,
    /// Replay counter shared by relayed and direct signed messages
    pub nonce: u64,
    pub bump: u8,
}

impl SmartAccount {
    /// Deterministic address of the account for `(admin, nonce)`.
    /// Identical before and after the account is created.
    pub fn address(admin: &SignerAddress, nonce: u64) -> (Pubkey, u8) {
        Pubkey::find_program_address(&[SMART_ACCOUNT_SEED, admin, &nonce.to_le_bytes()], &ID)
    }

    pub fn is_initialized(&self) -> bool {
        self.owner != ZERO_ADDRESS
    }

    pub fn initialize(
        &mut self,
        admin: SignerAddress,
        salt: u64,
        trusted_relayer: Pubkey,
        chain_id: u64,
        bump: u8,
    ) -> Result<()> {
        require!(admin != ZERO_ADDRESS, SmartAccountError::ZeroAddressNotAllowed);
        require!(
            trusted_relayer != Pubkey::default(),
            SmartAccountError::ZeroAddressNotAllowed
        );

        *self = SmartAccount {
            owner: admin,
            pending_owner: ZERO_ADDRESS,
            trusted_relayer,
            admin,
            salt,
            chain_id,
            nonce: 0,
            bump,
        };
        Ok(())
    }

    /// Initializes a fresh account. Returns `false` and changes nothing when
    /// the account already exists.
    pub fn create_if_absent(
        &mut self,
        admin: SignerAddress,
        salt: u64,
        trusted_relayer: Pubkey,
        chain_id: u64,
        bump: u8,
    ) -> Result<bool> {
        if self.is_initialized() {
            return Ok(false);
        }
        self.initialize(admin, salt, trusted_relayer, chain_id, bump)?;
        Ok(true)
    }

    pub fn is_owner(&self, caller: &SignerAddress) -> bool {
        self.owner == *caller
    }

    pub fn domain(&self, account_key: Pubkey) -> Domain {
        Domain::new(self.chain_id, account_key)
    }

    pub fn signer(&self) -> PdaSigner {
        PdaSigner {
            seeds: vec![
                SMART_ACCOUNT_SEED.to_vec(),
                self.admin.to_vec(),
                self.salt.to_le_bytes().to_vec(),
            ],
            bump: self.bump,
        }
    }

    pub fn check_nonce(&self, nonce: u64) -> Result<()> {
        require!(nonce == self.nonce, SmartAccountError::InvalidNonce);
        Ok(())
    }

    pub fn advance_nonce(&mut self) -> Result<()> {
        self.nonce = self
            .nonce
            .checked_add(1)
            .ok_or(SmartAccountError::NonceOverflow)?;
        Ok(())
    }

    /// Starts a transfer. The current owner keeps full authority until the
    /// proposed owner accepts. Proposing the zero address cancels.
    pub fn propose_transfer(
        &mut self,
        caller: &SignerAddress,
        new_owner: SignerAddress,
    ) -> Result<()> {
        require!(self.is_owner(caller), SmartAccountError::Unauthorized);
        self.pending_owner = new_owner;
        Ok(())
    }

    /// Completes a transfer. Returns the previous owner.
    pub fn accept_ownership(&mut self, caller: &SignerAddress) -> Result<SignerAddress> {
        require!(
            self.pending_owner != ZERO_ADDRESS && self.pending_owner == *caller,
            SmartAccountError::Unauthorized
        );
        let previous = self.owner;
        self.owner = self.pending_owner;
        self.pending_owner = ZERO_ADDRESS;
        Ok(previous)
    }

    pub fn update_trusted_relayer(
        &mut self,
        caller: &SignerAddress,
        new_relayer: Pubkey,
    ) -> Result<()> {
        require!(self.is_owner(caller), SmartAccountError::Unauthorized);
        require!(
            new_relayer != Pubkey::default(),
            SmartAccountError::ZeroAddressNotAllowed
        );
        self.trusted_relayer = new_relayer;
        Ok(())
    }
}
