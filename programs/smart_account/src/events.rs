use anchor_lang::prelude::*;

use crate::state::Authority;

/// Event emitted when the factory creates a smart account
#[event]
pub struct AccountCreated {
    pub account: Pubkey,
    pub admin: [u8; 20],
    pub nonce: u64,
    pub trusted_relayer: Pubkey,
    pub timestamp: i64,
}

/// Event emitted when a session key is registered or re-registered
#[event]
pub struct SessionKeyRegistered {
    pub smart_account: Pubkey,
    pub key: [u8; 20],
    pub valid_after: i64,
    pub valid_until: i64,
    pub limit: u64,
    pub is_master_key: bool,
    pub registered_by: [u8; 20],
    pub timestamp: i64,
}

#[event]
pub struct SessionKeyRevoked {
    pub smart_account: Pubkey,
    pub key: [u8; 20],
    pub revoked_by: [u8; 20],
    pub timestamp: i64,
}

#[event]
pub struct OwnershipTransferStarted {
    pub smart_account: Pubkey,
    pub owner: [u8; 20],
    pub pending_owner: [u8; 20],
    pub timestamp: i64,
}

#[event]
pub struct OwnershipTransferred {
    pub smart_account: Pubkey,
    pub previous_owner: [u8; 20],
    pub new_owner: [u8; 20],
    pub timestamp: i64,
}

#[event]
pub struct TrustedRelayerUpdated {
    pub smart_account: Pubkey,
    pub old_relayer: Pubkey,
    pub new_relayer: Pubkey,
    pub timestamp: i64,
}

/// Event emitted when the relayer gets a request authorized
#[event]
pub struct RequestAuthorized {
    pub smart_account: Pubkey,
    pub nonce: u64,
    pub signer: [u8; 20],
    pub authority: Authority,
    pub valid_until: i64,
    pub timestamp: i64,
}

/// Event emitted after every sub-call of a request succeeded
#[event]
pub struct RequestExecuted {
    pub smart_account: Pubkey,
    pub nonce: u64,
    pub call_count: u8,
    pub relayed: bool,
    pub timestamp: i64,
}

/// Event emitted when program configuration is updated
#[event]
pub struct ConfigUpdated {
    pub authority: Pubkey,
    pub update_type: String,
    pub old_value: String,
    pub new_value: String,
    pub timestamp: i64,
}

/// Event emitted when program is initialized
#[event]
pub struct ProgramInitialized {
    pub authority: Pubkey,
    pub trusted_relayer: Pubkey,
    pub chain_id: u64,
    pub timestamp: i64,
}

/// Event emitted when program is paused/unpaused
#[event]
pub struct ProgramPausedStateChanged {
    pub authority: Pubkey,
    pub is_paused: bool,
    pub timestamp: i64,
}

// Helper functions for emitting events

impl AccountCreated {
    pub fn emit_event(
        account: Pubkey,
        admin: [u8; 20],
        nonce: u64,
        trusted_relayer: Pubkey,
    ) -> Result<()> {
        emit!(Self {
            account,
            admin,
            nonce,
            trusted_relayer,
            timestamp: Clock::get()?.unix_timestamp,
        });
        Ok(())
    }
}

impl RequestExecuted {
    pub fn emit_event(smart_account: Pubkey, nonce: u64, call_count: usize, relayed: bool) -> Result<()> {
        emit!(Self {
            smart_account,
            nonce,
            // Batches are capped well below u8::MAX
            call_count: call_count as u8,
            relayed,
            timestamp: Clock::get()?.unix_timestamp,
        });
        Ok(())
    }
}

impl ConfigUpdated {
    pub fn emit_event(
        authority: Pubkey,
        update_type: &str,
        old_value: String,
        new_value: String,
    ) -> Result<()> {
        emit!(Self {
            authority,
            update_type: update_type.to_string(),
            old_value,
            new_value,
            timestamp: Clock::get()?.unix_timestamp,
        });
        Ok(())
    }
}
