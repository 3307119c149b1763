use anchor_lang::prelude::*;

pub mod authorization;
pub mod constants;
pub mod error;
pub mod events;
pub mod instructions;
pub mod security;
pub mod signature;
pub mod state;
pub mod utils;

#[cfg(test)]
mod test_utils;

use authorization::ValidationData;
use instructions::*;
use state::{Batch, Call, UpdateConfigType};

declare_id!("AtJHM4jgYv8QF3fr852pCmDMoj9v91jfZWxxGmVjBYgQ");

/// Smart accounts controlled by a secp256k1 owner key, with scoped session
/// keys and a trusted relayer submitting requests on the owner's behalf
#[program]
pub mod smart_account {
    use super::*;

    /// Create the program config with the relayer and chain id given to new accounts
    pub fn initialize(ctx: Context<Initialize>, trusted_relayer: Pubkey, chain_id: u64) -> Result<()> {
        instructions::initialize(ctx, trusted_relayer, chain_id)
    }

    pub fn update_config(
        ctx: Context<UpdateConfig>,
        param: UpdateConfigType,
        value: u64,
    ) -> Result<()> {
        instructions::update_config(ctx, param, value)
    }

    /// Create the account for `(admin, nonce)`; returns the existing one if already created
    pub fn create_account(ctx: Context<CreateAccount>, admin: [u8; 20], nonce: u64) -> Result<Pubkey> {
        instructions::create_account(ctx, admin, nonce)
    }

    /// Predict the address of the account for `(admin, nonce)`
    pub fn get_address(ctx: Context<GetAddress>, admin: [u8; 20], nonce: u64) -> Result<Pubkey> {
        instructions::get_address(ctx, admin, nonce)
    }

    pub fn register_session_key(
        ctx: Context<RegisterSessionKey>,
        args: RegisterSessionKeyArgs,
    ) -> Result<()> {
        instructions::register_session_key(ctx, args)
    }

    pub fn revoke_session_key(ctx: Context<RevokeSessionKey>, args: RevokeSessionKeyArgs) -> Result<()> {
        instructions::revoke_session_key(ctx, args)
    }

    pub fn propose_transfer(ctx: Context<ManageOwnership>, args: ProposeTransferArgs) -> Result<()> {
        instructions::propose_transfer(ctx, args)
    }

    pub fn accept_ownership(ctx: Context<ManageOwnership>, args: AcceptOwnershipArgs) -> Result<()> {
        instructions::accept_ownership(ctx, args)
    }

    pub fn update_trusted_relayer(
        ctx: Context<ManageOwnership>,
        args: UpdateTrustedRelayerArgs,
    ) -> Result<()> {
        instructions::update_trusted_relayer(ctx, args)
    }

    /// Relayer entrypoint: authorize a signed request and record it for execution
    pub fn validate_request(
        ctx: Context<ValidateRequest>,
        args: RequestArgs,
    ) -> Result<ValidationData> {
        instructions::validate_request(ctx, args)
    }

    /// Execute a single authorized call
    pub fn execute<'c: 'info, 'info>(
        ctx: Context<'_, '_, 'c, 'info, ExecuteAuthorized<'info>>,
        target: Pubkey,
        value: u64,
        data: Vec<u8>,
        account_count: u8,
    ) -> Result<()> {
        instructions::execute(
            ctx,
            Call {
                target,
                value,
                data,
                account_count,
            },
        )
    }

    /// Execute an authorized batch, all or nothing
    pub fn execute_batch<'c: 'info, 'info>(
        ctx: Context<'_, '_, 'c, 'info, ExecuteAuthorized<'info>>,
        targets: Vec<Pubkey>,
        values: Vec<u64>,
        data: Vec<Vec<u8>>,
        account_counts: Vec<u8>,
    ) -> Result<()> {
        instructions::execute_batch(
            ctx,
            Batch {
                targets,
                values,
                data,
                account_counts,
            },
        )
    }

    /// Execute an owner-signed request without the relayer
    pub fn execute_direct<'c: 'info, 'info>(
        ctx: Context<'_, '_, 'c, 'info, ExecuteDirect<'info>>,
        args: RequestArgs,
    ) -> Result<()> {
        instructions::execute_direct(ctx, args)
    }

    pub fn is_valid_signature(
        ctx: Context<IsValidSignature>,
        hash: [u8; 32],
        signature: Vec<u8>,
    ) -> Result<[u8; 4]> {
        instructions::is_valid_signature(ctx, hash, signature)
    }
}
