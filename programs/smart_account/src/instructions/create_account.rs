use anchor_lang::prelude::*;

use crate::{
    constants::{SignerAddress, SMART_ACCOUNT_SEED},
    error::SmartAccountError,
    events::AccountCreated,
    state::{Config, SmartAccount},
};

/// Creates the account for `(admin, nonce)`, or returns the existing one
/// untouched.
pub fn create_account(
    ctx: Context<CreateAccount>,
    admin: SignerAddress,
    nonce: u64,
) -> Result<Pubkey> {
    let account_key = ctx.accounts.smart_account.key();

    if ctx.accounts.smart_account.is_initialized() {
        msg!("Smart account already exists: {}", account_key);
        return Ok(account_key);
    }

    require!(
        !ctx.accounts.config.is_paused,
        SmartAccountError::ProgramPaused
    );

    let trusted_relayer = ctx.accounts.config.trusted_relayer;
    let chain_id = ctx.accounts.config.chain_id;
    let created = ctx.accounts.smart_account.create_if_absent(
        admin,
        nonce,
        trusted_relayer,
        chain_id,
        ctx.bumps.smart_account,
    )?;

    if created {
        msg!("Smart account created: {}", account_key);
        AccountCreated::emit_event(account_key, admin, nonce, trusted_relayer)?;
    }

    Ok(account_key)
}

/// Address `create_account` would return for `(admin, nonce)`
pub fn get_address(_ctx: Context<GetAddress>, admin: SignerAddress, nonce: u64) -> Result<Pubkey> {
    Ok(SmartAccount::address(&admin, nonce).0)
}

#[derive(Accounts)]
#[instruction(admin: [u8; 20], nonce: u64)]
pub struct CreateAccount<'info> {
    #[account(mut)]
    pub payer: Signer<'info>,

    #[account(seeds = [Config::PREFIX_SEED], bump)]
    pub config: Box<Account<'info, Config>>,

    #[account(
        init_if_needed,
        payer = payer,
        space = 8 + SmartAccount::INIT_SPACE,
        seeds = [SMART_ACCOUNT_SEED, admin.as_ref(), nonce.to_le_bytes().as_ref()],
        bump
    )]
    pub smart_account: Box<Account<'info, SmartAccount>>,

    pub system_program: Program<'info, System>,
}

#[derive(Accounts)]
pub struct GetAddress {}
