use anchor_lang::prelude::*;

use crate::{
    authorization::{ensure_can_register, resolve_caller},
    constants::SMART_ACCOUNT_SEED,
    error::SmartAccountError,
    events::SessionKeyRegistered,
    instructions::{Args, RegisterSessionKeyArgs},
    state::{AdminAction, SessionKey, SmartAccount},
};

/// Registers `args.params.key`, overwriting any earlier policy for the same
/// key. Signed by the owner or an active master session key.
pub fn register_session_key(
    ctx: Context<RegisterSessionKey>,
    args: RegisterSessionKeyArgs,
) -> Result<()> {
    args.validate()?;
    args.params.validate()?;

    let now = Clock::get()?.unix_timestamp;
    let account_key = ctx.accounts.smart_account.key();
    let smart_account = &mut ctx.accounts.smart_account;
    smart_account.check_nonce(args.nonce)?;

    let hash = AdminAction::RegisterSessionKey(args.params.clone()).hash(&account_key, args.nonce)?;
    let domain = smart_account.domain(account_key);

    let caller_key = ctx.accounts.caller_session_key.as_deref();
    let candidates: Vec<&SessionKey> = caller_key.into_iter().collect();
    let caller = resolve_caller(smart_account, &domain, &hash, &args.signature, &candidates)?;
    ensure_can_register(smart_account, &caller, caller_key, now)?;

    let session_key = &mut ctx.accounts.session_key;
    session_key.configure(account_key, args.params, ctx.bumps.session_key)?;
    smart_account.advance_nonce()?;

    msg!("Session key registered: {:?}", session_key.key);
    emit!(SessionKeyRegistered {
        smart_account: account_key,
        key: session_key.key,
        valid_after: session_key.valid_after,
        valid_until: session_key.valid_until,
        limit: session_key.limit,
        is_master_key: session_key.is_master_key,
        registered_by: caller,
        timestamp: now,
    });

    Ok(())
}

#[derive(Accounts)]
#[instruction(args: RegisterSessionKeyArgs)]
pub struct RegisterSessionKey<'info> {
    #[account(mut)]
    pub payer: Signer<'info>,

    #[account(
        mut,
        seeds = [SMART_ACCOUNT_SEED, smart_account.admin.as_ref(), smart_account.salt.to_le_bytes().as_ref()],
        bump = smart_account.bump,
    )]
    pub smart_account: Box<Account<'info, SmartAccount>>,

    /// Policy of the signer when a master session key registers
    #[account(
        constraint = caller_session_key.smart_account == smart_account.key() @ SmartAccountError::SessionKeyMismatch
    )]
    pub caller_session_key: Option<Account<'info, SessionKey>>,

    #[account(
        init_if_needed,
        payer = payer,
        space = 8 + SessionKey::INIT_SPACE,
        seeds = [SessionKey::PREFIX_SEED, smart_account.key().as_ref(), args.params.key.as_ref()],
        bump
    )]
    pub session_key: Box<Account<'info, SessionKey>>,

    pub system_program: Program<'info, System>,
}
