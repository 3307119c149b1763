use anchor_lang::prelude::*;

use crate::{
    authorization::{ensure_can_revoke, resolve_caller},
    constants::SMART_ACCOUNT_SEED,
    error::SmartAccountError,
    events::SessionKeyRevoked,
    instructions::{Args, RevokeSessionKeyArgs},
    state::{AdminAction, SessionKey, SmartAccount},
};

/// Revokes `args.key`. Signed by the owner, the key itself, or an active
/// master session key.
pub fn revoke_session_key(ctx: Context<RevokeSessionKey>, args: RevokeSessionKeyArgs) -> Result<()> {
    args.validate()?;

    let now = Clock::get()?.unix_timestamp;
    let account_key = ctx.accounts.smart_account.key();
    let smart_account = &mut ctx.accounts.smart_account;
    smart_account.check_nonce(args.nonce)?;

    let hash = AdminAction::RevokeSessionKey { key: args.key }.hash(&account_key, args.nonce)?;
    let domain = smart_account.domain(account_key);

    let caller_key = ctx.accounts.caller_session_key.as_deref();
    let target: &SessionKey = &ctx.accounts.session_key;
    let mut candidates = vec![target];
    candidates.extend(caller_key);

    let caller = resolve_caller(smart_account, &domain, &hash, &args.signature, &candidates)?;
    ensure_can_revoke(smart_account, &caller, &args.key, caller_key, now)?;

    ctx.accounts.session_key.revoke();
    smart_account.advance_nonce()?;

    msg!("Session key revoked: {:?}", args.key);
    emit!(SessionKeyRevoked {
        smart_account: account_key,
        key: args.key,
        revoked_by: caller,
        timestamp: now,
    });

    Ok(())
}

#[derive(Accounts)]
#[instruction(args: RevokeSessionKeyArgs)]
pub struct RevokeSessionKey<'info> {
    pub payer: Signer<'info>,

    #[account(
        mut,
        seeds = [SMART_ACCOUNT_SEED, smart_account.admin.as_ref(), smart_account.salt.to_le_bytes().as_ref()],
        bump = smart_account.bump,
    )]
    pub smart_account: Box<Account<'info, SmartAccount>>,

    /// Policy of the signer when a master session key revokes another key
    #[account(
        constraint = caller_session_key.smart_account == smart_account.key() @ SmartAccountError::SessionKeyMismatch
    )]
    pub caller_session_key: Option<Account<'info, SessionKey>>,

    #[account(
        mut,
        seeds = [SessionKey::PREFIX_SEED, smart_account.key().as_ref(), args.key.as_ref()],
        bump = session_key.bump,
    )]
    pub session_key: Box<Account<'info, SessionKey>>,
}
