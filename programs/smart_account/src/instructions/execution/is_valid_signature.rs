use anchor_lang::prelude::*;

use crate::{
    authorization::check_signature,
    constants::SMART_ACCOUNT_SEED,
    state::{SessionKey, SmartAccount},
};

/// Returns the acceptance magic when `signature` over `hash` comes from the
/// owner or the supplied active session key, and the rejection value
/// otherwise.
pub fn is_valid_signature(
    ctx: Context<IsValidSignature>,
    hash: [u8; 32],
    signature: Vec<u8>,
) -> Result<[u8; 4]> {
    let now = Clock::get()?.unix_timestamp;
    let smart_account = &ctx.accounts.smart_account;
    let domain = smart_account.domain(smart_account.key());

    Ok(check_signature(
        smart_account,
        &domain,
        &hash,
        &signature,
        ctx.accounts.session_key.as_deref(),
        now,
    ))
}

#[derive(Accounts)]
pub struct IsValidSignature<'info> {
    #[account(
        seeds = [SMART_ACCOUNT_SEED, smart_account.admin.as_ref(), smart_account.salt.to_le_bytes().as_ref()],
        bump = smart_account.bump,
    )]
    pub smart_account: Box<Account<'info, SmartAccount>>,

    /// Policy to check besides the owner; ignored unless registered on `smart_account`
    pub session_key: Option<Account<'info, SessionKey>>,
}
