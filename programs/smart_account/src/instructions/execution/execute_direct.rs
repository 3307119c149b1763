use anchor_lang::prelude::*;

use crate::{
    authorization::resolve_caller,
    constants::SMART_ACCOUNT_SEED,
    error::SmartAccountError,
    events::RequestExecuted,
    instructions::{Args, RequestArgs},
    state::{request_hash, Config, SmartAccount},
    utils::execute_calls,
};

/// Owner-signed execution without the relayer. Session keys cannot use this
/// path.
pub fn execute_direct<'c: 'info, 'info>(
    ctx: Context<'_, '_, 'c, 'info, ExecuteDirect<'info>>,
    args: RequestArgs,
) -> Result<()> {
    require!(
        !ctx.accounts.config.is_paused,
        SmartAccountError::ProgramPaused
    );
    args.validate()?;

    let account_key = ctx.accounts.smart_account.key();
    let smart_account = &mut ctx.accounts.smart_account;
    smart_account.check_nonce(args.nonce)?;

    let hash = request_hash(&account_key, args.nonce, &args.payload)?;
    let domain = smart_account.domain(account_key);
    let caller = resolve_caller(smart_account, &domain, &hash, &args.signature, &[])?;
    require!(smart_account.is_owner(&caller), SmartAccountError::Unauthorized);

    smart_account.advance_nonce()?;

    let calls = args.payload.calls()?;
    let signer = smart_account.signer();
    let smart_account_info = smart_account.to_account_info();
    execute_calls(&smart_account_info, &signer, &calls, ctx.remaining_accounts)?;

    RequestExecuted::emit_event(account_key, args.nonce, calls.len(), false)?;
    Ok(())
}

#[derive(Accounts)]
pub struct ExecuteDirect<'info> {
    #[account(mut)]
    pub payer: Signer<'info>,

    #[account(
        mut,
        seeds = [SMART_ACCOUNT_SEED, smart_account.admin.as_ref(), smart_account.salt.to_le_bytes().as_ref()],
        bump = smart_account.bump,
    )]
    pub smart_account: Box<Account<'info, SmartAccount>>,

    #[account(seeds = [Config::PREFIX_SEED], bump)]
    pub config: Box<Account<'info, Config>>,
}
