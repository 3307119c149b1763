use anchor_lang::prelude::*;

use crate::{
    constants::SMART_ACCOUNT_SEED,
    error::SmartAccountError,
    events::RequestExecuted,
    state::{AuthorizedRequest, Batch, Call, Config, Payload, SmartAccount},
    utils::execute_calls,
};

/// Second phase of a relayed request: runs a single call.
pub fn execute<'c: 'info, 'info>(
    ctx: Context<'_, '_, 'c, 'info, ExecuteAuthorized<'info>>,
    call: Call,
) -> Result<()> {
    execute_authorized(ctx, Payload::Single(call))
}

/// Second phase of a relayed request: runs every call in order, all or
/// nothing.
pub fn execute_batch<'c: 'info, 'info>(
    ctx: Context<'_, '_, 'c, 'info, ExecuteAuthorized<'info>>,
    batch: Batch,
) -> Result<()> {
    execute_authorized(ctx, Payload::Batch(batch))
}

fn execute_authorized<'c: 'info, 'info>(
    ctx: Context<'_, '_, 'c, 'info, ExecuteAuthorized<'info>>,
    payload: Payload,
) -> Result<()> {
    require!(
        !ctx.accounts.config.is_paused,
        SmartAccountError::ProgramPaused
    );

    let calls = payload.calls()?;
    let now = Clock::get()?.unix_timestamp;
    ctx.accounts.authorized_request.check(&payload, now)?;
    let nonce = ctx.accounts.authorized_request.nonce;

    // The record is consumed before any sub-call can observe the account
    ctx.accounts
        .authorized_request
        .close(ctx.accounts.rent_refund.to_account_info())?;

    let smart_account_info = ctx.accounts.smart_account.to_account_info();
    let signer = ctx.accounts.smart_account.signer();
    execute_calls(&smart_account_info, &signer, &calls, ctx.remaining_accounts)?;

    msg!("Request {} executed: {} call(s)", nonce, calls.len());
    RequestExecuted::emit_event(smart_account_info.key(), nonce, calls.len(), true)?;

    Ok(())
}

#[derive(Accounts)]
pub struct ExecuteAuthorized<'info> {
    #[account(
        mut,
        seeds = [SMART_ACCOUNT_SEED, smart_account.admin.as_ref(), smart_account.salt.to_le_bytes().as_ref()],
        bump = smart_account.bump,
    )]
    pub smart_account: Box<Account<'info, SmartAccount>>,

    #[account(
        mut,
        address = smart_account.trusted_relayer @ SmartAccountError::Unauthorized
    )]
    pub relayer: Signer<'info>,

    #[account(seeds = [Config::PREFIX_SEED], bump)]
    pub config: Box<Account<'info, Config>>,

    #[account(
        mut,
        seeds = [AuthorizedRequest::PREFIX_SEED, smart_account.key().as_ref(), authorized_request.nonce.to_le_bytes().as_ref()],
        bump,
        constraint = authorized_request.smart_account == smart_account.key() @ SmartAccountError::AccountMismatch
    )]
    pub authorized_request: Box<Account<'info, AuthorizedRequest>>,

    /// CHECK: receives the record's rent; must be the payer recorded at validation
    #[account(mut, address = authorized_request.rent_refund_to)]
    pub rent_refund: UncheckedAccount<'info>,
}
