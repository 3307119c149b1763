use anchor_lang::prelude::*;

use crate::{
    authorization::{authorize_request, ValidationData},
    constants::SMART_ACCOUNT_SEED,
    error::SmartAccountError,
    events::RequestAuthorized,
    instructions::{Args, RequestArgs},
    state::{request_hash, AuthorizedRequest, Config, SessionKey, SmartAccount},
};

/// First phase of a relayed request. Verifies the signature, spends the
/// session key budget and records the authorization for `execute`.
///
/// The budget stays spent even if the execution later fails.
pub fn validate_request(ctx: Context<ValidateRequest>, args: RequestArgs) -> Result<ValidationData> {
    require!(
        !ctx.accounts.config.is_paused,
        SmartAccountError::ProgramPaused
    );
    args.validate()?;

    let now = Clock::get()?.unix_timestamp;
    let account_key = ctx.accounts.smart_account.key();
    let smart_account = &mut ctx.accounts.smart_account;
    smart_account.check_nonce(args.nonce)?;

    let hash = request_hash(&account_key, args.nonce, &args.payload)?;
    let domain = smart_account.domain(account_key);
    let authorization = authorize_request(
        smart_account,
        &domain,
        ctx.accounts.session_key.as_deref_mut(),
        &hash,
        &args.signature,
        &args.payload.targets(),
        now,
    )?;
    let validation_data = authorization.validation_data();

    let record = AuthorizedRequest::new(
        account_key,
        args.nonce,
        &args.payload,
        &authorization,
        ctx.accounts.relayer.key(),
    )?;
    ctx.accounts.authorized_request.set_inner(record);
    smart_account.advance_nonce()?;

    msg!("Request {} authorized for {}", args.nonce, account_key);
    emit!(RequestAuthorized {
        smart_account: account_key,
        nonce: args.nonce,
        signer: authorization.signer(),
        authority: validation_data.authority,
        valid_until: validation_data.valid_until,
        timestamp: now,
    });

    Ok(validation_data)
}

#[derive(Accounts)]
#[instruction(args: RequestArgs)]
pub struct ValidateRequest<'info> {
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

    /// Policy of the signing session key; omitted when the owner signed
    #[account(
        mut,
        constraint = session_key.smart_account == smart_account.key() @ SmartAccountError::SessionKeyMismatch
    )]
    pub session_key: Option<Account<'info, SessionKey>>,

    #[account(
        init,
        payer = relayer,
        space = 8 + AuthorizedRequest::INIT_SPACE,
        seeds = [AuthorizedRequest::PREFIX_SEED, smart_account.key().as_ref(), args.nonce.to_le_bytes().as_ref()],
        bump
    )]
    pub authorized_request: Box<Account<'info, AuthorizedRequest>>,

    pub system_program: Program<'info, System>,
}
