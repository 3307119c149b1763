use anchor_lang::prelude::*;

use crate::{error::SmartAccountError, events::ProgramInitialized, state::Config};

pub fn initialize(ctx: Context<Initialize>, trusted_relayer: Pubkey, chain_id: u64) -> Result<()> {
    require!(
        trusted_relayer != Pubkey::default(),
        SmartAccountError::ZeroAddressNotAllowed
    );

    ctx.accounts.config.set_inner(Config {
        authority: ctx.accounts.signer.key(),
        trusted_relayer,
        chain_id,
        is_paused: false,
    });

    emit!(ProgramInitialized {
        authority: ctx.accounts.signer.key(),
        trusted_relayer,
        chain_id,
        timestamp: Clock::get()?.unix_timestamp,
    });

    Ok(())
}

#[derive(Accounts)]
pub struct Initialize<'info> {
    #[account(mut)]
    pub signer: Signer<'info>,

    #[account(
        init,
        payer = signer,
        space = 8 + Config::INIT_SPACE,
        seeds = [Config::PREFIX_SEED],
        bump
    )]
    pub config: Box<Account<'info, Config>>,

    pub system_program: Program<'info, System>,
}
