use anchor_lang::prelude::*;

use crate::{
    error::SmartAccountError,
    events::{ConfigUpdated, ProgramPausedStateChanged},
    state::{Config, UpdateConfigType},
};

pub fn update_config(
    ctx: Context<UpdateConfig>,
    param: UpdateConfigType,
    value: u64,
) -> Result<()> {
    let authority = ctx.accounts.authority.key();
    let config = &mut ctx.accounts.config;

    match param {
        UpdateConfigType::TrustedRelayer => {
            let new_relayer_info = ctx
                .remaining_accounts
                .first()
                .ok_or(SmartAccountError::InsufficientAccounts)?;
            require!(
                new_relayer_info.key() != Pubkey::default(),
                SmartAccountError::ZeroAddressNotAllowed
            );

            let old = config.trusted_relayer;
            config.trusted_relayer = new_relayer_info.key();
            ConfigUpdated::emit_event(
                authority,
                "trusted_relayer",
                old.to_string(),
                config.trusted_relayer.to_string(),
            )?;
        }
        UpdateConfigType::ChainId => {
            let old = config.chain_id;
            config.chain_id = value;
            ConfigUpdated::emit_event(authority, "chain_id", old.to_string(), value.to_string())?;
        }
        UpdateConfigType::Authority => {
            let new_authority_info = ctx
                .remaining_accounts
                .first()
                .ok_or(SmartAccountError::InsufficientAccounts)?;
            require!(
                new_authority_info.key() != Pubkey::default(),
                SmartAccountError::ZeroAddressNotAllowed
            );

            config.authority = new_authority_info.key();
            ConfigUpdated::emit_event(
                authority,
                "authority",
                authority.to_string(),
                config.authority.to_string(),
            )?;
        }
        UpdateConfigType::Pause | UpdateConfigType::Unpause => {
            config.is_paused = matches!(param, UpdateConfigType::Pause);
            msg!("Program paused: {}", config.is_paused);
            emit!(ProgramPausedStateChanged {
                authority,
                is_paused: config.is_paused,
                timestamp: Clock::get()?.unix_timestamp,
            });
        }
    }

    Ok(())
}

#[derive(Accounts)]
pub struct UpdateConfig<'info> {
    /// The current authority of the program.
    #[account(mut)]
    pub authority: Signer<'info>,

    /// The program's configuration account.
    #[account(
        mut,
        seeds = [Config::PREFIX_SEED],
        bump,
        has_one = authority
    )]
    pub config: Box<Account<'info, Config>>,
}
