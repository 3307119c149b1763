use crate::error::SmartAccountError;
use crate::security::validation;
use crate::signature::SIGNATURE_LENGTH;
use crate::state::{Payload, SessionKeyParams};
use anchor_lang::prelude::*;

pub trait Args {
    fn validate(&self) -> Result<()>;
}

/// Signed execution request, relayed or submitted directly by the owner
#[derive(AnchorSerialize, AnchorDeserialize, Clone)]
pub struct RequestArgs {
    pub nonce: u64,
    pub payload: Payload,
    pub signature: Vec<u8>,
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone)]
pub struct RegisterSessionKeyArgs {
    pub nonce: u64,
    pub params: SessionKeyParams,
    pub signature: Vec<u8>,
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone)]
pub struct RevokeSessionKeyArgs {
    pub nonce: u64,
    pub key: [u8; 20],
    pub signature: Vec<u8>,
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone)]
pub struct ProposeTransferArgs {
    pub nonce: u64,
    pub new_owner: [u8; 20],
    pub signature: Vec<u8>,
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone)]
pub struct AcceptOwnershipArgs {
    pub nonce: u64,
    pub signature: Vec<u8>,
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone)]
pub struct UpdateTrustedRelayerArgs {
    pub nonce: u64,
    pub new_relayer: Pubkey,
    pub signature: Vec<u8>,
}

macro_rules! impl_args_validate {
    ($t:ty) => {
        impl Args for $t {
            fn validate(&self) -> Result<()> {
                require!(
                    self.signature.len() == SIGNATURE_LENGTH,
                    SmartAccountError::InvalidSignature
                );
                Ok(())
            }
        }
    };
}

impl Args for RequestArgs {
    fn validate(&self) -> Result<()> {
        require!(
            self.signature.len() == SIGNATURE_LENGTH,
            SmartAccountError::InvalidSignature
        );
        // Arity and size checks run before any signature work
        validation::validate_calls(&self.payload.calls()?)?;
        Ok(())
    }
}

impl_args_validate!(RegisterSessionKeyArgs);
impl_args_validate!(RevokeSessionKeyArgs);
impl_args_validate!(ProposeTransferArgs);
impl_args_validate!(AcceptOwnershipArgs);
impl_args_validate!(UpdateTrustedRelayerArgs);
