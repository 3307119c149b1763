//! Authorization gate: decides who signed a request and whether that signer
//! may act on the account right now.

use anchor_lang::prelude::*;

use crate::constants::{SignerAddress, INVALID_SIGNATURE_MAGIC, VALID_SIGNATURE_MAGIC, ZERO_ADDRESS};
use crate::error::SmartAccountError;
use crate::signature::{resolve_signer, Domain, RecoverableSignature, SignatureMode};
use crate::state::{Authority, SessionKey, SmartAccount};

/// Outcome of a successful authorization
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Authorization {
    Owner {
        signer: SignerAddress,
    },
    SessionKey {
        signer: SignerAddress,
        valid_after: i64,
        valid_until: i64,
    },
}

/// Returned to the relayer by `validate_request`
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct ValidationData {
    pub authority: Authority,
    pub valid_after: i64,
    /// 0 when the authorization is not time bounded
    pub valid_until: i64,
}

impl Authorization {
    pub fn signer(&self) -> SignerAddress {
        match self {
            Authorization::Owner { signer } | Authorization::SessionKey { signer, .. } => *signer,
        }
    }

    pub fn authority(&self) -> Authority {
        match self {
            Authorization::Owner { .. } => Authority::Owner,
            Authorization::SessionKey { .. } => Authority::SessionKey,
        }
    }

    pub fn validation_data(&self) -> ValidationData {
        match *self {
            Authorization::Owner { .. } => ValidationData {
                authority: Authority::Owner,
                valid_after: 0,
                valid_until: 0,
            },
            Authorization::SessionKey {
                valid_after,
                valid_until,
                ..
            } => ValidationData {
                authority: Authority::SessionKey,
                valid_after,
                valid_until,
            },
        }
    }
}

/// Tries each encoding in resolution order and returns the first recovered
/// signer found among `candidates`.
pub fn resolve_known_signer(
    domain: &Domain,
    hash: &[u8; 32],
    signature: &RecoverableSignature,
    candidates: &[SignerAddress],
) -> Result<Option<SignerAddress>> {
    for mode in SignatureMode::RESOLUTION_ORDER {
        let signer = resolve_signer(mode, domain, hash, signature)?;
        if signer != ZERO_ADDRESS && candidates.contains(&signer) {
            return Ok(Some(signer));
        }
    }
    Ok(None)
}

/// Authorizes an execution request.
///
/// The owner is authorized without touching any session key. A session key
/// signer goes through `check_and_consume`, so on success its budget is
/// already spent when this returns. Any error leaves `session_key` unchanged.
pub fn authorize_request(
    account: &SmartAccount,
    domain: &Domain,
    session_key: Option<&mut SessionKey>,
    request_hash: &[u8; 32],
    signature: &[u8],
    targets: &[Pubkey],
    now: i64,
) -> Result<Authorization> {
    let signature = RecoverableSignature::parse(signature)?;

    let mut candidates = vec![account.owner];
    if let Some(policy) = session_key.as_deref().filter(|policy| policy.is_registered()) {
        candidates.push(policy.key);
    }

    let signer = resolve_known_signer(domain, request_hash, &signature, &candidates)?
        .ok_or(SmartAccountError::UnknownSigner)?;

    if account.is_owner(&signer) {
        return Ok(Authorization::Owner { signer });
    }

    let policy = session_key.ok_or(SmartAccountError::UnknownSigner)?;
    policy.check_and_consume(now, targets)?;

    Ok(Authorization::SessionKey {
        signer,
        valid_after: policy.valid_after,
        valid_until: policy.valid_until,
    })
}

/// Resolves the caller of an administrative message.
///
/// Known principals (owner, pending owner, supplied session keys) are matched
/// across all encodings; anyone else resolves to the raw-mode signer, which
/// then fails the role checks.
pub fn resolve_caller(
    account: &SmartAccount,
    domain: &Domain,
    hash: &[u8; 32],
    signature: &[u8],
    session_keys: &[&SessionKey],
) -> Result<SignerAddress> {
    let signature = RecoverableSignature::parse(signature)?;

    let mut candidates = vec![account.owner, account.pending_owner];
    candidates.extend(
        session_keys
            .iter()
            .filter(|policy| policy.is_registered())
            .map(|policy| policy.key),
    );

    match resolve_known_signer(domain, hash, &signature, &candidates)? {
        Some(caller) => Ok(caller),
        None => resolve_signer(SignatureMode::Raw, domain, hash, &signature),
    }
}

/// Owner or an active master session key
pub fn ensure_can_register(
    account: &SmartAccount,
    caller: &SignerAddress,
    caller_key: Option<&SessionKey>,
    now: i64,
) -> Result<()> {
    let is_master = caller_key.map_or(false, |policy| policy.is_active_master(caller, now));
    require!(
        account.is_owner(caller) || is_master,
        SmartAccountError::Unauthorized
    );
    Ok(())
}

/// Owner, the key itself, or an active master session key
pub fn ensure_can_revoke(
    account: &SmartAccount,
    caller: &SignerAddress,
    key: &SignerAddress,
    caller_key: Option<&SessionKey>,
    now: i64,
) -> Result<()> {
    if caller == key {
        return Ok(());
    }
    ensure_can_register(account, caller, caller_key, now)
}

/// Signature check for third parties. Never fails: malformed or unknown
/// signatures yield the rejection value.
pub fn check_signature(
    account: &SmartAccount,
    domain: &Domain,
    hash: &[u8; 32],
    signature: &[u8],
    session_key: Option<&SessionKey>,
    now: i64,
) -> [u8; 4] {
    let Ok(signature) = RecoverableSignature::parse(signature) else {
        return INVALID_SIGNATURE_MAGIC;
    };

    // A policy registered on another account is ignored
    let mut candidates = vec![account.owner];
    if let Some(policy) = session_key.filter(|policy| {
        policy.smart_account == domain.verifying_contract && policy.is_active(now)
    }) {
        candidates.push(policy.key);
    }

    match resolve_known_signer(domain, hash, &signature, &candidates) {
        Ok(Some(_)) => VALID_SIGNATURE_MAGIC,
        _ => INVALID_SIGNATURE_MAGIC,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instructions::{Args, RequestArgs};
    use crate::state::{request_hash, Batch, Call, Payload};
    use crate::test_utils::{account_key, assert_error, registered_key, test_account, TestSigner};

    const NOW: i64 = 1_000;

    struct Fixture {
        owner: TestSigner,
        session: TestSigner,
        account: SmartAccount,
        domain: Domain,
    }

    fn fixture() -> Fixture {
        let owner = TestSigner::new(1);
        let session = TestSigner::new(2);
        let account = test_account(owner.address());
        let domain = account.domain(account_key());
        Fixture {
            owner,
            session,
            account,
            domain,
        }
    }

    fn single(target: Pubkey) -> Payload {
        Payload::Single(Call {
            target,
            value: 0,
            data: vec![0xde, 0xad],
            account_count: 1,
        })
    }

    fn batch(targets: Vec<Pubkey>) -> Payload {
        let len = targets.len();
        Payload::Batch(Batch {
            targets,
            values: vec![0; len],
            data: vec![vec![1]; len],
            account_counts: vec![1; len],
        })
    }

    fn hash(payload: &Payload, nonce: u64) -> [u8; 32] {
        request_hash(&account_key(), nonce, payload).unwrap()
    }

    #[test]
    fn owner_is_authorized_in_every_mode() {
        let f = fixture();
        let payload = single(Pubkey::new_unique());
        let h = hash(&payload, 0);

        for mode in SignatureMode::RESOLUTION_ORDER {
            let sig = f.owner.sign(mode, &f.domain, &h);
            let auth = authorize_request(&f.account, &f.domain, None, &h, &sig, &payload.targets(), NOW)
                .unwrap();
            assert_eq!(
                auth,
                Authorization::Owner {
                    signer: f.owner.address()
                }
            );
            assert_eq!(auth.validation_data().valid_until, 0);
        }
    }

    #[test]
    fn owner_path_leaves_session_keys_alone() {
        let f = fixture();
        let mut key = registered_key(f.owner.address(), 0, 2_000, Some(1), Some(vec![]));
        let payload = single(Pubkey::new_unique());
        let h = hash(&payload, 0);
        let sig = f.owner.sign(SignatureMode::Raw, &f.domain, &h);

        let auth = authorize_request(
            &f.account,
            &f.domain,
            Some(&mut key),
            &h,
            &sig,
            &payload.targets(),
            NOW,
        )
        .unwrap();
        assert_eq!(auth.authority(), Authority::Owner);
        assert_eq!(key.limit, 1);
    }

    #[test]
    fn structured_signature_for_another_chain_is_denied() {
        let f = fixture();
        let payload = single(Pubkey::new_unique());
        let h = hash(&payload, 0);
        let foreign = Domain::new(f.domain.chain_id + 1, f.domain.verifying_contract);
        let sig = f.owner.sign(SignatureMode::StructuredDomain, &foreign, &h);

        assert_error(
            authorize_request(&f.account, &f.domain, None, &h, &sig, &payload.targets(), NOW),
            SmartAccountError::UnknownSigner,
        );
    }

    #[test]
    fn unknown_signer_is_denied() {
        let f = fixture();
        let stranger = TestSigner::new(99);
        let payload = single(Pubkey::new_unique());
        let h = hash(&payload, 0);
        let sig = stranger.sign(SignatureMode::PersonalMessage, &f.domain, &h);

        assert_error(
            authorize_request(&f.account, &f.domain, None, &h, &sig, &payload.targets(), NOW),
            SmartAccountError::UnknownSigner,
        );
    }

    #[test]
    fn unsupplied_or_revoked_session_key_is_unknown() {
        let f = fixture();
        let payload = single(Pubkey::new_unique());
        let h = hash(&payload, 0);
        let sig = f.session.sign(SignatureMode::Raw, &f.domain, &h);

        let mut other = registered_key(TestSigner::new(3).address(), 0, 2_000, Some(5), None);
        assert_error(
            authorize_request(&f.account, &f.domain, Some(&mut other), &h, &sig, &[], NOW),
            SmartAccountError::UnknownSigner,
        );

        let mut revoked = registered_key(f.session.address(), 0, 2_000, Some(5), None);
        revoked.revoke();
        assert_error(
            authorize_request(&f.account, &f.domain, Some(&mut revoked), &h, &sig, &[], NOW),
            SmartAccountError::UnknownSigner,
        );
    }

    #[test]
    fn malformed_signature_is_rejected() {
        let f = fixture();
        assert_error(
            authorize_request(&f.account, &f.domain, None, &[0u8; 32], &[1u8; 64], &[], NOW),
            SmartAccountError::InvalidSignature,
        );
    }

    #[test]
    fn session_key_limit_one_authorizes_once() {
        let f = fixture();
        let target = Pubkey::new_unique();
        let mut key = registered_key(f.session.address(), 0, 2_000, Some(1), Some(vec![target]));

        let payload = single(target);
        let first = hash(&payload, 0);
        let sig = f.session.sign(SignatureMode::StructuredDomain, &f.domain, &first);
        let auth = authorize_request(
            &f.account,
            &f.domain,
            Some(&mut key),
            &first,
            &sig,
            &payload.targets(),
            NOW,
        )
        .unwrap();
        assert_eq!(
            auth.validation_data(),
            ValidationData {
                authority: Authority::SessionKey,
                valid_after: 0,
                valid_until: 2_000,
            }
        );
        assert_eq!(key.limit, 0);

        let second = hash(&payload, 1);
        let sig = f.session.sign(SignatureMode::StructuredDomain, &f.domain, &second);
        assert_error(
            authorize_request(
                &f.account,
                &f.domain,
                Some(&mut key),
                &second,
                &sig,
                &payload.targets(),
                NOW,
            ),
            SmartAccountError::LimitReached,
        );
    }

    #[test]
    fn batch_counts_as_one_use() {
        let f = fixture();
        let targets: Vec<Pubkey> = (0..3).map(|_| Pubkey::new_unique()).collect();
        let mut key = registered_key(f.session.address(), 0, 2_000, Some(1), None);

        let payload = batch(targets);
        let h = hash(&payload, 0);
        let sig = f.session.sign(SignatureMode::Raw, &f.domain, &h);
        authorize_request(&f.account, &f.domain, Some(&mut key), &h, &sig, &payload.targets(), NOW)
            .unwrap();
        assert_eq!(key.limit, 0);

        let next = single(Pubkey::new_unique());
        let h = hash(&next, 1);
        let sig = f.session.sign(SignatureMode::Raw, &f.domain, &h);
        assert_error(
            authorize_request(&f.account, &f.domain, Some(&mut key), &h, &sig, &next.targets(), NOW),
            SmartAccountError::LimitReached,
        );
    }

    #[test]
    fn batch_with_one_foreign_target_is_denied_entirely() {
        let f = fixture();
        let allowed = Pubkey::new_unique();
        let mut key = registered_key(f.session.address(), 0, 2_000, Some(4), Some(vec![allowed]));

        let payload = batch(vec![allowed, allowed, Pubkey::new_unique()]);
        let h = hash(&payload, 0);
        let sig = f.session.sign(SignatureMode::PersonalMessage, &f.domain, &h);
        assert_error(
            authorize_request(&f.account, &f.domain, Some(&mut key), &h, &sig, &payload.targets(), NOW),
            SmartAccountError::TargetNotWhitelisted,
        );
        assert_eq!(key.limit, 4);
    }

    #[test]
    fn whitelisted_key_cannot_route_value_elsewhere() {
        let f = fixture();
        let allowed = Pubkey::new_unique();
        let attacker = Pubkey::new_unique();
        let mut key = registered_key(f.session.address(), 0, 2_000, Some(1), Some(vec![allowed]));

        // Lamports riding on an instruction to a whitelisted program
        let funded_cpi = Payload::Single(Call {
            target: allowed,
            value: 5_000_000_000,
            data: vec![17],
            account_count: 2,
        });
        let h = hash(&funded_cpi, 0);
        let args = RequestArgs {
            nonce: 0,
            payload: funded_cpi,
            signature: f.session.sign(SignatureMode::Raw, &f.domain, &h),
        };
        assert_error(args.validate(), SmartAccountError::ValueWithCallData);

        // A plain transfer is checked against the whitelist like any target
        let transfer = |target| {
            Payload::Single(Call {
                target,
                value: 5_000_000_000,
                data: vec![],
                account_count: 1,
            })
        };
        let stolen = transfer(attacker);
        let h = hash(&stolen, 0);
        let sig = f.session.sign(SignatureMode::Raw, &f.domain, &h);
        assert_error(
            authorize_request(&f.account, &f.domain, Some(&mut key), &h, &sig, &stolen.targets(), NOW),
            SmartAccountError::TargetNotWhitelisted,
        );
        assert_eq!(key.limit, 1);

        let paid = transfer(allowed);
        let h = hash(&paid, 0);
        let sig = f.session.sign(SignatureMode::Raw, &f.domain, &h);
        authorize_request(&f.account, &f.domain, Some(&mut key), &h, &sig, &paid.targets(), NOW)
            .unwrap();
        assert_eq!(key.limit, 0);
    }

    #[test]
    fn session_key_window_is_enforced() {
        let f = fixture();
        let mut key = registered_key(f.session.address(), NOW + 1, NOW + 10, Some(4), None);
        let payload = single(Pubkey::new_unique());
        let h = hash(&payload, 0);
        let sig = f.session.sign(SignatureMode::Raw, &f.domain, &h);

        assert_error(
            authorize_request(&f.account, &f.domain, Some(&mut key), &h, &sig, &[], NOW),
            SmartAccountError::NotYetValid,
        );
        assert_error(
            authorize_request(&f.account, &f.domain, Some(&mut key), &h, &sig, &[], NOW + 11),
            SmartAccountError::Expired,
        );
        assert_eq!(key.limit, 4);
    }

    #[test]
    fn caller_resolution_matches_known_principals() {
        let mut f = fixture();
        let pending = TestSigner::new(5);
        f.account.propose_transfer(&f.owner.address(), pending.address()).unwrap();
        let h = [7u8; 32];

        let sig = pending.sign(SignatureMode::StructuredDomain, &f.domain, &h);
        assert_eq!(
            resolve_caller(&f.account, &f.domain, &h, &sig, &[]).unwrap(),
            pending.address()
        );

        let key = registered_key(f.session.address(), 0, 2_000, None, None);
        let sig = f.session.sign(SignatureMode::PersonalMessage, &f.domain, &h);
        assert_eq!(
            resolve_caller(&f.account, &f.domain, &h, &sig, &[&key]).unwrap(),
            f.session.address()
        );

        let stranger = TestSigner::new(77);
        let sig = stranger.sign(SignatureMode::Raw, &f.domain, &h);
        assert_eq!(
            resolve_caller(&f.account, &f.domain, &h, &sig, &[]).unwrap(),
            stranger.address()
        );
    }

    #[test]
    fn third_party_cannot_accept_ownership() {
        let mut f = fixture();
        let pending = TestSigner::new(5);
        let stranger = TestSigner::new(6);
        f.account.propose_transfer(&f.owner.address(), pending.address()).unwrap();

        let h = [9u8; 32];
        let sig = stranger.sign(SignatureMode::StructuredDomain, &f.domain, &h);
        let caller = resolve_caller(&f.account, &f.domain, &h, &sig, &[]).unwrap();
        assert_error(f.account.accept_ownership(&caller), SmartAccountError::Unauthorized);
    }

    #[test]
    fn register_requires_owner_or_active_master() {
        let f = fixture();
        let master = registered_key(f.session.address(), 0, 2_000, None, None);
        let limited = registered_key(f.session.address(), 0, 2_000, Some(3), None);
        let owner = f.owner.address();
        let session = f.session.address();

        ensure_can_register(&f.account, &owner, None, NOW).unwrap();
        ensure_can_register(&f.account, &session, Some(&master), NOW).unwrap();
        assert_error(
            ensure_can_register(&f.account, &session, Some(&master), 2_001),
            SmartAccountError::Unauthorized,
        );
        assert_error(
            ensure_can_register(&f.account, &session, Some(&limited), NOW),
            SmartAccountError::Unauthorized,
        );
        assert_error(
            ensure_can_register(&f.account, &session, None, NOW),
            SmartAccountError::Unauthorized,
        );
    }

    #[test]
    fn revoke_allows_the_key_itself() {
        let f = fixture();
        let session = f.session.address();
        let stranger = [0x55; 20];

        ensure_can_revoke(&f.account, &session, &session, None, NOW).unwrap();
        ensure_can_revoke(&f.account, &f.owner.address(), &session, None, NOW).unwrap();
        assert_error(
            ensure_can_revoke(&f.account, &stranger, &session, None, NOW),
            SmartAccountError::Unauthorized,
        );
    }

    #[test]
    fn pending_owner_keeps_no_authority_before_acceptance() {
        let mut f = fixture();
        let pending = TestSigner::new(5);
        f.account.propose_transfer(&f.owner.address(), pending.address()).unwrap();

        let payload = single(Pubkey::new_unique());
        let h = hash(&payload, 0);
        let sig = pending.sign(SignatureMode::Raw, &f.domain, &h);
        assert_error(
            authorize_request(&f.account, &f.domain, None, &h, &sig, &[], NOW),
            SmartAccountError::UnknownSigner,
        );

        let sig = f.owner.sign(SignatureMode::Raw, &f.domain, &h);
        authorize_request(&f.account, &f.domain, None, &h, &sig, &[], NOW).unwrap();
        ensure_can_register(&f.account, &f.owner.address(), None, NOW).unwrap();
    }

    #[test]
    fn signature_check_returns_magic_values() {
        let f = fixture();
        let h = [3u8; 32];
        let active = registered_key(f.session.address(), 0, 2_000, Some(1), None);

        for mode in SignatureMode::RESOLUTION_ORDER {
            let sig = f.owner.sign(mode, &f.domain, &h);
            assert_eq!(
                check_signature(&f.account, &f.domain, &h, &sig, None, NOW),
                VALID_SIGNATURE_MAGIC
            );
        }

        let sig = f.session.sign(SignatureMode::PersonalMessage, &f.domain, &h);
        assert_eq!(
            check_signature(&f.account, &f.domain, &h, &sig, Some(&active), NOW),
            VALID_SIGNATURE_MAGIC
        );
        assert_eq!(
            check_signature(&f.account, &f.domain, &h, &sig, Some(&active), 2_001),
            INVALID_SIGNATURE_MAGIC
        );
        assert_eq!(
            check_signature(&f.account, &f.domain, &h, &sig, None, NOW),
            INVALID_SIGNATURE_MAGIC
        );
        assert_eq!(
            check_signature(&f.account, &f.domain, &h, &[0u8; 10], None, NOW),
            INVALID_SIGNATURE_MAGIC
        );
    }

    #[test]
    fn foreign_session_key_is_treated_as_absent() {
        let f = fixture();
        let h = [4u8; 32];
        let mut foreign = registered_key(f.session.address(), 0, 2_000, Some(1), None);
        foreign.smart_account = Pubkey::new_unique();

        let sig = f.session.sign(SignatureMode::StructuredDomain, &f.domain, &h);
        assert_eq!(
            check_signature(&f.account, &f.domain, &h, &sig, Some(&foreign), NOW),
            INVALID_SIGNATURE_MAGIC
        );

        let sig = f.owner.sign(SignatureMode::StructuredDomain, &f.domain, &h);
        assert_eq!(
            check_signature(&f.account, &f.domain, &h, &sig, Some(&foreign), NOW),
            VALID_SIGNATURE_MAGIC
        );
    }
}
