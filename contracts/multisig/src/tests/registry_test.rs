use super::test_helpers::{assert_contract_error, setup, setup_with, signer_set, DELAY};
use crate::proposal::SelfCall;
use crate::registry::{self, quorum};
use crate::{MultisigContract, MultisigContractClient, MultisigError, MAX_SIGNERS, MIN_SIGNERS};
use soroban_sdk::{testutils::Address as _, Address, Env};

fn fresh(env: &Env) -> (MultisigContractClient<'static>, Address) {
    env.mock_all_auths();
    let engine = env.register(MultisigContract, ());
    let vault = Address::generate(env);
    (MultisigContractClient::new(env, &engine), vault)
}

// ── initialize ────────────────────────────────────────────────────────────────

#[test]
fn initialize_sets_signers_and_default_quorum() {
    let fx = setup(0);
    assert_eq!(fx.client.total_signers(), 4);
    assert_eq!(fx.client.required_signs(), 3);
    assert_eq!(fx.client.signers(), fx.signers);
    for signer in fx.signers.iter() {
        assert!(fx.client.is_signer(&signer));
    }
    assert!(!fx.client.is_signer(&Address::generate(&fx.env)));
}

#[test]
fn three_signer_registry_fails_construction() {
    let env = Env::default();
    let (client, vault) = fresh(&env);
    let result = client.try_initialize(&signer_set(&env, MIN_SIGNERS - 1), &DELAY, &vault);
    assert_contract_error(result, MultisigError::WrongStatus);
    assert_eq!(client.total_signers(), 0);
}

#[test]
fn oversized_registry_fails_construction() {
    let env = Env::default();
    let (client, vault) = fresh(&env);
    let result = client.try_initialize(&signer_set(&env, MAX_SIGNERS + 1), &DELAY, &vault);
    assert_contract_error(result, MultisigError::WrongStatus);
}

#[test]
fn duplicate_signers_fail_construction() {
    let env = Env::default();
    let (client, vault) = fresh(&env);
    let mut signers = signer_set(&env, 4);
    signers.push_back(signers.get(0).unwrap());
    let result = client.try_initialize(&signers, &DELAY, &vault);
    assert_contract_error(result, MultisigError::InvalidSigner);
}

#[test]
fn initialize_twice_fails() {
    let fx = setup(0);
    let result = fx
        .client
        .try_initialize(&signer_set(&fx.env, 4), &DELAY, &fx.vault);
    assert_contract_error(result, MultisigError::AlreadyInitialized);
}

// ── quorum policy ─────────────────────────────────────────────────────────────

#[test]
fn quorum_floor_is_three_quarters_of_the_set() {
    for n in MIN_SIGNERS..=MAX_SIGNERS {
        assert_eq!(quorum(3, n), core::cmp::max(3, n * 3 / 4));
    }
    assert_eq!(quorum(3, 4), 3);
    assert_eq!(quorum(3, 8), 6);
    assert_eq!(quorum(3, 100), 75);
    assert_eq!(quorum(7, 8), 7);
}

#[test]
fn stored_value_above_set_size_is_returned_as_is() {
    assert_eq!(quorum(9, 8), 9);
    assert_eq!(quorum(101, 100), 101);
}

#[test]
fn required_signs_tracks_set_size() {
    for n in [4u32, 5, 8, 13, 100] {
        let fx = setup_with(n, 0);
        assert_eq!(fx.client.required_signs(), core::cmp::max(3, n * 3 / 4));
    }
}

// ── mutations ─────────────────────────────────────────────────────────────────

#[test]
fn add_signer_grows_the_set() {
    let fx = setup(0);
    let newcomer = Address::generate(&fx.env);
    fx.env.as_contract(&fx.engine, || {
        registry::add_signer(&fx.env, &SelfCall::for_tests(), newcomer.clone()).unwrap();
    });
    assert!(fx.client.is_signer(&newcomer));
    assert_eq!(fx.client.total_signers(), 5);
}

#[test]
fn add_existing_signer_fails() {
    let fx = setup(0);
    fx.env.as_contract(&fx.engine, || {
        let result = registry::add_signer(&fx.env, &SelfCall::for_tests(), fx.signer(1));
        assert_eq!(result, Err(MultisigError::InvalidSigner));
    });
}

#[test]
fn add_signer_beyond_max_fails() {
    let fx = setup_with(MAX_SIGNERS, 0);
    fx.env.as_contract(&fx.engine, || {
        let result = registry::add_signer(
            &fx.env,
            &SelfCall::for_tests(),
            Address::generate(&fx.env),
        );
        assert_eq!(result, Err(MultisigError::WrongStatus));
    });
    assert_eq!(fx.client.total_signers(), MAX_SIGNERS);
}

#[test]
fn remove_signer_shrinks_the_set() {
    let fx = setup_with(5, 0);
    let leaving = fx.signer(2);
    fx.env.as_contract(&fx.engine, || {
        registry::remove_signer(&fx.env, &SelfCall::for_tests(), leaving.clone()).unwrap();
    });
    assert!(!fx.client.is_signer(&leaving));
    assert_eq!(fx.client.total_signers(), 4);
}

#[test]
fn remove_unknown_signer_fails() {
    let fx = setup_with(5, 0);
    fx.env.as_contract(&fx.engine, || {
        let result = registry::remove_signer(
            &fx.env,
            &SelfCall::for_tests(),
            Address::generate(&fx.env),
        );
        assert_eq!(result, Err(MultisigError::InvalidSigner));
    });
}

#[test]
fn remove_signer_below_min_fails() {
    let fx = setup(0);
    fx.env.as_contract(&fx.engine, || {
        let result = registry::remove_signer(&fx.env, &SelfCall::for_tests(), fx.signer(0));
        assert_eq!(result, Err(MultisigError::WrongStatus));
    });
    assert_eq!(fx.client.total_signers(), MIN_SIGNERS);
}

#[test]
fn flip_signer_replaces_in_place() {
    let fx = setup(0);
    let old = fx.signer(3);
    let new = Address::generate(&fx.env);
    fx.env.as_contract(&fx.engine, || {
        registry::flip_signer(&fx.env, &SelfCall::for_tests(), old.clone(), new.clone())
            .unwrap();
    });
    assert!(!fx.client.is_signer(&old));
    assert!(fx.client.is_signer(&new));
    assert_eq!(fx.client.total_signers(), 4);
    assert_eq!(fx.client.signers().get(3).unwrap(), new);
}

#[test]
fn flip_signer_rejects_bad_identities() {
    let fx = setup(0);
    let outsider = Address::generate(&fx.env);
    fx.env.as_contract(&fx.engine, || {
        let auth = SelfCall::for_tests();
        assert_eq!(
            registry::flip_signer(&fx.env, &auth, outsider.clone(), Address::generate(&fx.env)),
            Err(MultisigError::InvalidSigner)
        );
        assert_eq!(
            registry::flip_signer(&fx.env, &auth, fx.signer(0), fx.signer(0)),
            Err(MultisigError::InvalidSigner)
        );
        assert_eq!(
            registry::flip_signer(&fx.env, &auth, fx.signer(0), fx.signer(1)),
            Err(MultisigError::InvalidSigner)
        );
    });
    assert_eq!(fx.client.signers(), fx.signers);
}

#[test]
fn set_required_signs_within_bounds() {
    let fx = setup_with(8, 0);
    assert_eq!(fx.client.required_signs(), 6);
    fx.env.as_contract(&fx.engine, || {
        let auth = SelfCall::for_tests();
        assert_eq!(
            registry::set_required_signs(&fx.env, &auth, 5),
            Err(MultisigError::WrongStatus)
        );
        assert_eq!(
            registry::set_required_signs(&fx.env, &auth, 9),
            Err(MultisigError::WrongStatus)
        );
        registry::set_required_signs(&fx.env, &auth, 8).unwrap();
    });
    assert_eq!(fx.client.required_signs(), 8);
}

#[test]
fn direct_admin_call_is_rejected() {
    let fx = setup(0);
    let newcomer = Address::generate(&fx.env);
    let result = fx
        .client
        .try_admin_call(&fx.signer(0), &crate::AdminAction::AddSigner(newcomer.clone()));
    assert_contract_error(result, MultisigError::Unauthorized);
    assert!(!fx.client.is_signer(&newcomer));
}
