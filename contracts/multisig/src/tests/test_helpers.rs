//! Shared fixtures: a multisig wired to a custody vault holding a Stellar
//! asset, plus a mock target contract for direct calls.

use crate::{AdminAction, MultisigContract, MultisigContractClient, MultisigError, MINIMUM_DELAY};
use custody_vault::{VaultContract, VaultContractClient};
use soroban_sdk::{
    contract, contractimpl, panic_with_error, symbol_short,
    testutils::{Address as _, Ledger},
    token::{Client as TokenClient, StellarAssetClient},
    vec, Address, Env, Error, IntoVal, InvokeError, String, Symbol, Val, Vec,
};

pub const START: u64 = 1_700_000_000;
pub const DELAY: u64 = MINIMUM_DELAY;

// Mock target invoked directly by proposals
#[contract]
pub struct MockTarget;

#[contractimpl]
impl MockTarget {
    pub fn ping(env: Env, n: u32) -> u32 {
        let pings: u32 = env
            .storage()
            .instance()
            .get(&symbol_short!("pings"))
            .unwrap_or(0);
        env.storage()
            .instance()
            .set(&symbol_short!("pings"), &(pings + 1));
        n + 1
    }

    pub fn pings(env: Env) -> u32 {
        env.storage()
            .instance()
            .get(&symbol_short!("pings"))
            .unwrap_or(0)
    }

    pub fn fail(env: Env, code: u32) {
        panic_with_error!(&env, Error::from_contract_error(code));
    }
}

/// Per-action arrays of a proposal under construction.
pub struct Batch {
    pub targets: Vec<Address>,
    pub values: Vec<i128>,
    pub functions: Vec<Option<Symbol>>,
    pub args: Vec<Vec<Val>>,
}

impl Batch {
    pub fn new(env: &Env) -> Self {
        Self {
            targets: Vec::new(env),
            values: Vec::new(env),
            functions: Vec::new(env),
            args: Vec::new(env),
        }
    }

    pub fn call(
        mut self,
        target: &Address,
        value: i128,
        function: Option<Symbol>,
        args: Vec<Val>,
    ) -> Self {
        self.targets.push_back(target.clone());
        self.values.push_back(value);
        self.functions.push_back(function);
        self.args.push_back(args);
        self
    }
}

pub struct Fixture {
    pub env: Env,
    pub engine: Address,
    pub client: MultisigContractClient<'static>,
    pub vault: Address,
    pub vault_client: VaultContractClient<'static>,
    pub asset: Address,
    pub signers: Vec<Address>,
}

pub fn signer_set(env: &Env, n: u32) -> Vec<Address> {
    let mut signers = Vec::new(env);
    for _ in 0..n {
        signers.push_back(Address::generate(env));
    }
    signers
}

/// Four signers (quorum 3), vault funded with `vault_funds`.
pub fn setup(vault_funds: i128) -> Fixture {
    setup_with(4, vault_funds)
}

pub fn setup_with(signer_count: u32, vault_funds: i128) -> Fixture {
    let env = Env::default();
    env.mock_all_auths();
    env.ledger().set_timestamp(START);

    let engine = env.register(MultisigContract, ());
    let client = MultisigContractClient::new(&env, &engine);

    let issuer = Address::generate(&env);
    let asset = env.register_stellar_asset_contract_v2(issuer).address();
    let vault = env.register(VaultContract, ());
    let vault_client = VaultContractClient::new(&env, &vault);
    vault_client.initialize(&engine, &asset);
    if vault_funds > 0 {
        StellarAssetClient::new(&env, &asset).mint(&vault, &vault_funds);
    }

    let signers = signer_set(&env, signer_count);
    client.initialize(&signers, &DELAY, &vault);

    Fixture {
        env,
        engine,
        client,
        vault,
        vault_client,
        asset,
        signers,
    }
}

impl Fixture {
    pub fn signer(&self, i: u32) -> Address {
        self.signers.get(i).unwrap()
    }

    pub fn description(&self) -> String {
        String::from_str(&self.env, "batch")
    }

    pub fn now(&self) -> u64 {
        self.env.ledger().timestamp()
    }

    pub fn advance(&self, seconds: u64) {
        self.env.ledger().set_timestamp(self.now() + seconds);
    }

    pub fn token(&self) -> TokenClient<'static> {
        TokenClient::new(&self.env, &self.asset)
    }

    pub fn mint(&self, to: &Address, amount: i128) {
        StellarAssetClient::new(&self.env, &self.asset).mint(to, &amount);
    }

    pub fn mock_target(&self) -> Address {
        self.env.register(MockTarget, ())
    }

    pub fn ping(&self, target: &Address, n: u32) -> Batch {
        Batch::new(&self.env).call(
            target,
            0,
            Some(symbol_short!("ping")),
            vec![&self.env, n.into_val(&self.env)],
        )
    }

    /// Vault-routed token transfer of `amount` from the vault to `to`.
    pub fn withdrawal(&self, to: &Address, amount: i128) -> Batch {
        Batch::new(&self.env).call(
            &self.asset,
            0,
            Some(symbol_short!("transfer")),
            vec![
                &self.env,
                self.vault.into_val(&self.env),
                to.into_val(&self.env),
                amount.into_val(&self.env),
            ],
        )
    }

    pub fn admin_batch(&self, action: AdminAction) -> Batch {
        Batch::new(&self.env).call(
            &self.engine,
            0,
            Some(Symbol::new(&self.env, "admin_call")),
            vec![&self.env, action.into_val(&self.env)],
        )
    }

    /// Creates `batch` as signer 0.
    pub fn propose(&self, batch: &Batch, call_from: &Address) -> u64 {
        self.client.create_and_sign(
            &self.signer(0),
            &batch.targets,
            &batch.values,
            &batch.functions,
            &batch.args,
            &self.description(),
            call_from,
        )
    }

    /// Signs with signers 1..quorum so the proposal queues.
    pub fn reach_quorum(&self, id: u64) {
        let required = self.client.required_signs();
        for i in 1..required {
            self.client.sign(&self.signer(i), &id);
        }
    }

    /// Proposes, queues, and advances time to the proposal's eta.
    pub fn ready(&self, batch: &Batch, call_from: &Address) -> u64 {
        let id = self.propose(batch, call_from);
        self.reach_quorum(id);
        self.advance(DELAY);
        id
    }

    /// Runs `action` through the full pipeline.
    pub fn govern(&self, action: AdminAction) -> u64 {
        let id = self.ready(&self.admin_batch(action), &self.engine);
        self.client.execute(&self.signer(0), &id, &false, &0);
        id
    }
}

pub fn assert_contract_error<T, C>(
    result: Result<Result<T, C>, Result<MultisigError, InvokeError>>,
    expected: MultisigError,
) {
    match result {
        Err(Ok(err)) => assert_eq!(err, expected),
        Err(Err(err)) => panic!("expected {:?}, got {:?}", expected, err),
        Ok(_) => panic!("expected {:?}, call succeeded", expected),
    }
}
