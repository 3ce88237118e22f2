use soroban_sdk::{
    contract, contracterror, contractevent, contractimpl, contracttype, log, panic_with_error,
    symbol_short, token, Address, Env, Error, IntoVal, InvokeError, Symbol, Val, Vec,
};

// ── Error type ────────────────────────────────────────────────────────────────

/// Codes start at 101 so a vault failure surfacing through the owner never
/// aliases one of the owner's own error codes.
#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum VaultError {
    AlreadyInitialized = 101,
    NotInitialized = 102,
    Unauthorized = 103,
    InsufficientBalance = 104,
    CallFailed = 105,
    InvalidAmount = 106,
}

// ── Events ────────────────────────────────────────────────────────────────────

#[contractevent]
#[derive(Clone, Debug)]
pub struct VaultExecutedEvent {
    pub target: Address,
    pub value: i128,
    pub attached: i128,
    pub invoked: bool,
    pub timestamp: u64,
}

#[contractevent]
#[derive(Clone, Debug)]
pub struct CustodyReceivedEvent {
    pub token: Address,
    pub from: Address,
    pub amount: i128,
}

#[contractevent]
#[derive(Clone, Debug)]
pub struct NftCustodyReceivedEvent {
    pub collection: Address,
    pub from: Address,
    pub items: u32,
}

// ── Storage types ─────────────────────────────────────────────────────────────

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum VaultKey {
    Owner,
    Asset,
}

const ACCEPTED: Symbol = symbol_short!("accepted");

const DAY_IN_LEDGERS: u32 = 17_280;
const TTL_EXTEND_TO: u32 = 60 * DAY_IN_LEDGERS;
const TTL_THRESHOLD: u32 = 30 * DAY_IN_LEDGERS;

#[contract]
pub struct VaultContract;

#[contractimpl]
impl VaultContract {
    /// Binds the vault to its owner (the engine hosting the timelock) and to
    /// the asset whose balance the vault guards.
    pub fn initialize(env: Env, owner: Address, asset: Address) -> Result<(), VaultError> {
        if env.storage().instance().has(&VaultKey::Owner) {
            return Err(VaultError::AlreadyInitialized);
        }
        env.storage().instance().set(&VaultKey::Owner, &owner);
        env.storage().instance().set(&VaultKey::Asset, &asset);
        Self::extend_instance(&env);
        log!(&env, "vault initialize owner={} asset={}", owner, asset);
        Ok(())
    }

    // ── Guarded invocation ────────────────────────────────────────────────────

    /// Owner-only: forwards `value` of the vault asset to `target` and, when
    /// `function` is set, invokes `target.function(args)`.
    ///
    /// `attached` is value supplied by `funder`, who must authorize it. It
    /// counts toward the sufficiency check before it is pulled in. A
    /// contract error raised by the target is re-raised with its original
    /// code; any other failure is reported as [`VaultError::CallFailed`].
    pub fn execute(
        env: Env,
        caller: Address,
        target: Address,
        value: i128,
        function: Option<Symbol>,
        args: Vec<Val>,
        funder: Address,
        attached: i128,
    ) -> Result<Val, VaultError> {
        Self::require_owner(&env, &caller)?;
        Self::extend_instance(&env);
        if value < 0 || attached < 0 {
            return Err(VaultError::InvalidAmount);
        }

        let asset = Self::load_asset(&env)?;
        let token = token::Client::new(&env, &asset);
        let vault = env.current_contract_address();

        let balance = token.balance(&vault);
        let available = balance
            .checked_add(attached)
            .ok_or(VaultError::InvalidAmount)?;
        if available < value {
            return Err(VaultError::InsufficientBalance);
        }

        if attached > 0 {
            funder.require_auth();
            token.transfer(&funder, &vault, &attached);
        }
        if value > 0 {
            token.transfer(&vault, &target, &value);
        }

        let invoked = function.is_some();
        let result = match function {
            Some(function) => Self::invoke(&env, &target, &function, args)?,
            None => ().into_val(&env),
        };

        VaultExecutedEvent {
            target: target.clone(),
            value,
            attached,
            invoked,
            timestamp: env.ledger().timestamp(),
        }
        .publish(&env);
        log!(&env, "vault execute target={} value={}", target, value);
        Ok(result)
    }

    // ── Acceptance ports ──────────────────────────────────────────────────────

    /// Pulls `amount` of the vault asset from `from` into custody.
    pub fn deposit(env: Env, from: Address, amount: i128) -> Result<(), VaultError> {
        from.require_auth();
        if amount < 0 {
            return Err(VaultError::InvalidAmount);
        }
        let asset = Self::load_asset(&env)?;
        token::Client::new(&env, &asset).transfer(&from, &env.current_contract_address(), &amount);

        CustodyReceivedEvent {
            token: asset,
            from,
            amount,
        }
        .publish(&env);
        Ok(())
    }

    /// Token receiver hook. Incoming fungible transfers are never rejected.
    pub fn receive(env: Env, token: Address, from: Address, amount: i128, _payload: Vec<Val>) {
        CustodyReceivedEvent {
            token,
            from,
            amount,
        }
        .publish(&env);
    }

    /// Non-fungible / multi-token receiver hook. Custody is accepted as-is.
    pub fn receive_nft(
        env: Env,
        collection: Address,
        from: Address,
        token_ids: Vec<u128>,
        _amounts: Vec<i128>,
    ) -> Symbol {
        NftCustodyReceivedEvent {
            collection,
            from,
            items: token_ids.len(),
        }
        .publish(&env);
        ACCEPTED
    }

    // ── Views ─────────────────────────────────────────────────────────────────

    pub fn owner(env: Env) -> Result<Address, VaultError> {
        Self::load_owner(&env)
    }

    pub fn asset(env: Env) -> Result<Address, VaultError> {
        Self::load_asset(&env)
    }

    /// Live balance of the vault asset held in custody.
    pub fn balance(env: Env) -> Result<i128, VaultError> {
        let asset = Self::load_asset(&env)?;
        Ok(token::Client::new(&env, &asset).balance(&env.current_contract_address()))
    }

    // ── Private helpers ───────────────────────────────────────────────────────

    fn extend_instance(env: &Env) {
        env.storage()
            .instance()
            .extend_ttl(TTL_THRESHOLD, TTL_EXTEND_TO);
    }

    fn load_owner(env: &Env) -> Result<Address, VaultError> {
        env.storage()
            .instance()
            .get(&VaultKey::Owner)
            .ok_or(VaultError::NotInitialized)
    }

    fn load_asset(env: &Env) -> Result<Address, VaultError> {
        env.storage()
            .instance()
            .get(&VaultKey::Asset)
            .ok_or(VaultError::NotInitialized)
    }

    fn require_owner(env: &Env, caller: &Address) -> Result<(), VaultError> {
        caller.require_auth();
        if *caller != Self::load_owner(env)? {
            return Err(VaultError::Unauthorized);
        }
        Ok(())
    }

    fn invoke(
        env: &Env,
        target: &Address,
        function: &Symbol,
        args: Vec<Val>,
    ) -> Result<Val, VaultError> {
        match env.try_invoke_contract::<Val, Error>(target, function, args) {
            Ok(Ok(result)) => Ok(result),
            Ok(Err(_)) => Err(VaultError::CallFailed),
            Err(Ok(err)) => match InvokeError::from(err) {
                InvokeError::Contract(code) => {
                    panic_with_error!(env, Error::from_contract_error(code))
                }
                InvokeError::Abort => Err(VaultError::CallFailed),
            },
            Err(Err(_)) => Err(VaultError::CallFailed),
        }
    }
}
