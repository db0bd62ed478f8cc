//! Test fixtures: a small pool topology, a scripted router oracle, and a
//! relayer wired to both.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use alloy::primitives::{Address, Bytes, B256, I256, U256};
use async_trait::async_trait;
use pool_client::{InMemoryPoolSource, PoolIndex, RouterOracle, SwapInfo};
use relayer_core::{
    BatchSwapStep, LinearPoolType, Network, Pool, PoolToken, PoolType, RelayerConfig, RouterError,
    ShareTokenConfig, ShareTokenProtocol, SwapKind,
};

use crate::relayer::Relayer;

pub mod fixtures {
    use alloy::primitives::{address, b256, Address, B256};

    pub const DAI: Address = address!("6B175474E89094C44Da98b954EedeAC495271d0F");
    pub const USDC: Address = address!("A0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48");
    pub const USDT: Address = address!("dAC17F958D2ee523a2206206994597C13D831ec7");
    pub const WETH: Address = address!("C02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2");

    pub const WADAI: Address = address!("02d60b84491589974263d922D9cC7a3152618Ef6");
    pub const WAUSDC: Address = address!("d093fA4Fb80D09bB30817FDcd442d4d02eD3E5de");
    pub const YVUSDT: Address = address!("3B27F92C0e212C671EA351827EDF93DB27cc0c65");

    pub const LINEAR_DAI: Address = address!("804CdB9116a10bB78768D3252355a1b18067bF8f");
    pub const LINEAR_DAI_ID: B256 =
        b256!("804cdb9116a10bb78768d3252355a1b18067bf8f0000000000000000000000fb");
    pub const LINEAR_USDC: Address = address!("9210F1204b5a24742Eba12f710636D76240dF3d0");
    pub const LINEAR_USDC_ID: B256 =
        b256!("9210f1204b5a24742eba12f710636d76240df3d00000000000000000000000fc");
    pub const LINEAR_USDT: Address = address!("2BBf681cC4eb09218BEe85EA2a5d3D13Fa40fC0C");
    pub const LINEAR_USDT_ID: B256 =
        b256!("2bbf681cc4eb09218bee85ea2a5d3d13fa40fc0c0000000000000000000000fd");

    pub const PHANTOM: Address = address!("7B50775383d3D6f0215A8F290f2C9e2eEBBEceb2");
    pub const PHANTOM_ID: B256 =
        b256!("7b50775383d3d6f0215a8f290f2c9e2eebbeceb20000000000000000000000fe");

    /// WETH / phantom BPT weighted pool
    pub const WEIGHTED: Address = address!("1000000000000000000000000000000000000001");
    pub const WEIGHTED_ID: B256 =
        b256!("1000000000000000000000000000000000000001000200000000000000000001");

    /// Plain two-token pool used by exit tests
    pub const EXIT_POOL: Address = address!("1000000000000000000000000000000000000002");
    pub const EXIT_POOL_ID: B256 =
        b256!("1000000000000000000000000000000000000002000200000000000000000002");
    pub const TOKEN_A: Address = address!("a000000000000000000000000000000000000001");
    pub const TOKEN_B: Address = address!("b000000000000000000000000000000000000002");
    pub const TOKEN_C: Address = address!("c000000000000000000000000000000000000003");

    pub const AAVE_FACTORY: Address = address!("d7fad3bd59d6477cbe1be7f646f7f1ba25b230f8");
    pub const YEARN_FACTORY: Address = address!("fa00000000000000000000000000000000000001");
    pub const EULER_FACTORY: Address = address!("fa00000000000000000000000000000000000002");

    pub const RELAYER: Address = address!("dcdbf71A870cc60C6F9B621E28a7D3Ffd6Dd4965");
    pub const SHARE_TOKEN: Address = address!("fcef8a994209d6916EB2C86cDD2AFD60Aa6F54b1");
    pub const SHARE_FARM_ID: u64 = 22;
    pub const USER: Address = address!("00000000000000000000000000000000000000a1");
}

fn token(address: Address, decimals: u8, price_rate: Option<&str>) -> PoolToken {
    PoolToken {
        address,
        decimals,
        price_rate: price_rate.map(str::to_string),
    }
}

pub fn linear_pool(
    id: B256,
    address: Address,
    factory: Option<Address>,
    main: PoolToken,
    wrapped: PoolToken,
) -> Pool {
    Pool {
        id,
        address,
        pool_type: PoolType::Linear,
        factory,
        tokens_list: vec![main.address, wrapped.address, address],
        tokens: vec![main, wrapped, token(address, 18, None)],
        main_index: Some(0),
        wrapped_index: Some(1),
    }
}

fn composite_pool(id: B256, address: Address, pool_type: PoolType, tokens: &[Address]) -> Pool {
    Pool {
        id,
        address,
        pool_type,
        factory: None,
        tokens_list: tokens.to_vec(),
        tokens: tokens.iter().map(|t| token(*t, 18, None)).collect(),
        main_index: None,
        wrapped_index: None,
    }
}

/// Pool snapshot plus a scripted oracle, assembled before the relayer is built
pub struct Fixture {
    pools: Vec<Pool>,
    pub config: RelayerConfig,
    pub oracle: MockOracle,
}

/// Relayer wired to the fixture's source and oracle
pub struct Harness {
    pub relayer: Relayer,
    pub oracle: Arc<MockOracle>,
    pub source: Arc<InMemoryPoolSource>,
}

impl Fixture {
    /// Topology:
    /// - linear DAI (aave) and linear USDC (aave default) inside the phantom
    /// - linear USDT (yearn) standalone
    /// - weighted WETH / phantom BPT
    /// - plain two-token exit pool A / B, plus token C listed via a second pool
    pub fn new() -> Self {
        use fixtures::*;

        let pools = vec![
            linear_pool(
                LINEAR_DAI_ID,
                LINEAR_DAI,
                Some(AAVE_FACTORY),
                token(DAI, 18, None),
                token(WADAI, 18, Some("1.1")),
            ),
            linear_pool(
                LINEAR_USDC_ID,
                LINEAR_USDC,
                None,
                token(USDC, 6, None),
                token(WAUSDC, 6, Some("1.05")),
            ),
            linear_pool(
                LINEAR_USDT_ID,
                LINEAR_USDT,
                Some(YEARN_FACTORY),
                token(USDT, 6, None),
                token(YVUSDT, 6, Some("1.02")),
            ),
            composite_pool(
                PHANTOM_ID,
                PHANTOM,
                PoolType::StablePhantom,
                &[LINEAR_DAI, LINEAR_USDC],
            ),
            composite_pool(WEIGHTED_ID, WEIGHTED, PoolType::Weighted, &[WETH, PHANTOM]),
            composite_pool(EXIT_POOL_ID, EXIT_POOL, PoolType::Weighted, &[TOKEN_A, TOKEN_B]),
            composite_pool(
                B256::repeat_byte(0xcc),
                Address::repeat_byte(0xcc),
                PoolType::Weighted,
                &[TOKEN_B, TOKEN_C],
            ),
        ];

        let mut config = RelayerConfig {
            network: Network::Mainnet,
            batch_relayer: Some(RELAYER),
            share_token: Some(ShareTokenConfig {
                protocol: ShareTokenProtocol::FBeetsBar,
                address: SHARE_TOKEN,
                farm_id: SHARE_FARM_ID,
                pool_id: WEIGHTED_ID,
            }),
            ..Default::default()
        };
        config
            .linear_factories
            .insert(YEARN_FACTORY, LinearPoolType::Yearn);
        config
            .linear_factories
            .insert(EULER_FACTORY, LinearPoolType::Unknown("euler".into()));

        Self {
            pools,
            config,
            oracle: MockOracle::default(),
        }
    }

    pub fn push(&mut self, pool: Pool) {
        self.pools.push(pool);
    }

    pub fn index(&self) -> PoolIndex {
        PoolIndex::build(self.pools.clone().into(), 0)
    }

    pub fn phantom_pool(&self, byte: u8, tokens: &[Address]) -> Pool {
        composite_pool(
            B256::repeat_byte(byte),
            Address::repeat_byte(byte),
            PoolType::StablePhantom,
            tokens,
        )
    }

    pub fn weighted_pool(&self, byte: u8, tokens: &[Address]) -> Pool {
        composite_pool(
            B256::repeat_byte(byte),
            Address::repeat_byte(byte),
            PoolType::Weighted,
            tokens,
        )
    }

    /// Route along `path`; every hop converts at `num / den`
    pub fn route(&mut self, path: &[Address], num: u64, den: u64) {
        self.oracle.add_route(path, num, den);
    }

    pub fn harness(self) -> Harness {
        let source = Arc::new(InMemoryPoolSource::new(self.pools));
        let oracle = Arc::new(self.oracle);
        let relayer = Relayer::new(&self.config, source.clone(), oracle.clone());
        Harness {
            relayer,
            oracle,
            source,
        }
    }
}

/// Recorded `swap_info` request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwapQuery {
    pub token_in: Address,
    pub token_out: Address,
    pub kind: SwapKind,
    pub amount: U256,
}

/// Router oracle answering from fixed paths and per-hop rates
#[derive(Debug, Default)]
pub struct MockOracle {
    routes: HashMap<(Address, Address), Vec<Address>>,
    rates: HashMap<(Address, Address), (u64, u64)>,
    fail_batch: bool,
    swap_queries: Mutex<Vec<SwapQuery>>,
    batch_queries: AtomicUsize,
}

impl MockOracle {
    pub fn add_route(&mut self, path: &[Address], num: u64, den: u64) {
        assert!(path.len() >= 2, "a route needs at least one hop");
        for hop in path.windows(2) {
            self.rates.insert((hop[0], hop[1]), (num, den));
        }
        self.routes
            .insert((path[0], path[path.len() - 1]), path.to_vec());
    }

    pub fn fail_batch_queries(&mut self) {
        self.fail_batch = true;
    }

    pub fn swap_queries(&self) -> Vec<SwapQuery> {
        self.swap_queries.lock().unwrap().clone()
    }

    pub fn batch_queries(&self) -> usize {
        self.batch_queries.load(Ordering::SeqCst)
    }

    fn rate(&self, token_in: Address, token_out: Address) -> Result<(U256, U256), RouterError> {
        self.rates
            .get(&(token_in, token_out))
            .map(|(num, den)| (U256::from(*num), U256::from(*den)))
            .ok_or_else(|| RouterError::QueryFailed {
                message: format!("no pool between {token_in} and {token_out}"),
            })
    }
}

fn signed(amount: U256) -> I256 {
    I256::try_from(amount).unwrap()
}

#[async_trait]
impl RouterOracle for MockOracle {
    async fn swap_info(
        &self,
        token_in: Address,
        token_out: Address,
        kind: SwapKind,
        amount: U256,
    ) -> Result<SwapInfo, RouterError> {
        self.swap_queries.lock().unwrap().push(SwapQuery {
            token_in,
            token_out,
            kind,
            amount,
        });

        let Some(path) = self.routes.get(&(token_in, token_out)) else {
            return Ok(SwapInfo::default());
        };

        let mut swaps: Vec<BatchSwapStep> = (0..path.len() - 1)
            .map(|hop| BatchSwapStep {
                pool_id: B256::with_last_byte(hop as u8 + 1),
                asset_in_index: hop,
                asset_out_index: hop + 1,
                amount: U256::ZERO,
                user_data: Bytes::new(),
            })
            .collect();
        // exact-out routes are walked from the last hop backwards
        if kind == SwapKind::ExactOut {
            swaps.reverse();
        }
        swaps[0].amount = amount;

        Ok(SwapInfo {
            swaps,
            token_addresses: path.clone(),
        })
    }

    async fn query_batch_swap(
        &self,
        kind: SwapKind,
        swaps: &[BatchSwapStep],
        assets: &[Address],
    ) -> Result<Vec<I256>, RouterError> {
        self.batch_queries.fetch_add(1, Ordering::SeqCst);
        if self.fail_batch {
            return Err(RouterError::QueryFailed {
                message: "execution reverted".into(),
            });
        }

        let mut deltas = vec![I256::ZERO; assets.len()];
        let mut previous = U256::ZERO;
        for step in swaps {
            let (num, den) = self.rate(assets[step.asset_in_index], assets[step.asset_out_index])?;
            let given = if step.amount.is_zero() {
                previous
            } else {
                step.amount
            };
            let (amount_in, amount_out) = match kind {
                SwapKind::ExactIn => (given, given * num / den),
                SwapKind::ExactOut => (given * den / num, given),
            };
            deltas[step.asset_in_index] += signed(amount_in);
            deltas[step.asset_out_index] -= signed(amount_out);
            previous = match kind {
                SwapKind::ExactIn => amount_out,
                SwapKind::ExactOut => amount_in,
            };
        }

        Ok(deltas)
    }
}
