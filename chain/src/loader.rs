//! Typed state loading on top of [`RpcClient`].

use dysnomia_types::{AffectionState, Address, LauState};
use num_bigint::BigUint;

use crate::rpc::RpcClient;
use crate::slots::{self, Word};
use crate::RpcError;

/// Contract addresses to hydrate from. Unset entries are skipped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ContractSet {
    pub affection: Option<Address>,
    pub lau: Option<Address>,
    pub qing_asset: Option<Address>,
    pub crows: Option<Address>,
}

/// ERC-20 balances relevant to one holder's bouncer rights.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HolderBalances {
    pub holder: Address,
    pub asset: BigUint,
    pub asset_total_supply: BigUint,
    pub crows: BigUint,
}

/// Immutable chain state captured at one point in time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChainSnapshot {
    pub chain_id: u64,
    pub affection: Option<AffectionState>,
    pub lau: Option<LauState>,
    pub holder: Option<HolderBalances>,
}

#[derive(Debug)]
pub struct StateLoader {
    rpc: RpcClient,
}

impl StateLoader {
    #[must_use]
    pub fn new(rpc: RpcClient) -> Self {
        Self { rpc }
    }

    #[must_use]
    pub fn rpc(&self) -> &RpcClient {
        &self.rpc
    }

    async fn words(
        &self,
        contract: Address,
        first: u64,
        count: u64,
    ) -> Result<Vec<Word>, RpcError> {
        let mut words = Vec::with_capacity(count as usize);
        for slot in first..first + count {
            words.push(self.rpc.get_storage_at(contract, slot).await?);
        }
        Ok(words)
    }

    async fn words_at<const N: usize>(
        &self,
        contract: Address,
        slots: [u64; N],
    ) -> Result<[Word; N], RpcError> {
        let mut out = [Word::default(); N];
        for (slot, word) in slots.into_iter().zip(out.iter_mut()) {
            *word = self.rpc.get_storage_at(contract, slot).await?;
        }
        Ok(out)
    }

    pub async fn affection(&self, contract: Address) -> Result<AffectionState, RpcError> {
        let rod = self
            .words(contract, slots::AFFECTION_ROD_SLOT, slots::FA_SLOT_SPAN)
            .await?;
        let cone = self
            .words(contract, slots::AFFECTION_CONE_SLOT, slots::FA_SLOT_SPAN)
            .await?;
        let scalars = self
            .words_at(contract, slots::AFFECTION_SCALAR_SLOTS)
            .await?;
        Ok(slots::decode_affection(&rod, &cone, scalars))
    }

    pub async fn lau(&self, contract: Address) -> Result<LauState, RpcError> {
        let saat = self.words_at(contract, slots::LAU_SAAT_SLOTS).await?;
        Ok(slots::decode_lau(contract, saat))
    }

    /// Balances for `holder`. A missing CROWS contract reads as zero CROWS.
    pub async fn holder_balances(
        &self,
        asset: Address,
        crows: Option<Address>,
        holder: Address,
    ) -> Result<HolderBalances, RpcError> {
        let asset_balance = self.rpc.balance_of(asset, holder).await?;
        let asset_total_supply = self.rpc.total_supply(asset).await?;
        let crows = match crows {
            Some(crows) => self.rpc.balance_of(crows, holder).await?,
            None => BigUint::default(),
        };
        Ok(HolderBalances {
            holder,
            asset: asset_balance,
            asset_total_supply,
            crows,
        })
    }

    /// Load every configured contract. Holder balances are read only when
    /// both a holder and the territory's asset are known.
    pub async fn snapshot(
        &self,
        contracts: &ContractSet,
        holder: Option<Address>,
    ) -> Result<ChainSnapshot, RpcError> {
        let chain_id = self.rpc.chain_id().await?;

        let affection = match contracts.affection {
            Some(addr) => Some(self.affection(addr).await?),
            None => None,
        };
        let lau = match contracts.lau {
            Some(addr) => Some(self.lau(addr).await?),
            None => None,
        };
        let holder = match (contracts.qing_asset, holder) {
            (Some(asset), Some(holder)) => {
                Some(self.holder_balances(asset, contracts.crows, holder).await?)
            }
            _ => None,
        };

        tracing::info!(
            chain_id,
            affection = affection.is_some(),
            lau = lau.is_some(),
            holder = holder.is_some(),
            endpoint = %self.rpc.endpoint(),
            "Hydrated chain snapshot"
        );

        Ok(ChainSnapshot {
            chain_id,
            affection,
            lau,
            holder,
        })
    }
}
