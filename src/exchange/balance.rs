use std::{collections::HashSet, sync::Arc};

use ethers::{
    providers::Middleware,
    types::{Address, U256},
};
use futures_util::future::try_join_all;
use log::debug;

use crate::{
    abi::{erc1155::Erc1155, erc20::Erc20, erc721::Erc721},
    consts::MAX_INT,
    exchange::{
        actions::{ApprovalAction, TransactionMethods},
        amounts::TokenAmounts,
        order::ItemType,
    },
    prelude::*,
    Error,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BalanceAndApproval {
    pub token: Address,
    pub identifier_or_criteria: U256,
    pub item_type: ItemType,
    pub balance: U256,
    pub approved_amount: U256,
}

impl BalanceAndApproval {
    fn key(&self) -> (Address, U256) {
        (self.token, self.identifier_or_criteria)
    }
}

async fn balance_and_approval<M: Middleware + 'static>(
    provider: Arc<M>,
    owner: Address,
    token: Address,
    identifier_or_criteria: U256,
    item_type: ItemType,
    operator: Address,
) -> Result<BalanceAndApproval> {
    let contract_err =
        |e: ethers::contract::ContractError<M>| Error::ContractInteraction(e.to_string());

    let (balance, approved_amount) = match item_type {
        ItemType::Native => {
            let balance = provider
                .get_balance(owner, None)
                .await
                .map_err(|e| Error::Rpc(e.to_string()))?;
            (balance, MAX_INT)
        }
        ItemType::Erc20 => {
            let erc20 = Erc20::new(token, provider);
            let balance = erc20.balance_of(owner).call().await.map_err(contract_err)?;
            let allowance = erc20.allowance(owner, operator).call().await.map_err(contract_err)?;
            (balance, allowance)
        }
        ItemType::Erc721 | ItemType::Erc721WithCriteria => {
            let erc721 = Erc721::new(token, provider);
            let token_owner = erc721
                .owner_of(identifier_or_criteria)
                .call()
                .await
                .map_err(contract_err)?;
            let approved = erc721
                .is_approved_for_all(owner, operator)
                .call()
                .await
                .map_err(contract_err)?;
            let balance = if token_owner == owner { U256::one() } else { U256::zero() };
            (balance, if approved { MAX_INT } else { U256::zero() })
        }
        ItemType::Erc1155 | ItemType::Erc1155WithCriteria => {
            let erc1155 = Erc1155::new(token, provider);
            let balance = erc1155
                .balance_of(owner, identifier_or_criteria)
                .call()
                .await
                .map_err(contract_err)?;
            let approved = erc1155
                .is_approved_for_all(owner, operator)
                .call()
                .await
                .map_err(contract_err)?;
            (balance, if approved { MAX_INT } else { U256::zero() })
        }
    };

    Ok(BalanceAndApproval {
        token,
        identifier_or_criteria,
        item_type,
        balance,
        approved_amount,
    })
}

/// Looks up the owner's balance of, and the operator's allowance over, every
/// token in `required`
pub async fn balances_and_approvals<M: Middleware + 'static>(
    provider: &Arc<M>,
    owner: Address,
    required: &TokenAmounts,
    operator: Address,
) -> Result<Vec<BalanceAndApproval>> {
    try_join_all(required.iter().map(|(&(token, identifier), amount)| {
        balance_and_approval(
            provider.clone(),
            owner,
            token,
            identifier,
            amount.item_type,
            operator,
        )
    }))
    .await
}

pub fn has_sufficient_balances(balances: &[BalanceAndApproval], required: &TokenAmounts) -> bool {
    balances.iter().all(|b| {
        required
            .get(&b.key())
            .map_or(true, |needed| b.balance >= needed.amount)
    })
}

/// Balances whose approved amount falls short, one per token for
/// collection-wide approvals
pub fn insufficient_approvals(
    balances: &[BalanceAndApproval],
    required: &TokenAmounts,
) -> Vec<BalanceAndApproval> {
    let mut seen_tokens = HashSet::new();
    balances
        .iter()
        .filter(|b| b.item_type != ItemType::Native)
        .filter(|b| {
            required
                .get(&b.key())
                .is_some_and(|needed| b.approved_amount < needed.amount)
        })
        .filter(|b| seen_tokens.insert(b.token))
        .copied()
        .collect()
}

pub fn approval_actions<M: Middleware + 'static>(
    provider: &Arc<M>,
    owner: Address,
    insufficient: &[BalanceAndApproval],
    operator: Address,
) -> Vec<ApprovalAction<M>> {
    let actions: Vec<ApprovalAction<M>> = insufficient
        .iter()
        .map(|b| {
            let call = match b.item_type {
                ItemType::Erc20 => Erc20::new(b.token, provider.clone()).approve(operator, MAX_INT),
                ItemType::Erc1155 | ItemType::Erc1155WithCriteria => {
                    Erc1155::new(b.token, provider.clone()).set_approval_for_all(operator, true)
                }
                _ => Erc721::new(b.token, provider.clone()).set_approval_for_all(operator, true),
            };
            ApprovalAction {
                token: b.token,
                identifier_or_criteria: b.identifier_or_criteria,
                item_type: b.item_type,
                operator,
                transaction_methods: TransactionMethods::new(call.from(owner), None),
            }
        })
        .collect();
    debug!("{} approval action(s) needed for operator {operator:#x}", actions.len());
    actions
}

#[cfg(test)]
mod tests {
    use ethers::{
        abi::{AbiEncode, Token},
        providers::Provider,
        types::Bytes,
    };

    use super::*;
    use crate::exchange::amounts::RequiredAmount;

    fn entry(token: u8, item_type: ItemType, balance: u64, approved: U256) -> BalanceAndApproval {
        BalanceAndApproval {
            token: Address::repeat_byte(token),
            identifier_or_criteria: U256::zero(),
            item_type,
            balance: balance.into(),
            approved_amount: approved,
        }
    }

    fn required(entries: &[(u8, ItemType, u64)]) -> TokenAmounts {
        entries
            .iter()
            .map(|&(token, item_type, amount)| {
                (
                    (Address::repeat_byte(token), U256::zero()),
                    RequiredAmount {
                        item_type,
                        amount: amount.into(),
                    },
                )
            })
            .collect()
    }

    #[test]
    fn balance_shortfall_is_detected() {
        let needed = required(&[(1, ItemType::Erc20, 100), (2, ItemType::Erc721, 1)]);
        let enough = vec![
            entry(1, ItemType::Erc20, 100, MAX_INT),
            entry(2, ItemType::Erc721, 1, MAX_INT),
        ];
        assert!(has_sufficient_balances(&enough, &needed));

        let short = vec![
            entry(1, ItemType::Erc20, 99, MAX_INT),
            entry(2, ItemType::Erc721, 1, MAX_INT),
        ];
        assert!(!has_sufficient_balances(&short, &needed));
    }

    #[test]
    fn native_items_never_need_approval() {
        let needed = required(&[(0, ItemType::Native, 5), (3, ItemType::Erc20, 5)]);
        let balances = vec![
            entry(0, ItemType::Native, 10, U256::zero()),
            entry(3, ItemType::Erc20, 10, 4.into()),
        ];
        let missing = insufficient_approvals(&balances, &needed);
        assert_eq!(missing.len(), 1);
        assert_eq!(missing[0].token, Address::repeat_byte(3));
    }

    #[test]
    fn approval_actions_target_the_operator() {
        let (provider, _mock) = Provider::mocked();
        let provider = Arc::new(provider);
        let owner = Address::repeat_byte(0xaa);
        let operator = Address::repeat_byte(0xbb);
        let missing = vec![entry(7, ItemType::Erc721, 1, U256::zero())];

        let actions = approval_actions(&provider, owner, &missing, operator);
        assert_eq!(actions.len(), 1);

        let tx = actions[0].transaction_methods.build_transaction();
        assert_eq!(tx.to_addr(), Some(&Address::repeat_byte(7)));
        assert_eq!(tx.from(), Some(&owner));
        let expected_args = ethers::abi::encode(&[Token::Address(operator), Token::Bool(true)]);
        assert_eq!(tx.data().map(|d| d[4..].to_vec()), Some(expected_args));
    }

    #[tokio::test]
    async fn erc20_balance_and_allowance_are_read() {
        let (provider, mock) = Provider::mocked();
        let provider = Arc::new(provider);
        // balanceOf and allowance both answer 100
        mock.push::<Bytes, _>(Bytes::from(U256::from(100).encode())).unwrap();
        mock.push::<Bytes, _>(Bytes::from(U256::from(100).encode())).unwrap();

        let needed = required(&[(5, ItemType::Erc20, 50)]);
        let balances = balances_and_approvals(
            &provider,
            Address::repeat_byte(0xaa),
            &needed,
            Address::repeat_byte(0xbb),
        )
        .await
        .unwrap();

        assert_eq!(balances.len(), 1);
        assert_eq!(balances[0].balance, U256::from(100));
        assert_eq!(balances[0].approved_amount, U256::from(100));
        assert!(has_sufficient_balances(&balances, &needed));
        assert!(insufficient_approvals(&balances, &needed).is_empty());
    }
}
