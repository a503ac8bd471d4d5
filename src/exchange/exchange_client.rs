use std::{collections::HashMap, sync::Arc};

use ethers::{
    providers::Middleware,
    signers::{LocalWallet, Signer},
    types::{transaction::eip712::EIP712Domain, Address, BlockNumber, Bytes, H256, U256},
};
use log::debug;

use crate::{
    abi::seaport::SeaportContract,
    config::SeaportConfig,
    consts::{NO_CONDUIT, OPENSEA_CONDUIT_ADDRESS, OPENSEA_CONDUIT_KEY, SEAPORT_CONTRACT_NAME},
    exchange::{
        actions::{Action, ApprovalAction, CreateOrderAction},
        amounts::summed_token_amounts,
        balance::{
            approval_actions, balances_and_approvals, has_sufficient_balances,
            insufficient_approvals,
        },
        builder::build_order_components,
        dtos::CreateOrderInput,
        order::{OrderComponents, OrderWithCounter},
    },
    helpers::current_timestamp,
    prelude::*,
    signature::create_signature::{request_order_signature, sign_order_with_wallet},
    Error,
};

/// Client for a deployed Seaport contract
pub struct Seaport<M> {
    pub(crate) contract: SeaportContract<M>,
    pub(crate) provider: Arc<M>,
    pub(crate) config: SeaportConfig,
    chain_id: U256,
    conduit_key_to_conduit: HashMap<H256, Address>,
    wallet: Option<LocalWallet>,
}

impl<M: Middleware + 'static> Seaport<M> {
    /// Builds a client, fetching the chain id used in the signing domain
    pub async fn new(provider: Arc<M>, config: SeaportConfig) -> Result<Self> {
        let chain_id = provider
            .get_chainid()
            .await
            .map_err(|e| Error::Rpc(e.to_string()))?;
        Ok(Self::with_chain_id(provider, chain_id, config))
    }

    pub fn with_chain_id(
        provider: Arc<M>,
        chain_id: impl Into<U256>,
        config: SeaportConfig,
    ) -> Self {
        let address = config.seaport_address();
        let mut conduit_key_to_conduit = HashMap::from([
            (NO_CONDUIT, address),
            (OPENSEA_CONDUIT_KEY, OPENSEA_CONDUIT_ADDRESS),
        ]);
        conduit_key_to_conduit.extend(config.conduit_key_to_conduit.iter().map(|(k, v)| (*k, *v)));

        Seaport {
            contract: SeaportContract::new(address, provider.clone()),
            provider,
            config,
            chain_id: chain_id.into(),
            conduit_key_to_conduit,
            wallet: None,
        }
    }

    /// Signs orders for the wallet's address locally instead of asking the
    /// node. The wallet also becomes the default account.
    pub fn with_wallet(mut self, wallet: LocalWallet) -> Self {
        self.wallet = Some(wallet);
        self
    }

    pub fn address(&self) -> Address {
        self.contract.address()
    }

    pub fn config(&self) -> &SeaportConfig {
        &self.config
    }

    pub fn domain(&self) -> EIP712Domain {
        EIP712Domain {
            name: Some(SEAPORT_CONTRACT_NAME.to_string()),
            version: Some(self.config.seaport_version.as_str().to_string()),
            chain_id: Some(self.chain_id),
            verifying_contract: Some(self.address()),
            salt: None,
        }
    }

    /// Address that must be approved to move tokens under `conduit_key`
    pub fn conduit_address(&self, conduit_key: H256) -> Result<Address> {
        self.conduit_key_to_conduit
            .get(&conduit_key)
            .copied()
            .ok_or(Error::UnknownConduit(conduit_key))
    }

    pub(crate) fn resolve_account(&self, account_address: Option<Address>) -> Result<Address> {
        account_address
            .or_else(|| self.wallet.as_ref().map(|w| w.address()))
            .or_else(|| self.provider.default_sender())
            .ok_or(Error::MissingAccount)
    }

    pub(crate) async fn current_block_timestamp(&self) -> Result<U256> {
        self.provider
            .get_block(BlockNumber::Latest)
            .await
            .map_err(|e| Error::Rpc(e.to_string()))?
            .map(|block| block.timestamp)
            .ok_or_else(|| Error::Rpc("latest block is unavailable".to_string()))
    }

    /// Prepares an order for signing. Missing approvals for the offered items
    /// are returned as actions that run before the signature is requested.
    pub async fn create_order(
        &self,
        input: CreateOrderInput,
        account_address: Option<Address>,
    ) -> Result<CreateOrderUseCase<'_, M>> {
        let offerer = self.resolve_account(account_address)?;
        let conduit_key = input.conduit_key.unwrap_or(self.config.default_conduit_key);
        let operator = self.conduit_address(conduit_key)?;

        let counter = match input.counter {
            Some(counter) => counter,
            None => self.get_counter(offerer).await?,
        };
        let order_components =
            build_order_components(&input, offerer, counter, conduit_key, current_timestamp())?;

        let approval_actions = if self.config.balance_and_approval_checks_on_order_creation {
            let required = summed_token_amounts(&order_components.offer, None, None)?;
            let balances =
                balances_and_approvals(&self.provider, offerer, &required, operator).await?;
            if !has_sufficient_balances(&balances, &required) {
                return Err(Error::InsufficientOffererBalance);
            }
            let insufficient = insufficient_approvals(&balances, &required);
            approval_actions(&self.provider, offerer, &insufficient, operator)
        } else {
            vec![]
        };

        debug!(
            "Prepared order for {offerer:#x} with counter {counter} and {} approval(s)",
            approval_actions.len()
        );
        Ok(CreateOrderUseCase {
            seaport: self,
            account: offerer,
            approval_actions,
            create_action: CreateOrderAction { order_components },
        })
    }

    /// Signs order components for `account`: locally when it is the
    /// attached wallet, otherwise through the node
    pub async fn sign_order(
        &self,
        order_components: &OrderComponents,
        account_address: Option<Address>,
    ) -> Result<Bytes> {
        let account = self.resolve_account(account_address)?;
        let domain = self.domain();
        match &self.wallet {
            Some(wallet) if wallet.address() == account => {
                sign_order_with_wallet(wallet, &domain, order_components)
            }
            _ => {
                debug!("Requesting signature from node for {account:#x}");
                request_order_signature(self.provider.as_ref(), &domain, order_components, account)
                    .await
            }
        }
    }
}

pub struct CreateOrderUseCase<'a, M> {
    seaport: &'a Seaport<M>,
    account: Address,
    pub approval_actions: Vec<ApprovalAction<M>>,
    pub create_action: CreateOrderAction,
}

impl<'a, M: Middleware + 'static> CreateOrderUseCase<'a, M> {
    pub fn actions(&self) -> Vec<Action<'_, M>> {
        self.approval_actions
            .iter()
            .map(Action::Approval)
            .chain(std::iter::once(Action::Create(&self.create_action)))
            .collect()
    }

    /// Sends the approvals in order, then signs the order
    pub async fn execute_all_actions(&self) -> Result<OrderWithCounter> {
        for approval in &self.approval_actions {
            approval.transaction_methods.transact().await?;
        }
        let parameters = self.create_action.order_components.clone();
        let signature = self.seaport.sign_order(&parameters, Some(self.account)).await?;
        Ok(OrderWithCounter {
            parameters,
            signature,
        })
    }
}

#[cfg(test)]
mod tests {
    use ethers::{
        abi::AbiEncode,
        middleware::SignerMiddleware,
        providers::Provider,
        signers::{LocalWallet, Signer},
    };

    use super::*;
    use crate::{
        consts::CROSS_CHAIN_SEAPORT_V1_5_ADDRESS,
        eip712::Eip712,
        exchange::dtos::{ConsiderationInputItem, CreateInputItem, Fee},
        signature::create_signature::recover_order_signer,
    };

    // First well-known development key
    const DEV_KEY: &str = "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    fn input(offerer: Address) -> CreateOrderInput {
        CreateOrderInput {
            start_time: Some(U256::zero()),
            offer: vec![CreateInputItem::Erc721 {
                token: Address::repeat_byte(0x72),
                identifier: 1.into(),
            }],
            consideration: vec![ConsiderationInputItem {
                item: CreateInputItem::Currency {
                    amount: U256::exp10(19),
                    end_amount: None,
                    token: None,
                },
                recipient: Some(offerer),
            }],
            fees: vec![Fee {
                recipient: Address::repeat_byte(0x20),
                basis_points: 250,
            }],
            ..Default::default()
        }
    }

    #[test]
    fn domain_uses_canonical_deployment() {
        let (provider, _mock) = Provider::mocked();
        let seaport = Seaport::with_chain_id(Arc::new(provider), 1u64, SeaportConfig::default());
        let domain = seaport.domain();

        assert_eq!(domain.name.as_deref(), Some("Seaport"));
        assert_eq!(domain.version.as_deref(), Some("1.5"));
        assert_eq!(domain.chain_id, Some(U256::one()));
        assert_eq!(domain.verifying_contract, Some(CROSS_CHAIN_SEAPORT_V1_5_ADDRESS));
        assert_eq!(seaport.conduit_address(NO_CONDUIT).unwrap(), CROSS_CHAIN_SEAPORT_V1_5_ADDRESS);
        assert_eq!(
            seaport.conduit_address(OPENSEA_CONDUIT_KEY).unwrap(),
            OPENSEA_CONDUIT_ADDRESS
        );
        assert!(matches!(
            seaport.conduit_address(H256::repeat_byte(1)),
            Err(Error::UnknownConduit(_))
        ));
    }

    #[tokio::test]
    async fn missing_account_is_reported() {
        let (provider, _mock) = Provider::mocked();
        let seaport = Seaport::with_chain_id(Arc::new(provider), 1u64, SeaportConfig::default());
        let result = seaport.create_order(CreateOrderInput::default(), None).await;
        assert!(matches!(result, Err(Error::MissingAccount)));
    }

    #[tokio::test]
    async fn create_order_signs_with_the_offerer_key() {
        let (provider, mock) = Provider::mocked();
        let wallet: LocalWallet = DEV_KEY.parse().unwrap();
        let offerer = wallet.address();
        let wallet = wallet.with_chain_id(31337u64);
        let client = Arc::new(SignerMiddleware::new(provider, wallet.clone()));

        let config = SeaportConfig {
            balance_and_approval_checks_on_order_creation: false,
            ..Default::default()
        };
        let seaport = Seaport::with_chain_id(client, 31337u64, config).with_wallet(wallet);

        // getCounter
        mock.push::<Bytes, _>(Bytes::from(U256::from(4).encode())).unwrap();

        let use_case = seaport.create_order(input(offerer), None).await.unwrap();
        assert_eq!(use_case.actions().len(), 1);
        assert!(matches!(use_case.actions()[0], Action::Create(_)));

        let order = use_case.execute_all_actions().await.unwrap();
        assert_eq!(order.parameters.counter, U256::from(4));
        assert_eq!(order.parameters.offerer, offerer);
        assert_eq!(order.signature.len(), 65);

        let domain = seaport.domain();
        let signer = recover_order_signer(&domain, &order.parameters, &order.signature).unwrap();
        assert_eq!(signer, offerer);
        assert_ne!(
            seaport.get_order_hash(&order.parameters),
            order.parameters.eip712_signing_hash(&domain)
        );
    }

    #[tokio::test]
    async fn accounts_without_a_wallet_sign_through_the_node() {
        let (provider, mock) = Provider::mocked();
        let node_key: LocalWallet = DEV_KEY.parse().unwrap();
        let account = node_key.address();
        let config = SeaportConfig {
            balance_and_approval_checks_on_order_creation: false,
            ..Default::default()
        };
        let seaport = Seaport::with_chain_id(Arc::new(provider), 31337u64, config);

        let mut input = input(account);
        input.counter = Some(U256::zero());
        let use_case = seaport.create_order(input, Some(account)).await.unwrap();

        // what the node returns for eth_signTypedData_v4
        let components = &use_case.create_action.order_components;
        let node_signature = node_key
            .sign_hash(components.eip712_signing_hash(&seaport.domain()))
            .unwrap();
        mock.push::<Bytes, _>(Bytes::from(node_signature.to_vec())).unwrap();

        let order = use_case.execute_all_actions().await.unwrap();
        let signer =
            recover_order_signer(&seaport.domain(), &order.parameters, &order.signature).unwrap();
        assert_eq!(signer, account);
    }

    #[test]
    fn wallet_is_the_default_account() {
        let (provider, _mock) = Provider::mocked();
        let wallet: LocalWallet = DEV_KEY.parse().unwrap();
        let address = wallet.address();
        let seaport = Seaport::with_chain_id(Arc::new(provider), 1u64, SeaportConfig::default())
            .with_wallet(wallet);
        assert_eq!(seaport.resolve_account(None).unwrap(), address);
        assert_eq!(
            seaport.resolve_account(Some(Address::repeat_byte(7))).unwrap(),
            Address::repeat_byte(7)
        );
    }
}
