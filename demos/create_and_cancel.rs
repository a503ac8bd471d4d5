use std::{env, sync::Arc};

use ethers::{
    middleware::SignerMiddleware,
    providers::{Http, Middleware, Provider},
    signers::{LocalWallet, Signer},
    types::{Address, U256},
};
use log::info;
use seaport_rust_sdk::{
    exchange::actions::Action, ConsiderationInputItem, CreateInputItem, CreateOrderInput, Error,
    Fee, Seaport, SeaportConfig,
};

// Lists an ERC721 for 1 ether, checks its status, then cancels every open
// order of the account by bumping its counter.
//
//   SEAPORT_RPC_URL      node endpoint (defaults to a local devnet)
//   SEAPORT_PRIVATE_KEY  offerer key
//   NFT_ADDRESS, NFT_ID  token to list
//   SEAPORT_CONFIG       optional JSON client config
#[tokio::main]
async fn main() -> Result<(), Error> {
    env_logger::init();

    let rpc_url =
        env::var("SEAPORT_RPC_URL").unwrap_or_else(|_| "http://127.0.0.1:8545".to_string());
    let provider = Provider::<Http>::try_from(rpc_url).map_err(|e| Error::Rpc(e.to_string()))?;
    let chain_id = provider
        .get_chainid()
        .await
        .map_err(|e| Error::Rpc(e.to_string()))?;

    let wallet: LocalWallet = env::var("SEAPORT_PRIVATE_KEY")
        .map_err(|_| Error::MissingAccount)?
        .parse()
        .map_err(|e: ethers::signers::WalletError| Error::SignatureFailure(e.to_string()))?;
    let wallet = wallet.with_chain_id(chain_id.as_u64());
    let offerer = wallet.address();

    let config = match env::var("SEAPORT_CONFIG") {
        Ok(json) => SeaportConfig::from_json_str(&json)?,
        Err(_) => SeaportConfig::default(),
    };
    let client = Arc::new(SignerMiddleware::new(provider, wallet.clone()));
    let seaport = Seaport::with_chain_id(client, chain_id, config).with_wallet(wallet);

    let nft: Address = env::var("NFT_ADDRESS")
        .unwrap_or_default()
        .parse()
        .map_err(|_| Error::JsonParse("NFT_ADDRESS is not an address".to_string()))?;
    let nft_id = U256::from_dec_str(&env::var("NFT_ID").unwrap_or_else(|_| "1".to_string()))
        .map_err(|e| Error::JsonParse(e.to_string()))?;

    let input = CreateOrderInput {
        offer: vec![CreateInputItem::Erc721 {
            token: nft,
            identifier: nft_id,
        }],
        consideration: vec![ConsiderationInputItem {
            item: CreateInputItem::Currency {
                amount: U256::exp10(18),
                end_amount: None,
                token: None,
            },
            recipient: None,
        }],
        fees: vec![Fee {
            recipient: Address::repeat_byte(0xfe),
            basis_points: 250,
        }],
        domain: Some("demo.seaport".to_string()),
        ..Default::default()
    };

    let use_case = seaport.create_order(input, None).await?;
    for action in use_case.actions() {
        match action {
            Action::Approval(a) => info!("Approve {:#x} for operator {:#x}", a.token, a.operator),
            Action::Create(_) => info!("Sign order"),
            Action::Exchange(_) => {}
        }
    }
    let order = use_case.execute_all_actions().await?;
    let order_hash = seaport.get_order_hash(&order.parameters);
    println!("Created order {order_hash:#x}");
    let json = serde_json::to_string_pretty(&order).map_err(|e| Error::JsonParse(e.to_string()))?;
    println!("{json}");

    let status = seaport.get_order_status(order_hash).await?;
    println!("Status: {status:?}");

    seaport.bulk_cancel_orders(None, None, None)?.transact().await?;
    let counter = seaport.get_counter(offerer).await?;
    println!("Counter moved from {} to {counter}", order.parameters.counter);

    Ok(())
}
