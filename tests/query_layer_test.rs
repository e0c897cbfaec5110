//! Query services against mocked node and indexer endpoints
//!
//! Validates:
//! - Missing top-level keys yield default records and are counted
//! - Transfers are split into sent and received
//! - Asset labels are looked up once per asset within a call
//! - Error statuses surface as remote errors
//! - Asset summaries carry market figures when a market client is set

use asa_client::metrics::metrics;
use asa_client::query::{AccountSummary, AlgoBalance, AssetSummary, TransactionDetail};
use asa_client::rpc::HttpEndpoint;
use asa_client::{
    AccountQuery, AssetQuery, ExplorerLinks, HistoryQuery, IndexerClient, MarketClient, Network,
    NetworkQuery, NodeClient,
};
use mockito::{Matcher, Server, ServerGuard};
use std::time::Duration;

const ME: &str = "MEADDRESS";
const OTHER: &str = "OTHERADDRESS";

fn node(server: &ServerGuard) -> NodeClient {
    NodeClient::connect(&server.url(), None, Duration::from_secs(5)).unwrap()
}

fn indexer(server: &ServerGuard) -> IndexerClient {
    IndexerClient::connect(&server.url(), None, Duration::from_secs(5)).unwrap()
}

fn defaults_for(record: &str) -> u64 {
    metrics().query_defaults.with_label_values(&[record]).get()
}

#[tokio::test]
async fn test_missing_account_key_yields_default() {
    let mut node_server = Server::new_async().await;
    let indexer_server = Server::new_async().await;
    let _account = node_server
        .mock("GET", "/v2/accounts/NOPE")
        .with_status(200)
        .with_body("{}")
        .create_async()
        .await;

    let before = defaults_for("AlgoBalance");
    let query = AccountQuery::new(node(&node_server), indexer(&indexer_server));
    let balance = query.algo_balance("NOPE").await.unwrap();

    assert_eq!(balance, AlgoBalance::default());
    assert!(defaults_for("AlgoBalance") > before);
}

#[tokio::test]
async fn test_spendable_balance() {
    let mut node_server = Server::new_async().await;
    let indexer_server = Server::new_async().await;
    let _account = node_server
        .mock("GET", format!("/v2/accounts/{}", ME).as_str())
        .with_status(200)
        .with_body(format!(
            r#"{{"address":"{}","amount":5000000,"min-balance":200000,"total-assets-opted-in":2}}"#,
            ME
        ))
        .create_async()
        .await;

    let query = AccountQuery::new(node(&node_server), indexer(&indexer_server));
    let balance = query.algo_balance(ME).await.unwrap();

    assert_eq!(balance.balance.raw(), 5_000_000);
    assert_eq!(balance.spendable.raw(), 4_800_000);
    assert_eq!(balance.asset_count, 2);
    assert_eq!(balance.balance.to_string(), "5");
}

#[tokio::test]
async fn test_account_summary_merges_indexer_fields() {
    let mut node_server = Server::new_async().await;
    let mut indexer_server = Server::new_async().await;
    let path = format!("/v2/accounts/{}", ME);
    let _node = node_server
        .mock("GET", path.as_str())
        .with_status(200)
        .with_body(format!(r#"{{"address":"{}","amount":1000,"status":"Offline"}}"#, ME))
        .create_async()
        .await;
    let _indexed = indexer_server
        .mock("GET", path.as_str())
        .with_status(200)
        .with_body(r#"{"account":{"created-at-round":77,"sig-type":"sig"}}"#)
        .create_async()
        .await;
    let _block = indexer_server
        .mock("GET", "/v2/blocks/77")
        .with_status(200)
        .with_body(r#"{"round":77,"timestamp":1650000000}"#)
        .create_async()
        .await;

    let query = AccountQuery::new(node(&node_server), indexer(&indexer_server));
    let summary = query.account_summary(ME).await.unwrap();

    assert_eq!(summary.address, ME);
    assert_eq!(summary.status, "Offline");
    assert_eq!(summary.block_created, 77);
    assert_eq!(summary.sig_type, "sig");
    assert_eq!(summary.date_created, "15-04-2022, 05:20:00");
}

#[tokio::test]
async fn test_account_summary_without_indexer_key() {
    let mut node_server = Server::new_async().await;
    let mut indexer_server = Server::new_async().await;
    let path = format!("/v2/accounts/{}", ME);
    let _node = node_server
        .mock("GET", path.as_str())
        .with_status(200)
        .with_body(format!(r#"{{"address":"{}"}}"#, ME))
        .create_async()
        .await;
    let _indexed = indexer_server
        .mock("GET", path.as_str())
        .with_status(200)
        .with_body(r#"{"current-round":5}"#)
        .create_async()
        .await;

    let query = AccountQuery::new(node(&node_server), indexer(&indexer_server));
    assert_eq!(query.account_summary(ME).await.unwrap(), AccountSummary::default());
}

#[tokio::test]
async fn test_payment_history_split() {
    let node_server = Server::new_async().await;
    let mut indexer_server = Server::new_async().await;
    let _txs = indexer_server
        .mock("GET", "/v2/transactions")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("address".into(), ME.into()),
            Matcher::UrlEncoded("tx-type".into(), "pay".into()),
        ]))
        .with_status(200)
        .with_body(format!(
            r#"{{"transactions":[
                {{"id":"T1","sender":"{me}","fee":1000,"tx-type":"pay","round-time":1650000000,
                  "payment-transaction":{{"receiver":"{other}","amount":2500000}}}},
                {{"id":"T2","sender":"{other}","fee":1000,"tx-type":"pay",
                  "payment-transaction":{{"receiver":"{me}","amount":1}}}}
            ]}}"#,
            me = ME,
            other = OTHER
        ))
        .create_async()
        .await;

    let query = HistoryQuery::new(
        node(&node_server),
        indexer(&indexer_server),
        ExplorerLinks::for_network(Network::TestNet),
    );
    let history = query.payment_history(ME, None).await.unwrap();

    assert_eq!(history.len(), 2);
    assert_eq!(history.sent.len(), 1);
    assert_eq!(history.received.len(), 1);

    let sent = &history.sent[0];
    assert_eq!(sent.txid, "T1");
    assert_eq!(sent.receiver, OTHER);
    assert_eq!(sent.amount.to_string(), "2.5");
    assert_eq!(sent.asset_name, "ALGO");
    assert_eq!(sent.link, "https://testnet.allo.info/tx/T1");
    assert_eq!(history.received[0].timestamp, "");
}

#[tokio::test]
async fn test_asset_transfer_labels_fetched_once() {
    let mut node_server = Server::new_async().await;
    let mut indexer_server = Server::new_async().await;
    let label = node_server
        .mock("GET", "/v2/assets/9")
        .with_status(200)
        .with_body(r#"{"index":9,"params":{"name":"Gold","unit-name":"GLD","decimals":2,"total":100}}"#)
        .expect(1)
        .create_async()
        .await;
    let _txs = indexer_server
        .mock("GET", "/v2/transactions")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(format!(
            r#"{{"transactions":[
                {{"id":"A1","sender":"{me}","tx-type":"axfer",
                  "asset-transfer-transaction":{{"asset-id":9,"amount":150,"receiver":"{other}"}}}},
                {{"id":"A2","sender":"{other}","tx-type":"axfer",
                  "asset-transfer-transaction":{{"asset-id":9,"amount":5,"receiver":"{me}"}}}}
            ]}}"#,
            me = ME,
            other = OTHER
        ))
        .create_async()
        .await;

    let query = HistoryQuery::new(
        node(&node_server),
        indexer(&indexer_server),
        ExplorerLinks::for_network(Network::MainNet),
    );
    let history = query.asset_transfer_history(ME, Some(10)).await.unwrap();

    assert_eq!(history.sent[0].asset_name, "Gold");
    assert_eq!(history.sent[0].unit, "GLD");
    assert_eq!(history.sent[0].amount.to_string(), "1.5");
    assert_eq!(history.received[0].amount.to_string(), "0.05");
    label.assert_async().await;
}

#[tokio::test]
async fn test_missing_transaction_yields_default_detail() {
    let node_server = Server::new_async().await;
    let mut indexer_server = Server::new_async().await;
    let _tx = indexer_server
        .mock("GET", "/v2/transactions/GONE")
        .with_status(200)
        .with_body(r#"{"current-round":10}"#)
        .create_async()
        .await;

    let query = HistoryQuery::new(
        node(&node_server),
        indexer(&indexer_server),
        ExplorerLinks::for_network(Network::TestNet),
    );
    assert_eq!(
        query.transaction_detail("GONE").await.unwrap(),
        TransactionDetail::default()
    );
    assert_eq!(query.confirmed_round("GONE").await.unwrap(), None);
}

#[tokio::test]
async fn test_transaction_detail_for_payment() {
    let node_server = Server::new_async().await;
    let mut indexer_server = Server::new_async().await;
    let _tx = indexer_server
        .mock("GET", "/v2/transactions/PAY1")
        .with_status(200)
        .with_body(format!(
            r#"{{"transaction":{{"id":"PAY1","sender":"{}","fee":1000,"tx-type":"pay",
                "confirmed-round":321,"note":"aGVsbG8=",
                "payment-transaction":{{"receiver":"{}","amount":1000000}}}}}}"#,
            ME, OTHER
        ))
        .create_async()
        .await;

    let query = HistoryQuery::new(
        node(&node_server),
        indexer(&indexer_server),
        ExplorerLinks::for_network(Network::TestNet),
    );
    let detail = query.transaction_detail("PAY1").await.unwrap();
    assert_eq!(detail.name, "ALGO");
    assert_eq!(detail.asset_id, 0);
    assert_eq!(detail.amount.to_string(), "1");
    assert_eq!(detail.note, "hello");
    assert_eq!(detail.confirmed_round, 321);
    assert!(query.is_confirmed("PAY1").await.unwrap());
}

#[tokio::test]
async fn test_unknown_transaction_is_not_confirmed() {
    let node_server = Server::new_async().await;
    let mut indexer_server = Server::new_async().await;
    let _tx = indexer_server
        .mock("GET", "/v2/transactions/MISSING")
        .with_status(404)
        .with_body(r#"{"message":"no transaction found"}"#)
        .create_async()
        .await;

    let query = HistoryQuery::new(
        node(&node_server),
        indexer(&indexer_server),
        ExplorerLinks::for_network(Network::TestNet),
    );
    assert!(!query.is_confirmed("MISSING").await.unwrap());
}

#[tokio::test]
async fn test_remote_error_is_not_defaulted() {
    let mut indexer_server = Server::new_async().await;
    let _asset = indexer_server
        .mock("GET", "/v2/assets/404")
        .with_status(404)
        .with_body(r#"{"message":"no assets found for asset-id: 404"}"#)
        .create_async()
        .await;

    let query = AssetQuery::new(indexer(&indexer_server));
    let err = query.summary(404).await.unwrap_err();
    assert!(err.is_remote());
    assert!(err.to_string().contains("no assets found"));
}

#[tokio::test]
async fn test_asset_roles_and_supply() {
    let mut indexer_server = Server::new_async().await;
    let _asset = indexer_server
        .mock("GET", "/v2/assets/31")
        .with_status(200)
        .with_body(format!(
            r#"{{"asset":{{"index":31,"params":{{"creator":"{me}","manager":"{me}",
                "freeze":"","total":1000,"decimals":0}}}}}}"#,
            me = ME
        ))
        .create_async()
        .await;
    let _creator = indexer_server
        .mock("GET", format!("/v2/accounts/{}", ME).as_str())
        .with_status(200)
        .with_body(r#"{"account":{"assets":[{"asset-id":5,"amount":1},{"asset-id":31,"amount":1000}]}}"#)
        .create_async()
        .await;

    let query = AssetQuery::new(indexer(&indexer_server));
    assert!(query.is_manager(31, ME).await.unwrap());
    assert!(query.is_creator(31, ME).await.unwrap());
    assert!(!query.is_freeze(31, ME).await.unwrap());
    assert!(query.can_manage(31).await.unwrap());
    assert!(!query.can_freeze(31).await.unwrap());
    assert!(!query.can_clawback(31).await.unwrap());
    assert!(query.is_nft(31).await.unwrap());
    assert!(query.creator_holds_all_supply(31).await.unwrap());
    assert_eq!(query.amount_with_decimals(31, 7).await.unwrap().to_string(), "7");
}

#[tokio::test]
async fn test_nft_holder() {
    let mut indexer_server = Server::new_async().await;
    let _balances = indexer_server
        .mock("GET", "/v2/assets/88/balances")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("currency-greater-than".into(), "0".into()),
            Matcher::UrlEncoded("currency-less-than".into(), "2".into()),
        ]))
        .with_status(200)
        .with_body(format!(r#"{{"balances":[{{"address":"{}","amount":1}}]}}"#, OTHER))
        .create_async()
        .await;

    let query = AssetQuery::new(indexer(&indexer_server));
    let holder = query.nft_holder(88).await.unwrap().unwrap();
    assert_eq!(holder.address, OTHER);
    assert_eq!(holder.amount, 1);
}

#[tokio::test]
async fn test_network_fee_uses_minimum() {
    let mut node_server = Server::new_async().await;
    let _params = node_server
        .mock("GET", "/v2/transactions/params")
        .with_status(200)
        .with_body(
            r#"{"consensus-version":"v1","fee":0,"genesis-hash":"SGO1GKSzyE7IEPItTxCByw9x8FmnrCDexi9/cOUJOiI=",
                "genesis-id":"testnet-v1.0","last-round":100,"min-fee":1000}"#,
        )
        .create_async()
        .await;

    let query = NetworkQuery::new(node(&node_server));
    let fee = query.network_fee().await.unwrap();
    assert_eq!(fee.raw(), 1000);
    assert_eq!(fee.to_string(), "0.001");
}

#[tokio::test]
async fn test_missing_asset_key_yields_default_summary() {
    let mut indexer_server = Server::new_async().await;
    let _asset = indexer_server
        .mock("GET", "/v2/assets/12")
        .with_status(200)
        .with_body("{}")
        .create_async()
        .await;

    let before = defaults_for("AssetSummary");
    let query = AssetQuery::new(indexer(&indexer_server));
    assert_eq!(query.summary(12).await.unwrap(), AssetSummary::default());
    assert!(defaults_for("AssetSummary") > before);
}

#[tokio::test]
async fn test_summary_with_market_data() {
    let mut indexer_server = Server::new_async().await;
    let mut market_server = Server::new_async().await;
    let mut explorer_server = Server::new_async().await;
    let _asset = indexer_server
        .mock("GET", "/v2/assets/31")
        .with_status(200)
        .with_body(format!(
            r#"{{"asset":{{"index":31,"created-at-round":77,"params":{{"creator":"{me}",
                "manager":"{me}","name":"Gold","unit-name":"GLD","total":1000000,"decimals":2}}}}}}"#,
            me = ME
        ))
        .create_async()
        .await;
    let _block = indexer_server
        .mock("GET", "/v2/blocks/77")
        .with_status(200)
        .with_body(r#"{"round":77,"timestamp":1650000000}"#)
        .create_async()
        .await;
    let _price = market_server
        .mock("GET", "/asset/31/price")
        .with_status(200)
        .with_body(r#"{"USD":0.5}"#)
        .create_async()
        .await;
    let _supply = market_server
        .mock("GET", "/asset/31")
        .with_status(200)
        .with_body(r#"{"circulating_supply":"40000","burned_supply":"100","decimals":2}"#)
        .create_async()
        .await;
    let _description = explorer_server
        .mock("GET", "/v2/assets/31")
        .match_query(Matcher::UrlEncoded("include-all".into(), "true".into()))
        .with_status(200)
        .with_body(r#"{"asset":{"verification":{"description":"Gold token"}}}"#)
        .create_async()
        .await;

    let timeout = Duration::from_secs(5);
    let market = MarketClient::new(
        HttpEndpoint::new(&market_server.url(), None, timeout).unwrap(),
        Some(HttpEndpoint::new(&explorer_server.url(), None, timeout).unwrap()),
    );
    let query = AssetQuery::new(indexer(&indexer_server)).with_market(market);
    let summary = query.summary(31).await.unwrap();

    assert_eq!(summary.asset_id, 31);
    assert_eq!(summary.name, "Gold");
    assert_eq!(summary.unit, "GLD");
    assert_eq!(summary.manager, ME);
    assert_eq!(summary.supply.to_string(), "10000");
    assert_eq!(summary.decimals, 2);
    assert_eq!(summary.date_created, "15-04-2022, 05:20:00");
    assert_eq!(summary.price_usd, 0.5);
    assert_eq!(summary.circulating_supply.to_string(), "400");
    assert_eq!(summary.burned_supply.to_string(), "1");
    assert_eq!(summary.market_cap, 200.0);
    assert_eq!(summary.description, "Gold token");
}

#[tokio::test]
async fn test_boolean_checks_count_missing_keys() {
    let node_server = Server::new_async().await;
    let mut indexer_server = Server::new_async().await;
    let _account = indexer_server
        .mock("GET", format!("/v2/accounts/{}", OTHER).as_str())
        .with_status(200)
        .with_body("{}")
        .create_async()
        .await;
    let _asset = indexer_server
        .mock("GET", "/v2/assets/13")
        .with_status(200)
        .with_body("{}")
        .create_async()
        .await;

    let before_account = defaults_for("IndexerAccount");
    let accounts = AccountQuery::new(node(&node_server), indexer(&indexer_server));
    assert!(!accounts.is_opted_in(OTHER, 13).await.unwrap());
    assert!(!accounts.is_frozen_for(OTHER, 13).await.unwrap());
    assert!(defaults_for("IndexerAccount") >= before_account + 2);

    let before_bool = defaults_for("bool");
    let assets = AssetQuery::new(indexer(&indexer_server));
    assert!(!assets.is_nft(13).await.unwrap());
    assert!(defaults_for("bool") > before_bool);
}

#[tokio::test]
async fn test_missing_balances_and_transaction_are_counted() {
    let node_server = Server::new_async().await;
    let mut indexer_server = Server::new_async().await;
    let _balances = indexer_server
        .mock("GET", "/v2/assets/14/balances")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body("{}")
        .create_async()
        .await;
    let _tx = indexer_server
        .mock("GET", "/v2/transactions/NOKEY")
        .with_status(200)
        .with_body(r#"{"current-round":3}"#)
        .create_async()
        .await;

    let before_balances = defaults_for("BalanceEntry");
    let assets = AssetQuery::new(indexer(&indexer_server));
    assert!(assets.nft_holder(14).await.unwrap().is_none());
    assert!(defaults_for("BalanceEntry") > before_balances);

    let before_tx = defaults_for("IndexerTransaction");
    let history = HistoryQuery::new(
        node(&node_server),
        indexer(&indexer_server),
        ExplorerLinks::for_network(Network::TestNet),
    );
    assert_eq!(history.note("NOKEY").await.unwrap(), "");
    assert_eq!(history.confirmation_time("NOKEY").await.unwrap(), "");
    assert_eq!(history.created_asset_id("NOKEY").await.unwrap(), None);
    assert!(defaults_for("IndexerTransaction") >= before_tx + 3);
}
