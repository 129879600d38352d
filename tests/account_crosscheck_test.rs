use anyhow::Result;
use clap::Parser;
use httpmock::prelude::*;
use panel_check::{CliConfig, EnableChecker, PanelClient, Settings};

#[tokio::test]
async fn test_account_crosscheck_collects_traffic_and_clients() -> Result<()> {
    let server = MockServer::start();

    server.mock(|when, then| {
        when.method(POST).path("/login");
        then.status(200)
            .header("Set-Cookie", "session=acct-test; Path=/")
            .json_body(serde_json::json!({"success": true}));
    });

    server.mock(|when, then| {
        when.method(GET).path("/panel/api/inbounds/list");
        then.status(200).json_body(serde_json::json!({
            "success": true,
            "msg": "",
            "obj": [
                {
                    "id": 1,
                    "remark": "vless-main",
                    "clientStats": [
                        {"email": "bob@node", "enable": false, "accountId": 7}
                    ]
                }
            ]
        }));
    });

    let account_list_mock = server.mock(|when, then| {
        when.method(GET).path("/panel/api/account/list");
        then.status(200).json_body(serde_json::json!({
            "success": true,
            "msg": "",
            "obj": [
                {"id": 7, "name": "resellers", "enable": false},
                {"name": "malformed-no-id"}
            ]
        }));
    });

    let traffic_mock = server.mock(|when, then| {
        when.method(GET).path("/panel/api/account/7/traffic");
        then.status(200).json_body(serde_json::json!({
            "success": true,
            "msg": "",
            "obj": {"up": 1024, "down": 4096, "total": 5120}
        }));
    });

    let clients_mock = server.mock(|when, then| {
        when.method(GET).path("/panel/api/account/7/clients");
        then.status(200).json_body(serde_json::json!({
            "success": true,
            "msg": "",
            "obj": [
                {"email": "bob@node"},
                {"email": "dave@node"}
            ]
        }));
    });

    let base_url = server.base_url();
    let cli = CliConfig::parse_from([
        "panel-check",
        "--base-url",
        base_url.as_str(),
        "--check-accounts",
        "--expect-disabled",
        "7",
    ]);
    let settings = Settings::resolve(&cli)?;
    let client = PanelClient::new(&settings.base_url, settings.timeout_seconds)?;
    let checker = EnableChecker::new(client, &settings);

    let report = checker.run().await?;

    account_list_mock.assert();
    traffic_mock.assert();
    clients_mock.assert();

    // bob is correctly disabled, so the account section reports without mismatches
    assert!(!report.has_mismatches());
    assert_eq!(report.accounts.len(), 1);
    assert_eq!(report.accounts[0].id, 7);
    assert_eq!(report.accounts[0].name, "resellers");
    assert_eq!(report.accounts[0].client_count, 2);
    assert_eq!(report.accounts[0].traffic.as_ref().unwrap().total, 5120);

    Ok(())
}

#[tokio::test]
async fn test_account_endpoint_failure_fails_the_run() -> Result<()> {
    let server = MockServer::start();

    server.mock(|when, then| {
        when.method(POST).path("/login");
        then.status(200)
            .json_body(serde_json::json!({"success": true}));
    });

    server.mock(|when, then| {
        when.method(GET).path("/panel/api/inbounds/list");
        then.status(200)
            .json_body(serde_json::json!({"success": true, "obj": []}));
    });

    server.mock(|when, then| {
        when.method(GET).path("/panel/api/account/list");
        then.status(500);
    });

    let base_url = server.base_url();
    let cli = CliConfig::parse_from([
        "panel-check",
        "--base-url",
        base_url.as_str(),
        "--check-accounts",
    ]);
    let settings = Settings::resolve(&cli)?;
    let client = PanelClient::new(&settings.base_url, settings.timeout_seconds)?;
    let checker = EnableChecker::new(client, &settings);

    let result = checker.run().await;
    assert!(result.is_err(), "expected account list failure to abort");

    Ok(())
}
