//! End-to-end tests against the live mock server.
//!
//! # Design
//! Starts the mock server on a random port, then drives the client over
//! real HTTP through `UreqTransport`. Covers the typed and untyped paths,
//! the stateful sub-account and sequence methods, and each error kind that
//! can only be observed with a real service behind the transport.

use std::net::SocketAddr;

use serde_json::json;
use voipms_core::operations::{
    CreateSubAccount, DeleteSubAccount, GetBalance, GetConferenceRecordings, GetIp, GetSequences,
    GetSubAccounts, SequenceStep, SetSequences, SubAccountSettings,
};
use voipms_core::{ApiError, CallError, Credential, Params, UreqTransport, VoipMsClient};

fn start_mock() -> SocketAddr {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run(listener).await
        })
        .unwrap();
    });
    addr
}

fn client_for(addr: SocketAddr, password: &str) -> VoipMsClient {
    VoipMsClient::with_base_url(
        &format!("http://{addr}{}", mock_server::ENDPOINT),
        Credential::new(mock_server::DEFAULT_USERNAME, password),
    )
}

#[test]
fn account_lifecycle() {
    let addr = start_mock();
    let client = client_for(addr, mock_server::DEFAULT_PASSWORD);
    let http = UreqTransport::new();

    // Step 1: plain and advanced balance.
    let balance = client.send(&http, &GetBalance { advanced: false }).unwrap();
    assert_eq!(balance.current_balance, "15.3200");
    assert!(balance.statistics.is_empty());

    let balance = client.send(&http, &GetBalance { advanced: true }).unwrap();
    assert_eq!(balance.statistics["calls_total"], json!("327"));

    // Step 2: untyped call with a single-element extraction.
    let country = client
        .call(&http, "getCountries", &Params::new().with("country", "MX"))
        .unwrap();
    assert_eq!(country, json!("Mexico"));

    // Step 3: create a sub-account; spaces and '@' survive the query encoding.
    let created = client
        .send(
            &http,
            &CreateSubAccount {
                username: "kitchen".to_string(),
                protocol: "1".to_string(),
                settings: SubAccountSettings {
                    description: "Kitchen phone @ home".to_string(),
                    password: "pw".to_string(),
                    ..Default::default()
                },
            },
        )
        .unwrap();
    assert_eq!(created.account, "100000_kitchen");

    // Step 4: list it back.
    let accounts = client
        .send(
            &http,
            &GetSubAccounts {
                account: Some(created.account.clone()),
            },
        )
        .unwrap();
    assert_eq!(accounts[0]["description"], "Kitchen phone @ home");
    assert_eq!(accounts[0]["id"], json!(created.id.0));

    // Step 5: delete; the unit result carries nothing.
    let id = i64::try_from(created.id.0).unwrap();
    client.send(&http, &DeleteSubAccount { id }).unwrap();

    // Step 6: delete again surfaces the service's status verbatim.
    let err = client.send(&http, &DeleteSubAccount { id }).unwrap_err();
    assert_eq!(err.as_api().and_then(ApiError::remote_status), Some("invalid_id"));

    // Step 7: the store is empty again.
    let err = client.send(&http, &GetSubAccounts::default()).unwrap_err();
    assert_eq!(err.as_api().and_then(ApiError::remote_status), Some("no_accounts"));
}

#[test]
fn sequence_steps_round_trip() {
    let addr = start_mock();
    let client = client_for(addr, mock_server::DEFAULT_PASSWORD);
    let http = UreqTransport::new();

    let id = client
        .send(
            &http,
            &SetSequences {
                sequence: String::new(),
                name: "ring twice".to_string(),
                steps: vec![
                    SequenceStep::new("tone").with("tone", "440+480"),
                    SequenceStep::new("pause").with("duration", "2"),
                ],
            },
        )
        .unwrap();

    let sequences = client
        .send(
            &http,
            &GetSequences {
                sequence: Some(i64::try_from(id.0).unwrap()),
                client: 0,
            },
        )
        .unwrap();
    assert_eq!(sequences[0]["name"], "ring twice");
    assert_eq!(
        sequences[0]["steps"],
        json!([
            {"type": "tone", "tone": "440+480"},
            {"type": "pause", "duration": "2"}
        ])
    );
}

#[test]
fn wrong_password_is_remote_error() {
    let addr = start_mock();
    let client = client_for(addr, "wrong");
    let err = client.send(&UreqTransport::new(), &GetIp {}).unwrap_err();
    assert_eq!(
        err.as_api(),
        Some(&ApiError::RemoteError("invalid_credentials".to_string()))
    );
}

#[test]
fn success_without_payload_is_malformed() {
    let addr = start_mock();
    let client = client_for(addr, mock_server::DEFAULT_PASSWORD);
    let err = client
        .send(
            &UreqTransport::new(),
            &GetConferenceRecordings {
                conference: 3,
                ..Default::default()
            },
        )
        .unwrap_err();
    assert!(matches!(
        err,
        CallError::Api(ApiError::MalformedResponse(ref m)) if m.contains("recordings")
    ));
}

#[test]
fn missing_endpoint_is_transport_error() {
    let addr = start_mock();
    let client = VoipMsClient::with_base_url(
        &format!("http://{addr}/nowhere"),
        Credential::new(mock_server::DEFAULT_USERNAME, mock_server::DEFAULT_PASSWORD),
    );
    let err = client.send(&UreqTransport::new(), &GetIp {}).unwrap_err();
    assert!(matches!(err, CallError::Transport(ureq::Error::StatusCode(404))));
}

#[test]
fn invalid_arguments_fail_before_io() {
    // Nothing listens on this port; an attempted request would be a transport error.
    let client = VoipMsClient::with_base_url(
        "http://127.0.0.1:9/api/v1/rest.php",
        Credential::new("u", "p"),
    );
    let err = client
        .call(&UreqTransport::new(), "getConference", &Params::new())
        .unwrap_err();
    assert!(matches!(err, CallError::Api(ApiError::InvalidArgument(_))));
}
