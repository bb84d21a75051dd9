mod common;

// std
use std::fs;
// crates.io
use httpmock::prelude::*;
// self
use jwt_bearer_flow::{
	config::{AssertionProfile, EndpointConfig, FlowConfig, KeyStoreConfig},
	error::Error,
	flow::BearerFlow,
	secret::StorePassword,
	url::Url,
};

const STORE_PASSWORD: &str = "store-password";
const ALIAS: &str = "certalias";
const RESOURCE_PATH: &str = "/services/data/v37.0/sobjects/Account/";

fn build_config(server: &MockServer, store_path: std::path::PathBuf) -> FlowConfig {
	FlowConfig {
		key_store: KeyStoreConfig {
			path: store_path,
			password: StorePassword::new(STORE_PASSWORD),
			alias: ALIAS.to_owned(),
		},
		assertion: AssertionProfile {
			issuer: "3MVG99...".to_owned(),
			subject: "my@email.com".to_owned(),
			audience: "https://login.salesforce.com".to_owned(),
			validity_secs: 300,
			include_assertion_id: false,
		},
		endpoints: EndpointConfig {
			token: Url::parse(&server.url("/services/oauth2/token"))
				.expect("Mock token endpoint should parse successfully."),
			resource_path: RESOURCE_PATH.to_owned(),
		},
	}
}

#[test]
fn pipeline_runs_all_four_stages_in_order() {
	let server = MockServer::start();
	let store_path = common::write_key_store("flow_success", ALIAS, STORE_PASSWORD);
	let token_body = format!(
		"{{\"access_token\":\"AT1\",\"instance_url\":\"{}\"}}",
		server.base_url(),
	);
	let token_mock = server.mock(|when, then| {
		when.method(POST).path("/services/oauth2/token");
		then.status(200).header("content-type", "application/json").body(&token_body);
	});
	let account_body = "{\"objectDescribe\":{\"name\":\"Account\"}}";
	let resource_mock = server.mock(|when, then| {
		when.method(GET).path(RESOURCE_PATH).header("authorization", "Bearer AT1");
		then.status(200).header("content-type", "application/json").body(account_body);
	});
	let flow = BearerFlow::new(build_config(&server, store_path.clone()))
		.expect("Flow should build with the default HTTP client.");
	let report = flow.run().expect("The full pipeline should succeed against stub endpoints.");

	assert_eq!(report.assertion.split('.').count(), 3);
	assert_eq!(report.token_raw_body, token_body);
	assert_eq!(report.access_token.expose(), "AT1");
	assert!(report.resource_url.as_str().ends_with(RESOURCE_PATH));
	assert_eq!(report.resource_body, account_body);

	token_mock.assert();
	resource_mock.assert();

	fs::remove_file(&store_path).expect("Store fixture should be removable.");
}

#[test]
fn pipeline_fails_fast_when_the_key_is_unavailable() {
	let server = MockServer::start();
	let store_path = common::write_key_store("flow_bad_alias", ALIAS, STORE_PASSWORD);
	let token_mock = server.mock(|when, then| {
		when.method(POST).path("/services/oauth2/token");
		then.status(200)
			.header("content-type", "application/json")
			.body("{\"access_token\":\"AT1\",\"instance_url\":\"https://inst.example.com\"}");
	});
	let mut config = build_config(&server, store_path.clone());

	config.key_store.alias = "unknown-alias".to_owned();

	let flow = BearerFlow::new(config).expect("Flow should build with the default HTTP client.");
	let err = flow.run().expect_err("An unknown alias must terminate the run at stage one.");

	assert_eq!(err.stage(), "load_key");
	assert!(matches!(err, Error::KeyAccess(_)));

	// Fail-fast means the token endpoint is never contacted.
	token_mock.assert_calls(0);

	fs::remove_file(&store_path).expect("Store fixture should be removable.");
}

#[test]
fn pipeline_resolves_the_resource_against_the_returned_instance_url() {
	let server = MockServer::start();
	let store_path = common::write_key_store("flow_join", ALIAS, STORE_PASSWORD);
	let token_body = format!(
		"{{\"access_token\":\"AT2\",\"instance_url\":\"{}/tenant\"}}",
		server.base_url(),
	);

	server.mock(|when, then| {
		when.method(POST).path("/services/oauth2/token");
		then.status(200).header("content-type", "application/json").body(&token_body);
	});

	// An absolute resource path replaces the instance URL's own path on join.
	let resource_mock = server.mock(|when, then| {
		when.method(GET).path(RESOURCE_PATH).header("authorization", "Bearer AT2");
		then.status(200).header("content-type", "application/json").body("{}");
	});
	let flow = BearerFlow::new(build_config(&server, store_path.clone()))
		.expect("Flow should build with the default HTTP client.");
	let report = flow.run().expect("The full pipeline should succeed against stub endpoints.");

	assert!(report.resource_url.as_str().ends_with(RESOURCE_PATH));

	resource_mock.assert();

	fs::remove_file(&store_path).expect("Store fixture should be removable.");
}
