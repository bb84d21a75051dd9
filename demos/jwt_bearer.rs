//! Demonstrates the full JWT bearer pipeline: provisions a throwaway key store, stands
//! up stub token + resource endpoints, runs the four stages, and prints the outputs the
//! original server-to-server integration would inspect.

// std
use std::{env, fs, process};
// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
use pkcs8::{EncodePrivateKey, LineEnding};
use rsa::RsaPrivateKey;
// self
use jwt_bearer_flow::{
	config::{AssertionProfile, EndpointConfig, FlowConfig, KeyStoreConfig},
	flow::BearerFlow,
	secret::StorePassword,
	url::Url,
};

const STORE_PASSWORD: &str = "password";
const ALIAS: &str = "certalias";
const RESOURCE_PATH: &str = "/services/data/v37.0/sobjects/Account/";

fn main() -> Result<()> {
	color_eyre::install()?;

	// Provision a throwaway store: one RSA-2048 key under a single alias, entry
	// encrypted with the store password.
	let mut rng = rand::thread_rng();
	let private_key = RsaPrivateKey::new(&mut rng, 2048)?;
	let encrypted_pem =
		private_key.to_pkcs8_encrypted_pem(&mut rng, STORE_PASSWORD.as_bytes(), LineEnding::LF)?;
	let document = serde_json::json!({
		"keys": {
			ALIAS: {
				"algorithm": "RS256",
				"encrypted_pem": encrypted_pem.to_string(),
			},
		},
	});
	let store_path = env::temp_dir().join(format!("jwt_bearer_demo_{}.json", process::id()));

	fs::write(&store_path, serde_json::to_vec_pretty(&document)?)?;

	let server = MockServer::start();
	let token_mock = server.mock(|when, then| {
		when.method(POST).path("/services/oauth2/token");
		then.status(200).header("content-type", "application/json").body(format!(
			"{{\"access_token\":\"demo-access\",\"instance_url\":\"{}\"}}",
			server.base_url(),
		));
	});
	let resource_mock = server.mock(|when, then| {
		when.method(GET).path(RESOURCE_PATH).header("authorization", "Bearer demo-access");
		then.status(200)
			.header("content-type", "application/json")
			.body("{\"objectDescribe\":{\"name\":\"Account\"}}");
	});
	let config = FlowConfig {
		key_store: KeyStoreConfig {
			path: store_path.clone(),
			password: StorePassword::new(STORE_PASSWORD),
			alias: ALIAS.to_owned(),
		},
		assertion: AssertionProfile {
			issuer: "3MVG99demo-client-id".to_owned(),
			subject: "my@email.com".to_owned(),
			audience: "https://login.salesforce.com".to_owned(),
			validity_secs: 300,
			include_assertion_id: false,
		},
		endpoints: EndpointConfig {
			token: Url::parse(&server.url("/services/oauth2/token"))?,
			resource_path: RESOURCE_PATH.to_owned(),
		},
	};
	let report = BearerFlow::new(config)?.run()?;

	println!("Assertion: {}", report.assertion);
	println!("Token response body: {}", report.token_raw_body);
	println!("Access token: {}", report.access_token.expose());
	println!("Resource body: {}", report.resource_body);

	token_mock.assert();
	resource_mock.assert();

	fs::remove_file(&store_path)?;

	Ok(())
}
