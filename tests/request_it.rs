// crates.io
use httpmock::prelude::*;
// self
use jwt_bearer_flow::{
	error::Error,
	http::ReqwestHttpClient,
	request::{self, RequestError},
	secret::TokenSecret,
	url::Url,
};

fn resource_url(server: &MockServer) -> Url {
	Url::parse(&server.url("/services/data/v37.0/sobjects/Account/"))
		.expect("Mock resource endpoint should parse successfully.")
}

#[test]
fn request_sends_the_bearer_header_and_returns_the_body_verbatim() {
	let server = MockServer::start();
	let body = "{\"objectDescribe\":{\"name\":\"Account\"},\"recentItems\":[]}";
	let mock = server.mock(|when, then| {
		when.method(GET)
			.path("/services/data/v37.0/sobjects/Account/")
			.header("authorization", "Bearer AT1");
		then.status(200).header("content-type", "application/json").body(body);
	});
	let client = ReqwestHttpClient::new().expect("HTTP client should build.");
	let fetched =
		request::fetch_resource(&client, &resource_url(&server), &TokenSecret::new("AT1"))
			.expect("Authenticated request against the stub endpoint should succeed.");

	assert_eq!(fetched, body);

	mock.assert();
}

#[test]
fn request_preserves_status_and_body_on_rejection() {
	let server = MockServer::start();
	let mock = server.mock(|when, then| {
		when.method(GET).path("/services/data/v37.0/sobjects/Account/");
		then.status(401)
			.header("content-type", "application/json")
			.body("[{\"message\":\"Session expired or invalid\",\"errorCode\":\"INVALID_SESSION_ID\"}]");
	});
	let client = ReqwestHttpClient::new().expect("HTTP client should build.");
	let err =
		request::fetch_resource(&client, &resource_url(&server), &TokenSecret::new("stale"))
			.expect_err("A 401 response must surface as a request error.");

	assert_eq!(err.stage(), "issue_request");
	assert!(matches!(
		err,
		Error::Request(RequestError::Endpoint { status: 401, ref body })
			if body.contains("INVALID_SESSION_ID"),
	));

	mock.assert();
}
