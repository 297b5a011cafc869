//! Minimal GraphQL-over-HTTP client used for profile queries.
//!
//! Queries are POSTed as JSON (`query` plus the `operationName` read from the document) with a
//! bearer credential. A response counts as successful only when the status is 2xx, no `errors`
//! member is present, and `data` is an object.

// self
use crate::{_prelude::*, auth::TokenSecret, error::GraphQlFailure};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GraphQlRequest<'a> {
	query: &'a str,
	#[serde(skip_serializing_if = "Option::is_none")]
	operation_name: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct GraphQlResponse {
	#[serde(default)]
	data: Option<JsonValue>,
	#[serde(default)]
	errors: Option<Vec<JsonValue>>,
}

/// GraphQL client bound to a single endpoint.
#[derive(Clone, Debug)]
pub struct GraphQlClient {
	http: ReqwestClient,
	endpoint: Url,
}
impl GraphQlClient {
	/// Binds `http` to `endpoint`.
	pub fn new(http: ReqwestClient, endpoint: Url) -> Self {
		Self { http, endpoint }
	}

	/// Endpoint the client posts to.
	pub fn endpoint(&self) -> &Url {
		&self.endpoint
	}

	/// Executes `query` once with `Authorization: Bearer <token>` and returns the `data` object.
	pub async fn request(
		&self,
		query: &str,
		bearer: &TokenSecret,
	) -> Result<JsonMap<String, JsonValue>, GraphQlFailure> {
		let payload = GraphQlRequest { query, operation_name: operation_name(query) };
		let response = self
			.http
			.post(self.endpoint.clone())
			.bearer_auth(bearer.expose())
			.json(&payload)
			.send()
			.await?;
		let status = response.status();
		let body = response.bytes().await?;

		if !status.is_success() {
			return Err(GraphQlFailure::Status {
				status: status.as_u16(),
				body: String::from_utf8_lossy(&body).into_owned(),
			});
		}

		let mut deserializer = serde_json::Deserializer::from_slice(&body);
		let document: GraphQlResponse = serde_path_to_error::deserialize(&mut deserializer)?;

		if let Some(errors) = document.errors {
			return Err(GraphQlFailure::GraphQl { errors, data: document.data });
		}

		match document.data {
			Some(JsonValue::Object(data)) => Ok(data),
			_ => Err(GraphQlFailure::MissingData),
		}
	}
}

/// Returns the name of the first named operation in a GraphQL document.
///
/// Comments are skipped. Anonymous operations and shorthand `{ ... }` documents yield `None`.
pub fn operation_name(query: &str) -> Option<&str> {
	let mut rest = query;

	loop {
		rest = rest.trim_start_matches(|c: char| c.is_whitespace() || c == ',');

		if let Some(comment) = rest.strip_prefix('#') {
			rest = comment.split_once('\n').map_or("", |(_, tail)| tail);

			continue;
		}

		break;
	}

	let keyword_len = rest.find(|c: char| !is_name_char(c)).unwrap_or(rest.len());
	let keyword = &rest[..keyword_len];

	if !matches!(keyword, "query" | "mutation" | "subscription") {
		return None;
	}

	let tail = rest[keyword_len..].trim_start();
	let name_len = tail.find(|c: char| !is_name_char(c)).unwrap_or(tail.len());
	let name = &tail[..name_len];

	if name.is_empty() || name.starts_with(|c: char| c.is_ascii_digit()) {
		None
	} else {
		Some(name)
	}
}

fn is_name_char(c: char) -> bool {
	c.is_ascii_alphanumeric() || c == '_'
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn operation_names_are_extracted() {
		assert_eq!(operation_name("query UserQuery { me { id } }"), Some("UserQuery"));
		assert_eq!(
			operation_name("\n  # fetch the viewer\n  query CustomUserQuery($a: ID) { me { id } }"),
			Some("CustomUserQuery")
		);
		assert_eq!(operation_name("mutation Rename { rename }"), Some("Rename"));
		assert_eq!(operation_name(crate::provider::DEFAULT_PROFILE_QUERY), Some("UserQuery"));
	}

	#[test]
	fn anonymous_operations_have_no_name() {
		assert_eq!(operation_name("{ me { id } }"), None);
		assert_eq!(operation_name("query { me { id } }"), None);
		assert_eq!(operation_name("fragment F on User { id }"), None);
	}

	#[test]
	fn request_payload_uses_graphql_field_names() {
		let payload = GraphQlRequest { query: "query A { a }", operation_name: Some("A") };
		let json = serde_json::to_value(&payload).expect("Payload should serialize.");

		assert_eq!(json, serde_json::json!({ "query": "query A { a }", "operationName": "A" }));
	}
}
