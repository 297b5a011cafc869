//! Normalized provider profiles.

// self
use crate::_prelude::*;

/// Profile returned by a provider: `{provider, ...data}`.
///
/// `data` is the GraphQL `data` object exactly as returned, so its shape follows whichever
/// profile query was configured. The `provider` key always reflects the provider that fetched
/// the profile; a `provider` key inside `data` is discarded.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Profile {
	provider: String,
	#[serde(flatten)]
	data: JsonMap<String, JsonValue>,
}
impl Profile {
	/// Builds a profile for `provider` from a GraphQL `data` object.
	pub fn new(provider: impl Into<String>, mut data: JsonMap<String, JsonValue>) -> Self {
		data.remove("provider");

		Self { provider: provider.into(), data }
	}

	/// Name of the provider that produced the profile.
	pub fn provider(&self) -> &str {
		&self.provider
	}

	/// Returns a top-level field of the response data.
	pub fn get(&self, key: &str) -> Option<&JsonValue> {
		self.data.get(key)
	}

	/// Returns the `me` object, if the query selected a non-null one.
	pub fn me(&self) -> Option<&JsonValue> {
		self.get("me").filter(|me| !me.is_null())
	}

	/// Consumes the profile and returns the `me` object, if present and non-null.
	pub fn into_me(mut self) -> Option<JsonValue> {
		self.data.remove("me").filter(|me| !me.is_null())
	}

	/// Response data without the `provider` key.
	pub fn data(&self) -> &JsonMap<String, JsonValue> {
		&self.data
	}

	/// Renders the profile as a single JSON object.
	pub fn to_json(&self) -> JsonValue {
		let mut object = self.data.clone();

		object.insert("provider".into(), JsonValue::String(self.provider.clone()));

		JsonValue::Object(object)
	}
}
