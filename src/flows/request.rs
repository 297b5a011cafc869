//! Incoming callback requests and the host session they may carry.

// self
use crate::_prelude::*;

/// Host-owned session mapping shared with the strategy.
///
/// Cloning is cheap; all clones point at the same storage.
#[derive(Clone, Debug, Default)]
pub struct Session(Arc<Mutex<BTreeMap<String, JsonValue>>>);
impl Session {
	/// Creates an empty session.
	pub fn new() -> Self {
		Self::default()
	}

	/// Stores `value` under `key`, returning the previous value.
	pub fn insert(&self, key: impl Into<String>, value: JsonValue) -> Option<JsonValue> {
		self.0.lock().insert(key.into(), value)
	}

	/// Returns a copy of the value stored under `key`.
	pub fn get(&self, key: &str) -> Option<JsonValue> {
		self.0.lock().get(key).cloned()
	}

	/// Removes and returns the value stored under `key`.
	pub fn remove(&self, key: &str) -> Option<JsonValue> {
		self.0.lock().remove(key)
	}

	/// Returns true if nothing is stored.
	pub fn is_empty(&self) -> bool {
		self.0.lock().is_empty()
	}
}

/// Request handed to [`Strategy::authenticate`](crate::Strategy::authenticate).
///
/// Carries the query parameters of the incoming request, the URL it was received on (used to
/// resolve relative callback URLs), and the host session, when there is one.
#[derive(Clone, Debug, Default)]
pub struct CallbackRequest {
	query: BTreeMap<String, String>,
	origin: Option<Url>,
	session: Option<Session>,
}
impl CallbackRequest {
	/// Creates a request without parameters, origin, or session.
	pub fn new() -> Self {
		Self::default()
	}

	/// Builds a request from the full URL it was received on.
	///
	/// Query parameters are decoded; a repeated key keeps its last value.
	pub fn from_url(url: &Url) -> Self {
		let query =
			url.query_pairs().map(|(key, value)| (key.into_owned(), value.into_owned())).collect();
		let mut origin = url.clone();

		origin.set_query(None);
		origin.set_fragment(None);

		Self { query, origin: Some(origin), session: None }
	}

	/// Adds a query parameter.
	pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
		self.query.insert(key.into(), value.into());

		self
	}

	/// Sets the URL the request was received on.
	pub fn with_origin(mut self, origin: Url) -> Self {
		self.origin = Some(origin);

		self
	}

	/// Attaches the host session.
	pub fn with_session(mut self, session: Session) -> Self {
		self.session = Some(session);

		self
	}

	/// Returns a decoded query parameter.
	pub fn param(&self, key: &str) -> Option<&str> {
		self.query.get(key).map(String::as_str)
	}

	/// URL the request was received on, without query or fragment.
	pub fn origin(&self) -> Option<&Url> {
		self.origin.as_ref()
	}

	/// Host session, if one is attached.
	pub fn session(&self) -> Option<&Session> {
		self.session.as_ref()
	}
}
