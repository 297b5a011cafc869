//! Redacted secrets and the token grant returned by the code exchange.

// self
use crate::_prelude::*;

/// Redacted secret wrapper keeping tokens and client secrets out of logs.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenSecret(String);
impl TokenSecret {
	/// Wraps a new secret string.
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	/// Returns the inner value. Callers must avoid logging this string.
	pub fn expose(&self) -> &str {
		&self.0
	}

	/// Returns true when the wrapped value is empty.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
}
impl AsRef<str> for TokenSecret {
	fn as_ref(&self) -> &str {
		self.expose()
	}
}
impl From<&str> for TokenSecret {
	fn from(value: &str) -> Self {
		Self::new(value)
	}
}
impl From<String> for TokenSecret {
	fn from(value: String) -> Self {
		Self::new(value)
	}
}
impl Debug for TokenSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("TokenSecret").field(&"<redacted>").finish()
	}
}
impl Display for TokenSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("<redacted>")
	}
}

/// Tokens issued by the token endpoint for a single authorization code.
///
/// The grant is handed to the verify hook and then dropped; the strategy never stores it.
#[derive(Clone, Debug)]
pub struct TokenGrant {
	/// Bearer access token.
	pub access_token: TokenSecret,
	/// Refresh token, if the provider issued one.
	pub refresh_token: Option<TokenSecret>,
	/// Token type reported by the provider (normally `bearer`).
	pub token_type: String,
	/// Relative lifetime reported by the provider.
	pub expires_in: Option<Duration>,
	/// Scopes reported by the provider, when it echoes them.
	pub scopes: Option<Vec<String>>,
	/// Instant the response was received.
	pub issued_at: OffsetDateTime,
}
impl TokenGrant {
	/// Returns the expiry instant, when the provider reported a lifetime that lands inside the
	/// representable date range.
	pub fn expires_at(&self) -> Option<OffsetDateTime> {
		self.expires_in.and_then(|lifetime| self.issued_at.checked_add(lifetime))
	}

	/// Returns true if the access token has expired at the provided instant.
	pub fn is_expired_at(&self, instant: OffsetDateTime) -> bool {
		self.expires_at().is_some_and(|expiry| instant >= expiry)
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn secret_formatters_redact() {
		let secret = TokenSecret::new("super-secret");

		assert_eq!(format!("{secret:?}"), "TokenSecret(\"<redacted>\")");
		assert_eq!(format!("{secret}"), "<redacted>");
		assert_eq!(secret.expose(), "super-secret");
	}

	#[test]
	fn grant_expiry_tracks_lifetime() {
		let issued_at = OffsetDateTime::now_utc();
		let grant = TokenGrant {
			access_token: "access".into(),
			refresh_token: None,
			token_type: "bearer".into(),
			expires_in: Some(Duration::seconds(60)),
			scopes: None,
			issued_at,
		};

		assert_eq!(grant.expires_at(), Some(issued_at + Duration::seconds(60)));
		assert!(!grant.is_expired_at(issued_at));
		assert!(grant.is_expired_at(issued_at + Duration::seconds(61)));
		assert!(!TokenGrant { expires_in: None, ..grant }.is_expired_at(issued_at));
	}

	#[test]
	fn lifetimes_past_the_date_range_never_expire() {
		let issued_at = OffsetDateTime::now_utc();
		let grant = TokenGrant {
			access_token: "access".into(),
			refresh_token: None,
			token_type: "bearer".into(),
			expires_in: Some(Duration::seconds(1_000_000_000_000)),
			scopes: None,
			issued_at,
		};

		assert_eq!(grant.expires_at(), None);
		assert!(!grant.is_expired_at(issued_at));
	}
}
