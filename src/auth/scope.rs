//! Scope modeling for authorization requests.

// self
use crate::_prelude::*;

/// Errors emitted when validating scopes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum ScopeValidationError {
	/// Empty scope entries are not allowed.
	#[error("Scope entries cannot be empty.")]
	Empty,
	/// List entries cannot contain embedded whitespace characters.
	#[error("Scope contains whitespace: {scope}.")]
	ContainsWhitespace {
		/// The offending scope string.
		scope: String,
	},
}

/// Scopes requested during authorization.
///
/// A list is joined with the strategy's scope separator when the authorize URL is built, while a
/// delimited string (for example `"public,token.refresh"`) is forwarded verbatim. Order is
/// preserved in both forms.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scope {
	/// Individual scope entries.
	List(Vec<String>),
	/// Pre-joined scope string, sent as-is.
	Delimited(String),
}
impl Scope {
	/// Builds a validated list of scope entries.
	pub fn list<I, S>(scopes: I) -> Result<Self, ScopeValidationError>
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		let scope = Self::List(scopes.into_iter().map(Into::into).collect());

		scope.validate()?;

		Ok(scope)
	}

	/// Wraps a pre-joined scope string.
	pub fn delimited(value: impl Into<String>) -> Self {
		Self::Delimited(value.into())
	}

	/// Checks that no entry is empty and that list entries carry no whitespace.
	pub fn validate(&self) -> Result<(), ScopeValidationError> {
		match self {
			Self::List(entries) =>
				for entry in entries {
					if entry.is_empty() {
						return Err(ScopeValidationError::Empty);
					}
					if entry.chars().any(char::is_whitespace) {
						return Err(ScopeValidationError::ContainsWhitespace {
							scope: entry.to_owned(),
						});
					}
				},
			Self::Delimited(value) if value.trim().is_empty() =>
				return Err(ScopeValidationError::Empty),
			Self::Delimited(_) => {},
		}

		Ok(())
	}

	/// Returns true if no scope is requested.
	pub fn is_empty(&self) -> bool {
		match self {
			Self::List(entries) => entries.is_empty(),
			Self::Delimited(value) => value.is_empty(),
		}
	}

	/// Renders the `scope` query parameter, or `None` when nothing is requested.
	pub fn render(&self, separator: char) -> Option<String> {
		if self.is_empty() {
			return None;
		}

		match self {
			Self::List(entries) => {
				let mut buf = String::new();

				for (idx, value) in entries.iter().enumerate() {
					if idx > 0 {
						buf.push(separator);
					}

					buf.push_str(value);
				}

				Some(buf)
			},
			Self::Delimited(value) => Some(value.clone()),
		}
	}
}
impl From<&str> for Scope {
	fn from(value: &str) -> Self {
		Self::delimited(value)
	}
}
impl From<String> for Scope {
	fn from(value: String) -> Self {
		Self::delimited(value)
	}
}
impl From<Vec<String>> for Scope {
	fn from(value: Vec<String>) -> Self {
		Self::List(value)
	}
}
impl<const N: usize> From<[&str; N]> for Scope {
	fn from(value: [&str; N]) -> Self {
		Self::List(value.iter().map(|entry| (*entry).to_owned()).collect())
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn lists_join_with_separator_in_order() {
		let scope = Scope::list(["public", "token.refresh"]).expect("Scope list should be valid.");

		assert_eq!(scope.render(' '), Some("public token.refresh".into()));
		assert_eq!(scope.render(','), Some("public,token.refresh".into()));
	}

	#[test]
	fn delimited_strings_are_forwarded_verbatim() {
		let scope = Scope::from("public,token.refresh");

		assert_eq!(scope.render(' '), Some("public,token.refresh".into()));
		assert!(scope.validate().is_ok());
	}

	#[test]
	fn empty_scopes_render_nothing() {
		assert_eq!(Scope::List(Vec::new()).render(' '), None);
		assert_eq!(Scope::from("").render(' '), None);
	}

	#[test]
	fn invalid_scopes_error() {
		assert!(matches!(Scope::list([""]), Err(ScopeValidationError::Empty)));
		assert!(matches!(
			Scope::list(["contains space"]),
			Err(ScopeValidationError::ContainsWhitespace { .. })
		));
		assert!(matches!(Scope::from("   ").validate(), Err(ScopeValidationError::Empty)));
	}

	#[test]
	fn deserializes_from_string_or_list() {
		let list: Scope =
			serde_json::from_str(r#"["public","token.refresh"]"#).expect("List should parse.");
		let raw: Scope =
			serde_json::from_str(r#""public,token.refresh""#).expect("String should parse.");

		assert_eq!(list, Scope::from(["public", "token.refresh"]));
		assert_eq!(raw, Scope::from("public,token.refresh"));
	}
}
