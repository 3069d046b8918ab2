use std::{
	cmp::Ordering,
	fmt,
	hash::{Hash, Hasher},
	str::FromStr,
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VersionError {
	#[error("empty version string")]
	Empty,
	#[error("expected MAJOR.MINOR.PATCH, found {0} numeric component(s)")]
	MissingComponent(usize),
	#[error("invalid numeric component: '{0}'")]
	InvalidNumber(String),
	#[error("empty identifier in '{0}'")]
	EmptyIdentifier(String),
	#[error("invalid character in identifier: '{0}'")]
	InvalidIdentifier(String),
}

/// A single dot-separated pre-release identifier.
///
/// Numeric identifiers compare numerically and sort below alphanumeric
/// ones, per semantic-versioning precedence.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Identifier {
	Numeric(u64),
	AlphaNumeric(String),
}

impl Ord for Identifier {
	fn cmp(&self, other: &Self) -> Ordering {
		match (self, other) {
			(Self::Numeric(a), Self::Numeric(b)) => a.cmp(b),
			(Self::Numeric(_), Self::AlphaNumeric(_)) => Ordering::Less,
			(Self::AlphaNumeric(_), Self::Numeric(_)) => Ordering::Greater,
			(Self::AlphaNumeric(a), Self::AlphaNumeric(b)) => a.cmp(b),
		}
	}
}

impl PartialOrd for Identifier {
	fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
		Some(self.cmp(other))
	}
}

impl fmt::Display for Identifier {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Numeric(n) => write!(f, "{n}"),
			Self::AlphaNumeric(s) => f.write_str(s),
		}
	}
}

/// A parsed `MAJOR.MINOR.PATCH[-PRERELEASE][+BUILD]` version.
///
/// Equality and ordering follow semantic-versioning precedence: build
/// metadata never participates, and a version with a pre-release sorts
/// below the plain version with the same numeric triple.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Version {
	pub major: u64,
	pub minor: u64,
	pub patch: u64,
	pub pre_release: Vec<Identifier>,
	pub build: Vec<String>,
}

impl Version {
	#[must_use]
	pub const fn new(major: u64, minor: u64, patch: u64) -> Self {
		Self {
			major,
			minor,
			patch,
			pre_release: Vec::new(),
			build: Vec::new(),
		}
	}

	pub fn parse(text: &str) -> Result<Self, VersionError> {
		text.parse()
	}

	#[must_use]
	pub fn is_pre_release(&self) -> bool {
		!self.pre_release.is_empty()
	}

	#[must_use]
	pub fn numeric_triple(&self) -> (u64, u64, u64) {
		(self.major, self.minor, self.patch)
	}
}

impl FromStr for Version {
	type Err = VersionError;

	fn from_str(text: &str) -> Result<Self, Self::Err> {
		let text = text.trim();
		if text.is_empty() {
			return Err(VersionError::Empty);
		}

		let (text, build) = match text.split_once('+') {
			Some((rest, build)) => (rest, parse_build(build)?),
			None => (text, Vec::new()),
		};

		let (core, pre_release) = match text.split_once('-') {
			Some((core, pre)) => (core, parse_pre_release(pre)?),
			None => (text, Vec::new()),
		};

		let components = core.split('.').collect::<Vec<_>>();
		if components.len() != 3 {
			return Err(VersionError::MissingComponent(components.len()));
		}

		Ok(Self {
			major: parse_numeric(components[0])?,
			minor: parse_numeric(components[1])?,
			patch: parse_numeric(components[2])?,
			pre_release,
			build,
		})
	}
}

fn parse_numeric(component: &str) -> Result<u64, VersionError> {
	if component.is_empty() || !component.bytes().all(|b| b.is_ascii_digit()) {
		return Err(VersionError::InvalidNumber(component.to_string()));
	}
	component
		.parse()
		.map_err(|_| VersionError::InvalidNumber(component.to_string()))
}

fn valid_identifier_chars(identifier: &str) -> bool {
	identifier
		.bytes()
		.all(|b| b.is_ascii_alphanumeric() || b == b'-')
}

fn parse_pre_release(pre: &str) -> Result<Vec<Identifier>, VersionError> {
	pre.split('.')
		.map(|identifier| {
			if identifier.is_empty() {
				return Err(VersionError::EmptyIdentifier(pre.to_string()));
			}
			if !valid_identifier_chars(identifier) {
				return Err(VersionError::InvalidIdentifier(identifier.to_string()));
			}
			Ok(if identifier.bytes().all(|b| b.is_ascii_digit()) {
				identifier
					.parse()
					.map_or_else(|_| Identifier::AlphaNumeric(identifier.to_string()), Identifier::Numeric)
			} else {
				Identifier::AlphaNumeric(identifier.to_string())
			})
		})
		.collect()
}

fn parse_build(build: &str) -> Result<Vec<String>, VersionError> {
	build
		.split('.')
		.map(|identifier| {
			if identifier.is_empty() {
				return Err(VersionError::EmptyIdentifier(build.to_string()));
			}
			if !valid_identifier_chars(identifier) {
				return Err(VersionError::InvalidIdentifier(identifier.to_string()));
			}
			Ok(identifier.to_string())
		})
		.collect()
}

impl PartialEq for Version {
	fn eq(&self, other: &Self) -> bool {
		self.cmp(other) == Ordering::Equal
	}
}

impl Eq for Version {}

impl Hash for Version {
	fn hash<H: Hasher>(&self, state: &mut H) {
		// Build metadata is excluded from equality, so it must be
		// excluded here as well.
		self.major.hash(state);
		self.minor.hash(state);
		self.patch.hash(state);
		self.pre_release.hash(state);
	}
}

impl Ord for Version {
	fn cmp(&self, other: &Self) -> Ordering {
		self.numeric_triple()
			.cmp(&other.numeric_triple())
			.then_with(|| match (self.is_pre_release(), other.is_pre_release()) {
				(false, false) => Ordering::Equal,
				(true, false) => Ordering::Less,
				(false, true) => Ordering::Greater,
				(true, true) => self.pre_release.cmp(&other.pre_release),
			})
	}
}

impl PartialOrd for Version {
	fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
		Some(self.cmp(other))
	}
}

impl fmt::Display for Version {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}.{}.{}", self.major, self.minor, self.patch)?;
		if let Some((first, rest)) = self.pre_release.split_first() {
			write!(f, "-{first}")?;
			for identifier in rest {
				write!(f, ".{identifier}")?;
			}
		}
		if let Some((first, rest)) = self.build.split_first() {
			write!(f, "+{first}")?;
			for identifier in rest {
				write!(f, ".{identifier}")?;
			}
		}
		Ok(())
	}
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
	use super::*;

	fn v(text: &str) -> Version {
		Version::parse(text).unwrap()
	}

	#[test]
	fn parse_plain_version() {
		let version = v("1.2.3");
		assert_eq!(version.numeric_triple(), (1, 2, 3));
		assert!(!version.is_pre_release());
		assert!(version.build.is_empty());
	}

	#[test]
	fn parse_pre_release_and_build() {
		let version = v("1.2.3-alpha.1+sha.5114f85");
		assert_eq!(
			version.pre_release,
			vec![
				Identifier::AlphaNumeric("alpha".to_string()),
				Identifier::Numeric(1)
			]
		);
		assert_eq!(version.build, vec!["sha".to_string(), "5114f85".to_string()]);
	}

	#[test]
	fn numeric_triple_round_trip() {
		for (major, minor, patch) in [(0, 0, 0), (1, 2, 3), (10, 0, 99), (2024, 12, 31)] {
			let text = format!("{major}.{minor}.{patch}");
			let version = v(&text);
			assert_eq!(version.numeric_triple(), (major, minor, patch));
			assert_eq!(version.to_string(), text);
		}
	}

	#[test]
	fn rejects_malformed_versions() {
		assert_eq!(Version::parse(""), Err(VersionError::Empty));
		assert_eq!(Version::parse("1.2"), Err(VersionError::MissingComponent(2)));
		assert_eq!(
			Version::parse("1.2.3.4"),
			Err(VersionError::MissingComponent(4))
		);
		assert!(matches!(
			Version::parse("1.x.3"),
			Err(VersionError::InvalidNumber(_))
		));
		assert!(matches!(
			Version::parse("+1.2.3"),
			Err(VersionError::Empty) | Err(VersionError::InvalidNumber(_)) | Err(VersionError::MissingComponent(_))
		));
		assert!(matches!(
			Version::parse("1.2.3-"),
			Err(VersionError::EmptyIdentifier(_))
		));
		assert!(matches!(
			Version::parse("1.2.3-alpha..1"),
			Err(VersionError::EmptyIdentifier(_))
		));
		assert!(matches!(
			Version::parse("1.2.3-al pha"),
			Err(VersionError::InvalidIdentifier(_))
		));
	}

	#[test]
	fn precedence_ordering() {
		assert!(v("1.0.0") < v("2.0.0"));
		assert!(v("2.0.0") < v("2.1.0"));
		assert!(v("2.1.0") < v("2.1.1"));
		// A pre-release sorts below the plain version.
		assert!(v("1.0.0-alpha") < v("1.0.0"));
		// Numeric identifiers sort below alphanumeric ones.
		assert!(v("1.0.0-1") < v("1.0.0-alpha"));
		assert!(v("1.0.0-alpha") < v("1.0.0-alpha.1"));
		assert!(v("1.0.0-alpha.1") < v("1.0.0-alpha.beta"));
		assert!(v("1.0.0-beta.2") < v("1.0.0-beta.11"));
		assert!(v("1.0.0-rc.1") < v("1.0.0"));
	}

	#[test]
	fn build_metadata_never_affects_precedence() {
		assert_eq!(v("1.2.3+build.1"), v("1.2.3+build.2"));
		assert_eq!(v("1.2.3+build"), v("1.2.3"));
		assert!(v("1.2.3+zzz") < v("1.2.4"));
	}

	#[test]
	fn display_round_trip() {
		for text in ["0.1.0", "1.2.3-alpha.1", "1.2.3+build", "1.2.3-rc.2+sha.abc"] {
			assert_eq!(v(text).to_string(), text);
		}
	}

	#[test]
	fn serde_smoke_test() {
		let actual = v("1.2.3-beta.4+exp.sha");
		let encoded = rmp_serde::to_vec_named(&actual).unwrap();
		let decoded = rmp_serde::from_slice::<Version>(&encoded).unwrap();
		assert_eq!(actual, decoded);
		assert_eq!(actual.build, decoded.build);
	}
}
