use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::version::{Version, VersionError};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExpressionError {
	#[error("empty version expression")]
	Empty,
	#[error("empty constraint term in version expression")]
	EmptyTerm,
	#[error("unknown operator in constraint term '{0}'")]
	UnknownOperator(String),
	#[error("invalid version in constraint term '{term}': {source}")]
	Version {
		term: String,
		source: VersionError,
	},
}

/// Relational operator of a primitive range constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Op {
	/// `=` (also the default when no operator is written).
	Exact,
	/// `<`
	Less,
	/// `<=`
	LessEq,
	/// `>`
	Greater,
	/// `>=`
	GreaterEq,
	/// `~` patch-level compatible: same major.minor, at least the given version.
	Tilde,
	/// `^` minor-level compatible: same major, at least the given version.
	Caret,
}

/// A single `[op]version` range constraint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Constraint {
	pub op: Op,
	pub version: Version,
}

impl Constraint {
	#[must_use]
	pub fn is_satisfied(&self, candidate: &Version) -> bool {
		match self.op {
			Op::Exact => candidate == &self.version,
			Op::Less => candidate < &self.version,
			Op::LessEq => candidate <= &self.version,
			Op::Greater => candidate > &self.version,
			Op::GreaterEq => candidate >= &self.version,
			Op::Tilde => {
				self.pre_release_allowed(candidate)
					&& candidate.major == self.version.major
					&& candidate.minor == self.version.minor
					&& candidate >= &self.version
			}
			Op::Caret => {
				self.pre_release_allowed(candidate)
					&& candidate.major == self.version.major
					&& candidate >= &self.version
			}
		}
	}

	// Compatible ranges admit a pre-release candidate only when the
	// declared version itself carries a pre-release on the same numeric
	// triple.
	fn pre_release_allowed(&self, candidate: &Version) -> bool {
		!candidate.is_pre_release()
			|| (self.version.is_pre_release()
				&& candidate.numeric_triple() == self.version.numeric_triple())
	}
}

/// A compiled version-range predicate: OR across groups of AND-combined
/// constraints. Parse once, evaluate many.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comparator {
	groups: Vec<Vec<Constraint>>,
}

impl Comparator {
	/// Parses a constraint expression such as `">=1.2.0,<2.0.0 || ~3.1.0"`.
	///
	/// Commas combine terms with AND; `||` separates OR groups and binds
	/// looser than the comma. A term without an operator means exact match.
	pub fn parse(expression: &str) -> Result<Self, ExpressionError> {
		expression.parse()
	}

	#[must_use]
	pub fn is_satisfied(&self, candidate: &Version) -> bool {
		self.groups
			.iter()
			.any(|group| group.iter().all(|constraint| constraint.is_satisfied(candidate)))
	}
}

impl FromStr for Comparator {
	type Err = ExpressionError;

	fn from_str(expression: &str) -> Result<Self, Self::Err> {
		if expression.trim().is_empty() {
			return Err(ExpressionError::Empty);
		}

		expression
			.split("||")
			.map(|group| group.split(',').map(parse_term).collect())
			.collect::<Result<Vec<_>, _>>()
			.map(|groups| Self { groups })
	}
}

fn parse_term(term: &str) -> Result<Constraint, ExpressionError> {
	let term = term.trim();
	if term.is_empty() {
		return Err(ExpressionError::EmptyTerm);
	}

	let (op, rest) = split_operator(term);
	let rest = rest.trim_start();

	// Anything left in front of the version literal is an operator this
	// grammar does not know.
	if rest.starts_with(|c: char| !c.is_ascii_digit()) {
		return Err(ExpressionError::UnknownOperator(term.to_string()));
	}

	let version = rest.parse().map_err(|source| ExpressionError::Version {
		term: term.to_string(),
		source,
	})?;

	Ok(Constraint { op, version })
}

fn split_operator(term: &str) -> (Op, &str) {
	if let Some(rest) = term.strip_prefix(">=") {
		(Op::GreaterEq, rest)
	} else if let Some(rest) = term.strip_prefix("<=") {
		(Op::LessEq, rest)
	} else if let Some(rest) = term.strip_prefix('>') {
		(Op::Greater, rest)
	} else if let Some(rest) = term.strip_prefix('<') {
		(Op::Less, rest)
	} else if let Some(rest) = term.strip_prefix('=') {
		(Op::Exact, rest)
	} else if let Some(rest) = term.strip_prefix('~') {
		(Op::Tilde, rest)
	} else if let Some(rest) = term.strip_prefix('^') {
		(Op::Caret, rest)
	} else {
		(Op::Exact, term)
	}
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
	use super::*;

	fn v(text: &str) -> Version {
		Version::parse(text).unwrap()
	}

	fn satisfied(expression: &str, version: &str) -> bool {
		Comparator::parse(expression)
			.unwrap()
			.is_satisfied(&v(version))
	}

	#[test]
	fn and_range() {
		let expression = ">=1.2.0,<2.0.0";
		assert!(satisfied(expression, "1.2.0"));
		assert!(satisfied(expression, "1.9.9"));
		assert!(!satisfied(expression, "2.0.0"));
		assert!(!satisfied(expression, "1.1.9"));
	}

	#[test]
	fn or_groups() {
		let expression = "<1.0.0 || >=2.0.0,<3.0.0";
		assert!(satisfied(expression, "0.9.0"));
		assert!(satisfied(expression, "2.5.0"));
		assert!(!satisfied(expression, "1.5.0"));
		assert!(!satisfied(expression, "3.0.0"));
	}

	#[test]
	fn missing_operator_means_exact() {
		assert!(satisfied("1.2.3", "1.2.3"));
		assert!(!satisfied("1.2.3", "1.2.4"));
		assert!(satisfied("=1.2.3", "1.2.3"));
		// Exact match follows precedence, so build metadata is ignored.
		assert!(satisfied("1.2.3", "1.2.3+build.7"));
	}

	#[test]
	fn tilde_patch_level_compatibility() {
		assert!(satisfied("~1.2.3", "1.2.3"));
		assert!(satisfied("~1.2.3", "1.2.9"));
		assert!(!satisfied("~1.2.3", "1.3.0"));
		assert!(!satisfied("~1.2.3", "1.2.2"));
		assert!(!satisfied("~1.2.3", "2.2.3"));
	}

	#[test]
	fn caret_minor_level_compatibility() {
		assert!(satisfied("^1.2.3", "1.2.3"));
		assert!(satisfied("^1.2.3", "1.9.0"));
		assert!(!satisfied("^1.2.3", "2.0.0"));
		assert!(!satisfied("^1.2.3", "1.2.2"));
	}

	#[test]
	fn compatible_ranges_gate_pre_releases() {
		assert!(!satisfied("~1.2.3", "1.2.4-alpha"));
		assert!(!satisfied("^1.2.3", "1.3.0-alpha"));
		// A declared pre-release admits later pre-releases of the same triple.
		assert!(satisfied("~1.2.3-alpha", "1.2.3-beta"));
		assert!(!satisfied("~1.2.3-beta", "1.2.3-alpha"));
		assert!(satisfied("~1.2.3-alpha", "1.2.9"));
	}

	#[test]
	fn relational_operators() {
		assert!(satisfied(">1.0.0", "1.0.1"));
		assert!(!satisfied(">1.0.0", "1.0.0"));
		assert!(satisfied("<=1.0.0", "1.0.0"));
		assert!(satisfied("<1.0.0", "1.0.0-rc.1"));
	}

	#[test]
	fn parse_errors() {
		assert_eq!(Comparator::parse(""), Err(ExpressionError::Empty));
		assert_eq!(Comparator::parse("   "), Err(ExpressionError::Empty));
		assert_eq!(
			Comparator::parse(">=1.0.0,,<2.0.0"),
			Err(ExpressionError::EmptyTerm)
		);
		assert!(matches!(
			Comparator::parse("!1.0.0"),
			Err(ExpressionError::UnknownOperator(_))
		));
		assert!(matches!(
			Comparator::parse(">=1.0"),
			Err(ExpressionError::Version { .. })
		));
	}

	#[test]
	fn comparator_is_reusable() {
		let comparator = Comparator::parse(">=1.0.0,<2.0.0").unwrap();
		for text in ["1.0.0", "1.5.0", "1.9.9"] {
			assert!(comparator.is_satisfied(&v(text)));
		}
		for text in ["0.9.9", "2.0.0"] {
			assert!(!comparator.is_satisfied(&v(text)));
		}
	}
}
