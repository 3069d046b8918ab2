use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use sa_asset_groups::TypeRef;

#[derive(Error, Debug)]
pub enum ProviderError {
	#[error("regex compile error: {0}")]
	Regex(#[from] regex::Error),
}

/// Which part of the asset path a path-based provider starts from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PathSource {
	FullPath,
	FileName,
	FileNameWithoutExtension,
}

impl PathSource {
	#[must_use]
	pub fn extract<'a>(&self, path: &'a str) -> &'a str {
		match self {
			Self::FullPath => path,
			Self::FileName => file_name(path),
			Self::FileNameWithoutExtension => {
				let name = file_name(path);
				match name.rsplit_once('.') {
					Some((stem, _)) if !stem.is_empty() => stem,
					_ => name,
				}
			}
		}
	}

	const fn label(&self) -> &'static str {
		match self {
			Self::FullPath => "Asset Path",
			Self::FileName => "File Name",
			Self::FileNameWithoutExtension => "File Name Without Extension",
		}
	}
}

fn file_name(path: &str) -> &str {
	path.rsplit('/').next().unwrap_or(path)
}

/// A path source with an optional regex replacement applied on top.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathTransform {
	pub source: PathSource,
	pub replace_pattern: Option<String>,
	pub replacement: String,
	#[serde(skip)]
	compiled: Option<Regex>,
}

impl PathTransform {
	#[must_use]
	pub const fn new(source: PathSource) -> Self {
		Self {
			source,
			replace_pattern: None,
			replacement: String::new(),
			compiled: None,
		}
	}

	pub fn with_replacement(source: PathSource, pattern: impl Into<String>, replacement: impl Into<String>) -> Self {
		Self {
			source,
			replace_pattern: Some(pattern.into()),
			replacement: replacement.into(),
			compiled: None,
		}
	}

	pub fn setup(&mut self) -> Result<(), ProviderError> {
		self.compiled = self
			.replace_pattern
			.as_deref()
			.map(Regex::new)
			.transpose()?;
		Ok(())
	}

	#[must_use]
	pub fn provide(&self, path: &str) -> String {
		let source = self.source.extract(path);
		match &self.compiled {
			Some(regex) => regex.replace_all(source, self.replacement.as_str()).into_owned(),
			None => source.to_string(),
		}
	}

	fn description(&self) -> String {
		match &self.replace_pattern {
			Some(pattern) => format!(
				"{} (replace '{pattern}' with '{}')",
				self.source.label(),
				self.replacement
			),
			None => self.source.label().to_string(),
		}
	}
}

/// Address-naming strategy of an address rule. Closed set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum AddressProvider {
	AssetPath(PathTransform),
	Constant(String),
}

impl AddressProvider {
	pub fn setup(&mut self) -> Result<(), ProviderError> {
		match self {
			Self::AssetPath(transform) => transform.setup(),
			Self::Constant(_) => Ok(()),
		}
	}

	#[must_use]
	pub fn provide(&self, path: &str, _ty: &TypeRef, _is_folder: bool) -> String {
		match self {
			Self::AssetPath(transform) => transform.provide(path),
			Self::Constant(address) => address.clone(),
		}
	}

	#[must_use]
	pub fn description(&self) -> String {
		match self {
			Self::AssetPath(transform) => format!("Address From {}", transform.description()),
			Self::Constant(address) => format!("Constant Address: {address}"),
		}
	}
}

/// Label-set strategy of a label rule. Closed set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum LabelProvider {
	Constant(Vec<String>),
	AssetPathBased(PathTransform),
}

impl LabelProvider {
	pub fn setup(&mut self) -> Result<(), ProviderError> {
		match self {
			Self::Constant(_) => Ok(()),
			Self::AssetPathBased(transform) => transform.setup(),
		}
	}

	#[must_use]
	pub fn provide(&self, path: &str, _ty: &TypeRef, _is_folder: bool) -> Vec<String> {
		match self {
			Self::Constant(labels) => labels.clone(),
			Self::AssetPathBased(transform) => vec![transform.provide(path)],
		}
	}

	#[must_use]
	pub fn description(&self) -> String {
		match self {
			Self::Constant(labels) => format!("Constant Labels: {}", labels.join(", ")),
			Self::AssetPathBased(transform) => format!("Label From {}", transform.description()),
		}
	}
}

/// Version-string strategy of a version rule. Closed set.
///
/// An empty provided string counts as "unversioned" downstream.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum VersionProvider {
	Constant(String),
	AssetPathBased(PathTransform),
}

impl VersionProvider {
	pub fn setup(&mut self) -> Result<(), ProviderError> {
		match self {
			Self::Constant(_) => Ok(()),
			Self::AssetPathBased(transform) => transform.setup(),
		}
	}

	#[must_use]
	pub fn provide(&self, path: &str, _ty: &TypeRef, _is_folder: bool) -> String {
		match self {
			Self::Constant(version) => version.clone(),
			Self::AssetPathBased(transform) => transform.provide(path),
		}
	}

	#[must_use]
	pub fn description(&self) -> String {
		match self {
			Self::Constant(version) => format!("Constant Version: {version}"),
			Self::AssetPathBased(transform) => format!("Version From {}", transform.description()),
		}
	}
}
