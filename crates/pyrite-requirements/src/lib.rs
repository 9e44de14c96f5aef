/*! Declared-dependency model for Python projects.
 *
 * A `requirements.txt` file pins the versions a project claims to run against. This crate parses
 * those lines into an interval algebra over dotted versions, so advisories expressed as version
 * ranges can be checked against what a project actually declares.
 */

pub mod requirement;
pub mod version;
pub mod vrange;

pub use requirement::{parse_requirements, Requirement};
pub use version::Version;
pub use vrange::VRange;

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RequirementError {
    #[error("invalid version: {0:?}")]
    InvalidVersion(String),
    #[error("unsupported specifier: {0:?}")]
    InvalidSpecifier(String),
}

pub type Result<T> = std::result::Result<T, RequirementError>;
