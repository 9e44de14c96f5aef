use crate::version::Version;
use crate::vrange::VRange;
use crate::{RequirementError, Result};
use serde::Serialize;

/// One parsed `requirements.txt` line: a package name and the interval of
/// versions its specifiers admit. Comma-separated specifiers intersect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Requirement {
    pub name: String,
    pub line: String,
    pub range: VRange<Version>,
}

impl Requirement {
    /// Parse a single line. Blank lines and comments yield `Ok(None)`.
    pub fn parse(line: &str) -> Result<Option<Requirement>> {
        let text = match line.find('#') {
            Some(at) => line[..at].trim(),
            None => line.trim(),
        };
        if text.is_empty() {
            return Ok(None);
        }

        let split = text.find(|c| "=<>!~".contains(c));
        let name = match split {
            Some(at) => text[..at].trim(),
            None => text,
        };
        let mut range = VRange::full();
        if let Some(at) = split {
            for specifier in text[at..].split(',') {
                range = range.intersection(&parse_specifier(specifier.trim())?);
            }
        }

        Ok(Some(Requirement {
            name: name.to_string(),
            line: line.trim().to_string(),
            range,
        }))
    }

    /// Does `version` satisfy every specifier on the line? A bare name admits
    /// everything.
    pub fn admits(&self, version: &Version) -> bool {
        self.range.contains(version)
    }

    /// A bare name with no specifiers admits any version at all.
    pub fn is_unconstrained(&self) -> bool {
        self.range.start.is_none() && self.range.end.is_none()
    }
}

fn parse_specifier(specifier: &str) -> Result<VRange<Version>> {
    let invalid = || RequirementError::InvalidSpecifier(specifier.to_string());
    let (operator, rest) = match specifier.as_bytes() {
        [b'=', b'=', ..] => ("==", &specifier[2..]),
        [b'>', b'=', ..] => (">=", &specifier[2..]),
        [b'<', b'=', ..] => ("<=", &specifier[2..]),
        [b'>', ..] => (">", &specifier[1..]),
        [b'<', ..] => ("<", &specifier[1..]),
        _ => return Err(invalid()),
    };
    let version: Version = rest.trim().parse()?;
    Ok(match operator {
        "==" => VRange::closed(version.clone(), version),
        ">=" => VRange::ge(version),
        ">" => VRange::gt(version),
        "<=" => VRange::le(version),
        "<" => VRange::lt(version),
        _ => return Err(invalid()),
    })
}

/// Parse a whole `requirements.txt`, skipping blanks and comments.
pub fn parse_requirements(text: &str) -> Result<Vec<Requirement>> {
    let mut requirements = Vec::new();
    for line in text.lines() {
        if let Some(requirement) = Requirement::parse(line)? {
            requirements.push(requirement);
        }
    }
    Ok(requirements)
}
