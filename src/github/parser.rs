use crate::{Error, Result};
use std::fmt;
use std::str::FromStr;
use url::Url;

/// Owner/name pair identifying a repository for README lookups
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryRef {
    pub owner: String,
    pub name: String,
}

impl fmt::Display for RepositoryRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

impl FromStr for RepositoryRef {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        parse_repository_ref(s)
    }
}

/// Parse a repository reference.
///
/// Accepts `owner/name`, `github.com/owner/name` and full
/// `https://github.com/owner/name[.git][/...]` URLs.
pub fn parse_repository_ref(input: &str) -> Result<RepositoryRef> {
    let input = input.trim();

    let path = if input.contains("://") {
        let url = Url::parse(input)?;
        url.path().to_string()
    } else {
        input
            .strip_prefix("github.com/")
            .unwrap_or(input)
            .to_string()
    };

    let mut parts = path.trim_matches('/').split('/');
    let owner = parts.next().unwrap_or_default().trim();
    let name = parts
        .next()
        .unwrap_or_default()
        .trim()
        .trim_end_matches(".git");

    if owner.is_empty() || name.is_empty() {
        return Err(Error::Validation(format!(
            "Expected a repository as owner/name, got: {input}"
        )));
    }

    Ok(RepositoryRef {
        owner: owner.to_string(),
        name: name.to_string(),
    })
}
