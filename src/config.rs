use crate::error::ConfigError;
use rusoto_core::Region;
use std::env;
use std::str::FromStr;

pub const ACCOUNT_ALIAS_VAR: &str = "ACCOUNT_ALIAS";
pub const AMI_NAME_VAR: &str = "AMI_NAME";
pub const REGION_VAR: &str = "REGION";

/// Inputs of a single refresh run.
///
/// Built once at cold start and handed to the resolver, so tests can construct
/// it directly instead of going through the process environment.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolverConfig {
    pub account_alias: String,
    pub ami_name: String,
    pub region: Region,
}

impl ResolverConfig {
    pub fn new(account_alias: &str, ami_name: &str, region: &str) -> Result<Self, ConfigError> {
        let account_alias = required(ACCOUNT_ALIAS_VAR, account_alias)?;
        if account_alias.contains('/') {
            return Err(ConfigError::InvalidAccountAlias(account_alias));
        }
        let ami_name = required(AMI_NAME_VAR, ami_name)?;
        let region = Region::from_str(&required(REGION_VAR, region)?)?;

        Ok(ResolverConfig {
            account_alias,
            ami_name,
            region,
        })
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&'static str) -> Option<String>,
    {
        let account_alias =
            lookup(ACCOUNT_ALIAS_VAR).ok_or(ConfigError::MissingVariable(ACCOUNT_ALIAS_VAR))?;
        let ami_name = lookup(AMI_NAME_VAR).ok_or(ConfigError::MissingVariable(AMI_NAME_VAR))?;
        let region = lookup(REGION_VAR).ok_or(ConfigError::MissingVariable(REGION_VAR))?;
        Self::new(&account_alias, &ami_name, &region)
    }

    /// SSM path owned by the refresh function.
    pub fn parameter_name(&self) -> String {
        format!("/{}/IMAGE/RHEL8/LATEST/AMI_ID", self.account_alias)
    }
}

fn required(name: &'static str, value: &str) -> Result<String, ConfigError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ConfigError::EmptyVariable(name));
    }
    Ok(value.to_string())
}
