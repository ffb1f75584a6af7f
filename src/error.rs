use std::error::Error;

use rusoto_core::region::ParseRegionError;
use rusoto_core::RusotoError;
use rusoto_ec2::DescribeImagesError;
use rusoto_ssm::PutParameterError;
use std::fmt;
use std::fmt::{Display, Formatter};

#[derive(Debug, PartialEq)]
pub enum AmiRefreshError {
    NoneValue,
    NoEligibleImage { filter: String },
    Config(ConfigError),
    DescribeImages(RusotoError<DescribeImagesError>),
    PutParameter(RusotoError<PutParameterError>),
}

impl Display for AmiRefreshError {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match *self {
            AmiRefreshError::NoneValue => write!(f, "Value is None"),
            AmiRefreshError::NoEligibleImage { ref filter } => write!(
                f,
                "No available machine image matches the name filter '{}'",
                filter
            ),
            AmiRefreshError::Config(ref error) => Display::fmt(error, f),
            AmiRefreshError::DescribeImages(ref error) => {
                write!(f, "Failed to describe images: {}", error)
            }
            AmiRefreshError::PutParameter(ref error) => {
                write!(f, "Failed to put parameter: {}", error)
            }
        }
    }
}

impl Error for AmiRefreshError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match *self {
            AmiRefreshError::Config(ref error) => Some(error),
            AmiRefreshError::DescribeImages(ref error) => Some(error),
            AmiRefreshError::PutParameter(ref error) => Some(error),
            _ => None,
        }
    }
}

impl From<ConfigError> for AmiRefreshError {
    fn from(e: ConfigError) -> AmiRefreshError {
        AmiRefreshError::Config(e)
    }
}

impl From<RusotoError<DescribeImagesError>> for AmiRefreshError {
    fn from(e: RusotoError<DescribeImagesError>) -> AmiRefreshError {
        AmiRefreshError::DescribeImages(e)
    }
}

impl From<RusotoError<PutParameterError>> for AmiRefreshError {
    fn from(e: RusotoError<PutParameterError>) -> AmiRefreshError {
        AmiRefreshError::PutParameter(e)
    }
}

#[derive(Debug, PartialEq)]
pub enum ConfigError {
    MissingVariable(&'static str),
    EmptyVariable(&'static str),
    InvalidRegion(String),
    InvalidAccountAlias(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match *self {
            ConfigError::MissingVariable(name) => {
                write!(f, "Environment variable {} is not set", name)
            }
            ConfigError::EmptyVariable(name) => {
                write!(f, "Environment variable {} is empty", name)
            }
            ConfigError::InvalidRegion(ref region) => write!(f, "Unknown region '{}'", region),
            ConfigError::InvalidAccountAlias(ref alias) => write!(
                f,
                "Account alias '{}' must not contain '/'",
                alias
            ),
        }
    }
}

impl Error for ConfigError {}

impl From<ParseRegionError> for ConfigError {
    fn from(e: ParseRegionError) -> ConfigError {
        ConfigError::InvalidRegion(e.to_string())
    }
}

#[derive(Debug, PartialEq)]
pub enum EventPatternError {
    InvalidJson(String),
    NotAnObject,
    EmptyAlternatives(String),
    UnsupportedValue(String),
    UnknownFilter(String),
    InvalidNumeric(String),
}

impl Display for EventPatternError {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match *self {
            EventPatternError::InvalidJson(ref message) => {
                write!(f, "Event pattern is not valid JSON: {}", message)
            }
            EventPatternError::NotAnObject => write!(f, "Event pattern must be a JSON object"),
            EventPatternError::EmptyAlternatives(ref field) => {
                write!(f, "Field '{}' has an empty list of values", field)
            }
            EventPatternError::UnsupportedValue(ref field) => write!(
                f,
                "Field '{}' must be an object or a list of values",
                field
            ),
            EventPatternError::UnknownFilter(ref filter) => {
                write!(f, "Unsupported content filter '{}'", filter)
            }
            EventPatternError::InvalidNumeric(ref message) => {
                write!(f, "Invalid numeric filter: {}", message)
            }
        }
    }
}

impl Error for EventPatternError {}

impl From<serde_json::Error> for EventPatternError {
    fn from(e: serde_json::Error) -> EventPatternError {
        EventPatternError::InvalidJson(e.to_string())
    }
}
