pub mod certificate_rules;
pub mod config;
pub mod ec2_image_client;
pub mod error;
pub mod event_pattern;
pub mod handler;
pub mod image;
pub mod resolver;
pub mod scheduled_event;
pub mod ssm_parameter_client;

pub use config::ResolverConfig;
pub use error::AmiRefreshError;
pub use resolver::{AmiResolver, Publication};
