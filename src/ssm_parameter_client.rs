use crate::config::ResolverConfig;
use crate::error::AmiRefreshError;
use async_trait::async_trait;
use rusoto_core::Region;
use rusoto_ssm::{PutParameterRequest, Ssm, SsmClient};

const LATEST_AMI_DESCRIPTION: &str =
    "An SSM Parameter to store the latest RHEL8 AMI ID supplied by the Lambda stack.";
const IMAGE_DATA_TYPE: &str = "aws:ec2:image";
const STRING_TYPE: &str = "String";

/// A single String parameter write.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterEntry {
    pub name: String,
    pub value: String,
    pub description: String,
    pub data_type: String,
    pub overwrite: bool,
}

impl ParameterEntry {
    pub fn latest_ami(config: &ResolverConfig, image_id: &str) -> Self {
        ParameterEntry {
            name: config.parameter_name(),
            value: image_id.to_string(),
            description: LATEST_AMI_DESCRIPTION.to_string(),
            data_type: IMAGE_DATA_TYPE.to_string(),
            overwrite: true,
        }
    }
}

#[derive(Debug, Default, PartialEq)]
pub struct PutOutcome {
    pub version: Option<i64>,
}

pub struct SsmParameterClient {
    client: SsmClient,
}

#[async_trait]
pub trait ParameterStore: Send + Sync {
    async fn put_parameter(&self, entry: &ParameterEntry) -> Result<PutOutcome, AmiRefreshError>;
}

#[async_trait]
impl ParameterStore for SsmParameterClient {
    async fn put_parameter(&self, entry: &ParameterEntry) -> Result<PutOutcome, AmiRefreshError> {
        let result = self
            .client
            .put_parameter(PutParameterRequest {
                name: entry.name.clone(),
                value: entry.value.clone(),
                description: Some(entry.description.clone()),
                data_type: Some(entry.data_type.clone()),
                overwrite: Some(entry.overwrite),
                type_: Some(STRING_TYPE.to_string()),
                ..Default::default()
            })
            .await?;
        Ok(PutOutcome {
            version: result.version,
        })
    }
}

impl SsmParameterClient {
    pub fn new(region: Region) -> Self {
        Self::new_with_client(SsmClient::new(region))
    }

    pub fn new_with_client(client: SsmClient) -> Self {
        SsmParameterClient { client }
    }
}
