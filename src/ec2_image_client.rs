use async_trait::async_trait;
use rusoto_core::Region;
use rusoto_ec2::{DescribeImagesRequest, Ec2, Ec2Client, Filter, Image};

use crate::error::AmiRefreshError;
use crate::image::{ImageDescriptor, ImageState, ImageType, NameFilter};

pub struct Ec2ImageClient {
    client: Ec2Client,
}

#[async_trait]
pub trait ImageRegistry: Send + Sync {
    /// Lists the available machine images whose name matches `filter`.
    async fn describe_images(
        &self,
        filter: &NameFilter,
    ) -> Result<Vec<ImageDescriptor>, AmiRefreshError>;
}

#[async_trait]
impl ImageRegistry for Ec2ImageClient {
    async fn describe_images(
        &self,
        filter: &NameFilter,
    ) -> Result<Vec<ImageDescriptor>, AmiRefreshError> {
        let result = self
            .client
            .describe_images(eligible_images_request(filter))
            .await?;

        result
            .images
            .unwrap_or_default()
            .into_iter()
            .map(to_descriptor)
            .collect()
    }
}

impl Ec2ImageClient {
    pub fn new(region: Region) -> Self {
        Self::new_with_client(Ec2Client::new(region))
    }

    pub fn new_with_client(client: Ec2Client) -> Self {
        Ec2ImageClient { client }
    }
}

fn eligible_images_request(filter: &NameFilter) -> DescribeImagesRequest {
    DescribeImagesRequest {
        filters: Some(vec![
            filter_of("name", filter.pattern()),
            filter_of("state", "available"),
            filter_of("image-type", "machine"),
        ]),
        ..DescribeImagesRequest::default()
    }
}

fn filter_of(name: &str, value: &str) -> Filter {
    Filter {
        name: Some(name.to_string()),
        values: Some(vec![value.to_string()]),
    }
}

fn to_descriptor(image: Image) -> Result<ImageDescriptor, AmiRefreshError> {
    Ok(ImageDescriptor {
        image_id: image.image_id.ok_or(AmiRefreshError::NoneValue)?,
        name: image.name.ok_or(AmiRefreshError::NoneValue)?,
        state: image
            .state
            .as_deref()
            .map(ImageState::from)
            .ok_or(AmiRefreshError::NoneValue)?,
        image_type: image
            .image_type
            .as_deref()
            .map(ImageType::from)
            .ok_or(AmiRefreshError::NoneValue)?,
        creation_date: image.creation_date,
    })
}
