use crate::config::ResolverConfig;
use crate::ec2_image_client::ImageRegistry;
use crate::error::AmiRefreshError;
use crate::image::{select_latest, ImageDescriptor, NameFilter};
use crate::ssm_parameter_client::{ParameterEntry, ParameterStore};
use serde::Serialize;
use tracing::{error, info};

/// Outcome of a successful refresh, returned to the invoker.
#[derive(Debug, PartialEq, Serialize)]
pub struct Publication {
    pub parameter_name: String,
    pub image_id: String,
    pub image_name: String,
    pub version: Option<i64>,
}

/// Resolves the latest eligible AMI and publishes its id.
///
/// One registry query followed by at most one parameter write. Failures are
/// logged and returned as-is; nothing is retried here.
pub struct AmiResolver<R, S> {
    config: ResolverConfig,
    registry: R,
    store: S,
}

impl<R, S> AmiResolver<R, S>
where
    R: ImageRegistry,
    S: ParameterStore,
{
    pub fn new(config: ResolverConfig, registry: R, store: S) -> Self {
        AmiResolver {
            config,
            registry,
            store,
        }
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    pub async fn resolve(&self) -> Result<ImageDescriptor, AmiRefreshError> {
        let filter = NameFilter::new(&self.config.ami_name);
        let images = self.registry.describe_images(&filter).await.map_err(|err| {
            error!(filter = %filter, error = %err, "error describing images");
            err
        })?;

        let latest = select_latest(&images, &filter)
            .map_err(|err| {
                error!(filter = %filter, returned = images.len(), error = %err, "no image selected");
                err
            })?
            .clone();

        info!(
            image_id = %latest.image_id,
            image_name = %latest.name,
            candidates = images.len(),
            "resolved latest AMI"
        );
        Ok(latest)
    }

    pub async fn resolve_and_publish(&self) -> Result<Publication, AmiRefreshError> {
        let latest = self.resolve().await?;
        let entry = ParameterEntry::latest_ami(&self.config, &latest.image_id);

        info!(parameter = %entry.name, image_id = %entry.value, "updating SSM parameter");
        let outcome = self.store.put_parameter(&entry).await.map_err(|err| {
            error!(parameter = %entry.name, error = %err, "error putting parameter");
            err
        })?;
        info!(
            parameter = %entry.name,
            image_id = %entry.value,
            version = ?outcome.version,
            "updated SSM parameter"
        );

        Ok(Publication {
            parameter_name: entry.name,
            image_id: latest.image_id,
            image_name: latest.name,
            version: outcome.version,
        })
    }
}
