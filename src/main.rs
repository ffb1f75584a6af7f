use ami_refresh::ec2_image_client::Ec2ImageClient;
use ami_refresh::handler::refresh_handler;
use ami_refresh::scheduled_event::SCHEDULE_EXPRESSION;
use ami_refresh::ssm_parameter_client::SsmParameterClient;
use ami_refresh::{AmiResolver, ResolverConfig};
use anyhow::Context;
use lambda_runtime::service_fn;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync + 'static>> {
    lambda_runtime::tracing::init_default_subscriber();

    let config = ResolverConfig::from_env().context("invalid AMI refresh configuration")?;
    info!(
        account_alias = %config.account_alias,
        ami_name = %config.ami_name,
        region = config.region.name(),
        parameter = %config.parameter_name(),
        schedule = SCHEDULE_EXPRESSION,
        "starting AMI refresh function"
    );

    let resolver = AmiResolver::new(
        config.clone(),
        Ec2ImageClient::new(config.region.clone()),
        SsmParameterClient::new(config.region.clone()),
    );

    lambda_runtime::run(service_fn(|event| refresh_handler(&resolver, event))).await?;
    Ok(())
}
