use crate::ec2_image_client::ImageRegistry;
use crate::resolver::{AmiResolver, Publication};
use crate::scheduled_event::ScheduledEvent;
use crate::ssm_parameter_client::ParameterStore;
use lambda_runtime::{Error, LambdaEvent};
use serde_json::Value;
use tracing::info;

pub async fn refresh_handler<R, S>(
    resolver: &AmiResolver<R, S>,
    event: LambdaEvent<Value>,
) -> Result<Publication, Error>
where
    R: ImageRegistry,
    S: ParameterStore,
{
    let (payload, context) = event.into_parts();
    match ScheduledEvent::parse(&payload) {
        Some(tick) => info!(
            request_id = %context.request_id,
            rule = tick.rule_arn().unwrap_or("unknown"),
            time = %tick.time,
            "refresh invoked by schedule"
        ),
        None => info!(
            request_id = %context.request_id,
            event = %payload,
            "refresh invoked"
        ),
    }

    let publication = resolver.resolve_and_publish().await?;
    Ok(publication)
}
