use anyhow::Context;
use ottla_broker::{
    config::Config,
    protocol::{
        handlers::{ApiVersionsHandler, DescribeTopicPartitionsHandler},
        messages::{ApiVersionsRequest, DescribeTopicPartitionsRequest},
        registry::MessageRegistry,
    },
    server::KafkaServer,
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = Config::load().context("loading configuration")?;

    let registry = MessageRegistry::new();
    registry.register::<ApiVersionsRequest, _>(ApiVersionsHandler);
    registry.register::<DescribeTopicPartitionsRequest, _>(DescribeTopicPartitionsHandler);

    KafkaServer::new(registry)
        .listen(&config.listen_addr)
        .await
        .context("serving kafka clients")?;

    Ok(())
}
