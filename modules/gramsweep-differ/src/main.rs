use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use gramsweep_common::Config;
use gramsweep_differ::ArchiveDiffer;
use gramsweep_store::{DynamoCandidateQueue, DynamoOutcomeLog, S3Objects};

/// Diff a newly uploaded data-export archive into the unfollow queue.
#[derive(Parser, Debug)]
#[command(name = "gramsweep-differ")]
struct Args {
    /// Bucket holding the uploaded archive
    #[arg(long)]
    bucket: String,

    /// Object key of the archive
    #[arg(long)]
    key: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("gramsweep=info".parse()?))
        .init();

    let args = Args::parse();
    let config = Config::differ_from_env();

    info!(bucket = %args.bucket, key = %args.key, "Gramsweep differ starting...");

    let aws = aws_config::from_env().load().await;
    let queue = DynamoCandidateQueue::new(aws_sdk_dynamodb::Client::new(&aws), &config.queue_table);
    let outcomes = DynamoOutcomeLog::new(aws_sdk_dynamodb::Client::new(&aws), &config.outcome_table);
    let objects = S3Objects::new(aws_sdk_s3::Client::new(&aws));

    let differ = ArchiveDiffer::new(&objects, &queue, &outcomes, &config.differ_job);
    let stats = differ.process(&args.bucket, &args.key).await?;

    info!("{stats}");
    Ok(())
}
