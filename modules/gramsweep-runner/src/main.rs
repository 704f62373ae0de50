use std::time::Duration;

use anyhow::{Context, Result};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use gramsweep_common::Config;
use gramsweep_runner::driver::WebDriverPage;
use gramsweep_runner::Runner;
use gramsweep_store::{
    DynamoCandidateQueue, DynamoOutcomeLog, S3SessionStore, SecretsManagerCredentials,
};
use webdriver_client::{SessionOptions, WebDriver};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("gramsweep=info".parse()?))
        .init();

    let run_id = Uuid::new_v4();
    info!(%run_id, "Gramsweep runner starting...");

    let config = Config::runner_from_env();

    let aws = aws_config::from_env().load().await;
    let queue = DynamoCandidateQueue::new(aws_sdk_dynamodb::Client::new(&aws), &config.queue_table);
    let outcomes = DynamoOutcomeLog::new(aws_sdk_dynamodb::Client::new(&aws), &config.outcome_table);
    let sessions = S3SessionStore::new(
        aws_sdk_s3::Client::new(&aws),
        &config.session_bucket,
        &config.session_key,
    );
    let credentials = SecretsManagerCredentials::new(
        aws_sdk_secretsmanager::Client::new(&aws),
        &config.credentials_secret,
    );

    let webdriver = WebDriver::new(&config.webdriver_url);
    let session = webdriver
        .start_session(&SessionOptions {
            headless: config.headless,
            slowdown: (config.slowdown_ms > 0).then(|| Duration::from_millis(config.slowdown_ms)),
        })
        .await
        .context("Failed to start browser session")?;
    let driver = WebDriverPage::new(session);

    let runner = Runner::new(&driver, &queue, &sessions, &credentials, &outcomes, &config);
    let result = runner.run().await;

    // Browser teardown is best-effort on every path.
    if let Err(e) = driver.close().await {
        warn!(error = %e, "Failed to close browser session");
    }

    let stats = result?;
    info!("Runner complete. {stats}");
    Ok(())
}
