//! `alumni-cli` -- terminal front end for the alumni registration,
//! nomination and sponsorship wizards.
//!
//! Usage: `alumni-cli [registration|nomination|sponsorship]`. See
//! [`alumni_cli::config`] for the environment variables.

use std::sync::Arc;

use alumni_cli::config::{CliConfig, Flow, DEFAULT_LOG_FILTER};
use alumni_cli::prompt::Prompter;
use alumni_cli::run::{run, show_reference_lists, Outcome, TerminalObserver};
use alumni_client::ConnectApi;
use alumni_core::entity::SubmissionEntity;
use alumni_core::nomination::Nomination;
use alumni_core::registration::Registration;
use alumni_core::sponsorship::{Sponsorship, SponsorshipForm};
use alumni_wizard::Wizard;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = CliConfig::from_env(std::env::args().nth(1))?;
    tracing::info!(
        flow = %config.flow,
        api_url = %config.client.api_url,
        "Starting alumni-cli",
    );

    let api = ConnectApi::new(&config.client);
    let mut prompter = Prompter::stdio();
    let observer = Arc::new(TerminalObserver);

    let outcome = match config.flow {
        Flow::Registration => {
            show_reference_lists(&api, &mut prompter).await?;
            let wizard = Wizard::<Registration>::new(Arc::new(api)).with_observer(observer);
            run(&wizard, &mut prompter).await?
        }
        Flow::Nomination => {
            let wizard = Wizard::<Nomination>::new(Arc::new(api)).with_observer(observer);
            run(&wizard, &mut prompter).await?
        }
        Flow::Sponsorship => {
            let form = match config.sponsor_level {
                Some(level) => SponsorshipForm::with_level(level),
                None => Sponsorship::blank_form(""),
            };
            let wizard = Wizard::<Sponsorship>::with_form(Arc::new(api), form).with_observer(observer);
            run(&wizard, &mut prompter).await?
        }
    };

    match outcome {
        Outcome::Submitted(route) => {
            tracing::info!(update = route.is_update(), "Submission complete");
        }
        Outcome::Cancelled => tracing::info!("Cancelled"),
    }
    Ok(())
}
