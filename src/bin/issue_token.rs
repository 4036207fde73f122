//! Prints a bearer token signed with the service's current JWT settings,
//! for use as `Authorization: Bearer <token>` against a running server.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use user_service::TokenConfig;

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match TokenConfig::from_env().and_then(|config| config.create_token()) {
        Ok(token) => println!("{token}"),
        Err(e) => {
            eprintln!("Failed to issue token: {e}");
            std::process::exit(1);
        }
    }
}
