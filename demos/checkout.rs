//! Checkout Example
//!
//! Fills a buyback list, prints it and submits it to the configured backend.
//!
//! Pass a path such as `/bh/ar/buyback` to pick the market and language.
//! Use `-e` to set the contact email and `-s` to choose a store.

use std::io;

use anyhow::Result;
use clap::Parser;

use buyback::{
    app::BuybackApp,
    catalog::Condition,
    config::AppConfig,
    observability::init_logging,
    page::{PageAction, SubmissionForm},
};

/// Checkout example arguments
#[derive(Debug, Parser)]
struct CheckoutArgs {
    /// Request path, `/{market}/{language}/...`
    #[arg(default_value = "/sa/en/buyback")]
    path: String,

    /// Contact email
    #[arg(short, long, default_value = "shopper@example.com")]
    email: String,

    /// Store id; the market's first store when unset
    #[arg(short, long)]
    store: Option<String>,

    /// Portal configuration
    #[command(flatten)]
    config: AppConfig,
}

/// Checkout Example
#[tokio::main]
#[expect(clippy::print_stdout, reason = "Example code")]
pub async fn main() -> Result<()> {
    _ = dotenvy::dotenv();

    let args = CheckoutArgs::parse();

    init_logging(&args.config.logging)?;

    let app = BuybackApp::new(&args.config, &args.path)?;
    let page = app.page();

    for (product_id, condition) in [
        ("10001", Condition::LikeNew),
        ("10002", Condition::VeryGood),
        ("10001", Condition::LikeNew),
    ] {
        page.dispatch(PageAction::PickCondition {
            product_id: product_id.to_string(),
            condition,
        })
        .await?;
    }

    {
        let stdout = io::stdout();
        let mut handle = stdout.lock();

        app.buyback()
            .write_to(&mut handle, app.locale(), app.translation())?;
    }

    let store_id = args.store.or_else(|| {
        app.catalog()
            .stores(app.locale().market())
            .first()
            .map(|store| store.id.clone())
    });

    let form = SubmissionForm {
        email: args.email,
        store_id,
        consent: true,
    };

    println!("\n{}", app.translation().buyback.submitting);

    let response = page.submit(&form).await?;

    println!(
        "{}\n{}: {}",
        app.translation().buyback.confirmation_title,
        app.translation().buyback.confirmation_number,
        response.confirmation_number
    );

    Ok(())
}
