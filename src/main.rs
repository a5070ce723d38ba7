use std::env;

use anyhow::{Context, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cep_form::{AddressResolver, ResolverConfig};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cep_form=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: {} <cep> [number]", args[0]);
        eprintln!("  cep: 8 digits, with or without hyphen (e.g., 01310100 or 01310-100)");
        eprintln!("  number: optional street number, kept as typed");
        eprintln!("  VIACEP_URL, VIACEP_TIMEOUT_SECS override the lookup service");
        std::process::exit(1);
    }

    let resolver = AddressResolver::new(&ResolverConfig::from_env())
        .context("Failed to initialize address resolver")?;

    if let Some(number) = args.get(2) {
        resolver.set_address_number(number.as_str());
    }

    // Feed the text through the field as a user typing it would
    match resolver.on_zip_code_changed(&args[1]) {
        Some(handle) => handle.await.context("Lookup task panicked")?,
        None => eprintln!(
            "'{}' is not a complete CEP, no lookup performed",
            resolver.snapshot().zip_code
        ),
    }

    let form = resolver.snapshot();
    println!("CEP:         {}", form.zip_code);
    println!("Rua:         {}", form.street_address);
    println!("Número:      {}", form.address_number);
    println!("Complemento: {}", form.complement);
    println!("Bairro:      {}", form.district);
    println!("Cidade:      {}", form.city);
    println!("Estado:      {}", form.state);

    Ok(())
}
