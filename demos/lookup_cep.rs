use std::time::Instant;

use anyhow::Result;
use cep_form::{CepClient, ResolverConfig, normalize_code};

#[tokio::main]
async fn main() -> Result<()> {
    // One client, shared by every lookup task
    let client = CepClient::new(&ResolverConfig::from_env())?;

    let codes = vec![
        "01310-100", // Av. Paulista, São Paulo
        "20040-020", // Av. Rio Branco, Rio de Janeiro
        "70040-010", // Esplanada, Brasília
        "30130-010", // Belo Horizonte
        "99999-999", // unknown
    ];

    println!("Looking up {} postal codes concurrently...", codes.len());
    let start = Instant::now();

    let handles: Vec<_> = codes
        .iter()
        .map(|code| {
            let client = client.clone(); // Cheap clone (Arc)
            let code = normalize_code(code);
            tokio::spawn(async move {
                let result = client.lookup(&code).await;
                (code, result)
            })
        })
        .collect();

    for handle in handles {
        let (code, result) = handle.await?;
        match result {
            Ok(address) => println!(
                "{}: {}, {} - {}/{}",
                code, address.street, address.district, address.city, address.state
            ),
            Err(e) => println!("{}: {} ({})", code, e, e.kind()),
        }
    }

    println!("\nDone in {:?}", start.elapsed());

    Ok(())
}
