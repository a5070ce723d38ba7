/// Example HTTP client driving the address form server like a UI would
///
/// Run the server first:
/// ```bash
/// cargo run --bin server
/// ```
///
/// Then run this example:
/// ```bash
/// cargo run --example api_client
/// ```
use std::time::Duration;

use serde::{Deserialize, Serialize};

#[derive(Serialize)]
struct FieldUpdate {
    value: String,
}

#[derive(Deserialize, Debug)]
struct FormData {
    zip_code: String,
    street_address: String,
    address_number: String,
    complement: String,
    state: String,
    city: String,
    district: String,
    is_loading: bool,
}

#[derive(Deserialize, Debug)]
struct HealthResponse {
    status: String,
    version: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let base_url = std::env::var("API_URL").unwrap_or_else(|_| "http://localhost:3000".to_string());
    let client = reqwest::Client::new();

    println!("=== Address Form API Client Demo ===\n");

    // 1. Health Check
    println!("1. Checking server health...");
    let health: HealthResponse = client
        .get(format!("{}/health", base_url))
        .send()
        .await?
        .json()
        .await?;
    println!("   Server status: {}", health.status);
    println!("   Version: {}\n", health.version);

    // 2. Type the number, then the CEP one keystroke at a time
    println!("2. Typing address number and CEP...");
    client
        .put(format!("{}/api/form/address-number", base_url))
        .json(&FieldUpdate {
            value: "1578".to_string(),
        })
        .send()
        .await?;

    let mut typed = String::new();
    for digit in "01310100".chars() {
        typed.push(digit);
        let response: serde_json::Value = client
            .put(format!("{}/api/form/zip-code", base_url))
            .json(&FieldUpdate {
                value: typed.clone(),
            })
            .send()
            .await?
            .json()
            .await?;
        println!(
            "   typed {:<8} -> shown {:<9} lookup started: {}",
            typed, response["zip_code"], response["lookup_started"]
        );
        // The field shows the masked value, so keep typing on top of it
        typed = response["zip_code"].as_str().unwrap_or_default().to_string();
    }

    // 3. Wait for the busy overlay to go away
    println!("\n3. Waiting for lookup...");
    let form = loop {
        let form: FormData = client
            .get(format!("{}/api/form", base_url))
            .send()
            .await?
            .json()
            .await?;
        if !form.is_loading {
            break form;
        }
        println!("   Carregando...");
        tokio::time::sleep(Duration::from_millis(100)).await;
    };

    println!("   CEP: {}", form.zip_code);
    println!("   Rua: {}", form.street_address);
    println!("   Número: {}", form.address_number);
    println!("   Complemento: {}", form.complement);
    println!("   Bairro: {}", form.district);
    println!("   Cidade: {}", form.city);
    println!("   Estado: {}\n", form.state);

    println!("=== Demo Complete ===");

    Ok(())
}
