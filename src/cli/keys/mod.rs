//! Key inspection commands

use clap::Args;

use crate::domain::api_key::{classify, mask, ApiKeyRecord};

/// Arguments for `classify`
#[derive(Args, Debug)]
pub struct ClassifyArgs {
    /// Raw key value
    pub value: String,
}

/// Print every stored key from the active backend, values masked
pub async fn list() -> anyhow::Result<()> {
    let config = super::load_config()?;
    let factory = crate::create_store_factory(&config).await;
    let state = crate::create_app_state(factory.clone());

    let records = state.key_store.list_all().await;
    println!("{} API keys ({} storage)", records.len(), state.key_store.backend());
    for record in &records {
        println!("{}", format_record(record));
    }

    factory.shutdown().await;
    Ok(())
}

/// Print the type and masked form of a value
pub fn classify_value(args: ClassifyArgs) -> anyhow::Result<()> {
    println!("{}", format_classification(&args.value));
    Ok(())
}

fn format_record(record: &ApiKeyRecord) -> String {
    format!(
        "{}  {:<7} {:<24} {}  updated {}",
        record.id(),
        record.key_type().as_str(),
        record.name(),
        record.masked_value(),
        record.updated_at().to_rfc3339()
    )
}

fn format_classification(value: &str) -> String {
    format!("type: {}\nmasked: {}", classify(value), mask(value))
}
