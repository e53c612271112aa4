use anyhow::Result;
use lisird::Client;

fn main() -> Result<()> {
    // Example program that prints the most recent record of a dataset.
    let client = Client::new()?;

    let record = client.fetch_latest("sorce_tsi_24hr_l3")?;
    for (column, value) in &record {
        println!("{column}: {value}");
    }
    Ok(())
}
