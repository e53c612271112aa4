use anyhow::Result;
use chrono::NaiveDate;
use lisird::Client;

fn main() -> Result<()> {
    // Example program that fetches a year of SORCE total solar irradiance.
    let client = Client::new()?;

    let start = NaiveDate::from_ymd_opt(2005, 5, 5)
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap();
    let end = NaiveDate::from_ymd_opt(2006, 5, 5)
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap();

    let table = client.fetch_range("sorce_tsi_24hr_l3", start, end)?;
    println!(
        "{} rows, columns: {:?}",
        table.len(),
        table.column_names()
    );
    for (time, row) in table.rows().take(10) {
        println!("{time}  {row:?}");
    }
    Ok(())
}
