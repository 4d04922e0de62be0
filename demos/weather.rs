//! Example: Round-tripping weather readings
//!
//! Generates a few readings, encodes them, prints the text and decodes it again.
//! Run with `RUST_LOG=rowcode=debug` to see the codec's tracing events.

#![allow(missing_docs)]

use rowcode::{Rowcode, RowcodeRecord, Timestamp, Uuid};
use tracing_subscriber::EnvFilter;

#[derive(RowcodeRecord, Debug, Clone, PartialEq)]
struct WeatherTemperature {
    #[rowcode(column = 1)]
    country_id: i32,
    #[rowcode(column = 2)]
    city_id: Uuid,
    #[rowcode(column = 3)]
    time_generated: Timestamp,
    #[rowcode(column = 4)]
    temperature: f64,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    println!("--- Rowcode Weather Example ---");

    // 1. Create some data
    let now = Timestamp::now()?;
    let readings: Vec<WeatherTemperature> = (0..3)
        .map(|i| WeatherTemperature {
            country_id: 131 + i,
            city_id: Uuid::from_u128(0x9503_7cad_434c_4a37_8e81_7952_a3d7_3d1a + i as u128),
            time_generated: now,
            temperature: 2.120028155888176 * f64::from(i + 1),
        })
        .collect();

    // 2. Encode. Timestamps are written as tick counts.
    let csv = Rowcode::serialize(&readings)?;
    println!("{csv}");

    // 3. Decode and compare
    let decoded: Vec<WeatherTemperature> = Rowcode::deserialize(&csv)?;
    println!("Decoded {} readings, identical: {}", decoded.len(), decoded == readings);
    println!("First reading: {:?}", decoded.first());

    Ok(())
}
