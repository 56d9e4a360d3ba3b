use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Uniform in `[-spread, spread]`.
    fn jitter(&mut self, spread: f64) -> f64 {
        (self.next_f64() * 2.0 - 1.0) * spread
    }
}

struct Listing {
    locality: String,
    year: i64,
    rate: Option<f64>,
    demand: f64,
    size_sqft: f64,
}

/// (locality, base rate per sqft, yearly growth, base demand)
const LOCALITIES: &[(&str, f64, f64, f64)] = &[
    ("Wakad", 6500.0, 0.08, 7.5),
    ("Aundh", 9800.0, 0.02, 6.0),
    ("Baner", 8700.0, 0.05, 8.2),
    ("Hinjewadi", 6100.0, -0.04, 5.1),
    ("Pune West", 7200.0, 0.06, 6.8),
];

const YEARS: std::ops::RangeInclusive<i64> = 2018..=2024;

fn generate(rng: &mut SimpleRng) -> Vec<Listing> {
    let mut listings = Vec::new();
    for &(locality, base_rate, growth, base_demand) in LOCALITIES {
        for year in YEARS {
            let t = (year - YEARS.start()) as i32;
            for _ in 0..3 {
                let rate = base_rate * (1.0 + growth).powi(t) + rng.jitter(150.0);
                // Roughly one listing in twenty has no recorded rate.
                let rate = (rng.next_f64() > 0.05).then_some(rate.round());
                listings.push(Listing {
                    locality: locality.to_string(),
                    year,
                    rate,
                    demand: ((base_demand + rng.jitter(1.5)) * 10.0).round() / 10.0,
                    size_sqft: (650.0 + rng.next_f64() * 900.0).round(),
                });
            }
        }
    }
    listings
}

fn write_csv(path: &Path, listings: &[Listing]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).context("creating CSV")?;
    writer.write_record(["Final Location", "Year", "Flat - Weighted Average Rate", "Demand Index", "Size (sqft)"])?;
    for l in listings {
        writer.write_record([
            l.locality.clone(),
            l.year.to_string(),
            l.rate.map(|r| r.to_string()).unwrap_or_default(),
            l.demand.to_string(),
            l.size_sqft.to_string(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

fn write_parquet(path: &Path, listings: &[Listing]) -> Result<()> {
    let schema = Arc::new(Schema::new(vec![
        Field::new("Final Location", DataType::Utf8, false),
        Field::new("Year", DataType::Int64, false),
        Field::new("Flat - Weighted Average Rate", DataType::Float64, true),
        Field::new("Demand Index", DataType::Float64, false),
        Field::new("Size (sqft)", DataType::Float64, false),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(StringArray::from(
                listings.iter().map(|l| l.locality.as_str()).collect::<Vec<_>>(),
            )),
            Arc::new(Int64Array::from(listings.iter().map(|l| l.year).collect::<Vec<_>>())),
            Arc::new(Float64Array::from(listings.iter().map(|l| l.rate).collect::<Vec<_>>())),
            Arc::new(Float64Array::from(listings.iter().map(|l| l.demand).collect::<Vec<_>>())),
            Arc::new(Float64Array::from(listings.iter().map(|l| l.size_sqft).collect::<Vec<_>>())),
        ],
    )
    .context("building record batch")?;

    let file = std::fs::File::create(path).context("creating parquet file")?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch)?;
    writer.close()?;
    Ok(())
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);
    let listings = generate(&mut rng);

    let dir = std::env::args().nth(1).unwrap_or_else(|| ".".to_string());
    let dir = Path::new(&dir);
    std::fs::create_dir_all(dir).context("creating output directory")?;

    let csv_path = dir.join("sample_data.csv");
    let parquet_path = dir.join("sample_data.parquet");
    write_csv(&csv_path, &listings)?;
    write_parquet(&parquet_path, &listings)?;

    println!(
        "Wrote {} listings for {} localities to {} and {}",
        listings.len(),
        LOCALITIES.len(),
        csv_path.display(),
        parquet_path.display()
    );
    Ok(())
}
