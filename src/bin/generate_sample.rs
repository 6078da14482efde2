use std::path::Path;

use anyhow::{Context, Result};

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

    fn range(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.next_f64()
    }

    fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        &items[(self.next_u64() % items.len() as u64) as usize]
    }
}

/// `1234.5` → `"$1,234.50"`, `-12.5` → `"-$12.50"`, the way spreadsheet
/// exports format money.
fn dollars(v: f64) -> String {
    let cents = (v * 100.0).round() as i64;
    let sign = if cents < 0 { "-" } else { "" };
    let cents = cents.abs();
    let whole = (cents / 100).to_string();
    let mut grouped = String::new();
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("{sign}${grouped}.{:02}", cents % 100)
}

fn write_finance(path: &Path, rng: &mut SimpleRng) -> Result<usize> {
    let products = [("Carretera", 3.0), ("Montana", 5.0), ("Paseo", 10.0), ("Velo", 120.0)];
    let mut w = csv::Writer::from_path(path).context("creating finance CSV")?;
    w.write_record([
        "Segment", "Product", "Units Sold", "Manufacturing Price", "Sale Price", "Gross Sales",
        "Discounts", " Sales", "COGS", "Profit", "Date",
    ])?;
    let mut rows = 0;
    for month in 1..=12u32 {
        for _ in 0..4 {
            let (product, mfg) = *rng.pick(&products);
            let units = rng.range(200.0, 3000.0).round();
            let price = rng.pick(&[7.0, 12.0, 15.0, 20.0, 125.0, 300.0]).to_owned();
            let gross = units * price;
            let discounts = gross * rng.range(0.0, 0.1);
            let sales = gross - discounts;
            let cogs = units * mfg;
            let segment = rng.pick(&["Government", "Midmarket", "Enterprise"]).to_string();
            // Some exports leave a blank amount as " $-   ".
            let discount_cell = if discounts < gross * 0.01 { " $-   ".to_string() } else { dollars(discounts) };
            w.write_record([
                segment,
                product.to_string(),
                units.to_string(),
                dollars(mfg),
                dollars(price),
                dollars(gross),
                discount_cell,
                dollars(sales),
                dollars(cogs),
                dollars(sales - cogs),
                format!("{month:02}/01/2014"),
            ])?;
            rows += 1;
        }
    }
    w.flush()?;
    Ok(rows)
}

fn write_sales(path: &Path, rng: &mut SimpleRng) -> Result<usize> {
    let products = [("USB-C Charging Cable", 11.95), ("Wired Headphones", 11.99), ("27in FHD Monitor", 149.99)];
    let mut w = csv::Writer::from_path(path).context("creating sales CSV")?;
    w.write_record(["Order ID", "Product", "Quantity Ordered", "Price Each", "Cost price", "Order Date"])?;
    let mut rows = 0;
    for month in 1..=6u32 {
        for day in [3u32, 11, 19, 27] {
            let (product, price) = *rng.pick(&products);
            let quantity = 1 + rng.next_u64() % 3;
            let cost = (price * rng.range(0.5, 0.8) * 100.0).round() / 100.0;
            let hour = rng.next_u64() % 24;
            w.write_record([
                (176_558 + rows).to_string(),
                product.to_string(),
                quantity.to_string(),
                price.to_string(),
                cost.to_string(),
                format!("{month:02}/{day:02}/19 {hour:02}:46"),
            ])?;
            rows += 1;
        }
    }
    w.flush()?;
    Ok(rows as usize)
}

fn write_purchase(path: &Path, rng: &mut SimpleRng) -> Result<usize> {
    let vendors = ["DIAGEO NORTH AMERICA INC", "MARTIGNETTI COMPANIES", "JIM BEAM BRANDS COMPANY"];
    let sizes = ["750mL", "1.75L", "375mL", "50mL", "Liter"];
    let mut w = csv::Writer::from_path(path).context("creating purchase CSV")?;
    w.write_record(["Brand", "Description", "Price", "Size", "Volume", "Classification", "PurchasePrice", "VendorName"])?;
    let mut rows = 0;
    for brand in 58..98u32 {
        let size = *rng.pick(&sizes);
        let purchase = (rng.range(3.0, 40.0) * 100.0).round() / 100.0;
        let price = (purchase * rng.range(1.3, 1.6) * 100.0).round() / 100.0;
        // Leave a few prices blank so the mean imputation has work to do.
        let price_cell = if brand % 13 == 0 { String::new() } else { price.to_string() };
        let record = [
            brand.to_string(),
            format!("Sample Spirit {brand}"),
            price_cell,
            size.to_string(),
            size.trim_end_matches(|c: char| c.is_alphabetic()).to_string(),
            (1 + brand % 2).to_string(),
            purchase.to_string(),
            rng.pick(&vendors).to_string(),
        ];
        w.write_record(&record)?;
        if brand % 10 == 0 {
            w.write_record(&record)?;
            rows += 1;
        }
        rows += 1;
    }
    w.flush()?;
    Ok(rows)
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);

    let finance = write_finance(Path::new("finance_sample.csv"), &mut rng)?;
    let sales = write_sales(Path::new("sales_sample.csv"), &mut rng)?;
    let purchase = write_purchase(Path::new("purchase_sample.csv"), &mut rng)?;

    println!(
        "Wrote finance_sample.csv ({finance} rows), sales_sample.csv ({sales} rows), purchase_sample.csv ({purchase} rows)"
    );
    Ok(())
}
