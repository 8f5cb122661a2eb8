use anyhow::{Context, Result};
use perma_dashboard::data::loader::ID_COLUMN;
use perma_dashboard::data::model::{item_column, Attribute, Dimension, ITEM_COUNT};

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

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }

    fn pick<'a>(&mut self, options: &[&'a str]) -> &'a str {
        options[(self.next_u64() % options.len() as u64) as usize]
    }
}

const RESPONDENTS: usize = 150;
const GENDERS: [&str; 3] = ["Female", "Male", "Non-binary"];
const DEPARTMENTS: [&str; 5] = ["Sales", "IT", "HR", "Finance", "Operations"];

/// Departments lean a little happier or unhappier.
fn department_shift(dept: &str) -> f64 {
    match dept {
        "Sales" => -0.3,
        "IT" => 0.2,
        "HR" => 0.3,
        "Finance" => -0.1,
        _ => 0.0,
    }
}

/// One Likert answer, occasionally blank or not a number.
fn answer(rng: &mut SimpleRng, latent: f64) -> String {
    let roll = rng.next_f64();
    if roll < 0.02 {
        return String::new();
    }
    if roll < 0.03 {
        return "n/a".to_string();
    }
    let v = rng.gauss(latent, 0.6).round().clamp(1.0, 5.0);
    format!("{v}")
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);
    let ages = Attribute::AgeGroup.canonical_order().unwrap_or_default();
    let tenures = Attribute::Tenure.canonical_order().unwrap_or_default();

    let output_path = "sample_survey.csv";
    let mut writer = csv::Writer::from_path(output_path).context("creating output file")?;

    let mut header: Vec<String> = vec![ID_COLUMN.to_string()];
    header.extend(Attribute::ALL.iter().map(|a| a.column().to_string()));
    header.extend((1..=ITEM_COUNT).map(item_column));
    writer.write_record(&header).context("writing header")?;

    for i in 0..RESPONDENTS {
        let gender = rng.pick(&GENDERS);
        let age = rng.pick(ages);
        let dept = rng.pick(&DEPARTMENTS);
        let tenure = rng.pick(tenures);

        let wellbeing = rng.gauss(3.4, 0.5) + department_shift(dept);

        let mut items = vec![String::new(); ITEM_COUNT];
        for dim in Dimension::ALL {
            let latent = wellbeing + rng.gauss(0.0, 0.4);
            for &n in dim.items() {
                items[n - 1] = answer(&mut rng, latent);
            }
        }

        let mut record = vec![
            format!("E{:03}", i + 1),
            gender.to_string(),
            age.to_string(),
            dept.to_string(),
            tenure.to_string(),
        ];
        record.extend(items);
        writer.write_record(&record).with_context(|| format!("writing row {i}"))?;
    }
    writer.flush().context("flushing output")?;

    println!("Wrote {RESPONDENTS} respondents to {output_path}");
    Ok(())
}
