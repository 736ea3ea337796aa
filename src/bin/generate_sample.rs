use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result, bail};

/// One species: centre m/z, peak width and height in counts.
#[derive(Clone, Copy)]
struct Peak {
    centre: f64,
    width: f64,
    height: f64,
}

impl Peak {
    const fn new(centre: f64, width: f64, height: f64) -> Self {
        Self { centre, width, height }
    }

    fn counts_at(&self, mz: f64) -> f64 {
        let z = (mz - self.centre) / self.width;
        self.height * (-0.5 * z * z).exp()
    }
}

/// Seeded SplitMix64 stream; identical seeds give identical files.
struct Noise(u64);

impl Noise {
    fn next(&mut self) -> u64 {
        self.0 = self.0.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.0;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }

    /// Uniform in [0, 1).
    fn unit(&mut self) -> f64 {
        (self.next() >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
    }

    /// Roughly normal with the given spread: sum of twelve uniforms, centred.
    fn jitter(&mut self, spread: f64) -> f64 {
        let sum: f64 = (0..12).map(|_| self.unit()).sum();
        (sum - 6.0) * spread
    }

    fn index(&mut self, len: usize) -> usize {
        (self.next() % len as u64) as usize
    }
}

fn synthesize(masses: &[f64], peaks: &[Peak], noise_level: f64, noise: &mut Noise) -> Vec<f64> {
    masses
        .iter()
        .map(|&mz| {
            let signal: f64 = peaks.iter().map(|p| p.counts_at(mz)).sum();
            (signal + noise.jitter(noise_level)).max(0.0)
        })
        .collect()
}

/// Detector-specific layout: which column holds the intensity the service reads.
#[derive(Clone, Copy)]
enum Detector {
    /// x in column 1, cps in column 3.
    Rtof,
    /// x in column 1, cps in column 2.
    Dfms,
}

impl Detector {
    fn parse(s: &str) -> Result<Self> {
        match s.to_ascii_uppercase().as_str() {
            "RTOF" => Ok(Detector::Rtof),
            "DFMS" => Ok(Detector::Dfms),
            other => bail!("unknown detector {other:?} (expected RTOF or DFMS)"),
        }
    }

    fn id(self) -> &'static str {
        match self {
            Detector::Rtof => "RTOF",
            Detector::Dfms => "DFMS",
        }
    }
}

/// PDS3-style label; the service scans for `DETECTOR_ID` and the `END` line.
fn write_label(out: &mut impl Write, detector: Detector, rows: usize) -> Result<()> {
    writeln!(out, "PDS_VERSION_ID       = PDS3")?;
    writeln!(out, "INSTRUMENT_ID        = ROSINA")?;
    writeln!(out, "DETECTOR_ID          = \"{}\"", detector.id())?;
    writeln!(out, "PRODUCT_ID           = \"SYNTHETIC_{}_0001\"", detector.id())?;
    writeln!(out, "DATA_QUALITY_ID      = 0")?;
    writeln!(out, "ROWS                 = {rows}")?;
    writeln!(out, "COLUMNS              = 4")?;
    writeln!(out, "END")?;
    Ok(())
}

fn main() -> Result<()> {
    let mut args = std::env::args().skip(1);
    let output_path = PathBuf::from(args.next().unwrap_or_else(|| "sample_data.tab".to_string()));
    let detector = Detector::parse(&args.next().unwrap_or_else(|| "RTOF".to_string()))?;

    let mut noise = Noise(42);

    // m/z axis: 12 → 100, step 0.05
    let masses: Vec<f64> = (0..1761).map(|i| 12.0 + i as f64 * 0.05).collect();

    // Water, CO, CO2 and a couple of minor species.
    let peaks = [
        Peak::new(18.01, 0.08, 4.0e4),
        Peak::new(17.00, 0.08, 1.1e4),
        Peak::new(28.00, 0.09, 9.0e3),
        Peak::new(32.00, 0.09, 2.5e3),
        Peak::new(44.00, 0.10, 6.0e3),
    ];
    let counts = synthesize(&masses, &peaks, 40.0, &mut noise);

    // A handful of spikes for the outlier filter to remove.
    let mut cps: Vec<f64> = counts.iter().map(|c| c / 1.2).collect();
    for _ in 0..10 {
        let idx = noise.index(cps.len());
        cps[idx] *= 50.0;
    }

    let file = File::create(&output_path)
        .with_context(|| format!("creating {}", output_path.display()))?;
    let mut out = BufWriter::new(file);
    write_label(&mut out, detector, masses.len())?;

    let mut writer = csv::WriterBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .from_writer(out);

    for (i, ((mz, raw), rate)) in masses.iter().zip(&counts).zip(&cps).enumerate() {
        let row = match detector {
            Detector::Rtof => [
                i.to_string(),
                format!("{mz:.4}"),
                format!("{raw:.3}"),
                format!("{rate:.5E}"),
            ],
            Detector::Dfms => [
                i.to_string(),
                format!("{mz:.4}"),
                format!("{rate:.5E}"),
                format!("{raw:.3}"),
            ],
        };
        writer
            .write_record(&row)
            .with_context(|| format!("writing row {i}"))?;
    }
    writer.flush().context("flushing output")?;

    println!(
        "Wrote {} {} rows to {}",
        masses.len(),
        detector.id(),
        output_path.display()
    );
    Ok(())
}
