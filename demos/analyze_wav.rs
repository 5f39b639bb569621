//! Example: Estimate the tempo of a WAV file with every algorithm
//!
//! Usage: cargo run --example analyze_wav -- <file.wav> [min_bpm max_bpm]

use std::time::Instant;
use tempo_dsp::{BpmDetector, DetectorConfig, SampleBuffer, TempoRange};

/// Load a WAV file as interleaved f32 samples
fn load_wav(path: &str) -> Result<(Vec<f32>, usize, u32), Box<dyn std::error::Error>> {
    let mut reader = hound::WavReader::open(path)?;
    let spec = reader.spec();

    let samples: Vec<f32> = match spec.sample_format {
        hound::SampleFormat::Float => reader.samples::<f32>().collect::<Result<Vec<_>, _>>()?,
        hound::SampleFormat::Int => {
            let max_value = (1i64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .samples::<i32>()
                .map(|s| s.map(|s| s as f32 / max_value))
                .collect::<Result<Vec<_>, _>>()?
        }
    };

    Ok((samples, spec.channels as usize, spec.sample_rate))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some(path) = args.first() else {
        eprintln!("Usage: analyze_wav <file.wav> [min_bpm max_bpm]");
        std::process::exit(2);
    };

    let range = match (args.get(1), args.get(2)) {
        (Some(min), Some(max)) => TempoRange::new(min.parse()?, max.parse()?)?,
        _ => TempoRange::default(),
    };

    let (samples, channels, sample_rate) = load_wav(path)?;
    let buffer = SampleBuffer::interleaved(&samples, channels)?;
    println!(
        "{}: {:.2} s, {} channel(s), {} Hz",
        path,
        buffer.frames() as f32 / sample_rate as f32,
        channels,
        sample_rate
    );

    let detector = BpmDetector::new(DetectorConfig::with_range(range));
    let t0 = Instant::now();
    let results = detector.detect_buffer(buffer, sample_rate)?;
    let elapsed_ms = t0.elapsed().as_secs_f32() * 1000.0;

    println!("Results ({:.0}-{:.0} BPM):", range.min_bpm(), range.max_bpm());
    for (algorithm, result) in results.iter() {
        if result.is_detected() {
            println!(
                "  {:<16} {:>7.2} BPM  confidence {:.2} ({})",
                algorithm.name(),
                result.bpm,
                result.confidence,
                result.level()
            );
        } else {
            println!("  {:<16}      -- no detection", algorithm.name());
        }
    }

    match results.best() {
        Some((algorithm, best)) => println!(
            "Best: {:.0} BPM ({:.2} raw, {})",
            best.rounded_bpm(),
            best.bpm,
            algorithm
        ),
        None => println!("Best: no tempo found"),
    }
    println!("Processing time: {:.2} ms", elapsed_ms);

    Ok(())
}
