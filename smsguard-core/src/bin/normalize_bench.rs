//! Normalization Benchmarking Tool
//!
//! Measures throughput of the message preprocessing pipeline over a text
//! file with one message per line, such as an exported SMS corpus.
//!
//! ## What It Benchmarks
//!
//! 1. **Tokenize**: Treebank-style splitting of the lowercased messages
//! 2. **Stem**: Porter stemming of every token the tokenizer produced
//! 3. **Normalize**: The full pipeline, one message at a time
//!
//! ## Usage
//!
//! ```bash
//! ./target/release/normalize_bench /path/to/messages.txt
//! ./target/release/normalize_bench /path/to/messages.txt --mode normalize
//! ```
//!
//! ## Example Output
//!
//! ```text
//! === Normalize ===
//! --------------------------------
//! Mode        : Normalize
//! Elapsed     : 0.041 s
//! Throughput  : 11.72 MiB/s
//! Messages    : 5_574
//! Tokens      : 51_032
//! Tokens/sec  : 1_244_682
//! --------------------------------
//! ```

use std::fs;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};

use smsguard_core::analyzer::{PorterStemmer, TextNormalizer, Tokenizer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Mode {
    Tokenize,
    Stem,
    Normalize,
    All,
}

/// Measure message normalization throughput.
#[derive(Debug, Parser)]
#[command(version)]
struct Args {
    /// Text file with one message per line.
    path: PathBuf,

    /// Which stage to measure.
    #[arg(long, value_enum, default_value = "all")]
    mode: Mode,

    /// Untimed passes before measuring.
    #[arg(long, default_value_t = 1)]
    warmup: usize,

    /// Timed passes; the mean is reported.
    #[arg(long, default_value_t = 5)]
    runs: u32,
}

fn main() -> Result<()> {
    let args = Args::parse();

    println!("Loading file...");
    let input = fs::read_to_string(&args.path)
        .with_context(|| format!("failed to read {}", args.path.display()))?;
    let messages: Vec<String> = input.lines().map(str::to_lowercase).collect();

    println!("File size: {}", fmt_bytes(input.len() as u64));
    println!("Messages:  {}\n", fmt_count(messages.len() as u64));

    let bench = Bench {
        warmup: args.warmup,
        runs: args.runs.max(1),
        bytes: input.len(),
        messages: messages.len() as u64,
    };

    if matches!(args.mode, Mode::Tokenize | Mode::All) {
        bench_tokenize(&bench, &messages);
    }
    if matches!(args.mode, Mode::Stem | Mode::All) {
        bench_stem(&bench, &messages);
    }
    if matches!(args.mode, Mode::Normalize | Mode::All) {
        bench_normalize(&bench, input.lines());
    }

    Ok(())
}

struct Bench {
    warmup: usize,
    runs: u32,
    bytes: usize,
    messages: u64,
}

impl Bench {
    fn run<F: FnMut() -> u64>(&self, label: &str, mut f: F) {
        println!("=== {label} ===");

        for _ in 0..self.warmup {
            std::hint::black_box(f());
        }

        let mut total = Duration::ZERO;
        let mut tokens = 0u64;
        for _ in 0..self.runs {
            let start = Instant::now();
            tokens = std::hint::black_box(f());
            total += start.elapsed();
        }

        self.print_perf(label, total / self.runs, tokens);
    }

    fn print_perf(&self, label: &str, elapsed: Duration, tokens: u64) {
        let secs = elapsed.as_secs_f64().max(f64::EPSILON);
        let mib = self.bytes as f64 / (1024.0 * 1024.0);

        println!("--------------------------------");
        println!("Mode        : {}", label);
        println!("Elapsed     : {:.3} s", secs);
        println!("Throughput  : {:.2} MiB/s", mib / secs);
        println!("Messages    : {}", fmt_count(self.messages));

        if tokens > 0 {
            println!("Tokens      : {}", fmt_count(tokens));
            println!("Tokens/sec  : {}", fmt_count((tokens as f64 / secs) as u64));
        }

        println!("--------------------------------\n");
    }
}

fn bench_tokenize(bench: &Bench, messages: &[String]) {
    let tokenizer = Tokenizer::default();

    bench.run("Tokenize", || {
        let mut count = 0u64;
        for message in messages {
            tokenizer.tokenize(message, |_t| count += 1);
        }
        count
    });
}

fn bench_stem(bench: &Bench, messages: &[String]) {
    let tokenizer = Tokenizer::default();
    let stemmer = PorterStemmer::new();
    let tokens: Vec<&str> = messages
        .iter()
        .flat_map(|m| tokenizer.tokens(m))
        .collect();
    let mut out = String::with_capacity(64);

    bench.run("Stem", || {
        for token in &tokens {
            out.clear();
            stemmer.stem_into(token, &mut out);
            std::hint::black_box(&out);
        }
        tokens.len() as u64
    });
}

fn bench_normalize<'a>(bench: &Bench, lines: impl Iterator<Item = &'a str> + Clone) {
    let normalizer = TextNormalizer::default();
    let mut out = String::with_capacity(256);

    bench.run("Normalize", || {
        let mut count = 0u64;
        for line in lines.clone() {
            normalizer.normalize_into(line, &mut out);
            if !out.is_empty() {
                count += out.split(' ').count() as u64;
            }
        }
        count
    });
}

fn fmt_bytes(b: u64) -> String {
    if b >= 1024 * 1024 * 1024 {
        format!("{:.2} GiB", b as f64 / (1024.0 * 1024.0 * 1024.0))
    } else if b >= 1024 * 1024 {
        format!("{:.2} MiB", b as f64 / (1024.0 * 1024.0))
    } else if b >= 1024 {
        format!("{:.2} KiB", b as f64 / 1024.0)
    } else {
        format!("{} B", b)
    }
}

fn fmt_count(n: u64) -> String {
    let s = n.to_string();
    let mut out = String::with_capacity(s.len() + s.len() / 3);

    for (i, ch) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            out.push('_');
        }
        out.push(ch);
    }

    out.chars().rev().collect()
}
