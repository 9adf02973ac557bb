// src/bin/tdigest_cli.rs
use clap::{Parser, Subcommand, ValueEnum};
use std::error::Error;
use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use tree_tdigest::{cluster_with, merge_with, ClusterBound, DigestConfig, ScaleFamily, TDigest};

#[derive(Debug, Clone, ValueEnum)]
enum Scale {
    K0,
    K1,
}
impl From<Scale> for ScaleFamily {
    fn from(s: Scale) -> Self {
        match s {
            Scale::K0 => ScaleFamily::K0,
            Scale::K1 => ScaleFamily::K1,
        }
    }
}

#[derive(Debug, Clone, ValueEnum)]
enum Mode {
    /// One bulk merge pass over all input
    Merge,
    /// Stream points one at a time, then a final merge
    Cluster,
}

#[derive(Debug, Clone, ValueEnum)]
enum Bound {
    Simplified,
    Scale,
}
impl From<Bound> for ClusterBound {
    fn from(b: Bound) -> Self {
        match b {
            Bound::Simplified => ClusterBound::Simplified,
            Bound::Scale => ClusterBound::ScaleFunction,
        }
    }
}

#[derive(Parser)]
#[command(author, version, about)]
struct Args {
    /// Compression parameter δ
    #[arg(short = 'd', long, default_value_t = 100.0)]
    delta: f64,

    /// Scale family (k0|k1)
    #[arg(short = 's', long, value_enum, default_value_t = Scale::K1)]
    scale: Scale,

    /// How points enter the digest (merge|cluster)
    #[arg(short = 'm', long, value_enum, default_value_t = Mode::Merge)]
    mode: Mode,

    /// Streaming growth bound g; recompress after g·δ weight
    #[arg(short = 'g', long, default_value_t = 5.0)]
    growth_bound: f64,

    /// Absorption test used in cluster mode (simplified|scale)
    #[arg(long, value_enum, default_value_t = Bound::Simplified)]
    bound: Bound,

    /// Read numbers from this file instead of stdin
    #[arg(short = 'i', long)]
    input: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand)]
enum Cmd {
    /// Print the value at quantile q
    Quantile {
        /// q in [0,1]
        #[arg(short, long)]
        q: f64,
    },
    /// Print the median
    Median,
    /// Print one "mean<TAB>weight" line per centroid, ascending
    Centroids,
}

fn parse_numbers(s: &str) -> Result<Vec<f64>, Box<dyn Error>> {
    let mut out = Vec::new();
    for tok in s
        .split(|c: char| c.is_whitespace() || c == ',' || c == ';')
        .filter(|t| !t.is_empty())
    {
        out.push(tok.parse::<f64>()?);
    }
    Ok(out)
}

fn read_input(path: Option<&PathBuf>) -> Result<Vec<f64>, Box<dyn Error>> {
    let s = match path {
        Some(p) => fs::read_to_string(p)?,
        None => {
            let mut s = String::new();
            io::stdin().read_to_string(&mut s)?;
            s
        }
    };
    parse_numbers(&s)
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    if let Cmd::Quantile { q } = args.cmd {
        if !(0.0..=1.0).contains(&q) {
            eprintln!("q must be in [0,1]");
            std::process::exit(2);
        }
    }

    let config = DigestConfig::builder()
        .delta(args.delta)
        .growth_bound(args.growth_bound)
        .scale(args.scale.into())
        .cluster_bound(args.bound.into())
        .build()?;

    let xs = read_input(args.input.as_ref())?;
    let digest: TDigest = match args.mode {
        Mode::Merge => merge_with(&xs, None, &config)?,
        Mode::Cluster => cluster_with(&xs, None, &config)?,
    };

    match args.cmd {
        Cmd::Quantile { q } => println!("{}", digest.estimate_quantile(q)?),
        Cmd::Median => println!("{}", digest.median()?),
        Cmd::Centroids => {
            for c in digest.iter() {
                println!("{}\t{}", c.mean(), c.weight());
            }
        }
    }
    Ok(())
}
