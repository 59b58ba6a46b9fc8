use std::path::PathBuf;
use std::process;
use std::time::Instant;

use stub_gen::error::StubError;
use stub_gen::pipeline::{DEFAULT_VERSION, Generator, GeneratorConfig};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();

    let (snapshot, config) = match parse_args(&args) {
        Ok(v) => v,
        Err(msg) => {
            if !msg.is_empty() {
                eprintln!("error: {msg}");
                eprintln!();
            }
            eprintln!("Usage: pyfbsdk-stubgen <snapshot.json> [options]");
            eprintln!();
            eprintln!("Arguments:");
            eprintln!("  <snapshot.json>    Reflected-module snapshot to generate stubs from");
            eprintln!();
            eprintln!("Options:");
            eprintln!("  --version <year>   Target product release [default: {DEFAULT_VERSION}]");
            eprintln!("  --out <dir>        Output directory [default: .]");
            eprintln!("  --cache <dir>      Documentation page cache directory");
            eprintln!("  --additions <dir>  Extra stub files to copy alongside the output");
            eprintln!("  --offline          Skip the online documentation entirely");
            process::exit(2);
        }
    };

    if let Err(e) = run(&snapshot, config) {
        eprintln!("error: {e}");
        process::exit(1);
    }
}

fn parse_args(args: &[String]) -> Result<(PathBuf, GeneratorConfig), String> {
    let mut snapshot: Option<PathBuf> = None;
    let mut config = GeneratorConfig::default();

    let mut i = 1; // skip argv[0]
    while i < args.len() {
        match args[i].as_str() {
            "--version" => {
                i += 1;
                let value = args.get(i).ok_or("--version requires a value")?;
                config.version = value
                    .parse()
                    .map_err(|_| format!("invalid version '{value}', expected a year"))?;
            }
            "--out" => {
                i += 1;
                config.out_dir = PathBuf::from(args.get(i).ok_or("--out requires a value")?);
            }
            "--cache" => {
                i += 1;
                config.cache_dir =
                    Some(PathBuf::from(args.get(i).ok_or("--cache requires a value")?));
            }
            "--additions" => {
                i += 1;
                config.additions_dir = Some(PathBuf::from(
                    args.get(i).ok_or("--additions requires a value")?,
                ));
            }
            "--offline" => config.offline = true,
            "--help" | "-h" => return Err(String::new()),
            arg if arg.starts_with('-') => return Err(format!("unknown flag: {arg}")),
            arg => {
                if snapshot.is_some() {
                    return Err(format!("unexpected argument: {arg}"));
                }
                snapshot = Some(PathBuf::from(arg));
            }
        }
        i += 1;
    }

    let snapshot = snapshot.ok_or("missing required argument: <snapshot.json>")?;
    Ok((snapshot, config))
}

fn run(snapshot: &std::path::Path, config: GeneratorConfig) -> Result<(), StubError> {
    let started = Instant::now();

    let json = std::fs::read_to_string(snapshot).map_err(|e| StubError::Output {
        path: snapshot.to_path_buf(),
        source: e,
    })?;

    let generator = Generator::new(config);
    let out_path = generator.run(&json)?;

    println!(
        "wrote {} in {:.2}s",
        out_path.display(),
        started.elapsed().as_secs_f64()
    );
    Ok(())
}
