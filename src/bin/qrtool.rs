use clap::{Parser, Subcommand};
use qr_reader::tools::{dataset_iter, dataset_root_from_env, decode_file};
use qr_reader::{BinarizerKind, DecodeHints};
use std::path::PathBuf;
use std::time::Instant;

#[derive(Parser)]
#[command(name = "qrtool", version, about = "QR code reader CLI")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Args, Clone)]
struct HintArgs {
    /// Scan every row for finder patterns
    #[arg(long)]
    try_harder: bool,
    /// Treat the image as a clean, unrotated symbol
    #[arg(long)]
    pure: bool,
    /// Charset for byte segments without an ECI
    #[arg(long)]
    charset: Option<String>,
    /// `global` or `hybrid`
    #[arg(long)]
    binarizer: Option<BinarizerKind>,
}

impl HintArgs {
    fn hints(&self) -> DecodeHints {
        let mut hints = DecodeHints::from_env();
        hints.try_harder |= self.try_harder;
        hints.pure_barcode |= self.pure;
        if let Some(charset) = &self.charset {
            hints = hints.with_character_set(charset.clone());
        }
        if let Some(binarizer) = self.binarizer {
            hints = hints.with_binarizer(binarizer);
        }
        hints
    }
}

#[derive(Subcommand)]
enum Command {
    /// Decode the QR code in a single image
    Decode {
        #[arg(long)]
        image: PathBuf,
        #[command(flatten)]
        hints: HintArgs,
    },
    /// Decode every image under a directory and report the reading rate
    ReadingRate {
        #[arg(long)]
        root: Option<PathBuf>,
        #[arg(long)]
        limit: Option<usize>,
        #[command(flatten)]
        hints: HintArgs,
    },
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Command::Decode { image, hints } => decode_cmd(&image, &hints.hints()),
        Command::ReadingRate { root, limit, hints } => reading_rate_cmd(root, limit, &hints.hints()),
    }
}

fn decode_cmd(image: &std::path::Path, hints: &DecodeHints) {
    let start = Instant::now();
    match decode_file(image, hints) {
        Ok(qr) => {
            println!("Image: {}", image.display());
            println!(
                "  version={}, error_correction={}, mask={}, mirrored={}, corrected={}",
                qr.version, qr.error_correction, qr.mask, qr.mirrored, qr.errors_corrected
            );
            println!("  symbology={}", qr.symbology_identifier);
            if let Some(sa) = qr.structured_append {
                println!(
                    "  structured append: symbol {} of {}, parity {:#04x}",
                    (sa.sequence >> 4) + 1,
                    (sa.sequence & 0x0F) + 1,
                    sa.parity
                );
            }
            for (i, p) in qr.points.iter().enumerate() {
                println!("  point {}: ({:.1}, {:.1})", i, p.x, p.y);
            }
            println!("  content={}", qr.content);
            println!("  time={:.2}ms", start.elapsed().as_secs_f64() * 1000.0);
        }
        Err(err) => {
            eprintln!("{}: {}", image.display(), err);
            std::process::exit(1);
        }
    }
}

fn reading_rate_cmd(root: Option<PathBuf>, limit: Option<usize>, hints: &DecodeHints) {
    let root = root.unwrap_or_else(dataset_root_from_env);
    if !root.exists() {
        eprintln!("Dataset root not found: {}", root.display());
        return;
    }

    let images: Vec<PathBuf> = dataset_iter(&root, limit).collect();
    if images.is_empty() {
        println!("No images found under {}", root.display());
        return;
    }

    let start = Instant::now();
    let mut decoded = 0usize;
    for path in &images {
        match decode_file(path, hints) {
            Ok(qr) => {
                decoded += 1;
                println!("  ok   {} -> {:?}", path.display(), qr.content);
            }
            Err(err) => println!("  FAIL {} ({})", path.display(), err),
        }
    }
    let elapsed = start.elapsed().as_secs_f64();
    println!(
        "Decoded {}/{} ({:.1}%) in {:.2}s ({:.1}ms/image)",
        decoded,
        images.len(),
        100.0 * decoded as f64 / images.len() as f64,
        elapsed,
        1000.0 * elapsed / images.len() as f64
    );
}
