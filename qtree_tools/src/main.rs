mod utils;

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use image::ImageReader;
use qtree::{Container, QuadPicture};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;
use utils::{exists_decision, to_gray_image, to_quadtree_image, Assume};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Subcommands,

    /// Overwrite output files
    #[arg(short = 'n', long = "overwrite", conflicts_with = "assumeno")]
    assumeyes: bool,

    /// Do not overwrite output files
    #[arg(short = 'y', long = "preserve", conflicts_with = "assumeyes")]
    assumeno: bool,

    /// Log progress to stderr. `RUST_LOG` takes precedence when set.
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Subcommand)]
enum Subcommands {
    /// Compress a raw image file
    Compress(ConvertArgs),

    /// Uncompress a compressed image into a raw image file
    Uncompress(ConvertArgs),

    /// Convert an image of any type supported by `image` to grayscale and
    /// store it as a raw or compressed file
    Import(ConvertArgs),

    /// Save a raw or compressed file as an image of any type supported by
    /// `image`
    Export(ConvertArgs),

    /// Print the preorder listing of a compressed image's tree
    Dump(DumpArgs),
}

#[derive(Debug, Args)]
struct ConvertArgs {
    /// Input file
    input: PathBuf,

    /// Output file
    ///
    /// Files ending in `.raw` or `.txt` hold one pixel per line, files ending
    /// in `.qtb` use the binary container, and anything else holds the
    /// compressed text form.
    #[arg(verbatim_doc_comment)]
    output: PathBuf,
}

#[derive(Debug, Args)]
struct DumpArgs {
    /// Compressed input file
    input: PathBuf,
}

fn main() -> Result<()> {
    let args = Cli::parse();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if args.verbose { "debug" } else { "warn" }));
    tracing_subscriber::fmt()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();

    let assume = if args.assumeyes {
        Some(Assume::Yes)
    } else if args.assumeno {
        Some(Assume::No)
    } else {
        None
    };

    match args.command {
        Subcommands::Compress(a) => compress(a, assume),
        Subcommands::Uncompress(a) => uncompress(a, assume),
        Subcommands::Import(a) => import(a, assume),
        Subcommands::Export(a) => export(a, assume),
        Subcommands::Dump(a) => dump(a),
    }
}

/// Check the input exists and decide whether the output may be written.
fn check_paths(args: &ConvertArgs, assume: Option<Assume>) -> Result<bool> {
    if !args.input.try_exists()? {
        bail!("Input file {:?} does not exist", args.input);
    }

    if args.output.try_exists()?
        && !exists_decision("Output", "Overwrite", &args.output, assume)
    {
        return Ok(false)
    }

    Ok(true)
}

fn compress(args: ConvertArgs, assume: Option<Assume>) -> Result<()> {
    if !check_paths(&args, assume)? {
        return Ok(())
    }

    if Container::from_path(&args.output) == Container::Raw {
        bail!("Output file {:?} would be a raw image, use a compressed extension such as `.rit`", args.output);
    }

    let started = Instant::now();
    let input = BufReader::new(File::open(&args.input)?);
    let picture = QuadPicture::read_raw(input)
        .with_context(|| format!("Could not read raw image {:?}", args.input))?;
    debug!(elapsed = ?started.elapsed(), side_length = picture.side_length(), "compressed");

    picture.save(&args.output)?;
    info!(output = ?args.output, container = ?Container::from_path(&args.output), "saved");

    report(&picture);

    Ok(())
}

fn uncompress(args: ConvertArgs, assume: Option<Assume>) -> Result<()> {
    if !check_paths(&args, assume)? {
        return Ok(())
    }

    if Container::from_path(&args.input) == Container::Raw {
        bail!("Input file {:?} is a raw image, not a compressed one", args.input);
    }

    let started = Instant::now();
    let picture = qtree::open(&args.input)
        .with_context(|| format!("Could not uncompress {:?}", args.input))?;
    debug!(elapsed = ?started.elapsed(), side_length = picture.side_length(), "uncompressed");

    picture.write_raw(BufWriter::new(File::create(&args.output)?))?;
    info!(output = ?args.output, "saved");

    report(&picture);

    Ok(())
}

fn import(args: ConvertArgs, assume: Option<Assume>) -> Result<()> {
    if !check_paths(&args, assume)? {
        return Ok(())
    }

    let decoded = ImageReader::open(&args.input)?
        .with_guessed_format()?
        .decode()?;
    debug!(width = decoded.width(), height = decoded.height(), color = ?decoded.color(), "decoded input");

    let picture = QuadPicture::from_image(to_quadtree_image(decoded)?);
    picture.save(&args.output)?;
    info!(output = ?args.output, container = ?Container::from_path(&args.output), "saved");

    report(&picture);

    Ok(())
}

fn export(args: ConvertArgs, assume: Option<Assume>) -> Result<()> {
    if !check_paths(&args, assume)? {
        return Ok(())
    }

    let picture = qtree::open(&args.input)
        .with_context(|| format!("Could not read {:?}", args.input))?;
    let Some(image) = picture.image() else {
        bail!("{:?} holds no image", args.input);
    };

    to_gray_image(image)?.save(&args.output)?;
    info!(output = ?args.output, side_length = image.side_length(), "exported");

    Ok(())
}

fn dump(args: DumpArgs) -> Result<()> {
    let picture = qtree::open(&args.input)
        .with_context(|| format!("Could not read {:?}", args.input))?;

    match picture.tree() {
        Some(tree) => println!("QTree: {tree}"),
        None => bail!("{:?} holds no tree", args.input),
    }

    Ok(())
}

fn report(picture: &QuadPicture) {
    println!("Raw image size: {}", picture.raw_size());
    println!("Compressed image size: {}", picture.compressed_size());
    if let Some(ratio) = picture.compression_ratio() {
        println!("Compression %: {ratio:.2}");
    }
}
