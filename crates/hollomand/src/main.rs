//! holloman daemon: fingerprint buffers locally, serve the REST surface, or
//! drive a running server.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::Parser;
use memmap2::Mmap;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use curve::HilbertCurve;
use holloman::{ssdeep_digest, BufferRequest, DigestToggles, RuleClassifier, Service};

#[derive(Parser, Debug)]
#[command(name = "hollomand", about = "content-addressed buffer fingerprinting service")]
struct Args {
    /// Pre-generated hilbert curve, optionally gzip compressed.
    #[arg(long, default_value = "hilbert_curve.dat.gz")]
    curve: PathBuf,

    /// Address to listen on (server) or connect to (client).
    #[arg(long, default_value = "127.0.0.1:50051")]
    listen: String,

    /// File to generate an identifier for.
    #[arg(short = 'f', long)]
    file: Option<PathBuf>,

    /// Run as a server.
    #[arg(short = 'S', long)]
    server: bool,

    /// Run as a client against a running server.
    #[arg(short = 'C', long)]
    client: bool,

    /// Cluster DNA buffers only: fixed content-type label, short identifiers.
    #[arg(long)]
    dna: bool,

    /// Enable ssdeep digests in responses.
    #[arg(long)]
    ssdeep: bool,

    /// Write the projected image of the input as a PGM file (standalone).
    #[arg(long)]
    dump_image: Option<PathBuf>,

    /// Print the content-type label in standalone mode.
    #[arg(short = 'v', long)]
    verbose: bool,

    /// Set the log level to debug.
    #[arg(long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.debug);

    if args.server && args.client {
        bail!("pick one of --server and --client");
    }
    if args.client {
        return client(&args).await;
    }

    let curve = Arc::new(
        HilbertCurve::load(&args.curve)
            .with_context(|| format!("curve file {} is invalid", args.curve.display()))?,
    );
    debug!(order = curve.order(), "loaded hilbert curve");

    let service = build_service(curve, &args);
    if args.server {
        serve(service, &args.listen).await
    } else {
        standalone(&service, &args)
    }
}

fn init_tracing(debug: bool) {
    let default = if debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .init();
}

fn build_service(curve: Arc<HilbertCurve>, args: &Args) -> Arc<Service> {
    let toggles = DigestToggles { ssdeep: args.ssdeep, ..Default::default() };
    let mut service = Service::new(curve, Arc::new(RuleClassifier), args.dna, toggles);
    if args.ssdeep {
        service = service.with_digest(ssdeep_digest());
    }
    Arc::new(service)
}

async fn serve(service: Arc<Service>, addr: &str) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    info!(%addr, dna = service.dna(), "serving");
    axum::serve(listener, gateway::router(service))
        .await
        .context("serving requests")?;
    Ok(())
}

fn standalone(service: &Service, args: &Args) -> Result<()> {
    if args.dna {
        bail!("DNA clustering needs a server; standalone mode is file-oriented");
    }
    let path = args
        .file
        .as_deref()
        .context("standalone mode needs -f <file>")?;
    let buffer = map_file(path)?;

    if let Some(dump) = &args.dump_image {
        let image = raster::project(service.curve(), &buffer)?;
        raster::write_pgm(dump, &image)?;
        debug!(path = %dump.display(), stride = image.stride, "wrote projection dump");
    }

    let request = BufferRequest { buffer: buffer.to_vec(), label: None };
    let response = service.cluster_buffer(&request)?;
    if args.verbose {
        println!("magic: {}", response.magic);
    }
    println!("{} {}", path.display(), response.id);
    Ok(())
}

async fn client(args: &Args) -> Result<()> {
    let path = args.file.as_deref().context("client mode needs -f <file>")?;
    let buffer = map_file(path)?;

    let base = format!("http://{}", args.listen);
    let http = reqwest::Client::new();

    let caps: serde_json::Value = http
        .get(format!("{base}/holloman/v2/capabilities"))
        .send()
        .await?
        .error_for_status()?
        .json()
        .await
        .context("reading capabilities")?;
    info!(%caps, "capabilities");

    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("buffer")
        .to_string();
    let part = reqwest::multipart::Part::bytes(buffer.to_vec()).file_name(file_name);
    let form = reqwest::multipart::Form::new().part("holloman-data", part);
    let response = http
        .post(format!("{base}/holloman/v2/hh128"))
        .multipart(form)
        .send()
        .await?
        .error_for_status()?
        .text()
        .await
        .context("reading fingerprint response")?;
    println!("{response}");
    Ok(())
}

fn map_file(path: &Path) -> Result<Mmap> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("opening {}", path.display()))?;
    // Safety: mapped read-only and dropped before the process touches the
    // file again.
    let map = unsafe { Mmap::map(&file) }
        .with_context(|| format!("mapping {}", path.display()))?;
    Ok(map)
}
