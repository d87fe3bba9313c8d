use std::io::{BufRead, Write as _};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};
use lexiscatter::data::{FileFetcher, ResourceFetcher};
use lexiscatter::mobile_check;
use lexiscatter::perf::PerfMonitor;
use lexiscatter::{ExplorerPipeline, ExplorerSettings, PipelineState, StaticPage, ViewportSignal};
use notify::Watcher as _;
use parking_lot::Mutex;
use tiny_http::{Header, Response, Server, StatusCode};
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

const PAGE_TITLE: &str = "Interactive Dataset Explorer";

/// Real-clock upper bound on how long the watch loop sleeps with no timers
const IDLE_WAIT: Duration = Duration::from_secs(1);

#[derive(Parser, Debug)]
#[command(name = "lexiscatter", version)]
struct Cli {
    /// Settings JSON (defaults to the user config file, then built-in defaults).
    #[arg(long, global = true)]
    settings: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load the dataset once and write the rendered page, drawing or chart config.
    Render(RenderArgs),
    /// Re-render on dataset changes and on viewport commands read from stdin.
    Watch(WatchArgs),
    /// Serve the rendered page, the chart config and static files over HTTP.
    Serve(ServeArgs),
    /// Check an HTML page for mobile responsiveness markers.
    CheckMobile(CheckMobileArgs),
}

#[derive(Parser, Debug, Clone, Copy)]
struct ViewportArgs {
    /// Chart container width in CSS pixels.
    #[arg(long, default_value_t = 1024.0)]
    width: f32,

    /// Chart container height in CSS pixels.
    #[arg(long, default_value_t = 600.0)]
    height: f32,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    /// Standalone HTML page
    Html,
    /// Chart drawing only
    Svg,
    /// Chart.js configuration
    Json,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Directory the resource path is resolved against.
    #[arg(long, default_value = ".")]
    root: PathBuf,

    #[command(flatten)]
    viewport: ViewportArgs,

    /// Output path.
    #[arg(long)]
    out: PathBuf,

    #[arg(long, value_enum, default_value_t = OutputFormat::Html)]
    format: OutputFormat,
}

#[derive(Parser, Debug)]
struct WatchArgs {
    /// Directory the resource path is resolved against.
    #[arg(long, default_value = ".")]
    root: PathBuf,

    #[command(flatten)]
    viewport: ViewportArgs,

    /// Output path, rewritten after every render.
    #[arg(long)]
    out: PathBuf,

    #[arg(long, value_enum, default_value_t = OutputFormat::Html)]
    format: OutputFormat,
}

#[derive(Parser, Debug)]
struct ServeArgs {
    /// Directory served as the site root.
    #[arg(long, default_value = ".")]
    root: PathBuf,

    /// Listen address.
    #[arg(long, default_value = "127.0.0.1:8080")]
    addr: String,

    /// Request worker threads.
    #[arg(long, default_value_t = 4)]
    workers: usize,

    #[command(flatten)]
    viewport: ViewportArgs,
}

#[derive(Parser, Debug)]
struct CheckMobileArgs {
    /// HTML page to check.
    path: PathBuf,
}

fn main() -> anyhow::Result<ExitCode> {
    init_tracing();
    let cli = Cli::parse();
    let settings_path = cli.settings;
    let settings = || ExplorerSettings::load(settings_path.as_deref()).context("load settings");
    match cli.cmd {
        Command::Render(args) => cmd_render(settings()?, args),
        Command::Watch(args) => cmd_watch(settings()?, args),
        Command::Serve(args) => cmd_serve(settings()?, args),
        Command::CheckMobile(args) => cmd_check_mobile(args),
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

type FilePipeline = ExplorerPipeline<FileFetcher, StaticPage>;

fn build_pipeline(settings: ExplorerSettings, root: &Path, viewport: ViewportArgs) -> FilePipeline {
    let page = StaticPage::new(
        &settings.container_id,
        &settings.canvas_id,
        viewport.width,
        viewport.height,
    );
    ExplorerPipeline::new(settings, FileFetcher::new(root), page)
}

fn cmd_render(settings: ExplorerSettings, args: RenderArgs) -> anyhow::Result<ExitCode> {
    let mut pipeline = build_pipeline(settings, &args.root, args.viewport);
    if let Ok(report) = pipeline.load() {
        info!(rows = report.dataset.len(), rejected = report.rejected, "Dataset loaded");
    }
    pipeline.run_until_idle();

    write_output(&pipeline, args.format, &args.out)?;
    pipeline.perf().log_summary();
    eprintln!("wrote {}", args.out.display());

    Ok(if pipeline.state() == PipelineState::Ready {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn output_contents(pipeline: &FilePipeline, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Html => Ok(pipeline.page().to_html(PAGE_TITLE)),
        OutputFormat::Svg => pipeline
            .chart()
            .map(|chart| chart.to_svg())
            .ok_or_else(|| no_chart(pipeline)),
        OutputFormat::Json => {
            let chart = pipeline.chart().ok_or_else(|| no_chart(pipeline))?;
            chart.spec().to_json().context("serialize chart config")
        }
    }
}

fn no_chart(pipeline: &FilePipeline) -> anyhow::Error {
    match pipeline.last_error() {
        Some(err) => anyhow::anyhow!("no chart rendered: {err}"),
        None => anyhow::anyhow!("no chart rendered"),
    }
}

fn write_output(pipeline: &FilePipeline, format: OutputFormat, out: &Path) -> anyhow::Result<()> {
    let contents = output_contents(pipeline, format)?;
    write_atomic(out, &contents)
}

/// Write through a temp file in the target directory, then rename over `path`.
fn write_atomic(path: &Path, contents: &str) -> anyhow::Result<()> {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(dir).with_context(|| format!("create output dir '{}'", dir.display()))?;

    let mut tmp = tempfile::NamedTempFile::new_in(dir)
        .with_context(|| format!("create temp file in '{}'", dir.display()))?;
    tmp.write_all(contents.as_bytes())
        .with_context(|| format!("write '{}'", path.display()))?;
    tmp.persist(path)
        .map_err(|e| e.error)
        .with_context(|| format!("replace '{}'", path.display()))?;
    Ok(())
}

// ============================================================================
// watch
// ============================================================================

#[derive(Debug)]
enum WatchEvent {
    DatasetChanged,
    Viewport {
        signal: ViewportSignal,
        width: f32,
        height: f32,
    },
}

/// Parse `resize W H` or `orientation W H`.
fn parse_viewport_command(line: &str) -> Option<WatchEvent> {
    let mut parts = line.split_whitespace();
    let signal = match parts.next()? {
        "resize" => ViewportSignal::Resize,
        "orientation" => ViewportSignal::OrientationChange,
        _ => return None,
    };
    let width = parts.next()?.parse().ok()?;
    let height = parts.next()?.parse().ok()?;
    Some(WatchEvent::Viewport {
        signal,
        width,
        height,
    })
}

fn cmd_watch(settings: ExplorerSettings, args: WatchArgs) -> anyhow::Result<ExitCode> {
    let resource = args.root.join(&settings.resource_path);
    let watch_dir = resource
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| args.root.clone());
    let file_name = resource.file_name().map(|n| n.to_os_string());

    let (tx, rx) = mpsc::channel::<WatchEvent>();

    let fs_tx = tx.clone();
    let mut watcher = notify::recommended_watcher(move |res: notify::Result<notify::Event>| match res {
        Ok(event) => {
            let touches_resource = event
                .paths
                .iter()
                .any(|p| p.file_name().map(|n| n.to_os_string()) == file_name);
            if touches_resource && (event.kind.is_modify() || event.kind.is_create()) {
                let _ = fs_tx.send(WatchEvent::DatasetChanged);
            }
        }
        Err(e) => warn!(error = %e, "Watch error"),
    })
    .context("create file watcher")?;
    watcher
        .watch(&watch_dir, notify::RecursiveMode::NonRecursive)
        .with_context(|| format!("watch '{}'", watch_dir.display()))?;

    thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            match parse_viewport_command(line) {
                Some(event) => {
                    if tx.send(event).is_err() {
                        break;
                    }
                }
                None => warn!(command = line, "Expected `resize W H` or `orientation W H`"),
            }
        }
    });

    let mut pipeline = build_pipeline(settings, &args.root, args.viewport);
    let started = Instant::now();
    let _ = pipeline.load();
    let mut written = None;

    loop {
        pipeline.advance_to(started.elapsed());
        let rendered = (pipeline.render_count(), pipeline.state());
        if written != Some(rendered) && pipeline.state() != PipelineState::Settling {
            match write_output(&pipeline, args.format, &args.out) {
                Ok(()) => info!(out = %args.out.display(), "Output updated"),
                Err(e) => warn!(error = %e, "Output not written"),
            }
            written = Some(rendered);
        }

        let wait = pipeline
            .next_deadline()
            .map(|deadline| deadline.saturating_sub(started.elapsed()))
            .unwrap_or(IDLE_WAIT);

        match rx.recv_timeout(wait) {
            Ok(event) => {
                pipeline.advance_to(started.elapsed());
                match event {
                    WatchEvent::DatasetChanged => {
                        info!("Dataset changed, reloading");
                        let _ = pipeline.reload();
                    }
                    WatchEvent::Viewport {
                        signal,
                        width,
                        height,
                    } => {
                        debug!(?signal, width, height, "Viewport change");
                        pipeline.page_mut().resize_container(width, height);
                        let _ = pipeline.signal(signal);
                    }
                }
            }
            Err(mpsc::RecvTimeoutError::Timeout) => {}
            Err(mpsc::RecvTimeoutError::Disconnected) => break,
        }
    }

    pipeline.dispose();
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// serve
// ============================================================================

/// Helper to create HTTP headers, returning None if the bytes are invalid
fn create_header(name: &[u8], value: &[u8]) -> Option<Header> {
    Header::from_bytes(name, value).ok()
}

fn content_type(path: &str) -> &'static str {
    let ext = path.rsplit_once('.').map(|(_, ext)| ext.to_ascii_lowercase());
    match ext.as_deref() {
        Some("html") | Some("htm") => "text/html; charset=utf-8",
        Some("csv") => "text/csv; charset=utf-8",
        Some("json") => "application/json",
        Some("js") => "text/javascript",
        Some("css") => "text/css",
        Some("svg") => "image/svg+xml",
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        _ => "application/octet-stream",
    }
}

/// Split a request URL into a decoded path and its query pairs.
fn split_url(url: &str) -> (String, Vec<(String, String)>) {
    let (path, query) = url.split_once('?').unwrap_or((url, ""));
    let decode = |s: &str| {
        urlencoding::decode(&s.replace('+', " "))
            .map(|d| d.into_owned())
            .unwrap_or_else(|_| s.to_string())
    };
    let pairs = query
        .split('&')
        .filter(|p| !p.is_empty())
        .map(|p| {
            let (k, v) = p.split_once('=').unwrap_or((p, ""));
            (decode(k), decode(v))
        })
        .collect();
    (decode(path), pairs)
}

fn viewport_from_query(query: &[(String, String)], default: ViewportArgs) -> ViewportArgs {
    let get = |name: &str| {
        query
            .iter()
            .find(|(k, _)| k == name)
            .and_then(|(_, v)| v.parse::<f32>().ok())
            .filter(|v| v.is_finite() && *v >= 0.0)
    };
    ViewportArgs {
        width: get("width").unwrap_or(default.width),
        height: get("height").unwrap_or(default.height),
    }
}

struct ServeContext {
    settings: ExplorerSettings,
    root: PathBuf,
    viewport: ViewportArgs,
    fetcher: FileFetcher,
    perf: Mutex<PerfMonitor>,
}

fn cmd_serve(settings: ExplorerSettings, args: ServeArgs) -> anyhow::Result<ExitCode> {
    let server = Server::http(&args.addr)
        .map_err(|e| anyhow::anyhow!("failed to start server on {}: {}", args.addr, e))?;
    let server = Arc::new(server);
    let ctx = Arc::new(ServeContext {
        fetcher: FileFetcher::new(&args.root),
        settings,
        root: args.root,
        viewport: args.viewport,
        perf: Mutex::new(PerfMonitor::new()),
    });
    info!(addr = %args.addr, workers = args.workers, "Serving");

    let workers: Vec<_> = (0..args.workers.max(1))
        .map(|_| {
            let server = Arc::clone(&server);
            let ctx = Arc::clone(&ctx);
            thread::spawn(move || {
                while let Ok(request) = server.recv() {
                    handle_request(&ctx, request);
                }
            })
        })
        .collect();

    for worker in workers {
        if worker.join().is_err() {
            error!("Server worker panicked");
        }
    }
    ctx.perf.lock().log_summary();
    Ok(ExitCode::SUCCESS)
}

fn handle_request(ctx: &ServeContext, request: tiny_http::Request) {
    let started = Instant::now();
    let (path, query) = split_url(request.url());
    debug!(method = %request.method(), path = %path, "Request");

    let (status, body, mime, op): (u16, Vec<u8>, &str, &'static str) = match path.as_str() {
        "/" | "/index.html" => {
            let pipeline = rendered_pipeline(ctx, &query);
            let status = if pipeline.state() == PipelineState::Ready { 200 } else { 500 };
            (status, pipeline.page().to_html(PAGE_TITLE).into_bytes(), "text/html; charset=utf-8", "serve_page")
        }
        "/chart.json" => {
            let pipeline = rendered_pipeline(ctx, &query);
            match pipeline.chart().map(|c| c.spec().to_json()) {
                Some(Ok(json)) => (200, json.into_bytes(), "application/json", "serve_chart"),
                Some(Err(e)) => (500, error_json(&e.to_string()), "application/json", "serve_chart"),
                None => {
                    let message = pipeline
                        .last_error()
                        .map(|e| e.to_string())
                        .unwrap_or_else(|| "no chart rendered".to_string());
                    (500, error_json(&message), "application/json", "serve_chart")
                }
            }
        }
        other => match ctx.fetcher.fetch(other) {
            Ok(resp) if resp.is_success() => (resp.status, resp.body, content_type(other), "serve_file"),
            Ok(resp) => (resp.status, Vec::new(), "text/plain", "serve_file"),
            Err(e) => (500, e.to_string().into_bytes(), "text/plain", "serve_file"),
        },
    };

    let mut response = Response::from_data(body).with_status_code(StatusCode(status));
    if let Some(header) = create_header(&b"Content-Type"[..], mime.as_bytes()) {
        response = response.with_header(header);
    }
    if let Err(e) = request.respond(response) {
        warn!(error = %e, "Failed to send response");
    }

    let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;
    ctx.perf.lock().record(op, elapsed_ms, lexiscatter::perf::SLOW_RENDER_MS);
}

fn rendered_pipeline(ctx: &ServeContext, query: &[(String, String)]) -> FilePipeline {
    let viewport = viewport_from_query(query, ctx.viewport);
    let mut pipeline = build_pipeline(ctx.settings.clone(), &ctx.root, viewport);
    let _ = pipeline.load();
    pipeline.run_until_idle();
    pipeline
}

fn error_json(message: &str) -> Vec<u8> {
    serde_json::json!({ "error": message }).to_string().into_bytes()
}

// ============================================================================
// check-mobile
// ============================================================================

fn cmd_check_mobile(args: CheckMobileArgs) -> anyhow::Result<ExitCode> {
    let html = std::fs::read_to_string(&args.path)
        .with_context(|| format!("Error reading '{}'", args.path.display()))?;
    println!("Validating mobile responsiveness of {}...\n", args.path.display());

    let report = mobile_check::validate_html(&html);
    print!("{}", report.render());
    Ok(ExitCode::from(report.exit_code() as u8))
}
