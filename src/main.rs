//! stager CLI - stage an app droplet with the lifecycle builder

use std::ffi::OsString;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgAction, Parser};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use stager::{ops, AppSource, StagingRequest, Toolkit, CODE_INVALID_ARGS};

/// flags shared with the lifecycle builder, which receives them unchanged
#[derive(Parser, Debug)]
#[command(name = "stager")]
#[command(about = "prepare a staging container and run the lifecycle builder")]
#[command(version)]
struct Cli {
    /// directory the app is staged in
    #[arg(long = "buildDir", default_value = "/tmp/app")]
    build_dir: PathBuf,

    /// directory holding the restored build cache
    #[arg(long = "buildArtifactsCacheDir", default_value = "/tmp/cache")]
    build_artifacts_cache_dir: PathBuf,

    /// build cache archive, read before and written after the build
    #[arg(long = "outputBuildArtifactsCache", default_value = "/tmp/output-cache")]
    output_build_artifacts_cache: PathBuf,

    /// JSON file the build metadata is written to
    #[arg(long = "outputMetadata", default_value = "/tmp/result.json")]
    output_metadata: PathBuf,

    /// droplet produced by the builder
    #[arg(long = "outputDroplet", default_value = "/tmp/droplet")]
    output_droplet: PathBuf,

    /// directory buildpacks are unpacked into
    #[arg(long = "buildpacksDir", default_value = "/tmp/buildpacks")]
    buildpacks_dir: PathBuf,

    /// directory the builder downloads buildpacks into
    #[arg(long = "buildpacksDownloadDir", default_value = "/tmp/buildpackdownloads")]
    buildpacks_download_dir: PathBuf,

    /// comma separated buildpack names
    #[arg(long = "buildpackOrder", default_value = "", value_delimiter = ',')]
    buildpack_order: Vec<String>,

    /// skip buildpack detection
    #[arg(long = "skipDetect", action = ArgAction::Set, num_args = 0..=1,
          require_equals = true, default_value = "false", default_missing_value = "true")]
    skip_detect: bool,

    /// skip TLS verification when downloading buildpacks
    #[arg(long = "skipCertVerify", action = ArgAction::Set, num_args = 0..=1,
          require_equals = true, default_value = "false", default_missing_value = "true")]
    skip_cert_verify: bool,
}

fn main() -> ExitCode {
    let args: Vec<OsString> = std::env::args_os().collect();
    let cli = match Cli::try_parse_from(normalize_flags(&args)) {
        Ok(cli) => cli,
        Err(e) if !e.use_stderr() => {
            // --help and --version
            let _ = e.print();
            return ExitCode::SUCCESS;
        }
        Err(e) => {
            let _ = e.print();
            return ExitCode::from(CODE_INVALID_ARGS);
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("stager=info")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();

    let request = request_from(
        cli,
        args.into_iter().skip(1).collect(),
        |key| std::env::var(key).ok(),
        std::env::current_dir().ok(),
    );

    match ops::stage(&request, &Toolkit::system()) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::from(e.exit_code())
        }
    }
}

/// build the request from parsed flags and the PACK_APP_* environment
///
/// `cwd` is only consulted when neither PACK_APP_ZIP nor PACK_APP_DIR is set.
fn request_from(
    cli: Cli,
    builder_args: Vec<OsString>,
    var: impl Fn(&str) -> Option<String>,
    cwd: Option<PathBuf>,
) -> StagingRequest {
    let source = AppSource::select(
        var("PACK_APP_ZIP").as_deref(),
        var("PACK_APP_DIR").as_deref(),
        cwd,
    );

    // consumed by the builder through the forwarded args
    debug!(
        "buildpack downloads in {}, skip cert verify: {}",
        cli.buildpacks_download_dir.display(),
        cli.skip_cert_verify
    );

    let mut request = StagingRequest::new(var("PACK_APP_NAME").unwrap_or_default(), source);
    request.build_dir = cli.build_dir;
    request.cache_dir = cli.build_artifacts_cache_dir;
    request.output_cache = cli.output_build_artifacts_cache;
    request.output_metadata = cli.output_metadata;
    request.output_droplet = cli.output_droplet;
    request.buildpacks_dir = cli.buildpacks_dir;
    request.buildpack_order = cli.buildpack_order;
    request.skip_detect = cli.skip_detect;
    request.builder_args = builder_args;
    request
}

/// rewrite `-flag` to `--flag` so single-dash builder flags parse
fn normalize_flags(args: &[OsString]) -> Vec<OsString> {
    args.iter()
        .enumerate()
        .map(|(i, arg)| {
            let Some(s) = arg.to_str() else {
                return arg.clone();
            };
            let single_dash = s.len() > 1 && s.starts_with('-') && !s.starts_with("--");
            if i > 0 && single_dash && s[1..].starts_with(|c: char| c.is_ascii_alphabetic()) {
                format!("-{}", s).into()
            } else {
                arg.clone()
            }
        })
        .collect()
}
