#[macro_use]
extern crate tracing;

use std::path::PathBuf;

use structopt::StructOpt;
use tokio::runtime::Builder;
use tokio::signal;
use validator::Validate;

use huebridge::models::Config;

#[derive(Debug, StructOpt)]
struct Opts {
    #[structopt(short, long, parse(from_occurrences))]
    verbose: u32,
    #[structopt(short, long = "config")]
    config_path: Option<PathBuf>,
    /// Number of virtual lights
    #[structopt(short, long)]
    lights: Option<u32>,
    /// Port of the HTTP API
    #[structopt(short, long)]
    port: Option<u16>,
    /// Only serve the v1 API
    #[structopt(long)]
    no_v2: bool,
    #[structopt(long)]
    no_discovery: bool,
    /// Log the color of lights as they change
    #[structopt(long)]
    monitor: bool,
    #[structopt(long)]
    dump_config: bool,
}

impl Opts {
    fn apply(&self, config: &mut Config) {
        if let Some(lights) = self.lights {
            config.bridge.lights = lights;
        }

        if let Some(port) = self.port {
            config.web.port = port;
        }

        if self.no_v2 {
            config.web.enable_v2 = false;
        }

        if self.no_discovery {
            config.discovery.enable = false;
        }

        if self.monitor {
            config.monitor.enable = true;
        }
    }
}

async fn run(opts: Opts) -> color_eyre::eyre::Result<()> {
    // Load configuration
    let mut config = if let Some(config_path) = opts.config_path.as_deref() {
        Config::load_file(config_path).await?
    } else {
        Config::default()
    };

    opts.apply(&mut config);
    config.validate()?;

    // Dump configuration if this was asked
    if opts.dump_config {
        print!("{}", config.to_string()?);
        return Ok(());
    }

    let registry = huebridge::registry::Registry::new(config.bridge.lights);
    info!(lights = config.bridge.lights, name = %config.bridge.name, "bridge ready");

    // Start the HTTP server
    let server = huebridge::web::bind(registry.clone(), &config).await?;
    tokio::spawn(server);

    // Start discovery, the bridge stays usable without it
    if config.discovery.enable {
        match huebridge::discovery::Responder::bind(&config.discovery, config.web.port) {
            Ok(responder) => {
                tokio::spawn(responder.run());
            }
            Err(error) => {
                error!(error = %error, "SSDP discovery disabled");
            }
        }
    }

    if config.monitor.enable {
        tokio::spawn(huebridge::monitor::Monitor::new(&registry).run());
    }

    // Should we continue running?
    let mut abort = false;

    while !abort {
        tokio::select! {
            _ = signal::ctrl_c() => {
                abort = true;
            }
        }
    }

    info!("shutting down");
    Ok(())
}

fn install_tracing(opts: &Opts) -> Result<(), tracing_subscriber::util::TryInitError> {
    use tracing_error::ErrorLayer;
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let fmt_layer = fmt::layer();

    let filter_layer = EnvFilter::try_from_env("HUEBRIDGE_LOG").unwrap_or_else(|_| {
        EnvFilter::new(match opts.verbose {
            0 => "huebridge=warn,huebridged=warn",
            1 => "huebridge=info,huebridged=info",
            2 => "huebridge=debug,huebridged=debug",
            _ => "huebridge=trace,huebridged=trace",
        })
    });

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .with(ErrorLayer::default())
        .try_init()
}

#[paw::main]
fn main(opts: Opts) -> color_eyre::eyre::Result<()> {
    color_eyre::install()?;
    install_tracing(&opts)?;

    // Create tokio runtime
    let thd_count = match num_cpus::get() {
        1 => 2,
        other => other.min(4),
    };

    let rt = Builder::new_multi_thread()
        .worker_threads(thd_count)
        .enable_all()
        .build()?;
    rt.block_on(run(opts))
}
