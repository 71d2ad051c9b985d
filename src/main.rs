use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::{error, info};

use shopchat::{chat, constants, web_server, ChatWidget, OverlapPolicy, ProductLayout, WidgetConfig};

// Define the command-line interface structure using clap
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

// Options shared by every command that drives a widget
#[derive(clap::Args, Debug)]
struct WidgetArgs {
    #[arg(long, default_value_t = constants::BACKEND_URL.clone(), help = "Base URL of the shopping backend (default read from SHOPCHAT_BACKEND_URL).")]
    backend_url: String,
    #[arg(long, env = "SHOPCHAT_LAYOUT", value_enum, default_value_t = ProductLayout::Rich, help = "How product entries are rendered.")]
    layout: ProductLayout,
    #[arg(long, default_value_t = constants::CURRENCY.clone(), help = "Currency symbol printed before prices (default read from SHOPCHAT_CURRENCY).")]
    currency: String,
    #[arg(long, value_enum, default_value_t = OverlapPolicy::Allow, help = "Whether a new message may be sent while one is pending.")]
    overlap: OverlapPolicy,
    #[arg(long, help = "Directory with template overrides, reloaded on change.")]
    templates: Option<PathBuf>,
}

impl From<WidgetArgs> for WidgetConfig {
    fn from(args: WidgetArgs) -> Self {
        WidgetConfig {
            backend_url: args.backend_url,
            layout: args.layout,
            currency: args.currency,
            overlap: args.overlap,
            template_dir: args.templates,
        }
    }
}

// Define the available subcommands
#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Serve the chat widget page.
    Serve {
        #[arg(long, default_value_t = 9900, help = "Port for the web server.")]
        port: u16,
        #[command(flatten)]
        widget: WidgetArgs,
    },
    /// Chat with the shopping assistant in the terminal.
    Chat {
        #[command(flatten)]
        widget: WidgetArgs,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (for SHOPCHAT_* settings)
    dotenvy::dotenv().ok();

    // Reads log level from RUST_LOG environment variable (e.g., RUST_LOG=info,shopchat=debug)
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    info!("shopchat starting with command: {:?}", cli.command);

    match cli.command {
        Commands::Serve { port, widget } => {
            let widget = ChatWidget::new(&widget.into());

            let mut web_server_handle = tokio::spawn(async move {
                if let Err(e) = web_server::start_web_server(port, widget).await {
                    error!("Web server failed: {:?}", e);
                }
            });

            let ctrl_c = tokio::signal::ctrl_c();
            // Pin the ctrl_c future to the stack so its address is stable
            tokio::pin!(ctrl_c);

            tokio::select! {
                _ = &mut ctrl_c => {
                    info!("Ctrl-C received, shutting down...");
                }
                res = &mut web_server_handle => {
                    match res {
                        Ok(_) => info!("Web server task completed unexpectedly."),
                        Err(e) if e.is_panic() => error!("Web server task panicked: {:?}", e),
                        Err(e) => error!("Web server task failed: {:?}", e),
                    }
                }
            }

            if !web_server_handle.is_finished() {
                info!("Aborting web server task...");
                web_server_handle.abort();
            }
            info!("Shutdown complete.");
        }
        Commands::Chat { widget } => {
            let config: WidgetConfig = widget.into();
            let chat_widget = ChatWidget::new(&config);
            let stdin = tokio::io::BufReader::new(tokio::io::stdin());
            chat::run_chat_session(&chat_widget, &config.currency, stdin, &mut std::io::stdout())
                .await
                .context("Chat session failed")?;
        }
    }

    Ok(())
}
