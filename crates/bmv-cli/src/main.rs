//! BMV stock dashboard
//!
//! Renders company information, a price chart, annualized returns and
//! volatility for tickers listed on the Bolsa Mexicana de Valores.
//!
//! # Usage
//!
//! ```bash
//! # One ticker
//! cargo run -p bmv-cli -- WALMEX.MX
//!
//! # Interactive menu
//! cargo run -p bmv-cli
//! ```

mod formatter;

use bmv_stock::{Dashboard, DashboardConfig};
use clap::Parser;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "bmv-dashboard")]
#[command(about = "Análisis de acciones de la Bolsa Mexicana de Valores", long_about = None)]
struct Args {
    /// Ticker to analyze, e.g. WALMEX.MX; omit for the interactive menu
    ticker: Option<String>,

    /// Print the ticker roster and exit
    #[arg(short, long)]
    list: bool,

    /// Roster TOML file to use instead of the bundled one
    #[arg(short, long)]
    roster: Option<PathBuf>,

    /// Print information about the app and the Mexican market
    #[arg(long)]
    about: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    bmv_utils::init_tracing();

    let args = Args::parse();

    if args.about {
        println!("{}", formatter::about());
        return Ok(ExitCode::SUCCESS);
    }

    let mut config = DashboardConfig::default().with_env()?;
    if let Some(path) = args.roster {
        config.roster_path = Some(path);
    }
    let dashboard = Dashboard::from_config(&config)?;

    if args.list {
        println!("{}", formatter::render_roster(dashboard.roster()));
        return Ok(ExitCode::SUCCESS);
    }

    if let Some(ticker) = args.ticker {
        info!(ticker = %ticker, "Rendering single ticker");
        let code = if show(&dashboard, &ticker).await {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        };
        return Ok(code);
    }

    run_menu(&dashboard).await?;
    Ok(ExitCode::SUCCESS)
}

/// Render one ticker; false when the pipeline aborted
async fn show(dashboard: &Dashboard, symbol: &str) -> bool {
    println!("Cargando información de {symbol}...");
    match dashboard.load(symbol).await {
        Ok(view) => {
            println!("{}", formatter::render_dashboard(&view));
            true
        }
        Err(err) => {
            info!(ticker = symbol, error = %err, "Dashboard load failed");
            eprintln!("{}\n", formatter::format_error(&err));
            false
        }
    }
}

async fn run_menu(dashboard: &Dashboard) -> anyhow::Result<()> {
    println!("{}", formatter::render_roster(dashboard.roster()));

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!("Selecciona un ticker (número o símbolo, 'q' para salir): ");
        stdout.flush()?;

        let mut input = String::new();
        match stdin.lock().read_line(&mut input) {
            Ok(0) => {
                // EOF
                println!("\n¡Hasta luego!");
                break;
            }
            Ok(_) => {}
            Err(e) => {
                eprintln!("Error al leer la entrada: {e}");
                continue;
            }
        }

        let input = input.trim();
        match input {
            "" => continue,
            "q" | "Q" | "salir" => {
                println!("¡Hasta luego!");
                break;
            }
            "l" | "lista" => {
                println!("{}", formatter::render_roster(dashboard.roster()));
                continue;
            }
            _ => {}
        }

        let symbol = match input.parse::<usize>() {
            Ok(position) => match dashboard.roster().ticker_at(position) {
                Some(ticker) => ticker.symbol().to_string(),
                None => {
                    eprintln!("❌ Número fuera de rango: {position}\n");
                    continue;
                }
            },
            Err(_) => input.to_string(),
        };

        show(dashboard, &symbol).await;
    }

    Ok(())
}
