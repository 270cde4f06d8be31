use clap::{Parser, Subcommand};
use manuscript_site::{config, generate, og_image, output, search, sitemap};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "manuscript-site")]
#[command(about = "Static site generator for a single plain-text manuscript")]
#[command(long_about = "\
Static site generator for a single plain-text manuscript

Each page of the manuscript starts with a marker line and a few optional
header lines, followed by the body:

  PÁGINA: nivel-1/que-es-bitcoin.html
  TÍTULO: ¿Qué es Bitcoin?
  META DESCRIPTION: Una introducción sin tecnicismos.
  SUBTÍTULO: Dinero que nadie controla
  ==========================================

  # Un encabezado
  Párrafo con **negrita**.
  - elemento de lista
  | A | B |
  > **CALLOUT WARNING: Cuidado**: texto
  [NOTA: una nota]
  Leer más → /nivel-1/siguiente.html

  Bloque 1 completado

Encoding is detected automatically and mis-decoded text is repaired.
Pages are written to <output_root>/<path>.

Run 'manuscript-site gen-config' to generate a documented site.toml.")]
#[command(version)]
struct Cli {
    /// Site configuration file (missing file = stock defaults)
    #[arg(long, default_value = "site.toml", global = true)]
    config: PathBuf,

    /// Show debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the full pipeline: decode → parse → navigate → render → write
    Build,
    /// Parse the manuscript and list its pages without writing anything
    Check,
    /// Regenerate sitemap.xml from the output tree
    Sitemap,
    /// Regenerate the search index from the output tree
    SearchIndex,
    /// Render the social preview image
    OgImage,
    /// Print a stock site.toml with the common options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp(None)
        .init();

    if let Command::GenConfig = cli.command {
        print!("{}", config::stock_config_toml());
        return Ok(());
    }

    let config = config::load_config(&cli.config)?;
    let output_dir = config.output_dir();

    match cli.command {
        Command::Build => {
            println!("==> Building {} → {}", config.input, output_dir.display());
            let summary = generate::build(&config)?;
            output::print_build_output(&summary);
        }
        Command::Check => {
            let records = generate::read_records(&config)?;
            output::print_check_output(&records, &config.input_path());
            println!("==> Manuscript is valid");
        }
        Command::Sitemap => {
            let count = sitemap::write_sitemap(&output_dir, &config.site, &config.sitemap)?;
            println!("Sitemap: {count} URLs");
        }
        Command::SearchIndex => {
            let count = search::write_search_index(&output_dir, &config)?;
            println!("Search index: {count} entries");
        }
        Command::OgImage => {
            let target = og_image::write_og_image(&output_dir, &config.og_image)?;
            println!("Preview image: {}", target.display());
        }
        Command::GenConfig => unreachable!("handled before loading config"),
    }

    Ok(())
}
