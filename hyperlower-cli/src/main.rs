use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use hyperlower_cli::{Helper, build_cmd, load_options, lower_cmd, runtime_cmd};
use hyperlower_js::Overrides;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "hyperlower", version, about = "Compile hypertext templates to DOM calls")]
struct Cli {
    /// Log at debug level (overrides RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct OptionArgs {
    /// TOML config file
    #[arg(long)]
    config: Option<PathBuf>,
    /// Module providing the appendChild helper
    #[arg(long)]
    append_child_module: Option<String>,
    /// Module providing the setAttribute helper (inlined when unset)
    #[arg(long)]
    set_attribute_module: Option<String>,
    /// Module providing the lifecycle helper
    #[arg(long)]
    on_load_module: Option<String>,
    /// Emit `import` declarations instead of `require` calls
    #[arg(long)]
    use_import_style: bool,
    /// Treat onload/onunload as plain event properties
    #[arg(long)]
    no_lifecycle: bool,
    /// Keep indentation and whitespace runs in text
    #[arg(long)]
    keep_whitespace: bool,
}

impl OptionArgs {
    fn overrides(&self) -> Overrides {
        Overrides {
            append_child_module: self.append_child_module.clone(),
            set_attribute_module: self.set_attribute_module.clone(),
            on_load_module: self.on_load_module.clone(),
            use_import_style: self.use_import_style,
            no_lifecycle: self.no_lifecycle,
            keep_whitespace: self.keep_whitespace,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Compile the templates of a JavaScript file.
    Build {
        /// Path to the .js file
        input: PathBuf,
        /// Output directory (default: target/hyperlower-gen)
        #[arg(long)]
        out_dir: Option<PathBuf>,
        #[command(flatten)]
        options: OptionArgs,
    },
    /// Print the operations of one template body.
    Lower {
        /// Template body, e.g. '<p class="x">${name}</p>'
        template: String,
        /// Print generated JavaScript instead of operations
        #[arg(long)]
        js: bool,
        #[command(flatten)]
        options: OptionArgs,
    },
    /// Print a runtime helper module.
    Runtime {
        #[arg(value_enum)]
        helper: Helper,
    },
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.command {
        Commands::Build {
            input,
            out_dir,
            options,
        } => {
            let options = load_options(options.config.as_deref(), &options.overrides())?;
            build_cmd(&input, out_dir.as_deref(), &options)?;
        }
        Commands::Lower {
            template,
            js,
            options,
        } => {
            let options = load_options(options.config.as_deref(), &options.overrides())?;
            print!("{}", lower_cmd(&template, &options, js)?);
        }
        Commands::Runtime { helper } => print!("{}", runtime_cmd(helper)?),
    }
    Ok(())
}
