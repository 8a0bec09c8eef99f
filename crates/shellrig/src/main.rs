//! Shellrig - Terminal Environment Provisioning
//!
//! Provisions a zsh terminal environment on the local machine:
//! - Shell, framework, plugins and prompt theme
//! - Fuzzy finder, modern file-listing tools, editor
//! - Managed `.zshrc` (previous content backed up first)

mod progress;

use std::env;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use comfy_table::{Cell, Color, Table, presets::UTF8_FULL_CONDENSED};
use console::{Emoji, style};
use serde::{Deserialize, Serialize};
use shellrig_provision::{
    Manifest, Orchestrator, Platform, ReportPrinter, Renderer, RigConfig, TextPlanRenderer,
    YamlPlanRenderer,
};
use tera::Tera;

use progress::SpinnerListener;

static CHECK: Emoji<'_, '_> = Emoji("✅ ", "v ");
static CROSS: Emoji<'_, '_> = Emoji("❌ ", "x ");
static GEAR: Emoji<'_, '_> = Emoji("⚙️  ", "");
static FOLDER: Emoji<'_, '_> = Emoji("📁 ", "");
static SPARKLE: Emoji<'_, '_> = Emoji("✨ ", "");

const ZSHRC_TEMPLATE: &str = include_str!("../templates/zshrc.tera");

/// Configuration file structure
/// Path: ~/.config/shellrig/config.toml (XDG-style)
#[derive(Debug, Default, Serialize, Deserialize)]
struct Config {
    #[serde(default)]
    shell: ShellConfig,
    #[serde(default)]
    prompt: PromptConfig,
    #[serde(default)]
    tools: ToolsConfig,
    #[serde(default)]
    run: RunConfig,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct ShellConfig {
    change_default: Option<bool>,
    plugins: Option<Vec<String>>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct PromptConfig {
    theme: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct ToolsConfig {
    editor: Option<String>,
    fuzzy_finder: Option<bool>,
    listing: Option<bool>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct RunConfig {
    timeout_secs: Option<u64>,
}

#[derive(Parser, Debug)]
#[command(
    name = "shellrig",
    version,
    about = "Provision a zsh terminal environment"
)]
struct Args {
    /// Subcommand (defaults to run if not specified)
    #[command(subcommand)]
    command: Option<Commands>,

    /// Config file path (global)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Show config file path and exit
    #[arg(long)]
    show_config: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Provision the local machine (default)
    Run(RunArgs),

    /// Show the provisioning plan without executing it
    Show(ShowArgs),
}

#[derive(Parser, Debug, Default)]
struct RunArgs {
    /// Skip interactive confirmations
    #[arg(short, long)]
    yes: bool,

    /// Print the plan and exit without executing anything
    #[arg(long)]
    dry_run: bool,

    /// Per-action timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Editor package to install
    #[arg(long)]
    editor: Option<String>,

    /// Prompt theme (powerlevel10k, or "none")
    #[arg(long)]
    theme: Option<String>,

    /// Do not change the login shell
    #[arg(long)]
    no_default_shell: bool,
}

#[derive(Parser, Debug)]
struct ShowArgs {
    /// Output format
    #[arg(value_enum)]
    format: PlanFormat,
}

/// Output format for show command
#[derive(ValueEnum, Clone, Debug)]
enum PlanFormat {
    /// Serialized step plan
    Yaml,
    /// Numbered human-readable plan
    Text,
}

/// Config path - XDG-style, ~/.config/shellrig/config.toml
fn config_path() -> PathBuf {
    env::var_os("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(|| env::var_os("HOME").map(|h| PathBuf::from(h).join(".config")))
        .unwrap_or_else(|| PathBuf::from("."))
        .join("shellrig")
        .join("config.toml")
}

fn load_config(path: Option<&PathBuf>) -> Result<Config> {
    let path = path.cloned().unwrap_or_else(config_path);

    if path.exists() {
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config: {}", path.display()))
    } else {
        Ok(Config::default())
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Show config path and exit
    if args.show_config {
        let path = args.config.clone().unwrap_or_else(config_path);
        println!("{} Config: {}", FOLDER, path.display());
        if path.exists() {
            println!("  {CHECK} exists");
        } else {
            println!("  {} not found (will use defaults)", style("!").yellow());
        }
        return Ok(());
    }

    let file_config = load_config(args.config.as_ref())?;

    match args.command {
        Some(Commands::Run(run_args)) => run_provision(&run_args, &file_config),
        Some(Commands::Show(show_args)) => run_show(&show_args, &file_config),
        None => run_provision(&RunArgs::default(), &file_config),
    }
}

/// Resolve the final configuration (CLI args > env vars > config file >
/// defaults) and render the managed zshrc content.
fn resolve_config(args: &RunArgs, config: &Config) -> Result<RigConfig> {
    let editor = args
        .editor
        .clone()
        .or_else(|| env::var("SHELLRIG_EDITOR").ok())
        .or_else(|| config.tools.editor.clone())
        .unwrap_or_else(|| "neovim".to_string());

    let theme = args
        .theme
        .clone()
        .or_else(|| env::var("SHELLRIG_THEME").ok())
        .or_else(|| config.prompt.theme.clone())
        .unwrap_or_else(|| "powerlevel10k".to_string());
    // "none" disables the theme engine entirely.
    let theme = if theme == "none" { String::new() } else { theme };

    let plugins = config.shell.plugins.clone().unwrap_or_else(|| {
        vec![
            "zsh-autosuggestions".to_string(),
            "zsh-syntax-highlighting".to_string(),
        ]
    });

    let timeout_secs = args
        .timeout
        .or(config.run.timeout_secs)
        .unwrap_or(600);

    let change_default_shell =
        !args.no_default_shell && config.shell.change_default.unwrap_or(true);

    let fuzzy_finder = config.tools.fuzzy_finder.unwrap_or(true);
    let listing = config.tools.listing.unwrap_or(true);

    let zshrc = render_zshrc(&theme, &plugins, &editor, fuzzy_finder, listing)?;

    Ok(RigConfig::for_current_user()?
        .plugins(plugins)
        .theme(theme)
        .editor(editor)
        .fuzzy_finder(fuzzy_finder)
        .listing_tools(listing)
        .change_default_shell(change_default_shell)
        .timeout(Duration::from_secs(timeout_secs))
        .zshrc_content(zshrc)
        .build())
}

fn editor_command(editor: &str) -> &str {
    if editor == "neovim" { "nvim" } else { editor }
}

fn render_zshrc(
    theme: &str,
    plugins: &[String],
    editor: &str,
    fuzzy_finder: bool,
    listing: bool,
) -> Result<String> {
    let mut tera = Tera::default();
    tera.add_raw_template("zshrc", ZSHRC_TEMPLATE)?;

    let mut context = tera::Context::new();
    context.insert("theme", theme);
    context.insert("plugins", plugins);
    context.insert("editor_command", editor_command(editor));
    context.insert("fuzzy_finder", &fuzzy_finder);
    context.insert("listing_tools", &listing);

    tera.render("zshrc", &context)
        .context("Failed to render zshrc template")
}

/// Run local provisioning
fn run_provision(args: &RunArgs, config: &Config) -> Result<()> {
    print_banner();

    // The only fatal probe: an unrecognized host aborts before any step.
    let platform = Platform::detect()?;

    let mut rig = resolve_config(args, config)?;
    print_config_table(&rig, platform);

    if args.dry_run {
        println!("\n{} Dry run - not executing\n", style("i").cyan());
        let manifest = Manifest::terminal(&rig, platform);
        let plan = TextPlanRenderer::new().render(&manifest).unwrap();
        println!("{plan}");
        return Ok(());
    }

    if rig.change_default_shell && !args.yes {
        let confirm = dialoguer::Confirm::new()
            .with_prompt("Change your login shell to zsh at the end?")
            .default(true)
            .interact()?;
        rig.change_default_shell = confirm;
    }

    println!("\n{GEAR} Provisioning...\n");
    let manifest = Manifest::terminal(&rig, platform);
    let report = Orchestrator::new().run(&manifest.steps, &mut SpinnerListener::new());

    println!("\n{}", style("─".repeat(50)).dim());
    print!("{}", ReportPrinter::render(&report));

    if report.is_success() {
        print_success(&rig);
        Ok(())
    } else {
        println!("\n{CROSS} Provisioning failed; see the summary above.");
        std::process::exit(1);
    }
}

/// Run show command
fn run_show(args: &ShowArgs, config: &Config) -> Result<()> {
    let platform = Platform::detect()?;
    let rig = resolve_config(&RunArgs::default(), config)?;
    let manifest = Manifest::terminal(&rig, platform);

    match args.format {
        PlanFormat::Yaml => {
            let yaml = YamlPlanRenderer::new().render(&manifest)?;
            println!("{yaml}");
        }
        PlanFormat::Text => {
            let text = TextPlanRenderer::new().render(&manifest).unwrap();
            println!("{text}");
        }
    }

    Ok(())
}

fn print_banner() {
    println!();
    println!(
        "{}",
        style("╔═══════════════════════════════════════╗")
            .cyan()
            .bold()
    );
    println!(
        "{}",
        style("║        SHELLRIG PROVISIONING          ║")
            .cyan()
            .bold()
    );
    println!(
        "{}",
        style("╚═══════════════════════════════════════╝")
            .cyan()
            .bold()
    );
}

fn print_config_table(rig: &RigConfig, platform: Platform) {
    println!("\n{} Configuration\n", style("▸").blue().bold());

    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(vec![
        Cell::new("Setting").fg(Color::Cyan),
        Cell::new("Value").fg(Color::Cyan),
    ]);

    table.add_row(vec!["Platform", platform.label()]);
    table.add_row(vec!["Home", &rig.home.display().to_string()]);
    table.add_row(vec![
        "Theme",
        if rig.theme.is_empty() { "(none)" } else { &rig.theme },
    ]);
    table.add_row(vec!["Plugins", &rig.plugins.join(", ")]);
    table.add_row(vec!["Editor", &rig.editor]);
    table.add_row(vec![
        "Extras",
        &format!(
            "fuzzy finder: {}, listing tools: {}",
            rig.fuzzy_finder, rig.listing_tools
        ),
    ]);
    table.add_row(vec![
        "Default shell",
        if rig.change_default_shell { "change to zsh" } else { "keep current" },
    ]);
    table.add_row(vec![
        "Action timeout",
        &format!("{}s", rig.timeout.as_secs()),
    ]);

    println!("{table}");
}

fn print_success(rig: &RigConfig) {
    println!();
    println!(
        "{}",
        style("╔═══════════════════════════════════════╗")
            .green()
            .bold()
    );
    println!(
        "{}",
        style("║           TERMINAL READY!             ║")
            .green()
            .bold()
    );
    println!(
        "{}",
        style("╚═══════════════════════════════════════╝")
            .green()
            .bold()
    );
    println!();

    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);

    table.add_row(vec![
        Cell::new("Config").fg(Color::Cyan),
        Cell::new(rig.zshrc_path().display().to_string()),
    ]);
    table.add_row(vec![
        Cell::new("Framework").fg(Color::Cyan),
        Cell::new(rig.framework_dir().display().to_string()),
    ]);
    table.add_row(vec![
        Cell::new("Next").fg(Color::Cyan),
        Cell::new("open a new terminal or run: exec zsh"),
    ]);

    println!("{table}");
    println!();

    println!("{SPARKLE} Provisioning complete!");
}
