use std::error::Error;
use std::path::Path;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use atelier_advise::{report, LlmBackend};
use atelier_core::capability::{
    AccessibilityAuditInput, ColorPair, ComponentArchitectureInput, DesignCritiqueInput,
    DesignSystemInput, Device, UserFlowInput, WireframeInput,
};
use atelier_core::knowledge::{Table, WcagLevel};
use atelier_core::tokens::{self, TokenRequest};
use atelier_core::CapabilityInput;

#[derive(Parser)]
#[command(name = "atelier")]
#[command(version, about = "Design guidance and design tokens for user interfaces", long_about = None)]
struct Cli {
    /// Print JSON instead of markdown
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate a design system from a brand color and product description
    DesignSystem(DesignSystemArgs),
    /// Audit UI against WCAG success criteria
    Audit {
        /// Markup or description to audit (file path or text)
        target: String,
        /// Conformance level: A, AA or AAA
        #[arg(short, long, default_value = "AA")]
        level: WcagLevel,
        /// Extra context (file path or text)
        #[arg(short, long)]
        context: Option<String>,
        /// Color pair to measure, as FOREGROUND:BACKGROUND (repeatable)
        #[arg(long = "pair", value_parser = parse_pair)]
        pairs: Vec<ColorPair>,
    },
    /// Map the user flow for a goal
    Flow {
        /// What the user is trying to achieve
        goal: String,
        #[arg(long)]
        persona: Option<String>,
        /// Entry point (repeatable)
        #[arg(long = "entry")]
        entry_points: Vec<String>,
        #[arg(long)]
        platform: Option<String>,
    },
    /// Plan a component architecture for a feature
    Components {
        /// Feature to decompose
        feature: String,
        #[arg(short, long)]
        framework: Option<String>,
        /// Requirement (repeatable)
        #[arg(short, long = "require")]
        requirements: Vec<String>,
    },
    /// Describe a low-fidelity wireframe for a screen
    Wireframe {
        /// Screen name
        screen: String,
        /// What the screen shows and does (file path or text)
        #[arg(short, long)]
        description: String,
        /// mobile, tablet or desktop
        #[arg(long, default_value = "desktop")]
        device: Device,
    },
    /// Critique a design against usability heuristics
    Critique {
        /// The design under review (file path or text)
        design: String,
        /// Goal of the design (repeatable)
        #[arg(long = "goal")]
        goals: Vec<String>,
        /// Area to focus on (repeatable)
        #[arg(long)]
        focus: Vec<String>,
    },
    /// Compute design tokens without calling a model
    Tokens(TokenArgs),
    /// Measure WCAG contrast between two colors
    Contrast {
        foreground: String,
        background: String,
    },
    /// Print a reference table: wcag, heuristics, patterns or templates
    Knowledge {
        table: Table,
        /// WCAG level or pattern category
        #[arg(long)]
        filter: Option<String>,
    },
    /// Show or change model settings
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Args)]
struct TokenArgs {
    /// Brand color as hex
    brand_color: String,
    /// Type scale ratio name
    #[arg(long = "ratio", default_value = "major-third")]
    type_ratio: String,
    /// Base font size in px
    #[arg(long = "base", default_value_t = tokens::default_base_font_size())]
    base_font_size: f64,
    /// Spacing grid unit in px
    #[arg(long = "spacing", default_value_t = tokens::default_spacing_unit())]
    spacing_unit: f64,
}

impl TokenArgs {
    fn request(&self) -> TokenRequest {
        TokenRequest {
            brand_color: self.brand_color.clone(),
            type_ratio: self.type_ratio.clone(),
            base_font_size: self.base_font_size,
            spacing_unit: self.spacing_unit,
        }
    }
}

#[derive(Args)]
struct DesignSystemArgs {
    #[arg(short, long)]
    product: String,
    /// What the product does (file path or text)
    #[arg(short, long)]
    description: String,
    /// Target platform (repeatable)
    #[arg(long = "platform")]
    platforms: Vec<String>,
    #[command(flatten)]
    tokens: TokenArgs,
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Print current settings with the API key masked
    Show,
    /// Set one setting: provider, model, apiKey, baseUrl, maxTokens, temperature, timeoutSecs
    Set { key: String, value: String },
}

fn parse_pair(s: &str) -> Result<ColorPair, String> {
    match s.split_once(':') {
        Some((fg, bg)) if !fg.trim().is_empty() && !bg.trim().is_empty() => Ok(ColorPair {
            foreground: fg.trim().to_string(),
            background: bg.trim().to_string(),
        }),
        _ => Err(format!("expected FOREGROUND:BACKGROUND, got '{s}'")),
    }
}

/// Use the file's contents when `arg` names an existing file, else the text itself.
fn read_arg(arg: String) -> Result<String, std::io::Error> {
    let path = Path::new(&arg);
    if path.is_file() {
        std::fs::read_to_string(path)
    } else {
        Ok(arg)
    }
}

fn read_opt(arg: Option<String>) -> Result<Option<String>, std::io::Error> {
    arg.map(read_arg).transpose()
}

/// Build the capability input for a model-backed command. Local commands
/// are handed back unchanged.
fn capability_input(command: Command) -> Result<Result<CapabilityInput, Command>, std::io::Error> {
    let input = match command {
        Command::DesignSystem(a) => CapabilityInput::DesignSystem(DesignSystemInput {
            product: a.product,
            description: read_arg(a.description)?,
            brand_color: a.tokens.brand_color,
            type_ratio: a.tokens.type_ratio,
            base_font_size: a.tokens.base_font_size,
            spacing_unit: a.tokens.spacing_unit,
            platforms: a.platforms,
        }),
        Command::Audit {
            target,
            level,
            context,
            pairs,
        } => CapabilityInput::AccessibilityAudit(AccessibilityAuditInput {
            target: read_arg(target)?,
            level,
            context: read_opt(context)?,
            color_pairs: pairs,
        }),
        Command::Flow {
            goal,
            persona,
            entry_points,
            platform,
        } => CapabilityInput::UserFlow(UserFlowInput {
            goal,
            persona,
            entry_points,
            platform,
        }),
        Command::Components {
            feature,
            framework,
            requirements,
        } => CapabilityInput::ComponentArchitecture(ComponentArchitectureInput {
            feature,
            framework,
            requirements,
        }),
        Command::Wireframe {
            screen,
            description,
            device,
        } => CapabilityInput::Wireframe(WireframeInput {
            screen,
            description: read_arg(description)?,
            device,
        }),
        Command::Critique {
            design,
            goals,
            focus,
        } => CapabilityInput::DesignCritique(DesignCritiqueInput {
            design: read_arg(design)?,
            goals,
            focus,
        }),
        other => return Ok(Err(other)),
    };
    Ok(Ok(input))
}

fn print_json(value: &impl serde::Serialize) -> Result<(), Box<dyn Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn run_local(command: Command, json: bool) -> Result<(), Box<dyn Error>> {
    match command {
        Command::Tokens(args) => {
            let set = tokens::generate_tokens(&args.request())?;
            if json {
                return print_json(&set);
            }
            let mut out = String::new();
            report::tokens_section(&mut out, &set);
            print!("{out}");
        }
        Command::Contrast {
            foreground,
            background,
        } => {
            let r = tokens::evaluate_contrast(&foreground, &background)?;
            if json {
                return print_json(&r);
            }
            println!(
                "{} on {}: {:.2}:1 ({})",
                r.foreground,
                r.background,
                r.ratio,
                r.levels.grade()
            );
        }
        Command::Knowledge { table, filter } => {
            print!("{}", table.render_filtered(filter.as_deref())?);
        }
        Command::Config { command } => match command {
            ConfigCommand::Show => {
                let settings = atelier_core::read_settings().with_env_overrides();
                print_json(&settings.redacted())?;
                if !settings.is_configured() {
                    eprintln!("Model not configured: set provider, model and apiKey.");
                }
            }
            ConfigCommand::Set { key, value } => {
                let mut settings = atelier_core::read_settings();
                settings.set(&key, &value)?;
                let path = atelier_core::write_settings(&settings)?;
                eprintln!("Wrote {}", path.display());
            }
        },
        _ => {}
    }
    Ok(())
}

async fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let input = match capability_input(cli.command)? {
        Ok(input) => input,
        Err(local) => return run_local(local, cli.json),
    };

    let backend = LlmBackend::new(atelier_core::read_settings().with_env_overrides())?;
    tracing::debug!(capability = %input.capability(), json = cli.json, "dispatching");
    let report = atelier_advise::advise(&input, &backend).await?;
    if cli.json {
        print_json(&report)
    } else {
        print!("{}", report.markdown);
        Ok(())
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("ATELIER_LOG").unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(Cli::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn pair_parsing() {
        let p = parse_pair("#111:#fafafa").unwrap();
        assert_eq!(p.foreground, "#111");
        assert_eq!(p.background, "#fafafa");
        assert!(parse_pair("#111").is_err());
        assert!(parse_pair(":#fff").is_err());
    }

    #[test]
    fn read_arg_prefers_existing_file() {
        let path = std::env::temp_dir().join(format!("atelier-cli-{}.txt", std::process::id()));
        std::fs::write(&path, "<button>Pay</button>").unwrap();
        let text = read_arg(path.to_string_lossy().to_string()).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(text, "<button>Pay</button>");

        assert_eq!(read_arg("just words".into()).unwrap(), "just words");
    }

    #[test]
    fn audit_args_become_capability_input() {
        let cli = Cli::try_parse_from([
            "atelier", "audit", "<img src=x>", "--level", "aaa", "--pair", "#777:#fff",
        ])
        .unwrap();
        match capability_input(cli.command).unwrap() {
            Ok(CapabilityInput::AccessibilityAudit(a)) => {
                assert_eq!(a.level, WcagLevel::AAA);
                assert_eq!(a.color_pairs.len(), 1);
                assert_eq!(a.target, "<img src=x>");
            }
            _ => panic!("expected audit input"),
        }
    }

    #[test]
    fn design_system_uses_token_defaults() {
        let cli = Cli::try_parse_from([
            "atelier", "design-system", "-p", "Ledger", "-d", "Budgets", "#2563eb",
        ])
        .unwrap();
        match capability_input(cli.command).unwrap() {
            Ok(CapabilityInput::DesignSystem(d)) => {
                assert_eq!(d.brand_color, "#2563eb");
                assert_eq!(d.type_ratio, "major-third");
                assert_eq!(d.base_font_size, 16.0);
                assert_eq!(d.spacing_unit, 4.0);
            }
            _ => panic!("expected design system input"),
        }
    }

    #[test]
    fn local_commands_are_not_capabilities() {
        let cli = Cli::try_parse_from(["atelier", "--json", "contrast", "#000", "#fff"]).unwrap();
        assert!(cli.json);
        assert!(matches!(
            capability_input(cli.command).unwrap(),
            Err(Command::Contrast { .. })
        ));
    }

    #[test]
    fn unknown_pattern_category_is_an_error() {
        let cli =
            Cli::try_parse_from(["atelier", "knowledge", "patterns", "--filter", "telepathy"])
                .unwrap();
        let err = run_local(cli.command, false).unwrap_err();
        assert!(err.to_string().contains("telepathy"));

        let cli =
            Cli::try_parse_from(["atelier", "knowledge", "wcag", "--filter", "gold"]).unwrap();
        assert!(run_local(cli.command, false).is_err());
    }

    #[test]
    fn unknown_table_and_device_are_rejected() {
        assert!(Cli::try_parse_from(["atelier", "knowledge", "colors"]).is_err());
        assert!(
            Cli::try_parse_from(["atelier", "wireframe", "Home", "-d", "x", "--device", "watch"])
                .is_err()
        );
    }
}
