use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use dotenv::dotenv;
use qe_form::form::catalog;
use qe_form::form::controller::FormController;
use qe_form::form::loader::FormLoader;
use qe_form::form::registry::PanelRegistry;
use qe_form::form::state::Value;
use qe_form::ui::headless::HeadlessRenderer;

use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Load and validate a form, then list its panels and fields
    Check {
        /// Path to the form file (defaults to the bundled pw.x form)
        #[arg(short, long, env = "QE_FORM_FILE")]
        file: Option<PathBuf>,
    },
    /// Drive a headless form session and print the result
    Run {
        /// Path to the form file (defaults to the bundled pw.x form)
        #[arg(short, long, env = "QE_FORM_FILE")]
        file: Option<PathBuf>,

        /// `key=value` edits, action keys, or `next`, applied in order
        #[arg(short, long = "step")]
        steps: Vec<String>,
    },
}

fn load_registry(file: Option<&PathBuf>) -> anyhow::Result<PanelRegistry> {
    let registry = match file {
        Some(path) => {
            let def = FormLoader::new()
                .load_form(path)
                .with_context(|| format!("Failed to load form from {}", path.display()))?;
            PanelRegistry::from_definition(&def)
                .with_context(|| format!("Invalid form in {}", path.display()))?
        }
        None => catalog::builtin_registry().context("Bundled form is invalid")?,
    };
    Ok(registry)
}

fn apply_step(form: &mut FormController<HeadlessRenderer>, step: &str) -> anyhow::Result<()> {
    if step == "next" {
        match form.advance()? {
            Some(panel) => println!("-> {}", panel),
            None => println!("-> (end of form)"),
        }
        return Ok(());
    }

    match step.split_once('=') {
        Some((key, value)) => {
            let key = key.trim();
            if key.is_empty() {
                bail!("Step '{}' has no key", step);
            }
            let report = form.on_value_changed(key, Value::parse_input(value.trim()))?;
            log::info!(
                "{}: {} widgets created, {} destroyed",
                key,
                report.created_count(),
                report.destroyed_count()
            );
        }
        None => {
            let shown = form
                .on_action(step)
                .with_context(|| format!("Step '{}' is neither key=value nor an action", step))?;
            if let Some(panel) = shown {
                println!("-> {}", panel);
            }
        }
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    dotenv().ok();
    env_logger::init();

    let args = Args::parse();

    match args.command {
        Commands::Check { file } => {
            let registry = load_registry(file.as_ref())?;
            println!(
                "Form OK: {} panels, start '{}'",
                registry.len(),
                registry.start().unwrap_or_default()
            );
            for name in registry.names() {
                let panel = registry.resolve(name)?;
                let next = panel.next.as_deref().unwrap_or("-");
                println!("{} [{}] -> {}", panel.name, panel.title, next);
                for field in &panel.fields {
                    let gated = if field.conditions.is_empty() { "" } else { " *" };
                    println!("  {} ({:?}){}", field.key, field.kind, gated);
                }
            }
        }
        Commands::Run { file, steps } => {
            let registry = load_registry(file.as_ref())?;
            let mut form = FormController::new(registry, HeadlessRenderer::new());
            form.start()?;

            for step in &steps {
                apply_step(&mut form, step)?;
            }

            print!("{}", form.renderer().render_text());
            println!();
            for (key, value) in form.store().entries() {
                println!("{} = {}", key, value);
            }
        }
    }

    Ok(())
}
