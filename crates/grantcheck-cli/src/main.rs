use std::io::{self, BufRead, Read, Write};
use std::path::Path;
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::Parser;
use grantcheck_core::{
    check_report, export, CheckConfig, CheckProfile, ExportFormat, ProposalField, ProposalInput,
    Sanitizer,
};
use grantcheck_runtime::{
    PromptTemplate, ProposalWriter, ProviderRegistry, TextGenerator, WriteOutcome,
};
use tracing_subscriber::EnvFilter;

mod cli;

use cli::{Cli, Command, ProfileCommand};

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = if verbose > 0 {
        EnvFilter::new(default)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .compact()
        .init();
}

/// Read text from a file, or stdin when the path is absent or "-".
fn read_text(path: Option<&Path>) -> Result<String> {
    match path {
        Some(p) if p != Path::new("-") => {
            std::fs::read_to_string(p).with_context(|| format!("Failed to read {}", p.display()))
        }
        _ => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read stdin")?;
            Ok(buf)
        }
    }
}

/// A preset name, or a profile file when the argument names one.
fn load_config(profile: &str) -> Result<CheckConfig> {
    if let Ok(config) = CheckConfig::preset(profile) {
        return Ok(config);
    }
    let path = Path::new(profile);
    if !path.exists() {
        bail!("unknown profile '{}' (expected intro, full, or a profile file)", profile);
    }
    let loaded = CheckProfile::from_file(path)
        .with_context(|| format!("Failed to load profile {}", path.display()))?;
    Ok(loaded.check)
}

fn load_input(path: &Path) -> Result<ProposalInput> {
    ProposalInput::from_file(path).with_context(|| format!("Failed to read input {}", path.display()))
}

/// Ask for each template field on stdin.
fn collect_input(template: &PromptTemplate) -> Result<ProposalInput> {
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    let mut input = ProposalInput::new();

    eprintln!("Welcome to the Grant Proposal Writing Assistant!");
    eprintln!("Please provide details about your project and the funder.\n");

    for field in template.input_variables() {
        let question = ProposalField::from_key(field)
            .map(|f| f.prompt().to_string())
            .unwrap_or_else(|| field.replace('_', " "));
        eprint!("{}: ", question);
        io::stderr().flush()?;

        let answer = lines.next().transpose()?.unwrap_or_default();
        input.set(field, answer);
    }

    Ok(input)
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn cmd_check(json: bool, profile: &str, input: Option<&Path>, text: Option<&Path>) -> Result<ExitCode> {
    let config = load_config(profile)?;
    let input = match input {
        Some(path) => load_input(path)?,
        None => ProposalInput::new(),
    };
    let text = read_text(text)?;

    let report = check_report(&text, &input, &config);
    if json {
        print_json(&report)?;
    } else {
        println!("{}", report.summary());
    }

    Ok(if report.is_clean() {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    })
}

fn cmd_sanitize(json: bool, profile: &str, text: Option<&Path>) -> Result<ExitCode> {
    let config = load_config(profile)?;
    let cleaned = Sanitizer::with_signoffs(&config.signoffs).sanitize(&read_text(text)?);

    if json {
        print_json(&serde_json::json!({ "text": cleaned }))?;
    } else {
        println!("{}", cleaned);
    }
    Ok(ExitCode::SUCCESS)
}

/// Check profile for a template when none is given.
fn template_config(template: &PromptTemplate, profile: Option<&str>) -> Result<CheckConfig> {
    match profile {
        Some(p) => load_config(p),
        None => Ok(CheckConfig::preset(&template.name)?),
    }
}

fn cmd_prompt(json: bool, template: &str, input: &Path, profile: Option<&str>) -> Result<ExitCode> {
    let template = PromptTemplate::by_name(template)?;
    let config = template_config(&template, profile)?;
    let input = load_input(input)?;

    let prompt = template.render(&input, &config)?;
    if json {
        print_json(&serde_json::json!({ "template": template.name, "prompt": prompt }))?;
    } else {
        println!("{}", prompt);
    }
    Ok(ExitCode::SUCCESS)
}

struct GenerateArgs<'a> {
    template: &'a str,
    input: Option<&'a Path>,
    profile: Option<&'a str>,
    provider: &'a str,
    model: Option<&'a str>,
    temperature: Option<f32>,
    timeout: Option<&'a str>,
    export: Option<(ExportFormat, &'a Path)>,
}

async fn cmd_generate(json: bool, args: GenerateArgs<'_>) -> Result<ExitCode> {
    let template = PromptTemplate::by_name(args.template)?;
    let config = template_config(&template, args.profile)?;
    let input = match args.input {
        Some(path) => load_input(path)?,
        None => collect_input(&template)?,
    };

    let mut provider_config = ProviderRegistry::with_defaults()
        .default_config(args.provider)
        .unwrap_or_else(|| serde_json::json!({}));
    if let Some(model) = args.model {
        provider_config["model"] = model.into();
    }
    if let Some(temperature) = args.temperature {
        provider_config["temperature"] = temperature.into();
    }
    if let Some(timeout) = args.timeout {
        provider_config["timeout"] = timeout.into();
    }

    let generator = ProviderRegistry::with_defaults()
        .create(args.provider, &provider_config)
        .with_context(|| format!("Failed to set up provider '{}'", args.provider))?;
    let completion = generator.completion_defaults();
    let writer = ProposalWriter::new(generator, template, config, completion);

    let outcome = writer.write(&input).await.context("Generation failed")?;
    if json {
        print_json(&outcome)?;
    }

    let draft = match outcome {
        WriteOutcome::Incomplete { missing } => {
            if !json {
                eprintln!("Please fill out all fields. Missing: {}", missing.join(", "));
            }
            return Ok(ExitCode::from(1));
        }
        WriteOutcome::Drafted(draft) => draft,
    };

    if !json {
        for issue in &draft.issues {
            eprintln!("warning: {}", issue);
        }
        println!("{}", draft.text);
    }

    if let Some((format, dir)) = args.export {
        let path = export(&draft.text, input.title(), format).write_to(dir)?;
        eprintln!("Exported to {}", path.display());
    }

    Ok(ExitCode::SUCCESS)
}

fn cmd_export(
    format: ExportFormat,
    title: &str,
    profile: &str,
    out: &Path,
    text: Option<&Path>,
) -> Result<ExitCode> {
    let config = load_config(profile)?;
    let text = Sanitizer::with_signoffs(&config.signoffs).sanitize(&read_text(text)?);
    let path = export(&text, title, format).write_to(out)?;
    println!("{}", path.display());
    Ok(ExitCode::SUCCESS)
}

fn cmd_profile_show(json: bool, name: &str) -> Result<ExitCode> {
    let profile = CheckProfile::named(name, CheckConfig::preset(name)?);
    if json {
        print_json(&profile)?;
    } else {
        print!("{}", profile.to_yaml()?);
    }
    Ok(ExitCode::SUCCESS)
}

async fn run(cli: Cli) -> Result<ExitCode> {
    let json = cli.json;
    match cli.command {
        Command::Check { profile, input, text } => {
            cmd_check(json, &profile, input.as_deref(), text.as_deref())
        }
        Command::Sanitize { profile, text } => cmd_sanitize(json, &profile, text.as_deref()),
        Command::Prompt {
            template,
            input,
            profile,
        } => cmd_prompt(json, &template, &input, profile.as_deref()),
        Command::Generate {
            template,
            input,
            profile,
            provider,
            model,
            temperature,
            timeout,
            export,
            out,
        } => {
            let args = GenerateArgs {
                template: &template,
                input: input.as_deref(),
                profile: profile.as_deref(),
                provider: &provider,
                model: model.as_deref(),
                temperature,
                timeout: timeout.as_deref(),
                export: export.zip(out.as_deref()),
            };
            cmd_generate(json, args).await
        }
        Command::Export {
            format,
            title,
            profile,
            out,
            text,
        } => cmd_export(format, &title, &profile, &out, text.as_deref()),
        Command::Profile {
            command: ProfileCommand::Show { name },
        } => cmd_profile_show(json, &name),
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {:#}", e);
            ExitCode::from(2)
        }
    }
}
