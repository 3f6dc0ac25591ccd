mod cli;

use tf_instana::config::{ConfigOverrides, ProviderConfig};
use tf_instana::filterexpression;
use tf_instana::resources::ResourceKind;
use tf_instana::restapi::MatchExpression;
use tf_instana::tf_documents::TfDocuments;

fn main() {
    use clap::Parser;
    let cli = cli::Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_env("TF_INSTANA_LOG"))
        .with_writer(std::io::stderr)
        .init();

    for new_path in cli.directory.iter() {
        match new_path.canonicalize() {
            Err(e) => {
                eprintln!(
                    "Failed to resolve path for -C/--directory {}\n{}",
                    new_path.display(),
                    e
                );
                std::process::exit(1);
            }
            Ok(cwd) => {
                if let Err(err) = std::env::set_current_dir(&cwd) {
                    eprintln!("Failed to set work directory to {}\n{}", cwd.display(), err);
                    std::process::exit(1);
                }

                tracing::info!(directory=%cwd.display(), "Changed working directory");
            }
        }
    }

    let command_result = match cli.command {
        cli::Command::Expr(expr_cli) => expr(expr_cli),
        cli::Command::Plan(plan_cli) => plan(plan_cli),
        cli::Command::Schema(schema_cli) => schema(schema_cli),
    };

    if let Err(e) = command_result {
        for error in e.chain() {
            eprintln!("{error}")
        }
        std::process::exit(1);
    }
}

pub fn expr(cli: cli::ExprCommand) -> anyhow::Result<()> {
    use cli::ExprSubCommand::*;

    match cli.command {
        Normalize { expression } => println!("{}", filterexpression::normalize(&expression)?),
        ToApi { output: out, expression } => {
            let expression = filterexpression::parse(&expression)?;
            let api_model = filterexpression::to_api_model(&expression)?;
            output(&out, &api_model)?;
        }
        FromApi => {
            let stdin = std::io::read_to_string(std::io::stdin())?;
            let api_model: MatchExpression = serde_json::from_str(&stdin)?;
            api_model.validate()?;
            println!("{}", filterexpression::from_api_model(&api_model)?);
        }
    }

    Ok(())
}

pub fn plan(cli: cli::PlanCommand) -> anyhow::Result<()> {
    let documents = load(&cli.input)?;

    let mut config = ProviderConfig::default();
    if let Some(config_file) = &cli.config.config_file {
        config.apply(ConfigOverrides::from_yaml_file(config_file)?);
    }

    let flags = ConfigOverrides {
        default_name_prefix: cli.config.name_prefix,
        default_name_suffix: cli.config.name_suffix,
    };

    let plan = tf_instana::plan::Plan::new(&documents, config, flags)?;
    output(&cli.output, &plan)?;
    Ok(())
}

pub fn schema(cli: cli::SchemaCommand) -> anyhow::Result<()> {
    let Some(resource_type) = &cli.resource_type else {
        return output(&cli.output, &ResourceKind::provider_schema());
    };

    let kind = ResourceKind::from_resource_name(resource_type)
        .ok_or_else(|| anyhow::anyhow!("Unknown resource type {resource_type}"))?;
    output(&cli.output, &kind.schema())
}

fn load(input: &cli::InputArgs) -> anyhow::Result<TfDocuments> {
    if !input.workdir && input.files.is_empty() && input.directories.is_empty() {
        let stdin = std::io::read_to_string(std::io::stdin())?;
        let body = hcl_edit::parser::parse_body(&stdin)?;
        return Ok(body.into());
    }

    let mut documents = TfDocuments::default();

    if input.workdir {
        documents.load_directory(&std::env::current_dir()?)?;
    }

    for file_path in &input.files {
        documents.load_file(file_path)?;
    }

    for dir_path in &input.directories {
        documents.load_directory(dir_path)?;
    }

    anyhow::ensure!(documents.source_count() > 0, "No files loaded");

    Ok(documents)
}

fn output(output: &cli::OutputArgs, value: &impl serde::Serialize) -> anyhow::Result<()> {
    match output.format {
        cli::OutputFormat::Yaml => serde_yaml::to_writer(std::io::stdout(), value)?,
        cli::OutputFormat::Json => {
            serde_json::to_writer_pretty(std::io::stdout(), value)?;
            println!();
        }
    };

    Ok(())
}
