use anyhow::Result;
use clap::Parser;

use drydock::domain::{Environment, GitService, Workflow};
use drydock::infrastructure::{create_client, KubeRecordStore, KubeSecretStore};
use drydock::services::{GitServiceRegistry, StoredEnvironmentSource, WorkflowDefaulter};
use drydock::ui;

mod cli;

use cli::{Cli, Commands, GitCommands, OutputFormat, WorkflowCommands};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging with LOGGING env var support
    // LOGGING=debug,info,warn,error or just LOGGING=debug
    let log_level = std::env::var("LOGGING")
        .or_else(|_| std::env::var("LOG_LEVEL"))
        .unwrap_or_else(|_| {
            if cli.verbose {
                "debug".to_string()
            } else {
                "info".to_string()
            }
        });

    tracing_subscriber::fmt()
        .with_env_filter(log_level)
        .with_target(false)
        .init();

    match cli.command {
        Commands::Git { command } => match command {
            GitCommands::Resolve { url, namespace } => git_resolve(&namespace, &url).await,
            GitCommands::Ensure {
                url,
                kind,
                name,
                namespace,
            } => git_ensure(&namespace, &kind, &name, &url).await,
        },
        Commands::Workflow { command } => match command {
            WorkflowCommands::Get {
                name,
                namespace,
                output,
            } => workflow_get(&name, &namespace, output).await,
        },
    }
}

async fn git_resolve(namespace: &str, url: &str) -> Result<()> {
    let client = create_client().await?;
    let services = KubeRecordStore::<GitService>::new(client.clone());
    let secrets = KubeSecretStore::new(client);
    let registry = GitServiceRegistry::new(&services, &secrets);

    let kind = registry.resolve_kind(namespace, url).await?;
    println!("{}", kind);
    Ok(())
}

async fn git_ensure(namespace: &str, kind: &str, name: &str, url: &str) -> Result<()> {
    let client = create_client().await?;
    let services = KubeRecordStore::<GitService>::new(client.clone());
    let secrets = KubeSecretStore::new(client);
    let registry = GitServiceRegistry::new(&services, &secrets);

    let mut out = std::io::stdout();
    match registry
        .ensure_service(namespace, kind, name, url, &mut out)
        .await
    {
        Ok(()) => {
            ui::print_success(&format!("git service registered for {}", url));
            Ok(())
        }
        Err(err) => {
            ui::print_error(&err.to_string());
            Err(err.into())
        }
    }
}

async fn workflow_get(name: &str, namespace: &str, output: OutputFormat) -> Result<()> {
    let client = create_client().await?;
    let workflows = KubeRecordStore::<Workflow>::new(client.clone());
    let environments = KubeRecordStore::<Environment>::new(client);
    let source = StoredEnvironmentSource::new(&environments);
    let defaulter = WorkflowDefaulter::new(&workflows, &source);

    let workflow = defaulter.get_workflow(name, namespace).await?;
    if workflow.spec.steps.is_empty() {
        ui::print_info("workflow has no promotion steps");
    }

    match output {
        OutputFormat::Yaml => print!("{}", serde_yaml::to_string(&workflow)?),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&workflow)?),
    }
    Ok(())
}
