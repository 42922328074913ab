//! Command dispatch

use std::path::{Path, PathBuf};

use tracing::{debug, instrument};

use crate::application::{ApplicationError, IoResultExt};
use crate::cli::args::{Cli, Commands};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::config::Settings;
use crate::domain::{ChainResolver, ContainerDefinition};
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::InfraError;

fn to_cli(e: impl Into<ApplicationError>) -> CliError {
    CliError::Infra(InfraError::Application(e.into()))
}

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let settings = Settings::load().map_err(to_cli)?;
    let services = ServiceContainer::new(settings);

    let dir = cli
        .definitions
        .clone()
        .unwrap_or_else(|| services.settings.definitions_dir.clone());

    match &cli.command {
        Some(Commands::Merge { files, output }) => merge(&services, files, output.as_deref()),
        Some(Commands::Resolve { name }) => resolve(&services, &dir, name),
        Some(Commands::Chain { name }) => chain(&services, &dir, name),
        Some(Commands::Tree) => tree(&services, &dir),
        Some(Commands::List) => list(&services, &dir),
        None => Ok(()),
    }
}

#[instrument(skip(services))]
fn merge(
    services: &ServiceContainer,
    files: &[PathBuf],
    output_path: Option<&Path>,
) -> CliResult<()> {
    if files.len() < 2 {
        return Err(CliError::Usage(
            "merge requires at least two files".to_string(),
        ));
    }
    debug!("merge: {} files", files.len());

    let document = services.configuration.merge_files(files).map_err(to_cli)?;

    match output_path {
        Some(path) => {
            services
                .fs
                .write(path, &document.to_string())
                .with_path_context("write merged document", path)
                .map_err(to_cli)?;
            output::success(&format!("wrote {}", path.display()));
        }
        None => output::info(&document),
    }
    Ok(())
}

#[instrument(skip(services))]
fn resolve(services: &ServiceContainer, dir: &Path, name: &str) -> CliResult<()> {
    let definition = services
        .configuration
        .merged_definition(dir, name)
        .map_err(to_cli)?;
    output::info(&definition.element);
    Ok(())
}

#[instrument(skip(services))]
fn chain(services: &ServiceContainer, dir: &Path, name: &str) -> CliResult<()> {
    let set = services
        .configuration
        .load_definitions(dir)
        .map_err(to_cli)?;
    let chain = set.resolver.chain(name).map_err(to_cli)?;

    output::header(&format!("Inheritance chain for '{}'", name));
    if set.resolver.defaults().is_some() {
        output::detail("(defaults)");
    }
    for definition in chain {
        output::detail(&describe(definition));
    }
    Ok(())
}

#[instrument(skip(services))]
fn tree(services: &ServiceContainer, dir: &Path) -> CliResult<()> {
    let set = services
        .configuration
        .load_definitions(dir)
        .map_err(to_cli)?;

    for root in set.resolver.roots() {
        output::info(&build_tree(&set.resolver, root));
    }
    Ok(())
}

fn build_tree(
    resolver: &ChainResolver,
    definition: &ContainerDefinition,
) -> termtree::Tree<String> {
    let mut tree = termtree::Tree::new(describe(definition));
    for derived in resolver.derived_of(&definition.name) {
        tree.push(build_tree(resolver, derived));
    }
    tree
}

#[instrument(skip(services))]
fn list(services: &ServiceContainer, dir: &Path) -> CliResult<()> {
    let set = services
        .configuration
        .load_definitions(dir)
        .map_err(to_cli)?;

    for definition in set.resolver.definitions() {
        let mut line = describe(definition);
        if let Some(base) = &definition.extends {
            line.push_str(&format!(" extends {}", base));
        }
        output::info(&line);
    }
    Ok(())
}

fn describe(definition: &ContainerDefinition) -> String {
    if definition.is_abstract {
        format!("{} (abstract)", definition.name)
    } else {
        definition.name.clone()
    }
}
