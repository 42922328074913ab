//! Configuration service
//!
//! Orchestrates the pipeline: scan definition files, resolve the inheritance
//! chain, fold the merge engine across layers, replace variables, and hand
//! merged definitions to the container builder.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::debug;

use crate::application::builder::{Container, ContainerBuilder};
use crate::application::error::{ApplicationError, ApplicationResult};
use crate::application::error_ext::IoResultExt;
use crate::application::registry::TypeRegistry;
use crate::domain::{
    ChainResolver, ContainerDefinition, InheritanceEngine, TokenVariablesReplacer,
    VariablesReplacer, XmlDocument,
};
use crate::infrastructure::traits::FileSystem;

/// Everything loaded from a definitions directory.
pub struct DefinitionSet {
    pub resolver: ChainResolver,
    /// Definition files read, in scan order
    pub files: Vec<PathBuf>,
}

/// Service tying parser, resolver, merge engine, and builder together.
pub struct ConfigurationService {
    fs: Arc<dyn FileSystem>,
    engine: InheritanceEngine,
    replacer: Arc<dyn VariablesReplacer>,
}

impl ConfigurationService {
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self::with_replacer(fs, Arc::new(TokenVariablesReplacer::new()))
    }

    pub fn with_replacer(fs: Arc<dyn FileSystem>, replacer: Arc<dyn VariablesReplacer>) -> Self {
        Self {
            fs,
            engine: InheritanceEngine::new(),
            replacer,
        }
    }

    /// Scan `dir` for `.xml` definition files and populate a resolver.
    ///
    /// A document whose root has no `name` attribute is the defaults layer;
    /// at most one is allowed per directory.
    pub fn load_definitions(&self, dir: &Path) -> ApplicationResult<DefinitionSet> {
        debug!("load_definitions: dir={}", dir.display());
        if !self.fs.is_dir(dir) {
            return Err(ApplicationError::OperationFailed {
                context: format!("definitions directory not found: {}", dir.display()),
                source: Box::new(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    "not a directory",
                )),
            });
        }

        // Sort for deterministic load order and error reporting
        let mut paths: Vec<PathBuf> = walkdir::WalkDir::new(dir)
            .max_depth(1)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .map(|e| e.into_path())
            .filter(|path| path.extension().is_some_and(|ext| ext == "xml"))
            .collect();
        paths.sort();

        let mut resolver = ChainResolver::new();
        let mut defaults_path: Option<PathBuf> = None;

        for path in &paths {
            let document = self.parse_file(path)?;

            if ContainerDefinition::is_defaults_layer(&document.root) {
                if let Some(first) = &defaults_path {
                    return Err(ApplicationError::MultipleDefaults {
                        first: first.clone(),
                        second: path.clone(),
                    });
                }
                defaults_path = Some(path.clone());
                resolver.set_defaults(document.root);
            } else {
                resolver.insert(ContainerDefinition::from_document(document)?)?;
            }
        }

        debug!(
            "load_definitions: {} files, defaults={}",
            paths.len(),
            defaults_path.is_some()
        );
        Ok(DefinitionSet {
            resolver,
            files: paths,
        })
    }

    /// Fully merged definition for `name`: defaults and all bases folded in,
    /// variables replaced.
    pub fn merged_definition(
        &self,
        dir: &Path,
        name: &str,
    ) -> ApplicationResult<ContainerDefinition> {
        let set = self.load_definitions(dir)?;
        let mut definition = set.resolver.merged(&self.engine, name)?;
        self.replacer.replace_variables(&mut definition);
        Ok(definition)
    }

    /// Build the container for one named definition.
    pub fn build(
        &self,
        dir: &Path,
        name: &str,
        registry: Arc<TypeRegistry>,
    ) -> ApplicationResult<Container> {
        let definition = self.merged_definition(dir, name)?;
        if definition.is_abstract {
            return Err(ApplicationError::AbstractDefinition(definition.name));
        }
        ContainerBuilder::new(registry).build_container(&definition)
    }

    /// Build containers for every non-abstract definition in the directory.
    pub fn build_all(
        &self,
        dir: &Path,
        registry: Arc<TypeRegistry>,
    ) -> ApplicationResult<Vec<Container>> {
        let set = self.load_definitions(dir)?;
        let builder = ContainerBuilder::new(registry);

        let mut containers = Vec::new();
        for definition in set.resolver.definitions() {
            let mut merged = set.resolver.merged(&self.engine, &definition.name)?;
            if merged.is_abstract {
                continue;
            }
            self.replacer.replace_variables(&mut merged);
            containers.push(builder.build_container(&merged)?);
        }
        Ok(containers)
    }

    /// Left-fold merge of explicit files, first file as the base layer.
    /// Leading and trailing content of the base document is kept.
    pub fn merge_files(&self, paths: &[PathBuf]) -> ApplicationResult<XmlDocument> {
        let mut paths = paths.iter();
        let base = paths.next().ok_or_else(|| ApplicationError::Config {
            message: "merge requires at least one file".to_string(),
        })?;

        let mut document = self.parse_file(base)?;
        for path in paths {
            let layer = self.parse_file(path)?;
            document.root = self.engine.process(&document.root, &layer.root);
        }
        Ok(document)
    }

    fn parse_file(&self, path: &Path) -> ApplicationResult<XmlDocument> {
        let content = self
            .fs
            .read_to_string(path)
            .with_path_context("read definition file", path)?;

        XmlDocument::parse(&content).map_err(|e| ApplicationError::OperationFailed {
            context: format!("parse definition file: {}", path.display()),
            source: Box::new(e),
        })
    }
}
