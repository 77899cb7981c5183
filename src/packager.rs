//! Packaging orchestrator: copies sources, dependencies and packages, then writes launchers.

use std::path::Path;

use anyhow::{Context, Result};

use crate::config::PackagerConfig;
use crate::copy::{copy_file, copy_tree};
use crate::launcher::{LauncherScripts, load_template, write_launchers};
use crate::params::ParameterSet;
use crate::paths::{PathMapper, RootMapping};
use crate::transform::ReplacementPipeline;

/// Summary of a completed packaging run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackagerReport {
  /// Plain source files written.
  pub sources: usize,
  /// Single dependency files written.
  pub dependencies: usize,
  /// Files written from package directories.
  pub package_files: usize,
  /// Launcher scripts written at the end of the run.
  pub launchers: LauncherScripts,
}

/// Assembles one package directory from a decoded parameter set.
pub struct Packager {
  params: ParameterSet,
  config: PackagerConfig,
  mapper: PathMapper,
}

impl Packager {
  /// Create a packager for the provided parameters and configuration.
  pub fn new(params: ParameterSet, config: PackagerConfig) -> Self {
    let mapper = PathMapper::new(
      RootMapping::new(&params.bin_dir, &params.gen_dir),
      &params.base_dir,
      &params.out_dir,
    );
    Self {
      params,
      config,
      mapper,
    }
  }

  /// Load the parameter file and create a packager for it.
  pub fn from_parameter_file(path: &Path, config: PackagerConfig) -> Result<Self> {
    let params = ParameterSet::load(path)
      .with_context(|| format!("failed to load parameter file {}", path.display()))?;
    Ok(Self::new(params, config))
  }

  /// Parameters driving this run.
  pub fn params(&self) -> &ParameterSet {
    &self.params
  }

  /// Run every pass in order, stopping at the first error.
  pub fn run(&self) -> Result<PackagerReport> {
    let pipeline = self.build_pipeline()?;

    let sources = self.copy_sources(&pipeline)?;
    tracing::info!(count = sources, "copied sources");

    let dependencies = self.copy_dependencies(&pipeline)?;
    tracing::info!(count = dependencies, "copied dependencies");

    let package_files = self.copy_packages(&pipeline)?;
    tracing::info!(
      count = package_files,
      packages = self.params.packages.len(),
      "copied package directories"
    );

    let template = load_template(&self.config)?;
    let launchers = write_launchers(
      &template,
      &self.config.template_marker,
      &self.params.out_dir,
      &self.params.pack_path,
      &self.params.publish_path,
    )?;
    tracing::info!(
      pack = %launchers.pack.display(),
      publish = %launchers.publish.display(),
      "wrote launcher scripts"
    );

    Ok(PackagerReport {
      sources,
      dependencies,
      package_files,
      launchers,
    })
  }

  fn build_pipeline(&self) -> Result<ReplacementPipeline> {
    let stamp = self
      .params
      .stamp_file
      .as_deref()
      .map(|path| (path, self.config.version_key.as_str()));
    let pipeline = ReplacementPipeline::build(
      stamp,
      &self.config.version_placeholder,
      &self.params.replacements_json,
    )?;
    tracing::debug!(rules = pipeline.rules().len(), "built replacement pipeline");
    Ok(pipeline)
  }

  fn copy_sources(&self, pipeline: &ReplacementPipeline) -> Result<usize> {
    for src in &self.params.srcs {
      let destination = self.mapper.source_output(src)?;
      copy_file(src, &destination, pipeline)?;
    }
    Ok(self.params.srcs.len())
  }

  fn copy_dependencies(&self, pipeline: &ReplacementPipeline) -> Result<usize> {
    for dep in &self.params.deps {
      let destination = self.mapper.dependency_output(dep)?;
      copy_file(dep, &destination, pipeline)?;
    }
    Ok(self.params.deps.len())
  }

  fn copy_packages(&self, pipeline: &ReplacementPipeline) -> Result<usize> {
    let mut copied = 0;
    for package in &self.params.packages {
      let destination = self.mapper.package_output(package)?;
      copied += copy_tree(package, &destination, pipeline)
        .with_context(|| format!("failed to copy package {}", package.display()))?;
    }
    Ok(copied)
  }
}
