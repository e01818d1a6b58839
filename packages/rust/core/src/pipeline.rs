//! End-to-end build: databases + image trees → manifest.
//!
//! A full rebuild on every run. Any fatal error aborts before the manifest
//! is written, so a failed run never leaves a partial manifest behind.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use tracing::{info, instrument, warn};

use basin_shared::{BasinError, BuildConfig, Manifest, ObjectType, Result};

use crate::assembler::{self, ManifestParts};
use crate::categories::category_sets;
use crate::images;
use crate::importer::{self, Categories};
use crate::sink::ArticleSink;

/// Summary of a completed build.
#[derive(Debug, Clone)]
pub struct BuildReport {
    /// Where the manifest was written.
    pub manifest_path: PathBuf,
    pub articles: usize,
    pub images: usize,
    /// Category sets (including the chefs category).
    pub categories: usize,
    pub chefs: usize,
    /// References that did not resolve (always 0 in strict mode).
    pub dangling: usize,
    pub elapsed: Duration,
}

/// Progress callback for reporting pipeline status.
pub trait ProgressReporter {
    /// Called when entering a new phase.
    fn phase(&self, name: &str);
    /// Called when the build completes.
    fn done(&self, report: &BuildReport);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn phase(&self, _name: &str) {}
    fn done(&self, _report: &BuildReport) {}
}

/// Build the manifest in memory.
///
/// 1. Import recipes, collecting categories
/// 2. Import chefs
/// 3. Turn categories (plus the chefs category, if there are chefs) into sets
/// 4. Walk the images root, then the thumbnails root
/// 5. Assemble
#[instrument(skip_all, fields(data_dir = %config.data_dir.display()))]
pub fn build_manifest(
    config: &BuildConfig,
    sink: &mut dyn ArticleSink,
    progress: &dyn ProgressReporter,
) -> Result<Manifest> {
    progress.phase("Importing recipes");
    let recipes = importer::import_recipes(&config.recipes_db(), config, sink, Categories::new())?;

    progress.phase("Importing chefs");
    let chef_sets = importer::import_chefs(&config.chefs_db(), config)?;

    // Chef sets are tagged with the chefs category, which only needs a set
    // of its own when there is at least one chef.
    let mut categories = recipes.categories;
    if !chef_sets.is_empty() {
        categories.insert(config.manifest.chefs_category.clone());
    }

    progress.phase("Building category sets");
    let category_sets = category_sets(&categories);

    progress.phase("Importing images");
    let images = images::import_images(&config.images_root())?;

    progress.phase("Importing thumbnails");
    let thumbnails = images::import_images(&config.thumbnails_root())?;

    Ok(assembler::assemble_manifest(ManifestParts {
        articles: recipes.articles,
        category_sets,
        chef_sets,
        images,
        thumbnails,
    }))
}

/// Build, check, and write the manifest to `config.manifest_path`.
#[instrument(skip_all, fields(manifest = %config.manifest_path.display()))]
pub fn run(
    config: &BuildConfig,
    sink: &mut dyn ArticleSink,
    progress: &dyn ProgressReporter,
) -> Result<BuildReport> {
    let start = Instant::now();
    info!("starting manifest build");

    let manifest = build_manifest(config, sink, progress)?;

    progress.phase("Checking references");
    let dangling = assembler::check_references(&manifest);
    for reference in &dangling {
        warn!(%reference, "dangling reference");
    }
    if config.manifest.strict_references && !dangling.is_empty() {
        return Err(BasinError::validation(format!(
            "{} dangling reference(s), first: {}",
            dangling.len(),
            dangling[0]
        )));
    }

    progress.phase("Writing manifest");
    assembler::write_manifest(&config.manifest_path, &manifest)?;

    let chef_category = &config.manifest.chefs_category;
    let report = BuildReport {
        manifest_path: config.manifest_path.clone(),
        articles: manifest.articles().count(),
        images: manifest
            .content
            .iter()
            .filter(|record| record.object_type() == ObjectType::Image)
            .count(),
        chefs: manifest
            .sets
            .iter()
            .filter(|set| set.tags.contains(chef_category))
            .count(),
        categories: manifest
            .sets
            .iter()
            .filter(|set| !set.tags.contains(chef_category))
            .count(),
        dangling: dangling.len(),
        elapsed: start.elapsed(),
    };

    progress.done(&report);

    info!(
        articles = report.articles,
        images = report.images,
        categories = report.categories,
        chefs = report.chefs,
        dangling = report.dangling,
        elapsed_ms = report.elapsed.as_millis(),
        "manifest build complete"
    );

    Ok(report)
}
