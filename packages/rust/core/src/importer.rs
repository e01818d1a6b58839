//! Recipe and chef database import.
//!
//! Both databases are key files whose section names are stable entry keys.
//! Recipes become article records (with their HTML body written through an
//! [`ArticleSink`]); chefs become set records. The reserved `Metadata`
//! section describes the database itself and is never imported.

use std::collections::BTreeSet;
use std::path::Path;

use tracing::{debug, info, instrument, warn};

use basin_keyfile::{KeyFile, Section};
use basin_markup::{MarkupOptions, transform_instructions};
use basin_shared::{
    ARTICLE_TAG, ArticleRecord, ArticleVocab, BuildConfig, ContentId, ContentRecord,
    HOME_PAGE_TAG, Result, SET_TAG, SetRecord, SetVocab,
};

use crate::sink::ArticleSink;
use crate::toc;

/// Section describing the database, not an entry.
pub const METADATA_SECTION: &str = "Metadata";

/// Distinct category names seen during recipe import.
///
/// Ordered, so category sets come out in a stable order.
pub type Categories = BTreeSet<String>;

/// Output of [`import_recipes`].
#[derive(Debug, Clone)]
pub struct RecipeImport {
    pub articles: Vec<ContentRecord>,
    /// The accumulator passed in, extended with this database's categories.
    pub categories: Categories,
}

// ---------------------------------------------------------------------------
// Recipes
// ---------------------------------------------------------------------------

/// Import every recipe section of the database at `path`.
///
/// A missing required field (`Images`, `Instructions`, `Author`,
/// `Category`, `Name`, `Description`) aborts the whole import.
#[instrument(skip_all, fields(path = %path.display()))]
pub fn import_recipes(
    path: &Path,
    config: &BuildConfig,
    sink: &mut dyn ArticleSink,
    mut categories: Categories,
) -> Result<RecipeImport> {
    let db = KeyFile::load(path)?;
    let images_root = config.images_root();
    let markup = MarkupOptions {
        image_height: config.manifest.image_height,
    };

    let mut articles = Vec::new();
    for section in entry_sections(&db) {
        let name = section.name();
        let image_list = section.require("Images")?;
        let instructions = section.require("Instructions")?;
        let author = section.require("Author")?;
        let category = section.require("Category")?;
        let title = section.require("Name")?;
        let synopsis = section.require("Description")?;

        let images = image_references(&images_root, name, image_list);
        let rendered = transform_instructions(instructions, &images, &markup);
        for index in &rendered.unresolved {
            warn!(
                recipe = name,
                index,
                images = images.len(),
                "image placeholder out of range, left unresolved"
            );
        }

        let id = ContentId::derive(name);
        let source = sink.write_article(&id, &rendered.html)?;

        let article = ArticleRecord {
            id,
            vocab: ArticleVocab::default(),
            content_type: "text/html".into(),
            tags: vec![ARTICLE_TAG.into(), author.into(), category.into()],
            indexed: true,
            source,
            table_of_contents: toc::build_toc(&rendered.html),
            title: title.into(),
            synopsis: synopsis.into(),
            source_name: config.manifest.source_name.clone(),
            thumbnail: lookup_default_image(section, &images),
        };

        categories.insert(category.to_string());
        debug!(recipe = name, steps = rendered.step_count, "recipe imported");
        articles.push(ContentRecord::Article(article));
    }

    info!(
        recipes = articles.len(),
        categories = categories.len(),
        "recipe import complete"
    );

    Ok(RecipeImport {
        articles,
        categories,
    })
}

/// Resolve a `;`-separated image list to identifiers, keeping positions.
///
/// Each file is expected at `<images_root>/<section>/<file>`.
pub fn image_references(images_root: &Path, section: &str, images: &str) -> Vec<ContentId> {
    images
        .split(';')
        .map(|file| {
            let path = images_root.join(section).join(file.trim());
            ContentId::derive(&path.to_string_lossy())
        })
        .collect()
}

/// The recipe thumbnail named by `DefaultImage`, an index into `Images`.
///
/// Absent, non-numeric, or out-of-range values yield `None`.
pub fn lookup_default_image(section: &Section, images: &[ContentId]) -> Option<ContentId> {
    let raw = section.get("DefaultImage")?;
    let Ok(index) = raw.trim().parse::<usize>() else {
        warn!(recipe = section.name(), value = raw, "DefaultImage is not an index, omitting thumbnail");
        return None;
    };
    let id = images.get(index).cloned();
    if id.is_none() {
        warn!(
            recipe = section.name(),
            index,
            images = images.len(),
            "DefaultImage out of range, omitting thumbnail"
        );
    }
    id
}

// ---------------------------------------------------------------------------
// Chefs
// ---------------------------------------------------------------------------

/// Import every chef section of the database at `path` as a set record.
///
/// Chef sets are tagged with the configured chefs category and collect
/// articles tagged with the chef's section name.
#[instrument(skip_all, fields(path = %path.display()))]
pub fn import_chefs(path: &Path, config: &BuildConfig) -> Result<Vec<SetRecord>> {
    let db = KeyFile::load(path)?;
    let thumbnails_root = config.thumbnails_root();

    let mut chefs = Vec::new();
    for section in entry_sections(&db) {
        let name = section.name();
        chefs.push(SetRecord {
            id: ContentId::derive(name),
            vocab: SetVocab::default(),
            tags: vec![
                SET_TAG.into(),
                HOME_PAGE_TAG.into(),
                config.manifest.chefs_category.clone(),
            ],
            child_tags: vec![name.to_string()],
            title: section.require("Fullname")?.into(),
            synopsis: Some(section.require("Description")?.into()),
            featured: true,
            thumbnail: lookup_chef_thumbnail(section, &thumbnails_root),
        });
        debug!(chef = name, "chef imported");
    }

    info!(chefs = chefs.len(), "chef import complete");
    Ok(chefs)
}

/// The chef thumbnail named by `Image`.
///
/// Only the second `/`-separated segment of `Image` is used, as a file name
/// under `<thumbnails_root>/<section>/`. Absent or single-segment values
/// yield `None`.
pub fn lookup_chef_thumbnail(section: &Section, thumbnails_root: &Path) -> Option<ContentId> {
    let raw = section.get("Image")?;
    let Some(file) = raw.split('/').nth(1).map(str::trim).filter(|f| !f.is_empty()) else {
        warn!(chef = section.name(), value = raw, "Image has no file segment, omitting thumbnail");
        return None;
    };
    let path = thumbnails_root.join(section.name()).join(file);
    Some(ContentId::derive(&path.to_string_lossy()))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn entry_sections(db: &KeyFile) -> impl Iterator<Item = &Section> {
    db.sections().filter(|section| section.name() != METADATA_SECTION)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::sink::DirectorySink;
    use basin_shared::{AppConfig, BasinError};

    struct Fixture {
        _tmp: tempfile::TempDir,
        config: BuildConfig,
        sink: DirectorySink,
    }

    fn fixture(recipes: &str, chefs: &str) -> Fixture {
        let tmp = tempfile::tempdir().unwrap();
        let data = tmp.path().join("hatch");
        std::fs::create_dir_all(data.join("data")).unwrap();
        std::fs::write(data.join("data/recipes.db"), recipes).unwrap();
        std::fs::write(data.join("data/chefs.db"), chefs).unwrap();

        let config =
            BuildConfig::new(&AppConfig::default(), &data, tmp.path().join("manifest.json"))
                .unwrap();
        let sink = DirectorySink::new(&tmp.path().join("articles")).unwrap();
        Fixture {
            _tmp: tmp,
            config,
            sink,
        }
    }

    const CAKE: &str = "[Cake]\nImages=cake1.jpg;cake2.jpg\nInstructions=Mix. [image:0]\\nBake. [image:1]\nAuthor=Ana\nCategory=Dessert\nName=Cake\nDescription=A cake.\n";

    fn article(record: &ContentRecord) -> &ArticleRecord {
        record.as_article().expect("article")
    }

    #[test]
    fn recipe_becomes_article() {
        let mut fx = fixture(CAKE, "");
        let path = fx.config.recipes_db();
        let import = import_recipes(&path, &fx.config, &mut fx.sink, Categories::new()).unwrap();

        assert_eq!(import.articles.len(), 1);
        let cake = article(&import.articles[0]);
        assert_eq!(cake.id, ContentId::derive("Cake"));
        assert_eq!(cake.title, "Cake");
        assert_eq!(cake.synopsis, "A cake.");
        assert_eq!(cake.tags, ["EknArticleObject", "Ana", "Dessert"]);
        assert_eq!(cake.content_type, "text/html");
        assert_eq!(cake.source_name, "wikipedia");
        assert!(cake.indexed);
        assert_eq!(cake.table_of_contents.len(), 2);
        assert!(cake.thumbnail.is_none());

        let html = std::fs::read_to_string(&cake.source).unwrap();
        let first_image = fx.config.images_root().join("Cake").join("cake1.jpg");
        assert!(html.contains(ContentId::derive(&first_image.to_string_lossy()).as_str()));
        assert!(!html.contains("[image:"));
    }

    #[test]
    fn metadata_section_is_skipped() {
        let recipes = format!("[Metadata]\nVersion=1\n{CAKE}");
        let chefs = "[Metadata]\nVersion=1\n[Ana]\nFullname=Ana Souza\nDescription=Chef.\n";
        let mut fx = fixture(&recipes, chefs);

        let path = fx.config.recipes_db();
        let import = import_recipes(&path, &fx.config, &mut fx.sink, Categories::new()).unwrap();
        let chef_sets = import_chefs(&fx.config.chefs_db(), &fx.config).unwrap();

        let metadata_id = ContentId::derive(METADATA_SECTION);
        assert_eq!(import.articles.len(), 1);
        assert!(import.articles.iter().all(|r| r.id() != &metadata_id));
        assert_eq!(chef_sets.len(), 1);
        assert!(chef_sets.iter().all(|s| s.id != metadata_id));
    }

    #[test]
    fn categories_are_threaded_and_deduplicated() {
        let recipes = "\
[A]\nImages=a.jpg\nInstructions=x\nAuthor=Ana\nCategory=Dessert\nName=A\nDescription=a\n\
[B]\nImages=b.jpg\nInstructions=x\nAuthor=Ana\nCategory=Dessert\nName=B\nDescription=b\n\
[C]\nImages=c.jpg\nInstructions=x\nAuthor=Luis\nCategory=Bakery\nName=C\nDescription=c\n";
        let mut fx = fixture(recipes, "");

        let seeded = Categories::from(["Existing".to_string()]);
        let path = fx.config.recipes_db();
        let import = import_recipes(&path, &fx.config, &mut fx.sink, seeded).unwrap();

        assert_eq!(import.articles.len(), 3);
        assert_eq!(import.categories.len(), 3);
        assert!(import.categories.contains("Existing"));
        assert!(import.categories.contains("Dessert"));
        assert!(import.categories.contains("Bakery"));
    }

    #[test]
    fn missing_required_field_is_fatal() {
        let recipes = "[Cake]\nImages=a.jpg\nInstructions=x\nCategory=Dessert\nName=Cake\nDescription=d\n";
        let mut fx = fixture(recipes, "");
        let path = fx.config.recipes_db();

        let err = import_recipes(&path, &fx.config, &mut fx.sink, Categories::new()).unwrap_err();
        match err {
            BasinError::MissingField { group, key, .. } => {
                assert_eq!(group, "Cake");
                assert_eq!(key, "Author");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn missing_chef_fullname_is_fatal() {
        let fx = fixture("", "[Ana]\nDescription=Chef.\n");
        let err = import_chefs(&fx.config.chefs_db(), &fx.config).unwrap_err();
        assert!(matches!(err, BasinError::MissingField { ref key, .. } if key == "Fullname"));
    }

    #[test]
    fn default_image_selects_reference() {
        let recipes = CAKE.replace("Name=Cake", "Name=Cake\nDefaultImage=1");
        let mut fx = fixture(&recipes, "");
        let path = fx.config.recipes_db();
        let import = import_recipes(&path, &fx.config, &mut fx.sink, Categories::new()).unwrap();

        let expected = fx.config.images_root().join("Cake").join("cake2.jpg");
        assert_eq!(
            article(&import.articles[0]).thumbnail,
            Some(ContentId::derive(&expected.to_string_lossy()))
        );
    }

    #[test]
    fn malformed_default_image_is_omitted() {
        let db = KeyFile::parse("[A]\nDefaultImage=two\n[B]\nDefaultImage=9\n[C]\n", "r.db").unwrap();
        let images = vec![ContentId::derive("x")];

        for name in ["A", "B", "C"] {
            let section = db.section(name).unwrap();
            assert!(lookup_default_image(section, &images).is_none(), "{name}");
        }
    }

    #[test]
    fn image_references_keep_positions() {
        let root = PathBuf::from("/data/images");
        let refs = image_references(&root, "Cake", "a.jpg; b.jpg");
        assert_eq!(refs.len(), 2);
        assert_eq!(refs[0], ContentId::derive("/data/images/Cake/a.jpg"));
        assert_eq!(refs[1], ContentId::derive("/data/images/Cake/b.jpg"));
    }

    #[test]
    fn chef_becomes_set() {
        let chefs = "[Ana]\nFullname=Ana Souza\nDescription=Pastry chef.\nImage=thumbs/ana.jpg\n";
        let fx = fixture("", chefs);
        let sets = import_chefs(&fx.config.chefs_db(), &fx.config).unwrap();

        assert_eq!(sets.len(), 1);
        let ana = &sets[0];
        assert_eq!(ana.id, ContentId::derive("Ana"));
        assert_eq!(ana.tags, ["EknSetObject", "EknHomePageTag", "Chefs"]);
        assert_eq!(ana.child_tags, ["Ana"]);
        assert_eq!(ana.title, "Ana Souza");
        assert_eq!(ana.synopsis.as_deref(), Some("Pastry chef."));
        assert!(ana.featured);

        let thumb = fx.config.thumbnails_root().join("Ana").join("ana.jpg");
        assert_eq!(ana.thumbnail, Some(ContentId::derive(&thumb.to_string_lossy())));
    }

    #[test]
    fn chef_thumbnail_without_second_segment_is_omitted() {
        let db = KeyFile::parse("[A]\nImage=ana.jpg\n[B]\nImage=dir/\n[C]\n", "c.db").unwrap();
        for name in ["A", "B", "C"] {
            let section = db.section(name).unwrap();
            assert!(lookup_chef_thumbnail(section, Path::new("/t")).is_none(), "{name}");
        }
    }
}
