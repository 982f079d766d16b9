//! Rendering of a skeleton template directory into a project tree.
//!
//! Every path is rendered with the configuration context. Files ending in `.j2`
//! have their content rendered and the suffix dropped; all other files are copied.

use crate::config::ResolvedConfiguration;
use crate::constants::TEMPLATE_SUFFIX;
use crate::error::{Error, Result};
use crate::renderer::TemplateRenderer;
use crate::rewrite::unescape_entities;
use crate::tree::ProjectTree;
use chrono::Datelike;
use log::debug;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Builds the rendering context: every resolved option plus the current `year`.
///
/// Option values are entity-decoded, so the rendered files carry the same text
/// the rules match against.
pub fn render_context(config: &ResolvedConfiguration) -> serde_json::Value {
    let mut context = serde_json::Map::new();
    for (name, value) in config.iter() {
        context.insert(name.to_string(), unescape_entities(value).into());
    }
    context.insert("year".to_string(), chrono::Local::now().year().into());
    serde_json::Value::Object(context)
}

/// Returns true for `name.j2` and `name.ext.j2`, false for plain files and a bare `.j2`.
pub fn is_jinja_template(filename: &str) -> bool {
    filename.strip_suffix(TEMPLATE_SUFFIX).is_some_and(|stem| !stem.is_empty())
}

/// A rendered path is usable if it is non-empty, relative, and has no empty component.
pub fn is_rendered_path_valid(path: &str) -> bool {
    !path.trim().is_empty() && !path.starts_with('/') && !path.contains("//")
}

/// Maps a rendered relative path to its output location, stripping `.j2`.
///
/// Returns the target path and whether the content must be rendered.
pub fn resolve_target_path<P: AsRef<Path>>(rendered: &str, output_root: P) -> (PathBuf, bool) {
    let output_root = output_root.as_ref();
    let path = Path::new(rendered);
    match path.file_name().and_then(|n| n.to_str()) {
        Some(filename) if is_jinja_template(filename) => {
            let stripped = filename.strip_suffix(TEMPLATE_SUFFIX).unwrap_or(filename);
            (output_root.join(path.with_file_name(stripped)), true)
        }
        _ => (output_root.join(path), false),
    }
}

/// A skeleton template directory and the renderer used to expand it.
pub struct Skeleton<'a> {
    renderer: &'a dyn TemplateRenderer,
    template_root: PathBuf,
}

impl<'a> Skeleton<'a> {
    /// # Errors
    /// * `Error::TemplateError` if the template directory does not exist
    pub fn new<P: AsRef<Path>>(renderer: &'a dyn TemplateRenderer, template_root: P) -> Result<Self> {
        let template_root = template_root.as_ref();
        if !template_root.is_dir() {
            return Err(Error::TemplateError(format!(
                "template directory '{}' does not exist",
                template_root.display()
            )));
        }
        Ok(Self { renderer, template_root: template_root.to_path_buf() })
    }

    pub fn template_root(&self) -> &Path {
        &self.template_root
    }

    /// Renders the skeleton into `output_root`, which is created if needed.
    ///
    /// # Returns
    /// * `Result<ProjectTree>` - The freshly rendered tree, ready to be materialized
    pub fn render_into<P: AsRef<Path>>(
        &self,
        config: &ResolvedConfiguration,
        output_root: P,
    ) -> Result<ProjectTree> {
        let output_root = output_root.as_ref();
        let context = render_context(config);
        fs::create_dir_all(output_root)?;

        for entry in WalkDir::new(&self.template_root).min_depth(1).sort_by_file_name() {
            let entry = entry.map_err(|e| Error::IoError(e.into()))?;
            let source = entry.path();
            let relative = source
                .strip_prefix(&self.template_root)
                .map_err(|e| Error::TemplateError(e.to_string()))?
                .to_str()
                .ok_or_else(|| Error::TemplateError(format!("non UTF-8 path '{}'", source.display())))?;

            let rendered = self.renderer.render(relative, &context)?;
            if !is_rendered_path_valid(&rendered) {
                debug!("Skipping '{relative}': rendered path '{rendered}' is not usable");
                continue;
            }

            let (target, render_content) = resolve_target_path(&rendered, output_root);
            if entry.file_type().is_dir() {
                fs::create_dir_all(&target)?;
            } else if render_content {
                debug!("Writing file: {}", target.display());
                let content = fs::read_to_string(source)?;
                write_file(&target, &self.renderer.render(&content, &context)?)?;
            } else {
                debug!("Copying file: {}", target.display());
                copy_file(source, &target)?;
            }
        }

        ProjectTree::open(output_root)
    }
}

fn write_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    Ok(fs::write(path, content)?)
}

fn copy_file(source: &Path, dest: &Path) -> Result<()> {
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::copy(source, dest)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_context_decodes_entities() {
        let mut overrides = crate::config::Overrides::new();
        overrides.insert("full_name".to_string(), "name &quot;quote&#x22; name".to_string());
        let config = crate::config::OptionModel::standard().resolve(&overrides).unwrap();

        let context = render_context(&config);

        assert_eq!(context["full_name"], r#"name "quote" name"#);
        assert_eq!(context["project_slug"], "my_python_package");
        assert!(context["year"].is_number());
    }

    #[test]
    fn test_is_jinja_template() {
        assert!(is_jinja_template("setup.py.j2"));
        assert!(is_jinja_template("conf.py.j2"));
        assert!(!is_jinja_template("LICENSE"));
        assert!(!is_jinja_template("file.j2txt"));
        assert!(is_jinja_template("LICENSE.j2"));
        assert!(!is_jinja_template(".j2"));
    }

    #[test]
    fn test_resolve_target_path() {
        let (path, render) = resolve_target_path("docs/source/conf.py.j2", "out");
        assert_eq!(path, PathBuf::from("out/docs/source/conf.py"));
        assert!(render);

        let (path, render) = resolve_target_path("tests/__init__.py", "out");
        assert_eq!(path, PathBuf::from("out/tests/__init__.py"));
        assert!(!render);
    }

    #[test]
    fn test_is_rendered_path_valid() {
        assert!(!is_rendered_path_valid(""));
        assert!(!is_rendered_path_valid("src//cli.py"));
        assert!(!is_rendered_path_valid("/cli.py"));
        assert!(is_rendered_path_valid("src/jar/cli.py"));
    }
}
