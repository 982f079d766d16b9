//! Template rendering for project skeletons.
//! The renderer is the external collaborator of the materialization step: it only
//! substitutes configuration values into paths and file contents.
use crate::error::{Error, Result};
use minijinja::Environment;

/// Trait for template rendering engines.
pub trait TemplateRenderer: Sync {
    /// Renders a template string with the given context.
    ///
    /// # Arguments
    /// * `template` - Template string to render
    /// * `context` - Context variables for rendering
    ///
    /// # Returns
    /// * `Result<String>` - Rendered template string
    fn render(&self, template: &str, context: &serde_json::Value) -> Result<String>;
}

/// MiniJinja-based template rendering engine.
pub struct MiniJinjaRenderer {
    /// MiniJinja environment instance
    env: Environment<'static>,
}

impl MiniJinjaRenderer {
    /// Creates a new renderer that keeps the trailing newline of rendered files.
    pub fn new() -> Self {
        let mut env = Environment::new();
        env.set_keep_trailing_newline(true);
        Self { env }
    }
}

impl Default for MiniJinjaRenderer {
    fn default() -> Self {
        MiniJinjaRenderer::new()
    }
}

impl TemplateRenderer for MiniJinjaRenderer {
    /// Renders a template string using MiniJinja.
    ///
    /// # Errors
    /// * `Error::MinijinjaError` if the template does not parse or fails to render
    fn render(&self, template: &str, context: &serde_json::Value) -> Result<String> {
        let mut env = self.env.clone();
        env.add_template("temp", template).map_err(Error::MinijinjaError)?;

        let tmpl = env.get_template("temp").map_err(Error::MinijinjaError)?;

        tmpl.render(context).map_err(Error::MinijinjaError)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minijinja_renderer() {
        let renderer = MiniJinjaRenderer::new();
        let context = serde_json::json!({
            "project_slug": "jar",
            "full_name": "name \"quote\" name"
        });

        let result = renderer.render("src/{{ project_slug }}/cli.py", &context).unwrap();
        assert_eq!(result, "src/jar/cli.py");

        let result = renderer.render("author={{ full_name | tojson }}\n", &context).unwrap();
        assert_eq!(result, "author=\"name \\\"quote\\\" name\"\n");
    }

    #[test]
    fn test_render_error() {
        let renderer = MiniJinjaRenderer::new();
        assert!(renderer.render("{% if %}", &serde_json::json!({})).is_err());
    }
}
