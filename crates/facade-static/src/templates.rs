//! Document templates wrapping rendered page content.

use minijinja::{context, Environment};

/// Context for rendering a page document.
#[derive(Debug, Clone, serde::Serialize)]
pub struct Context {
    /// Page title
    pub title: String,
    /// Site title
    pub site_title: String,
    /// Meta description
    pub description: Option<String>,
    /// Rendered content HTML
    pub content: String,
    /// Base URL
    pub base_url: String,
}

/// Template engine using minijinja.
pub struct TemplateEngine {
    env: Environment<'static>,
}

impl TemplateEngine {
    /// Create a new template engine with the built-in templates.
    pub fn new() -> Self {
        let mut env = Environment::new();

        env.add_template_owned("base.html".to_string(), BASE_TEMPLATE.to_string())
            .expect("Failed to add base template");

        env.add_template_owned("page.html".to_string(), PAGE_TEMPLATE.to_string())
            .expect("Failed to add page template");

        Self { env }
    }

    /// Render a page using the specified template.
    pub fn render_page(
        &self,
        template: &str,
        context: &Context,
    ) -> Result<String, minijinja::Error> {
        let tmpl = self.env.get_template(template)?;

        tmpl.render(context! {
            title => &context.title,
            site_title => &context.site_title,
            description => &context.description,
            content => &context.content,
            base_url => &context.base_url,
        })
    }
}

impl Default for TemplateEngine {
    fn default() -> Self {
        Self::new()
    }
}

const BASE_TEMPLATE: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>{% if title == site_title %}{{ title }}{% else %}{{ title }} | {{ site_title }}{% endif %}</title>
  {% if description %}<meta name="description" content="{{ description }}">
  {% endif %}<link rel="stylesheet" href="{{ base_url | safe }}assets/main.css">
</head>
<body>
  {% block body %}{% endblock %}
</body>
</html>
"##;

const PAGE_TEMPLATE: &str = r##"{% extends "base.html" %}

{% block body %}<main class="page">
{{ content | safe }}</main>{% endblock %}"##;
