// FICHIER : server/src/routes/templates.rs

use crate::utils::prelude::*;
use anyhow::Context as _;
use std::collections::HashMap;
use tera::{to_value, try_get_value, Context, Tera};

/// Paramètres du gabarit `target`
#[derive(Debug, Clone, Serialize)]
pub struct TargetPage {
    pub dev: bool,
    pub markup: String,
    pub props: String,
    pub script: String,
    pub title: String,
}

pub struct PageRenderer {
    tera: Tera,
}

impl PageRenderer {
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();

        // 1. Filtres
        tera.register_filter("title_case", filters::title_case_filter);
        tera.register_filter("kebab_case", filters::kebab_case_filter);

        // 2. Gabarits
        tera.add_raw_templates(vec![
            ("target.html", TARGET_TEMPLATE),
            ("revisions.html", REVISIONS_TEMPLATE),
        ])
        .context("Gabarits HTML invalides")?;

        Ok(Self { tera })
    }

    pub fn render(&self, template_name: &str, context: &Context) -> Result<String> {
        let html = self
            .tera
            .render(template_name, context)
            .with_context(|| format!("Échec du rendu du gabarit '{}'", template_name))?;
        Ok(html)
    }

    /// Mise en page complète
    pub fn render_target(&self, page: &TargetPage) -> Result<String> {
        let context = Context::from_serialize(page).context("Contexte de page invalide")?;
        self.render("target.html", &context)
    }
}

/// Sérialise des props pour une balise <script> (pas de `<`, `>` ni `&` bruts).
pub fn escape_props<T: Serialize>(props: &T) -> Result<String> {
    Ok(serde_json::to_string(props)?
        .replace('<', "\\u003c")
        .replace('>', "\\u003e")
        .replace('&', "\\u0026"))
}

const TARGET_TEMPLATE: &str = r#"<!doctype html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>{{ title }}</title>
  <link rel="stylesheet" href="/stylesheets/style.css">
</head>
<body>
  <div id="target">{{ markup | safe }}</div>
  <script id="props" type="application/json">{{ props | safe }}</script>
  {% if dev %}<script src="/js/bundle.js"></script>{% else %}<script src="/js/bundle.min.js"></script>{% endif %}
  <script src="{{ script }}"></script>
</body>
</html>
"#;

const REVISIONS_TEMPLATE: &str = r#"<div class="revisions-page">
  <h1>Revisions</h1>
  <table class="table">
    <thead><tr><th>#</th><th>Entity</th><th>Author</th><th>Note</th><th>Date</th></tr></thead>
    <tbody>
    {% for rev in results %}
      <tr>
        <td>{{ rev.id }}</td>
        <td>{{ rev.entityType | title_case }} <a href="/{{ rev.entityType | kebab_case }}/{{ rev.entityBbid }}">{{ rev.entityBbid }}</a></td>
        <td>{{ rev.authorId }}</td>
        <td>{% if rev.note %}{{ rev.note }}{% endif %}</td>
        <td>{{ rev.createdAt }}</td>
      </tr>
    {% endfor %}
    </tbody>
  </table>
  <nav class="pager">
    {% if from > 0 %}<a href="/?from={% if from > size %}{{ from - size }}{% else %}0{% endif %}&amp;size={{ size }}">&larr; Newer</a>{% endif %}
    {% if results | length == size %}<a href="/?from={{ from + size }}&amp;size={{ size }}">Older &rarr;</a>{% endif %}
  </nav>
</div>
"#;

mod filters {
    use super::*;
    use heck::{ToKebabCase, ToTitleCase};

    pub fn title_case_filter(
        value: &tera::Value,
        _: &HashMap<String, tera::Value>,
    ) -> tera::Result<tera::Value> {
        let s = try_get_value!("title_case", "value", String, value);
        to_value(s.to_title_case()).map_err(tera::Error::from)
    }

    /// `EditionGroup` -> `edition-group` (segment d'URL des entités)
    pub fn kebab_case_filter(
        value: &tera::Value,
        _: &HashMap<String, tera::Value>,
    ) -> tera::Result<tera::Value> {
        let s = try_get_value!("kebab_case", "value", String, value);
        to_value(s.to_kebab_case()).map_err(tera::Error::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_layout_rendering() {
        let renderer = PageRenderer::new().unwrap();
        let html = renderer
            .render_target(&TargetPage {
                dev: true,
                markup: "<p>hi</p>".into(),
                props: escape_props(&json!({ "x": "</script>" })).unwrap(),
                script: "/js/revisions.js".into(),
                title: "RevisionsPage".into(),
            })
            .unwrap();
        assert!(html.contains("<title>RevisionsPage</title>"));
        assert!(html.contains("<p>hi</p>"));
        assert!(html.contains("/js/bundle.js"));
        assert!(!html.contains("</script>\"}"));
    }

    #[test]
    fn test_revisions_markup_uses_title_case() {
        let renderer = PageRenderer::new().unwrap();
        let mut ctx = Context::new();
        ctx.insert("from", &0);
        ctx.insert("size", &1);
        ctx.insert(
            "results",
            &json!([{
                "id": 4, "entityType": "EditionGroup", "entityBbid": "b-1",
                "authorId": 2, "note": null, "createdAt": "2024-01-01T00:00:00.000Z"
            }]),
        );
        let html = renderer.render("revisions.html", &ctx).unwrap();
        assert!(html.contains("Edition Group"));
        assert!(html.contains(r#"href="/edition-group/b-1""#));
        assert!(html.contains("Older"));
        assert!(!html.contains("Newer"));
    }
}
