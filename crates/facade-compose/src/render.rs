//! HTML rendering of page trees.

use std::fmt::Write;

use crate::node::{is_local_asset, Alt, Border, ControlKind, LinkVariant, PageNode, Radius, Tone};

/// URL settings that affect rendered markup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    /// Prefix for every site-internal URL, with a trailing slash
    pub base_url: String,
    /// Internal links end with `/` when set
    pub trailing_slash: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            base_url: "/".to_string(),
            trailing_slash: true,
        }
    }
}

impl RenderOptions {
    /// Public URL of a local asset.
    pub fn asset_url(&self, src: &str) -> String {
        if !is_local_asset(src) {
            return src.to_string();
        }
        format!("{}assets/{}", self.base_url, src.trim_start_matches('/'))
    }

    /// Public URL of a link target.
    ///
    /// Site-internal paths get the base URL and the trailing slash
    /// convention; anything else is returned untouched.
    pub fn href(&self, href: &str) -> String {
        if !href.starts_with('/') || href.starts_with("//") {
            return href.to_string();
        }

        let split = href.find(['?', '#']).unwrap_or(href.len());
        let (path, suffix) = href.split_at(split);

        let trimmed = path.trim_matches('/');
        if trimmed.is_empty() {
            return format!("{}{}", self.base_url, suffix);
        }

        let last = trimmed.rsplit('/').next().unwrap_or(trimmed);
        let slash = if self.trailing_slash && !last.contains('.') {
            "/"
        } else {
            ""
        };

        format!("{}{}{}{}", self.base_url, trimmed, slash, suffix)
    }
}

/// Render a tree to an HTML fragment.
///
/// Output depends only on the tree and options.
pub fn render(node: &PageNode, options: &RenderOptions) -> String {
    let mut out = String::new();
    render_node(node, options, 0, &mut out);
    out
}

fn render_node(node: &PageNode, options: &RenderOptions, depth: usize, out: &mut String) {
    let indent = "  ".repeat(depth);

    // Writing into a String is infallible.
    let _ = match node {
        PageNode::Container { layout, children } => {
            let mut classes = vec!["box"];
            if layout.border == Border::Standard {
                classes.push("box-border");
            }
            if layout.radius == Radius::Standard {
                classes.push("box-radius");
            }
            match layout.tone {
                Tone::Body => {}
                Tone::Shade => classes.push("tone-shade"),
                Tone::Inverse => classes.push("tone-inverse"),
            }

            let _ = write!(out, "{indent}<div class=\"{}\"", classes.join(" "));
            if let Some(step) = layout.padding {
                let _ = write!(out, " data-padding=\"{step}\"");
            }
            if let Some(width) = &layout.max_width {
                let _ = write!(out, " style=\"max-width:{}\"", escape(width));
            }
            out.push_str(">\n");
            for child in children {
                render_node(child, options, depth + 1, out);
            }
            writeln!(out, "{indent}</div>")
        }
        PageNode::Heading { level, text } => {
            writeln!(out, "{indent}<h{level}>{}</h{level}>", escape(text))
        }
        PageNode::Text { text } => writeln!(out, "{indent}<p>{}</p>", escape(text)),
        PageNode::Image { src, alt } => {
            let src = escape(&options.asset_url(src));
            match alt {
                Alt::Text(alt) => {
                    writeln!(out, "{indent}<img src=\"{src}\" alt=\"{}\">", escape(alt))
                }
                Alt::Decorative => {
                    writeln!(out, "{indent}<img src=\"{src}\" alt=\"\" role=\"presentation\">")
                }
            }
        }
        PageNode::Control {
            kind,
            id,
            label,
            block,
        } => {
            let id = escape(id);
            let label = escape(label);
            match kind {
                ControlKind::TextInput | ControlKind::PasswordInput => {
                    let input_type = if *kind == ControlKind::PasswordInput {
                        "password"
                    } else {
                        "text"
                    };
                    writeln!(
                        out,
                        "{indent}<div class=\"field\">\n\
                         {indent}  <label for=\"{id}\">{label}</label>\n\
                         {indent}  <input type=\"{input_type}\" id=\"{id}\" name=\"{id}\">\n\
                         {indent}</div>"
                    )
                }
                ControlKind::Button => {
                    let class = if *block {
                        "button button-block"
                    } else {
                        "button"
                    };
                    writeln!(
                        out,
                        "{indent}<button type=\"button\" id=\"{id}\" class=\"{class}\">{label}</button>"
                    )
                }
            }
        }
        PageNode::Link {
            href,
            label,
            variant,
        } => {
            let class = match variant {
                LinkVariant::Plain => "link",
                LinkVariant::Button => "button",
            };
            writeln!(
                out,
                "{indent}<a href=\"{}\" class=\"{class}\">{}</a>",
                escape(&options.href(href)),
                escape(label)
            )
        }
        PageNode::Grid { cols, children } => {
            let _ = write!(out, "{indent}<div class=\"grid\"");
            let mut style = String::new();
            for (bp, n) in cols.iter() {
                let _ = write!(out, " data-cols-{bp}=\"{n}\"");
                let _ = write!(style, "--cols-{bp}:{n};");
            }
            let _ = writeln!(out, " style=\"{}\">", style.trim_end_matches(';'));
            for child in children {
                let _ = writeln!(out, "{indent}  <div class=\"grid-item\">");
                render_node(child, options, depth + 2, out);
                let _ = writeln!(out, "{indent}  </div>");
            }
            writeln!(out, "{indent}</div>")
        }
    };
}

/// Escape text for use in HTML content and quoted attributes.
pub fn escape(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::*;
    use pretty_assertions::assert_eq;

    fn login_box() -> PageNode {
        container()
            .padding(3)
            .border(Border::Standard)
            .radius(Radius::Standard)
            .max_width("300px")
            .child(heading(2, "Login"))
            .child(text_input("email", "Email"))
            .child(password_input("password", "Password"))
            .child(block(button("login", "Login")))
            .build()
            .unwrap()
    }

    #[test]
    fn renders_login_box() {
        let html = render(&login_box(), &RenderOptions::default());

        assert_eq!(
            html,
            r#"<div class="box box-border box-radius" data-padding="3" style="max-width:300px">
  <h2>Login</h2>
  <div class="field">
    <label for="email">Email</label>
    <input type="text" id="email" name="email">
  </div>
  <div class="field">
    <label for="password">Password</label>
    <input type="password" id="password" name="password">
  </div>
  <button type="button" id="login" class="button button-block">Login</button>
</div>
"#
        );
    }

    #[test]
    fn rendering_is_stable() {
        let tree = login_box();
        let options = RenderOptions::default();
        assert_eq!(render(&tree, &options), render(&tree, &options));
    }

    #[test]
    fn grid_emits_column_attributes() {
        let tree = grid([
            (Breakpoint::Xs, 1),
            (Breakpoint::Sm, 2),
            (Breakpoint::Md, 4),
        ])
        .children((1..=4).map(|i| text(format!("Article {i}"))))
        .build()
        .unwrap();

        let html = render(&tree, &RenderOptions::default());

        assert!(html.starts_with(
            "<div class=\"grid\" data-cols-xs=\"1\" data-cols-sm=\"2\" data-cols-md=\"4\" \
             style=\"--cols-xs:1;--cols-sm:2;--cols-md:4\">"
        ));
        assert_eq!(html.matches("<div class=\"grid-item\">").count(), 4);
    }

    #[test]
    fn escapes_text_and_attributes() {
        let tree = container()
            .child(text("Tom & <Jerry>"))
            .child(image("/images/a.svg", "say \"hi\""))
            .build()
            .unwrap();

        let html = render(&tree, &RenderOptions::default());

        assert!(html.contains("<p>Tom &amp; &lt;Jerry&gt;</p>"));
        assert!(html.contains("alt=\"say &quot;hi&quot;\""));
    }

    #[test]
    fn decorative_images_are_presentational() {
        let html = render(
            &decorative_image("/images/wave.svg").unwrap(),
            &RenderOptions::default(),
        );
        assert_eq!(
            html,
            "<img src=\"/assets/images/wave.svg\" alt=\"\" role=\"presentation\">\n"
        );
    }

    #[test]
    fn rewrites_internal_links() {
        let slash = RenderOptions::default();
        assert_eq!(slash.href("/sign-in-form"), "/sign-in-form/");
        assert_eq!(slash.href("/sign-in-form#top"), "/sign-in-form/#top");
        assert_eq!(slash.href("/"), "/");
        assert_eq!(slash.href("/files/guide.pdf"), "/files/guide.pdf");
        assert_eq!(slash.href("https://example.com"), "https://example.com");

        let flat = RenderOptions {
            base_url: "/site/".to_string(),
            trailing_slash: false,
        };
        assert_eq!(flat.href("/sign-in-form/"), "/site/sign-in-form");
        assert_eq!(flat.asset_url("/images/a.svg"), "/site/assets/images/a.svg");
        assert_eq!(
            flat.asset_url("https://cdn.example.com/a.png"),
            "https://cdn.example.com/a.png"
        );
    }
}
