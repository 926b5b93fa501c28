//! SVG generation from a settled scene

use crate::geometry::Rect;
use crate::host::{WidgetHost, WidgetId};
use crate::layout::{AnchorLine, Edge};
use crate::scene::Scene;

use super::SvgConfig;

/// Build SVG elements incrementally
pub struct SvgBuilder {
    config: SvgConfig,
    styles: Vec<String>,
    elements: Vec<String>,
    overlays: Vec<String>,
    indent: usize,
}

impl SvgBuilder {
    /// Create a new SVG builder
    pub fn new(config: SvgConfig) -> Self {
        Self {
            config,
            styles: vec![],
            elements: vec![],
            overlays: vec![],
            indent: 1,
        }
    }

    fn prefix(&self) -> String {
        self.config.class_prefix.clone().unwrap_or_default()
    }

    fn indent_str(&self) -> String {
        if self.config.pretty_print {
            "  ".repeat(self.indent)
        } else {
            String::new()
        }
    }

    fn newline(&self) -> &str {
        if self.config.pretty_print {
            "\n"
        } else {
            ""
        }
    }

    /// Default presentation for widgets, labels and anchor lines
    pub fn add_default_styles(&mut self) {
        let p = self.prefix();
        self.styles.push(format!(
            ".{p}widget {{ fill: none; stroke: #333; stroke-width: 1; }} \
             .{p}label {{ font: 10px sans-serif; fill: #333; }} \
             .{p}anchor {{ stroke: #c33; stroke-dasharray: 4,2; stroke-width: 1; }} \
             .{p}anchor-free {{ stroke: #999; }}"
        ));
    }

    /// Add a widget rectangle
    pub fn add_rect(&mut self, id: Option<&str>, rect: Rect, classes: &[String]) {
        let prefix = self.prefix();
        let id_attr = id.map(|i| format!(r#" id="{}""#, escape_xml(i))).unwrap_or_default();
        let class_list = std::iter::once(format!("{}widget", prefix))
            .chain(classes.iter().cloned())
            .collect::<Vec<_>>()
            .join(" ");

        self.elements.push(format!(
            r#"{}<rect{} class="{}" x="{}" y="{}" width="{}" height="{}"/>"#,
            self.indent_str(),
            id_attr,
            class_list,
            rect.x,
            rect.y,
            rect.width,
            rect.height
        ));
    }

    /// Add a text label with its baseline at `(x, y)`
    pub fn add_text(&mut self, text: &str, x: i32, y: i32) {
        let prefix = self.prefix();
        self.elements.push(format!(
            r#"{}<text class="{}label" x="{}" y="{}">{}</text>"#,
            self.indent_str(),
            prefix,
            x,
            y,
            escape_xml(text)
        ));
    }

    /// Add a dashed anchor segment drawn above every widget
    pub fn add_anchor(&mut self, from: (i32, i32), to: (i32, i32), classes: &[String]) {
        let prefix = self.prefix();
        let class_list = std::iter::once(format!("{}anchor", prefix))
            .chain(classes.iter().cloned())
            .collect::<Vec<_>>()
            .join(" ");

        self.overlays.push(format!(
            r#"{}<line class="{}" x1="{}" y1="{}" x2="{}" y2="{}"/>"#,
            self.indent_str(),
            class_list,
            from.0,
            from.1,
            to.0,
            to.1
        ));
    }

    /// Add a group element with optional ID and classes
    pub fn start_group(&mut self, id: Option<&str>, classes: &[String]) {
        let id_attr = id.map(|i| format!(r#" id="{}""#, escape_xml(i))).unwrap_or_default();
        let class_attr = if classes.is_empty() {
            String::new()
        } else {
            format!(r#" class="{}""#, classes.join(" "))
        };

        self.elements
            .push(format!("{}<g{}{}>", self.indent_str(), id_attr, class_attr));
        self.indent += 1;
    }

    /// Close a group element
    pub fn end_group(&mut self) {
        self.indent = self.indent.saturating_sub(1);
        self.elements.push(format!("{}</g>", self.indent_str()));
    }

    /// Build the final SVG string
    pub fn build(self, viewbox: Rect) -> String {
        let padding = self.config.viewbox_padding;
        let vb_x = viewbox.x as f64 - padding;
        let vb_y = viewbox.y as f64 - padding;
        let vb_w = viewbox.width as f64 + 2.0 * padding;
        let vb_h = viewbox.height as f64 + 2.0 * padding;

        let nl = self.newline();

        let mut svg = String::new();

        if self.config.standalone {
            svg.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
            svg.push_str(nl);
        }

        svg.push_str(&format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="{} {} {} {}">"#,
            vb_x, vb_y, vb_w, vb_h
        ));
        svg.push_str(nl);

        if !self.styles.is_empty() {
            svg.push_str("  <style>");
            svg.push_str(nl);
            for style in &self.styles {
                svg.push_str("    ");
                svg.push_str(style);
                svg.push_str(nl);
            }
            svg.push_str("  </style>");
            svg.push_str(nl);
        }

        for elem in &self.elements {
            svg.push_str(elem);
            svg.push_str(nl);
        }

        // Anchor lines (rendered on top)
        for overlay in &self.overlays {
            svg.push_str(overlay);
            svg.push_str(nl);
        }

        svg.push_str("</svg>");

        svg
    }
}

/// Render every widget of a scene, in top-level coordinates
pub fn render_svg(scene: &Scene, config: &SvgConfig) -> String {
    let mut builder = SvgBuilder::new(config.clone());
    builder.add_default_styles();

    let tree = scene.tree();
    for root in tree.roots() {
        render_widget(scene, *root, &mut builder);
    }

    if config.show_anchors {
        render_anchors(scene, &mut builder);
    }

    let bounds = tree
        .roots()
        .iter()
        .filter_map(|root| tree.absolute_geometry(*root))
        .reduce(|acc, rect| acc.union(&rect))
        .unwrap_or_default();
    builder.build(bounds)
}

fn render_widget(scene: &Scene, widget: WidgetId, builder: &mut SvgBuilder) {
    let tree = scene.tree();
    let Some(rect) = tree.absolute_geometry(widget) else {
        return;
    };
    let name = tree.name(widget);
    let prefix = builder.prefix();
    let mut classes = vec![];
    if scene.layout().node_for(widget).is_some() {
        classes.push(format!("{}anchored", prefix));
    }

    let children = tree.children(widget);
    let grouped = !children.is_empty();
    if grouped {
        builder.start_group(name, &[format!("{}group", prefix)]);
    }
    builder.add_rect(if grouped { None } else { name }, rect, &classes);
    if let (true, Some(name)) = (builder.config.show_names, name) {
        builder.add_text(name, rect.x.saturating_add(2), rect.y.saturating_add(10));
    }
    for child in children {
        render_widget(scene, child, builder);
    }
    if grouped {
        builder.end_group();
    }
}

fn render_anchors(scene: &Scene, builder: &mut SvgBuilder) {
    let layout = scene.layout();
    let tree = scene.tree();
    for (_, node) in layout.nodes() {
        let Some(rect) = tree.absolute_geometry(node.widget()) else {
            continue;
        };
        let lines = Edge::WELL_KNOWN
            .iter()
            .filter_map(|edge| node.line(*edge))
            .chain(node.custom_lines().iter().copied())
            .filter_map(|id| layout.line(id));
        for line in lines {
            let (from, to) = anchor_segment(line, rect);
            let mut classes = vec![format!("{}anchor-{}", builder.prefix(), line.edge())];
            if !line.is_bound() && !line.edge().is_percent() {
                classes.push(format!("{}anchor-free", builder.prefix()));
            }
            builder.add_anchor(from, to, &classes);
        }
    }
}

/// Segment spanning `rect` along the line's orientation
fn anchor_segment(line: &AnchorLine, rect: Rect) -> ((i32, i32), (i32, i32)) {
    let at = line.position(rect);
    if line.edge().is_vertical_line() {
        ((at, rect.top()), (at, rect.bottom()))
    } else {
        ((rect.left(), at), (rect.right(), at))
    }
}

/// Escape special XML characters
fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
