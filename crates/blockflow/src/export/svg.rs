//! SVG export backend.
//!
//! Wraps a composed scene in a document with a fixed logical viewBox, the
//! shared `<defs>` (background gradient, grid pattern, block shadow filter)
//! and a full-size backdrop on the background layer.

use std::io::Write;

use log::{debug, error, info};
use svg::{Document, node::element as svg_element};

use blockflow_core::draw::{LayeredOutput, RenderLayer};

use crate::{config::StyleConfig, export};

/// Id of the backdrop gradient in `<defs>`.
pub const BACKGROUND_GRADIENT_ID: &str = "bg-gradient";
/// Id of the grid pattern in `<defs>`.
pub const GRID_PATTERN_ID: &str = "grid";
/// Id of the block drop-shadow filter in `<defs>`.
pub const SHADOW_FILTER_ID: &str = "shadow";

const GRID_CELL: f32 = 20.0;
const GRID_STROKE: &str = "rgba(99,102,241,0.05)";
const GRID_STROKE_WIDTH: f32 = 0.5;

/// SVG exporter writing into any [`Write`] sink.
///
/// ```
/// # use blockflow::config::StyleConfig;
/// # use blockflow::export::{Exporter, svg::Svg};
/// # use blockflow_core::draw::LayeredOutput;
/// let mut exporter = Svg::new(Vec::new(), StyleConfig::default());
/// exporter.export_scene(LayeredOutput::new()).unwrap();
///
/// let document = String::from_utf8(exporter.into_inner()).unwrap();
/// assert!(document.contains("viewBox=\"0 0 900 750\""));
/// ```
#[derive(Debug)]
pub struct Svg<W: Write> {
    writer: W,
    style: StyleConfig,
}

impl<W: Write> Svg<W> {
    pub fn new(writer: W, style: StyleConfig) -> Self {
        Self { writer, style }
    }

    pub fn style(&self) -> &StyleConfig {
        &self.style
    }

    /// Returns the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer
    }

    /// Builds the full document around `layers`.
    ///
    /// # Errors
    ///
    /// Returns [`export::Error::Render`] if a background color does not parse.
    pub fn render_document(&self, mut layers: LayeredOutput) -> Result<Document, export::Error> {
        let width = self.style.width();
        let height = self.style.height();

        let mut doc = Document::new()
            .set("viewBox", format!("0 0 {width} {height}"))
            .set("width", "100%")
            .set("height", "100%");
        doc = doc.add(self.definitions()?);

        let backdrop = svg_element::Rectangle::new()
            .set("width", width)
            .set("height", height)
            .set("fill", format!("url(#{BACKGROUND_GRADIENT_ID})"));
        let mut background = LayeredOutput::new();
        background.add_to_layer(RenderLayer::Background, Box::new(backdrop));
        if self.style.grid() {
            let grid = svg_element::Rectangle::new()
                .set("width", width)
                .set("height", height)
                .set("fill", format!("url(#{GRID_PATTERN_ID})"));
            background.add_to_layer(RenderLayer::Background, Box::new(grid));
        }
        background.merge(layers);
        layers = background;

        for node in layers.render() {
            doc = doc.add(node);
        }
        debug!(width, height; "SVG document rendered");

        Ok(doc)
    }

    fn definitions(&self) -> Result<svg_element::Definitions, export::Error> {
        let from = self.style.background_from().map_err(export::Error::Render)?;
        let to = self.style.background_to().map_err(export::Error::Render)?;

        let gradient = svg_element::LinearGradient::new()
            .set("id", BACKGROUND_GRADIENT_ID)
            .set("x1", 0)
            .set("y1", 0)
            .set("x2", 1)
            .set("y2", 1)
            .add(
                svg_element::Stop::new()
                    .set("offset", "0%")
                    .set("stop-color", &from),
            )
            .add(
                svg_element::Stop::new()
                    .set("offset", "100%")
                    .set("stop-color", &to),
            );

        let grid_path = svg_element::Path::new()
            .set("d", format!("M {GRID_CELL} 0 L 0 0 0 {GRID_CELL}"))
            .set("fill", "none")
            .set("stroke", GRID_STROKE)
            .set("stroke-width", GRID_STROKE_WIDTH);
        let grid = svg_element::Pattern::new()
            .set("id", GRID_PATTERN_ID)
            .set("width", GRID_CELL)
            .set("height", GRID_CELL)
            .set("patternUnits", "userSpaceOnUse")
            .add(grid_path);

        let mut defs = svg_element::Definitions::new().add(gradient).add(grid);

        if self.style.shadow() {
            let shadow = svg_element::Filter::new()
                .set("id", SHADOW_FILTER_ID)
                .set("x", "-20%")
                .set("y", "-20%")
                .set("width", "140%")
                .set("height", "140%")
                .add(
                    svg_element::FilterEffectDropShadow::new()
                        .set("dx", 2)
                        .set("dy", 4)
                        .set("stdDeviation", 3)
                        .set("flood-color", "#00000020"),
                );
            defs = defs.add(shadow);
        }

        Ok(defs)
    }

    fn write_document(&mut self, doc: Document) -> Result<(), export::Error> {
        info!("Writing SVG document");
        if let Err(err) = write!(self.writer, "{doc}") {
            error!(err:err; "Failed to write SVG content");
            return Err(export::Error::Io(err));
        }
        self.writer.flush().map_err(export::Error::Io)
    }
}

impl<W: Write> export::Exporter for Svg<W> {
    fn export_scene(&mut self, layers: LayeredOutput) -> Result<(), export::Error> {
        let doc = self.render_document(layers)?;
        self.write_document(doc)
    }
}

#[cfg(test)]
mod tests {
    use std::io;

    use svg::node::element::Circle;

    use super::*;
    use crate::export::Exporter;

    fn export(style: StyleConfig, layers: LayeredOutput) -> String {
        let mut exporter = Svg::new(Vec::new(), style);
        exporter.export_scene(layers).unwrap();
        String::from_utf8(exporter.into_inner()).unwrap()
    }

    #[test]
    fn test_document_defs() {
        let rendered = export(StyleConfig::default(), LayeredOutput::new());
        assert!(rendered.contains("id=\"bg-gradient\""));
        assert!(rendered.contains("id=\"grid\""));
        assert!(rendered.contains("M 20 0 L 0 0 0 20"));
        assert!(rendered.contains("id=\"shadow\""));
        assert!(rendered.contains("<feDropShadow"));
        assert!(rendered.contains("flood-color=\"#00000020\""));
        assert!(rendered.contains("data-layer=\"background\""));
        assert!(rendered.contains("fill=\"url(#grid)\""));
    }

    #[test]
    fn test_backdrop_renders_below_scene() {
        let mut layers = LayeredOutput::new();
        layers.add_to_layer(RenderLayer::Edge, Box::new(Circle::new().set("id", "marker")));
        let rendered = export(StyleConfig::default(), layers);

        let backdrop = rendered.find("url(#bg-gradient)\"").unwrap();
        let marker = rendered.find("id=\"marker\"").unwrap();
        assert!(backdrop < marker);
    }

    #[test]
    fn test_grid_and_shadow_toggles() {
        let style: StyleConfig = toml::from_str("grid = false\nshadow = false").unwrap();
        let rendered = export(style, LayeredOutput::new());
        assert!(!rendered.contains("url(#grid)"));
        assert!(!rendered.contains("<filter"));
    }

    #[test]
    fn test_invalid_background_fails() {
        let style: StyleConfig = toml::from_str("background_from = \"nope\"").unwrap();
        let mut exporter = Svg::new(Vec::new(), style);
        let err = exporter.export_scene(LayeredOutput::new()).unwrap_err();
        assert!(matches!(err, export::Error::Render(_)));
    }

    struct FailingWriter;

    impl Write for FailingWriter {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::other("broken pipe"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_write_failure_is_io_error() {
        let mut exporter = Svg::new(FailingWriter, StyleConfig::default());
        let err = exporter.export_scene(LayeredOutput::new()).unwrap_err();
        assert!(matches!(err, export::Error::Io(_)));
    }
}
