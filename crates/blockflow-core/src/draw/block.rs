//! A complete node block: prism faces plus decorations.

use crate::{
    draw::{Badge, Drawable, Icon, LayeredOutput, Prism, Text},
    geometry::Bounds,
};

/// A node block drawn as one unit.
///
/// Rendering order is fixed: faces, stack-count badge, icon, label, sublabel.
#[derive(Debug, Clone)]
pub struct Block<'a> {
    prism: Prism<'a>,
    badge: Option<Badge>,
    icon: Option<Icon<'a>>,
    label: Text<'a>,
    sublabel: Option<Text<'a>>,
}

impl<'a> Block<'a> {
    pub fn new(prism: Prism<'a>, label: Text<'a>) -> Self {
        Self {
            prism,
            badge: None,
            icon: None,
            label,
            sublabel: None,
        }
    }

    pub fn with_badge(mut self, badge: Badge) -> Self {
        self.badge = Some(badge);
        self
    }

    pub fn with_icon(mut self, icon: Icon<'a>) -> Self {
        self.icon = Some(icon);
        self
    }

    pub fn with_sublabel(mut self, sublabel: Text<'a>) -> Self {
        self.sublabel = Some(sublabel);
        self
    }

    pub fn prism(&self) -> &Prism<'a> {
        &self.prism
    }

    pub fn badge(&self) -> Option<&Badge> {
        self.badge.as_ref()
    }

    pub fn icon(&self) -> Option<&Icon<'a>> {
        self.icon.as_ref()
    }

    pub fn label(&self) -> &Text<'a> {
        &self.label
    }

    pub fn sublabel(&self) -> Option<&Text<'a>> {
        self.sublabel.as_ref()
    }
}

impl Drawable for Block<'_> {
    fn render_to_layers(&self) -> LayeredOutput {
        let mut output = self.prism.render_to_layers();

        if let Some(badge) = &self.badge {
            output.merge(badge.render_to_layers());
        }
        if let Some(icon) = &self.icon {
            output.merge(icon.render_to_layers());
        }
        output.merge(self.label.render_to_layers());
        if let Some(sublabel) = &self.sublabel {
            output.merge(sublabel.render_to_layers());
        }

        output
    }

    fn bounds(&self) -> Bounds {
        self.prism.bounds()
    }
}
