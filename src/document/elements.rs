//! Element types for the document model
//!
//! Each element type knows its SVG tag and the fixed list of attributes it
//! evaluates. Everything else passes through untouched.

use enum_dispatch::enum_dispatch;
use glam::{DVec2, dvec2};
use serde::Deserialize;

use super::path::{PathSegment, format_path};
use super::svg::Node;
use super::{Builder, Scalar};
use crate::errors::{EvalError, RenderError};
use crate::types::format_number;

/// Attributes every element may carry
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Presentation {
    pub id: Option<String>,
    pub class: Option<String>,
    pub fill: Option<String>,
    pub stroke: Option<String>,
    #[serde(rename = "stroke-width")]
    pub stroke_width: Option<Scalar>,
    pub opacity: Option<Scalar>,
    pub transform: Option<String>,
    pub style: Option<String>,
}

impl Presentation {
    /// `id` and `class` lead the attribute list
    pub(crate) fn build_identity(&self, node: &mut Node) {
        if let Some(id) = &self.id {
            node.set("id", id);
        }
        if let Some(class) = &self.class {
            node.set("class", class);
        }
    }

    pub(crate) fn build_style(
        &self,
        builder: &mut Builder<'_>,
        node: &mut Node,
    ) -> Result<(), RenderError> {
        if let Some(fill) = &self.fill {
            node.set("fill", fill);
        }
        if let Some(stroke) = &self.stroke {
            node.set("stroke", stroke);
        }
        builder.attribute(node, "stroke-width", self.stroke_width.as_ref())?;
        builder.attribute(node, "opacity", self.opacity.as_ref())?;
        if let Some(transform) = &self.transform {
            node.set("transform", transform);
        }
        if let Some(style) = &self.style {
            node.set("style", style);
        }
        Ok(())
    }
}

/// Common behavior for all element types
#[enum_dispatch]
pub trait BuildElement {
    /// SVG tag name
    fn tag(&self) -> &'static str;

    fn presentation(&self) -> &Presentation;

    /// Evaluate the element's own attributes into `node`
    fn build_attributes(&self, builder: &mut Builder<'_>, node: &mut Node) -> Result<(), RenderError>;

    fn children(&self) -> &[Element] {
        &[]
    }

    fn text(&self) -> Option<&str> {
        None
    }
}

/// Any element a document may contain
#[enum_dispatch(BuildElement)]
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Element {
    Rect(Rect),
    Circle(Circle),
    Ellipse(Ellipse),
    Line(Line),
    Polygon(Polygon),
    Polyline(Polyline),
    Path(Path),
    Text(Text),
    G(Group),
}

/// Declares an element whose attributes are all equations
macro_rules! numeric_element {
    ($(#[$meta:meta])* $name:ident, $tag:literal { $($field:ident => $attr:literal),* $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq, Deserialize)]
        pub struct $name {
            $(
                #[serde(rename = $attr)]
                pub $field: Option<Scalar>,
            )*
            #[serde(flatten)]
            pub common: Presentation,
        }

        impl BuildElement for $name {
            fn tag(&self) -> &'static str {
                $tag
            }

            fn presentation(&self) -> &Presentation {
                &self.common
            }

            fn build_attributes(
                &self,
                builder: &mut Builder<'_>,
                node: &mut Node,
            ) -> Result<(), RenderError> {
                $( builder.attribute(node, $attr, self.$field.as_ref())?; )*
                Ok(())
            }
        }
    };
}

numeric_element!(
    /// `<rect>`
    Rect, "rect" { x => "x", y => "y", width => "width", height => "height", rx => "rx", ry => "ry" }
);

numeric_element!(
    /// `<circle>`
    Circle, "circle" { cx => "cx", cy => "cy", r => "r" }
);

numeric_element!(
    /// `<ellipse>`
    Ellipse, "ellipse" { cx => "cx", cy => "cy", rx => "rx", ry => "ry" }
);

numeric_element!(
    /// `<line>`
    Line, "line" { x1 => "x1", y1 => "y1", x2 => "x2", y2 => "y2" }
);

/// `<text>` with literal content
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Text {
    pub x: Option<Scalar>,
    pub y: Option<Scalar>,
    pub dx: Option<Scalar>,
    pub dy: Option<Scalar>,
    #[serde(rename = "font-size")]
    pub font_size: Option<Scalar>,
    pub text: Option<String>,
    #[serde(flatten)]
    pub common: Presentation,
}

impl BuildElement for Text {
    fn tag(&self) -> &'static str {
        "text"
    }

    fn presentation(&self) -> &Presentation {
        &self.common
    }

    fn build_attributes(&self, builder: &mut Builder<'_>, node: &mut Node) -> Result<(), RenderError> {
        builder.attribute(node, "x", self.x.as_ref())?;
        builder.attribute(node, "y", self.y.as_ref())?;
        builder.attribute(node, "dx", self.dx.as_ref())?;
        builder.attribute(node, "dy", self.dy.as_ref())?;
        builder.attribute(node, "font-size", self.font_size.as_ref())
    }

    fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }
}

/// `<g>`
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Group {
    #[serde(default)]
    pub children: Vec<Element>,
    #[serde(flatten)]
    pub common: Presentation,
}

impl BuildElement for Group {
    fn tag(&self) -> &'static str {
        "g"
    }

    fn presentation(&self) -> &Presentation {
        &self.common
    }

    fn build_attributes(&self, _builder: &mut Builder<'_>, _node: &mut Node) -> Result<(), RenderError> {
        Ok(())
    }

    fn children(&self) -> &[Element] {
        &self.children
    }
}

/// `<polygon>`; points are `[x, y]` equation pairs
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Polygon {
    #[serde(default)]
    pub points: Vec<[Scalar; 2]>,
    #[serde(flatten)]
    pub common: Presentation,
}

/// `<polyline>`; points are `[x, y]` equation pairs
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Polyline {
    #[serde(default)]
    pub points: Vec<[Scalar; 2]>,
    #[serde(flatten)]
    pub common: Presentation,
}

impl BuildElement for Polygon {
    fn tag(&self) -> &'static str {
        "polygon"
    }

    fn presentation(&self) -> &Presentation {
        &self.common
    }

    fn build_attributes(&self, builder: &mut Builder<'_>, node: &mut Node) -> Result<(), RenderError> {
        build_points(builder, node, self.tag(), &self.points)
    }
}

impl BuildElement for Polyline {
    fn tag(&self) -> &'static str {
        "polyline"
    }

    fn presentation(&self) -> &Presentation {
        &self.common
    }

    fn build_attributes(&self, builder: &mut Builder<'_>, node: &mut Node) -> Result<(), RenderError> {
        build_points(builder, node, self.tag(), &self.points)
    }
}

fn eval_point(builder: &mut Builder<'_>, [x, y]: &[Scalar; 2]) -> Result<DVec2, EvalError> {
    Ok(dvec2(builder.eval_scalar(x)?, builder.eval_scalar(y)?))
}

/// Evaluate every coordinate; one failure leaves `points` unset
fn build_points(
    builder: &mut Builder<'_>,
    node: &mut Node,
    element: &str,
    points: &[[Scalar; 2]],
) -> Result<(), RenderError> {
    if points.is_empty() {
        return Ok(());
    }

    let mut evaluated: Vec<DVec2> = Vec::with_capacity(points.len());
    for point in points {
        match eval_point(builder, point) {
            Ok(p) => evaluated.push(p),
            Err(e) => return builder.skip_eval(element, "points", e),
        }
    }

    let text = evaluated
        .iter()
        .map(|p| format!("{},{}", format_number(p.x), format_number(p.y)))
        .collect::<Vec<_>>()
        .join(" ");
    node.set("points", text);
    Ok(())
}

/// `<path>`; `d` is a list of command segments
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Path {
    #[serde(default)]
    pub d: Vec<PathSegment>,
    #[serde(flatten)]
    pub common: Presentation,
}

impl BuildElement for Path {
    fn tag(&self) -> &'static str {
        "path"
    }

    fn presentation(&self) -> &Presentation {
        &self.common
    }

    fn build_attributes(&self, builder: &mut Builder<'_>, node: &mut Node) -> Result<(), RenderError> {
        if self.d.is_empty() {
            return Ok(());
        }

        let mut segments = Vec::with_capacity(self.d.len());
        for (index, segment) in self.d.iter().enumerate() {
            let cmd = match segment.command() {
                Ok(cmd) => cmd,
                Err(source) => {
                    let message = source.to_string();
                    return builder.skip(
                        self.tag(),
                        "d",
                        message,
                        RenderError::Path { index, source },
                    );
                }
            };

            let mut args = Vec::with_capacity(segment.args.len());
            for arg in &segment.args {
                match builder.eval_scalar(arg) {
                    Ok(n) => args.push(n),
                    Err(e) => return builder.skip_eval(self.tag(), "d", e),
                }
            }
            segments.push((cmd, args));
        }

        node.set("d", format_path(&segments));
        Ok(())
    }
}

/// Build an element and its subtree
pub fn build_node(builder: &mut Builder<'_>, element: &Element) -> Result<Node, RenderError> {
    let mut node = Node::new(element.tag());
    let presentation = element.presentation();

    presentation.build_identity(&mut node);
    element.build_attributes(builder, &mut node)?;
    presentation.build_style(builder, &mut node)?;

    node.text = element.text().map(str::to_string);
    for child in element.children() {
        node.children.push(build_node(builder, child)?);
    }
    Ok(node)
}
