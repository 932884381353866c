//! JSON document model and SVG builder
//!
//! A document declares named equations and a tree of SVG elements whose
//! numeric attributes are equations over those names. Building a document
//! evaluates every attribute with one shared [`Evaluator`], so each formula
//! variable is resolved at most once per render.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;

use serde::Deserialize;

use crate::errors::{EvalError, RenderError};
use crate::eval::Evaluator;
use crate::log::debug;
use crate::types::{EvalOptions, Variable, VariableValue, Variables, format_number};

pub mod elements;
pub mod path;
pub mod svg;

pub use elements::{BuildElement, Element, Presentation};
pub use path::{PathError, PathSegment};
pub use svg::Node;

/// Names seeded from the viewBox width and height
pub const VIEWBOX_WIDTH: &str = "vbw";
pub const VIEWBOX_HEIGHT: &str = "vbh";

// ============================================================================
// Document model
// ============================================================================

/// An attribute value: a plain number, or an equation to evaluate
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Number(f64),
    Text(String),
}

impl From<Scalar> for VariableValue {
    fn from(s: Scalar) -> Self {
        match s {
            Scalar::Number(n) => VariableValue::Number(n),
            Scalar::Text(t) => VariableValue::Formula(t),
        }
    }
}

/// One entry of the `equations` section
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum EquationEntry {
    Full {
        #[serde(default)]
        value: Option<Scalar>,
        #[serde(default)]
        disabled: bool,
        #[serde(default)]
        comment: Option<String>,
    },
    Bare(Scalar),
}

impl From<EquationEntry> for Variable {
    fn from(entry: EquationEntry) -> Self {
        match entry {
            EquationEntry::Full {
                value,
                disabled,
                comment,
            } => Variable {
                value: value.map(VariableValue::from),
                disabled,
                comment,
            },
            EquationEntry::Bare(value) => Variable {
                value: Some(value.into()),
                ..Variable::default()
            },
        }
    }
}

/// `viewBox` as text (`"0 0 100 50"`) or as four equations
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ViewBox {
    Text(String),
    Values(Vec<Scalar>),
}

impl ViewBox {
    fn values(&self) -> Vec<Scalar> {
        match self {
            ViewBox::Text(text) => text
                .split(|c: char| c.is_whitespace() || c == ',')
                .filter(|s| !s.is_empty())
                .map(|s| Scalar::Text(s.to_string()))
                .collect(),
            ViewBox::Values(values) => values.clone(),
        }
    }
}

/// The root `<svg>` element
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SvgRoot {
    #[serde(rename = "viewBox")]
    pub view_box: Option<ViewBox>,
    pub width: Option<Scalar>,
    pub height: Option<Scalar>,
    #[serde(default)]
    pub children: Vec<Element>,
    #[serde(flatten)]
    pub common: Presentation,
}

/// A complete document
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Document {
    #[serde(default)]
    pub equations: BTreeMap<String, EquationEntry>,
    #[serde(default)]
    pub svg: SvgRoot,
}

impl Document {
    pub fn from_json(source: &str) -> Result<Self, RenderError> {
        Ok(serde_json::from_str(source)?)
    }

    /// The variable table declared by the `equations` section
    pub fn variables(&self) -> Variables {
        self.equations
            .iter()
            .map(|(name, entry)| (name.clone(), Variable::from(entry.clone())))
            .collect()
    }
}

// ============================================================================
// Rendering
// ============================================================================

/// Rendering settings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderOptions {
    pub eval: EvalOptions,
    /// Fail on the first attribute that cannot be evaluated
    pub strict: bool,
    /// Indent nested elements by this many spaces
    pub indent: Option<usize>,
}

/// An attribute left unset because it could not be evaluated
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeDiagnostic {
    pub element: String,
    pub attribute: String,
    pub message: String,
}

impl fmt::Display for AttributeDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}> {}: {}", self.element, self.attribute, self.message)
    }
}

/// Rendered markup plus every skipped attribute
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    pub svg: String,
    pub diagnostics: Vec<AttributeDiagnostic>,
}

impl Rendered {
    /// Distinct diagnostic messages in first-seen order
    pub fn messages(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.diagnostics
            .iter()
            .map(|d| d.to_string())
            .filter(|m| seen.insert(m.clone()))
            .collect()
    }
}

/// Evaluates attributes and records the ones it has to skip
pub struct Builder<'v> {
    evaluator: Evaluator<'v>,
    strict: bool,
    diagnostics: Vec<AttributeDiagnostic>,
}

impl<'v> Builder<'v> {
    pub fn new(variables: &'v Variables, options: &RenderOptions) -> Self {
        Self::with_cache(variables, options, HashMap::new())
    }

    pub fn with_cache(
        variables: &'v Variables,
        options: &RenderOptions,
        cache: HashMap<String, f64>,
    ) -> Self {
        Self {
            evaluator: Evaluator::with_cache(variables, options.eval, cache),
            strict: options.strict,
            diagnostics: Vec::new(),
        }
    }

    pub fn evaluator(&self) -> &Evaluator<'v> {
        &self.evaluator
    }

    pub fn into_diagnostics(self) -> Vec<AttributeDiagnostic> {
        self.diagnostics
    }

    /// Memoized values and recorded diagnostics
    pub fn into_parts(self) -> (HashMap<String, f64>, Vec<AttributeDiagnostic>) {
        (self.evaluator.into_cache(), self.diagnostics)
    }

    /// Evaluate one value without recording failures
    pub fn eval_scalar(&mut self, value: &Scalar) -> Result<f64, EvalError> {
        match value {
            Scalar::Number(n) if n.is_finite() => Ok(*n),
            Scalar::Number(n) => Err(EvalError::NonFinite {
                expression: n.to_string(),
            }),
            Scalar::Text(text) => self.evaluator.evaluate(text),
        }
    }

    /// Evaluate `value` and set it on `node`, or skip the attribute
    pub fn attribute(
        &mut self,
        node: &mut Node,
        name: &'static str,
        value: Option<&Scalar>,
    ) -> Result<(), RenderError> {
        let Some(value) = value else {
            return Ok(());
        };
        match self.eval_scalar(value) {
            Ok(n) => {
                node.set(name, format_number(n));
                Ok(())
            }
            Err(e) => self.skip_eval(node.tag, name, e),
        }
    }

    /// Skip an attribute whose evaluation failed
    pub fn skip_eval(
        &mut self,
        element: &str,
        attribute: &str,
        error: EvalError,
    ) -> Result<(), RenderError> {
        let message = error.to_string();
        self.skip(
            element,
            attribute,
            message,
            RenderError::Attribute {
                element: element.to_string(),
                attribute: attribute.to_string(),
                source: error,
            },
        )
    }

    /// Record a skipped attribute, or fail with `error` in strict mode
    pub fn skip(
        &mut self,
        element: &str,
        attribute: &str,
        message: String,
        error: RenderError,
    ) -> Result<(), RenderError> {
        if self.strict {
            return Err(error);
        }
        debug!(element, attribute, message = %message, "skipping attribute");
        self.diagnostics.push(AttributeDiagnostic {
            element: element.to_string(),
            attribute: attribute.to_string(),
            message,
        });
        Ok(())
    }

    /// Evaluate the four viewBox numbers, or skip the attribute
    fn view_box(&mut self, view_box: Option<&ViewBox>) -> Result<Option<[f64; 4]>, RenderError> {
        let Some(view_box) = view_box else {
            return Ok(None);
        };

        let values = view_box.values();
        if values.len() != 4 {
            let error = RenderError::ViewBox {
                found: values.len(),
            };
            self.skip("svg", "viewBox", error.to_string(), error)?;
            return Ok(None);
        }

        let mut numbers = [0.0; 4];
        for (slot, value) in numbers.iter_mut().zip(&values) {
            match self.eval_scalar(value) {
                Ok(n) => *slot = n,
                Err(e) => {
                    self.skip_eval("svg", "viewBox", e)?;
                    return Ok(None);
                }
            }
        }
        Ok(Some(numbers))
    }

    fn build_root(&mut self, root: &SvgRoot, view_box: Option<[f64; 4]>) -> Result<Node, RenderError> {
        let mut node = Node::new("svg");
        node.set("xmlns", svg::SVG_NS);
        root.common.build_identity(&mut node);

        if let Some(numbers) = view_box {
            let text = numbers.map(format_number).join(" ");
            node.set("viewBox", text);
        }
        self.attribute(&mut node, "width", root.width.as_ref())?;
        self.attribute(&mut node, "height", root.height.as_ref())?;
        root.common.build_style(self, &mut node)?;

        for child in &root.children {
            node.children.push(elements::build_node(self, child)?);
        }
        Ok(node)
    }
}

/// Render a parsed document to SVG markup
/// Result of evaluating the viewBox ahead of the element tree
struct ViewBoxPass {
    variables: Variables,
    view_box: Option<[f64; 4]>,
    cache: HashMap<String, f64>,
    diagnostics: Vec<AttributeDiagnostic>,
}

/// Evaluate the viewBox against the declared equations and seed `vbw`/`vbh`.
///
/// Seeding only adds names that were undefined during the pass, so every
/// memoized value stays valid for the element tree.
fn view_box_pass(document: &Document, options: &RenderOptions) -> Result<ViewBoxPass, RenderError> {
    let mut variables = document.variables();

    let (view_box, cache, diagnostics) = {
        let mut builder = Builder::new(&variables, options);
        let view_box = builder.view_box(document.svg.view_box.as_ref())?;
        let (cache, diagnostics) = builder.into_parts();
        (view_box, cache, diagnostics)
    };

    if let Some([_, _, width, height]) = view_box {
        variables
            .entry(VIEWBOX_WIDTH.to_string())
            .or_insert_with(|| Variable::number(width));
        variables
            .entry(VIEWBOX_HEIGHT.to_string())
            .or_insert_with(|| Variable::number(height));
    }

    Ok(ViewBoxPass {
        variables,
        view_box,
        cache,
        diagnostics,
    })
}

pub fn render_document(document: &Document, options: &RenderOptions) -> Result<Rendered, RenderError> {
    let ViewBoxPass {
        variables,
        view_box,
        cache,
        mut diagnostics,
    } = view_box_pass(document, options)?;

    let mut builder = Builder::with_cache(&variables, options, cache);
    let root = builder.build_root(&document.svg, view_box)?;
    diagnostics.extend(builder.into_diagnostics());

    let svg = svg::to_string(&root, options.indent)?;
    Ok(Rendered { svg, diagnostics })
}
