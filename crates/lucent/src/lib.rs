//! Lucent - layout and rendering of analysis diagrams.
//!
//! A [`descriptor::DiagramDescriptor`] names a diagram kind and carries its
//! payload. [`DiagramRenderer`] picks the layout path from the kind, runs the
//! matching engine and hands back an inert [`draw::Scene`] (or the payload
//! itself for passthrough kinds). Nothing here touches a drawing surface;
//! [`export`] turns a finished scene into SVG for callers that want one.

pub mod config;
pub mod descriptor;
pub mod export;
pub mod layout;
pub mod scene;
pub mod structure;

mod error;

pub use lucent_core::{color, draw, geometry};

pub use error::{FailureKind, RenderFailure};
pub use layout::{EngineBuilder, Engines};

use std::{
    any::Any,
    panic::{self, AssertUnwindSafe},
    sync::{Arc, atomic::AtomicBool},
};

use log::{debug, error, info, warn};

use config::{AppConfig, ConfigError};
use descriptor::{ChartConfig, DiagramDescriptor, DiagramKind, require};
use draw::Scene;
use export::{Exporter, svg::Svg};
use geometry::Size;
use scene::{SceneBuilder, Theme};
use structure::{Hierarchy, Network};

/// Per-call overrides for a render.
#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    size: Option<Size>,
    cancel: Option<Arc<AtomicBool>>,
}

impl RenderOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the canvas size given by the descriptor and configuration.
    pub fn with_size(mut self, size: Size) -> Self {
        self.size = Some(size);
        self
    }

    /// Installs a flag that abandons a running force simulation once raised.
    pub fn with_cancel(mut self, cancel: Arc<AtomicBool>) -> Self {
        self.cancel = Some(cancel);
        self
    }
}

/// What a successful render produced.
#[derive(Debug, Clone, PartialEq)]
pub enum Rendered {
    /// A laid-out diagram ready for a drawing surface.
    Scene(Scene),
    /// A chart payload handed on unmodified to a charting collaborator.
    Chart(ChartConfig),
    /// Embedded markup passed through verbatim.
    Embedded(String),
}

impl Rendered {
    /// Returns the scene, if this render produced one.
    pub fn scene(&self) -> Option<&Scene> {
        match self {
            Self::Scene(scene) => Some(scene),
            _ => None,
        }
    }
}

/// A non-fatal condition noticed while rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderWarning {
    /// The force simulation hit its tick cap; positions are the last computed.
    LayoutDidNotConverge { ticks: usize },
}

/// The result of rendering one descriptor.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderOutput {
    title: String,
    description: String,
    content: Rendered,
    warnings: Vec<RenderWarning>,
}

impl RenderOutput {
    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn content(&self) -> &Rendered {
        &self.content
    }

    pub fn into_content(self) -> Rendered {
        self.content
    }

    pub fn warnings(&self) -> &[RenderWarning] {
        &self.warnings
    }
}

/// A failed render together with the scene that stands in for it.
#[derive(Debug, Clone, PartialEq)]
pub struct Placeholder {
    failure: RenderFailure,
    scene: Scene,
}

impl Placeholder {
    pub fn failure(&self) -> &RenderFailure {
        &self.failure
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }
}

/// Dispatches descriptors to the layout engines and builds their scenes.
///
/// A renderer holds configuration only. It is `Send + Sync`, and
/// independent descriptors may be rendered from different threads at once.
///
/// # Examples
///
/// ```rust
/// use lucent::{DiagramRenderer, Rendered, descriptor::DiagramDescriptor};
///
/// let json = r#"{
///     "kind": "tree",
///     "title": "Pipeline",
///     "treeData": { "name": "A", "children": [{ "name": "B" }] }
/// }"#;
/// let descriptor = DiagramDescriptor::from_json(json).unwrap();
///
/// let renderer = DiagramRenderer::default();
/// let output = renderer.render(&descriptor).unwrap();
/// assert!(matches!(output.content(), Rendered::Scene(_)));
/// ```
#[derive(Debug, Clone)]
pub struct DiagramRenderer {
    engines: Engines,
    scene_builder: SceneBuilder,
    exporter: Svg,
    default_size: Size,
    strict_convergence: bool,
}

impl DiagramRenderer {
    /// Creates a renderer from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] for an out-of-range layout parameter or an
    /// unparseable style color.
    pub fn new(config: AppConfig) -> Result<Self, ConfigError> {
        let layout = config.layout();
        layout.validate()?;

        let theme = Theme::from_config(config.style(), layout.partition.label_min_width)?;
        let exporter = export::svg::SvgBuilder::new()
            .with_arrow_fill(theme.arrow_fill())
            .build();

        debug!(
            width = layout.width,
            height = layout.height,
            strict_convergence = layout.force.strict_convergence;
            "Renderer configured"
        );

        Ok(Self {
            engines: EngineBuilder::from_config(layout).build(),
            scene_builder: SceneBuilder::new(theme),
            exporter,
            default_size: Size::new(layout.width, layout.height),
            strict_convergence: layout.force.strict_convergence,
        })
    }

    /// Renders one descriptor with default options.
    ///
    /// # Errors
    ///
    /// See [`DiagramRenderer::render_with`].
    pub fn render(&self, descriptor: &DiagramDescriptor) -> Result<RenderOutput, RenderFailure> {
        self.render_with(descriptor, &RenderOptions::default())
    }

    /// Renders one descriptor.
    ///
    /// # Errors
    ///
    /// - [`RenderFailure::UnsupportedDiagramKind`] for an unknown `kind`.
    /// - [`RenderFailure::MalformedDescriptor`] for a missing payload or
    ///   structurally invalid input. No partial scene is produced.
    /// - [`RenderFailure::Cancelled`] if the cancellation flag was raised.
    /// - [`RenderFailure::LayoutDidNotConverge`] if the force simulation hit
    ///   its tick cap and strict convergence is configured.
    pub fn render_with(
        &self,
        descriptor: &DiagramDescriptor,
        options: &RenderOptions,
    ) -> Result<RenderOutput, RenderFailure> {
        let kind = descriptor.diagram_kind()?;
        info!(kind:% = kind, title = descriptor.title.as_str(); "Rendering diagram");
        descriptor.warn_foreign_payloads(kind);

        let mut warnings = Vec::new();
        let content = match kind {
            DiagramKind::Chart => {
                let chart = require(descriptor.chart_config.as_ref(), kind)?;
                let chart_type = chart.validate()?;
                debug!(chart_type:% = chart_type, series = chart.series.len(); "Chart passed through");
                Rendered::Chart(chart.clone())
            }
            DiagramKind::Embedded => {
                let markup = require(descriptor.embedded_markup.as_ref(), kind)?;
                debug!(length = markup.len(); "Embedded markup passed through");
                Rendered::Embedded(markup.clone())
            }
            _ => {
                let size = self.resolve_size(descriptor, options)?;
                Rendered::Scene(self.build_scene(descriptor, kind, size, options, &mut warnings)?)
            }
        };

        Ok(RenderOutput {
            title: descriptor.title.clone(),
            description: descriptor.description.clone(),
            content,
            warnings,
        })
    }

    /// Renders every descriptor in isolation.
    ///
    /// One result per descriptor, in input order. A panic inside a layout is
    /// caught and reported as [`RenderFailure::Internal`] for that descriptor
    /// alone.
    pub fn render_all(
        &self,
        descriptors: &[DiagramDescriptor],
    ) -> Vec<Result<RenderOutput, RenderFailure>> {
        info!(count = descriptors.len(); "Rendering diagram batch");
        descriptors
            .iter()
            .map(|descriptor| self.render_isolated(descriptor))
            .collect()
    }

    /// Renders one descriptor, converting a panic inside its layout into
    /// [`RenderFailure::Internal`].
    ///
    /// # Errors
    ///
    /// Everything [`DiagramRenderer::render`] returns, plus
    /// [`RenderFailure::Internal`] for a caught panic.
    pub fn render_isolated(
        &self,
        descriptor: &DiagramDescriptor,
    ) -> Result<RenderOutput, RenderFailure> {
        panic::catch_unwind(AssertUnwindSafe(|| self.render(descriptor))).unwrap_or_else(
            |payload| {
                let message = panic_message(payload.as_ref());
                error!(kind = descriptor.kind.as_str(), message = message.as_str(); "Layout panicked");
                Err(RenderFailure::Internal(message))
            },
        )
    }

    /// Renders one descriptor, substituting the error placeholder on failure.
    ///
    /// # Errors
    ///
    /// Returns a [`Placeholder`] carrying the failure and a placeholder scene
    /// sized like the diagram would have been.
    pub fn render_or_placeholder(
        &self,
        descriptor: &DiagramDescriptor,
    ) -> Result<RenderOutput, Placeholder> {
        self.render(descriptor).map_err(|failure| Placeholder {
            scene: self.placeholder(descriptor, &failure),
            failure,
        })
    }

    /// Builds the error placeholder for a failed descriptor, sized like the
    /// diagram would have been.
    pub fn placeholder(&self, descriptor: &DiagramDescriptor, failure: &RenderFailure) -> Scene {
        let size = descriptor
            .canvas_size(self.default_size)
            .unwrap_or(self.default_size);
        self.placeholder_scene(size, failure)
    }

    /// Builds the error placeholder at the configured default size, for
    /// input that never became a descriptor.
    pub fn default_placeholder(&self, failure: &RenderFailure) -> Scene {
        self.placeholder_scene(self.default_size, failure)
    }

    fn placeholder_scene(&self, size: Size, failure: &RenderFailure) -> Scene {
        warn!(failure:% = failure; "Rendering error placeholder");
        self.scene_builder.error_placeholder(size, &failure.message())
    }

    /// Renders a scene-producing descriptor straight to an SVG document.
    ///
    /// # Errors
    ///
    /// Everything [`DiagramRenderer::render`] returns, plus
    /// [`RenderFailure::MalformedDescriptor`] for chart and embedded kinds,
    /// which have no scene.
    pub fn render_svg(&self, descriptor: &DiagramDescriptor) -> Result<String, RenderFailure> {
        match self.render(descriptor)?.into_content() {
            Rendered::Scene(scene) => self.export_svg(&scene),
            Rendered::Chart(_) | Rendered::Embedded(_) => Err(RenderFailure::malformed(format!(
                "a {} diagram has no scene to export",
                descriptor.kind
            ))),
        }
    }

    /// Serializes a finished scene, such as a placeholder, to SVG.
    ///
    /// # Errors
    ///
    /// Returns [`RenderFailure::Internal`] if the scene cannot be exported.
    pub fn export_svg(&self, scene: &Scene) -> Result<String, RenderFailure> {
        self.exporter
            .export_scene(scene)
            .map_err(|err| RenderFailure::Internal(err.to_string()))
    }

    fn resolve_size(
        &self,
        descriptor: &DiagramDescriptor,
        options: &RenderOptions,
    ) -> Result<Size, RenderFailure> {
        match options.size {
            Some(size) if size.is_drawable() => Ok(size),
            Some(size) => Err(RenderFailure::malformed(format!(
                "canvas size {}x{} must be positive and finite",
                size.width(),
                size.height()
            ))),
            None => descriptor.canvas_size(self.default_size),
        }
    }

    fn build_scene(
        &self,
        descriptor: &DiagramDescriptor,
        kind: DiagramKind,
        size: Size,
        options: &RenderOptions,
        warnings: &mut Vec<RenderWarning>,
    ) -> Result<Scene, RenderFailure> {
        let scene = match kind {
            DiagramKind::Tree => {
                let root = require(descriptor.tree_data.as_ref(), kind)?;
                let hierarchy = Hierarchy::from_root(root)?;
                let layout = self.engines.tree().calculate(&hierarchy, size)?;
                self.scene_builder.tree(&layout, size)
            }
            DiagramKind::Network => {
                let graph = require(descriptor.graph_data.as_ref(), kind)?;
                let network = Network::from_graph_data(graph)?;
                let layout =
                    self.engines
                        .force()
                        .calculate(&network, size, options.cancel.as_deref())?;

                if let Some(convergence) = layout.convergence() {
                    if !convergence.converged() {
                        let ticks = convergence.ticks();
                        if self.strict_convergence {
                            return Err(RenderFailure::LayoutDidNotConverge { ticks });
                        }
                        warnings.push(RenderWarning::LayoutDidNotConverge { ticks });
                    }
                }
                self.scene_builder.network(&layout, size)
            }
            DiagramKind::Hierarchy => {
                let root = require(descriptor.hierarchy_data.as_ref(), kind)?;
                let hierarchy = Hierarchy::from_root(root)?;
                let layout = self.engines.partition().calculate(&hierarchy, size)?;
                self.scene_builder.partition(&layout, size)
            }
            DiagramKind::Scene => {
                let config = require(descriptor.scene_config.as_ref(), kind)?;
                self.scene_builder.custom(config, size)?
            }
            DiagramKind::Chart | DiagramKind::Embedded => {
                return Err(RenderFailure::Internal(format!(
                    "{kind} diagrams do not produce a scene"
                )));
            }
        };

        info!(
            kind:% = kind,
            primitives = scene.len(),
            width = size.width(),
            height = size.height();
            "Scene built"
        );
        Ok(scene)
    }
}

impl Default for DiagramRenderer {
    fn default() -> Self {
        Self::new(AppConfig::default()).expect("default configuration is valid")
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "layout panicked".to_string()
    }
}
