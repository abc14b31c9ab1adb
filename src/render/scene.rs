// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Scene and slide composites.
//!
//! Produces draw commands for an external renderer. Frames and opacity are
//! clamped here so off-canvas staging in the model never reaches the renderer
//! as nonsense. Live sources are looked up through the resolver on every
//! call; nothing about their pixels is retained between composites.

use super::lower_third::{self, AnimationPhase, LowerThirdDescriptor};
use crate::models::content::{ElementContent, LayerContent, SourceRef};
use crate::models::presentation::Slide;
use crate::models::scene::Scene;
use crate::util::geometry::Frame;
use serde::Serialize;

/// Looks up the current frame handle of a live source.
pub trait LiveSourceResolver {
    /// Opaque handle for the source right now, or `None` when it is offline.
    fn resolve(&self, source: &SourceRef) -> Option<String>;
}

/// Resolver for contexts without live inputs (thumbnails, headless dumps).
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineSources;

impl LiveSourceResolver for OfflineSources {
    fn resolve(&self, _source: &SourceRef) -> Option<String> {
        None
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "fill", rename_all = "camelCase")]
pub enum DrawFill {
    Nothing,
    Color {
        color: String,
    },
    Image {
        path: String,
    },
    Live {
        source: SourceRef,
        handle: Option<String>,
    },
    LowerThird {
        descriptor: Box<LowerThirdDescriptor>,
    },
    Item {
        item: serde_json::Value,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DrawCommand {
    pub layer_id: String,
    pub frame: Frame,
    pub opacity: f64,
    pub fill: DrawFill,
}

/// Draw commands for the visible layers of a scene, bottom first.
pub fn compose(scene: &Scene, resolver: &dyn LiveSourceResolver) -> Vec<DrawCommand> {
    scene
        .layers
        .iter()
        .filter(|layer| layer.visible)
        .map(|layer| {
            let fill = match &layer.content {
                LayerContent::Empty => DrawFill::Nothing,
                LayerContent::StaticColor { color } => DrawFill::Color {
                    color: color.clone(),
                },
                LayerContent::StaticImage { path } => DrawFill::Image { path: path.clone() },
                LayerContent::Source { source } => DrawFill::Live {
                    source: source.clone(),
                    handle: resolver.resolve(source),
                },
                LayerContent::LowerThird { data, template } => DrawFill::LowerThird {
                    descriptor: Box::new(lower_third::render(
                        template,
                        data,
                        AnimationPhase::Shown { elapsed: 0.0 },
                    )),
                },
                LayerContent::Item { item } => DrawFill::Item { item: item.clone() },
            };
            DrawCommand {
                layer_id: layer.id.clone(),
                frame: layer.frame.clamped_for_render(),
                opacity: if layer.opacity.is_finite() {
                    layer.opacity.clamp(0.0, 1.0)
                } else {
                    1.0
                },
                fill,
            }
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementDraw {
    pub element_id: String,
    pub frame: Frame,
    pub content: ElementContent,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SlideComposite {
    pub background_color: String,
    pub background_image: Option<String>,
    pub elements: Vec<ElementDraw>,
}

/// Background plus elements of a slide in paint order.
pub fn compose_slide(slide: &Slide) -> SlideComposite {
    let elements = slide
        .paint_order()
        .into_iter()
        .map(|element| ElementDraw {
            element_id: element.id.clone(),
            frame: element.frame.clamped_for_render(),
            content: element.content.clone(),
        })
        .collect();
    SlideComposite {
        background_color: slide.background_color.clone(),
        background_image: slide.background_image.clone(),
        elements,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::content::ElementKind;
    use crate::models::lower_third::{LowerThirdData, LowerThirdTemplate};
    use crate::models::presentation::{Presentation, SlideDeck};
    use crate::models::scene::SceneGraph;
    use crate::util::geometry::FramePatch;
    use std::cell::Cell;

    struct CountingResolver {
        calls: Cell<usize>,
    }

    impl LiveSourceResolver for CountingResolver {
        fn resolve(&self, _source: &SourceRef) -> Option<String> {
            self.calls.set(self.calls.get() + 1);
            Some(format!("frame-{}", self.calls.get()))
        }
    }

    #[test]
    fn test_live_sources_resolved_every_composite() {
        let mut graph = SceneGraph::new(Scene::new("s", "S"));
        graph.add_layer(
            LayerContent::Source {
                source: SourceRef::LiveOutput,
            },
            None,
        );
        let resolver = CountingResolver {
            calls: Cell::new(0),
        };

        let first = compose(graph.scene(), &resolver);
        let second = compose(graph.scene(), &resolver);
        assert_eq!(resolver.calls.get(), 2);
        assert_ne!(first, second);
        match &second[0].fill {
            DrawFill::Live { handle, .. } => assert_eq!(handle.as_deref(), Some("frame-2")),
            other => panic!("unexpected fill {:?}", other),
        }
    }

    #[test]
    fn test_compose_skips_hidden_and_clamps() {
        let mut graph = SceneGraph::new(Scene::new("s", "S"));
        let hidden = graph.add_layer(LayerContent::Empty, None);
        let wide = graph.add_layer(
            LayerContent::lower_third(
                LowerThirdData::nameplate("A", None),
                LowerThirdTemplate::default(),
            ),
            None,
        );
        graph.set_visible(&hidden, false).unwrap();
        graph
            .update_geometry(&wide, FramePatch::size(250.0, 40.0))
            .unwrap();
        graph.set_opacity(&wide, 3.0).unwrap();

        let commands = compose(graph.scene(), &OfflineSources);
        assert_eq!(commands.len(), 1);
        assert_eq!(commands[0].layer_id, wide);
        assert_eq!(commands[0].frame.w, 100.0);
        assert_eq!(commands[0].opacity, 1.0);
        assert!(matches!(commands[0].fill, DrawFill::LowerThird { .. }));
        // the model keeps the raw value
        assert_eq!(graph.layer(&wide).unwrap().frame.w, 250.0);
    }

    #[test]
    fn test_compose_slide_paint_order() {
        let mut deck = SlideDeck::new(Presentation::new("p", "P"));
        let a = deck.add_element(ElementKind::Text);
        let b = deck.add_element(ElementKind::Shape);
        deck.restack_element(&a, crate::util::geometry::ZMove::Front)
            .unwrap();

        let composite = compose_slide(deck.current_slide());
        assert_eq!(composite.background_color, "#000000");
        assert!(composite.background_image.is_none());
        let ids: Vec<_> = composite.elements.iter().map(|e| e.element_id.clone()).collect();
        assert_eq!(ids, vec![b, a]);
    }
}
