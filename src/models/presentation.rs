// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Presentations: ordered slides of free-form elements.
//!
//! Elements are positioned in percent of the slide and painted by `z_index`,
//! ties broken by array order.

use super::content::{ElementContent, ElementKind};
use super::unique_id;
use crate::error::{StudioError, StudioResult};
use crate::util::geometry::{self, Alignment, Frame, FramePatch, Stacked, ZMove};
use serde::{Deserialize, Serialize};

/// Current on-disk format version.
pub const PRESENTATION_VERSION: u32 = 1;

fn default_version() -> u32 {
    PRESENTATION_VERSION
}

fn default_background() -> String {
    "#000000".to_string()
}

/// A positioned element on a slide.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlideElement {
    pub id: String,
    #[serde(flatten)]
    pub frame: Frame,
    #[serde(default)]
    pub z_index: i32,
    #[serde(default)]
    pub locked: bool,
    #[serde(flatten)]
    pub content: ElementContent,
}

impl Stacked for SlideElement {
    fn id(&self) -> &str {
        &self.id
    }

    fn z_index(&self) -> i32 {
        self.z_index
    }

    fn set_z_index(&mut self, z_index: i32) {
        self.z_index = z_index;
    }
}

/// Default placement of a freshly inserted element.
fn default_frame(kind: ElementKind) -> Frame {
    match kind {
        ElementKind::Text => Frame::new(10.0, 40.0, 80.0, 20.0),
        ElementKind::Image => Frame::new(25.0, 25.0, 50.0, 50.0),
        ElementKind::Shape => Frame::new(35.0, 35.0, 30.0, 30.0),
    }
}

/// One page of a presentation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Slide {
    pub id: String,
    #[serde(default = "default_background")]
    pub background_color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_image: Option<String>,
    #[serde(default)]
    pub elements: Vec<SlideElement>,
}

impl Slide {
    pub fn blank(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            background_color: default_background(),
            background_image: None,
            elements: Vec::new(),
        }
    }

    pub fn element(&self, id: &str) -> Option<&SlideElement> {
        self.elements.iter().find(|e| e.id == id)
    }

    fn element_mut(&mut self, id: &str) -> StudioResult<&mut SlideElement> {
        self.elements
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or_else(|| StudioError::not_found("element", id))
    }

    /// Elements in paint order, bottom first.
    pub fn paint_order(&self) -> Vec<&SlideElement> {
        geometry::paint_order(&self.elements)
            .into_iter()
            .map(|i| &self.elements[i])
            .collect()
    }
}

/// An ordered collection of slides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Presentation {
    pub id: String,
    pub name: String,
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub slides: Vec<Slide>,
}

impl Presentation {
    /// Create a presentation holding a single blank slide.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            version: PRESENTATION_VERSION,
            slides: vec![Slide::blank("slide-1")],
        }
    }

    pub fn slide(&self, id: &str) -> Option<&Slide> {
        self.slides.iter().find(|s| s.id == id)
    }

    fn slide_index(&self, id: &str) -> StudioResult<usize> {
        self.slides
            .iter()
            .position(|s| s.id == id)
            .ok_or_else(|| StudioError::not_found("slide", id))
    }
}

/// A presentation being edited, with the current slide and element selection.
#[derive(Debug, Clone, PartialEq)]
pub struct SlideDeck {
    presentation: Presentation,
    current: usize,
    selected: Option<String>,
}

impl SlideDeck {
    /// Open a presentation for editing. An empty slide list gets one blank slide.
    pub fn new(mut presentation: Presentation) -> Self {
        if presentation.slides.is_empty() {
            presentation.slides.push(Slide::blank("slide-1"));
        }
        Self {
            presentation,
            current: 0,
            selected: None,
        }
    }

    pub fn presentation(&self) -> &Presentation {
        &self.presentation
    }

    pub fn current_slide(&self) -> &Slide {
        &self.presentation.slides[self.current]
    }

    fn current_slide_mut(&mut self) -> &mut Slide {
        &mut self.presentation.slides[self.current]
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn element(&self, id: &str) -> Option<&SlideElement> {
        self.current_slide().element(id)
    }

    /// Replace the presentation, e.g. after undo. Keeps the current slide
    /// index in bounds and drops a selection that no longer exists.
    pub fn restore(&mut self, presentation: Presentation) {
        self.presentation = presentation;
        if self.presentation.slides.is_empty() {
            self.presentation.slides.push(Slide::blank("slide-1"));
        }
        self.current = self.current.min(self.presentation.slides.len() - 1);
        if let Some(id) = &self.selected {
            if self.current_slide().element(id).is_none() {
                self.selected = None;
            }
        }
    }

    pub fn select_slide(&mut self, id: &str) -> StudioResult<()> {
        self.current = self.presentation.slide_index(id)?;
        self.selected = None;
        Ok(())
    }

    pub fn select_element(&mut self, id: &str) -> StudioResult<()> {
        if self.element(id).is_none() {
            return Err(StudioError::not_found("element", id));
        }
        self.selected = Some(id.to_string());
        Ok(())
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    /// Insert a blank slide after the current one and make it current.
    pub fn add_slide(&mut self) -> String {
        let id = unique_id("slide", |c| self.presentation.slide(c).is_some());
        self.current += 1;
        self.presentation
            .slides
            .insert(self.current, Slide::blank(id.clone()));
        self.selected = None;
        log::info!(
            "Added slide {}, total: {}",
            id,
            self.presentation.slides.len()
        );
        id
    }

    /// Remove a slide. The last remaining slide cannot be removed.
    pub fn remove_slide(&mut self, id: &str) -> StudioResult<()> {
        let idx = self.presentation.slide_index(id)?;
        if self.presentation.slides.len() == 1 {
            return Err(StudioError::validation(
                "a presentation needs at least one slide",
            ));
        }
        self.presentation.slides.remove(idx);
        if self.current >= idx && self.current > 0 {
            self.current -= 1;
        }
        self.selected = None;
        Ok(())
    }

    /// Copy a slide (elements included) right after the original.
    pub fn duplicate_slide(&mut self, id: &str) -> StudioResult<String> {
        let idx = self.presentation.slide_index(id)?;
        let new_id = unique_id("slide", |c| self.presentation.slide(c).is_some());
        let mut copy = self.presentation.slides[idx].clone();
        copy.id = new_id.clone();
        self.presentation.slides.insert(idx + 1, copy);
        self.current = idx + 1;
        self.selected = None;
        Ok(new_id)
    }

    /// Move a slide to `to` (clamped to the end of the list).
    pub fn move_slide(&mut self, id: &str, to: usize) -> StudioResult<()> {
        let idx = self.presentation.slide_index(id)?;
        let current_id = self.current_slide().id.clone();
        let slide = self.presentation.slides.remove(idx);
        let to = to.min(self.presentation.slides.len());
        self.presentation.slides.insert(to, slide);
        self.current = self.presentation.slide_index(&current_id)?;
        Ok(())
    }

    pub fn set_background(
        &mut self,
        slide_id: &str,
        color: &str,
        image: Option<String>,
    ) -> StudioResult<()> {
        let idx = self.presentation.slide_index(slide_id)?;
        let slide = &mut self.presentation.slides[idx];
        slide.background_color = color.to_string();
        slide.background_image = image;
        Ok(())
    }

    /// Add an element of `kind` on top of the current slide and select it.
    pub fn add_element(&mut self, kind: ElementKind) -> String {
        let slide = self.current_slide();
        let id = unique_id("element", |c| slide.element(c).is_some());
        let z_index = geometry::next_z_index(&slide.elements);
        self.current_slide_mut().elements.push(SlideElement {
            id: id.clone(),
            frame: default_frame(kind),
            z_index,
            locked: false,
            content: ElementContent::placeholder(kind),
        });
        self.selected = Some(id.clone());
        log::info!("Added {:?} element {}", kind, id);
        id
    }

    pub fn remove_element(&mut self, id: &str) -> StudioResult<SlideElement> {
        let slide = self.current_slide_mut();
        let idx = slide
            .elements
            .iter()
            .position(|e| e.id == id)
            .ok_or_else(|| StudioError::not_found("element", id))?;
        let removed = slide.elements.remove(idx);
        if self.selected.as_deref() == Some(id) {
            self.selected = None;
        }
        Ok(removed)
    }

    /// Overwrite geometry fields present in `patch`. No range checks.
    pub fn update_element_geometry(&mut self, id: &str, patch: FramePatch) -> StudioResult<()> {
        let element = self.current_slide_mut().element_mut(id)?;
        element.frame = element.frame.apply(patch);
        Ok(())
    }

    pub fn set_element_content(&mut self, id: &str, content: ElementContent) -> StudioResult<()> {
        self.current_slide_mut().element_mut(id)?.content = content;
        Ok(())
    }

    pub fn set_locked(&mut self, id: &str, locked: bool) -> StudioResult<()> {
        self.current_slide_mut().element_mut(id)?.locked = locked;
        Ok(())
    }

    /// Copy an element, shifted by `offset_pct` on both axes, on top of the
    /// stack. The copy is unlocked and selected.
    pub fn duplicate_element(&mut self, id: &str, offset_pct: f64) -> StudioResult<String> {
        let slide = self.current_slide();
        let source = slide
            .element(id)
            .ok_or_else(|| StudioError::not_found("element", id))?;
        let new_id = unique_id("element", |c| slide.element(c).is_some());
        let copy = SlideElement {
            id: new_id.clone(),
            frame: source.frame.translate(offset_pct, offset_pct),
            z_index: geometry::next_z_index(&slide.elements),
            locked: false,
            content: source.content.clone(),
        };
        self.current_slide_mut().elements.push(copy);
        self.selected = Some(new_id.clone());
        log::info!("Duplicated element {} as {}", id, new_id);
        Ok(new_id)
    }

    /// Snap an element against the slide edges.
    pub fn align_element(&mut self, id: &str, alignment: Alignment) -> StudioResult<()> {
        let element = self.current_slide_mut().element_mut(id)?;
        element.frame = geometry::align(element.frame, alignment);
        Ok(())
    }

    /// Apply a z-order move among the current slide's elements.
    pub fn restack_element(&mut self, id: &str, movement: ZMove) -> StudioResult<bool> {
        if self.element(id).is_none() {
            return Err(StudioError::not_found("element", id));
        }
        Ok(geometry::restack(
            &mut self.current_slide_mut().elements,
            id,
            movement,
        ))
    }
}
