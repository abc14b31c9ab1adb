// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Studio session state.
//!
//! [`Studio`] ties the editors to the outside world. Local state always
//! changes first; persistence and broadcast run in the background and their
//! failures come back as notifications, never as rollbacks.

use crate::config::StudioConfig;
use crate::error::{StudioError, StudioResult};
use crate::history::History;
use crate::io::broadcast::{BroadcastEvent, Broadcaster, LowerThirdCue};
use crate::io::dispatch::Dispatcher;
use crate::io::serialization;
use crate::io::store::{self, DocumentKind, DocumentStore};
use crate::models::content::LayerContent;
use crate::models::lower_third::{LowerThirdData, LowerThirdTemplate};
use crate::models::presentation::{Presentation, SlideDeck};
use crate::models::props::{self, PropItem};
use crate::models::scene::{Scene, SceneGraph};
use crate::render::lower_third::{self as lt_render, AnimationPhase, LowerThirdDescriptor};
use crate::render::scene::{self as scene_render, DrawCommand, LiveSourceResolver};
use crate::ui::canvas::{CanvasAction, CanvasSize, GestureController, PointerPos, ResizeHandle};
use crate::ui::shortcuts::{self, KeyChord, Shortcut};
use crate::util::geometry::{self, pixel_delta_to_percent, Frame, FramePatch, Point};
use std::sync::Arc;

/// Document id under which the props layer is stored.
const PROPS_DOCUMENT_ID: &str = "props-layer";

fn canvas_point(canvas: CanvasSize, pos: PointerPos) -> Point {
    Point::new(
        pixel_delta_to_percent(pos.x, canvas.width),
        pixel_delta_to_percent(pos.y, canvas.height),
    )
}

/// Edits and shortcuts wait for the pointer to come up; the graph holds an
/// uncommitted preview until then.
fn ensure_idle(gestures: &GestureController) -> StudioResult<()> {
    if gestures.is_active() {
        return Err(StudioError::GestureActive);
    }
    Ok(())
}

/// Scene graph with its undo history and canvas gestures.
#[derive(Debug, Clone)]
pub struct SceneEditor {
    graph: SceneGraph,
    history: History<Scene>,
    gestures: GestureController,
}

impl SceneEditor {
    pub fn new(scene: Scene, gestures: GestureController) -> Self {
        Self {
            history: History::new(scene.clone()),
            graph: SceneGraph::new(scene),
            gestures,
        }
    }

    pub fn graph(&self) -> &SceneGraph {
        &self.graph
    }

    pub fn history(&self) -> &History<Scene> {
        &self.history
    }

    pub fn gestures(&self) -> &GestureController {
        &self.gestures
    }

    /// Run an edit and record the result as one undo step if it changed the
    /// scene. Refused while a gesture is previewing on the canvas.
    pub fn edit<R>(
        &mut self,
        f: impl FnOnce(&mut SceneGraph) -> StudioResult<R>,
    ) -> StudioResult<R> {
        ensure_idle(&self.gestures)?;
        let result = f(&mut self.graph)?;
        self.commit();
        Ok(result)
    }

    fn commit(&mut self) {
        if self.graph.scene() != self.history.current() {
            self.history.commit(self.graph.scene().clone());
            log::info!(
                "Scene '{}' committed ({} states)",
                self.graph.scene().id,
                self.history.len()
            );
        }
    }

    /// Swap in a different scene, discarding history.
    pub fn open(&mut self, scene: Scene) {
        log::info!("Opened scene '{}'", scene.id);
        self.history.reset(scene.clone());
        self.graph = SceneGraph::new(scene);
    }

    pub fn undo(&mut self) -> bool {
        if self.gestures.is_active() {
            return false;
        }
        match self.history.undo() {
            Some(scene) => {
                let scene = scene.clone();
                self.graph.restore(scene);
                log::info!("Undo scene edit");
                true
            }
            None => false,
        }
    }

    pub fn redo(&mut self) -> bool {
        if self.gestures.is_active() {
            return false;
        }
        match self.history.redo() {
            Some(scene) => {
                let scene = scene.clone();
                self.graph.restore(scene);
                log::info!("Redo scene edit");
                true
            }
            None => false,
        }
    }

    /// Pointer-down on the canvas: select the topmost visible layer under the
    /// pointer and start dragging it.
    pub fn press(&mut self, pos: PointerPos) -> StudioResult<Option<String>> {
        let point = canvas_point(self.gestures.canvas(), pos);
        let hit = self.graph.layer_at(point).map(|l| (l.id.clone(), l.frame));
        let Some((id, frame)) = hit else {
            self.graph.clear_selection();
            return Ok(None);
        };
        self.gestures.begin_drag(&id, pos, frame)?;
        self.graph.select(&id)?;
        Ok(Some(id))
    }

    pub fn begin_resize(
        &mut self,
        id: &str,
        handle: ResizeHandle,
        pos: PointerPos,
    ) -> StudioResult<()> {
        let frame = self
            .graph
            .layer(id)
            .ok_or_else(|| StudioError::not_found("layer", id))?
            .frame;
        self.gestures.begin_resize(id, handle, pos, frame)
    }

    /// Apply the live preview without touching history.
    pub fn pointer_move(&mut self, pos: PointerPos) -> StudioResult<()> {
        if let CanvasAction::Preview { target, frame } = self.gestures.pointer_move(pos) {
            self.graph.update_geometry(&target, FramePatch::from(frame))?;
        }
        Ok(())
    }

    /// Finish the gesture; a moved layer becomes one undo step.
    pub fn pointer_up(&mut self) -> StudioResult<()> {
        if let CanvasAction::Commit { target, frame } = self.gestures.pointer_up() {
            self.graph.update_geometry(&target, FramePatch::from(frame))?;
            self.commit();
        }
        Ok(())
    }

    fn apply_shortcut(&mut self, shortcut: Shortcut) -> StudioResult<()> {
        ensure_idle(&self.gestures)?;
        match shortcut {
            Shortcut::Undo => {
                self.undo();
            }
            Shortcut::Redo => {
                self.redo();
            }
            Shortcut::Duplicate => {
                if let Some(id) = self.graph.selected().map(str::to_string) {
                    self.edit(|g| g.duplicate_layer(&id))?;
                }
            }
            Shortcut::Delete => {
                if let Some(id) = self.graph.selected().map(str::to_string) {
                    self.edit(|g| g.remove_layer(&id))?;
                }
            }
            Shortcut::Deselect => self.graph.clear_selection(),
        }
        Ok(())
    }
}

/// Slide deck with its undo history and canvas gestures.
#[derive(Debug, Clone)]
pub struct SlideEditor {
    deck: SlideDeck,
    history: History<Presentation>,
    gestures: GestureController,
    duplicate_offset_pct: f64,
}

impl SlideEditor {
    pub fn new(presentation: Presentation, gestures: GestureController, duplicate_offset_pct: f64) -> Self {
        let deck = SlideDeck::new(presentation);
        Self {
            history: History::new(deck.presentation().clone()),
            deck,
            gestures,
            duplicate_offset_pct,
        }
    }

    pub fn deck(&self) -> &SlideDeck {
        &self.deck
    }

    pub fn history(&self) -> &History<Presentation> {
        &self.history
    }

    pub fn edit<R>(
        &mut self,
        f: impl FnOnce(&mut SlideDeck) -> StudioResult<R>,
    ) -> StudioResult<R> {
        ensure_idle(&self.gestures)?;
        let result = f(&mut self.deck)?;
        self.commit();
        Ok(result)
    }

    fn commit(&mut self) {
        if self.deck.presentation() != self.history.current() {
            self.history.commit(self.deck.presentation().clone());
            log::info!(
                "Presentation '{}' committed ({} states)",
                self.deck.presentation().id,
                self.history.len()
            );
        }
    }

    /// Select a slide. Navigation is not an undo step.
    pub fn select_slide(&mut self, id: &str) -> StudioResult<()> {
        self.deck.select_slide(id)
    }

    pub fn select_element(&mut self, id: &str) -> StudioResult<()> {
        self.deck.select_element(id)
    }

    pub fn open(&mut self, presentation: Presentation) {
        log::info!("Opened presentation '{}'", presentation.id);
        self.deck = SlideDeck::new(presentation);
        self.history.reset(self.deck.presentation().clone());
    }

    pub fn undo(&mut self) -> bool {
        if self.gestures.is_active() {
            return false;
        }
        match self.history.undo() {
            Some(presentation) => {
                let presentation = presentation.clone();
                self.deck.restore(presentation);
                log::info!("Undo slide edit");
                true
            }
            None => false,
        }
    }

    pub fn redo(&mut self) -> bool {
        if self.gestures.is_active() {
            return false;
        }
        match self.history.redo() {
            Some(presentation) => {
                let presentation = presentation.clone();
                self.deck.restore(presentation);
                log::info!("Redo slide edit");
                true
            }
            None => false,
        }
    }

    /// Duplicate an element using the configured offset.
    pub fn duplicate_element(&mut self, id: &str) -> StudioResult<String> {
        let offset = self.duplicate_offset_pct;
        self.edit(|deck| deck.duplicate_element(id, offset))
    }

    fn unlocked_frame(&self, id: &str) -> StudioResult<Frame> {
        let element = self
            .deck
            .element(id)
            .ok_or_else(|| StudioError::not_found("element", id))?;
        if element.locked {
            return Err(StudioError::Locked(id.to_string()));
        }
        Ok(element.frame)
    }

    /// Pointer-down on the slide: select the topmost element under the
    /// pointer and start dragging it unless it is locked.
    pub fn press(&mut self, pos: PointerPos) -> StudioResult<Option<String>> {
        let point = canvas_point(self.gestures.canvas(), pos);
        let order = self.deck.current_slide().paint_order();
        let hit = geometry::hit_test(order.iter().map(|e| (e.frame, true)), point)
            .map(|i| order[i].id.clone());
        let Some(id) = hit else {
            self.deck.clear_selection();
            return Ok(None);
        };
        self.deck.select_element(&id)?;
        let frame = self.unlocked_frame(&id)?;
        self.gestures.begin_drag(&id, pos, frame)?;
        Ok(Some(id))
    }

    pub fn begin_resize(
        &mut self,
        id: &str,
        handle: ResizeHandle,
        pos: PointerPos,
    ) -> StudioResult<()> {
        let frame = self.unlocked_frame(id)?;
        self.gestures.begin_resize(id, handle, pos, frame)
    }

    pub fn pointer_move(&mut self, pos: PointerPos) -> StudioResult<()> {
        if let CanvasAction::Preview { target, frame } = self.gestures.pointer_move(pos) {
            self.deck
                .update_element_geometry(&target, FramePatch::from(frame))?;
        }
        Ok(())
    }

    pub fn pointer_up(&mut self) -> StudioResult<()> {
        if let CanvasAction::Commit { target, frame } = self.gestures.pointer_up() {
            self.deck
                .update_element_geometry(&target, FramePatch::from(frame))?;
            self.commit();
        }
        Ok(())
    }

    fn apply_shortcut(&mut self, shortcut: Shortcut) -> StudioResult<()> {
        ensure_idle(&self.gestures)?;
        match shortcut {
            Shortcut::Undo => {
                self.undo();
            }
            Shortcut::Redo => {
                self.redo();
            }
            Shortcut::Duplicate => {
                if let Some(id) = self.deck.selected().map(str::to_string) {
                    self.duplicate_element(&id)?;
                }
            }
            Shortcut::Delete => {
                if let Some(id) = self.deck.selected().map(str::to_string) {
                    self.edit(|deck| deck.remove_element(&id))?;
                }
            }
            Shortcut::Deselect => self.deck.clear_selection(),
        }
        Ok(())
    }
}

/// Which editor receives keyboard shortcuts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActiveEditor {
    #[default]
    Scene,
    Slides,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Error,
}

/// Transient, non-blocking message for the operator.
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
}

pub struct Studio {
    config: StudioConfig,
    store: Arc<dyn DocumentStore>,
    broadcaster: Arc<dyn Broadcaster>,
    dispatcher: Dispatcher,
    scene: SceneEditor,
    slides: SlideEditor,
    active: ActiveEditor,
    text_input_focused: bool,
    live_lower_third: Option<LowerThirdCue>,
    /// Last hidden cue and the on-air time it was hidden at, kept for its exit
    outgoing_lower_third: Option<(LowerThirdCue, f64)>,
    staged_lower_third: Option<LowerThirdCue>,
    templates: Vec<LowerThirdTemplate>,
    props: Vec<PropItem>,
    notifications: Vec<Notification>,
}

impl Studio {
    pub fn new(
        config: StudioConfig,
        store: Arc<dyn DocumentStore>,
        broadcaster: Arc<dyn Broadcaster>,
    ) -> Self {
        let gestures = GestureController::new(config.canvas.into())
            .with_min_size(config.min_size_pct);
        Self {
            scene: SceneEditor::new(Scene::new("scene-1", "Untitled Scene"), gestures.clone()),
            slides: SlideEditor::new(
                Presentation::new("presentation-1", "Untitled Presentation"),
                gestures,
                config.duplicate_offset_pct,
            ),
            config,
            store,
            broadcaster,
            dispatcher: Dispatcher::new(),
            active: ActiveEditor::default(),
            text_input_focused: false,
            live_lower_third: None,
            outgoing_lower_third: None,
            staged_lower_third: None,
            templates: vec![LowerThirdTemplate::default()],
            props: Vec::new(),
            notifications: Vec::new(),
        }
    }

    pub fn config(&self) -> &StudioConfig {
        &self.config
    }

    pub fn scene(&self) -> &SceneEditor {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut SceneEditor {
        &mut self.scene
    }

    pub fn slides(&self) -> &SlideEditor {
        &self.slides
    }

    pub fn slides_mut(&mut self) -> &mut SlideEditor {
        &mut self.slides
    }

    pub fn set_active_editor(&mut self, editor: ActiveEditor) {
        self.active = editor;
    }

    /// Track whether a text-entry control has keyboard focus.
    pub fn set_text_input_focused(&mut self, focused: bool) {
        self.text_input_focused = focused;
    }

    /// Route a key press to the active editor. Returns the shortcut that ran.
    pub fn handle_key(&mut self, chord: KeyChord) -> StudioResult<Option<Shortcut>> {
        let Some(shortcut) = shortcuts::resolve(chord, self.text_input_focused) else {
            return Ok(None);
        };
        match self.active {
            ActiveEditor::Scene => self.scene.apply_shortcut(shortcut)?,
            ActiveEditor::Slides => self.slides.apply_shortcut(shortcut)?,
        }
        Ok(Some(shortcut))
    }

    // Lower-third desk

    pub fn live_lower_third(&self) -> Option<&LowerThirdCue> {
        self.live_lower_third.as_ref()
    }

    pub fn staged_lower_third(&self) -> Option<&LowerThirdCue> {
        self.staged_lower_third.as_ref()
    }

    /// Prepare a lower third without putting it on air.
    pub fn stage_lower_third(&mut self, data: LowerThirdData, template: LowerThirdTemplate) {
        self.staged_lower_third = Some(LowerThirdCue { data, template });
    }

    pub fn show_lower_third(&mut self, data: LowerThirdData, template: LowerThirdTemplate) {
        log::info!("Lower third '{}' on air", template.id);
        let cue = LowerThirdCue { data, template };
        self.live_lower_third = Some(cue.clone());
        self.outgoing_lower_third = None;
        self.publish("show lower third", BroadcastEvent::LowerThirdLive(Some(cue)));
    }

    /// Take the live lower third off air `at` seconds after it was shown.
    /// It keeps rendering through its exit animation.
    pub fn hide_lower_third(&mut self, at: f64) {
        if let Some(cue) = self.live_lower_third.take() {
            log::info!("Lower third '{}' hidden at {:.2}s", cue.template.id, at);
            self.outgoing_lower_third = Some((cue, at.max(0.0)));
        }
        self.publish("hide lower third", BroadcastEvent::LowerThirdLive(None));
    }

    fn on_air_cue(&self, elapsed: f64) -> Option<(&LowerThirdCue, AnimationPhase)> {
        let (cue, hide_at) = match (&self.live_lower_third, &self.outgoing_lower_third) {
            (Some(cue), _) => (cue, None),
            (None, Some((cue, at))) => (cue, Some(*at)),
            (None, None) => return None,
        };
        let phase = lt_render::phase_at(&cue.template, &cue.data, elapsed, hide_at);
        Some((cue, phase))
    }

    /// Animation phase of the on-air lower third `elapsed` seconds after it
    /// was shown.
    pub fn lower_third_phase(&self, elapsed: f64) -> AnimationPhase {
        self.on_air_cue(elapsed)
            .map_or(AnimationPhase::Hidden, |(_, phase)| phase)
    }

    /// Descriptor for the live (or exiting) lower third `elapsed` seconds
    /// after it was shown.
    pub fn render_live_lower_third(&self, elapsed: f64) -> Option<LowerThirdDescriptor> {
        match self.on_air_cue(elapsed)? {
            (_, AnimationPhase::Hidden) => None,
            (cue, phase) => Some(lt_render::render(&cue.template, &cue.data, phase)),
        }
    }

    fn assign_cue(&mut self, layer_id: &str, cue: Option<LowerThirdCue>) -> StudioResult<()> {
        let cue = cue.ok_or_else(|| StudioError::validation("no lower third to assign"))?;
        let content = LayerContent::lower_third(cue.data, cue.template);
        self.scene.edit(|g| g.set_content(layer_id, content))
    }

    /// Freeze the live lower third into a scene layer.
    pub fn assign_current_lower_third(&mut self, layer_id: &str) -> StudioResult<()> {
        self.assign_cue(layer_id, self.live_lower_third.clone())
    }

    /// Freeze the staged lower third into a scene layer.
    pub fn assign_staged(&mut self, layer_id: &str) -> StudioResult<()> {
        self.assign_cue(layer_id, self.staged_lower_third.clone())
    }

    pub fn clear_layer_content(&mut self, layer_id: &str) -> StudioResult<()> {
        self.scene
            .edit(|g| g.set_content(layer_id, LayerContent::Empty))
    }

    // Template library

    pub fn templates(&self) -> &[LowerThirdTemplate] {
        &self.templates
    }

    pub fn template(&self, id: &str) -> Option<&LowerThirdTemplate> {
        self.templates.iter().find(|t| t.id == id)
    }

    /// Merge templates from pasted or file text. Imported ids replace
    /// existing ones. Malformed input leaves the library untouched.
    pub fn import_templates(&mut self, text: &str) -> StudioResult<usize> {
        let imported = match serialization::parse_templates(text) {
            Ok(imported) => imported,
            Err(err) => {
                log::warn!("Rejected template import: {}", err);
                self.notify(
                    NotificationLevel::Error,
                    format!("Template import rejected: {}", err),
                );
                return Err(err);
            }
        };
        let count = imported.len();
        for template in imported {
            match self.templates.iter_mut().find(|t| t.id == template.id) {
                Some(existing) => *existing = template,
                None => self.templates.push(template),
            }
        }
        log::info!("Imported {} template(s)", count);
        self.notify(
            NotificationLevel::Info,
            format!("Imported {} template(s)", count),
        );
        Ok(count)
    }

    /// Persist every template and tell other windows.
    pub fn save_templates(&mut self) {
        let templates = self.templates.clone();
        let store = Arc::clone(&self.store);
        let broadcaster = Arc::clone(&self.broadcaster);
        self.dispatcher.spawn("save templates", move || {
            for template in &templates {
                store::save_document(&*store, DocumentKind::Template, &template.id, template)?;
            }
            broadcaster.publish(BroadcastEvent::TemplatesChanged(templates))
        });
    }

    /// Replace the library with the stored templates.
    pub fn load_templates(&mut self) -> anyhow::Result<usize> {
        let mut templates = Vec::new();
        for id in self.store.list(DocumentKind::Template)? {
            if let Some(template) =
                store::load_document::<LowerThirdTemplate>(&*self.store, DocumentKind::Template, &id)?
            {
                templates.push(template);
            }
        }
        if !templates.is_empty() {
            self.templates = templates;
        }
        Ok(self.templates.len())
    }

    // Props layer

    pub fn props(&self) -> &[PropItem] {
        &self.props
    }

    pub fn set_props(&mut self, items: Vec<PropItem>) -> StudioResult<()> {
        props::validate_props(&items)?;
        log::info!("Props layer set ({} item(s))", items.len());
        self.props = items.clone();
        let store = Arc::clone(&self.store);
        let broadcaster = Arc::clone(&self.broadcaster);
        self.dispatcher.spawn("save props", move || {
            store::save_document(&*store, DocumentKind::Props, PROPS_DOCUMENT_ID, &items)?;
            broadcaster.publish(BroadcastEvent::PropsChanged(items))
        });
        Ok(())
    }

    // Documents

    pub fn save_scene(&mut self) {
        let scene = self.scene.graph().scene().clone();
        let store = Arc::clone(&self.store);
        let broadcaster = Arc::clone(&self.broadcaster);
        self.dispatcher.spawn(format!("save scene '{}'", scene.id), move || {
            store::save_document(&*store, DocumentKind::Scene, &scene.id, &scene)?;
            broadcaster.publish(BroadcastEvent::SceneChanged(scene))
        });
    }

    pub fn save_presentation(&mut self) {
        let presentation = self.slides.deck().presentation().clone();
        let store = Arc::clone(&self.store);
        let broadcaster = Arc::clone(&self.broadcaster);
        self.dispatcher
            .spawn(format!("save presentation '{}'", presentation.id), move || {
                store::save_document(
                    &*store,
                    DocumentKind::Presentation,
                    &presentation.id,
                    &presentation,
                )?;
                broadcaster.publish(BroadcastEvent::StudioSlidesChanged(presentation))
            });
    }

    /// Load a stored scene into the scene editor. Returns false if missing.
    pub fn open_scene(&mut self, id: &str) -> anyhow::Result<bool> {
        match store::load_document::<Scene>(&*self.store, DocumentKind::Scene, id)? {
            Some(scene) => {
                self.scene.open(scene);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn open_presentation(&mut self, id: &str) -> anyhow::Result<bool> {
        match store::load_document::<Presentation>(&*self.store, DocumentKind::Presentation, id)? {
            Some(presentation) => {
                self.slides.open(presentation);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn compose_scene(&self, resolver: &dyn LiveSourceResolver) -> Vec<DrawCommand> {
        scene_render::compose(self.scene.graph().scene(), resolver)
    }

    // External outcomes

    fn publish(&mut self, label: &str, event: BroadcastEvent) {
        let broadcaster = Arc::clone(&self.broadcaster);
        self.dispatcher
            .spawn(label, move || broadcaster.publish(event));
    }

    fn notify(&mut self, level: NotificationLevel, message: String) {
        self.notifications.push(Notification { level, message });
    }

    fn record_outcomes(&mut self, outcomes: Vec<crate::io::dispatch::Outcome>) -> usize {
        let count = outcomes.len();
        for outcome in outcomes {
            match outcome.result {
                Ok(()) => log::debug!("{} done", outcome.label),
                Err(err) => {
                    log::error!("Failed to {}: {}", outcome.label, err);
                    self.notify(
                        NotificationLevel::Error,
                        format!("Could not {}: {}", outcome.label, err),
                    );
                }
            }
        }
        count
    }

    /// Collect finished background calls. Call once per frame.
    pub fn poll_external(&mut self) -> usize {
        let outcomes = self.dispatcher.poll();
        self.record_outcomes(outcomes)
    }

    /// Wait for every background call, e.g. before shutdown.
    pub fn flush_external(&mut self) -> usize {
        let outcomes = self.dispatcher.wait_all();
        self.record_outcomes(outcomes)
    }

    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }

    pub fn drain_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.notifications)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::broadcast::ChannelBroadcaster;
    use crate::io::store::MemoryStore;
    use crate::models::content::ElementKind;
    use crate::ui::shortcuts::Key;

    fn assert_close(actual: f64, expected: f64) {
        assert!((actual - expected).abs() < 1e-9, "{} != {}", actual, expected);
    }

    struct FailingStore;

    impl DocumentStore for FailingStore {
        fn put(&self, _: DocumentKind, _: &str, _: serde_json::Value) -> anyhow::Result<()> {
            anyhow::bail!("disk unavailable")
        }
        fn get(&self, _: DocumentKind, _: &str) -> anyhow::Result<Option<serde_json::Value>> {
            Ok(None)
        }
        fn list(&self, _: DocumentKind) -> anyhow::Result<Vec<String>> {
            Ok(Vec::new())
        }
        fn delete(&self, _: DocumentKind, _: &str) -> anyhow::Result<()> {
            Ok(())
        }
    }

    fn config() -> StudioConfig {
        StudioConfig {
            canvas: crate::config::CanvasConfig {
                width_px: 1000,
                height_px: 500,
            },
            ..StudioConfig::default()
        }
    }

    fn studio() -> (Studio, Arc<MemoryStore>, Arc<ChannelBroadcaster>) {
        let store = Arc::new(MemoryStore::new());
        let broadcaster = Arc::new(ChannelBroadcaster::new());
        let studio = Studio::new(config(), store.clone(), broadcaster.clone());
        (studio, store, broadcaster)
    }

    fn add_layer(studio: &mut Studio) -> String {
        studio
            .scene_mut()
            .edit(|g| Ok(g.add_layer(LayerContent::Empty, None)))
            .unwrap()
    }

    #[test]
    fn test_drag_commits_one_history_entry() {
        let (mut studio, _, _) = studio();
        let id = add_layer(&mut studio);
        studio
            .scene_mut()
            .edit(|g| g.update_geometry(&id, FramePatch::from(Frame::new(10.0, 10.0, 20.0, 20.0))))
            .unwrap();
        let before = studio.scene().history().len();

        let editor = studio.scene_mut();
        assert_eq!(editor.press(PointerPos::new(150.0, 75.0)).unwrap(), Some(id.clone()));
        for step in 1..=8 {
            editor
                .pointer_move(PointerPos::new(150.0 + 10.0 * step as f64, 75.0))
                .unwrap();
        }
        // previews are visible but not recorded
        assert_close(editor.graph().layer(&id).unwrap().frame.x, 18.0);
        assert_eq!(editor.history().len(), before);

        editor.pointer_up().unwrap();
        assert_eq!(editor.history().len(), before + 1);

        assert!(editor.undo());
        assert_eq!(editor.graph().layer(&id).unwrap().frame.x, 10.0);
        assert!(editor.redo());
        assert_close(editor.graph().layer(&id).unwrap().frame.x, 18.0);
    }

    #[test]
    fn test_click_without_move_records_nothing() {
        let (mut studio, _, _) = studio();
        add_layer(&mut studio);
        let before = studio.scene().history().len();
        let editor = studio.scene_mut();
        editor.press(PointerPos::new(500.0, 250.0)).unwrap();
        editor.pointer_up().unwrap();
        assert_eq!(editor.history().len(), before);
    }

    #[test]
    fn test_locked_element_refuses_gestures() {
        let (mut studio, _, _) = studio();
        let editor = studio.slides_mut();
        let id = editor.edit(|deck| Ok(deck.add_element(ElementKind::Shape))).unwrap();
        editor.edit(|deck| deck.set_locked(&id, true)).unwrap();

        // shape default frame covers the centre
        assert!(matches!(
            editor.press(PointerPos::new(500.0, 250.0)),
            Err(StudioError::Locked(_))
        ));
        assert_eq!(editor.deck().selected(), Some(id.as_str()));
        assert!(matches!(
            editor.begin_resize(&id, ResizeHandle::SE, PointerPos::new(0.0, 0.0)),
            Err(StudioError::Locked(_))
        ));
        assert!(!editor.gestures.is_active());
    }

    #[test]
    fn test_slide_resize_commits_once() {
        let (mut studio, _, _) = studio();
        let editor = studio.slides_mut();
        let id = editor.edit(|deck| Ok(deck.add_element(ElementKind::Text))).unwrap();
        let before = editor.history().len();
        editor
            .begin_resize(&id, ResizeHandle::E, PointerPos::new(900.0, 200.0))
            .unwrap();
        editor.pointer_move(PointerPos::new(800.0, 200.0)).unwrap();
        editor.pointer_move(PointerPos::new(850.0, 200.0)).unwrap();
        editor.pointer_up().unwrap();
        assert_eq!(editor.history().len(), before + 1);
        assert_close(editor.deck().element(&id).unwrap().frame.w, 75.0);
    }

    #[test]
    fn test_assigned_lower_third_is_a_snapshot() {
        let (mut studio, _, _) = studio();
        let id = add_layer(&mut studio);
        let template = LowerThirdTemplate::default();
        studio.show_lower_third(LowerThirdData::nameplate("Ada", Some("Host")), template.clone());
        studio.assign_current_lower_third(&id).unwrap();

        studio.show_lower_third(LowerThirdData::nameplate("Grace", None), template.clone());
        studio.hide_lower_third(1.0);

        match &studio.scene().graph().layer(&id).unwrap().content {
            LayerContent::LowerThird { data, .. } => {
                assert_eq!(data, &LowerThirdData::nameplate("Ada", Some("Host")))
            }
            other => panic!("unexpected content {:?}", other),
        }
        assert!(studio.assign_current_lower_third(&id).is_err());

        studio.stage_lower_third(LowerThirdData::free_text("Welcome"), template);
        studio.assign_staged(&id).unwrap();
        assert!(studio.live_lower_third().is_none());
        studio.clear_layer_content(&id).unwrap();
        assert_eq!(
            studio.scene().graph().layer(&id).unwrap().content,
            LayerContent::Empty
        );
    }

    #[test]
    fn test_show_and_hide_broadcast() {
        let (mut studio, _, broadcaster) = studio();
        let output = broadcaster.subscribe().unwrap();
        studio.show_lower_third(LowerThirdData::free_text("Hi"), LowerThirdTemplate::default());
        assert!(studio.render_live_lower_third(0.1).is_some());
        studio.hide_lower_third(0.1);
        studio.flush_external();
        let events = output.drain();
        assert_eq!(events.len(), 2);
        assert!(matches!(events[0], BroadcastEvent::LowerThirdLive(Some(_))));
        assert_eq!(events[1], BroadcastEvent::LowerThirdLive(None));
    }

    #[test]
    fn test_hide_always_lands_last() {
        let (mut studio, _, broadcaster) = studio();
        let output = broadcaster.subscribe().unwrap();
        let panel = broadcaster.subscribe().unwrap();
        for _ in 0..200 {
            studio.show_lower_third(LowerThirdData::free_text("Hi"), LowerThirdTemplate::default());
            studio.hide_lower_third(0.5);
            studio.flush_external();
            assert_eq!(output.latest(), Some(BroadcastEvent::LowerThirdLive(None)));
            assert_eq!(panel.latest(), Some(BroadcastEvent::LowerThirdLive(None)));
        }
    }

    #[test]
    fn test_manual_hide_plays_exit() {
        let (mut studio, _, _) = studio();
        let template = LowerThirdTemplate::default();
        studio.show_lower_third(LowerThirdData::free_text("Hi"), template);
        studio.hide_lower_third(2.0);
        assert!(studio.live_lower_third().is_none());

        assert!(studio.render_live_lower_third(2.01).is_some());
        match studio.lower_third_phase(2.01) {
            AnimationPhase::Exiting { elapsed } => assert_close(elapsed, 0.01),
            other => panic!("unexpected phase {:?}", other),
        }
        assert_eq!(studio.lower_third_phase(60.0), AnimationPhase::Hidden);
        assert!(studio.render_live_lower_third(60.0).is_none());

        // a new cue replaces the exiting one
        studio.show_lower_third(LowerThirdData::free_text("Next"), LowerThirdTemplate::default());
        assert!(matches!(
            studio.lower_third_phase(2.01),
            AnimationPhase::Shown { .. }
        ));
    }

    #[test]
    fn test_edits_wait_for_gesture_to_finish() {
        let (mut studio, _, _) = studio();
        let id = add_layer(&mut studio);
        studio
            .scene_mut()
            .edit(|g| g.update_geometry(&id, FramePatch::from(Frame::new(10.0, 10.0, 20.0, 20.0))))
            .unwrap();
        let before = studio.scene().history().len();

        studio.scene_mut().press(PointerPos::new(150.0, 75.0)).unwrap();
        studio.scene_mut().pointer_move(PointerPos::new(250.0, 75.0)).unwrap();
        assert!(matches!(
            studio.handle_key(KeyChord::command(Key::D)),
            Err(StudioError::GestureActive)
        ));
        assert!(matches!(
            studio.handle_key(KeyChord::command(Key::Z)),
            Err(StudioError::GestureActive)
        ));
        assert!(studio.scene_mut().edit(|g| g.remove_layer(&id)).is_err());
        assert!(!studio.scene_mut().undo());
        assert_eq!(studio.scene().history().len(), before);
        assert_eq!(studio.scene().history().current().layers[0].frame.x, 10.0);

        studio.scene_mut().pointer_up().unwrap();
        assert_eq!(studio.scene().history().len(), before + 1);
        assert_close(studio.scene().history().current().layers[0].frame.x, 20.0);
        assert_eq!(
            studio.handle_key(KeyChord::command(Key::D)).unwrap(),
            Some(Shortcut::Duplicate)
        );
    }

    #[test]
    fn test_slide_edits_wait_for_gesture_to_finish() {
        let (mut studio, _, _) = studio();
        studio.set_active_editor(ActiveEditor::Slides);
        let id = studio
            .slides_mut()
            .edit(|deck| Ok(deck.add_element(ElementKind::Text)))
            .unwrap();
        let before = studio.slides().history().len();
        studio
            .slides_mut()
            .begin_resize(&id, ResizeHandle::E, PointerPos::new(900.0, 200.0))
            .unwrap();
        studio.slides_mut().pointer_move(PointerPos::new(800.0, 200.0)).unwrap();
        assert!(studio.handle_key(KeyChord::plain(Key::Delete)).is_err());
        assert!(studio.slides().deck().element(&id).is_some());
        assert_eq!(studio.slides().history().len(), before);
    }

    #[test]
    fn test_import_templates_fails_closed() {
        let (mut studio, _, _) = studio();
        let before = studio.templates().to_vec();
        assert!(studio.import_templates("[{\"id\": \"\"}]").is_err());
        assert_eq!(studio.templates(), before.as_slice());
        let notes = studio.drain_notifications();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].level, NotificationLevel::Error);

        assert_eq!(
            studio
                .import_templates(r#"[{"id": "news", "name": "News"}]"#)
                .unwrap(),
            1
        );
        assert!(studio.template("news").is_some());
    }

    #[test]
    fn test_save_failure_keeps_local_state() {
        let store = Arc::new(FailingStore);
        let broadcaster = Arc::new(ChannelBroadcaster::new());
        let mut studio = Studio::new(config(), store, broadcaster);
        let id = add_layer(&mut studio);
        studio.save_scene();
        studio.flush_external();

        assert!(studio.scene().graph().layer(&id).is_some());
        let notes = studio.drain_notifications();
        assert_eq!(notes.len(), 1);
        assert!(notes[0].message.contains("disk unavailable"));
    }

    #[test]
    fn test_save_scene_persists_and_broadcasts() {
        let (mut studio, store, broadcaster) = studio();
        let output = broadcaster.subscribe().unwrap();
        add_layer(&mut studio);
        studio.save_scene();
        studio.save_presentation();
        assert_eq!(studio.flush_external(), 2);
        assert!(studio.notifications().is_empty());

        assert_eq!(store.list(DocumentKind::Scene).unwrap(), vec!["scene-1"]);
        assert_eq!(output.drain().len(), 2);

        let saved = studio.scene().graph().scene().clone();
        studio.scene_mut().open(Scene::new("other", "Other"));
        assert!(studio.open_scene("scene-1").unwrap());
        assert_eq!(studio.scene().graph().scene(), &saved);
        assert!(!studio.open_scene("missing").unwrap());
        assert!(studio.open_presentation("presentation-1").unwrap());
    }

    #[test]
    fn test_templates_roundtrip_through_store() {
        let (mut studio, _, _) = studio();
        studio
            .import_templates(r#"{"id": "news", "name": "News"}"#)
            .unwrap();
        studio.save_templates();
        studio.flush_external();

        let mut fresh = Studio::new(
            config(),
            Arc::clone(&studio.store),
            Arc::new(ChannelBroadcaster::new()),
        );
        assert_eq!(fresh.load_templates().unwrap(), 2);
        assert!(fresh.template("news").is_some());
    }

    #[test]
    fn test_shortcuts_respect_text_focus() {
        let (mut studio, _, _) = studio();
        let id = add_layer(&mut studio);
        studio.scene_mut().graph.select(&id).unwrap();

        studio.set_text_input_focused(true);
        assert_eq!(studio.handle_key(KeyChord::plain(Key::Delete)).unwrap(), None);
        assert!(studio.scene().graph().layer(&id).is_some());

        studio.set_text_input_focused(false);
        assert_eq!(
            studio.handle_key(KeyChord::command(Key::D)).unwrap(),
            Some(Shortcut::Duplicate)
        );
        assert_eq!(studio.scene().graph().scene().layers.len(), 2);
        studio.handle_key(KeyChord::command(Key::Z)).unwrap();
        assert_eq!(studio.scene().graph().scene().layers.len(), 1);
        // undo dropped the copy, and with it the selection
        assert_eq!(studio.scene().graph().selected(), None);
        studio.scene_mut().graph.select(&id).unwrap();
        studio.handle_key(KeyChord::plain(Key::Delete)).unwrap();
        assert!(studio.scene().graph().scene().layers.is_empty());
    }

    #[test]
    fn test_slide_shortcuts_use_offset() {
        let (mut studio, _, _) = studio();
        studio.set_active_editor(ActiveEditor::Slides);
        let id = studio
            .slides_mut()
            .edit(|deck| Ok(deck.add_element(ElementKind::Text)))
            .unwrap();
        studio.handle_key(KeyChord::command(Key::D)).unwrap();
        let copy = studio.slides().deck().selected().unwrap().to_string();
        assert_ne!(copy, id);
        let original = studio.slides().deck().element(&id).unwrap().frame;
        let duplicated = studio.slides().deck().element(&copy).unwrap().frame;
        assert_eq!(duplicated.x, original.x + 2.0);
    }

    #[test]
    fn test_props_validation() {
        let (mut studio, store, _) = studio();
        let clock = PropItem {
            id: "clock".to_string(),
            name: "Clock".to_string(),
            kind: crate::models::props::PropKind::Clock {
                format: "%H:%M".to_string(),
                color: "#ffffff".to_string(),
            },
            frame: Frame::new(85.0, 2.0, 12.0, 6.0),
            opacity: 1.0,
            visible: true,
        };
        assert!(studio.set_props(vec![clock.clone(), clock.clone()]).is_err());
        assert!(studio.props().is_empty());

        studio.set_props(vec![clock]).unwrap();
        studio.flush_external();
        assert_eq!(studio.props().len(), 1);
        assert!(store
            .get(DocumentKind::Props, PROPS_DOCUMENT_ID)
            .unwrap()
            .is_some());
    }
}
