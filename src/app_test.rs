#![allow(clippy::float_cmp)]

use futures::executor::block_on;

use super::*;
use crate::geometry::{CanvasParameters, Dimensions};
use crate::store::MemoryStore;
use crate::testing::{FlakyStore, RecordingSurface, ScriptedHost};
use crate::workflow::Phase;

// =============================================================
// Helpers
// =============================================================

const PNG: &str = "data:image/png;base64,AAAA";

/// 1000x1000 canvas shown at 500x500 CSS pixels, so pointer coordinates double.
fn surface() -> RecordingSurface {
    RecordingSurface::scaled(Dimensions::new(1000.0, 1000.0), Dimensions::new(500.0, 500.0))
}

fn app() -> App<RecordingSurface, MemoryStore, ScriptedHost> {
    App::new(surface(), MemoryStore::new(), ScriptedHost::new(), TaggerConfig::default())
}

fn app_with_image() -> App<RecordingSurface, MemoryStore, ScriptedHost> {
    let mut app = app();
    block_on(app.upload_image(PNG.to_owned())).unwrap();
    app
}

fn at(x: f64, y: f64, t: f64) -> PointerInput {
    PointerInput::new(x, y, t)
}

/// Drag (100,100) -> (300,300) over 400 ms, with one animation frame in between.
fn drag<C, S, H>(app: &mut App<C, S, H>) -> Result<GestureOutcome>
where
    C: Surface,
    S: TaggedImageStore,
    H: Host<Image = C::Image>,
{
    app.on_pointer_down(at(100.0, 100.0, 0.0));
    app.on_pointer_move(at(150.0, 150.0, 10.0));
    app.on_pointer_move(at(300.0, 300.0, 300.0));
    app.on_animation_frame()?;
    block_on(app.on_pointer_up(at(300.0, 300.0, 400.0)))
}

fn quick_click<C, S, H>(app: &mut App<C, S, H>) -> Result<GestureOutcome>
where
    C: Surface,
    S: TaggedImageStore,
    H: Host<Image = C::Image>,
{
    app.on_pointer_down(at(100.0, 100.0, 0.0));
    app.on_pointer_move(at(105.0, 105.0, 20.0));
    block_on(app.on_pointer_up(at(105.0, 105.0, 60.0)))
}

fn tag(text: &str) -> Tag {
    Tag {
        annotation: TagAnnotation { text: text.to_owned(), x: 0.0, y: 0.0 },
        tag_box: CanvasParameters::new(0.0, 0.0, 10.0, 10.0),
    }
}

fn seed_tags(app: &mut App<RecordingSurface, MemoryStore, ScriptedHost>, texts: &[&str]) {
    let id = app.displayed_id().unwrap();
    let mut record = block_on(app.store().get_one(id)).unwrap();
    record.tags = texts.iter().map(|t| tag(t)).collect();
    block_on(app.store().update_one(record, id)).unwrap();
    block_on(app.render_app()).unwrap();
}

fn stored_texts(app: &App<RecordingSurface, MemoryStore, ScriptedHost>) -> Vec<String> {
    let id = app.displayed_id().unwrap();
    block_on(app.store().get_one(id))
        .unwrap()
        .tags
        .into_iter()
        .map(|t| t.annotation.text)
        .collect()
}

// =============================================================
// Rendering and upload
// =============================================================

#[test]
fn render_with_no_images_clears_and_disables_tags() {
    let mut app = app();
    block_on(app.render_app()).unwrap();

    assert!(!app.render_parameters().has_images());
    assert_eq!(app.surface().clear_count(), 1);
    assert!(app.surface().current_frame().is_empty());
    assert_eq!(app.host().last_tag_render(), Some((Vec::new(), false)));
    assert_eq!(app.host().last_browser_render().map(|p| p.heading()), Some("Upload an image to start".to_owned()));
}

#[test]
fn upload_fits_centres_and_displays_image() {
    let app = app_with_image();

    let record = block_on(app.store().get_one(1)).unwrap();
    assert_eq!(record.image.parameters(), CanvasParameters::new(0.0, 250.0, 1000.0, 500.0));
    assert!(record.tags.is_empty());
    assert_eq!(app.store().current_id(), Some(1));
    assert_eq!(app.displayed_id(), Some(1));
    assert_eq!(app.surface().frame_image().as_deref(), Some(PNG));
    assert_eq!(app.host().decodes.get(), 1);
    assert_eq!(app.host().last_tag_render(), Some((Vec::new(), true)));
}

#[test]
fn upload_corrupt_image_stores_nothing() {
    let mut app = app();
    let err = block_on(app.upload_image("data:image/png;base64,corrupt".to_owned())).unwrap_err();
    assert!(matches!(err, Error::Decode(_)));
    assert!(app.store().is_empty());
    assert!(app.surface().ops.is_empty());
}

#[test]
fn upload_rejects_non_image_data_url() {
    let mut app = app();
    let err = block_on(app.upload_image("data:text/plain;base64,aGk=".to_owned())).unwrap_err();
    assert!(matches!(err, Error::UnsupportedFormat(_)));
    assert_eq!(app.host().decodes.get(), 0);
}

#[test]
fn failed_render_keeps_last_good_canvas() {
    let mut app = app_with_image();
    let mut record = block_on(app.store().get_one(1)).unwrap();
    record.image.data_url = "data:image/png;base64,corrupt".to_owned();
    block_on(app.store().update_one(record, 1)).unwrap();
    let ops_before = app.surface().ops.len();
    let renders_before = app.host().browser_renders.borrow().len();

    let err = block_on(app.render_app()).unwrap_err();

    assert!(matches!(err, Error::Decode(_)));
    assert_eq!(app.surface().ops.len(), ops_before);
    assert_eq!(app.host().browser_renders.borrow().len(), renders_before);
}

#[test]
fn stale_saved_id_falls_back_to_first_and_is_remembered() {
    let mut app = app_with_image();
    app.store().set_current_id(Some(42));
    block_on(app.render_app()).unwrap();
    assert_eq!(app.displayed_id(), Some(1));
    assert_eq!(app.store().current_id(), Some(1));
}

// =============================================================
// Gestures
// =============================================================

#[test]
fn pointer_down_without_image_is_ignored() {
    let mut app = app();
    block_on(app.render_app()).unwrap();
    assert_eq!(app.on_pointer_down(at(10.0, 10.0, 0.0)), Action::None);
    assert_eq!(app.workflow().phase(), Phase::Idle);
}

#[test]
fn live_frame_redraws_cache_and_highlights_selection() {
    let mut app = app_with_image();
    app.on_pointer_down(at(100.0, 100.0, 0.0));
    assert_eq!(app.on_pointer_move(at(300.0, 300.0, 50.0)), Action::FrameRequested);
    assert_eq!(app.on_pointer_move(at(310.0, 310.0, 60.0)), Action::None);

    app.on_animation_frame().unwrap();

    assert_eq!(app.surface().frame_image().as_deref(), Some(PNG));
    assert_eq!(app.surface().frame_rects(), [CanvasParameters::new(200.0, 200.0, 420.0, 420.0)]);
    assert!(app.surface().frame_has_fill());
}

#[test]
fn drag_and_submit_persists_scaled_tag() {
    let mut app = app_with_image();
    app.host().answer(Some("Door"));

    let outcome = drag(&mut app).unwrap();

    let expected = Tag {
        annotation: TagAnnotation { text: "Door".to_owned(), x: 200.0, y: 200.0 },
        tag_box: CanvasParameters::new(200.0, 200.0, 400.0, 400.0),
    };
    assert_eq!(outcome, GestureOutcome::Tagged(expected.clone()));
    assert_eq!(block_on(app.store().get_one(1)).unwrap().tags, [expected.clone()]);
    assert_eq!(app.cache().tags(), [expected.clone()]);
    assert_eq!(*app.host().sleeps.borrow(), [500]);
    assert_eq!(*app.host().prompts.borrow(), [("Annotate this tag".to_owned(), String::new())]);
    assert_eq!(app.surface().frame_texts(), ["Door"]);
    assert_eq!(app.surface().frame_rects(), [expected.tag_box]);
    assert_eq!(app.host().last_tag_render(), Some((vec![expected], true)));
    assert_eq!(app.workflow().phase(), Phase::Idle);
}

#[test]
fn click_is_rejected_without_prompt() {
    let mut app = app_with_image();
    let frame_before = app.surface().current_frame().to_vec();

    assert_eq!(quick_click(&mut app).unwrap(), GestureOutcome::Rejected);

    assert!(app.host().prompts.borrow().is_empty());
    assert!(stored_texts(&app).is_empty());
    assert_eq!(app.surface().current_frame(), frame_before.as_slice());
}

#[test]
fn small_slow_drag_is_rejected() {
    let mut app = app_with_image();
    app.on_pointer_down(at(100.0, 100.0, 0.0));
    app.on_pointer_move(at(110.0, 140.0, 10.0));
    let outcome = block_on(app.on_pointer_up(at(110.0, 140.0, 900.0))).unwrap();
    assert_eq!(outcome, GestureOutcome::Rejected);
    assert!(stored_texts(&app).is_empty());
}

#[test]
fn cancel_restores_pre_gesture_canvas() {
    let mut app = app_with_image();
    seed_tags(&mut app, &["Window"]);
    let frame_before = app.surface().current_frame().to_vec();
    app.host().answer(None);

    assert_eq!(drag(&mut app).unwrap(), GestureOutcome::Cancelled);

    assert_eq!(stored_texts(&app), ["Window"]);
    assert_eq!(app.surface().current_frame(), frame_before.as_slice());
    assert_eq!(app.workflow().phase(), Phase::Idle);
}

#[test]
fn empty_submissions_number_default_tags() {
    let mut app = app_with_image();
    app.host().answer(Some(""));
    app.host().answer(Some(""));

    drag(&mut app).unwrap();
    drag(&mut app).unwrap();

    assert_eq!(stored_texts(&app), ["Untitled tag 1", "Untitled tag 2"]);
}

#[test]
fn default_numbering_scans_all_tags() {
    let mut app = app_with_image();
    seed_tags(&mut app, &["Untitled tag 1", "Foo", "Untitled tag 3"]);
    app.host().answer(Some(""));

    drag(&mut app).unwrap();

    assert_eq!(stored_texts(&app).last().map(String::as_str), Some("Untitled tag 4"));
}

#[test]
fn pointer_down_during_prompt_does_not_disturb_pending_selection() {
    let mut app = app_with_image();
    app.on_pointer_down(at(100.0, 100.0, 0.0));
    app.on_pointer_move(at(150.0, 150.0, 10.0));
    app.on_pointer_move(at(300.0, 300.0, 300.0));
    // Force the machine into AwaitingAnnotation without running the async completion.
    assert!(matches!(app.workflow.on_pointer_up(at(300.0, 300.0, 400.0)), Action::AnnotationRequested(_)));

    assert_eq!(app.on_pointer_down(at(5.0, 5.0, 450.0)), Action::None);
    assert_eq!(app.workflow().phase(), Phase::AwaitingAnnotation);
}

#[test]
fn lost_release_cancel_wipes_highlight() {
    let mut app = app_with_image();
    app.on_pointer_down(at(100.0, 100.0, 0.0));
    app.on_pointer_move(at(300.0, 300.0, 50.0));
    app.on_animation_frame().unwrap();
    assert!(app.surface().frame_has_fill());

    app.on_pointer_cancel().unwrap();

    assert_eq!(app.workflow().phase(), Phase::Idle);
    assert!(!app.surface().frame_has_fill());
    assert_eq!(app.surface().frame_image().as_deref(), Some(PNG));
    assert_eq!(app.on_pointer_move(at(320.0, 320.0, 80.0)), Action::None);
    assert!(app.host().prompts.borrow().is_empty());
}

#[test]
fn cancel_without_drag_leaves_canvas_alone() {
    let mut app = app_with_image();
    let clears = app.surface().clear_count();
    app.on_pointer_cancel().unwrap();
    assert_eq!(app.surface().clear_count(), clears);
}

#[test]
fn storage_failure_surfaces_error_and_cleans_canvas() {
    let mut app = App::new(surface(), FlakyStore::default(), ScriptedHost::new(), TaggerConfig::default());
    block_on(app.upload_image(PNG.to_owned())).unwrap();
    app.store().fail_writes.set(true);
    app.host().answer(Some("Door"));

    let err = drag(&mut app).unwrap_err();

    assert!(matches!(err, Error::Storage(_)));
    assert_eq!(app.workflow().phase(), Phase::Idle);
    assert!(!app.surface().frame_has_fill());
    assert!(app.surface().frame_texts().is_empty());
    assert!(block_on(app.store().get_one(1)).unwrap().tags.is_empty());
}

#[test]
fn pointer_up_without_gesture_is_ignored() {
    let mut app = app_with_image();
    let outcome = block_on(app.on_pointer_up(at(1.0, 1.0, 1.0))).unwrap();
    assert_eq!(outcome, GestureOutcome::Ignored);
}

// =============================================================
// Tag sidebar
// =============================================================

#[test]
fn delete_tag_shifts_following_tags() {
    let mut app = app_with_image();
    seed_tags(&mut app, &["first", "second"]);

    block_on(app.delete_tag(0)).unwrap();

    assert_eq!(stored_texts(&app), ["second"]);
    assert_eq!(app.cache().tags()[0].annotation.text, "second");
}

#[test]
fn delete_tag_out_of_range_is_error() {
    let mut app = app_with_image();
    seed_tags(&mut app, &["only"]);
    let err = block_on(app.delete_tag(3)).unwrap_err();
    assert!(matches!(err, Error::TagIndexOutOfRange { index: 3, len: 1 }));
    assert_eq!(stored_texts(&app), ["only"]);
}

#[test]
fn clear_tags_empties_list() {
    let mut app = app_with_image();
    seed_tags(&mut app, &["a", "b", "c"]);
    block_on(app.clear_tags()).unwrap();
    assert!(stored_texts(&app).is_empty());
    assert!(app.surface().frame_texts().is_empty());
}

#[test]
fn edit_tag_prefills_prompt_and_renames() {
    let mut app = app_with_image();
    seed_tags(&mut app, &["Door", "Window"]);
    app.host().answer(Some("Front door"));

    assert!(block_on(app.edit_tag(0)).unwrap());

    assert_eq!(stored_texts(&app), ["Front door", "Window"]);
    assert_eq!(*app.host().sleeps.borrow(), [250]);
    assert_eq!(*app.host().prompts.borrow(), [("Edit tag".to_owned(), "Door".to_owned())]);
}

#[test]
fn edit_tag_cancel_changes_nothing() {
    let mut app = app_with_image();
    seed_tags(&mut app, &["Door"]);
    app.host().answer(None);
    assert!(!block_on(app.edit_tag(0)).unwrap());
    assert_eq!(stored_texts(&app), ["Door"]);
}

#[test]
fn edit_tag_empty_submission_uses_default_label() {
    let mut app = app_with_image();
    seed_tags(&mut app, &["Untitled tag 2", "Door"]);
    app.host().answer(Some(""));
    block_on(app.edit_tag(1)).unwrap();
    assert_eq!(stored_texts(&app), ["Untitled tag 2", "Untitled tag 3"]);
}

#[test]
fn edit_tag_bad_index_is_error_without_prompt() {
    let mut app = app_with_image();
    let err = block_on(app.edit_tag(0)).unwrap_err();
    assert!(matches!(err, Error::TagIndexOutOfRange { index: 0, len: 0 }));
    assert!(app.host().prompts.borrow().is_empty());
}

// =============================================================
// Image browser
// =============================================================

fn app_with_three_images() -> App<RecordingSurface, MemoryStore, ScriptedHost> {
    let mut app = app();
    for _ in 0..3 {
        block_on(app.upload_image(PNG.to_owned())).unwrap();
    }
    app
}

#[test]
fn upload_shows_newest_image() {
    let app = app_with_three_images();
    let params = app.render_parameters();
    assert_eq!(params.displayed_id, Some(3));
    assert_eq!(params.pagination(), "3 of 3");
    assert_eq!(params.next_id, None);
}

#[test]
fn previous_and_next_navigate() {
    let mut app = app_with_three_images();

    block_on(app.show_previous()).unwrap();
    assert_eq!(app.displayed_id(), Some(2));
    assert_eq!(app.store().current_id(), Some(2));

    block_on(app.show_next()).unwrap();
    assert_eq!(app.displayed_id(), Some(3));

    block_on(app.show_next()).unwrap();
    assert_eq!(app.displayed_id(), Some(3));
}

#[test]
fn delete_image_shows_previous() {
    let mut app = app_with_three_images();
    block_on(app.show_previous()).unwrap();

    block_on(app.delete_image()).unwrap();

    assert!(matches!(block_on(app.store().get_one(2)), Err(Error::NotFound(2))));
    assert_eq!(app.displayed_id(), Some(1));
    assert_eq!(app.render_parameters().image_count, 2);
    assert_eq!(app.render_parameters().next_id, Some(3));
}

#[test]
fn delete_first_image_shows_next() {
    let mut app = app_with_three_images();
    block_on(app.show_previous()).unwrap();
    block_on(app.show_previous()).unwrap();

    block_on(app.delete_image()).unwrap();

    assert_eq!(app.displayed_id(), Some(2));
}

#[test]
fn deleting_last_image_empties_everything() {
    let mut app = app_with_image();
    seed_tags(&mut app, &["Door"]);

    block_on(app.delete_image()).unwrap();

    assert!(!app.render_parameters().has_images());
    assert_eq!(app.store().current_id(), None);
    assert!(app.cache().image().is_none());
    assert!(app.cache().tags().is_empty());
    assert!(app.surface().current_frame().is_empty());
    assert_eq!(app.host().last_tag_render(), Some((Vec::new(), false)));
}
