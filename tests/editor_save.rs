use futures::FutureExt;
use futures::channel::oneshot;
use futures::future::{self, BoxFuture};
use parking_lot::Mutex;
use roi_editor::{
    Ack, CameraId, EditorConfig, EditorResponse, MemoryRoiStore, RoiClient, RoiEditor, RoiPayload, RoiPoints,
    SaveError, SaveOutcome, SessionStatus, ShapeType, SurfaceResizeFeed, SurfaceSize, Tool, TransportError,
};
use egui::{Pos2, Rect, pos2, vec2};

/// A store that never answers
struct PendingStore;

impl RoiClient for PendingStore {
    fn set_roi(&self, _payload: RoiPayload) -> BoxFuture<'static, Result<Ack, TransportError>> {
        future::pending().boxed()
    }
}

/// A store that answers every request with a refusal
struct RefusingStore(&'static str);

impl RoiClient for RefusingStore {
    fn set_roi(&self, _payload: RoiPayload) -> BoxFuture<'static, Result<Ack, TransportError>> {
        future::ready(Ok(Ack::rejected(self.0))).boxed()
    }
}

/// A store that answers once the test releases it
struct GatedStore {
    answer: Mutex<Option<oneshot::Receiver<Ack>>>,
}

impl GatedStore {
    fn new() -> (Self, oneshot::Sender<Ack>) {
        let (tx, rx) = oneshot::channel();
        (Self { answer: Mutex::new(Some(rx)) }, tx)
    }
}

impl RoiClient for GatedStore {
    fn set_roi(&self, _payload: RoiPayload) -> BoxFuture<'static, Result<Ack, TransportError>> {
        match self.answer.lock().take() {
            Some(rx) => rx.map(|ack| ack.map_err(|_| TransportError::Disconnected)).boxed(),
            None => future::ready(Err(TransportError::Disconnected)).boxed(),
        }
    }
}

fn editor_on(width: f32, height: f32) -> (RoiEditor, Rect) {
    let mut editor = RoiEditor::new(CameraId(3), &EditorConfig::default());
    editor.set_backing_image(true);
    editor.observe_surface(SurfaceSize::new(width, height));
    (editor, Rect::from_min_size(Pos2::ZERO, vec2(width, height)))
}

fn drag(editor: &mut RoiEditor, display: Rect, from: Pos2, to: Pos2) -> EditorResponse {
    editor.pointer_down(from, display);
    editor.pointer_move(to, display);
    editor.pointer_up(to, display)
}

fn flat(points: &RoiPoints) -> Vec<f32> {
    match points {
        RoiPoints::Flat(values) => values.clone(),
        RoiPoints::Pairs(_) => panic!("expected flat points, got {points:?}"),
    }
}

fn assert_close(actual: &[f32], expected: &[f32]) {
    assert_eq!(actual.len(), expected.len(), "{actual:?} vs {expected:?}");
    for (a, e) in actual.iter().zip(expected) {
        assert!((a - e).abs() < 1e-3, "{actual:?} vs {expected:?}");
    }
}

#[test]
fn test_rectangle_payload() {
    let (mut editor, display) = editor_on(400.0, 300.0);
    let response = drag(&mut editor, display, pos2(100.0, 50.0), pos2(300.0, 200.0));
    assert_eq!(response, EditorResponse::Finalized);

    let payload = editor.payload().unwrap();
    assert_eq!(payload.camera_id, CameraId(3));
    assert_eq!(payload.shape_type(), ShapeType::Rect);
    assert_close(&flat(payload.points()), &[0.25, 0.1667, 0.5, 0.5]);
}

#[test]
fn test_rectangle_dragged_backwards() {
    let (mut editor, display) = editor_on(400.0, 300.0);
    drag(&mut editor, display, pos2(300.0, 200.0), pos2(100.0, 50.0));
    let payload = editor.payload().unwrap();
    assert_close(&flat(payload.points()), &[0.25, 0.1667, 0.5, 0.5]);
}

#[test]
fn test_circle_payload() {
    let (mut editor, display) = editor_on(400.0, 300.0);
    editor.select_tool(Tool::Circle);
    drag(&mut editor, display, pos2(200.0, 150.0), pos2(250.0, 150.0));

    let payload = editor.payload().unwrap();
    assert_eq!(payload.shape_type(), ShapeType::Circle);
    assert_close(&flat(payload.points()), &[0.5, 0.5, 0.125]);
}

#[test]
fn test_polygon_close_requests_save() {
    let (mut editor, display) = editor_on(400.0, 300.0);
    editor.select_tool(Tool::Polygon);

    for p in [pos2(10.0, 10.0), pos2(100.0, 10.0), pos2(100.0, 100.0)] {
        assert_eq!(editor.pointer_down(p, display), EditorResponse::Redraw);
        editor.pointer_up(p, display);
    }
    assert_eq!(editor.payload(), Err(SaveError::NoShape));

    assert_eq!(editor.pointer_down(pos2(20.0, 20.0), display), EditorResponse::SaveRequested);
    let payload = editor.payload().unwrap();
    assert_eq!(payload.shape_type(), ShapeType::Poly);
    assert_eq!(
        payload.points(),
        &RoiPoints::Pairs(vec![[0.025, 10.0 / 300.0], [0.25, 10.0 / 300.0], [0.25, 100.0 / 300.0]])
    );
}

#[test]
fn test_freehand_keeps_every_point() {
    let (mut editor, display) = editor_on(200.0, 100.0);
    editor.select_tool(Tool::Freehand);

    editor.pointer_down(pos2(20.0, 10.0), display);
    editor.pointer_move(pos2(40.0, 30.0), display);
    editor.pointer_move(pos2(60.0, 20.0), display);
    assert_eq!(editor.pointer_up(pos2(60.0, 20.0), display), EditorResponse::Finalized);

    let payload = editor.payload().unwrap();
    assert_eq!(payload.shape_type(), ShapeType::Poly);
    assert_eq!(
        payload.points(),
        &RoiPoints::Pairs(vec![[0.1, 0.1], [0.2, 0.3], [0.3, 0.2]])
    );
}

#[test]
fn test_payload_is_stable() {
    let (mut editor, display) = editor_on(400.0, 300.0);
    drag(&mut editor, display, pos2(10.0, 10.0), pos2(90.0, 70.0));
    assert_eq!(editor.payload(), editor.payload());
}

#[test]
fn test_tool_switch_discards_shape() {
    let (mut editor, display) = editor_on(400.0, 300.0);
    drag(&mut editor, display, pos2(10.0, 10.0), pos2(90.0, 70.0));
    editor.select_tool(Tool::Circle);

    let store = MemoryRoiStore::new();
    assert_eq!(editor.save(&store), Err(SaveError::NoShape));
    assert!(store.requests().is_empty());
}

#[test]
fn test_camera_switch_discards_shape() {
    let (mut editor, display) = editor_on(400.0, 300.0);
    drag(&mut editor, display, pos2(10.0, 10.0), pos2(90.0, 70.0));
    editor.set_camera(CameraId(4));

    assert_eq!(editor.camera(), CameraId(4));
    assert!(editor.view().is_none());
    assert_eq!(editor.save(&MemoryRoiStore::new()), Err(SaveError::NoShape));
}

#[test]
fn test_degenerate_rectangle_is_not_saved() {
    let (mut editor, display) = editor_on(400.0, 300.0);
    drag(&mut editor, display, pos2(50.0, 50.0), pos2(50.0, 120.0));

    let store = MemoryRoiStore::new();
    assert!(matches!(editor.save(&store), Err(SaveError::InvalidGeometry(_))));
    assert!(!editor.can_save());
}

#[test]
fn test_second_save_while_in_flight() {
    let (mut editor, display) = editor_on(400.0, 300.0);
    drag(&mut editor, display, pos2(10.0, 10.0), pos2(90.0, 70.0));

    editor.save(&PendingStore).unwrap();
    assert!(editor.is_saving());
    assert_eq!(editor.poll_save(), None);
    assert_eq!(editor.save(&PendingStore), Err(SaveError::SaveInFlight));

    // No drawing while the save is outstanding
    assert_eq!(
        editor.pointer_down(pos2(200.0, 200.0), display),
        EditorResponse::Ignored
    );
}

#[test]
fn test_transport_failure_keeps_shape() {
    let (mut editor, display) = editor_on(400.0, 300.0);
    drag(&mut editor, display, pos2(10.0, 10.0), pos2(90.0, 70.0));
    let expected = editor.payload().unwrap();

    let store = MemoryRoiStore::new();
    store.fail_with(Some(TransportError::Io("connection refused".to_owned())));
    editor.save(&store).unwrap();
    assert!(matches!(editor.poll_save(), Some(SaveOutcome::Failed(TransportError::Io(_)))));
    assert_eq!(editor.status(), SessionStatus::Open);
    assert!(editor.last_error().is_some());

    // Retry goes through once the store is back
    store.fail_with(None);
    editor.save(&store).unwrap();
    assert_eq!(editor.poll_save(), Some(SaveOutcome::Saved));
    assert_eq!(store.requests(), vec![expected.clone()]);
    assert_eq!(store.get(CameraId(3)), Some(expected.roi));
}

#[test]
fn test_rejection_message_is_shown_verbatim() {
    let (mut editor, display) = editor_on(400.0, 300.0);
    drag(&mut editor, display, pos2(10.0, 10.0), pos2(90.0, 70.0));

    editor.save(&RefusingStore("camera 3 is offline")).unwrap();
    assert_eq!(
        editor.poll_save(),
        Some(SaveOutcome::Failed(TransportError::Rejected(
            "camera 3 is offline".to_owned()
        )))
    );
    assert_eq!(editor.last_error(), Some("camera 3 is offline"));
    assert!(editor.payload().is_ok());
}

#[test]
fn test_successful_save_closes_session() {
    let (mut editor, display) = editor_on(400.0, 300.0);
    drag(&mut editor, display, pos2(10.0, 10.0), pos2(90.0, 70.0));

    let store = MemoryRoiStore::new();
    editor.save(&store).unwrap();
    assert_eq!(editor.poll_save(), Some(SaveOutcome::Saved));
    assert!(!editor.is_open());
    assert_eq!(editor.save(&store), Err(SaveError::SessionClosed));
    assert_eq!(store.requests().len(), 1);
}

#[test]
fn test_normalizes_against_finalize_time_surface() {
    let (mut editor, display) = editor_on(400.0, 300.0);
    drag(&mut editor, display, pos2(100.0, 50.0), pos2(300.0, 200.0));

    // The surface grows after the shape was finished
    editor.observe_surface(SurfaceSize::new(800.0, 600.0));
    let payload = editor.payload().unwrap();
    assert_close(&flat(payload.points()), &[0.25, 0.1667, 0.5, 0.5]);
}

#[test]
fn test_display_scaling() {
    // A 400x300 surface shown at half size
    let mut editor = RoiEditor::new(CameraId(0), &EditorConfig::default());
    editor.set_backing_image(true);
    editor.observe_surface(SurfaceSize::new(400.0, 300.0));
    let display = Rect::from_min_size(pos2(20.0, 40.0), vec2(200.0, 150.0));

    drag(&mut editor, display, pos2(70.0, 65.0), pos2(170.0, 140.0));
    let payload = editor.payload().unwrap();
    assert_close(&flat(payload.points()), &[0.25, 0.1667, 0.5, 0.5]);
}

#[test]
fn test_camera_stays_put_while_saving() {
    let (mut editor, display) = editor_on(400.0, 300.0);
    drag(&mut editor, display, pos2(10.0, 10.0), pos2(90.0, 70.0));
    let expected = editor.payload().unwrap();

    let (store, release) = GatedStore::new();
    editor.save(&store).unwrap();
    editor.set_camera(CameraId(4));
    assert_eq!(editor.camera(), CameraId(3));
    assert_eq!(editor.payload(), Ok(expected));

    release.send(Ack::ok()).unwrap();
    assert_eq!(editor.poll_save(), Some(SaveOutcome::Saved));
    assert_eq!(editor.camera(), CameraId(3));
}

#[test]
fn test_failed_save_can_retry_after_camera_switch_attempt() {
    let (mut editor, display) = editor_on(400.0, 300.0);
    drag(&mut editor, display, pos2(10.0, 10.0), pos2(90.0, 70.0));

    let (store, release) = GatedStore::new();
    editor.save(&store).unwrap();
    editor.set_camera(CameraId(4));
    release.send(Ack::rejected("busy")).unwrap();
    assert!(matches!(editor.poll_save(), Some(SaveOutcome::Failed(_))));

    // The shape survived, so the retry needs no redraw
    let retry = MemoryRoiStore::new();
    editor.save(&retry).unwrap();
    assert_eq!(editor.poll_save(), Some(SaveOutcome::Saved));
    assert_eq!(retry.requests()[0].camera_id, CameraId(3));
}

#[test]
fn test_save_needs_a_laid_out_surface() {
    let (mut editor, display) = editor_on(400.0, 300.0);
    drag(&mut editor, display, pos2(10.0, 10.0), pos2(90.0, 70.0));
    editor.observe_surface(SurfaceSize::ZERO);

    let store = MemoryRoiStore::new();
    assert_eq!(editor.save(&store), Err(SaveError::SurfaceNotReady));
    assert!(!editor.can_save());
    assert!(store.requests().is_empty());
}

#[test]
fn test_resize_subscription_drives_surface() {
    let mut feed = SurfaceResizeFeed::new();
    let mut editor = RoiEditor::new(CameraId(1), &EditorConfig::default())
        .with_resize_subscription(feed.subscribe());
    assert_eq!(feed.subscriber_count(), 1);

    feed.publish(SurfaceSize::new(640.0, 360.0));
    assert!(editor.sync_surface());
    assert_eq!(editor.surface(), SurfaceSize::new(640.0, 360.0));

    feed.publish(SurfaceSize::new(640.0, 360.0));
    assert!(!editor.sync_surface());

    editor.close();
    assert_eq!(feed.subscriber_count(), 0);
}
