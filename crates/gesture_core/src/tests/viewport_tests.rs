use super::*;
use crate::{
    test_support::{dims, recording_port},
    tuning::LayoutConfig,
};
use injection::{InjectionCall, RecordingPort};

fn viewport_on(port: &Arc<RecordingPort>, quadrant: Quadrant) -> Viewport {
    let dyn_port: Arc<dyn InjectionPort> = port.clone();
    Viewport::new(
        quadrant,
        *LayoutConfig::default().geometry(quadrant),
        &Tuning::default(),
        dyn_port,
    )
}

#[tokio::test]
async fn resolves_anchor_plus_offset_or_surface_center() {
    let port = recording_port();
    let mut viewport = viewport_on(&port, Quadrant::TopLeft);
    assert_eq!(viewport.resolve_screen_position(false), Vec2::new(250.0, 200.0));

    viewport.set_offset(Some(-30.0), Some(12.0));
    assert_eq!(viewport.resolve_screen_position(false), Vec2::new(220.0, 212.0));
    assert_eq!(viewport.resolve_screen_position(true), dims().center());
}

#[tokio::test]
async fn set_offset_touches_only_supplied_axes() {
    let port = recording_port();
    let mut viewport = viewport_on(&port, Quadrant::BottomLeft);
    viewport.set_offset(Some(40.0), Some(-8.0));
    viewport.set_offset(None, Some(0.0));
    assert_eq!(viewport.offset(), Vec2::new(40.0, 0.0));
    viewport.set_offset(Some(0.0), None);
    assert_eq!(viewport.offset(), Vec2::zeros());
}

#[tokio::test]
async fn pan_presses_moves_then_releases_after_settling() {
    let port = recording_port();
    let viewport = viewport_on(&port, Quadrant::TopLeft);

    viewport
        .pan(Vec2::new(12.0, -12.0), ButtonCode(2), false)
        .await
        .expect("pan");
    assert!(viewport.is_pan_locked());
    assert_eq!(
        port.calls().await,
        vec![
            InjectionCall::Move { x: 250.0, y: 200.0 },
            InjectionCall::MouseDown(ButtonCode(2)),
            InjectionCall::MoveRelative { dx: 24.0, dy: -24.0 },
        ]
    );

    viewport.settle().await;
    assert!(!viewport.is_pan_locked());
    let calls = port.calls().await;
    assert_eq!(
        &calls[3..],
        &[
            InjectionCall::MouseUp(ButtonCode(2)),
            InjectionCall::Click(ButtonCode(2)),
        ]
    );
}

#[tokio::test]
async fn pan_while_locked_only_moves_relative() {
    let port = recording_port();
    let viewport = viewport_on(&port, Quadrant::TopLeft);

    viewport
        .pan(Vec2::new(1.0, 1.0), ButtonCode(2), false)
        .await
        .expect("first pan");
    viewport
        .pan(Vec2::new(3.0, -2.0), ButtonCode(2), false)
        .await
        .expect("second pan");

    let calls = port.calls().await;
    assert_eq!(calls.len(), 4);
    assert_eq!(calls[3], InjectionCall::MoveRelative { dx: 6.0, dy: -4.0 });
    assert_eq!(
        calls
            .iter()
            .filter(|call| matches!(call, InjectionCall::MouseDown(_)))
            .count(),
        1
    );
    viewport.settle().await;
}

#[tokio::test]
async fn zoom_drags_vertically_under_its_own_lock() {
    let port = recording_port();
    let viewport = viewport_on(&port, Quadrant::BottomRight);

    viewport.zoom(-7.5, ButtonCode(3), false).await.expect("zoom");
    assert!(viewport.is_zoom_locked());
    assert!(!viewport.is_pan_locked());
    assert_eq!(
        port.calls().await,
        vec![
            InjectionCall::Move { x: 750.0, y: 600.0 },
            InjectionCall::MouseDown(ButtonCode(3)),
            InjectionCall::MoveRelative { dx: 0.0, dy: -7.5 },
        ]
    );
    viewport.settle().await;
    assert!(!viewport.is_zoom_locked());
}

#[tokio::test]
async fn failed_press_does_not_take_the_lock() {
    let port = Arc::new(
        RecordingPort::new(dims()).failing_on(shared::error::InjectionOp::MouseDown),
    );
    let viewport = viewport_on(&port, Quadrant::TopLeft);
    assert!(viewport
        .pan(Vec2::new(1.0, 1.0), ButtonCode(2), false)
        .await
        .is_err());
    assert!(!viewport.is_pan_locked());
}

#[tokio::test]
async fn free_viewport_pinch_is_one_full_cycle() {
    let port = recording_port();
    let viewport = viewport_on(&port, Quadrant::BottomRight);
    viewport
        .pinch_drag(Vec2::new(5.0, 4.0), ButtonCode(1), false)
        .await
        .expect("pinch");
    assert_eq!(
        port.calls().await,
        vec![
            InjectionCall::Move { x: 750.0, y: 600.0 },
            InjectionCall::MouseDown(ButtonCode(1)),
            InjectionCall::MoveRelative { dx: 10.0, dy: 8.0 },
            InjectionCall::MouseUp(ButtonCode(1)),
            InjectionCall::Click(ButtonCode(1)),
        ]
    );
    assert!(!viewport.is_pan_locked());
}

#[tokio::test]
async fn bounded_clamp_is_idempotent_at_the_edge() {
    let port = recording_port();
    let mut viewport = viewport_on(&port, Quadrant::TopLeft);
    let bounds = viewport.bounding_box().expect("bounded");

    let (first, change) = viewport
        .clamp_relative(Vec2::new(900.0, -900.0))
        .expect("bounded");
    assert_eq!(first, Vec2::new(450.0, 40.0));
    assert_eq!(
        change,
        OffsetChange {
            x: Some(200.0),
            y: Some(-160.0)
        }
    );

    let (second, change) = viewport
        .clamp_relative(Vec2::new(900.0, -900.0))
        .expect("bounded");
    assert_eq!(second, first);
    assert!(change.is_empty());
    assert!(bounds.contains(viewport.resolve_screen_position(false), dims()));
}

#[tokio::test]
async fn free_viewport_has_no_bounded_clamp() {
    let port = recording_port();
    let mut viewport = viewport_on(&port, Quadrant::BottomRight);
    assert!(viewport.clamp_relative(Vec2::new(1.0, 1.0)).is_none());
    assert_eq!(viewport.offset(), Vec2::zeros());
}
