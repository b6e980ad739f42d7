use super::*;
use crate::test_support::{frame, hand};

#[test]
fn absent_hands_satisfy_no_predicate() {
    assert!(!is_pinched(None, 0.0));
    assert!(!is_extended(Finger::Thumb, None));
    assert!(!is_l_shape(None));
    assert!(!is_open_palm(None));
    assert!(!is_swipe_pose(None));
    assert!(!palm_facing_forward(None, 0.0));
}

#[test]
fn pinch_threshold_is_inclusive() {
    let at_threshold = hand(1).pinch(0.96).build();
    let below = hand(1).pinch(0.95).build();
    assert!(is_pinched(Some(&at_threshold), 0.96));
    assert!(!is_pinched(Some(&below), 0.96));
    assert!(is_pinched(Some(&below), 0.93));
}

#[test]
fn finger_patterns_require_exact_extension() {
    let l_shape = hand(1).l_shape().build();
    let pointing = hand(1).fingers([false, true, false, false, false]).build();
    let open = hand(1).open_palm().build();
    let swipe = hand(1).swipe_pose().build();

    assert!(is_l_shape(Some(&l_shape)));
    assert!(!is_l_shape(Some(&pointing)));
    assert!(!is_l_shape(Some(&open)));
    assert!(is_open_palm(Some(&open)));
    assert!(!is_open_palm(Some(&swipe)));
    assert!(is_swipe_pose(Some(&swipe)));
    assert!(is_extended(Finger::Index, Some(&pointing)));
}

#[test]
fn palm_faces_forward_only_past_negative_depth_threshold() {
    let forward = hand(1).normal(0.0, -0.3, -0.8).build();
    let down = hand(1).normal(0.0, -1.0, 0.0).build();
    assert!(palm_facing_forward(Some(&forward), -0.55));
    assert!(!palm_facing_forward(Some(&down), -0.55));
}

#[test]
fn displacement_uses_current_hand_and_its_prior_pose() {
    let previous = frame(vec![hand(1).at(0.0, 100.0, 0.0).build()]);
    let current = frame(vec![hand(1).at(3.0, 96.0, 1.0).build()]);
    let pair = FramePair::new(&previous, &current);

    assert_eq!(
        displacement(pair, HandSlot::First),
        Some(Vec3::new(3.0, -4.0, 1.0))
    );
    assert_eq!(squared_velocity(pair, HandSlot::First), Some(26.0));
    assert_eq!(displacement(pair, HandSlot::Second), None);
}

#[test]
fn displacement_is_absent_for_hand_new_in_current_frame() {
    let previous = frame(vec![hand(1).build()]);
    let current = frame(vec![hand(2).build()]);
    assert_eq!(
        displacement(FramePair::new(&previous, &current), HandSlot::First),
        None
    );
}

#[test]
fn stretch_delta_is_positive_when_hands_move_apart() {
    let previous = frame(vec![
        hand(1).at(-50.0, 200.0, 0.0).build(),
        hand(2).at(50.0, 200.0, 0.0).build(),
    ]);
    let current = frame(vec![
        hand(1).at(-60.0, 200.0, 0.0).build(),
        hand(2).at(55.0, 200.0, 0.0).build(),
    ]);

    assert_eq!(
        stretch_delta(FramePair::new(&previous, &current)),
        Some(15.0)
    );
    assert_eq!(
        stretch_delta(FramePair::new(&current, &previous)),
        Some(-15.0)
    );
}

#[test]
fn stretch_delta_needs_two_hands_in_both_frames() {
    let one = frame(vec![hand(1).build()]);
    let two = frame(vec![
        hand(1).at(-50.0, 200.0, 0.0).build(),
        hand(2).at(50.0, 200.0, 0.0).build(),
    ]);
    assert_eq!(stretch_delta(FramePair::new(&one, &two)), None);
    assert_eq!(stretch_delta(FramePair::new(&two, &one)), None);
    assert_eq!(
        inter_hand_distance(&two.hands[0], &two.hands[1]),
        100.0
    );
}
