use boardkit_core::{Bounds, Position};
use boardkit_editor::{
    soft_clamp, Camera, ControlPointManager, ControlPointType, CoordinateSystem, Scale,
    ScreenSpaceSystem, Transform, TransformLimits,
};
use proptest::prelude::*;

fn close(a: Position, b: Position) -> bool {
    (a.x - b.x).abs() < 1e-6 && (a.y - b.y).abs() < 1e-6
}

proptest! {
    #[test]
    fn screen_world_round_trip(
        x in -5000.0f64..5000.0,
        y in -5000.0f64..5000.0,
        cam_x in -2000.0f64..2000.0,
        cam_y in -2000.0f64..2000.0,
        zoom in 0.1f64..10.0,
        dpr in 1.0f64..3.0,
    ) {
        let system = CoordinateSystem::with_device_pixel_ratio(dpr);
        let camera = Camera::new(cam_x, cam_y, zoom);
        let p = Position::new(x, y);
        let back = system.world_to_screen(system.screen_to_world(p, &camera), &camera);
        prop_assert!(close(p, back));
    }

    #[test]
    fn local_space_round_trip(
        x in -500.0f64..500.0,
        y in -500.0f64..500.0,
        rotation in -3.0f64..3.0,
        sx in 0.2f64..4.0,
        sy in 0.2f64..4.0,
        flipped in any::<bool>(),
        zoom in 0.25f64..4.0,
    ) {
        let space = ScreenSpaceSystem::new();
        let camera = Camera::new(120.0, -40.0, zoom);
        let transform = Transform {
            position: Position::new(33.0, -12.0),
            rotation,
            scale: Scale::new(sx, sy),
            is_flipped: flipped,
        };
        let p = Position::new(x, y);
        let local = space.screen_to_local_space(p, &transform, &camera);
        let back = space.local_to_screen(local, &transform, &camera);
        prop_assert!((p.x - back.x).abs() < 1e-6 && (p.y - back.y).abs() < 1e-6);
    }

    #[test]
    fn soft_clamp_stays_in_range(value in -100.0f64..100.0) {
        let v = soft_clamp(value, 0.1, 5.0, 0.05);
        prop_assert!(v >= 0.1 - 1e-9 && v <= 5.0 + 1e-9);
    }

    #[test]
    fn soft_clamp_is_monotone(a in -10.0f64..10.0, b in -10.0f64..10.0) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(soft_clamp(lo, 0.1, 5.0, 0.05) <= soft_clamp(hi, 0.1, 5.0, 0.05) + 1e-12);
    }
}

#[test]
fn test_dpr_scales_screen_to_world() {
    let system = CoordinateSystem::with_device_pixel_ratio(2.0);
    let camera = Camera::new(100.0, 50.0, 2.0);
    let world = system.screen_to_world(Position::new(150.0, 75.0), &camera);
    assert!(close(world, Position::new(100.0, 50.0)));
}

#[test]
fn test_control_points_clockwise_from_top_left() {
    let manager = ControlPointManager::default();
    let points = manager.get_control_points(&Bounds::new(-50.0, -20.0, 50.0, 20.0));

    assert_eq!(points[ControlPointType::TopLeft.index() as usize], Position::new(-50.0, -20.0));
    assert_eq!(points[ControlPointType::TopCenter.index() as usize], Position::new(0.0, -20.0));
    assert_eq!(points[ControlPointType::TopRight.index() as usize], Position::new(50.0, -20.0));
    assert_eq!(points[ControlPointType::MiddleRight.index() as usize], Position::new(50.0, 0.0));
    assert_eq!(points[ControlPointType::BottomRight.index() as usize], Position::new(50.0, 20.0));
    assert_eq!(points[ControlPointType::BottomCenter.index() as usize], Position::new(0.0, 20.0));
    assert_eq!(points[ControlPointType::BottomLeft.index() as usize], Position::new(-50.0, 20.0));
    assert_eq!(points[ControlPointType::MiddleLeft.index() as usize], Position::new(-50.0, 0.0));
}

#[test]
fn test_control_point_indices_round_trip() {
    for index in -1..=8 {
        let cp = ControlPointType::from_index(index).unwrap();
        assert_eq!(cp.index(), index);
    }
    assert!(ControlPointType::from_index(9).is_none());
}

#[test]
fn test_scale_limits_are_hard_bounds() {
    let limits = TransformLimits::default();
    assert!(limits.clamp_scale(0.0) >= limits.min_scale - 1e-9);
    assert!(limits.clamp_scale(1000.0) <= limits.max_scale + 1e-9);
    assert_eq!(limits.clamp_scale(1.0), 1.0);
}

#[test]
fn test_visible_bounds_follow_camera() {
    let system = CoordinateSystem::new();
    let camera = Camera::new(400.0, 300.0, 2.0);
    let bounds = system.get_visible_bounds(&camera, 800.0, 600.0);
    assert!((bounds.left + 200.0).abs() < 1e-9);
    assert!((bounds.top + 150.0).abs() < 1e-9);
    assert!((bounds.right - 200.0).abs() < 1e-9);
    assert!((bounds.bottom - 150.0).abs() < 1e-9);
}
