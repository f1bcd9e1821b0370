use std::f32::consts::PI;
use glam::{Quat, Vec2, Vec3};
use crate::camera::{Camera, Extent2D, Perspective};
use crate::error::Error;
use crate::math::Transform;
use crate::renderer::mock_renderer::{MockRenderer, RenderCall};
use crate::renderer::{MaterialId, MaterialParam, ScreenHandle, PARAM_SLICE_NORMAL};
use crate::traveler::{RigidBodyTraveler, TravelerBody};
use crate::portal::{PortalConfig, PortalScreenDesc};
use super::*;

fn desc(id: u64, transform: Transform) -> PortalDesc {
    PortalDesc {
        name: format!("portal_{}", id),
        transform,
        screen: PortalScreenDesc::new(ScreenHandle(id), MaterialId(id), Vec2::new(2.0, 3.0)),
        config: PortalConfig::default(),
    }
}

/// A at the origin facing +Z, B at (10, 0, 0) facing -Z
fn manager_with_pair() -> (PortalManager, PortalKey, PortalKey) {
    let mut manager = PortalManager::new();
    let (a, b) = manager
        .create_portal_pair(
            desc(1, Transform::IDENTITY),
            desc(2, Transform::from_position_rotation(Vec3::new(10.0, 0.0, 0.0), Quat::from_rotation_y(PI))),
        )
        .unwrap();
    (manager, a, b)
}

fn cube(position: Vec3, velocity: Vec3) -> RigidBodyTraveler {
    let body = TravelerBody::new("cube", Transform::from_position(position))
        .with_slice_materials(vec![MaterialId(21)], vec![MaterialId(31)])
        .unwrap();
    RigidBodyTraveler::new(body).with_velocity(velocity, Vec3::ZERO)
}

fn observer(position: Vec3, rotation: Quat) -> Camera {
    Camera::new(
        Transform::from_position_rotation(position, rotation),
        Perspective::default(),
        Extent2D::new(800, 600),
    )
}

fn move_to(manager: &mut PortalManager, key: TravelerKey, position: Vec3) {
    manager.traveler_mut(key).unwrap().body_mut().set_position(position);
}

// ============================================================================
// Setup
// ============================================================================

#[test]
fn test_pair_is_linked_both_ways() {
    let (manager, a, b) = manager_with_pair();

    assert_eq!(manager.portal(a).unwrap().linked(), b);
    assert_eq!(manager.portal(b).unwrap().linked(), a);
    assert_eq!(manager.portal_keys(), &[a, b]);
    assert_eq!(manager.portal_count(), 2);
}

#[test]
fn test_invalid_pair_rejected_without_side_effects() {
    let mut manager = PortalManager::new();
    let mut bad = desc(2, Transform::IDENTITY);
    bad.config.recursion_limit = 0;

    let result = manager.create_portal_pair(desc(1, Transform::IDENTITY), bad);

    assert!(matches!(result, Err(Error::InvalidConfiguration(_))));
    assert_eq!(manager.portal_count(), 0);
}

// ============================================================================
// Trigger signals
// ============================================================================

#[test]
fn test_trigger_enter_and_exit() {
    let (mut manager, a, _) = manager_with_pair();
    let mut renderer = MockRenderer::new();
    let key = manager.add_traveler(cube(Vec3::new(0.0, 0.0, -0.5), Vec3::ZERO));

    assert!(manager.on_trigger_enter(a, key).unwrap());
    assert!(!manager.on_trigger_enter(a, key).unwrap());
    assert_eq!(manager.tracking_portal(key), Some(a));

    assert!(manager.on_trigger_exit(a, key, &mut renderer).unwrap());
    assert!(!manager.on_trigger_exit(a, key, &mut renderer).unwrap());
    assert_eq!(manager.tracking_portal(key), None);
    assert!(!manager.traveler(key).unwrap().body().graphics_clone().visible);
}

#[test]
fn test_enter_ignored_while_tracked_elsewhere() {
    let (mut manager, a, b) = manager_with_pair();
    let key = manager.add_traveler(cube(Vec3::new(0.0, 0.0, -0.5), Vec3::ZERO));
    manager.on_trigger_enter(a, key).unwrap();

    assert!(!manager.on_trigger_enter(b, key).unwrap());

    assert_eq!(manager.tracking_portal(key), Some(a));
    assert!(!manager.portal(b).unwrap().is_tracking(key));
}

/// Second pair with C one unit in front of A, so their volumes overlap
fn add_overlapping_pair(manager: &mut PortalManager) -> (PortalKey, PortalKey) {
    manager
        .create_portal_pair(
            desc(3, Transform::from_position(Vec3::new(0.0, 0.0, 1.0))),
            desc(4, Transform::from_position_rotation(Vec3::new(20.0, 0.0, 0.0), Quat::from_rotation_y(PI))),
        )
        .unwrap()
}

#[test]
fn test_deferred_enter_takes_over_after_exit() {
    let (mut manager, a, _) = manager_with_pair();
    let (c, d) = add_overlapping_pair(&mut manager);
    let mut renderer = MockRenderer::new();
    let key = manager.add_traveler(cube(Vec3::new(0.0, 0.0, 0.5), Vec3::new(0.0, 0.0, 5.0)));

    assert!(manager.on_trigger_enter(a, key).unwrap());
    assert!(!manager.on_trigger_enter(c, key).unwrap());
    assert!(manager.on_trigger_exit(a, key, &mut renderer).unwrap());

    assert_eq!(manager.tracking_portal(key), Some(c));
    assert!(manager.portal(c).unwrap().is_tracking(key));
    assert!(manager.traveler(key).unwrap().body().graphics_clone().visible);

    move_to(&mut manager, key, Vec3::new(0.0, 0.0, 1.5));
    assert_eq!(manager.update(), 1);

    let traveler = manager.traveler(key).unwrap();
    assert!(traveler.transform().position.abs_diff_eq(Vec3::new(20.0, 0.0, -0.5), 1e-5));
    assert_eq!(manager.tracking_portal(key), Some(d));
}

#[test]
fn test_deferred_enter_forgotten_when_volume_left() {
    let (mut manager, a, _) = manager_with_pair();
    let (c, _) = add_overlapping_pair(&mut manager);
    let mut renderer = MockRenderer::new();
    let key = manager.add_traveler(cube(Vec3::new(0.0, 0.0, 0.5), Vec3::ZERO));
    manager.on_trigger_enter(a, key).unwrap();
    manager.on_trigger_enter(c, key).unwrap();

    assert!(!manager.on_trigger_exit(c, key, &mut renderer).unwrap());
    assert!(manager.on_trigger_exit(a, key, &mut renderer).unwrap());

    assert_eq!(manager.tracking_portal(key), None);
    assert!(!manager.portal(c).unwrap().is_tracking(key));
}

#[test]
fn test_unknown_keys_rejected() {
    let (mut manager, a, _) = manager_with_pair();
    let mut renderer = MockRenderer::new();
    let key = manager.add_traveler(cube(Vec3::ZERO, Vec3::ZERO));
    manager.remove_traveler(key, &mut renderer);

    assert!(matches!(manager.on_trigger_enter(a, key), Err(Error::InvalidResource(_))));
    assert!(matches!(
        manager.on_trigger_exit(PortalKey::default(), key, &mut renderer),
        Err(Error::InvalidResource(_))
    ));
}

#[test]
fn test_remove_tracked_traveler_exits_first() {
    let (mut manager, a, _) = manager_with_pair();
    let mut renderer = MockRenderer::new();
    let key = manager.add_traveler(cube(Vec3::new(0.0, 0.0, -0.5), Vec3::ZERO));
    manager.on_trigger_enter(a, key).unwrap();

    let removed = manager.remove_traveler(key, &mut renderer).unwrap();

    assert!(!removed.body().graphics_clone().visible);
    assert_eq!(renderer.param(MaterialId(21), PARAM_SLICE_NORMAL), Some(MaterialParam::Vec3(Vec3::ZERO)));
    assert!(manager.portal(a).unwrap().tracked_travelers().is_empty());
    assert_eq!(manager.tracking_portal(key), None);
    assert_eq!(manager.traveler_count(), 0);
}

// ============================================================================
// Crossing sweep
// ============================================================================

#[test]
fn test_crossing_hands_traveler_to_partner() {
    let (mut manager, a, b) = manager_with_pair();
    let key = manager.add_traveler(cube(Vec3::new(0.0, 0.0, -0.1), Vec3::new(0.0, 0.0, 5.0)));
    manager.on_trigger_enter(a, key).unwrap();
    assert_eq!(manager.update(), 0);

    move_to(&mut manager, key, Vec3::new(0.0, 0.0, 0.1));
    assert_eq!(manager.update(), 1);

    let traveler = manager.traveler(key).unwrap();
    assert!(traveler.transform().position.abs_diff_eq(Vec3::new(10.0, 0.0, -0.1), 1e-5));
    assert!(traveler.velocity().abs_diff_eq(Vec3::new(0.0, 0.0, -5.0), 1e-5));
    assert!(!manager.portal(a).unwrap().is_tracking(key));
    assert!(manager.portal(b).unwrap().is_tracking(key));
    assert_eq!(manager.tracking_portal(key), Some(b));

    // B takes the pose as its baseline; no bounce back
    assert_eq!(manager.update(), 0);
    assert_eq!(manager.tracking_portal(key), Some(b));
}

#[test]
fn test_round_trip_restores_pose() {
    let (mut manager, a, _) = manager_with_pair();
    let key = manager.add_traveler(cube(Vec3::new(0.3, 0.5, -0.1), Vec3::new(1.0, 0.0, 5.0)));
    manager.on_trigger_enter(a, key).unwrap();
    manager.update();

    move_to(&mut manager, key, Vec3::new(0.3, 0.5, 0.1));
    assert_eq!(manager.update(), 1);
    let there = manager.traveler(key).unwrap().transform().position;
    assert!(there.abs_diff_eq(Vec3::new(9.7, 0.5, -0.1), 1e-5));

    // step back through B the way it came
    move_to(&mut manager, key, Vec3::new(9.7, 0.5, 0.1));
    assert_eq!(manager.update(), 1);

    let traveler = manager.traveler(key).unwrap();
    assert!(traveler.transform().position.abs_diff_eq(Vec3::new(0.3, 0.5, -0.1), 1e-5));
    assert!(traveler.velocity().abs_diff_eq(Vec3::new(1.0, 0.0, 5.0), 1e-5));
    assert_eq!(manager.tracking_portal(key), Some(a));
}

// ============================================================================
// Frame sweeps
// ============================================================================

#[test]
fn test_render_frame_runs_three_sweeps_in_order() {
    let (mut manager, a, b) = manager_with_pair();
    let mut renderer = MockRenderer::new();
    let key = manager.add_traveler(cube(Vec3::new(0.0, 0.0, -0.1), Vec3::ZERO));
    manager.on_trigger_enter(a, key).unwrap();
    // looking at B's screen from its front
    let camera = observer(Vec3::new(10.0, 0.0, -5.0), Quat::from_rotation_y(PI));

    let report = manager.render_frame(&camera, &mut renderer);

    assert!(report.is_ok());
    assert_eq!((report.rendered, report.culled, report.passes), (1, 1, 1));

    let first_slice = renderer
        .calls
        .iter()
        .position(|c| matches!(c, RenderCall::Param { name, .. } if name == PARAM_SLICE_NORMAL))
        .unwrap();
    let first_render = renderer.calls.iter().position(|c| matches!(c, RenderCall::Render { .. })).unwrap();
    assert!(first_slice < first_render);

    let screens: Vec<ScreenHandle> = renderer
        .calls
        .iter()
        .filter_map(|c| match c {
            RenderCall::ScreenTransform { screen, .. } => Some(*screen),
            _ => None,
        })
        .collect();
    assert_eq!(screens, vec![ScreenHandle(1), ScreenHandle(2)]);
    assert!(matches!(renderer.calls.last(), Some(RenderCall::ScreenTransform { .. })));
    assert!(manager.portal(b).unwrap().portal_camera().target().is_none());
}

#[test]
fn test_failed_portal_does_not_stop_the_others() {
    let (mut manager, a, b) = manager_with_pair();
    let mut renderer = MockRenderer::new();
    renderer.fail_allocations = true;
    // far back enough to see both screens
    let camera = observer(Vec3::new(5.0, 0.0, -20.0), Quat::from_rotation_y(PI));

    let report = manager.render_frame(&camera, &mut renderer);

    let failed: Vec<PortalKey> = report.failures.iter().map(|(key, _)| *key).collect();
    assert_eq!(failed, vec![a, b]);
    assert!(!report.is_ok());
    assert_eq!(report.rendered, 0);
    // post-render sweep still ran
    assert!(matches!(renderer.calls.last(), Some(RenderCall::ScreenTransform { .. })));
}

#[test]
fn test_shutdown_releases_targets() {
    let (mut manager, _, _) = manager_with_pair();
    let mut renderer = MockRenderer::new();
    let camera = observer(Vec3::new(5.0, 0.0, -20.0), Quat::from_rotation_y(PI));
    let report = manager.render_frame(&camera, &mut renderer);
    assert_eq!(report.rendered, 2);
    assert_eq!(renderer.live_targets.len(), 2);

    manager.shutdown(&mut renderer);

    assert!(renderer.live_targets.is_empty());
}
