// tests/gallery_walkthrough.rs
//
// Drives the non-GPU half of the gallery the way the app does each frame.

use std::f32::consts::PI;

use cylinder_gallery::engine_lib::camera::Camera;
use cylinder_gallery::engine_lib::config::GalleryConfig;
use cylinder_gallery::engine_lib::controller::InputState;
use cylinder_gallery::engine_lib::pick::{pick_nearest, screen_to_ray, PickHit, Ray};
use cylinder_gallery::engine_lib::scene_logic::{CameraMode, CameraRig};
use cylinder_gallery::engine_lib::scene_types::PickTarget;
use cylinder_gallery::gallery_scene::create_gallery_scene;
use glam::{Vec2, Vec3};

const DT: f32 = 1.0 / 60.0;
const VIEWPORT: Vec2 = Vec2::new(800.0, 600.0);

const SMALL_GALLERY: &str = r#"
artwork_count = 4
radius = 10.0
focus_duration_ms = 1000
image_pattern = ""
show_reference_cube = false
"#;

fn click_center(camera: &Camera, rig: &mut CameraRig, targets: &[PickTarget]) -> Option<PickHit> {
    let ray = screen_to_ray(VIEWPORT / 2.0, VIEWPORT, camera.view_projection(&rig.pose));
    let hit = pick_nearest(&ray, targets)?;
    rig.focus_on_hit(&hit);
    Some(hit)
}

fn run_ticks(rig: &mut CameraRig, input: &InputState, ticks: usize) {
    for _ in 0..ticks {
        rig.tick(input, DT);
    }
}

fn setup() -> (GalleryConfig, Camera, CameraRig) {
    let config = GalleryConfig::from_toml_str(SMALL_GALLERY).unwrap();
    let mut camera = Camera::from_config(&config.camera);
    camera.set_viewport(VIEWPORT.x as u32, VIEWPORT.y as u32);
    let rig = CameraRig::from_config(&config);
    (config, camera, rig)
}

#[test]
fn walking_forward_stops_at_the_boundary() {
    let (config, _camera, mut rig) = setup();
    let input = InputState { move_forward: true, ..Default::default() };

    run_ticks(&mut rig, &input, 200);

    let p = rig.pose.position;
    let planar = Vec2::new(p.x, p.z).length();
    assert!((planar - config.boundary()).abs() < 1e-4, "planar distance {planar}");
    assert!(p.z < 0.0);
    assert!((p.y - config.camera.eye_height).abs() < 1e-6);
}

#[test]
fn clicking_an_artwork_glides_in_front_of_it() {
    let (config, camera, mut rig) = setup();
    let scene = create_gallery_scene(&config);

    // Yaw 0 looks down -Z, where slot 3 of 4 hangs.
    let hit = click_center(&camera, &mut rig, &scene.pick_targets).expect("artwork ahead");
    assert_eq!(hit.slot_index, 3);
    assert!(rig.is_animating());

    run_ticks(&mut rig, &InputState::default(), 70);

    assert_eq!(rig.mode, CameraMode::FreeNavigation);
    let expected = Vec3::new(0.0, config.artwork_center_height(), -(config.boundary() - config.focus_standoff));
    assert!(rig.pose.position.abs_diff_eq(expected, 1e-4), "{:?}", rig.pose.position);
}

#[test]
fn movement_keys_do_not_fight_the_glide() {
    let (config, camera, mut rig) = setup();
    let scene = create_gallery_scene(&config);
    click_center(&camera, &mut rig, &scene.pick_targets).unwrap();

    let strafing = InputState { move_right: true, move_backward: true, ..Default::default() };
    run_ticks(&mut rig, &strafing, 70);

    assert!(rig.pose.position.x.abs() < 1e-4);
    assert!((rig.pose.position.z + (config.boundary() - config.focus_standoff)).abs() < 1e-4);
}

#[test]
fn a_second_click_retargets_from_the_current_position() {
    let (config, camera, mut rig) = setup();
    let scene = create_gallery_scene(&config);
    click_center(&camera, &mut rig, &scene.pick_targets).unwrap();
    run_ticks(&mut rig, &InputState::default(), 20);
    let mid_glide = rig.pose.position;
    assert!(mid_glide.z < 0.0);

    rig.pose.yaw = PI;
    let hit = click_center(&camera, &mut rig, &scene.pick_targets).expect("artwork behind");
    assert_eq!(hit.slot_index, 1);
    match &rig.mode {
        CameraMode::Animating(interp) => assert_eq!(interp.start, mid_glide),
        other => panic!("expected a glide, got {other:?}"),
    }

    run_ticks(&mut rig, &InputState::default(), 70);
    let expected = Vec3::new(0.0, config.artwork_center_height(), config.boundary() - config.focus_standoff);
    assert!(rig.pose.position.abs_diff_eq(expected, 1e-4), "{:?}", rig.pose.position);
}

#[test]
fn looking_straight_up_picks_nothing() {
    let (config, _camera, mut rig) = setup();
    let scene = create_gallery_scene(&config);
    let ray = Ray::new(rig.pose.position, Vec3::Y);
    assert!(pick_nearest(&ray, &scene.pick_targets).is_none());
    assert!(!rig.is_animating());
    rig.tick(&InputState::default(), DT);
    assert_eq!(rig.pose.position, Vec3::new(0.0, config.camera.eye_height, 0.0));
}
