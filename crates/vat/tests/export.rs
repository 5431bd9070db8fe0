//! End-to-end exports through scene dumps and EXR files.

use std::fs;
use std::path::PathBuf;

use glam::Vec3;
use vat::emit::{read_exr, verify_exr};
use vat::scene::{DumpFrame, DumpVertex, ObjectInfo};
use vat::{
    BakeError, BakeOptions, CancelToken, Error, ExportSettings, Precondition, SampleError,
    SceneDump, VERTEX_INDEX_LAYER, export,
};
use vat_encode::pack::pack3_bits;

/// Fresh directory under the system temp dir, unique per test.
fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("vat-test-{}-{name}", std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();
    dir
}

fn frame(frame: i32, positions: &[Vec3], normal: Vec3) -> DumpFrame {
    DumpFrame {
        frame,
        vertices: positions
            .iter()
            .enumerate()
            .map(|(index, &position)| DumpVertex {
                index,
                position,
                normal,
            })
            .collect(),
    }
}

fn mesh(frames: Vec<DumpFrame>, frame_start: i32, frame_end: i32) -> SceneDump {
    SceneDump {
        object: ObjectInfo {
            name: "Cube".to_owned(),
            kind: "MESH".to_owned(),
            uv_layers: vec!["UVMap".to_owned(), VERTEX_INDEX_LAYER.to_owned()],
        },
        frame_start,
        frame_end,
        frames,
        loops: Vec::new(),
    }
}

/// Three vertices at the origin in frame 0, moved onto the axes in frame 1.
fn axes_scene() -> SceneDump {
    mesh(
        vec![
            frame(0, &[Vec3::ZERO; 3], Vec3::Z),
            frame(1, &[Vec3::X, Vec3::Y, Vec3::Z], Vec3::Z),
        ],
        0,
        1,
    )
}

fn without_normals() -> ExportSettings {
    ExportSettings {
        bake: BakeOptions {
            export_normal: false,
            ..BakeOptions::default()
        },
        ..ExportSettings::default()
    }
}

#[test]
fn axes_scenario_round_trips_through_exr() {
    let dir = scratch_dir("axes");
    let summary = export(
        &axes_scene(),
        &dir.join("axes.exr"),
        &without_normals(),
        &CancelToken::new(),
    )
    .unwrap();

    let (width, height, texels) = read_exr(&summary.path).unwrap();
    assert_eq!((width, height), (3, 2));
    assert_eq!(texels[..12], [0.0; 12]);
    assert_eq!(
        texels[12..],
        [1.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0]
    );
}

#[test]
fn packed_normals_survive_the_file() {
    let dir = scratch_dir("normals");
    let normal = Vec3::new(0.267, 0.535, 0.802);
    let scene = mesh(
        vec![
            frame(0, &[Vec3::ZERO; 2], Vec3::Z),
            frame(1, &[Vec3::X, Vec3::NEG_X], normal),
        ],
        1,
        1,
    );

    let summary = export(
        &scene,
        &dir.join("normals.exr"),
        &ExportSettings::default(),
        &CancelToken::new(),
    )
    .unwrap();

    verify_exr(&summary.buffer, &summary.path).unwrap();
    let (_, _, texels) = read_exr(&summary.path).unwrap();
    assert_eq!(texels[3].to_bits(), pack3_bits(normal));
    assert_eq!(texels[7].to_bits(), pack3_bits(normal));
}

#[test]
fn scene_dump_file_drives_export() {
    let dir = scratch_dir("from-file");
    let scene_path = dir.join("scene.json");
    fs::write(&scene_path, serde_json::to_string_pretty(&axes_scene()).unwrap()).unwrap();

    let scene = SceneDump::from_path(&scene_path).unwrap();
    let summary = export(
        &scene,
        &dir.join("baked"),
        &without_normals(),
        &CancelToken::new(),
    )
    .unwrap();

    assert_eq!(summary.path, dir.join("baked.exr"));
    assert!(summary.path.exists());
    assert_eq!(summary.buffer.as_slice().len(), 2 * 3 * 4);
}

#[test]
fn frame_range_override_is_used() {
    let dir = scratch_dir("override");
    let settings = ExportSettings {
        start: Some(1),
        ..without_normals()
    };

    let summary = export(
        &axes_scene(),
        &dir.join("late.exr"),
        &settings,
        &CancelToken::new(),
    )
    .unwrap();

    assert_eq!(summary.buffer.height(), 1);
    assert_eq!(summary.buffer.start_frame(), 1);
    assert_eq!(summary.buffer.texel(2, 0), Some([0.0, 0.0, 1.0, 0.0]));
}

#[test]
fn non_mesh_writes_nothing() {
    let dir = scratch_dir("not-mesh");
    let output = dir.join("rig.exr");
    let mut scene = axes_scene();
    scene.object.kind = "ARMATURE".to_owned();

    let err = export(&scene, &output, &ExportSettings::default(), &CancelToken::new()).unwrap_err();

    assert!(matches!(
        err,
        Error::PreconditionFailed(Precondition::NotAMesh { .. })
    ));
    assert!(!output.exists());
}

#[test]
fn missing_index_layer_writes_nothing() {
    let dir = scratch_dir("no-uv");
    let output = dir.join("cube.exr");
    let mut scene = axes_scene();
    scene.object.uv_layers.clear();

    let err = export(&scene, &output, &ExportSettings::default(), &CancelToken::new()).unwrap_err();

    assert!(matches!(
        err,
        Error::PreconditionFailed(Precondition::MissingUvLayer { .. })
    ));
    assert!(!output.exists());
}

#[test]
fn topology_change_writes_nothing() {
    let dir = scratch_dir("topology");
    let output = dir.join("broken.exr");
    let scene = mesh(
        vec![
            frame(0, &[Vec3::ZERO; 3], Vec3::Z),
            frame(1, &[Vec3::X, Vec3::Y], Vec3::Z),
        ],
        0,
        1,
    );

    let err = export(&scene, &output, &ExportSettings::default(), &CancelToken::new()).unwrap_err();

    assert!(matches!(
        err,
        Error::Bake(BakeError::BakeFailed(SampleError::InvalidFrame {
            frame: 1,
            expected: 3,
            actual: 2,
        }))
    ));
    assert_eq!(fs::read_dir(&dir).unwrap().count(), 0);
}

#[test]
fn failed_export_keeps_previous_texture() {
    let dir = scratch_dir("keep-previous");
    let output = dir.join("walk.exr");
    fs::write(&output, b"previous").unwrap();
    let settings = ExportSettings {
        start: Some(1),
        end: Some(0),
        ..ExportSettings::default()
    };

    let err = export(&axes_scene(), &output, &settings, &CancelToken::new()).unwrap_err();

    assert!(matches!(
        err,
        Error::Bake(BakeError::InvalidRange { start: 1, end: 0 })
    ));
    assert_eq!(fs::read(&output).unwrap(), b"previous");
}

#[test]
fn cancelled_export_writes_nothing() {
    let dir = scratch_dir("cancel");
    let output = dir.join("cancelled.exr");
    let cancel = CancelToken::new();
    cancel.cancel();

    let err = export(&axes_scene(), &output, &ExportSettings::default(), &cancel).unwrap_err();

    assert!(matches!(err, Error::Bake(BakeError::Cancelled { frame: 0 })));
    assert!(!output.exists());
}

#[test]
fn empty_mesh_is_rejected_before_writing() {
    let dir = scratch_dir("empty");
    let output = dir.join("empty.exr");
    let scene = mesh(vec![frame(0, &[], Vec3::Z)], 0, 0);

    let err = export(&scene, &output, &ExportSettings::default(), &CancelToken::new()).unwrap_err();

    assert!(matches!(err, Error::EmptyTexture));
    assert!(!output.exists());
}
