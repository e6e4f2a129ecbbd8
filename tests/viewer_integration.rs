//! Integration tests for the viewer state machine
//!
//! Captures come from a mocked loader so these tests only cover how the
//! viewer reacts to loads, failures and pointer input.

mod common;

use std::path::Path;

use mockall::mock;
use scope_viewer::capture::{CaptureLoader, CsvCaptureLoader};
use scope_viewer::cursor::{Axis, CursorId, CursorModel, PlotPos, PlotViewport, PointerEvent};
use scope_viewer::types::{Capture, Channel, Metadata, Waveform};
use scope_viewer::viewer::{Viewer, ViewerAction};
use scope_viewer::{Result, ScopeError};

mock! {
    pub Loader {}

    impl CaptureLoader for Loader {
        fn load(&self, path: &Path) -> Result<Capture>;
    }
}

fn ramp_capture(path: &Path) -> Capture {
    let time: Vec<f64> = (0..11).map(|i| i as f64 / 10.0).collect();
    let volts: Vec<f64> = time.iter().map(|t| t * 2.0).collect();
    let waveform = Waveform::new(time, vec![Channel::new("CH1", volts)]).unwrap();
    let mut metadata = Metadata::new();
    metadata.insert("Model", "TBS1052B");
    Capture::new(path, waveform, metadata)
}

fn viewport() -> PlotViewport {
    PlotViewport::new([0.0, 1.0], [0.0, 2.0])
}

fn double_click(viewer: &mut Viewer<MockLoader>, x: f64, y: f64) -> bool {
    viewer.dispatch(ViewerAction::Pointer {
        event: PointerEvent::DoubleClick(PlotPos::new(x, y)),
        viewport: viewport(),
    })
}

#[test]
fn test_failed_load_keeps_capture() {
    let mut loader = MockLoader::new();
    loader
        .expect_load()
        .withf(|path| path.ends_with("good.csv"))
        .times(1)
        .returning(|path| Ok(ramp_capture(path)));
    loader
        .expect_load()
        .withf(|path| path.ends_with("bad.csv"))
        .times(1)
        .returning(|_| Err(ScopeError::NoChannels));

    let mut viewer = Viewer::new(loader, CursorModel::default());
    assert!(viewer.dispatch(ViewerAction::OpenFile("good.csv".into())));
    assert!(!viewer.dispatch(ViewerAction::OpenFile("bad.csv".into())));

    assert_eq!(viewer.current_path(), Some(Path::new("good.csv")));
    assert_eq!(viewer.capture().unwrap().waveform.len(), 11);
    assert!(viewer.status().starts_with("Error loading bad.csv"));
    assert!(viewer.last_error().is_some());
}

#[test]
fn test_cursors_are_remembered_per_file() {
    let mut loader = MockLoader::new();
    loader
        .expect_load()
        .returning(|path| Ok(ramp_capture(path)));

    let mut viewer = Viewer::new(loader, CursorModel::default());
    viewer.dispatch(ViewerAction::OpenFile("a.csv".into()));
    viewer.dispatch(ViewerAction::SetPairEnabled {
        axis: Axis::Time,
        enabled: true,
    });
    assert!(double_click(&mut viewer, 0.2, 1.0));
    assert!(double_click(&mut viewer, 0.7, 1.0));
    common::assert_float_eq(viewer.readout().delta_t.unwrap(), 0.5, 1e-12);

    let region = viewer.channels()[0].region.unwrap();
    common::assert_float_eq(region.vmax, 1.4, 1e-9);

    // a fresh file starts without markers
    viewer.dispatch(ViewerAction::OpenFile("b.csv".into()));
    assert!(viewer.readout().position(CursorId::TIME1).is_none());
    assert!(viewer.channels()[0].region.is_none());

    // coming back restores them
    viewer.dispatch(ViewerAction::OpenFile("a.csv".into()));
    assert_eq!(viewer.readout().position(CursorId::TIME1), Some(0.2));
    assert_eq!(viewer.readout().position(CursorId::TIME2), Some(0.7));
    assert!(viewer.channels()[0].region.is_some());
}

#[test]
fn test_drag_moves_marker_within_tolerance() {
    let mut loader = MockLoader::new();
    loader
        .expect_load()
        .returning(|path| Ok(ramp_capture(path)));

    let mut viewer = Viewer::new(loader, CursorModel::default());
    viewer.dispatch(ViewerAction::OpenFile("a.csv".into()));
    viewer.dispatch(ViewerAction::SetPairEnabled {
        axis: Axis::Voltage,
        enabled: true,
    });
    double_click(&mut viewer, 0.5, 0.5);
    double_click(&mut viewer, 0.5, 1.5);

    // 2% of a 2 V span is 0.04 V
    let press = |y| ViewerAction::Pointer {
        event: PointerEvent::Press(PlotPos::new(0.5, y)),
        viewport: viewport(),
    };
    viewer.dispatch(press(0.6));
    assert!(!viewer.cursors().is_dragging());
    viewer.dispatch(press(0.53));
    assert_eq!(viewer.cursors().dragging(), Some(CursorId::VOLT1));

    viewer.dispatch(ViewerAction::Pointer {
        event: PointerEvent::Move(PlotPos::new(0.5, 0.9)),
        viewport: viewport(),
    });
    viewer.dispatch(ViewerAction::Pointer {
        event: PointerEvent::Release,
        viewport: viewport(),
    });

    assert!(!viewer.cursors().is_dragging());
    assert_eq!(viewer.readout().position(CursorId::VOLT1), Some(0.9));
    common::assert_float_eq(viewer.readout().delta_v.unwrap(), 0.6, 1e-12);
}

#[test]
fn test_real_loader_with_folder() {
    let dir = tempfile::tempdir().unwrap();
    let good = common::write_capture(dir.path(), "good.csv", "TIME,CH1\n0,0\n1,1\n");
    common::write_capture(dir.path(), "sub/bad.csv", "TIME,CH1\n0,zero\n");

    let mut viewer = Viewer::new(CsvCaptureLoader::default(), CursorModel::default());
    viewer.dispatch(ViewerAction::OpenFolder(dir.path().to_path_buf()));
    assert_eq!(viewer.tree().unwrap().file_count(), 2);

    assert!(viewer.dispatch(ViewerAction::OpenFile(good.clone())));
    assert!(!viewer.dispatch(ViewerAction::OpenFile(dir.path().join("sub/bad.csv"))));
    assert_eq!(viewer.current_path(), Some(good.as_path()));
    assert!(viewer.last_error().unwrap().contains("zero"));
}
