//! Integration tests for loading captures from disk
//!
//! These tests exercise the CSV loader, folder discovery and the
//! measurement engine together on files written to a temp folder.

mod common;

use common::builders::CaptureCsvBuilder;
use common::{assert_float_eq, write_capture};
use scope_viewer::analysis::measure;
use scope_viewer::capture::{discover_captures, CaptureLoader, CsvCaptureLoader, LoaderConfig};
use scope_viewer::ScopeError;

const SMALL_CAPTURE: &str = "\
Model,TBS1052B
Horizontal Units,s
Horizontal Scale,0.0005
Vertical Units,V
TIME,CH1,CH2
0.000,0.0,1.0
0.001,1.0,1.0
0.002,2.0,1.0
0.003,1.0,1.0
0.004,0.0,1.0
";

#[test]
fn test_load_small_capture() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_capture(dir.path(), "small.csv", SMALL_CAPTURE);

    let capture = CsvCaptureLoader::default().load(&path).unwrap();

    assert_eq!(capture.file_name(), "small.csv");
    assert_eq!(capture.waveform.len(), 5);
    assert_eq!(capture.waveform.time_span(), Some((0.0, 0.004)));
    assert_eq!(capture.metadata.model(), "TBS1052B");
    assert_eq!(capture.metadata.horizontal_units(), "s");

    let ch1 = capture.waveform.channel("CH1").unwrap();
    let m = measure(capture.waveform.time(), &ch1.samples);
    assert_float_eq(m.vpp, 2.0, 1e-12);
    assert_float_eq(m.vmax, 2.0, 1e-12);
    assert_float_eq(m.vmin, 0.0, 1e-12);

    let ch2 = capture.waveform.channel("CH2").unwrap();
    let flat = measure(capture.waveform.time(), &ch2.samples);
    assert_eq!(flat.vpp, 0.0);
    assert!(!flat.has_period());
}

#[test]
fn test_square_wave_end_to_end() {
    // 1 kHz, 5 V square sampled at 1 MHz for 10 ms
    let csv = CaptureCsvBuilder::new(1.0e6, 10_000)
        .metadata("Horizontal Scale", "0.001")
        .square("CH1", 1000.0, 5.0, 0.5)
        .build();
    let dir = tempfile::tempdir().unwrap();
    let path = write_capture(dir.path(), "square.csv", &csv);

    let capture = CsvCaptureLoader::default().load(&path).unwrap();
    let ch1 = capture.waveform.channel("CH1").unwrap();
    let m = measure(capture.waveform.time(), &ch1.samples);

    assert_float_eq(m.vpp, 5.0, 1e-9);
    assert_float_eq(m.freq, 1000.0, 10.0);
    assert_float_eq(m.period, 1.0e-3, 1.0e-5);
    assert_float_eq(m.duty, 50.0, 1.0);
    assert_float_eq(m.rise_time, 1.0e-6, 1.0e-9);
    assert_float_eq(m.fall_time, 1.0e-6, 1.0e-9);
}

#[test]
fn test_required_channels_enforced() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_capture(dir.path(), "one_channel.csv", "TIME,CH1\n0,1\n1,2\n");

    let loader = CsvCaptureLoader::new(LoaderConfig::default().with_required_channels(["CH1", "CH2"]));
    match loader.load(&path) {
        Err(ScopeError::MissingColumn { columns }) => assert_eq!(columns, vec!["CH2"]),
        other => panic!("expected missing column, got {:?}", other.map(|c| c.file_name())),
    }
}

#[test]
fn test_discovery_groups_by_folder() {
    let dir = tempfile::tempdir().unwrap();
    write_capture(dir.path(), "top.csv", SMALL_CAPTURE);
    write_capture(dir.path(), "run1/a.CSV", SMALL_CAPTURE);
    write_capture(dir.path(), "run1/b.csv", SMALL_CAPTURE);
    write_capture(dir.path(), "run1/notes.txt", "not a capture");
    write_capture(dir.path(), "run2/deep/c.csv", SMALL_CAPTURE);

    let tree = discover_captures(dir.path()).unwrap();
    assert_eq!(tree.file_count(), 4);
    assert_eq!(tree.root_files.len(), 1);
    assert_eq!(tree.root_files[0].name, "top.csv");

    let loader = CsvCaptureLoader::default();
    for path in tree.paths() {
        let capture = loader.load(path).unwrap();
        assert_eq!(capture.waveform.channels().len(), 2);
    }
}
