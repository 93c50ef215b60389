//! DCFG builder tests against trace files on disk.

use std::fs;
use std::path::Path;

use tempfile::TempDir;
use tracecluster_core::errors::TraceError;
use tracecluster_core::traits::GraphBuilder;
use tracecluster_core::types::Trace;
use tracecluster_graph::DcfgBuilder;

fn write_trace(dir: &Path, name: &str, content: &str) -> Trace {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    Trace::new(0, path)
}

#[test]
fn builds_graph_from_trace_file() {
    let dir = TempDir::new().unwrap();
    let trace = write_trace(
        dir.path(),
        "t0",
        "0x00047c308\n0x00047c30c\n0x00047c308\n0x00047c30c\n0x00047c310\n",
    );

    let g = DcfgBuilder::new().build(&trace).unwrap();
    assert_eq!(g.node_count(), 3);
    assert_eq!(g.edge_count(), 3);
    assert_eq!(g.node_hits(0x47c308), Some(2));
    assert_eq!(g.edge_hits(0x47c308, 0x47c30c), Some(2));
    assert_eq!(g.head(), 0x47c308);
    assert_eq!(g.tail(), 0x47c310);
}

#[test]
fn tolerates_crlf_and_blank_lines() {
    let dir = TempDir::new().unwrap();
    let trace = write_trace(dir.path(), "t0", "10\r\n\r\n20\r\n\n10\r\n");
    let g = DcfgBuilder::new().build(&trace).unwrap();
    assert_eq!(g.node_count(), 2);
    assert_eq!(g.tail(), 0x10);
}

#[test]
fn tail_radius_limits_the_graph() {
    let dir = TempDir::new().unwrap();
    let trace = write_trace(dir.path(), "t0", "1\n2\n3\n4\n5\n6\n");
    let g = DcfgBuilder::new().with_tail_radius(2).build(&trace).unwrap();
    let mut addrs: Vec<u64> = g.nodes().map(|n| n.address).collect();
    addrs.sort_unstable();
    assert_eq!(addrs, vec![4, 5, 6]);
    assert_eq!(g.edge_count(), 2);
}

#[test]
fn empty_file_is_an_error() {
    let dir = TempDir::new().unwrap();
    let trace = write_trace(dir.path(), "empty", "\n\n");
    let err = DcfgBuilder::new().build(&trace).unwrap_err();
    assert!(matches!(err, TraceError::Empty { .. }));
}

#[test]
fn malformed_line_names_the_line() {
    let dir = TempDir::new().unwrap();
    let trace = write_trace(dir.path(), "bad", "0x10\n0x20\nnot-an-address\n");
    match DcfgBuilder::new().build(&trace).unwrap_err() {
        TraceError::InvalidAddress { line, content, .. } => {
            assert_eq!(line, 3);
            assert_eq!(content, "not-an-address");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn missing_file_is_io_error() {
    let dir = TempDir::new().unwrap();
    let trace = Trace::new(0, dir.path().join("nope"));
    assert!(matches!(
        DcfgBuilder::new().build(&trace).unwrap_err(),
        TraceError::Io { .. }
    ));
}
