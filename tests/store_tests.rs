use std::fs;

use topseries::series::{CombinedTable, Consolidator, SnapshotParser};
use topseries::store::{self, InputSource};
use topseries::WriteOutcome;

const CAPTURE: &str = "\
top - 11:30:00 up 1 day,  1 user,  load average: 0.00, 0.00, 0.00
Tasks:  90 total,   1 running,  89 sleeping,   0 stopped,   0 zombie
%Cpu(s):  1.0 us,  0.0 sy,  0.0 ni, 99.0 id,  0.0 wa,  0.0 hi,  0.0 si,  0.0 st
KiB Mem :  1016120 total,    79468 free,   214920 used,   721732 buff/cache
KiB Swap:        0 total,        0 free,        0 used.   637172 avail Mem

  PID USER      PR  NI    VIRT    RES    SHR S  %CPU %MEM     TIME+ COMMAND
  812 pi        20   0   27600   6224   5288 R   1.3  0.6   0:00.41 top
  500 pi        20   0   12000   4000   3000 S   0.7  2.1   0:03.10 python3
  501 pi        20   0   12000   4000   3000 S   0.3  1.9   0:02.00 python3
    1 root      20   0   27072   5872   4684 S   0.0  0.6   0:05.13 systemd

top - 11:30:01 up 1 day,  1 user,  load average: 0.00, 0.00, 0.00
Tasks:  90 total,   1 running,  89 sleeping,   0 stopped,   0 zombie
%Cpu(s):  1.0 us,  0.0 sy,  0.0 ni, 99.0 id,  0.0 wa,  0.0 hi,  0.0 si,  0.0 st
KiB Mem :  1016120 total,    79468 free,   214920 used,   721732 buff/cache
KiB Swap:        0 total,        0 free,        0 used.   637172 avail Mem

  PID USER      PR  NI    VIRT    RES    SHR S  %CPU %MEM     TIME+ COMMAND
  812 pi        20   0   27600   6224   5288 R   0.9  0.6   0:00.42 top
  500 pi        20   0   12000   4000   3000 S   0.1  2.1   0:03.11 python3
    1 root      20   0   27072   5872   4684 S   0.0  0.6   0:05.13 systemd
";

const TOL: f64 = 1e-9;

#[test]
fn persist_then_reload_matches_consolidated_tables() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("top.csv");

    let parsed = SnapshotParser::default().parse_str(CAPTURE).unwrap();
    let (cpu, mem) = Consolidator::new(1.0).unwrap().consolidate_parsed(&parsed).unwrap();
    let python = cpu.column("python3").unwrap();
    assert!((python[0] - 1.0).abs() < TOL && (python[1] - 0.1).abs() < TOL);

    let combined = CombinedTable::join(&cpu, &mem).unwrap();
    assert!(store::persist(&combined, &path).unwrap().was_written());

    let (cpu_back, mem_back) = store::reload(&path).unwrap().split().unwrap();
    let (cpu_direct, mem_direct) = combined.split().unwrap();
    assert!(cpu_back.approx_eq(&cpu_direct, TOL));
    assert!(mem_back.approx_eq(&mem_direct, TOL));
    assert!(cpu_back.approx_eq(&cpu, TOL));
    assert!(mem_back.approx_eq(&mem, TOL));
}

#[test]
fn persist_never_clobbers() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("top.csv");
    fs::write(&path, "hand-made notes").unwrap();

    let parsed = SnapshotParser::default().parse_str(CAPTURE).unwrap();
    let (cpu, mem) = Consolidator::default().consolidate_parsed(&parsed).unwrap();
    let combined = CombinedTable::join(&cpu, &mem).unwrap();

    let outcome = store::persist(&combined, &path).unwrap();
    assert_eq!(outcome, WriteOutcome::AlreadyExists(path.clone()));
    assert_eq!(fs::read_to_string(&path).unwrap(), "hand-made notes");
}

#[test]
fn load_falls_back_to_saved_table() {
    let dir = tempfile::tempdir().unwrap();
    let raw = dir.path().join("top.txt");
    let table = dir.path().join("top.csv");
    let parser = SnapshotParser::default();
    let consolidator = Consolidator::new(1.0).unwrap();

    fs::write(&raw, CAPTURE).unwrap();
    let from_raw = store::load_tables(&raw, &table, &parser, &consolidator).unwrap();
    let combined = CombinedTable::join(&from_raw.cpu, &from_raw.mem).unwrap();
    store::persist(&combined, &table).unwrap();
    fs::remove_file(&raw).unwrap();

    let from_table = store::load_tables(&raw, &table, &parser, &consolidator).unwrap();
    assert_eq!(from_table.source, InputSource::Table(table.clone()));
    assert!(from_table.banner_clocks.is_empty());
    assert!(from_table.cpu.approx_eq(&from_raw.cpu, TOL));
    assert!(from_table.mem.approx_eq(&from_raw.mem, TOL));
}

#[test]
fn strip_then_parse_gives_same_series() {
    let dir = tempfile::tempdir().unwrap();
    let raw = dir.path().join("top.txt");
    let clean = dir.path().join("clean.txt");
    fs::write(&raw, CAPTURE).unwrap();

    store::strip_headers(&raw, &clean, &Default::default()).unwrap();
    let parser = SnapshotParser::default();
    let a = parser.parse_file(&raw).unwrap();
    let b = parser.parse_file(&clean).unwrap();
    assert_eq!(a.cpu, b.cpu);
    assert_eq!(a.mem, b.mem);
    assert_eq!(a.names, b.names);
    assert_eq!(a.banner_clocks.len(), 2);
    assert!(b.banner_clocks.is_empty());
}
