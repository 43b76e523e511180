use super::*;
use endtoend_core::RunnerInfo;
use tempfile::tempdir;

fn sample_info() -> RunnerInfo {
    RunnerInfo {
        alive: true,
        totalworkers: 4,
        totalqueue: 10,
        remainingqueue: 6,
        lockedrequests: 0,
        starttime: 1_700_000_000,
        nextrun: 1_700_003_600,
    }
}

#[test]
fn writes_a_json_file_the_recorder_can_deserialize() {
    let dir = tempdir().unwrap();
    write_heartbeat(dir.path(), &sample_info()).unwrap();

    let contents = std::fs::read_to_string(dir.path().join("testerinfo.run")).unwrap();
    let round_tripped: RunnerInfo = serde_json::from_str(&contents).unwrap();
    assert_eq!(round_tripped, sample_info());
}

#[test]
fn overwrites_a_previous_heartbeat() {
    let dir = tempdir().unwrap();
    write_heartbeat(dir.path(), &sample_info()).unwrap();

    let mut later = sample_info();
    later.alive = false;
    later.remainingqueue = 0;
    write_heartbeat(dir.path(), &later).unwrap();

    let contents = std::fs::read_to_string(dir.path().join("testerinfo.run")).unwrap();
    let round_tripped: RunnerInfo = serde_json::from_str(&contents).unwrap();
    assert_eq!(round_tripped, later);
}
