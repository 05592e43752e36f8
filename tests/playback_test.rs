//! 再生タイミングの結合テスト
//!
//! 仮想時計で、解析演出と会話表示の順序・時刻・世代の切り替えを検証

use back2wo_common::{
    CaptureMode, CaptureSource, CapturedImage, ModeFlow, Phase, Simulation, Speaker, TimelineEntry,
    TimelineEvent, Timing, NEGOTIATION_SCRIPT, SCRIPT_LEN,
};

fn png() -> CapturedImage {
    CapturedImage::from_bytes("image/png", b"\x89PNG\r\n\x1a\n").unwrap()
}

fn jpeg() -> CapturedImage {
    CapturedImage::from_bytes("image/jpeg", b"\xff\xd8\xff\xe0").unwrap()
}

fn simulation() -> Simulation {
    Simulation::new(Timing::default(), ModeFlow::Selector)
}

fn reveals(timeline: &[TimelineEntry]) -> Vec<(u64, u64, usize)> {
    timeline
        .iter()
        .filter_map(|entry| match entry.event {
            TimelineEvent::Revealed { generation, index, .. } => Some((entry.at_ms, generation, index)),
            _ => None,
        })
        .collect()
}

/// 解析完了前にリセットすると何も起きない
#[test]
fn test_reset_before_analysis_emits_nothing() {
    let mut sim = simulation();
    sim.submit_at(0, png());
    sim.reset_at(1999);
    sim.run_to_idle();

    assert!(sim.orchestrator().image().is_none());
    assert_eq!(sim.orchestrator().phase(), Phase::Idle);
    assert!(sim.orchestrator().transcript().is_empty());
    assert_eq!(sim.clock().pending(), 0);

    let events: Vec<_> = sim.timeline().iter().map(|e| &e.event).collect();
    assert_eq!(events.len(), 2);
    assert!(matches!(events[1], TimelineEvent::Reset));
}

/// 解析完了はちょうど一回、最初の会話より前
#[test]
fn test_analysis_finishes_once_before_first_line() {
    let mut sim = simulation();
    sim.submit_at(0, png());

    sim.advance_to(1999);
    assert!(sim.orchestrator().flags().is_analyzing);
    assert!(!sim.orchestrator().flags().show_results);

    sim.run_to_idle();

    let finished: Vec<_> = sim
        .timeline()
        .iter()
        .filter(|e| matches!(e.event, TimelineEvent::AnalysisFinished { .. }))
        .collect();
    assert_eq!(finished.len(), 1);
    assert_eq!(finished[0].at_ms, 2000);

    let first_line = reveals(sim.timeline())[0];
    assert_eq!(first_line, (3500, 1, 0));
}

/// 会話は台本どおりの順序と間隔で全行表示される
#[test]
fn test_transcript_matches_script() {
    let mut sim = simulation();
    sim.submit_at(0, png());
    sim.run_to_idle();

    let transcript = sim.orchestrator().transcript();
    assert_eq!(transcript.len(), SCRIPT_LEN);
    for (line, scripted) in transcript.iter().zip(NEGOTIATION_SCRIPT.iter()) {
        assert_eq!(line.speaker, scripted.speaker);
        assert_eq!(line.text, scripted.text);
    }
    assert_eq!(transcript[0].speaker, Speaker::Seller);

    let times: Vec<u64> = reveals(sim.timeline()).iter().map(|r| r.0).collect();
    let expected: Vec<u64> = (0..SCRIPT_LEN as u64).map(|i| 3500 + 1500 * i).collect();
    assert_eq!(times, expected);

    assert!(sim.orchestrator().snapshot().negotiation_complete());
}

/// 画像以外のドロップは現在の画像を変えない
#[test]
fn test_dropped_non_image_keeps_current_image() {
    let mut sim = simulation();
    sim.submit_at(0, png());
    sim.advance_to(5000);
    let before = sim.orchestrator().snapshot();

    let err = sim
        .orchestrator_mut()
        .submit_capture(CaptureSource::Drop, "data:text/plain;base64,aGVsbG8=".into())
        .unwrap_err();
    assert!(err.is_silent());

    assert_eq!(sim.orchestrator().snapshot(), before);
    assert_eq!(sim.orchestrator().generation(), 1);
}

/// 再生途中の再投入は前の世代を捨てて最初からやり直す
#[test]
fn test_resubmit_restarts_from_scratch() {
    let mut sim = simulation();
    sim.submit_at(0, png());
    let second = sim.submit_at(500, jpeg());
    assert_eq!(second, 2);
    sim.run_to_idle();

    let finished: Vec<_> = sim
        .timeline()
        .iter()
        .filter_map(|e| match e.event {
            TimelineEvent::AnalysisFinished { generation } => Some((e.at_ms, generation)),
            _ => None,
        })
        .collect();
    assert_eq!(finished, vec![(2500, 2)]);

    let lines = reveals(sim.timeline());
    assert_eq!(lines.len(), SCRIPT_LEN);
    assert!(lines.iter().all(|&(_, generation, _)| generation == 2));
    assert_eq!(lines.first().map(|l| l.0), Some(4000));
    assert_eq!(lines.last().map(|l| l.0), Some(14500));

    assert_eq!(sim.orchestrator().image().map(|i| i.mime_type()), Some("image/jpeg"));
}

/// 保留タイマーは常に高々一つ
#[test]
fn test_at_most_one_pending_timer() {
    let mut sim = simulation();
    sim.submit_at(0, png());
    sim.submit_at(100, jpeg());
    sim.submit_at(200, png());

    for at in (200..=20_000).step_by(250) {
        sim.advance_to(at);
        assert!(sim.clock().pending() <= 1, "{}ms で保留が {}", at, sim.clock().pending());
    }
    assert_eq!(sim.clock().pending(), 0);
}

/// リセット後はモード選択からやり直せる
#[test]
fn test_reset_returns_to_mode_selection() {
    let mut sim = simulation();
    sim.orchestrator_mut().choose_mode(CaptureMode::Upload).unwrap();
    sim.submit_at(0, png());
    assert_eq!(sim.orchestrator().mode(), CaptureMode::None);
    assert!(sim.orchestrator_mut().choose_mode(CaptureMode::Camera).is_err());

    sim.reset_at(8000);
    assert_eq!(sim.orchestrator_mut().choose_mode(CaptureMode::Camera), Ok(CaptureMode::Camera));
    assert!(sim.orchestrator().transcript().is_empty());
}
