use intentbot::error::RecorderError;
use intentbot::recorder::{CsvInteractionRecorder, Feedback, InteractionSink, LogKind};
use intentbot::time::Timestamp;
use std::collections::HashSet;
use std::fs;
use std::sync::Arc;
use std::thread;

fn open_in(dir: &tempfile::TempDir) -> CsvInteractionRecorder {
    CsvInteractionRecorder::open(dir.path().join("chat_log.csv"), dir.path().join("feedback_log.csv")).unwrap()
}

#[test]
fn test_open_writes_headers() {
    let dir = tempfile::tempdir().unwrap();
    let _recorder = open_in(&dir);

    let turns = fs::read_to_string(dir.path().join("chat_log.csv")).unwrap();
    assert_eq!(turns.lines().collect::<Vec<_>>(), vec!["User Input,Chatbot Response,Timestamp"]);

    let feedback = fs::read_to_string(dir.path().join("feedback_log.csv")).unwrap();
    assert_eq!(
        feedback.lines().collect::<Vec<_>>(),
        vec!["User Input,Chatbot Response,Timestamp,Feedback,Rating"]
    );
}

#[test]
fn test_open_preserves_existing_content() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("chat_log.csv");
    fs::write(&path, "User Input,Chatbot Response,Timestamp\nhi,Hello there!,2024-01-01 10:00:00\n").unwrap();

    let recorder = open_in(&dir);
    let turns = recorder.read_turns().unwrap();
    assert_eq!(turns.len(), 1);
    assert_eq!(turns[0].user_input, "hi");
}

#[test]
fn test_empty_log_file_gets_a_header_first() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("chat_log.csv");
    fs::write(&path, "").unwrap();

    let recorder = CsvInteractionRecorder::unopened(&path, dir.path().join("feedback_log.csv"));
    recorder.record_turn("hi", "Hello there!", &Timestamp::from("2024-01-01 10:00:00")).unwrap();

    let content = fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(
        lines,
        vec!["User Input,Chatbot Response,Timestamp", "hi,Hello there!,2024-01-01 10:00:00"]
    );
}

#[test]
fn test_record_turn_round_trips_in_order() {
    let dir = tempfile::tempdir().unwrap();
    let recorder = open_in(&dir);

    let t1 = Timestamp::from("2024-03-01 09:15:00");
    let t2 = Timestamp::from("2024-03-01 09:16:30");
    recorder.record_turn("hi", "Hello there!", &t1).unwrap();
    recorder
        .record_turn("what's the \"weather\", today?", "Bring an umbrella.\nOr two.", &t2)
        .unwrap();

    let turns = recorder.read_turns().unwrap();
    assert_eq!(turns.len(), 2);
    assert_eq!(turns[0].user_input, "hi");
    assert_eq!(turns[0].response, "Hello there!");
    assert_eq!(turns[0].timestamp, t1);
    assert_eq!(turns[1].user_input, "what's the \"weather\", today?");
    assert_eq!(turns[1].response, "Bring an umbrella.\nOr two.");
    assert_eq!(turns[1].timestamp, t2);
}

#[test]
fn test_duplicate_turns_are_both_kept() {
    let dir = tempfile::tempdir().unwrap();
    let recorder = open_in(&dir);
    let ts = Timestamp::from("2024-03-01 09:15:00");

    recorder.record_turn("hi", "Hello there!", &ts).unwrap();
    recorder.record_turn("hi", "Hello there!", &ts).unwrap();

    let turns = recorder.read_turns().unwrap();
    assert_eq!(turns.len(), 2);
    assert_eq!(turns[0], turns[1]);
}

#[test]
fn test_feedback_is_a_separate_record() {
    let dir = tempfile::tempdir().unwrap();
    let recorder = open_in(&dir);
    let ts = Timestamp::from("2024-03-01 09:15:00");

    recorder.record_turn("hi", "Hello there!", &ts).unwrap();
    recorder.record_feedback("hi", "Hello there!", &ts, Feedback::Good).unwrap();

    let turns = recorder.read_turns().unwrap();
    assert_eq!(turns.len(), 1, "feedback must not touch the turn log");

    let feedback = recorder.read_feedback().unwrap();
    assert_eq!(feedback.len(), 1);
    assert_eq!(feedback[0].user_input, "hi");
    assert_eq!(feedback[0].feedback, Feedback::Good);
    assert_eq!(feedback[0].timestamp, ts);
    assert_eq!(feedback[0].rating, None);
}

#[test]
fn test_legacy_feedback_rows_without_rating_are_readable() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("feedback_log.csv"),
        "User Input,Chatbot Response,Timestamp,Feedback,Rating\nhi,Hello there!,2023-11-02 18:00:00,Bad\n",
    )
    .unwrap();

    let recorder = open_in(&dir);
    let feedback = recorder.read_feedback().unwrap();
    assert_eq!(feedback.len(), 1);
    assert_eq!(feedback[0].feedback, Feedback::Bad);
    assert_eq!(feedback[0].rating, None);
}

#[test]
fn test_unreadable_rows_are_skipped() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("feedback_log.csv"),
        "User Input,Chatbot Response,Timestamp,Feedback,Rating\n\
         hi,Hello there!,2024-01-01 10:00:00,Good,\n\
         huh,Sorry?,2024-01-01 10:01:00,Meh,\n\
         bye,Goodbye,2024-01-01 10:02:00,Bad,\n",
    )
    .unwrap();

    let recorder = open_in(&dir);
    let feedback = recorder.read_feedback().unwrap();
    let inputs: Vec<&str> = feedback.iter().map(|r| r.user_input.as_str()).collect();
    assert_eq!(inputs, vec!["hi", "bye"]);
}

#[test]
fn test_missing_log_reads_as_empty() {
    let dir = tempfile::tempdir().unwrap();
    let recorder = CsvInteractionRecorder::unopened(dir.path().join("a.csv"), dir.path().join("b.csv"));
    assert!(recorder.read_turns().unwrap().is_empty());
    assert!(recorder.read_feedback().unwrap().is_empty());
}

#[test]
fn test_unopened_recorder_writes_header_on_first_append() {
    let dir = tempfile::tempdir().unwrap();
    let recorder = CsvInteractionRecorder::unopened(dir.path().join("logs/chat.csv"), dir.path().join("logs/fb.csv"));
    recorder.record_turn("hi", "Hello there!", &Timestamp::now()).unwrap();

    let content = fs::read_to_string(recorder.log(LogKind::Turns).path()).unwrap();
    assert_eq!(content.lines().next(), Some("User Input,Chatbot Response,Timestamp"));
    assert_eq!(recorder.read_turns().unwrap().len(), 1);
}

#[test]
fn test_unwritable_log_surfaces_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("not_a_dir");
    fs::write(&blocker, "plain file").unwrap();

    let result = CsvInteractionRecorder::open(blocker.join("chat.csv"), blocker.join("fb.csv"));
    assert!(matches!(result, Err(RecorderError::Io { .. })));
}

#[test]
fn test_concurrent_appends_are_not_interleaved() {
    let dir = tempfile::tempdir().unwrap();
    let recorder = Arc::new(open_in(&dir));
    let n = 64;

    let handles: Vec<_> = (0..n)
        .map(|i| {
            let recorder = recorder.clone();
            thread::spawn(move || {
                let input = format!("message number {} with, a comma", i);
                let response = format!("reply {}", "x".repeat(512 + i));
                recorder
                    .record_turn(&input, &response, &Timestamp::from("2024-03-01 09:15:00"))
                    .unwrap();
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }

    let turns = recorder.read_turns().unwrap();
    assert_eq!(turns.len(), n);

    let inputs: HashSet<String> = turns.iter().map(|t| t.user_input.clone()).collect();
    assert_eq!(inputs.len(), n, "every row must be distinct and complete");
    for t in &turns {
        let i: usize = t.user_input.split_whitespace().nth(2).unwrap().trim_end_matches(',').parse().unwrap();
        assert_eq!(t.response.len(), "reply ".len() + 512 + i);
    }

    let raw = fs::read_to_string(dir.path().join("chat_log.csv")).unwrap();
    assert_eq!(raw.lines().count(), n + 1, "N rows plus the header");
}
