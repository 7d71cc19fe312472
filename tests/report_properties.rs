// End-to-end properties of the scoring and report pipeline, driven through
// the public library surface the way a hosting application would use it.

use haesulji::report::build_report;
use haesulji::scoring::{score, Confidence, ScoreError, Submission};
use haesulji::sheet::{ExamSheet, Passage};
use haesulji::submission::{PassageNote, StudentSheet};

fn sheet(answers: &[&str], passages: Vec<Passage>) -> ExamSheet {
    ExamSheet {
        exam_name: "2025년 3월 고3 국어 모의고사".to_string(),
        paper_link: String::new(),
        answer_link: String::new(),
        answers: answers.iter().map(|s| s.to_string()).collect(),
        passages,
    }
}

fn report_for(sheet: &ExamSheet, student: &StudentSheet) -> String {
    let (items, summary) = score(&sheet.answers, &student.answers).unwrap();
    build_report(sheet, student, &items, &summary)
}

fn item_line_count(report: &str, number: usize) -> usize {
    let prefix = format!("{number}번 |");
    report
        .lines()
        .filter(|line| line.trim_start().starts_with(&prefix))
        .count()
}

#[test]
fn three_question_scenario_end_to_end() {
    let sheet = sheet(&["4", "3", "1"], vec![]);
    let student = StudentSheet {
        student_name: "홍길동".into(),
        answers: vec![
            Submission {
                answer: "4".into(),
                confidence: Confidence::Easy,
                ..Submission::default()
            },
            Submission {
                answer: "2".into(),
                confidence: Confidence::Unsure,
                ..Submission::default()
            },
            Submission {
                answer: "1".into(),
                ..Submission::default()
            },
        ],
        ..StudentSheet::default()
    };

    let (items, summary) = score(&sheet.answers, &student.answers).unwrap();
    assert_eq!(summary.correct_count, 2);
    assert_eq!(summary.total_count, 3);
    assert_eq!(summary.percentage, 67);
    assert_eq!(items.len(), 3);

    let report = build_report(&sheet, &student, &items, &summary);
    assert!(report.contains("■ 점수: 67점 (2/3)"));

    let lines: Vec<&str> = report
        .lines()
        .filter(|l| l.contains("내답:"))
        .collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with("1번 | O"));
    assert!(lines[1].starts_with("2번 | X"));
    assert!(lines[1].contains("내답: 2 / 정답: 3"));
    assert!(lines[2].starts_with("3번 | O"));
}

#[test]
fn every_index_appears_exactly_once_with_partial_coverage() {
    let sheet = sheet(
        &["1", "2", "3", "4", "5"],
        vec![Passage {
            name: "사회".into(),
            from: 2,
            to: 4,
        }],
    );
    let mut student = StudentSheet::blank(&sheet);
    student.student_name = "홍길동".into();
    let report = report_for(&sheet, &student);

    for number in 1..=5 {
        assert_eq!(
            item_line_count(&report, number),
            1,
            "question {number} must appear exactly once"
        );
    }

    let passage_at = report.find("*[사회] (2~4번)").unwrap();
    let other_at = report.find("*[기타 문항]").unwrap();
    assert!(passage_at < other_at);
}

#[test]
fn every_index_appears_exactly_once_with_full_coverage() {
    let sheet = sheet(
        &["1", "2", "3", "4"],
        vec![
            Passage {
                name: "독서론".into(),
                from: 1,
                to: 2,
            },
            Passage {
                name: "문학".into(),
                from: 3,
                to: 4,
            },
        ],
    );
    let mut student = StudentSheet::blank(&sheet);
    student.student_name = "홍길동".into();
    let report = report_for(&sheet, &student);

    for number in 1..=4 {
        assert_eq!(item_line_count(&report, number), 1);
    }
    assert!(!report.contains("*[기타 문항]"));
}

#[test]
fn trimming_does_not_change_scores() {
    let sheet = sheet(&["4", "3", "1"], vec![]);
    let plain: Vec<Submission> = ["4", "3", "2"]
        .iter()
        .map(|a| Submission {
            answer: a.to_string(),
            ..Submission::default()
        })
        .collect();
    let padded: Vec<Submission> = ["  4", "3  ", " 2 "]
        .iter()
        .map(|a| Submission {
            answer: a.to_string(),
            ..Submission::default()
        })
        .collect();

    let (plain_items, plain_summary) = score(&sheet.answers, &plain).unwrap();
    let (padded_items, padded_summary) = score(&sheet.answers, &padded).unwrap();

    assert_eq!(plain_summary, padded_summary);
    for (a, b) in plain_items.iter().zip(&padded_items) {
        assert_eq!(a.is_correct, b.is_correct);
    }
}

#[test]
fn notes_sections_follow_placeholder_and_omission_rules() {
    let sheet = sheet(&["1"], vec![]);
    let mut student = StudentSheet::blank(&sheet);
    student.student_name = "홍길동".into();

    let report = report_for(&sheet, &student);
    assert!(report.contains("■ 시험 전 특이사항과 전략\n없음"));
    assert!(!report.contains("시험 진행 중 특이사항"));
    assert!(!report.contains("시험 후 반성 및 해결 방안"));

    student.pre_notes = "풀이 순서: 비문학 먼저".into();
    student.mid_notes = "기술 지문에서 멘탈이 흔들렸다".into();
    student.post_notes = "매일 비문학 2지문".into();
    let report = report_for(&sheet, &student);
    assert!(report.contains("■ 시험 전 특이사항과 전략\n풀이 순서: 비문학 먼저"));
    assert!(report.contains("■ 시험 진행 중 특이사항\n기술 지문에서 멘탈이 흔들렸다"));
    assert!(report.contains("■ 시험 후 반성 및 해결 방안\n매일 비문학 2지문"));
}

#[test]
fn passage_annotations_render_only_when_present() {
    let sheet = sheet(
        &["1", "2"],
        vec![Passage {
            name: "독서론".into(),
            from: 1,
            to: 2,
        }],
    );
    let mut student = StudentSheet::blank(&sheet);
    student.student_name = "홍길동".into();

    let report = report_for(&sheet, &student);
    assert!(report.contains("*[독서론] (1~2번)\n"));
    assert!(!report.contains(" — "));

    student.passage_notes[0] = PassageNote {
        time: "7분 30초".into(),
        notes: "통독 지문, 무리 없이 풀었음".into(),
    };
    let report = report_for(&sheet, &student);
    assert!(report.contains("*[독서론] (1~2번) — 7분 30초\n통독 지문, 무리 없이 풀었음\n"));
}

#[test]
fn mismatched_lengths_refuse_to_grade() {
    let sheet = sheet(&["4", "3", "1"], vec![]);
    let student = StudentSheet {
        answers: vec![Submission::default(); 2],
        ..StudentSheet::default()
    };

    let err = score(&sheet.answers, &student.answers).unwrap_err();
    assert_eq!(
        err,
        ScoreError::LengthMismatch {
            expected: 3,
            actual: 2
        }
    );
}

#[test]
fn confidence_markers_flow_into_the_report() {
    let sheet = sheet(&["1", "1", "1", "1"], vec![]);
    let confidences = [
        Confidence::Easy,
        Confidence::Unsure,
        Confidence::Guessed,
        Confidence::None,
    ];
    let student = StudentSheet {
        student_name: "홍길동".into(),
        answers: confidences
            .iter()
            .map(|c| Submission {
                answer: "1".into(),
                confidence: *c,
                ..Submission::default()
            })
            .collect(),
        ..StudentSheet::default()
    };

    let report = report_for(&sheet, &student);
    assert!(report.contains("1번 | O | 내답: 1 / 정답: 1 | 난도: ◯"));
    assert!(report.contains("2번 | O | 내답: 1 / 정답: 1 | 난도: △"));
    assert!(report.contains("3번 | O | 내답: 1 / 정답: 1 | 난도: ✕"));
    assert!(report.contains("4번 | O | 내답: 1 / 정답: 1 | 난도: -"));
}
