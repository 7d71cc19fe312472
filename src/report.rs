//! Plain-text report assembly. The output is meant for copy-paste
//! distribution into a messaging app, so the layout is fixed and the
//! function is deterministic: same inputs, same string, no I/O.

use crate::scoring::{ScoredItem, ScoreSummary};
use crate::sheet::ExamSheet;
use crate::submission::StudentSheet;

/// Build the submission report.
///
/// Layout: identity header, pre-exam notes (an explicit `없음` marker when
/// empty, never silently dropped), optional mid-exam notes, the score line,
/// then either per-passage sections in sheet order with an "other
/// questions" tail, or a single flat section when the sheet has no
/// passages. Post-exam notes close the report when present.
pub fn build_report(
    sheet: &ExamSheet,
    student: &StudentSheet,
    items: &[ScoredItem],
    summary: &ScoreSummary,
) -> String {
    let mut r = format!(
        "[셀프해설지 제출]\n시험명: {}\n이름: {}",
        sheet.exam_name, student.student_name
    );
    if !student.academy_name.is_empty() {
        r.push_str(&format!("\n학원명: {}", student.academy_name));
    }

    r.push_str("\n\n■ 시험 전 특이사항과 전략\n");
    if student.pre_notes.is_empty() {
        r.push_str("없음");
    } else {
        r.push_str(&student.pre_notes);
    }

    if !student.mid_notes.is_empty() {
        r.push_str(&format!("\n\n■ 시험 진행 중 특이사항\n{}", student.mid_notes));
    }

    r.push_str(&format!(
        "\n\n■ 점수: {}점 ({}/{})\n",
        summary.percentage, summary.correct_count, summary.total_count
    ));

    if sheet.passages.is_empty() {
        r.push_str("\n■ 문항별 분석\n");
        for item in items {
            push_item_line(&mut r, item, "", true);
        }
    } else {
        r.push_str("\n■ 지문별 분석\n");
        for (pi, passage) in sheet.passages.iter().enumerate() {
            let note = student.passage_notes.get(pi);
            r.push_str(&format!(
                "\n*[{}] ({}~{}번)",
                passage.name, passage.from, passage.to
            ));
            if let Some(time) = note.map(|n| n.time.as_str()).filter(|t| !t.is_empty()) {
                r.push_str(&format!(" — {time}"));
            }
            r.push('\n');
            if let Some(notes) = note.map(|n| n.notes.as_str()).filter(|n| !n.is_empty()) {
                r.push_str(notes);
                r.push('\n');
            }
            for item in items.iter().filter(|i| passage.contains(i.number)) {
                push_item_line(&mut r, item, "  ", false);
            }
        }

        let assigned = sheet.assigned_numbers();
        let unassigned: Vec<&ScoredItem> = items
            .iter()
            .filter(|i| !assigned.contains(&i.number))
            .collect();
        if !unassigned.is_empty() {
            r.push_str("\n*[기타 문항]\n");
            for item in unassigned {
                push_item_line(&mut r, item, "  ", false);
            }
        }
    }

    if !student.post_notes.is_empty() {
        r.push_str(&format!(
            "\n■ 시험 후 반성 및 해결 방안\n{}",
            student.post_notes
        ));
    }

    r
}

// Per-question time only appears in the flat layout; grouped sections carry
// time at the passage level instead.
fn push_item_line(r: &mut String, item: &ScoredItem, indent: &str, with_elapsed: bool) {
    let mark = if item.is_correct { "O" } else { "X" };
    let given = if item.given.is_empty() {
        "-"
    } else {
        item.given.as_str()
    };
    r.push_str(&format!(
        "{indent}{}번 | {mark} | 내답: {given} / 정답: {} | 난도: {}",
        item.number,
        item.correct,
        item.confidence.symbol()
    ));
    if with_elapsed && !item.elapsed.is_empty() {
        r.push_str(&format!(" | 시간: {}", item.elapsed));
    }
    if !item.rationale.is_empty() {
        r.push_str(&format!(" | {}", item.rationale));
    }
    r.push('\n');
}
