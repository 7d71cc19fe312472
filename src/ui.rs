use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, Wrap},
    Frame,
};

use crate::util::fit_tail;
use crate::wizard::{Field, Step, Wizard};

/// Top-level draw: progress header, the current step, key hints.
pub fn draw(wizard: &mut Wizard, f: &mut Frame) {
    let area = f.area();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(area);

    render_progress(wizard, f, chunks[0]);
    match wizard.step {
        Step::Identity => render_identity(wizard, f, chunks[1]),
        Step::Answers => render_answers(wizard, f, chunks[1]),
        Step::Results => render_results(wizard, f, chunks[1]),
        Step::Report => render_report(wizard, f, chunks[1]),
    }
    render_help(wizard, f, chunks[2]);
}

fn render_progress(wizard: &Wizard, f: &mut Frame, area: Rect) {
    let steps = [Step::Identity, Step::Answers, Step::Results, Step::Report];
    let spans = steps.iter().map(|s| {
        let style = if *s == wizard.step {
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        } else if s.index() < wizard.step.index() {
            Style::default().fg(Color::Green)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        Span::styled(s.to_string(), style)
    });
    let line: Vec<Span> = itertools::intersperse(spans, Span::raw(" › ")).collect();

    let progress = Paragraph::new(Line::from(line))
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(wizard.sheet.exam_name.clone()),
        );
    f.render_widget(progress, area);
}

fn render_identity(wizard: &Wizard, f: &mut Frame, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(5),
        ])
        .split(area);

    let focused = wizard.focused();
    f.render_widget(
        line_box(
            "이름 *",
            &wizard.student.student_name,
            focused == Some(Field::StudentName),
            chunks[0].width,
        ),
        chunks[0],
    );
    f.render_widget(
        line_box(
            "학원명",
            &wizard.student.academy_name,
            focused == Some(Field::AcademyName),
            chunks[1].width,
        ),
        chunks[1],
    );
    f.render_widget(
        notes_box(
            "시험 전 특이사항과 전략 (컨디션, 풀이 순서, 시간 배분, 다짐)",
            &wizard.student.pre_notes,
            focused == Some(Field::PreNotes),
        ),
        chunks[2],
    );
}

fn render_answers(wizard: &Wizard, f: &mut Frame, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(5),
            Constraint::Min(4),
        ])
        .split(area);

    let focused = wizard.focused();
    f.render_widget(
        notes_box(
            "시험 진행 중 특이사항 (선택)",
            &wizard.student.mid_notes,
            focused == Some(Field::MidNotes),
        ),
        chunks[0],
    );

    // context box: the passage the focus sits in, or the section label
    match wizard.focused_passage() {
        Some(pi) => {
            let passage = &wizard.sheet.passages[pi];
            let title = format!(
                "{} ({}~{}번 · {}문항)",
                passage.name,
                passage.from,
                passage.to,
                passage.question_count()
            );
            let cols = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Length(24), Constraint::Min(10)])
                .split(chunks[1]);
            f.render_widget(
                line_box(
                    "소요 시간",
                    wizard.field_text(Field::PassageTime(pi)),
                    focused == Some(Field::PassageTime(pi)),
                    cols[0].width,
                ),
                cols[0],
            );
            f.render_widget(
                notes_box(
                    &title,
                    wizard.field_text(Field::PassageNotes(pi)),
                    focused == Some(Field::PassageNotes(pi)),
                ),
                cols[1],
            );
        }
        None => {
            let label = if wizard.sheet.passages.is_empty() {
                "문항별 답안 및 분석"
            } else {
                "기타 문항"
            };
            let section = Paragraph::new(label)
                .style(Style::default().fg(Color::DarkGray))
                .alignment(Alignment::Center)
                .block(Block::default().borders(Borders::ALL));
            f.render_widget(section, chunks[1]);
        }
    }

    render_answer_table(wizard, f, chunks[2]);
}

fn render_answer_table(wizard: &Wizard, f: &mut Frame, area: Rect) {
    let has_passages = !wizard.sheet.passages.is_empty();
    let focused = wizard.focused();
    let focused_q = wizard.focused_question();

    let mark_cell = |field: Field, text: String, selected: bool| {
        let mut style = Style::default();
        if selected {
            style = style.add_modifier(Modifier::BOLD);
        }
        let text = if focused == Some(field) {
            style = style.fg(Color::Yellow);
            format!("{text}▏")
        } else {
            text
        };
        Cell::from(text).style(style)
    };

    let rows: Vec<Row> = wizard
        .student
        .answers
        .iter()
        .enumerate()
        .map(|(q, sub)| {
            let number = q + 1;
            let selected = focused_q == Some(q);
            let number_style = if selected {
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };

            let mut cells = vec![Cell::from(format!("{number}번")).style(number_style)];
            if has_passages {
                let section = wizard
                    .sheet
                    .passages
                    .iter()
                    .find(|p| p.contains(number))
                    .map(|p| p.name.as_str())
                    .unwrap_or("기타");
                cells.push(
                    Cell::from(section.to_string()).style(Style::default().fg(Color::DarkGray)),
                );
            }
            cells.push(mark_cell(Field::Answer(q), sub.answer.clone(), selected));
            cells.push(mark_cell(
                Field::Confidence(q),
                sub.confidence.symbol().to_string(),
                selected,
            ));
            if !has_passages {
                cells.push(mark_cell(Field::Elapsed(q), sub.elapsed.clone(), selected));
            }
            cells.push(mark_cell(
                Field::Rationale(q),
                sub.rationale.clone(),
                selected,
            ));
            Row::new(cells)
        })
        .collect();

    // keep the focused row in view
    let table_height = area.height.saturating_sub(3) as usize;
    let total = rows.len();
    let target = focused_q.unwrap_or(0);
    let offset = if total <= table_height || target < table_height / 2 {
        0
    } else {
        (target - table_height / 2).min(total.saturating_sub(table_height))
    };
    let visible: Vec<Row> = rows.into_iter().skip(offset).take(table_height).collect();

    let mut header = vec!["번호"];
    if has_passages {
        header.push("지문");
    }
    header.extend(["내 답", "난도"]);
    if !has_passages {
        header.push("시간");
    }
    header.push("선택 이유");
    let header = Row::new(header.into_iter().map(Cell::from).collect::<Vec<_>>()).style(
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    );

    let mut widths = vec![Constraint::Length(6)];
    if has_passages {
        widths.push(Constraint::Length(14));
    }
    widths.extend([Constraint::Length(10), Constraint::Length(6)]);
    if !has_passages {
        widths.push(Constraint::Length(12));
    }
    widths.push(Constraint::Min(10));

    let table = Table::new(visible, widths).header(header).block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!("문항별 답안 ({total}문항)")),
    );
    f.render_widget(table, area);
}

fn render_results(wizard: &mut Wizard, f: &mut Frame, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Min(4),
            Constraint::Length(6),
        ])
        .split(area);

    // clamp the scroll before borrowing the scored rows
    let total = wizard.scored().map(|(items, _)| items.len()).unwrap_or(0);
    let table_height = chunks[1].height.saturating_sub(3) as usize;
    let max_scroll = total.saturating_sub(table_height) as u16;
    if wizard.scroll > max_scroll {
        wizard.scroll = max_scroll;
    }
    let offset = wizard.scroll as usize;

    let Some((items, summary)) = wizard.scored() else {
        return;
    };

    let mut score_lines = vec![Line::from(vec![
        Span::styled(
            format!("{}점", summary.percentage),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!(
            "  ({}문제 중 {}문제 정답)",
            summary.total_count, summary.correct_count
        )),
    ])];
    if !wizard.sheet.answer_link.is_empty() {
        score_lines.push(Line::from(Span::styled(
            "정답 및 해설: Ctrl-o 로 열기",
            Style::default().fg(Color::DarkGray),
        )));
    }
    let score = Paragraph::new(score_lines)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title("나의 점수"));
    f.render_widget(score, chunks[0]);

    let green_bold = Style::default()
        .fg(Color::Green)
        .add_modifier(Modifier::BOLD);
    let red_bold = Style::default().fg(Color::Red).add_modifier(Modifier::BOLD);

    let rows: Vec<Row> = items
        .iter()
        .skip(offset)
        .take(table_height)
        .map(|item| {
            let (mark, mark_style) = if item.is_correct {
                ("O", green_bold)
            } else {
                ("X", red_bold)
            };
            let given = if item.given.is_empty() {
                "-".to_string()
            } else {
                item.given.clone()
            };
            let given_style = if item.is_correct {
                Style::default()
            } else {
                Style::default().fg(Color::Red)
            };
            Row::new(vec![
                Cell::from(format!("{}번", item.number)),
                Cell::from(mark).style(mark_style),
                Cell::from(given).style(given_style),
                Cell::from(item.correct.clone()).style(Style::default().fg(Color::Cyan)),
                Cell::from(item.confidence.symbol()),
                Cell::from(item.rationale.clone()),
            ])
        })
        .collect();

    let header = Row::new(vec!["번호", "결과", "내 답", "정답", "난도", "메모"]).style(
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    );
    let table = Table::new(
        rows,
        [
            Constraint::Length(6),
            Constraint::Length(6),
            Constraint::Length(8),
            Constraint::Length(8),
            Constraint::Length(6),
            Constraint::Min(10),
        ],
    )
    .header(header)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!("채점 결과 ({total}문항)")),
    );
    f.render_widget(table, chunks[1]);

    f.render_widget(
        notes_box(
            "시험 후 반성 및 해결 방안",
            &wizard.student.post_notes,
            wizard.focused() == Some(Field::PostNotes),
        ),
        chunks[2],
    );
}

fn render_report(wizard: &mut Wizard, f: &mut Frame, area: Rect) {
    let Some(report) = wizard.report() else {
        return;
    };

    let line_count = report.lines().count() as u16;
    let max_scroll = line_count.saturating_sub(area.height.saturating_sub(2));
    if wizard.scroll > max_scroll {
        wizard.scroll = max_scroll;
    }

    let view = Paragraph::new(report)
        .wrap(Wrap { trim: false })
        .scroll((wizard.scroll, 0))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("제출용 텍스트 (종료하면 그대로 출력됩니다)"),
        );
    f.render_widget(view, area);
}

fn render_help(wizard: &Wizard, f: &mut Frame, area: Rect) {
    let keys = match wizard.step {
        Step::Identity => "Tab 다음 항목 | Enter 줄바꿈/다음 | Ctrl-d 답안 입력으로 | Ctrl-o 시험지 열기 | Esc 종료",
        Step::Answers => "Tab 항목 이동 | Space/←/→ 난도 표시 | Ctrl-d 채점 및 결과 보기 | Esc 기본 정보로",
        Step::Results => "↑/↓ 결과 스크롤 | 글자 입력은 반성란으로 | Ctrl-o 해설 열기 | Ctrl-d 제출 화면으로",
        Step::Report => "↑/↓ 스크롤 | Esc 종료 (리포트가 터미널에 출력됩니다)",
    };
    let help = Paragraph::new(keys)
        .style(
            Style::default()
                .fg(Color::Gray)
                .add_modifier(Modifier::ITALIC),
        )
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(help, area);
}

fn field_block<'b>(title: &str, focused: bool) -> Block<'b> {
    let border = if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    Block::default()
        .borders(Borders::ALL)
        .title(title.to_string())
        .border_style(border)
}

/// Single-line input box; long values scroll by keeping the tail visible.
fn line_box<'a>(title: &str, text: &'a str, focused: bool, width: u16) -> Paragraph<'a> {
    let inner = width.saturating_sub(3) as usize;
    let shown = fit_tail(text, inner);
    let mut spans = vec![Span::raw(shown)];
    if focused {
        spans.push(Span::styled("▏", Style::default().fg(Color::Yellow)));
    }
    Paragraph::new(Line::from(spans)).block(field_block(title, focused))
}

/// Multi-line notes box with soft wrapping.
fn notes_box<'a>(title: &str, text: &str, focused: bool) -> Paragraph<'a> {
    let body = if focused {
        format!("{text}▏")
    } else {
        text.to_string()
    };
    Paragraph::new(body)
        .wrap(Wrap { trim: false })
        .block(field_block(title, focused))
}
