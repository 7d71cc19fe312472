use clap::{error::ErrorKind, CommandFactory, Parser, Subcommand};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use haesulji::{
    code,
    config::{Config, ConfigStore, FileConfigStore},
    report::build_report,
    scoring::score,
    sheet::{parse_answer_list, ExamSheet, Passage},
    submission::StudentSheet,
    ui,
    wizard::{Step, Wizard},
};
use itertools::Itertools;
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{
    error::Error,
    fs,
    io::{self, stdin},
    path::{Path, PathBuf},
    sync::mpsc,
    thread,
};
use webbrowser::Browser;

/// terminal self-grading answer sheet for mock exams
#[derive(Parser, Debug)]
#[clap(
    version,
    about,
    long_about = "A terminal self-grading answer sheet: instructors pack an exam (name, links, answer key, passage spans) into a shareable code, students fill it in through a 4-step wizard or grade a JSON answer file, and the result is a plain-text report ready to paste into a messaging app."
)]
struct Cli {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// build an exam sheet and print its share code
    Create {
        /// exam title shown to students
        #[clap(short = 'n', long)]
        exam_name: String,

        /// comma-separated answer key, e.g. "4, 3, 1, 3, 5"
        #[clap(short, long)]
        answers: String,

        /// link to the exam paper
        #[clap(long, default_value = "")]
        paper_link: String,

        /// link to the official answers and explanations
        #[clap(long, default_value = "")]
        answer_link: String,

        /// passage span as NAME:FROM-TO (also NAME:FROM~TO), repeatable
        #[clap(short, long = "passage")]
        passages: Vec<String>,

        /// also write the sheet as json
        #[clap(long)]
        json: Option<PathBuf>,
    },

    /// decode a share code or sheet file and print a summary
    Show {
        /// share code, shared link, or sheet json path
        sheet: String,
    },

    /// fill in a sheet interactively and print the report
    Fill {
        /// share code, shared link, or sheet json path
        sheet: String,

        /// write the report to this file as well as stdout
        #[clap(short, long)]
        out: Option<PathBuf>,
    },

    /// grade a student answer file without the wizard
    Grade {
        /// share code, shared link, or sheet json path
        sheet: String,

        /// student sheet json with answers and notes
        #[clap(short = 'a', long)]
        answers: PathBuf,

        /// write the report to this file instead of stdout
        #[clap(short, long)]
        out: Option<PathBuf>,
    },
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    match cli.command {
        Command::Create {
            exam_name,
            answers,
            paper_link,
            answer_link,
            passages,
            json,
        } => run_create(exam_name, answers, paper_link, answer_link, passages, json),
        Command::Show { sheet } => run_show(&sheet),
        Command::Fill { sheet, out } => run_fill(&sheet, out),
        Command::Grade {
            sheet,
            answers,
            out,
        } => run_grade(&sheet, &answers, out),
    }
}

/// An existing file path is read as sheet json; anything else is decoded as
/// a share code or shared link.
fn load_sheet(arg: &str) -> Result<ExamSheet, Box<dyn Error>> {
    if Path::new(arg).is_file() {
        let sheet: ExamSheet = serde_json::from_slice(&fs::read(arg)?)?;
        sheet.validate()?;
        Ok(sheet)
    } else {
        Ok(code::decode(arg)?)
    }
}

fn parse_passage(spec: &str) -> Result<Passage, Box<dyn Error>> {
    let err = || format!("passage \"{spec}\" is not NAME:FROM-TO").into();
    let Some((name, span)) = spec.rsplit_once(':') else {
        return Err(err());
    };
    let Some((from, to)) = span.split(['-', '~']).map(str::trim).collect_tuple() else {
        return Err(err());
    };
    Ok(Passage {
        name: name.trim().to_string(),
        from: from.parse().map_err(|_| err())?,
        to: to.parse().map_err(|_| err())?,
    })
}

fn run_create(
    exam_name: String,
    answers: String,
    paper_link: String,
    answer_link: String,
    passages: Vec<String>,
    json: Option<PathBuf>,
) -> Result<(), Box<dyn Error>> {
    let passages = passages
        .iter()
        .map(|s| parse_passage(s))
        .collect::<Result<Vec<_>, _>>()?;

    let sheet = ExamSheet {
        exam_name,
        paper_link,
        answer_link,
        answers: parse_answer_list(&answers),
        passages,
    };
    sheet.validate()?;

    if let Some(path) = json {
        fs::write(&path, serde_json::to_vec_pretty(&sheet)?)?;
    }

    eprintln!(
        "{} 문항, 지문 {}개",
        sheet.question_count(),
        sheet.passages.len()
    );
    println!("{}", code::encode(&sheet));
    Ok(())
}

fn run_show(arg: &str) -> Result<(), Box<dyn Error>> {
    let sheet = load_sheet(arg)?;

    println!("시험명: {}", sheet.exam_name);
    println!("문항 수: {}", sheet.question_count());
    println!("정답: {}", sheet.answers.iter().join(", "));
    for passage in &sheet.passages {
        println!(
            "지문: {} ({}~{}번, {}문항)",
            passage.name,
            passage.from,
            passage.to,
            passage.question_count()
        );
    }
    if !sheet.paper_link.is_empty() {
        println!("시험지: {}", sheet.paper_link);
    }
    if !sheet.answer_link.is_empty() {
        println!("해설: {}", sheet.answer_link);
    }
    Ok(())
}

fn run_grade(arg: &str, answers: &Path, out: Option<PathBuf>) -> Result<(), Box<dyn Error>> {
    let sheet = load_sheet(arg)?;
    let student: StudentSheet = serde_json::from_slice(&fs::read(answers)?)?;

    let (items, summary) = score(&sheet.answers, &student.answers)?;
    let report = build_report(&sheet, &student, &items, &summary);

    match out {
        Some(path) => fs::write(&path, &report)?,
        None => println!("{report}"),
    }
    Ok(())
}

fn run_fill(arg: &str, out: Option<PathBuf>) -> Result<(), Box<dyn Error>> {
    let sheet = load_sheet(arg)?;

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let store = FileConfigStore::new();
    let defaults = store.load();
    let mut student = StudentSheet::blank(&sheet);
    student.student_name = defaults.student_name;
    student.academy_name = defaults.academy_name;
    let mut wizard = Wizard::new(sheet, student);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_wizard(&mut terminal, &mut wizard);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    res?;

    if let Some(report) = wizard.report() {
        let _ = store.save(&Config {
            student_name: wizard.student.student_name.clone(),
            academy_name: wizard.student.academy_name.clone(),
        });
        if let Some(path) = out {
            fs::write(&path, &report)?;
        }
        println!("{report}");
    }
    Ok(())
}

#[derive(Clone, Debug)]
enum WizardEvent {
    Key(KeyEvent),
    Resize,
}

fn get_wizard_events() -> mpsc::Receiver<WizardEvent> {
    let (tx, rx) = mpsc::channel();

    thread::spawn(move || loop {
        let evt = match event::read() {
            Ok(Event::Key(key)) => Some(WizardEvent::Key(key)),
            Ok(Event::Resize(_, _)) => Some(WizardEvent::Resize),
            Ok(_) => None,
            Err(_) => break,
        };

        if let Some(evt) = evt {
            if tx.send(evt).is_err() {
                break;
            }
        }
    });

    rx
}

fn run_wizard<B: Backend>(
    terminal: &mut Terminal<B>,
    wizard: &mut Wizard,
) -> Result<(), Box<dyn Error>> {
    let events = get_wizard_events();
    terminal.draw(|f| ui::draw(wizard, f))?;

    loop {
        match events.recv()? {
            WizardEvent::Resize => {}
            WizardEvent::Key(key) => match key.code {
                KeyCode::Esc => {
                    if !wizard.retreat() {
                        break;
                    }
                }
                KeyCode::Tab => wizard.next_field(),
                KeyCode::BackTab => wizard.prev_field(),
                KeyCode::Backspace => wizard.backspace(),
                KeyCode::Enter => wizard.enter(),
                KeyCode::Left | KeyCode::Right => wizard.cycle_confidence(),
                KeyCode::Up => match wizard.step {
                    Step::Results | Step::Report => wizard.scroll_up(1),
                    _ => wizard.prev_field(),
                },
                KeyCode::Down => match wizard.step {
                    Step::Results | Step::Report => wizard.scroll_down(1),
                    _ => wizard.next_field(),
                },
                KeyCode::PageUp => wizard.scroll_up(10),
                KeyCode::PageDown => wizard.scroll_down(10),
                KeyCode::Char(c) => {
                    if key.modifiers.contains(KeyModifiers::CONTROL) {
                        match c {
                            'c' => break,
                            'd' => wizard.advance()?,
                            'o' => open_link(wizard),
                            _ => {}
                        }
                    } else {
                        wizard.insert_char(c);
                    }
                }
                _ => {}
            },
        }
        terminal.draw(|f| ui::draw(wizard, f))?;
    }

    Ok(())
}

fn open_link(wizard: &Wizard) {
    let link = match wizard.step {
        Step::Results | Step::Report => &wizard.sheet.answer_link,
        _ => &wizard.sheet.paper_link,
    };
    if !link.is_empty() && Browser::is_available() {
        webbrowser::open(link).unwrap_or_default();
    }
}
